//! Configuration management for treeserve.
//!
//! Options come from command-line arguments via clap, each with an
//! environment variable fallback using the `TREESERVE_` prefix:
//!
//! - `TREESERVE_HOST` - Server bind address (default: 0.0.0.0)
//! - `TREESERVE_PORT` - Server port (default: 30006)
//! - `TREESERVE_FOLDERS` - Comma-separated folders to serve (required)
//! - `TREESERVE_STATIC_DIR` - Directory holding the web client
//! - `TREESERVE_CORS_ORIGINS` - Comma-separated allowed CORS origins
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use treeserve::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! println!("Listening on {}", config.bind_address());
//! ```

use std::path::PathBuf;

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 30006;

// =============================================================================
// CLI Arguments
// =============================================================================

/// treeserve - browse, view, upload and download local folders over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(name = "treeserve")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TREESERVE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TREESERVE_PORT")]
    pub port: u16,

    // =========================================================================
    // Served Folders
    // =========================================================================
    /// Folders to serve (comma-separated). Each must exist at startup.
    #[arg(long, env = "TREESERVE_FOLDERS", value_delimiter = ',', required = true)]
    pub folders: Vec<String>,

    /// Directory containing the web client, served for non-API paths.
    #[arg(long, env = "TREESERVE_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TREESERVE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Configured folders with surrounding whitespace and blank entries removed.
    pub fn folder_paths(&self) -> Vec<PathBuf> {
        self.folders
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        let folders = self.folder_paths();
        if folders.is_empty() {
            return Err(
                "No folders provided. Use --folders or TREESERVE_FOLDERS to specify folders"
                    .to_string(),
            );
        }

        for folder in &folders {
            if !folder.exists() {
                return Err(format!("Folder does not exist: {}", folder.display()));
            }
            if !folder.is_dir() {
                return Err(format!("Not a directory: {}", folder.display()));
            }
        }

        if let Some(ref dir) = self.static_dir {
            if !dir.is_dir() {
                return Err(format!("Static directory does not exist: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
