//! treeserve - serve local folders over HTTP.
//!
//! This binary parses configuration, validates the folder roots and starts
//! the HTTP server.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use treeserve::{
    config::Config,
    fs::{to_slash, FolderRoots},
    server::{create_router, AppState, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let roots = match FolderRoots::from_paths(&config.folder_paths()) {
        Ok(roots) => roots,
        Err(e) => {
            error!("Invalid folder: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("treeserve v{}", env!("CARGO_PKG_VERSION"));
    info!("Serving {} folder(s):", roots.len());
    for root in roots.iter() {
        info!("  {} -> {}", root.name(), to_slash(root.path()));
    }
    if let Some(ref dir) = config.static_dir {
        info!("Web client: {}", dir.display());
    }

    let state = AppState::new(Arc::new(roots));
    let router = create_router(state, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Serving on http://{}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "treeserve=debug,tower_http=debug"
    } else {
        "treeserve=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    if let Some(ref dir) = config.static_dir {
        router_config = router_config.with_static_dir(dir.clone());
    }

    router_config
}
