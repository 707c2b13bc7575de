use thiserror::Error;

/// Errors raised while turning a client-supplied path into a filesystem path
#[derive(Debug, Clone, Error)]
pub enum PathError {
    /// A required query parameter was not supplied
    #[error("Missing {name} parameter")]
    MissingParameter { name: &'static str },

    /// The path does not exist on disk
    #[error("{path}: {message}")]
    NotFound { path: String, message: String },

    /// The path resolves outside every configured folder root
    #[error("Path is outside the served folders: {path}")]
    Forbidden { path: String },

    /// A directory was expected
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    /// A regular file was expected
    #[error("Not a regular file: {path}")]
    NotAFile { path: String },

    /// An upload relative path tried to leave its destination folder
    #[error("Invalid relative path: {path}")]
    InvalidRelativePath { path: String },

    /// Any other failure while inspecting the path
    #[error("{path}: {message}")]
    Io { path: String, message: String },
}

impl PathError {
    /// Stable machine-readable identifier for this error.
    pub const fn kind(&self) -> &'static str {
        match self {
            PathError::MissingParameter { .. } => "invalid_input",
            PathError::NotFound { .. } => "not_found",
            PathError::Forbidden { .. } => "forbidden",
            PathError::NotADirectory { .. } => "not_a_directory",
            PathError::NotAFile { .. } => "not_a_file",
            PathError::InvalidRelativePath { .. } => "invalid_relative_path",
            PathError::Io { .. } => "io_error",
        }
    }

    /// Build the right variant from an I/O error hit while inspecting `path`.
    ///
    /// A path whose prefix is a regular file, or whose name the platform
    /// cannot represent, does not exist either and maps to `NotFound`.
    pub fn from_io(path: impl Into<String>, err: &std::io::Error) -> Self {
        let path = path.into();
        if is_missing_path(err) {
            PathError::NotFound {
                path,
                message: err.to_string(),
            }
        } else {
            PathError::Io {
                path,
                message: err.to_string(),
            }
        }
    }
}

fn is_missing_path(err: &std::io::Error) -> bool {
    use std::io::ErrorKind;

    if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) {
        return true;
    }

    #[cfg(unix)]
    {
        use nix::errno::Errno;
        if err.raw_os_error() == Some(Errno::ENAMETOOLONG as i32) {
            return true;
        }
    }

    false
}

/// Errors from listing, viewing and delivering files
#[derive(Debug, Clone, Error)]
pub enum FileError {
    /// The path could not be resolved
    #[error(transparent)]
    Path(#[from] PathError),

    /// Reading from disk failed after the path was resolved
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl FileError {
    /// Stable machine-readable identifier for this error.
    pub const fn kind(&self) -> &'static str {
        match self {
            FileError::Path(err) => err.kind(),
            FileError::Io { .. } => "io_error",
        }
    }

    pub(crate) fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        FileError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors that abort an upload request
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// The destination folder or a part's relative path was rejected
    #[error(transparent)]
    Path(#[from] PathError),

    /// The request body is not multipart/form-data
    #[error("Not a multipart request: {0}")]
    NotMultipart(String),

    /// The multipart stream failed mid-request (malformed body, disconnect)
    #[error("Upload stream error: {0}")]
    Stream(String),

    /// Creating directories or writing the destination file failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl UploadError {
    /// Stable machine-readable identifier for this error.
    pub const fn kind(&self) -> &'static str {
        match self {
            UploadError::Path(err) => err.kind(),
            UploadError::NotMultipart(_) => "not_multipart",
            UploadError::Stream(_) => "stream_error",
            UploadError::Io { .. } => "io_error",
        }
    }

    pub(crate) fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        UploadError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
