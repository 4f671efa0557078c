use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type for cohctl operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The config document could not be read or written.
    #[error("unable to access config file {path}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config document exists but is not structurally valid.
    #[error("config file {path} is corrupt: {details}")]
    ConfigCorrupt { path: PathBuf, details: String },

    /// Neither `-c` nor the current context names a known connection.
    #[error(
        "no connection specified: use -c/--connection or set a current context with 'cohctl set context <name>'"
    )]
    NoConnection,

    /// A named record already exists.
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// User supplied an invalid value.
    #[error("{0}")]
    InvalidArgument(String),

    /// Requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Operation refused because the cluster or local state does not allow it.
    #[error("{0}")]
    PreconditionFailed(String),

    /// The management endpoint answered with a non-success status.
    #[error("request rejected by cluster with status {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    /// The request never produced a response.
    #[error("unable to reach cluster: {0}")]
    Transport(String),

    /// Only "http" connections are implemented.
    #[error("connection type '{0}' is not supported, only 'http' is valid")]
    UnsupportedConnectionKind(String),

    /// Name service lookup failed.
    #[error("name service lookup against {endpoint} failed: {details}")]
    Discovery { endpoint: String, details: String },

    /// User declined the confirmation prompt.
    #[error("operation cancelled")]
    Cancelled,

    /// More than one fan-out task failed; each failure has been logged.
    #[error("{count} errors occurred, see log for details")]
    Aggregate { count: usize },

    /// Response or input could not be decoded.
    #[error("failed to parse {what}: {details}")]
    ParseError { what: String, details: String },
}

impl AppError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        AppError::InvalidArgument(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn parse<W: Into<String>, D: ToString>(what: W, details: D) -> Self {
        AppError::ParseError { what: what.into(), details: details.to_string() }
    }

    /// Process exit code for this error. A declined confirmation is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Cancelled => 0,
            _ => 1,
        }
    }

    /// Provide an `io::ErrorKind`-like view for callers that classify failures.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::ConfigUnreadable { source, .. } => source.kind(),
            AppError::ConfigCorrupt { .. }
            | AppError::InvalidArgument(_)
            | AppError::UnsupportedConnectionKind(_)
            | AppError::ParseError { .. } => io::ErrorKind::InvalidInput,
            AppError::NoConnection | AppError::NotFound(_) => io::ErrorKind::NotFound,
            AppError::DuplicateName { .. } => io::ErrorKind::AlreadyExists,
            AppError::PreconditionFailed(_) => io::ErrorKind::PermissionDenied,
            AppError::Cancelled => io::ErrorKind::Interrupted,
            AppError::RemoteRejected { .. }
            | AppError::Transport(_)
            | AppError::Discovery { .. }
            | AppError::Aggregate { .. } => io::ErrorKind::Other,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::parse("JSON response", err)
    }
}
