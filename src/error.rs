use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImtError {
    #[error("no import map found (tried {})", .0.join(", "))]
    NotFoundImportMap(Vec<String>),

    #[error("import \"{0}\" not found in import map")]
    NotFoundSpecifier(String),

    #[error("failed to fetch {url}: {cause}")]
    Fetch {
        url: String,
        status: Option<u16>,
        cause: String,
    },

    #[error("failed to parse {url} at {line}:{column}: {message}")]
    Parse {
        url: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unsupported specifier \"{specifier}\" in {referrer}")]
    UnsupportedSpecifier { specifier: String, referrer: String },

    #[error("filesystem error at {}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to vendor into {}: {reason}", .path.display())]
    VendorRoot { path: PathBuf, reason: &'static str },

    #[error("vendoring was cancelled")]
    Cancelled,

    #[error("dependency {0} failed to vendor")]
    DependencyFailed(String),

    #[error("invalid url \"{0}\"")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error("not found home dir")]
    NotFoundHomeDir,

    #[error("unknown config key \"{0}\"")]
    UnknownConfigKey(String),

    #[error("invalid value \"{value}\" for config key \"{key}\"")]
    InvalidConfigValue { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    FetchError,
    ParseError,
    UnsupportedSpecifier,
    FilesystemError,
    Cancelled,
    Config,
    Other,
}

impl ImtError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImtError::NotFoundImportMap(_) | ImtError::NotFoundSpecifier(_) => ErrorKind::NotFound,
            ImtError::Fetch { .. } => ErrorKind::FetchError,
            ImtError::Parse { .. } => ErrorKind::ParseError,
            ImtError::UnsupportedSpecifier { .. } => ErrorKind::UnsupportedSpecifier,
            ImtError::Filesystem { .. } | ImtError::VendorRoot { .. } | ImtError::Io(_) => {
                ErrorKind::FilesystemError
            }
            ImtError::Cancelled => ErrorKind::Cancelled,
            ImtError::NotFoundHomeDir
            | ImtError::UnknownConfigKey(_)
            | ImtError::InvalidConfigValue { .. } => ErrorKind::Config,
            ImtError::DependencyFailed(_) | ImtError::InvalidUrl(..) | ImtError::Json(_) => {
                ErrorKind::Other
            }
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImtError::Filesystem {
            path: path.into(),
            source,
        }
    }
}
