use thiserror::Error;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),

    #[error("Failed to load dataset: {0}")]
    Load(String),

    #[error("Data not loaded")]
    DataNotLoaded,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column unavailable: {0}")]
    ColumnUnavailable(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable tag reported to clients alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) | Error::Csv(_) | Error::Load(_) => "LoadError",
            Error::Json(_) => "SerializationError",
            Error::DataNotLoaded => "DataNotLoaded",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::ColumnNotFound(_) => "ColumnNotFound",
            Error::ColumnUnavailable(_) => "ColumnUnavailable",
            Error::Schema(_) => "SchemaError",
            Error::IndexOutOfBounds { .. } => "IndexOutOfBounds",
            Error::ConfigurationError(_) => "ConfigurationError",
        }
    }

    /// HTTP status used when the error crosses the service boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidArgument(_) => 400,
            Error::ColumnNotFound(_) | Error::ColumnUnavailable(_) => 404,
            Error::Schema(_) => 422,
            Error::DataNotLoaded => 503,
            _ => 500,
        }
    }

    /// Whether the failure was caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
