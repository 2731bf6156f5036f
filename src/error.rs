use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeosieveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed boundary geometry: {message}")]
    MalformedBoundary { message: String },

    #[error("Boundary geometry contains no polygon area")]
    EmptyBoundary,

    #[error("Unsupported boundary coordinate reference system: {name}")]
    UnsupportedCrs { name: String },

    #[error("Field '{field}' not found in record header")]
    UnknownField { field: String },

    #[error("Invalid field delimiter {value:?}: expected a single ASCII character")]
    InvalidDelimiter { value: String },

    #[error("Classification was cancelled")]
    Cancelled,
}

impl GeosieveError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        GeosieveError::MalformedBoundary {
            message: message.into(),
        }
    }

    /// Whether the error is a boundary-geometry failure (fatal before classification)
    pub fn is_boundary_error(&self) -> bool {
        matches!(
            self,
            GeosieveError::MalformedBoundary { .. }
                | GeosieveError::EmptyBoundary
                | GeosieveError::UnsupportedCrs { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GeosieveError>;
