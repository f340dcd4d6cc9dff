use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid record on line {line}: {field}: {reason}")]
    InvalidRecord {
        line: u64,
        field: String,
        reason: String,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SegmentationError {
    /// True for every failure raised while building the transaction store.
    /// None of these leave a partially loaded dataset behind.
    pub fn is_data_load_error(&self) -> bool {
        matches!(
            self,
            SegmentationError::DataLoad(_)
                | SegmentationError::MissingColumn { .. }
                | SegmentationError::InvalidRecord { .. }
        )
    }
}

impl From<serde_json::Error> for SegmentationError {
    fn from(e: serde_json::Error) -> Self {
        SegmentationError::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for SegmentationError {
    fn from(e: csv::Error) -> Self {
        SegmentationError::DataLoad(e.to_string())
    }
}

impl From<std::io::Error> for SegmentationError {
    fn from(e: std::io::Error) -> Self {
        SegmentationError::DataLoad(e.to_string())
    }
}
