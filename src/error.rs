use thiserror::Error;

/// Main error type for cuttle operations
#[derive(Error, Debug)]
pub enum CuttleError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for cuttle operations
pub type Result<T> = std::result::Result<T, CuttleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CuttleError::DocumentNotFound("doc-42".to_string());
        assert_eq!(err.to_string(), "Document not found: doc-42");
    }

    #[test]
    fn test_invalid_request_display() {
        let err = CuttleError::InvalidRequest("id is required".to_string());
        assert_eq!(err.to_string(), "Invalid request: id is required");
    }
}
