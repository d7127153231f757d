use thiserror::Error;

/// Failures that are recovered locally, before any request is issued.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Please upload a valid image file (JPEG, PNG, GIF, or WebP). Got: {0}")]
    UnsupportedType(String),

    #[error("File size must be less than 16MB ({0} bytes given).")]
    TooLarge(u64),

    #[error("Please select an image first.")]
    EmptySelection,

    #[error("An analysis is already in progress.")]
    Busy,
}

/// Failures of a request to the prediction or chat service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("{0}")]
    Service(String),

    #[error("Unexpected response from server: {0}")]
    Malformed(String),
}
