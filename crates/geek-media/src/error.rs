//! Media error types.

use thiserror::Error;

/// Errors raised by the outbound HTTP client.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent.
    #[error("Request failed: {0}")]
    RequestError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The response body was not what we expected.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

/// Errors raised while handling product images.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The payload is not a base64 image data URI.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image is {size} bytes, the limit is {max}")]
    ImageTooLarge { size: usize, max: usize },

    /// The URL does not point at a hosted image.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The image host refused or failed the upload.
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Destroy failed: {0}")]
    Destroy(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl MediaError {
    /// Whether the error was caused by the client's payload.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MediaError::InvalidImage(_) | MediaError::ImageTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::JsonError(_)));
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(MediaError::InvalidImage("x".into()).is_invalid_input());
        assert!(MediaError::ImageTooLarge { size: 2, max: 1 }.is_invalid_input());
        assert!(!MediaError::Upload("down".into()).is_invalid_input());
    }
}
