use thiserror::Error;

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while talking to the content service or validating input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The requested resource does not exist (or is not public)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level failure: connection refused, timeout, TLS, ...
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status other than 404
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// The response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid project id: {0:?}")]
    InvalidProjectId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File is {size} bytes, the upload limit is {limit} bytes")]
    UploadTooLarge { size: u64, limit: u64 },

    #[error("Unsupported upload type: {0}")]
    UnsupportedType(String),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }

    /// Short message suitable for an error page.
    ///
    /// Missing projects and failed fetches render the same way; only the
    /// wording differs.
    pub fn summary(&self) -> &'static str {
        match self {
            ContentError::NotFound(_) | ContentError::InvalidProjectId(_) => "Project not found",
            ContentError::UploadTooLarge { .. } => "File is too large",
            ContentError::UnsupportedType(_) => "File type is not allowed",
            _ => "Something went wrong while loading this page",
        }
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ContentError::Decode(err.to_string())
        } else {
            ContentError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_network_share_page_treatment() {
        let missing = ContentError::NotFound("/api/public/projects/x".to_string());
        let offline = ContentError::Network("connection refused".to_string());

        assert!(missing.is_not_found());
        assert!(!offline.is_not_found());
        assert_eq!(missing.summary(), "Project not found");
        assert_eq!(
            offline.summary(),
            "Something went wrong while loading this page"
        );
    }

    #[test]
    fn test_json_errors_become_decode_errors() {
        let err: ContentError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, ContentError::Decode(_)));
    }
}
