use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Remote error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Remote { status: Option<u16>, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Document error in {path}: {message}")]
    Document { path: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn document(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Document {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Remote { status: Some(404), .. })
    }

    /// Whether retrying the same request may succeed: transport failures
    /// (no status), rate limiting and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { status: None, .. } => true,
            Self::Remote {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Team 'eng' not found");
        assert_eq!(error.to_string(), "Not found: Team 'eng' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_remote_error_display() {
        let error = DomainError::remote(Some(502), "Bad gateway");
        assert_eq!(error.to_string(), "Remote error (HTTP 502): Bad gateway");

        let error = DomainError::remote(None, "Connection failed");
        assert_eq!(error.to_string(), "Remote error: Connection failed");
    }

    #[test]
    fn test_remote_404_is_not_found() {
        assert!(DomainError::remote(Some(404), "missing").is_not_found());
        assert!(!DomainError::remote(Some(403), "forbidden").is_not_found());
    }

    #[test]
    fn test_transient_classification() {
        assert!(DomainError::remote(None, "timeout").is_transient());
        assert!(DomainError::remote(Some(429), "rate limited").is_transient());
        assert!(DomainError::remote(Some(503), "unavailable").is_transient());
        assert!(!DomainError::remote(Some(422), "unprocessable").is_transient());
        assert!(!DomainError::validation("bad").is_transient());
    }

    #[test]
    fn test_document_error() {
        let error = DomainError::document("teams/eng.json", "missing field `slug`");
        assert_eq!(
            error.to_string(),
            "Document error in teams/eng.json: missing field `slug`"
        );
    }
}
