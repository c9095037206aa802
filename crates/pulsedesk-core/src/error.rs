//! Error types for the Pulsedesk dashboard

use std::{error::Error as StdError, fmt};

/// Main error type for the Pulsedesk dashboard
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// HTTP transport error (connection refused, DNS failure, timeout)
    Http(String),

    /// Backend returned a non-success status other than 401/403/404
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Request was rejected with 401 or 403; the local session must be cleared
    Unauthorized,

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Persisted session is missing, malformed, or could not be written
    Session(String),

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Http(msg) => write!(f, "HTTP error: {msg}"),
            Self::Api { status, message } => {
                write!(f, "API error ({status}): {message}")
            }
            Self::Unauthorized => write!(f, "Unauthorized: session is no longer valid"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Session(msg) => write!(f, "Session error: {msg}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// Whether this error must clear the persisted session and force a
    /// redirect to the login view
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        match app_error {
            Error::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }

        assert!(format!("{}", app_error).contains("I/O error"));
    }

    #[test]
    fn test_configuration_error() {
        let error = Error::Configuration {
            message: "Invalid API base URL".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Configuration error: Invalid API base URL"
        );
    }

    #[test]
    fn test_api_error_display() {
        let error = Error::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        };

        assert_eq!(format!("{}", error), "API error (500): Internal Server Error");
    }

    #[test]
    fn test_unauthorized_flag() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::Http("connection refused".to_string()).is_unauthorized());
        assert!(
            !Error::Api {
                status: 404,
                message: "missing".to_string()
            }
            .is_unauthorized()
        );
    }

    #[test]
    fn test_not_found_error() {
        let error = Error::NotFound {
            resource: "customer cus_123".to_string(),
        };

        assert_eq!(format!("{}", error), "Resource not found: customer cus_123");
    }

    #[test]
    fn test_session_error() {
        let error = Error::Session("malformed persisted user".to_string());
        assert_eq!(
            format!("{}", error),
            "Session error: malformed persisted user"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_str = r#"{"invalid": json}"#;
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let app_error = Error::from(json_error);

        match app_error {
            Error::Serialization(_) => {}
            _ => panic!("Expected Serialization error variant"),
        }

        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_error_source_for_plain_variants() {
        assert!(Error::Unauthorized.source().is_none());
        assert!(Error::Http("test".to_string()).source().is_none());
        assert!(
            Error::Session("test".to_string()).source().is_none()
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        fn returns_error() -> Result<String> {
            Err(Error::Other("test error".to_string()))
        }

        assert!(returns_result().is_ok());
        assert!(returns_error().is_err());
    }
}
