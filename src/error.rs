//! Client error taxonomy.
//!
//! [`ClientError`] is the single error type returned by the loader, the
//! mutator and the view builder. Every variant carries enough context to
//! be rendered as a user-facing notice via [`ClientError::user_message`].

use reqwest::StatusCode;

use crate::domain::RecordId;

/// Errors produced while talking to the backend or deriving a view.
///
/// # Categories
///
/// | Variant        | Origin                                   | Retryable |
/// |----------------|------------------------------------------|-----------|
/// | `Network`      | no response (connect, timeout, body read)| yes       |
/// | `Status`       | non-2xx response                         | 5xx only  |
/// | `Decode`       | non-JSON or unexpected body shape        | no        |
/// | `NotFound`     | record missing from the local collection | no        |
/// | `InvalidQuery` | malformed filter bound                   | no        |
/// | `Config`       | invalid configuration value              | no        |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Message extracted from the response body, or the status reason.
        message: String,
    },

    /// The response body was not JSON or did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// No record with this identifier is present in the local collection.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A view query bound could not be parsed or is inconsistent.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A configuration value is malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns `true` when re-invoking the same action may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => status.is_server_error(),
            Self::Decode(_) | Self::NotFound(_) | Self::InvalidQuery(_) | Self::Config(_) => false,
        }
    }

    /// Short title used as the heading of a notice.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Network(_) => "Connection problem",
            Self::Status { .. } => "Request rejected",
            Self::Decode(_) => "Unexpected response",
            Self::NotFound(_) => "Record not found",
            Self::InvalidQuery(_) => "Invalid filter",
            Self::Config(_) => "Configuration error",
        }
    }

    /// Text shown to the user when this error is surfaced.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the server. Check the connection and try again.".to_string()
            }
            Self::Status { status, message } if status.is_server_error() => {
                format!("The server failed to process the request ({message}). Try again later.")
            }
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => "The server sent a response that could not be read.".to_string(),
            Self::NotFound(id) => format!("Record {id} is no longer in the list. Refresh and retry."),
            Self::InvalidQuery(reason) => reason.clone(),
            Self::Config(reason) => reason.clone(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status,
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn network_and_server_errors_are_retryable() {
        assert!(ClientError::Network("timed out".to_string()).is_retryable());
        assert!(
            ClientError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: "bad gateway".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn client_side_failures_are_not_retryable() {
        assert!(
            !ClientError::Status {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: "total must be positive".to_string(),
            }
            .is_retryable()
        );
        assert!(!ClientError::Decode("expected array".to_string()).is_retryable());
        assert!(!ClientError::InvalidQuery("bad date".to_string()).is_retryable());
    }

    #[test]
    fn client_status_message_is_shown_verbatim() {
        let err = ClientError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "codigo already in use".to_string(),
        };
        assert_eq!(err.user_message(), "codigo already in use");
        assert_eq!(err.title(), "Request rejected");
    }

    #[test]
    fn not_found_mentions_identifier() {
        let err = ClientError::NotFound(RecordId::from(42_u64));
        assert!(err.user_message().contains("42"));
    }

    #[test]
    fn serde_error_converts_to_decode() {
        let parsed: Result<Vec<u8>, _> = serde_json::from_str("{not json");
        let Err(err) = parsed else {
            panic!("input is malformed");
        };
        assert!(matches!(ClientError::from(err), ClientError::Decode(_)));
    }
}
