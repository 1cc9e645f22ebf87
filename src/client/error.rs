//! Client error types

use serde::Deserialize;
use thiserror::Error;

use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Nothing answered at the configured address
    #[error("Server unavailable at {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    /// Rejected before anything was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Build an `Api` error from a response body, reading the server's
    /// message when the body is a recognised error shape
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: Inner,
        }

        #[derive(Deserialize)]
        struct Inner {
            code: Option<String>,
            message: String,
        }

        #[derive(Deserialize)]
        struct Detail {
            detail: String,
        }

        if let Ok(envelope) = serde_json::from_str::<Envelope>(body) {
            return ClientError::Api {
                status,
                code: envelope.error.code,
                message: envelope.error.message,
            };
        }
        if let Ok(detail) = serde_json::from_str::<Detail>(body) {
            return ClientError::Api {
                status,
                code: None,
                message: detail.detail,
            };
        }

        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body.trim().to_string()
        };
        ClientError::Api {
            status,
            code: None,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_envelope() {
        let body = r#"{"error":{"code":"NOT_FOUND","message":"Not found: Ticket t-1"},"request_id":"r"}"#;
        let err = ClientError::from_body(404, body);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error 404: Not found: Ticket t-1");
    }

    #[test]
    fn test_from_detail_body() {
        let err = ClientError::from_body(400, r#"{"detail":"Email already exists"}"#);
        match err {
            ClientError::Api { code, message, .. } => {
                assert_eq!(code, None);
                assert_eq!(message, "Email already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_empty_body() {
        let err = ClientError::from_body(502, "");
        assert_eq!(err.to_string(), "API error 502: HTTP 502");
    }
}
