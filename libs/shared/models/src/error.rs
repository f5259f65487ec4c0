use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Normalized failure surfaced by every API call. Validation payloads are
/// parsed once, here, so call sites never re-implement their own parsing.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl ApiError {
    /// Field-level validation messages, when the server provided them.
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    /// Builds a normalized error from a failure response body. The server
    /// reports validation failures as
    /// `{"status":"fail","message":...,"data":{field:[messages]}}`; anything
    /// else is classified by HTTP status alone.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
            if payload.status.as_deref() == Some("fail") && !payload.data.is_empty() {
                let field_errors = payload
                    .data
                    .into_iter()
                    .filter_map(|(field, messages)| {
                        messages.into_iter().next().map(|m| (field, m))
                    })
                    .collect();
                return ApiError::Validation {
                    message: payload
                        .message
                        .unwrap_or_else(|| "Validation failed".to_string()),
                    field_errors,
                };
            }
            if let Some(message) = payload.message {
                return Self::from_status(status, message);
            }
        }

        Self::from_status(status, body.to_string())
    }

    fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Auth(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Api { status, message },
        }
    }
}

/// Wire shape of a failure response.
#[derive(Debug, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "statusCode")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, Vec<String>>,
}
