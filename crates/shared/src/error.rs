use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable classification attached to errors surfaced in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    LoadFailed,
    DeleteFailed,
    MutationFailed,
    Validation,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::LoadFailed => "LOAD_FAILED",
            ErrorCode::DeleteFailed => "DELETE_FAILED",
            ErrorCode::MutationFailed => "MUTATION_FAILED",
            ErrorCode::Validation => "VALIDATION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload the backend may attach to a non-success response.
///
/// Both fields are optional; different endpoints fill either `error` or
/// `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: None,
        }
    }

    /// First non-blank message carried by the payload, `error` before `message`.
    pub fn best_message(&self) -> Option<&str> {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_message_prefers_error_field_and_skips_blank_values() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Database unavailable","message":"other"}"#)
                .expect("decode");
        assert_eq!(body.best_message(), Some("Database unavailable"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"  ","message":"Token expired"}"#).expect("decode");
        assert_eq!(body.best_message(), Some("Token expired"));

        assert_eq!(ErrorBody::default().best_message(), None);
    }

    #[test]
    fn error_codes_use_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&ErrorCode::DeleteFailed).expect("serialize");
        assert_eq!(json, "\"DELETE_FAILED\"");
        assert_eq!(ErrorCode::LoadFailed.to_string(), "LOAD_FAILED");
    }
}
