//! Displayable errors and the single-slot presenter that holds them.

use shared::error::ErrorCode;

use crate::{context::FallbackMessages, transport::RequestError};

/// Which user-facing operation failed; selects the fallback copy and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Load,
    Delete,
    ProfileUpdate,
    ProfileImage,
    EmailChange,
    PasswordChange,
}

impl FailureKind {
    pub fn code(self) -> ErrorCode {
        match self {
            FailureKind::Load => ErrorCode::LoadFailed,
            FailureKind::Delete => ErrorCode::DeleteFailed,
            FailureKind::ProfileUpdate
            | FailureKind::ProfileImage
            | FailureKind::EmailChange
            | FailureKind::PasswordChange => ErrorCode::MutationFailed,
        }
    }

    fn fallback(self, messages: &FallbackMessages) -> &str {
        match self {
            FailureKind::Load => &messages.load_failed,
            FailureKind::Delete => &messages.delete_failed,
            FailureKind::ProfileUpdate => &messages.profile_update_failed,
            FailureKind::ProfileImage => &messages.profile_image_failed,
            FailureKind::EmailChange => &messages.email_change_failed,
            FailureKind::PasswordChange => &messages.password_change_failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub message: String,
    pub details: Option<String>,
    pub code: Option<ErrorCode>,
    status: Option<u16>,
}

impl ViewError {
    pub fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            details: None,
            code: Some(code),
            status: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Backend message when present, fallback copy for `kind` otherwise.
    pub fn from_request(kind: FailureKind, err: &RequestError, messages: &FallbackMessages) -> Self {
        let message = err
            .backend_message()
            .unwrap_or_else(|| kind.fallback(messages))
            .to_string();
        Self {
            message,
            details: Some(messages.retry_hint.clone()),
            code: Some(kind.code()),
            status: err.status_code().map(|status| status.as_u16()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message, ErrorCode::Validation)
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True when the backend rejected the session credentials.
    pub fn requires_reauth(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

/// Holds at most one active error for a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPresenter {
    current: Option<ViewError>,
}

impl ErrorPresenter {
    pub fn present(&mut self, error: ViewError) {
        self.current = Some(error);
    }

    pub fn current(&self) -> Option<&ViewError> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use shared::error::ErrorBody;

    use super::*;

    #[test]
    fn backend_message_wins_over_fallback_copy() {
        let messages = FallbackMessages::default();
        let err = RequestError::status(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(ErrorBody::new("Database unavailable")),
        );

        let view_error = ViewError::from_request(FailureKind::Load, &err, &messages);
        assert_eq!(view_error.message, "Database unavailable");
        assert_eq!(view_error.code, Some(ErrorCode::LoadFailed));
        assert_eq!(view_error.details.as_deref(), Some("Please try again later."));
        assert_eq!(view_error.status(), Some(500));
        assert!(!view_error.requires_reauth());
    }

    #[test]
    fn falls_back_per_failure_kind_without_backend_message() {
        let messages = FallbackMessages::default();
        let err = RequestError::status(StatusCode::FORBIDDEN, None);

        let delete = ViewError::from_request(FailureKind::Delete, &err, &messages);
        assert_eq!(delete.message, messages.delete_failed);
        assert_eq!(delete.code, Some(ErrorCode::DeleteFailed));
        assert!(delete.requires_reauth());

        let email = ViewError::from_request(FailureKind::EmailChange, &err, &messages);
        assert_eq!(email.message, messages.email_change_failed);
        assert_eq!(email.code, Some(ErrorCode::MutationFailed));
    }

    #[test]
    fn presenter_holds_only_the_latest_error() {
        let mut presenter = ErrorPresenter::default();
        presenter.present(ViewError::validation("first"));
        presenter.present(ViewError::validation("second"));
        assert_eq!(presenter.current().map(|e| e.message.as_str()), Some("second"));

        presenter.dismiss();
        assert!(!presenter.is_active());
    }
}
