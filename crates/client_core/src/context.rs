//! Session context handed to every client and view constructor.

use std::{sync::Arc, time::Duration};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Human-readable copy used when the backend supplies no error message.
///
/// Kept as a value so callers with their own translations can inject them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMessages {
    pub load_failed: String,
    pub delete_failed: String,
    pub profile_update_failed: String,
    pub profile_image_failed: String,
    pub email_change_failed: String,
    pub password_change_failed: String,
    pub retry_hint: String,
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            load_failed: "Failed to load items.".into(),
            delete_failed: "Failed to delete the item.".into(),
            profile_update_failed: "Failed to update your profile.".into(),
            profile_image_failed: "Failed to upload the profile image.".into(),
            email_change_failed: "Failed to start the email change.".into(),
            password_change_failed: "Failed to start the password change.".into(),
            retry_hint: "Please try again later.".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientContext {
    base_url: String,
    auth_token: Option<String>,
    request_timeout: Duration,
    messages: Arc<FallbackMessages>,
}

impl ClientContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            messages: Arc::new(FallbackMessages::default()),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = (!token.trim().is_empty()).then_some(token);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_messages(mut self, messages: FallbackMessages) -> Self {
        self.messages = Arc::new(messages);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn messages(&self) -> &Arc<FallbackMessages> {
        &self.messages
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        let context = ClientContext::new(" http://localhost:3000/api/ ");
        assert_eq!(context.base_url(), "http://localhost:3000/api");
        assert_eq!(
            context.endpoint("/posts/user/posts"),
            "http://localhost:3000/api/posts/user/posts"
        );
        assert_eq!(context.endpoint("posts/9"), "http://localhost:3000/api/posts/9");
    }

    #[test]
    fn blank_auth_token_is_treated_as_absent() {
        let context = ClientContext::new("http://localhost").with_auth_token("   ");
        assert_eq!(context.auth_token(), None);

        let context = ClientContext::new("http://localhost").with_auth_token("abc");
        assert_eq!(context.auth_token(), Some("abc"));
    }
}
