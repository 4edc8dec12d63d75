//! Profile editing and the email/password change flows.

use std::sync::Arc;

use async_trait::async_trait;
use shared::protocol::{ProfileImageResponse, ProfileUpdateRequest, UserProfile};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    context::FallbackMessages,
    presenter::{ErrorPresenter, FailureKind, ViewError},
    transport::RequestError,
};

pub const DISPLAY_NAME_MAX_CHARS: usize = 50;
pub const BIO_MAX_CHARS: usize = 500;
pub const PROFILE_IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
pub const PROFILE_IMAGE_MIME_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("nothing to update")]
    EmptyUpdate,
    #[error("display name must be between 1 and {max} characters")]
    DisplayNameLength { max: usize },
    #[error("bio must be at most {max} characters")]
    BioTooLong { max: usize },
    #[error("website must be an http or https URL")]
    InvalidWebsite,
    #[error("unsupported image type '{0}'")]
    UnsupportedImageType(String),
    #[error("image file is empty")]
    EmptyImage,
    #[error("image is {size} bytes, the limit is {max}")]
    ImageTooLarge { size: usize, max: usize },
}

/// Profile edit form. Absent fields are left unchanged on the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<ProfileUpdateRequest, ValidationError> {
        if self.display_name.is_none() && self.bio.is_none() && self.website.is_none() {
            return Err(ValidationError::EmptyUpdate);
        }

        let display_name = match self.display_name.as_deref().map(str::trim) {
            Some(name) if name.is_empty() || name.chars().count() > DISPLAY_NAME_MAX_CHARS => {
                return Err(ValidationError::DisplayNameLength {
                    max: DISPLAY_NAME_MAX_CHARS,
                })
            }
            other => other.map(str::to_string),
        };

        let bio = self.bio.as_deref().map(str::trim);
        if bio.is_some_and(|bio| bio.chars().count() > BIO_MAX_CHARS) {
            return Err(ValidationError::BioTooLong { max: BIO_MAX_CHARS });
        }

        let website = match self.website.as_deref().map(str::trim) {
            Some(website) if !website.is_empty() => {
                let parsed =
                    reqwest::Url::parse(website).map_err(|_| ValidationError::InvalidWebsite)?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ValidationError::InvalidWebsite);
                }
                Some(website.to_string())
            }
            // An explicit empty value clears the website.
            Some(_) => Some(String::new()),
            None => None,
        };

        Ok(ProfileUpdateRequest {
            display_name,
            bio: bio.map(str::to_string),
            website,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !PROFILE_IMAGE_MIME_TYPES.contains(&self.mime_type.as_str()) {
            return Err(ValidationError::UnsupportedImageType(self.mime_type.clone()));
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if self.bytes.len() > PROFILE_IMAGE_MAX_BYTES {
            return Err(ValidationError::ImageTooLarge {
                size: self.bytes.len(),
                max: PROFILE_IMAGE_MAX_BYTES,
            });
        }
        Ok(())
    }
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn initiate_email_change(&self) -> Result<(), RequestError>;
    async fn initiate_password_change(&self) -> Result<(), RequestError>;
    async fn update_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, RequestError>;
    async fn upload_profile_image(
        &self,
        upload: &ImageUpload,
    ) -> Result<ProfileImageResponse, RequestError>;
}

/// Account-management flows with the same error surface as list views.
pub struct AccountService<A> {
    api: A,
    messages: Arc<FallbackMessages>,
    errors: ErrorPresenter,
    submitting: bool,
}

impl<A: AccountApi> AccountService<A> {
    pub fn new(api: A, messages: Arc<FallbackMessages>) -> Self {
        Self {
            api,
            messages,
            errors: ErrorPresenter::default(),
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.errors.current()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.dismiss();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn initiate_email_change(&mut self) -> Result<(), ViewError> {
        self.begin();
        let outcome = self.api.initiate_email_change().await;
        self.finish(FailureKind::EmailChange, outcome)?;
        info!("email change initiated");
        Ok(())
    }

    pub async fn initiate_password_change(&mut self) -> Result<(), ViewError> {
        self.begin();
        let outcome = self.api.initiate_password_change().await;
        self.finish(FailureKind::PasswordChange, outcome)?;
        info!("password change initiated");
        Ok(())
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<UserProfile, ViewError> {
        let request = self.validated(update.validate())?;
        self.begin();
        let outcome = self.api.update_profile(&request).await;
        self.finish(FailureKind::ProfileUpdate, outcome)
    }

    pub async fn upload_profile_image(
        &mut self,
        upload: &ImageUpload,
    ) -> Result<ProfileImageResponse, ViewError> {
        self.validated(upload.validate())?;
        self.begin();
        let outcome = self.api.upload_profile_image(upload).await;
        self.finish(FailureKind::ProfileImage, outcome)
    }

    fn validated<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, ViewError> {
        result.map_err(|err| {
            let view_error = ViewError::validation(err.to_string());
            self.errors.present(view_error.clone());
            view_error
        })
    }

    fn begin(&mut self) {
        self.errors.dismiss();
        self.submitting = true;
    }

    fn finish<T>(
        &mut self,
        kind: FailureKind,
        outcome: Result<T, RequestError>,
    ) -> Result<T, ViewError> {
        self.submitting = false;
        outcome.map_err(|err| {
            warn!(?kind, error = %err, "account request failed");
            let view_error = ViewError::from_request(kind, &err, &self.messages);
            self.errors.present(view_error.clone());
            view_error
        })
    }
}

#[cfg(test)]
#[path = "tests/account_tests.rs"]
mod tests;
