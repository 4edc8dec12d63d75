use super::*;
use reqwest::StatusCode;
use shared::{domain::UserId, error::ErrorCode, error::ErrorBody};
use std::sync::Mutex;

#[derive(Default)]
struct FakeAccountApi {
    calls: Mutex<Vec<&'static str>>,
    updates: Mutex<Vec<ProfileUpdateRequest>>,
    fail_with: Option<(StatusCode, Option<ErrorBody>)>,
}

impl FakeAccountApi {
    fn failing(status: StatusCode, body: Option<ErrorBody>) -> Self {
        Self {
            fail_with: Some((status, body)),
            ..Self::default()
        }
    }

    fn record(&self, call: &'static str) -> Result<(), RequestError> {
        self.calls.lock().expect("lock").push(call);
        match &self.fail_with {
            Some((status, body)) => Err(RequestError::status(*status, body.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountApi for FakeAccountApi {
    async fn initiate_email_change(&self) -> Result<(), RequestError> {
        self.record("email")
    }

    async fn initiate_password_change(&self) -> Result<(), RequestError> {
        self.record("password")
    }

    async fn update_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, RequestError> {
        self.record("profile")?;
        self.updates.lock().expect("lock").push(request.clone());
        Ok(UserProfile {
            id: UserId(1),
            username: "ada".to_string(),
            email: None,
            display_name: request.display_name.clone(),
            bio: request.bio.clone(),
            website: request.website.clone(),
            profile_image_url: None,
        })
    }

    async fn upload_profile_image(
        &self,
        upload: &ImageUpload,
    ) -> Result<ProfileImageResponse, RequestError> {
        self.record("image")?;
        Ok(ProfileImageResponse {
            profile_image_url: format!("/uploads/{}", upload.filename),
        })
    }
}

fn service(api: FakeAccountApi) -> AccountService<FakeAccountApi> {
    AccountService::new(api, Arc::new(FallbackMessages::default()))
}

fn png(bytes: usize) -> ImageUpload {
    ImageUpload {
        filename: "avatar.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0; bytes],
    }
}

#[test]
fn profile_update_validation() {
    assert_eq!(
        ProfileUpdate::default().validate(),
        Err(ValidationError::EmptyUpdate)
    );

    let blank_name = ProfileUpdate {
        display_name: Some("   ".to_string()),
        ..ProfileUpdate::default()
    };
    assert_eq!(
        blank_name.validate(),
        Err(ValidationError::DisplayNameLength { max: 50 })
    );

    let long_bio = ProfileUpdate {
        bio: Some("x".repeat(BIO_MAX_CHARS + 1)),
        ..ProfileUpdate::default()
    };
    assert_eq!(long_bio.validate(), Err(ValidationError::BioTooLong { max: 500 }));

    let bad_site = ProfileUpdate {
        website: Some("ftp://example.com".to_string()),
        ..ProfileUpdate::default()
    };
    assert_eq!(bad_site.validate(), Err(ValidationError::InvalidWebsite));

    let ok = ProfileUpdate {
        display_name: Some("  Ada Lovelace ".to_string()),
        website: Some("https://ada.example".to_string()),
        ..ProfileUpdate::default()
    };
    let request = ok.validate().expect("valid");
    assert_eq!(request.display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(request.website.as_deref(), Some("https://ada.example"));
    assert_eq!(request.bio, None);
}

#[test]
fn image_upload_validation() {
    assert!(png(10).validate().is_ok());
    assert_eq!(png(0).validate(), Err(ValidationError::EmptyImage));
    assert_eq!(
        png(PROFILE_IMAGE_MAX_BYTES + 1).validate(),
        Err(ValidationError::ImageTooLarge {
            size: PROFILE_IMAGE_MAX_BYTES + 1,
            max: PROFILE_IMAGE_MAX_BYTES,
        })
    );

    let svg = ImageUpload {
        mime_type: "image/svg+xml".to_string(),
        ..png(10)
    };
    assert_eq!(
        svg.validate(),
        Err(ValidationError::UnsupportedImageType("image/svg+xml".to_string()))
    );
}

#[tokio::test]
async fn invalid_profile_update_issues_no_request() {
    let mut account = service(FakeAccountApi::default());

    let error = account
        .update_profile(&ProfileUpdate::default())
        .await
        .expect_err("must fail validation");

    assert_eq!(error.code, Some(ErrorCode::Validation));
    assert_eq!(error.message, "nothing to update");
    assert_eq!(account.error(), Some(&error));
    assert!(account.api.calls.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn profile_update_sends_normalized_request() {
    let mut account = service(FakeAccountApi::default());
    let update = ProfileUpdate {
        display_name: Some(" Ada ".to_string()),
        bio: Some("Analyst".to_string()),
        website: None,
    };

    let profile = account.update_profile(&update).await.expect("update");

    assert_eq!(profile.display_name.as_deref(), Some("Ada"));
    assert!(!account.is_submitting());
    assert!(account.error().is_none());
    let sent = account.api.updates.lock().expect("lock").clone();
    assert_eq!(sent[0].display_name.as_deref(), Some("Ada"));
    assert_eq!(sent[0].bio.as_deref(), Some("Analyst"));
}

#[tokio::test]
async fn email_change_failure_prefers_backend_message() {
    let mut account = service(FakeAccountApi::failing(
        StatusCode::TOO_MANY_REQUESTS,
        Some(ErrorBody::new("Too many requests, wait a minute")),
    ));

    let error = account
        .initiate_email_change()
        .await
        .expect_err("must fail");

    assert_eq!(error.message, "Too many requests, wait a minute");
    assert_eq!(error.code, Some(ErrorCode::MutationFailed));
    assert!(!account.is_submitting());

    account.dismiss_error();
    assert!(account.error().is_none());
}

#[tokio::test]
async fn password_change_failure_without_body_uses_fallback() {
    let mut account = service(FakeAccountApi::failing(StatusCode::BAD_GATEWAY, None));

    let error = account
        .initiate_password_change()
        .await
        .expect_err("must fail");

    assert_eq!(error.message, FallbackMessages::default().password_change_failed);
    assert_eq!(error.code, Some(ErrorCode::MutationFailed));
}

#[tokio::test]
async fn successful_flows_reach_the_api() {
    let mut account = service(FakeAccountApi::default());

    account.initiate_email_change().await.expect("email");
    account.initiate_password_change().await.expect("password");
    let uploaded = account.upload_profile_image(&png(16)).await.expect("image");

    assert_eq!(uploaded.profile_image_url, "/uploads/avatar.png");
    assert_eq!(
        *account.api.calls.lock().expect("lock"),
        vec!["email", "password", "image"]
    );
}
