use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use shared::protocol::{ListPage, ProfileImageResponse, ProfileUpdateRequest, UserProfile};
use tracing::{debug, info};

pub mod account;
pub mod context;
pub mod controller;
pub mod fetcher;
pub mod presenter;
pub mod query;
pub mod resource;
pub mod transport;
pub mod view;

pub use account::{AccountApi, AccountService, ImageUpload, ProfileUpdate, ValidationError};
pub use context::{ClientContext, FallbackMessages};
pub use controller::{FetchRequest, Generation, ListAction, ListState, Phase, Transition};
pub use fetcher::{ItemMutator, ResourceFetcher, ResultFetcher};
pub use presenter::{ErrorPresenter, FailureKind, ViewError};
pub use query::{DateRange, FilterPatch, ListFilters, ListParams, QueryError, QueryState};
pub use resource::{Comments, ListResource, Posts};
pub use transport::RequestError;
pub use view::ListView;

use transport::{check_status, read_json};

/// HTTP client for the blog backend, bound to one [`ClientContext`].
#[derive(Debug, Clone)]
pub struct BlogClient {
    http: Client,
    context: ClientContext,
}

impl BlogClient {
    pub fn new(context: ClientContext) -> Self {
        Self {
            http: Client::new(),
            context,
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Fetcher/mutator for resource `R` sharing this client's connection pool.
    pub fn resource<R: ListResource>(&self) -> ResourceFetcher<R> {
        ResourceFetcher::new(self.clone())
    }

    pub async fn list<R: ListResource>(
        &self,
        params: &ListParams,
    ) -> Result<ListPage<R::Item>, RequestError> {
        let response = self
            .request(Method::GET, R::LIST_PATH)
            .query(params)
            .send()
            .await
            .map_err(RequestError::Network)?;
        let envelope: R::Envelope = read_json(check_status(response).await?).await?;
        let page: ListPage<R::Item> = envelope.into();
        debug!(
            resource = R::NAME,
            page = page.pagination.current_page,
            total_pages = page.pagination.total_pages,
            items = page.items.len(),
            "list page received"
        );
        Ok(page)
    }

    pub async fn delete<R: ListResource>(&self, id: R::Id) -> Result<(), RequestError> {
        let response = self
            .request(Method::DELETE, &R::item_path(id))
            .send()
            .await
            .map_err(RequestError::Network)?;
        check_status(response).await?;
        info!(resource = R::NAME, %id, "deleted");
        Ok(())
    }

    async fn post_empty(&self, path: &str) -> Result<(), RequestError> {
        let response = self
            .request(Method::POST, path)
            .send()
            .await
            .map_err(RequestError::Network)?;
        check_status(response).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.context.endpoint(path))
            .timeout(self.context.request_timeout());
        match self.context.auth_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl AccountApi for BlogClient {
    async fn initiate_email_change(&self) -> Result<(), RequestError> {
        self.post_empty("/auth/initiate-email-change").await
    }

    async fn initiate_password_change(&self) -> Result<(), RequestError> {
        self.post_empty("/auth/initiate-password-change").await
    }

    async fn update_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, RequestError> {
        let response = self
            .request(Method::PUT, "/users/profile")
            .json(request)
            .send()
            .await
            .map_err(RequestError::Network)?;
        read_json(check_status(response).await?).await
    }

    async fn upload_profile_image(
        &self,
        upload: &ImageUpload,
    ) -> Result<ProfileImageResponse, RequestError> {
        let response = self
            .request(Method::POST, "/users/profile/image")
            .query(&[
                ("filename", upload.filename.as_str()),
                ("mime_type", upload.mime_type.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, upload.mime_type.as_str())
            .body(upload.bytes.clone())
            .send()
            .await
            .map_err(RequestError::Network)?;
        read_json(check_status(response).await?).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
