//! HTTP plumbing shared by every backend call.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::error::ErrorBody;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("backend returned {status}{}", describe_body(.body))]
    Status {
        status: StatusCode,
        body: Option<ErrorBody>,
    },
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("invalid response payload: {0}")]
    Decode(#[source] reqwest::Error),
}

fn describe_body(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .and_then(ErrorBody::best_message)
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl RequestError {
    pub fn status(status: StatusCode, body: Option<ErrorBody>) -> Self {
        Self::Status { status, body }
    }

    /// Message supplied by the backend, if the failure carried one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            RequestError::Status { body, .. } => body.as_ref().and_then(ErrorBody::best_message),
            RequestError::Network(_) | RequestError::Decode(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Network(err) | RequestError::Decode(err) => err.status(),
        }
    }
}

/// Passes successful responses through and turns everything else into
/// [`RequestError::Status`], keeping the backend error payload when it parses.
pub(crate) async fn check_status(response: Response) -> Result<Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text).ok(),
        Err(err) => {
            debug!(%status, error = %err, "failed to read error response body");
            None
        }
    };
    Err(RequestError::status(status, body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    response.json::<T>().await.map_err(RequestError::Decode)
}
