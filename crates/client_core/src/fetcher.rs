//! Seams between list views and the backend.

use std::{fmt, marker::PhantomData};

use async_trait::async_trait;
use shared::protocol::ListPage;

use crate::{query::ListParams, resource::ListResource, transport::RequestError, BlogClient};

#[async_trait]
pub trait ResultFetcher: Send + Sync {
    type Item: Clone + Send + Sync;

    async fn fetch(&self, params: &ListParams) -> Result<ListPage<Self::Item>, RequestError>;
}

#[async_trait]
pub trait ItemMutator: Send + Sync {
    type Id: Copy + fmt::Display + Send + Sync;

    async fn delete(&self, id: Self::Id) -> Result<(), RequestError>;
}

/// Fetches and deletes items of resource `R` through a [`BlogClient`].
pub struct ResourceFetcher<R> {
    client: BlogClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ListResource> ResourceFetcher<R> {
    pub fn new(client: BlogClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &BlogClient {
        &self.client
    }
}

impl<R> Clone for ResourceFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R: ListResource> ResultFetcher for ResourceFetcher<R> {
    type Item = R::Item;

    async fn fetch(&self, params: &ListParams) -> Result<ListPage<R::Item>, RequestError> {
        self.client.list::<R>(params).await
    }
}

#[async_trait]
impl<R: ListResource> ItemMutator for ResourceFetcher<R> {
    type Id = R::Id;

    async fn delete(&self, id: R::Id) -> Result<(), RequestError> {
        self.client.delete::<R>(id).await
    }
}
