//! Item kinds that can be listed and deleted through a list view.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{CommentId, PostId},
    protocol::{CommentListResponse, CommentSummary, ListPage, PostListResponse, PostSummary},
};

pub trait ListResource: Send + Sync + 'static {
    type Id: Copy + fmt::Display + fmt::Debug + Send + Sync;
    type Item: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync;
    type Envelope: DeserializeOwned + Into<ListPage<Self::Item>> + Send;

    /// Short name used in logs.
    const NAME: &'static str;
    const LIST_PATH: &'static str;

    fn item_path(id: Self::Id) -> String;
}

/// The signed-in user's posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posts;

impl ListResource for Posts {
    type Id = PostId;
    type Item = PostSummary;
    type Envelope = PostListResponse;

    const NAME: &'static str = "posts";
    const LIST_PATH: &'static str = "/posts/user/posts";

    fn item_path(id: PostId) -> String {
        format!("/posts/{id}")
    }
}

/// The signed-in user's comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comments;

impl ListResource for Comments {
    type Id = CommentId;
    type Item = CommentSummary;
    type Envelope = CommentListResponse;

    const NAME: &'static str = "comments";
    const LIST_PATH: &'static str = "/comments/user/comments";

    fn item_path(id: CommentId) -> String {
        format!("/comments/{id}")
    }
}
