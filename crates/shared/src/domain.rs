use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(PostId);
id_newtype!(CommentId);
id_newtype!(CategoryId);

/// Ordering applied by the backend to a user's post or comment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "publishDate:desc")]
    PublishDateDesc,
    #[serde(rename = "publishDate:asc")]
    PublishDateAsc,
    #[serde(rename = "likesCount:desc")]
    LikesCountDesc,
    #[serde(rename = "likesCount:asc")]
    LikesCountAsc,
    #[serde(rename = "repliesCount:desc")]
    RepliesCountDesc,
    #[serde(rename = "repliesCount:asc")]
    RepliesCountAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::PublishDateDesc,
        SortKey::PublishDateAsc,
        SortKey::LikesCountDesc,
        SortKey::LikesCountAsc,
        SortKey::RepliesCountDesc,
        SortKey::RepliesCountAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PublishDateDesc => "publishDate:desc",
            SortKey::PublishDateAsc => "publishDate:asc",
            SortKey::LikesCountDesc => "likesCount:desc",
            SortKey::LikesCountAsc => "likesCount:asc",
            SortKey::RepliesCountDesc => "repliesCount:desc",
            SortKey::RepliesCountAsc => "repliesCount:asc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| UnknownSortKey(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_parse_their_own_wire_values() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert_eq!(
            "likes".parse::<SortKey>(),
            Err(UnknownSortKey("likes".to_string()))
        );
    }

    #[test]
    fn sort_key_serializes_as_wire_value() {
        let json = serde_json::to_string(&SortKey::RepliesCountAsc).expect("serialize");
        assert_eq!(json, "\"repliesCount:asc\"");
        assert_eq!(SortKey::default(), SortKey::PublishDateDesc);
    }
}
