//! Wire types shared between the blog backend contract and its clients.

pub mod domain;
pub mod error;
pub mod protocol;
