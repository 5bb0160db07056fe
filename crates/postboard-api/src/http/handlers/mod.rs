//! HTTP request handlers for the REST API.

pub mod contact;
pub mod post;
pub mod user;
