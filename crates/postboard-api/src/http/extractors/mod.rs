//! Request extractors: caller identity and listing query parameters.

pub mod auth;
pub mod query;
