//! Shared domain types for Postboard.
//!
//! This crate contains the core domain types used across the Postboard
//! backend: Post, Comment, Vote, User, Contact, the listing request/page
//! types, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, chrono, thiserror.

pub mod comment;
pub mod config;
pub mod contact;
pub mod error;
pub mod listing;
pub mod post;
pub mod user;
pub mod vote;
