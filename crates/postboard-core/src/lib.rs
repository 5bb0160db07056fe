//! Listing query builder, business logic and repository trait definitions
//! for Postboard.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `postboard-types` -- never on
//! `postboard-infra` or any database/IO crate.

pub mod auth;
pub mod listing;
pub mod repository;
pub mod service;
