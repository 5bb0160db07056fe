//! Infrastructure layer for Postboard.
//!
//! Contains implementations of the repository traits defined in `postboard-core`:
//! SQLite storage, token hashing, and the config file loader.

pub mod config;
pub mod crypto;
pub mod sqlite;
