//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod contact;
pub mod pool;
pub mod post;
pub mod user;
