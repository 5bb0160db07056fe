//! API token minting and SHA-256 hashing.
//!
//! Implements the `TokenIssuer` trait from `postboard-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};
use uuid::Uuid;

use postboard_core::service::hash::TokenIssuer;

/// Prefix that makes Postboard tokens recognizable in logs and configs.
pub const TOKEN_PREFIX: &str = "pb_";

/// SHA-256 implementation of `TokenIssuer`.
///
/// Tokens are `pb_` followed by 64 hex characters of randomness (two v4 UUIDs).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256TokenIssuer;

impl Sha256TokenIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenIssuer for Sha256TokenIssuer {
    fn issue(&self) -> String {
        format!(
            "{TOKEN_PREFIX}{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        )
    }

    fn hash(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!("{:x}", digest)
    }
}
