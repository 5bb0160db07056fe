//! TokenIssuer trait for API token generation and hashing.
//!
//! Defined in postboard-core so services can mint and verify tokens without
//! coupling to a specific hashing algorithm. The `Sha256TokenIssuer` adapter
//! lives in postboard-infra.

/// Abstraction over API token minting and hashing.
///
/// Only the hash of a token is ever persisted; the plaintext is shown to the
/// user once at creation time.
pub trait TokenIssuer: Send + Sync {
    /// Mint a fresh random plaintext token.
    fn issue(&self) -> String;

    /// Compute a hex-encoded hash of the given token.
    fn hash(&self, token: &str) -> String;
}
