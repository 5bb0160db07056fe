//! Cryptographic operations for Postboard.
//!
//! - `hash`: API token minting and SHA-256 token hashing

pub mod hash;
