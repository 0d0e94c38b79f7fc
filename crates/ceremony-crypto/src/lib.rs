//! # ceremony-crypto
//!
//! Cryptographic primitives used by the guardian key ceremony.
//!
//! The suite is fixed: election keys live in the BLS12-381 G1 group, partial
//! key backups are encrypted with X25519 + ChaCha20-Poly1305 ECIES, and all
//! hashing is domain-separated BLAKE3.
//!
//! ## Modules
//!
//! - [`group`] — Scalars ([`group::ElementModQ`]) and group elements ([`group::GroupElement`])
//! - [`polynomial`] — Secret sharing polynomials and Feldman coordinate checks
//! - [`blake3`] — Domain-separated BLAKE3 hashing
//! - [`x25519`] — Auxiliary (transport) key pairs
//! - [`ecies`] — ECIES encrypt/decrypt for partial key backups

pub mod blake3;
pub mod ecies;
pub mod group;
pub mod polynomial;
pub mod x25519;

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// AEAD decryption failed (authentication tag mismatch).
    #[error("AEAD decryption failed")]
    AeadDecryption,

    /// ECIES encryption/decryption failed.
    #[error("ECIES error: {0}")]
    Ecies(String),

    /// Bytes did not decode to a valid scalar or group element.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
