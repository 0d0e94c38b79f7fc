//! # ceremony-guardian
//!
//! The guardian side of the key ceremony and the pure functions the mediator
//! delegates to.
//!
//! ## Modules
//!
//! - [`key_ceremony`] — Key generation, backups, challenges, key combination
//! - [`guardian`] — A stateful guardian participating in one ceremony

pub mod guardian;
pub mod key_ceremony;

pub use guardian::Guardian;
pub use key_ceremony::{combine_election_public_keys, verify_election_partial_key_challenge};

use ceremony_crypto::CryptoError;

/// Error types for guardian operations.
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    /// Sequence orders start at 1; 0 would disclose the secret itself.
    #[error("invalid sequence order {0}")]
    InvalidSequenceOrder(u64),

    /// A peer's key set carries an auxiliary key owned by someone else.
    #[error("key set for guardian {0} carries a foreign auxiliary key")]
    MismatchedKeySet(String),

    /// Underlying cryptographic failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Convenience result type for guardian operations.
pub type Result<T> = std::result::Result<T, GuardianError>;
