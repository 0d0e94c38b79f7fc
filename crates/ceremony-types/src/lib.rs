//! # ceremony-types
//!
//! Messages exchanged between guardians and the key ceremony mediator.
//!
//! ## Modules
//!
//! - [`details`] — Ceremony-wide parameters
//! - [`keys`] — Round 1 announcements and the final joint key
//! - [`backup`] — Round 2 backups, Round 3 verifications, Round 4 challenges

pub mod backup;
pub mod details;
pub mod keys;

pub use backup::{
    ElectionPartialKeyBackup, ElectionPartialKeyChallenge, ElectionPartialKeyVerification,
};
pub use details::CeremonyDetails;
pub use keys::{AuxiliaryPublicKey, ElectionJointKey, ElectionPublicKey, PublicKeySet};

/// Identifier of a guardian (trustee).
pub type GuardianId = String;

/// Identifier of a key ceremony mediator.
pub type MediatorId = String;

/// Error types for ceremony parameters.
#[derive(Debug, thiserror::Error)]
pub enum CeremonyError {
    /// The ceremony parameters are inconsistent.
    #[error("invalid ceremony details: {0}")]
    InvalidDetails(String),
}

pub type Result<T> = std::result::Result<T, CeremonyError>;
