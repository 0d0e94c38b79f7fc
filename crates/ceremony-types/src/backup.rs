//! Pairwise messages: backups, verifications and challenges.
//!
//! Every message here is directed: `owner_id` is the guardian whose secret is
//! being shared, `designated_id` the guardian the share is addressed to.

use ceremony_crypto::group::{ElementModQ, GroupElement};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::GuardianId;

/// The owner's polynomial evaluated at the designated guardian's sequence
/// order, encrypted to the designated guardian's auxiliary key.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionPartialKeyBackup {
    pub owner_id: GuardianId,
    pub designated_id: GuardianId,
    pub designated_sequence_order: u64,
    /// ECIES ciphertext (`eph_pk || ciphertext || tag`).
    #[serde_as(as = "serde_with::hex::Hex")]
    pub encrypted_value: Vec<u8>,
    pub coefficient_commitments: Vec<GroupElement>,
}

/// The outcome of checking one backup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionPartialKeyVerification {
    pub owner_id: GuardianId,
    pub designated_id: GuardianId,
    /// The designated guardian, or the mediator when resolving a challenge.
    pub verifier_id: String,
    pub verified: bool,
}

/// The owner's plaintext disclosure of a disputed backup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionPartialKeyChallenge {
    pub owner_id: GuardianId,
    pub designated_id: GuardianId,
    pub designated_sequence_order: u64,
    pub value: ElementModQ,
    pub coefficient_commitments: Vec<GroupElement>,
}
