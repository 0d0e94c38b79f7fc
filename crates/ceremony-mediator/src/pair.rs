//! Ordered guardian pairs.

use std::fmt;

use ceremony_types::{
    ElectionPartialKeyBackup, ElectionPartialKeyChallenge, ElectionPartialKeyVerification,
    GuardianId,
};
use serde::{Deserialize, Serialize};

/// A directed relationship from `owner_id` to `designated_id`.
///
/// `(A, B)` and `(B, A)` are different pairs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuardianPair {
    pub owner_id: GuardianId,
    pub designated_id: GuardianId,
}

impl GuardianPair {
    pub fn new(owner_id: impl Into<GuardianId>, designated_id: impl Into<GuardianId>) -> Self {
        Self {
            owner_id: owner_id.into(),
            designated_id: designated_id.into(),
        }
    }

    /// True when a guardian would be sharing with itself.
    pub fn is_self_pair(&self) -> bool {
        self.owner_id == self.designated_id
    }
}

impl fmt::Display for GuardianPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.owner_id, self.designated_id)
    }
}

impl From<&ElectionPartialKeyBackup> for GuardianPair {
    fn from(backup: &ElectionPartialKeyBackup) -> Self {
        Self::new(backup.owner_id.clone(), backup.designated_id.clone())
    }
}

impl From<&ElectionPartialKeyVerification> for GuardianPair {
    fn from(verification: &ElectionPartialKeyVerification) -> Self {
        Self::new(verification.owner_id.clone(), verification.designated_id.clone())
    }
}

impl From<&ElectionPartialKeyChallenge> for GuardianPair {
    fn from(challenge: &ElectionPartialKeyChallenge) -> Self {
        Self::new(challenge.owner_id.clone(), challenge.designated_id.clone())
    }
}

/// Summary of Round 3, recomputed on every request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupVerificationState {
    /// Every expected verification has been received.
    pub all_sent: bool,
    /// `all_sent` and none of them failed.
    pub all_verified: bool,
    /// Pairs whose verification failed, in the order they were first received.
    pub failed_verifications: Vec<GuardianPair>,
}
