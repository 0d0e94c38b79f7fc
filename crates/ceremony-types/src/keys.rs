//! Round 1 announcements and the final joint key.

use ceremony_crypto::group::GroupElement;
use ceremony_crypto::x25519::TransportPublicKey;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::GuardianId;

/// A guardian's transport key, used by peers to encrypt backups to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryPublicKey {
    pub owner_id: GuardianId,
    /// Unique 1-based position of the guardian; the x-coordinate of its share.
    pub sequence_order: u64,
    pub key: TransportPublicKey,
}

/// A guardian's election public key and its polynomial commitments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionPublicKey {
    pub owner_id: GuardianId,
    pub sequence_order: u64,
    /// Equal to `coefficient_commitments[0]`.
    pub key: GroupElement,
    pub coefficient_commitments: Vec<GroupElement>,
}

/// Both public keys of one guardian, announced together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeySet {
    pub election: ElectionPublicKey,
    pub auxiliary: AuxiliaryPublicKey,
}

impl PublicKeySet {
    /// The owner as declared by the election key.
    pub fn owner_id(&self) -> &GuardianId {
        &self.election.owner_id
    }
}

/// The combined public key every ballot is encrypted to.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionJointKey {
    pub joint_public_key: GroupElement,
    /// Hash over every guardian's commitments, in combination order.
    #[serde_as(as = "serde_with::hex::Hex")]
    pub commitment_hash: [u8; 32],
}
