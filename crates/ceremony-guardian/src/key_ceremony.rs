//! Key ceremony primitives.
//!
//! Everything here is a pure function of its arguments. The mediator relies on
//! two of them, [`combine_election_public_keys`] and
//! [`verify_election_partial_key_challenge`]; the rest are used by guardians.

use ceremony_crypto::blake3::{self, contexts};
use ceremony_crypto::ecies::{self, EciesCiphertext};
use ceremony_crypto::group::{ElementModQ, GroupElement};
use ceremony_crypto::polynomial::{verify_polynomial_coordinate, ElectionPolynomial};
use ceremony_crypto::x25519::TransportSecret;
use ceremony_types::{
    AuxiliaryPublicKey, ElectionJointKey, ElectionPartialKeyBackup, ElectionPartialKeyChallenge,
    ElectionPartialKeyVerification, ElectionPublicKey,
};

use crate::{GuardianError, Result};

/// A guardian's election secret polynomial.
#[derive(Clone)]
pub struct ElectionKeyPair {
    pub owner_id: String,
    pub sequence_order: u64,
    polynomial: ElectionPolynomial,
}

impl ElectionKeyPair {
    pub fn polynomial(&self) -> &ElectionPolynomial {
        &self.polynomial
    }

    /// The public half, suitable for announcement.
    pub fn share(&self) -> ElectionPublicKey {
        ElectionPublicKey {
            owner_id: self.owner_id.clone(),
            sequence_order: self.sequence_order,
            key: self.polynomial.public_key(),
            coefficient_commitments: self.polynomial.commitments().to_vec(),
        }
    }
}

/// A guardian's auxiliary (transport) key pair.
#[derive(Clone)]
pub struct AuxiliaryKeyPair {
    pub owner_id: String,
    pub sequence_order: u64,
    secret: TransportSecret,
}

impl AuxiliaryKeyPair {
    pub fn secret(&self) -> &TransportSecret {
        &self.secret
    }

    pub fn share(&self) -> AuxiliaryPublicKey {
        AuxiliaryPublicKey {
            owner_id: self.owner_id.clone(),
            sequence_order: self.sequence_order,
            key: self.secret.public_key(),
        }
    }
}

/// Generate an election key pair whose polynomial has `quorum` coefficients.
pub fn generate_election_key_pair(
    owner_id: &str,
    sequence_order: u64,
    quorum: usize,
) -> Result<ElectionKeyPair> {
    if sequence_order == 0 {
        return Err(GuardianError::InvalidSequenceOrder(sequence_order));
    }
    Ok(ElectionKeyPair {
        owner_id: owner_id.to_string(),
        sequence_order,
        polynomial: ElectionPolynomial::generate(quorum)?,
    })
}

pub fn generate_auxiliary_key_pair(owner_id: &str, sequence_order: u64) -> AuxiliaryKeyPair {
    AuxiliaryKeyPair {
        owner_id: owner_id.to_string(),
        sequence_order,
        secret: TransportSecret::random(),
    }
}

/// Evaluate the owner's polynomial at the designated guardian's sequence order
/// and encrypt the result to the designated guardian's auxiliary key.
pub fn generate_election_partial_key_backup(
    owner_id: &str,
    polynomial: &ElectionPolynomial,
    designated: &AuxiliaryPublicKey,
) -> Result<ElectionPartialKeyBackup> {
    let coordinate = polynomial.evaluate(designated.sequence_order);
    let aad = backup_aad(owner_id, &designated.owner_id);
    let ciphertext = ecies::encrypt(&designated.key, &coordinate.to_bytes(), &aad)?;

    Ok(ElectionPartialKeyBackup {
        owner_id: owner_id.to_string(),
        designated_id: designated.owner_id.clone(),
        designated_sequence_order: designated.sequence_order,
        encrypted_value: ciphertext.to_bytes(),
        coefficient_commitments: polynomial.commitments().to_vec(),
    })
}

/// Decrypt a backup addressed to `verifier_id` and check it against the
/// commitments it carries.
///
/// Undecryptable or malformed backups yield `verified = false`.
pub fn verify_election_partial_key_backup(
    verifier_id: &str,
    backup: &ElectionPartialKeyBackup,
    auxiliary_secret: &TransportSecret,
) -> ElectionPartialKeyVerification {
    let verified = match decrypt_backup(backup, auxiliary_secret) {
        Ok(coordinate) => verify_polynomial_coordinate(
            &coordinate,
            backup.designated_sequence_order,
            &backup.coefficient_commitments,
        ),
        Err(e) => {
            tracing::warn!(
                owner = %backup.owner_id,
                designated = %backup.designated_id,
                error = %e,
                "could not decrypt partial key backup"
            );
            false
        }
    };

    ElectionPartialKeyVerification {
        owner_id: backup.owner_id.clone(),
        designated_id: backup.designated_id.clone(),
        verifier_id: verifier_id.to_string(),
        verified,
    }
}

/// Disclose the plaintext coordinate of a backup so a third party can
/// adjudicate a disputed verification.
pub fn generate_election_partial_key_challenge(
    backup: &ElectionPartialKeyBackup,
    polynomial: &ElectionPolynomial,
) -> ElectionPartialKeyChallenge {
    ElectionPartialKeyChallenge {
        owner_id: backup.owner_id.clone(),
        designated_id: backup.designated_id.clone(),
        designated_sequence_order: backup.designated_sequence_order,
        value: polynomial.evaluate(backup.designated_sequence_order),
        coefficient_commitments: polynomial.commitments().to_vec(),
    }
}

/// Recompute a verification from a challenge alone.
pub fn verify_election_partial_key_challenge(
    verifier_id: &str,
    challenge: &ElectionPartialKeyChallenge,
) -> ElectionPartialKeyVerification {
    ElectionPartialKeyVerification {
        owner_id: challenge.owner_id.clone(),
        designated_id: challenge.designated_id.clone(),
        verifier_id: verifier_id.to_string(),
        verified: verify_polynomial_coordinate(
            &challenge.value,
            challenge.designated_sequence_order,
            &challenge.coefficient_commitments,
        ),
    }
}

/// Combine election public keys into the joint key, in the order given.
pub fn combine_election_public_keys<'a, I>(keys: I) -> ElectionJointKey
where
    I: IntoIterator<Item = &'a ElectionPublicKey>,
{
    let mut joint_public_key = GroupElement::identity();
    let mut fields: Vec<Vec<u8>> = Vec::new();
    for key in keys {
        joint_public_key = joint_public_key + key.key;
        fields.push(key.owner_id.as_bytes().to_vec());
        fields.extend(key.coefficient_commitments.iter().map(GroupElement::to_bytes));
    }

    let field_refs: Vec<&[u8]> = fields.iter().map(Vec::as_slice).collect();
    let commitment_hash = blake3::derive_key(
        contexts::COMMITMENT_HASH,
        &blake3::encode_multi_field(&field_refs),
    );

    ElectionJointKey {
        joint_public_key,
        commitment_hash,
    }
}

fn decrypt_backup(
    backup: &ElectionPartialKeyBackup,
    auxiliary_secret: &TransportSecret,
) -> ceremony_crypto::Result<ElementModQ> {
    let ciphertext = EciesCiphertext::from_bytes(&backup.encrypted_value)?;
    let aad = backup_aad(&backup.owner_id, &backup.designated_id);
    let plaintext = ecies::decrypt(auxiliary_secret, &ciphertext, &aad)?;
    ElementModQ::from_bytes(&plaintext)
}

fn backup_aad(owner_id: &str, designated_id: &str) -> Vec<u8> {
    blake3::encode_multi_field(&[owner_id.as_bytes(), designated_id.as_bytes()])
}
