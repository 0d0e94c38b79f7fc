//! A guardian participating in a key ceremony.
//!
//! The guardian keeps its own secrets plus everything it has learned from
//! peers. It never talks to peers directly; every message passes through the
//! mediator.

use ceremony_types::{
    CeremonyDetails, ElectionPartialKeyBackup, ElectionPartialKeyChallenge,
    ElectionPartialKeyVerification, GuardianId, PublicKeySet,
};
use indexmap::IndexMap;

use crate::key_ceremony::{
    self, generate_auxiliary_key_pair, generate_election_key_pair, AuxiliaryKeyPair,
    ElectionKeyPair,
};
use crate::{GuardianError, Result};

/// Guardian state for one ceremony.
pub struct Guardian {
    pub id: GuardianId,
    pub sequence_order: u64,
    ceremony_details: CeremonyDetails,
    election_keys: ElectionKeyPair,
    auxiliary_keys: AuxiliaryKeyPair,
    /// Announced key sets by owner, own set included.
    guardian_public_keys: IndexMap<GuardianId, PublicKeySet>,
    /// Backups this guardian generated, by designated guardian.
    backups_to_share: IndexMap<GuardianId, ElectionPartialKeyBackup>,
    /// Backups addressed to this guardian, by owner.
    received_backups: IndexMap<GuardianId, ElectionPartialKeyBackup>,
}

impl Guardian {
    /// Create a guardian and generate its election and auxiliary keys.
    ///
    /// # Errors
    ///
    /// - [`GuardianError::InvalidSequenceOrder`] if `sequence_order` is 0
    pub fn new(
        id: impl Into<GuardianId>,
        sequence_order: u64,
        ceremony_details: CeremonyDetails,
    ) -> Result<Self> {
        let id = id.into();
        let election_keys =
            generate_election_key_pair(&id, sequence_order, ceremony_details.quorum)?;
        let auxiliary_keys = generate_auxiliary_key_pair(&id, sequence_order);

        let mut guardian = Self {
            id,
            sequence_order,
            ceremony_details,
            election_keys,
            auxiliary_keys,
            guardian_public_keys: IndexMap::new(),
            backups_to_share: IndexMap::new(),
            received_backups: IndexMap::new(),
        };
        guardian.save_guardian_public_keys(guardian.share_public_keys());
        Ok(guardian)
    }

    pub fn ceremony_details(&self) -> &CeremonyDetails {
        &self.ceremony_details
    }

    /// This guardian's announcement.
    pub fn share_public_keys(&self) -> PublicKeySet {
        PublicKeySet {
            election: self.election_keys.share(),
            auxiliary: self.auxiliary_keys.share(),
        }
    }

    /// Record a peer's announced keys. Re-saving overwrites.
    pub fn save_guardian_public_keys(&mut self, public_key_set: PublicKeySet) {
        self.guardian_public_keys
            .insert(public_key_set.owner_id().clone(), public_key_set);
    }

    pub fn guardian_public_keys(&self) -> impl Iterator<Item = &PublicKeySet> {
        self.guardian_public_keys.values()
    }

    pub fn all_guardian_keys_received(&self) -> bool {
        self.guardian_public_keys.len() == self.ceremony_details.number_of_guardians
    }

    /// Generate one backup for every other guardian whose keys are known.
    pub fn generate_election_partial_key_backups(&mut self) -> Result<()> {
        let mut backups = IndexMap::new();
        for (guardian_id, keys) in &self.guardian_public_keys {
            if *guardian_id == self.id {
                continue;
            }
            if keys.auxiliary.owner_id != *guardian_id {
                return Err(GuardianError::MismatchedKeySet(guardian_id.clone()));
            }
            let backup = key_ceremony::generate_election_partial_key_backup(
                &self.id,
                self.election_keys.polynomial(),
                &keys.auxiliary,
            )?;
            backups.insert(guardian_id.clone(), backup);
        }

        tracing::debug!(
            guardian = %self.id,
            backups = backups.len(),
            "generated partial key backups"
        );
        self.backups_to_share = backups;
        Ok(())
    }

    pub fn share_election_partial_key_backups(&self) -> Vec<ElectionPartialKeyBackup> {
        self.backups_to_share.values().cloned().collect()
    }

    /// Store a backup addressed to this guardian. Backups for anyone else are ignored.
    pub fn save_election_partial_key_backup(&mut self, backup: ElectionPartialKeyBackup) {
        if backup.designated_id != self.id {
            tracing::warn!(
                guardian = %self.id,
                designated = %backup.designated_id,
                "ignoring backup addressed to another guardian"
            );
            return;
        }
        self.received_backups.insert(backup.owner_id.clone(), backup);
    }

    pub fn all_election_partial_key_backups_received(&self) -> bool {
        self.received_backups.len() + 1 == self.ceremony_details.number_of_guardians
    }

    /// Verify every received backup.
    ///
    /// A backup passes only if it decrypts, matches its commitments, those
    /// commitments are the ones its owner announced, and it was evaluated at
    /// this guardian's sequence order.
    pub fn verify_election_partial_key_backups(&self) -> Vec<ElectionPartialKeyVerification> {
        self.received_backups
            .values()
            .map(|backup| {
                let mut verification = key_ceremony::verify_election_partial_key_backup(
                    &self.id,
                    backup,
                    self.auxiliary_keys.secret(),
                );
                let announced = self
                    .guardian_public_keys
                    .get(&backup.owner_id)
                    .map(|keys| &keys.election.coefficient_commitments);
                if announced != Some(&backup.coefficient_commitments)
                    || backup.designated_sequence_order != self.sequence_order
                {
                    verification.verified = false;
                }
                if !verification.verified {
                    tracing::warn!(
                        guardian = %self.id,
                        owner = %backup.owner_id,
                        "partial key backup failed verification"
                    );
                }
                verification
            })
            .collect()
    }

    /// Disclose the backup this guardian sent to `designated_id`.
    pub fn publish_election_backup_challenge(
        &self,
        designated_id: &str,
    ) -> Option<ElectionPartialKeyChallenge> {
        self.backups_to_share.get(designated_id).map(|backup| {
            key_ceremony::generate_election_partial_key_challenge(
                backup,
                self.election_keys.polynomial(),
            )
        })
    }
}
