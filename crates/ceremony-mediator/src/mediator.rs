//! Key ceremony mediator.
//!
//! All state sits behind one mutex, so every public operation is atomic with
//! respect to every other. Guardians may call in from any number of threads.
//!
//! Receives are idempotent per pair: resubmitting overwrites in place and
//! never double counts. Submissions naming a guardian that never announced,
//! or pairing a guardian with itself, are dropped so that "exactly N·(N−1)
//! entries" always means "every ordered pair of distinct guardians".

use std::fmt;

use ceremony_guardian::{combine_election_public_keys, verify_election_partial_key_challenge};
use ceremony_types::{
    AuxiliaryPublicKey, CeremonyDetails, ElectionJointKey, ElectionPartialKeyBackup,
    ElectionPartialKeyChallenge, ElectionPartialKeyVerification, ElectionPublicKey, GuardianId,
    MediatorId, PublicKeySet,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::pair::{BackupVerificationState, GuardianPair};

/// Where the ceremony stands, derived from the stored state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CeremonyStage {
    /// Round 1: collecting key announcements.
    Announcing,
    /// Round 2: collecting partial key backups.
    BackupsPending,
    /// Round 3: collecting backup verifications.
    VerificationsPending,
    /// Every verification is in but at least one failed.
    ChallengesPending,
    /// Every backup is verified; the joint key can be published.
    Verified,
}

impl fmt::Display for CeremonyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CeremonyStage::Announcing => write!(f, "announcing"),
            CeremonyStage::BackupsPending => write!(f, "backups_pending"),
            CeremonyStage::VerificationsPending => write!(f, "verifications_pending"),
            CeremonyStage::ChallengesPending => write!(f, "challenges_pending"),
            CeremonyStage::Verified => write!(f, "verified"),
        }
    }
}

fn progress(count: usize, expected: usize) -> String {
    format!("{count}/{expected}")
}

/// Everything the mediator has collected for one ceremony.
struct CeremonyState {
    details: CeremonyDetails,
    auxiliary_public_keys: IndexMap<GuardianId, AuxiliaryPublicKey>,
    election_public_keys: IndexMap<GuardianId, ElectionPublicKey>,
    backups: IndexMap<GuardianPair, ElectionPartialKeyBackup>,
    verifications: IndexMap<GuardianPair, ElectionPartialKeyVerification>,
    challenges: IndexMap<GuardianPair, ElectionPartialKeyChallenge>,
}

impl CeremonyState {
    fn new(details: CeremonyDetails) -> Self {
        Self {
            details,
            auxiliary_public_keys: IndexMap::new(),
            election_public_keys: IndexMap::new(),
            backups: IndexMap::new(),
            verifications: IndexMap::new(),
            challenges: IndexMap::new(),
        }
    }

    fn all_guardians_announced(&self) -> bool {
        let n = self.details.number_of_guardians;
        self.election_public_keys.len() == n
            && self.auxiliary_public_keys.len() == n
            && self
                .election_public_keys
                .keys()
                .all(|id| self.auxiliary_public_keys.contains_key(id))
    }

    fn all_backups_available(&self) -> bool {
        self.all_guardians_announced()
            && self.backups.len() == self.details.expected_pairwise_count()
    }

    fn all_verifications_received(&self) -> bool {
        self.all_backups_available()
            && self.verifications.len() == self.details.expected_pairwise_count()
    }

    fn verification_state(&self) -> BackupVerificationState {
        if !self.all_verifications_received() {
            return BackupVerificationState::default();
        }
        let failed_verifications: Vec<GuardianPair> = self
            .verifications
            .iter()
            .filter(|(_, verification)| !verification.verified)
            .map(|(pair, _)| pair.clone())
            .collect();
        BackupVerificationState {
            all_sent: true,
            all_verified: failed_verifications.is_empty(),
            failed_verifications,
        }
    }

    fn is_announced(&self, guardian_id: &str) -> bool {
        self.election_public_keys.contains_key(guardian_id)
    }

    /// Whether a pair may be stored. Logs the reason when it may not.
    fn accepts(&self, pair: &GuardianPair, kind: &str) -> bool {
        if pair.is_self_pair() {
            tracing::warn!(
                ceremony_id = %self.details.ceremony_id,
                %pair,
                kind,
                "dropping self-addressed submission"
            );
            return false;
        }
        if !self.is_announced(&pair.owner_id) || !self.is_announced(&pair.designated_id) {
            tracing::warn!(
                ceremony_id = %self.details.ceremony_id,
                %pair,
                kind,
                "dropping submission for unannounced guardian"
            );
            return false;
        }
        true
    }

    fn store_verification(&mut self, verification: ElectionPartialKeyVerification) -> bool {
        let pair = GuardianPair::from(&verification);
        if !self.accepts(&pair, "verification") {
            return false;
        }
        self.verifications.insert(pair, verification);
        true
    }

    fn stage(&self) -> CeremonyStage {
        if !self.all_guardians_announced() {
            CeremonyStage::Announcing
        } else if !self.all_backups_available() {
            CeremonyStage::BackupsPending
        } else if !self.all_verifications_received() {
            CeremonyStage::VerificationsPending
        } else if !self.verification_state().all_verified {
            CeremonyStage::ChallengesPending
        } else {
            CeremonyStage::Verified
        }
    }
}

/// Relays key ceremony messages between guardians and gates each round.
pub struct KeyCeremonyMediator {
    id: MediatorId,
    state: Mutex<CeremonyState>,
}

impl KeyCeremonyMediator {
    /// Create a mediator with empty state.
    pub fn new(id: impl Into<MediatorId>, details: CeremonyDetails) -> Self {
        let id = id.into();
        tracing::info!(
            mediator = %id,
            ceremony_id = %details.ceremony_id,
            guardians = details.number_of_guardians,
            quorum = details.quorum,
            "starting key ceremony"
        );
        Self {
            id,
            state: Mutex::new(CeremonyState::new(details)),
        }
    }

    /// Identifier stamped on verifications this mediator produces.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ceremony_details(&self) -> CeremonyDetails {
        self.state.lock().details.clone()
    }

    pub fn stage(&self) -> CeremonyStage {
        self.state.lock().stage()
    }

    /// Record a guardian's keys. Each key is stored under its own declared
    /// owner; re-announcing overwrites.
    pub fn announce(&self, public_key_set: PublicKeySet) {
        let mut state = self.state.lock();
        let was_complete = state.all_guardians_announced();

        let PublicKeySet { election, auxiliary } = public_key_set;
        let guardian = election.owner_id.clone();
        state
            .auxiliary_public_keys
            .insert(auxiliary.owner_id.clone(), auxiliary);
        state.election_public_keys.insert(election.owner_id.clone(), election);

        tracing::debug!(
            ceremony_id = %state.details.ceremony_id,
            %guardian,
            progress = progress(
                state.election_public_keys.len(),
                state.details.number_of_guardians
            ),
            "received announcement"
        );

        if !was_complete && state.all_guardians_announced() {
            tracing::info!(
                ceremony_id = %state.details.ceremony_id,
                "all guardians announced"
            );
        }
    }

    pub fn all_guardians_announced(&self) -> bool {
        self.state.lock().all_guardians_announced()
    }

    /// Every announced key set, minus the requester's own.
    ///
    /// `None` until every guardian has announced.
    pub fn share_announced(
        &self,
        requesting_guardian_id: Option<&str>,
    ) -> Option<Vec<PublicKeySet>> {
        let state = self.state.lock();
        if !state.all_guardians_announced() {
            return None;
        }
        let sets = state
            .election_public_keys
            .iter()
            .filter(|(guardian_id, _)| Some(guardian_id.as_str()) != requesting_guardian_id)
            .filter_map(|(guardian_id, election)| {
                state
                    .auxiliary_public_keys
                    .get(guardian_id)
                    .map(|auxiliary| PublicKeySet {
                        election: election.clone(),
                        auxiliary: auxiliary.clone(),
                    })
            })
            .collect();
        Some(sets)
    }

    /// Store partial key backups. Ignored entirely before Round 1 completes.
    pub fn receive_backups(&self, backups: impl IntoIterator<Item = ElectionPartialKeyBackup>) {
        let mut state = self.state.lock();
        if !state.all_guardians_announced() {
            tracing::debug!(
                ceremony_id = %state.details.ceremony_id,
                "ignoring backups before all guardians announced"
            );
            return;
        }
        let was_complete = state.all_backups_available();

        for backup in backups {
            let pair = GuardianPair::from(&backup);
            if !state.accepts(&pair, "backup") {
                continue;
            }
            state.backups.insert(pair.clone(), backup);
            tracing::debug!(
                ceremony_id = %state.details.ceremony_id,
                %pair,
                progress = progress(state.backups.len(), state.details.expected_pairwise_count()),
                "received partial key backup"
            );
        }

        if !was_complete && state.all_backups_available() {
            tracing::info!(
                ceremony_id = %state.details.ceremony_id,
                "all partial key backups received"
            );
        }
    }

    pub fn all_backups_available(&self) -> bool {
        self.state.lock().all_backups_available()
    }

    /// Backups addressed to the requester, or every backup when `None`.
    ///
    /// `None` until Round 1 completes. A guardian whose backups are not all
    /// in yet receives the ones present; callers should wait for
    /// [`Self::all_backups_available`] first.
    pub fn share_backups(
        &self,
        requesting_guardian_id: Option<&str>,
    ) -> Option<Vec<ElectionPartialKeyBackup>> {
        let state = self.state.lock();
        if !state.all_guardians_announced() {
            return None;
        }
        let backups = match requesting_guardian_id {
            None => state.backups.values().cloned().collect(),
            Some(designated_id) => state
                .election_public_keys
                .keys()
                .filter(|owner_id| owner_id.as_str() != designated_id)
                .filter_map(|owner_id| {
                    state
                        .backups
                        .get(&GuardianPair::new(owner_id.clone(), designated_id))
                        .cloned()
                })
                .collect(),
        };
        Some(backups)
    }

    /// Store backup verifications. Ignored entirely until every backup is in.
    pub fn receive_backup_verifications(
        &self,
        verifications: impl IntoIterator<Item = ElectionPartialKeyVerification>,
    ) {
        let mut state = self.state.lock();
        if !state.all_backups_available() {
            tracing::debug!(
                ceremony_id = %state.details.ceremony_id,
                "ignoring verifications before all backups received"
            );
            return;
        }
        let was_complete = state.all_verifications_received();

        for verification in verifications {
            let pair = GuardianPair::from(&verification);
            let verified = verification.verified;
            if !state.store_verification(verification) {
                continue;
            }
            tracing::debug!(
                ceremony_id = %state.details.ceremony_id,
                %pair,
                verified,
                progress = progress(
                    state.verifications.len(),
                    state.details.expected_pairwise_count()
                ),
                "received backup verification"
            );
        }

        if !was_complete && state.all_verifications_received() {
            let summary = state.verification_state();
            tracing::info!(
                ceremony_id = %state.details.ceremony_id,
                failed = summary.failed_verifications.len(),
                "all backup verifications received"
            );
        }
    }

    /// Round 3 summary. Empty until every backup and verification is in.
    pub fn get_verification_state(&self) -> BackupVerificationState {
        self.state.lock().verification_state()
    }

    pub fn all_backups_verified(&self) -> bool {
        self.state.lock().verification_state().all_verified
    }

    /// Adjudicate a disputed backup.
    ///
    /// The challenge is recorded. A challenge that verifies replaces the
    /// stored verification for its pair; one that fails leaves it untouched.
    /// A challenge is judged against what was announced in Round 1: the
    /// owner's commitments and the designated guardian's sequence order, not
    /// the ones it carries.
    pub fn verify_challenge(
        &self,
        challenge: ElectionPartialKeyChallenge,
    ) -> ElectionPartialKeyVerification {
        let mut verification = verify_election_partial_key_challenge(&self.id, &challenge);
        let pair = GuardianPair::from(&challenge);

        let mut state = self.state.lock();
        let announced_commitments = state
            .election_public_keys
            .get(&challenge.owner_id)
            .map(|key| &key.coefficient_commitments);
        let announced_sequence_order = state
            .election_public_keys
            .get(&challenge.designated_id)
            .map(|key| key.sequence_order);
        if announced_commitments != Some(&challenge.coefficient_commitments)
            || announced_sequence_order != Some(challenge.designated_sequence_order)
        {
            verification.verified = false;
        }

        if state.accepts(&pair, "challenge") {
            state.challenges.insert(pair.clone(), challenge);
        }

        if verification.verified {
            if state.store_verification(verification.clone()) {
                tracing::info!(
                    ceremony_id = %state.details.ceremony_id,
                    %pair,
                    "challenge upheld backup"
                );
            }
        } else {
            tracing::warn!(
                ceremony_id = %state.details.ceremony_id,
                %pair,
                "challenge failed verification"
            );
        }

        verification
    }

    /// Number of challenges recorded so far.
    pub fn challenge_count(&self) -> usize {
        self.state.lock().challenges.len()
    }

    /// The joint election key. `None` until every backup is verified.
    pub fn publish_joint_key(&self) -> Option<ElectionJointKey> {
        let state = self.state.lock();
        if !state.verification_state().all_verified {
            return None;
        }
        let joint_key = combine_election_public_keys(state.election_public_keys.values());
        tracing::info!(
            ceremony_id = %state.details.ceremony_id,
            joint_public_key = %joint_key.joint_public_key,
            "published joint key"
        );
        Some(joint_key)
    }

    /// Discard everything and start over with new details.
    pub fn reset(&self, details: CeremonyDetails) {
        let mut state = self.state.lock();
        tracing::info!(
            previous = %state.details.ceremony_id,
            ceremony_id = %details.ceremony_id,
            guardians = details.number_of_guardians,
            quorum = details.quorum,
            "resetting key ceremony"
        );
        *state = CeremonyState::new(details);
    }
}
