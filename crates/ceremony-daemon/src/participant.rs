//! One guardian's side of the ceremony, driven against a shared mediator.

use std::sync::Arc;
use std::time::Duration;

use ceremony_guardian::Guardian;
use ceremony_mediator::KeyCeremonyMediator;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a guardian did during the ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianOutcome {
    pub guardian_id: String,
    pub sequence_order: u64,
    pub backups_sent: usize,
    pub backups_received: usize,
    pub verifications_failed: usize,
    pub challenges_issued: usize,
    pub challenges_upheld: usize,
}

/// Call `check` every `interval` until it yields a value.
pub async fn poll_until<T>(interval: Duration, mut check: impl FnMut() -> Option<T>) -> T {
    loop {
        if let Some(value) = check() {
            return value;
        }
        tokio::time::sleep(interval).await;
    }
}

/// Run a guardian through every round.
///
/// Returns once the guardian has answered any accusations against its own
/// backups. The caller decides how long to wait.
pub async fn run_guardian(
    mut guardian: Guardian,
    mediator: Arc<KeyCeremonyMediator>,
    interval: Duration,
) -> anyhow::Result<GuardianOutcome> {
    let id = guardian.id.clone();

    // Round 1
    mediator.announce(guardian.share_public_keys());
    let peers = poll_until(interval, || mediator.share_announced(Some(id.as_str()))).await;
    for peer in peers {
        guardian.save_guardian_public_keys(peer);
    }
    debug!(guardian = %id, "received all guardian keys");

    // Round 2
    guardian.generate_election_partial_key_backups()?;
    let backups = guardian.share_election_partial_key_backups();
    let backups_sent = backups.len();
    mediator.receive_backups(backups);

    poll_until(interval, || mediator.all_backups_available().then_some(())).await;
    let received = mediator.share_backups(Some(id.as_str())).unwrap_or_default();
    let backups_received = received.len();
    for backup in received {
        guardian.save_election_partial_key_backup(backup);
    }

    // Round 3
    let verifications = guardian.verify_election_partial_key_backups();
    let verifications_failed = verifications.iter().filter(|v| !v.verified).count();
    mediator.receive_backup_verifications(verifications);

    let state = poll_until(interval, || {
        let state = mediator.get_verification_state();
        state.all_sent.then_some(state)
    })
    .await;

    // Answer accusations against this guardian's backups.
    let mut challenges_issued = 0;
    let mut challenges_upheld = 0;
    for pair in state.failed_verifications.iter().filter(|pair| pair.owner_id == id) {
        let Some(challenge) = guardian.publish_election_backup_challenge(&pair.designated_id) else {
            continue;
        };
        challenges_issued += 1;
        if mediator.verify_challenge(challenge).verified {
            challenges_upheld += 1;
        }
    }

    info!(
        guardian = %id,
        backups_sent,
        backups_received,
        verifications_failed,
        challenges_issued,
        "guardian finished"
    );

    Ok(GuardianOutcome {
        guardian_id: id,
        sequence_order: guardian.sequence_order,
        backups_sent,
        backups_received,
        verifications_failed,
        challenges_issued,
        challenges_upheld,
    })
}
