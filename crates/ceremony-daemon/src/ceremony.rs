//! Runs a complete in-process ceremony and reports the result.

use std::sync::Arc;

use anyhow::Context;
use ceremony_guardian::Guardian;
use ceremony_mediator::{CeremonyStage, KeyCeremonyMediator};
use ceremony_types::ElectionJointKey;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::info;

use crate::config::CeremonyConfig;
use crate::participant::{poll_until, run_guardian, GuardianOutcome};

/// Result of a finished ceremony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeremonyReport {
    pub ceremony_id: String,
    pub mediator_id: String,
    pub number_of_guardians: usize,
    pub quorum: usize,
    pub stage: CeremonyStage,
    pub joint_key: ElectionJointKey,
    pub challenges: usize,
    pub guardians: Vec<GuardianOutcome>,
}

/// Run every guardian against one mediator until the joint key is published.
///
/// Fails if any guardian fails or the whole ceremony exceeds the configured
/// timeout.
pub async fn run(config: &CeremonyConfig) -> anyhow::Result<CeremonyReport> {
    let details = config.details()?;
    let mediator = Arc::new(KeyCeremonyMediator::new(
        config.ceremony.mediator_id.clone(),
        details.clone(),
    ));
    let interval = config.poll_interval();

    let mut tasks = JoinSet::new();
    for i in 1..=details.number_of_guardians {
        let guardian = Guardian::new(format!("guardian-{i}"), i as u64, details.clone())?;
        tasks.spawn(run_guardian(guardian, Arc::clone(&mediator), interval));
    }

    let ceremony = async {
        let mut guardians = Vec::with_capacity(details.number_of_guardians);
        while let Some(joined) = tasks.join_next().await {
            guardians.push(joined??);
        }
        let joint_key = poll_until(interval, || mediator.publish_joint_key()).await;
        anyhow::Ok((guardians, joint_key))
    };

    let (mut guardians, joint_key) = tokio::time::timeout(config.timeout(), ceremony)
        .await
        .with_context(|| {
            format!(
                "ceremony {} did not complete within {}s (stage: {})",
                details.ceremony_id,
                config.runtime.timeout_secs,
                mediator.stage()
            )
        })??;
    guardians.sort_by_key(|outcome| outcome.sequence_order);

    info!(
        ceremony_id = %details.ceremony_id,
        joint_public_key = %joint_key.joint_public_key,
        "ceremony complete"
    );

    Ok(CeremonyReport {
        ceremony_id: details.ceremony_id.clone(),
        mediator_id: mediator.id().to_string(),
        number_of_guardians: details.number_of_guardians,
        quorum: details.quorum,
        stage: mediator.stage(),
        joint_key,
        challenges: mediator.challenge_count(),
        guardians,
    })
}
