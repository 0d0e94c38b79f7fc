//! Property tests for mediator invariants.
//!
//! - A guardian is never handed its own keys or backups.
//! - Self-addressed submissions never change what the mediator holds.
//! - Submission order and duplication never change completeness.

use ceremony_guardian::key_ceremony::{generate_auxiliary_key_pair, generate_election_key_pair};
use ceremony_mediator::{GuardianPair, KeyCeremonyMediator};
use ceremony_types::{
    CeremonyDetails, ElectionPartialKeyBackup, ElectionPartialKeyVerification, PublicKeySet,
};
use proptest::prelude::*;

fn guardian_id(i: usize) -> String {
    format!("guardian-{i}")
}

/// An announced mediator for `n` guardians.
fn announced_mediator(n: usize) -> KeyCeremonyMediator {
    let details = CeremonyDetails::new("properties", n, 1).expect("details");
    let mediator = KeyCeremonyMediator::new("mediator", details);
    for i in 1..=n {
        let id = guardian_id(i);
        let election = generate_election_key_pair(&id, i as u64, 1).expect("election keys");
        let auxiliary = generate_auxiliary_key_pair(&id, i as u64);
        mediator.announce(PublicKeySet {
            election: election.share(),
            auxiliary: auxiliary.share(),
        });
    }
    mediator
}

fn backup(owner: usize, designated: usize) -> ElectionPartialKeyBackup {
    ElectionPartialKeyBackup {
        owner_id: guardian_id(owner),
        designated_id: guardian_id(designated),
        designated_sequence_order: designated as u64,
        encrypted_value: vec![owner as u8, designated as u8],
        coefficient_commitments: Vec::new(),
    }
}

fn verification(owner: usize, designated: usize, verified: bool) -> ElectionPartialKeyVerification {
    ElectionPartialKeyVerification {
        owner_id: guardian_id(owner),
        designated_id: guardian_id(designated),
        verifier_id: guardian_id(designated),
        verified,
    }
}

/// Guardian count plus a list of (owner, designated) index pairs, self-pairs included.
fn arb_pairs() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..=5).prop_flat_map(|n| {
        let pair = (1..=n, 1..=n);
        (Just(n), prop::collection::vec(pair, 0..40))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// share_announced(g) is every announced guardian except g.
    #[test]
    fn share_announced_excludes_requester(n in 1usize..=5, pick in any::<prop::sample::Index>()) {
        let mediator = announced_mediator(n);
        let requester = guardian_id(pick.index(n) + 1);

        let shared = mediator.share_announced(Some(requester.as_str())).expect("announced");
        prop_assert_eq!(shared.len(), n - 1);
        prop_assert!(shared.iter().all(|set| *set.owner_id() != requester));
    }

    /// share_backups(g) only returns backups designated to g from someone else.
    #[test]
    fn share_backups_only_for_requester(
        (n, pairs) in arb_pairs(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mediator = announced_mediator(n);
        mediator.receive_backups(pairs.iter().map(|&(o, d)| backup(o, d)));
        let requester = guardian_id(pick.index(n) + 1);

        let shared = mediator.share_backups(Some(requester.as_str())).expect("round 1 complete");
        prop_assert!(shared
            .iter()
            .all(|b| b.designated_id == requester && b.owner_id != requester));
    }

    /// Adding self-pairs to a submission changes nothing.
    #[test]
    fn self_pairs_are_invisible((n, pairs) in arb_pairs()) {
        let with_self = announced_mediator(n);
        let without_self = announced_mediator(n);

        with_self.receive_backups(pairs.iter().map(|&(o, d)| backup(o, d)));
        without_self.receive_backups(
            pairs
                .iter()
                .filter(|(owner, designated)| owner != designated)
                .map(|&(owner, designated)| backup(owner, designated)),
        );

        let a = with_self.share_backups(None).expect("backups");
        let b = without_self.share_backups(None).expect("backups");
        prop_assert_eq!(a.len(), b.len());
        prop_assert!(a.iter().all(|backup| !GuardianPair::from(backup).is_self_pair()));
        prop_assert_eq!(with_self.all_backups_available(), without_self.all_backups_available());
    }

    /// Backups become available exactly when every ordered distinct pair has been seen.
    #[test]
    fn backups_available_iff_every_pair_seen((n, pairs) in arb_pairs()) {
        let mediator = announced_mediator(n);
        mediator.receive_backups(pairs.iter().map(|&(o, d)| backup(o, d)));

        let mut distinct: Vec<(usize, usize)> =
            pairs.iter().copied().filter(|(o, d)| o != d).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(mediator.all_backups_available(), distinct.len() == n * (n - 1));
    }

    /// A failure blocks the joint key regardless of arrival order.
    #[test]
    fn any_failure_blocks_joint_key(
        n in 2usize..=4,
        failing in any::<prop::sample::Index>(),
        seed in any::<u64>(),
    ) {
        let mediator = announced_mediator(n);
        let mut all_pairs = Vec::new();
        for owner in 1..=n {
            for designated in (1..=n).filter(|&d| d != owner) {
                all_pairs.push((owner, designated));
            }
        }
        mediator.receive_backups(all_pairs.iter().map(|&(o, d)| backup(o, d)));

        let failed = all_pairs[failing.index(all_pairs.len())];
        let mut verifications: Vec<_> = all_pairs
            .iter()
            .map(|&(o, d)| verification(o, d, (o, d) != failed))
            .collect();
        let len = verifications.len();
        verifications.rotate_left((seed as usize) % len);
        mediator.receive_backup_verifications(verifications);

        let state = mediator.get_verification_state();
        prop_assert!(state.all_sent);
        prop_assert!(!state.all_verified);
        let expected = vec![GuardianPair::new(guardian_id(failed.0), guardian_id(failed.1))];
        prop_assert_eq!(state.failed_verifications, expected);
        prop_assert!(mediator.publish_joint_key().is_none());
    }
}
