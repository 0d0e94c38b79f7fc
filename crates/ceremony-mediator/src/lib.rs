//! # ceremony-mediator
//!
//! Coordination of the guardian key ceremony.
//!
//! The [`KeyCeremonyMediator`] relays messages between guardians and gates
//! each round behind completeness of the previous one:
//!
//! 1. **Announce**: every guardian publishes its election and auxiliary keys.
//! 2. **Backups**: every guardian sends an encrypted share to every other guardian.
//! 3. **Verifications**: every guardian reports whether each share it received checks out.
//! 4. **Challenges** (optional): an owner discloses a disputed share so the
//!    mediator can adjudicate without trusting the accuser.
//!
//! Once every backup is verified the mediator publishes the joint key.
//!
//! Operations attempted too early are not errors: queries return `None` (or
//! an empty state) and receives are silently ignored. Callers poll.
//!
//! ## Modules
//!
//! - [`mediator`] — The mediator and its round gating
//! - [`pair`] — Ordered guardian pairs and the verification summary

pub mod mediator;
pub mod pair;

pub use mediator::{CeremonyStage, KeyCeremonyMediator};
pub use pair::{BackupVerificationState, GuardianPair};
