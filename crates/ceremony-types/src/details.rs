//! Ceremony-wide parameters.

use serde::{Deserialize, Serialize};

use crate::{CeremonyError, Result};

/// Parameters fixed for the lifetime of one ceremony.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyDetails {
    pub ceremony_id: String,
    /// Number of guardians (`n`).
    pub number_of_guardians: usize,
    /// Guardians needed to later compensate for missing ones (`k` in k-of-n).
    pub quorum: usize,
}

impl CeremonyDetails {
    /// Validate and build ceremony details.
    ///
    /// # Errors
    ///
    /// - [`CeremonyError::InvalidDetails`] if there are no guardians
    /// - [`CeremonyError::InvalidDetails`] if the quorum is zero or exceeds the guardian count
    pub fn new(
        ceremony_id: impl Into<String>,
        number_of_guardians: usize,
        quorum: usize,
    ) -> Result<Self> {
        if number_of_guardians == 0 {
            return Err(CeremonyError::InvalidDetails(
                "at least one guardian is required".to_string(),
            ));
        }
        if quorum == 0 || quorum > number_of_guardians {
            return Err(CeremonyError::InvalidDetails(format!(
                "invalid quorum {quorum} for {number_of_guardians} guardians"
            )));
        }
        Ok(Self {
            ceremony_id: ceremony_id.into(),
            number_of_guardians,
            quorum,
        })
    }

    /// Backups (and verifications) expected once every guardian has sent one
    /// to every other guardian: `n·(n-1)`. Zero for an empty ceremony.
    pub fn expected_pairwise_count(&self) -> usize {
        self.number_of_guardians.saturating_mul(self.number_of_guardians.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_details() {
        let details = CeremonyDetails::new("election-2026", 5, 3).expect("details");
        assert_eq!(details.number_of_guardians, 5);
        assert_eq!(details.quorum, 3);
        assert_eq!(details.expected_pairwise_count(), 20);
    }

    #[test]
    fn test_single_guardian() {
        let details = CeremonyDetails::new("solo", 1, 1).expect("details");
        assert_eq!(details.expected_pairwise_count(), 0);
    }

    #[test]
    fn test_invalid_details() {
        assert!(CeremonyDetails::new("none", 0, 0).is_err());
        assert!(CeremonyDetails::new("zero-quorum", 3, 0).is_err());
        assert!(CeremonyDetails::new("big-quorum", 3, 4).is_err());
    }

    #[test]
    fn test_deserialized_empty_ceremony_counts_zero_pairs() {
        // Deserialization bypasses `new`, so zero guardians can still appear.
        let details: CeremonyDetails = serde_json::from_str(
            r#"{"ceremony_id":"empty","number_of_guardians":0,"quorum":0}"#,
        )
        .expect("parse");
        assert_eq!(details.expected_pairwise_count(), 0);
    }
}
