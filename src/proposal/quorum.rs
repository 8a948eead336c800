//! Quorum evaluation over a proposal's confirmation set

use crate::proposal::proposal::Proposal;
use chrono::Utc;
use thiserror::Error;

/// Errors raised while recording confirmations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuorumError {
    /// Re-confirmation is a hard error, not a no-op
    #[error("Signer has already confirmed this proposal")]
    AlreadyConfirmed,
}

/// Records confirmations against a fixed threshold.
///
/// Eligibility is checked upstream; this component only tracks which of the
/// eligible signers have confirmed and whether enough of them have.
#[derive(Clone, Copy, Debug)]
pub struct QuorumTracker {
    threshold: u8,
}

impl QuorumTracker {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Record a signer's confirmation on the proposal
    pub fn register_confirmation(
        &self,
        proposal: &mut Proposal,
        signer_pubkey: &str,
    ) -> Result<(), QuorumError> {
        if proposal.has_confirmed(signer_pubkey) {
            return Err(QuorumError::AlreadyConfirmed);
        }

        proposal.confirmed_by.push(signer_pubkey.to_string());
        proposal.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the proposal has collected enough confirmations
    pub fn has_quorum(&self, proposal: &Proposal) -> bool {
        proposal.confirmation_count() >= self.threshold as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::proposal::Ttl;

    fn open_proposal() -> Proposal {
        Proposal::new(&hex::encode([9u8; 32]), "signer-0", Ttl::Relative(10), 50, 1)
    }

    #[test]
    fn test_register_and_quorum() {
        let tracker = QuorumTracker::new(2);
        let mut proposal = open_proposal();

        tracker.register_confirmation(&mut proposal, "signer-0").unwrap();
        assert!(!tracker.has_quorum(&proposal));

        tracker.register_confirmation(&mut proposal, "signer-1").unwrap();
        assert!(tracker.has_quorum(&proposal));
    }

    #[test]
    fn test_reconfirmation_is_hard_error() {
        let tracker = QuorumTracker::new(2);
        let mut proposal = open_proposal();

        tracker.register_confirmation(&mut proposal, "signer-0").unwrap();
        let result = tracker.register_confirmation(&mut proposal, "signer-0");

        assert_eq!(result, Err(QuorumError::AlreadyConfirmed));
        assert_eq!(proposal.confirmation_count(), 1);
    }

    #[test]
    fn test_quorum_across_thresholds() {
        let mut proposal = open_proposal();
        for i in 0..3 {
            QuorumTracker::new(3)
                .register_confirmation(&mut proposal, &format!("signer-{}", i))
                .unwrap();
        }

        for threshold in 1..=3u8 {
            assert!(QuorumTracker::new(threshold).has_quorum(&proposal));
        }
        assert!(!QuorumTracker::new(4).has_quorum(&proposal));
    }

    #[test]
    fn test_confirmation_order_is_preserved() {
        let tracker = QuorumTracker::new(3);
        let mut proposal = open_proposal();

        for signer in ["b", "a", "c"] {
            tracker.register_confirmation(&mut proposal, signer).unwrap();
        }
        assert_eq!(proposal.confirmed_by, vec!["b", "a", "c"]);
    }
}
