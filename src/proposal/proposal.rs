//! Pending authorization proposal
//!
//! A proposal asks the signer set to approve one specific transaction hash.
//! Its validity window is fixed at creation; once it leaves the `Open` state
//! it never changes again.

use crate::crypto::sha256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes of the truncated hash used as a proposal identifier
const PROPOSAL_ID_BYTES: usize = 16;

/// Validity window of a proposal, as supplied to the propose entry point.
///
/// Both forms normalize to an absolute expiry height at creation time, so
/// later checks never depend on when they happen to run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Ttl {
    /// Number of blocks the proposal stays valid after creation
    Relative(u64),
    /// Absolute chain height at which the proposal expires
    Fixed(u64),
}

impl Ttl {
    /// Normalize to the absolute height at which the proposal expires
    pub fn expiry_height(&self, created_at_height: u64) -> u64 {
        match self {
            Ttl::Relative(delta) => created_at_height.saturating_add(*delta),
            Ttl::Fixed(height) => *height,
        }
    }
}

/// Lifecycle state of a proposal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Accepting confirmations
    Open,
    /// Quorum reached and the gated transaction was permitted to execute
    Authorized,
    /// Validity window elapsed before authorization
    Expired,
}

/// Identifier of a proposal, derived from its contents at creation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProposalId(String);

impl ProposalId {
    /// Wrap an identifier previously printed by the engine
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pending request to authorize one transaction against the account
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Proposal {
    /// Unique proposal identifier
    pub id: ProposalId,
    /// Hash of the transaction being authorized (hex, 32 bytes)
    pub tx_hash: String,
    /// Public key of the signer that created the proposal
    pub proposer: String,
    /// Chain height at creation
    pub created_at_height: u64,
    /// Absolute chain height at which the proposal expires
    pub expires_at_height: u64,
    /// Signers that have confirmed, in confirmation order
    pub confirmed_by: Vec<String>,
    /// Current lifecycle state
    pub status: ProposalStatus,
    /// Wall-clock creation timestamp
    pub created_at: DateTime<Utc>,
    /// When the record last changed
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Create a new open proposal with its window normalized to an absolute
    /// height. No confirmations are recorded yet; the proposer's own
    /// confirmation is registered by the state machine.
    pub fn new(tx_hash: &str, proposer: &str, ttl: Ttl, current_height: u64, nonce: u64) -> Self {
        let now = Utc::now();

        // Identifier binds the transaction hash to the sequence value it was
        // proposed under, so a re-proposal after resolution gets a fresh id.
        let id_data = format!("{}:{}:{}", tx_hash, nonce, proposer);
        let id = ProposalId(hex::encode(
            &sha256(id_data.as_bytes())[..PROPOSAL_ID_BYTES],
        ));

        Self {
            id,
            tx_hash: tx_hash.to_string(),
            proposer: proposer.to_string(),
            created_at_height: current_height,
            expires_at_height: ttl.expiry_height(current_height),
            confirmed_by: Vec::new(),
            status: ProposalStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the validity window has elapsed at the given height
    pub fn is_expired(&self, current_height: u64) -> bool {
        current_height >= self.expires_at_height
    }

    /// Whether the proposal is still accepting confirmations
    pub fn is_open(&self) -> bool {
        self.status == ProposalStatus::Open
    }

    /// Whether the given signer has already confirmed
    pub fn has_confirmed(&self, signer_pubkey: &str) -> bool {
        self.confirmed_by.iter().any(|s| s == signer_pubkey)
    }

    /// Number of confirmations collected so far
    pub fn confirmation_count(&self) -> usize {
        self.confirmed_by.len()
    }

    pub(crate) fn mark_authorized(&mut self) {
        self.status = ProposalStatus::Authorized;
        self.updated_at = Utc::now();
    }

    pub(crate) fn mark_expired(&mut self) {
        self.status = ProposalStatus::Expired;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx_hash() -> String {
        hex::encode([0x42u8; 32])
    }

    #[test]
    fn test_relative_ttl_normalizes_at_creation() {
        let p = Proposal::new(&tx_hash(), "signer-0", Ttl::Relative(5), 100, 1);
        assert_eq!(p.created_at_height, 100);
        assert_eq!(p.expires_at_height, 105);
    }

    #[test]
    fn test_fixed_ttl_is_absolute() {
        let p = Proposal::new(&tx_hash(), "signer-0", Ttl::Fixed(250), 100, 1);
        assert_eq!(p.expires_at_height, 250);
    }

    #[test]
    fn test_expiry_boundary() {
        let p = Proposal::new(&tx_hash(), "signer-0", Ttl::Relative(5), 100, 1);
        assert!(!p.is_expired(104));
        assert!(p.is_expired(105));
        assert!(p.is_expired(106));
    }

    #[test]
    fn test_new_proposal_starts_open_and_unconfirmed() {
        let p = Proposal::new(&tx_hash(), "signer-0", Ttl::Relative(5), 100, 1);
        assert!(p.is_open());
        assert_eq!(p.confirmation_count(), 0);
        assert!(!p.has_confirmed("signer-0"));
    }

    #[test]
    fn test_id_changes_with_nonce() {
        let a = Proposal::new(&tx_hash(), "signer-0", Ttl::Relative(5), 100, 1);
        let b = Proposal::new(&tx_hash(), "signer-0", Ttl::Relative(5), 100, 2);
        assert_ne!(a.id, b.id);
    }
}
