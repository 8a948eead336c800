//! Single-slot proposal registry
//!
//! At most one proposal may be open at a time. Resolution is terminal: a
//! resolved proposal moves into the history and can never be reopened; a new
//! proposal must be created afresh.

use crate::proposal::proposal::{Proposal, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by the registry
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The single open slot is taken, regardless of transaction hash
    #[error("A transaction is already proposed")]
    AlreadyProposed,
}

/// Terminal outcome of an open proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Authorized,
    Expired,
}

/// Holds the account's open proposal slot and the resolved history
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProposalRegistry {
    /// The single open proposal, if any
    open: Option<Proposal>,
    /// Resolved proposals by id
    resolved: HashMap<String, Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a proposal into the open slot
    pub fn create(&mut self, proposal: Proposal) -> Result<ProposalId, RegistryError> {
        if self.open.is_some() {
            return Err(RegistryError::AlreadyProposed);
        }

        let id = proposal.id.clone();
        self.open = Some(proposal);
        Ok(id)
    }

    /// The currently open proposal, if any
    pub fn get_open(&self) -> Option<&Proposal> {
        self.open.as_ref()
    }

    pub fn get_open_mut(&mut self) -> Option<&mut Proposal> {
        self.open.as_mut()
    }

    /// Look up a resolved proposal by id
    pub fn get_resolved(&self, id: &ProposalId) -> Option<&Proposal> {
        self.resolved.get(id.as_str())
    }

    /// Whether the id refers to a resolved proposal
    pub fn is_resolved(&self, id: &ProposalId) -> bool {
        self.resolved.contains_key(id.as_str())
    }

    /// Number of proposals resolved over the account's lifetime
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Resolve the open proposal, freeing the slot.
    ///
    /// Returns the resolved record, or `None` when no proposal is open.
    pub fn resolve(&mut self, outcome: Outcome) -> Option<&Proposal> {
        let mut proposal = self.open.take()?;
        match outcome {
            Outcome::Authorized => proposal.mark_authorized(),
            Outcome::Expired => proposal.mark_expired(),
        }

        let key = proposal.id.as_str().to_string();
        self.resolved.insert(key.clone(), proposal);
        self.resolved.get(&key)
    }
}
