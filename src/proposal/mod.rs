//! Proposal lifecycle: the pending record, its confirmation quorum, and the
//! single-slot registry that owns it.

pub mod proposal;
pub mod quorum;
pub mod registry;

pub use proposal::{Proposal, ProposalId, ProposalStatus, Ttl};
pub use quorum::{QuorumError, QuorumTracker};
pub use registry::{Outcome, ProposalRegistry, RegistryError};
