//! Authorization state machine
//!
//! The per-account engine orchestrating propose → confirm → authorize/expire,
//! plus the sequence counter that fences replay.

pub mod engine;
pub mod sequence;

pub use engine::{AuthEngine, AuthError, AuthGrant, ConsensusInfo};
pub use sequence::{NonceSequencer, SequenceError};
