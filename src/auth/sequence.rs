//! Replay fencing for authorization calls
//!
//! The account owns a single monotonically increasing sequence value. Every
//! state-changing call must claim the current value; the counter only moves
//! when an authorization succeeds, so a proposal built against a state the
//! chain has moved past can never validate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised during nonce validation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Stale nonce: expected {expected}, got {claimed}")]
    StaleNonce { expected: u64, claimed: u64 },
}

/// Monotonically increasing sequence counter for one account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NonceSequencer {
    current: u64,
}

impl Default for NonceSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSequencer {
    /// The first authorization an account performs consumes nonce 1
    pub fn new() -> Self {
        Self { current: 1 }
    }

    /// The current sequence value
    pub fn current(&self) -> u64 {
        self.current
    }

    /// The value a caller must claim when building a new proposal
    pub fn expected_for_new_proposal(&self) -> u64 {
        self.current
    }

    /// Validate a caller-claimed nonce against the current value.
    ///
    /// Strict equality: a claim above the counter is as invalid as one below
    /// it, so two concurrently built proposals cannot both pass.
    pub fn validate(&self, claimed: u64) -> Result<(), SequenceError> {
        if claimed != self.current {
            return Err(SequenceError::StaleNonce {
                expected: self.current,
                claimed,
            });
        }
        Ok(())
    }

    /// Consume the current value after a successful authorization.
    ///
    /// Increments exactly once and returns the consumed value.
    pub fn advance(&mut self) -> u64 {
        let consumed = self.current;
        self.current += 1;
        consumed
    }
}
