//! Ledger client seam
//!
//! The engine consumes chain state through the [`ChainClient`] trait: the
//! current height for validity-window checks, and raw payload submission once
//! a transaction is authorized. [`LocalChain`] is the bundled in-memory
//! implementation that lets tests and the CLI drive the full lifecycle
//! without a node.

use crate::crypto::sha256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a ledger client
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Refusing to submit an empty payload")]
    EmptyPayload,
}

/// Chain operations the authorization engine and its callers consume
pub trait ChainClient {
    /// Current chain height, used to evaluate proposal validity windows
    fn current_height(&self) -> u64;

    /// Submit a raw signed payload; returns its transaction id
    fn submit(&mut self, payload: &[u8]) -> Result<String, LedgerError>;
}

/// A transaction accepted by the local chain stub
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmittedTx {
    /// Identifier assigned at submission
    pub tx_id: String,
    /// Height of the block the payload landed in
    pub height: u64,
    /// The raw payload, hex-encoded
    pub payload_hex: String,
}

/// In-memory chain stub: a height counter plus a log of submitted payloads
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LocalChain {
    height: u64,
    submitted: Vec<SubmittedTx>,
}

impl LocalChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain already at the given height
    pub fn at_height(height: u64) -> Self {
        Self {
            height,
            submitted: Vec::new(),
        }
    }

    /// Advance the chain by the given number of blocks, returning the new height
    pub fn advance(&mut self, blocks: u64) -> u64 {
        self.height = self.height.saturating_add(blocks);
        self.height
    }

    /// Payloads accepted so far, oldest first
    pub fn submitted(&self) -> &[SubmittedTx] {
        &self.submitted
    }
}

impl ChainClient for LocalChain {
    fn current_height(&self) -> u64 {
        self.height
    }

    fn submit(&mut self, payload: &[u8]) -> Result<String, LedgerError> {
        if payload.is_empty() {
            return Err(LedgerError::EmptyPayload);
        }

        // The payload lands in the next block.
        self.height += 1;

        let mut id_data = payload.to_vec();
        id_data.extend_from_slice(&self.height.to_be_bytes());
        let tx_id = hex::encode(&sha256(&id_data)[..16]);

        self.submitted.push(SubmittedTx {
            tx_id: tx_id.clone(),
            height: self.height,
            payload_hex: hex::encode(payload),
        });

        log::debug!("accepted payload as tx {} at height {}", tx_id, self.height);
        Ok(tx_id)
    }
}
