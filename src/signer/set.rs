//! Fixed signer set for a generalized account
//!
//! The signer set and threshold are fixed when the account is initialized;
//! there is no dynamic add or remove.

use crate::crypto::{public_key_from_hex, public_key_to_address, sha256};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Version byte for generalized account addresses, distinct from the
/// single-key address version so the two are never confused.
const GA_ADDRESS_VERSION: u8 = 0x26;

/// Errors raised while constructing a signer set
#[derive(Error, Debug)]
pub enum SignerSetError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Signer set must contain at least one signer")]
    EmptySignerSet,
    #[error("Duplicate signer public key")]
    DuplicateSigner,
}

/// Ordered, duplicate-free collection of signer public keys plus the number
/// of confirmations required to authorize a transaction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignerSet {
    /// Confirmations required (T in T-of-N)
    threshold: u8,
    /// Public keys of all eligible signers (hex-encoded, insertion order)
    signers: Vec<String>,
}

impl SignerSet {
    /// Create a new signer set
    ///
    /// # Errors
    /// Returns an error if the threshold is zero or exceeds the signer
    /// count, if the set is empty, or if a public key appears twice.
    pub fn new(threshold: u8, signers: Vec<String>) -> Result<Self, SignerSetError> {
        if signers.is_empty() {
            return Err(SignerSetError::EmptySignerSet);
        }

        if threshold == 0 {
            return Err(SignerSetError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }

        if threshold as usize > signers.len() {
            return Err(SignerSetError::InvalidThreshold(format!(
                "threshold {} exceeds signer count {}",
                threshold,
                signers.len()
            )));
        }

        let mut sorted_signers = signers.clone();
        sorted_signers.sort();
        for i in 1..sorted_signers.len() {
            if sorted_signers[i] == sorted_signers[i - 1] {
                return Err(SignerSetError::DuplicateSigner);
            }
        }

        Ok(Self { threshold, signers })
    }

    /// Get the threshold (T)
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Get the total signer count (N)
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Whether the set is empty (never true for a constructed set)
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// The signer public keys in insertion order
    pub fn signers(&self) -> &[String] {
        &self.signers
    }

    /// Check whether a public key belongs to the set.
    ///
    /// Also accepts the address derived from a member key, since callers may
    /// identify signers either way.
    pub fn contains(&self, pubkey: &str) -> bool {
        if self.signers.iter().any(|s| s == pubkey) {
            return true;
        }

        if let Ok(pk) = public_key_from_hex(pubkey) {
            let address = public_key_to_address(&pk);
            if self.signers.iter().any(|s| s == &address) {
                return true;
            }
        }

        false
    }

    /// Derive the generalized account's address from the signer set.
    ///
    /// Base58Check(version || RIPEMD160(SHA256(threshold || sorted_pubkeys))),
    /// so the same set and threshold always map to the same account.
    pub fn account_address(&self) -> String {
        let mut sorted_signers = self.signers.clone();
        sorted_signers.sort();

        let mut preimage = vec![self.threshold];
        for pubkey in &sorted_signers {
            preimage.extend_from_slice(pubkey.as_bytes());
        }

        let sha256_hash = sha256(&preimage);

        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha256_hash);
        let ripemd_hash = ripemd.finalize();

        let mut address_bytes = vec![GA_ADDRESS_VERSION];
        address_bytes.extend_from_slice(&ripemd_hash);

        let checksum = {
            let first_hash = Sha256::digest(&address_bytes);
            let second_hash = Sha256::digest(first_hash);
            second_hash[..4].to_vec()
        };
        address_bytes.extend_from_slice(&checksum);

        bs58::encode(address_bytes).into_string()
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.signers.len())
    }
}
