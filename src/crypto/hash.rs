//! Hashing utilities for the authorization engine
//!
//! Provides the SHA-256 helpers used for proposal identifiers, account
//! addresses, and the domain-separated digest signers approve.

use sha2::{Digest, Sha256};

/// Length in bytes of a canonical transaction hash
pub const TX_HASH_BYTES: usize = 32;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Computes the digest a signer approves when confirming a transaction.
///
/// The network id is appended to the transaction hash before hashing, so a
/// signature captured on one network never verifies on another.
pub fn auth_digest(tx_hash: &[u8], network_id: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(tx_hash.len() + network_id.len());
    data.extend_from_slice(tx_hash);
    data.extend_from_slice(network_id.as_bytes());
    sha256(&data)
}

/// Decode a hex-encoded transaction hash, enforcing the canonical length.
///
/// Returns `None` for anything that is not exactly 32 bytes of valid hex.
pub fn decode_tx_hash(tx_hash_hex: &str) -> Option<Vec<u8>> {
    match hex::decode(tx_hash_hex) {
        Ok(bytes) if bytes.len() == TX_HASH_BYTES => Some(bytes),
        _ => None,
    }
}
