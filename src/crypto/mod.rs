//! Cryptographic primitives for the authorization engine
//!
//! Hashing, signer key pairs, and detached signature verification.

pub mod hash;
pub mod keys;

pub use hash::{auth_digest, decode_tx_hash, sha256, sha256_hex, TX_HASH_BYTES};
pub use keys::{
    public_key_from_hex, public_key_to_address, sign_authorization, verify_detached, KeyError,
    KeyPair,
};
