//! ECDSA signer keys for the authorization engine
//!
//! Key pair generation, detached signing, and verification over the
//! secp256k1 curve. Verification used by the engine fails closed: malformed
//! input is reported as a failed verification, never as an error a caller
//! could mistake for success.

use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::hash::{auth_digest, sha256};

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Message digest must be 32 bytes")]
    InvalidDigest,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A signer key pair
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Get the address derived from the public key
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }

    /// Sign a 32-byte digest, returning the compact signature
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, KeyError> {
        if digest.len() != 32 {
            return Err(KeyError::InvalidDigest);
        }
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest)?;
        let signature = secp.sign_ecdsa(&message, &self.secret_key);
        Ok(signature.serialize_compact().to_vec())
    }
}

/// Convert a public key to its address
///
/// Base58Check(version || RIPEMD160(SHA256(pubkey)))
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    let sha256_hash = sha256(&public_key.serialize());

    let mut ripemd = Ripemd160::new();
    ripemd.update(&sha256_hash);
    let ripemd_hash = ripemd.finalize();

    let mut address_bytes = vec![0x00];
    address_bytes.extend_from_slice(&ripemd_hash);

    // Checksum: first 4 bytes of double SHA256
    let checksum = {
        let first_hash = Sha256::digest(&address_bytes);
        let second_hash = Sha256::digest(first_hash);
        second_hash[..4].to_vec()
    };
    address_bytes.extend_from_slice(&checksum);

    bs58::encode(address_bytes).into_string()
}

/// Parse a public key from a hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Produce the hex signature a signer attaches to a propose or confirm call.
///
/// Signs the network-bound digest of the transaction hash, matching what
/// [`verify_detached`] checks on the receiving side.
pub fn sign_authorization(
    key_pair: &KeyPair,
    tx_hash: &[u8],
    network_id: &str,
) -> Result<String, KeyError> {
    let digest = auth_digest(tx_hash, network_id);
    Ok(hex::encode(key_pair.sign(&digest)?))
}

/// Verify a detached hex signature over a 32-byte digest.
///
/// Fails closed: a malformed key, signature, or digest verifies as `false`.
pub fn verify_detached(pubkey_hex: &str, digest: &[u8], signature_hex: &str) -> bool {
    if digest.len() != 32 {
        return false;
    }
    let public_key = match public_key_from_hex(pubkey_hex) {
        Ok(pk) => pk,
        Err(_) => return false,
    };
    let sig_bytes = match hex::decode(signature_hex) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let signature = match secp256k1::ecdsa::Signature::from_compact(&sig_bytes) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    let message = match Message::from_digest_slice(digest) {
        Ok(msg) => msg,
        Err(_) => return false,
    };

    let secp = Secp256k1::new();
    secp.verify_ecdsa(&message, &signature, &public_key).is_ok()
}
