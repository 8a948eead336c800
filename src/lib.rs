//! GA-Multisig: multi-signature authorization for generalized accounts
//!
//! This crate implements the client-side authorization protocol that gates a
//! shared account behind a quorum of independent signers:
//! - Fixed T-of-N signer sets with derived account addresses
//! - Single-slot proposal lifecycle (propose → confirm → authorize/expire)
//! - Detached ECDSA signatures (secp256k1) with network-bound digests
//! - Relative and fixed validity windows normalized to absolute heights
//! - Nonce sequencing that fences replay of resolved proposals
//! - Structured, machine-readable rejection reasons
//! - JSON persistence and a CLI for driving the full lifecycle
//!
//! # Example
//!
//! ```rust
//! use ga_multisig::auth::AuthEngine;
//! use ga_multisig::crypto::{sign_authorization, KeyPair};
//! use ga_multisig::ledger::{ChainClient, LocalChain};
//! use ga_multisig::proposal::Ttl;
//! use ga_multisig::signer::SignerSet;
//!
//! // A 2-of-3 generalized account
//! let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let set = SignerSet::new(2, keys.iter().map(|k| k.public_key_hex()).collect()).unwrap();
//! let mut engine = AuthEngine::new(set, "ae_devnet");
//! let mut chain = LocalChain::at_height(1);
//!
//! // The first signer proposes and is confirmed automatically
//! let tx_hash = [0x42u8; 32];
//! let sig = sign_authorization(&keys[0], &tx_hash, "ae_devnet").unwrap();
//! let nonce = engine.nonce();
//! let id = engine
//!     .propose(
//!         &chain,
//!         &keys[0].public_key_hex(),
//!         &hex::encode(tx_hash),
//!         Ttl::Relative(50),
//!         &sig,
//!         nonce,
//!     )
//!     .unwrap();
//!
//! // A second signer confirms, reaching quorum
//! let sig = sign_authorization(&keys[1], &tx_hash, "ae_devnet").unwrap();
//! engine
//!     .confirm(&chain, &keys[1].public_key_hex(), &id, &sig, nonce)
//!     .unwrap();
//!
//! // Anyone may now authorize and submit the gated payload
//! let grant = engine.authorize(&chain, &id, b"signed-spend-tx", nonce).unwrap();
//! chain.submit(&grant.payload).unwrap();
//! ```

pub mod auth;
pub mod cli;
pub mod crypto;
pub mod ledger;
pub mod proposal;
pub mod service;
pub mod signer;
pub mod storage;

// Re-export commonly used types
pub use auth::{AuthEngine, AuthError, AuthGrant, ConsensusInfo, NonceSequencer};
pub use crypto::KeyPair;
pub use ledger::{ChainClient, LocalChain};
pub use proposal::{Proposal, ProposalId, ProposalStatus, QuorumTracker, Ttl};
pub use service::{AccountService, GaAccount, ServiceError};
pub use signer::SignerSet;
pub use storage::{PersistedState, Storage, StorageConfig};
