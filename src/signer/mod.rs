//! Signer identities for generalized accounts
//!
//! A generalized account delegates authorization to a fixed set of signer
//! keys; this module owns that set and the account address derived from it.

pub mod set;

pub use set::{SignerSet, SignerSetError};
