//! Authorization state machine for one generalized account
//!
//! Orchestrates the propose → confirm → authorize/expire lifecycle over the
//! account's single proposal slot. Rejections are checked in a fixed order so
//! every failure has one deterministic reason: signer membership, then
//! expiry, then slot/duplicate state, then signature, then nonce, then
//! quorum.

use crate::auth::sequence::{NonceSequencer, SequenceError};
use crate::crypto::{auth_digest, decode_tx_hash, verify_detached};
use crate::ledger::ChainClient;
use crate::proposal::{
    Outcome, Proposal, ProposalId, ProposalRegistry, ProposalStatus, QuorumError, QuorumTracker,
    RegistryError, Ttl,
};
use crate::signer::SignerSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reasons for authorization calls.
///
/// Every rejection is terminal for the call that produced it; no state
/// changes except where the rejection itself is the expiry transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Caller is not an authorized signer: {0}")]
    NotAuthorized(String),
    #[error("Signer has already confirmed this proposal")]
    AlreadyConfirmed,
    #[error("A transaction is already proposed")]
    AlreadyProposed,
    #[error("The proposed transaction has expired")]
    TxAlreadyExpired,
    #[error("Signature does not verify against the calling signer")]
    InvalidSignature,
    #[error("Stale nonce: expected {expected}, got {claimed}")]
    StaleNonce { expected: u64, claimed: u64 },
    #[error("Quorum not met: {have} of {need} confirmations")]
    QuorumNotMet { have: usize, need: u8 },
    #[error("Proposal {0} is already resolved")]
    AlreadyResolved(ProposalId),
    #[error("No transaction is currently proposed")]
    NothingProposed,
    #[error("Unknown proposal: {0}")]
    ProposalNotFound(ProposalId),
    #[error("Malformed transaction hash: {0}")]
    MalformedTxHash(String),
}

impl AuthError {
    /// Canonical abort code for this rejection, matching the strings the
    /// on-chain authorization contract reverts with.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NotAuthorized(_) => "ERROR_NOT_AUTHORIZED",
            AuthError::AlreadyConfirmed => "ERROR_ALREADY_CONFIRMED",
            AuthError::AlreadyProposed => "ERROR_A_TX_IS_ALREADY_PROPOSED",
            AuthError::TxAlreadyExpired => "ERROR_TX_ALREADY_EXPIRED",
            AuthError::InvalidSignature => "ERROR_INVALID_SIGNATURE",
            AuthError::StaleNonce { expected, claimed } if claimed < expected => {
                "ERROR_NONCE_TOO_LOW"
            }
            AuthError::StaleNonce { .. } => "ERROR_NONCE_TOO_HIGH",
            AuthError::QuorumNotMet { .. } => "ERROR_QUORUM_NOT_MET",
            AuthError::AlreadyResolved(_) => "ERROR_TX_ALREADY_RESOLVED",
            AuthError::NothingProposed => "ERROR_NO_TX_PROPOSED",
            AuthError::ProposalNotFound(_) => "ERROR_UNKNOWN_PROPOSAL",
            AuthError::MalformedTxHash(_) => "ERROR_MALFORMED_TX_HASH",
        }
    }
}

impl From<QuorumError> for AuthError {
    fn from(err: QuorumError) -> Self {
        match err {
            QuorumError::AlreadyConfirmed => AuthError::AlreadyConfirmed,
        }
    }
}

impl From<RegistryError> for AuthError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyProposed => AuthError::AlreadyProposed,
        }
    }
}

impl From<SequenceError> for AuthError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::StaleNonce { expected, claimed } => {
                AuthError::StaleNonce { expected, claimed }
            }
        }
    }
}

/// Single-use token permitting execution of an authorized transaction.
///
/// Deliberately not `Clone`: the grant is consumed by whoever submits the
/// gated payload.
#[derive(Debug, PartialEq, Eq)]
pub struct AuthGrant {
    /// The proposal that was authorized
    pub proposal_id: ProposalId,
    /// Hash of the transaction whose execution is now permitted
    pub tx_hash: String,
    /// The gated payload, ready for submission
    pub payload: Vec<u8>,
    /// Sequence value consumed by this authorization
    pub nonce: u64,
}

/// Read-only snapshot of a proposal's consensus state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsensusInfo {
    pub tx_hash: String,
    pub proposed_by: String,
    pub status: ProposalStatus,
    pub confirmed_by: Vec<String>,
    pub confirmations_required: u8,
    pub expires_at_height: u64,
    pub expired: bool,
}

/// The authorization engine for one generalized account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthEngine {
    signer_set: SignerSet,
    network_id: String,
    registry: ProposalRegistry,
    sequencer: NonceSequencer,
}

impl AuthEngine {
    /// Create an engine for a fixed signer set on the given network
    pub fn new(signer_set: SignerSet, network_id: &str) -> Self {
        Self {
            signer_set,
            network_id: network_id.to_string(),
            registry: ProposalRegistry::new(),
            sequencer: NonceSequencer::new(),
        }
    }

    /// The fixed signer set
    pub fn signer_set(&self) -> &SignerSet {
        &self.signer_set
    }

    /// Network the account lives on
    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// Current sequence value; the nonce a new proposal must claim
    pub fn nonce(&self) -> u64 {
        self.sequencer.current()
    }

    /// Address of the generalized account this engine authorizes for
    pub fn account_address(&self) -> String {
        self.signer_set.account_address()
    }

    /// The currently open proposal, if any
    pub fn open_proposal(&self) -> Option<&Proposal> {
        self.registry.get_open()
    }

    /// Propose a transaction for authorization.
    ///
    /// The proposer's own confirmation is registered immediately, so a
    /// 1-of-N account reaches quorum with the propose call alone.
    pub fn propose<C: ChainClient>(
        &mut self,
        chain: &C,
        caller_pubkey: &str,
        tx_hash: &str,
        ttl: Ttl,
        signature: &str,
        claimed_nonce: u64,
    ) -> Result<ProposalId, AuthError> {
        self.check_caller(caller_pubkey)?;

        let height = chain.current_height();
        if self.retire_if_expired(height) {
            return Err(AuthError::TxAlreadyExpired);
        }
        if self.registry.get_open().is_some() {
            return Err(AuthError::AlreadyProposed);
        }

        let tx_hash_bytes = decode_tx_hash(tx_hash)
            .ok_or_else(|| AuthError::MalformedTxHash(tx_hash.to_string()))?;
        let digest = auth_digest(&tx_hash_bytes, &self.network_id);
        if !verify_detached(caller_pubkey, &digest, signature) {
            return Err(AuthError::InvalidSignature);
        }

        self.sequencer.validate(claimed_nonce)?;

        // A window already closed at creation could never be confirmed.
        let expires_at_height = ttl.expiry_height(height);
        if expires_at_height <= height {
            return Err(AuthError::TxAlreadyExpired);
        }

        let mut proposal = Proposal::new(tx_hash, caller_pubkey, ttl, height, claimed_nonce);
        QuorumTracker::new(self.signer_set.threshold())
            .register_confirmation(&mut proposal, caller_pubkey)?;
        let id = self.registry.create(proposal)?;

        log::info!(
            "proposal {} created by {} (expires at height {})",
            id,
            caller_pubkey,
            expires_at_height
        );
        Ok(id)
    }

    /// Confirm the open proposal on behalf of one signer
    pub fn confirm<C: ChainClient>(
        &mut self,
        chain: &C,
        caller_pubkey: &str,
        proposal_id: &ProposalId,
        signature: &str,
        claimed_nonce: u64,
    ) -> Result<(), AuthError> {
        self.check_caller(caller_pubkey)?;

        let height = chain.current_height();
        if self.retire_if_expired(height) {
            return Err(AuthError::TxAlreadyExpired);
        }

        let open = self.locate_open(proposal_id)?;
        if open.has_confirmed(caller_pubkey) {
            return Err(AuthError::AlreadyConfirmed);
        }
        let tx_hash = open.tx_hash.clone();

        let tx_hash_bytes =
            decode_tx_hash(&tx_hash).ok_or(AuthError::MalformedTxHash(tx_hash))?;
        let digest = auth_digest(&tx_hash_bytes, &self.network_id);
        if !verify_detached(caller_pubkey, &digest, signature) {
            return Err(AuthError::InvalidSignature);
        }

        self.sequencer.validate(claimed_nonce)?;

        let threshold = self.signer_set.threshold();
        let open = self
            .registry
            .get_open_mut()
            .ok_or(AuthError::NothingProposed)?;
        QuorumTracker::new(threshold).register_confirmation(open, caller_pubkey)?;

        log::info!(
            "signer {} confirmed proposal {} ({}/{} confirmations)",
            caller_pubkey,
            proposal_id,
            open.confirmation_count(),
            threshold
        );
        Ok(())
    }

    /// Authorize the proposal, permitting the gated transaction to execute.
    ///
    /// No signature of its own: the caller signs the outer transaction that
    /// carries the grant, so any party may submit it once quorum is reached.
    /// Success consumes the account's current nonce; the returned grant is
    /// single-use and a repeated call rejects as already resolved.
    pub fn authorize<C: ChainClient>(
        &mut self,
        chain: &C,
        proposal_id: &ProposalId,
        auth_payload: &[u8],
        claimed_nonce: u64,
    ) -> Result<AuthGrant, AuthError> {
        let height = chain.current_height();
        if self.retire_if_expired(height) {
            return Err(AuthError::TxAlreadyExpired);
        }

        let open = self.locate_open(proposal_id)?;

        self.sequencer.validate(claimed_nonce)?;

        let quorum = QuorumTracker::new(self.signer_set.threshold());
        if !quorum.has_quorum(open) {
            return Err(AuthError::QuorumNotMet {
                have: open.confirmation_count(),
                need: self.signer_set.threshold(),
            });
        }
        let tx_hash = open.tx_hash.clone();

        self.registry.resolve(Outcome::Authorized);
        let consumed = self.sequencer.advance();

        log::info!(
            "proposal {} authorized, nonce {} consumed",
            proposal_id,
            consumed
        );

        Ok(AuthGrant {
            proposal_id: proposal_id.clone(),
            tx_hash,
            payload: auth_payload.to_vec(),
            nonce: consumed,
        })
    }

    /// Read-only consensus snapshot for a proposal, open or resolved.
    ///
    /// Never mutates state: an elapsed-but-unretired proposal is reported
    /// with `expired: true` while still `Open`.
    pub fn consensus_info<C: ChainClient>(
        &self,
        chain: &C,
        proposal_id: &ProposalId,
    ) -> Option<ConsensusInfo> {
        let proposal = match self.registry.get_open() {
            Some(p) if p.id == *proposal_id => Some(p),
            _ => self.registry.get_resolved(proposal_id),
        }?;

        let height = chain.current_height();
        Some(ConsensusInfo {
            tx_hash: proposal.tx_hash.clone(),
            proposed_by: proposal.proposer.clone(),
            status: proposal.status,
            confirmed_by: proposal.confirmed_by.clone(),
            confirmations_required: self.signer_set.threshold(),
            expires_at_height: proposal.expires_at_height,
            expired: proposal.status == ProposalStatus::Expired
                || (proposal.is_open() && proposal.is_expired(height)),
        })
    }

    fn check_caller(&self, caller_pubkey: &str) -> Result<(), AuthError> {
        if !self.signer_set.contains(caller_pubkey) {
            return Err(AuthError::NotAuthorized(caller_pubkey.to_string()));
        }
        Ok(())
    }

    /// Retire the open proposal if its window has elapsed at this height
    fn retire_if_expired(&mut self, current_height: u64) -> bool {
        let elapsed = self
            .registry
            .get_open()
            .map(|p| p.is_expired(current_height))
            .unwrap_or(false);
        if elapsed {
            if let Some(p) = self.registry.resolve(Outcome::Expired) {
                log::info!("proposal {} expired at height {}", p.id, current_height);
            }
        }
        elapsed
    }

    /// Resolve a proposal id against the open slot, or explain why it can't be
    fn locate_open(&self, proposal_id: &ProposalId) -> Result<&Proposal, AuthError> {
        match self.registry.get_open() {
            Some(p) if p.id == *proposal_id => Ok(p),
            other => {
                if self.registry.is_resolved(proposal_id) {
                    Err(AuthError::AlreadyResolved(proposal_id.clone()))
                } else if other.is_some() {
                    Err(AuthError::ProposalNotFound(proposal_id.clone()))
                } else {
                    Err(AuthError::NothingProposed)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign_authorization, KeyPair};
    use crate::ledger::LocalChain;

    const NETWORK: &str = "ae_devnet";
    const DEFAULT_TTL: Ttl = Ttl::Relative(200);

    struct Fixture {
        engine: AuthEngine,
        keys: Vec<KeyPair>,
        chain: LocalChain,
    }

    fn fixture(threshold: u8, signers: usize) -> Fixture {
        let keys: Vec<KeyPair> = (0..signers).map(|_| KeyPair::generate()).collect();
        let pubkeys = keys.iter().map(|k| k.public_key_hex()).collect();
        let signer_set = SignerSet::new(threshold, pubkeys).unwrap();
        Fixture {
            engine: AuthEngine::new(signer_set, NETWORK),
            keys,
            chain: LocalChain::at_height(100),
        }
    }

    fn tx_hash() -> String {
        hex::encode([0x42u8; 32])
    }

    fn signature_for(key: &KeyPair, tx_hash_hex: &str) -> String {
        let bytes = hex::decode(tx_hash_hex).unwrap();
        sign_authorization(key, &bytes, NETWORK).unwrap()
    }

    fn propose(fx: &mut Fixture, signer: usize, ttl: Ttl) -> Result<ProposalId, AuthError> {
        let hash = tx_hash();
        let sig = signature_for(&fx.keys[signer], &hash);
        let nonce = fx.engine.nonce();
        fx.engine.propose(
            &fx.chain,
            &fx.keys[signer].public_key_hex(),
            &hash,
            ttl,
            &sig,
            nonce,
        )
    }

    fn confirm(fx: &mut Fixture, signer: usize, id: &ProposalId) -> Result<(), AuthError> {
        let hash = tx_hash();
        let sig = signature_for(&fx.keys[signer], &hash);
        let nonce = fx.engine.nonce();
        fx.engine.confirm(
            &fx.chain,
            &fx.keys[signer].public_key_hex(),
            id,
            &sig,
            nonce,
        )
    }

    fn authorize(fx: &mut Fixture, id: &ProposalId) -> Result<AuthGrant, AuthError> {
        let nonce = fx.engine.nonce();
        fx.engine.authorize(&fx.chain, id, b"signed-spend-tx", nonce)
    }

    #[test]
    fn test_three_of_three_success_path() {
        let mut fx = fixture(3, 3);

        let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();

        // proposer is auto-confirmed
        let info = fx.engine.consensus_info(&fx.chain, &id).unwrap();
        assert_eq!(info.confirmed_by, vec![fx.keys[0].public_key_hex()]);

        confirm(&mut fx, 1, &id).unwrap();

        // two of three is not quorum
        assert_eq!(
            authorize(&mut fx, &id),
            Err(AuthError::QuorumNotMet { have: 2, need: 3 })
        );

        confirm(&mut fx, 2, &id).unwrap();

        let grant = authorize(&mut fx, &id).unwrap();
        assert_eq!(grant.tx_hash, tx_hash());
        assert_eq!(grant.payload, b"signed-spend-tx");
        assert_eq!(grant.nonce, 1);

        let info = fx.engine.consensus_info(&fx.chain, &id).unwrap();
        assert_eq!(info.status, ProposalStatus::Authorized);
    }

    #[test]
    fn test_proposer_reconfirmation_rejected() {
        let mut fx = fixture(3, 3);
        let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();

        let err = confirm(&mut fx, 0, &id).unwrap_err();
        assert_eq!(err, AuthError::AlreadyConfirmed);
        assert_eq!(err.code(), "ERROR_ALREADY_CONFIRMED");

        // confirmation set unchanged
        let info = fx.engine.consensus_info(&fx.chain, &id).unwrap();
        assert_eq!(info.confirmed_by.len(), 1);
    }

    #[test]
    fn test_single_slot_regardless_of_hash() {
        let mut fx = fixture(2, 3);
        propose(&mut fx, 0, DEFAULT_TTL).unwrap();

        // different transaction hash, same outcome
        let other_hash = hex::encode([0x99u8; 32]);
        let bytes = hex::decode(&other_hash).unwrap();
        let sig = sign_authorization(&fx.keys[1], &bytes, NETWORK).unwrap();
        let nonce = fx.engine.nonce();
        let err = fx
            .engine
            .propose(
                &fx.chain,
                &fx.keys[1].public_key_hex(),
                &other_hash,
                DEFAULT_TTL,
                &sig,
                nonce,
            )
            .unwrap_err();

        assert_eq!(err, AuthError::AlreadyProposed);
        assert_eq!(err.code(), "ERROR_A_TX_IS_ALREADY_PROPOSED");
    }

    #[test]
    fn test_relative_ttl_expiry() {
        let mut fx = fixture(3, 3);
        let id = propose(&mut fx, 0, Ttl::Relative(5)).unwrap();
        assert_eq!(
            fx.engine.open_proposal().unwrap().expires_at_height,
            105
        );

        fx.chain.advance(6); // height 106

        let err = confirm(&mut fx, 1, &id).unwrap_err();
        assert_eq!(err, AuthError::TxAlreadyExpired);
        assert_eq!(err.code(), "ERROR_TX_ALREADY_EXPIRED");

        // the expiry transition is terminal
        let info = fx.engine.consensus_info(&fx.chain, &id).unwrap();
        assert_eq!(info.status, ProposalStatus::Expired);
        assert_eq!(confirm(&mut fx, 1, &id), Err(AuthError::AlreadyResolved(id)));
    }

    #[test]
    fn test_expiry_dominates_met_quorum() {
        let mut fx = fixture(2, 3);
        let id = propose(&mut fx, 0, Ttl::Relative(5)).unwrap();
        confirm(&mut fx, 1, &id).unwrap(); // quorum reached

        fx.chain.advance(5); // height 105 == expiry

        assert_eq!(authorize(&mut fx, &id), Err(AuthError::TxAlreadyExpired));
    }

    #[test]
    fn test_non_member_rejected() {
        let mut fx = fixture(3, 3);
        let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();

        let outsider = KeyPair::generate();
        let hash = tx_hash();
        let bytes = hex::decode(&hash).unwrap();
        let sig = sign_authorization(&outsider, &bytes, NETWORK).unwrap();
        let nonce = fx.engine.nonce();
        let err = fx
            .engine
            .confirm(&fx.chain, &outsider.public_key_hex(), &id, &sig, nonce)
            .unwrap_err();

        assert!(matches!(err, AuthError::NotAuthorized(_)));
        assert_eq!(err.code(), "ERROR_NOT_AUTHORIZED");

        let info = fx.engine.consensus_info(&fx.chain, &id).unwrap();
        assert_eq!(info.confirmed_by.len(), 1);
    }

    #[test]
    fn test_membership_checked_before_expiry() {
        let mut fx = fixture(2, 3);
        let id = propose(&mut fx, 0, Ttl::Relative(5)).unwrap();
        fx.chain.advance(10);

        let outsider = KeyPair::generate();
        let sig = signature_for(&outsider, &tx_hash());
        let nonce = fx.engine.nonce();
        let err = fx
            .engine
            .confirm(&fx.chain, &outsider.public_key_hex(), &id, &sig, nonce)
            .unwrap_err();

        // the outsider learns nothing about proposal state
        assert!(matches!(err, AuthError::NotAuthorized(_)));
        assert!(fx.engine.open_proposal().is_some());
    }

    #[test]
    fn test_invalid_signature_rejected() {
        let mut fx = fixture(3, 3);
        let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();

        // signer 1 presents a signature bound to the wrong network
        let bytes = hex::decode(tx_hash()).unwrap();
        let wrong = sign_authorization(&fx.keys[1], &bytes, "ae_mainnet").unwrap();
        let nonce = fx.engine.nonce();
        let err = fx
            .engine
            .confirm(
                &fx.chain,
                &fx.keys[1].public_key_hex(),
                &id,
                &wrong,
                nonce,
            )
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);

        // a signature from a different member does not transfer
        let borrowed = signature_for(&fx.keys[2], &tx_hash());
        let nonce = fx.engine.nonce();
        let err = fx
            .engine
            .confirm(
                &fx.chain,
                &fx.keys[1].public_key_hex(),
                &id,
                &borrowed,
                nonce,
            )
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn test_stale_nonce_rejected_in_both_directions() {
        let mut fx = fixture(2, 3);
        let hash = tx_hash();
        let sig = signature_for(&fx.keys[0], &hash);
        let caller = fx.keys[0].public_key_hex();

        let err = fx
            .engine
            .propose(&fx.chain, &caller, &hash, DEFAULT_TTL, &sig, 0)
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::StaleNonce {
                expected: 1,
                claimed: 0
            }
        );
        assert_eq!(err.code(), "ERROR_NONCE_TOO_LOW");

        let err = fx
            .engine
            .propose(&fx.chain, &caller, &hash, DEFAULT_TTL, &sig, 2)
            .unwrap_err();
        assert_eq!(err.code(), "ERROR_NONCE_TOO_HIGH");

        // nothing was created
        assert!(fx.engine.open_proposal().is_none());
    }

    #[test]
    fn test_authorize_is_single_use() {
        let mut fx = fixture(2, 3);
        let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();
        confirm(&mut fx, 1, &id).unwrap();

        assert_eq!(fx.engine.nonce(), 1);
        authorize(&mut fx, &id).unwrap();

        // the counter advanced by exactly one
        assert_eq!(fx.engine.nonce(), 2);

        // replaying the call cannot succeed again
        let err = fx
            .engine
            .authorize(&fx.chain, &id, b"signed-spend-tx", 1)
            .unwrap_err();
        assert_eq!(err, AuthError::AlreadyResolved(id.clone()));
        assert_eq!(err.code(), "ERROR_TX_ALREADY_RESOLVED");
        assert_eq!(fx.engine.nonce(), 2);
    }

    #[test]
    fn test_fresh_proposal_after_authorization() {
        let mut fx = fixture(1, 2);
        let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();
        authorize(&mut fx, &id).unwrap();

        // the old nonce no longer validates
        let hash = tx_hash();
        let sig = signature_for(&fx.keys[1], &hash);
        let err = fx
            .engine
            .propose(
                &fx.chain,
                &fx.keys[1].public_key_hex(),
                &hash,
                DEFAULT_TTL,
                &sig,
                1,
            )
            .unwrap_err();
        assert_eq!(err.code(), "ERROR_NONCE_TOO_LOW");

        // a fresh claim opens a new slot with a new id
        let id2 = propose(&mut fx, 1, DEFAULT_TTL).unwrap();
        assert_ne!(id, id2);
    }

    #[test]
    fn test_propose_frees_expired_slot() {
        let mut fx = fixture(2, 3);
        propose(&mut fx, 0, Ttl::Relative(5)).unwrap();
        fx.chain.advance(10);

        // first call retires the stale proposal and reports the expiry
        assert_eq!(
            propose(&mut fx, 1, DEFAULT_TTL),
            Err(AuthError::TxAlreadyExpired)
        );
        // the slot is now free
        propose(&mut fx, 1, DEFAULT_TTL).unwrap();
    }

    #[test]
    fn test_fixed_ttl_in_past_rejected_at_creation() {
        let mut fx = fixture(2, 3);

        assert_eq!(
            propose(&mut fx, 0, Ttl::Fixed(100)),
            Err(AuthError::TxAlreadyExpired)
        );
        assert!(fx.engine.open_proposal().is_none());

        propose(&mut fx, 0, Ttl::Fixed(101)).unwrap();
    }

    #[test]
    fn test_unknown_and_missing_proposals() {
        let mut fx = fixture(2, 3);
        let bogus = ProposalId::new("deadbeef");

        // nothing proposed yet
        assert_eq!(confirm(&mut fx, 0, &bogus), Err(AuthError::NothingProposed));

        propose(&mut fx, 0, DEFAULT_TTL).unwrap();
        assert_eq!(
            confirm(&mut fx, 1, &bogus),
            Err(AuthError::ProposalNotFound(bogus.clone()))
        );
    }

    #[test]
    fn test_malformed_tx_hash_rejected() {
        let mut fx = fixture(2, 3);
        let caller = fx.keys[0].public_key_hex();
        let sig = signature_for(&fx.keys[0], &tx_hash());

        let err = fx
            .engine
            .propose(&fx.chain, &caller, "abcd", DEFAULT_TTL, &sig, 1)
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedTxHash(_)));
    }

    #[test]
    fn test_consensus_info_reports_unretired_expiry() {
        let mut fx = fixture(2, 3);
        let id = propose(&mut fx, 0, Ttl::Relative(5)).unwrap();
        fx.chain.advance(10);

        // read-only query: still Open, but flagged expired
        let info = fx.engine.consensus_info(&fx.chain, &id).unwrap();
        assert_eq!(info.status, ProposalStatus::Open);
        assert!(info.expired);
        assert_eq!(info.expires_at_height, 105);
        assert!(fx.engine.open_proposal().is_some());
    }

    #[test]
    fn test_authorize_quorum_across_thresholds() {
        for (threshold, signers) in [(1u8, 1usize), (1, 3), (2, 3), (3, 3)] {
            let mut fx = fixture(threshold, signers);
            let id = propose(&mut fx, 0, DEFAULT_TTL).unwrap();
            for i in 1..threshold as usize {
                confirm(&mut fx, i, &id).unwrap();
            }
            // exactly threshold confirmations suffice
            authorize(&mut fx, &id).unwrap();
        }
    }
}
