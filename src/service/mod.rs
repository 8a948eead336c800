//! Multi-account authorization service
//!
//! Drives many generalized accounts at once. Each account's engine is an
//! independently locked unit of work: calls against the same account
//! serialize on its mutex, while distinct accounts proceed in parallel.

use crate::auth::{AuthEngine, AuthError, AuthGrant, ConsensusInfo};
use crate::ledger::{ChainClient, LedgerError};
use crate::proposal::{ProposalId, Ttl};
use crate::signer::SignerSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
    #[error("Account already registered: {0}")]
    AccountExists(String),
    #[error("Account state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// One generalized account and its authorization engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GaAccount {
    /// Address derived from the account's signer set
    pub address: String,
    /// The account's authorization state
    pub engine: AuthEngine,
}

/// Serializable snapshot of every registered account
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceSnapshot {
    pub accounts: HashMap<String, GaAccount>,
}

/// Coordinates authorization engines for many accounts
#[derive(Debug, Default)]
pub struct AccountService {
    accounts: RwLock<HashMap<String, Arc<Mutex<GaAccount>>>>,
}

impl AccountService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a service from a persisted snapshot
    pub fn restore(snapshot: ServiceSnapshot) -> Self {
        let accounts = snapshot
            .accounts
            .into_iter()
            .map(|(address, account)| (address, Arc::new(Mutex::new(account))))
            .collect();
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    /// Register a generalized account for the given signer set.
    ///
    /// The address is derived from the set, so registering the same set and
    /// threshold twice is rejected rather than silently replacing state.
    pub fn register(
        &self,
        signer_set: SignerSet,
        network_id: &str,
    ) -> Result<String, ServiceError> {
        let engine = AuthEngine::new(signer_set, network_id);
        let address = engine.account_address();

        let mut accounts = self.accounts.write().map_err(|_| ServiceError::Poisoned)?;
        if accounts.contains_key(&address) {
            return Err(ServiceError::AccountExists(address));
        }

        log::info!(
            "registered generalized account {} ({})",
            address,
            engine.signer_set().description()
        );
        accounts.insert(
            address.clone(),
            Arc::new(Mutex::new(GaAccount {
                address: address.clone(),
                engine,
            })),
        );
        Ok(address)
    }

    fn account(&self, address: &str) -> Result<Arc<Mutex<GaAccount>>, ServiceError> {
        let accounts = self.accounts.read().map_err(|_| ServiceError::Poisoned)?;
        accounts
            .get(address)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownAccount(address.to_string()))
    }

    /// Run a closure under one account's lock
    pub fn with_account<T>(
        &self,
        address: &str,
        f: impl FnOnce(&mut GaAccount) -> T,
    ) -> Result<T, ServiceError> {
        let account = self.account(address)?;
        let mut guard = account.lock().map_err(|_| ServiceError::Poisoned)?;
        Ok(f(&mut guard))
    }

    /// Propose a transaction against one account
    pub fn propose<C: ChainClient>(
        &self,
        chain: &C,
        address: &str,
        caller_pubkey: &str,
        tx_hash: &str,
        ttl: Ttl,
        signature: &str,
        claimed_nonce: u64,
    ) -> Result<ProposalId, ServiceError> {
        let result = self.with_account(address, |account| {
            account
                .engine
                .propose(chain, caller_pubkey, tx_hash, ttl, signature, claimed_nonce)
        })?;
        result.map_err(Into::into)
    }

    /// Confirm an open proposal on behalf of one signer
    pub fn confirm<C: ChainClient>(
        &self,
        chain: &C,
        address: &str,
        caller_pubkey: &str,
        proposal_id: &ProposalId,
        signature: &str,
        claimed_nonce: u64,
    ) -> Result<(), ServiceError> {
        let result = self.with_account(address, |account| {
            account
                .engine
                .confirm(chain, caller_pubkey, proposal_id, signature, claimed_nonce)
        })?;
        result.map_err(Into::into)
    }

    /// Authorize an approved proposal, returning the single-use grant
    pub fn authorize<C: ChainClient>(
        &self,
        chain: &C,
        address: &str,
        proposal_id: &ProposalId,
        auth_payload: &[u8],
        claimed_nonce: u64,
    ) -> Result<AuthGrant, ServiceError> {
        let result = self.with_account(address, |account| {
            account
                .engine
                .authorize(chain, proposal_id, auth_payload, claimed_nonce)
        })?;
        result.map_err(Into::into)
    }

    /// Authorize and immediately submit the gated payload to the ledger
    pub fn authorize_and_submit<C: ChainClient>(
        &self,
        chain: &mut C,
        address: &str,
        proposal_id: &ProposalId,
        auth_payload: &[u8],
        claimed_nonce: u64,
    ) -> Result<(AuthGrant, String), ServiceError> {
        let grant = self.authorize(&*chain, address, proposal_id, auth_payload, claimed_nonce)?;
        let tx_id = chain.submit(&grant.payload)?;
        Ok((grant, tx_id))
    }

    /// Read-only consensus snapshot for a proposal on one account
    pub fn consensus_info<C: ChainClient>(
        &self,
        chain: &C,
        address: &str,
        proposal_id: &ProposalId,
    ) -> Result<Option<ConsensusInfo>, ServiceError> {
        self.with_account(address, |account| {
            account.engine.consensus_info(chain, proposal_id)
        })
    }

    /// Addresses of all registered accounts, sorted
    pub fn addresses(&self) -> Vec<String> {
        match self.accounts.read() {
            Ok(accounts) => {
                let mut addresses: Vec<String> = accounts.keys().cloned().collect();
                addresses.sort();
                addresses
            }
            Err(_) => Vec::new(),
        }
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone out a serializable snapshot of every account
    pub fn snapshot(&self) -> Result<ServiceSnapshot, ServiceError> {
        let accounts = self.accounts.read().map_err(|_| ServiceError::Poisoned)?;
        let mut snapshot = HashMap::new();
        for (address, account) in accounts.iter() {
            let guard = account.lock().map_err(|_| ServiceError::Poisoned)?;
            snapshot.insert(address.clone(), guard.clone());
        }
        Ok(ServiceSnapshot { accounts: snapshot })
    }
}
