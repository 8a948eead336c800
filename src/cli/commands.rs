//! CLI command handlers
//!
//! Each handler loads the persisted state, drives the authorization service
//! against the local chain stub, and saves the result. Signer keys are
//! always passed per invocation; nothing secret is ever written to disk.

use crate::crypto::{sign_authorization, KeyPair};
use crate::ledger::{ChainClient, LocalChain};
use crate::proposal::{ProposalId, Ttl};
use crate::service::{AccountService, ServiceError};
use crate::signer::SignerSet;
use crate::storage::{PersistedState, Storage, StorageConfig};
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub service: AccountService,
    pub chain: LocalChain,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state, loading any previously saved data
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };
        let storage = Storage::new(storage_config)?;

        let (service, chain) = if storage.exists() {
            let state = storage.load()?;
            (AccountService::restore(state.accounts), state.chain)
        } else {
            (AccountService::new(), LocalChain::new())
        };

        Ok(Self {
            service,
            chain,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&PersistedState {
            chain: self.chain.clone(),
            accounts: self.service.snapshot()?,
        })?;
        Ok(())
    }
}

/// Print a rejection the way the protocol reports it
fn report_rejection(err: &ServiceError) {
    match err {
        ServiceError::Auth(auth_err) => {
            println!("❌ Rejected: {} [{}]", auth_err, auth_err.code());
        }
        other => println!("❌ Failed: {}", other),
    }
}

/// Generate a fresh signer key pair and print it
pub fn cmd_keygen() -> CliResult<()> {
    let key_pair = KeyPair::generate();

    println!("🔑 New signer key pair");
    println!("   Address:     {}", key_pair.address());
    println!("   Public key:  {}", key_pair.public_key_hex());
    println!("   Private key: {}", key_pair.private_key_hex());
    println!("\n   ⚠️  The private key is NOT stored anywhere. Keep it safe.");

    Ok(())
}

/// Register a generalized account for a fixed signer set
pub fn cmd_init(
    state: &mut AppState,
    threshold: u8,
    signers: Vec<String>,
    network_id: &str,
) -> CliResult<()> {
    let signer_set = SignerSet::new(threshold, signers)?;
    let description = signer_set.description();
    let address = state.service.register(signer_set, network_id)?;
    state.save()?;

    println!("✅ Generalized account registered!");
    println!("   📍 Address:  {}", address);
    println!("   👥 Signers:  {}", description);
    println!("   🌐 Network:  {}", network_id);

    Ok(())
}

/// Advance the local chain by the given number of blocks
pub fn cmd_tick(state: &mut AppState, blocks: u64) -> CliResult<()> {
    let height = state.chain.advance(blocks);
    state.save()?;

    println!("⛓️  Chain advanced by {} block(s), height is now {}", blocks, height);

    Ok(())
}

/// Propose a transaction for authorization
pub fn cmd_propose(
    state: &mut AppState,
    account: &str,
    tx_hash: &str,
    ttl: Ttl,
    private_key_hex: &str,
    nonce: Option<u64>,
) -> CliResult<()> {
    let key_pair = KeyPair::from_private_key_hex(private_key_hex)?;
    let caller = key_pair.public_key_hex();

    let claimed_nonce = match nonce {
        Some(n) => n,
        None => state.service.with_account(account, |a| a.engine.nonce())?,
    };

    let network_id = state
        .service
        .with_account(account, |a| a.engine.network_id().to_string())?;
    let tx_hash_bytes = hex::decode(tx_hash)?;
    let signature = sign_authorization(&key_pair, &tx_hash_bytes, &network_id)?;

    match state.service.propose(
        &state.chain,
        account,
        &caller,
        tx_hash,
        ttl,
        &signature,
        claimed_nonce,
    ) {
        Ok(id) => {
            state.save()?;
            println!("✅ Transaction proposed!");
            println!("   🆔 Proposal id: {}", id);
            println!("   ✍️  Proposer auto-confirmed");
            print_consensus(state, account, &id)?;
        }
        Err(err) => {
            state.save()?; // the rejection may have retired an expired proposal
            report_rejection(&err);
        }
    }

    Ok(())
}

/// Confirm an open proposal
pub fn cmd_confirm(
    state: &mut AppState,
    account: &str,
    proposal_id: &str,
    private_key_hex: &str,
    nonce: Option<u64>,
) -> CliResult<()> {
    let key_pair = KeyPair::from_private_key_hex(private_key_hex)?;
    let caller = key_pair.public_key_hex();
    let id = ProposalId::new(proposal_id);

    let claimed_nonce = match nonce {
        Some(n) => n,
        None => state.service.with_account(account, |a| a.engine.nonce())?,
    };

    let (network_id, tx_hash) = state.service.with_account(account, |a| {
        let tx_hash = a
            .engine
            .open_proposal()
            .map(|p| p.tx_hash.clone())
            .unwrap_or_default();
        (a.engine.network_id().to_string(), tx_hash)
    })?;
    let tx_hash_bytes = hex::decode(&tx_hash).unwrap_or_default();
    let signature = sign_authorization(&key_pair, &tx_hash_bytes, &network_id).unwrap_or_default();

    match state.service.confirm(
        &state.chain,
        account,
        &caller,
        &id,
        &signature,
        claimed_nonce,
    ) {
        Ok(()) => {
            state.save()?;
            println!("✅ Confirmation recorded for signer {}", key_pair.address());
            print_consensus(state, account, &id)?;
        }
        Err(err) => {
            state.save()?; // the rejection may have retired an expired proposal
            report_rejection(&err);
        }
    }

    Ok(())
}

/// Authorize an approved proposal and submit the gated payload
pub fn cmd_authorize(
    state: &mut AppState,
    account: &str,
    proposal_id: &str,
    payload_hex: &str,
    nonce: Option<u64>,
) -> CliResult<()> {
    let id = ProposalId::new(proposal_id);
    let payload = hex::decode(payload_hex)?;

    let claimed_nonce = match nonce {
        Some(n) => n,
        None => state.service.with_account(account, |a| a.engine.nonce())?,
    };

    let result = {
        let AppState { service, chain, .. } = state;
        service.authorize_and_submit(chain, account, &id, &payload, claimed_nonce)
    };
    match result {
        Ok((grant, tx_id)) => {
            state.save()?;
            println!("✅ Transaction authorized and submitted!");
            println!("   🆔 Proposal id: {}", grant.proposal_id);
            println!("   🔢 Nonce consumed: {}", grant.nonce);
            println!("   📦 Ledger tx id: {}", tx_id);
        }
        Err(err) => {
            state.save()?;
            report_rejection(&err);
        }
    }

    Ok(())
}

/// Show chain height and account status
pub fn cmd_status(state: &AppState, account: Option<&str>) -> CliResult<()> {
    println!("⛓️  Chain height: {}", state.chain.current_height());
    println!("📦 Submitted transactions: {}", state.chain.submitted().len());

    let addresses = match account {
        Some(addr) => vec![addr.to_string()],
        None => state.service.addresses(),
    };

    if addresses.is_empty() {
        println!("\n   No accounts registered yet. Use `gamsig init` to create one.");
        return Ok(());
    }

    for address in addresses {
        let (description, nonce, open) = state.service.with_account(&address, |a| {
            (
                a.engine.signer_set().description(),
                a.engine.nonce(),
                a.engine.open_proposal().cloned(),
            )
        })?;

        println!("\n📍 Account {}", address);
        println!("   👥 Signers: {}", description);
        println!("   🔢 Next nonce: {}", nonce);

        match open {
            Some(proposal) => {
                println!("   📄 Open proposal: {}", proposal.id);
                println!("      Tx hash:       {}", proposal.tx_hash);
                println!(
                    "      Confirmations: {}",
                    proposal.confirmation_count()
                );
                println!("      Expires at:    height {}", proposal.expires_at_height);
                if proposal.is_expired(state.chain.current_height()) {
                    println!("      ⚠️  Validity window has elapsed");
                }
            }
            None => println!("   📄 No open proposal"),
        }
    }

    Ok(())
}

fn print_consensus(state: &AppState, account: &str, id: &ProposalId) -> CliResult<()> {
    if let Some(info) = state.service.consensus_info(&state.chain, account, id)? {
        println!(
            "   📊 Consensus: {}/{} confirmations, expires at height {}",
            info.confirmed_by.len(),
            info.confirmations_required,
            info.expires_at_height
        );
    }
    Ok(())
}
