//! Generalized-account multisig CLI
//!
//! A command-line tool for driving the multi-signature authorization
//! lifecycle: register a signer set, propose a transaction, collect
//! confirmations, and authorize execution once quorum is reached.

use clap::{Parser, Subcommand};
use ga_multisig::cli::{self, AppState};
use ga_multisig::proposal::Ttl;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gamsig")]
#[command(version = "0.1.0")]
#[command(about = "Multi-signature authorization for generalized accounts", long_about = None)]
struct Cli {
    /// Data directory for persisted state
    #[arg(short, long, default_value = ".gamsig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh signer key pair (printed, never stored)
    Keygen,

    /// Register a generalized account for a fixed signer set
    Init {
        /// Confirmations required to authorize (T in T-of-N)
        #[arg(short, long)]
        threshold: u8,

        /// Signer public keys (hex), repeat for each signer
        #[arg(short, long = "signer", required = true)]
        signers: Vec<String>,

        /// Network the account lives on
        #[arg(short, long, default_value = "ae_devnet")]
        network_id: String,
    },

    /// Propose a transaction for authorization
    Propose {
        /// Generalized account address
        #[arg(short, long)]
        account: String,

        /// Hash of the transaction to authorize (hex, 32 bytes)
        #[arg(long)]
        tx_hash: String,

        /// Blocks the proposal stays valid after creation
        #[arg(long, default_value = "200", conflicts_with = "expires_at")]
        ttl: u64,

        /// Absolute expiry height (instead of --ttl)
        #[arg(long)]
        expires_at: Option<u64>,

        /// Proposer's private key (hex)
        #[arg(short, long)]
        key: String,

        /// Claimed nonce (defaults to the account's current value)
        #[arg(long)]
        nonce: Option<u64>,
    },

    /// Confirm an open proposal
    Confirm {
        /// Generalized account address
        #[arg(short, long)]
        account: String,

        /// Proposal id printed by propose
        #[arg(short, long)]
        proposal: String,

        /// Confirming signer's private key (hex)
        #[arg(short, long)]
        key: String,

        /// Claimed nonce (defaults to the account's current value)
        #[arg(long)]
        nonce: Option<u64>,
    },

    /// Authorize an approved proposal and submit its payload
    Authorize {
        /// Generalized account address
        #[arg(short, long)]
        account: String,

        /// Proposal id printed by propose
        #[arg(short, long)]
        proposal: String,

        /// Raw signed payload to submit on success (hex)
        #[arg(long)]
        payload: String,

        /// Claimed nonce (defaults to the account's current value)
        #[arg(long)]
        nonce: Option<u64>,
    },

    /// Show chain height and account status
    Status {
        /// Limit output to one account
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Advance the local chain
    Tick {
        /// Number of blocks to advance
        #[arg(short, long, default_value = "1")]
        blocks: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Keygen needs no state
    if let Commands::Keygen = cli.command {
        return cli::cmd_keygen();
    }

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Keygen => unreachable!(),

        Commands::Init {
            threshold,
            signers,
            network_id,
        } => {
            cli::cmd_init(&mut state, threshold, signers, &network_id)?;
        }

        Commands::Propose {
            account,
            tx_hash,
            ttl,
            expires_at,
            key,
            nonce,
        } => {
            let ttl = match expires_at {
                Some(height) => Ttl::Fixed(height),
                None => Ttl::Relative(ttl),
            };
            cli::cmd_propose(&mut state, &account, &tx_hash, ttl, &key, nonce)?;
        }

        Commands::Confirm {
            account,
            proposal,
            key,
            nonce,
        } => {
            cli::cmd_confirm(&mut state, &account, &proposal, &key, nonce)?;
        }

        Commands::Authorize {
            account,
            proposal,
            payload,
            nonce,
        } => {
            cli::cmd_authorize(&mut state, &account, &proposal, &payload, nonce)?;
        }

        Commands::Status { account } => {
            cli::cmd_status(&state, account.as_deref())?;
        }

        Commands::Tick { blocks } => {
            cli::cmd_tick(&mut state, blocks)?;
        }
    }

    Ok(())
}
