//! CLI module for Credbridge
//!
//! Provides commands:
//! - `migrate`: move remembered plaintext passwords into the credential store
//! - `store` / `lookup`: write or check one account's password
//! - `key`: show the store key of an account
//! - `doctor`: backend and configuration diagnostics

use crate::settings::AppConfig;
use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use credbridge_core::{AccountIdentity, CredentialBackend, CredentialBridge};
use std::path::PathBuf;

pub mod doctor;
pub mod lookup;
pub mod migrate;
pub mod store;

/// Credbridge CLI
#[derive(Parser, Debug)]
#[command(name = "credbridge")]
#[command(about = "Keep chat-account passwords in the platform credential store")]
#[command(version)]
pub struct Cli {
    /// Accounts file (overrides configuration)
    #[arg(long, global = true)]
    pub accounts: Option<PathBuf>,

    /// Credential backend (overrides configuration)
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<CredentialBackend>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load stored passwords and migrate remembered plaintext ones
    Migrate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Do not rewrite the accounts file
        #[arg(long)]
        dry_run: bool,
    },
    /// Store a password for one account
    Store {
        #[command(flatten)]
        account: AccountArgs,
        /// Read the password from standard input instead of prompting
        #[arg(long)]
        stdin: bool,
    },
    /// Check whether a password is stored for one account
    Lookup {
        #[command(flatten)]
        account: AccountArgs,
        /// Print the password itself
        #[arg(long)]
        reveal: bool,
    },
    /// Print the store key of an account
    Key {
        #[command(flatten)]
        account: AccountArgs,
    },
    /// Run diagnostics
    Doctor,
}

/// Account selection shared by per-account commands
#[derive(Args, Debug, Clone)]
pub struct AccountArgs {
    /// Protocol identifier (e.g., prpl-aim)
    #[arg(long)]
    pub protocol: String,
    /// Account username
    #[arg(long)]
    pub username: String,
}

impl AccountArgs {
    pub fn identity(&self) -> AccountIdentity {
        AccountIdentity::new(&self.protocol, &self.username)
    }
}

fn parse_backend(value: &str) -> Result<CredentialBackend, String> {
    match value {
        "auto" => Ok(CredentialBackend::Auto),
        "native" => Ok(CredentialBackend::Native),
        "memory" => Ok(CredentialBackend::Memory),
        other => Err(format!("unknown backend '{other}' (expected auto, native or memory)")),
    }
}

/// Effective settings after applying CLI overrides
pub struct CliContext {
    pub config: AppConfig,
    pub backend: CredentialBackend,
    pub accounts: Option<PathBuf>,
}

impl CliContext {
    pub fn accounts_path(&self) -> anyhow::Result<PathBuf> {
        match &self.accounts {
            Some(path) => Ok(path.clone()),
            None => self.config.accounts.resolve(),
        }
    }

    pub fn open_bridge(&self) -> anyhow::Result<CredentialBridge> {
        CredentialBridge::open(self.backend, self.config.bridge.clone())
            .context("Failed to open credential store")
    }
}

/// Run the CLI command
pub fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let ctx = CliContext {
        backend: cli.backend.unwrap_or(config.store.backend),
        accounts: cli.accounts,
        config,
    };

    match cli.command {
        Some(Commands::Migrate { json, dry_run }) => migrate::run(&ctx, json, dry_run),
        Some(Commands::Store { account, stdin }) => store::run(&ctx, &account, stdin),
        Some(Commands::Lookup { account, reveal }) => lookup::run(&ctx, &account, reveal),
        Some(Commands::Key { account }) => {
            println!("{}", account.identity().store_key());
            Ok(())
        }
        Some(Commands::Doctor) => doctor::run(&ctx),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
