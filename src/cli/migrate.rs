//! `credbridge migrate`

use super::CliContext;
use anyhow::{bail, Context as _, Result};
use credbridge_core::{CredentialBackend, FileRegistry, Lifecycle, MigrationReport};
use tracing::info;

pub fn run(ctx: &CliContext, json: bool, dry_run: bool) -> Result<()> {
    if ctx.backend.resolve() == CredentialBackend::Memory && !dry_run {
        bail!(
            "The memory backend forgets everything on exit; migrating would drop plaintext \
             passwords. Use --dry-run or the native backend."
        );
    }

    let path = ctx.accounts_path()?;
    let registry = FileRegistry::open(&path)
        .with_context(|| format!("Failed to open accounts file {}", path.display()))?;
    let bridge = ctx.open_bridge()?;

    let mut lifecycle = Lifecycle::new(bridge, registry);
    let report = lifecycle.load();

    if dry_run {
        info!("Dry run: accounts file left unchanged");
    } else {
        lifecycle
            .registry()
            .save()
            .with_context(|| format!("Failed to save accounts file {}", path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_clean() {
        bail!("{} account(s) could not be processed", report.failed.len());
    }
    Ok(())
}

fn print_report(report: &MigrationReport) {
    println!("🔐 Credential migration\n");
    for account in &report.rehydrated {
        println!("  ✅ {account}: loaded from credential store");
    }
    for account in &report.migrated {
        println!("  ✅ {account}: moved out of plaintext");
    }
    for account in &report.missing {
        println!("  ⚪ {account}: no saved password");
    }
    for failure in &report.failed {
        println!("  ❌ {}: {}", failure.account, failure.error);
    }
    if report.rehydrated.is_empty()
        && report.migrated.is_empty()
        && report.missing.is_empty()
        && report.failed.is_empty()
    {
        println!("  (no accounts)");
    }
}
