//! `credbridge doctor`

use super::CliContext;
use anyhow::Result;
use credbridge_core::{preferences, AccountRegistry, FileRegistry, PLUGIN_INFO};

pub fn run(ctx: &CliContext) -> Result<()> {
    println!("🏥 Credbridge Doctor\n");
    println!(
        "Plugin: {} ({}) v{}",
        PLUGIN_INFO.name, PLUGIN_INFO.id, PLUGIN_INFO.version
    );
    println!("  {}\n", PLUGIN_INFO.summary);

    let mut all_ok = true;

    print!("Checking credential store... ");
    let bridge = match ctx.open_bridge() {
        Ok(bridge) => {
            println!("✅ {} ({:?})", bridge.store_name(), ctx.backend.resolve());
            println!("  persistence = {}", bridge.persistence_scope());
            Some(bridge)
        }
        Err(e) => {
            println!("❌ {e:#}");
            all_ok = false;
            None
        }
    };

    let bridge_config = &ctx.config.bridge;
    println!("\nSettings:");
    for pref in preferences() {
        println!("  {} ({}): default {}", pref.label, pref.path, pref.default);
    }
    println!(
        "  clear_secret_after_store = {}",
        bridge_config.clear_secret_after_store
    );
    println!("  repair_contamination = {}", bridge_config.repair_contamination);
    match bridge_config.platform_timeout() {
        Some(timeout) => println!("  platform_timeout = {timeout:?}"),
        None => println!("  platform_timeout = none"),
    }

    let path = ctx.accounts_path()?;
    print!("\nChecking accounts file {}... ", path.display());
    if !path.exists() {
        println!("⚪ not found");
    } else {
        match FileRegistry::open(&path) {
            Ok(registry) => {
                println!("✅ {} account(s)", registry.accounts().len());
                for account in registry.accounts() {
                    let plaintext = registry.remember_secret(&account) && registry.has_secret(&account);
                    let stored = match &bridge {
                        Some(bridge) => match bridge.retrieve(&account) {
                            Ok(Some(_)) => "stored",
                            Ok(None) => "not stored",
                            Err(_) => {
                                all_ok = false;
                                "unreadable"
                            }
                        },
                        None => "unknown",
                    };
                    let marker = if plaintext { "⚠️  plaintext" } else { "✅" };
                    println!("  {marker} {account}: {stored}");
                }
            }
            Err(e) => {
                println!("❌ {e}");
                all_ok = false;
            }
        }
    }

    println!();
    if all_ok {
        println!("✅ All checks passed.");
    } else {
        println!("⚠️  Some checks failed. Please fix the issues above.");
        std::process::exit(1);
    }
    Ok(())
}
