//! `credbridge store`

use super::{AccountArgs, CliContext};
use anyhow::{bail, Result};
use credbridge_core::{SecureString, StoreOutcome};
use inquire::Password;
use std::io::BufRead;
use zeroize::Zeroizing;

pub fn run(ctx: &CliContext, account: &AccountArgs, stdin: bool) -> Result<()> {
    let identity = account.identity();
    if !identity.is_unambiguous() {
        println!("⚠️  Protocol contains '/', the store key may collide with another account");
    }

    let secret = if stdin {
        read_stdin_secret()?
    } else {
        SecureString::new(
            Password::new(&format!("Password for {identity}:"))
                .with_display_mode(inquire::PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()?,
        )
    };

    let bridge = ctx.open_bridge()?;
    match bridge.store(&identity, Some(&secret))? {
        StoreOutcome::Stored => println!("✅ Stored under {}", identity.store_key()),
        StoreOutcome::Skipped => bail!("Empty password, nothing stored"),
    }
    Ok(())
}

fn read_stdin_secret() -> Result<SecureString> {
    let mut buffer = Zeroizing::new(String::new());
    std::io::stdin().lock().read_line(&mut buffer)?;
    Ok(SecureString::new(buffer.trim_end_matches(['\r', '\n'])))
}
