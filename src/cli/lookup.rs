//! `credbridge lookup`

use super::{AccountArgs, CliContext};
use anyhow::{bail, Result};

pub fn run(ctx: &CliContext, account: &AccountArgs, reveal: bool) -> Result<()> {
    let identity = account.identity();
    let bridge = ctx.open_bridge()?;

    match bridge.retrieve(&identity)? {
        Some(secret) if reveal => println!("{}", secret.expose()),
        Some(secret) => println!(
            "✅ {identity}: password stored ({} characters)",
            secret.expose().chars().count()
        ),
        None => bail!("No password stored for {identity}"),
    }
    Ok(())
}
