//! mv command - Rename a path

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::fs::{Filesystem, ForgeFs};

pub async fn mv(fs: &ForgeFs, old: &str, new: &str, out: &mut impl Write) -> Result<()> {
    fs.rename(old, new)
        .await
        .with_context(|| format!("Failed to rename '{}' to '{}'", old, new))?;

    writeln!(out, "renamed {} -> {} (head {})", old, new, super::head(fs).await)?;
    Ok(())
}
