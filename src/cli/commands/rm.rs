//! rm command - Remove a file or directory contents

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::fs::{Filesystem, ForgeFs};

pub async fn rm(fs: &ForgeFs, path: &str, recursive: bool, out: &mut impl Write) -> Result<()> {
    let result = if recursive {
        fs.remove_all(path).await
    } else {
        fs.remove(path).await
    };
    result.with_context(|| format!("Failed to remove '{}'", path))?;

    writeln!(out, "removed {} (head {})", path, super::head(fs).await)?;
    Ok(())
}
