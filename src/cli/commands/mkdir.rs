//! mkdir command - Create a directory in the local snapshot

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::fs::{Filesystem, ForgeFs};
use crate::mem::FileMode;

pub async fn mkdir(fs: &ForgeFs, path: &str, parents: bool, out: &mut impl Write) -> Result<()> {
    let result = if parents {
        fs.mkdir_all(path, FileMode::DIR).await
    } else {
        fs.mkdir(path, FileMode::DIR).await
    };
    result.with_context(|| format!("Failed to create directory '{}'", path))?;

    writeln!(out, "created {} (local only, nothing committed)", path)?;
    Ok(())
}
