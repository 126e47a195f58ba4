//! cat command - Print a file's contents

use std::io::Write;

use anyhow::{bail, Context as _, Result};

use crate::fs::{Filesystem, ForgeFs};

/// Write the raw bytes of a file.
pub async fn cat(fs: &ForgeFs, path: &str, out: &mut impl Write) -> Result<()> {
    let handle = fs
        .open(path)
        .await
        .with_context(|| format!("Failed to open '{}'", path))?;

    match handle.contents() {
        Some(bytes) => out.write_all(bytes)?,
        None => bail!("'{}' is a directory", path),
    }
    Ok(())
}
