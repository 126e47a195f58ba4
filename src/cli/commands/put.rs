//! put command - Write a file with one commit

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::fs::ForgeFs;

pub async fn put(fs: &ForgeFs, path: &str, contents: &[u8], out: &mut impl Write) -> Result<()> {
    fs.write_file(path, contents)
        .await
        .with_context(|| format!("Failed to write '{}'", path))?;

    writeln!(
        out,
        "wrote {} bytes to {} (head {})",
        contents.len(),
        path,
        super::head(fs).await
    )?;
    Ok(())
}
