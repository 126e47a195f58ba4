//! stat command - Show metadata for a path

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::fs::{Filesystem, ForgeFs};

pub async fn stat(fs: &ForgeFs, path: &str, out: &mut impl Write) -> Result<()> {
    let info = fs
        .stat(path)
        .await
        .with_context(|| format!("Failed to stat '{}'", path))?;
    let entry = fs.find_entry(path).await;

    let kind = if info.is_dir() { "directory" } else { "file" };
    let name = if info.name.is_empty() { "/" } else { info.name.as_str() };
    writeln!(out, "  Name: {}", name)?;
    writeln!(out, "  Type: {}", kind)?;
    writeln!(out, "  Size: {}", info.size)?;
    writeln!(out, "  Mode: {}", info.mode)?;
    if let Some(sha) = entry.and_then(|e| e.sha) {
        writeln!(out, "   SHA: {}", sha)?;
    }
    Ok(())
}
