//! ls command - List a directory

use std::io::Write;

use anyhow::{Context as _, Result};

use crate::fs::{Filesystem, ForgeFs};

/// Print one line per child: mode, size, name (directories end in `/`).
pub async fn ls(fs: &ForgeFs, path: &str, out: &mut impl Write) -> Result<()> {
    let handle = fs
        .open(path)
        .await
        .with_context(|| format!("Failed to open '{}'", path))?;

    if !handle.is_dir() {
        let info = handle.stat();
        writeln!(out, "{} {:>10} {}", info.mode, info.size, info.name)?;
        return Ok(());
    }

    for child in handle.read_dir()? {
        let suffix = if child.is_dir() { "/" } else { "" };
        writeln!(out, "{} {:>10} {}{}", child.mode, child.size, child.name, suffix)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{mounted, text};

    #[tokio::test]
    async fn lists_root_one_level() {
        let (_, fs) = mounted(&[
            ("README.md", b"hello".as_slice()),
            ("docs/guide.md", b"guide".as_slice()),
        ])
        .await;

        let mut out = Vec::new();
        ls(&fs, "", &mut out).await.unwrap();
        let text = text(out);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("000644"));
        assert!(lines[0].ends_with(" 5 README.md"));
        assert!(lines[1].starts_with("040000"));
        assert!(lines[1].ends_with("docs/"));
    }

    #[tokio::test]
    async fn missing_directory_errors() {
        let (_, fs) = mounted(&[]).await;
        let err = ls(&fs, "nope", &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
