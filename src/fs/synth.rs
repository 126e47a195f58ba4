//! fs::synth
//!
//! Turning snapshot entries into handles.
//!
//! # Design
//!
//! Files are materialized by fetching and decoding their blob. Directories
//! are synthesized on every open from the flat entry list, one level deep:
//! an entry is a child of `dir` iff its parent path equals `dir`. The
//! resulting [`MemDir`] is a throwaway view; nothing about it is cached.

use base64::Engine;
use tracing::debug;

use super::error::{FsError, Result};
use crate::core::path;
use crate::core::tree::{EntryKind, FilesystemSnapshot, TreeSnapshot};
use crate::forge::{Blob, BlobEncoding, Forge};
use crate::mem::{Handle, MemDir, MemFile};

/// Open `raw_path` against the snapshot.
pub(crate) async fn open(
    forge: &dyn Forge,
    snapshot: &FilesystemSnapshot,
    raw_path: &str,
) -> Result<Handle> {
    let normalized = path::normalize(raw_path);
    if path::is_root(normalized) {
        return Ok(Handle::Dir(list_dir(&snapshot.tree, normalized)));
    }

    let Some(entry) = snapshot.tree.find(normalized) else {
        debug!(path = normalized, "open: no entry");
        return Err(FsError::NotFound(normalized.to_string()));
    };

    match (entry.kind, &entry.sha) {
        (EntryKind::Blob, Some(sha)) => {
            let blob = forge.get_blob(sha).await?;
            let contents = decode_blob(normalized, &blob)?;
            Ok(Handle::File(MemFile::with_contents(entry.name(), contents)))
        }
        // Nothing to fetch
        (EntryKind::Blob, None) => Err(FsError::NotFound(normalized.to_string())),
        (EntryKind::Tree, _) => Ok(Handle::Dir(list_dir(&snapshot.tree, normalized))),
    }
}

/// Single-level listing of `dir` (`""` for the root).
pub(crate) fn list_dir(tree: &TreeSnapshot, dir: &str) -> MemDir {
    let mut listing = MemDir::new(path::base_name(dir));
    for child in tree.children(dir) {
        match child.kind {
            EntryKind::Blob => listing.add_file(child.name(), child.size.unwrap_or(0)),
            EntryKind::Tree => listing.add_dir(child.name()),
        }
    }
    listing
}

/// Raw bytes of a fetched blob.
///
/// Base64 content arrives wrapped across lines, so whitespace is dropped
/// before decoding.
pub(crate) fn decode_blob(path: &str, blob: &Blob) -> Result<Vec<u8>> {
    match blob.encoding {
        BlobEncoding::Utf8 => Ok(blob.content.clone().into_bytes()),
        BlobEncoding::Base64 => {
            let compact: String = blob
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| FsError::InvalidBlob {
                    path: path.to_string(),
                    message: e.to_string(),
                })
        }
    }
}
