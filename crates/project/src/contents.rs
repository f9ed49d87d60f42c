//! Content pool: whole-file deduplicated blob storage
//!
//! Blobs live under `.mvcs/contents/<blobId>` and are immutable once
//! written (blob ids are always fresh), so their hashes are cached for
//! the session instead of being recomputed on every dedup scan.

use crate::project::{Project, DUMMY_CONTENT};
use anyhow::{Context, Result};
use mvcs_core::ContentHash;
use std::collections::BTreeSet;

impl Project {
    /// Hash of a pool blob, computed at most once per session
    pub(crate) fn blob_hash(&self, content_id: &str) -> Result<ContentHash> {
        if let Some(cached) = self.blob_hashes.get(content_id) {
            return Ok(*cached);
        }

        let path = self.blob_path(content_id);
        let hash = self
            .services
            .storage
            .hash_file(&path)
            .with_context(|| format!("Blob {} is missing from the content pool", content_id))?;

        self.blob_hashes.insert(content_id.to_string(), hash);
        Ok(hash)
    }

    /// Promote a working-tree file into the content pool
    ///
    /// Returns the id of an existing blob with identical bytes when there
    /// is one (a moved or duplicated file never creates a second blob);
    /// otherwise copies the file under a fresh blob id.
    pub(crate) fn add_content(&self, rel_path: &str) -> Result<String> {
        let source = self.abs_path(rel_path);
        let new_hash = self.services.storage.hash_file(&source)?;

        let mut scanned = BTreeSet::new();
        for item in self.items.values() {
            if item.content == DUMMY_CONTENT || !scanned.insert(item.content.as_str()) {
                continue;
            }
            if self.blob_hash(&item.content)? == new_hash {
                tracing::debug!(path = rel_path, blob = %item.content, "Content dedup hit");
                return Ok(item.content.clone());
            }
        }

        let blob_id = self.services.ids.next_id();
        self.services
            .storage
            .copy_file(&source, &self.blob_path(&blob_id))
            .with_context(|| format!("Failed to store content of {}", rel_path))?;
        self.blob_hashes.insert(blob_id.clone(), new_hash);

        Ok(blob_id)
    }
}
