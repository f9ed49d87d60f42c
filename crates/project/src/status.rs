//! Status engine: diff the working tree against the current commit
//!
//! Classification is by content hash, never by timestamps, so a rename or
//! copy is recognized by its bytes and reuses the existing blob.

use crate::model::{Item, ItemChange};
use crate::project::{Project, DUMMY_CONTENT, IGNORED};
use anyhow::Result;
use mvcs_core::storage::normalize_rel_path;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Result of a status computation
#[derive(Debug)]
pub struct Status {
    /// Items visible at the current commit, keyed by item id
    pub last_items: BTreeMap<String, Item>,
    /// Freshly minted items, keyed by their new id
    ///
    /// Items still carrying the `DUMMY` sentinel get their blob allocated
    /// at commit time; rename/copy items already reference an existing
    /// blob.
    pub new_items: BTreeMap<String, Item>,
    /// Changes in candidate order
    pub changes: Vec<ItemChange>,
}

impl Project {
    /// Compute the diff between the working tree and the current commit
    ///
    /// With `files` given, only those paths are examined (deduplicated in
    /// the given order). Otherwise the candidate set is the union of the
    /// current commit's item paths and the working tree scan, project
    /// directory excluded.
    pub fn status(&self, files: Option<&[String]>) -> Result<Status> {
        let storage = &self.services.storage;

        if !storage.is_dir(&self.mvcs_dir()) {
            anyhow::bail!(
                "Project directory {} is missing",
                self.mvcs_dir().display()
            );
        }

        let last_items = match &self.current_commit_id {
            Some(id) => self.commit_items(id)?,
            None => BTreeMap::new(),
        };
        let by_path: BTreeMap<&str, &Item> = last_items
            .values()
            .map(|item| (item.path.as_str(), item))
            .collect();

        // Candidate paths: tracked paths first, then the tree scan, so a
        // move shows up as a deletion followed by an addition
        let mut candidates: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        match files {
            Some(list) => {
                for raw in list {
                    let rel = normalize_rel_path(Path::new(raw))?;
                    let rel = rel.to_string_lossy().into_owned();
                    if seen.insert(rel.clone()) {
                        candidates.push(rel);
                    }
                }
            }
            None => {
                for path in by_path.keys() {
                    if seen.insert((*path).to_string()) {
                        candidates.push((*path).to_string());
                    }
                }
                for rel in storage.read_dir_deep(&self.working_dir, IGNORED)? {
                    let rel = rel.to_string_lossy().into_owned();
                    if seen.insert(rel.clone()) {
                        candidates.push(rel);
                    }
                }
            }
        }

        let mut new_items: BTreeMap<String, Item> = BTreeMap::new();
        let mut changes: Vec<ItemChange> = Vec::new();

        for path in candidates {
            let abs = self.abs_path(&path);
            if storage.is_dir(&abs) {
                continue;
            }

            let tracked = by_path.get(path.as_str()).copied();

            if !storage.exists(&abs) {
                if let Some(prev) = tracked {
                    changes.push(ItemChange::deletion(prev.id.clone()));
                }
                continue;
            }

            let new_hash = storage.hash_file(&abs)?;

            match tracked {
                Some(prev) => {
                    if self.blob_hash(&prev.content)? == new_hash {
                        continue; // unchanged
                    }
                    let item = Item {
                        id: self.services.ids.next_id(),
                        content: DUMMY_CONTENT.to_string(),
                        path: path.clone(),
                    };
                    changes.push(ItemChange::replacement(prev.id.clone(), item.id.clone()));
                    new_items.insert(item.id.clone(), item);
                }
                None => {
                    // Untracked path: identical bytes under a tracked blob
                    // mean a rename or copy
                    let mut matched = None;
                    let mut scanned = HashSet::new();
                    for prev in last_items.values() {
                        if !scanned.insert(prev.content.as_str()) {
                            continue;
                        }
                        if self.blob_hash(&prev.content)? == new_hash {
                            matched = Some(prev.content.clone());
                            break;
                        }
                    }

                    let item = Item {
                        id: self.services.ids.next_id(),
                        content: matched.unwrap_or_else(|| DUMMY_CONTENT.to_string()),
                        path: path.clone(),
                    };
                    changes.push(ItemChange::addition(item.id.clone()));
                    new_items.insert(item.id.clone(), item);
                }
            }
        }

        tracing::debug!(
            project = %self.id,
            changes = changes.len(),
            "Computed working-tree status"
        );

        Ok(Status {
            last_items,
            new_items,
            changes,
        })
    }
}
