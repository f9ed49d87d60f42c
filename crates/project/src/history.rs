//! History resolver: fold ancestor changes into a commit's item set

use crate::model::Item;
use crate::project::Project;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

impl Project {
    /// The items visible at a commit, keyed by item id
    ///
    /// Accepts a full commit id or a unique prefix. Changes are folded in
    /// root-to-target chain order, and in list order within each commit:
    /// `to` is applied before `from`, so a replacement swaps the entry for
    /// the same path in one step.
    pub fn commit_items(&self, commit_ref: &str) -> Result<BTreeMap<String, Item>> {
        let commit_id = self.match_commit_id(commit_ref)?;

        // Ancestor chain, target first; bounded so a corrupt dump with a
        // parent cycle fails instead of looping
        let mut chain = Vec::new();
        let mut cursor = Some(commit_id);
        while let Some(id) = cursor {
            let commit = self
                .commits
                .get(&id)
                .with_context(|| format!("Commit {} not found in project", id))?;
            chain.push(commit);
            if chain.len() > self.commits.len() {
                anyhow::bail!("Commit graph contains a parent cycle at {}", id);
            }
            cursor = commit.parent.clone();
        }
        chain.reverse();

        let mut visible: BTreeMap<String, Item> = BTreeMap::new();
        for commit in chain {
            for change in &commit.changes {
                if let (Some(from), Some(to)) = (&change.from, &change.to) {
                    if from == to {
                        anyhow::bail!(
                            "Change in commit {} references item {} as both from and to",
                            commit.id,
                            from
                        );
                    }
                }
                if let Some(to) = &change.to {
                    let item = self.items.get(to).with_context(|| {
                        format!("Item {} referenced by commit {} is missing", to, commit.id)
                    })?;
                    visible.insert(to.clone(), item.clone());
                }
                if let Some(from) = &change.from {
                    visible.remove(from);
                }
            }
        }

        Ok(visible)
    }
}
