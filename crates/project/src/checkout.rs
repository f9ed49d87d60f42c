//! Checkout engine: reconcile the working tree with a target commit

use crate::project::{Project, IGNORED};
use anyhow::{Context, Result};
use std::collections::HashSet;

impl Project {
    /// Make the working tree match a commit's item set
    ///
    /// Extra files are deleted before targets are materialized; files
    /// whose content already matches the target blob are left untouched.
    /// `current_branch` is not changed here, only by
    /// [`checkout_branch`](Project::checkout_branch), so landing on a
    /// non-tip commit detaches the project.
    pub fn checkout(&mut self, commit_ref: &str) -> Result<()> {
        let commit_id = self.match_commit_id(commit_ref)?;
        let target = self.commit_items(&commit_id)?;
        let target_paths: HashSet<&str> = target.values().map(|item| item.path.as_str()).collect();
        let storage = self.services.storage.clone();

        // Delete extras first
        let mut deleted = 0usize;
        for rel in storage.read_dir_deep(&self.working_dir, IGNORED)? {
            let abs = self.working_dir.join(&rel);
            if !storage.is_file(&abs) {
                continue;
            }
            let rel = rel.to_string_lossy();
            if !target_paths.contains(rel.as_ref()) {
                storage.delete(&abs)?;
                deleted += 1;
            }
        }

        // Materialize the target set, path by path
        let mut items: Vec<_> = target.values().collect();
        items.sort_by(|a, b| a.path.cmp(&b.path));

        let mut written = 0usize;
        for item in items {
            let blob_hash = self.blob_hash(&item.content)?;
            let abs = self.abs_path(&item.path);

            if storage.is_file(&abs) && storage.hash_file(&abs)? == blob_hash {
                continue;
            }
            storage
                .copy_file(&self.blob_path(&item.content), &abs)
                .with_context(|| format!("Failed to materialize {}", item.path))?;
            written += 1;
        }

        self.current_commit_id = Some(commit_id.clone());

        tracing::info!(
            project = %self.id,
            commit = %commit_id,
            written,
            deleted,
            "Checked out commit"
        );
        Ok(())
    }

    /// Check out a branch's tip and make the branch current
    pub fn checkout_branch(&mut self, name: &str) -> Result<()> {
        let tip = self
            .branches
            .get(name)
            .with_context(|| format!("Branch {} not found", name))?
            .clone();
        if !self.commits.contains_key(&tip) {
            anyhow::bail!("Branch {} points at unknown commit {}", name, tip);
        }

        self.checkout(&tip)?;
        self.current_branch = Some(name.to_string());
        Ok(())
    }
}
