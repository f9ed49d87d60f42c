//! Branch management and commit id prefix resolution

use crate::project::Project;
use anyhow::Result;

/// Minimum length for a commit id prefix
pub const MIN_ID_PREFIX_LEN: usize = 6;

impl Project {
    /// Resolve a commit id or unique prefix to a full commit id
    ///
    /// An exact id always resolves to itself, even when it also prefixes
    /// other ids; otherwise a prefix must be at least
    /// [`MIN_ID_PREFIX_LEN`] characters and match exactly one commit.
    pub fn match_commit_id(&self, prefix: &str) -> Result<String> {
        if self.commits.contains_key(prefix) {
            return Ok(prefix.to_string());
        }

        if prefix.len() < MIN_ID_PREFIX_LEN {
            anyhow::bail!(
                "Commit id prefix {} is too short (minimum {} characters)",
                prefix,
                MIN_ID_PREFIX_LEN
            );
        }

        let mut candidates = self.commits.keys().filter(|id| id.starts_with(prefix));
        match (candidates.next(), candidates.next()) {
            (None, _) => anyhow::bail!("No ID candidate for {} found", prefix),
            (Some(id), None) => Ok(id.clone()),
            (Some(_), Some(_)) => {
                anyhow::bail!("Multiple ID candidates were found for {}", prefix)
            }
        }
    }

    /// Create a branch pointing at the current commit
    pub fn create_branch(&mut self, name: &str) -> Result<()> {
        let tip = match &self.current_commit_id {
            Some(id) => id.clone(),
            None if self.commits.is_empty() => {
                anyhow::bail!("Cannot create branch {}: project has no commits yet", name)
            }
            None => anyhow::bail!("Current commit is not set"),
        };

        if self.branches.contains_key(name) {
            anyhow::bail!("Branch {} already exists", name);
        }

        self.branches.insert(name.to_string(), tip);
        if self.default_branch.is_none() {
            self.default_branch = Some(name.to_string());
        }

        tracing::debug!(branch = name, "Created branch");
        Ok(())
    }

    /// Delete a branch
    ///
    /// The only branch, the current branch and the default branch are
    /// protected.
    pub fn delete_branch(&mut self, name: &str) -> Result<()> {
        if !self.branches.contains_key(name) {
            anyhow::bail!("Branch {} not found", name);
        }
        if self.branches.len() == 1 {
            anyhow::bail!("Cannot delete {}: it is the only branch", name);
        }
        if self.current_branch.as_deref() == Some(name) {
            anyhow::bail!("Cannot delete the current branch {}", name);
        }
        if self.default_branch.as_deref() == Some(name) {
            anyhow::bail!("Cannot delete the default branch {}", name);
        }

        self.branches.remove(name);
        tracing::debug!(branch = name, "Deleted branch");
        Ok(())
    }

    /// Rename a branch, following `current_branch` and `default_branch`
    pub fn rename_branch(&mut self, old: &str, new: &str) -> Result<()> {
        if self.branches.contains_key(new) {
            anyhow::bail!("Branch {} already exists", new);
        }
        let tip = self
            .branches
            .remove(old)
            .ok_or_else(|| anyhow::anyhow!("Branch {} not found", old))?;
        self.branches.insert(new.to_string(), tip);

        if self.current_branch.as_deref() == Some(old) {
            self.current_branch = Some(new.to_string());
        }
        if self.default_branch.as_deref() == Some(old) {
            self.default_branch = Some(new.to_string());
        }

        tracing::debug!(from = old, to = new, "Renamed branch");
        Ok(())
    }

    /// Mark an existing branch as the default
    pub fn set_default_branch(&mut self, name: &str) -> Result<()> {
        if !self.branches.contains_key(name) {
            anyhow::bail!("Branch {} not found", name);
        }
        self.default_branch = Some(name.to_string());
        Ok(())
    }
}
