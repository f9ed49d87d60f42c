//! Commit engine: materialize a status into a new history node

use crate::model::Commit;
use crate::project::{Project, DEFAULT_BRANCH_NAME, DUMMY_CONTENT};
use anyhow::{Context, Result};

impl Project {
    /// Record the working tree's pending changes as a new commit
    ///
    /// Requires being at the tip of the current branch (the guard is
    /// skipped while the graph is empty). The first commit establishes
    /// the root, the `main` branch and the default branch. Persistence is
    /// the caller's responsibility.
    pub fn commit(
        &mut self,
        files: Option<&[String]>,
        author_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Commit> {
        if !self.commits.is_empty() {
            let at_tip = self
                .current_branch
                .as_ref()
                .and_then(|name| self.branches.get(name))
                .map(|tip| Some(tip) == self.current_commit_id.as_ref())
                .unwrap_or(false);
            if !at_tip {
                anyhow::bail!("Cannot commit when not at the branch");
            }
        }

        let status = self.status(files)?;
        let mut new_items = status.new_items;
        let changes = status.changes;

        // Promote new items in change order; sentinel blobs are allocated
        // now (and may deduplicate against blobs stored moments ago)
        for change in &changes {
            let Some(to) = &change.to else { continue };
            let mut item = new_items
                .remove(to)
                .with_context(|| format!("Status change references unknown item {}", to))?;
            if item.content == DUMMY_CONTENT {
                item.content = self.add_content(&item.path)?;
            }
            self.items.insert(item.id.clone(), item);
        }

        let id = self.services.ids.next_id();
        let commit = Commit {
            id: id.clone(),
            parent: self.current_commit_id.clone(),
            children: Vec::new(),
            author_id: author_id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            date: self.services.clock.now(),
            changes,
        };

        if self.root_commit_id.is_none() {
            self.root_commit_id = Some(id.clone());
            if self.current_branch.is_none() {
                self.current_branch = Some(DEFAULT_BRANCH_NAME.to_string());
            }
            if self.default_branch.is_none() {
                self.default_branch = self.current_branch.clone();
            }
        }

        if let Some(parent_id) = &commit.parent {
            if let Some(parent) = self.commits.get_mut(parent_id) {
                parent.children.push(id.clone());
            }
        }

        self.commits.insert(id.clone(), commit.clone());
        let branch = self
            .current_branch
            .clone()
            .context("Current branch is not set")?;
        self.branches.insert(branch, id.clone());
        self.current_commit_id = Some(id);

        tracing::info!(
            project = %self.id,
            commit = %commit.id,
            changes = commit.changes.len(),
            title,
            "Created commit"
        );
        Ok(commit)
    }
}
