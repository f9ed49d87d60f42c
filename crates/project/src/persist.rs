//! Persistence of the project aggregate to `project.json`
//!
//! The dump shape mirrors the serializable fields of [`Project`] with
//! every field optional: on load, recognized keys are copied in and
//! unknown keys are ignored, so older or hand-edited dumps still open.

use crate::model::{Commit, Item};
use crate::project::{Project, PROJECT_FILE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ProjectDump {
    pub id: Option<String>,
    pub author_id: Option<String>,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub branches: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,
    pub commits: Option<BTreeMap<String, Commit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_commit_id: Option<String>,
    pub items: Option<BTreeMap<String, Item>>,
}

impl ProjectDump {
    fn capture(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            author_id: Some(project.author_id.clone()),
            title: Some(project.title.clone()),
            description: project.description.clone(),
            branches: Some(project.branches.clone()),
            default_branch: project.default_branch.clone(),
            current_branch: project.current_branch.clone(),
            commits: Some(project.commits.clone()),
            root_commit_id: project.root_commit_id.clone(),
            current_commit_id: project.current_commit_id.clone(),
            items: Some(project.items.clone()),
        }
    }

    /// Copy every present field into the aggregate; absent fields keep
    /// their defaults
    fn apply(self, project: &mut Project) {
        if let Some(id) = self.id {
            project.id = id;
        }
        if let Some(author_id) = self.author_id {
            project.author_id = author_id;
        }
        if let Some(title) = self.title {
            project.title = title;
        }
        project.description = self.description;
        if let Some(branches) = self.branches {
            project.branches = branches;
        }
        project.default_branch = self.default_branch;
        project.current_branch = self.current_branch;
        if let Some(commits) = self.commits {
            project.commits = commits;
        }
        project.root_commit_id = self.root_commit_id;
        project.current_commit_id = self.current_commit_id;
        if let Some(items) = self.items {
            project.items = items;
        }
    }
}

impl Project {
    /// Write the full aggregate dump to `.mvcs/project.json`
    ///
    /// The dump is written to a temporary file and renamed over the
    /// target, so a failed save never truncates an existing dump.
    pub fn save(&self) -> Result<()> {
        let storage = &self.services.storage;
        let path = self.project_file();

        if !storage.exists(&path) {
            storage.create_file(&path, b"{}")?;
        }

        let json = serde_json::to_string_pretty(&ProjectDump::capture(self))
            .context("Failed to serialize project")?;

        let tmp = self.mvcs_dir().join(format!("{}.tmp", PROJECT_FILE));
        storage.create_file(&tmp, json.as_bytes())?;
        storage.move_file(&tmp, &path)?;

        tracing::debug!(project = %self.id, "Saved project metadata");
        Ok(())
    }

    pub(crate) fn load_dump(&mut self) -> Result<()> {
        let path = self.project_file();
        let bytes = self
            .services
            .storage
            .read_data(&path)
            .context("Failed to read project metadata")?;

        let dump: ProjectDump = serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt project metadata at {}", path.display()))?;
        dump.apply(self);
        Ok(())
    }
}
