//! The project aggregate and its lifecycle
//!
//! A [`Project`] owns the commit graph, the item table, the branch map and
//! the blob pool under `<workdir>/.mvcs/`. All mutation goes through the
//! engine operations; persistence only happens on an explicit
//! [`save`](Project::save).

use crate::model::{Commit, Item};
use anyhow::{Context, Result};
use dashmap::DashMap;
use mvcs_core::{ContentHash, LocalStorage, SystemClock, UuidSource};
use mvcs_core::{Clock, IdSource, StorageProvider};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hidden project directory under the working directory
pub const MVCS_DIR: &str = ".mvcs";
/// Blob pool subdirectory under the project directory
pub const CONTENTS_DIR: &str = "contents";
/// Metadata file under the project directory
pub const PROJECT_FILE: &str = "project.json";
/// Branch created by the first commit when none is current
pub const DEFAULT_BRANCH_NAME: &str = "main";
/// In-memory sentinel for an item whose blob is not yet allocated
pub const DUMMY_CONTENT: &str = "DUMMY";

/// Prefixes suppressed when scanning the working tree
pub(crate) const IGNORED: &[&str] = &[MVCS_DIR];

/// External collaborators injected into a project
#[derive(Clone)]
pub struct Services {
    pub storage: Arc<dyn StorageProvider>,
    pub ids: Arc<dyn IdSource>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Production wiring: local filesystem, UUID v4 ids, system clock
    pub fn host() -> Self {
        Self {
            storage: Arc::new(LocalStorage::new()),
            ids: Arc::new(UuidSource::new()),
            clock: Arc::new(SystemClock::new()),
        }
    }
}

/// The aggregate: commit graph, item table, branches, blob pool
///
/// `working_dir` is supplied at open time and never persisted. All maps
/// are keyed by unique ids (or branch names); iteration order is only
/// contractual where an operation pins it.
impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("author_id", &self.author_id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("working_dir", &self.working_dir)
            .field("branches", &self.branches)
            .field("default_branch", &self.default_branch)
            .field("current_branch", &self.current_branch)
            .field("commits", &self.commits)
            .field("root_commit_id", &self.root_commit_id)
            .field("current_commit_id", &self.current_commit_id)
            .field("items", &self.items)
            .finish()
    }
}

pub struct Project {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: Option<String>,
    pub working_dir: PathBuf,
    /// Branch name -> commit id
    pub branches: BTreeMap<String, String>,
    pub default_branch: Option<String>,
    pub current_branch: Option<String>,
    /// Commit id -> commit
    pub commits: BTreeMap<String, Commit>,
    pub root_commit_id: Option<String>,
    /// The commit whose state currently matches the working tree
    pub current_commit_id: Option<String>,
    /// Item id -> item, global across all commits
    pub items: BTreeMap<String, Item>,

    pub(crate) services: Services,
    /// Session cache: blob id -> content hash (blobs are immutable)
    pub(crate) blob_hashes: DashMap<String, ContentHash>,
}

impl Project {
    fn empty(services: Services, working_dir: PathBuf) -> Self {
        Self {
            id: String::new(),
            author_id: String::new(),
            title: String::new(),
            description: None,
            working_dir,
            branches: BTreeMap::new(),
            default_branch: None,
            current_branch: None,
            commits: BTreeMap::new(),
            root_commit_id: None,
            current_commit_id: None,
            items: BTreeMap::new(),
            services,
            blob_hashes: DashMap::new(),
        }
    }

    /// Create a fresh project rooted at `working_dir`
    ///
    /// Initializes `.mvcs/` with an empty blob pool and writes the initial
    /// `project.json`.
    pub fn create(
        services: Services,
        working_dir: impl Into<PathBuf>,
        author_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Self> {
        let id = services.ids.next_id();
        let mut project = Self::empty(services, working_dir.into());
        project.id = id;
        project.author_id = author_id.to_string();
        project.title = title.to_string();
        project.description = description.map(str::to_string);

        project
            .services
            .storage
            .create_dir(&project.contents_dir())
            .context("Failed to initialize project directory")?;
        project.save()?;

        tracing::info!(project = %project.id, dir = %project.working_dir.display(), "Created project");
        Ok(project)
    }

    /// Open an existing project rooted at `working_dir`
    pub fn load(services: Services, working_dir: impl Into<PathBuf>) -> Result<Self> {
        let working_dir = working_dir.into();
        let mut project = Self::empty(services, working_dir);
        project.load_dump()?;

        tracing::debug!(project = %project.id, "Loaded project");
        Ok(project)
    }

    /// The current commit, if any
    ///
    /// Fails when `current_commit_id` is unset while commits exist, or set
    /// but not present in the graph.
    pub fn current_commit(&self) -> Result<Option<&Commit>> {
        match &self.current_commit_id {
            None => {
                if !self.commits.is_empty() {
                    anyhow::bail!("Current commit is not set");
                }
                Ok(None)
            }
            Some(id) => {
                let commit = self
                    .commits
                    .get(id)
                    .with_context(|| format!("Current commit {} not found in project", id))?;
                Ok(Some(commit))
            }
        }
    }

    /// Path of the hidden project directory
    pub fn mvcs_dir(&self) -> PathBuf {
        self.working_dir.join(MVCS_DIR)
    }

    /// Path of the blob pool directory
    pub fn contents_dir(&self) -> PathBuf {
        self.mvcs_dir().join(CONTENTS_DIR)
    }

    /// Path of the metadata file
    pub fn project_file(&self) -> PathBuf {
        self.mvcs_dir().join(PROJECT_FILE)
    }

    /// Absolute path of a blob in the pool
    pub(crate) fn blob_path(&self, content_id: &str) -> PathBuf {
        self.contents_dir().join(content_id)
    }

    /// Absolute path of a working-tree-relative path
    pub(crate) fn abs_path(&self, rel: &str) -> PathBuf {
        self.working_dir.join(Path::new(rel))
    }
}
