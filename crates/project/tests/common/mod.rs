//! Shared harness for integration tests: deterministic ids and clock over
//! a temp working directory

use anyhow::Result;
use chrono::{SecondsFormat, TimeZone, Utc};
use mvcs_core::{Clock, IdSource, LocalStorage};
use mvcs_project::{Project, Services};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Id source producing `uuid-0`, `uuid-1`, ...
#[derive(Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        format!("uuid-{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }
}

/// Clock starting at `2025-01-01T00:00:00.000Z`, one second per reading
#[derive(Default)]
pub struct FixedClock {
    ticks: AtomicU64,
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        (base + chrono::Duration::seconds(tick)).to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// A temp working directory with deterministic services
pub struct Harness {
    temp: TempDir,
    pub services: Services,
}

impl Harness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
            services: Services {
                storage: Arc::new(LocalStorage::new()),
                ids: Arc::new(SequentialIds::default()),
                clock: Arc::new(FixedClock::default()),
            },
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn create_project(&self) -> Result<Project> {
        Project::create(
            self.services.clone(),
            self.root(),
            "JEST",
            "JEST_PROJECT",
            None,
        )
    }

    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn move_file(&self, from: &str, to: &str) -> Result<()> {
        let dst = self.root().join(to);
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(self.root().join(from), dst)?;
        Ok(())
    }

    pub fn copy_file(&self, from: &str, to: &str) -> Result<()> {
        let dst = self.root().join(to);
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(self.root().join(from), dst)?;
        Ok(())
    }

    pub fn delete_file(&self, rel: &str) -> Result<()> {
        std::fs::remove_file(self.root().join(rel))?;
        Ok(())
    }

    pub fn read(&self, rel: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.root().join(rel))?)
    }

    /// Working-tree files (not directories), `.mvcs` excluded, sorted
    pub fn tree_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        collect_files(self.root(), self.root(), &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Number of blobs in the content pool
    pub fn blob_count(&self) -> Result<usize> {
        let dir = self.root().join(".mvcs").join("contents");
        Ok(std::fs::read_dir(dir)?.count())
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let rel: PathBuf = path.strip_prefix(root)?.to_path_buf();
        if rel.starts_with(".mvcs") {
            continue;
        }
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}
