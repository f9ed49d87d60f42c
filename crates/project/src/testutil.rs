//! Deterministic fakes and a temp-directory harness for unit tests

use crate::project::{Project, Services};
use anyhow::Result;
use chrono::{SecondsFormat, TimeZone, Utc};
use mvcs_core::{Clock, IdSource, LocalStorage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Id source producing `uuid-0`, `uuid-1`, ...
#[derive(Default)]
pub(crate) struct SequentialIds {
    counter: AtomicU64,
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        format!("uuid-{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }
}

/// Clock starting at `2025-01-01T00:00:00.000Z`, advancing one second per
/// reading
#[derive(Default)]
pub(crate) struct FixedClock {
    ticks: AtomicU64,
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        (base + chrono::Duration::seconds(tick)).to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

pub(crate) fn sequential_services() -> Services {
    Services {
        storage: Arc::new(LocalStorage::new()),
        ids: Arc::new(SequentialIds::default()),
        clock: Arc::new(FixedClock::default()),
    }
}

/// A fresh project in a temp directory, with deterministic ids and clock
pub(crate) struct TestBed {
    #[allow(dead_code)]
    pub temp: tempfile::TempDir,
    pub project: Project,
}

impl TestBed {
    /// Write a working-tree file, creating parent directories
    pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.project.working_dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub(crate) fn init_project() -> Result<TestBed> {
    let temp = tempfile::tempdir()?;
    let project = Project::create(
        sequential_services(),
        temp.path(),
        "JEST",
        "JEST_PROJECT",
        None,
    )?;
    Ok(TestBed { temp, project })
}
