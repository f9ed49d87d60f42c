//! MVCS engine - the commit graph and content-addressed storage core
//!
//! This crate provides:
//! - The [`Project`] aggregate (commits, items, branches, blob pool)
//! - JSON persistence of the aggregate to `.mvcs/project.json`
//! - The status, commit, history, checkout and branch engines
//!
//! Filesystem access, identifier generation and the clock are injected
//! through [`Services`]; see `mvcs-core` for the production
//! implementations and the contracts.

pub mod model;
pub mod project;
pub mod status;

mod branch;
mod checkout;
mod commit;
mod contents;
mod history;
mod persist;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports
pub use branch::MIN_ID_PREFIX_LEN;
pub use model::{ChangeKind, Commit, Item, ItemChange};
pub use project::{
    Project, Services, CONTENTS_DIR, DEFAULT_BRANCH_NAME, DUMMY_CONTENT, MVCS_DIR, PROJECT_FILE,
};
pub use status::Status;

/// Result type for engine operations
pub type Result<T> = anyhow::Result<T>;
