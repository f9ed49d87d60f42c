//! Storage provider contract and its local-filesystem implementation
//!
//! The version-control engine never touches the filesystem directly; it
//! talks to a [`StorageProvider`]. [`LocalStorage`] is the production
//! implementation over `std::fs` and `walkdir`.

use crate::hash::{self, ContentHash};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem contract consumed by the version-control engine
///
/// Listing operations return paths relative to the listed root, normalized
/// to `/` separators. `ignore` entries are root-relative path prefixes
/// (e.g. `.mvcs`); anything at or below an ignored prefix is suppressed.
pub trait StorageProvider: Send + Sync {
    /// Whether anything exists at the path
    fn exists(&self, path: &Path) -> bool;

    /// Whether the path is an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Whether the path is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a file's full contents
    fn read_data(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create (or overwrite) a file, creating intermediate directories
    fn create_file(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Copy a file, creating intermediate directories of the destination
    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Move a file, creating intermediate directories of the destination
    fn move_file(&self, src: &Path, dst: &Path) -> Result<()>;

    /// Create a directory recursively
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Delete a file or directory tree; deleting a missing path is a no-op
    fn delete(&self, path: &Path) -> Result<()>;

    /// List entries directly under `root` (depth 1)
    fn read_dir(&self, root: &Path, ignore: &[&str]) -> Result<Vec<PathBuf>>;

    /// List all entries under `root` recursively, in name-sorted order
    fn read_dir_deep(&self, root: &Path, ignore: &[&str]) -> Result<Vec<PathBuf>>;

    /// Streaming SHA-256 of a file's bytes; fails if the file is missing
    fn hash_file(&self, path: &Path) -> Result<ContentHash>;
}

/// Normalize a working-tree-relative path for storage
///
/// - Converts separators to `/`
/// - Rejects `..` and absolute paths
/// - Removes a `./` prefix
pub fn normalize_rel_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        anyhow::bail!("Absolute paths not allowed: {}", path.display());
    }

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                anyhow::bail!("Path traversal not allowed: {}", path.display());
            }
            std::path::Component::RootDir => {
                anyhow::bail!("Absolute paths not allowed: {}", path.display());
            }
            _ => {}
        }
    }

    let path_str = path.to_string_lossy();
    let normalized = path_str.strip_prefix("./").unwrap_or(path_str.as_ref());
    let normalized = normalized.replace('\\', "/");

    Ok(PathBuf::from(normalized))
}

fn is_ignored(rel: &Path, ignore: &[&str]) -> bool {
    ignore.iter().any(|prefix| rel.starts_with(prefix))
}

/// Production storage provider over the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl StorageProvider for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_data(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn create_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> Result<()> {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::copy(src, dst)
            .with_context(|| {
                format!("Failed to copy {} to {}", src.display(), dst.display())
            })
            .map(|_| ())
    }

    fn move_file(&self, src: &Path, dst: &Path) -> Result<()> {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::rename(src, dst).with_context(|| {
            format!("Failed to move {} to {}", src.display(), dst.display())
        })
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            std::fs::remove_dir_all(path)
                .with_context(|| format!("Failed to delete directory {}", path.display()))
        } else if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to delete file {}", path.display()))
        } else {
            Ok(())
        }
    }

    fn read_dir(&self, root: &Path, ignore: &[&str]) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(root)
            .with_context(|| format!("Failed to list {}", root.display()))?
        {
            let entry = entry?;
            let rel = normalize_rel_path(Path::new(&entry.file_name()))?;
            if !is_ignored(&rel, ignore) {
                entries.push(rel);
            }
        }

        entries.sort();
        Ok(entries)
    }

    fn read_dir_deep(&self, root: &Path, ignore: &[&str]) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.path()
                    .strip_prefix(root)
                    .map(|rel| !is_ignored(rel, ignore))
                    .unwrap_or(true)
            })
        {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            let rel = entry
                .path()
                .strip_prefix(root)
                .expect("walkdir yields paths under its root");
            entries.push(normalize_rel_path(rel)?);
        }

        Ok(entries)
    }

    fn hash_file(&self, path: &Path) -> Result<ContentHash> {
        hash::hash_file(path)
    }
}
