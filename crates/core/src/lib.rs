//! MVCS Core - storage and identity primitives for the MVCS engine
//!
//! This crate provides the foundational layer the version-control engine
//! is built on:
//! - SHA-256 content hashing (streaming, 64 KiB chunks)
//! - The storage provider contract and its local-filesystem implementation
//! - Identifier and clock contracts with production implementations

pub mod hash;
pub mod ids;
pub mod storage;

// Re-export main types for convenience
pub use hash::{hash_bytes, ContentHash, IncrementalHasher};
pub use ids::{Clock, IdSource, SystemClock, UuidSource};
pub use storage::{LocalStorage, StorageProvider};

/// Common result type used throughout mvcs-core
pub type Result<T> = anyhow::Result<T>;
