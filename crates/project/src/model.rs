//! Domain model: items, item changes and commits

use serde::{Deserialize, Serialize};

/// The content-addressed record of a file at some historical moment
///
/// `path` is working-tree-relative with `/` separators; `content` names a
/// blob under `.mvcs/contents/<content>`. Two items may share a `content`
/// value (copy/move detection); `id` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub content: String,
    pub path: String,
}

/// A delta record appearing in a commit
///
/// Presence semantics: `{to}` = addition, `{from, to}` = replacement
/// (modification, or a move reusing the same content), `{from}` = deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Classification of an [`ItemChange`] by field presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Addition,
    Replacement,
    Deletion,
}

impl ItemChange {
    /// An addition: `{to}`
    pub fn addition(to: impl Into<String>) -> Self {
        Self {
            from: None,
            to: Some(to.into()),
        }
    }

    /// A replacement: `{from, to}`
    pub fn replacement(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// A deletion: `{from}`
    pub fn deletion(from: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: None,
        }
    }

    /// Classify by field presence; `None` for the invalid empty change
    pub fn kind(&self) -> Option<ChangeKind> {
        match (&self.from, &self.to) {
            (None, Some(_)) => Some(ChangeKind::Addition),
            (Some(_), Some(_)) => Some(ChangeKind::Replacement),
            (Some(_), None) => Some(ChangeKind::Deletion),
            (None, None) => None,
        }
    }
}

/// A node in the history graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Back-links to commits whose parent is this one
    #[serde(default)]
    pub children: Vec<String>,
    pub author_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 UTC timestamp
    pub date: String,
    pub changes: Vec<ItemChange>,
}
