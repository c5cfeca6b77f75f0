//! Import status of a remote catalog item.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Whether a remote product already exists in the local store.
///
/// Derived on every render from the item's handle and the freshly fetched
/// set of local handles. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// A product with the same handle exists locally.
    Imported,
    /// No local product has this handle.
    Available,
}

impl ImportStatus {
    /// Derive the status for `handle` against the local handle set.
    #[must_use]
    pub fn for_handle(handle: &str, existing: &HashSet<String>) -> Self {
        if existing.contains(handle) {
            Self::Imported
        } else {
            Self::Available
        }
    }

    /// Whether an import may be started for this item.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imported => write!(f, "imported"),
            Self::Available => write!(f, "available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_handle() {
        let existing: HashSet<String> = ["handle-a".to_string()].into_iter().collect();
        assert_eq!(
            ImportStatus::for_handle("handle-a", &existing),
            ImportStatus::Imported
        );
        assert_eq!(
            ImportStatus::for_handle("handle-b", &existing),
            ImportStatus::Available
        );
        assert!(ImportStatus::Available.is_available());
        assert!(!ImportStatus::Imported.is_available());
    }

    #[test]
    fn test_empty_set_is_all_available() {
        assert_eq!(
            ImportStatus::for_handle("anything", &HashSet::new()),
            ImportStatus::Available
        );
    }
}
