//! Per-page-view state machine.
//!
//! ```text
//! Idle -> Loading -> Loaded | FetchFailed
//! Loaded -> Importing -> ImportSucceeded -> Idle (refetch)
//!                     -> ImportFailed -> Loaded
//! ```
//!
//! Every state lives for one request cycle only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State of a single page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Loaded,
    FetchFailed,
    Importing,
    ImportSucceeded,
    ImportFailed,
}

/// Something that happened during a page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEvent {
    /// A page fetch started.
    FetchStarted,
    /// Both reads returned.
    FetchSucceeded,
    /// Either read failed.
    FetchFailed,
    /// The operator asked to import a row.
    ImportRequested,
    /// The store created the product.
    ImportSucceeded,
    /// The import was rejected or never reached the store.
    ImportFailed,
    /// The success notice was shown; the page must be fetched again.
    Acknowledged,
}

/// An event that is not valid in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition from {from:?} on {event:?}")]
pub struct InvalidTransition {
    pub from: ViewState,
    pub event: ViewEvent,
}

impl ViewState {
    /// Apply an event, returning the next state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if `event` cannot happen in this state.
    pub const fn apply(self, event: ViewEvent) -> Result<Self, InvalidTransition> {
        match (self, event) {
            (Self::Idle | Self::FetchFailed, ViewEvent::FetchStarted) => Ok(Self::Loading),
            (Self::Loading, ViewEvent::FetchSucceeded) => Ok(Self::Loaded),
            (Self::Loading, ViewEvent::FetchFailed) => Ok(Self::FetchFailed),
            (Self::Loaded, ViewEvent::ImportRequested) => Ok(Self::Importing),
            (Self::Importing, ViewEvent::ImportSucceeded) => Ok(Self::ImportSucceeded),
            (Self::Importing, ViewEvent::ImportFailed) => Ok(Self::ImportFailed),
            (Self::ImportSucceeded, ViewEvent::Acknowledged) => Ok(Self::Idle),
            (Self::ImportFailed, ViewEvent::Acknowledged) => Ok(Self::Loaded),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    /// Whether the page must be fetched again before it reflects reality.
    #[must_use]
    pub const fn needs_refetch(self) -> bool {
        matches!(self, Self::ImportSucceeded | Self::Idle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_then_import_success_returns_to_idle() {
        let state = ViewState::Idle
            .apply(ViewEvent::FetchStarted)
            .and_then(|s| s.apply(ViewEvent::FetchSucceeded))
            .and_then(|s| s.apply(ViewEvent::ImportRequested))
            .and_then(|s| s.apply(ViewEvent::ImportSucceeded))
            .unwrap();
        assert_eq!(state, ViewState::ImportSucceeded);
        assert!(state.needs_refetch());
        assert_eq!(state.apply(ViewEvent::Acknowledged).unwrap(), ViewState::Idle);
    }

    #[test]
    fn test_failed_import_returns_to_loaded() {
        let state = ViewState::Importing
            .apply(ViewEvent::ImportFailed)
            .and_then(|s| s.apply(ViewEvent::Acknowledged))
            .unwrap();
        assert_eq!(state, ViewState::Loaded);
        assert!(!state.needs_refetch());
    }

    #[test]
    fn test_fetch_failure_can_retry() {
        let state = ViewState::Loading.apply(ViewEvent::FetchFailed).unwrap();
        assert_eq!(state, ViewState::FetchFailed);
        assert_eq!(
            state.apply(ViewEvent::FetchStarted).unwrap(),
            ViewState::Loading
        );
    }

    #[test]
    fn test_cannot_import_before_load() {
        let err = ViewState::Loading
            .apply(ViewEvent::ImportRequested)
            .unwrap_err();
        assert_eq!(err.from, ViewState::Loading);
        assert!(ViewState::Idle.apply(ViewEvent::ImportSucceeded).is_err());
        assert!(ViewState::FetchFailed.apply(ViewEvent::ImportRequested).is_err());
    }
}
