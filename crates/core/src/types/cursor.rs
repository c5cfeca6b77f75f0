//! Opaque pagination cursors and paging direction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque pagination token bounding one edge of a page.
///
/// The remote API owns the format. Cursors are stored and replayed verbatim,
/// never parsed or constructed from offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a token received from the remote API.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Wrap an optional query parameter, treating an empty value as absent.
    #[must_use]
    pub fn from_param(param: Option<String>) -> Option<Self> {
        param.filter(|token| !token.is_empty()).map(Self)
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the cursor to page toward.
///
/// Serialized as the `direction` query parameter values `next` and `previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    /// The N items after the cursor.
    #[default]
    #[serde(rename = "next")]
    Forward,
    /// The N items before the cursor.
    #[serde(rename = "previous")]
    Backward,
}

/// Unrecognised `direction` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid direction: {0} (expected \"next\" or \"previous\")")]
pub struct DirectionParseError(pub String);

impl Direction {
    /// Query parameter value for this direction.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Forward => "next",
            Self::Backward => "previous",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_param())
    }
}

impl std::str::FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(Self::Forward),
            "previous" => Ok(Self::Backward),
            other => Err(DirectionParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_is_replayed_verbatim() {
        let token = "eyJsYXN0X2lkIjo3OTgyOTA1MTQxMDE0LCJsYXN0X3ZhbHVlIjoiNzk4MjkwNTE0MTAxNCJ9";
        let cursor = Cursor::new(token);
        assert_eq!(cursor.as_str(), token);
        assert_eq!(serde_json::to_string(&cursor).unwrap(), format!("\"{token}\""));
        assert_eq!(cursor.to_string(), token);
    }

    #[test]
    fn test_empty_param_is_absent() {
        assert_eq!(Cursor::from_param(None), None);
        assert_eq!(Cursor::from_param(Some(String::new())), None);
        assert_eq!(
            Cursor::from_param(Some("abc".to_string())),
            Some(Cursor::new("abc"))
        );
    }

    #[test]
    fn test_direction_params() {
        assert_eq!("next".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("previous".parse::<Direction>().unwrap(), Direction::Backward);
        assert!("back".parse::<Direction>().is_err());
        assert_eq!(Direction::Backward.to_string(), "previous");
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(
            serde_json::to_string(&Direction::Forward).unwrap(),
            "\"next\""
        );
        let dir: Direction = serde_json::from_str("\"previous\"").unwrap();
        assert_eq!(dir, Direction::Backward);
    }
}
