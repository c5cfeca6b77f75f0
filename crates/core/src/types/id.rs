//! Shopify global IDs.
//!
//! Shopify identifies every resource with a fully-qualified global ID of the
//! form `gid://shopify/<Resource>/<id>`. The bare `<id>` is convenient as a
//! row or selection key, but APIs always expect the qualified form back, so
//! [`ShopifyGid`] keeps the original string and only derives the short form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheme and namespace shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Resource name used for products.
pub const PRODUCT_RESOURCE: &str = "Product";

/// Errors produced when parsing a global ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GidError {
    #[error("not a Shopify global id: {0}")]
    MissingPrefix(String),
    #[error("global id has no resource type: {0}")]
    MissingResource(String),
    #[error("global id has no local id: {0}")]
    MissingLocalId(String),
}

/// A fully-qualified Shopify global ID.
///
/// # Example
///
/// ```rust
/// # use catalog_importer_core::ShopifyGid;
/// let gid = ShopifyGid::parse("gid://shopify/Product/7982853619734").unwrap();
/// assert_eq!(gid.resource(), "Product");
/// assert_eq!(gid.local_id(), "7982853619734");
///
/// let again = ShopifyGid::qualify("Product", gid.local_id()).unwrap();
/// assert_eq!(again, gid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShopifyGid {
    raw: String,
    /// Byte offset of the `/` separating resource and local id.
    split: usize,
}

impl ShopifyGid {
    /// Parse a fully-qualified global ID.
    ///
    /// # Errors
    ///
    /// Returns `GidError` if the value lacks the `gid://shopify/` prefix, a
    /// resource type, or a local id.
    pub fn parse(value: impl Into<String>) -> Result<Self, GidError> {
        let raw = value.into();
        let Some(rest) = raw.strip_prefix(GID_PREFIX) else {
            return Err(GidError::MissingPrefix(raw));
        };
        let Some(slash) = rest.find('/') else {
            return Err(GidError::MissingResource(raw));
        };
        if slash == 0 {
            return Err(GidError::MissingResource(raw));
        }
        if rest.len() == slash + 1 {
            return Err(GidError::MissingLocalId(raw));
        }
        let split = GID_PREFIX.len() + slash;
        Ok(Self { raw, split })
    }

    /// Build a global ID from a resource type and a bare local id.
    ///
    /// # Errors
    ///
    /// Returns `GidError` if either part is empty or the resource contains `/`.
    pub fn qualify(resource: &str, local_id: &str) -> Result<Self, GidError> {
        if resource.is_empty() || resource.contains('/') {
            return Err(GidError::MissingResource(resource.to_string()));
        }
        Self::parse(format!("{GID_PREFIX}{resource}/{local_id}"))
    }

    /// Build a product global ID from a bare local id.
    ///
    /// # Errors
    ///
    /// Returns `GidError::MissingLocalId` if `local_id` is empty.
    pub fn product(local_id: &str) -> Result<Self, GidError> {
        Self::qualify(PRODUCT_RESOURCE, local_id)
    }

    /// Resource type, e.g. `Product`.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.raw
            .get(GID_PREFIX.len()..self.split)
            .unwrap_or_default()
    }

    /// The bare id with the resource prefix stripped.
    ///
    /// Presentation only. Send [`Self::as_str`] back to APIs.
    #[must_use]
    pub fn local_id(&self) -> &str {
        self.raw.get(self.split + 1..).unwrap_or_default()
    }

    /// The original fully-qualified form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for ShopifyGid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for ShopifyGid {
    type Error = GidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ShopifyGid> for String {
    fn from(gid: ShopifyGid) -> Self {
        gid.raw
    }
}

impl std::str::FromStr for ShopifyGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_gid() {
        let gid = ShopifyGid::parse("gid://shopify/Product/7982853619734").unwrap();
        assert_eq!(gid.resource(), "Product");
        assert_eq!(gid.local_id(), "7982853619734");
        assert_eq!(gid.as_str(), "gid://shopify/Product/7982853619734");
    }

    #[test]
    fn test_strip_and_requalify_round_trips() {
        for raw in [
            "gid://shopify/Product/1",
            "gid://shopify/Product/7982853619734",
            "gid://shopify/Collection/429512622102",
        ] {
            let gid = ShopifyGid::parse(raw).unwrap();
            let back = ShopifyGid::qualify(gid.resource(), gid.local_id()).unwrap();
            assert_eq!(back.as_str(), raw);
            assert_eq!(back, gid);
        }
    }

    #[test]
    fn test_product_constructor() {
        let gid = ShopifyGid::product("42").unwrap();
        assert_eq!(gid.to_string(), "gid://shopify/Product/42");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            ShopifyGid::parse("Product/1"),
            Err(GidError::MissingPrefix(_))
        ));
        assert!(matches!(
            ShopifyGid::parse("gid://shopify/Product"),
            Err(GidError::MissingResource(_))
        ));
        assert!(matches!(
            ShopifyGid::parse("gid://shopify//1"),
            Err(GidError::MissingResource(_))
        ));
        assert!(matches!(
            ShopifyGid::parse("gid://shopify/Product/"),
            Err(GidError::MissingLocalId(_))
        ));
        assert!(ShopifyGid::product("").is_err());
        assert!(ShopifyGid::qualify("Pro/duct", "1").is_err());
    }

    #[test]
    fn test_serde_uses_qualified_form() {
        let gid = ShopifyGid::product("9").unwrap();
        let json = serde_json::to_string(&gid).unwrap();
        assert_eq!(json, "\"gid://shopify/Product/9\"");

        let back: ShopifyGid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gid);

        assert!(serde_json::from_str::<ShopifyGid>("\"9\"").is_err());
    }
}
