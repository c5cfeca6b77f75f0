//! Core types for the catalog importer.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cursor;
pub mod id;
pub mod price;
pub mod status;
pub mod view_state;

pub use cursor::{Cursor, Direction, DirectionParseError};
pub use id::{GidError, ShopifyGid};
pub use price::{Price, PriceParseError};
pub use status::ImportStatus;
pub use view_state::{InvalidTransition, ViewEvent, ViewState};
