//! Change record diff engine for auditrail.
//!
//! [`DiffEngine::process`] looks at one tracked entity snapshot and either
//! produces a [`ChangeRecord`](auditrail_types::ChangeRecord) or reports that
//! the entity is not audited. Value documents depend on the entity state:
//!
//! - `Added`: current values of every audited property.
//! - `Deleted`: original values of every audited property.
//! - `Modified`: original and current values of modified properties only.
//!
//! Key properties and ignored properties never appear. Owned entities are
//! folded into their owner's documents as nested objects under the owning
//! property name, recursively.

mod encode;
mod engine;
mod error;
mod values;

pub use engine::DiffEngine;
pub use error::{DiffError, Result};
