//! Normalization and merging of loosely-typed records
//!
//! Records arrive from two sources that both encode nearly everything as
//! strings: the local seed documents and the Star Wars API. This module turns
//! them into canonical, typed records.
//!
//! # Implementation Model
//!
//! A record flows through these steps:
//!
//! 1. **Filter** ([`filter`], [`EntityKind::filter`]): project the record onto
//!    the ordered key set of its kind. This fixes both the field set and the
//!    output order.
//! 2. **Merge** ([`merge`]): when a locally curated record and a freshly fetched
//!    one describe the same entity, the fetched record overrides the local one
//!    field by field.
//! 3. **Normalize** ([`Normalizer::clean`]): sentinel strings such as
//!    `"unknown"` become `null`, strings are coerced according to the global
//!    [`FieldTypes`] table, and reference fields (`homeworld`, `species`) are
//!    replaced by the normalized records they point at.
//!
//! Coercion is total and idempotent. A value that does not parse is kept as
//! it is, and values that are not strings are never touched, so a record can
//! be normalized any number of times.

pub mod coerce;
mod field_types;
mod key_set;
mod merge;
mod normalizer;
mod record;
mod sentinel;

pub use field_types::{FieldTypeClass, FieldTypes, FieldTypesBuilder, FieldTypesError, ReferenceShape};
pub use key_set::{EntityKind, filter};
pub use merge::merge;
pub use normalizer::{DEFAULT_MAX_REFERENCE_DEPTH, Normalizer};
pub use record::Record;
pub use sentinel::is_unknown;
