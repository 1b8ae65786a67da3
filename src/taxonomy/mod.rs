//! Taxonomy loading and lookup
//!
//! - `record` - CSV record parsing
//! - `source` - where taxonomy text comes from
//! - `store` - the loaded graph and its readiness lifecycle

pub mod record;
pub mod source;
pub mod store;

pub use record::{parse_block, parse_record, split_fields, ParsedBlock};
pub use source::{FileSource, HttpSource, InlineSource, TaxonomySource};
pub use store::{LoadReport, Taxonomy, TaxonomyStore};
