//! DOCX container reading: package extraction and relationship resolution.

mod package;
mod rels;

pub use package::Package;
pub use rels::{RelationshipMap, parse_relationships};
