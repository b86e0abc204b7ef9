//! Introspection document parsing and the description catalog
//!
//! This module contains the parser for introspection-with-description XML
//! and the catalog that merges the results from many providers.

pub mod catalog;
pub mod parser;
mod xml;

// Re-export key types for convenience
pub use catalog::{CatalogStats, DescriptionCatalog};
pub use parser::{
    parse_introspection_file, parse_introspection_xml, validate_object_path,
    IntrospectionTarget,
};
