//! Event Introspection Library
//!
//! A reusable library for turning introspection-with-description XML from bus
//! providers into typed event and action descriptions.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on description handling:
//! - Parses introspection documents into object, interface and member descriptions
//! - Flags signals that can be received without a session (sessionless events)
//! - Merges the results from many providers into a queryable catalog
//! - Builds the match rules used to subscribe to events
//!
//! The library does NOT:
//! - Connect to a bus or join sessions
//! - Deliver signals or invoke methods
//! - Render any user interface
//!
//! All higher-level functionality is in the application layer (event-introspect-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use event_introspect::{Introspector, ParserConfig};
//! use std::path::Path;
//!
//! // Create an introspector that keeps only described members
//! let config = ParserConfig::new()
//!     .with_language("en")
//!     .with_required_descriptions(true);
//! let mut introspector = Introspector::with_config(config);
//!
//! // Load the document introspected from a provider
//! let report = introspector
//!     .add_file(":1.42", 25, "/lights", Path::new("lights.xml"))
//!     .unwrap();
//! println!("{} child objects left to introspect", report.child_paths.len());
//!
//! for event in introspector.catalog().sessionless_events() {
//!     println!("{} -> {}", event, event.match_rule());
//! }
//! ```

// Public modules
pub mod config;
pub mod introspection;
pub mod introspector;
pub mod match_rule;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::ParserConfig;
pub use introspection::{CatalogStats, DescriptionCatalog, IntrospectionTarget};
pub use introspector::{IntrospectionReport, Introspector};
pub use match_rule::MatchRule;
pub use session::{SessionId, SessionOpts, SessionPort, TransportMask, SESSION_PORT_ANY};
pub use types::{
    ActionDescription, Description, EventDescription, InterfaceDescription,
    IntrospectionError, ObjectDescription, PropertyAccess, PropertyDescription, Result,
    Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: ensure we can create an introspector
        let introspector = Introspector::new();
        let stats = introspector.catalog_stats();
        assert_eq!(stats.num_events, 0);
    }
}
