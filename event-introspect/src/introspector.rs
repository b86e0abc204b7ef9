//! Main introspection API
//!
//! This module provides the primary interface for the library. The
//! [`Introspector`] struct is the entry point for parsing introspection
//! documents and querying the resulting descriptions.

use crate::config::ParserConfig;
use crate::introspection::{
    parse_introspection_file, parse_introspection_xml, CatalogStats, DescriptionCatalog,
    IntrospectionTarget,
};
use crate::session::SessionPort;
use crate::types::{ObjectDescription, Result, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of one introspected object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionReport {
    /// Bus name of the provider
    pub bus_name: String,
    /// Absolute object path
    pub object_path: String,
    /// Number of events found
    pub events: usize,
    /// Number of those events flagged sessionless
    pub sessionless_events: usize,
    /// Number of actions found
    pub actions: usize,
    /// Child objects still to be introspected
    pub child_paths: Vec<String>,
    /// When the document was parsed
    pub introspected_at: Timestamp,
}

impl IntrospectionReport {
    fn from_object(object: &ObjectDescription) -> Self {
        Self {
            bus_name: object.bus_name.clone(),
            object_path: object.path.clone(),
            events: object.events().count(),
            sessionless_events: object.events().filter(|e| e.is_sessionless()).count(),
            actions: object.actions().count(),
            child_paths: object.child_paths.clone(),
            introspected_at: Utc::now(),
        }
    }
}

/// The main introspector struct - entry point for all parsing operations
#[derive(Debug, Default)]
pub struct Introspector {
    /// Parser options
    config: ParserConfig,
    /// Everything parsed so far
    catalog: DescriptionCatalog,
}

impl Introspector {
    /// Create a new introspector with the default parser configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new introspector with the given parser configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            catalog: DescriptionCatalog::new(),
        }
    }

    /// Parser configuration in use
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an introspection document and add its descriptions to the catalog
    ///
    /// # Example
    /// ```
    /// use event_introspect::Introspector;
    ///
    /// let xml = r#"<node><interface name="org.example.Door">
    ///     <signal name="Opened" sessionless="true"/>
    /// </interface></node>"#;
    ///
    /// let mut introspector = Introspector::new();
    /// let report = introspector.add_xml(":1.7", 25, "/door", xml).unwrap();
    /// assert_eq!(report.sessionless_events, 1);
    /// ```
    pub fn add_xml(
        &mut self,
        bus_name: &str,
        session_port: SessionPort,
        object_path: &str,
        xml: &str,
    ) -> Result<IntrospectionReport> {
        let target = IntrospectionTarget::new(bus_name, session_port, object_path);
        let object = parse_introspection_xml(xml, &target, &self.config)?;
        Ok(self.add_object(object))
    }

    /// Parse an introspection file and add its descriptions to the catalog
    pub fn add_file(
        &mut self,
        bus_name: &str,
        session_port: SessionPort,
        object_path: &str,
        path: &Path,
    ) -> Result<IntrospectionReport> {
        log::info!("Loading introspection file: {:?}", path);

        let target = IntrospectionTarget::new(bus_name, session_port, object_path);
        let object = parse_introspection_file(path, &target, &self.config)?;
        let report = self.add_object(object);

        log::info!("Introspection file loaded successfully: {:?}", path);
        Ok(report)
    }

    fn add_object(&mut self, object: ObjectDescription) -> IntrospectionReport {
        let report = IntrospectionReport::from_object(&object);
        self.catalog.add_object(object);
        report
    }

    /// Drop all descriptions learned from a provider (e.g. after its session was lost)
    pub fn remove_provider(&mut self, bus_name: &str) -> usize {
        self.catalog.remove_provider(bus_name)
    }

    /// Access the description catalog
    pub fn catalog(&self) -> &DescriptionCatalog {
        &self.catalog
    }

    /// Get statistics about the catalog
    pub fn catalog_stats(&self) -> CatalogStats {
        self.catalog.stats()
    }
}
