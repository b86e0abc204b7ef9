//! Report generation
//!
//! Renders the description catalog as plain text or JSON.

use anyhow::Result;
use event_introspect::{ActionDescription, CatalogStats, DescriptionCatalog, EventDescription};
use serde::Serialize;
use std::fmt;

/// An event together with the rule used to subscribe to it
#[derive(Debug, Serialize)]
struct EventEntry<'a> {
    #[serde(flatten)]
    event: &'a EventDescription,
    match_rule: String,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    stats: CatalogStats,
    events: Vec<EventEntry<'a>>,
    actions: Vec<&'a ActionDescription>,
}

fn selected_events(catalog: &DescriptionCatalog, sessionless_only: bool) -> Vec<&EventDescription> {
    catalog
        .events()
        .iter()
        .filter(|e| !sessionless_only || e.is_sessionless())
        .collect()
}

/// Plain text rendering of the catalog
struct TxtReport<'a> {
    catalog: &'a DescriptionCatalog,
    sessionless_only: bool,
}

impl fmt::Display for TxtReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.catalog;
        let stats = catalog.stats();

        writeln!(f, "Providers: {}", catalog.providers().join(", "))?;
        writeln!(f, "Objects:   {}", stats.num_objects)?;
        writeln!(
            f,
            "Events:    {} ({} sessionless)",
            stats.num_events, stats.num_sessionless_events
        )?;
        writeln!(f, "Actions:   {}", stats.num_actions)?;

        writeln!(f, "\nEvents")?;
        writeln!(f, "──────")?;
        for event in selected_events(catalog, self.sessionless_only) {
            let desc = event.description();
            let marker = if event.is_sessionless() { "SL" } else { "  " };
            writeln!(f, "[{}] {} @ {}", marker, desc, desc.bus_name)?;
            if let Some(text) = &desc.text {
                writeln!(f, "     {}", text)?;
            }
            writeln!(f, "     match: {}", event.match_rule())?;
        }

        if !self.sessionless_only {
            writeln!(f, "\nActions")?;
            writeln!(f, "───────")?;
            for action in catalog.actions() {
                writeln!(f, "     {} @ {}", action, action.description().bus_name)?;
                if let Some(text) = &action.description().text {
                    writeln!(f, "     {}", text)?;
                }
            }
        }

        Ok(())
    }
}

/// Render the catalog as a plain text report
pub fn render_txt(catalog: &DescriptionCatalog, sessionless_only: bool) -> String {
    TxtReport {
        catalog,
        sessionless_only,
    }
    .to_string()
}

/// Render the catalog as a JSON document
pub fn render_json(catalog: &DescriptionCatalog, sessionless_only: bool) -> Result<String> {
    let events = selected_events(catalog, sessionless_only)
        .into_iter()
        .map(|event| EventEntry {
            event,
            match_rule: event.match_rule().to_string(),
        })
        .collect();

    let actions = if sessionless_only {
        Vec::new()
    } else {
        catalog.actions().iter().collect()
    };

    let report = JsonReport {
        stats: catalog.stats(),
        events,
        actions,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Summary line used in log output
pub fn summary(stats: &CatalogStats) -> String {
    format!(
        "{} objects, {} events ({} sessionless), {} actions",
        stats.num_objects, stats.num_events, stats.num_sessionless_events, stats.num_actions
    )
}
