//! Unified description catalog
//!
//! Combines the objects introspected from many providers into a single
//! queryable set of events and actions.

use crate::types::{ActionDescription, EventDescription, ObjectDescription};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The unified description catalog
#[derive(Debug, Default)]
pub struct DescriptionCatalog {
    /// All introspected objects, in the order they were added
    objects: Vec<ObjectDescription>,

    /// Flattened events across all objects
    events: Vec<EventDescription>,

    /// Flattened actions across all objects
    actions: Vec<ActionDescription>,

    /// Event lookup for quick access
    /// Key: `interface.member`, Value: indices into `events`
    event_lookup: HashMap<String, Vec<usize>>,

    /// Provider lookup
    /// Key: bus name, Value: indices into `events`
    provider_lookup: HashMap<String, Vec<usize>>,
}

impl DescriptionCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an introspected object to the catalog
    ///
    /// An object already known under the same bus name and path is replaced,
    /// so introspecting a provider again refreshes its entries.
    pub fn add_object(&mut self, object: ObjectDescription) {
        let existing = self
            .objects
            .iter()
            .position(|o| o.bus_name == object.bus_name && o.path == object.path);

        match existing {
            Some(idx) => {
                log::debug!("Replacing {} at {}", object.bus_name, object.path);
                let mut objects = std::mem::take(&mut self.objects);
                objects[idx] = object;
                self.rebuild(objects);
            }
            None => self.append_object(object),
        }
    }

    fn append_object(&mut self, object: ObjectDescription) {
        for event in object.events() {
            self.index_event(event.clone());
        }
        self.actions.extend(object.actions().cloned());
        self.objects.push(object);
    }

    /// Reset the catalog to exactly `objects`, rebuilding all indices
    fn rebuild(&mut self, objects: Vec<ObjectDescription>) {
        *self = Self::new();
        for object in objects {
            self.append_object(object);
        }
    }

    fn index_event(&mut self, event: EventDescription) {
        let idx = self.events.len();

        self.event_lookup
            .entry(event.description().key())
            .or_default()
            .push(idx);
        self.provider_lookup
            .entry(event.description().bus_name.clone())
            .or_default()
            .push(idx);

        self.events.push(event);
    }

    /// All introspected objects
    pub fn objects(&self) -> &[ObjectDescription] {
        &self.objects
    }

    /// All events
    pub fn events(&self) -> &[EventDescription] {
        &self.events
    }

    /// All actions
    pub fn actions(&self) -> &[ActionDescription] {
        &self.actions
    }

    /// Find all events with the given interface and member name
    pub fn find_events(&self, interface: &str, member: &str) -> Vec<&EventDescription> {
        self.event_lookup
            .get(&format!("{}.{}", interface, member))
            .map(|indices| indices.iter().filter_map(|&i| self.events.get(i)).collect())
            .unwrap_or_default()
    }

    /// All events offered by one provider
    pub fn events_for_provider(&self, bus_name: &str) -> Vec<&EventDescription> {
        self.provider_lookup
            .get(bus_name)
            .map(|indices| indices.iter().filter_map(|&i| self.events.get(i)).collect())
            .unwrap_or_default()
    }

    /// Events that can be received without joining a session
    pub fn sessionless_events(&self) -> impl Iterator<Item = &EventDescription> {
        self.events.iter().filter(|e| e.is_sessionless())
    }

    /// Find an action by interface and member name
    pub fn find_action(&self, interface: &str, member: &str) -> Option<&ActionDescription> {
        self.actions.iter().find(|a| {
            a.description().interface == interface && a.description().member == member
        })
    }

    /// Drop everything learned from a provider and rebuild the indices
    ///
    /// Returns the number of objects removed.
    pub fn remove_provider(&mut self, bus_name: &str) -> usize {
        let before = self.objects.len();
        let objects: Vec<ObjectDescription> = std::mem::take(&mut self.objects)
            .into_iter()
            .filter(|o| o.bus_name != bus_name)
            .collect();
        let removed = before - objects.len();

        if removed > 0 {
            log::info!("Removed {} objects of provider {}", removed, bus_name);
        }

        self.rebuild(objects);
        removed
    }

    /// Get catalog statistics
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            num_objects: self.objects.len(),
            num_events: self.events.len(),
            num_sessionless_events: self.sessionless_events().count(),
            num_actions: self.actions.len(),
        }
    }

    /// Get all provider bus names, sorted
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.iter().map(|o| o.bus_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of introspected objects
    pub num_objects: usize,
    /// Total number of events
    pub num_events: usize,
    /// Number of events flagged sessionless
    pub num_sessionless_events: usize,
    /// Total number of actions
    pub num_actions: usize,
}
