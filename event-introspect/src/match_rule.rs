//! Signal match rules
//!
//! Subscribing to an event means registering a match rule with the bus. For
//! sessionless events the rule carries `sessionless='t'` and is not bound to a
//! particular sender or path unless asked for.

use crate::types::EventDescription;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Builder for a bus match rule string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    pub sender: Option<String>,
    pub path: Option<String>,
    pub interface: Option<String>,
    pub member: Option<String>,
    pub sessionless: bool,
}

impl MatchRule {
    /// Create an empty rule matching every signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Default rule for subscribing to `event`
    ///
    /// Session-bound events are matched on sender and path as well;
    /// sessionless ones only on interface and member.
    pub fn for_event(event: &EventDescription) -> Self {
        let desc = event.description();
        let rule = Self::new()
            .with_interface(desc.interface.as_str())
            .with_member(desc.member.as_str())
            .with_sessionless(event.is_sessionless());

        if event.is_sessionless() {
            rule
        } else {
            rule.with_sender(desc.bus_name.as_str())
                .with_path(desc.object_path.as_str())
        }
    }

    /// Builder method: restrict to one sender
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Builder method: restrict to one object path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builder method: restrict to one interface
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Builder method: restrict to one member
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Builder method: mark the rule as sessionless
    pub fn with_sessionless(mut self, sessionless: bool) -> Self {
        self.sessionless = sessionless;
        self
    }

    /// Check whether a signal with the given header fields matches this rule
    pub fn matches(&self, sender: &str, path: &str, interface: &str, member: &str) -> bool {
        let field = |wanted: &Option<String>, actual: &str| {
            wanted.as_deref().map_or(true, |w| w == actual)
        };

        field(&self.sender, sender)
            && field(&self.path, path)
            && field(&self.interface, interface)
            && field(&self.member, member)
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type='signal'")?;

        let fields = [
            ("sender", &self.sender),
            ("path", &self.path),
            ("interface", &self.interface),
            ("member", &self.member),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                write!(f, ",{}='{}'", key, value)?;
            }
        }

        if self.sessionless {
            write!(f, ",sessionless='t'")?;
        }
        Ok(())
    }
}
