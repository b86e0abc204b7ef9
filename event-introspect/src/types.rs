//! Core types for the event introspection library
//!
//! This module defines the description types produced when an introspection
//! document is parsed. Every interface member is described by a [`Description`];
//! signals and methods wrap it as [`EventDescription`] and [`ActionDescription`].

use crate::session::SessionPort;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// Result type for introspection operations
pub type Result<T> = std::result::Result<T, IntrospectionError>;

/// Errors that can occur while reading introspection data
#[derive(Debug, thiserror::Error)]
pub enum IntrospectionError {
    #[error("Malformed introspection XML at byte {position}: {message}")]
    XmlError { message: String, position: usize },

    #[error("Unexpected element <{found}>, expected <{expected}>")]
    UnexpectedElement { expected: String, found: String },

    #[error("Element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Invalid object path: {0}")]
    InvalidObjectPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Identifying and descriptive metadata for one interface member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Bus name of the provider the member was introspected from
    pub bus_name: String,
    /// Session port the provider was reached on
    pub session_port: SessionPort,
    /// Object path the member lives on
    pub object_path: String,
    /// Interface name
    pub interface: String,
    /// Member name
    pub member: String,
    /// Signature built from the member's arguments
    pub signature: String,
    /// Human-readable description (if the provider supplied one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Language tag of `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Description {
    /// Create a description without any human-readable text
    pub fn new(
        bus_name: impl Into<String>,
        session_port: SessionPort,
        object_path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self {
            bus_name: bus_name.into(),
            session_port,
            object_path: object_path.into(),
            interface: interface.into(),
            member: member.into(),
            ..Self::default()
        }
    }

    /// Builder method: set the argument signature
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Builder method: set the human-readable text and its language
    pub fn with_text(mut self, text: impl Into<String>, language: Option<String>) -> Self {
        self.text = Some(text.into());
        self.language = language;
        self
    }

    /// Lookup key of the member, `interface.member`
    pub fn key(&self) -> String {
        format!("{}.{}", self.interface, self.member)
    }

    /// True if the provider supplied a human-readable description
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}({})",
            self.object_path, self.interface, self.member, self.signature
        )
    }
}

/// A signal that can be subscribed to as an event
///
/// Wraps the member's [`Description`] and records whether the signal is
/// delivered without an established session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescription {
    /// Member metadata
    pub description: Description,
    /// True if the signal is sessionless
    #[serde(default)]
    is_sessionless: bool,
}

impl EventDescription {
    /// Create an event description; the sessionless flag starts out `false`
    pub fn new(description: Description) -> Self {
        Self {
            description,
            is_sessionless: false,
        }
    }

    /// Member metadata of this event
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Whether the event can be received without joining a session
    pub fn is_sessionless(&self) -> bool {
        self.is_sessionless
    }

    /// Set whether the event can be received without joining a session
    pub fn set_sessionless(&mut self, is_sessionless: bool) {
        self.is_sessionless = is_sessionless;
    }

    /// Build the default match rule used to subscribe to this event
    pub fn match_rule(&self) -> crate::match_rule::MatchRule {
        crate::match_rule::MatchRule::for_event(self)
    }
}

impl fmt::Display for EventDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if self.is_sessionless {
            write!(f, " [sessionless]")?;
        }
        Ok(())
    }
}

/// A method that can be invoked as an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescription {
    /// Member metadata (`signature` holds the input arguments)
    pub description: Description,
    /// Signature of the reply arguments
    pub output_signature: String,
}

impl ActionDescription {
    /// Create an action description with no reply arguments
    pub fn new(description: Description) -> Self {
        Self {
            description,
            output_signature: String::new(),
        }
    }

    /// Member metadata of this action
    pub fn description(&self) -> &Description {
        &self.description
    }
}

impl fmt::Display for ActionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        if !self.output_signature.is_empty() {
            write!(f, " -> ({})", self.output_signature)?;
        }
        Ok(())
    }
}

/// Access mode of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyAccess {
    Read,
    Write,
    ReadWrite,
}

impl PropertyAccess {
    /// Parse the `access` attribute of a `<property>` element
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(PropertyAccess::Read),
            "write" => Some(PropertyAccess::Write),
            "readwrite" => Some(PropertyAccess::ReadWrite),
            _ => None,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, PropertyAccess::Read | PropertyAccess::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, PropertyAccess::Write | PropertyAccess::ReadWrite)
    }
}

impl fmt::Display for PropertyAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyAccess::Read => write!(f, "read"),
            PropertyAccess::Write => write!(f, "write"),
            PropertyAccess::ReadWrite => write!(f, "readwrite"),
        }
    }
}

/// A property exposed by an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescription {
    /// Property name
    pub name: String,
    /// Type signature
    pub signature: String,
    /// Access mode
    pub access: PropertyAccess,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One interface of an introspected object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescription {
    /// Interface name
    pub name: String,
    /// Human-readable description of the interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Signals declared by the interface
    pub events: Vec<EventDescription>,
    /// Methods declared by the interface
    pub actions: Vec<ActionDescription>,
    /// Properties declared by the interface
    pub properties: Vec<PropertyDescription>,
}

/// An introspected object and the interfaces it implements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Bus name of the provider
    pub bus_name: String,
    /// Session port the provider was reached on
    pub session_port: SessionPort,
    /// Absolute object path
    pub path: String,
    /// Human-readable description of the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Interfaces implemented at this path
    pub interfaces: Vec<InterfaceDescription>,
    /// Absolute paths of child objects still to be introspected
    pub child_paths: Vec<String>,
}

impl ObjectDescription {
    /// Iterate over all events of all interfaces
    pub fn events(&self) -> impl Iterator<Item = &EventDescription> {
        self.interfaces.iter().flat_map(|i| i.events.iter())
    }

    /// Iterate over all actions of all interfaces
    pub fn actions(&self) -> impl Iterator<Item = &ActionDescription> {
        self.interfaces.iter().flat_map(|i| i.actions.iter())
    }

    /// Look up an interface by name
    pub fn interface(&self, name: &str) -> Option<&InterfaceDescription> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}
