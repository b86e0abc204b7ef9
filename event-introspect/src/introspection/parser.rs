//! Introspection XML parser
//!
//! Converts an introspection-with-description document into an
//! [`ObjectDescription`]: signals become events, methods become actions.

use crate::config::ParserConfig;
use crate::introspection::xml::{parse_document, XmlElement};
use crate::session::SessionPort;
use crate::types::{
    ActionDescription, Description, EventDescription, InterfaceDescription, IntrospectionError,
    ObjectDescription, PropertyAccess, PropertyDescription, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The provider object an introspection document was obtained from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionTarget {
    /// Bus name of the provider
    pub bus_name: String,
    /// Session port used to reach the provider
    pub session_port: SessionPort,
    /// Object path that was introspected
    pub object_path: String,
}

impl IntrospectionTarget {
    pub fn new(
        bus_name: impl Into<String>,
        session_port: SessionPort,
        object_path: impl Into<String>,
    ) -> Self {
        Self {
            bus_name: bus_name.into(),
            session_port,
            object_path: object_path.into(),
        }
    }
}

/// Parse an introspection file
pub fn parse_introspection_file(
    path: &Path,
    target: &IntrospectionTarget,
    config: &ParserConfig,
) -> Result<ObjectDescription> {
    log::info!("Parsing introspection file: {:?}", path);

    let xml = std::fs::read_to_string(path)?;
    parse_introspection_xml(&xml, target, config)
}

/// Parse an introspection document
pub fn parse_introspection_xml(
    xml: &str,
    target: &IntrospectionTarget,
    config: &ParserConfig,
) -> Result<ObjectDescription> {
    let root = parse_document(xml)?;

    if root.name != "node" {
        return Err(IntrospectionError::UnexpectedElement {
            expected: "node".to_string(),
            found: root.name,
        });
    }

    // An absolute name on the root node overrides the requested path
    let path = match root.attr("name") {
        Some(name) if name.starts_with('/') => name.to_string(),
        _ => target.object_path.clone(),
    };
    validate_object_path(&path)?;

    let parser = MemberParser {
        target,
        config,
        path: &path,
    };

    let mut interfaces = Vec::new();
    for iface in root.children_named("interface") {
        interfaces.push(parser.parse_interface(iface)?);
    }

    let mut child_paths = Vec::new();
    if config.follow_child_nodes {
        for child in root.children_named("node") {
            let name = child.required_attr("name")?;
            let child_path = join_child_path(&path, name);
            validate_object_path(&child_path)?;
            child_paths.push(child_path);
        }
    }

    for other in root
        .children
        .iter()
        .filter(|c| !matches!(c.name.as_str(), "interface" | "node" | "description"))
    {
        log::debug!("Skipping <{}> under node {}", other.name, path);
    }

    let object = ObjectDescription {
        bus_name: target.bus_name.clone(),
        session_port: target.session_port,
        text: select_description(&root, config).map(|(text, _)| text),
        path,
        interfaces,
        child_paths,
    };

    log::info!(
        "Parsed {} interfaces ({} events, {} actions) from {} at {}",
        object.interfaces.len(),
        object.events().count(),
        object.actions().count(),
        target.bus_name,
        object.path
    );

    Ok(object)
}

/// Per-document state shared by all member conversions
struct MemberParser<'a> {
    target: &'a IntrospectionTarget,
    config: &'a ParserConfig,
    path: &'a str,
}

impl MemberParser<'_> {
    fn parse_interface(&self, element: &XmlElement) -> Result<InterfaceDescription> {
        let name = element.required_attr("name")?;

        let mut iface = InterfaceDescription {
            name: name.to_string(),
            text: select_description(element, self.config).map(|(text, _)| text),
            ..InterfaceDescription::default()
        };

        for member in &element.children {
            match member.name.as_str() {
                "signal" => {
                    let event = self.parse_signal(name, member)?;
                    if self.keep(event.description()) {
                        iface.events.push(event);
                    }
                }
                "method" => {
                    let action = self.parse_method(name, member)?;
                    if self.keep(action.description()) {
                        iface.actions.push(action);
                    }
                }
                "property" => {
                    let property = self.parse_property(member)?;
                    if !self.config.require_descriptions || property.text.is_some() {
                        iface.properties.push(property);
                    }
                }
                "description" | "annotation" => {}
                other => log::debug!("Skipping <{}> in interface {}", other, name),
            }
        }

        Ok(iface)
    }

    fn parse_signal(&self, interface: &str, element: &XmlElement) -> Result<EventDescription> {
        let mut signature = String::new();
        for arg in element.children_named("arg") {
            signature.push_str(arg.required_attr("type")?);
        }

        let mut event = EventDescription::new(self.describe(interface, element, signature)?);

        if let Some(value) = element.attr("sessionless") {
            match value {
                "true" => event.set_sessionless(true),
                "false" => event.set_sessionless(false),
                other => self.reject(element, "sessionless", other)?,
            }
        }

        Ok(event)
    }

    fn parse_method(&self, interface: &str, element: &XmlElement) -> Result<ActionDescription> {
        let mut input = String::new();
        let mut output = String::new();
        for arg in element.children_named("arg") {
            let arg_type = arg.required_attr("type")?;
            match arg.attr("direction").unwrap_or("in") {
                "in" => input.push_str(arg_type),
                "out" => output.push_str(arg_type),
                other => self.reject(arg, "direction", other)?,
            }
        }

        let mut action = ActionDescription::new(self.describe(interface, element, input)?);
        action.output_signature = output;
        Ok(action)
    }

    fn parse_property(&self, element: &XmlElement) -> Result<PropertyDescription> {
        let name = element.required_attr("name")?;
        let signature = element.required_attr("type")?;
        let access_value = element.required_attr("access")?;

        let access = match PropertyAccess::parse(access_value) {
            Some(access) => access,
            None => {
                self.reject(element, "access", access_value)?;
                PropertyAccess::Read
            }
        };

        Ok(PropertyDescription {
            name: name.to_string(),
            signature: signature.to_string(),
            access,
            text: select_description(element, self.config).map(|(text, _)| text),
        })
    }

    fn describe(
        &self,
        interface: &str,
        element: &XmlElement,
        signature: String,
    ) -> Result<Description> {
        let member = element.required_attr("name")?;

        let mut description = Description::new(
            self.target.bus_name.clone(),
            self.target.session_port,
            self.path,
            interface,
            member,
        )
        .with_signature(signature);

        if let Some((text, language)) = select_description(element, self.config) {
            description = description.with_text(text, language);
        }

        Ok(description)
    }

    fn keep(&self, description: &Description) -> bool {
        if self.config.require_descriptions && !description.has_text() {
            log::debug!("Dropping undescribed member {}", description.key());
            return false;
        }
        true
    }

    /// Error out in strict mode, otherwise warn and fall back to the default
    fn reject(&self, element: &XmlElement, attribute: &str, value: &str) -> Result<()> {
        if self.config.strict {
            return Err(IntrospectionError::InvalidAttribute {
                element: element.name.clone(),
                attribute: attribute.to_string(),
                value: value.to_string(),
            });
        }
        log::warn!(
            "Ignoring invalid {}='{}' on <{}> in {}",
            attribute,
            value,
            element.name,
            self.path
        );
        Ok(())
    }
}

/// Pick the `<description>` child matching the preferred language, else the first
fn select_description(element: &XmlElement, config: &ParserConfig) -> Option<(String, Option<String>)> {
    let candidates: Vec<&XmlElement> = element
        .children_named("description")
        .filter(|d| !d.text.trim().is_empty())
        .collect();

    let chosen = candidates
        .iter()
        .find(|d| config.prefers_language(d.attr("language")))
        .or_else(|| candidates.first())?;

    Some((
        chosen.text.trim().to_string(),
        chosen.attr("language").map(str::to_string),
    ))
}

fn join_child_path(parent: &str, name: &str) -> String {
    let name = name.trim_start_matches('/');
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Check that `path` is an absolute object path made of `[A-Za-z0-9_]` segments
pub fn validate_object_path(path: &str) -> Result<()> {
    if path == "/" {
        return Ok(());
    }

    let valid = path.starts_with('/')
        && !path.ends_with('/')
        && path[1..].split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(IntrospectionError::InvalidObjectPath(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LIGHT_XML: &str = r#"
<node name="/lights">
  <description>Light controller</description>
  <interface name="org.example.Light">
    <description>Switchable light</description>
    <signal name="TurnedOn" sessionless="true">
      <arg name="level" type="u"/>
      <description>Emitted when the light turns on</description>
    </signal>
    <signal name="TurnedOff">
      <description>Emitted when the light turns off</description>
    </signal>
    <method name="SetLevel">
      <arg name="level" type="u" direction="in"/>
      <arg name="ok" type="b" direction="out"/>
      <description language="en">Set the brightness</description>
      <description language="de">Helligkeit setzen</description>
    </method>
    <method name="Ping"/>
    <property name="Level" type="u" access="read"/>
  </interface>
  <node name="kitchen"/>
  <node name="hall"/>
</node>
"#;

    fn target() -> IntrospectionTarget {
        IntrospectionTarget::new(":1.42", 25, "/lights")
    }

    #[test]
    fn test_parse_signals_and_methods() {
        let object = parse_introspection_xml(LIGHT_XML, &target(), &ParserConfig::new()).unwrap();

        assert_eq!(object.path, "/lights");
        assert_eq!(object.bus_name, ":1.42");
        assert_eq!(object.text.as_deref(), Some("Light controller"));
        assert_eq!(object.interfaces.len(), 1);

        let iface = &object.interfaces[0];
        assert_eq!(iface.name, "org.example.Light");
        assert_eq!(iface.text.as_deref(), Some("Switchable light"));
        assert_eq!(iface.events.len(), 2);
        assert_eq!(iface.actions.len(), 2);
        assert_eq!(iface.properties.len(), 1);

        let on = &iface.events[0];
        assert_eq!(on.description().member, "TurnedOn");
        assert_eq!(on.description().signature, "u");
        assert_eq!(on.description().session_port, 25);
        assert!(on.is_sessionless());

        let off = &iface.events[1];
        assert!(!off.is_sessionless());

        let set_level = &iface.actions[0];
        assert_eq!(set_level.description().signature, "u");
        assert_eq!(set_level.output_signature, "b");
        assert_eq!(set_level.description().text.as_deref(), Some("Set the brightness"));
        assert_eq!(set_level.description().language.as_deref(), Some("en"));
    }

    #[test]
    fn test_child_paths() {
        let object = parse_introspection_xml(LIGHT_XML, &target(), &ParserConfig::new()).unwrap();
        assert_eq!(object.child_paths, vec!["/lights/kitchen", "/lights/hall"]);

        let config = ParserConfig::new().with_child_nodes(false);
        let object = parse_introspection_xml(LIGHT_XML, &target(), &config).unwrap();
        assert!(object.child_paths.is_empty());

        let root = IntrospectionTarget::new(":1.42", 25, "/");
        let object = parse_introspection_xml(r#"<node><node name="a"/></node>"#, &root, &ParserConfig::new()).unwrap();
        assert_eq!(object.child_paths, vec!["/a"]);
    }

    #[test]
    fn test_preferred_language() {
        let config = ParserConfig::new().with_language("de");
        let object = parse_introspection_xml(LIGHT_XML, &target(), &config).unwrap();
        let set_level = &object.interfaces[0].actions[0];
        assert_eq!(set_level.description().text.as_deref(), Some("Helligkeit setzen"));
        assert_eq!(set_level.description().language.as_deref(), Some("de"));
    }

    #[test]
    fn test_require_descriptions() {
        let config = ParserConfig::new().with_required_descriptions(true);
        let object = parse_introspection_xml(LIGHT_XML, &target(), &config).unwrap();
        let iface = &object.interfaces[0];

        // Ping and Level carry no description
        assert_eq!(iface.actions.len(), 1);
        assert_eq!(iface.actions[0].description().member, "SetLevel");
        assert!(iface.properties.is_empty());
        assert_eq!(iface.events.len(), 2);
    }

    #[test]
    fn test_invalid_sessionless_value() {
        let xml = r#"<node><interface name="a.b"><signal name="S" sessionless="yes"/></interface></node>"#;

        let err = parse_introspection_xml(xml, &target(), &ParserConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            IntrospectionError::InvalidAttribute { ref attribute, .. } if attribute == "sessionless"
        ));

        let lenient = ParserConfig::new().with_strict(false);
        let object = parse_introspection_xml(xml, &target(), &lenient).unwrap();
        assert!(!object.interfaces[0].events[0].is_sessionless());
    }

    #[test]
    fn test_root_must_be_node() {
        let err = parse_introspection_xml("<interface name=\"a.b\"/>", &target(), &ParserConfig::new())
            .unwrap_err();
        assert!(matches!(err, IntrospectionError::UnexpectedElement { .. }));
    }

    #[test]
    fn test_signal_without_name() {
        let xml = r#"<node><interface name="a.b"><signal/></interface></node>"#;
        let err = parse_introspection_xml(xml, &target(), &ParserConfig::new()).unwrap_err();
        assert!(matches!(err, IntrospectionError::MissingAttribute { .. }));
    }

    #[test]
    fn test_relative_root_name_uses_target_path() {
        let xml = r#"<node name="ignored"/>"#;
        let object = parse_introspection_xml(xml, &target(), &ParserConfig::new()).unwrap();
        assert_eq!(object.path, "/lights");
    }

    #[test]
    fn test_absolute_root_name_overrides_target_path() {
        let xml = r#"
<node name="/other">
  <interface name="org.example.Light">
    <signal name="TurnedOn" sessionless="true"/>
    <method name="Toggle"/>
  </interface>
  <node name="child"/>
</node>"#;

        let object = parse_introspection_xml(xml, &target(), &ParserConfig::new()).unwrap();
        assert_eq!(object.path, "/other");
        assert!(object.events().all(|e| e.description().object_path == "/other"));
        assert!(object.actions().all(|a| a.description().object_path == "/other"));
        assert_eq!(object.events().count(), 1);
        assert_eq!(object.child_paths, vec!["/other/child"]);
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"
<node>
  <foo/>
  <interface name="a.b">
    <foo bar="baz"/>
    <annotation name="x" value="y"/>
    <signal name="S"/>
  </interface>
</node>"#;

        for strict in [true, false] {
            let config = ParserConfig::new().with_strict(strict);
            let object = parse_introspection_xml(xml, &target(), &config).unwrap();
            assert_eq!(object.interfaces.len(), 1);
            assert_eq!(object.interfaces[0].events.len(), 1);
            assert!(object.interfaces[0].actions.is_empty());
            assert!(object.child_paths.is_empty());
        }
    }

    #[test]
    fn test_invalid_arg_direction() {
        let xml = r#"
<node>
  <interface name="a.b">
    <method name="M">
      <arg name="x" type="s" direction="sideways"/>
      <arg name="y" type="u" direction="in"/>
      <arg name="z" type="b" direction="out"/>
    </method>
  </interface>
</node>"#;

        let err = parse_introspection_xml(xml, &target(), &ParserConfig::new().with_strict(true))
            .unwrap_err();
        assert!(matches!(
            err,
            IntrospectionError::InvalidAttribute { ref attribute, ref value, .. }
                if attribute == "direction" && value == "sideways"
        ));

        // Lenient mode drops the bad arg and keeps the action
        let lenient = ParserConfig::new().with_strict(false);
        let object = parse_introspection_xml(xml, &target(), &lenient).unwrap();
        let actions = &object.interfaces[0].actions;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].description().signature, "u");
        assert_eq!(actions[0].output_signature, "b");
    }

    #[test]
    fn test_invalid_property_access() {
        let xml = r#"
<node>
  <interface name="a.b">
    <property name="P" type="s" access="rw"/>
  </interface>
</node>"#;

        let err = parse_introspection_xml(xml, &target(), &ParserConfig::new().with_strict(true))
            .unwrap_err();
        assert!(matches!(
            err,
            IntrospectionError::InvalidAttribute { ref attribute, ref value, .. }
                if attribute == "access" && value == "rw"
        ));

        let lenient = ParserConfig::new().with_strict(false);
        let object = parse_introspection_xml(xml, &target(), &lenient).unwrap();
        let properties = &object.interfaces[0].properties;
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "P");
        assert_eq!(properties[0].access, PropertyAccess::Read);
    }

    #[test]
    fn test_validate_object_path() {
        assert!(validate_object_path("/").is_ok());
        assert!(validate_object_path("/a/b_c/D1").is_ok());
        assert!(validate_object_path("").is_err());
        assert!(validate_object_path("a/b").is_err());
        assert!(validate_object_path("/a/").is_err());
        assert!(validate_object_path("/a//b").is_err());
        assert!(validate_object_path("/a-b").is_err());
    }

    #[test]
    fn test_parse_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(LIGHT_XML.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let object =
            parse_introspection_file(temp_file.path(), &target(), &ParserConfig::new()).unwrap();
        assert_eq!(object.events().filter(|e| e.is_sessionless()).count(), 1);
    }
}
