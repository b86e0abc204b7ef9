// Walks a provider's object tree the way a tester does: introspect the root,
// then every child path the report hands back.
use event_introspect::{EventDescription, Introspector, ParserConfig};
use std::collections::HashMap;

fn provider_tree() -> HashMap<&'static str, &'static str> {
    let mut tree = HashMap::new();
    tree.insert(
        "/",
        r#"<node>
             <node name="home"/>
           </node>"#,
    );
    tree.insert(
        "/home",
        r#"<node name="/home">
             <description>Home automation root</description>
             <interface name="org.example.Presence">
               <signal name="Arrived" sessionless="true">
                 <arg name="who" type="s"/>
                 <description>Someone arrived home</description>
               </signal>
               <signal name="Left">
                 <arg name="who" type="s"/>
               </signal>
             </interface>
             <node name="thermostat"/>
           </node>"#,
    );
    tree.insert(
        "/home/thermostat",
        r#"<node>
             <interface name="org.example.Thermostat">
               <signal name="TargetReached" sessionless="false">
                 <arg name="celsius" type="d"/>
                 <description>Target temperature reached</description>
               </signal>
               <method name="SetTarget">
                 <arg name="celsius" type="d" direction="in"/>
                 <description>Set the target temperature</description>
               </method>
             </interface>
           </node>"#,
    );
    tree
}

#[test]
fn walks_the_whole_object_tree() {
    let _ = env_logger::builder().is_test(true).try_init();

    let tree = provider_tree();
    let mut introspector = Introspector::with_config(ParserConfig::new().with_required_descriptions(true));

    let mut pending = vec!["/".to_string()];
    let mut visited = Vec::new();
    while let Some(path) = pending.pop() {
        let xml = tree[path.as_str()];
        let report = introspector.add_xml(":1.42", 25, &path, xml).unwrap();
        pending.extend(report.child_paths);
        visited.push(path);
    }

    visited.sort();
    assert_eq!(visited, vec!["/", "/home", "/home/thermostat"]);

    let stats = introspector.catalog_stats();
    assert_eq!(stats.num_objects, 3);
    // "Left" has no description and is dropped
    assert_eq!(stats.num_events, 2);
    assert_eq!(stats.num_sessionless_events, 1);
    assert_eq!(stats.num_actions, 1);

    let arrived: Vec<&EventDescription> = introspector.catalog().sessionless_events().collect();
    assert_eq!(arrived.len(), 1);
    assert_eq!(arrived[0].description().object_path, "/home");
    assert_eq!(
        arrived[0].match_rule().to_string(),
        "type='signal',interface='org.example.Presence',member='Arrived',sessionless='t'"
    );

    let reached = introspector
        .catalog()
        .find_events("org.example.Thermostat", "TargetReached");
    assert_eq!(reached.len(), 1);
    assert!(!reached[0].is_sessionless());
    assert_eq!(reached[0].description().signature, "d");
}

#[test]
fn sessionless_flag_survives_serialization() {
    let mut introspector = Introspector::new();
    introspector
        .add_xml(":1.42", 25, "/home", provider_tree()["/home"])
        .unwrap();

    let events = introspector.catalog().events();
    let json = serde_json::to_string(events).unwrap();
    let restored: Vec<EventDescription> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.as_slice(), events);
    assert!(restored[0].is_sessionless());
    assert!(!restored[1].is_sessionless());
}
