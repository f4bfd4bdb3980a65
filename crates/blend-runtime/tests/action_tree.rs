//! Action tree interpreter tests

mod common;

use blend_dom::Event;
use blend_runtime::{CallArg, ExecutionContext, Value, execute_action};
use common::{by_id, class_of, log_of, runtime};

const STEPS: &str = r#"[
    {
        "name": "Steps",
        "actions": [
            {"type": "Test.RecordAction", "label": "a"},
            {"actions": [
                {"type": "RecordAction", "label": "b"},
                {"type": "RecordAction", "label": "c"}
            ]},
            {"type": "RecordAction", "label": "d"}
        ]
    }
]"#;

#[test]
fn test_children_run_in_declared_order() {
    let mut rt = runtime(r#"<p id="p"></p>"#, STEPS);
    rt.document_ready();
    let p = by_id(&rt, "p");

    let result = rt.invoke("Steps", &[CallArg::Event(Event::new("click", p))]);
    assert_eq!(result, Some(Value::Null));
    assert_eq!(log_of(&rt, p), "abcd");
}

#[test]
fn test_event_argument_sets_scope_state() {
    let mut rt = runtime(r#"<div id="outer"><p id="p"></p></div>"#, STEPS);
    rt.document_ready();
    let outer = by_id(&rt, "outer");
    let p = by_id(&rt, "p");

    let mut event = Event::new("click", p);
    event.current_target = Some(outer);
    rt.invoke("Steps", &[CallArg::Event(event)]);

    assert_eq!(log_of(&rt, outer), "abcd");
    assert_eq!(log_of(&rt, p), "");
    let args = rt.scopes().arguments(outer).expect("scope arguments");
    assert_eq!(args.len(), 1);
    assert!(args[0].as_event().is_some());
}

#[test]
fn test_invoke_without_event_has_no_scope() {
    let mut rt = runtime(r#"<p id="p"></p>"#, STEPS);
    rt.document_ready();
    let p = by_id(&rt, "p");

    rt.invoke("Steps", &[CallArg::Value(Value::from(1.0))]);
    assert_eq!(log_of(&rt, p), "");
    assert!(
        rt.diagnostics()
            .records()
            .iter()
            .any(|d| d.message == "Why is there no scope element?")
    );
}

#[test]
fn test_inline_handler_invokes_tree() {
    let mut rt = runtime(
        r#"<div id="outer"><button id="go" onclick="Steps(event)">Go</button></div>"#,
        STEPS,
    );
    rt.document_ready();
    let go = by_id(&rt, "go");

    rt.dispatch_event(go, "click");
    assert_eq!(log_of(&rt, go), "abcd");
    assert!(rt.scopes().arguments(go).is_some());
}

#[test]
fn test_inline_handler_unknown_tree_is_ignored() {
    let mut rt = runtime(r#"<button id="go" onclick="Missing(event)">Go</button>"#, "[]");
    rt.document_ready();
    let go = by_id(&rt, "go");

    rt.dispatch_event(go, "click");
    assert_eq!(rt.diagnostics().errors().count(), 0);
    assert_eq!(rt.invoke("Missing", &[]), None);
}

#[test]
fn test_duplicate_name_last_wins() {
    let mut rt = runtime(
        r#"<p id="p"></p>"#,
        r#"[
            {"name": "Foo", "actions": [{"type": "AddClassAction", "className": "first"}]},
            {"name": "Foo", "actions": [{"type": "AddClassAction", "className": "second"}]}
        ]"#,
    );
    rt.document_ready();
    let p = by_id(&rt, "p");

    rt.invoke("Foo", &[CallArg::Event(Event::new("click", p))]);
    assert_eq!(class_of(&rt, p), "second");
    assert_eq!(rt.diagnostics().errors().count(), 0);
    assert_eq!(rt.action_trees().names(), vec!["Foo"]);
}

#[test]
fn test_remove_class_scenario() {
    let mut rt = runtime(r#"<p id="p" class="a hidden b"></p>"#, "[]");
    let p = by_id(&rt, "p");

    let action = rt
        .parse_json(r#"{"type":"RemoveClassAction","className":"hidden"}"#)
        .unwrap();
    assert!(matches!(action, Value::Action(_)));

    execute_action(&mut rt, &action, ExecutionContext::new(&[]).with_element(p));
    assert_eq!(class_of(&rt, p), "a b");
}

#[test]
fn test_class_actions_with_selector() {
    let mut rt = runtime(
        r#"<ul><li class="item">1</li><li class="item on">2</li><li>3</li></ul><p id="p"></p>"#,
        r#"[{"name": "Flip", "actions": [
            {"type": "ToggleClassAction", "className": "on", "targetSelector": ".item"},
            {"type": "SetStyleAction", "styleProperty": "backgroundColor", "styleValue": "red"},
            {"type": "SetHTMLAttributeAction", "attribute": "title", "attributeValue": "done"}
        ]}]"#,
    );
    rt.document_ready();
    let p = by_id(&rt, "p");

    rt.invoke("Flip", &[CallArg::Event(Event::new("click", p))]);

    let items = rt.query_selector_all(".item");
    assert_eq!(items.len(), 2);
    assert_eq!(class_of(&rt, items[0]), "item on");
    assert_eq!(class_of(&rt, items[1]), "item");
    assert_eq!(
        rt.document().style(p).get_property_value("background-color"),
        Some("red")
    );
    assert_eq!(rt.document().get_attribute(p, "title"), Some("done"));
}

#[test]
fn test_remove_actions() {
    let mut rt = runtime(
        r#"<div id="list"><span>a</span><span>b</span></div><p class="gone"></p><p id="keep"></p>"#,
        r##"[{"name": "Clean", "actions": [
            {"type": "RemoveChildrenAction", "parentElement": "#list"},
            {"type": "RemoveElementsAction", "elementsToRemove": ".gone"}
        ]}]"##,
    );
    rt.document_ready();
    let list = by_id(&rt, "list");
    let keep = by_id(&rt, "keep");

    rt.invoke("Clean", &[CallArg::Event(Event::new("click", keep))]);
    assert!(rt.document().tree().children(list).is_empty());
    assert!(rt.query_selector_all(".gone").is_empty());
    assert!(rt.document().is_connected(keep));
}

#[test]
fn test_action_list_not_array() {
    let mut rt = runtime("", r#"{"name": "Foo"}"#);
    rt.document_ready();
    assert_eq!(rt.diagnostics().count("Blend.ActionTrees.JsonNotArray"), 1);
    assert!(rt.action_trees().names().is_empty());
}

#[test]
fn test_action_list_skips_unnamed_entries() {
    let mut rt = runtime(
        "",
        r#"[null, {"actions": []}, {"name": "Ok", "actions": []}]"#,
    );
    rt.document_ready();
    assert_eq!(rt.diagnostics().count("Blend.ActionTrees.MissingName"), 1);
    assert_eq!(rt.action_trees().names(), vec!["Ok"]);
}

#[test]
fn test_malformed_action_list_is_ignored() {
    let mut rt = runtime(r#"<p id="p"></p>"#, "[{ not json");
    rt.document_ready();
    assert_eq!(rt.diagnostics().errors().count(), 0);
    assert!(rt.action_trees().names().is_empty());
}
