//! Behavior lifecycle tests: event triggers, timers and animation frames

mod common;

use blend_runtime::behaviors::TimerBehavior;
use blend_runtime::{Behavior, BehaviorExt, BlendError, JsonObject, Value};
use common::{by_id, class_of, log_of, runtime};
use std::rc::Rc;

const RECORD: &str = r#"[{"type": "RecordAction"}]"#;

// ============================================================================
// EVENT TRIGGER
// ============================================================================

#[test]
fn test_click_toggles_class() {
    let mut rt = runtime(
        r#"<button id="b" data-blend-behavior='{"behaviors": [{"type": "EventTriggerBehavior", "event": "click", "triggeredActions": [{"type": "ToggleClassAction", "className": "on"}]}]}'>B</button>"#,
        "[]",
    );
    rt.document_ready();
    let b = by_id(&rt, "b");

    rt.dispatch_event(b, "click");
    assert_eq!(class_of(&rt, b), "on");
    rt.dispatch_event(b, "click");
    assert_eq!(class_of(&rt, b), "");
    assert_eq!(rt.diagnostics().errors().count(), 0);
}

#[test]
fn test_source_selector_scopes_to_source() {
    let mut rt = runtime(
        r#"<div id="panel" data-blend-behavior='{"behaviors": [{"type": "EventTriggerBehavior", "event": "click", "sourceSelector": ".src", "triggeredActions": [{"type": "AddClassAction", "className": "hit"}]}]}'>
            <button class="src" id="s1"></button>
            <button class="src" id="s2"></button>
        </div>"#,
        "[]",
    );
    rt.document_ready();
    let panel = by_id(&rt, "panel");
    let s1 = by_id(&rt, "s1");
    let s2 = by_id(&rt, "s2");

    assert_eq!(rt.listener_count(panel), 0);
    assert_eq!(rt.listener_count(s1), 1);

    rt.dispatch_event(s2, "click");
    assert_eq!(class_of(&rt, s1), "src");
    assert_eq!(class_of(&rt, s2), "src hit");
    assert_eq!(class_of(&rt, panel), "");
    assert!(rt.scopes().arguments(s2).is_some());
}

#[test]
fn test_load_event_fires_at_attach() {
    let mut rt = runtime(
        r#"<p id="p" data-blend-behavior='{"behaviors": [{"type": "EventTriggerBehavior", "event": "load", "triggeredActions": [{"type": "RecordAction", "label": "L"}]}]}'></p>"#,
        "[]",
    );
    rt.document_ready();
    let p = by_id(&rt, "p");
    assert_eq!(log_of(&rt, p), "L");
}

#[test]
fn test_set_event_rewires_listeners() {
    let mut rt = runtime(r#"<button id="b"></button>"#, "[]");
    let b = by_id(&rt, "b");
    let behavior = rt
        .create_behavior(
            "EventTriggerBehavior",
            Some(r#"{"event": "click", "triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(b),
        )
        .unwrap();

    rt.dispatch_event(b, "click");
    assert_eq!(log_of(&rt, b), "x");

    assert!(rt.set_behavior_property(&behavior, "event", Value::from("mouseover")));
    assert_eq!(behavior.property("event"), Value::from("mouseover"));
    rt.dispatch_event(b, "click");
    assert_eq!(log_of(&rt, b), "x");
    rt.dispatch_event(b, "mouseover");
    assert_eq!(log_of(&rt, b), "xx");
    assert_eq!(rt.listener_count(b), 1);

    assert!(!rt.set_behavior_property(&behavior, "triggeredActions", Value::Null));
}

#[test]
fn test_set_source_selector_rebinds() {
    let mut rt = runtime(
        r#"<div id="host"></div><a id="one" class="other"></a><a id="two" class="other"></a>"#,
        "[]",
    );
    let host = by_id(&rt, "host");
    let one = by_id(&rt, "one");
    let two = by_id(&rt, "two");
    let behavior = rt
        .create_behavior(
            "EventTriggerBehavior",
            Some(r#"{"event": "click", "triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(host),
        )
        .unwrap();
    assert_eq!(rt.listener_count(host), 1);

    assert!(rt.set_behavior_property(&behavior, "sourceSelector", Value::from(".other")));
    assert_eq!(rt.listener_count(host), 0);
    assert_eq!(rt.listener_count(one), 1);
    assert_eq!(rt.listener_count(two), 1);

    rt.dispatch_event(two, "click");
    assert_eq!(log_of(&rt, two), "x");
    assert_eq!(log_of(&rt, one), "");
}

const MENU: &str = r##"[
    {
        "name": "Menu",
        "behaviors": [
            {
                "type": "EventTriggerBehavior",
                "event": "click",
                "sourceSelector": "#btn",
                "triggeredActions": [
                    {"type": "ToggleClassAction", "className": "open", "targetSelector": "#panel"}
                ]
            }
        ]
    }
]"##;

#[test]
fn test_shared_selector_source_is_bound_once() {
    let mut rt = runtime(
        r#"<button id="btn"></button><div id="panel"></div><p id="a" data-blend-behavior="Menu"></p><p id="b" data-blend-behavior="Menu"></p>"#,
        MENU,
    );
    rt.document_ready();
    let btn = by_id(&rt, "btn");
    let panel = by_id(&rt, "panel");
    let a = by_id(&rt, "a");
    let b = by_id(&rt, "b");

    assert_eq!(rt.listener_count(btn), 1);
    rt.dispatch_event(btn, "click");
    assert_eq!(class_of(&rt, panel), "open");

    rt.detach_element(a);
    assert_eq!(rt.listener_count(btn), 1);
    rt.dispatch_event(btn, "click");
    assert_eq!(class_of(&rt, panel), "");

    rt.detach_element(b);
    assert_eq!(rt.listener_count(btn), 0);
    rt.dispatch_event(btn, "click");
    assert_eq!(class_of(&rt, panel), "");
}

#[test]
fn test_detach_is_idempotent() {
    let mut rt = runtime(r#"<button id="b"></button>"#, "[]");
    let b = by_id(&rt, "b");
    let behavior = rt
        .create_behavior(
            "EventTriggerBehavior",
            Some(r#"{"event": "click", "triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(b),
        )
        .unwrap();
    assert!(behavior.is_attached());

    behavior.detach(&mut rt);
    behavior.detach(&mut rt);
    assert!(!behavior.is_attached());
    assert_eq!(rt.listener_count(b), 0);
    assert!(!rt.scopes().contains(b));

    rt.dispatch_event(b, "click");
    assert_eq!(log_of(&rt, b), "");

    let never = rt.create_behavior("TimerBehavior", None, None).unwrap();
    never.detach(&mut rt);
    assert!(never.attachments().is_empty());
}

#[test]
fn test_attach_twice_to_same_element() {
    let mut rt = runtime(r#"<button id="b"></button>"#, "[]");
    let b = by_id(&rt, "b");
    let behavior = rt
        .create_behavior(
            "EventTriggerBehavior",
            Some(r#"{"event": "click", "triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(b),
        )
        .unwrap();
    behavior.attach(&mut rt, b);

    assert_eq!(behavior.attachments(), vec![b]);
    assert_eq!(rt.listener_count(b), 1);
    rt.dispatch_event(b, "click");
    assert_eq!(log_of(&rt, b), "x");
}

#[test]
fn test_behavior_removing_its_own_element() {
    let mut rt = runtime(
        r#"<div id="wrap"><button id="b" data-blend-behavior='{"behaviors": [{"type": "EventTriggerBehavior", "event": "click", "triggeredActions": [{"type": "RemoveElementsAction"}]}]}'></button></div>"#,
        "[]",
    );
    rt.document_ready();
    let b = by_id(&rt, "b");
    let behavior = rt.behavior_instances(b)[0].clone();

    rt.dispatch_event(b, "click");
    assert!(!rt.document().is_connected(b));
    assert!(!behavior.is_attached());
    assert_eq!(rt.listener_count(b), 0);
    assert!(rt.elements_with_behaviors().is_empty());
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_create_behavior_errors() {
    let mut rt = runtime("", "[]");
    assert!(matches!(
        rt.create_behavior("Nope", None, None),
        Err(BlendError::UnknownType(_))
    ));
    assert!(matches!(
        rt.create_behavior("AddClassAction", None, None),
        Err(BlendError::NotABehavior(_))
    ));
    assert!(matches!(
        rt.create_behavior("Blend.Behaviors.BehaviorBase", None, None),
        Err(BlendError::NotConstructible(_))
    ));
    assert!(matches!(
        rt.create_behavior("SelectorSourcedBehavior", None, None),
        Err(BlendError::NotConstructible(_))
    ));
    assert!(matches!(
        rt.create_behavior("TimerBehavior", Some("{bad"), None),
        Err(BlendError::Json(_))
    ));
}

#[test]
fn test_create_behavior_applies_config() {
    let mut rt = runtime("", "[]");
    let timer = rt
        .create_behavior("Blend.Behaviors.TimerBehavior", Some(r#"{"totalTicks": 4}"#), None)
        .unwrap();
    assert_eq!(timer.property("totalTicks"), Value::Number(4.0));
    assert_eq!(timer.property("millisecondsPerTick"), Value::Number(1000.0));
    assert!(!timer.is_attached());
}

// ============================================================================
// TIMER
// ============================================================================

#[test]
fn test_timer_runs_exactly_total_ticks() {
    let mut rt = runtime(
        r#"<div id="t" data-blend-behavior='{"behaviors": [{"type": "TimerBehavior", "totalTicks": 3, "millisecondsPerTick": 100, "triggeredActions": [{"type": "RecordAction"}]}]}'></div>"#,
        "[]",
    );
    rt.document_ready();
    let t = by_id(&rt, "t");
    assert_eq!(rt.scheduler().pending_timer_count(), 1);

    rt.advance(250);
    assert_eq!(log_of(&rt, t), "xx");
    rt.advance(50);
    assert_eq!(log_of(&rt, t), "xxx");
    assert_eq!(rt.scheduler().pending_timer_count(), 0);

    rt.advance(10_000);
    assert_eq!(log_of(&rt, t), "xxx");
}

#[test]
fn test_timer_tracks_attachments_independently() {
    let mut rt = runtime(r#"<p id="a"></p><p id="b"></p>"#, "[]");
    let a = by_id(&rt, "a");
    let b = by_id(&rt, "b");
    let timer = rt
        .create_behavior(
            "TimerBehavior",
            Some(r#"{"totalTicks": 2, "millisecondsPerTick": 100, "triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(a),
        )
        .unwrap();

    rt.advance(100);
    timer.attach(&mut rt, b);
    rt.advance(100);
    assert_eq!(log_of(&rt, a), "xx");
    assert_eq!(log_of(&rt, b), "x");

    rt.advance(500);
    assert_eq!(log_of(&rt, a), "xx");
    assert_eq!(log_of(&rt, b), "xx");
}

#[test]
fn test_timer_with_huge_period_never_fires() {
    let mut rt = runtime(r#"<p id="p"></p>"#, "[]");
    let p = by_id(&rt, "p");
    rt.advance(5);
    let timer = rt
        .create_behavior(
            "TimerBehavior",
            Some(r#"{"millisecondsPerTick": 1e30, "triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(p),
        )
        .unwrap();

    rt.advance(10);
    rt.advance(u64::MAX);
    assert_eq!(log_of(&rt, p), "x");
    assert!(timer.is_attached());

    timer.detach(&mut rt);
    assert!(!rt.scheduler().has_pending());
}

#[test]
fn test_infinite_timer_runs_until_detached() {
    let mut rt = runtime(r#"<p id="p"></p>"#, "[]");
    let p = by_id(&rt, "p");
    let actions = rt.parse_json(RECORD).unwrap();

    let mut timer = TimerBehavior::default();
    timer.set_property("totalTicks", Value::Number(f64::INFINITY));
    timer.set_property("millisecondsPerTick", Value::Number(10.0));
    timer.set_property("triggeredActions", actions);
    let timer: Rc<dyn Behavior> = Rc::new(timer);
    timer.attach(&mut rt, p);

    rt.advance(1000);
    assert_eq!(log_of(&rt, p).len(), 100);

    timer.detach(&mut rt);
    rt.advance(1000);
    assert_eq!(log_of(&rt, p).len(), 100);
    assert!(!rt.scheduler().has_pending());
}

// ============================================================================
// ANIMATION FRAME
// ============================================================================

#[test]
fn test_animation_frame_loop_until_detached() {
    let mut rt = runtime(r#"<canvas id="c"></canvas>"#, "[]");
    let c = by_id(&rt, "c");
    let behavior = rt
        .create_behavior(
            "RequestAnimationFrameBehavior",
            Some(r#"{"triggeredActions": [{"type": "RecordAction"}]}"#),
            Some(c),
        )
        .unwrap();
    assert_eq!(rt.scheduler().pending_frame_count(), 1);

    rt.advance_frames(5);
    assert_eq!(log_of(&rt, c), "xxxxx");
    assert_eq!(rt.scheduler().pending_frame_count(), 1);

    behavior.detach(&mut rt);
    assert_eq!(rt.scheduler().pending_frame_count(), 0);
    rt.advance_frames(3);
    assert_eq!(log_of(&rt, c), "xxxxx");
}

#[test]
fn test_animation_frame_stops_when_element_removed() {
    let mut rt = runtime(
        r#"<div id="wrap"><canvas id="c" data-blend-behavior='{"behaviors": [{"type": "RequestAnimationFrameBehavior", "triggeredActions": [{"type": "RecordAction"}]}]}'></canvas></div>"#,
        "[]",
    );
    rt.document_ready();
    let wrap = by_id(&rt, "wrap");
    let c = by_id(&rt, "c");

    rt.advance_frames(2);
    assert_eq!(log_of(&rt, c), "xx");

    assert!(rt.remove_element(wrap));
    assert_eq!(rt.scheduler().pending_frame_count(), 0);
    assert!(!rt.scopes().contains(c));
    rt.advance_frames(2);
    assert_eq!(log_of(&rt, c), "xx");
}
