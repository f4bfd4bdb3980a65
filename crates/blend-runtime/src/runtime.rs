//! Runtime
//!
//! Owns the document and every piece of process-wide state the behaviors
//! and action trees work against: the type registry, the published action
//! trees, per-element scope state, listeners, the virtual-clock scheduler
//! and the diagnostic sink. Everything runs on one thread; callbacks get
//! `&mut Runtime` when they fire.

use crate::action_tree::{ActionTreeRegistry, ExecutionContext, execute_action};
use crate::behaviors::{BEHAVIOR_BASE, Behavior, BehaviorExt};
use crate::config::RuntimeConfig;
use crate::deserialize::Deserializer;
use crate::diagnostics::Diagnostics;
use crate::error::{BlendError, Result};
use crate::listeners::{EventCallback, EventListenerRegistry, ListenerId};
use crate::loader::{FileSource, FsFileSource};
use crate::registry::TypeRegistry;
use crate::scheduler::{FrameId, Scheduler, TaskCallback, TimerId};
use crate::scope::ScopeTable;
use crate::value::{CallArg, Value};
use blend_dom::{Document, Event, NodeId};
use std::rc::Rc;

/// Blend runtime bound to one document
pub struct Runtime {
    pub(crate) document: Document,
    pub(crate) scheduler: Scheduler,
    pub(crate) listeners: EventListenerRegistry,
    pub(crate) types: TypeRegistry,
    pub(crate) trees: ActionTreeRegistry,
    pub(crate) scopes: ScopeTable,
    /// Elements processed by the attachment manager
    pub(crate) elements_with_behaviors: Vec<NodeId>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) config: RuntimeConfig,
    pub(crate) files: Box<dyn FileSource>,
    pub(crate) ready: bool,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("listeners", &self.listeners)
            .field("trees", &self.trees.names())
            .field("scopes", &self.scopes.len())
            .field("elements_with_behaviors", &self.elements_with_behaviors)
            .field("ready", &self.ready)
            .finish()
    }
}

impl Runtime {
    /// Create a runtime reading files from `config.root_dir`
    pub fn new(document: Document, config: RuntimeConfig) -> Self {
        let files = FsFileSource::new(config.root_dir.clone());
        Self::with_files(document, config, files)
    }

    /// Create a runtime with a custom file source
    pub fn with_files(
        document: Document,
        config: RuntimeConfig,
        files: impl FileSource + 'static,
    ) -> Self {
        Self {
            document,
            scheduler: Scheduler::new(),
            listeners: EventListenerRegistry::new(),
            types: TypeRegistry::with_builtins(),
            trees: ActionTreeRegistry::new(),
            scopes: ScopeTable::new(),
            elements_with_behaviors: Vec::new(),
            diagnostics: Diagnostics::new(config.capture_diagnostics),
            config,
            files: Box::new(files),
            ready: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Register additional types
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Deserializer reporting to this runtime's diagnostics
    pub fn deserializer(&mut self) -> Deserializer<'_> {
        Deserializer::new(&self.types, &mut self.diagnostics)
    }

    /// Parse JSON text, reviving typed objects
    ///
    /// Malformed JSON is an `Err`; shape problems are only reported.
    pub fn parse_json(&mut self, text: &str) -> Result<Value> {
        self.deserializer().parse_str(text)
    }

    /// Load a file through the file source
    pub fn load_file(&self, path: &str) -> Result<String> {
        self.files.load_file(path)
    }

    /// Document-wide selector query
    ///
    /// An invalid selector is reported as a warning and matches nothing.
    pub fn query_selector_all(&mut self, selector: &str) -> Vec<NodeId> {
        match self.document.query_selector_all(NodeId::ROOT, selector) {
            Ok(matches) => matches,
            Err(err) => {
                self.diagnostics
                    .report_warning("Blend.Dom.InvalidSelector", &[&selector, &err]);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Element removal
    // ------------------------------------------------------------------

    /// Remove `element` from the document, releasing its subtree
    pub fn remove_element(&mut self, element: NodeId) -> bool {
        self.release_subtree(element);
        self.document.remove_node(element)
    }

    /// Remove every child of `parent`, releasing their subtrees
    pub fn remove_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children = self.document.tree().children(parent).to_vec();
        for child in children {
            self.release_subtree(child);
        }
        self.document.remove_children(parent)
    }

    /// Detach behaviors, drop listeners and scope state below `root`
    fn release_subtree(&mut self, root: NodeId) {
        for node in self.document.tree().subtree(root) {
            for behavior in self.scopes.behaviors(node) {
                behavior.detach_from(self, node);
            }
            self.listeners.clear_node(node);
            self.scopes.remove(node);
            self.elements_with_behaviors.retain(|&e| e != node);
        }
    }

    // ------------------------------------------------------------------
    // Behaviors
    // ------------------------------------------------------------------

    /// Construct a behavior by type name
    ///
    /// `config` is a JSON object whose entries are assigned as properties.
    /// With `element`, the new behavior is attached to it at once.
    pub fn create_behavior(
        &mut self,
        type_name: &str,
        config: Option<&str>,
        element: Option<NodeId>,
    ) -> Result<Rc<dyn Behavior>> {
        let descriptor = self
            .types
            .resolve(type_name)
            .ok_or_else(|| BlendError::UnknownType(type_name.to_string()))?;
        if !self.types.is_a(descriptor.name, BEHAVIOR_BASE) {
            return Err(BlendError::NotABehavior(type_name.to_string()));
        }
        let mut instance = descriptor
            .construct()
            .ok_or_else(|| BlendError::NotConstructible(type_name.to_string()))?;

        if let Some(text) = config {
            self.deserializer().populate(&mut instance, text)?;
        }
        let Value::Behavior(behavior) = instance.into_value() else {
            return Err(BlendError::NotABehavior(type_name.to_string()));
        };
        if let Some(element) = element {
            behavior.attach(self, element);
        }
        Ok(behavior)
    }

    /// Change a property on a live behavior
    ///
    /// Properties with runtime rewiring (`event`, `sourceSelector`) move
    /// the behavior's listeners; returns false for anything else.
    pub fn set_behavior_property(
        &mut self,
        behavior: &Rc<dyn Behavior>,
        name: &str,
        value: Value,
    ) -> bool {
        Rc::clone(behavior).update_property(self, name, value)
    }

    // ------------------------------------------------------------------
    // Timers and animation frames
    // ------------------------------------------------------------------

    pub fn set_timeout(&mut self, callback: TaskCallback, delay_ms: u64) -> TimerId {
        self.scheduler.set_timeout(callback, delay_ms)
    }

    pub fn set_interval(&mut self, callback: TaskCallback, period_ms: u64) -> TimerId {
        self.scheduler.set_interval(callback, period_ms)
    }

    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        self.scheduler.clear_timer(id)
    }

    pub fn request_animation_frame(&mut self, callback: TaskCallback) -> FrameId {
        self.scheduler.request_frame(callback)
    }

    pub fn cancel_animation_frame(&mut self, id: FrameId) -> bool {
        self.scheduler.cancel_frame(id)
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Advance the virtual clock by `ms`, firing due timers in order
    ///
    /// Timers scheduled by a callback fire in the same call when they fall
    /// due before the target time.
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(ms);
        while let Some(callback) = self.scheduler.pop_due(target) {
            callback(self);
        }
        self.scheduler.set_now(target);
    }

    /// Run the frames requested before this frame began
    ///
    /// Returns the number of callbacks run.
    pub fn run_animation_frame(&mut self) -> usize {
        let mut ran = 0;
        for id in self.scheduler.pending_frames() {
            if let Some(callback) = self.scheduler.take_frame(id) {
                callback(self);
                ran += 1;
            }
        }
        ran
    }

    /// Advance one frame interval and run a frame, `count` times
    pub fn advance_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.advance(self.config.frame_interval_ms);
            self.run_animation_frame();
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        callback: EventCallback,
    ) -> ListenerId {
        self.listeners.add_listener(node, event_type, callback)
    }

    pub fn remove_event_listener(&mut self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        self.listeners.remove_listener(node, event_type, id)
    }

    /// Number of listeners registered on `node`
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.count(node)
    }

    /// Dispatch a bubbling event of `event_type` at `target`
    pub fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Event {
        let event = Event::new(event_type, target).with_timestamp(self.now_ms() as f64);
        self.dispatch(event)
    }

    /// Deliver `event` to its target, then to ancestors if it bubbles
    ///
    /// At each node the inline `on<type>` handler runs first, then the
    /// listeners registered when delivery reached that node. A listener
    /// removed by an earlier one is skipped.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        let target = event.target;
        let mut path = vec![target];
        if event.bubbles {
            path.extend(self.document.tree().ancestors(target));
        }
        tracing::trace!("Dispatching {} at {}", event.event_type, target);

        for node in path {
            event.current_target = Some(node);
            if self.config.inline_handlers {
                self.run_inline_handler(node, &event);
            }
            let event_type = event.event_type.clone();
            for (id, callback) in self.listeners.get_listeners(node, &event_type) {
                if !self.listeners.contains(node, &event_type, id) {
                    continue;
                }
                callback(self, &event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event.current_target = None;
        event
    }

    fn run_inline_handler(&mut self, node: NodeId, event: &Event) {
        let attribute = format!("on{}", event.event_type);
        let Some(source) = self.document.get_attribute(node, &attribute) else {
            return;
        };
        let Some((name, raw_args)) = parse_inline_call(source) else {
            self.diagnostics
                .debug(format!("Unsupported inline handler {attribute}=\"{source}\""));
            return;
        };
        let name = name.to_string();

        let mut args = Vec::with_capacity(raw_args.len());
        for raw in raw_args {
            match inline_argument(raw, node, event) {
                Some(arg) => args.push(arg),
                None => {
                    self.diagnostics
                        .debug(format!("Unsupported inline handler argument \"{raw}\""));
                    return;
                }
            }
        }
        if self.invoke(&name, &args).is_none() {
            self.diagnostics
                .debug(format!("Inline handler calls unknown action tree \"{name}\""));
        }
    }

    // ------------------------------------------------------------------
    // Fragment loading
    // ------------------------------------------------------------------

    /// Load `page` into `target` on a later scheduler turn
    ///
    /// Once the markup is in place its behaviors are processed and the
    /// `page_loaded` actions run with `target` as scope element. A missing
    /// page or a target removed in the meantime ends the load quietly.
    pub fn load_page(&mut self, target: NodeId, page: &str, page_loaded: Vec<Value>) {
        let page = page.to_string();
        let page_loaded = Rc::new(page_loaded);
        self.set_timeout(
            Rc::new(move |rt: &mut Runtime| {
                rt.complete_page_load(target, &page, &page_loaded)
            }),
            0,
        );
    }

    fn complete_page_load(&mut self, target: NodeId, page: &str, page_loaded: &[Value]) {
        if !self.document.is_connected(target) {
            self.diagnostics
                .debug(format!("Page \"{page}\" target {target} is no longer in the document"));
            return;
        }
        let html = match self.files.load_file(page) {
            Ok(html) => html,
            Err(err) => {
                self.diagnostics.debug(format!("Failed to load page \"{page}\": {err}"));
                return;
            }
        };
        tracing::debug!("Loaded page {} into {}", page, target);
        self.document.append_html(target, &html);
        self.process_all(Some(target));

        let ctx = ExecutionContext::new(&[]).with_element(target);
        for action in page_loaded {
            execute_action(self, action, ctx);
        }
    }
}

/// Split `Name(a, b);` into the name and raw argument texts
fn parse_inline_call(source: &str) -> Option<(&str, Vec<&str>)> {
    let source = source.trim().trim_end_matches(';').trim_end();
    let (name, rest) = source.split_once('(')?;
    let inner = rest.strip_suffix(')')?;
    if inner.contains(['(', ')']) {
        return None;
    }
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
        return None;
    }
    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    };
    Some((name, args))
}

fn inline_argument(raw: &str, node: NodeId, event: &Event) -> Option<CallArg> {
    match raw {
        "event" => Some(CallArg::Event(event.clone())),
        "this" => Some(CallArg::Value(Value::Element(node))),
        "null" => Some(CallArg::Value(Value::Null)),
        "true" => Some(CallArg::Value(Value::Bool(true))),
        "false" => Some(CallArg::Value(Value::Bool(false))),
        _ => {
            let quoted = ['\'', '"']
                .iter()
                .find_map(|&q| raw.strip_prefix(q).and_then(|r| r.strip_suffix(q)));
            if let Some(text) = quoted {
                return Some(CallArg::Value(Value::from(text)));
            }
            raw.parse::<f64>().ok().map(|n| CallArg::Value(Value::Number(n)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryFiles;
    use std::cell::RefCell;

    fn runtime(html: &str) -> Runtime {
        let config = RuntimeConfig {
            capture_diagnostics: true,
            ..RuntimeConfig::default()
        };
        Runtime::with_files(Document::parse(html), config, MemoryFiles::new())
    }

    #[test]
    fn test_parse_inline_call() {
        assert_eq!(parse_inline_call("Foo(event);"), Some(("Foo", vec!["event"])));
        assert_eq!(parse_inline_call(" Foo() "), Some(("Foo", vec![])));
        assert_eq!(
            parse_inline_call("Foo(event, 'x', 2)"),
            Some(("Foo", vec!["event", "'x'", "2"]))
        );
        assert_eq!(parse_inline_call("alert('hi'); Foo()"), None);
        assert_eq!(parse_inline_call("Foo"), None);
    }

    #[test]
    fn test_advance_fires_in_order() {
        let mut rt = runtime("");
        let log = Rc::new(RefCell::new(Vec::new()));
        for (label, delay) in [("b", 20), ("a", 10), ("c", 20)] {
            let log = Rc::clone(&log);
            rt.set_timeout(Rc::new(move |_: &mut Runtime| log.borrow_mut().push(label)), delay);
        }
        rt.advance(15);
        assert_eq!(*log.borrow(), vec!["a"]);
        rt.advance(5);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(rt.now_ms(), 20);
    }

    #[test]
    fn test_frames_requested_during_frame_wait() {
        let mut rt = runtime("");
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        rt.request_animation_frame(Rc::new(move |rt: &mut Runtime| {
            *counter.borrow_mut() += 1;
            let counter = Rc::clone(&counter);
            rt.request_animation_frame(Rc::new(move |_: &mut Runtime| {
                *counter.borrow_mut() += 1;
            }));
        }));
        assert_eq!(rt.run_animation_frame(), 1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(rt.run_animation_frame(), 1);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_dispatch_bubbles_and_stops() {
        let mut rt = runtime("<div id=outer><p id=inner></p></div>");
        let outer = rt.document().get_element_by_id("outer").unwrap();
        let inner = rt.document().get_element_by_id("inner").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        rt.add_event_listener(
            inner,
            "click",
            Rc::new(move |_: &mut Runtime, e: &Event| log.borrow_mut().push(e.current_target)),
        );
        let log = Rc::clone(&seen);
        rt.add_event_listener(
            outer,
            "click",
            Rc::new(move |_: &mut Runtime, e: &Event| {
                log.borrow_mut().push(e.current_target);
                e.stop_propagation();
            }),
        );

        let event = rt.dispatch_event(inner, "click");
        assert!(event.propagation_stopped());
        assert_eq!(*seen.borrow(), vec![Some(inner), Some(outer)]);
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let mut rt = runtime("<p id=p></p>");
        let p = rt.document().get_element_by_id("p").unwrap();
        let fired = Rc::new(RefCell::new(0));
        let second: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));

        let handle = Rc::clone(&second);
        rt.add_event_listener(
            p,
            "click",
            Rc::new(move |rt: &mut Runtime, _: &Event| {
                if let Some(id) = *handle.borrow() {
                    rt.remove_event_listener(p, "click", id);
                }
            }),
        );
        let counter = Rc::clone(&fired);
        let id = rt.add_event_listener(
            p,
            "click",
            Rc::new(move |_: &mut Runtime, _: &Event| *counter.borrow_mut() += 1),
        );
        *second.borrow_mut() = Some(id);

        rt.dispatch_event(p, "click");
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let mut rt = runtime("<p></p>");
        assert!(rt.query_selector_all("p[").is_empty());
        assert_eq!(rt.diagnostics().count("Blend.Dom.InvalidSelector"), 1);
    }

    #[test]
    fn test_parse_json_error() {
        let mut rt = runtime("");
        assert!(matches!(rt.parse_json("{oops"), Err(BlendError::Json(_))));
    }
}
