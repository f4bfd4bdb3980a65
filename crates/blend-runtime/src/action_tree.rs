//! Action tree interpreter
//!
//! An action tree is a plain JSON object whose `actions` array holds
//! typed actions or further nested trees. Executing it walks the children
//! in declaration order, threading an explicit `ExecutionContext` (the
//! enclosing root, the call arguments and the scope element) instead of
//! shared "current tree" state, so nested invocations each see their own
//! root.

use crate::runtime::Runtime;
use crate::value::{CallArg, Value};
use blend_dom::NodeId;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// State threaded through one walk of an action tree
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    /// Composite root currently executing, if any
    pub tree: Option<&'a Value>,
    /// Arguments of the invocation
    pub args: &'a [CallArg],
    /// Element the actions apply to when they name no target
    pub element: Option<NodeId>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(args: &'a [CallArg]) -> Self {
        Self {
            tree: None,
            args,
            element: None,
        }
    }

    pub fn with_element(mut self, element: NodeId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_tree(mut self, tree: &'a Value) -> Self {
        self.tree = Some(tree);
        self
    }
}

/// Execute one node of an action tree
///
/// A typed action runs and its result is returned. Any other node is
/// treated as a composite: when its first argument is an event, the
/// event's current target becomes the scope element and the arguments are
/// stored in that element's scope state; then each child in `actions`
/// runs in order. Composites return `Value::Null`.
pub fn execute_action(rt: &mut Runtime, node: &Value, ctx: ExecutionContext<'_>) -> Value {
    if let Value::Action(action) = node {
        let action = Rc::clone(action);
        return action.execute(rt, ctx);
    }

    let Some(actions) = node.get("actions").and_then(Value::as_array) else {
        return Value::Null;
    };

    let mut element = ctx.element;
    if let Some(event) = ctx.args.first().and_then(CallArg::as_event) {
        let scope = event.current_target.unwrap_or(event.target);
        element = Some(scope);
        rt.scopes.set_arguments(scope, ctx.args.to_vec());
    }

    let child_ctx = ExecutionContext {
        tree: Some(node),
        args: ctx.args,
        element,
    };
    for child in actions {
        execute_action(rt, child, child_ctx);
    }
    Value::Null
}

/// Callable wrapper around an action-tree root
#[derive(Debug, Clone)]
pub struct ActionTreeFunction {
    root: Rc<Value>,
}

impl ActionTreeFunction {
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Marked as safe to invoke from declarative markup
    pub fn supported_for_processing(&self) -> bool {
        true
    }

    /// Run the tree with `args`, forwarding them unchanged
    pub fn call(&self, rt: &mut Runtime, args: &[CallArg]) -> Value {
        let root = Rc::clone(&self.root);
        execute_action(rt, &root, ExecutionContext::new(args))
    }
}

/// Wrap a root in a callable
pub fn create_action_tree_function(root: Rc<Value>) -> ActionTreeFunction {
    ActionTreeFunction { root }
}

/// Named action-tree definitions and the callables published for them
#[derive(Debug, Default)]
pub struct ActionTreeRegistry {
    definitions: BTreeMap<String, Rc<Value>>,
    globals: HashMap<String, ActionTreeFunction>,
}

impl ActionTreeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a definition; returns true if it replaced an earlier one
    pub fn define(&mut self, name: &str, root: Rc<Value>) -> bool {
        self.definitions.insert(name.to_string(), root).is_some()
    }

    pub fn definition(&self, name: &str) -> Option<&Rc<Value>> {
        self.definitions.get(name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Rc<Value>)> {
        self.definitions.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Publish a callable under `name` (last registration wins)
    pub fn register(&mut self, name: &str, function: ActionTreeFunction) {
        tracing::trace!("Registered action tree {}", name);
        self.globals.insert(name.to_string(), function);
    }

    pub fn function(&self, name: &str) -> Option<&ActionTreeFunction> {
        self.globals.get(name)
    }

    /// Names of the published callables, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.globals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Runtime {
    /// Wrap `root` in a callable and publish it under `name`
    pub fn create_and_register_action_tree(&mut self, name: &str, root: Rc<Value>) {
        let function = create_action_tree_function(root);
        self.trees.register(name, function);
    }

    /// Call a published action tree by name
    ///
    /// Returns `None` when nothing is registered under `name`.
    pub fn invoke(&mut self, name: &str, args: &[CallArg]) -> Option<Value> {
        let function = self.trees.function(name)?.clone();
        Some(function.call(self, args))
    }

    pub fn action_trees(&self) -> &ActionTreeRegistry {
        &self.trees
    }
}
