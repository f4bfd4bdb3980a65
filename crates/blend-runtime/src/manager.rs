//! Behavior attachment manager
//!
//! Finds elements carrying the declarative behavior attribute, resolves
//! the attribute value to a behavior set (a named action tree or inline
//! JSON) and attaches it, detaching whatever an earlier pass attached.

use crate::behaviors::{Behavior, BehaviorExt};
use crate::resources::format_message;
use crate::runtime::Runtime;
use crate::value::Value;
use blend_dom::NodeId;
use std::collections::HashSet;
use std::rc::Rc;

impl Runtime {
    /// One-time document-ready pass over the whole document
    ///
    /// Later calls do nothing; use [`Runtime::process_all`] to rescan.
    pub fn document_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        tracing::debug!("Document ready");
        self.process_all(None);
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Load the action-tree file and (re)attach every declarative behavior
    /// under `root` (the whole document when `None`)
    pub fn process_all(&mut self, root: Option<NodeId>) {
        self.process_actions();

        let attribute = self.config.behavior_attribute.clone();
        let selector = format!("[{attribute}]");
        let elements = match root {
            Some(root) => {
                let mut elements = Vec::new();
                if self.document.get_attribute(root, &attribute).is_some() {
                    elements.push(root);
                }
                match self.document.query_selector_all(root, &selector) {
                    Ok(found) => elements.extend(found),
                    Err(err) => {
                        self.diagnostics
                            .report_warning("Blend.Dom.InvalidSelector", &[&selector, &err]);
                    }
                }
                elements
            }
            None => self.query_selector_all(&selector),
        };

        tracing::debug!("Processing {} element(s) with {}", elements.len(), attribute);
        for element in elements {
            if !self.document.is_connected(element) {
                continue;
            }
            self.detach_element(element);
            self.attach_element(element);
        }
    }

    /// Load the action-tree definition file and publish its trees
    ///
    /// A missing or unparsable file registers nothing. A file that is not
    /// a JSON array is reported; entries without a name are skipped.
    pub fn process_actions(&mut self) {
        let path = self.config.action_list_path.clone();
        let text = match self.files.load_file(&path) {
            Ok(text) => text,
            Err(err) => {
                self.diagnostics
                    .debug(format!("No action trees loaded from {path}: {err}"));
                return;
            }
        };
        let parsed = match self.parse_json(&text) {
            Ok(value) => value,
            Err(err) => {
                self.diagnostics
                    .debug(format!("Ignoring unparsable action trees in {path}: {err}"));
                return;
            }
        };
        if !parsed.is_truthy() {
            return;
        }
        let Value::Array(roots) = parsed else {
            self.diagnostics
                .report_error("Blend.ActionTrees.JsonNotArray", &[&text.trim()]);
            return;
        };

        let mut seen = HashSet::new();
        for (index, root) in roots.into_iter().enumerate() {
            if !root.is_truthy() {
                continue;
            }
            let Some(name) = root.get("name").and_then(Value::as_str).map(str::to_string) else {
                self.diagnostics
                    .report_error("Blend.ActionTrees.MissingName", &[&index]);
                continue;
            };
            self.trees.define(&name, Rc::new(root));
            if !seen.insert(name.clone()) {
                let message = format_message(
                    "Blend.ActionTrees.JsonDuplicateActionTreeName",
                    &[&name, &path],
                )
                .unwrap_or_else(|err| err.to_string());
                self.diagnostics.debug(message);
            }
        }

        let definitions: Vec<(String, Rc<Value>)> = self
            .trees
            .definitions()
            .map(|(name, root)| (name.to_string(), Rc::clone(root)))
            .collect();
        for (name, root) in definitions {
            self.create_and_register_action_tree(&name, root);
        }
    }

    /// Resolve the element's attribute and attach the behaviors it lists
    pub fn attach_element(&mut self, element: NodeId) {
        let attribute = self.config.behavior_attribute.clone();
        let Some(source) = self
            .document
            .get_attribute(element, &attribute)
            .map(str::to_string)
        else {
            return;
        };

        let named = self.trees.definition(source.trim()).cloned();
        let set = match named {
            Some(root) => root,
            None => match self.parse_json(&source) {
                Ok(value) => Rc::new(value),
                Err(err) => {
                    self.diagnostics.debug(format!(
                        "\"{source}\" on element {element} is neither an action tree nor JSON: {err}"
                    ));
                    return;
                }
            },
        };

        let entries = set
            .get("behaviors")
            .and_then(Value::as_array)
            .unwrap_or_default();
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                Value::Behavior(behavior) => behavior.attach(self, element),
                other => self.diagnostics.report_warning(
                    "Blend.Behaviors.InvalidBehavior",
                    &[&index, &source, &other.type_description()],
                ),
            }
        }

        if !self.elements_with_behaviors.contains(&element) {
            self.elements_with_behaviors.push(element);
        }
    }

    /// Detach every behavior attached to `element`
    ///
    /// Does nothing for elements the manager never processed.
    pub fn detach_element(&mut self, element: NodeId) {
        let Some(pos) = self
            .elements_with_behaviors
            .iter()
            .position(|&e| e == element)
        else {
            return;
        };
        self.elements_with_behaviors.remove(pos);
        for behavior in self.scopes.behaviors(element) {
            behavior.detach_from(self, element);
        }
    }

    /// Behaviors currently attached to `element`
    pub fn behavior_instances(&self, element: NodeId) -> Vec<Rc<dyn Behavior>> {
        self.scopes.behaviors(element)
    }

    /// Elements the manager has attached behaviors to
    pub fn elements_with_behaviors(&self) -> &[NodeId] {
        &self.elements_with_behaviors
    }
}
