//! Blend Runtime
//!
//! Declarative behaviors and action trees over a Blend DOM document.
//!
//! Elements opt in through a behavior attribute naming an action tree (or
//! holding inline JSON). Behaviors fire on DOM events, timers and
//! animation frames and run their triggered actions with the element as
//! scope. Action trees loaded from a JSON file are also published as
//! callables, invocable by name or from inline `on<event>` handlers.
//!
//! ```no_run
//! use blend_dom::Document;
//! use blend_runtime::{Runtime, RuntimeConfig};
//!
//! let page = Document::parse(r#"<button data-blend-behavior="Clicky">Go</button>"#);
//! let mut rt = Runtime::new(page, RuntimeConfig::default());
//! rt.document_ready();
//! rt.advance(1000);
//! println!("{}", rt.document().to_html());
//! ```

pub mod action_tree;
pub mod actions;
pub mod behaviors;
pub mod config;
pub mod deserialize;
pub mod diagnostics;
pub mod error;
pub mod listeners;
pub mod loader;
mod manager;
pub mod metadata;
pub mod registry;
pub mod resources;
mod runtime;
pub mod scheduler;
pub mod scope;
pub mod value;

pub use action_tree::{
    ActionTreeFunction, ActionTreeRegistry, ExecutionContext, create_action_tree_function,
    execute_action,
};
pub use actions::{Action, Target};
pub use behaviors::{Behavior, BehaviorExt};
pub use config::RuntimeConfig;
pub use deserialize::Deserializer;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{BlendError, Result};
pub use loader::{FileSource, FsFileSource, MemoryFiles};
pub use registry::{Instance, JsonObject, TypeDescriptor, TypeRegistry};
pub use runtime::Runtime;
pub use value::{CallArg, Map, Value};
