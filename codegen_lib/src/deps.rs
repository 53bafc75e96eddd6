//! Per-entity dependency accumulation.

use std::collections::BTreeSet;

use poolgen_ir::FieldType;

/// Namespace of the dynamic core crate, imported by every generated
/// file.
pub const MODELS_NS: &str = "models";

/// Collects the external namespaces one generated file must import.
///
/// Insertion-ordered and deduplicated: every field type and every method
/// parameter/return type contributes at most once. Anonymous containers
/// contribute their element's namespace, never their own (see
/// [`FieldType::dep_namespace`]).
pub struct DepTracker {
    seen: BTreeSet<String>,
    deps: Vec<String>,
}

impl DepTracker {
    /// A tracker pre-seeded with the dynamic core's namespace.
    pub fn new() -> Self {
        let mut tracker = Self {
            seen: BTreeSet::new(),
            deps: Vec::new(),
        };
        tracker.add_namespace(MODELS_NS);
        tracker
    }

    /// Record the namespace `ty` depends on, if any.
    pub fn add(&mut self, ty: &FieldType) {
        if let Some(ns) = ty.dep_namespace() {
            self.add_namespace(ns);
        }
    }

    fn add_namespace(&mut self, ns: &str) {
        if self.seen.insert(ns.to_string()) {
            self.deps.push(ns.to_string());
        }
    }

    /// The accumulated namespaces, in first-mention order.
    pub fn into_deps(self) -> Vec<String> {
        self.deps
    }
}

impl Default for DepTracker {
    fn default() -> Self {
        Self::new()
    }
}
