// ABOUTME: Lexically scoped environment with data and fnTable maps

//! Lexically scoped environments (C5): a `data` name→Value map, an
//! `fnTable` name→Callable map, and a non-owning `outer` link.
//!
//! `outer` is a `Weak` reference so a child never keeps its parent alive —
//! the only thing that breaks the Function→Env→Function cycle nested
//! lambdas can form. `fnTable` is shallow-copied from the parent at child
//! construction (a plain `HashMap::clone`), giving O(1) dispatch with no
//! chain walk at call time; entries added to a child afterwards, or added
//! to the parent afterwards, are each invisible to the other.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::EvalError;
use crate::value::{Callable, Value};

/// `Transparent` envs (let-blocks) are expected to die at the end of
/// their lexical scope; `Independent` envs (lambda closures) are meant to
/// live as long as the `Function` value that owns them. Because `Rc`
/// already drops an environment the moment nothing references it, this
/// crate doesn't need the arena/cascade release machinery a manual-memory
/// implementation would — `ChildKind` only records *intent*, for
/// assertions and documentation, not a release mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Transparent,
    Independent,
}

#[derive(Debug)]
pub struct Environment {
    data: RefCell<HashMap<String, Value>>,
    fn_table: RefCell<HashMap<String, Callable>>,
    outer: Option<Weak<Environment>>,
    kind: ChildKind,
}

impl Environment {
    /// A fresh root environment: no outer, empty `data`/`fnTable`. The
    /// stock fnTable and special-form markers are installed by callers
    /// (`eval::install_special_forms`, `builtins::register_stock`), not
    /// here, so this module has no dependency on the evaluator or the
    /// builtin modules.
    pub fn new_root() -> Rc<Environment> {
        Rc::new(Environment {
            data: RefCell::new(HashMap::new()),
            fn_table: RefCell::new(HashMap::new()),
            outer: None,
            kind: ChildKind::Independent,
        })
    }

    pub fn new_child(parent: &Rc<Environment>, kind: ChildKind) -> Rc<Environment> {
        Rc::new(Environment {
            data: RefCell::new(HashMap::new()),
            fn_table: RefCell::new(parent.fn_table.borrow().clone()),
            outer: Some(Rc::downgrade(parent)),
            kind,
        })
    }

    pub fn kind(&self) -> ChildKind {
        self.kind
    }

    /// Introduces or overwrites a binding in this scope only.
    pub fn add_var(&self, name: impl Into<String>, value: Value) {
        self.data.borrow_mut().insert(name.into(), value);
    }

    /// Overwrites a binding that already exists in this scope. Used
    /// internally by the `lambda` call path to rebind a parameter: the
    /// first call transitions it from `Undefined` to a real value; later
    /// calls of the same closure overwrite that value again, since the
    /// closure's environment (and its parameter bindings) are shared
    /// across all of its invocations (see DESIGN.md). Not exposed to user
    /// code.
    pub fn set_var(&self, name: &str, value: Value) -> Result<(), EvalError> {
        let mut data = self.data.borrow_mut();
        if data.contains_key(name) {
            data.insert(name.to_string(), value);
            Ok(())
        } else {
            Err(EvalError::unhandled(format!(
                "set_var: `{name}` has no prior binding"
            )))
        }
    }

    /// Walks the outer chain; a missing name yields `Bool(false)` rather
    /// than an error, per the evaluator's apply rule.
    pub fn get_var(&self, name: &str) -> Value {
        if let Some(value) = self.data.borrow().get(name) {
            return value.clone();
        }
        if let Some(outer) = self.outer.as_ref().and_then(Weak::upgrade) {
            return outer.get_var(name);
        }
        Value::Bool(false)
    }

    pub fn remove_var(&self, name: &str) -> Option<Value> {
        self.data.borrow_mut().remove(name)
    }

    pub fn add_callable(&self, name: impl Into<String>, callable: Callable) {
        self.fn_table.borrow_mut().insert(name.into(), callable);
    }

    /// fnTable lookup never walks `outer` at call time — the shallow copy
    /// at construction already did that work once.
    pub fn get_callable(&self, name: &str) -> Option<Callable> {
        self.fn_table.borrow().get(name).cloned()
    }

    pub fn remove_callable(&self, name: &str) -> Option<Callable> {
        self.fn_table.borrow_mut().remove(name)
    }
}
