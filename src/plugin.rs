// ABOUTME: Plugin dispatcher contract and registration table

//! Plugin dispatcher (C7).
//!
//! A plugin is an object offering a short name and a static mapping from
//! symbol-name to plugin-callable; each callable takes the prepared
//! argument list and an opaque context pointer back to the plugin. No
//! concrete plugin ships with this crate — only the contract by which one
//! plugs into the dispatcher, exercised by a test-only plugin below.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Callable, CallableKind, CallablePayload, Value};

/// A plugin-exposed operation: prepared arguments plus the plugin's own
/// context, by which it can reach back into whatever state it owns.
pub type PluginOp = fn(&[Value], &dyn Plugin) -> Result<Value, EvalError>;

pub trait Plugin {
    fn name(&self) -> &str;
    fn ops(&self) -> Vec<(&'static str, PluginOp)>;

    /// Lets test/diagnostic code recover the concrete plugin behind the
    /// trait object; the core never calls this itself.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Registers plugins and routes `PluginBuiltin` calls back to them.
#[derive(Default)]
pub struct PluginDispatcher {
    plugins: RefCell<HashMap<String, Rc<dyn Plugin>>>,
}

impl PluginDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splices each of the plugin's exposed operations into `env`'s
    /// fnTable under `origin = plugin.name()`, `kind = PluginBuiltin`.
    /// A later registration under the same plugin name, or the same
    /// operation name, silently overwrites the earlier one.
    pub fn register(&self, env: &Rc<Environment>, plugin: Rc<dyn Plugin>) {
        let name: Rc<str> = Rc::from(plugin.name());
        for (op_name, op) in plugin.ops() {
            env.add_callable(
                op_name.to_string(),
                Callable {
                    kind: CallableKind::PluginBuiltin,
                    payload: CallablePayload::Plugin(op),
                    origin: Rc::clone(&name),
                },
            );
        }
        self.plugins.borrow_mut().insert(name.to_string(), plugin);
    }

    /// Looks the plugin up by `origin` and invokes `op` with its context.
    pub fn invoke(&self, origin: &str, op: PluginOp, args: &[Value]) -> Result<Value, EvalError> {
        let plugin = self.plugins.borrow().get(origin).cloned().ok_or_else(|| {
            EvalError::unhandled(format!("plugin `{origin}` is not registered"))
        })?;
        op(args, plugin.as_ref())
    }
}
