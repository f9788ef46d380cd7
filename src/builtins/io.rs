//! Stock I/O and meta builtins: string/form conversion (`pr-str`, `str`,
//! `read-string`), re-entrant evaluation (`eval`, `load`), and the
//! filesystem collaborator surface (`fs-load`, `slurp`).
//!
//! The active `Loader` is process-wide state held in a thread-local — the
//! core is single-threaded (see SPEC_FULL.md §5), so this is just a
//! convenient way to avoid threading a loader handle through every
//! builtin call, not a concurrency primitive.

use std::cell::RefCell;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::loader::Loader;
use crate::plugin::PluginDispatcher;
use crate::printer::pr_str;
use crate::reader::read_str;
use crate::value::Value;

thread_local! {
    static LOADER: RefCell<Option<Loader>> = const { RefCell::new(None) };
}

pub fn set_loader(loader: Loader) {
    LOADER.with(|cell| *cell.borrow_mut() = Some(loader));
}

fn read_file(path: &str) -> Result<String, EvalError> {
    LOADER.with(|cell| {
        cell.borrow()
            .as_ref()
            .ok_or_else(|| EvalError::unhandled("no filesystem loader installed"))?
            .read_all(path)
    })
}

pub fn slurp(args: &[Value]) -> Result<Value, EvalError> {
    let [path] = args else {
        return Err(EvalError::illegal_type("slurp", "exactly 1 argument", "different arity"));
    };
    let path = path.as_string("slurp")?;
    Ok(Value::string(read_file(path)?))
}

pub fn read_string(args: &[Value]) -> Result<Value, EvalError> {
    let [s] = args else {
        return Err(EvalError::illegal_type("read-string", "exactly 1 argument", "different arity"));
    };
    Ok(read_str(s.as_string("read-string")?))
}

pub fn pr_str_builtin(args: &[Value]) -> Result<Value, EvalError> {
    let [v] = args else {
        return Err(EvalError::illegal_type("pr-str", "exactly 1 argument", "different arity"));
    };
    Ok(Value::string(pr_str(v, true)))
}

pub fn str_builtin(args: &[Value]) -> Result<Value, EvalError> {
    let [v] = args else {
        return Err(EvalError::illegal_type("str", "exactly 1 argument", "different arity"));
    };
    Ok(Value::string(pr_str(v, false)))
}

/// Re-enters the evaluator on an already-parsed form, in the calling
/// environment. Needs the env and dispatcher, so it's wired directly as
/// an `EnvBuiltinFn` rather than through the `#[builtin]` macro.
pub fn eval_builtin(args: &[Value], env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Value, EvalError> {
    let [form] = args else {
        return Err(EvalError::illegal_type("eval", "exactly 1 argument", "different arity"));
    };
    crate::eval::eval(form, env, dispatcher)
}

/// Reads a file through the installed loader, parses every top-level
/// form in it, and evaluates each in the calling environment in order,
/// returning the last result — a file is a library of definitions, not
/// a single expression. The parsed trees aren't retained anywhere
/// afterward — their `Rc<str>`/`Rc<Vec<Value>>` payloads already keep
/// themselves alive independently of this call.
pub fn load_builtin(args: &[Value], env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Value, EvalError> {
    let [path] = args else {
        return Err(EvalError::illegal_type("load", "exactly 1 argument", "different arity"));
    };
    let path = path.as_string("load")?;
    let source = read_file(path)?;

    let mut result = Value::Bool(false);
    for form in crate::reader::read_all(&source) {
        if matches!(form, Value::Incomplete) {
            return Err(EvalError::illegal_type("load", "a complete form", "Incomplete"));
        }
        result = crate::eval::eval(&form, env, dispatcher)?;
    }
    Ok(result)
}

pub fn register(env: &Rc<Environment>) {
    env.add_callable("slurp", crate::value::Callable::builtin("slurp", slurp));
    // `fs-load` is identical in scope to `slurp` per the spec: both read
    // a path to a String through the installed loader.
    env.add_callable("fs-load", crate::value::Callable::builtin("fs-load", slurp));
    env.add_callable("read-string", crate::value::Callable::builtin("read-string", read_string));
    env.add_callable("pr-str", crate::value::Callable::builtin("pr-str", pr_str_builtin));
    env.add_callable("str", crate::value::Callable::builtin("str", str_builtin));
    env.add_callable("eval", crate::value::Callable::builtin_with_env(eval_builtin));
    env.add_callable("load", crate::value::Callable::builtin_with_env(load_builtin));
}
