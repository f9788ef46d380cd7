//! Stock list/vector builtins: construction, predicates, and the one
//! shape-agnostic pair (`emptyp`/`count`) that accepts either sequence.

use crate::error::EvalError;
use crate::value::Value;

pub fn list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

pub fn listp(args: &[Value]) -> Result<Value, EvalError> {
    let [v] = args else {
        return Err(EvalError::illegal_type("listp", "exactly 1 argument", "different arity"));
    };
    Ok(Value::Bool(matches!(v, Value::List(_))))
}

pub fn vector(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::vector(args.to_vec()))
}

pub fn vectorp(args: &[Value]) -> Result<Value, EvalError> {
    let [v] = args else {
        return Err(EvalError::illegal_type("vectorp", "exactly 1 argument", "different arity"));
    };
    Ok(Value::Bool(matches!(v, Value::Vector(_))))
}

pub fn emptyp(args: &[Value]) -> Result<Value, EvalError> {
    let [v] = args else {
        return Err(EvalError::illegal_type("emptyp", "exactly 1 argument", "different arity"));
    };
    Ok(Value::Bool(v.as_sequence("emptyp")?.is_empty()))
}

pub fn count(args: &[Value]) -> Result<Value, EvalError> {
    let [v] = args else {
        return Err(EvalError::illegal_type("count", "exactly 1 argument", "different arity"));
    };
    Ok(Value::Number(v.as_sequence("count")?.len() as f64))
}

/// Out-of-range or non-integral indices yield `Bool(false)` rather than
/// an error — mirroring `get_var`'s miss convention rather than raising.
pub fn aref(args: &[Value]) -> Result<Value, EvalError> {
    let [v, idx] = args else {
        return Err(EvalError::illegal_type("aref", "exactly 2 arguments", "different arity"));
    };
    let elems = v.as_vector("aref")?;
    let idx = idx.as_number("aref")?;
    if idx < 0.0 || idx.fract() != 0.0 {
        return Ok(Value::Bool(false));
    }
    Ok(elems.get(idx as usize).cloned().unwrap_or(Value::Bool(false)))
}

pub fn register(env: &std::rc::Rc<crate::env::Environment>) {
    env.add_callable("list", crate::value::Callable::builtin("list", list));
    env.add_callable("listp", crate::value::Callable::builtin("listp", listp));
    env.add_callable("vector", crate::value::Callable::builtin("vector", vector));
    env.add_callable("vectorp", crate::value::Callable::builtin("vectorp", vectorp));
    env.add_callable("emptyp", crate::value::Callable::builtin("emptyp", emptyp));
    env.add_callable("count", crate::value::Callable::builtin("count", count));
    env.add_callable("aref", crate::value::Callable::builtin("aref", aref));
}
