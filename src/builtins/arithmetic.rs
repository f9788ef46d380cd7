//! Stock arithmetic builtins: `+ - * /`, each requiring at least 2
//! arguments and folding left to right.

use crate::error::EvalError;
use crate::value::Value;

fn reduce(args: &[Value], context: &str, op: impl Fn(f64, f64) -> Result<f64, EvalError>) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::illegal_type(context, "at least 2 arguments", "fewer"));
    }
    let mut acc = args[0].as_number(context)?;
    for arg in &args[1..] {
        acc = op(acc, arg.as_number(context)?)?;
    }
    Ok(Value::Number(acc))
}

pub fn add(args: &[Value]) -> Result<Value, EvalError> {
    reduce(args, "+", |a, b| Ok(a + b))
}

pub fn sub(args: &[Value]) -> Result<Value, EvalError> {
    reduce(args, "-", |a, b| Ok(a - b))
}

pub fn mul(args: &[Value]) -> Result<Value, EvalError> {
    reduce(args, "*", |a, b| Ok(a * b))
}

pub fn div(args: &[Value]) -> Result<Value, EvalError> {
    reduce(args, "/", |a, b| {
        if b == 0.0 {
            Err(EvalError::arith("division by zero"))
        } else {
            Ok(a / b)
        }
    })
}

pub fn register(env: &std::rc::Rc<crate::env::Environment>) {
    env.add_callable("+", crate::value::Callable::builtin("+", add));
    env.add_callable("-", crate::value::Callable::builtin("-", sub));
    env.add_callable("*", crate::value::Callable::builtin("*", mul));
    env.add_callable("/", crate::value::Callable::builtin("/", div));
}
