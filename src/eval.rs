// ABOUTME: Trampoline evaluator implementing the four special forms

//! Evaluator (C6): a trampoline loop implementing exactly four special
//! forms (`def!`, `let*`, `if`, `lambda`) plus fnTable application.
//!
//! Special-form dispatch happens on a static name check *before* any
//! fnTable lookup — the fnTable also carries `Special` markers for each
//! of these names (so they shadow like any other binding and show up in
//! introspection), but the evaluator's dispatch itself never consults
//! them.

use std::rc::Rc;

use crate::env::{ChildKind, Environment};
use crate::error::EvalError;
use crate::plugin::PluginDispatcher;
use crate::value::{Callable, CallableKind, CallablePayload, Lambda, Value};

pub const SPECIAL_FORMS: [&str; 4] = ["def!", "let*", "if", "lambda"];

/// Registers `Special` markers for each special form, purely for fnTable
/// visibility (shadowing, introspection) — the dispatch loop below never
/// reads these entries back.
pub fn install_special_forms(env: &Rc<Environment>) {
    for name in SPECIAL_FORMS {
        env.add_callable(name.to_string(), Callable::special());
    }
}

pub fn eval(
    expr: &Value,
    env: &Rc<Environment>,
    dispatcher: &PluginDispatcher,
) -> Result<Value, EvalError> {
    let mut expr = expr.clone();
    let mut env = Rc::clone(env);

    loop {
        match &expr {
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Vector(_) | Value::Function(_) => {
                return Ok(expr);
            }
            Value::Symbol(name) => return Ok(env.get_var(name)),
            Value::ListEnd | Value::VectorEnd | Value::Incomplete | Value::Undefined => {
                return Err(EvalError::illegal_type("eval", "evaluable form", expr.type_name()));
            }
            Value::List(elems) => {
                if elems.is_empty() {
                    return Ok(expr.clone());
                }

                if let Value::Symbol(head) = &elems[0] {
                    match head.as_ref() {
                        "def!" => return eval_def(&elems[1..], &env, dispatcher),
                        "let*" => {
                            let (body, child_env) = eval_let_star_setup(&elems[1..], &env, dispatcher)?;
                            expr = body;
                            env = child_env;
                            continue;
                        }
                        "if" => {
                            expr = eval_if_select(&elems[1..], &env, dispatcher)?;
                            continue;
                        }
                        "lambda" => return eval_lambda(&elems[1..], &env),
                        _ => {}
                    }
                }

                let callee = eval_callee(&elems[0], &env, dispatcher)?;
                let args = eval_args(&elems[1..], &env, dispatcher)?;

                match callee {
                    Callee::Builtin(f) => return f(&args),
                    Callee::BuiltinWithEnv(f) => return f(&args, &env, dispatcher),
                    Callee::Plugin(origin, op) => return dispatcher.invoke(&origin, op, &args),
                    Callee::Lambda(lambda) => {
                        bind_params(&lambda, &args)?;
                        expr = lambda.body.clone();
                        env = Rc::clone(&lambda.env);
                        continue;
                    }
                }
            }
        }
    }
}

enum Callee {
    Builtin(crate::value::BuiltinFn),
    BuiltinWithEnv(crate::value::EnvBuiltinFn),
    Plugin(String, crate::plugin::PluginOp),
    Lambda(Rc<Lambda>),
}

fn eval_callee(expr: &Value, env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Callee, EvalError> {
    match expr {
        Value::Symbol(name) => {
            let callable = env
                .get_callable(name)
                .ok_or_else(|| EvalError::unhandled(format!("undefined callable `{name}`")))?;
            callable_to_callee(callable)
        }
        Value::Function(lambda) => Ok(Callee::Lambda(Rc::clone(lambda))),
        Value::List(_) => match eval(expr, env, dispatcher)? {
            Value::Function(lambda) => Ok(Callee::Lambda(lambda)),
            other => Err(EvalError::illegal_type("call position", "Function", other.type_name())),
        },
        other => Err(EvalError::illegal_type("call position", "Symbol, List, or Function", other.type_name())),
    }
}

fn callable_to_callee(callable: Callable) -> Result<Callee, EvalError> {
    match (callable.kind, callable.payload) {
        (CallableKind::Builtin, CallablePayload::Pure(f)) => Ok(Callee::Builtin(f)),
        (CallableKind::Builtin, CallablePayload::WithEnv(f)) => Ok(Callee::BuiltinWithEnv(f)),
        (CallableKind::PluginBuiltin, CallablePayload::Plugin(op)) => {
            Ok(Callee::Plugin(callable.origin.to_string(), op))
        }
        (CallableKind::UserLambda, CallablePayload::Lambda(lambda)) => Ok(Callee::Lambda(lambda)),
        (CallableKind::Special, CallablePayload::Special) => {
            Err(EvalError::unhandled("special form used as a value in call position"))
        }
        _ => Err(EvalError::unhandled("fnTable entry has an inconsistent kind/payload pair")),
    }
}

/// Evaluates each argument left-to-right. Lists and Symbols recurse
/// through `eval`; every other shape (Number, String, Bool, Vector,
/// Function) passes through unchanged, matching self-evaluation.
fn eval_args(args: &[Value], env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Vec<Value>, EvalError> {
    args.iter()
        .map(|arg| match arg {
            Value::List(_) | Value::Symbol(_) => eval(arg, env, dispatcher),
            other => Ok(other.clone()),
        })
        .collect()
}

fn eval_def(args: &[Value], env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Value, EvalError> {
    let [name_expr, value_expr] = args else {
        return Err(EvalError::illegal_type("def!", "exactly 2 operands", "different arity"));
    };
    let name = name_expr.as_symbol("def!")?.to_string();
    let value = eval(value_expr, env, dispatcher)?;

    env.add_var(name.clone(), value.clone());
    if let Value::Function(lambda) = &value {
        env.add_callable(name, Callable::lambda(Rc::clone(lambda)));
    } else {
        // A prior `(def! name (lambda ...))` may have left a `UserLambda`
        // fnTable entry under this name; rebinding to a non-function must
        // not leave it callable.
        env.remove_callable(&name);
    }
    Ok(value)
}

/// Builds a transparent child scope, binding each `(k v)` pair's `k`
/// before evaluating the next pair's `v` — later bindings can reference
/// earlier ones. Returns the body form and the child env for the caller
/// to trampoline-continue on.
fn eval_let_star_setup(
    args: &[Value],
    env: &Rc<Environment>,
    dispatcher: &PluginDispatcher,
) -> Result<(Value, Rc<Environment>), EvalError> {
    let [bindings_expr, body] = args else {
        return Err(EvalError::illegal_type("let*", "exactly 2 operands", "different arity"));
    };
    let bindings = bindings_expr.as_list("let* bindings")?;
    let child = Environment::new_child(env, ChildKind::Transparent);

    for pair in bindings {
        let pair = pair.as_list("let* binding pair")?;
        let [k, v] = pair else {
            return Err(EvalError::illegal_type("let* binding pair", "exactly 2 elements", "different arity"));
        };
        let name = k.as_symbol("let* binding name")?.to_string();
        let value = eval(v, &child, dispatcher)?;
        child.add_var(name, value);
    }

    Ok((body.clone(), child))
}

/// `(if cond then)` or `(if cond then else)`; a missing else branch
/// yields `Bool(false)`. Any non-Bool condition is truthy. Returns the
/// selected branch for the caller to trampoline-continue on.
fn eval_if_select(args: &[Value], env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Value, EvalError> {
    match args {
        [cond, then] => {
            if eval(cond, env, dispatcher)?.is_truthy() {
                Ok(then.clone())
            } else {
                Ok(Value::Bool(false))
            }
        }
        [cond, then, else_] => {
            if eval(cond, env, dispatcher)?.is_truthy() {
                Ok(then.clone())
            } else {
                Ok(else_.clone())
            }
        }
        _ => Err(EvalError::illegal_type("if", "2 or 3 operands", "different arity")),
    }
}

/// `(lambda (params...) body)`. Builds an independent child scope with
/// each parameter pre-bound to `Undefined`, closing over it in the
/// returned `Function`. Every call of this closure reuses this same
/// environment (see DESIGN.md) rather than allocating a fresh one.
fn eval_lambda(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let [params_expr, body] = args else {
        return Err(EvalError::illegal_type("lambda", "exactly 2 operands", "different arity"));
    };
    let params_list = params_expr.as_list("lambda parameter list")?;

    let mut params = Vec::with_capacity(params_list.len());
    for p in params_list {
        params.push(Rc::clone(p.as_symbol("lambda parameter")?));
    }

    let closure_env = Environment::new_child(env, ChildKind::Independent);
    for param in &params {
        closure_env.add_var(param.to_string(), Value::Undefined);
    }

    let lambda = Rc::new(Lambda {
        params,
        body: body.clone(),
        env: closure_env,
    });
    Ok(Value::Function(lambda))
}

fn bind_params(lambda: &Lambda, args: &[Value]) -> Result<(), EvalError> {
    if args.len() != lambda.params.len() {
        return Err(EvalError::illegal_type(
            "lambda call",
            format!("{} argument(s)", lambda.params.len()),
            format!("{} argument(s)", args.len()),
        ));
    }
    for (param, value) in lambda.params.iter().zip(args.iter()) {
        lambda.env.set_var(param, value.clone())?;
    }
    Ok(())
}
