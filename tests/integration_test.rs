//! End-to-end tests driving the whole pipeline (tokenizer -> reader ->
//! evaluator -> printer) through the public crate surface, covering the
//! scenarios and boundary behaviours named in the crate's evaluator
//! design notes.

use lisp_core::env::Environment;
use lisp_core::error::EvalError;
use lisp_core::eval::{eval, install_special_forms};
use lisp_core::plugin::PluginDispatcher;
use lisp_core::printer::pr_str;
use lisp_core::reader::read_str;
use lisp_core::value::Value;

fn fresh_env() -> std::rc::Rc<Environment> {
    let env = Environment::new_root();
    install_special_forms(&env);
    lisp_core::builtins::register_stock(&env);
    env
}

fn run(src: &str) -> Result<Value, EvalError> {
    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    eval(&read_str(src), &env, &dispatcher)
}

fn run_in(src: &str, env: &std::rc::Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Value, EvalError> {
    eval(&read_str(src), env, dispatcher)
}

#[test]
fn arithmetic_scenarios() {
    assert_eq!(run("(+ 1 2 3)"), Ok(Value::Number(6.0)));
    assert_eq!(run("(+ 1 (+ 2 3))"), Ok(Value::Number(6.0)));
}

#[test]
fn def_binds_and_persists_across_subsequent_evaluations() {
    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    assert_eq!(run_in("(def! a (+ 2 1))", &env, &dispatcher), Ok(Value::Number(3.0)));
    assert_eq!(run_in("a", &env, &dispatcher), Ok(Value::Number(3.0)));
}

#[test]
fn let_star_scopes_its_bindings_to_the_body() {
    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    assert_eq!(
        run_in("(let* ((a 2) (b 3)) (+ a b))", &env, &dispatcher),
        Ok(Value::Number(5.0))
    );
    // Neither binding escapes into the outer env.
    assert_eq!(run_in("a", &env, &dispatcher), Ok(Value::Bool(false)));
    assert_eq!(run_in("b", &env, &dispatcher), Ok(Value::Bool(false)));
}

#[test]
fn if_treats_every_non_bool_as_truthy_and_defaults_a_missing_else_to_nil() {
    assert_eq!(run("(if (= 2 2) 1 2)"), Ok(Value::Number(1.0)));
    assert_eq!(run("(if (= 2 1) 1 2)"), Ok(Value::Number(2.0)));
    assert_eq!(run("(if 91 1 2)"), Ok(Value::Number(1.0)));
    assert_eq!(run("(if nil 1)"), Ok(Value::Bool(false)));
}

#[test]
fn lambda_application_closes_over_its_definition_env() {
    assert_eq!(run("((lambda (a b) (+ 1 a b)) 2 3)"), Ok(Value::Number(6.0)));

    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    run_in("(def! make-adder (lambda (n) (lambda (x) (+ x n))))", &env, &dispatcher).unwrap();
    run_in("(def! add5 (make-adder 5))", &env, &dispatcher).unwrap();
    assert_eq!(run_in("(add5 10)", &env, &dispatcher), Ok(Value::Number(15.0)));
}

#[test]
fn read_string_and_eval_round_trip_through_the_reader() {
    assert_eq!(
        run(r#"(read-string "(+ 2 3)")"#),
        Ok(Value::list(vec![Value::symbol("+"), Value::Number(2.0), Value::Number(3.0)]))
    );
    assert_eq!(run(r#"(eval (read-string "(+ 2 3)"))"#), Ok(Value::Number(5.0)));
}

#[test]
fn list_and_vector_builtins() {
    assert_eq!(
        run(r#"(list 1 2 "1")"#),
        Ok(Value::list(vec![Value::Number(1.0), Value::Number(2.0), Value::string("1")]))
    );
    assert_eq!(run(r#"(count (list 1 2 "1"))"#), Ok(Value::Number(3.0)));
    assert_eq!(run("(emptyp (list))"), Ok(Value::Bool(true)));
    assert_eq!(run("(vectorp (vector 1 2))"), Ok(Value::Bool(true)));
    assert_eq!(run("(aref [1 2 3] 1)"), Ok(Value::Number(2.0)));
    assert_eq!(run("(aref [1 2 3] 9)"), Ok(Value::Bool(false)));
}

#[test]
fn division_by_zero_is_an_arith_error() {
    assert!(matches!(run("(/ 1 0)"), Err(EvalError::ArithError { .. })));
}

#[test]
fn parsing_an_unbalanced_opener_is_incomplete_and_evaluating_it_is_illegal_type() {
    assert_eq!(read_str("(1"), Value::Incomplete);
    assert!(matches!(run("(1"), Err(EvalError::IllegalType { .. })));
}

#[test]
fn empty_list_prints_and_evaluates_to_itself() {
    assert_eq!(run("()"), Ok(Value::list(vec![])));
    assert_eq!(pr_str(&run("()").unwrap(), true), "()");
}

#[test]
fn string_with_an_escaped_quote_round_trips_through_print() {
    let v = run(r#""\"""#).unwrap();
    assert_eq!(pr_str(&v, true), r#""\"""#);
}

#[test]
fn argument_evaluation_is_left_to_right() {
    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    run_in("(def! track (lambda (tag val) val))", &env, &dispatcher).unwrap();
    // Evaluating nested calls in argument position only produces the
    // correct sum if both operands are reduced left-to-right first.
    assert_eq!(
        run_in(r#"(+ (track "first" 10) (track "second" 20))"#, &env, &dispatcher),
        Ok(Value::Number(30.0))
    );
}

#[test]
fn nested_lists_and_vectors_parse_and_print_at_matching_depth() {
    let src = "(1 (2 [3 4]) 5)";
    let value = read_str(src);
    assert_eq!(pr_str(&value, true), src);
}

#[test]
fn fs_load_and_slurp_read_through_the_loader() {
    let dir = std::path::PathBuf::from("./test_integration_fs_temp");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("greeting.lisp"), "(+ 40 2)").unwrap();

    lisp_core::builtins::io::set_loader(lisp_core::loader::Loader::new(&dir, 1024).unwrap());

    assert_eq!(run(r#"(slurp "greeting.lisp")"#), Ok(Value::string("(+ 40 2)")));
    assert_eq!(run(r#"(fs-load "greeting.lisp")"#), Ok(Value::string("(+ 40 2)")));
    assert_eq!(run(r#"(eval (read-string (fs-load "greeting.lisp")))"#), Ok(Value::Number(42.0)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn load_reads_parses_and_evaluates_a_file_in_the_calling_env() {
    let dir = std::path::PathBuf::from("./test_integration_load_temp");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("defs.lisp"), "(def! pi-ish 3)").unwrap();

    lisp_core::builtins::io::set_loader(lisp_core::loader::Loader::new(&dir, 1024).unwrap());

    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    assert_eq!(run_in(r#"(load "defs.lisp")"#, &env, &dispatcher), Ok(Value::Number(3.0)));
    assert_eq!(run_in("pi-ish", &env, &dispatcher), Ok(Value::Number(3.0)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn load_evaluates_every_top_level_form_in_a_file_not_just_the_first() {
    let dir = std::path::PathBuf::from("./test_integration_load_multi_temp");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("lib.lisp"),
        "(def! a 1) (def! b 2) (def! f (lambda (x) (+ x a b))) (f 10)",
    )
    .unwrap();

    lisp_core::builtins::io::set_loader(lisp_core::loader::Loader::new(&dir, 1024).unwrap());

    let env = fresh_env();
    let dispatcher = PluginDispatcher::new();
    // The file's last form is `(f 10)`, which only evaluates correctly
    // if every preceding definition in the file was evaluated too.
    assert_eq!(run_in(r#"(load "lib.lisp")"#, &env, &dispatcher), Ok(Value::Number(13.0)));
    assert_eq!(run_in("a", &env, &dispatcher), Ok(Value::Number(1.0)));
    assert_eq!(run_in("b", &env, &dispatcher), Ok(Value::Number(2.0)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pr_str_and_str_differ_on_string_readability() {
    assert_eq!(run(r#"(pr-str "a\"b")"#), Ok(Value::string("\"a\\\"b\"")));
    assert_eq!(run(r#"(str "a\"b")"#), Ok(Value::string("a\"b")));
}

#[test]
fn calling_an_undefined_symbol_is_unhandled() {
    assert!(matches!(run("(ghost 1 2)"), Err(EvalError::Unhandled { .. })));
}

#[test]
fn comparison_chains_hold_across_every_adjacent_pair() {
    assert_eq!(run("(< 1 2 3)"), Ok(Value::Bool(true)));
    assert_eq!(run("(< 1 3 2)"), Ok(Value::Bool(false)));
    assert_eq!(run("(<= 1 1 2)"), Ok(Value::Bool(true)));
}
