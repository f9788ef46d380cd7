// ABOUTME: CLI entrypoint and REPL/script runner binary

//! REPL surface (A3): a thin `clap` + `rustyline` front end over the
//! core. Explicitly not part of the core itself — it only calls into
//! `reader::read_str`, `eval::eval`, and `printer::pr_str`.

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use lisp_core::config::{DEFAULT_FS_ROOT, DEFAULT_MAX_FILE_SIZE, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use lisp_core::env::Environment;
use lisp_core::eval::{eval, install_special_forms};
use lisp_core::loader::Loader;
use lisp_core::plugin::PluginDispatcher;
use lisp_core::printer::pr_str;
use lisp_core::reader::{read_all, read_str};
use lisp_core::value::Value;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};

/// A small Lisp reader, evaluator, and plugin dispatcher.
#[derive(Parser, Debug)]
#[command(name = "lisp-core")]
#[command(version = VERSION)]
#[command(about = "A small Lisp interpreter core: reader, evaluator, environment, plugin dispatcher")]
struct CliArgs {
    /// Script file to execute (optional — if absent, starts a REPL).
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Root directory the filesystem collaborator is scoped to.
    #[arg(long = "fs-root", value_name = "PATH", default_value_t = PathBuf::from(DEFAULT_FS_ROOT))]
    fs_root: PathBuf,

    /// Maximum file size in bytes the filesystem collaborator will read.
    #[arg(long = "max-file-size", value_name = "BYTES", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let loader = Loader::new(&args.fs_root, args.max_file_size)
        .map_err(|e| format!("cannot open fs-root `{}`: {e}", args.fs_root.display()))?;
    lisp_core::builtins::io::set_loader(loader);

    let env = Environment::new_root();
    install_special_forms(&env);
    lisp_core::builtins::register_stock(&env);
    let dispatcher = PluginDispatcher::new();

    if let Some(script_path) = args.script {
        run_script(&script_path, &env, &dispatcher)?;
        return Ok(());
    }

    run_repl(&env, &dispatcher)
}

/// Reads every top-level form in `contents` and evaluates it in order,
/// stopping (and propagating) at the first error.
fn eval_all(contents: &str, env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<Value, Box<dyn std::error::Error>> {
    let mut last = Value::Bool(false);
    for form in read_all(contents) {
        if matches!(form, Value::Incomplete) {
            return Err("unexpected end of input: unbalanced delimiter".into());
        }
        last = eval(&form, env, dispatcher)?;
    }
    Ok(last)
}

fn run_script(path: &PathBuf, env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path).map_err(|e| format!("cannot read script file {}: {e}", path.display()))?;
    eval_all(&contents, env, dispatcher)?;
    Ok(())
}

fn run_repl(env: &Rc<Environment>, dispatcher: &PluginDispatcher) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), rustyline::history::DefaultHistory> =
        Editor::with_config(config).map_err(|e| format!("failed to initialize REPL: {e}"))?;

    let history_file = ".lisp_history";
    let _ = rl.load_history(history_file);

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");

    loop {
        match rl.readline("lisp> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if matches!(line.trim(), "(quit)" | "(exit)") {
                    println!("Goodbye!");
                    break;
                }

                let form = read_str(&line);
                if matches!(form, Value::Incomplete) {
                    eprintln!("Error: unbalanced delimiter");
                    continue;
                }

                match eval(&form, env, dispatcher) {
                    Ok(result) => println!("=> {}", pr_str(&result, true)),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}
