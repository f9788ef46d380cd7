// ABOUTME: Ambient constants for the CLI/REPL binary

//! Ambient constants for the CLI/REPL binary: version string, banner
//! text, and the filesystem collaborator's defaults.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "lisp-core";
pub const WELCOME_SUBTITLE: &str = "a small Lisp reader, evaluator, and plugin dispatcher";

pub const DEFAULT_FS_ROOT: &str = ".";
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
