// ABOUTME: Capability-scoped filesystem loader backing fs-load/slurp/load

//! Filesystem collaborator (A2): the capability-scoped file reader
//! behind `fs-load`/`slurp`/`load`. Absolute paths and `..` traversal are
//! rejected before `cap_std` ever sees them, so the sandboxing isn't
//! relying on path-string rejection alone — `Dir` itself can't name
//! anything outside its own root.

use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::error::EvalError;

pub struct Loader {
    root: Dir,
    max_file_size: usize,
}

impl Loader {
    pub fn new(root_path: impl AsRef<std::path::Path>, max_file_size: usize) -> std::io::Result<Self> {
        let root = Dir::open_ambient_dir(root_path, ambient_authority())?;
        Ok(Loader { root, max_file_size })
    }

    pub fn read_all(&self, path: &str) -> Result<String, EvalError> {
        if std::path::Path::new(path).is_absolute() {
            return Err(EvalError::file_not_found(path));
        }
        if std::path::Path::new(path).components().any(|c| matches!(c, std::path::Component::ParentDir)) {
            return Err(EvalError::file_not_found(path));
        }

        let bytes = self.root.read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EvalError::file_not_found(path)
            } else {
                EvalError::unhandled(format!("reading `{path}`: {e}"))
            }
        })?;

        if bytes.len() > self.max_file_size {
            return Err(EvalError::unhandled(format!(
                "`{path}` is {} bytes, over the {}-byte limit",
                bytes.len(),
                self.max_file_size
            )));
        }

        String::from_utf8(bytes).map_err(|_| EvalError::unhandled(format!("`{path}` is not valid UTF-8")))
    }
}
