//! Loaders that turn a classified file into a root value.
//!
//! [`JsonLoader`] handles structured-data files, [`ScriptLoader`] evaluates
//! Rhai config scripts and exposes their top-level bindings as a mapping.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rhai::{Engine, Scope};
use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::source::SourceKind;

/// Loads the whole content of a file into a value tree.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> Result<Value, ResolveError>;
}

/// Parses a file as one JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLoader;

impl SourceLoader for JsonLoader {
    fn load(&self, path: &Path) -> Result<Value, ResolveError> {
        let file = File::open(path).map_err(|e| ResolveError::MalformedData {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| ResolveError::MalformedData {
            path: path.to_path_buf(),
            detail: format!("invalid JSON: {}", e),
        })
    }
}

/// Evaluates a Rhai script in a fresh engine and scope.
///
/// The result is an object mapping each top-level variable or constant to its
/// value. Bindings with no data representation (function pointers, custom
/// types) are left out. Script output from `print`/`debug` is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptLoader {
    /// Operation ceiling for a single evaluation, 0 for unlimited
    pub max_operations: u64,
}

impl ScriptLoader {
    pub fn new(max_operations: u64) -> Self {
        Self { max_operations }
    }

    fn engine(&self) -> Engine {
        let mut engine = Engine::new();
        engine.on_print(|_| {});
        engine.on_debug(|_, _, _| {});
        if self.max_operations > 0 {
            engine.set_max_operations(self.max_operations);
        }
        engine
    }
}

impl SourceLoader for ScriptLoader {
    fn load(&self, path: &Path) -> Result<Value, ResolveError> {
        let engine = self.engine();
        let mut scope = Scope::new();

        engine
            .run_file_with_scope(&mut scope, path.to_path_buf())
            .map_err(|e| ResolveError::MalformedData {
                path: path.to_path_buf(),
                detail: format!("script evaluation failed: {}", e),
            })?;

        let mut bindings = Map::new();
        for (name, _is_constant, value) in scope.iter() {
            if let Ok(json) = rhai::serde::from_dynamic::<Value>(&value) {
                bindings.insert(name.to_string(), json);
            }
        }

        Ok(Value::Object(bindings))
    }
}

/// Tagged dispatch over the two loaders.
#[derive(Debug, Clone, Copy)]
pub enum Loader {
    Json(JsonLoader),
    Script(ScriptLoader),
}

impl Loader {
    pub fn for_kind(kind: SourceKind, max_script_operations: u64) -> Self {
        match kind {
            SourceKind::StructuredData => Loader::Json(JsonLoader),
            SourceKind::ExecutableConfig => {
                Loader::Script(ScriptLoader::new(max_script_operations))
            }
        }
    }
}

impl SourceLoader for Loader {
    fn load(&self, path: &Path) -> Result<Value, ResolveError> {
        match self {
            Loader::Json(loader) => loader.load(path),
            Loader::Script(loader) => loader.load(path),
        }
    }
}
