//! Turns a [`SourceSpec`] into a [`ResolvedSource`].
//!
//! Resolution runs in a fixed order: existence check, classification by
//! extension, loading, then property-path traversal. Files with an
//! unrecognized extension are never opened.
//!
//! Each [`SourceKind`] is served by one [`SourceLoader`]. The defaults come
//! from [`Loader::for_kind`]; either can be replaced, and the script loader
//! can be removed for deployments that must not evaluate config scripts.

use crate::error::ResolveError;
use crate::loader::{Loader, SourceLoader};
use crate::source::{ResolvedSource, SourceKind, SourceSpec};

pub struct Resolver {
    structured: Box<dyn SourceLoader>,
    /// `None` when script evaluation is disabled
    script: Option<Box<dyn SourceLoader>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Resolver {
    pub fn new(max_script_operations: u64) -> Self {
        Self {
            structured: Box::new(Loader::for_kind(SourceKind::StructuredData, 0)),
            script: Some(Box::new(Loader::for_kind(
                SourceKind::ExecutableConfig,
                max_script_operations,
            ))),
        }
    }

    /// Serve `kind` with `loader` instead of the default.
    pub fn with_loader(mut self, kind: SourceKind, loader: impl SourceLoader + 'static) -> Self {
        match kind {
            SourceKind::StructuredData => self.structured = Box::new(loader),
            SourceKind::ExecutableConfig => self.script = Some(Box::new(loader)),
        }
        self
    }

    /// Refuse executable config files instead of evaluating them.
    pub fn without_scripts(mut self) -> Self {
        self.script = None;
        self
    }

    pub fn scripts_enabled(&self) -> bool {
        self.script.is_some()
    }

    fn loader(
        &self,
        kind: SourceKind,
        spec: &SourceSpec,
    ) -> Result<&dyn SourceLoader, ResolveError> {
        match kind {
            SourceKind::StructuredData => Ok(self.structured.as_ref()),
            SourceKind::ExecutableConfig => {
                self.script
                    .as_deref()
                    .ok_or_else(|| ResolveError::ScriptsDisabled {
                        path: spec.path.clone(),
                    })
            }
        }
    }

    pub fn resolve(&self, spec: &SourceSpec) -> Result<ResolvedSource, ResolveError> {
        if !spec.path.is_file() {
            return Err(ResolveError::MissingFile {
                path: spec.path.clone(),
            });
        }

        let kind =
            SourceKind::classify(&spec.path).ok_or_else(|| ResolveError::UnsupportedFileType {
                path: spec.path.clone(),
            })?;

        let loader = self.loader(kind, spec)?;

        let property = spec.property_path();
        if kind == SourceKind::ExecutableConfig && property.is_empty() {
            return Err(ResolveError::MissingRequiredProperty {
                side: spec.side,
                path: spec.path.clone(),
            });
        }

        let root = loader.load(&spec.path)?;

        let value = match property.traverse(&root) {
            Ok(value) => value.clone(),
            Err(segment) => {
                return Err(ResolveError::PropertyNotFound {
                    segment: segment.to_string(),
                    property: property.to_string(),
                    path: spec.path.clone(),
                })
            }
        };

        Ok(ResolvedSource {
            spec: spec.clone(),
            kind,
            value,
        })
    }
}
