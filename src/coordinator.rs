//! Validation coordinator.
//!
//! Loads both sides of a validation run through the [`Resolver`], validates
//! the instance against the schema and classifies the result as exactly one
//! [`Outcome`]. The run goes through these stages, leaving early on the
//! first failure:
//!
//! ```text
//! Start -> FilesChecked -> BothResolved -> Validated -> Success | ValidationFailure
//!   |            |              |
//!   +-> MissingFiles   +-> ResolutionFailure
//! ```
//!
//! Both files are checked for existence before either is loaded, so the
//! operator hears about every missing file at once. Resolution is fail-fast:
//! the schema side is not loaded when the data side fails.

use std::any::Any;
use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::{ErrorKind, ResolveError};
use crate::logger::Logger;
use crate::resolver::Resolver;
use crate::schema::{self, Violation};
use crate::source::{ResolvedSource, Side, SourceSpec};

/// Raw inputs for one run, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRequest {
    pub data_file: String,
    pub schema_file: String,
    pub data_prop: Option<String>,
    pub schema_prop: Option<String>,
}

impl ValidationRequest {
    pub fn new(data_file: impl Into<String>, schema_file: impl Into<String>) -> Self {
        Self {
            data_file: data_file.into(),
            schema_file: schema_file.into(),
            ..Default::default()
        }
    }

    pub fn data_prop(mut self, prop: impl Into<String>) -> Self {
        self.data_prop = Some(prop.into());
        self
    }

    pub fn schema_prop(mut self, prop: impl Into<String>) -> Self {
        self.schema_prop = Some(prop.into());
        self
    }
}

/// Both resolved sides of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    pub instance: ResolvedSource,
    pub schema: ResolvedSource,
}

impl ValidationContext {
    /// File and property of both sides, one per line.
    pub fn diagnostics(&self) -> String {
        let mut block = String::new();
        for source in [&self.instance.spec, &self.schema.spec] {
            let _ = writeln!(block, "{} file: {}", source.side.label(), source.path.display());
            let _ = writeln!(
                block,
                "{} property: {}",
                source.side.label(),
                source.property_display()
            );
        }
        block.trim_end().to_string()
    }
}

/// A file that was checked before resolution and found absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFile {
    pub side: Side,
    pub path: PathBuf,
}

/// Terminal result of one run.
#[derive(Debug)]
pub enum Outcome {
    Success(ValidationContext),
    MissingFiles(Vec<MissingFile>),
    ResolutionFailure {
        side: Side,
        property: Option<String>,
        error: ResolveError,
    },
    ValidationFailure {
        violations: Vec<Violation>,
        context: ValidationContext,
    },
    UnexpectedFault(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Failure classification, `None` on success.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::MissingFiles(_) => Some(ErrorKind::MissingFile),
            Outcome::ResolutionFailure { error, .. } => Some(error.kind()),
            Outcome::ValidationFailure { .. } => Some(ErrorKind::SchemaViolations),
            Outcome::UnexpectedFault(_) => Some(ErrorKind::UnexpectedFault),
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// The single message shown to the operator.
    pub fn message(&self) -> String {
        match self {
            Outcome::Success(context) => {
                format!("No validation errors found!\n{}", context.diagnostics())
            }
            Outcome::MissingFiles(files) => files
                .iter()
                .map(|f| {
                    format!(
                        "The following {} file doesn't exist: {}",
                        f.side,
                        f.path.display()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Outcome::ResolutionFailure {
                side,
                property,
                error,
            } => format!(
                "Failed to resolve {} source (property: {})\n{}",
                side,
                property.as_deref().unwrap_or("None"),
                error
            ),
            Outcome::ValidationFailure {
                violations,
                context,
            } => {
                let mut msg = format!("{} validation error(s) found:\n", violations.len());
                for (i, v) in violations.iter().enumerate() {
                    let _ = writeln!(msg, "  {}. {}", i + 1, v);
                }
                msg.push('\n');
                msg.push_str(&context.diagnostics());
                msg
            }
            Outcome::UnexpectedFault(detail) => format!("Unexpected failure: {}", detail),
        }
    }

    /// Send the message to `logger`, once.
    pub fn report(&self, logger: &dyn Logger) {
        if self.is_success() {
            logger.success(&self.message());
        } else {
            logger.error(&self.message());
        }
    }

    pub fn to_report(&self) -> Report {
        let (violations, context) = match self {
            Outcome::Success(context) => (Vec::new(), Some(context)),
            Outcome::ValidationFailure {
                violations,
                context,
            } => (violations.clone(), Some(context)),
            _ => (Vec::new(), None),
        };

        Report {
            success: self.is_success(),
            kind: self.kind(),
            exit_code: self.exit_code(),
            message: self.message(),
            data_file: context.map(|c| c.instance.spec.path.clone()),
            data_property: context.and_then(|c| c.instance.spec.property.clone()),
            schema_file: context.map(|c| c.schema.spec.path.clone()),
            schema_property: context.and_then(|c| c.schema.spec.property.clone()),
            violations,
            missing_files: match self {
                Outcome::MissingFiles(files) => files.clone(),
                _ => Vec::new(),
            },
        }
    }
}

/// Machine-readable form of an [`Outcome`].
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub success: bool,
    pub kind: Option<ErrorKind>,
    pub exit_code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_property: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_files: Vec<MissingFile>,
}

pub struct Coordinator {
    config: Config,
    resolver: Resolver,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        let mut resolver = Resolver::new(config.max_script_operations);
        if !config.allow_scripts {
            resolver = resolver.without_scripts();
        }
        Self { config, resolver }
    }

    /// Use a custom resolver, e.g. one with different loaders.
    pub fn with_resolver(config: Config, resolver: Resolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate and report the outcome to `logger`.
    pub fn run(&self, request: &ValidationRequest, logger: &dyn Logger) -> Outcome {
        logger.info(&format!(
            "Validating {} against {}",
            request.data_file, request.schema_file
        ));
        let outcome = self.validate_schema(request);
        outcome.report(logger);
        outcome
    }

    /// Validate without reporting. Panics inside the run become
    /// [`Outcome::UnexpectedFault`].
    pub fn validate_schema(&self, request: &ValidationRequest) -> Outcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(request)))
            .unwrap_or_else(|payload| Outcome::UnexpectedFault(panic_message(payload.as_ref())))
    }

    fn evaluate(&self, request: &ValidationRequest) -> Outcome {
        let root = &self.config.root_dir;
        let instance = SourceSpec::new(
            Side::Instance,
            &request.data_file,
            request.data_prop.as_deref(),
            root,
        );
        let schema = SourceSpec::new(
            Side::Schema,
            &request.schema_file,
            request.schema_prop.as_deref(),
            root,
        );

        let missing: Vec<MissingFile> = [&instance, &schema]
            .into_iter()
            .filter(|s| !s.path.is_file())
            .map(|s| MissingFile {
                side: s.side,
                path: s.path.clone(),
            })
            .collect();
        if !missing.is_empty() {
            return Outcome::MissingFiles(missing);
        }

        let instance = match self.resolve(&instance) {
            Ok(resolved) => resolved,
            Err(outcome) => return outcome,
        };
        let schema = match self.resolve(&schema) {
            Ok(resolved) => resolved,
            Err(outcome) => return outcome,
        };

        match schema::check(&instance.value, &schema.value, &schema.spec.path) {
            Ok(violations) => {
                let context = ValidationContext { instance, schema };
                if violations.is_empty() {
                    Outcome::Success(context)
                } else {
                    Outcome::ValidationFailure {
                        violations,
                        context,
                    }
                }
            }
            Err(error) => Outcome::ResolutionFailure {
                side: Side::Schema,
                property: schema.spec.property.clone(),
                error,
            },
        }
    }

    fn resolve(&self, spec: &SourceSpec) -> Result<ResolvedSource, Outcome> {
        self.resolver
            .resolve(spec)
            .map_err(|error| Outcome::ResolutionFailure {
                side: spec.side,
                property: spec.property.clone(),
                error,
            })
    }
}

/// Text of a panic payload, for reporting.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
