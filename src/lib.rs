//! # jsv - JSON Schema validation for data that lives in config files
//!
//! Validates a data document against a JSON Schema where either side may be a
//! plain JSON file or a named binding inside a Rhai config script.
//!
//! ## Modules
//!
//! - [`source`] - Input sides, file classification and path normalization
//! - [`property_path`] - Dotted property paths and traversal
//! - [`loader`] - JSON and Rhai loaders behind the [`loader::SourceLoader`] trait
//! - [`resolver`] - File path plus property path to value
//! - [`schema`] - Schema compilation and violation reporting
//! - [`coordinator`] - The full validation run and its [`coordinator::Outcome`]
//! - [`logger`] - Operator-facing message sink
//! - [`config`] - Run configuration
//!
//! ## Example
//!
//! ```no_run
//! use jsv::config::Config;
//! use jsv::coordinator::{Coordinator, ValidationRequest};
//! use jsv::logger::TerminalLogger;
//!
//! let config = Config::from_current_dir().expect("Failed to read current directory");
//! let request = ValidationRequest::new("settings.rhai", "schema.json").data_prop("payload");
//!
//! let outcome = Coordinator::new(config).run(&request, &TerminalLogger::default());
//! std::process::exit(outcome.exit_code());
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod loader;
pub mod logger;
pub mod property_path;
pub mod resolver;
pub mod schema;
pub mod source;

pub use coordinator::{Coordinator, Outcome, ValidationRequest};
pub use error::{ErrorKind, ResolveError};
