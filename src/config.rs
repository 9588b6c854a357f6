//! Run configuration.
//!
//! Everything a validation run needs besides its inputs. Built once by the CLI
//! and handed to the [`Coordinator`](crate::coordinator::Coordinator); nothing
//! here is process-wide state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// How the outcome is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable, colored messages
    #[default]
    Text,
    /// One JSON report document on stdout
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Folder that relative input paths are resolved against
    pub root_dir: PathBuf,
    pub format: OutputFormat,
    pub quiet: bool,
    pub color: bool,
    /// Operation ceiling for Rhai evaluation, 0 for unlimited
    pub max_script_operations: u64,
    /// Whether `.rhai` files may be evaluated at all
    pub allow_scripts: bool,
}

impl Config {
    /// Defaults rooted at `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            format: OutputFormat::Text,
            quiet: false,
            color: true,
            max_script_operations: 0,
            allow_scripts: true,
        }
    }

    /// Defaults rooted at the canonicalized current directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::rooted_at(&cwd)
    }

    /// Defaults rooted at `dir`, which must exist.
    pub fn rooted_at(dir: &Path) -> Result<Self> {
        let root = std::fs::canonicalize(dir)
            .with_context(|| format!("Failed to resolve root folder: {}", dir.display()))?;
        Ok(Self::new(root))
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_max_script_operations(mut self, max: u64) -> Self {
        self.max_script_operations = max;
        self
    }

    pub fn with_scripts(mut self, allow: bool) -> Self {
        self.allow_scripts = allow;
        self
    }

    /// Turn terminal colors off when requested or when `NO_COLOR` is set.
    pub fn apply_color(&self) {
        if !self.color || std::env::var_os("NO_COLOR").is_some() {
            colored::control::set_override(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let config = Config::new("/srv");
        assert_eq!(config.root_dir, PathBuf::from("/srv"));
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.quiet);
        assert!(config.color);
        assert_eq!(config.max_script_operations, 0);
        assert!(config.allow_scripts);

        let config = config
            .with_format(OutputFormat::Json)
            .with_quiet(true)
            .with_max_script_operations(500)
            .with_scripts(false);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.quiet);
        assert_eq!(config.max_script_operations, 500);
        assert!(!config.allow_scripts);
    }

    #[test]
    fn test_rooted_at_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::rooted_at(&tmp.path().join("gone")).is_err());
    }

    #[test]
    #[serial]
    fn test_from_current_dir_is_canonical() {
        let tmp = TempDir::new().unwrap();
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        let config = Config::from_current_dir();
        std::env::set_current_dir(original).unwrap();

        let config = config.unwrap();
        assert_eq!(config.root_dir, std::fs::canonicalize(tmp.path()).unwrap());
    }
}
