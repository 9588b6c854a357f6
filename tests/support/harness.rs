use jsv::config::Config;
use jsv::coordinator::{Coordinator, Outcome, ValidationRequest};
use jsv::logger::RecordingLogger;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// TestHarness provides an isolated directory to drop data/schema files into.
/// Relative paths given to the coordinator or the binary resolve against it.
pub struct TestHarness {
    pub dir: TempDir,
    #[allow(dead_code)]
    pub jsv_binary: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        TestHarness {
            dir: TempDir::new().expect("Failed to create temp dir"),
            jsv_binary: PathBuf::from(env!("CARGO_BIN_EXE_jsv")),
        }
    }

    /// Returns the base directory path (the TempDir path).
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `name` inside the harness directory, creating parents.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    #[allow(dead_code)]
    pub fn coordinator(&self) -> Coordinator {
        Coordinator::new(Config::rooted_at(self.path()).expect("Failed to build config"))
    }

    /// Runs the coordinator, returning the outcome and what it logged.
    #[allow(dead_code)]
    pub fn validate(&self, request: &ValidationRequest) -> (Outcome, RecordingLogger) {
        let logger = RecordingLogger::new();
        let outcome = self.coordinator().run(request, &logger);
        (outcome, logger)
    }

    /// Executes the jsv binary with the given arguments in the harness directory.
    #[allow(dead_code)]
    pub fn run(&self, args: &[&str]) -> std::io::Result<std::process::Output> {
        Command::new(&self.jsv_binary)
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("JSV_ROOT")
            .env_remove("JSV_FORMAT")
            .env_remove("JSV_QUIET")
            .env_remove("JSV_NO_SCRIPTS")
            .output()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
