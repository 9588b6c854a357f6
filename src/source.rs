//! The two inputs of a validation run and how their files are classified.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::property_path::PropertyPath;

/// Which half of the validation a source feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The data being validated (`--data-file`)
    Instance,
    /// The JSON schema (`--schema-file`)
    Schema,
}

impl Side {
    /// The CLI flag that supplies this side's property path.
    pub fn prop_flag(&self) -> &'static str {
        match self {
            Side::Instance => "--data-prop",
            Side::Schema => "--schema-prop",
        }
    }

    /// Capitalized label used in diagnostic blocks.
    pub fn label(&self) -> &'static str {
        match self {
            Side::Instance => "Data",
            Side::Schema => "Schema",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Instance => write!(f, "data"),
            Side::Schema => write!(f, "schema"),
        }
    }
}

/// How a file's content becomes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Parsed directly as a JSON document
    StructuredData,
    /// Evaluated as a Rhai script; its top-level bindings form the root mapping
    ExecutableConfig,
}

impl SourceKind {
    /// Classify a file by extension, case-insensitively.
    ///
    /// Returns `None` for anything that isn't `.json` or `.rhai`.
    pub fn classify(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(SourceKind::StructuredData),
            "rhai" => Some(SourceKind::ExecutableConfig),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::StructuredData => write!(f, "structured data"),
            SourceKind::ExecutableConfig => write!(f, "executable config"),
        }
    }
}

/// One side of the validation, as requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub side: Side,
    /// Absolute, normalized path
    pub path: PathBuf,
    /// Dotted property path as given by the user
    pub property: Option<String>,
}

impl SourceSpec {
    /// Build a source from raw CLI input, absolutizing `raw_path` against `root`.
    pub fn new(side: Side, raw_path: &str, property: Option<&str>, root: &Path) -> Self {
        Self {
            side,
            path: normalize_path(raw_path, root),
            property: property.map(str::to_string),
        }
    }

    pub fn property_path(&self) -> PropertyPath {
        PropertyPath::parse(self.property.as_deref().unwrap_or(""))
    }

    /// The property path for display, `None` when it was not given.
    pub fn property_display(&self) -> &str {
        self.property.as_deref().unwrap_or("None")
    }
}

/// A source after resolution. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub spec: SourceSpec,
    pub kind: SourceKind,
    pub value: serde_json::Value,
}

/// Expand `~`, absolutize against `root` and canonicalize.
///
/// Falls back to a purely lexical cleanup when the path can't be canonicalized
/// (typically because it doesn't exist), so error messages still show a clean
/// absolute path.
pub fn normalize_path(raw: &str, root: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    };

    std::fs::canonicalize(&absolute).unwrap_or_else(|_| lexical_normalize(&absolute))
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            SourceKind::classify(Path::new("/a/data.JSON")),
            Some(SourceKind::StructuredData)
        );
        assert_eq!(
            SourceKind::classify(Path::new("/a/conf.Rhai")),
            Some(SourceKind::ExecutableConfig)
        );
        assert_eq!(SourceKind::classify(Path::new("/a/data.yaml")), None);
        assert_eq!(SourceKind::classify(Path::new("/a/noext")), None);
    }

    #[test]
    fn test_lexical_normalize() {
        assert_eq!(
            lexical_normalize(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(lexical_normalize(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_relative_and_absolute_inputs_agree() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("data.json");
        std::fs::write(&file, "{}").unwrap();

        let relative = normalize_path("./sub/../data.json", tmp.path());
        let absolute = normalize_path(file.to_str().unwrap(), Path::new("/"));
        assert_eq!(relative, absolute);
        assert!(relative.is_absolute());
    }

    #[test]
    #[serial]
    fn test_tilde_expands_to_home() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("data.json"), "{}").unwrap();

        let previous = std::env::var_os("HOME");
        std::env::set_var("HOME", home.path());
        let path = normalize_path("~/data.json", Path::new("/elsewhere"));
        match previous {
            Some(value) => std::env::set_var("HOME", value),
            None => std::env::remove_var("HOME"),
        }

        assert_eq!(
            path,
            std::fs::canonicalize(home.path().join("data.json")).unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_canonicalized() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target.json");
        std::fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("alias.json")).unwrap();

        let path = normalize_path("alias.json", tmp.path());
        assert_eq!(path, std::fs::canonicalize(&target).unwrap());
    }

    #[test]
    fn test_missing_file_still_absolute() {
        let path = normalize_path("nope/../missing.json", Path::new("/srv/app"));
        assert_eq!(path, PathBuf::from("/srv/app/missing.json"));
    }

    #[test]
    fn test_property_display() {
        let spec = SourceSpec::new(Side::Schema, "/s.json", None, Path::new("/"));
        assert_eq!(spec.property_display(), "None");
        assert!(spec.property_path().is_empty());
    }
}
