//! JSON Schema validation of a resolved instance against a resolved schema.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::ResolveError;

/// A single mismatch between the instance and a schema constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer into the instance, empty for the root
    pub instance_path: String,
    /// JSON pointer into the schema to the failing keyword
    pub schema_path: String,
    /// The failing keyword, e.g. `type` or `required`
    pub constraint: String,
    /// The keyword's value in the schema, when it can be addressed
    pub expected: Option<String>,
    pub actual: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "at '{}' [{}]: {}", location, self.constraint, self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, " (expected {}, actual {})", expected, self.actual)?;
        }
        Ok(())
    }
}

/// Compile `schema` and collect every violation of `instance`.
///
/// `schema_file` only decorates the error when the schema does not compile.
pub fn check(
    instance: &Value,
    schema: &Value,
    schema_file: &Path,
) -> Result<Vec<Violation>, ResolveError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| ResolveError::InvalidSchema {
        path: schema_file.to_path_buf(),
        detail: e.to_string(),
    })?;

    let violations = validator
        .iter_errors(instance)
        .map(|e| {
            let schema_path = e.schema_path.to_string();
            let constraint = schema_path
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            let expected = schema.pointer(&schema_path).map(compact);
            let actual = if constraint == "type" {
                type_name(&e.instance).to_string()
            } else {
                compact(&e.instance)
            };

            Violation {
                instance_path: e.instance_path.to_string(),
                schema_path,
                constraint,
                expected,
                actual,
                message: e.to_string(),
            }
        })
        .collect();

    Ok(violations)
}

/// JSON type name of a value. Integers report as `number`.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
