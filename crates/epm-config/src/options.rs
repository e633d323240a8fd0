//! Connector option shapes.
//!
//! Every connector declares the options it needs as an [`OptionsSchema`], a
//! JSON Schema document checked against the raw option bag before the
//! connector's `init` runs. Every failure is reported in one
//! [`ValidationError`]. Only a successful check can produce a
//! [`Validated`] value, which is the only thing `init` accepts.

use std::fmt;
use std::ops::Deref;

use jsonschema::error::ValidationErrorKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ValidationError, Violation};

/// Path reported for failures on the option bag itself.
pub const ROOT_PATH: &str = "<root>";
/// Path reported when the schema document does not compile.
pub const SCHEMA_PATH: &str = "<schema>";

/// The option shape a connector accepts, as a JSON Schema document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionsSchema {
    connector: String,
    schema: Value,
}

impl OptionsSchema {
    /// Accepts any option object.
    pub fn new(connector: impl Into<String>) -> Self {
        Self {
            connector: connector.into(),
            schema: json!({"type": "object"}),
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    pub fn connector(&self) -> &str {
        &self.connector
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check `raw` against the schema, collecting all violations.
    ///
    /// A `null` option bag is treated as an empty object. Formats such as
    /// `uri` are asserted, not just annotated.
    pub fn validate(&self, raw: &Value) -> Result<(), ValidationError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&self.schema)
            .map_err(|e| self.error(vec![Violation::new(SCHEMA_PATH, e.to_string())]))?;

        let bag = bag(raw);
        let violations: Vec<Violation> = validator
            .iter_errors(&bag)
            .map(|e| Violation::new(violation_path(&e), e.to_string()))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(self.error(violations))
        }
    }

    /// Validate `raw`, then deserialize it into the connector's option type.
    pub fn check<T: DeserializeOwned>(&self, raw: &Value) -> Result<Validated<T>, ValidationError> {
        self.validate(raw)?;
        let value = serde_json::from_value(bag(raw))
            .map_err(|e| self.error(vec![Violation::new(ROOT_PATH, e.to_string())]))?;
        Ok(Validated { value })
    }

    fn error(&self, violations: Vec<Violation>) -> ValidationError {
        ValidationError {
            connector: self.connector.clone(),
            violations,
        }
    }
}

fn bag(raw: &Value) -> Value {
    if raw.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        raw.clone()
    }
}

/// Dotted form of the failing instance location. A missing required
/// property is reported at the property itself rather than its parent.
fn violation_path(error: &jsonschema::ValidationError<'_>) -> String {
    let mut segments: Vec<String> = error
        .instance_path
        .as_str()
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect();
    if let ValidationErrorKind::Required { property } = &error.kind {
        match property.as_str() {
            Some(name) => segments.push(name.to_string()),
            None => segments.push(property.to_string()),
        }
    }
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        segments.join(".")
    }
}

/// Options that passed their connector's schema.
///
/// Cannot be constructed outside this crate except through
/// [`OptionsSchema::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validated<T> {
    value: T,
}

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// A port given either as a number or as a numeric string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u64),
    Text(String),
}

impl PortValue {
    /// The port as `u16`, rejecting 0 and anything above 65535.
    pub fn port(&self) -> Result<u16, String> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("{s:?} is not a port number"))?,
        };
        match u16::try_from(n) {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(format!("{n} is outside 1..=65535")),
        }
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
