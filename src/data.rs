//! Data ingestion: JSON payloads normalized into reconcilable node lists
//!
//! All shape polymorphism in the wire format is resolved here, once, at the
//! boundary: a bare object becomes a one-element list, reserved fields are
//! pulled out of the field map, and every remaining field value is classified
//! as scalar, plugin descriptor, or opaque.

use serde_json::Value;
use thiserror::Error;

/// Reserved field: template name the node binds to
pub const FIELD_NAME: &str = "name";
/// Reserved field: stable identity for the keyed join
pub const FIELD_KEY: &str = "key";
/// Reserved field: ordered child list
pub const FIELD_CHILDREN: &str = "children";

#[derive(Error, Debug)]
pub enum DataError {
    /// Items in a data list must be JSON objects
    #[error("data item must be an object, got {found}")]
    NotAnObject { found: &'static str },
}

/// One field value, classified at ingestion time
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Primitive, rendered to its canonical string form
    Scalar(String),
    /// `{name, settings}` object naming a registered plugin
    Descriptor { name: String, settings: Value },
    /// Anything else; ignored by scalar rules, still handed to plugin updates
    Complex(Value),
}

/// One data item, bound to a template instance by `name` and `key`
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    pub name: Option<String>,
    pub key: Option<String>,
    /// Projectable fields in payload order, reserved fields excluded
    pub fields: Vec<(String, FieldValue)>,
    pub children: Vec<DataNode>,
}

impl DataNode {
    /// Normalize a payload into a node list: `null` is empty, a bare object
    /// is a one-element list, an array is taken item by item
    pub fn list_from_value(value: &Value) -> Result<Vec<DataNode>, DataError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Object(_) => Ok(vec![Self::from_value(value)?]),
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            other => Err(DataError::NotAnObject {
                found: json_kind(other),
            }),
        }
    }

    fn from_value(value: &Value) -> Result<DataNode, DataError> {
        let object = value.as_object().ok_or(DataError::NotAnObject {
            found: json_kind(value),
        })?;

        let name = object
            .get(FIELD_NAME)
            .and_then(Value::as_str)
            .map(str::to_string);
        let key = object.get(FIELD_KEY).and_then(canonical_key);
        let children = match object.get(FIELD_CHILDREN) {
            Some(value) => Self::list_from_value(value)?,
            None => Vec::new(),
        };

        let fields = object
            .iter()
            .filter(|(k, _)| {
                k.as_str() != FIELD_NAME && k.as_str() != FIELD_KEY && k.as_str() != FIELD_CHILDREN
            })
            .map(|(k, v)| (k.clone(), classify(v)))
            .collect();

        Ok(DataNode {
            name,
            key,
            fields,
            children,
        })
    }

    /// Look up a scalar field by name
    pub fn scalar_field(&self, key: &str) -> Option<&str> {
        self.fields.iter().find_map(|(k, v)| match v {
            FieldValue::Scalar(s) if k == key => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Classify one field value into the projection union
fn classify(value: &Value) -> FieldValue {
    match value {
        Value::String(s) => FieldValue::Scalar(s.clone()),
        Value::Number(n) => FieldValue::Scalar(n.to_string()),
        Value::Bool(b) => FieldValue::Scalar(b.to_string()),
        Value::Object(object) => match object.get("name").and_then(Value::as_str) {
            Some(name) => FieldValue::Descriptor {
                name: name.to_string(),
                settings: object.get("settings").cloned().unwrap_or(Value::Null),
            },
            None => FieldValue::Complex(value.clone()),
        },
        _ => FieldValue::Complex(value.clone()),
    }
}

/// Canonical string form of a join key. Strings and numbers are the expected
/// shapes; anything else does not count as a key.
fn canonical_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
