//! Parameter summaries derived from cached tool schemas
//!
//! Only a small JSON Schema subset is read: `properties`, `required`, `type`,
//! `enum`, `anyOf` and `oneOf`. Anything missing or malformed is treated as
//! absent.

use crate::tool::ToolDefinition;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Type name reported for enumerated properties
pub const ENUM_TYPE: &str = "enum";

/// Tool definition plus its derived parameter summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetail {
    /// Tool name
    pub name: String,
    /// Tool description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input schema as advertised
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
    /// Derived parameter summary
    pub parameter_info: ParameterInfo,
}

/// Required/optional parameter names, their types and enum values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterInfo {
    /// Names listed in the schema's `required` array
    pub required: Vec<String>,
    /// Property names not listed as required
    pub optional: Vec<String>,
    /// Declared type per property, or `"enum"`
    pub types: BTreeMap<String, String>,
    /// Allowed values for properties resolved as `"enum"`
    pub enums: BTreeMap<String, Vec<Value>>,
}

impl From<&ToolDefinition> for ToolDetail {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.input_schema.clone(),
            parameter_info: tool
                .input_schema
                .as_ref()
                .map(ParameterInfo::from_schema)
                .unwrap_or_default(),
        }
    }
}

impl ParameterInfo {
    /// Summarize an object schema
    #[must_use]
    pub fn from_schema(schema: &Value) -> Self {
        let required: Vec<String> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut info = Self {
            required,
            ..Self::default()
        };

        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return info;
        };

        for (name, property) in properties {
            if !info.required.contains(name) {
                info.optional.push(name.clone());
            }

            if let Some(declared) = declared_type(property) {
                info.types.insert(name.clone(), declared.to_string());
            } else if let Some(values) = enum_values(property) {
                info.types.insert(name.clone(), ENUM_TYPE.to_string());
                info.enums.insert(name.clone(), values);
            }
        }

        info
    }
}

/// `type` as a string, or the first non-null entry of a type array
fn declared_type(property: &Value) -> Option<&str> {
    match property.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

/// Enum values from a bare `enum` or from `anyOf`/`oneOf` variants carrying one
fn enum_values(property: &Value) -> Option<Vec<Value>> {
    if let Some(values) = property.get("enum").and_then(Value::as_array) {
        return Some(values.clone());
    }

    let mut values = Vec::new();
    let mut found = false;
    for key in ["anyOf", "oneOf"] {
        let Some(variants) = property.get(key).and_then(Value::as_array) else {
            continue;
        };
        for variant in variants {
            if let Some(members) = variant.get("enum").and_then(Value::as_array) {
                found = true;
                values.extend(members.iter().cloned());
            }
        }
    }

    found.then_some(values)
}
