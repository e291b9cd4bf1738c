use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A callable tool advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON-schema object describing the arguments.
    pub parameters: Value,
    /// Reject extra or missing fields.
    pub strict: bool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned correlation id.
    pub id: String,
    pub name: String,
    /// Raw argument text as produced by the model.
    pub arguments: String,
}

impl ToolSpec {
    pub fn new(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
            strict: true,
        }
    }

    /// Check an argument payload against the declared parameter schema.
    ///
    /// Covers the subset of JSON schema tool declarations use: `required`,
    /// per-property `type`, and `additionalProperties: false`. Strict tools
    /// reject unknown properties even when the schema omits the flag.
    pub fn validate_arguments(&self, args: &Value) -> Result<(), String> {
        let obj = args
            .as_object()
            .ok_or_else(|| format!("arguments for {} must be a JSON object", self.name))?;

        let properties = self.parameters.get("properties").and_then(Value::as_object);

        if let Some(required) = self.parameters.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if !obj.contains_key(field) {
                    return Err(format!("missing required argument '{field}'"));
                }
            }
        }

        let closed = self.strict
            || self.parameters.get("additionalProperties") == Some(&Value::Bool(false));

        for (key, value) in obj {
            match properties.and_then(|p| p.get(key)) {
                Some(prop) => {
                    if let Some(expected) = prop.get("type").and_then(Value::as_str) {
                        if !matches_type(value, expected) {
                            return Err(format!(
                                "argument '{key}' must be of type {expected}, got {value}"
                            ));
                        }
                    }
                }
                None if closed => return Err(format!("unexpected argument '{key}'")),
                None => {}
            }
        }

        Ok(())
    }

    /// Whether the declaration is itself usable as a strict tool schema.
    pub fn check_declaration(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("tool name must not be empty".into());
        }
        if self.parameters.get("type").and_then(Value::as_str) != Some("object") {
            return Err(format!("parameters of tool {} must be an object schema", self.name));
        }
        if self.strict {
            let props: Vec<&str> = self
                .parameters
                .get("properties")
                .and_then(Value::as_object)
                .map(|p| p.keys().map(String::as_str).collect())
                .unwrap_or_default();
            let required: Vec<&str> = self
                .parameters
                .get("required")
                .and_then(Value::as_array)
                .map(|r| r.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if let Some(missing) = props.iter().find(|p| !required.contains(*p)) {
                return Err(format!(
                    "strict tool {} must list property '{missing}' as required",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}
