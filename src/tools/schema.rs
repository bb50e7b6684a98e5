//! Declared tool inputs and their validation.
//!
//! The reasoning engine hands tools a single raw string. Each tool declares the
//! fields it understands; the raw string is either a JSON object naming those
//! fields or free text bound to the tool's primary text field.

use crate::error::ToolError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Type and constraints of one input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer { min: Option<i64>, max: Option<i64> },
    Number,
    Boolean,
}

/// A validated input value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Declaration of one input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub description: String,
}

impl FieldSpec {
    /// An optional text field.
    pub fn text(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Text, description)
    }

    /// An optional integer field with no bounds.
    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Integer { min: None, max: None }, description)
    }

    /// An optional floating point field.
    pub fn number(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Number, description)
    }

    /// An optional boolean field.
    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Boolean, description)
    }

    fn new(name: &str, kind: FieldKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            default: None,
            description: description.to_string(),
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the field is omitted.
    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Inclusive bounds for an integer field. No effect on other kinds.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        if let FieldKind::Integer { .. } = self.kind {
            self.kind = FieldKind::Integer {
                min: Some(min),
                max: Some(max),
            };
        }
        self
    }

    fn coerce(&self, value: &Value) -> Result<FieldValue, ToolError> {
        let invalid = |expected: &str| {
            ToolError::InvalidInput(format!(
                "'{}' must be {}, got {}",
                self.name, expected, value
            ))
        };

        match &self.kind {
            FieldKind::Text => match value {
                Value::String(s) => Ok(FieldValue::Text(s.clone())),
                Value::Number(n) => Ok(FieldValue::Text(n.to_string())),
                Value::Bool(b) => Ok(FieldValue::Text(b.to_string())),
                _ => Err(invalid("a string")),
            },
            FieldKind::Integer { min, max } => {
                let parsed = match value {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| invalid("an integer"))?;

                if min.is_some_and(|m| parsed < m) || max.is_some_and(|m| parsed > m) {
                    return Err(ToolError::InvalidInput(format!(
                        "'{}' must be between {} and {}, got {}",
                        self.name,
                        min.map_or("-inf".to_string(), |m| m.to_string()),
                        max.map_or("inf".to_string(), |m| m.to_string()),
                        parsed
                    )));
                }
                Ok(FieldValue::Integer(parsed))
            }
            FieldKind::Number => match value {
                Value::Number(n) => n.as_f64().map(FieldValue::Number),
                Value::String(s) => s.trim().parse::<f64>().ok().map(FieldValue::Number),
                _ => None,
            }
            .ok_or_else(|| invalid("a number")),
            FieldKind::Boolean => match value {
                Value::Bool(b) => Some(FieldValue::Boolean(*b)),
                Value::String(s) => s.trim().parse::<bool>().ok().map(FieldValue::Boolean),
                _ => None,
            }
            .ok_or_else(|| invalid("true or false")),
        }
    }

    fn type_label(&self) -> String {
        match &self.kind {
            FieldKind::Text => "text".to_string(),
            FieldKind::Integer {
                min: Some(lo),
                max: Some(hi),
            } => format!("integer {}..={}", lo, hi),
            FieldKind::Integer { .. } => "integer".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
        }
    }
}

/// Ordered field declarations for a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// A schema for tools that take no input.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// The field free-text input binds to: the first required text field,
    /// otherwise the first text field.
    pub fn primary_field(&self) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.required && f.kind == FieldKind::Text)
            .or_else(|| self.fields.iter().find(|f| f.kind == FieldKind::Text))
    }

    /// Validate raw action input against the declared fields.
    pub fn validate(&self, raw: &str) -> Result<ToolInput, ToolError> {
        if self.fields.is_empty() {
            return Ok(ToolInput::default());
        }

        let trimmed = raw.trim();

        if trimmed.starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
                return self.validate_object(&map);
            }
        }

        let text = strip_quotes(trimmed);
        let mut map = Map::new();
        if !text.is_empty() {
            let primary = self.primary_field().ok_or_else(|| {
                ToolError::InvalidInput(
                    "expected a JSON object with the declared fields".to_string(),
                )
            })?;
            map.insert(primary.name.clone(), Value::String(text.to_string()));
        }
        self.validate_object(&map)
    }

    fn validate_object(&self, map: &Map<String, Value>) -> Result<ToolInput, ToolError> {
        let mut values = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            match map.get(&field.name).filter(|v| !v.is_null()) {
                Some(value) => values.push((field.name.clone(), field.coerce(value)?)),
                None => match &field.default {
                    Some(default) => values.push((field.name.clone(), default.clone())),
                    None if field.required => {
                        return Err(ToolError::InvalidInput(format!(
                            "missing required field '{}'",
                            field.name
                        )))
                    }
                    None => {}
                },
            }
        }

        Ok(ToolInput { values })
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut prop = Map::new();
            let type_name = match &field.kind {
                FieldKind::Text => "string",
                FieldKind::Integer { min, max } => {
                    if let Some(min) = min {
                        prop.insert("minimum".to_string(), Value::from(*min));
                    }
                    if let Some(max) = max {
                        prop.insert("maximum".to_string(), Value::from(*max));
                    }
                    "integer"
                }
                FieldKind::Number => "number",
                FieldKind::Boolean => "boolean",
            };
            prop.insert("type".to_string(), Value::from(type_name));
            prop.insert("description".to_string(), Value::from(field.description.clone()));
            if let Some(default) = &field.default {
                prop.insert(
                    "default".to_string(),
                    serde_json::to_value(default).unwrap_or(Value::Null),
                );
            }
            if field.required {
                required.push(Value::from(field.name.clone()));
            }
            properties.insert(field.name.clone(), Value::Object(prop));
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// One-line summary for prompts and listings.
    pub fn summary(&self) -> String {
        if self.fields.is_empty() {
            return "no input required".to_string();
        }

        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                let qualifier = if f.required {
                    "required".to_string()
                } else if let Some(default) = &f.default {
                    format!("default {}", default)
                } else {
                    "optional".to_string()
                };
                format!("{}: {} ({})", f.name, f.type_label(), qualifier)
            })
            .collect();

        format!("{{{}}}", parts.join(", "))
    }
}

/// Validated input handed to a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInput {
    values: Vec<(String, FieldValue)>,
}

impl ToolInput {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FieldValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(FieldValue::Number(n)) => Some(*n),
            Some(FieldValue::Integer(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(FieldValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Required text field; the schema guarantees presence for required fields.
    pub fn require_text(&self, name: &str) -> Result<&str, ToolError> {
        self.text(name)
            .ok_or_else(|| ToolError::InvalidInput(format!("missing required field '{}'", name)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_schema() -> InputSchema {
        InputSchema::new(vec![
            FieldSpec::text("query", "The search query").required(),
            FieldSpec::integer("max_results", "How many results")
                .range(1, 20)
                .with_default(FieldValue::Integer(5)),
        ])
    }

    #[test]
    fn test_free_text_binds_to_primary_field() {
        let input = search_schema().validate("\"rust async traits\"").unwrap();
        assert_eq!(input.text("query"), Some("rust async traits"));
        assert_eq!(input.integer("max_results"), Some(5));
    }

    #[test]
    fn test_json_object_is_validated_per_field() {
        let input = search_schema()
            .validate(r#"{"query": "weather in Oslo", "max_results": "3", "extra": true}"#)
            .unwrap();
        assert_eq!(input.text("query"), Some("weather in Oslo"));
        assert_eq!(input.integer("max_results"), Some(3));
        assert!(input.get("extra").is_none());
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let err = search_schema()
            .validate(r#"{"query": "x", "max_results": 99}"#)
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 20"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = search_schema().validate("   ").unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
        assert!(err.to_string().contains("query"));

        let err = search_schema().validate(r#"{"max_results": 2}"#).unwrap_err();
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let schema = InputSchema::new(vec![FieldSpec::boolean("metric", "Use metric units")]);
        let err = schema.validate(r#"{"metric": [1]}"#).unwrap_err();
        assert!(err.to_string().contains("true or false"));
    }

    #[test]
    fn test_empty_schema_ignores_input() {
        let input = InputSchema::empty().validate("tell me something funny").unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn test_free_text_without_text_field_is_rejected() {
        let schema = InputSchema::new(vec![FieldSpec::number("lat", "Latitude").required()]);
        assert!(schema.validate("somewhere nice").is_err());
        let input = schema.validate(r#"{"lat": 59.9}"#).unwrap();
        assert_eq!(input.number("lat"), Some(59.9));
    }

    #[test]
    fn test_malformed_json_falls_back_to_free_text() {
        let input = search_schema().validate("{not json").unwrap();
        assert_eq!(input.text("query"), Some("{not json"));
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = search_schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["max_results"]["maximum"], 20);
        assert_eq!(schema["properties"]["max_results"]["default"], 5);
        assert_eq!(schema["required"], serde_json::json!(["query"]));
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            search_schema().summary(),
            "{query: text (required), max_results: integer 1..=20 (default 5)}"
        );
        assert_eq!(InputSchema::empty().summary(), "no input required");
    }
}
