//! Request validation for quote generation.
//!
//! The body is parsed into a `serde_json::Value` first so that an unparseable
//! payload and a schema violation stay distinguishable. Field checks then run
//! over the whole object and collect every violation before failing.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;

pub const DEFAULT_COUNT: usize = 10;
pub const MIN_COUNT: usize = 1;
pub const MAX_COUNT: usize = 20;
pub const DEFAULT_OCCASION: &str = "Greeting";

/// A validated, normalized generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub category: Option<String>,
    pub custom_occasion: Option<String>,
    pub recipient: Option<String>,
    pub tone: Option<String>,
    pub style_person: Option<String>,
    /// Always within `MIN_COUNT..=MAX_COUNT`.
    pub count: usize,
    pub language: Option<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            category: None,
            custom_occasion: None,
            recipient: None,
            tone: None,
            style_person: None,
            count: DEFAULT_COUNT,
            language: None,
        }
    }
}

impl GenerationRequest {
    /// Custom occasion overrides category, which overrides `"Greeting"`.
    /// Blank values are skipped, so a whitespace-only category also yields
    /// `"Greeting"` rather than an empty occasion in the prompt.
    pub fn effective_occasion(&self) -> &str {
        non_blank(self.custom_occasion.as_deref())
            .or_else(|| non_blank(self.category.as_deref()))
            .unwrap_or(DEFAULT_OCCASION)
    }
}

/// Per-field diagnostics, serialized as `{ formErrors, fieldErrors }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssues {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationIssues {
    pub fn form(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    pub fn field(&mut self, name: &str, message: impl Into<String>) {
        self.field_errors
            .entry(name.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }
}

impl fmt::Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.extend(messages.iter().map(|m| format!("{field}: {m}")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Parses and validates a raw request body.
///
/// Returns `AppError::InvalidJson` when the bytes are not JSON at all and
/// `AppError::Validation` when the JSON does not fit the schema.
pub fn parse_generation_request(body: &[u8]) -> Result<GenerationRequest, AppError> {
    let value: Value = serde_json::from_slice(body)?;
    validate_generation_request(&value).map_err(AppError::Validation)
}

pub fn validate_generation_request(value: &Value) -> Result<GenerationRequest, ValidationIssues> {
    let mut issues = ValidationIssues::default();

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            issues.form(format!("Expected object, received {}", kind_of(other)));
            return Err(issues);
        }
    };

    let request = GenerationRequest {
        category: string_field(fields, "category", &mut issues),
        custom_occasion: string_field(fields, "customOccasion", &mut issues),
        recipient: string_field(fields, "recipient", &mut issues),
        tone: string_field(fields, "tone", &mut issues),
        style_person: string_field(fields, "stylePerson", &mut issues),
        count: count_field(fields, "count", &mut issues),
        language: string_field(fields, "language", &mut issues),
    };

    if issues.is_empty() {
        Ok(request)
    } else {
        Err(issues)
    }
}

/// JSON type name used in diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn string_field(
    fields: &Map<String, Value>,
    name: &str,
    issues: &mut ValidationIssues,
) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) => Some(s.clone()),
        other => {
            issues.field(name, format!("Expected string, received {}", kind_of(other)));
            None
        }
    }
}

fn count_field(fields: &Map<String, Value>, name: &str, issues: &mut ValidationIssues) -> usize {
    let number = match fields.get(name) {
        None => return DEFAULT_COUNT,
        Some(Value::Number(n)) => n,
        Some(other) => {
            issues.field(name, format!("Expected number, received {}", kind_of(other)));
            return DEFAULT_COUNT;
        }
    };

    // as_f64 is lossy only far outside the accepted range
    let value = number.as_f64().unwrap_or(f64::MAX);
    let mut valid = true;

    if value.fract() != 0.0 {
        issues.field(name, "Expected integer, received float");
        valid = false;
    }
    if value < MIN_COUNT as f64 {
        issues.field(
            name,
            format!("Number must be greater than or equal to {MIN_COUNT}"),
        );
        valid = false;
    }
    if value > MAX_COUNT as f64 {
        issues.field(name, format!("Number must be less than or equal to {MAX_COUNT}"));
        valid = false;
    }

    if valid {
        value as usize
    } else {
        DEFAULT_COUNT
    }
}
