//! Plain-text export of a generated quote list.
//!
//! Quotes are numbered from 1 and separated by a blank line. The download
//! name is the occasion slug followed by `-quotes.txt`.

use serde_json::Value;

use crate::errors::AppError;
use crate::quotes::request::{
    kind_of, non_blank, string_field, ValidationIssues, DEFAULT_OCCASION,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub occasion: Option<String>,
    pub quotes: Vec<String>,
}

impl ExportRequest {
    pub fn occasion(&self) -> &str {
        non_blank(self.occasion.as_deref()).unwrap_or(DEFAULT_OCCASION)
    }
}

pub fn parse_export_request(body: &[u8]) -> Result<ExportRequest, AppError> {
    let value: Value = serde_json::from_slice(body)?;
    validate_export_request(&value).map_err(AppError::Validation)
}

pub fn validate_export_request(value: &Value) -> Result<ExportRequest, ValidationIssues> {
    let mut issues = ValidationIssues::default();

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            issues.form(format!("Expected object, received {}", kind_of(other)));
            return Err(issues);
        }
    };

    let occasion = string_field(fields, "occasion", &mut issues);

    let mut quotes = Vec::new();
    match fields.get("quotes") {
        None => issues.field("quotes", "Required"),
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(s) => quotes.push(s.clone()),
                    other => issues.field(
                        "quotes",
                        format!("Expected string, received {}", kind_of(other)),
                    ),
                }
            }
        }
        Some(other) => issues.field(
            "quotes",
            format!("Expected array, received {}", kind_of(other)),
        ),
    }

    if issues.is_empty() {
        Ok(ExportRequest { occasion, quotes })
    } else {
        Err(issues)
    }
}

/// `"1. first\n\n2. second"`
pub fn render_text(quotes: &[String]) -> String {
    quotes
        .iter()
        .enumerate()
        .map(|(i, quote)| format!("{}. {}", i + 1, quote))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whitespace runs become `-`, then lowercased.
pub fn filename(occasion: &str) -> String {
    let slug = occasion
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("{slug}-quotes.txt")
}

/// `Content-Disposition` value with an ASCII fallback name and an RFC 5987
/// encoded UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(filename)
    )
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
