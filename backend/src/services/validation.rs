//! Request validation at the service boundary.
//!
//! Two independent schemas:
//!
//! - analyze requests: a JSON body with a `text` string, trimmed, 1..=10000 characters
//! - history queries: optional `limit` (1..=100, default 50) and `offset`
//!   (>= 0, default 0), both supplied as loosely-typed strings
//!
//! Any issue aborts the request before the scoring engine or the store is
//! touched. Every issue found in one pass is reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::Pagination;

/// Maximum accepted text length, in characters, after trimming.
pub const MAX_TEXT_CHARS: usize = 10_000;

/// A single failed check, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Dotted path to the field (`""` for the request root)
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Structured validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation error: {}", format_issues(.issues))]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path, i.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new(path, message)],
        }
    }

    /// Whether any issue names `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

/// A validated analyze request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// Submitted text with surrounding whitespace removed
    pub text: String,
}

/// Raw history query parameters, exactly as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate an analyze request body.
pub fn validate_analyze_request(body: &Value) -> Result<AnalyzeRequest, ValidationErrors> {
    let object = body.as_object().ok_or_else(|| {
        ValidationErrors::single(
            "",
            format!("Expected object, received {}", json_type_name(body)),
        )
    })?;

    let text = match object.get("text") {
        None => return Err(ValidationErrors::single("text", "Required")),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ValidationErrors::single(
                "text",
                format!("Expected string, received {}", json_type_name(other)),
            ))
        }
    };

    validate_text(text).map(|text| AnalyzeRequest { text })
}

/// Trim `text` and check its length.
pub fn validate_text(text: &str) -> Result<String, ValidationErrors> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();

    if chars == 0 {
        return Err(ValidationErrors::single("text", "Text must not be empty"));
    }
    if chars > MAX_TEXT_CHARS {
        return Err(ValidationErrors::single(
            "text",
            format!("Text must not exceed {} characters", MAX_TEXT_CHARS),
        ));
    }

    Ok(trimmed.to_string())
}

/// Coerce and bound-check history query parameters.
pub fn validate_pagination(query: &HistoryQuery) -> Result<Pagination, ValidationErrors> {
    let mut issues = Vec::new();

    let limit = parse_param(query.limit.as_deref(), "limit", Pagination::DEFAULT_LIMIT)
        .and_then(|v| {
            if (Pagination::MIN_LIMIT..=Pagination::MAX_LIMIT).contains(&v) {
                Ok(v)
            } else {
                Err(FieldIssue::new(
                    "limit",
                    format!(
                        "Must be between {} and {}",
                        Pagination::MIN_LIMIT,
                        Pagination::MAX_LIMIT
                    ),
                ))
            }
        })
        .map_err(|issue| issues.push(issue))
        .ok();

    let offset = parse_param(query.offset.as_deref(), "offset", Pagination::DEFAULT_OFFSET)
        .and_then(|v| {
            if v >= 0 {
                Ok(v)
            } else {
                Err(FieldIssue::new("offset", "Must be greater than or equal to 0"))
            }
        })
        .map_err(|issue| issues.push(issue))
        .ok();

    match (limit, offset) {
        (Some(limit), Some(offset)) => Ok(Pagination::new(limit, offset)),
        _ => Err(ValidationErrors { issues }),
    }
}

/// Missing and empty parameters take `default`; anything else must be an integer.
fn parse_param(raw: Option<&str>, name: &str, default: i64) -> Result<i64, FieldIssue> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| FieldIssue::new(name, format!("Expected integer, received '{}'", s))),
    }
}
