//! Inbound job payload and its validator.
//!
//! The webhook body is untrusted JSON. [`validate_payload`] applies guard
//! clauses in a fixed order and either returns a typed [`JobPayload`] or a
//! [`ValidationError`] naming the first offending field. Nothing else in the
//! pipeline runs until validation has passed.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_SOURCE_ID: &str = "source_id";
pub const FIELD_BUDGET: &str = "budget";
pub const FIELD_SKILLS: &str = "skills";
pub const FIELD_CLIENT: &str = "client";
pub const FIELD_URL: &str = "url";
pub const FIELD_HOURLY_RANGE: &str = "hourly_range";
pub const FIELD_ESTIMATED_TIME: &str = "estimated_time";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Job budget: either a fixed price or a `{min, max}` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Budget {
    Fixed(f64),
    Range { min: f64, max: f64 },
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(amount) => write!(f, "{amount}"),
            Self::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

/// A validated job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub title: String,
    pub description: String,
    /// Identifies the job on the origin platform. Not deduplicated.
    pub source_id: String,
    pub budget: Option<Budget>,
    pub skills: Vec<String>,
    /// Free-form client metadata, passed through untouched.
    pub client: Option<Map<String, Value>>,
    pub url: Option<String>,
    pub hourly_range: Option<String>,
    pub estimated_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw JSON value into a [`JobPayload`].
///
/// Rules, in order:
/// 1. The value must be an object.
/// 2. `title`, `description` and `source_id` must be strings that are
///    non-empty after trimming. Stored values are trimmed.
/// 3. `budget`, if present, is a number or a `{min, max}` numeric pair with
///    `min <= max`.
/// 4. `skills`, if present, is an array of strings.
/// 5. `client`, if present, is an object.
/// 6. `url`, `hourly_range`, `estimated_time`, if present, are strings.
///
/// `null` is treated as absent for every optional field. Unknown keys are
/// ignored.
pub fn validate_payload(raw: &Value) -> Result<JobPayload, ValidationError> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationError::new("body", "expected a JSON object"));
    };

    let title = required_text(obj, FIELD_TITLE)?;
    let description = required_text(obj, FIELD_DESCRIPTION)?;
    let source_id = required_text(obj, FIELD_SOURCE_ID)?;
    let budget = optional(obj, FIELD_BUDGET).map(parse_budget).transpose()?;
    let skills = optional(obj, FIELD_SKILLS)
        .map(parse_skills)
        .transpose()?
        .unwrap_or_default();

    let client = match optional(obj, FIELD_CLIENT) {
        None => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => return Err(ValidationError::new(FIELD_CLIENT, "must be an object")),
    };

    let url = optional_text(obj, FIELD_URL)?;
    let hourly_range = optional_text(obj, FIELD_HOURLY_RANGE)?;
    let estimated_time = optional_text(obj, FIELD_ESTIMATED_TIME)?;

    Ok(JobPayload {
        title,
        description,
        source_id,
        budget,
        skills,
        client,
        url,
        hourly_range,
        estimated_time,
    })
}

/// Parse a raw request body into JSON ahead of [`validate_payload`].
///
/// A body that is not JSON at all is reported against the `body` field.
pub fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(body)
        .map_err(|e| ValidationError::new("body", format!("invalid JSON: {e}")))
}

/// Look up a key, treating JSON `null` as absent.
fn optional<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_text(obj: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match optional(obj, field) {
        None => Err(ValidationError::new(field, "is required")),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(ValidationError::new(field, "must not be empty")),
        Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
}

fn optional_text(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, ValidationError> {
    match optional(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
}

fn parse_budget(value: &Value) -> Result<Budget, ValidationError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(Budget::Fixed)
            .ok_or_else(|| ValidationError::new(FIELD_BUDGET, "must be a finite number")),
        Value::Object(range) => {
            let min = range.get("min").and_then(Value::as_f64);
            let max = range.get("max").and_then(Value::as_f64);
            match (min, max) {
                (Some(min), Some(max)) if min <= max => Ok(Budget::Range { min, max }),
                (Some(min), Some(max)) => Err(ValidationError::new(
                    FIELD_BUDGET,
                    format!("min ({min}) must not exceed max ({max})"),
                )),
                _ => Err(ValidationError::new(
                    FIELD_BUDGET,
                    "range must have numeric min and max",
                )),
            }
        }
        _ => Err(ValidationError::new(
            FIELD_BUDGET,
            "must be a number or a {min, max} object",
        )),
    }
}

fn parse_skills(value: &Value) -> Result<Vec<String>, ValidationError> {
    let Value::Array(items) = value else {
        return Err(ValidationError::new(FIELD_SKILLS, "must be an array of strings"));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.trim().to_string()),
            _ => Err(ValidationError::new(
                FIELD_SKILLS,
                format!("element {i} must be a string"),
            )),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
