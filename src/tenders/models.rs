//! Tender Models
//! Mission: Shape of a tender document and the loose field coercion applied on write

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// Caller-controlled part of a tender.
///
/// Every field is optional; absent fields are omitted from the stored
/// document and from responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
}

impl TenderFields {
    /// Build fields from an arbitrary JSON request body.
    ///
    /// Keys outside the schema are ignored. Values that cannot be cast to the
    /// field's type are an error, which the handlers report as a store fault.
    pub fn from_document(doc: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            name: cast_text(doc, "name")?,
            phone: cast_text(doc, "phone")?,
            email: cast_text(doc, "email")?,
            amount: cast_number(doc, "amount")?,
        })
    }
}

fn cast_text(doc: &Map<String, Value>, path: &str) -> Result<Option<String>> {
    match doc.get(path) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => bail!("Cast to string failed for value {} at path \"{}\"", other, path),
    }
}

fn cast_number(doc: &Map<String, Value>, path: &str) -> Result<Option<Number>> {
    let value = match doc.get(path) {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed.and_then(normalize_number) {
        Some(n) => Ok(Some(n)),
        None => bail!("Cast to Number failed for value {} at path \"{}\"", value, path),
    }
}

/// Whole values are kept as integers so `100` is echoed back as `100`, not `100.0`
fn normalize_number(n: f64) -> Option<Number> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Some(Number::from(n as i64));
    }
    Number::from_f64(n)
}

/// A stored tender record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: TenderFields,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
