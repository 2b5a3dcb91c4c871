//! Attribute payloads attached to datasets and variables.
//!
//! Attributes travel through three representations: the typed values the
//! NetCDF library hands out, JSON documents stored in Zarr metadata, and
//! this enum in between. Conversions are lossless for every payload the
//! supported source formats produce.

use serde_json::Value;

use crate::error::{DatasetError, DatasetResult};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    TextList(Vec<String>),
}

impl AttrValue {
    /// Convert to a JSON value for storage in Zarr attributes.
    ///
    /// Non-finite floats have no JSON number representation and are written
    /// as the strings `"NaN"`, `"Infinity"` and `"-Infinity"`, matching the
    /// convention other Zarr writers use for fill-value-like attributes.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Text(s) => Value::String(s.clone()),
            AttrValue::Int(v) => Value::from(*v),
            AttrValue::Float(v) => float_to_json(*v),
            AttrValue::IntList(vs) => Value::Array(vs.iter().map(|v| Value::from(*v)).collect()),
            AttrValue::FloatList(vs) => Value::Array(vs.iter().map(|v| float_to_json(*v)).collect()),
            AttrValue::TextList(vs) => {
                Value::Array(vs.iter().map(|s| Value::String(s.clone())).collect())
            }
        }
    }

    /// Reconstruct an attribute value from its JSON form.
    pub fn from_json(value: &Value) -> DatasetResult<Self> {
        match value {
            Value::String(s) => Ok(json_string_to_attr(s)),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(AttrValue::Int(v))
                } else if let Some(v) = n.as_f64() {
                    Ok(AttrValue::Float(v))
                } else {
                    Err(DatasetError::InvalidAttribute(n.to_string()))
                }
            }
            Value::Array(items) => array_from_json(items),
            other => Err(DatasetError::InvalidAttribute(other.to_string())),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

fn float_to_json(v: f64) -> Value {
    if v.is_nan() {
        Value::String("NaN".to_string())
    } else if v == f64::INFINITY {
        Value::String("Infinity".to_string())
    } else if v == f64::NEG_INFINITY {
        Value::String("-Infinity".to_string())
    } else {
        // Finite f64 always converts.
        serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn json_string_to_attr(s: &str) -> AttrValue {
    match s {
        "NaN" => AttrValue::Float(f64::NAN),
        "Infinity" => AttrValue::Float(f64::INFINITY),
        "-Infinity" => AttrValue::Float(f64::NEG_INFINITY),
        _ => AttrValue::Text(s.to_string()),
    }
}

fn array_from_json(items: &[Value]) -> DatasetResult<AttrValue> {
    if items.iter().all(|v| v.as_i64().is_some()) {
        return Ok(AttrValue::IntList(
            items.iter().filter_map(Value::as_i64).collect(),
        ));
    }
    if items
        .iter()
        .all(|v| v.is_number() || matches!(v.as_str(), Some("NaN" | "Infinity" | "-Infinity")))
    {
        let floats = items
            .iter()
            .map(|v| match AttrValue::from_json(v) {
                Ok(AttrValue::Float(f)) => Ok(f),
                Ok(AttrValue::Int(i)) => Ok(i as f64),
                _ => Err(DatasetError::InvalidAttribute(v.to_string())),
            })
            .collect::<DatasetResult<Vec<f64>>>()?;
        return Ok(AttrValue::FloatList(floats));
    }
    if items.iter().all(Value::is_string) {
        return Ok(AttrValue::TextList(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ));
    }
    Err(DatasetError::InvalidAttribute(format!(
        "mixed-type array of {} elements",
        items.len()
    )))
}
