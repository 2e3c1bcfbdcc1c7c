//! Typed conversions: the `convert(value, kind)` function and JSON <-> Value.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::{error::QueryError, value::Value};

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d{1,9})?)?(Z|[+-]\d{2}:\d{2})?$")
        .expect("valid date-time pattern")
});

/// Target kinds accepted by `convert(value, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
}

impl ValueKind {
    /// Looks a kind up by name. Case-insensitive; accepts a few aliases
    /// (`long`, `double`, `bool`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Self::String,
            "integer" | "int" | "long" => Self::Integer,
            "float" | "double" => Self::Float,
            "decimal" | "bigdecimal" => Self::Decimal,
            "boolean" | "bool" => Self::Boolean,
            "date" | "localdate" => Self::Date,
            "datetime" | "localdatetime" | "instant" | "timestamp" => Self::DateTime,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

fn invalid(value: &Value, kind: ValueKind) -> QueryError {
    QueryError::InvalidValue(format!(
        "cannot convert {} {} to {}",
        value.type_name(),
        value,
        kind.as_str()
    ))
}

/// Converts `value` to `kind`. Arrays convert element-wise; null stays null.
pub fn convert(value: Value, kind: ValueKind) -> Result<Value, QueryError> {
    match value {
        Value::Null => return Ok(Value::Null),
        Value::Array(items) => {
            return items
                .into_iter()
                .map(|item| convert(item, kind))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }
        Value::Param(_) | Value::Json(_) => return Err(invalid(&value, kind)),
        _ => {}
    }

    let converted = match kind {
        ValueKind::String => match &value {
            Value::String(s) | Value::Date(s) | Value::DateTime(s) => Some(Value::String(s.clone())),
            Value::Integer(n) => Some(Value::String(n.to_string())),
            Value::Float(n) => Some(Value::String(n.to_string())),
            Value::Decimal(d) => Some(Value::String(d.to_string())),
            Value::Boolean(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
        ValueKind::Integer => match &value {
            Value::Integer(n) => Some(Value::Integer(*n)),
            Value::Float(n) if n.fract() == 0.0 => n.to_i64().map(Value::Integer),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64().map(Value::Integer),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Integer),
            _ => None,
        },
        ValueKind::Float => match &value {
            Value::Integer(n) => Some(Value::Float(*n as f64)),
            Value::Float(n) => Some(Value::Float(*n)),
            Value::Decimal(d) => d.to_f64().map(Value::Float),
            Value::String(s) => s.trim().parse::<f64>().ok().map(Value::Float),
            _ => None,
        },
        ValueKind::Decimal => match &value {
            Value::Integer(n) => Some(Value::Decimal(Decimal::from(*n))),
            Value::Float(n) => Decimal::from_f64(*n).map(Value::Decimal),
            Value::Decimal(d) => Some(Value::Decimal(*d)),
            Value::String(s) => Decimal::from_str(s.trim()).ok().map(Value::Decimal),
            _ => None,
        },
        ValueKind::Boolean => match &value {
            Value::Boolean(b) => Some(Value::Boolean(*b)),
            Value::Integer(0) => Some(Value::Boolean(false)),
            Value::Integer(1) => Some(Value::Boolean(true)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            _ => None,
        },
        ValueKind::Date => match &value {
            Value::Date(s) => Some(Value::Date(s.clone())),
            Value::String(s) if DATE.is_match(s.trim()) => Some(Value::Date(s.trim().to_string())),
            _ => None,
        },
        ValueKind::DateTime => match &value {
            Value::DateTime(s) => Some(Value::DateTime(s.clone())),
            Value::String(s) if DATE_TIME.is_match(s.trim()) => {
                Some(Value::DateTime(s.trim().to_string()))
            }
            _ => None,
        },
    };

    converted.ok_or_else(|| invalid(&value, kind))
}

/// Convert serde_json::Value to a query Value.
///
/// Objects stay JSON; everything else maps onto the matching scalar or array.
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        obj @ serde_json::Value::Object(_) => Value::Json(obj),
    }
}

/// Convert a query Value to serde_json::Value.
///
/// Placeholders render as `"@name"`.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Decimal(d) => serde_json::Value::String(d.to_string()),
        Value::String(s) | Value::Date(s) | Value::DateTime(s) => {
            serde_json::Value::String(s.clone())
        }
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(value_to_json).collect()),
        Value::Json(json) => json.clone(),
        Value::Param(p) => serde_json::Value::String(format!("@{}", p.name)),
    }
}
