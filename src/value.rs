use std::fmt;

use rust_decimal::Decimal;

use crate::convert::ValueKind;

/// A resolved value carried by conditions, payloads and key-value statements.
///
/// # Type Preservation
///
/// Integers and floats stay distinct: `10` is [`Value::Integer`], `10.0` is
/// [`Value::Float`]. Decimals, dates and date-times only come out of
/// `convert(...)`.
///
/// # Examples
///
/// ```
/// use quill_lang::Value;
///
/// let age = Value::from(10);
/// let name = Value::from("Diana");
/// let powers = Value::Array(vec![Value::from("sun"), Value::from("moon")]);
/// assert!(age.is_scalar());
/// assert!(!powers.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    /// ISO-8601 calendar date (`2024-01-31`)
    Date(String),
    /// ISO-8601 date-time (`2024-01-31T10:15:30Z`)
    DateTime(String),
    Array(Vec<Value>),
    /// JSON object literal
    Json(serde_json::Value),
    /// Unbound placeholder; only present in prepared templates
    Param(ParamRef),
}

/// Placeholder for a named parameter inside a prepared template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamRef {
    pub name: String,
    /// Conversion applied once the parameter is bound (`convert(@p, kind)`)
    pub convert: Option<ValueKind>,
}

impl ParamRef {
    pub fn new(name: impl Into<String>) -> Self {
        ParamRef {
            name: name.into(),
            convert: None,
        }
    }
}

impl Value {
    /// Whether the value is a single comparable element (not a collection,
    /// JSON object, null or placeholder).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Boolean(_)
                | Value::Integer(_)
                | Value::Float(_)
                | Value::Decimal(_)
                | Value::String(_)
                | Value::Date(_)
                | Value::DateTime(_)
        )
    }

    /// Whether any placeholder remains, at any depth.
    pub fn has_params(&self) -> bool {
        match self {
            Value::Param(_) => true,
            Value::Array(items) => items.iter().any(Value::has_params),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Date(s) | Value::DateTime(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Human-readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Json(_) => "json",
            Value::Param(_) => "parameter",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) | Value::Date(s) | Value::DateTime(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
            Value::Json(json) => write!(f, "{json}"),
            Value::Param(p) => write!(f, "@{}", p.name),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
