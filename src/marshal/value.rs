//! Decoded values and result kind selection.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::util::{Error, Result};

/// Decoding target for numeric arrays of more than one element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// Packed `f64` sequence (token `"f"`)
    Float,
    /// Packed `i64` sequence (token `"i"`)
    Int,
    /// Sequence of individually boxed scalars (token `"p"` or absent)
    #[default]
    Boxed,
}

impl ResultKind {
    /// Parse a result kind token. `None` selects [`ResultKind::Boxed`].
    pub fn from_token(token: Option<&str>) -> Result<Self> {
        match token {
            Some("f") => Ok(Self::Float),
            Some("i") => Ok(Self::Int),
            Some("p") | None => Ok(Self::Boxed),
            Some(other) => Err(Error::invalid(format!(
                "result kind must be one of \"f\", \"i\", \"p\", got {other:?}"
            ))),
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Float => "f",
            Self::Int => "i",
            Self::Boxed => "p",
        }
    }
}

/// A decoded array or attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absent value (empty array)
    None,
    /// Character data
    Text(String),
    /// Single integer
    Int(i64),
    /// Single float
    Float(f64),
    /// Boxed scalars in index order
    List(Vec<Value>),
    /// Packed integers in index order
    Ints(Vec<i64>),
    /// Packed floats in index order
    Floats(Vec<f64>),
}

impl Value {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Number of elements: 0 for `None`, 1 for scalars and text.
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Text(_) | Self::Int(_) | Self::Float(_) => 1,
            Self::List(v) => v.len(),
            Self::Ints(v) => v.len(),
            Self::Floats(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to a JSON value. Non-finite floats become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::None => JsonValue::Null,
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Int(i) => JsonValue::from(*i),
            Self::Float(f) => JsonValue::from(*f),
            Self::List(v) => JsonValue::Array(v.iter().map(Value::to_json).collect()),
            Self::Ints(v) => JsonValue::Array(v.iter().map(|&i| JsonValue::from(i)).collect()),
            Self::Floats(v) => JsonValue::Array(v.iter().map(|&f| JsonValue::from(f)).collect()),
        }
    }

    /// Convert from a JSON value. Objects and booleans are rejected.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        Ok(match json {
            JsonValue::Null => Self::None,
            JsonValue::String(s) => Self::Text(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Int(i64::try_from(u).map_err(|_| Error::invalid(format!("{u} out of range")))?)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::Array(items) => {
                Self::List(items.iter().map(Value::from_json).collect::<Result<_>>()?)
            }
            JsonValue::Bool(_) | JsonValue::Object(_) => {
                return Err(Error::invalid(format!("unsupported value {json}")));
            }
        })
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_kind_tokens() {
        assert_eq!(ResultKind::from_token(Some("f")).unwrap(), ResultKind::Float);
        assert_eq!(ResultKind::from_token(Some("i")).unwrap(), ResultKind::Int);
        assert_eq!(ResultKind::from_token(Some("p")).unwrap(), ResultKind::Boxed);
        assert_eq!(ResultKind::from_token(None).unwrap(), ResultKind::Boxed);

        let err = ResultKind::from_token(Some("d")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_json_conversion() {
        let v = Value::List(vec![Value::Int(1), Value::Float(2.5), Value::Text("a".into())]);
        assert_eq!(v.to_json().to_string(), r#"[1,2.5,"a"]"#);

        let parsed: JsonValue = serde_json::from_str("[[1, 2], [3, 4]]").unwrap();
        let back = Value::from_json(&parsed).unwrap();
        assert_eq!(back.len(), 2);
        assert!(Value::from_json(&JsonValue::Bool(true)).is_err());
    }
}
