//! Dynamic values flowing through a command binding
//!
//! Raw caller input, defaults, converted values and bound values all share
//! the [`Value`] representation. Absence is modelled as `Option<Value>`.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{Error, Result};

/// Variant name of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    List,
}

/// A raw or canonical parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// The variant of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Truthiness: `false`, zero, the empty string and the empty list are
    /// falsy, everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Elements of a list, or the value itself as a one-element list.
    #[must_use]
    pub fn into_elements(self) -> Vec<Self> {
        match self {
            Self::List(items) => items,
            scalar => vec![scalar],
        }
    }

    /// Convert a JSON value supplied for `parameter`.
    ///
    /// `null` means "not supplied" and yields `None`. Objects have no
    /// command-line form and are rejected.
    pub fn from_json(parameter: &str, json: serde_json::Value) -> Result<Option<Self>> {
        match json {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Bool(b) => Ok(Some(Self::Bool(b))),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .map(Some)
                .ok_or_else(|| {
                    Error::invalid_value(parameter, format!("unrepresentable number {n}"))
                }),
            serde_json::Value::String(s) => Ok(Some(Self::Str(s))),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    Self::from_json(parameter, item)?.ok_or_else(|| {
                        Error::invalid_value(parameter, "null is not allowed inside a list")
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(|items| Some(Self::List(items))),
            serde_json::Value::Object(_) => Err(Error::invalid_value(
                parameter,
                "objects cannot be used as parameter values",
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => write!(f, "{}", items.iter().join(" ")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Self::Int(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::from(true).is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(Value::from(-3).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("no").is_truthy());
        assert!(!Value::List(Vec::new()).is_truthy());
        assert!(Value::from(vec![false]).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(10).to_string(), "10");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a b");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from("x").kind().to_string(), "str");
        assert_eq!(Value::from([1, 2]).kind().to_string(), "list");
    }

    #[test]
    fn test_into_elements_wraps_scalars() {
        assert_eq!(Value::from(3).into_elements(), vec![Value::Int(3)]);
        assert_eq!(
            Value::from([1, 2]).into_elements(),
            vec![Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn test_from_json() -> Result<()> {
        let json = serde_json::json!([1, 2.5, "x", true]);
        let value = Value::from_json("p", json)?;
        assert_eq!(
            value,
            Some(Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::from("x"),
                Value::Bool(true),
            ]))
        );
        assert_eq!(Value::from_json("p", serde_json::Value::Null)?, None);
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_objects_and_nested_nulls() {
        assert!(Value::from_json("p", serde_json::json!({"a": 1})).is_err());
        assert!(Value::from_json("p", serde_json::json!([1, null])).is_err());
    }

    #[test]
    fn test_serde_untagged() -> std::result::Result<(), serde_json::Error> {
        let value: Value = serde_json::from_str(r#"["a", 1, 1.5, false]"#)?;
        assert_eq!(value, Value::from_iter([
            Value::from("a"),
            Value::from(1),
            Value::from(1.5),
            Value::from(false),
        ]));
        assert_eq!(serde_json::to_string(&Value::from(7))?, "7");
        Ok(())
    }
}
