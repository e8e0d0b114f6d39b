//! Value conversion strategies
//!
//! A [`ParamType`] turns raw input into a canonical [`Value`] and renders a
//! canonical value as a command-line token. Built-ins cover text, integers,
//! floats, enumerated choices and flag booleans; anything else implements
//! the trait and is passed to a parameter declaration directly.

use std::{fmt, sync::Arc};

use itertools::Itertools;

use crate::{context::Context, parameter::Parameter, Error, Result, Value};

/// Conversion and rendering strategy for one parameter.
///
/// `render` must accept every value `convert` can produce.
pub trait ParamType: fmt::Debug + Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &str {
        "value"
    }

    /// Convert a raw value into its canonical form.
    ///
    /// `context` holds the values bound so far in the enclosing command,
    /// which allows cross-parameter checks.
    fn convert(&self, value: Value, parameter: &Parameter, context: &Context) -> Result<Value>;

    /// Render a canonical value as a single token.
    fn render(&self, value: &Value) -> String;
}

fn reject(parameter: &Parameter, ty: &dyn ParamType, value: &Value, reason: impl Into<String>) -> Error {
    Error::type_conversion(parameter.name(), ty.name(), value.to_string(), reason)
}

/// Identity string type, the default for undeclared types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Text;

impl ParamType for Text {
    fn name(&self) -> &str {
        "string"
    }

    fn convert(&self, value: Value, parameter: &Parameter, _context: &Context) -> Result<Value> {
        match value {
            Value::Str(_) => Ok(value),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(Value::Str(value.to_string())),
            Value::List(_) => Err(reject(parameter, self, &value, "expected a string, got list")),
        }
    }

    fn render(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Base-10 signed integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Integer;

impl ParamType for Integer {
    fn name(&self) -> &str {
        "integer"
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn convert(&self, value: Value, parameter: &Parameter, _context: &Context) -> Result<Value> {
        match value {
            Value::Int(_) => Ok(value),
            Value::Str(ref s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| reject(parameter, self, &value, e.to_string())),
            Value::Float(x)
                if x.is_finite()
                    && x.fract() == 0.0
                    && x >= i64::MIN as f64
                    && x < i64::MAX as f64 =>
            {
                Ok(Value::Int(x as i64))
            }
            Value::Float(_) => Err(reject(parameter, self, &value, "not an integral number")),
            Value::Bool(_) | Value::List(_) => Err(reject(
                parameter,
                self,
                &value,
                format!("expected an integer, got {}", value.kind()),
            )),
        }
    }

    fn render(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Finite floating-point number.
///
/// Renders in shortest round-trip form unless a fixed precision is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Float {
    precision: Option<usize>,
}

impl Float {
    #[must_use]
    pub const fn new() -> Self {
        Self { precision: None }
    }

    /// Render with exactly `digits` digits after the decimal point.
    #[must_use]
    pub const fn with_precision(digits: usize) -> Self {
        Self {
            precision: Some(digits),
        }
    }

    #[must_use]
    pub const fn precision(&self) -> Option<usize> {
        self.precision
    }
}

impl ParamType for Float {
    fn name(&self) -> &str {
        "float"
    }

    #[allow(clippy::cast_precision_loss)]
    fn convert(&self, value: Value, parameter: &Parameter, _context: &Context) -> Result<Value> {
        let parsed = match value {
            Value::Float(x) => x,
            Value::Int(i) => i as f64,
            Value::Str(ref s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| reject(parameter, self, &value, e.to_string()))?,
            Value::Bool(_) | Value::List(_) => {
                return Err(reject(
                    parameter,
                    self,
                    &value,
                    format!("expected a number, got {}", value.kind()),
                ))
            }
        };

        if parsed.is_finite() {
            Ok(Value::Float(parsed))
        } else {
            Err(reject(parameter, self, &value, "not a finite number"))
        }
    }

    fn render(&self, value: &Value) -> String {
        match (value, self.precision) {
            (Value::Float(x), Some(digits)) => format!("{x:.digits$}"),
            _ => value.to_string(),
        }
    }
}

/// Membership in a fixed set of allowed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    choices: Vec<String>,
    case_sensitive: bool,
}

impl Choice {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    /// Match ignoring ASCII case; the declared spelling is what gets bound.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl ParamType for Choice {
    fn name(&self) -> &str {
        "choice"
    }

    fn convert(&self, value: Value, parameter: &Parameter, _context: &Context) -> Result<Value> {
        if value.is_list() {
            return Err(reject(parameter, self, &value, "expected a single choice, got list"));
        }

        let candidate = value.to_string();
        self.choices
            .iter()
            .find(|choice| {
                if self.case_sensitive {
                    **choice == candidate
                } else {
                    choice.eq_ignore_ascii_case(&candidate)
                }
            })
            .map(|choice| Value::Str(choice.clone()))
            .ok_or_else(|| {
                reject(
                    parameter,
                    self,
                    &value,
                    format!("should be one of {}", self.choices.iter().join(", ")),
                )
            })
    }

    fn render(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Truthiness of the raw value. Used by flag options, whose value is never
/// rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl ParamType for Boolean {
    fn name(&self) -> &str {
        "boolean"
    }

    fn convert(&self, value: Value, _parameter: &Parameter, _context: &Context) -> Result<Value> {
        Ok(Value::Bool(value.is_truthy()))
    }

    fn render(&self, value: &Value) -> String {
        value.is_truthy().to_string()
    }
}

/// Pick a type for a parameter declared with a default but no explicit type.
pub(crate) fn infer_from_default(default: &Value) -> Arc<dyn ParamType> {
    match default {
        Value::Int(_) => Arc::new(Integer),
        Value::Float(_) => Arc::new(Float::new()),
        Value::List(items) => items
            .first()
            .map_or_else(|| Arc::new(Text) as Arc<dyn ParamType>, infer_from_default),
        Value::Bool(_) | Value::Str(_) => Arc::new(Text),
    }
}
