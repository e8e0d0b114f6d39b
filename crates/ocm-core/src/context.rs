//! Caller input and the resolution context
//!
//! [`Input`] is what the caller hands to a command: parameter name to raw
//! value. [`Context`] is built while a command binds its parameters; a
//! parameter's type and callback see every raw input but only the values
//! bound *before* it (options in declaration order, then arguments in
//! declaration order).

use im::{HashMap, Vector};

use crate::{Error, Result, Value};

/// Raw values keyed by parameter name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    entries: Vec<(String, Value)>,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply `value` for `name`, replacing an earlier value.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Supply `value` for `name` when present; `None` leaves it unsupplied.
    #[must_use]
    pub fn set_opt<V: Into<Value>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Input {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |input, (name, value)| input.set(name, value))
    }
}

impl TryFrom<serde_json::Value> for Input {
    type Error = Error;

    /// Build input from a JSON object. `null` members count as unsupplied.
    fn try_from(json: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(members) = json else {
            return Err(Error::invalid_value("input", "expected a JSON object"));
        };

        members
            .into_iter()
            .try_fold(Self::new(), |input, (name, raw)| {
                let value = Value::from_json(&name, raw)?;
                Ok(input.set_opt(name, value))
            })
    }
}

/// Values visible to parameter types and callbacks during one binding pass.
#[derive(Debug, Clone, Default)]
pub struct Context {
    raw: HashMap<String, Value>,
    bound: Vector<(String, Option<Value>)>,
}

impl Context {
    pub(crate) fn from_input(input: &Input) -> Self {
        Self {
            raw: input
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            bound: Vector::new(),
        }
    }

    pub(crate) fn bind(&mut self, name: &str, value: Option<Value>) {
        self.bound.push_back((name.to_string(), value));
    }

    /// Bound value of an earlier parameter; `None` if absent or not yet bound.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bound
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Whether `name` has already been resolved in this pass.
    #[must_use]
    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.iter().any(|(n, _)| n == name)
    }

    /// Raw caller input for any parameter, bound or not.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// Bound entries in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.bound
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
