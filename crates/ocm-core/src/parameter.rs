//! Parameter declarations
//!
//! A [`Parameter`] is either a keyed option (`-n 10`, or a bare flag such as
//! `-l`) or a positional argument. Both share one value pipeline:
//! default substitution, the required check, type conversion and an
//! optional callback. They differ only in how a bound value is rendered.

use std::{fmt, sync::Arc};

use crate::{
    context::Context,
    param_type::{self, Boolean, ParamType, Text},
    Error, Result, Value,
};

/// Post-conversion hook: `(value, parameter, context) -> value`.
///
/// Receives `None` for an absent optional value and may pass it through.
pub type Callback =
    Arc<dyn Fn(Option<Value>, &Parameter, &Context) -> Result<Option<Value>> + Send + Sync>;

/// Value used when the caller supplies nothing.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value
    Static(Value),
    /// Computed each time a command is bound
    Lazy(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produce the default.
    #[must_use]
    pub fn get(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Lazy(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Option or argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Keyed parameter rendered after its key token
    Option {
        /// Token emitted before the value, e.g. `-n` or `--name`
        key: String,
        /// Carries no value; only the key is emitted when truthy
        is_flag: bool,
    },
    /// Positional parameter rendered as bare value tokens
    Argument,
}

/// A declared command-line parameter.
#[derive(Clone)]
pub struct Parameter {
    name: String,
    kind: ParamKind,
    default: Option<DefaultValue>,
    param_type: Arc<dyn ParamType>,
    explicit_type: bool,
    required: bool,
    callback: Option<Callback>,
    multiple: bool,
    help: Option<String>,
}

impl Parameter {
    fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            param_type: Arc::new(Text),
            explicit_type: false,
            required: false,
            callback: None,
            multiple: false,
            help: None,
        }
    }

    /// Declare a keyed option such as `Parameter::option("-n", "number")`.
    pub fn option(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            name,
            ParamKind::Option {
                key: key.into(),
                is_flag: false,
            },
        )
    }

    /// Declare a positional argument.
    pub fn argument(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Argument)
    }

    /// Turn an option into a flag. Has no effect on arguments.
    ///
    /// Flags convert with [`Boolean`]; an explicitly set type is kept so
    /// that `build()` can reject it.
    #[must_use]
    pub fn flag(mut self) -> Self {
        if let ParamKind::Option { is_flag, .. } = &mut self.kind {
            *is_flag = true;
            if !self.explicit_type {
                self.param_type = Arc::new(Boolean);
                self.explicit_type = true;
            }
        }
        self
    }

    /// Set a fixed default. Without an explicit type, the type is inferred
    /// from the default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !self.explicit_type {
            self.param_type = param_type::infer_from_default(&value);
        }
        self.default = Some(DefaultValue::Static(value));
        self
    }

    /// Set a default computed at bind time.
    #[must_use]
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Lazy(Arc::new(f)));
        self
    }

    /// Set the conversion type.
    #[must_use]
    pub fn param_type(self, ty: impl ParamType + 'static) -> Self {
        self.shared_type(Arc::new(ty))
    }

    /// Set a conversion type shared with other declarations.
    #[must_use]
    pub fn shared_type(mut self, ty: Arc<dyn ParamType>) -> Self {
        self.param_type = ty;
        self.explicit_type = true;
        self
    }

    /// Fail binding when neither input nor default is available.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Run `f` on the converted value before it is bound.
    #[must_use]
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<Value>, &Self, &Context) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(f));
        self
    }

    /// Accept an ordered list of values, each converted on its own.
    #[must_use]
    pub const fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Attach a description, shown by [`Parameter::help_text`].
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// Key token of an option.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            ParamKind::Option { key, .. } => Some(key),
            ParamKind::Argument => None,
        }
    }

    #[must_use]
    pub const fn is_option(&self) -> bool {
        matches!(self.kind, ParamKind::Option { .. })
    }

    #[must_use]
    pub const fn is_argument(&self) -> bool {
        matches!(self.kind, ParamKind::Argument)
    }

    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self.kind, ParamKind::Option { is_flag: true, .. })
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    #[must_use]
    pub fn param_type_ref(&self) -> &dyn ParamType {
        self.param_type.as_ref()
    }

    #[must_use]
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    #[must_use]
    pub const fn default_value_ref(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Produce the default, evaluating a lazy one.
    #[must_use]
    pub fn get_default(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::get)
    }

    /// Resolve one already-separated value.
    ///
    /// Substitutes the default for absent input, enforces `required`,
    /// converts through the parameter's type and finally applies the
    /// callback. Lists are rejected here; multi-value parameters are fanned
    /// out by the caller, one element at a time.
    pub fn process_value(&self, value: Option<Value>, context: &Context) -> Result<Option<Value>> {
        let converted = match value.or_else(|| self.get_default()) {
            Some(v) if v.is_list() => return Err(Error::unexpected_multiple(&self.name)),
            Some(v) => Some(self.param_type.convert(v, self, context)?),
            None if self.required => return Err(Error::missing_required(&self.name)),
            None => None,
        };

        match &self.callback {
            Some(callback) => callback(converted, self, context),
            None => Ok(converted),
        }
    }

    /// Render a bound value into command-line tokens.
    ///
    /// Absent values render nothing. A flag emits its key once per truthy
    /// element and never a value; a valued option emits `key value` per
    /// element; an argument emits one token per element.
    #[must_use]
    pub fn tokens(&self, bound: Option<&Value>) -> Vec<String> {
        let Some(value) = bound else {
            return Vec::new();
        };

        let elements: Vec<&Value> = match value {
            Value::List(items) if self.multiple => items.iter().collect(),
            other => vec![other],
        };

        match &self.kind {
            ParamKind::Option { key, is_flag: true } => elements
                .into_iter()
                .filter(|element| element.is_truthy())
                .map(|_| key.clone())
                .collect(),
            ParamKind::Option {
                key,
                is_flag: false,
            } => elements
                .into_iter()
                .flat_map(|element| [key.clone(), self.param_type.render(element)])
                .collect(),
            ParamKind::Argument => elements
                .into_iter()
                .map(|element| self.param_type.render(element))
                .collect(),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("param_type", &self.param_type)
            .field("required", &self.required)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .field("multiple", &self.multiple)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}
