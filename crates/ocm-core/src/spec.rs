//! Command schemas
//!
//! A [`CommandSpec`] is the fixed description of one external program: its
//! executable, optional leading sub-command tokens and the ordered list of
//! declared parameters. It is built once, validated as a whole, and then
//! shared by every [`Command`] bound against it.

use std::sync::Arc;

use itertools::Itertools;

use crate::{context::Context, parameter::DefaultValue, Command, Error, Input, Parameter, Result};

/// Validated schema of an external command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    exe: String,
    sub_commands: Vec<String>,
    parameters: Vec<Parameter>,
}

impl CommandSpec {
    /// Start declaring a command that runs `exe`.
    pub fn builder(exe: impl Into<String>) -> CommandSpecBuilder {
        CommandSpecBuilder::new(exe)
    }

    /// Name used in diagnostics; defaults to the executable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exe(&self) -> &str {
        &self.exe
    }

    /// Fixed tokens emitted right after the executable.
    #[must_use]
    pub fn sub_commands(&self) -> &[String] {
        &self.sub_commands
    }

    /// All parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn options(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.is_option())
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.is_argument())
    }

    /// Options in declaration order, then arguments in declaration order.
    ///
    /// This is both the binding order and the rendering order. A callback can
    /// only read parameters that come earlier in it.
    pub fn resolution_order(&self) -> impl Iterator<Item = &Parameter> {
        self.options().chain(self.arguments())
    }

    /// Bind caller input against this schema.
    pub fn bind(self: &Arc<Self>, input: Input) -> Result<Command> {
        Command::new(Arc::clone(self), input)
    }
}

/// Builder for [`CommandSpec`]; all checks run in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CommandSpecBuilder {
    name: Option<String>,
    exe: String,
    sub_commands: Vec<String>,
    parameters: Vec<Parameter>,
}

impl CommandSpecBuilder {
    fn new(exe: impl Into<String>) -> Self {
        Self {
            name: None,
            exe: exe.into(),
            sub_commands: Vec::new(),
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a fixed token after the executable (`git` + `commit`).
    #[must_use]
    pub fn sub_command(mut self, token: impl Into<String>) -> Self {
        self.sub_commands.push(token.into());
        self
    }

    /// Declare a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Declare a plain text option; shorthand for
    /// `.parameter(Parameter::option(key, name))`.
    #[must_use]
    pub fn option(self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameter(Parameter::option(key, name))
    }

    /// Declare a plain text argument.
    #[must_use]
    pub fn argument(self, name: impl Into<String>) -> Self {
        self.parameter(Parameter::argument(name))
    }

    /// Validate the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDeclaration`] if:
    /// - the executable, a sub-command or a parameter name is empty
    /// - an option key is empty or contains whitespace
    /// - a flag was given a type other than boolean
    /// - two parameters share a name
    /// - more than one argument accepts multiple values
    /// - a fixed default does not fit its parameter
    pub fn build(self) -> Result<CommandSpec> {
        if self.exe.trim().is_empty() {
            return Err(Error::invalid_declaration("executable name cannot be empty"));
        }

        let name = self.name.unwrap_or_else(|| self.exe.clone());

        if self.sub_commands.iter().any(|token| token.is_empty()) {
            return Err(Error::invalid_declaration(format!(
                "{name}: sub-command tokens cannot be empty"
            )));
        }

        self.parameters
            .iter()
            .try_for_each(|p| validate_parameter(&name, p))?;

        let duplicates: Vec<&str> = self
            .parameters
            .iter()
            .map(Parameter::name)
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            return Err(Error::invalid_declaration(format!(
                "{name}: duplicate parameter name(s) {}",
                duplicates.join(", ")
            )));
        }

        let multi_arguments: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.is_argument() && p.is_multiple())
            .map(Parameter::name)
            .collect();
        if multi_arguments.len() > 1 {
            return Err(Error::invalid_declaration(format!(
                "{name}: arguments {} all accept multiple values, their tokens cannot be told apart",
                multi_arguments.join(", ")
            )));
        }

        tracing::debug!(
            command = %name,
            exe = %self.exe,
            parameters = self.parameters.len(),
            "Declared command"
        );

        Ok(CommandSpec {
            name,
            exe: self.exe,
            sub_commands: self.sub_commands,
            parameters: self.parameters,
        })
    }
}

fn validate_parameter(command: &str, parameter: &Parameter) -> Result<()> {
    if parameter.name().is_empty() {
        return Err(Error::invalid_declaration(format!(
            "{command}: parameter name cannot be empty"
        )));
    }

    if let Some(key) = parameter.key() {
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(Error::invalid_declaration(format!(
                "{command}: invalid key {key:?} for option {}",
                parameter.name()
            )));
        }
    }

    if parameter.is_flag() && parameter.param_type_ref().name() != "boolean" {
        return Err(Error::invalid_declaration(format!(
            "{command}: flag {} cannot take type {}",
            parameter.name(),
            parameter.param_type_ref().name()
        )));
    }

    // Lazy defaults are only checked when bound.
    let Some(DefaultValue::Static(default)) = parameter.default_value_ref() else {
        return Ok(());
    };

    if default.is_list() && !parameter.is_multiple() {
        return Err(Error::invalid_declaration(format!(
            "{command}: default for {} is a list but the parameter takes a single value",
            parameter.name()
        )));
    }

    let context = Context::default();
    default
        .clone()
        .into_elements()
        .into_iter()
        .try_for_each(|element| {
            parameter
                .param_type_ref()
                .convert(element, parameter, &context)
                .map(|_| ())
        })
        .map_err(|e| {
            Error::invalid_declaration(format!(
                "{command}: default for {} is invalid: {e}",
                parameter.name()
            ))
        })
}
