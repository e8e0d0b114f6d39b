//! Bound command instances
//!
//! A [`Command`] is a [`CommandSpec`] plus one validated set of values.
//! Binding happens entirely in [`Command::new`]; an instance either exists
//! fully validated or not at all.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    context::Context, result::Executor, CommandSpec, Error, ExecutionResult, Input, Parameter,
    Result, Value,
};

/// A command with validated values, ready to render or run.
#[derive(Debug, Clone)]
pub struct Command {
    spec: Arc<CommandSpec>,
    context: Context,
}

impl Command {
    /// Bind `input` against `spec`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownParameter`] if `input` names an undeclared parameter;
    ///   checked before anything is resolved
    /// - [`Error::MissingRequiredParameter`], [`Error::TypeConversion`],
    ///   [`Error::UnexpectedMultipleValues`] or a callback's error from the
    ///   first parameter that fails
    pub fn new(spec: Arc<CommandSpec>, input: Input) -> Result<Self> {
        let unknown: Vec<String> = input
            .names()
            .filter(|name| spec.parameter(name).is_none())
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownParameter {
                command: spec.name().to_string(),
                names: unknown,
            });
        }

        let context = spec.resolution_order().try_fold(
            Context::from_input(&input),
            |mut context, parameter| {
                let value = bind_parameter(parameter, input.get(parameter.name()).cloned(), &context)?;
                tracing::debug!(
                    command = %spec.name(),
                    parameter = %parameter.name(),
                    value = ?value,
                    "Bound parameter"
                );
                context.bind(parameter.name(), value);
                Ok::<_, Error>(context)
            },
        )?;

        Ok(Self { spec, context })
    }

    #[must_use]
    pub fn spec(&self) -> &Arc<CommandSpec> {
        &self.spec
    }

    /// Bound values in resolution order.
    #[must_use]
    pub const fn values(&self) -> &Context {
        &self.context
    }

    /// Bound value of `name`; `None` when absent or undeclared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.context.get(name)
    }

    /// Bound value of a declared parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`] if `name` is not declared.
    pub fn value(&self, name: &str) -> Result<Option<&Value>> {
        if self.spec.parameter(name).is_none() {
            return Err(Error::UnknownParameter {
                command: self.spec.name().to_string(),
                names: vec![name.to_string()],
            });
        }
        Ok(self.context.get(name))
    }

    /// Executable to run.
    #[must_use]
    pub fn program(&self) -> &str {
        self.spec.exe()
    }

    /// Tokens after the executable: sub-commands, then option tokens, then
    /// argument tokens, each group in declaration order.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.spec
            .sub_commands()
            .iter()
            .cloned()
            .chain(
                self.spec
                    .resolution_order()
                    .flat_map(|parameter| parameter.tokens(self.context.get(parameter.name()))),
            )
            .collect()
    }

    /// Full token sequence, executable first.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program().to_string())
            .chain(self.args())
            .collect()
    }

    /// Run once through `executor`.
    ///
    /// A non-zero exit status is reported in the result, not as an error.
    pub fn run_with<E: Executor + ?Sized>(&self, executor: &E) -> std::result::Result<ExecutionResult, E::Error> {
        let args = self.args();
        tracing::debug!(command = %self, "Handing command to executor");
        executor.execute(self.program(), &args)
    }

    /// Run once through `executor`, treating a non-zero exit status as
    /// [`Error::CommandFailed`].
    pub fn run_checked_with<E>(&self, executor: &E) -> std::result::Result<ExecutionResult, E::Error>
    where
        E: Executor + ?Sized,
        E::Error: From<Error>,
    {
        let result = self.run_with(executor)?;
        if result.success() {
            Ok(result)
        } else {
            tracing::warn!(
                command = %self,
                exit_status = result.exit_status,
                "Command failed"
            );
            Err(Error::CommandFailed {
                command: self.to_string(),
                exit_status: result.exit_status,
                stderr: result.stderr,
            }
            .into())
        }
    }
}

/// Resolve one parameter, fanning multi-value input out element by element.
fn bind_parameter(parameter: &Parameter, raw: Option<Value>, context: &Context) -> Result<Option<Value>> {
    if !parameter.is_multiple() {
        if raw.as_ref().is_some_and(Value::is_list) {
            return Err(Error::unexpected_multiple(parameter.name()));
        }
        return parameter.process_value(raw, context);
    }

    // An empty list counts as absent, so the default still applies.
    let elements = raw
        .filter(|value| !matches!(value, Value::List(items) if items.is_empty()))
        .or_else(|| parameter.get_default())
        .map(Value::into_elements)
        .unwrap_or_default();

    if elements.is_empty() {
        if parameter.is_required() {
            return Err(Error::missing_required(parameter.name()));
        }
        return Ok(Some(Value::List(Vec::new())));
    }

    elements
        .into_iter()
        .map(|element| {
            if element.is_list() {
                Err(Error::unexpected_multiple(parameter.name()))
            } else {
                parameter.process_value(Some(element), context)
            }
        })
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>>>()
        .map(|values| Some(Value::List(values)))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.argv() == other.argv()
    }
}

impl Eq for Command {}

impl Hash for Command {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.argv().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param_type::{Choice, Integer};

    fn head() -> Result<Arc<CommandSpec>> {
        CommandSpec::builder("head")
            .parameter(Parameter::option("-n", "number").param_type(Integer))
            .parameter(Parameter::argument("file"))
            .build()
            .map(Arc::new)
    }

    #[test]
    fn test_unknown_input_rejected_before_resolution() -> Result<()> {
        let spec = CommandSpec::builder("ls")
            .parameter(Parameter::argument("directory").required())
            .build()
            .map(Arc::new)?;
        let err = spec.bind(Input::new().set("colour", "auto"));
        assert_eq!(
            err,
            Err(Error::UnknownParameter {
                command: "ls".to_string(),
                names: vec!["colour".to_string()],
            })
        );
        Ok(())
    }

    #[test]
    fn test_head_argv() -> Result<()> {
        let cmd = head()?.bind(Input::new().set("number", 10).set("file", "ocm.py"))?;
        assert_eq!(cmd.argv(), vec!["head", "-n", "10", "ocm.py"]);
        assert_eq!(cmd.get("number"), Some(&Value::Int(10)));
        Ok(())
    }

    #[test]
    fn test_head_without_number() -> Result<()> {
        let cmd = head()?.bind(Input::new().set("file", "x"))?;
        assert_eq!(cmd.argv(), vec!["head", "x"]);
        assert_eq!(cmd.get("number"), None);
        Ok(())
    }

    #[test]
    fn test_value_rejects_undeclared_name() -> Result<()> {
        let cmd = head()?.bind(Input::new().set("file", "x"))?;
        assert_eq!(cmd.value("file")?, Some(&Value::from("x")));
        assert_eq!(cmd.value("number")?, None);
        assert!(cmd.value("bogus").is_err());
        Ok(())
    }

    #[test]
    fn test_scalar_fans_out_for_multiple() -> Result<()> {
        let spec = CommandSpec::builder("grep")
            .parameter(Parameter::option("-e", "pattern").multiple())
            .build()
            .map(Arc::new)?;
        let cmd = spec.bind(Input::new().set("pattern", "foo"))?;
        assert_eq!(cmd.get("pattern"), Some(&Value::from(["foo"])));
        assert_eq!(cmd.args(), vec!["-e", "foo"]);
        Ok(())
    }

    #[test]
    fn test_absent_multiple_binds_empty_list() -> Result<()> {
        let spec = CommandSpec::builder("grep")
            .parameter(Parameter::option("-e", "pattern").multiple())
            .build()
            .map(Arc::new)?;
        let cmd = spec.bind(Input::new())?;
        assert_eq!(cmd.get("pattern"), Some(&Value::List(Vec::new())));
        assert_eq!(cmd.argv(), vec!["grep"]);
        Ok(())
    }

    #[test]
    fn test_empty_list_for_required_multiple_is_missing() -> Result<()> {
        let spec = CommandSpec::builder("cat")
            .parameter(Parameter::argument("files").multiple().required())
            .build()
            .map(Arc::new)?;
        let err = spec.bind(Input::new().set("files", Value::List(Vec::new())));
        assert_eq!(err, Err(Error::missing_required("files")));
        Ok(())
    }

    #[test]
    fn test_empty_list_falls_back_to_default() -> Result<()> {
        let required = CommandSpec::builder("cat")
            .parameter(Parameter::argument("files").multiple().required().default_value(["a"]))
            .build()
            .map(Arc::new)?;
        let cmd = required.bind(Input::new().set("files", Value::List(Vec::new())))?;
        assert_eq!(cmd.argv(), vec!["cat", "a"]);

        let optional = CommandSpec::builder("cat")
            .parameter(Parameter::argument("files").multiple().default_value(["a", "b"]))
            .build()
            .map(Arc::new)?;
        let cmd = optional.bind(Input::new().set("files", Value::List(Vec::new())))?;
        assert_eq!(cmd.argv(), vec!["cat", "a", "b"]);
        Ok(())
    }

    #[test]
    fn test_nested_list_rejected() -> Result<()> {
        let spec = CommandSpec::builder("cat")
            .parameter(Parameter::argument("files").multiple())
            .build()
            .map(Arc::new)?;
        let nested = Value::List(vec![Value::from(["a", "b"])]);
        let err = spec.bind(Input::new().set("files", nested));
        assert_eq!(err, Err(Error::unexpected_multiple("files")));
        Ok(())
    }

    #[test]
    fn test_each_element_converted_in_order() -> Result<()> {
        let spec = CommandSpec::builder("sum")
            .parameter(Parameter::argument("numbers").param_type(Integer).multiple())
            .build()
            .map(Arc::new)?;
        let cmd = spec.bind(Input::new().set("numbers", ["3", "1", "2"]))?;
        assert_eq!(cmd.get("numbers"), Some(&Value::from([3, 1, 2])));

        let err = spec.bind(Input::new().set("numbers", ["3", "x"]));
        assert!(matches!(err, Err(Error::TypeConversion { ref value, .. }) if value == "x"));
        Ok(())
    }

    #[test]
    fn test_callback_none_drops_element() -> Result<()> {
        let spec = CommandSpec::builder("echo")
            .parameter(
                Parameter::argument("words")
                    .multiple()
                    .callback(|value, _, _| Ok(value.filter(|v| v.as_str() != Some("skip")))),
            )
            .build()
            .map(Arc::new)?;
        let cmd = spec.bind(Input::new().set("words", ["a", "skip", "b"]))?;
        assert_eq!(cmd.args(), vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_callback_reads_earlier_bound_value() -> Result<()> {
        let spec = CommandSpec::builder("report")
            .parameter(Parameter::argument("end").param_type(Integer).callback(
                |value, parameter, context| {
                    let start = context.get("start").and_then(Value::as_int);
                    match (start, value.as_ref().and_then(Value::as_int)) {
                        (Some(s), Some(e)) if e <= s => Err(Error::invalid_value(
                            parameter.name(),
                            "end must come after start",
                        )),
                        _ => Ok(value),
                    }
                },
            ))
            .parameter(Parameter::option("--start", "start").param_type(Integer))
            .build()
            .map(Arc::new)?;

        let ok = spec.bind(Input::new().set("start", 1).set("end", 5))?;
        assert_eq!(ok.argv(), vec!["report", "--start", "1", "5"]);

        let err = spec.bind(Input::new().set("start", 5).set("end", 1));
        assert_eq!(
            err,
            Err(Error::invalid_value("end", "end must come after start"))
        );
        Ok(())
    }

    #[test]
    fn test_later_parameter_invisible_to_earlier_callback() -> Result<()> {
        let spec = CommandSpec::builder("x")
            .parameter(Parameter::option("-a", "a").callback(|value, _, context| {
                assert!(context.get("b").is_none());
                assert_eq!(context.raw("b"), Some(&Value::from("raw-b")));
                Ok(value)
            }))
            .parameter(Parameter::option("-b", "b"))
            .build()
            .map(Arc::new)?;
        spec.bind(Input::new().set("a", "1").set("b", "raw-b"))?;
        Ok(())
    }

    #[test]
    fn test_sub_commands_follow_exe() -> Result<()> {
        let spec = CommandSpec::builder("git")
            .sub_command("commit")
            .parameter(Parameter::option("-m", "message").required())
            .parameter(Parameter::option("--amend", "amend").flag())
            .build()
            .map(Arc::new)?;
        let cmd = spec.bind(Input::new().set("message", "fix").set("amend", true))?;
        assert_eq!(cmd.argv(), vec!["git", "commit", "-m", "fix", "--amend"]);
        assert_eq!(cmd.to_string(), "git commit -m fix --amend");
        Ok(())
    }

    #[test]
    fn test_choice_error_carries_parameter() -> Result<()> {
        let spec = CommandSpec::builder("sort")
            .parameter(Parameter::option("--order", "order").param_type(Choice::new(["asc", "desc"])))
            .build()
            .map(Arc::new)?;
        let err = spec.bind(Input::new().set("order", "sideways"));
        assert!(matches!(err, Err(Error::TypeConversion { ref parameter, .. }) if parameter == "order"));
        Ok(())
    }

    #[test]
    fn test_equality_and_hash_follow_argv() -> Result<()> {
        use std::collections::HashSet;

        let spec = head()?;
        let a = spec.bind(Input::new().set("number", 10).set("file", "x"))?;
        let b = spec.bind(Input::new().set("number", "10").set("file", "x"))?;
        let c = spec.bind(Input::new().set("file", "x"))?;
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<Command> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        Ok(())
    }

    #[test]
    fn test_run_with_calls_executor_once_with_args() -> Result<()> {
        use std::cell::RefCell;

        let calls = RefCell::new(Vec::new());
        let executor = |program: &str, args: &[String]| -> Result<ExecutionResult> {
            calls.borrow_mut().push((program.to_string(), args.to_vec()));
            Ok(ExecutionResult::new("out\n", "", 0))
        };

        let cmd = head()?.bind(Input::new().set("number", 3).set("file", "f"))?;
        let first = cmd.run_with(&executor)?;
        let second = cmd.run_with(&executor)?;

        assert_eq!(first.stdout, "out\n");
        assert_eq!(first, second);
        assert_eq!(
            calls.into_inner(),
            vec![
                ("head".to_string(), vec!["-n".to_string(), "3".to_string(), "f".to_string()]),
                ("head".to_string(), vec!["-n".to_string(), "3".to_string(), "f".to_string()]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_non_zero_exit_is_not_an_error() -> Result<()> {
        let executor = |_: &str, _: &[String]| -> Result<ExecutionResult> {
            Ok(ExecutionResult::new("", "boom", 2))
        };
        let cmd = head()?.bind(Input::new().set("file", "f"))?;
        let result = cmd.run_with(&executor)?;
        assert_eq!(result.exit_status, 2);
        assert!(!result.success());

        let err = cmd.run_checked_with(&executor);
        assert_eq!(
            err,
            Err(Error::CommandFailed {
                command: "head f".to_string(),
                exit_status: 2,
                stderr: "boom".to_string(),
            })
        );
        Ok(())
    }

    #[test]
    fn test_executor_failure_propagates() -> Result<()> {
        let executor = |program: &str, _: &[String]| -> Result<ExecutionResult> {
            Err(Error::Execution(format!("{program}: sandbox refused to start it")))
        };
        let cmd = head()?.bind(Input::new().set("file", "f"))?;

        let err = cmd.run_with(&executor);
        assert_eq!(
            err,
            Err(Error::Execution("head: sandbox refused to start it".to_string()))
        );
        assert!(err.is_err_and(|e| !e.is_validation()));

        let checked = cmd.run_checked_with(&executor);
        assert!(matches!(checked, Err(Error::Execution(_))));
        Ok(())
    }
}
