//! Command trait, registry, and dispatch logic.
//!
//! Commands are looked up by exact name for dispatch and by name prefix for
//! completion. Several commands may share a name as long as they differ in
//! arity; the registry picks the overload whose arity accepts the values.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use simterm_types::error::{BoxError, Result, TermError};

/// Destination for command output.
pub trait MessageSink {
    /// Emit one output line attributed to `source`.
    fn log(&mut self, source: &str, message: &str);

    /// Ask the hosting terminal to end the session once the command returns.
    fn request_exit(&mut self) {}
}

/// How many values a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly this many values. `Fixed(0)` takes none.
    Fixed(usize),
    /// Any number of values, including none.
    Varargs,
}

impl Arity {
    /// Whether `count` values satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Varargs => true,
        }
    }

    /// Fixed-arity commands are "determined"; varargs ones are not.
    pub fn is_determined(self) -> bool {
        matches!(self, Arity::Fixed(_))
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{n} params"),
            Arity::Varargs => f.write_str("varargs"),
        }
    }
}

/// Arguments for one command invocation.
pub struct Params<'a> {
    values: Vec<String>,
    logger: &'a mut dyn MessageSink,
}

impl<'a> Params<'a> {
    pub fn new(values: Vec<String>, logger: &'a mut dyn MessageSink) -> Self {
        Self { values, logger }
    }

    /// Values following the command name.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The value at `index`, if present.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Emit one output line through the sink.
    pub fn log(&mut self, source: &str, message: &str) {
        self.logger.log(source, message);
    }

    /// Ask the terminal to exit after this command.
    pub fn request_exit(&mut self) {
        self.logger.request_exit();
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// Accepted value count.
    fn arity(&self) -> Arity;

    /// Run the command. `Ok(false)` reports an ordinary failure.
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError>;

    /// Whether these values can be passed to this command.
    fn validate(&self, values: &[String]) -> bool {
        self.arity().accepts(values.len())
    }

    /// One-line summary shown in completion lists, e.g. `ls (1 params)`.
    fn summary(&self) -> String {
        format!("{} ({})", self.name(), self.arity())
    }
}

/// A command backed by a closure.
pub struct FnCommand<F> {
    name: String,
    arity: Arity,
    handler: F,
}

impl<F> FnCommand<F>
where
    F: Fn(&mut Params<'_>) -> std::result::Result<bool, BoxError>,
{
    pub fn new(name: &str, arity: Arity, handler: F) -> Self {
        Self {
            name: name.to_string(),
            arity,
            handler,
        }
    }
}

impl<F> Command for FnCommand<F>
where
    F: Fn(&mut Params<'_>) -> std::result::Result<bool, BoxError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        (self.handler)(params)
    }
}

/// Registry of available commands with completion and dispatch.
///
/// Commands live in registration order; `by_name` maps each full name to the
/// indices of its overloads. Prefix queries are range scans over the sorted
/// names, so registering a command costs one map insertion regardless of
/// name length.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    by_name: BTreeMap<String, Vec<usize>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Register a command. Existing commands with the same name are kept as
    /// overloads.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let name = cmd.name();
        if name.is_empty() {
            return Err(TermError::InvalidCommand(
                "command name must not be empty".to_string(),
            ));
        }
        if name.contains(' ') {
            return Err(TermError::InvalidCommand(format!(
                "command name must not contain spaces: {name:?}"
            )));
        }
        log::debug!("Registering command {}", cmd.summary());
        let id = self.commands.len();
        self.by_name.entry(name.to_string()).or_default().push(id);
        self.commands.push(cmd);
        Ok(())
    }

    /// Register a closure as a command.
    pub fn register_fn<F>(&mut self, name: &str, arity: Arity, handler: F) -> Result<()>
    where
        F: Fn(&mut Params<'_>) -> std::result::Result<bool, BoxError> + 'static,
    {
        self.register(Box::new(FnCommand::new(name, arity, handler)))
    }

    /// Number of registered commands, counting each overload.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Up to `limit` commands whose name starts with `partial`, in
    /// registration order. The empty prefix matches every command.
    pub fn complete(&self, partial: &str, limit: usize) -> Vec<&dyn Command> {
        let mut ids: Vec<usize> = self
            .by_name
            .range::<str, _>((Bound::Included(partial), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(partial))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.into_iter()
            .take(limit)
            .map(|id| self.commands[id].as_ref())
            .collect()
    }

    /// Completion summaries for `partial`, ready to print.
    pub fn predictions(&self, partial: &str, limit: usize) -> Vec<String> {
        self.complete(partial, limit)
            .into_iter()
            .map(|cmd| cmd.summary())
            .collect()
    }

    /// Resolve `name` against the values in `params` and run the chosen
    /// command.
    ///
    /// When several overloads accept the values, a fixed-arity one wins over
    /// varargs, and the earliest registered wins among equals.
    pub fn dispatch(&self, name: &str, params: &mut Params<'_>) -> Result<()> {
        let ids = self
            .by_name
            .get(name)
            .ok_or_else(|| TermError::CommandNotFound(name.to_string()))?;

        let named: Vec<&dyn Command> = ids
            .iter()
            .map(|&id| self.commands[id].as_ref())
            .filter(|cmd| cmd.name() == name)
            .collect();
        if named.is_empty() {
            return Err(TermError::CommandNotFound(name.to_string()));
        }

        let candidates: Vec<&dyn Command> = named
            .into_iter()
            .filter(|cmd| cmd.validate(params.values()))
            .collect();
        let Some(chosen) = resolve_overload(&candidates) else {
            return Err(TermError::ArityMismatch {
                name: name.to_string(),
                given: params.values().len(),
            });
        };

        log::debug!(
            "Dispatching {} with {} values",
            chosen.summary(),
            params.values().len()
        );
        match chosen.execute(params) {
            Ok(true) => Ok(()),
            Ok(false) => Err(TermError::CommandExecutionFailed {
                name: name.to_string(),
                cause: None,
            }),
            Err(cause) => Err(TermError::CommandExecutionFailed {
                name: name.to_string(),
                cause: Some(cause),
            }),
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick one command out of the overloads that accept the values.
fn resolve_overload<'c>(candidates: &[&'c dyn Command]) -> Option<&'c dyn Command> {
    candidates
        .iter()
        .find(|cmd| cmd.arity().is_determined())
        .or_else(|| candidates.first())
        .copied()
}

/// Split a submitted line into the command name and its values.
///
/// Splits on every single space with no quoting, so `"cd  x"` yields the
/// values `["", "x"]`.
pub fn split_command_line(line: &str) -> (&str, Vec<String>) {
    let mut parts = line.split(' ');
    let name = parts.next().unwrap_or_default();
    let values = parts.map(str::to_string).collect();
    (name, values)
}
