//! Line editor and command interpreter.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name, possibly several times with
//! different arities. The line editor turns key events into edits, history
//! recall, completion requests and submitted command lines, which the
//! registry resolves and executes.

mod buffer;
pub mod commands;
mod editor;
mod history;
mod interpreter;

#[cfg(test)]
pub(crate) mod test_utils;

/// Editable input line with a cursor.
pub use buffer::InputBuffer;
/// Register the example commands (ls, cd, pwd, echo, exit) into a registry.
pub use commands::register_builtins;
/// Working directory shared by the file commands.
pub use commands::SharedCwd;
/// Handle returned when an exit listener is added.
pub use editor::ListenerId;
/// Key-driven input state machine that owns the prompt line.
pub use editor::LineEditor;
/// Split a message into display-width chunks.
pub use editor::wrap_message;
/// Fixed-capacity command history.
pub use history::History;
/// Accepted argument count of a command.
pub use interpreter::Arity;
/// A single executable command trait.
pub use interpreter::Command;
/// Registry of available commands with completion and dispatch.
pub use interpreter::CommandRegistry;
/// Closure-backed command.
pub use interpreter::FnCommand;
/// Where commands write their output.
pub use interpreter::MessageSink;
/// Per-dispatch arguments handed to a command.
pub use interpreter::Params;
/// Split a submitted line into command name and values.
pub use interpreter::split_command_line;
