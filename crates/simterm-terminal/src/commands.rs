//! Example commands for the terminal.
//!
//! The file commands share one working directory that belongs to the
//! session rather than the process.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use simterm_types::error::{BoxError, Result};

use crate::interpreter::{Arity, Command, CommandRegistry, Params};

/// Session working directory shared between commands.
pub type SharedCwd = Rc<RefCell<PathBuf>>;

/// Register `ls` (with and without a path), `cd`, `pwd`, `echo` and `exit`.
pub fn register_builtins(reg: &mut CommandRegistry, cwd: &SharedCwd) -> Result<()> {
    reg.register(Box::new(LsCmd {
        cwd: Rc::clone(cwd),
    }))?;
    reg.register(Box::new(LsPathCmd {
        cwd: Rc::clone(cwd),
    }))?;
    reg.register(Box::new(CdCmd {
        cwd: Rc::clone(cwd),
    }))?;
    reg.register(Box::new(PwdCmd {
        cwd: Rc::clone(cwd),
    }))?;
    reg.register(Box::new(EchoCmd))?;
    reg.register(Box::new(ExitCmd))?;
    Ok(())
}

/// Resolve `arg` against `cwd`. Absolute paths are taken as-is.
fn resolve_path(cwd: &Path, arg: &str) -> PathBuf {
    let path = Path::new(arg);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Log the entries of `dir`, sorted by name, directories suffixed with `/`.
fn list_dir(dir: &Path, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    if names.is_empty() {
        params.log("ls", "(empty)");
        return Ok(true);
    }
    names.sort();
    for name in &names {
        params.log("ls", name);
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd {
    cwd: SharedCwd,
}

impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn arity(&self) -> Arity {
        Arity::Fixed(0)
    }
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        let dir = self.cwd.borrow().clone();
        list_dir(&dir, params)
    }
}

struct LsPathCmd {
    cwd: SharedCwd,
}

impl Command for LsPathCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn arity(&self) -> Arity {
        Arity::Fixed(1)
    }
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        let dir = resolve_path(&self.cwd.borrow(), params.value(0).unwrap_or_default());
        list_dir(&dir, params)
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd {
    cwd: SharedCwd,
}

impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn arity(&self) -> Arity {
        Arity::Fixed(1)
    }
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        let arg = params.value(0).unwrap_or_default().to_string();
        let target = resolve_path(&self.cwd.borrow(), &arg);
        match target.canonicalize() {
            Ok(dir) if dir.is_dir() => {
                log::debug!("cd {}", dir.display());
                *self.cwd.borrow_mut() = dir;
                Ok(true)
            },
            _ => {
                params.log("cd", &format!("not a directory: {arg}"));
                Ok(false)
            },
        }
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd {
    cwd: SharedCwd,
}

impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn arity(&self) -> Arity {
        Arity::Fixed(0)
    }
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        let dir = self.cwd.borrow().display().to_string();
        params.log("pwd", &dir);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;

impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn arity(&self) -> Arity {
        Arity::Varargs
    }
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        let text = params.values().join(" ");
        params.log("echo", &text);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;

impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn arity(&self) -> Arity {
        Arity::Fixed(0)
    }
    fn execute(&self, params: &mut Params<'_>) -> std::result::Result<bool, BoxError> {
        params.request_exit();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::split_command_line;
    use crate::test_utils::RecordingSink;
    use simterm_types::error::TermError;

    struct Shell {
        reg: CommandRegistry,
        cwd: SharedCwd,
        _dir: tempfile::TempDir,
    }

    /// Registry rooted in a temp dir containing `notes.txt` and `sub/`.
    fn setup() -> Shell {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let cwd = Rc::new(RefCell::new(dir.path().canonicalize().unwrap()));
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg, &cwd).unwrap();
        Shell {
            reg,
            cwd,
            _dir: dir,
        }
    }

    fn exec(shell: &Shell, line: &str) -> (Result<()>, RecordingSink) {
        let mut sink = RecordingSink::default();
        let (name, values) = split_command_line(line);
        let result = {
            let mut params = Params::new(values, &mut sink);
            shell.reg.dispatch(name, &mut params)
        };
        (result, sink)
    }

    #[test]
    fn registers_all_builtins() {
        let shell = setup();
        assert_eq!(shell.reg.len(), 6);
        assert_eq!(
            shell.reg.predictions("", 10),
            [
                "ls (0 params)",
                "ls (1 params)",
                "cd (1 params)",
                "pwd (0 params)",
                "echo (varargs)",
                "exit (0 params)",
            ]
        );
    }

    #[test]
    fn ls_lists_working_directory() {
        let shell = setup();
        let (result, sink) = exec(&shell, "ls");
        result.unwrap();
        assert_eq!(sink.lines, ["ls: notes.txt", "ls: sub/"]);
    }

    #[test]
    fn ls_with_path_lists_that_directory() {
        let shell = setup();
        std::fs::write(shell.cwd.borrow().join("sub").join("a.rs"), "").unwrap();
        let (result, sink) = exec(&shell, "ls sub");
        result.unwrap();
        assert_eq!(sink.lines, ["ls: a.rs"]);
    }

    #[test]
    fn ls_empty_directory() {
        let shell = setup();
        let (result, sink) = exec(&shell, "ls sub");
        result.unwrap();
        assert_eq!(sink.lines, ["ls: (empty)"]);
    }

    #[test]
    fn ls_missing_directory_fails_with_cause() {
        let shell = setup();
        let (result, _) = exec(&shell, "ls nowhere");
        let err = result.unwrap_err();
        assert!(matches!(err, TermError::CommandExecutionFailed { cause: Some(_), .. }));
    }

    #[test]
    fn cd_then_pwd() {
        let shell = setup();
        let root = shell.cwd.borrow().clone();
        exec(&shell, "cd sub").0.unwrap();
        assert_eq!(*shell.cwd.borrow(), root.join("sub"));
        let (result, sink) = exec(&shell, "pwd");
        result.unwrap();
        assert_eq!(sink.lines, [format!("pwd: {}", root.join("sub").display())]);
    }

    #[test]
    fn cd_dotdot_goes_up() {
        let shell = setup();
        let root = shell.cwd.borrow().clone();
        exec(&shell, "cd sub").0.unwrap();
        exec(&shell, "cd ..").0.unwrap();
        assert_eq!(*shell.cwd.borrow(), root);
    }

    #[test]
    fn cd_to_file_fails_and_keeps_cwd() {
        let shell = setup();
        let root = shell.cwd.borrow().clone();
        let (result, sink) = exec(&shell, "cd notes.txt");
        assert!(matches!(
            result,
            Err(TermError::CommandExecutionFailed { cause: None, .. })
        ));
        assert_eq!(sink.lines, ["cd: not a directory: notes.txt"]);
        assert_eq!(*shell.cwd.borrow(), root);
    }

    #[test]
    fn cd_absolute_path() {
        let shell = setup();
        let sub = shell.cwd.borrow().join("sub");
        exec(&shell, &format!("cd {}", sub.display())).0.unwrap();
        assert_eq!(*shell.cwd.borrow(), sub);
    }

    #[test]
    fn cd_without_argument_is_arity_mismatch() {
        let shell = setup();
        let (result, _) = exec(&shell, "cd");
        assert!(matches!(result, Err(TermError::ArityMismatch { .. })));
    }

    #[test]
    fn echo_joins_values() {
        let shell = setup();
        let (result, sink) = exec(&shell, "echo hello  world");
        result.unwrap();
        assert_eq!(sink.lines, ["echo: hello  world"]);
    }

    #[test]
    fn echo_without_values() {
        let shell = setup();
        let (result, sink) = exec(&shell, "echo");
        result.unwrap();
        assert_eq!(sink.lines, ["echo: "]);
    }

    #[test]
    fn exit_requests_exit() {
        let shell = setup();
        let (result, sink) = exec(&shell, "exit");
        result.unwrap();
        assert!(sink.exit_requested);
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let cwd = Path::new("/home/user");
        assert_eq!(resolve_path(cwd, "docs"), PathBuf::from("/home/user/docs"));
        assert_eq!(resolve_path(cwd, "/etc"), PathBuf::from("/etc"));
    }
}
