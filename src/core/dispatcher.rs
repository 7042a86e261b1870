//! Routing of parsed command-bar input to commands, and their outcomes

use std::path::PathBuf;

use crate::core::app::EditorApp;
use crate::core::parser::{CommandLine, ParsedInput, parse};
use crate::error::{EditorError, EditorResult, ErrorKind};

/// Action requiring user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Save an unbound session under a new name
    SaveAs,
    /// Save-as, then close the session
    SaveAsAndClose,
    /// `pattern -> replacement` for find-and-replace
    FindReplace,
}

/// Destructive operation waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete {
        path: PathBuf,
        name: String,
        is_dir: bool,
    },
    /// Move onto an existing target, replacing it
    OverwriteMove {
        from: PathBuf,
        to: PathBuf,
        source: String,
        destination: String,
    },
}

/// Result of command dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Command executed successfully
    Success,
    /// Informational message to display
    Info(String),
    /// Command needs user input before completing
    NeedsInput { prompt: String, action: InputAction },
    /// Command needs an explicit yes/no before running
    NeedsConfirmation {
        prompt: String,
        action: ConfirmAction,
    },
    /// Command failed; the message has been set on the app
    Failed(ErrorKind),
}

impl DispatchResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchResult::Failed(_))
    }
}

/// Dispatch one line of command-bar input
///
/// Commands are looked up in the registry by verb; bare tokens navigate.
/// Every error is recovered here: it is logged, turned into exactly one
/// user-facing message and reported as [`DispatchResult::Failed`].
pub fn dispatch(app: &mut EditorApp, line: &str) -> DispatchResult {
    let result = parse(line).and_then(|parsed| match parsed {
        ParsedInput::Empty => Ok(DispatchResult::Success),
        ParsedInput::Navigate(token) => app.navigate(&token),
        ParsedInput::Command(cmd) => run_command(app, &cmd),
    });
    recover(app, result)
}

/// Turn an error into a message and a comparable result
pub fn recover(app: &mut EditorApp, result: EditorResult<DispatchResult>) -> DispatchResult {
    match result {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(kind = ?err.kind(), "{err}");
            let kind = err.kind();
            app.set_error(err.to_string());
            DispatchResult::Failed(kind)
        }
    }
}

fn run_command(app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
    let Some(command) = app.command_registry.get(&cmd.verb).cloned() else {
        return Err(EditorError::UnknownCommand(cmd.raw.clone()));
    };
    tracing::debug!(verb = %cmd.verb, args = ?cmd.args, "dispatch");
    command.execute(app, cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::MemoryFileSystem;

    fn setup_test_app() -> (EditorApp, MemoryFileSystem) {
        let fs = MemoryFileSystem::new();
        fs.add_file("/home/a.txt", "alpha");
        let app = EditorApp::new(Box::new(fs.clone()), "/home".into());
        (app, fs)
    }

    #[test]
    fn test_unknown_command_mutates_nothing() {
        let (mut app, fs) = setup_test_app();
        let result = dispatch(&mut app, ":frobnicate now");
        assert_eq!(result, DispatchResult::Failed(ErrorKind::UnknownCommand));
        assert!(fs.calls().is_empty());
        assert_eq!(app.sessions.len(), 1);
        assert_eq!(
            app.message.as_ref().map(|m| m.text.as_str()),
            Some("Unknown command: :frobnicate now")
        );
    }

    #[test]
    fn test_verbs_are_case_insensitive() {
        let (mut app, _fs) = setup_test_app();
        let result = dispatch(&mut app, ":FS 20");
        assert!(matches!(result, DispatchResult::Info(_)));
        assert_eq!(app.font_size, 20);
    }

    #[test]
    fn test_empty_line_is_noop() {
        let (mut app, fs) = setup_test_app();
        assert_eq!(dispatch(&mut app, "   "), DispatchResult::Success);
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn test_missing_argument() {
        let (mut app, _fs) = setup_test_app();
        for line in [":new", ":newd", ":del", ":re", ":copy", ":move", ":info", ":f", ":fs"] {
            assert_eq!(
                dispatch(&mut app, line),
                DispatchResult::Failed(ErrorKind::MissingArgument),
                "{line}"
            );
        }
    }
}
