//! Session control commands: close, save, open a shell

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::dispatcher::{DispatchResult, InputAction};
use crate::core::parser::CommandLine;
use crate::error::EditorResult;

/// `:q` close the active tab
#[derive(Clone)]
pub struct Quit;

impl Command for Quit {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        app.close_active();
        Ok(DispatchResult::Success)
    }
}

/// `:s` save the active tab, prompting for a name when unbound
#[derive(Clone)]
pub struct Save;

impl Command for Save {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        if !app.sessions.active().is_bound() {
            return Ok(DispatchResult::NeedsInput {
                prompt: "Save as: ".to_string(),
                action: InputAction::SaveAs,
            });
        }
        let path = app.sessions.active_mut().save(app.fs.as_ref())?;
        Ok(DispatchResult::Info(format!("Wrote {}", path.display())))
    }
}

/// `:sq` save then close
#[derive(Clone)]
pub struct SaveAndQuit;

impl Command for SaveAndQuit {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        if !app.sessions.active().is_bound() {
            return Ok(DispatchResult::NeedsInput {
                prompt: "Save as: ".to_string(),
                action: InputAction::SaveAsAndClose,
            });
        }
        app.sessions.active_mut().save(app.fs.as_ref())?;
        app.close_active();
        Ok(DispatchResult::Success)
    }
}

/// `:cmd` open a shell in the current directory
#[derive(Clone)]
pub struct OpenShell;

impl Command for OpenShell {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let shell = app.shell();
        app.fs.open_shell(&app.cwd, &shell)?;
        Ok(DispatchResult::Info(format!(
            "Opened {shell} in {}",
            app.cwd.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::app::EditorApp;
    use crate::core::dispatcher::{DispatchResult, InputAction};
    use crate::core::fs::{FsCall, MemoryFileSystem};
    use crate::error::{ErrorKind, FsOp};
    use std::path::{Path, PathBuf};

    fn setup() -> (EditorApp, MemoryFileSystem) {
        let fs = MemoryFileSystem::new();
        fs.add_file("/w/a.txt", "alpha");
        let app = EditorApp::new(Box::new(fs.clone()), PathBuf::from("/w"));
        (app, fs)
    }

    #[test]
    fn test_save_bound_session() {
        let (mut app, fs) = setup();
        app.execute_line("a.txt");
        app.insert_text("!");
        assert!(app.sessions.active().is_dirty());

        let result = app.execute_line(":s");
        assert_eq!(result, DispatchResult::Info("Wrote /w/a.txt".into()));
        assert_eq!(fs.contents("/w/a.txt").as_deref(), Some("!alpha"));
        assert!(!app.sessions.active().is_dirty());
    }

    #[test]
    fn test_save_unbound_prompts() {
        let (mut app, _fs) = setup();
        let result = app.execute_line(":s");
        assert_eq!(
            result,
            DispatchResult::NeedsInput {
                prompt: "Save as: ".into(),
                action: InputAction::SaveAs,
            }
        );
    }

    #[test]
    fn test_save_and_quit_bound() {
        let (mut app, fs) = setup();
        app.execute_line("a.txt");
        app.insert_text("x");
        assert_eq!(app.sessions.len(), 2);

        assert_eq!(app.execute_line(":sq"), DispatchResult::Success);
        assert_eq!(app.sessions.len(), 1);
        assert_eq!(fs.contents("/w/a.txt").as_deref(), Some("xalpha"));
    }

    #[test]
    fn test_save_and_quit_keeps_tab_on_write_failure() {
        let (mut app, fs) = setup();
        app.execute_line("a.txt");
        fs.fail_on(FsOp::Write);
        let result = app.execute_line(":sq");
        assert_eq!(result, DispatchResult::Failed(ErrorKind::IoFailure));
        assert_eq!(app.sessions.len(), 2);
    }

    #[test]
    fn test_quit_closes_active() {
        let (mut app, _fs) = setup();
        app.execute_line("a.txt");
        app.execute_line(":q");
        assert_eq!(app.sessions.len(), 1);
        assert_eq!(app.sessions.active().display_name(), "Untitled-1");
    }

    #[test]
    fn test_open_shell_uses_configured_shell() {
        let (mut app, fs) = setup();
        app.config.set("shell", "fish");
        app.execute_line(":cmd");
        let expected = FsCall::OpenShell(Path::new("/w").to_path_buf(), "fish".into());
        assert!(fs.calls().contains(&expected));
    }
}
