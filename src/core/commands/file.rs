//! File and directory creation, deletion and inspection

use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::dispatcher::{ConfirmAction, DispatchResult};
use crate::core::fs::file_name_of;
use crate::core::parser::CommandLine;
use crate::error::{EditorError, EditorResult};

/// `:new <name>` open a tab for a file that does not exist yet
#[derive(Clone)]
pub struct NewFile;

impl Command for NewFile {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let name = cmd.require_operand()?;
        let path = app.resolve(&name);
        if app.fs.exists(&path) {
            return Err(EditorError::PathAlreadyExists(PathBuf::from(name)));
        }
        // Nothing is written until the tab is saved
        app.sessions.open(app.fs.as_ref(), &path)?;
        app.word_completer.reset();
        Ok(DispatchResult::Success)
    }
}

/// `:newd <name>` create a directory
#[derive(Clone)]
pub struct NewDirectory;

impl Command for NewDirectory {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let name = cmd.require_operand()?;
        let path = app.resolve(&name);
        if app.fs.exists(&path) {
            return Err(EditorError::PathAlreadyExists(PathBuf::from(name)));
        }
        app.fs.create_dir(&path)?;
        Ok(DispatchResult::Info(format!("Directory '{name}' has been created.")))
    }
}

/// `:del <name>` delete a file or directory tree, after confirmation
#[derive(Clone)]
pub struct Delete;

impl Command for Delete {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let name = cmd.require_operand()?;
        let path = app.resolve(&name);
        let info = app
            .fs
            .stat(&path)
            .map_err(|_| EditorError::PathNotFound(PathBuf::from(&name)))?;
        Ok(DispatchResult::NeedsConfirmation {
            prompt: format!("Are you sure you want to delete '{name}'?"),
            action: ConfirmAction::Delete {
                path,
                name,
                is_dir: info.is_dir,
            },
        })
    }
}

fn format_time(time: Option<SystemTime>) -> String {
    match time {
        Some(time) => DateTime::<Local>::from(time)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "unknown".to_string(),
    }
}

/// `:info <name>` describe a file or directory
#[derive(Clone)]
pub struct ItemInfo;

impl Command for ItemInfo {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let name = cmd.require_operand()?;
        let path = app.resolve(&name);
        let info = app
            .fs
            .stat(&path)
            .map_err(|_| EditorError::PathNotFound(PathBuf::from(&name)))?;

        let kind = if info.is_dir { "Directory" } else { "File" };
        let lines = [
            format!("Name: {}", file_name_of(&path)),
            format!("Type: {kind}"),
            format!("Size: {:.2} KB", info.size as f64 / 1024.0),
            format!("Full Path: {}", path.display()),
            format!("Created: {}", format_time(info.created)),
            format!("Modified: {}", format_time(info.modified)),
            format!("Last Accessed: {}", format_time(info.accessed)),
        ];
        Ok(DispatchResult::Info(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::app::EditorApp;
    use crate::core::dispatcher::{ConfirmAction, DispatchResult};
    use crate::core::fs::MemoryFileSystem;
    use crate::error::ErrorKind;
    use std::path::{Path, PathBuf};

    fn setup() -> (EditorApp, MemoryFileSystem) {
        let fs = MemoryFileSystem::new();
        fs.add_file("/w/a.txt", "alpha");
        fs.add_file("/w/docs/readme.md", "# docs");
        let app = EditorApp::new(Box::new(fs.clone()), PathBuf::from("/w"));
        (app, fs)
    }

    #[test]
    fn test_new_file_opens_unsaved_tab() {
        let (mut app, fs) = setup();
        assert_eq!(app.execute_line(":new draft.txt"), DispatchResult::Success);
        assert_eq!(app.sessions.active().display_name(), "draft.txt");
        assert_eq!(app.sessions.active().path(), Some(Path::new("/w/draft.txt")));
        assert!(!fs.contains("/w/draft.txt"));
    }

    #[test]
    fn test_new_file_existing_fails() {
        let (mut app, _fs) = setup();
        let result = app.execute_line(":new a.txt");
        assert_eq!(result, DispatchResult::Failed(ErrorKind::PathAlreadyExists));
        assert_eq!(app.sessions.len(), 1);
        // Input kept after a failure
        assert_eq!(app.input(), ":new a.txt");
    }

    #[test]
    fn test_new_directory() {
        let (mut app, fs) = setup();
        app.execute_line(":newd build");
        assert!(fs.contains("/w/build"));
        let result = app.execute_line(":newd build");
        assert_eq!(result, DispatchResult::Failed(ErrorKind::PathAlreadyExists));
    }

    #[test]
    fn test_delete_asks_first() {
        let (mut app, fs) = setup();
        let result = app.execute_line(":del docs");
        assert_eq!(
            result,
            DispatchResult::NeedsConfirmation {
                prompt: "Are you sure you want to delete 'docs'?".into(),
                action: ConfirmAction::Delete {
                    path: PathBuf::from("/w/docs"),
                    name: "docs".into(),
                    is_dir: true,
                },
            }
        );
        assert!(fs.contains("/w/docs/readme.md"));

        let done = app.confirm(true);
        assert_eq!(
            done,
            DispatchResult::Info("Directory 'docs' and its contents have been deleted.".into())
        );
        assert!(!fs.contains("/w/docs"));
        assert!(!fs.contains("/w/docs/readme.md"));
    }

    #[test]
    fn test_delete_declined_is_noop() {
        let (mut app, fs) = setup();
        app.execute_line(":del a.txt");
        assert_eq!(app.confirm(false), DispatchResult::Success);
        assert!(fs.contains("/w/a.txt"));
        assert!(fs.mutations().is_empty());
        assert!(app.message.is_none());
    }

    #[test]
    fn test_delete_missing() {
        let (mut app, _fs) = setup();
        let result = app.execute_line(":del ghost.txt");
        assert_eq!(result, DispatchResult::Failed(ErrorKind::PathNotFound));
        assert_eq!(
            app.message.as_ref().map(|m| m.text.as_str()),
            Some("The file or directory 'ghost.txt' does not exist.")
        );
    }

    #[test]
    fn test_info_report() {
        let (mut app, _fs) = setup();
        let DispatchResult::Info(text) = app.execute_line(":info a.txt") else {
            panic!("expected info");
        };
        assert!(text.starts_with("Name: a.txt\nType: File\nSize: 0.00 KB\n"));
        assert!(text.contains("Full Path: /w/a.txt"));
        assert!(text.contains("Last Accessed: "));

        let DispatchResult::Info(text) = app.execute_line(":info docs") else {
            panic!("expected info");
        };
        assert!(text.contains("Type: Directory"));
    }
}
