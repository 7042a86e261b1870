//! File-manager commands taking `source -> destination`

use std::path::PathBuf;

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::dispatcher::{ConfirmAction, DispatchResult};
use crate::core::fs::file_name_of;
use crate::core::parser::CommandLine;
use crate::error::{EditorError, EditorResult};

/// `:re <old> -> <new>`
#[derive(Clone)]
pub struct RenameItem;

impl Command for RenameItem {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let (old, new) = cmd.arrow_operands(":re oldname -> newname")?;
        let from = app.resolve(&old);
        let to = app.resolve(&new);
        if !app.fs.exists(&from) {
            return Err(EditorError::PathNotFound(PathBuf::from(old)));
        }
        if app.fs.exists(&to) {
            return Err(EditorError::PathAlreadyExists(PathBuf::from(new)));
        }

        app.fs.rename(&from, &to)?;
        app.sessions.rebind_paths(&from, &to);
        Ok(DispatchResult::Info(format!(
            "'{old}' has been renamed to '{new}'."
        )))
    }
}

/// `:copy <src> -> <dst>`
#[derive(Clone)]
pub struct CopyItem;

impl Command for CopyItem {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let (source, destination) = cmd.arrow_operands(":copy source -> destination")?;
        let from = app.resolve(&source);
        let to = app.resolve(&destination);
        let info = app
            .fs
            .stat(&from)
            .map_err(|_| EditorError::PathNotFound(PathBuf::from(&source)))?;
        if app.fs.exists(&to) || to.starts_with(&from) {
            return Err(EditorError::PathAlreadyExists(PathBuf::from(destination)));
        }

        app.fs.copy(&from, &to)?;
        let message = if info.is_dir {
            format!("Directory '{source}' and its contents have been copied to '{destination}'.")
        } else {
            format!("File '{source}' has been copied to '{destination}'.")
        };
        Ok(DispatchResult::Info(message))
    }
}

/// `:move <src> -> <dst>`
///
/// An existing directory destination receives the item; an existing file
/// destination is rejected; replacing an existing item needs confirmation.
#[derive(Clone)]
pub struct MoveItem;

impl Command for MoveItem {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let (source, destination) = cmd.arrow_operands(":move source -> destination")?;
        let from = app.resolve(&source);
        let dest = app.resolve(&destination);
        if !app.fs.exists(&from) {
            return Err(EditorError::PathNotFound(PathBuf::from(source)));
        }

        let to = match app.fs.stat(&dest) {
            Ok(info) if info.is_dir => dest.join(file_name_of(&from)),
            Ok(_) => return Err(EditorError::NotADirectory(PathBuf::from(destination))),
            Err(_) => dest,
        };
        if to == from || from.starts_with(&to) || to.starts_with(&from) {
            return Err(EditorError::PathAlreadyExists(PathBuf::from(destination)));
        }

        if app.fs.exists(&to) {
            return Ok(DispatchResult::NeedsConfirmation {
                prompt: format!("'{}' already exists. Overwrite it?", to.display()),
                action: ConfirmAction::OverwriteMove {
                    from,
                    to,
                    source,
                    destination,
                },
            });
        }
        perform_move(app, &from, &to, &source, &destination)
    }
}

/// Move and rebind any sessions under the moved path
pub(crate) fn perform_move(
    app: &mut EditorApp,
    from: &std::path::Path,
    to: &std::path::Path,
    source: &str,
    destination: &str,
) -> EditorResult<DispatchResult> {
    app.fs.move_item(from, to)?;
    app.sessions.rebind_paths(from, to);
    Ok(DispatchResult::Info(format!(
        "'{source}' has been moved to '{destination}'."
    )))
}
