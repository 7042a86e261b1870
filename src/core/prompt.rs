//! Shared prompt and confirmation handling for every front end

use crate::core::app::EditorApp;
use crate::core::commands::manage::perform_move;
use crate::core::commands::search::{replace_operands, start_replace};
use crate::core::dispatcher::{ConfirmAction, DispatchResult, InputAction};
use crate::error::EditorResult;

/// Handle a completed prompt action at the core level
///
/// An empty answer cancels the action silently.
pub fn handle_prompt_action(
    app: &mut EditorApp,
    action: InputAction,
    input: &str,
) -> EditorResult<DispatchResult> {
    let input = input.trim();
    if input.is_empty() {
        tracing::debug!(?action, "prompt cancelled");
        return Ok(DispatchResult::Success);
    }

    match action {
        InputAction::SaveAs | InputAction::SaveAsAndClose => {
            let path = app.resolve(input);
            let content = app.sessions.active().buffer.to_string();
            // Bind only once the write went through
            app.fs.write_file(&path, &content)?;
            let active = app.sessions.active_id();
            app.sessions.release_paths(&path, Some(active));
            let session = app.sessions.active_mut();
            session.bind(path.clone());
            session.mark_clean();
            tracing::info!(session = %session.id, path = %path.display(), "saved as");

            if action == InputAction::SaveAsAndClose {
                app.close_active();
                Ok(DispatchResult::Success)
            } else {
                Ok(DispatchResult::Info(format!("Wrote {}", path.display())))
            }
        }
        InputAction::FindReplace => {
            let (pattern, replacement) = replace_operands(input)?;
            Ok(start_replace(app, &pattern, &replacement))
        }
    }
}

/// Run a confirmed destructive action
pub fn handle_confirmation(app: &mut EditorApp, action: ConfirmAction) -> EditorResult<DispatchResult> {
    match action {
        ConfirmAction::Delete { path, name, is_dir } => {
            app.fs.delete(&path)?;
            tracing::info!(path = %path.display(), "deleted");
            Ok(DispatchResult::Info(if is_dir {
                format!("Directory '{name}' and its contents have been deleted.")
            } else {
                format!("File '{name}' has been deleted.")
            }))
        }
        ConfirmAction::OverwriteMove {
            from,
            to,
            source,
            destination,
        } => perform_move(app, &from, &to, &source, &destination),
    }
}
