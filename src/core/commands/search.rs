//! Find and find-and-replace commands

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::dispatcher::{DispatchResult, InputAction};
use crate::core::parser::{CommandLine, split_arrow};
use crate::core::search::{FindOutcome, ReplaceOutcome};
use crate::error::{EditorError, EditorResult};

const FR_USAGE: &str = ":fr pattern -> replacement";

fn found_message(count: usize, pattern: &str) -> String {
    format!("Found {count} occurrence(s) of '{pattern}'.")
}

fn not_found_message(pattern: &str) -> String {
    format!("No occurrences of '{pattern}' found.")
}

/// Move the edit cursor onto a navigation result
fn follow(app: &mut EditorApp, outcome: FindOutcome) -> DispatchResult {
    let session = app.sessions.active_mut();
    if let Some(range) = outcome.range() {
        session.cursor = range.end;
    }
    match outcome {
        FindOutcome::Found(_) | FindOutcome::NoMatches => DispatchResult::Success,
        FindOutcome::Wrapped(_) => DispatchResult::Info(format!(
            "Reached the end of the document, wrapped to the first occurrence of '{}'.",
            session.search.pattern
        )),
        FindOutcome::Inactive => {
            DispatchResult::Info("No active search. Use :f <pattern> first.".to_string())
        }
    }
}

/// Split `pattern -> replacement`; the replacement may be empty
pub(crate) fn replace_operands(operand: &str) -> EditorResult<(String, String)> {
    match split_arrow(operand) {
        Some((pattern, replacement)) if !pattern.is_empty() => {
            Ok((pattern.to_string(), replacement.to_string()))
        }
        _ => Err(EditorError::invalid_syntax("fr", FR_USAGE)),
    }
}

/// Enter the replacing state and select the first match
pub(crate) fn start_replace(app: &mut EditorApp, pattern: &str, replacement: &str) -> DispatchResult {
    let case_sensitive = app.case_sensitive;
    let session = app.sessions.active_mut();
    let count = session
        .search
        .start_replace(&session.buffer, pattern, replacement, case_sensitive);
    if count == 0 {
        return DispatchResult::Info(not_found_message(pattern));
    }
    let outcome = session.search.find_next(&session.buffer);
    follow(app, outcome);
    DispatchResult::Info(format!(
        "{} Replacing with '{replacement}'.",
        found_message(count, pattern)
    ))
}

/// `:f <pattern>`
#[derive(Clone)]
pub struct Find;

impl Command for Find {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let pattern = cmd.require_operand()?;
        let case_sensitive = app.case_sensitive;
        let session = app.sessions.active_mut();
        let count = session
            .search
            .start_find(&session.buffer, &pattern, case_sensitive);
        if count == 0 {
            return Ok(DispatchResult::Info(not_found_message(&pattern)));
        }
        let outcome = session.search.find_next(&session.buffer);
        follow(app, outcome);
        Ok(DispatchResult::Info(found_message(count, &pattern)))
    }
}

/// `:fr [pattern -> replacement]`
#[derive(Clone)]
pub struct FindReplace;

impl Command for FindReplace {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        if !cmd.has_operand() {
            return Ok(DispatchResult::NeedsInput {
                prompt: "Find -> Replace: ".to_string(),
                action: InputAction::FindReplace,
            });
        }
        let (pattern, replacement) = replace_operands(&cmd.operand())?;
        Ok(start_replace(app, &pattern, &replacement))
    }
}

/// `:n` next occurrence
#[derive(Clone)]
pub struct FindNext;

impl Command for FindNext {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let session = app.sessions.active_mut();
        let outcome = session.search.find_next(&session.buffer);
        Ok(follow(app, outcome))
    }
}

/// `:r` replace the current occurrence
#[derive(Clone)]
pub struct ReplaceOne;

impl Command for ReplaceOne {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let session = app.sessions.active_mut();
        let outcome = session.search.replace_one(&mut session.buffer);
        Ok(match outcome {
            ReplaceOutcome::Inactive => DispatchResult::Info(format!(
                "Nothing to replace. Use {FR_USAGE} first."
            )),
            ReplaceOutcome::NoCurrentMatch => {
                DispatchResult::Info("No occurrence selected. Use :n first.".to_string())
            }
            ReplaceOutcome::Replaced { range, next: None } => {
                session.cursor = range.end;
                DispatchResult::Info("No more occurrences found.".to_string())
            }
            ReplaceOutcome::Replaced {
                next: Some(next), ..
            } => follow(app, next),
        })
    }
}

/// `:ra [pattern -> replacement]` replace every occurrence
#[derive(Clone)]
pub struct ReplaceAll;

impl Command for ReplaceAll {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let case_sensitive = app.case_sensitive;
        let session = app.sessions.active_mut();
        let (pattern, replacement) = if cmd.has_operand() {
            replace_operands(&cmd.operand())?
        } else {
            match session.search.replacement() {
                Some(replacement) => (session.search.pattern.clone(), replacement.to_string()),
                None => return Err(EditorError::missing_argument(&cmd.verb)),
            }
        };

        let count = session.search.replace_all(
            &mut session.buffer,
            &pattern,
            &replacement,
            case_sensitive,
        );
        session.cursor = session.buffer.clamp(session.cursor);
        Ok(DispatchResult::Info(if count == 0 {
            not_found_message(&pattern)
        } else {
            format!("Replaced {count} occurrence(s).")
        }))
    }
}

/// `:case` toggle case-sensitive matching
#[derive(Clone)]
pub struct ToggleCase;

impl Command for ToggleCase {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        app.case_sensitive = !app.case_sensitive;
        let case_sensitive = app.case_sensitive;
        let session = app.sessions.active_mut();
        if session.search.is_active() {
            session
                .search
                .set_case_sensitive(&session.buffer, case_sensitive);
            let outcome = session.search.find_next(&session.buffer);
            follow(app, outcome);
        }
        let state = if case_sensitive { "on" } else { "off" };
        Ok(DispatchResult::Info(format!("Case-sensitive search {state}.")))
    }
}

/// `:esc` end the search and clear highlights
#[derive(Clone)]
pub struct EndSearch;

impl Command for EndSearch {
    fn execute(&self, app: &mut EditorApp, _cmd: &CommandLine) -> EditorResult<DispatchResult> {
        app.sessions.active_mut().search.clear();
        Ok(DispatchResult::Success)
    }
}
