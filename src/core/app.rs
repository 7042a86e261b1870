//! This module defines the central `EditorApp` structure: the explicit context
//! every command runs against. It owns the current directory, the filesystem
//! collaborator, all document sessions, the command registry, the command-bar
//! line with its suggestions, and the single user-facing message.
//!
//! Nothing here is global, so several instances (for example under test)
//! never interfere with each other.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::command::Command;
use crate::core::commands::{ARROW_VERBS, PATH_VERBS};
use crate::core::completion::{
    self, MAX_SUGGESTIONS, SuggestionState, WordCompleter, WordCompletion, path_candidates,
};
use crate::core::dispatcher::{ConfirmAction, DispatchResult, InputAction, dispatch, recover};
use crate::core::fs::{self, FileSystem};
use crate::core::parser::{ARROW, COMMAND_MARKER};
use crate::core::prompt::{handle_confirmation, handle_prompt_action};
use crate::core::session::SessionManager;
use crate::error::{EditorError, EditorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// The one message shown to the user after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// A prompt waiting for free-text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrompt {
    pub prompt: String,
    pub action: InputAction,
}

/// A destructive action waiting for yes/no
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub prompt: String,
    pub action: ConfirmAction,
}

/// Command-bar autofill cycle: `head` is the part of the line before the
/// completed operand, `line` the line as the last step left it.
#[derive(Debug, Clone)]
struct AutofillCycle {
    head: String,
    line: String,
    state: SuggestionState,
}

/// EditorApp: the root application state
pub struct EditorApp {
    pub config: Config,
    /// Filesystem collaborator
    pub fs: Box<dyn FileSystem>,
    /// Directory navigation tokens and operands resolve against
    pub cwd: PathBuf,
    pub sessions: SessionManager,
    /// Registry of commands implementing the Command pattern
    pub command_registry: HashMap<String, Box<dyn Command>>,
    /// Status/error message to display to user
    pub message: Option<Message>,
    pub font_size: u32,
    pub case_sensitive: bool,
    pub suggestion_limit: usize,
    pub pending_prompt: Option<PendingPrompt>,
    pub pending_confirmation: Option<PendingConfirmation>,
    /// Buffer-local word completer
    pub word_completer: WordCompleter,
    input: String,
    suggestions: Vec<String>,
    autofill_cycle: Option<AutofillCycle>,
}

impl EditorApp {
    /// Creates an `EditorApp` with the compiled-in configuration
    pub fn new(fs: Box<dyn FileSystem>, start_dir: PathBuf) -> Self {
        let mut config = Config::default();
        crate::user_config::configure(&mut config);
        Self::with_config(config, fs, start_dir)
    }

    pub fn with_config(config: Config, fs: Box<dyn FileSystem>, start_dir: PathBuf) -> Self {
        let font_size = config
            .get_int("font_size")
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(12);
        let case_sensitive = config.get_bool("case_sensitive").unwrap_or(true);
        let suggestion_limit = config
            .get_int("suggestion_limit")
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(MAX_SUGGESTIONS);

        let mut app = Self {
            config,
            fs,
            cwd: fs::normalize(&start_dir),
            sessions: SessionManager::new(),
            command_registry: HashMap::new(),
            message: None,
            font_size,
            case_sensitive,
            suggestion_limit,
            pending_prompt: None,
            pending_confirmation: None,
            word_completer: WordCompleter::new(),
            input: String::new(),
            suggestions: Vec::new(),
            autofill_cycle: None,
        };
        crate::core::commands::register_all(&mut app);
        tracing::debug!(cwd = %app.cwd.display(), "editor ready");
        app
    }

    /// Resolve a user operand against the current directory
    pub fn resolve(&self, operand: &str) -> PathBuf {
        fs::resolve(&self.cwd, operand)
    }

    /// Shell for `:cmd`: setting, then `$SHELL`, then the platform default
    pub fn shell(&self) -> String {
        if let Some(shell) = self.config.get_string("shell") {
            return shell.to_string();
        }
        match std::env::var("SHELL") {
            Ok(shell) if !shell.is_empty() => shell,
            _ if cfg!(windows) => "cmd".to_string(),
            _ => "sh".to_string(),
        }
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Info,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Error,
            text: text.into(),
        });
    }

    // =========================================================================
    // Directory and sessions
    // =========================================================================

    /// Directory entries for the listing pane, `..` first
    pub fn listing(&self) -> EditorResult<Vec<String>> {
        let mut names = self.fs.list_directory(&self.cwd)?;
        names.sort();
        names.insert(0, "..".to_string());
        Ok(names)
    }

    /// Handle a bare navigation token
    pub fn navigate(&mut self, token: &str) -> EditorResult<DispatchResult> {
        if token == ".." {
            if let Some(parent) = self.cwd.parent() {
                self.cwd = parent.to_path_buf();
            }
            tracing::debug!(cwd = %self.cwd.display(), "ascend");
            return Ok(DispatchResult::Success);
        }

        let path = self.resolve(token);
        match self.fs.stat(&path) {
            Ok(info) if info.is_dir => {
                tracing::debug!(cwd = %path.display(), "enter directory");
                self.cwd = path;
            }
            Ok(_) => {
                self.sessions.open(self.fs.as_ref(), &path)?;
                self.word_completer.reset();
            }
            Err(_) => return Err(EditorError::PathNotFound(PathBuf::from(token))),
        }
        Ok(DispatchResult::Success)
    }

    /// Open a file or enter a directory outside the command bar
    pub fn open(&mut self, operand: &Path) -> DispatchResult {
        let result = self.navigate(&operand.to_string_lossy());
        let result = recover(self, result);
        self.finish(result, true)
    }

    /// Close the active tab (the last one is reset instead)
    pub fn close_active(&mut self) {
        let id = self.sessions.active_id();
        self.sessions.close(id);
        self.word_completer.reset();
    }

    // =========================================================================
    // Editing the active document
    // =========================================================================

    /// Insert text at the active cursor
    pub fn insert_text(&mut self, text: &str) {
        let session = self.sessions.active_mut();
        let pos = session.buffer.clamp(session.cursor);
        session.buffer.insert(pos, text);
        session.cursor = pos + text.len();
        self.word_completer.reset();
    }

    pub fn set_cursor(&mut self, offset: usize) {
        let session = self.sessions.active_mut();
        session.cursor = session.buffer.clamp(offset);
        self.word_completer.reset();
    }

    /// Complete the word before the active cursor
    pub fn complete_word(&mut self) -> WordCompletion {
        let limit = self.suggestion_limit;
        let session = self.sessions.active_mut();
        let outcome =
            self.word_completer
                .complete(session.id, &mut session.buffer, session.cursor, limit);
        if let WordCompletion::Extended { cursor, .. } | WordCompletion::Cycled { cursor, .. } =
            &outcome
        {
            session.cursor = *cursor;
        }
        outcome
    }

    /// Any other key: drop the word-completion cycle
    pub fn reset_completion(&mut self) {
        self.word_completer.reset();
    }

    // =========================================================================
    // Command bar
    // =========================================================================

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Replace the command-bar line (one keystroke) and refresh suggestions
    pub fn set_input(&mut self, line: &str) {
        self.input = line.to_string();
        self.autofill_cycle = None;
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = match self.completion_context() {
            Some((_, prefix)) => {
                path_candidates(self.fs.as_ref(), &self.cwd, &prefix, self.suggestion_limit)
            }
            None => Vec::new(),
        };
    }

    /// Split the line into (head, path prefix being completed), or `None`
    /// when the line is a command without path operands
    fn completion_context(&self) -> Option<(String, String)> {
        let line = self.input.trim_start();
        let Some(rest) = line.strip_prefix(COMMAND_MARKER) else {
            return Some((String::new(), line.to_string()));
        };
        let (verb, operand) = rest.split_once(char::is_whitespace)?;
        let verb = verb.to_lowercase();
        let operand = operand.trim_start();

        let prefix = if ARROW_VERBS.contains(&verb.as_str()) {
            match operand.find(ARROW) {
                Some(idx) => operand[idx + ARROW.len()..].trim_start(),
                None => operand,
            }
        } else if PATH_VERBS.contains(&verb.as_str()) {
            operand
        } else {
            return None;
        };
        // `prefix` is a suffix of `line`
        let head = &line[..line.len() - prefix.len()];
        Some((head.to_string(), prefix.to_string()))
    }

    /// Tab in the command bar: extend the operand to the candidates' common
    /// prefix; when that adds nothing, a repeated press cycles through them.
    /// Returns whether the line changed.
    pub fn autofill(&mut self) -> bool {
        if let Some(cycle) = self.autofill_cycle.as_mut() {
            if cycle.line == self.input {
                let Some(next) = cycle.state.cycle() else {
                    return false;
                };
                let line = format!("{}{}", cycle.head, next);
                cycle.line = line.clone();
                self.input = line;
                return true;
            }
        }

        let Some((head, prefix)) = self.completion_context() else {
            return false;
        };
        let candidates =
            path_candidates(self.fs.as_ref(), &self.cwd, &prefix, self.suggestion_limit);
        if let Some(extended) = completion::autofill(&prefix, &candidates) {
            self.input = format!("{head}{extended}");
            self.autofill_cycle = None;
            self.refresh_suggestions();
            return true;
        }
        if !candidates.is_empty() {
            self.autofill_cycle = Some(AutofillCycle {
                head,
                line: self.input.clone(),
                state: SuggestionState::new(prefix, candidates),
            });
        }
        false
    }

    /// Put suggestion `index` into the operand and submit the line
    pub fn use_suggestion(&mut self, index: usize) -> DispatchResult {
        let Some(choice) = self.suggestions.get(index).cloned() else {
            return DispatchResult::Success;
        };
        let head = self
            .completion_context()
            .map(|(head, _)| head)
            .unwrap_or_default();
        self.input = format!("{head}{choice}");
        self.submit()
    }

    /// Run `line` as if typed into the command bar and submitted
    pub fn execute_line(&mut self, line: &str) -> DispatchResult {
        self.input = line.to_string();
        self.autofill_cycle = None;
        self.submit()
    }

    /// Enter in the command bar. A pending prompt or confirmation receives
    /// the line as its answer; otherwise the line is dispatched.
    pub fn submit(&mut self) -> DispatchResult {
        let line = self.input.clone();
        if self.pending_confirmation.is_some() {
            let yes = matches!(line.trim().to_lowercase().as_str(), "y" | "yes");
            return self.confirm(yes);
        }
        if self.pending_prompt.is_some() {
            return self.answer_prompt(&line);
        }

        self.message = None;
        let result = dispatch(self, &line);
        self.finish(result, false)
    }

    /// Answer the pending prompt
    pub fn answer_prompt(&mut self, answer: &str) -> DispatchResult {
        let Some(pending) = self.pending_prompt.take() else {
            return DispatchResult::Success;
        };
        self.message = None;
        let result = handle_prompt_action(self, pending.action, answer);
        let result = recover(self, result);
        self.finish(result, true)
    }

    /// Answer the pending confirmation; declining is a silent no-op
    pub fn confirm(&mut self, yes: bool) -> DispatchResult {
        let Some(pending) = self.pending_confirmation.take() else {
            return DispatchResult::Success;
        };
        self.message = None;
        if !yes {
            tracing::debug!(action = ?pending.action, "declined");
            return self.finish(DispatchResult::Success, true);
        }
        let result = handle_confirmation(self, pending.action);
        let result = recover(self, result);
        self.finish(result, true)
    }

    /// Record the outcome of one submitted line
    fn finish(&mut self, result: DispatchResult, always_clear: bool) -> DispatchResult {
        match &result {
            DispatchResult::Info(text) => self.set_info(text.clone()),
            DispatchResult::NeedsInput { prompt, action } => {
                self.pending_prompt = Some(PendingPrompt {
                    prompt: prompt.clone(),
                    action: action.clone(),
                });
            }
            DispatchResult::NeedsConfirmation { prompt, action } => {
                self.pending_confirmation = Some(PendingConfirmation {
                    prompt: prompt.clone(),
                    action: action.clone(),
                });
            }
            DispatchResult::Success | DispatchResult::Failed(_) => {}
        }
        if always_clear || !result.is_failure() {
            self.input.clear();
            self.suggestions.clear();
            self.autofill_cycle = None;
        }
        result
    }
}
