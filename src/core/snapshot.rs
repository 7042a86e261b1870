//! Read-only view of the editor for the rendering collaborator

use std::ops::Range;
use std::path::PathBuf;

use crate::core::app::{EditorApp, Message};
use crate::core::id::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub id: SessionId,
    pub title: String,
    pub dirty: bool,
    pub active: bool,
}

/// Everything a front end needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub current_dir: PathBuf,
    /// Directory entries, `..` first
    pub listing: Vec<String>,
    pub tabs: Vec<TabView>,
    /// Match spans of the active search
    pub highlights: Vec<Range<usize>>,
    pub current_match: Option<Range<usize>>,
    /// (line, column) of the active cursor, both zero-based
    pub cursor: (usize, usize),
    pub suggestions: Vec<String>,
    pub message: Option<Message>,
    /// Prompt or confirmation question awaiting an answer
    pub prompt: Option<String>,
    pub font_size: u32,
    pub input: String,
}

impl EditorApp {
    pub fn snapshot(&self) -> ViewSnapshot {
        let listing = self.listing().unwrap_or_else(|err| {
            tracing::warn!("cannot list {}: {err}", self.cwd.display());
            vec!["..".to_string()]
        });

        let active_id = self.sessions.active_id();
        let tabs = self
            .sessions
            .iter()
            .map(|s| TabView {
                id: s.id,
                title: s.display_name().to_string(),
                dirty: s.is_dirty(),
                active: s.id == active_id,
            })
            .collect();

        let active = self.sessions.active();
        let prompt = match (&self.pending_confirmation, &self.pending_prompt) {
            (Some(confirm), _) => Some(confirm.prompt.clone()),
            (None, Some(prompt)) => Some(prompt.prompt.clone()),
            (None, None) => None,
        };

        ViewSnapshot {
            current_dir: self.cwd.clone(),
            listing,
            tabs,
            highlights: active.search.highlights().to_vec(),
            current_match: active.search.current_match(),
            cursor: active.buffer.line_col(active.cursor),
            suggestions: self.suggestions().to_vec(),
            message: self.message.clone(),
            prompt,
            font_size: self.font_size,
            input: self.input().to_string(),
        }
    }
}
