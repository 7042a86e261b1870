//! Document sessions (tabs) and their manager
//!
//! A [`DocumentSession`] owns its buffer and search state directly and is
//! addressed by [`SessionId`]. The [`SessionManager`] keeps the ordered tab
//! list and guarantees it is never empty: closing the last tab resets it to an
//! empty, unbound document instead of removing it.

use std::path::{Path, PathBuf};

use crate::core::buffer::Buffer;
use crate::core::fs::{FileSystem, file_name_of};
use crate::core::id::SessionId;
use crate::core::search::SearchState;
use crate::error::{EditorError, EditorResult, FsOp};

/// One open document
#[derive(Debug)]
pub struct DocumentSession {
    pub id: SessionId,
    path: Option<PathBuf>,
    name: String,
    pub buffer: Buffer,
    pub search: SearchState,
    /// Edit cursor, a byte offset into `buffer`
    pub cursor: usize,
    clean_version: u64,
}

impl DocumentSession {
    fn untitled(id: SessionId, name: String) -> Self {
        let buffer = Buffer::new();
        let clean_version = buffer.version();
        Self {
            id,
            path: None,
            name,
            buffer,
            search: SearchState::new(),
            cursor: 0,
            clean_version,
        }
    }

    fn bound(id: SessionId, path: PathBuf, content: &str) -> Self {
        let buffer = Buffer::from_string(content);
        let clean_version = buffer.version();
        Self {
            id,
            name: file_name_of(&path),
            path: Some(path),
            buffer,
            search: SearchState::new(),
            cursor: 0,
            clean_version,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.path.is_some()
    }

    /// Tab title: the bound file's name, or `Untitled-N`
    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.version() != self.clean_version
    }

    pub fn mark_clean(&mut self) {
        self.clean_version = self.buffer.version();
    }

    /// Bind (or rebind) to `path` without touching the content
    pub fn bind(&mut self, path: PathBuf) {
        self.name = file_name_of(&path);
        self.path = Some(path);
    }

    /// Detach from the file, keeping the content under an untitled name
    fn unbind(&mut self, name: String) {
        self.path = None;
        self.name = name;
    }

    /// Write the buffer to the bound path and clear the dirty flag
    pub fn save(&mut self, fs: &dyn FileSystem) -> EditorResult<PathBuf> {
        let Some(path) = self.path.clone() else {
            return Err(EditorError::MissingArgument {
                command: "s".to_string(),
            });
        };
        fs.write_file(&path, &self.buffer.to_string())?;
        self.mark_clean();
        tracing::info!(session = %self.id, path = %path.display(), "saved");
        Ok(path)
    }

    fn reset_empty(&mut self, name: String) {
        self.buffer = Buffer::new();
        self.clean_version = self.buffer.version();
        self.search = SearchState::new();
        self.cursor = 0;
        self.path = None;
        self.name = name;
    }
}

/// Ordered collection of sessions with one active tab
#[derive(Debug)]
pub struct SessionManager {
    sessions: Vec<DocumentSession>,
    active: usize,
    next_id: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Start with a single empty `Untitled-1` session
    pub fn new() -> Self {
        let first = DocumentSession::untitled(SessionId(0), "Untitled-1".to_string());
        Self {
            sessions: vec![first],
            active: 0,
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Smallest `Untitled-N` not used by another unbound session
    fn untitled_name(&self) -> String {
        (1..)
            .map(|n| format!("Untitled-{n}"))
            .find(|name| {
                !self
                    .sessions
                    .iter()
                    .any(|s| !s.is_bound() && s.display_name() == name)
            })
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentSession> {
        self.sessions.iter()
    }

    pub fn active(&self) -> &DocumentSession {
        &self.sessions[self.active]
    }

    pub fn active_mut(&mut self) -> &mut DocumentSession {
        &mut self.sessions[self.active]
    }

    pub fn active_id(&self) -> SessionId {
        self.active().id
    }

    pub fn get(&self, id: SessionId) -> Option<&DocumentSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn position(&self, id: SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    /// Make `id` the active tab
    pub fn focus(&mut self, id: SessionId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    pub fn find_by_path(&self, path: &Path) -> Option<SessionId> {
        self.sessions
            .iter()
            .find(|s| s.path() == Some(path))
            .map(|s| s.id)
    }

    /// Focus the session bound to `path`, or open a new one. Content is loaded
    /// when the path exists; otherwise the session starts empty.
    pub fn open(&mut self, fs: &dyn FileSystem, path: &Path) -> EditorResult<SessionId> {
        if let Some(id) = self.find_by_path(path) {
            self.focus(id);
            tracing::debug!(session = %id, path = %path.display(), "focused open session");
            return Ok(id);
        }

        let content = match fs.stat(path) {
            Ok(info) if info.is_dir => {
                let source = std::io::Error::other("is a directory");
                return Err(EditorError::io(FsOp::Read, path, source));
            }
            Ok(_) => fs.read_file(path)?,
            Err(_) => String::new(),
        };

        let id = self.alloc_id();
        self.sessions
            .push(DocumentSession::bound(id, path.to_path_buf(), &content));
        self.active = self.sessions.len() - 1;
        tracing::info!(session = %id, path = %path.display(), "opened");
        Ok(id)
    }

    /// Focus the unbound session called `name`, or create it
    pub fn open_untitled(&mut self, name: Option<&str>) -> SessionId {
        if let Some(name) = name {
            let existing = self
                .sessions
                .iter()
                .find(|s| !s.is_bound() && s.display_name() == name)
                .map(|s| s.id);
            if let Some(id) = existing {
                self.focus(id);
                return id;
            }
        }
        let name = match name {
            Some(name) => name.to_string(),
            None => self.untitled_name(),
        };
        let id = self.alloc_id();
        self.sessions.push(DocumentSession::untitled(id, name));
        self.active = self.sessions.len() - 1;
        id
    }

    /// Remove a session; the last one is reset instead. Returns `true` when
    /// the session was actually removed.
    pub fn close(&mut self, id: SessionId) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };

        if self.sessions.len() == 1 {
            let name = "Untitled-1".to_string();
            self.sessions[0].reset_empty(name);
            tracing::debug!(session = %id, "last session reset");
            return false;
        }

        self.sessions.remove(idx);
        if self.active > idx || self.active >= self.sessions.len() {
            self.active = self.active.saturating_sub(1);
        }
        tracing::debug!(session = %id, "closed");
        true
    }

    /// Unbind every session at `path` or below it, except `keep`. Released
    /// sessions keep their content under a fresh `Untitled-N` name, so at most
    /// one session is ever bound to a given path.
    pub fn release_paths(&mut self, path: &Path, keep: Option<SessionId>) -> usize {
        let mut count = 0;
        for idx in 0..self.sessions.len() {
            let session = &self.sessions[idx];
            if Some(session.id) == keep || !session.path().is_some_and(|p| p.starts_with(path)) {
                continue;
            }
            let name = self.untitled_name();
            let session = &mut self.sessions[idx];
            tracing::debug!(session = %session.id, name = %name, "released");
            session.unbind(name);
            count += 1;
        }
        count
    }

    /// Rebind every session at `from` (or below it, for a directory) to the
    /// matching path under `to`. Sessions already bound under `to` are
    /// released first. Content is not reloaded.
    pub fn rebind_paths(&mut self, from: &Path, to: &Path) -> usize {
        self.release_paths(to, None);
        let mut count = 0;
        for session in &mut self.sessions {
            let Some(current) = session.path() else {
                continue;
            };
            let target = if current == from {
                to.to_path_buf()
            } else if let Ok(rest) = current.strip_prefix(from) {
                to.join(rest)
            } else {
                continue;
            };
            tracing::debug!(session = %session.id, to = %target.display(), "rebound");
            session.bind(target);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fs::MemoryFileSystem;

    fn fs_with_files() -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        fs.add_file("/w/a.txt", "alpha");
        fs.add_file("/w/notes.txt", "notes");
        fs
    }

    #[test]
    fn test_starts_with_one_untitled() {
        let sm = SessionManager::new();
        assert_eq!(sm.len(), 1);
        assert_eq!(sm.active().display_name(), "Untitled-1");
        assert!(!sm.active().is_bound());
        assert!(!sm.active().is_dirty());
    }

    #[test]
    fn test_open_loads_and_focuses_existing() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        let a = sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        assert_eq!(sm.active().buffer.to_string(), "alpha");
        assert_eq!(sm.active().display_name(), "a.txt");

        let n = sm.open(&fs, Path::new("/w/notes.txt")).unwrap();
        assert_eq!(sm.active_id(), n);

        assert_eq!(sm.open(&fs, Path::new("/w/a.txt")).unwrap(), a);
        assert_eq!(sm.active_id(), a);
        assert_eq!(sm.len(), 3);
    }

    #[test]
    fn test_open_missing_path_is_empty_and_bound() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        sm.open(&fs, Path::new("/w/new.txt")).unwrap();
        assert!(sm.active().buffer.is_empty());
        assert_eq!(sm.active().path(), Some(Path::new("/w/new.txt")));
    }

    #[test]
    fn test_open_directory_fails_without_new_tab() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        assert!(sm.open(&fs, Path::new("/w")).is_err());
        assert_eq!(sm.len(), 1);
    }

    #[test]
    fn test_open_untitled_by_name() {
        let mut sm = SessionManager::new();
        let first = sm.active_id();
        let second = sm.open_untitled(None);
        assert_eq!(sm.active().display_name(), "Untitled-2");
        assert_eq!(sm.open_untitled(Some("Untitled-1")), first);
        assert_ne!(first, second);
        assert_eq!(sm.len(), 2);
    }

    #[test]
    fn test_close_only_session_resets() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        let first = sm.active_id();
        sm.close(first);
        let id = sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        sm.close(id);
        assert_eq!(sm.len(), 1);

        // Only one left: reset rather than removed
        let only = sm.active_id();
        sm.active_mut().buffer.insert(0, "scratch");
        assert!(!sm.close(only));
        assert_eq!(sm.len(), 1);
        assert!(sm.active().buffer.is_empty());
        assert!(!sm.active().is_bound());
        assert!(!sm.active().is_dirty());
        assert_eq!(sm.active().display_name(), "Untitled-1");
    }

    #[test]
    fn test_close_adjusts_active() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        let a = sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        let n = sm.open(&fs, Path::new("/w/notes.txt")).unwrap();
        sm.focus(n);
        assert!(sm.close(a));
        assert_eq!(sm.active_id(), n);
        assert!(sm.close(n));
        assert_eq!(sm.active().display_name(), "Untitled-1");
    }

    #[test]
    fn test_dirty_and_save() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        sm.active_mut().buffer.insert(5, "!");
        assert!(sm.active().is_dirty());

        sm.active_mut().save(&fs).unwrap();
        assert!(!sm.active().is_dirty());
        assert_eq!(fs.contents(Path::new("/w/a.txt")).as_deref(), Some("alpha!"));
    }

    #[test]
    fn test_save_failure_keeps_dirty() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        sm.active_mut().buffer.insert(0, "x");
        fs.fail_on(FsOp::Write);
        assert!(sm.active_mut().save(&fs).is_err());
        assert!(sm.active().is_dirty());
    }

    #[test]
    fn test_rebind_file_and_directory() {
        let fs = fs_with_files();
        fs.add_file("/w/sub/inner.txt", "inner");
        let mut sm = SessionManager::new();
        let a = sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        let inner = sm.open(&fs, Path::new("/w/sub/inner.txt")).unwrap();

        assert_eq!(sm.rebind_paths(Path::new("/w/a.txt"), Path::new("/w/a2.txt")), 1);
        let session = sm.get(a).unwrap();
        assert_eq!(session.display_name(), "a2.txt");
        assert_eq!(session.buffer.to_string(), "alpha");

        sm.rebind_paths(Path::new("/w/sub"), Path::new("/w/moved"));
        assert_eq!(
            sm.get(inner).unwrap().path(),
            Some(Path::new("/w/moved/inner.txt"))
        );
    }

    #[test]
    fn test_rebind_releases_sessions_on_target() {
        let fs = fs_with_files();
        fs.add_file("/w/sub/a.txt", "old");
        let mut sm = SessionManager::new();
        let moved = sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        let held = sm.open(&fs, Path::new("/w/sub/a.txt")).unwrap();

        sm.rebind_paths(Path::new("/w/a.txt"), Path::new("/w/sub/a.txt"));
        let bound: Vec<_> = sm
            .iter()
            .filter(|s| s.path() == Some(Path::new("/w/sub/a.txt")))
            .map(|s| s.id)
            .collect();
        assert_eq!(bound, vec![moved]);

        let released = sm.get(held).unwrap();
        assert!(!released.is_bound());
        assert_eq!(released.display_name(), "Untitled-2");
        assert_eq!(released.buffer.to_string(), "old");
        assert_eq!(sm.open(&fs, Path::new("/w/sub/a.txt")).unwrap(), moved);
    }

    #[test]
    fn test_release_keeps_excepted_session() {
        let fs = fs_with_files();
        let mut sm = SessionManager::new();
        let a = sm.open(&fs, Path::new("/w/a.txt")).unwrap();
        assert_eq!(sm.release_paths(Path::new("/w"), Some(a)), 0);
        assert_eq!(sm.release_paths(Path::new("/w"), None), 1);
        assert!(!sm.get(a).unwrap().is_bound());
    }
}
