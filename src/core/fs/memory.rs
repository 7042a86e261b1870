//! In-memory filesystem for deterministic tests and dry runs
//!
//! Holds a tree of directories and UTF-8 files keyed by normalized absolute
//! path. Every call made through [`FileSystem`] is recorded so tests can
//! assert exactly which operations a command performed (or that it performed
//! none). Clones share the same tree, so a test can keep one handle while the
//! editor owns another.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use super::{EntryInfo, FileSystem, normalize};
use crate::error::{EditorError, EditorResult, FsOp};

/// A recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    List(PathBuf),
    Read(PathBuf),
    Write(PathBuf),
    Copy(PathBuf, PathBuf),
    Move(PathBuf, PathBuf),
    Rename(PathBuf, PathBuf),
    Delete(PathBuf),
    CreateDir(PathBuf),
    Stat(PathBuf),
    OpenShell(PathBuf, String),
}

impl FsCall {
    /// True for calls that change the tree
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            FsCall::Write(_)
                | FsCall::Copy(..)
                | FsCall::Move(..)
                | FsCall::Rename(..)
                | FsCall::Delete(_)
                | FsCall::CreateDir(_)
        )
    }
}

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(String),
}

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    stamp: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<PathBuf, Entry>,
    calls: Vec<FsCall>,
    failing: HashSet<FsOp>,
    clock: u64,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn check(&self, op: FsOp, target: &Path) -> EditorResult<()> {
        if self.failing.contains(&op) {
            return Err(EditorError::io(
                op,
                target,
                io::Error::other("injected failure"),
            ));
        }
        Ok(())
    }

    fn not_found(op: FsOp, target: &Path) -> EditorError {
        EditorError::io(
            op,
            target,
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.entries.get(path),
            Some(Entry {
                node: Node::Dir,
                ..
            })
        )
    }

    fn create_parents(&mut self, path: &Path) {
        let mut missing = Vec::new();
        let mut current = path.parent();
        while let Some(dir) = current {
            if self.entries.contains_key(dir) {
                break;
            }
            missing.push(dir.to_path_buf());
            current = dir.parent();
        }
        for dir in missing.into_iter().rev() {
            let stamp = self.tick();
            self.entries.insert(dir, Entry {
                node: Node::Dir,
                stamp,
            });
        }
    }

    /// The entry at `path` and everything below it
    fn subtree(&self, path: &Path) -> Vec<(PathBuf, Entry)> {
        self.entries
            .iter()
            .filter(|(p, _)| p.starts_with(path))
            .map(|(p, e)| (p.clone(), e.clone()))
            .collect()
    }

    fn remove_subtree(&mut self, path: &Path) {
        self.entries.retain(|p, _| !p.starts_with(path));
    }

    fn relocate(&mut self, op: FsOp, from: &Path, to: &Path, keep_source: bool) -> EditorResult<()> {
        let moved = self.subtree(from);
        if moved.is_empty() {
            return Err(Self::not_found(op, from));
        }
        self.create_parents(to);
        if !keep_source {
            self.remove_subtree(from);
        }
        self.remove_subtree(to);
        for (path, entry) in moved {
            let suffix = path.strip_prefix(from).unwrap_or(Path::new(""));
            let target = if suffix.as_os_str().is_empty() {
                to.to_path_buf()
            } else {
                to.join(suffix)
            };
            let stamp = self.tick();
            self.entries.insert(target, Entry {
                node: entry.node,
                stamp,
            });
        }
        Ok(())
    }
}

/// Shared handle to an in-memory tree rooted at `/`
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner.entries.insert(PathBuf::from("/"), Entry {
            node: Node::Dir,
            stamp: 0,
        });
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Seed a file (parents are created); not recorded as a call
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = normalize(path.as_ref());
        let mut inner = self.inner.borrow_mut();
        inner.create_parents(&path);
        let stamp = inner.tick();
        inner.entries.insert(path, Entry {
            node: Node::File(content.to_string()),
            stamp,
        });
    }

    /// Seed a directory (parents are created); not recorded as a call
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut inner = self.inner.borrow_mut();
        inner.create_parents(&path);
        let stamp = inner.tick();
        inner.entries.insert(path, Entry {
            node: Node::Dir,
            stamp,
        });
    }

    /// Current content of a file, bypassing call recording
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.inner.borrow().entries.get(path.as_ref()) {
            Some(Entry {
                node: Node::File(text),
                ..
            }) => Some(text.clone()),
            _ => None,
        }
    }

    /// Whether an entry exists, bypassing call recording
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.inner.borrow().entries.contains_key(path.as_ref())
    }

    pub fn calls(&self) -> Vec<FsCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn mutations(&self) -> Vec<FsCall> {
        self.calls().into_iter().filter(FsCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Make every subsequent call of `op` fail with an I/O error
    pub fn fail_on(&self, op: FsOp) {
        self.inner.borrow_mut().failing.insert(op);
    }

    fn record(&self, call: FsCall) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_directory(&self, path: &Path) -> EditorResult<Vec<String>> {
        self.record(FsCall::List(path.to_path_buf()));
        let inner = self.inner.borrow();
        inner.check(FsOp::List, path)?;
        if !inner.is_dir(path) {
            return Err(Inner::not_found(FsOp::List, path));
        }
        Ok(inner
            .entries
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    fn read_file(&self, path: &Path) -> EditorResult<String> {
        self.record(FsCall::Read(path.to_path_buf()));
        let inner = self.inner.borrow();
        inner.check(FsOp::Read, path)?;
        match inner.entries.get(path) {
            Some(Entry {
                node: Node::File(text),
                ..
            }) => Ok(text.clone()),
            _ => Err(Inner::not_found(FsOp::Read, path)),
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> EditorResult<()> {
        self.record(FsCall::Write(path.to_path_buf()));
        let mut inner = self.inner.borrow_mut();
        inner.check(FsOp::Write, path)?;
        let parent_ok = path.parent().is_some_and(|p| inner.is_dir(p));
        if !parent_ok || inner.is_dir(path) {
            return Err(Inner::not_found(FsOp::Write, path));
        }
        let stamp = inner.tick();
        inner.entries.insert(path.to_path_buf(), Entry {
            node: Node::File(content.to_string()),
            stamp,
        });
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> EditorResult<()> {
        self.record(FsCall::Copy(from.to_path_buf(), to.to_path_buf()));
        let mut inner = self.inner.borrow_mut();
        inner.check(FsOp::Copy, from)?;
        inner.relocate(FsOp::Copy, from, to, true)
    }

    fn move_item(&self, from: &Path, to: &Path) -> EditorResult<()> {
        self.record(FsCall::Move(from.to_path_buf(), to.to_path_buf()));
        let mut inner = self.inner.borrow_mut();
        inner.check(FsOp::Move, from)?;
        inner.relocate(FsOp::Move, from, to, false)
    }

    fn rename(&self, from: &Path, to: &Path) -> EditorResult<()> {
        self.record(FsCall::Rename(from.to_path_buf(), to.to_path_buf()));
        let mut inner = self.inner.borrow_mut();
        inner.check(FsOp::Rename, from)?;
        let parent_ok = to.parent().is_some_and(|p| inner.is_dir(p));
        if !parent_ok {
            return Err(Inner::not_found(FsOp::Rename, to));
        }
        inner.relocate(FsOp::Rename, from, to, false)
    }

    fn delete(&self, path: &Path) -> EditorResult<()> {
        self.record(FsCall::Delete(path.to_path_buf()));
        let mut inner = self.inner.borrow_mut();
        inner.check(FsOp::Delete, path)?;
        if !inner.entries.contains_key(path) || path.parent().is_none() {
            return Err(Inner::not_found(FsOp::Delete, path));
        }
        inner.remove_subtree(path);
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> EditorResult<()> {
        self.record(FsCall::CreateDir(path.to_path_buf()));
        let mut inner = self.inner.borrow_mut();
        inner.check(FsOp::CreateDir, path)?;
        if inner.entries.contains_key(path) {
            return Err(EditorError::io(
                FsOp::CreateDir,
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "File exists"),
            ));
        }
        let parent_ok = path.parent().is_some_and(|p| inner.is_dir(p));
        if !parent_ok {
            return Err(Inner::not_found(FsOp::CreateDir, path));
        }
        let stamp = inner.tick();
        inner.entries.insert(path.to_path_buf(), Entry {
            node: Node::Dir,
            stamp,
        });
        Ok(())
    }

    fn stat(&self, path: &Path) -> EditorResult<EntryInfo> {
        self.record(FsCall::Stat(path.to_path_buf()));
        let inner = self.inner.borrow();
        inner.check(FsOp::Stat, path)?;
        let entry = inner
            .entries
            .get(path)
            .ok_or_else(|| Inner::not_found(FsOp::Stat, path))?;
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(entry.stamp);
        let (size, is_dir) = match &entry.node {
            Node::Dir => (0, true),
            Node::File(text) => (text.len() as u64, false),
        };
        Ok(EntryInfo {
            size,
            created: Some(time),
            modified: Some(time),
            accessed: Some(time),
            is_dir,
        })
    }

    fn open_shell(&self, dir: &Path, shell: &str) -> EditorResult<()> {
        self.record(FsCall::OpenShell(dir.to_path_buf(), shell.to_string()));
        self.inner.borrow().check(FsOp::OpenShell, dir)
    }
}
