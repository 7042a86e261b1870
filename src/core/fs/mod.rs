//! Filesystem collaborator
//!
//! The core never touches `std::fs` directly. Every listing, read, write and
//! file-manager operation goes through the [`FileSystem`] trait so that the
//! command layer can run against the real disk ([`LocalFileSystem`]) or a
//! deterministic in-memory tree ([`MemoryFileSystem`]).
//!
//! Calls are synchronous and never retried; a failure is surfaced once as
//! [`EditorError::Io`] carrying the attempted operation and target.

pub mod memory;

pub use memory::{FsCall, MemoryFileSystem};

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;

use crate::error::{EditorError, EditorResult, FsOp};

/// Metadata returned by [`FileSystem::stat`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub size: u64,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub is_dir: bool,
}

/// Contract the core needs from the filesystem
pub trait FileSystem {
    /// Names of the entries in a directory, sorted
    fn list_directory(&self, path: &Path) -> EditorResult<Vec<String>>;
    fn read_file(&self, path: &Path) -> EditorResult<String>;
    fn write_file(&self, path: &Path, content: &str) -> EditorResult<()>;
    /// Copy a file or a directory tree, creating missing parents of `to`
    fn copy(&self, from: &Path, to: &Path) -> EditorResult<()>;
    /// Move a file or directory, creating missing parents of `to`
    fn move_item(&self, from: &Path, to: &Path) -> EditorResult<()>;
    fn rename(&self, from: &Path, to: &Path) -> EditorResult<()>;
    /// Delete a file, or a directory and everything below it
    fn delete(&self, path: &Path) -> EditorResult<()>;
    fn create_dir(&self, path: &Path) -> EditorResult<()>;
    fn stat(&self, path: &Path) -> EditorResult<EntryInfo>;
    /// Launch an interactive shell in `dir` without waiting for it
    fn open_shell(&self, dir: &Path, shell: &str) -> EditorResult<()>;

    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_ok()
    }
}

/// Lexically normalize a path: drop `.`, resolve `..` without touching disk
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Resolve a user operand against the current directory
pub fn resolve(cwd: &Path, operand: &str) -> PathBuf {
    normalize(&cwd.join(operand))
}

/// Last path component as a display string
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The real disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(op: FsOp, to: &Path) -> EditorResult<()> {
        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EditorError::io(op, parent, e))?;
            }
        }
        Ok(())
    }

    /// Parent directory of `path`, `.` for a bare name
    fn parent_of(path: &Path) -> &Path {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
        // List before creating `to`, which may live inside `from`
        let entries = fs::read_dir(from)?.collect::<io::Result<Vec<_>>>()?;
        fs::create_dir(to)?;
        for entry in entries {
            let target = to.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                Self::copy_tree(&entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    fn copy_any(from: &Path, to: &Path) -> io::Result<()> {
        if from.is_dir() {
            Self::copy_tree(from, to)
        } else {
            fs::copy(from, to).map(|_| ())
        }
    }

    fn remove_any(path: &Path) -> io::Result<()> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }

    /// Unused sibling name that holds a replaced target until a move lands
    fn parking_spot(to: &Path) -> PathBuf {
        let name = file_name_of(to);
        (0u32..)
            .map(|n| to.with_file_name(format!(".{name}.texnav-old{n}")))
            .find(|p| fs::symlink_metadata(p).is_err())
            .unwrap_or_else(|| to.with_file_name(format!(".{name}.texnav-old")))
    }

    /// rename(2), or copy + delete when the two paths are on different devices
    fn relocate(from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {}
            other => return other,
        }
        tracing::debug!(from = %from.display(), to = %to.display(), "cross-device move, copying");

        if let Err(err) = Self::copy_any(from, to) {
            let _ = Self::remove_any(to);
            return Err(err);
        }
        if let Err(err) = Self::remove_any(from) {
            // A file source is untouched, so drop the copy. A directory may be
            // half removed; the complete copy at `to` is then the only full one.
            if from.is_file() {
                let _ = Self::remove_any(to);
            } else {
                tracing::warn!(from = %from.display(), "source directory partially removed");
            }
            return Err(err);
        }
        Ok(())
    }
}

impl FileSystem for LocalFileSystem {
    fn list_directory(&self, path: &Path) -> EditorResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| EditorError::io(FsOp::List, path, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EditorError::io(FsOp::List, path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn read_file(&self, path: &Path) -> EditorResult<String> {
        let bytes = fs::read(path).map_err(|e| EditorError::io(FsOp::Read, path, e))?;
        // Invalid UTF-8 is loaded lossily rather than refused
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> EditorResult<()> {
        let wrap = |e| EditorError::io(FsOp::Write, path, e);

        // Write to temp file first for atomic save
        let mut temp_file = NamedTempFile::new_in(Self::parent_of(path)).map_err(wrap)?;
        temp_file.write_all(content.as_bytes()).map_err(wrap)?;
        temp_file.flush().map_err(wrap)?;
        temp_file.as_file().sync_all().map_err(wrap)?;
        temp_file.persist(path).map_err(|e| wrap(e.error))?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> EditorResult<()> {
        Self::ensure_parent(FsOp::Copy, to)?;
        Self::copy_any(from, to).map_err(|e| EditorError::io(FsOp::Copy, from, e))
    }

    fn move_item(&self, from: &Path, to: &Path) -> EditorResult<()> {
        let wrap = |e| EditorError::io(FsOp::Move, from, e);
        Self::ensure_parent(FsOp::Move, to)?;

        // A confirmed target is parked next to itself and only removed once
        // the source has landed
        let parked = match fs::symlink_metadata(to) {
            Ok(_) => {
                let spot = Self::parking_spot(to);
                fs::rename(to, &spot).map_err(wrap)?;
                Some(spot)
            }
            Err(_) => None,
        };

        match (Self::relocate(from, to), parked) {
            (Ok(()), Some(spot)) => {
                if let Err(err) = Self::remove_any(&spot) {
                    tracing::warn!(path = %spot.display(), "cannot remove replaced item: {err}");
                }
                Ok(())
            }
            (Ok(()), None) => Ok(()),
            (Err(err), Some(spot)) => {
                if let Err(restore) = fs::rename(&spot, to) {
                    tracing::warn!(path = %spot.display(), "cannot restore replaced item: {restore}");
                }
                Err(wrap(err))
            }
            (Err(err), None) => Err(wrap(err)),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> EditorResult<()> {
        fs::rename(from, to).map_err(|e| EditorError::io(FsOp::Rename, from, e))
    }

    fn delete(&self, path: &Path) -> EditorResult<()> {
        Self::remove_any(path).map_err(|e| EditorError::io(FsOp::Delete, path, e))
    }

    fn create_dir(&self, path: &Path) -> EditorResult<()> {
        fs::create_dir(path).map_err(|e| EditorError::io(FsOp::CreateDir, path, e))
    }

    fn stat(&self, path: &Path) -> EditorResult<EntryInfo> {
        let metadata = fs::metadata(path).map_err(|e| EditorError::io(FsOp::Stat, path, e))?;
        Ok(EntryInfo {
            size: metadata.len(),
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
            accessed: metadata.accessed().ok(),
            is_dir: metadata.is_dir(),
        })
    }

    fn open_shell(&self, dir: &Path, shell: &str) -> EditorResult<()> {
        std::process::Command::new(shell)
            .current_dir(dir)
            .spawn()
            .map(|_| ())
            .map_err(|e| EditorError::io(FsOp::OpenShell, dir, e))
    }
}
