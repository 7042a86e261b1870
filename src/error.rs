//! Error types shared by the command layer and the filesystem collaborator.
//!
//! Every failure a command can produce is an [`EditorError`]. They are all
//! recovered at the dispatch boundary in [`EditorApp`](crate::core::app::EditorApp),
//! where each one becomes exactly one user-facing message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result alias used throughout the core
pub type EditorResult<T> = Result<T, EditorError>;

/// Filesystem operation attempted when an I/O failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    List,
    Read,
    Write,
    Copy,
    Move,
    Rename,
    Delete,
    Stat,
    CreateDir,
    OpenShell,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsOp::List => "list",
            FsOp::Read => "read",
            FsOp::Write => "write",
            FsOp::Copy => "copy",
            FsOp::Move => "move",
            FsOp::Rename => "rename",
            FsOp::Delete => "delete",
            FsOp::Stat => "stat",
            FsOp::CreateDir => "create directory",
            FsOp::OpenShell => "open shell in",
        };
        f.write_str(name)
    }
}

/// Errors produced while parsing or executing a command
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command ':{command}' requires an argument")]
    MissingArgument { command: String },

    #[error("Invalid command. Use format: {usage}")]
    InvalidCommandSyntax { command: String, usage: String },

    #[error("The file or directory '{}' does not exist.", .0.display())]
    PathNotFound(PathBuf),

    #[error("A file or directory named '{}' already exists.", .0.display())]
    PathAlreadyExists(PathBuf),

    #[error("The destination '{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to {op} '{}': {source}", .target.display())]
    Io {
        op: FsOp,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Discriminant of [`EditorError`], comparable and copyable for dispatch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownCommand,
    MissingArgument,
    InvalidCommandSyntax,
    PathNotFound,
    PathAlreadyExists,
    NotADirectory,
    IoFailure,
}

impl EditorError {
    /// Wrap an I/O error with the operation and target it belongs to
    pub fn io(op: FsOp, target: impl Into<PathBuf>, source: io::Error) -> Self {
        EditorError::Io {
            op,
            target: target.into(),
            source,
        }
    }

    pub fn invalid_syntax(command: &str, usage: &str) -> Self {
        EditorError::InvalidCommandSyntax {
            command: command.to_string(),
            usage: usage.to_string(),
        }
    }

    pub fn missing_argument(command: &str) -> Self {
        EditorError::MissingArgument {
            command: command.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EditorError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            EditorError::MissingArgument { .. } => ErrorKind::MissingArgument,
            EditorError::InvalidCommandSyntax { .. } => ErrorKind::InvalidCommandSyntax,
            EditorError::PathNotFound(_) => ErrorKind::PathNotFound,
            EditorError::PathAlreadyExists(_) => ErrorKind::PathAlreadyExists,
            EditorError::NotADirectory(_) => ErrorKind::NotADirectory,
            EditorError::Io { .. } => ErrorKind::IoFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = EditorError::UnknownCommand("zz".to_string());
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);

        let err = EditorError::io(
            FsOp::Delete,
            "a.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn test_messages() {
        let err = EditorError::PathNotFound(PathBuf::from("missing.txt"));
        assert_eq!(
            err.to_string(),
            "The file or directory 'missing.txt' does not exist."
        );

        let err = EditorError::invalid_syntax("move", ":move source -> destination");
        assert_eq!(
            err.to_string(),
            "Invalid command. Use format: :move source -> destination"
        );

        let err = EditorError::io(
            FsOp::Rename,
            "a.txt",
            io::Error::new(io::ErrorKind::Other, "busy"),
        );
        assert_eq!(err.to_string(), "Failed to rename 'a.txt': busy");
    }
}
