//! ID-based handle for sessions
//! Sessions are addressed by identifier, never discovered by traversal

use std::fmt;

/// Unique identifier for a document session (tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub usize);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({})", self.0)
    }
}
