//! Command Pattern implementation for the command bar
//!
//! Every `:verb` is a small struct implementing [`Command`], registered by
//! name in [`register_all`](crate::core::commands::register_all). The
//! dispatcher looks the verb up and hands it the parsed [`CommandLine`].
//!
//! A command must validate everything it can before its first side effect:
//! when it returns an error, session, search and suggestion state are as
//! they were before the call.

use crate::core::app::EditorApp;
use crate::core::dispatcher::DispatchResult;
use crate::core::parser::CommandLine;
use crate::error::EditorResult;

/// Core command trait
pub trait Command: Send + Sync + CloneCommand {
    /// Execute the command with its parsed arguments
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult>;
}

/// Helper trait for cloning boxed commands
/// This trait is automatically implemented for all Command types
pub trait CloneCommand {
    /// Create a boxed clone of this command
    fn clone_box(&self) -> Box<dyn Command>;
}

impl<T> CloneCommand for T
where
    T: 'static + Command + Clone,
{
    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Command> {
    fn clone(&self) -> Box<dyn Command> {
        self.as_ref().clone_box()
    }
}
