//! Command implementations for the texnav command bar
//!
//! Commands are organized into logical sub-modules:
//!
//! - **control**: Session control (`:q`, `:s`, `:sq`, `:cmd`)
//! - **file**: Creation, deletion and inspection (`:new`, `:newd`, `:del`, `:info`)
//! - **manage**: Two-operand file management (`:re`, `:copy`, `:move`)
//! - **search**: Find and replace (`:f`, `:fr`, `:n`, `:r`, `:ra`, `:case`, `:esc`)
//! - **view**: Shared presentation settings (`:fs`)
//!
//! All commands implement the [`Command`](crate::core::command::Command) trait,
//! which defines a uniform interface for command execution.

/// Session control
pub mod control;
/// File and directory operations
pub mod file;
/// Rename, copy and move
pub mod manage;
/// Find and replace
pub mod search;
/// Font size
pub mod view;

/// Verbs that take a path operand (completed in path mode)
pub const PATH_VERBS: &[&str] = &["del", "info"];

/// Verbs that take `source -> destination` path operands
pub const ARROW_VERBS: &[&str] = &["re", "copy", "move"];

/// Register all commands in the application
pub fn register_all(app: &mut crate::core::app::EditorApp) {
    use crate::core::command::Command;
    use std::collections::HashMap;

    use self::control::*;
    use self::file::*;
    use self::manage::*;
    use self::search::*;
    use self::view::*;

    let mut registry: HashMap<String, Box<dyn Command>> = HashMap::new();

    // Session control
    registry.insert("q".to_string(), Box::new(Quit));
    registry.insert("s".to_string(), Box::new(Save));
    registry.insert("sq".to_string(), Box::new(SaveAndQuit));
    registry.insert("cmd".to_string(), Box::new(OpenShell));

    // File manager
    registry.insert("new".to_string(), Box::new(NewFile));
    registry.insert("newd".to_string(), Box::new(NewDirectory));
    registry.insert("del".to_string(), Box::new(Delete));
    registry.insert("info".to_string(), Box::new(ItemInfo));
    registry.insert("re".to_string(), Box::new(RenameItem));
    registry.insert("copy".to_string(), Box::new(CopyItem));
    registry.insert("move".to_string(), Box::new(MoveItem));

    // Find / replace
    registry.insert("f".to_string(), Box::new(Find));
    registry.insert("fr".to_string(), Box::new(FindReplace));
    registry.insert("n".to_string(), Box::new(FindNext));
    registry.insert("r".to_string(), Box::new(ReplaceOne));
    registry.insert("ra".to_string(), Box::new(ReplaceAll));
    registry.insert("case".to_string(), Box::new(ToggleCase));
    registry.insert("esc".to_string(), Box::new(EndSearch));

    // View
    registry.insert("fs".to_string(), Box::new(FontSize));

    app.command_registry = registry;
}
