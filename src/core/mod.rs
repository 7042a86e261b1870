//! This module constitutes the core, headless editing engine of texnav.
//! It manages document sessions, the command bar with its parser, dispatcher
//! and completion, find/replace state, and the filesystem collaborator the
//! file-manager commands run against.

pub mod app;
pub mod buffer;
pub mod command;
pub mod commands;
pub mod completion;
pub mod dispatcher;
pub mod fs;
pub mod id;
pub mod parser;
pub mod prompt;
pub mod search;
pub mod session;
pub mod snapshot;
pub mod utf8;
