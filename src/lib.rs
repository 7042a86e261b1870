//! texnav: a command-driven multi-document text editor with an integrated
//! file manager.
//!
//! The editing engine lives in [`core`]; [`run`] drives it from a line
//! front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod run;
pub mod user_config;
