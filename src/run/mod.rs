//! Front ends that drive the editor core.
//!
//! texnav ships a single line-oriented front end: every stdin line is one
//! submitted command-bar line, and the resulting view is printed to stdout.

mod repl;

use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::app::EditorApp;
use crate::core::fs::LocalFileSystem;

pub use repl::{render, run_repl};

/// Run the line front end on the real filesystem.
pub fn run_line_mode(
    files: &[PathBuf],
    config: Config,
    start_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = EditorApp::with_config(config, Box::new(LocalFileSystem::new()), start_dir);
    open_files(&mut app, files);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl(&mut app, stdin.lock(), &mut stdout.lock())?;
    Ok(())
}

/// Open start-up files as sessions; a file that does not exist yet gets an
/// empty session bound to its path.
pub fn open_files(app: &mut EditorApp, files: &[PathBuf]) {
    for file in files {
        let path = app.resolve(&file.to_string_lossy());
        if app.fs.exists(&path) {
            app.open(&path);
        } else if let Err(err) = app.sessions.open(app.fs.as_ref(), &path) {
            tracing::warn!("cannot open {}: {err}", path.display());
            app.set_error(err.to_string());
        }
    }
}
