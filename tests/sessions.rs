//! Session bookkeeping across navigation, saving and file management

use std::path::{Path, PathBuf};

use texnav::core::app::EditorApp;
use texnav::core::dispatcher::{DispatchResult, InputAction};
use texnav::core::fs::MemoryFileSystem;

fn workspace() -> (EditorApp, MemoryFileSystem) {
    let fs = MemoryFileSystem::new();
    fs.add_file("/w/a.txt", "alpha");
    fs.add_file("/w/b.txt", "beta");
    fs.add_dir("/w/docs");
    fs.add_file("/w/docs/guide.md", "# guide");
    let app = EditorApp::new(Box::new(fs.clone()), PathBuf::from("/w"));
    (app, fs)
}

/// At most one session per path, and always one active session
fn assert_session_invariants(app: &EditorApp) {
    assert!(!app.sessions.is_empty());
    let mut paths: Vec<&Path> = app.sessions.iter().filter_map(|s| s.path()).collect();
    let total = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), total, "two sessions share a path");
    let active = app.sessions.active_id();
    assert!(app.sessions.get(active).is_some());
}

#[test]
fn opening_twice_focuses_the_existing_session() {
    let (mut app, _fs) = workspace();
    app.execute_line("a.txt");
    app.execute_line("b.txt");
    app.execute_line("a.txt");
    assert_eq!(app.sessions.len(), 3);
    assert_eq!(app.sessions.active().display_name(), "a.txt");
    assert_session_invariants(&app);

    // Same file reached through a different relative path
    app.execute_line("docs");
    app.execute_line("../a.txt");
    assert_eq!(app.sessions.len(), 3);
    assert_session_invariants(&app);
}

#[test]
fn rename_keeps_unsaved_edits_on_the_retitled_tab() {
    let (mut app, fs) = workspace();
    app.execute_line("a.txt");
    app.insert_text("edited ");
    let id = app.sessions.active_id();

    let result = app.execute_line(":re a.txt -> a2.txt");
    assert_eq!(
        result,
        DispatchResult::Info("'a.txt' has been renamed to 'a2.txt'.".into())
    );

    let session = app.sessions.get(id).unwrap();
    assert_eq!(session.display_name(), "a2.txt");
    assert_eq!(session.path(), Some(Path::new("/w/a2.txt")));
    assert!(session.is_dirty());
    assert_eq!(session.buffer.to_string(), "edited alpha");
    assert!(!fs.contains("/w/a.txt"));
    assert_eq!(fs.contents("/w/a2.txt").as_deref(), Some("alpha"));

    app.execute_line(":s");
    assert_eq!(fs.contents("/w/a2.txt").as_deref(), Some("edited alpha"));
    assert!(!app.sessions.get(id).unwrap().is_dirty());
    assert_session_invariants(&app);
}

#[test]
fn moving_a_directory_rebinds_sessions_inside_it() {
    let (mut app, fs) = workspace();
    app.execute_line("docs");
    app.execute_line("guide.md");
    let id = app.sessions.active_id();
    app.execute_line("..");

    app.execute_line(":newd archive");
    let result = app.execute_line(":move docs -> archive");
    assert_eq!(
        result,
        DispatchResult::Info("'docs' has been moved to 'archive'.".into())
    );
    assert!(fs.contains("/w/archive/docs/guide.md"));
    assert_eq!(
        app.sessions.get(id).unwrap().path(),
        Some(Path::new("/w/archive/docs/guide.md"))
    );
    assert_session_invariants(&app);
}

#[test]
fn untitled_save_prompts_and_binds() {
    let (mut app, fs) = workspace();
    app.insert_text("fresh");
    assert_eq!(
        app.execute_line(":s"),
        DispatchResult::NeedsInput {
            prompt: "Save as: ".into(),
            action: InputAction::SaveAs,
        }
    );
    app.execute_line("fresh.txt");
    assert_eq!(fs.contents("/w/fresh.txt").as_deref(), Some("fresh"));
    assert_eq!(app.sessions.active().display_name(), "fresh.txt");

    // Opening the saved file focuses the now-bound session
    let before = app.sessions.len();
    app.execute_line("fresh.txt");
    assert_eq!(app.sessions.len(), before);
    assert_session_invariants(&app);
}

#[test]
fn closing_every_tab_leaves_one_untitled() {
    let (mut app, _fs) = workspace();
    app.execute_line("a.txt");
    app.execute_line("b.txt");
    for _ in 0..5 {
        app.execute_line(":q");
        assert_session_invariants(&app);
    }
    assert_eq!(app.sessions.len(), 1);
    assert_eq!(app.sessions.active().display_name(), "Untitled-1");
    assert!(!app.sessions.active().is_bound());
}

#[test]
fn new_file_is_not_written_until_saved() {
    let (mut app, fs) = workspace();
    app.execute_line(":new later.txt");
    assert_eq!(app.sessions.active().display_name(), "later.txt");
    assert!(!fs.contains("/w/later.txt"));

    app.insert_text("now");
    app.execute_line(":s");
    assert_eq!(fs.contents("/w/later.txt").as_deref(), Some("now"));
}
