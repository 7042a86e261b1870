//! Line front end: one stdin line per submitted command-bar line.
//!
//! Lines starting with a backslash are front-end directives standing in for
//! the keys a graphical front end would have:
//!
//! - `\i TEXT` inserts TEXT and a newline at the cursor
//! - `\p` prints the active document
//! - `\t LINE` puts LINE in the command bar and presses Tab
//! - `\w` completes the word before the cursor
//! - `\q` leaves the editor (so does end of input)

use std::io::{self, BufRead, Write};

use crate::core::app::{EditorApp, MessageKind};
use crate::core::completion::WordCompletion;
use crate::core::snapshot::ViewSnapshot;

/// Drive `app` from `input` until `\q` or end of input
pub fn run_repl<R: BufRead, W: Write>(app: &mut EditorApp, input: R, out: &mut W) -> io::Result<()> {
    write!(out, "{}", render(&app.snapshot()))?;
    for line in input.lines() {
        let line = line?;
        match line.strip_prefix('\\') {
            Some("q") => break,
            Some(directive) => directive_line(app, directive, out)?,
            None => {
                app.set_input(&line);
                app.submit();
            }
        }
        write!(out, "{}", render(&app.snapshot()))?;
        out.flush()?;
    }
    tracing::debug!("input closed");
    Ok(())
}

fn directive_line<W: Write>(app: &mut EditorApp, directive: &str, out: &mut W) -> io::Result<()> {
    let (name, arg) = directive.split_once(' ').unwrap_or((directive, ""));
    match name {
        "i" => app.insert_text(&format!("{arg}\n")),
        "p" => {
            let text = app.sessions.active().buffer.to_string();
            writeln!(out, "{text}")?;
        }
        "t" => {
            app.set_input(arg);
            app.autofill();
            writeln!(out, "{}", app.input())?;
        }
        "w" => match app.complete_word() {
            WordCompletion::Listed(words) => writeln!(out, "{}", words.join(" "))?,
            WordCompletion::NoPrefix | WordCompletion::NoCandidates => {
                writeln!(out, "(no completion)")?
            }
            WordCompletion::Extended { text, .. } | WordCompletion::Cycled { text, .. } => {
                writeln!(out, "{text}")?
            }
        },
        other => writeln!(out, "unknown directive: \\{other}")?,
    }
    Ok(())
}

/// Text form of one frame
pub fn render(view: &ViewSnapshot) -> String {
    let mut frame = String::new();
    let tabs: Vec<String> = view
        .tabs
        .iter()
        .map(|tab| {
            let dirty = if tab.dirty { "*" } else { "" };
            if tab.active {
                format!("[{}{dirty}]", tab.title)
            } else {
                format!(" {}{dirty} ", tab.title)
            }
        })
        .collect();
    frame.push_str(&tabs.join("|"));
    frame.push('\n');

    let (line, col) = view.cursor;
    frame.push_str(&format!(
        "{} ({}:{})",
        view.current_dir.display(),
        line + 1,
        col + 1
    ));
    if !view.highlights.is_empty() {
        frame.push_str(&format!(" {} match(es)", view.highlights.len()));
    }
    frame.push('\n');

    if let Some(message) = &view.message {
        let tag = match message.kind {
            MessageKind::Info => "",
            MessageKind::Error => "error: ",
        };
        frame.push_str(&format!("{tag}{}\n", message.text));
    }
    if !view.suggestions.is_empty() {
        frame.push_str(&format!("  {}\n", view.suggestions.join("  ")));
    }
    match &view.prompt {
        Some(prompt) => frame.push_str(&format!("{prompt} ")),
        None => frame.push_str("> "),
    }
    frame
}
