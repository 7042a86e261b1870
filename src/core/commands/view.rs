//! Presentation settings shared by every tab

use crate::core::app::EditorApp;
use crate::core::command::Command;
use crate::core::dispatcher::DispatchResult;
use crate::core::parser::CommandLine;
use crate::error::{EditorError, EditorResult};

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;

/// `:fs <size>` change the editor font size
#[derive(Clone)]
pub struct FontSize;

impl Command for FontSize {
    fn execute(&self, app: &mut EditorApp, cmd: &CommandLine) -> EditorResult<DispatchResult> {
        let operand = cmd.require_operand()?;
        let size = operand
            .parse::<u32>()
            .ok()
            .filter(|size| (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(size))
            .ok_or_else(|| EditorError::invalid_syntax(&cmd.verb, ":fs <size> (8-72)"))?;
        app.font_size = size;
        Ok(DispatchResult::Info(format!("Font size changed to {size}.")))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::app::EditorApp;
    use crate::core::dispatcher::DispatchResult;
    use crate::core::fs::MemoryFileSystem;
    use crate::error::ErrorKind;

    #[test]
    fn test_font_size_bounds() {
        let mut app = EditorApp::new(Box::new(MemoryFileSystem::new()), "/".into());
        assert_eq!(
            app.execute_line(":fs 8"),
            DispatchResult::Info("Font size changed to 8.".into())
        );
        assert_eq!(app.execute_line(":fs 72"), DispatchResult::Info("Font size changed to 72.".into()));
        for bad in [":fs 7", ":fs 73", ":fs big", ":fs -1"] {
            assert_eq!(
                app.execute_line(bad),
                DispatchResult::Failed(ErrorKind::InvalidCommandSyntax)
            );
        }
        assert_eq!(app.font_size, 72);
        assert_eq!(app.snapshot().font_size, 72);
    }
}
