//! Line-oriented stand-in for a multi-line text box.
//!
//! Plain lines are appended to the query; a line that is exactly one of the
//! `/` commands (surrounding whitespace ignored) acts on it instead.

use super::constants::{CMD_CLEAR, CMD_PARSE, CMD_QUIT, CMD_SHOW};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// The query text changed; carries the full text.
    Edited(String),
    Submit,
    Redraw,
    Quit,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_line(&mut self, line: &str) -> InputAction {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        match line.trim() {
            CMD_PARSE => InputAction::Submit,
            CMD_SHOW => InputAction::Redraw,
            CMD_QUIT => InputAction::Quit,
            CMD_CLEAR => {
                self.buffer.clear();
                InputAction::Edited(String::new())
            }
            _ => {
                if !self.buffer.is_empty() {
                    self.buffer.push('\n');
                }
                self.buffer.push_str(line);
                InputAction::Edited(self.buffer.clone())
            }
        }
    }
}
