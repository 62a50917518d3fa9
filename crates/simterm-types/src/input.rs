//! Platform-agnostic key event types.
//!
//! Every backend maps its native keystrokes to [`KeyEvent`]. The line editor
//! never sees raw terminal input.

/// A single decoded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// Printable character typed.
    Character(char),
    /// Delete the character left of the cursor.
    Backspace,
    /// Delete the character under the cursor.
    Delete,
    ArrowLeft,
    ArrowRight,
    /// Recall an older history entry.
    ArrowUp,
    /// Recall a newer history entry.
    ArrowDown,
    /// Request completions for the current input.
    Tab,
    /// Submit the current input.
    Enter,
    /// Leave the terminal.
    Escape,
}
