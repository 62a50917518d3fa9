//! Display backend trait.
//!
//! A backend is both the screen the shell draws on and the source of its
//! keystrokes. The line editor dispatches all terminal I/O through this trait
//! boundary and never calls platform-specific APIs.

use crate::error::Result;
use crate::input::KeyEvent;

/// Character-cell display plus blocking key source.
///
/// Coordinates are zero-based `(column, row)` cells.
pub trait DisplayBackend {
    /// Take over the screen (raw mode, alternate buffer, ...).
    fn start(&mut self) -> Result<()>;

    /// Give the screen back.
    fn stop(&mut self) -> Result<()>;

    /// Block until the next key arrives.
    ///
    /// Returns `Ok(None)` for input that does not map to a [`KeyEvent`]
    /// (mouse, resize, unbound keys); callers just poll again.
    fn read_key(&mut self) -> Result<Option<KeyEvent>>;

    /// Write `text` starting at the given cell.
    fn put_text(&mut self, column: u16, row: u16, text: &str) -> Result<()>;

    /// Move the visible cursor.
    fn set_cursor(&mut self, column: u16, row: u16) -> Result<()>;

    /// Scroll rows `from_row..to_row` up by `lines`, blanking the rows
    /// uncovered at the bottom.
    fn scroll(&mut self, from_row: u16, to_row: u16, lines: u16) -> Result<()>;

    /// Screen width in columns.
    fn width(&self) -> u16;

    /// Screen height in rows.
    fn height(&self) -> u16;

    /// Push pending output to the screen.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }
}
