//! Crossterm backend for simterm.
//!
//! Implements `DisplayBackend` on the process's own terminal: raw mode and
//! the alternate screen while a session runs, cursor-addressed writes, and
//! blocking key reads mapped to simterm key events.

use std::fmt;
use std::io::{self, Stdout, Write};

use crossterm::cursor::{MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, ScrollUp,
};
use crossterm::{Command, execute, queue};

use simterm_types::backend::DisplayBackend;
use simterm_types::error::Result;
use simterm_types::input::KeyEvent;

/// Display backend drawing on stdout.
pub struct CrosstermBackend {
    out: Stdout,
    width: u16,
    height: u16,
    active: bool,
}

impl CrosstermBackend {
    /// Create a backend sized to the current terminal.
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        log::debug!("Terminal size {width}x{height}");
        Ok(Self {
            out: io::stdout(),
            width,
            height,
            active: false,
        })
    }

    fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.out, Show, LeaveAlternateScreen)
    }
}

impl DisplayBackend for CrosstermBackend {
    fn start(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Clear(ClearType::All), MoveTo(0, 0))?;
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            self.restore()?;
        }
        Ok(())
    }

    fn read_key(&mut self) -> Result<Option<KeyEvent>> {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key)),
            Event::Resize(width, height) => {
                log::debug!("Terminal resized to {width}x{height}");
                self.width = width;
                self.height = height;
                Ok(None)
            },
            _ => Ok(None),
        }
    }

    fn put_text(&mut self, column: u16, row: u16, text: &str) -> Result<()> {
        queue!(self.out, MoveTo(column, row), Print(text))?;
        Ok(())
    }

    fn set_cursor(&mut self, column: u16, row: u16) -> Result<()> {
        queue!(self.out, MoveTo(column, row))?;
        Ok(())
    }

    fn scroll(&mut self, from_row: u16, to_row: u16, lines: u16) -> Result<()> {
        if from_row == 0 && to_row >= self.height {
            queue!(self.out, ScrollUp(lines))?;
        } else {
            queue!(
                self.out,
                SetScrollRegion {
                    top: from_row,
                    bottom: to_row,
                },
                ScrollUp(lines),
                ResetScrollRegion
            )?;
        }
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn refresh(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            if let Err(e) = self.restore() {
                log::warn!("Failed to restore terminal: {e}");
            }
        }
    }
}

/// Limit scrolling to rows `top..bottom` (DECSTBM).
struct SetScrollRegion {
    top: u16,
    bottom: u16,
}

impl Command for SetScrollRegion {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{};{}r", self.top + 1, self.bottom)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::other("scroll regions need ANSI support"))
    }
}

/// Restore full-screen scrolling.
struct ResetScrollRegion;

impl Command for ResetScrollRegion {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[r")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::other("scroll regions need ANSI support"))
    }
}

/// Map a crossterm key press to a simterm key event.
///
/// Ctrl+C maps to Escape so the session can always be left. Other control
/// chords and unbound keys map to `None`.
pub fn map_key(key: event::KeyEvent) -> Option<KeyEvent> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyEvent::Escape)
        },
        KeyCode::Char(_)
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            None
        },
        KeyCode::Char(ch) => Some(KeyEvent::Character(ch)),
        KeyCode::Backspace => Some(KeyEvent::Backspace),
        KeyCode::Delete => Some(KeyEvent::Delete),
        KeyCode::Left => Some(KeyEvent::ArrowLeft),
        KeyCode::Right => Some(KeyEvent::ArrowRight),
        KeyCode::Up => Some(KeyEvent::ArrowUp),
        KeyCode::Down => Some(KeyEvent::ArrowDown),
        KeyCode::Tab => Some(KeyEvent::Tab),
        KeyCode::Enter => Some(KeyEvent::Enter),
        KeyCode::Esc => Some(KeyEvent::Escape),
        _ => None,
    }
}
