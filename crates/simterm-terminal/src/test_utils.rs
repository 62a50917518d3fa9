//! Shared test utilities for the terminal tests.
//!
//! Provides a [`MockDisplay`] that keeps a character grid and replays
//! scripted keys, and a [`RecordingSink`] that collects command output.

use std::collections::VecDeque;

use simterm_types::backend::DisplayBackend;
use simterm_types::error::{Result, TermError};
use simterm_types::input::KeyEvent;

use crate::interpreter::MessageSink;

/// Message sink that stores every line.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
    pub exit_requested: bool,
}

impl MessageSink for RecordingSink {
    fn log(&mut self, source: &str, message: &str) {
        self.lines.push(format!("{source}: {message}"));
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}

/// In-memory character-cell display.
pub struct MockDisplay {
    width: u16,
    height: u16,
    grid: Vec<Vec<char>>,
    pub cursor: (u16, u16),
    keys: VecDeque<Option<KeyEvent>>,
    pub started: bool,
    pub stopped: bool,
    pub scrolls: Vec<(u16, u16, u16)>,
    pub refreshes: usize,
}

impl MockDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            grid: vec![vec![' '; width as usize]; height as usize],
            cursor: (0, 0),
            keys: VecDeque::new(),
            started: false,
            stopped: false,
            scrolls: Vec::new(),
            refreshes: 0,
        }
    }

    /// Queue keys for `read_key`.
    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = KeyEvent>) {
        self.keys.extend(keys.into_iter().map(Some));
    }

    /// Queue one of the `Ok(None)` polls a real backend produces for
    /// unmapped input.
    pub fn push_unmapped(&mut self) {
        self.keys.push_back(None);
    }

    /// Change the size the way a terminal resize does. Rows past the new
    /// height are dropped from the bottom.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.grid.resize(height as usize, Vec::new());
        for line in &mut self.grid {
            line.resize(width as usize, ' ');
        }
    }

    /// Row contents with trailing blanks removed.
    pub fn row(&self, row: u16) -> String {
        self.grid[row as usize]
            .iter()
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    /// All rows, trailing blanks removed.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height).map(|r| self.row(r)).collect()
    }

    /// Non-blank rows from top to bottom.
    pub fn visible_lines(&self) -> Vec<String> {
        self.rows().into_iter().filter(|r| !r.is_empty()).collect()
    }
}

impl DisplayBackend for MockDisplay {
    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stopped = true;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Option<KeyEvent>> {
        self.keys
            .pop_front()
            .ok_or_else(|| TermError::Backend("mock display ran out of keys".to_string()))
    }

    fn put_text(&mut self, column: u16, row: u16, text: &str) -> Result<()> {
        let Some(line) = self.grid.get_mut(row as usize) else {
            return Err(TermError::Backend(format!("row {row} out of range")));
        };
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = line.get_mut(column as usize + i) {
                *cell = ch;
            }
        }
        Ok(())
    }

    fn set_cursor(&mut self, column: u16, row: u16) -> Result<()> {
        self.cursor = (column, row);
        Ok(())
    }

    fn scroll(&mut self, from_row: u16, to_row: u16, lines: u16) -> Result<()> {
        self.scrolls.push((from_row, to_row, lines));
        let from = from_row as usize;
        let to = (to_row as usize).min(self.grid.len());
        for _ in 0..lines {
            if from < to {
                self.grid[from..to].rotate_left(1);
                self.grid[to - 1] = vec![' '; self.width as usize];
            }
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
        self.refreshes += 1;
        Ok(())
    }
}
