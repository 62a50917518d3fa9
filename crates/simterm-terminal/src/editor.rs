//! Key-driven line editor.
//!
//! The editor owns the prompt line at the bottom of the transcript. Each key
//! event edits the input buffer, recalls history, prints completions or
//! submits the line to the command registry; afterwards the prompt line is
//! redrawn and the display cursor placed at the edit position.

use simterm_types::backend::DisplayBackend;
use simterm_types::config::TerminalConfig;
use simterm_types::error::Result;
use simterm_types::input::KeyEvent;

use crate::buffer::InputBuffer;
use crate::history::History;
use crate::interpreter::{CommandRegistry, MessageSink, Params, split_command_line};

const EXIT_MESSAGE: &str = "Exiting terminal ...";

/// Handle for removing an exit listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Output collected while a command runs.
#[derive(Default)]
struct CommandOutput {
    lines: Vec<String>,
    exit_requested: bool,
}

impl MessageSink for CommandOutput {
    fn log(&mut self, source: &str, message: &str) {
        self.lines.push(format!("{source}: {message}"));
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}

/// Interactive input state machine over a [`DisplayBackend`].
pub struct LineEditor<D: DisplayBackend> {
    display: D,
    registry: CommandRegistry,
    prompt: String,
    completion_limit: usize,
    history: History,
    /// Browsing index into `history`; `history.len()` means "nothing recalled".
    history_cursor: usize,
    buffer: InputBuffer,
    /// Display row holding the prompt line.
    input_row: u16,
    running: bool,
    listeners: Vec<(ListenerId, Box<dyn FnMut()>)>,
    next_listener: u64,
}

impl<D: DisplayBackend> LineEditor<D> {
    pub fn new(display: D, registry: CommandRegistry, config: &TerminalConfig) -> Self {
        Self {
            display,
            registry,
            prompt: config.prompt.clone(),
            completion_limit: config.completion_limit,
            history: History::new(config.history_capacity),
            history_cursor: 0,
            buffer: InputBuffer::new(),
            input_row: 0,
            running: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt text. Takes effect on the next redraw.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_cursor(&self) -> usize {
        self.history_cursor
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Call `listener` when the terminal exits.
    pub fn add_exit_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_exit_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Run the interactive session until the terminal exits.
    ///
    /// Does nothing if a session is already running.
    pub fn run(&mut self) -> Result<()> {
        if self.running {
            return Ok(());
        }
        self.running = true;
        self.history_cursor = self.history.len();
        self.display.start()?;
        log::info!(
            "Terminal session started ({}x{})",
            self.display.width(),
            self.display.height()
        );

        let result = self.event_loop();
        self.running = false;
        let stopped = self.display.stop();
        log::info!("Terminal session ended");
        result.and(stopped)
    }

    fn event_loop(&mut self) -> Result<()> {
        self.redraw()?;
        while self.running {
            if let Some(key) = self.display.read_key()? {
                self.handle_key(key)?;
            }
        }
        Ok(())
    }

    /// Apply one key event and redraw the prompt line.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        log::trace!("key {key:?}");
        match key {
            KeyEvent::Character(ch) => self.buffer.insert(ch),
            KeyEvent::Backspace => {
                if self.buffer.backspace() {
                    self.clear_cell_after_input()?;
                }
            },
            KeyEvent::Delete => {
                if self.buffer.delete() {
                    self.clear_cell_after_input()?;
                }
            },
            KeyEvent::ArrowLeft => self.buffer.move_left(),
            KeyEvent::ArrowRight => self.buffer.move_right(),
            KeyEvent::ArrowUp => {
                self.history_cursor = self.history_cursor.saturating_sub(1);
                self.recall_history();
            },
            KeyEvent::ArrowDown => {
                let newest = self.history.len().saturating_sub(1);
                self.history_cursor = (self.history_cursor + 1).min(newest);
                self.recall_history();
            },
            KeyEvent::Tab => self.show_predictions()?,
            KeyEvent::Enter => self.submit()?,
            KeyEvent::Escape => self.exit()?,
        }
        self.redraw()
    }

    /// Print the exit notice, notify listeners and stop the session.
    pub fn exit(&mut self) -> Result<()> {
        self.message(EXIT_MESSAGE)?;
        for (_, listener) in &mut self.listeners {
            listener();
        }
        self.running = false;
        Ok(())
    }

    /// Blank the cell vacated by a deletion.
    fn clear_cell_after_input(&mut self) -> Result<()> {
        self.clamp_input_row();
        let column = to_cell(self.prompt_len() + self.buffer.len());
        self.display.put_text(column, self.input_row, " ")
    }

    fn recall_history(&mut self) {
        if let Some(entry) = self.history.get(self.history_cursor) {
            let cursor = self.buffer.cursor();
            self.buffer = InputBuffer::from(entry).with_cursor(cursor);
        }
    }

    fn show_predictions(&mut self) -> Result<()> {
        let text = self.buffer.text();
        let predictions = self.registry.predictions(&text, self.completion_limit);
        self.message(&format!("{}{text}", self.prompt))?;
        for prediction in &predictions {
            self.message(prediction)?;
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<()> {
        let text = self.buffer.text();
        let command = text.trim();
        if !command.is_empty() {
            self.message(&format!("{}{command}", self.prompt))?;
            self.execute(command)?;
            self.history.add(command);
            self.history_cursor = self.history.len();
        }
        self.buffer = InputBuffer::new();
        Ok(())
    }

    /// Dispatch a command line and render its output and any error.
    fn execute(&mut self, command: &str) -> Result<()> {
        let (name, values) = split_command_line(command);
        let mut output = CommandOutput::default();
        let result = {
            let mut params = Params::new(values, &mut output);
            self.registry.dispatch(name, &mut params)
        };

        for line in &output.lines {
            self.message(line)?;
        }
        if let Err(e) = result {
            log::debug!("{command}: {}", e.to_message_line());
            self.message(&e.to_message_line())?;
        }
        if output.exit_requested {
            self.exit()?;
        }
        Ok(())
    }

    /// Write a message above the prompt line, wrapping at the display width
    /// and scrolling once the bottom row is reached.
    fn message(&mut self, message: &str) -> Result<()> {
        let width = usize::from(self.display.width());
        for chunk in wrap_message(message, width) {
            self.put_line(&chunk)?;
            self.input_row += 1;
            let height = self.display.height();
            if self.input_row > height.saturating_sub(1) {
                self.display.scroll(0, height, 1)?;
                self.input_row -= 1;
            }
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let line = format!("{}{}", self.prompt, self.buffer.text());
        self.put_line(&line)?;
        let column = to_cell(self.prompt_len() + self.buffer.cursor());
        self.display.set_cursor(column, self.input_row)?;
        self.display.refresh()
    }

    /// Keep the prompt row on screen after the display shrinks.
    fn clamp_input_row(&mut self) {
        let last = self.display.height().saturating_sub(1);
        self.input_row = self.input_row.min(last);
    }

    /// Write `text` on the current row, blanking the rest of it.
    fn put_line(&mut self, text: &str) -> Result<()> {
        self.clamp_input_row();
        let width = usize::from(self.display.width());
        let len = text.chars().count();
        if len < width {
            let padded = format!("{text}{}", " ".repeat(width - len));
            self.display.put_text(0, self.input_row, &padded)
        } else {
            self.display.put_text(0, self.input_row, text)
        }
    }

    fn prompt_len(&self) -> usize {
        self.prompt.chars().count()
    }
}

fn to_cell(offset: usize) -> u16 {
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Split `message` into chunks of at most `width` characters.
///
/// An empty message yields no lines; a zero width disables wrapping.
pub fn wrap_message(message: &str, width: usize) -> Vec<String> {
    if message.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![message.to_string()];
    }
    let chars: Vec<char> = message.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
