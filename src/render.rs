//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the REPL does
//! not care where turns end up.  The default implementation writes to stdout
//! with optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{Author, Transcript, Turn};

/// ANSI escape code for dim text (used for the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for author labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for agent turns).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Frames of the typing indicator.
const TYPING_FRAMES: [&str; 3] = [".  ", ".. ", "..."];

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print one turn; `agent_name` labels agent turns.
    fn print_turn(&mut self, turn: &Turn, agent_name: &str);

    /// Print every turn, oldest first.
    fn print_transcript(&mut self, transcript: &Transcript, agent_name: &str) {
        for turn in transcript {
            self.print_turn(turn, agent_name);
        }
    }

    /// Draw frame `frame` of the typing indicator in place.
    fn print_typing(&mut self, agent_name: &str, frame: usize);

    /// Erase the typing indicator.
    fn clear_typing(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    typing_width: usize,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            typing_width: 0,
        }
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    // Output errors are ignored: a chat UI has nowhere better to report them.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_turn(&mut self, turn: &Turn, agent_name: &str) {
        self.clear_typing();
        let line = match (turn.author(), self.use_color) {
            (Author::User, true) => format!("{ANSI_BOLD}You:{ANSI_RESET} {}\n", turn.text()),
            (Author::User, false) => format!("You: {}\n", turn.text()),
            (Author::Agent, true) => format!(
                "{ANSI_BOLD}{ANSI_CYAN}{agent_name}:{ANSI_RESET}{ANSI_CYAN} {}{ANSI_RESET}\n",
                turn.text()
            ),
            (Author::Agent, false) => format!("{agent_name}: {}\n", turn.text()),
        };
        self.emit(&line);
    }

    fn print_typing(&mut self, agent_name: &str, frame: usize) {
        let dots = TYPING_FRAMES[frame % TYPING_FRAMES.len()];
        let plain = format!("{agent_name} is typing{dots}");
        self.typing_width = plain.chars().count();
        let line = if self.use_color {
            format!("\r{ANSI_DIM}{plain}{ANSI_RESET}")
        } else {
            format!("\r{plain}")
        };
        self.emit(&line);
    }

    fn clear_typing(&mut self) {
        if self.typing_width > 0 {
            let blank = format!("\r{}\r", " ".repeat(self.typing_width));
            self.typing_width = 0;
            self.emit(&blank);
        }
    }

    fn print_error(&mut self, error: &str) {
        self.clear_typing();
        // Errors go to stderr regardless of the configured writer.
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.clear_typing();
        self.emit(&format!("{info}\n"));
    }
}
