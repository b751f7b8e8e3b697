//! Plain-text renderer for terminals.

use std::io::{self, Write};

use crate::conversation::Sender;
use crate::text;

use super::{MessagePane, Renderer, StoreView};

/// Draws every frame as text on a writer (usually stdout).
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Wrap a writer.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Borrow the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Recover the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, view: &StoreView) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "── {} ──", text::HISTORY_HEADING)?;
        for (index, entry) in view.history.iter().enumerate() {
            let marker = if entry.active { '>' } else { ' ' };
            writeln!(
                self.out,
                "{marker} {:>2}. {} {}",
                index + 1,
                entry.icon,
                entry.title
            )?;
        }

        writeln!(self.out, "── {} ──", view.active_title)?;
        match &view.pane {
            MessagePane::Welcome => {
                writeln!(self.out, "{}", text::WELCOME_TITLE)?;
                writeln!(self.out, "{}", text::WELCOME_BODY)?;
            }
            MessagePane::Messages(messages) => {
                for message in messages {
                    let label = match message.sender {
                        Sender::User => text::USER_LABEL,
                        Sender::Bot => text::BOT_LABEL,
                    };
                    writeln!(self.out, "[{label}] {}", message.text)?;
                }
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &StoreView) {
        if let Err(err) = self.draw(view) {
            tracing::warn!(%err, "failed to draw frame");
        }
    }

    fn notify(&mut self, notice: &str) {
        let result = writeln!(self.out, "! {notice}").and_then(|()| self.out.flush());
        if let Err(err) = result {
            tracing::warn!(%err, "failed to draw notice");
        }
    }
}
