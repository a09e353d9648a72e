//! Input line discipline: classify each received byte, echo it, and feed
//! the line ring.

use super::line_buffer::{LineProducer, Push, LINE_TERMINATOR};
use super::output::Console;
use crate::config::CONSOLE_BUF_SIZE;
use crate::uart::Transport;

/// ASCII backspace (Ctrl-H).
pub const BACKSPACE: u8 = 0x08;
/// ASCII delete, sent by most terminals for the backspace key.
pub const DELETE: u8 = 0x7F;

/// How the discipline treats a received byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Erase the previous character.
    Backspace,
    /// Ends a line.
    Terminator,
    /// Anything else, stored as-is.
    Char(u8),
}

impl Key {
    pub fn classify(c: u8) -> Self {
        match c {
            BACKSPACE | DELETE => Key::Backspace,
            LINE_TERMINATOR => Key::Terminator,
            other => Key::Char(other),
        }
    }
}

/// What happened to a received byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Backspace removed a character.
    Erased,
    /// Backspace with nothing to remove.
    Ignored,
    /// Ring full, byte discarded.
    Dropped,
    /// Byte stored, line still open.
    Stored,
    /// Byte stored and a line is now ready.
    LineReady,
}

/// Producer side of the console input.
///
/// Call [`input`](Self::input) once per received byte, typically from the
/// UART receive interrupt.
pub struct LineDiscipline<'a, T, const N: usize = CONSOLE_BUF_SIZE> {
    console: &'a Console<T>,
    producer: LineProducer<'a, N>,
}

impl<'a, T: Transport, const N: usize> LineDiscipline<'a, T, N> {
    pub fn new(console: &'a Console<T>, producer: LineProducer<'a, N>) -> Self {
        Self { console, producer }
    }

    /// Process one received byte.
    ///
    /// - Backspace/DEL: erase the last unread character and echo `"\b \b"`
    ///   through the console; silently ignored when nothing is unread.
    /// - Ring full: drop silently, no echo.
    /// - Otherwise: echo the raw byte (no CRLF translation) and store it.
    pub fn input(&mut self, c: u8) -> InputEvent {
        match Key::classify(c) {
            Key::Backspace => {
                if self.producer.erase() {
                    self.console.erase_last();
                    InputEvent::Erased
                } else {
                    log::trace!("backspace on empty line");
                    InputEvent::Ignored
                }
            }
            Key::Terminator | Key::Char(_) => {
                if self.producer.is_full() {
                    log::trace!("line full, dropped {:#04x}", c);
                    return InputEvent::Dropped;
                }

                self.console.transport().send_byte(c);

                match self.producer.push(c) {
                    Push::Stored { ready: true } => {
                        log::debug!("line ready ({} bytes)", self.producer.queue().snapshot().len());
                        InputEvent::LineReady
                    }
                    Push::Stored { ready: false } => InputEvent::Stored,
                    // Only this handle adds characters, so the ring cannot
                    // have filled since the check above.
                    Push::Dropped => InputEvent::Dropped,
                }
            }
        }
    }

    /// The console used for echo.
    pub fn console(&self) -> &'a Console<T> {
        self.console
    }
}
