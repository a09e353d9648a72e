//! Line-oriented console output over a [`Transport`].

use core::fmt;

use super::ansi;
use super::format::{format_write, Arg};
use crate::uart::Transport;

/// Console output on top of a byte transport.
///
/// Translates LF to CRLF and owns the terminal control sequences. There is
/// no internal locking: output from two contexts at once interleaves.
pub struct Console<T> {
    transport: T,
}

impl<T: Transport> Console<T> {
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport, for raw untranslated output.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Write one character, preceding LF with CR.
    pub fn put_char(&self, c: u8) {
        if c == b'\n' {
            self.transport.send_byte(b'\r');
        }
        self.transport.send_byte(c);
    }

    /// Write `s` through [`put_char`](Self::put_char) up to the end or the
    /// first NUL.
    pub fn put_str(&self, s: &str) {
        for byte in s.bytes().take_while(|&b| b != 0) {
            self.put_char(byte);
        }
    }

    /// Erase the display, then home the cursor.
    pub fn clear_screen(&self) {
        self.put_str(ansi::CLEAR_SCREEN);
        self.put_str(ansi::CURSOR_HOME);
    }

    /// Erase from the cursor to the end of the line.
    pub fn clear_to_eol(&self) {
        self.put_str(ansi::CLEAR_TO_EOL);
    }

    /// Move the cursor to `row`, `col` (both 1-based).
    ///
    /// Values below 1 are passed through unchecked; what the terminal does
    /// with them is up to the terminal.
    pub fn goto_xy(&self, row: i32, col: i32) {
        // Both directives are satisfied by integer arguments.
        let _ = format_write(self, ansi::CURSOR_POSITION, &[Arg::from(row), Arg::from(col)]);
    }

    /// Visually erase the character left of the cursor.
    pub fn erase_last(&self) {
        self.put_str(ansi::ERASE_LAST);
    }

    /// `core::fmt::Write` adapter.
    pub fn writer(&self) -> ConsoleWriter<'_, T> {
        ConsoleWriter { console: self }
    }
}

/// Wrapper for using [`Console`] with `core::fmt::Write`.
pub struct ConsoleWriter<'a, T> {
    console: &'a Console<T>,
}

impl<T: Transport> fmt::Write for ConsoleWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.console.put_char(byte);
        }
        Ok(())
    }
}
