//! `log` backend writing to the serial console.
//!
//! Format: `[LEVEL] target: message\n` (LF becomes CRLF on the wire).
//!
//! The logger writes synchronously through [`Console`]; a record logged
//! from an interrupt handler interleaves with whatever the interrupted code
//! was printing.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};

use crate::console::Console;
use crate::uart::Transport;

/// Console logger with its own level filter.
pub struct ConsoleLogger<T: 'static> {
    console: &'static Console<T>,
    level: LevelFilter,
}

impl<T: Transport> ConsoleLogger<T> {
    pub const fn new(console: &'static Console<T>, level: LevelFilter) -> Self {
        Self { console, level }
    }

    /// Maximum level this logger prints.
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

/// Format a record as one console line.
pub fn format_record(out: &mut dyn Write, record: &Record<'_>) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}

impl<T: Transport> Log for ConsoleLogger<T> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = format_record(&mut self.console.writer(), record);
        }
    }

    fn flush(&self) {}
}
