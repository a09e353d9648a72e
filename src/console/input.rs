//! Console input endpoints shared by the receive interrupt and readers.
//!
//! Both handles of a [`LineQueue`] sit behind `spin` locks so the endpoint
//! can live in a static. The interrupt side only ever `try_lock`s: a byte
//! that arrives while the discipline is held is dropped, never waited on.

use spin::Mutex;

use super::discipline::{InputEvent, LineDiscipline};
use super::line_buffer::{LineConsumer, LineQueue};
use super::output::Console;
use crate::config::CONSOLE_BUF_SIZE;
use crate::uart::Transport;

/// Line input for one console.
pub struct ConsoleInput<'a, T, const N: usize = CONSOLE_BUF_SIZE> {
    console: &'a Console<T>,
    discipline: Mutex<LineDiscipline<'a, T, N>>,
    consumer: Mutex<LineConsumer<'a, N>>,
}

impl<'a, T: Transport, const N: usize> ConsoleInput<'a, T, N> {
    /// Wire `queue` to `console`.
    ///
    /// Returns `None` if the queue's handles were already taken.
    pub fn new(console: &'a Console<T>, queue: &'a LineQueue<N>) -> Option<Self> {
        let (producer, consumer) = queue.split()?;
        Some(Self {
            console,
            discipline: Mutex::new(LineDiscipline::new(console, producer)),
            consumer: Mutex::new(consumer),
        })
    }

    /// Feed one received byte. Never blocks.
    pub fn intr(&self, c: u8) -> InputEvent {
        match self.discipline.try_lock() {
            Some(mut discipline) => discipline.input(c),
            None => {
                log::trace!("console input busy, dropped {:#04x}", c);
                InputEvent::Dropped
            }
        }
    }

    /// Move every byte waiting in the transport into the line ring.
    ///
    /// Returns the number of bytes taken from the transport, dropped ones
    /// included.
    pub fn receive(&self) -> usize {
        let mut count = 0;
        while let Some(c) = self.console.transport().try_receive_byte() {
            self.intr(c);
            count += 1;
        }
        count
    }

    /// Block until a line is ready and return its next character.
    pub fn getc(&self) -> u8 {
        self.consumer.lock().read_char()
    }

    /// Block until a line is ready and copy it into `buf`.
    pub fn read_line(&self, buf: &mut [u8]) -> usize {
        self.consumer.lock().read_line(buf)
    }

    /// The console used for echo.
    pub fn console(&self) -> &'a Console<T> {
        self.console
    }
}
