//! Host-side transport that records everything sent.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use uart_console::{Console, Transport};

/// Transport that is always ready and keeps every byte written.
#[derive(Default)]
pub struct Recorder {
    sent: Mutex<Vec<u8>>,
    rx: Mutex<VecDeque<u8>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder with bytes waiting on the receive side.
    pub fn with_input(bytes: &[u8]) -> Self {
        let recorder = Self::new();
        recorder.rx.lock().unwrap().extend(bytes.iter().copied());
        recorder
    }

    /// Everything sent so far, clearing the record.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    /// Everything sent so far, as text.
    pub fn sent(&self) -> String {
        String::from_utf8_lossy(&self.sent.lock().unwrap()).into_owned()
    }
}

impl Transport for Recorder {
    fn tx_ready(&self) -> bool {
        true
    }

    fn write_data(&self, byte: u8) {
        self.sent.lock().unwrap().push(byte);
    }

    fn try_receive_byte(&self) -> Option<u8> {
        self.rx.lock().unwrap().pop_front()
    }
}

pub fn console() -> Console<Recorder> {
    Console::new(Recorder::new())
}

/// Console with `'static` lifetime, for loggers and threads.
pub fn leaked_console() -> &'static Console<Recorder> {
    Box::leak(Box::new(console()))
}

/// Text sent through `console`, clearing the record.
pub fn output(console: &Console<Recorder>) -> String {
    String::from_utf8_lossy(&console.transport().take()).into_owned()
}
