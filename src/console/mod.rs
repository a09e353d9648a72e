//! Serial console: output, line input and printf.
//!
//! Zero heap allocation - all static buffers.
//!
//! ```text
//! kprintf! ──▶ format ──▶ Console (CRLF, ANSI) ──▶ Transport
//! Transport RX ──▶ ConsoleInput ──▶ LineDiscipline ──▶ LineQueue ──▶ LineConsumer
//! ```

pub mod ansi;
pub mod discipline;
pub mod error;
pub mod format;
pub mod input;
pub mod line_buffer;
pub mod output;

pub use discipline::{InputEvent, Key, LineDiscipline};
pub use error::FormatError;
pub use format::{format_write, Arg, Directive};
pub use input::ConsoleInput;
pub use line_buffer::{LineConsumer, LineProducer, LineQueue, LineState, Push};
pub use output::{Console, ConsoleWriter};
