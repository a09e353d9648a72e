//! # uart-console
//!
//! Serial console subsystem for bare-metal kernels.
//!
//! ## Architecture
//!
//! ```text
//! printf!/kprintf! ──▶ format ──▶ Console ──▶ Transport (16550 MMIO)
//!                                    ▲             │ RX
//!                                    │ echo        ▼
//!   reader ◀── LineConsumer ◀── LineQueue ◀── LineDiscipline
//! ```
//!
//! - Output is synchronous and unbuffered: every byte blocks on the
//!   transmitter
//! - Input is line-buffered in a lock-free SPSC ring fed one byte at a time
//! - No heap, no locks on the byte path

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod globals;
pub mod logging;
pub mod uart;
pub mod wait;

pub use config::{ConsoleConfig, UartConfig, CONSOLE_BUF_SIZE};
pub use console::{Arg, Console, FormatError, LineDiscipline, LineQueue};
pub use uart::{Ns16550, Transport};
pub use wait::{Spin, Waiter};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");
