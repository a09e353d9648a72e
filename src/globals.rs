//! Global console instances.
//!
//! One board console on UART0, its input ring, and the `log` backend.
//! - Producer side (`console_intr`, `uart_intr`) runs in the UART interrupt
//!   and only reads statics that are already published
//! - Consumer side (`console_getc`, `console_read_line`) runs in task context
//!   and builds the input endpoint on first use
//! - Output (`console`, `printf!`) may be used from either

use log::{LevelFilter, SetLoggerError};
use spin::Once;

use crate::config::{ConsoleConfig, UartConfig, UART0_BASE};
use crate::console::{Console, ConsoleInput, InputEvent, LineQueue};
use crate::logging::ConsoleLogger;
use crate::uart::Ns16550;
use crate::VERSION;

/// Board console.
static CONSOLE: Once<Console<Ns16550>> = Once::new();

/// Input line ring for the board console.
static INPUT_RING: LineQueue = LineQueue::new();

/// Input endpoint over `INPUT_RING`.
static INPUT: Once<ConsoleInput<'static, Ns16550>> = Once::new();

/// `log` backend.
static LOGGER: Once<ConsoleLogger<Ns16550>> = Once::new();

/// Initialize UART0 from `config` and install the console logger.
///
/// Only the first call touches the UART line settings; if [`console`]
/// already ran, the UART keeps its firmware setup. Receive interrupts are
/// enabled last, once the console and its input endpoint are published.
///
/// # Safety
/// `config.uart.base` must be the MMIO address of a 16550 register block
/// that stays mapped for the lifetime of the kernel.
pub unsafe fn init(config: &ConsoleConfig) -> Result<&'static Console<Ns16550>, SetLoggerError> {
    let console = CONSOLE.call_once(|| {
        // SAFETY: guaranteed by the caller.
        let uart = unsafe { Ns16550::new(config.uart.base) };
        uart.init(&UartConfig {
            rx_interrupts: false,
            ..config.uart
        });
        Console::new(uart)
    });

    let input_ready = input().is_some();
    if config.uart.rx_interrupts && input_ready {
        console.transport().enable_rx_interrupts();
    }

    init_logger(config.log_level)?;
    log::info!("{} on uart {:#x}", VERSION, console.transport().base());
    Ok(console)
}

/// The board console, created with the default base on first use.
///
/// Not for interrupt context before [`init`]: the first call runs the lazy
/// constructor.
pub fn console() -> &'static Console<Ns16550> {
    CONSOLE.call_once(|| {
        // SAFETY: UART0_BASE is the board's UART register block.
        Console::new(unsafe { Ns16550::new(UART0_BASE) })
    })
}

/// Install the console logger at `level`.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.call_once(|| ConsoleLogger::new(console(), level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// The input endpoint, built on first use. Task context only.
fn input() -> Option<&'static ConsoleInput<'static, Ns16550>> {
    INPUT
        .try_call_once(|| ConsoleInput::new(console(), &INPUT_RING).ok_or(()))
        .ok()
}

/// Feed one received byte to the console input.
///
/// This is the only way characters enter the input ring. Never blocks: the
/// byte is dropped if the input endpoint is not published yet or the
/// producer is busy.
pub fn console_intr(c: u8) -> InputEvent {
    match INPUT.get() {
        Some(input) => input.intr(c),
        None => {
            log::trace!("console input not ready, dropped {:#04x}", c);
            InputEvent::Dropped
        }
    }
}

/// Drain the UART receive register into the console input.
///
/// Call from the UART interrupt handler. Returns the bytes consumed. Before
/// the console is published nothing is read.
pub fn uart_intr() -> usize {
    match (INPUT.get(), CONSOLE.get()) {
        (Some(input), _) => input.receive(),
        // Drain anyway so the receive interrupt clears.
        (None, Some(console)) => console.transport().drain_rx(|c| {
            log::trace!("console input not ready, dropped {:#04x}", c);
        }),
        (None, None) => 0,
    }
}

/// Block until a line is ready and return its next character.
///
/// `INPUT_RING` is split only by [`input`], so the endpoint always exists;
/// NUL is returned if it somehow does not.
pub fn console_getc() -> u8 {
    input().map_or(0, ConsoleInput::getc)
}

/// Block until a line is ready and copy it into `buf`.
pub fn console_read_line(buf: &mut [u8]) -> usize {
    input().map_or(0, |input| input.read_line(buf))
}

/// `printf` on the board console.
///
/// ```ignore
/// printf!("hart %d up, sp=%p\n", hart, sp);
/// ```
#[macro_export]
macro_rules! printf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::kprintf!($crate::globals::console(), $fmt $(, $arg)*)
    };
}

/// `core::fmt` print on the board console.
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {{
        use core::fmt::Write as _;
        let _ = $crate::globals::console().writer().write_fmt(format_args!($($arg)*));
    }};
}

/// `core::fmt` print with newline on the board console.
#[macro_export]
macro_rules! kprintln {
    () => {
        $crate::kprint!("\n")
    };
    ($($arg:tt)*) => {{
        $crate::kprint!("{}\n", format_args!($($arg)*));
    }};
}
