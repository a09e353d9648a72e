//! Module: config
//!
//! Purpose: Board constants and runtime configuration for the console.
//!
//! Architecture:
//! - Register layout and buffer sizes are compile-time constants
//! - `UartConfig` / `ConsoleConfig` carry the values `globals::init` applies
//! - Default log level is chosen by cargo feature (`log-error` .. `log-trace`)

use log::LevelFilter;

/// UART0 MMIO base on the QEMU `virt` machine.
pub const UART0_BASE: usize = 0x1000_0000;

/// Input clock of the QEMU 16550.
pub const UART_CLOCK_HZ: u32 = 3_686_400;

/// Default line rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Capacity of the input line ring. Must be a power of two.
pub const CONSOLE_BUF_SIZE: usize = 128;

/// 16550 register offsets from the MMIO base.
pub mod regs {
    /// Receive buffer (read) / transmit holding (write). DLL when DLAB is set.
    pub const RBR_THR: usize = 0;
    /// Interrupt enable. DLM when DLAB is set.
    pub const IER: usize = 1;
    /// FIFO control (write only).
    pub const FCR: usize = 2;
    /// Line control.
    pub const LCR: usize = 3;
    /// Line status.
    pub const LSR: usize = 5;
}

/// Log level applied when no explicit level is configured.
pub const DEFAULT_LOG_LEVEL: LevelFilter = if cfg!(feature = "log-trace") {
    LevelFilter::Trace
} else if cfg!(feature = "log-debug") {
    LevelFilter::Debug
} else if cfg!(feature = "log-info") {
    LevelFilter::Info
} else if cfg!(feature = "log-warn") {
    LevelFilter::Warn
} else if cfg!(feature = "log-error") {
    LevelFilter::Error
} else {
    LevelFilter::Off
};

/// UART hardware configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartConfig {
    /// MMIO base address.
    pub base: usize,
    /// UART input clock in Hz.
    pub clock_hz: u32,
    pub baud_rate: u32,
    /// Enable the receive-data-available interrupt during `init`.
    pub rx_interrupts: bool,
}

impl UartConfig {
    /// Divisor latch value for the configured rate, never below 1.
    pub fn divisor(&self) -> u16 {
        let div = self.clock_hz / (self.baud_rate.max(1).saturating_mul(16));
        div.clamp(1, u16::MAX as u32) as u16
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            base: UART0_BASE,
            clock_hz: UART_CLOCK_HZ,
            baud_rate: DEFAULT_BAUD_RATE,
            rx_interrupts: true,
        }
    }
}

/// Top-level console configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub uart: UartConfig,
    pub log_level: LevelFilter,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            uart: UartConfig::default(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_divisor() {
        assert_eq!(UartConfig::default().divisor(), 2);
    }

    #[test]
    fn test_divisor_clamps_to_one() {
        let cfg = UartConfig {
            baud_rate: 10_000_000,
            ..UartConfig::default()
        };
        assert_eq!(cfg.divisor(), 1);
    }

    #[test]
    fn test_divisor_zero_baud() {
        let cfg = UartConfig {
            baud_rate: 0,
            ..UartConfig::default()
        };
        assert_eq!(cfg.divisor(), u16::MAX);
    }

    #[test]
    fn test_buffer_size_is_power_of_two() {
        assert!(CONSOLE_BUF_SIZE.is_power_of_two());
    }
}
