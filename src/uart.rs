//! Byte transport: a 16550-compatible UART behind MMIO.
//!
//! Only the transmit-ready and data-ready bits of the line status register
//! are needed for operation. `init` programs the divisor, framing and FIFOs
//! for boards where firmware has not already done it.

use core::ptr::{read_volatile, write_volatile};

use bitflags::bitflags;

use crate::config::{regs, UartConfig};
use crate::wait::{wait_until, Spin, Waiter};

bitflags! {
    /// Line status register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u8 {
        /// Receive buffer holds a byte.
        const DATA_READY    = 1 << 0;
        const OVERRUN_ERROR = 1 << 1;
        const PARITY_ERROR  = 1 << 2;
        const FRAMING_ERROR = 1 << 3;
        const BREAK         = 1 << 4;
        /// Transmit holding register empty: ready for the next byte.
        const THR_EMPTY     = 1 << 5;
        /// Transmitter fully idle.
        const TX_IDLE       = 1 << 6;
        const FIFO_ERROR    = 1 << 7;
    }
}

/// LCR: divisor latch access.
const LCR_DLAB: u8 = 1 << 7;
/// LCR: 8 data bits, no parity, 1 stop bit.
const LCR_8N1: u8 = 0x03;
/// FCR: enable FIFOs and clear both.
const FCR_ENABLE_CLEAR: u8 = 0x07;
/// IER: receive data available.
const IER_RX: u8 = 1 << 0;

/// Single-byte serial transport.
///
/// Implementations only supply the raw register-level primitives; the
/// blocking send is built on them.
pub trait Transport: Send + Sync {
    /// True when the transmitter can accept a byte.
    fn tx_ready(&self) -> bool;

    /// Write a byte to the data register without checking readiness.
    fn write_data(&self, byte: u8);

    /// Take one received byte, or `None` if nothing is waiting. Never blocks.
    fn try_receive_byte(&self) -> Option<u8>;

    /// Send one byte, waiting on `waiter` until the transmitter is ready.
    fn send_byte_with(&self, byte: u8, waiter: &mut dyn Waiter) {
        wait_until(|| self.tx_ready(), waiter);
        self.write_data(byte);
    }

    /// Send one byte, spinning until the transmitter is ready.
    ///
    /// A transmitter that never reports ready blocks forever.
    fn send_byte(&self, byte: u8) {
        self.send_byte_with(byte, &mut Spin);
    }

    /// Send every byte of `s` up to the end or the first NUL.
    fn send_str(&self, s: &str) {
        for byte in s.bytes().take_while(|&b| b != 0) {
            self.send_byte(byte);
        }
    }
}

/// 16550 UART driver.
pub struct Ns16550 {
    base: usize,
}

impl Ns16550 {
    /// Create a driver for the UART at `base`.
    ///
    /// # Safety
    /// `base` must point to the 16550 register block (at least 8 bytes of
    /// device memory) for as long as the driver is used.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the register block.
    pub fn base(&self) -> usize {
        self.base
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u8 {
        // SAFETY: `new` requires base..base+8 to be the UART register block.
        unsafe { read_volatile((self.base + offset) as *const u8) }
    }

    #[inline]
    fn write_reg(&self, offset: usize, value: u8) {
        // SAFETY: `new` requires base..base+8 to be the UART register block.
        unsafe { write_volatile((self.base + offset) as *mut u8, value) }
    }

    /// Current line status.
    pub fn line_status(&self) -> LineStatus {
        LineStatus::from_bits_truncate(self.read_reg(regs::LSR))
    }

    /// Program divisor, 8N1 framing and FIFOs.
    ///
    /// Interrupts stay disabled unless `config.rx_interrupts` is set, in
    /// which case only the receive-data interrupt is enabled.
    pub fn init(&self, config: &UartConfig) {
        let [low, high] = config.divisor().to_le_bytes();

        self.write_reg(regs::IER, 0x00);

        self.write_reg(regs::LCR, LCR_DLAB);
        self.write_reg(regs::RBR_THR, low);
        self.write_reg(regs::IER, high);

        // Clears DLAB as well.
        self.write_reg(regs::LCR, LCR_8N1);
        self.write_reg(regs::FCR, FCR_ENABLE_CLEAR);

        if config.rx_interrupts {
            self.enable_rx_interrupts();
        }

        log::debug!(
            "uart {:#x}: {} baud, divisor {}",
            self.base,
            config.baud_rate,
            config.divisor()
        );
    }

    /// Enable only the receive-data-available interrupt.
    pub fn enable_rx_interrupts(&self) {
        self.write_reg(regs::IER, IER_RX);
    }

    /// Drain every pending received byte into `sink`.
    ///
    /// Meant for the UART interrupt handler or a poll loop. Returns the
    /// number of bytes delivered.
    pub fn drain_rx(&self, mut sink: impl FnMut(u8)) -> usize {
        let mut count = 0;
        while let Some(byte) = self.try_receive_byte() {
            sink(byte);
            count += 1;
        }
        count
    }
}

impl Transport for Ns16550 {
    #[inline]
    fn tx_ready(&self) -> bool {
        self.line_status().contains(LineStatus::THR_EMPTY)
    }

    #[inline]
    fn write_data(&self, byte: u8) {
        self.write_reg(regs::RBR_THR, byte);
    }

    fn try_receive_byte(&self) -> Option<u8> {
        if self.line_status().contains(LineStatus::DATA_READY) {
            Some(self.read_reg(regs::RBR_THR))
        } else {
            None
        }
    }
}
