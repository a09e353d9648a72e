//! Board console globals over a fake register block.
//!
//! The globals are process-wide, so everything runs in one test.

use uart_console::config::{regs, ConsoleConfig, UartConfig};
use uart_console::console::InputEvent;
use uart_console::globals;
use uart_console::uart::LineStatus;

#[test]
fn test_init_wires_console_and_input() {
    let bank: &'static mut [u8; 8] = Box::leak(Box::new([0u8; 8]));
    let ptr = bank.as_mut_ptr();
    unsafe { ptr.add(regs::LSR).write_volatile(LineStatus::THR_EMPTY.bits()) };

    // Before init nothing is published: bytes are dropped, nothing is read.
    assert_eq!(globals::console_intr(b'z'), InputEvent::Dropped);
    assert_eq!(globals::uart_intr(), 0);

    let config = ConsoleConfig {
        uart: UartConfig {
            base: ptr as usize,
            ..UartConfig::default()
        },
        ..ConsoleConfig::default()
    };
    let console = unsafe { globals::init(&config) }.unwrap();

    assert_eq!(console.transport().base(), ptr as usize);
    assert_eq!(globals::console().transport().base(), ptr as usize);
    // Receive interrupts are on once init returns.
    assert_eq!(unsafe { ptr.add(regs::IER).read_volatile() }, 0x01);

    assert_eq!(globals::uart_intr(), 0);
    assert_eq!(globals::console_intr(b'h'), InputEvent::Stored);
    assert_eq!(globals::console_intr(b'i'), InputEvent::Stored);
    assert_eq!(globals::console_intr(b'\r'), InputEvent::LineReady);

    let mut buf = [0u8; 8];
    let n = globals::console_read_line(&mut buf);
    assert_eq!(&buf[..n], b"hi\r");
}
