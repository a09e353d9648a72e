//! Console input endpoint tests

mod common;

use common::{console, output, Recorder};
use uart_console::console::{ConsoleInput, InputEvent, LineQueue};
use uart_console::Console;

#[test]
fn test_new_takes_queue_handles() {
    let con = console();
    let queue = LineQueue::<16>::new();

    assert!(ConsoleInput::new(&con, &queue).is_some());
    assert!(ConsoleInput::new(&con, &queue).is_none());
}

#[test]
fn test_new_on_split_queue_fails() {
    let con = console();
    let queue = LineQueue::<16>::new();
    let _handles = queue.split().unwrap();

    assert!(ConsoleInput::new(&con, &queue).is_none());
}

#[test]
fn test_intr_then_getc() {
    let con = console();
    let queue = LineQueue::<16>::new();
    let input = ConsoleInput::new(&con, &queue).unwrap();

    assert_eq!(input.intr(b'o'), InputEvent::Stored);
    assert_eq!(input.intr(b'k'), InputEvent::Stored);
    assert_eq!(input.intr(b'\r'), InputEvent::LineReady);
    assert_eq!(output(&con), "ok\r");

    assert_eq!(input.getc(), b'o');
    assert_eq!(input.getc(), b'k');
    assert_eq!(input.getc(), b'\r');
    assert!(queue.snapshot().is_reset());
}

#[test]
fn test_intr_backspace() {
    let con = console();
    let queue = LineQueue::<16>::new();
    let input = ConsoleInput::new(&con, &queue).unwrap();

    input.intr(b'x');
    con.transport().take();
    assert_eq!(input.intr(0x7F), InputEvent::Erased);
    assert_eq!(con.transport().take(), vec![0x08, b' ', 0x08]);
    assert!(queue.snapshot().is_empty());
}

#[test]
fn test_receive_drains_transport() {
    let con = Console::new(Recorder::with_input(b"ls\r"));
    let queue = LineQueue::<16>::new();
    let input = ConsoleInput::new(&con, &queue).unwrap();

    assert_eq!(input.receive(), 3);
    assert_eq!(input.receive(), 0);
    assert_eq!(output(&con), "ls\r");

    let mut buf = [0u8; 16];
    let n = input.read_line(&mut buf);
    assert_eq!(&buf[..n], b"ls\r");
}

#[test]
fn test_receive_counts_dropped_bytes() {
    let con = Console::new(Recorder::with_input(b"abcdef"));
    let queue = LineQueue::<4>::new();
    let input = ConsoleInput::new(&con, &queue).unwrap();

    assert_eq!(input.receive(), 6);
    assert_eq!(queue.snapshot().len(), 4);
    assert_eq!(output(&con), "abcd");
}
