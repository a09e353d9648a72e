//! Console output tests

mod common;

use core::fmt::Write;

use common::{console, output};

#[test]
fn test_put_char_plain() {
    let con = console();
    con.put_char(b'a');
    assert_eq!(output(&con), "a");
}

#[test]
fn test_put_char_newline_gets_cr() {
    let con = console();
    con.put_char(b'\n');
    assert_eq!(output(&con), "\r\n");
}

#[test]
fn test_put_str_translates_each_newline() {
    let con = console();
    con.put_str("one\ntwo\n");
    assert_eq!(output(&con), "one\r\ntwo\r\n");
}

#[test]
fn test_put_str_stops_at_nul() {
    let con = console();
    con.put_str("shown\0hidden");
    assert_eq!(output(&con), "shown");
}

#[test]
fn test_clear_screen_sequence() {
    let con = console();
    con.clear_screen();
    assert_eq!(output(&con), "\x1b[2J\x1b[H");
}

#[test]
fn test_clear_to_eol_sequence() {
    let con = console();
    con.clear_to_eol();
    assert_eq!(output(&con), "\x1b[K");
}

#[test]
fn test_goto_xy() {
    let con = console();
    con.goto_xy(12, 40);
    assert_eq!(output(&con), "\x1b[12;40H");
}

#[test]
fn test_goto_xy_home() {
    let con = console();
    con.goto_xy(1, 1);
    assert_eq!(output(&con), "\x1b[1;1H");
}

#[test]
fn test_erase_last() {
    let con = console();
    con.erase_last();
    assert_eq!(con.transport().take(), vec![0x08, b' ', 0x08]);
}

#[test]
fn test_writer_formats() {
    let con = console();
    write!(con.writer(), "{}-{:02x}\n", 7, 10).unwrap();
    assert_eq!(output(&con), "7-0a\r\n");
}

#[test]
fn test_raw_transport_skips_translation() {
    use uart_console::Transport;

    let con = console();
    con.transport().send_str("a\nb");
    assert_eq!(output(&con), "a\nb");
}
