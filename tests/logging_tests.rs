//! Console logger tests

mod common;

use common::{leaked_console, output};
use log::{Level, LevelFilter, Log, Record};
use uart_console::logging::ConsoleLogger;

#[test]
fn test_logger_writes_crlf_line() {
    let con = leaked_console();
    let logger = ConsoleLogger::new(con, LevelFilter::Info);

    logger.log(
        &Record::builder()
            .level(Level::Warn)
            .target("uart")
            .args(format_args!("rx overrun x{}", 3))
            .build(),
    );

    assert_eq!(output(con), "[WARN] uart: rx overrun x3\r\n");
}

#[test]
fn test_logger_filters_level() {
    let con = leaked_console();
    let logger = ConsoleLogger::new(con, LevelFilter::Info);

    logger.log(
        &Record::builder()
            .level(Level::Debug)
            .target("console")
            .args(format_args!("hidden"))
            .build(),
    );

    assert!(output(con).is_empty());
    assert_eq!(logger.level(), LevelFilter::Info);
}
