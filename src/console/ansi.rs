//! ANSI terminal control sequences emitted by the console.

/// Erase the entire display.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Move the cursor to row 1, column 1.
pub const CURSOR_HOME: &str = "\x1b[H";

/// Erase from the cursor to the end of the line.
pub const CLEAR_TO_EOL: &str = "\x1b[K";

/// Cursor position, parameterized by row then column (both 1-based).
pub const CURSOR_POSITION: &str = "\x1b[%d;%dH";

/// Erase the character left of the cursor: back, blank, back.
pub const ERASE_LAST: &str = "\x08 \x08";
