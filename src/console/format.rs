//! printf-style formatting onto the console.
//!
//! Arguments arrive as a typed [`Arg`] slice built at the call site (see
//! [`kprintf!`](crate::kprintf)), so a directive never reinterprets memory it
//! was not given. Supported directives:
//!
//! | directive | argument            | output                                 |
//! |-----------|---------------------|----------------------------------------|
//! | `%d`      | integer / char      | signed decimal                         |
//! | `%x`      | integer / char      | lowercase hex at the argument's width  |
//! | `%p`      | integer / pointer   | `0x` + lowercase hex                   |
//! | `%s`      | `&str` / `None`     | the string, or `(null)`                |
//! | `%c`      | char / integer      | one character (low byte of integers)   |
//! | `%%`      | -                   | `%`                                    |
//!
//! Anything else after `%` is printed verbatim, and a `%` ending the format
//! string is dropped.

use super::error::FormatError;
use super::output::Console;
use crate::uart::Transport;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Printed for a `%s` whose argument is `None`.
pub const NULL_STR: &str = "(null)";

/// One formatter argument.
///
/// Signed integers keep their width so `%x` of a negative value prints the
/// two's complement the caller actually passed. `i8` and `i16` widen to
/// [`Arg::I32`] like C's default argument promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arg<'a> {
    I32(i32),
    I64(i64),
    Uint(u64),
    /// `None` is the null string.
    Str(Option<&'a str>),
    Char(char),
}

macro_rules! impl_from_int {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Arg<'_> {
                #[inline]
                fn from(v: $t) -> Self {
                    Arg::$variant(v as $wide)
                }
            }
        )*
    };
}

impl_from_int!(I32, i32: i8, i16, i32);
impl_from_int!(I64, i64: i64, isize);
impl_from_int!(Uint, u64: u8, u16, u32, u64, usize);

impl From<char> for Arg<'_> {
    fn from(c: char) -> Self {
        Arg::Char(c)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(Some(s))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Arg::Str(s)
    }
}

impl<T: ?Sized> From<*const T> for Arg<'_> {
    fn from(p: *const T) -> Self {
        Arg::Uint(p.cast::<u8>() as usize as u64)
    }
}

impl<T: ?Sized> From<*mut T> for Arg<'_> {
    fn from(p: *mut T) -> Self {
        Arg::Uint(p.cast::<u8>() as usize as u64)
    }
}

/// A parsed conversion specifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Decimal,
    Hex,
    Pointer,
    Str,
    Char,
    Percent,
    Unknown(u8),
}

impl Directive {
    /// Classify the character following `%`.
    pub fn parse(c: u8) -> Self {
        match c {
            b'd' => Self::Decimal,
            b'x' => Self::Hex,
            b'p' => Self::Pointer,
            b's' => Self::Str,
            b'c' => Self::Char,
            b'%' => Self::Percent,
            other => Self::Unknown(other),
        }
    }

    /// Whether the directive consumes an argument.
    pub fn takes_argument(self) -> bool {
        !matches!(self, Self::Percent | Self::Unknown(_))
    }
}

/// Numeric base for integer conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    Decimal = 10,
    Hex = 16,
}

/// Digits collected least-significant first.
///
/// 24 bytes covers 20 decimal digits of `u64::MAX` plus a sign.
struct Digits {
    buf: [u8; 24],
    len: usize,
}

impl Digits {
    fn new() -> Self {
        Self { buf: [0; 24], len: 0 }
    }

    fn push(&mut self, b: u8) {
        self.buf[self.len] = b;
        self.len += 1;
    }

    fn push_magnitude(&mut self, mut value: u64, radix: Radix) {
        let base = radix as u64;
        loop {
            self.push(DIGITS[(value % base) as usize]);
            value /= base;
            if value == 0 {
                break;
            }
        }
    }

    fn unsigned(value: u64, radix: Radix) -> Self {
        let mut digits = Self::new();
        digits.push_magnitude(value, radix);
        digits
    }

    /// Signed decimal. Hex output is always unsigned.
    fn signed(value: i64) -> Self {
        if value >= 0 {
            return Self::unsigned(value as u64, Radix::Decimal);
        }

        // Split off the lowest digit before negating: the quotient of i64::MIN
        // is representable as a positive value even though i64::MIN is not.
        let base = Radix::Decimal as i64;
        let mut digits = Self::new();
        digits.push(DIGITS[(-(value % base)) as usize]);
        let rest = (-(value / base)) as u64;
        if rest != 0 {
            digits.push_magnitude(rest, Radix::Decimal);
        }
        digits.push(b'-');
        digits
    }

    /// Most-significant first.
    fn emit<T: Transport>(&self, console: &Console<T>) {
        for &b in self.buf[..self.len].iter().rev() {
            console.put_char(b);
        }
    }
}

/// Format `fmt` with `args` onto `console`.
///
/// Every byte goes through [`Console::put_char`]. Returns the first
/// directive that could not be satisfied; such directives are echoed as
/// `%` plus the directive character and formatting carries on. Unused
/// trailing arguments are ignored.
pub fn format_write<T: Transport>(
    console: &Console<T>,
    fmt: &str,
    args: &[Arg<'_>],
) -> Result<(), FormatError> {
    let mut bytes = fmt.bytes().take_while(|&b| b != 0);
    let mut next_arg = 0;
    let mut first_error = None;

    while let Some(c) = bytes.next() {
        if c != b'%' {
            console.put_char(c);
            continue;
        }

        // A '%' at the very end is dropped.
        let Some(conv) = bytes.next() else {
            break;
        };

        let directive = Directive::parse(conv);
        let result = match directive {
            Directive::Percent => {
                console.put_char(b'%');
                Ok(())
            }
            Directive::Unknown(other) => {
                console.put_char(b'%');
                console.put_char(other);
                Ok(())
            }
            _ => {
                let index = next_arg;
                match args.get(index) {
                    Some(&arg) => {
                        next_arg += 1;
                        write_arg(console, directive, arg, conv, index)
                    }
                    None => Err(FormatError::MissingArgument { index }),
                }
            }
        };

        if let Err(err) = result {
            console.put_char(b'%');
            console.put_char(conv);
            log::debug!("format: {}", err);
            first_error.get_or_insert(err);
        }
    }

    first_error.map_or(Ok(()), Err)
}

fn write_arg<T: Transport>(
    console: &Console<T>,
    directive: Directive,
    arg: Arg<'_>,
    conv: u8,
    index: usize,
) -> Result<(), FormatError> {
    let mismatch = FormatError::ArgumentMismatch { directive: conv, index };

    match directive {
        Directive::Decimal => match arg {
            Arg::I32(v) => Digits::signed(v as i64).emit(console),
            Arg::I64(v) => Digits::signed(v).emit(console),
            Arg::Uint(v) => Digits::unsigned(v, Radix::Decimal).emit(console),
            Arg::Char(c) => Digits::unsigned(c as u64, Radix::Decimal).emit(console),
            Arg::Str(_) => return Err(mismatch),
        },
        Directive::Hex | Directive::Pointer => {
            let value = match arg {
                // Negative values print as two's complement at their own width.
                Arg::I32(v) => v as u32 as u64,
                Arg::I64(v) => v as u64,
                Arg::Uint(v) => v,
                Arg::Char(c) => c as u64,
                Arg::Str(_) => return Err(mismatch),
            };
            if directive == Directive::Pointer {
                console.put_str("0x");
            }
            Digits::unsigned(value, Radix::Hex).emit(console);
        }
        Directive::Str => match arg {
            Arg::Str(Some(s)) => console.put_str(s),
            Arg::Str(None) => console.put_str(NULL_STR),
            _ => return Err(mismatch),
        },
        Directive::Char => match arg {
            Arg::Char(c) => {
                let mut utf8 = [0u8; 4];
                for &b in c.encode_utf8(&mut utf8).as_bytes() {
                    console.put_char(b);
                }
            }
            Arg::I32(v) => console.put_char(v as u8),
            Arg::I64(v) => console.put_char(v as u8),
            Arg::Uint(v) => console.put_char(v as u8),
            Arg::Str(_) => return Err(mismatch),
        },
        Directive::Percent | Directive::Unknown(_) => {}
    }

    Ok(())
}

/// Format onto an explicit console with a typed argument list.
///
/// ```ignore
/// kprintf!(&console, "irq %d at %p: %s\n", irq, addr as *const u8, name);
/// ```
#[macro_export]
macro_rules! kprintf {
    ($console:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::console::format::format_write(
            $console,
            $fmt,
            &[$($crate::console::format::Arg::from($arg)),*],
        )
    };
}
