//! Formatter error types

/// Why a format call did not satisfy every directive.
///
/// Output is fail-soft either way: the offending directive is printed
/// verbatim and formatting continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// F01: Directive had no argument left to consume
    MissingArgument { index: usize },
    /// F02: Argument type does not fit the directive
    ArgumentMismatch { directive: u8, index: usize },
}

impl FormatError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "F01",
            Self::ArgumentMismatch { .. } => "F02",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "missing argument",
            Self::ArgumentMismatch { .. } => "argument mismatch",
        }
    }

    /// Position of the argument the directive wanted.
    pub fn index(&self) -> usize {
        match *self {
            Self::MissingArgument { index } | Self::ArgumentMismatch { index, .. } => index,
        }
    }
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::MissingArgument { index } => {
                write!(f, "{}: {} (#{})", self.code(), self.message(), index)
            }
            Self::ArgumentMismatch { directive, index } => write!(
                f,
                "{}: {} for %{} (#{})",
                self.code(),
                self.message(),
                directive as char,
                index
            ),
        }
    }
}
