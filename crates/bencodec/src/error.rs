use thiserror::Error;

/// Grammar violations detected while decoding bencoded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParsingErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected a digit")]
    ExpectedDigit,
    #[error("expected a colon")]
    ExpectedColon,
    #[error("expected an integer start token")]
    ExpectedIntegerStart,
    #[error("expected a string length")]
    ExpectedStringStart,
    #[error("expected an end token")]
    ExpectedEnd,
    #[error("expected a value")]
    ExpectedValue,
    #[error("leading zero")]
    LeadingZero,
    #[error("negative zero")]
    NegativeZero,
    #[error("negative string length")]
    NegativeStringLength,
    #[error("value out of representable range")]
    ValueOutOfRange,
    #[error("recursion depth exceeded")]
    RecursionDepthExceeded,
    #[error("trailing data after value")]
    TrailingData,
}

/// A decode failure: the first grammar violation and the byte offset at which
/// it was detected.
///
/// Decoding is all-or-nothing. When a `ParsingError` is returned no partial
/// descriptor index is produced; the offset points into the original buffer
/// for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParsingError {
    /// What went wrong.
    pub kind: ParsingErrorKind,
    /// Byte offset of the failing position in the input buffer.
    pub offset: usize,
}

impl ParsingError {
    pub(crate) fn new(kind: ParsingErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Shifts the error offset by `base`, used when a sub-parser ran on a
    /// slice of the full buffer.
    pub(crate) fn offset_by(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }
}
