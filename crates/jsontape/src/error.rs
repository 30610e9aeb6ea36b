//! Parse failure reporting: the stable error vocabulary plus the position
//! where the parser stopped.

use thiserror::Error;

/// Everything that can stop a parse.
///
/// The names and texts form a stable vocabulary; downstream code matches on
/// them. `IllegalCodepoint` carries the offending codepoint, the only code
/// with a significant argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    /// Kept so the vocabulary is complete; the parse API never returns it.
    #[error("no error")]
    Success,
    #[error("out of memory")]
    OutOfMemory,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("missing root element")]
    MissingRootElement,
    #[error("document root must be object or array")]
    BadRoot,
    #[error("expected ,")]
    ExpectedComma,
    #[error("missing object key")]
    MissingObjectKey,
    #[error("expected :")]
    ExpectedColon,
    #[error("expected end of input")]
    ExpectedEndOfInput,
    #[error("unexpected comma")]
    UnexpectedComma,
    #[error("expected value")]
    ExpectedValue,
    #[error("expected 'null'")]
    ExpectedNull,
    #[error("expected 'false'")]
    ExpectedFalse,
    #[error("expected 'true'")]
    ExpectedTrue,
    /// The misspelling is intentional and stable; do not correct it.
    #[error("missing exponent")]
    MssingExponent,
    #[error("illegal unprintable codepoint in string: {0}")]
    IllegalCodepoint(u32),
    #[error("invalid character in unicode escape")]
    InvalidUnicodeEscape,
    #[error("unexpected end of input during UTF-16 surrogate pair")]
    UnexpectedEndOfUtf16,
    #[error("expected \\u")]
    ExpectedU,
    #[error("invalid UTF-16 trail surrogate")]
    InvalidUtf16TrailSurrogate,
    #[error("unknown escape")]
    UnknownEscape,
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

impl ErrorCode {
    /// The bare message, without any argument.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Success => "no error",
            Self::OutOfMemory => "out of memory",
            Self::UnexpectedEnd => "unexpected end of input",
            Self::MissingRootElement => "missing root element",
            Self::BadRoot => "document root must be object or array",
            Self::ExpectedComma => "expected ,",
            Self::MissingObjectKey => "missing object key",
            Self::ExpectedColon => "expected :",
            Self::ExpectedEndOfInput => "expected end of input",
            Self::UnexpectedComma => "unexpected comma",
            Self::ExpectedValue => "expected value",
            Self::ExpectedNull => "expected 'null'",
            Self::ExpectedFalse => "expected 'false'",
            Self::ExpectedTrue => "expected 'true'",
            Self::MssingExponent => "missing exponent",
            Self::IllegalCodepoint(_) => "illegal unprintable codepoint in string",
            Self::InvalidUnicodeEscape => "invalid character in unicode escape",
            Self::UnexpectedEndOfUtf16 => "unexpected end of input during UTF-16 surrogate pair",
            Self::ExpectedU => "expected \\u",
            Self::InvalidUtf16TrailSurrogate => "invalid UTF-16 trail surrogate",
            Self::UnknownEscape => "unknown escape",
            Self::InvalidUtf8 => "invalid UTF-8",
        }
    }

    /// Whether [`ErrorCode::arg`] means anything for this code.
    #[must_use]
    pub fn has_significant_arg(self) -> bool {
        matches!(self, Self::IllegalCodepoint(_))
    }

    /// The numeric argument, for the codes that carry one.
    #[must_use]
    pub fn arg(self) -> Option<u32> {
        match self {
            Self::IllegalCodepoint(codepoint) => Some(codepoint),
            _ => None,
        }
    }
}

/// A parse failure, positioned at the byte the parser could not accept.
///
/// `line` and `column` are 1-based. When the parser ran out of input the
/// position is one past the last byte. Columns count bytes, not characters.
///
/// # Examples
///
/// ```
/// use jsontape::{parse, Allocation, ErrorCode};
///
/// let mut text = *b"[01]";
/// let err = parse(Allocation::Dynamic, &mut text).unwrap_err();
/// assert_eq!(err.code, ErrorCode::ExpectedComma);
/// assert_eq!((err.line, err.column), (1, 3));
/// assert_eq!(err.to_string(), "expected , at 1:3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{code} at {line}:{column}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
}
