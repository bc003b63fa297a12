//! Path addressing into nested values.
//!
//! A [`Pointer`] names a location the way a JSON Pointer does: a sequence of
//! `/`-separated reference tokens, with `~0` escaping `~` and `~1` escaping
//! `/`. Each token selects a dict key or a decimal list index; the empty
//! pointer names the root itself.

use core::fmt;

use bstr::{BStr, BString, ByteSlice};
use thiserror::Error;

use crate::{
    from_chars::{parse_u64, Strategy},
    kind::Kind,
    value::Value,
    view::BView,
};

/// A pointer string that does not follow the token grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerParseError {
    /// A non-empty pointer must start with `/`.
    #[error("pointer does not start with '/'")]
    MissingLeadingSlash,
    /// A `~` was followed by something other than `0` or `1`.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape {
        /// Byte offset of the `~` within the pointer string.
        offset: usize,
    },
}

/// A pointer that parsed but does not resolve against a given value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    /// The token named a key the dict does not have.
    #[error("key {token:?} not found")]
    KeyNotFound {
        /// The missing key.
        token: BString,
    },
    /// The token is not a decimal list index.
    #[error("token {token:?} is not a valid list index")]
    InvalidIndex {
        /// The offending token.
        token: BString,
    },
    /// The index is past the end of the list.
    #[error("index {index} out of range for list of length {length}")]
    IndexOutOfRange {
        /// The parsed index.
        index: usize,
        /// The list length.
        length: usize,
    },
    /// The `-` end-of-list token only makes sense for insertion, which this
    /// read-only evaluation does not support.
    #[error("the '-' token is not supported")]
    UnsupportedToken,
    /// A token was applied to a value that has no children.
    #[error("token {token:?} applied to {kind} value")]
    ExpectedListOrDict {
        /// The token that could not be applied.
        token: BString,
        /// The kind of the value it was applied to.
        kind: Kind,
    },
}

/// A parsed pointer: a list of unescaped reference tokens.
///
/// # Examples
///
/// ```
/// use bencodec::Pointer;
///
/// let pointer: Pointer = "/a/0".parse()?;
/// let table = bencodec::decode_view(b"d1:al1:x1:yee").unwrap();
/// let hit = pointer.evaluate(table.root())?;
/// assert_eq!(hit.as_string().unwrap(), "x");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pointer {
    tokens: Vec<BString>,
}

impl Pointer {
    /// The empty pointer, which resolves to the root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a pointer string.
    ///
    /// # Errors
    ///
    /// [`PointerParseError`] when the string is non-empty but does not start
    /// with `/`, or contains a `~` not followed by `0` or `1`.
    pub fn parse(s: &str) -> Result<Self, PointerParseError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        if !s.starts_with('/') {
            return Err(PointerParseError::MissingLeadingSlash);
        }
        let mut tokens = Vec::new();
        let mut offset = 1;
        for raw in s[1..].split('/') {
            tokens.push(unescape(raw, offset)?);
            offset += raw.len() + 1;
        }
        Ok(Self { tokens })
    }

    /// Appends an already-unescaped token.
    pub fn push(&mut self, token: impl Into<BString>) {
        self.tokens.push(token.into());
    }

    /// Number of reference tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` for the root pointer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The unescaped tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[BString] {
        &self.tokens
    }

    /// Resolves the pointer against `root`, walking one token at a time.
    ///
    /// # Errors
    ///
    /// The first token that fails to resolve stops the walk with a
    /// [`PointerError`] describing the mismatch.
    pub fn evaluate<T: PointerTarget>(&self, root: T) -> Result<T, PointerError> {
        let mut current = root;
        for token in &self.tokens {
            current = step(current, token.as_bstr())?;
        }
        Ok(current)
    }

    /// Whether the pointer resolves against `root`.
    #[must_use]
    pub fn contains<T: PointerTarget>(&self, root: T) -> bool {
        self.evaluate(root).is_ok()
    }
}

impl std::str::FromStr for Pointer {
    type Err = PointerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Re-escapes each token into pointer syntax.
///
/// Tokens are raw bytes; non-UTF-8 bytes render as replacement characters,
/// so the textual form round-trips only pointers whose tokens are valid
/// UTF-8. [`Pointer::parse`] always produces such pointers; tokens added
/// with [`Pointer::push`] may not be.
impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            let mut escaped = BString::from(Vec::with_capacity(token.len()));
            for &byte in token.iter() {
                match byte {
                    b'~' => escaped.extend_from_slice(b"~0"),
                    b'/' => escaped.extend_from_slice(b"~1"),
                    _ => escaped.push(byte),
                }
            }
            write!(f, "{escaped}")?;
        }
        Ok(())
    }
}

fn unescape(raw: &str, offset: usize) -> Result<BString, PointerParseError> {
    let bytes = raw.as_bytes();
    let mut token = BString::from(Vec::with_capacity(bytes.len()));
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'~' {
            match bytes.get(i + 1) {
                Some(b'0') => token.push(b'~'),
                Some(b'1') => token.push(b'/'),
                _ => return Err(PointerParseError::InvalidEscape { offset: offset + i }),
            }
            i += 2;
        } else {
            token.push(bytes[i]);
            i += 1;
        }
    }
    Ok(token)
}

/// A value shape a pointer can walk. Implemented for [`BView`] and
/// [`&Value`](Value).
pub trait PointerTarget: Sized {
    /// The kind of the current value.
    fn kind(&self) -> Kind;
    /// Child under `key`, if the value is a dict holding it.
    fn dict_get(&self, key: &BStr) -> Option<Self>;
    /// List length, if the value is a list.
    fn list_len(&self) -> Option<usize>;
    /// Child at `index`, if the value is a list long enough.
    fn list_get(&self, index: usize) -> Option<Self>;
}

impl PointerTarget for BView<'_> {
    fn kind(&self) -> Kind {
        BView::kind(self)
    }

    fn dict_get(&self, key: &BStr) -> Option<Self> {
        self.as_dict()?.get(key)
    }

    fn list_len(&self) -> Option<usize> {
        Some(self.as_list()?.len())
    }

    fn list_get(&self, index: usize) -> Option<Self> {
        self.as_list()?.get(index)
    }
}

impl<'v> PointerTarget for &'v Value {
    fn kind(&self) -> Kind {
        Value::kind(self)
    }

    fn dict_get(&self, key: &BStr) -> Option<Self> {
        self.as_dict()?.get(key)
    }

    fn list_len(&self) -> Option<usize> {
        Some(self.as_list()?.len())
    }

    fn list_get(&self, index: usize) -> Option<Self> {
        self.as_list()?.get(index)
    }
}

fn step<T: PointerTarget>(current: T, token: &BStr) -> Result<T, PointerError> {
    match current.kind() {
        Kind::Dict => current.dict_get(token).ok_or_else(|| PointerError::KeyNotFound {
            token: token.to_owned(),
        }),
        Kind::List => {
            let length = current.list_len().unwrap_or(0);
            let index = parse_index(token)?;
            if index >= length {
                return Err(PointerError::IndexOutOfRange { index, length });
            }
            current
                .list_get(index)
                .ok_or(PointerError::IndexOutOfRange { index, length })
        }
        kind => Err(PointerError::ExpectedListOrDict {
            token: token.to_owned(),
            kind,
        }),
    }
}

fn parse_index(token: &BStr) -> Result<usize, PointerError> {
    if token.as_bytes() == b"-" {
        return Err(PointerError::UnsupportedToken);
    }
    let invalid = || PointerError::InvalidIndex {
        token: token.to_owned(),
    };
    let parsed = parse_u64(token.as_bytes(), Strategy::Serial).map_err(|_| invalid())?;
    if parsed.len != token.len() {
        return Err(invalid());
    }
    usize::try_from(parsed.value).map_err(|_| invalid())
}
