use core::cmp::Ordering;

use crate::{
    descriptor::DescriptorData,
    events::{EventConsumer, EventProducer},
    view::BView,
};

/// A view of a decoded byte string.
///
/// All accessors address the payload bytes only; [`bencoded_view`] exposes
/// the full `<length>:<payload>` span.
///
/// [`bencoded_view`]: StringView::bencoded_view
#[derive(Debug, Clone, Copy)]
pub struct StringView<'a> {
    view: BView<'a>,
}

impl<'a> StringView<'a> {
    pub(crate) fn new(view: BView<'a>) -> Self {
        debug_assert!(view.is_string());
        Self { view }
    }

    /// The payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        let d = self.view.descriptor();
        match d.data {
            DescriptorData::String { length } => {
                // Payload sits at the end of the encoded span.
                &self.view.parts().2[d.position + d.size - length..d.position + d.size]
            }
            _ => unreachable!("constructed from a string descriptor"),
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.view.descriptor().data {
            DescriptorData::String { length } => length,
            _ => unreachable!("constructed from a string descriptor"),
        }
    }

    /// Returns `true` for the empty string `0:`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// The first payload byte.
    #[must_use]
    pub fn first(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    /// The last payload byte.
    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }

    /// A sub-slice of `len` bytes starting at `start`, clamped to the
    /// payload bounds; pass `usize::MAX` to take everything to the end.
    ///
    /// # Examples
    ///
    /// ```
    /// let table = bencodec::decode_view(b"4:spam")?;
    /// let s = table.root().as_string().unwrap();
    /// assert_eq!(s.substr(1, usize::MAX), b"pam");
    /// assert_eq!(s.substr(1, 2), b"pa");
    /// # Ok::<(), bencodec::ParsingError>(())
    /// ```
    #[must_use]
    pub fn substr(&self, start: usize, len: usize) -> &'a [u8] {
        let bytes = self.as_bytes();
        let start = start.min(bytes.len());
        let end = start.saturating_add(len).min(bytes.len());
        &bytes[start..end]
    }

    /// Whether the payload starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.as_bytes().starts_with(prefix)
    }

    /// Whether the payload ends with `suffix`.
    #[must_use]
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.as_bytes().ends_with(suffix)
    }

    /// Double-ended iterator over the payload bytes.
    pub fn iter(&self) -> core::slice::Iter<'a, u8> {
        self.as_bytes().iter()
    }

    /// The payload as UTF-8, if valid.
    #[must_use]
    pub fn to_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// The exact encoded byte span, `<length>:<payload>`.
    #[must_use]
    pub fn bencoded_view(&self) -> &'a [u8] {
        self.view.bencoded_view()
    }
}

impl<'a> IntoIterator for &StringView<'a> {
    type Item = &'a u8;
    type IntoIter = core::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for StringView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for StringView<'_> {}

impl PartialOrd for StringView<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StringView<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialEq<[u8]> for StringView<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for StringView<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for StringView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for StringView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd<[u8]> for StringView<'_> {
    fn partial_cmp(&self, other: &[u8]) -> Option<Ordering> {
        Some(self.as_bytes().cmp(other))
    }
}

impl PartialOrd<&str> for StringView<'_> {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Some(self.as_bytes().cmp(other.as_bytes()))
    }
}

impl EventProducer for StringView<'_> {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.string(self.as_bytes())
    }
}
