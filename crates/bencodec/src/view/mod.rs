//! Non-owning typed handles over a decoded buffer.
//!
//! A [`BView`] is a (descriptor index, buffer) pair: value-semantic, cheaply
//! copyable, and valid for as long as the [`DescriptorTable`] it was taken
//! from. Downcasting to the typed views ([`IntegerView`], [`StringView`],
//! [`ListView`], [`DictView`]) goes through `Option`-returning accessors;
//! inspect [`BView::kind`] first when the kind is not known.
//!
//! [`DescriptorTable`]: crate::DescriptorTable

mod dict;
mod integer;
mod list;
mod string;

use core::cmp::Ordering;

pub use dict::{DictIter, DictView};
pub use integer::IntegerView;
pub use list::{ListIter, ListView};
pub use string::StringView;

use crate::{
    descriptor::{Descriptor, DescriptorData},
    events::{EventConsumer, EventProducer},
    kind::Kind,
};

/// An untyped view of one decoded node.
///
/// Structural comparison is content-recursive: bytewise for strings, by
/// value for integers, elementwise for containers, and by [`Kind`] order
/// across kinds. No owning tree is ever materialized for a comparison.
#[derive(Debug, Clone, Copy)]
pub struct BView<'a> {
    descriptors: &'a [Descriptor],
    index: usize,
    buffer: &'a [u8],
}

impl<'a> BView<'a> {
    pub(crate) fn new(descriptors: &'a [Descriptor], index: usize, buffer: &'a [u8]) -> Self {
        Self { descriptors, index, buffer }
    }

    pub(crate) fn descriptor(&self) -> &'a Descriptor {
        &self.descriptors[self.index]
    }

    pub(crate) fn parts(&self) -> (&'a [Descriptor], usize, &'a [u8]) {
        (self.descriptors, self.index, self.buffer)
    }

    /// The kind of the viewed node.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.descriptor().kind()
    }

    /// Returns `true` if the node is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.kind() == Kind::Integer
    }

    /// Returns `true` if the node is a byte string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    /// Returns `true` if the node is a list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.kind() == Kind::List
    }

    /// Returns `true` if the node is a dict.
    #[must_use]
    pub fn is_dict(&self) -> bool {
        self.kind() == Kind::Dict
    }

    /// Downcasts to an integer view.
    #[must_use]
    pub fn as_integer(&self) -> Option<IntegerView<'a>> {
        self.is_integer().then(|| IntegerView::new(*self))
    }

    /// Downcasts to a string view.
    #[must_use]
    pub fn as_string(&self) -> Option<StringView<'a>> {
        self.is_string().then(|| StringView::new(*self))
    }

    /// Downcasts to a list view.
    #[must_use]
    pub fn as_list(&self) -> Option<ListView<'a>> {
        self.is_list().then(|| ListView::new(*self))
    }

    /// Downcasts to a dict view.
    #[must_use]
    pub fn as_dict(&self) -> Option<DictView<'a>> {
        self.is_dict().then(|| DictView::new(*self))
    }

    /// The exact encoded byte span of this node.
    #[must_use]
    pub fn bencoded_view(&self) -> &'a [u8] {
        let d = self.descriptor();
        &self.buffer[d.position..d.position + d.size]
    }

    fn integer_value(&self) -> i64 {
        match self.descriptor().data {
            DescriptorData::Integer(v) => v,
            _ => unreachable!("checked by caller"),
        }
    }
}

impl PartialEq for BView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BView<'_> {}

impl PartialOrd for BView<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BView<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.kind(), other.kind()) {
            (Kind::Integer, Kind::Integer) => self.integer_value().cmp(&other.integer_value()),
            (Kind::String, Kind::String) => {
                StringView::new(*self).as_bytes().cmp(StringView::new(*other).as_bytes())
            }
            (Kind::List, Kind::List) => ListView::new(*self).iter().cmp(ListView::new(*other).iter()),
            (Kind::Dict, Kind::Dict) => DictView::new(*self).iter().cmp(DictView::new(*other).iter()),
            (a, b) => a.cmp(&b),
        }
    }
}

impl EventProducer for BView<'_> {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        match self.descriptor().data {
            DescriptorData::Integer(value) => consumer.integer(value),
            DescriptorData::String { .. } => consumer.string(StringView::new(*self).as_bytes()),
            DescriptorData::List { .. } => ListView::new(*self).connect(consumer),
            DescriptorData::Dict { .. } => DictView::new(*self).connect(consumer),
            DescriptorData::Stop => unreachable!("stop sentinel is not addressable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::decode_view;

    #[test]
    fn structural_equality_across_buffers() {
        let a = decode_view(b"d1:al1:x1:yee").unwrap();
        let b = decode_view(b"d1:al1:x1:yee").unwrap();
        let c = decode_view(b"d1:al1:x1:zee").unwrap();
        assert_eq!(a.root(), b.root());
        assert_ne!(a.root(), c.root());
        assert!(a.root() < c.root());
    }

    #[test]
    fn cross_kind_ordering_follows_kind_order() {
        let integer = decode_view(b"i99e").unwrap();
        let string = decode_view(b"1:a").unwrap();
        let list = decode_view(b"le").unwrap();
        let dict = decode_view(b"de").unwrap();
        assert!(integer.root() < string.root());
        assert!(string.root() < list.root());
        assert!(list.root() < dict.root());
    }

    #[test]
    fn nested_list_comparison_is_elementwise() {
        let shorter = decode_view(b"li1ei2ee").unwrap();
        let longer = decode_view(b"li1ei2ei3ee").unwrap();
        let greater = decode_view(b"li1ei9ee").unwrap();
        assert!(shorter.root() < longer.root());
        assert!(greater.root() > longer.root());
    }
}
