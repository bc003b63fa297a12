use core::cmp::Ordering;

use crate::{
    descriptor::{Descriptor, DescriptorData},
    events::{EventConsumer, EventProducer},
    view::{BView, StringView},
};

/// A view of a decoded dict.
///
/// Lookup defaults to a linear scan because decoding does not verify that
/// keys arrived in canonical sorted order; [`get_sorted`] exploits sortedness
/// when the caller can vouch for it.
///
/// [`get_sorted`]: DictView::get_sorted
#[derive(Debug, Clone, Copy)]
pub struct DictView<'a> {
    view: BView<'a>,
}

impl<'a> DictView<'a> {
    pub(crate) fn new(view: BView<'a>) -> Self {
        debug_assert!(view.is_dict());
        Self { view }
    }

    /// Number of key-value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.view.descriptor().data {
            DescriptorData::Dict { count, .. } => count,
            _ => unreachable!("constructed from a dict descriptor"),
        }
    }

    /// Returns `true` for the empty dict `de`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `key` by scanning every pair. Correct for any input,
    /// including non-canonical key order.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<BView<'a>> {
        self.iter().find(|(k, _)| *k == *key).map(|(_, v)| v)
    }

    /// Looks up `key` assuming the pairs are in canonical sorted order,
    /// stopping at the first key past it.
    ///
    /// Only use this when sortedness is independently guaranteed; on
    /// unsorted input it may miss present keys. The decoder does not enforce
    /// key ordering.
    #[must_use]
    pub fn get_sorted(&self, key: &[u8]) -> Option<BView<'a>> {
        for (k, v) in self.iter() {
            match k.as_bytes().cmp(key) {
                Ordering::Less => {}
                Ordering::Equal => return Some(v),
                Ordering::Greater => return None,
            }
        }
        None
    }

    /// Whether `key` is present (linear scan).
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Iterates the `(key, value)` pairs in encoding order.
    #[must_use]
    pub fn iter(&self) -> DictIter<'a> {
        let (descriptors, index, buffer) = self.view.parts();
        DictIter {
            descriptors,
            buffer,
            index: index + 1,
            remaining: self.len(),
        }
    }

    /// The exact encoded byte span, `d<pairs>e`.
    #[must_use]
    pub fn bencoded_view(&self) -> &'a [u8] {
        self.view.bencoded_view()
    }
}

impl<'a> IntoIterator for &DictView<'a> {
    type Item = (StringView<'a>, BView<'a>);
    type IntoIter = DictIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy forward iterator over a dict's `(key, value)` pairs.
#[derive(Debug, Clone)]
pub struct DictIter<'a> {
    descriptors: &'a [Descriptor],
    buffer: &'a [u8],
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for DictIter<'a> {
    type Item = (StringView<'a>, BView<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = BView::new(self.descriptors, self.index, self.buffer);
        let value_index = self.index + 1;
        let value = BView::new(self.descriptors, value_index, self.buffer);
        self.index = value_index + self.descriptors[value_index].skip();
        self.remaining -= 1;
        Some((StringView::new(key), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DictIter<'_> {}

impl EventProducer for DictView<'_> {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.begin_dict(Some(self.len()))?;
        for (key, value) in self.iter() {
            consumer.string(key.as_bytes())?;
            consumer.dict_key()?;
            value.connect(consumer)?;
            consumer.dict_value()?;
        }
        consumer.end_dict(Some(self.len()))
    }
}
