use crate::{
    descriptor::{Descriptor, DescriptorData},
    events::{EventConsumer, EventProducer},
    view::BView,
};

/// A view of a decoded list.
///
/// Iteration is lazy: each advance jumps to the next sibling descriptor via
/// the stored skip distance, an O(1) step that never descends into the
/// child's own subtree.
#[derive(Debug, Clone, Copy)]
pub struct ListView<'a> {
    view: BView<'a>,
}

impl<'a> ListView<'a> {
    pub(crate) fn new(view: BView<'a>) -> Self {
        debug_assert!(view.is_list());
        Self { view }
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.view.descriptor().data {
            DescriptorData::List { count, .. } => count,
            _ => unreachable!("constructed from a list descriptor"),
        }
    }

    /// Returns `true` for the empty list `le`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The child at `index`, walking sibling links from the front.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<BView<'a>> {
        self.iter().nth(index)
    }

    /// Iterates the children in encoding order.
    #[must_use]
    pub fn iter(&self) -> ListIter<'a> {
        let (descriptors, index, buffer) = self.view.parts();
        ListIter {
            descriptors,
            buffer,
            index: index + 1,
            remaining: self.len(),
        }
    }

    /// The exact encoded byte span, `l<items>e`.
    #[must_use]
    pub fn bencoded_view(&self) -> &'a [u8] {
        self.view.bencoded_view()
    }
}

impl<'a> IntoIterator for &ListView<'a> {
    type Item = BView<'a>;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy forward iterator over a list's children.
#[derive(Debug, Clone)]
pub struct ListIter<'a> {
    descriptors: &'a [Descriptor],
    buffer: &'a [u8],
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = BView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let view = BView::new(self.descriptors, self.index, self.buffer);
        self.index += self.descriptors[self.index].skip();
        self.remaining -= 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

impl EventProducer for ListView<'_> {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.begin_list(Some(self.len()))?;
        for item in self.iter() {
            item.connect(consumer)?;
            consumer.list_item()?;
        }
        consumer.end_list(Some(self.len()))
    }
}

#[cfg(test)]
mod tests {
    use crate::decode_view;

    #[test]
    fn iteration_steps_siblings() {
        let table = decode_view(b"l4:spamli1ee3:egge").unwrap();
        let list = table.root().as_list().unwrap();
        assert_eq!(list.len(), 3);

        let items: Vec<_> = list.iter().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_string().unwrap(), "spam");
        // The nested list is skipped over as one sibling step.
        assert_eq!(items[1].as_list().unwrap().len(), 1);
        assert_eq!(items[2].as_string().unwrap(), "egg");
    }

    #[test]
    fn get_by_index() {
        let table = decode_view(b"li1ei2ei3ee").unwrap();
        let list = table.root().as_list().unwrap();
        assert_eq!(list.get(0).unwrap().as_integer().unwrap().value(), 1);
        assert_eq!(list.get(2).unwrap().as_integer().unwrap().value(), 3);
        assert!(list.get(3).is_none());
        assert_eq!(list.iter().len(), 3);
    }

    #[test]
    fn empty_list() {
        let table = decode_view(b"le").unwrap();
        let list = table.root().as_list().unwrap();
        assert!(list.is_empty());
        assert!(list.iter().next().is_none());
        assert_eq!(list.bencoded_view(), b"le");
    }
}
