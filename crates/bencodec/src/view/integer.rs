use crate::{
    descriptor::DescriptorData,
    events::{EventConsumer, EventProducer},
    view::BView,
};

/// A view of a decoded integer.
#[derive(Debug, Clone, Copy)]
pub struct IntegerView<'a> {
    view: BView<'a>,
}

impl<'a> IntegerView<'a> {
    pub(crate) fn new(view: BView<'a>) -> Self {
        debug_assert!(view.is_integer());
        Self { view }
    }

    /// The decoded value.
    #[must_use]
    pub fn value(&self) -> i64 {
        match self.view.descriptor().data {
            DescriptorData::Integer(v) => v,
            _ => unreachable!("constructed from an integer descriptor"),
        }
    }

    /// Range-checked conversion to any integer type.
    ///
    /// # Examples
    ///
    /// ```
    /// let table = bencodec::decode_view(b"i300e")?;
    /// let n = table.root().as_integer().unwrap();
    /// assert_eq!(n.to::<u16>(), Some(300));
    /// assert_eq!(n.to::<u8>(), None);
    /// # Ok::<(), bencodec::ParsingError>(())
    /// ```
    #[must_use]
    pub fn to<T: TryFrom<i64>>(&self) -> Option<T> {
        T::try_from(self.value()).ok()
    }

    /// The exact encoded byte span, `i<digits>e`.
    #[must_use]
    pub fn bencoded_view(&self) -> &'a [u8] {
        self.view.bencoded_view()
    }
}

impl PartialEq for IntegerView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for IntegerView<'_> {}

impl PartialEq<i64> for IntegerView<'_> {
    fn eq(&self, other: &i64) -> bool {
        self.value() == *other
    }
}

impl PartialOrd<i64> for IntegerView<'_> {
    fn partial_cmp(&self, other: &i64) -> Option<core::cmp::Ordering> {
        self.value().partial_cmp(other)
    }
}

impl EventProducer for IntegerView<'_> {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.integer(self.value())
    }
}

#[cfg(test)]
mod tests {
    use crate::decode_view;

    #[test]
    fn conversions_are_range_checked() {
        let table = decode_view(b"i-1e").unwrap();
        let n = table.root().as_integer().unwrap();
        assert_eq!(n.value(), -1);
        assert_eq!(n.to::<i32>(), Some(-1));
        assert_eq!(n.to::<u64>(), None);
        assert_eq!(n.bencoded_view(), b"i-1e");
        assert!(n == -1);
    }
}
