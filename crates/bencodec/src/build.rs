//! Building owned values from an event stream.

use bstr::BString;
use thiserror::Error;

use crate::{
    events::{EventConsumer, EventProducer},
    value::{Dict, Value},
};

/// An event sequence that does not describe a well-formed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// `dict_key` arrived but the preceding value was not a string.
    #[error("dict key event without a preceding string")]
    KeyNotString,
    /// A structural event arrived with no completed value to attach.
    #[error("structural event without a completed value")]
    MissingValue,
    /// Begin/end events did not pair up, or the stream ended mid-container.
    #[error("unbalanced begin/end events")]
    UnbalancedEvents,
}

/// Shift-reduce consumer that assembles a [`Value`] tree.
///
/// Scalars land in a one-slot register; `begin_*` shifts an empty container
/// onto the stack, `list_item`/`dict_value` reduce the register into the
/// stack top, and `end_*` pops the finished container back into the
/// register. [`finish`](ValueBuilder::finish) yields the result once the
/// stack has drained.
#[derive(Debug, Default)]
pub struct ValueBuilder {
    value: Option<Value>,
    stack: Vec<Value>,
    keys: Vec<BString>,
}

impl ValueBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the builder and returns the assembled value.
    ///
    /// # Errors
    ///
    /// [`BuildError::UnbalancedEvents`] if a container is still open or no
    /// value was ever produced.
    pub fn finish(mut self) -> Result<Value, BuildError> {
        if !self.stack.is_empty() {
            return Err(BuildError::UnbalancedEvents);
        }
        self.value.take().ok_or(BuildError::UnbalancedEvents)
    }

    fn set(&mut self, value: Value) -> Result<(), BuildError> {
        if self.value.is_some() {
            // Two values in a row without a structural event between them.
            return Err(BuildError::UnbalancedEvents);
        }
        self.value = Some(value);
        Ok(())
    }

    fn take(&mut self) -> Result<Value, BuildError> {
        self.value.take().ok_or(BuildError::MissingValue)
    }
}

impl EventConsumer for ValueBuilder {
    type Error = BuildError;

    fn integer(&mut self, value: i64) -> Result<(), Self::Error> {
        self.set(Value::Integer(value))
    }

    fn string(&mut self, value: &[u8]) -> Result<(), Self::Error> {
        self.set(Value::Bytes(BString::from(value)))
    }

    fn begin_list(&mut self, size: Option<usize>) -> Result<(), Self::Error> {
        self.stack
            .push(Value::List(Vec::with_capacity(size.unwrap_or(0))));
        Ok(())
    }

    fn list_item(&mut self) -> Result<(), Self::Error> {
        let item = self.take()?;
        match self.stack.last_mut() {
            Some(Value::List(items)) => {
                items.push(item);
                Ok(())
            }
            _ => Err(BuildError::UnbalancedEvents),
        }
    }

    fn end_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(list @ Value::List(_)) => self.set(list),
            _ => Err(BuildError::UnbalancedEvents),
        }
    }

    fn begin_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        self.stack.push(Value::Dict(Dict::new()));
        Ok(())
    }

    fn dict_key(&mut self) -> Result<(), Self::Error> {
        match self.take()? {
            Value::Bytes(key) => {
                self.keys.push(key);
                Ok(())
            }
            _ => Err(BuildError::KeyNotString),
        }
    }

    fn dict_value(&mut self) -> Result<(), Self::Error> {
        let value = self.take()?;
        let key = self.keys.pop().ok_or(BuildError::MissingValue)?;
        match self.stack.last_mut() {
            Some(Value::Dict(map)) => {
                map.insert(key, value);
                Ok(())
            }
            _ => Err(BuildError::UnbalancedEvents),
        }
    }

    fn end_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        match self.stack.pop() {
            Some(dict @ Value::Dict(_)) => self.set(dict),
            _ => Err(BuildError::UnbalancedEvents),
        }
    }
}

/// Materializes any producer into an owned [`Value`].
///
/// # Errors
///
/// Returns a [`BuildError`] when the producer's event sequence is not
/// well formed; producers in this crate always emit balanced sequences.
///
/// # Examples
///
/// ```
/// use bencodec::{to_value, Value};
///
/// let table = bencodec::decode_view(b"li1ei2ei3ee")?;
/// let value = to_value(&table.root()).unwrap();
/// assert_eq!(value.as_list().unwrap().len(), 3);
///
/// // Values are producers too, so rebuilding is a fixed point.
/// assert_eq!(to_value(&value).unwrap(), value);
/// # Ok::<(), bencodec::ParsingError>(())
/// ```
pub fn to_value<P: EventProducer + ?Sized>(producer: &P) -> Result<Value, BuildError> {
    let mut builder = ValueBuilder::new();
    producer.connect(&mut builder)?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use bstr::ByteSlice;

    use super::*;
    use crate::decode_view;

    #[test]
    fn builds_scalars() {
        assert_eq!(to_value(&42i64), Ok(Value::Integer(42)));
        assert_eq!(to_value("spam"), Ok(Value::string("spam")));
    }

    #[test]
    fn builds_nested_structures() {
        let table = decode_view(b"d4:infod6:lengthi42e4:name8:file.txte4:spaml1:a1:bee").unwrap();
        let value = to_value(&table.root()).unwrap();

        let info = value.as_dict().unwrap().get(b"info".as_bstr()).unwrap();
        assert_eq!(
            info.as_dict().unwrap().get(b"length".as_bstr()),
            Some(&Value::Integer(42))
        );
        let spam = value.as_dict().unwrap().get(b"spam".as_bstr()).unwrap();
        assert_eq!(spam.as_list().unwrap().len(), 2);
    }

    #[test]
    fn rebuilding_a_value_is_a_fixed_point() {
        let table = decode_view(b"li1ei2ei3ee").unwrap();
        let value = to_value(&table.root()).unwrap();
        let rebuilt = to_value(&value).unwrap();
        assert_eq!(rebuilt, value);
    }

    #[test]
    fn unfinished_container_is_rejected() {
        let mut builder = ValueBuilder::new();
        builder.begin_list(None).unwrap();
        builder.integer(1).unwrap();
        builder.list_item().unwrap();
        assert_eq!(builder.finish(), Err(BuildError::UnbalancedEvents));
    }

    #[test]
    fn non_string_key_is_rejected() {
        let mut builder = ValueBuilder::new();
        builder.begin_dict(None).unwrap();
        builder.integer(1).unwrap();
        assert_eq!(builder.dict_key(), Err(BuildError::KeyNotString));
    }

    #[test]
    fn item_without_value_is_rejected() {
        let mut builder = ValueBuilder::new();
        builder.begin_list(None).unwrap();
        assert_eq!(builder.list_item(), Err(BuildError::MissingValue));
    }

    #[test]
    fn empty_stream_is_rejected() {
        assert_eq!(
            ValueBuilder::new().finish(),
            Err(BuildError::UnbalancedEvents)
        );
    }
}
