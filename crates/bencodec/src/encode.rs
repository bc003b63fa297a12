//! Serializing an event stream back to bencode.

use core::convert::Infallible;

use crate::events::{EventConsumer, EventProducer};

/// Consumer that writes the bencoded form of the events it receives.
///
/// The writer is append-only and cannot fail, so the error type is
/// [`Infallible`]. Dict keys come through [`string`](EventConsumer::string)
/// like any other value; the structural `list_item`/`dict_key`/`dict_value`
/// events carry no bytes of their own.
#[derive(Debug, Default)]
pub struct Encoder {
    output: Vec<u8>,
}

impl Encoder {
    /// Creates an encoder with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the encoder and returns the bytes written so far.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}

impl EventConsumer for Encoder {
    type Error = Infallible;

    fn integer(&mut self, value: i64) -> Result<(), Self::Error> {
        self.output.push(b'i');
        self.output.extend_from_slice(value.to_string().as_bytes());
        self.output.push(b'e');
        Ok(())
    }

    fn string(&mut self, value: &[u8]) -> Result<(), Self::Error> {
        self.output
            .extend_from_slice(value.len().to_string().as_bytes());
        self.output.push(b':');
        self.output.extend_from_slice(value);
        Ok(())
    }

    fn begin_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        self.output.push(b'l');
        Ok(())
    }

    fn list_item(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        self.output.push(b'e');
        Ok(())
    }

    fn begin_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        self.output.push(b'd');
        Ok(())
    }

    fn dict_key(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn dict_value(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        self.output.push(b'e');
        Ok(())
    }
}

/// Encodes any producer to its bencoded bytes.
///
/// `Value` dicts iterate their keys in sorted order, so encoding a `Value`
/// always yields the canonical form; re-encoding a view reproduces the
/// original bytes, key order included.
///
/// # Examples
///
/// ```
/// use bencodec::{encode, Value};
///
/// assert_eq!(encode(&Value::Integer(-3)), b"i-3e");
/// assert_eq!(encode("spam"), b"4:spam");
/// ```
#[must_use]
pub fn encode<P: EventProducer + ?Sized>(producer: &P) -> Vec<u8> {
    let mut encoder = Encoder::new();
    match producer.connect(&mut encoder) {
        Ok(()) => encoder.into_bytes(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use bstr::BString;

    use super::*;
    use crate::{decode_view, value::Dict, Value};

    #[test]
    fn encodes_scalars() {
        assert_eq!(encode(&0i64), b"i0e");
        assert_eq!(encode(&-42i64), b"i-42e");
        assert_eq!(encode(&i64::MIN), b"i-9223372036854775808e".as_slice());
        assert_eq!(encode(""), b"0:");
        assert_eq!(encode(b"spam".as_slice()), b"4:spam");
    }

    #[test]
    fn encodes_values_canonically() {
        let mut dict = Dict::new();
        dict.insert(BString::from("z"), Value::Integer(1));
        dict.insert(BString::from("a"), Value::List(vec![Value::from("x")]));
        // BTreeMap iteration sorts the keys regardless of insertion order.
        assert_eq!(encode(&Value::Dict(dict)), b"d1:al1:xe1:zi1ee");
    }

    #[test]
    fn reencoding_a_view_reproduces_the_input() {
        for input in [
            b"i42e".as_slice(),
            b"4:spam",
            b"le",
            b"de",
            b"d4:infod6:lengthi42ee4:spaml1:a1:bee",
            // Non-canonical key order survives a view round trip.
            b"d1:zi1e1:ai2ee",
        ] {
            let table = decode_view(input).unwrap();
            assert_eq!(encode(&table.root()), input);
        }
    }
}
