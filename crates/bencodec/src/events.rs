//! The producer/consumer event protocol.
//!
//! Every traversable representation emits the same normalized call sequence:
//!
//! ```text
//! value := integer(i64) | string(bytes)
//!        | begin_list (value list_item)* end_list
//!        | begin_dict (string dict_key value dict_value)* end_dict
//! ```
//!
//! A type becomes a producer by implementing [`EventProducer`]; a consumer
//! qualifies by implementing [`EventConsumer`]. No shared base type, no
//! registry. One traversal algorithm thereby serves value construction
//! ([`ValueBuilder`]), re-encoding ([`Encoder`]) and arbitrary inspection.
//!
//! [`ValueBuilder`]: crate::ValueBuilder
//! [`Encoder`]: crate::Encoder

use core::convert::Infallible;

/// Receives the normalized event sequence.
///
/// Every method returns a `Result`: a consumer aborts an in-progress
/// traversal by returning `Err`, which unwinds the driving call chain and
/// surfaces the error to whoever started the traversal. Container events
/// carry the element count when the producer knows it up front.
pub trait EventConsumer {
    /// Error a consumer may raise to abort the traversal.
    type Error;

    /// An integer value.
    fn integer(&mut self, value: i64) -> Result<(), Self::Error>;
    /// A byte string value (also used for dict keys, followed by
    /// [`dict_key`](EventConsumer::dict_key)).
    fn string(&mut self, value: &[u8]) -> Result<(), Self::Error>;
    /// Opens a list.
    fn begin_list(&mut self, size: Option<usize>) -> Result<(), Self::Error>;
    /// The preceding value is a list element.
    fn list_item(&mut self) -> Result<(), Self::Error>;
    /// Closes the current list.
    fn end_list(&mut self, size: Option<usize>) -> Result<(), Self::Error>;
    /// Opens a dict.
    fn begin_dict(&mut self, size: Option<usize>) -> Result<(), Self::Error>;
    /// The preceding string is a dict key.
    fn dict_key(&mut self) -> Result<(), Self::Error>;
    /// The preceding value completes the pair for the pending key.
    fn dict_value(&mut self) -> Result<(), Self::Error>;
    /// Closes the current dict.
    fn end_dict(&mut self, size: Option<usize>) -> Result<(), Self::Error>;
}

/// Emits the event sequence for `self` into a consumer.
pub trait EventProducer {
    /// Drives `consumer` through this value's event sequence.
    ///
    /// # Errors
    ///
    /// Propagates the first error the consumer returns.
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error>;
}

/// A consumer that ignores every event.
///
/// Exists to probe that a type satisfies the producer contract and to
/// measure traversal cost; it validates nothing and performs no observable
/// work.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl EventConsumer for Discard {
    type Error = Infallible;

    fn integer(&mut self, _value: i64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn string(&mut self, _value: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn begin_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn list_item(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn begin_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn dict_key(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn dict_value(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl EventProducer for i64 {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.integer(*self)
    }
}

impl EventProducer for [u8] {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.string(self)
    }
}

impl EventProducer for str {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.string(self.as_bytes())
    }
}

impl<P: EventProducer + ?Sized> EventProducer for &P {
    fn connect<C: EventConsumer>(&self, consumer: &mut C) -> Result<(), C::Error> {
        (**self).connect(consumer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_view;

    // The event log used to check producers emit the normalized sequence.
    #[derive(Debug, Default, PartialEq)]
    pub(crate) struct Recorder {
        pub events: Vec<String>,
    }

    impl EventConsumer for Recorder {
        type Error = Infallible;

        fn integer(&mut self, value: i64) -> Result<(), Self::Error> {
            self.events.push(format!("integer({value})"));
            Ok(())
        }

        fn string(&mut self, value: &[u8]) -> Result<(), Self::Error> {
            self.events.push(format!("string({})", String::from_utf8_lossy(value)));
            Ok(())
        }

        fn begin_list(&mut self, size: Option<usize>) -> Result<(), Self::Error> {
            self.events.push(format!("begin_list({size:?})"));
            Ok(())
        }

        fn list_item(&mut self) -> Result<(), Self::Error> {
            self.events.push("list_item".into());
            Ok(())
        }

        fn end_list(&mut self, size: Option<usize>) -> Result<(), Self::Error> {
            self.events.push(format!("end_list({size:?})"));
            Ok(())
        }

        fn begin_dict(&mut self, size: Option<usize>) -> Result<(), Self::Error> {
            self.events.push(format!("begin_dict({size:?})"));
            Ok(())
        }

        fn dict_key(&mut self) -> Result<(), Self::Error> {
            self.events.push("dict_key".into());
            Ok(())
        }

        fn dict_value(&mut self) -> Result<(), Self::Error> {
            self.events.push("dict_value".into());
            Ok(())
        }

        fn end_dict(&mut self, size: Option<usize>) -> Result<(), Self::Error> {
            self.events.push(format!("end_dict({size:?})"));
            Ok(())
        }
    }

    #[test]
    fn view_emits_normalized_sequence() {
        let table = decode_view(b"d1:al1:xi7eee").unwrap();
        let mut recorder = Recorder::default();
        table.root().connect(&mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            [
                "begin_dict(Some(1))",
                "string(a)",
                "dict_key",
                "begin_list(Some(2))",
                "string(x)",
                "list_item",
                "integer(7)",
                "list_item",
                "end_list(Some(2))",
                "dict_value",
                "end_dict(Some(1))",
            ]
        );
    }

    #[test]
    fn repeated_traversal_is_idempotent() {
        let table = decode_view(b"li1ei2ei3ee").unwrap();
        let mut first = Recorder::default();
        table.root().connect(&mut first).unwrap();

        // A no-op pass in between must not disturb anything.
        table.root().connect(&mut Discard).unwrap();

        let mut second = Recorder::default();
        table.root().connect(&mut second).unwrap();
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn consumer_error_aborts_traversal() {
        struct FailOnInteger;

        impl EventConsumer for FailOnInteger {
            type Error = &'static str;

            fn integer(&mut self, _value: i64) -> Result<(), Self::Error> {
                Err("no integers allowed")
            }

            fn string(&mut self, _value: &[u8]) -> Result<(), Self::Error> {
                Ok(())
            }

            fn begin_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
                Ok(())
            }

            fn list_item(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }

            fn end_list(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
                Ok(())
            }

            fn begin_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
                Ok(())
            }

            fn dict_key(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }

            fn dict_value(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }

            fn end_dict(&mut self, _size: Option<usize>) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let table = decode_view(b"l4:spami1ee").unwrap();
        assert_eq!(table.root().connect(&mut FailOnInteger), Err("no integers allowed"));
    }

    #[test]
    fn scalars_are_producers() {
        let mut recorder = Recorder::default();
        42i64.connect(&mut recorder).unwrap();
        "spam".connect(&mut recorder).unwrap();
        b"eggs".as_slice().connect(&mut recorder).unwrap();
        assert_eq!(recorder.events, ["integer(42)", "string(spam)", "string(eggs)"]);
    }
}
