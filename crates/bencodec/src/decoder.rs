//! Single-pass decoding into a descriptor index.
//!
//! The decoder walks the buffer once, never backtracking, keeping one stack
//! frame per open container. Scalars are parsed inline with the integer
//! fast path; string payloads are recorded as (offset, length) and never
//! copied. The result is all-or-nothing: a complete [`DescriptorTable`] or
//! the first grammar violation with its byte offset.

use crate::{
    descriptor::{Descriptor, DescriptorData},
    error::{ParsingError, ParsingErrorKind},
    from_chars::{parse_integer_token, parse_string_token, Strategy},
    value::Value,
    view::BView,
};

/// Maximum container nesting accepted by [`decode_view`].
pub const DEFAULT_RECURSION_LIMIT: usize = 1024;

/// Knobs for [`decode_view_with`].
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Digit-run parser selection; see [`Strategy`].
    pub strategy: Strategy,
    /// Nesting depth at which decoding fails with
    /// [`ParsingErrorKind::RecursionDepthExceeded`].
    pub recursion_limit: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// A decoded buffer: the preorder descriptor index plus the borrowed source
/// bytes it indexes into.
///
/// The table owns no payload data. Views handed out by [`root`] borrow the
/// table, so the borrow checker enforces that neither the index nor the
/// buffer can change while views exist.
///
/// [`root`]: DescriptorTable::root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorTable<'buf> {
    descriptors: Vec<Descriptor>,
    buffer: &'buf [u8],
}

impl<'buf> DescriptorTable<'buf> {
    /// A view of the decoded root value.
    #[must_use]
    pub fn root(&self) -> BView<'_> {
        BView::new(&self.descriptors, 0, self.buffer)
    }

    /// The buffer this table indexes into.
    #[must_use]
    pub fn buffer(&self) -> &'buf [u8] {
        self.buffer
    }

    #[cfg(test)]
    pub(crate) fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }
}

struct Frame {
    /// Index of the container's descriptor, patched on close.
    index: usize,
    /// Children seen so far (for dicts, completed key-value pairs).
    count: usize,
    is_dict: bool,
    /// Dict frames only: a key has been read and its value is pending.
    expect_value: bool,
}

/// Decodes a complete bencoded value into a [`DescriptorTable`] with default
/// options.
///
/// # Errors
///
/// Returns the first grammar violation and its byte offset; no partial index
/// is produced.
///
/// # Examples
///
/// ```
/// let table = bencodec::decode_view(b"l4:spami42ee")?;
/// let list = table.root().as_list().unwrap();
/// assert_eq!(list.len(), 2);
/// # Ok::<(), bencodec::ParsingError>(())
/// ```
pub fn decode_view(buffer: &[u8]) -> Result<DescriptorTable<'_>, ParsingError> {
    decode_view_with(buffer, DecodeOptions::default())
}

/// Decodes with explicit [`DecodeOptions`].
///
/// # Errors
///
/// As [`decode_view`].
pub fn decode_view_with(
    buffer: &[u8],
    options: DecodeOptions,
) -> Result<DescriptorTable<'_>, ParsingError> {
    let mut descriptors: Vec<Descriptor> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut pos = 0;

    loop {
        if pos >= buffer.len() {
            return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, buffer.len()));
        }
        let byte = buffer[pos];

        if byte == b'e' {
            let Some(frame) = stack.pop() else {
                return Err(ParsingError::new(ParsingErrorKind::ExpectedValue, pos));
            };
            if frame.is_dict && frame.expect_value {
                return Err(ParsingError::new(ParsingErrorKind::ExpectedValue, pos));
            }
            pos += 1;
            let skip = descriptors.len() - frame.index;
            let open = &mut descriptors[frame.index];
            open.size = pos - open.position;
            open.data = if frame.is_dict {
                DescriptorData::Dict { count: frame.count, skip }
            } else {
                DescriptorData::List { count: frame.count, skip }
            };
        } else {
            // Dict keys must be strings; anything else at key position is a
            // grammar violation, not a type error.
            let expect_key = stack
                .last()
                .is_some_and(|frame| frame.is_dict && !frame.expect_value);
            if expect_key && !byte.is_ascii_digit() {
                return Err(ParsingError::new(ParsingErrorKind::ExpectedStringStart, pos));
            }
            match byte {
                b'i' => {
                    let (value, end) = parse_integer_token(buffer, pos, options.strategy)?;
                    descriptors.push(Descriptor {
                        position: pos,
                        size: end - pos,
                        data: DescriptorData::Integer(value),
                    });
                    pos = end;
                }
                b'0'..=b'9' => {
                    let (_, length, end) = parse_string_token(buffer, pos, options.strategy)?;
                    descriptors.push(Descriptor {
                        position: pos,
                        size: end - pos,
                        data: DescriptorData::String { length },
                    });
                    pos = end;
                }
                b'l' | b'd' => {
                    if stack.len() >= options.recursion_limit {
                        return Err(ParsingError::new(
                            ParsingErrorKind::RecursionDepthExceeded,
                            pos,
                        ));
                    }
                    let is_dict = byte == b'd';
                    descriptors.push(Descriptor {
                        position: pos,
                        size: 0,
                        data: if is_dict {
                            DescriptorData::Dict { count: 0, skip: 0 }
                        } else {
                            DescriptorData::List { count: 0, skip: 0 }
                        },
                    });
                    stack.push(Frame {
                        index: descriptors.len() - 1,
                        count: 0,
                        is_dict,
                        expect_value: false,
                    });
                    pos += 1;
                    continue;
                }
                b'-' => {
                    return Err(ParsingError::new(ParsingErrorKind::NegativeStringLength, pos));
                }
                _ => {
                    return Err(ParsingError::new(ParsingErrorKind::ExpectedValue, pos));
                }
            }
        }

        // A value (scalar or closed container) just completed.
        match stack.last_mut() {
            Some(frame) if frame.is_dict => {
                if frame.expect_value {
                    frame.count += 1;
                    frame.expect_value = false;
                } else {
                    frame.expect_value = true;
                }
            }
            Some(frame) => frame.count += 1,
            None => break,
        }
    }

    if pos != buffer.len() {
        return Err(ParsingError::new(ParsingErrorKind::TrailingData, pos));
    }
    descriptors.push(Descriptor {
        position: buffer.len(),
        size: 0,
        data: DescriptorData::Stop,
    });
    Ok(DescriptorTable { descriptors, buffer })
}

/// Decodes a buffer straight into an owning [`Value`] tree.
///
/// # Errors
///
/// As [`decode_view`].
///
/// # Examples
///
/// ```
/// use bencodec::Value;
///
/// let value = bencodec::decode_value(b"i42e")?;
/// assert_eq!(value, Value::Integer(42));
/// # Ok::<(), bencodec::ParsingError>(())
/// ```
pub fn decode_value(buffer: &[u8]) -> Result<Value, ParsingError> {
    let table = decode_view(buffer)?;
    Ok(crate::build::to_value(&table.root())
        .unwrap_or_else(|_| unreachable!("view traversal emits a balanced event stream")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::descriptor::DescriptorData::{Dict, Integer, List, Stop, String};

    #[test]
    fn scalar_string() {
        let table = decode_view(b"4:spam").unwrap();
        assert_eq!(
            table.descriptors(),
            &[
                Descriptor { position: 0, size: 6, data: String { length: 4 } },
                Descriptor { position: 6, size: 0, data: Stop },
            ]
        );
    }

    #[test]
    fn nested_structure() {
        // {"a": ["x", "y"]}
        let table = decode_view(b"d1:al1:x1:yee").unwrap();
        assert_eq!(
            table.descriptors(),
            &[
                Descriptor { position: 0, size: 13, data: Dict { count: 1, skip: 5 } },
                Descriptor { position: 1, size: 3, data: String { length: 1 } },
                Descriptor { position: 4, size: 8, data: List { count: 2, skip: 3 } },
                Descriptor { position: 5, size: 3, data: String { length: 1 } },
                Descriptor { position: 8, size: 3, data: String { length: 1 } },
                Descriptor { position: 13, size: 0, data: Stop },
            ]
        );
    }

    #[test]
    fn sibling_skip_crosses_subtrees() {
        // [[1, 2], 3]
        let table = decode_view(b"lli1ei2eei3ee").unwrap();
        assert_eq!(
            table.descriptors(),
            &[
                Descriptor { position: 0, size: 13, data: List { count: 2, skip: 5 } },
                Descriptor { position: 1, size: 8, data: List { count: 2, skip: 3 } },
                Descriptor { position: 2, size: 3, data: Integer(1) },
                Descriptor { position: 5, size: 3, data: Integer(2) },
                Descriptor { position: 9, size: 3, data: Integer(3) },
                Descriptor { position: 13, size: 0, data: Stop },
            ]
        );
    }

    #[rstest]
    #[case(b"", ParsingErrorKind::UnexpectedEof, 0)]
    #[case(b"i42", ParsingErrorKind::UnexpectedEof, 3)]
    #[case(b"l", ParsingErrorKind::UnexpectedEof, 1)]
    #[case(b"4:spa", ParsingErrorKind::UnexpectedEof, 5)]
    #[case(b"i04e", ParsingErrorKind::LeadingZero, 1)]
    #[case(b"i-0e", ParsingErrorKind::NegativeZero, 1)]
    #[case(b"i18446744073709551616e", ParsingErrorKind::ValueOutOfRange, 1)]
    #[case(b"ie", ParsingErrorKind::ExpectedDigit, 1)]
    #[case(b"i42x", ParsingErrorKind::ExpectedEnd, 3)]
    #[case(b"4spam", ParsingErrorKind::ExpectedColon, 1)]
    #[case(b"-4:spam", ParsingErrorKind::NegativeStringLength, 0)]
    #[case(b"x", ParsingErrorKind::ExpectedValue, 0)]
    #[case(b"e", ParsingErrorKind::ExpectedValue, 0)]
    #[case(b"di1ei2ee", ParsingErrorKind::ExpectedStringStart, 1)]
    #[case(b"d1:ae", ParsingErrorKind::ExpectedValue, 4)]
    #[case(b"i42ei43e", ParsingErrorKind::TrailingData, 4)]
    #[case(b"le3:abc", ParsingErrorKind::TrailingData, 2)]
    fn decode_errors(#[case] input: &[u8], #[case] kind: ParsingErrorKind, #[case] offset: usize) {
        assert_eq!(decode_view(input), Err(ParsingError::new(kind, offset)));
    }

    #[test]
    fn strategies_agree_on_whole_documents() {
        let inputs: [&[u8]; 4] = [
            b"d3:bar4:spam3:fooi42ee",
            b"li18446744073709551616ee",
            b"l4:spam4:eggsi-17ee",
            b"d1:al1:x1:yee",
        ];
        for input in inputs {
            let serial = decode_view_with(
                input,
                DecodeOptions { strategy: Strategy::Serial, ..DecodeOptions::default() },
            );
            let swar = decode_view_with(
                input,
                DecodeOptions { strategy: Strategy::Swar, ..DecodeOptions::default() },
            );
            match (serial, swar) {
                (Ok(a), Ok(b)) => assert_eq!(a.descriptors(), b.descriptors()),
                (a, b) => assert_eq!(a.err(), b.err()),
            }
        }
    }

    #[test]
    fn recursion_limit() {
        let mut input = vec![b'l'; 10];
        input.extend_from_slice(&[b'e'; 10]);
        let options = DecodeOptions { recursion_limit: 4, ..DecodeOptions::default() };
        assert_eq!(
            decode_view_with(&input, options),
            Err(ParsingError::new(ParsingErrorKind::RecursionDepthExceeded, 4))
        );
        let deep = decode_view_with(&input, DecodeOptions::default()).unwrap();
        assert_eq!(deep.root().kind(), crate::Kind::List);
    }
}
