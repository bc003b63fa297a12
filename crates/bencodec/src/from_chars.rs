//! Decimal integer parsing for the bencode grammar.
//!
//! Two interchangeable strategies are provided, selected with [`Strategy`]:
//! a scalar baseline that consumes one digit per step, and a word-parallel
//! (SWAR) path that classifies and converts eight packed digit bytes per
//! machine word. Both enforce the same grammar rules and must agree on every
//! input: same value and consumed length on success, same error kind and
//! offset on failure. The scalar path doubles as the fallback whenever the
//! remaining buffer is too short to fill a word.

use crate::error::{ParsingError, ParsingErrorKind};

/// Selects which digit-run parser the decoder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One decimal digit per step, overflow-checked past the safe width.
    Serial,
    /// Word-parallel digit classification and packed-BCD conversion, falling
    /// back to [`Strategy::Serial`] near the end of the buffer.
    #[default]
    Swar,
}

/// A successfully parsed number and the count of bytes consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FromChars<T> {
    pub value: T,
    pub len: usize,
}

const POW10_U64: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

const POW10_U32: [u32; 5] = [1, 10, 100, 1_000, 10_000];

// u64::MAX has 20 digits, u32::MAX has 10; the unchecked fast loops stop one
// digit earlier.
const SAFE_DIGITS_U64: usize = 19;
const SAFE_DIGITS_U32: usize = 9;

// A SWAR chunk needs a full word of lookahead plus room for the trailing
// chunks, so short inputs take the serial path.
const SWAR_THRESHOLD_U64: usize = 20;
const SWAR_THRESHOLD_U32: usize = 12;

#[inline]
fn load_u64(chunk: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&chunk[..8]);
    u64::from_le_bytes(bytes)
}

#[inline]
fn load_u32(chunk: &[u8]) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&chunk[..4]);
    u32::from_le_bytes(bytes)
}

/// Counts the leading ASCII digits in a little-endian word, branch-free.
///
/// Adding `0x46` rolls `'9'` to `0x7f`, subtracting `'0'` underflows anything
/// below `'0'`; or-ing the two marks every non-digit byte in its high bit.
/// Bytes past the first non-digit may be corrupted by carries, which is fine
/// because only the lowest marked bit is inspected.
#[inline]
fn digit_run_u64(word: u64) -> usize {
    let high = word.wrapping_add(0x4646_4646_4646_4646);
    let low = word.wrapping_sub(0x3030_3030_3030_3030);
    let mask = (high | low) & 0x8080_8080_8080_8080;
    (mask.trailing_zeros() / 8) as usize
}

#[inline]
fn digit_run_u32(word: u32) -> usize {
    let high = word.wrapping_add(0x4646_4646);
    let low = word.wrapping_sub(0x3030_3030);
    let mask = (high | low) & 0x8080_8080;
    (mask.trailing_zeros() / 8) as usize
}

const SWAR64_MASK: [u64; 9] = [
    0x0,
    0x01,
    0x0101,
    0x01_0101,
    0x0101_0101,
    0x01_0101_0101,
    0x0101_0101_0101,
    0x01_0101_0101_0101,
    0x0101_0101_0101_0101,
];

const SWAR32_MASK: [u32; 5] = [0x0, 0x01, 0x0101, 0x01_0101, 0x0101_0101];

/// Converts the first `n` packed digit bytes of a little-endian word into a
/// binary value with a fixed number of arithmetic steps.
///
/// The reduction combines adjacent digits pairwise: x10 within byte pairs,
/// x100 within 16-bit lanes, x10000 across 32-bit lanes.
#[inline]
fn parse_digits_u64(word: u64, n: usize) -> u64 {
    if n == 0 {
        return 0;
    }
    let aligned = word.swap_bytes() >> (8 * (8 - n));
    let t1 = aligned.wrapping_sub(u64::from(b'0') * SWAR64_MASK[n]);
    let t2 = t1.wrapping_mul(10) >> 8;
    let t3 = t1.wrapping_add(t2) & 0x00ff_00ff_00ff_00ff;
    let t4 = t3.wrapping_mul(100 + (1 << 16)) >> 16;
    let t5 = t4 & 0x0000_ffff_0000_ffff;
    t5.wrapping_mul(10_000 + (1 << 32)) >> 32
}

#[inline]
fn parse_digits_u32(word: u32, n: usize) -> u32 {
    if n == 0 {
        return 0;
    }
    let aligned = word.swap_bytes() >> (8 * (4 - n));
    let t1 = aligned.wrapping_sub(u32::from(b'0') * SWAR32_MASK[n]);
    let t2 = t1.wrapping_mul(10) >> 8;
    let t3 = t1.wrapping_add(t2) & 0x00ff_00ff;
    t3.wrapping_mul(100 + (1 << 16)) >> 16
}

fn parse_u64_serial(buf: &[u8]) -> Result<FromChars<u64>, ParsingError> {
    if buf.is_empty() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, 0));
    }
    let leading_zero = buf[0] == b'0';
    let mut value: u64 = 0;
    let mut pos = 0;
    while pos < buf.len() && pos < SAFE_DIGITS_U64 {
        let d = buf[pos].wrapping_sub(b'0');
        if d > 9 {
            break;
        }
        value = value * 10 + u64::from(d);
        pos += 1;
    }
    if pos == SAFE_DIGITS_U64 {
        while pos < buf.len() {
            let d = buf[pos].wrapping_sub(b'0');
            if d > 9 {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(d)))
                .ok_or_else(|| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?;
            pos += 1;
        }
    }
    if pos == 0 {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedDigit, 0));
    }
    if leading_zero && pos > 1 {
        return Err(ParsingError::new(ParsingErrorKind::LeadingZero, 0));
    }
    Ok(FromChars { value, len: pos })
}

fn parse_u32_serial(buf: &[u8]) -> Result<FromChars<u32>, ParsingError> {
    if buf.is_empty() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, 0));
    }
    let leading_zero = buf[0] == b'0';
    let mut value: u32 = 0;
    let mut pos = 0;
    while pos < buf.len() && pos < SAFE_DIGITS_U32 {
        let d = buf[pos].wrapping_sub(b'0');
        if d > 9 {
            break;
        }
        value = value * 10 + u32::from(d);
        pos += 1;
    }
    if pos == SAFE_DIGITS_U32 {
        while pos < buf.len() {
            let d = buf[pos].wrapping_sub(b'0');
            if d > 9 {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(d)))
                .ok_or_else(|| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?;
            pos += 1;
        }
    }
    if pos == 0 {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedDigit, 0));
    }
    if leading_zero && pos > 1 {
        return Err(ParsingError::new(ParsingErrorKind::LeadingZero, 0));
    }
    Ok(FromChars { value, len: pos })
}

fn parse_u64_swar(buf: &[u8]) -> Result<FromChars<u64>, ParsingError> {
    if buf.len() < SWAR_THRESHOLD_U64 {
        return parse_u64_serial(buf);
    }
    let leading_zero = buf[0] == b'0';
    let mut pos = 0;

    let word = load_u64(&buf[pos..]);
    let n = digit_run_u64(word);
    let mut value = parse_digits_u64(word, n);
    pos += n;

    if n == 8 {
        let word = load_u64(&buf[pos..]);
        let n = digit_run_u64(word);
        // Sixteen digits always fit: no overflow check needed yet.
        value = value * POW10_U64[n] + parse_digits_u64(word, n);
        pos += n;

        if n == 8 {
            let word = load_u32(&buf[pos..]);
            let n = digit_run_u32(word);
            let chunk = u64::from(parse_digits_u32(word, n));
            value = value
                .checked_mul(POW10_U64[n])
                .and_then(|v| v.checked_add(chunk))
                .ok_or_else(|| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?;
            pos += n;
            if n == 4 {
                // Leading zeros can stretch a run past twenty digits without
                // overflowing; finish digit by digit, overflow-checked.
                while pos < buf.len() {
                    let d = buf[pos].wrapping_sub(b'0');
                    if d > 9 {
                        break;
                    }
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(d)))
                        .ok_or_else(|| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?;
                    pos += 1;
                }
            }
        }
    }

    if pos == 0 {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedDigit, 0));
    }
    if leading_zero && pos > 1 {
        return Err(ParsingError::new(ParsingErrorKind::LeadingZero, 0));
    }
    Ok(FromChars { value, len: pos })
}

fn parse_u32_swar(buf: &[u8]) -> Result<FromChars<u32>, ParsingError> {
    if buf.len() < SWAR_THRESHOLD_U32 {
        return parse_u32_serial(buf);
    }
    let leading_zero = buf[0] == b'0';
    let mut pos = 0;

    let word = load_u64(&buf[pos..]);
    let n = digit_run_u64(word);
    // Eight digits top out below u32::MAX.
    #[allow(clippy::cast_possible_truncation)]
    let mut value = parse_digits_u64(word, n) as u32;
    pos += n;

    if n == 8 {
        let word = load_u32(&buf[pos..]);
        let n = digit_run_u32(word);
        let chunk = parse_digits_u32(word, n);
        value = value
            .checked_mul(POW10_U32[n])
            .and_then(|v| v.checked_add(chunk))
            .ok_or_else(|| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?;
        pos += n;
        if n == 4 {
            while pos < buf.len() {
                let d = buf[pos].wrapping_sub(b'0');
                if d > 9 {
                    break;
                }
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u32::from(d)))
                    .ok_or_else(|| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?;
                pos += 1;
            }
        }
    }

    if pos == 0 {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedDigit, 0));
    }
    if leading_zero && pos > 1 {
        return Err(ParsingError::new(ParsingErrorKind::LeadingZero, 0));
    }
    Ok(FromChars { value, len: pos })
}

pub(crate) fn parse_u64(buf: &[u8], strategy: Strategy) -> Result<FromChars<u64>, ParsingError> {
    match strategy {
        Strategy::Serial => parse_u64_serial(buf),
        Strategy::Swar => parse_u64_swar(buf),
    }
}

pub(crate) fn parse_u32(buf: &[u8], strategy: Strategy) -> Result<FromChars<u32>, ParsingError> {
    match strategy {
        Strategy::Serial => parse_u32_serial(buf),
        Strategy::Swar => parse_u32_swar(buf),
    }
}

/// Parses an optionally negated digit run into an `i64`.
///
/// Range errors are reported at the start of the token regardless of which
/// digit tipped the value over, so both strategies agree on the offset.
pub(crate) fn parse_i64(buf: &[u8], strategy: Strategy) -> Result<FromChars<i64>, ParsingError> {
    if buf.is_empty() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, 0));
    }
    let negative = buf[0] == b'-';
    let digits = if negative { &buf[1..] } else { buf };
    if negative && digits.is_empty() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, 1));
    }
    let fc = parse_u64(digits, strategy).map_err(|e| {
        if e.kind == ParsingErrorKind::ValueOutOfRange {
            ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0)
        } else if negative {
            e.offset_by(1)
        } else {
            e
        }
    })?;
    let len = fc.len + usize::from(negative);
    let value = if negative {
        if fc.value == 0 {
            return Err(ParsingError::new(ParsingErrorKind::NegativeZero, 0));
        }
        if fc.value == 1 << 63 {
            i64::MIN
        } else {
            i64::try_from(fc.value)
                .map(|v| -v)
                .map_err(|_| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?
        }
    } else {
        i64::try_from(fc.value)
            .map_err(|_| ParsingError::new(ParsingErrorKind::ValueOutOfRange, 0))?
    };
    Ok(FromChars { value, len })
}

/// Parses a complete `i<digits>e` integer token at `pos`, returning the value
/// and the position just past the end token. Error offsets are absolute.
pub(crate) fn parse_integer_token(
    buf: &[u8],
    pos: usize,
    strategy: Strategy,
) -> Result<(i64, usize), ParsingError> {
    if pos >= buf.len() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, buf.len()));
    }
    if buf[pos] != b'i' {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedIntegerStart, pos));
    }
    let start = pos + 1;
    let fc = parse_i64(&buf[start..], strategy).map_err(|e| e.offset_by(start))?;
    let end = start + fc.len;
    if end >= buf.len() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, buf.len()));
    }
    if buf[end] != b'e' {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedEnd, end));
    }
    Ok((fc.value, end + 1))
}

/// Parses a complete `<length>:<payload>` string token at `pos`.
///
/// Returns the payload range start, its length, and the position just past
/// the payload. Payload bytes are never copied.
pub(crate) fn parse_string_token(
    buf: &[u8],
    pos: usize,
    strategy: Strategy,
) -> Result<(usize, usize, usize), ParsingError> {
    if pos >= buf.len() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, buf.len()));
    }
    if buf[pos] == b'-' {
        return Err(ParsingError::new(ParsingErrorKind::NegativeStringLength, pos));
    }
    let fc = parse_u32(&buf[pos..], strategy).map_err(|e| e.offset_by(pos))?;
    let colon = pos + fc.len;
    if colon >= buf.len() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, buf.len()));
    }
    if buf[colon] != b':' {
        return Err(ParsingError::new(ParsingErrorKind::ExpectedColon, colon));
    }
    let payload = colon + 1;
    let length = fc.value as usize;
    let end = payload
        .checked_add(length)
        .ok_or_else(|| ParsingError::new(ParsingErrorKind::UnexpectedEof, buf.len()))?;
    if end > buf.len() {
        return Err(ParsingError::new(ParsingErrorKind::UnexpectedEof, buf.len()));
    }
    Ok((payload, length, end))
}
