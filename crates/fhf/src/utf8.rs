//! Strict UTF-8 decoding of the source text
//!
//! The source text is decoded codepoint by codepoint so that a malformed
//!     sequence can be reported with its exact byte offset.
//! Decoding stops at the first NUL byte.

use crate::Error;

/// Reasons a byte sequence is not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The first byte of the sequence cannot start a sequence.
    #[error("invalid leading byte 0x{0:02X}")]
    InvalidLeadingByte(u8),
    /// A byte following the leading byte does not match `10xxxxxx`.
    #[error("invalid continuation byte 0x{0:02X}")]
    InvalidContinuationByte(u8),
    /// The input ends in the middle of a sequence.
    #[error("the sequence needs {expected} bytes but the input ends after {found}")]
    Truncated { expected: usize, found: usize },
    /// The codepoint is encoded with more bytes than necessary.
    #[error("over-long encoding of U+{0:04X}")]
    Overlong(u32),
    /// The codepoint is beyond U+10FFFF.
    #[error("0x{0:X} is beyond the last Unicode codepoint")]
    OutOfRange(u32),
}

/// The last valid Unicode codepoint.
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Decodes the codepoint at the start of the input.
///
/// Returns the codepoint and the number of bytes it occupies.
/// A NUL byte or empty input returns `(0, 0)`, which marks the end of the string.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize), EncodingError> {
    let Some(&lead) = bytes.first() else {
        return Ok((0, 0));
    };
    let (len, payload, min) = match lead {
        0x00 => return Ok((0, 0)),
        0x01..=0x7F => return Ok((u32::from(lead), 1)),
        _ if lead & 0xE0 == 0xC0 => (2, lead & 0x1F, 0x80),
        _ if lead & 0xF0 == 0xE0 => (3, lead & 0x0F, 0x800),
        _ if lead & 0xF8 == 0xF0 => (4, lead & 0x07, 0x1_0000),
        _ => return Err(EncodingError::InvalidLeadingByte(lead)),
    };
    let mut codepoint = u32::from(payload);
    for i in 1..len {
        let Some(&b) = bytes.get(i) else {
            return Err(EncodingError::Truncated {
                expected: len,
                found: i,
            });
        };
        if b & 0xC0 != 0x80 {
            return Err(EncodingError::InvalidContinuationByte(b));
        }
        codepoint = (codepoint << 6) | u32::from(b & 0x3F);
    }
    if codepoint < min {
        return Err(EncodingError::Overlong(codepoint));
    }
    if codepoint > MAX_CODEPOINT {
        return Err(EncodingError::OutOfRange(codepoint));
    }
    Ok((codepoint, len))
}

/// Decodes the input up to its end or its first NUL byte.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<u32>, Error> {
    let mut codepoints = vec![];
    let mut offset = 0;
    loop {
        let (codepoint, n) =
            decode(&bytes[offset..]).map_err(|source| Error::Encoding { offset, source })?;
        if n == 0 {
            return Ok(codepoints);
        }
        codepoints.push(codepoint);
        offset += n;
    }
}
