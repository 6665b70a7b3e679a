use crate::parser::{ParseError, Result};
use chrono::{DateTime, Utc};

// Seconds between the container epoch (1904-01-01T00:00:00 UTC) and the
// Unix epoch.
const EPOCH_1904_OFFSET: i64 = 2_082_844_800;

/// Fold big-endian bytes into an unsigned integer. Inputs longer than 8
/// bytes would overflow; decoders never produce them.
pub(crate) fn be_uint(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Convert a raw container timestamp (seconds since 1904-01-01 UTC) to
/// calendar time.
pub fn mp4_time(raw: u32) -> DateTime<Utc> {
    // a u32 shifted by the 1904 offset is always in chrono's range
    DateTime::from_timestamp(i64::from(raw) - EPOCH_1904_OFFSET, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Decode a dotted fixed-point field of 2 or 4 bytes: the first half is
/// the integer part, the second half reads as literal decimal digits
/// after the point. `[0xFF, 0x11]` is 255.17, not 255 + 17/256.
///
/// Empty input decodes to 0; odd or oversized lengths fail.
pub fn dotted_notation_to_f(bytes: &[u8]) -> Result<f64> {
    if bytes.is_empty() {
        return Ok(0.0);
    }
    if bytes.len() % 2 != 0 || bytes.len() > 4 {
        return Err(ParseError::InvalidFixedPoint(bytes.len()));
    }

    let (head, tail) = bytes.split_at(bytes.len() / 2);
    let head = be_uint(head);
    let tail = be_uint(tail);

    // smallest power of 10 strictly greater than the fractional half
    let mut base = 1u64;
    while base <= tail {
        base *= 10;
    }

    Ok(head as f64 + tail as f64 / base as f64)
}
