//! Slot encoding for integers, fixed-width text and data log offsets.
//!
//! All multi-byte integers are little-endian. Offsets into the data log
//! reuse the integer encoding.

use std::ops::Range;

/// Byte range of `slot` in a data region of `width`-byte slots
pub fn slot_range(slot: usize, width: usize) -> Range<usize> {
    let start = slot * width;
    start..start + width
}

/// Decode a 4-byte little-endian integer
pub fn decode_int(bytes: &[u8]) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    i32::from_le_bytes(buf)
}

/// Encode a 4-byte little-endian integer
pub fn encode_int(bytes: &mut [u8], value: i32) {
    bytes[..4].copy_from_slice(&value.to_le_bytes());
}

/// Longest prefix of `value` with at most `max_chars` characters and
/// `max_bytes` bytes, cut on a character boundary.
pub fn fit_text(value: &str, max_chars: usize, max_bytes: usize) -> &str {
    let mut end = 0;
    for (count, (pos, ch)) in value.char_indices().enumerate() {
        let next = pos + ch.len_utf8();
        if count == max_chars || next > max_bytes {
            break;
        }
        end = next;
    }
    &value[..end]
}

/// Decode a null-padded text slot
pub fn decode_text(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Encode `value` into a text slot, truncating and null-padding to the
/// slot width.
///
/// Returns `true` if the value had to be truncated.
pub fn encode_text(bytes: &mut [u8], value: &str) -> bool {
    let width = bytes.len();
    let fitted = fit_text(value, width, width);
    bytes[..fitted.len()].copy_from_slice(fitted.as_bytes());
    bytes[fitted.len()..].fill(0);
    fitted.len() < value.len()
}
