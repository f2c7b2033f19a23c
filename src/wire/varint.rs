//! Packed non-negative integers: 1-4 bytes, 7 payload bits per byte.
//!
//! Used for string byte lengths and array element counts. The high bit of
//! every byte but the last signals continuation, which caps the
//! representable range at 2^28 - 1.

use crate::cursor::{ByteSink, ByteSource, NullSink};
use crate::error::WireError;

/// Largest value a packed integer can carry.
pub const MAX_PACKED: u32 = (1 << 28) - 1;

/// Writes `value` in the minimum number of bytes.
pub fn write_packed<S: ByteSink + ?Sized>(sink: &mut S, value: u32) -> Result<(), WireError> {
    if value > MAX_PACKED {
        return Err(WireError::Precondition(format!(
            "packed integer out of range: {value} > {MAX_PACKED}"
        )));
    }
    let mut v = value;
    loop {
        let group = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            return sink.write_u8(group);
        }
        sink.write_u8(group | 0x80)?;
    }
}

/// Reads a packed integer.
///
/// Accepts non-minimal encodings (a non-conforming writer may pad with
/// zero continuation groups); never reads more than 4 bytes.
pub fn read_packed<S: ByteSource + ?Sized>(source: &mut S) -> Result<u32, WireError> {
    read_packed_echo(source, &mut NullSink)
}

/// Reads a packed integer, echoing every consumed byte to `echo`.
///
/// The skip-scanner uses this to re-emit length prefixes verbatim.
pub fn read_packed_echo<S, W>(source: &mut S, echo: &mut W) -> Result<u32, WireError>
where
    S: ByteSource + ?Sized,
    W: ByteSink + ?Sized,
{
    let mut result = 0u32;
    for shift in [0, 7, 14, 21] {
        let byte = source.read_u8()?;
        echo.write_u8(byte)?;
        result |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(WireError::Framing(
        "packed integer continues past 4 bytes".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        write_packed(&mut out, value).unwrap();
        out
    }

    #[test]
    fn known_vectors() {
        assert_eq!(encode(123), [123]);
        assert_eq!(encode(1234), [0xD2, 0x09]);
        assert_eq!(encode(123_456), [0xC0, 0xC4, 0x07]);
        assert_eq!(encode(12_345_678), [0xCE, 0xC2, 0xF1, 0x05]);
    }

    #[test]
    fn minimal_byte_counts_at_boundaries() {
        assert_eq!(encode(0).len(), 1);
        assert_eq!(encode(127).len(), 1);
        assert_eq!(encode(128).len(), 2);
        assert_eq!(encode(16_383).len(), 2);
        assert_eq!(encode(16_384).len(), 3);
        assert_eq!(encode((1 << 21) - 1).len(), 3);
        assert_eq!(encode(1 << 21).len(), 4);
        assert_eq!(encode(MAX_PACKED).len(), 4);
    }

    #[test]
    fn round_trip_boundaries() {
        for value in [
            0,
            1,
            127,
            128,
            16_383,
            16_384,
            (1 << 21) - 1,
            1 << 21,
            MAX_PACKED - 1,
            MAX_PACKED,
        ] {
            let bytes = encode(value);
            let mut src = &bytes[..];
            assert_eq!(read_packed(&mut src).unwrap(), value, "value {value}");
            assert!(src.is_empty(), "value {value} left bytes unread");
        }
    }

    #[test]
    fn rejects_out_of_range() {
        let mut out = Vec::new();
        assert!(matches!(
            write_packed(&mut out, MAX_PACKED + 1),
            Err(WireError::Precondition(_))
        ));
    }

    #[test]
    fn accepts_non_minimal_encoding() {
        // 0 padded to two groups still decodes.
        let mut src = &[0x80u8, 0x00][..];
        assert_eq!(read_packed(&mut src).unwrap(), 0);

        // 1 padded to four groups.
        let mut src = &[0x81u8, 0x80, 0x80, 0x00][..];
        assert_eq!(read_packed(&mut src).unwrap(), 1);
    }

    #[test]
    fn rejects_overlong_continuation() {
        let mut src = &[0xFFu8, 0xFF, 0xFF, 0xFF, 0x7F][..];
        assert!(matches!(
            read_packed(&mut src),
            Err(WireError::Framing(_))
        ));
    }

    #[test]
    fn truncated_input() {
        let mut src = &[0x80u8][..];
        assert!(matches!(
            read_packed(&mut src),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn echo_reproduces_consumed_bytes() {
        let bytes = encode(123_456);
        let mut src = &bytes[..];
        let mut echo = Vec::new();
        assert_eq!(read_packed_echo(&mut src, &mut echo).unwrap(), 123_456);
        assert_eq!(echo, bytes);
    }
}
