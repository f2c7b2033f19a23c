//! Tag byte constants and the array-composition algebra.
//!
//! A tag's low nibble is the value *kind*; the high nibble is the *element
//! kind* for arrays, the value bit for booleans, and zero otherwise. Tag 0
//! is reserved.

use crate::error::WireError;

/// Kind mask, the low four bits.
pub const MASK: u8 = 0x0F;

// Fixed-width scalars: tag byte, then the payload.
pub const BYTE: u8 = 1;
pub const CHAR: u8 = 2;
pub const SHORT: u8 = 3;
pub const INT: u8 = 4;
pub const LONG: u8 = 5;
pub const FLOAT: u8 = 6;
pub const DOUBLE: u8 = 7;

/// Tag byte, packed-integer byte length, UTF-8 bytes.
pub const STRING: u8 = 8;

/// Tag byte (high nibble = element kind), packed-integer count, elements.
pub const ARRAY: u8 = 9;

/// Tag byte only.
pub const NULL: u8 = 10;

/// Tag byte, 0..N tagged fields, END_MARKER.
pub const USER_TYPE: u8 = 11;

/// Tag byte only.
pub const END_MARKER: u8 = 12;

/// Tag byte only; the value rides in bit 4, bits 5-7 are reserved.
pub const BOOLEAN: u8 = 13;

/// High-nibble bit carrying an encoded boolean's value.
pub const BOOLEAN_TRUE_BIT: u8 = 1 << 4;

/// Extracts the kind (low nibble) from a tag byte.
pub fn kind(tag: u8) -> u8 {
    tag & MASK
}

/// Checks whether the tag byte denotes an array.
pub fn is_array(tag: u8) -> bool {
    tag & MASK == ARRAY
}

/// Extracts the element kind (high nibble) from an array tag byte.
pub fn element_kind(tag: u8) -> u8 {
    (tag >> 4) & MASK
}

/// Combines the array kind with an element kind in a single tag byte.
///
/// Arrays of arrays are not supported; the element kind must fit the
/// high nibble.
pub fn array(element_kind: u8) -> Result<u8, WireError> {
    if element_kind & MASK != element_kind || element_kind == ARRAY {
        return Err(WireError::Precondition(format!(
            "bad array element kind: {element_kind}"
        )));
    }
    Ok(ARRAY | (element_kind << 4))
}

/// Payload width in bytes for the fixed-width scalar kinds.
pub fn fixed_width(kind: u8) -> Option<usize> {
    match kind {
        BYTE => Some(1),
        CHAR | SHORT => Some(2),
        INT | FLOAT => Some(4),
        LONG | DOUBLE => Some(8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_tag_round_trips() {
        for element in [BYTE, CHAR, SHORT, INT, LONG, FLOAT, DOUBLE, USER_TYPE] {
            let tag = array(element).unwrap();
            assert!(is_array(tag));
            assert_eq!(kind(tag), ARRAY);
            assert_eq!(element_kind(tag), element);
        }
    }

    #[test]
    fn array_of_array_rejected() {
        assert!(matches!(array(ARRAY), Err(WireError::Precondition(_))));
    }

    #[test]
    fn oversized_element_kind_rejected() {
        assert!(matches!(array(16), Err(WireError::Precondition(_))));
        assert!(matches!(array(0xFF), Err(WireError::Precondition(_))));
    }

    #[test]
    fn scalar_tags_are_not_arrays() {
        for tag in [BYTE, STRING, NULL, USER_TYPE, END_MARKER, BOOLEAN] {
            assert!(!is_array(tag));
        }
    }

    #[test]
    fn fixed_width_table() {
        assert_eq!(fixed_width(BYTE), Some(1));
        assert_eq!(fixed_width(CHAR), Some(2));
        assert_eq!(fixed_width(SHORT), Some(2));
        assert_eq!(fixed_width(INT), Some(4));
        assert_eq!(fixed_width(FLOAT), Some(4));
        assert_eq!(fixed_width(LONG), Some(8));
        assert_eq!(fixed_width(DOUBLE), Some(8));
        assert_eq!(fixed_width(STRING), None);
        assert_eq!(fixed_width(USER_TYPE), None);
    }
}
