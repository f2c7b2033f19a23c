//! User-defined composite records.

use crate::cursor::{ByteSink, ByteSource};
use crate::error::WireError;
use crate::wire::{Reader, Writer};

/// Field-level encode/decode strategy for a composite record type.
///
/// The codec owns the bracketing (USER_TYPE tag, end marker, null handling);
/// implementations own the fields. Both methods must walk the same fields in
/// the same fixed order. An implementation that needs to survive fields
/// appended by a newer schema version ends `read_fields` with
/// [`Reader::read_rest`], stores the captured blob, and ends `write_fields`
/// with [`Writer::write_rest`] to pass it through unchanged.
pub trait Record: Sized {
    /// Writes this record's fields through `writer`, in the type's fixed
    /// field order.
    fn write_fields<S: ByteSink>(&self, writer: &mut Writer<S>) -> Result<(), WireError>;

    /// Reads the fields `write_fields` emitted, in the same order.
    fn read_fields<S: ByteSource>(reader: &mut Reader<S>) -> Result<Self, WireError>;
}
