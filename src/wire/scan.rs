//! Skip-scan: consuming and echoing the unparsed tail of a record.
//!
//! A reader built against schema version N can pass through fields appended
//! by a writer at version N+k: every entry after the known fields is copied
//! to a sink byte-for-byte, without interpreting it, until the record's own
//! end marker. Nested composites the reader has never seen are recursed
//! through; the re-emitted bytes are identical to the originals.

use crate::cursor::{ByteSink, ByteSource};
use crate::error::WireError;
use crate::wire::decode::Reader;
use crate::wire::{tag, varint};

/// Echoes everything up to the end marker of the record currently open in
/// `reader`. The marker is pushed back, not consumed, so the framing check
/// that closes the record still sees it.
pub(crate) fn scan_rest<S, W>(reader: &mut Reader<S>, sink: &mut W) -> Result<(), WireError>
where
    S: ByteSource,
    W: ByteSink + ?Sized,
{
    let mut scanner = Scanner { reader, sink };
    scanner.scan_body(false)?;
    tracing::trace!("skip-scanned unknown record tail");
    Ok(())
}

struct Scanner<'a, S, W: ?Sized> {
    reader: &'a mut Reader<S>,
    sink: &'a mut W,
}

impl<S: ByteSource, W: ByteSink + ?Sized> Scanner<'_, S, W> {
    /// Scans entries until the end marker matching the already-open record.
    ///
    /// `depth` counts unmatched USER_TYPE tags; record-array elements are
    /// handled out-of-band in `scan_element` and never touch it. The final
    /// marker is echoed for nested element scans and pushed back for the
    /// outer scan.
    fn scan_body(&mut self, echo_final_marker: bool) -> Result<(), WireError> {
        let mut depth = 1usize;
        loop {
            let t = self.reader.read_u8()?;
            match t {
                tag::END_MARKER => {
                    depth -= 1;
                    if depth == 0 {
                        if echo_final_marker {
                            return self.sink.write_u8(t);
                        }
                        self.reader.push_back(t);
                        return Ok(());
                    }
                    self.sink.write_u8(t)?;
                }
                tag::USER_TYPE => {
                    self.sink.write_u8(t)?;
                    depth += 1;
                }
                _ => self.scan_entry(t)?,
            }
        }
    }

    /// Echoes one non-structural entry: the tag, then its payload, sized by
    /// the tag alone.
    fn scan_entry(&mut self, t: u8) -> Result<(), WireError> {
        const TRUE_TAG: u8 = tag::BOOLEAN | tag::BOOLEAN_TRUE_BIT;
        self.sink.write_u8(t)?;
        match t {
            // The boolean value rides in the tag; none of these carry
            // payload bytes.
            tag::NULL | tag::BOOLEAN | TRUE_TAG => Ok(()),
            tag::BYTE => self.copy(1),
            tag::CHAR | tag::SHORT => self.copy(2),
            tag::INT | tag::FLOAT => self.copy(4),
            tag::LONG | tag::DOUBLE => self.copy(8),
            tag::STRING => {
                let len = varint::read_packed_echo(&mut *self.reader, &mut *self.sink)?;
                self.copy(len as usize)
            }
            _ if tag::is_array(t) => self.scan_array(tag::element_kind(t)),
            _ => Err(WireError::Framing(format!(
                "unrecognized tag 0x{t:02X} in skip scan"
            ))),
        }
    }

    fn scan_array(&mut self, element: u8) -> Result<(), WireError> {
        let count = varint::read_packed_echo(&mut *self.reader, &mut *self.sink)? as usize;
        if element == tag::USER_TYPE {
            for _ in 0..count {
                self.scan_element()?;
            }
            return Ok(());
        }
        match tag::fixed_width(element) {
            Some(width) => self.copy(count * width),
            None => Err(WireError::Framing(format!(
                "array of unsupported element kind {element} in skip scan"
            ))),
        }
    }

    /// One record-array element: a bare NULL byte, or a field sequence
    /// closed by its own end marker. The element's marker is echoed and
    /// deliberately does not touch the enclosing depth counter.
    fn scan_element(&mut self) -> Result<(), WireError> {
        let t = self.reader.read_u8()?;
        if t == tag::NULL {
            return self.sink.write_u8(t);
        }
        self.reader.push_back(t);
        self.scan_body(true)
    }

    fn copy(&mut self, len: usize) -> Result<(), WireError> {
        self.reader.copy_bytes(len, self.sink)
    }
}
