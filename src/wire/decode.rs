//! Decoding: tagged bytes → values.

use crate::cursor::{ByteSink, ByteSource};
use crate::error::WireError;
use crate::record::Record;
use crate::wire::{scan, tag, varint};

fn mismatch(expected: &'static str, found: u8) -> WireError {
    WireError::TypeMismatch { expected, found }
}

/// Decodes tagged values from a byte source.
///
/// Integer reads accept any tag narrower than or equal to the requested
/// width and widen the payload (sign-extending for signed reads). Not safe
/// to share across threads mid-stream; use one reader per stream.
pub struct Reader<S> {
    source: S,
    /// Single-byte pushback slot; holds an end marker the skip-scanner has
    /// reached but must leave for the enclosing framing check.
    unread: Option<u8>,
    /// Count of unmatched USER_TYPE tags currently open.
    depth: usize,
    /// Reusable bounded buffer for skip-scan bulk copies.
    scratch: Vec<u8>,
}

impl<S: ByteSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            unread: None,
            depth: 0,
            scratch: Vec::new(),
        }
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn read_n<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut bytes = [0u8; N];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    pub(crate) fn push_back(&mut self, byte: u8) {
        debug_assert!(self.unread.is_none(), "pushback slot already occupied");
        self.unread = Some(byte);
    }

    /// Copies `len` bytes from the source to `sink` through the scratch
    /// buffer. The buffer is retained across calls and capped at a fixed
    /// chunk size, so a malformed length prefix cannot force a large
    /// allocation here.
    pub(crate) fn copy_bytes<W: ByteSink + ?Sized>(
        &mut self,
        len: usize,
        sink: &mut W,
    ) -> Result<(), WireError> {
        const CHUNK: usize = 8 * 1024;

        let mut scratch = std::mem::take(&mut self.scratch);
        let target = len.min(CHUNK);
        if scratch.len() < target {
            scratch.resize(target, 0);
        }

        let mut remaining = len;
        let mut result = Ok(());
        while remaining > 0 {
            let n = remaining.min(scratch.len());
            let step = self
                .read_exact(&mut scratch[..n])
                .and_then(|()| sink.write_bytes(&scratch[..n]));
            if let Err(e) = step {
                result = Err(e);
                break;
            }
            remaining -= n;
        }
        self.scratch = scratch;
        result
    }

    // -- Scalars --

    /// Reads a boolean. Only the two boolean tag bytes are acceptable; a
    /// boolean tag with reserved high bits set is a mismatch.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        const TRUE_TAG: u8 = tag::BOOLEAN | tag::BOOLEAN_TRUE_BIT;
        match self.read_u8()? {
            tag::BOOLEAN => Ok(false),
            TRUE_TAG => Ok(true),
            t => Err(mismatch("boolean", t)),
        }
    }

    /// Reads a byte. Accepts only the BYTE tag.
    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        match self.read_u8()? {
            tag::BYTE => Ok(self.read_u8()? as i8),
            t => Err(mismatch("byte", t)),
        }
    }

    /// Reads an unsigned 16-bit character value. Accepts BYTE
    /// (zero-extended) or CHAR.
    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        match self.read_u8()? {
            tag::BYTE => Ok(u16::from(self.read_u8()?)),
            tag::CHAR => Ok(u16::from_le_bytes(self.read_n()?)),
            t => Err(mismatch("char-compatible value", t)),
        }
    }

    /// Reads a signed 16-bit value. Accepts BYTE (sign-extended) or SHORT.
    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        match self.read_u8()? {
            tag::BYTE => Ok(i16::from(self.read_u8()? as i8)),
            tag::SHORT => Ok(i16::from_le_bytes(self.read_n()?)),
            t => Err(mismatch("short-compatible value", t)),
        }
    }

    /// Reads a signed 32-bit value. Accepts BYTE, SHORT or INT.
    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        match self.read_u8()? {
            tag::BYTE => Ok(i32::from(self.read_u8()? as i8)),
            tag::SHORT => Ok(i32::from(i16::from_le_bytes(self.read_n()?))),
            tag::INT => Ok(i32::from_le_bytes(self.read_n()?)),
            t => Err(mismatch("int-compatible value", t)),
        }
    }

    /// Reads a signed 64-bit value. Accepts BYTE, SHORT, INT or LONG.
    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        match self.read_u8()? {
            tag::BYTE => Ok(i64::from(self.read_u8()? as i8)),
            tag::SHORT => Ok(i64::from(i16::from_le_bytes(self.read_n()?))),
            tag::INT => Ok(i64::from(i32::from_le_bytes(self.read_n()?))),
            tag::LONG => Ok(i64::from_le_bytes(self.read_n()?)),
            t => Err(mismatch("long-compatible value", t)),
        }
    }

    /// Reads a 32-bit float. Accepts only the FLOAT tag.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        match self.read_u8()? {
            tag::FLOAT => Ok(f32::from_le_bytes(self.read_n()?)),
            t => Err(mismatch("float", t)),
        }
    }

    /// Reads a 64-bit float. Accepts only the DOUBLE tag.
    pub fn read_f64(&mut self) -> Result<f64, WireError> {
        match self.read_u8()? {
            tag::DOUBLE => Ok(f64::from_le_bytes(self.read_n()?)),
            t => Err(mismatch("double", t)),
        }
    }

    /// Reads a string; NULL decodes to `None` without consuming further
    /// bytes. Malformed UTF-8 is a decode failure.
    pub fn read_string(&mut self) -> Result<Option<String>, WireError> {
        match self.read_u8()? {
            tag::NULL => Ok(None),
            tag::STRING => {
                let len = varint::read_packed(self)? as usize;
                let mut bytes = vec![0u8; len];
                self.read_exact(&mut bytes)?;
                Ok(Some(String::from_utf8(bytes)?))
            }
            t => Err(mismatch("string", t)),
        }
    }

    // -- Arrays --

    /// Reads the array header for the expected element kind, or NULL.
    fn read_array_header(
        &mut self,
        element: u8,
        expected: &'static str,
    ) -> Result<Option<usize>, WireError> {
        let t = self.read_u8()?;
        if t == tag::NULL {
            return Ok(None);
        }
        if !tag::is_array(t) || tag::element_kind(t) != element {
            return Err(mismatch(expected, t));
        }
        Ok(Some(varint::read_packed(self)? as usize))
    }

    pub fn read_byte_array(&mut self) -> Result<Option<Vec<u8>>, WireError> {
        let Some(len) = self.read_array_header(tag::BYTE, "byte array")? else {
            return Ok(None);
        };
        let mut values = vec![0u8; len];
        self.read_exact(&mut values)?;
        Ok(Some(values))
    }

    pub fn read_u16_array(&mut self) -> Result<Option<Vec<u16>>, WireError> {
        let Some(len) = self.read_array_header(tag::CHAR, "char array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(u16::from_le_bytes(self.read_n()?));
        }
        Ok(Some(values))
    }

    pub fn read_i16_array(&mut self) -> Result<Option<Vec<i16>>, WireError> {
        let Some(len) = self.read_array_header(tag::SHORT, "short array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(i16::from_le_bytes(self.read_n()?));
        }
        Ok(Some(values))
    }

    pub fn read_i32_array(&mut self) -> Result<Option<Vec<i32>>, WireError> {
        let Some(len) = self.read_array_header(tag::INT, "int array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(i32::from_le_bytes(self.read_n()?));
        }
        Ok(Some(values))
    }

    pub fn read_i64_array(&mut self) -> Result<Option<Vec<i64>>, WireError> {
        let Some(len) = self.read_array_header(tag::LONG, "long array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(i64::from_le_bytes(self.read_n()?));
        }
        Ok(Some(values))
    }

    pub fn read_f32_array(&mut self) -> Result<Option<Vec<f32>>, WireError> {
        let Some(len) = self.read_array_header(tag::FLOAT, "float array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(f32::from_le_bytes(self.read_n()?));
        }
        Ok(Some(values))
    }

    pub fn read_f64_array(&mut self) -> Result<Option<Vec<f64>>, WireError> {
        let Some(len) = self.read_array_header(tag::DOUBLE, "double array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(f64::from_le_bytes(self.read_n()?));
        }
        Ok(Some(values))
    }

    // -- Records --

    /// Reads a composite record; NULL decodes to `None`.
    ///
    /// The type's fields are read in their fixed order, after which the very
    /// next tag must be the end marker; anything else means the field
    /// reader consumed the wrong number of fields, or the stream is corrupt.
    pub fn read_record<T: Record>(&mut self) -> Result<Option<T>, WireError> {
        match self.read_u8()? {
            tag::NULL => Ok(None),
            tag::USER_TYPE => self.read_record_body().map(Some),
            t => Err(mismatch("record", t)),
        }
    }

    /// Reads an array of records. Elements carry no leading USER_TYPE tag;
    /// each is a field sequence closed by its own end marker.
    pub fn read_record_array<T: Record>(&mut self) -> Result<Option<Vec<T>>, WireError> {
        let Some(len) = self.read_array_header(tag::USER_TYPE, "record array")? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(self.read_record_body()?);
        }
        Ok(Some(values))
    }

    fn read_record_body<T: Record>(&mut self) -> Result<T, WireError> {
        let entry_depth = self.depth;
        self.depth += 1;
        let value = T::read_fields(self)?;
        debug_assert_eq!(self.depth, entry_depth + 1, "nested records unbalanced");
        let t = self.read_u8()?;
        if t != tag::END_MARKER {
            tracing::trace!(tag = t, depth = self.depth, "record not closed by end marker");
            return Err(WireError::Framing(format!(
                "expected end marker closing record, found tag 0x{t:02X}"
            )));
        }
        self.depth = entry_depth;
        Ok(value)
    }

    /// Consumes and echoes every entry up to, but not including, the end
    /// marker of the record currently being read.
    ///
    /// Called from a [`Record::read_fields`] implementation after its known
    /// fields, this captures everything a newer schema version appended
    /// (including arbitrarily nested composites) byte-for-byte, suitable for
    /// re-emission through [`crate::wire::Writer::write_rest`]. The end
    /// marker itself is left in the stream for the enclosing framing check.
    pub fn read_rest<W: ByteSink + ?Sized>(&mut self, sink: &mut W) -> Result<(), WireError> {
        scan::scan_rest(self, sink)
    }
}

/// A reader is itself a byte source: raw reads drain the pushback slot
/// first, then the underlying cursor.
impl<S: ByteSource> ByteSource for Reader<S> {
    fn read_u8(&mut self) -> Result<u8, WireError> {
        if let Some(byte) = self.unread.take() {
            return Ok(byte);
        }
        self.source.read_u8()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        match self.unread.take() {
            None => self.source.read_exact(buf),
            Some(byte) => {
                let Some((first, rest)) = buf.split_first_mut() else {
                    self.unread = Some(byte);
                    return Ok(());
                };
                *first = byte;
                self.source.read_exact(rest)
            }
        }
    }
}
