//! Encoding: values → tagged bytes.

use crate::cursor::ByteSink;
use crate::error::WireError;
use crate::record::Record;
use crate::wire::{tag, varint};

/// Encodes tagged values into a byte sink.
///
/// Integer writes pick the narrowest tag that losslessly holds the value,
/// independent of the field's declared type; the matching `Reader` methods
/// widen back. Not safe to share across threads mid-stream; use one writer
/// per stream.
pub struct Writer<S> {
    sink: S,
}

impl<S: ByteSink> Writer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Consumes the writer, returning the underlying sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    fn put_u8(&mut self, byte: u8) -> Result<(), WireError> {
        self.sink.write_u8(byte)
    }

    fn put_length(&mut self, len: usize) -> Result<(), WireError> {
        let n = u32::try_from(len).map_err(|_| {
            WireError::Precondition(format!("length {len} exceeds packed integer range"))
        })?;
        varint::write_packed(&mut self.sink, n)
    }

    // -- Scalars --

    /// Writes a boolean; the value rides in the tag's high nibble, there is
    /// no payload byte.
    pub fn write_bool(&mut self, value: bool) -> Result<(), WireError> {
        self.put_u8(if value {
            tag::BOOLEAN | tag::BOOLEAN_TRUE_BIT
        } else {
            tag::BOOLEAN
        })
    }

    /// Writes a byte. Never narrowed further: always tag + 1 payload byte.
    pub fn write_i8(&mut self, value: i8) -> Result<(), WireError> {
        self.put_u8(tag::BYTE)?;
        self.put_u8(value as u8)
    }

    /// Writes an unsigned 16-bit character value.
    ///
    /// Values up to 127 are narrowed to BYTE; anything above gets the CHAR
    /// tag with an unsigned little-endian payload.
    pub fn write_u16(&mut self, value: u16) -> Result<(), WireError> {
        if value <= 0x7F {
            self.write_i8(value as i8)
        } else {
            self.put_u8(tag::CHAR)?;
            self.sink.write_bytes(&value.to_le_bytes())
        }
    }

    /// Writes a signed 16-bit value, narrowed to BYTE when it fits.
    pub fn write_i16(&mut self, value: i16) -> Result<(), WireError> {
        if let Ok(narrow) = i8::try_from(value) {
            self.write_i8(narrow)
        } else {
            self.put_u8(tag::SHORT)?;
            self.sink.write_bytes(&value.to_le_bytes())
        }
    }

    /// Writes a signed 32-bit value, narrowed to SHORT or BYTE when it fits.
    pub fn write_i32(&mut self, value: i32) -> Result<(), WireError> {
        if let Ok(narrow) = i16::try_from(value) {
            self.write_i16(narrow)
        } else {
            self.put_u8(tag::INT)?;
            self.sink.write_bytes(&value.to_le_bytes())
        }
    }

    /// Writes a signed 64-bit value, narrowed to INT, SHORT or BYTE when it
    /// fits.
    pub fn write_i64(&mut self, value: i64) -> Result<(), WireError> {
        if let Ok(narrow) = i32::try_from(value) {
            self.write_i32(narrow)
        } else {
            self.put_u8(tag::LONG)?;
            self.sink.write_bytes(&value.to_le_bytes())
        }
    }

    /// Writes a 32-bit float. Floats are never narrowed.
    pub fn write_f32(&mut self, value: f32) -> Result<(), WireError> {
        self.put_u8(tag::FLOAT)?;
        self.sink.write_bytes(&value.to_le_bytes())
    }

    /// Writes a 64-bit float. Floats are never narrowed.
    pub fn write_f64(&mut self, value: f64) -> Result<(), WireError> {
        self.put_u8(tag::DOUBLE)?;
        self.sink.write_bytes(&value.to_le_bytes())
    }

    /// Writes a string: packed UTF-8 byte length, then the bytes.
    /// `None` is a bare NULL tag.
    pub fn write_string(&mut self, value: Option<&str>) -> Result<(), WireError> {
        let Some(value) = value else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::STRING)?;
        self.put_length(value.len())?;
        self.sink.write_bytes(value.as_bytes())
    }

    // -- Arrays --
    //
    // One array tag declares the element kind; elements carry no per-element
    // tags and are never narrowed.

    pub fn write_byte_array(&mut self, values: Option<&[u8]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::BYTE)?)?;
        self.put_length(values.len())?;
        self.sink.write_bytes(values)
    }

    pub fn write_u16_array(&mut self, values: Option<&[u16]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::CHAR)?)?;
        self.put_length(values.len())?;
        for &v in values {
            self.sink.write_bytes(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn write_i16_array(&mut self, values: Option<&[i16]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::SHORT)?)?;
        self.put_length(values.len())?;
        for &v in values {
            self.sink.write_bytes(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn write_i32_array(&mut self, values: Option<&[i32]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::INT)?)?;
        self.put_length(values.len())?;
        for &v in values {
            self.sink.write_bytes(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn write_i64_array(&mut self, values: Option<&[i64]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::LONG)?)?;
        self.put_length(values.len())?;
        for &v in values {
            self.sink.write_bytes(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn write_f32_array(&mut self, values: Option<&[f32]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::FLOAT)?)?;
        self.put_length(values.len())?;
        for &v in values {
            self.sink.write_bytes(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn write_f64_array(&mut self, values: Option<&[f64]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::DOUBLE)?)?;
        self.put_length(values.len())?;
        for &v in values {
            self.sink.write_bytes(&v.to_le_bytes())?;
        }
        Ok(())
    }

    // -- Records --

    /// Writes a composite record: USER_TYPE tag, the type's fields, end
    /// marker. `None` is a bare NULL tag.
    pub fn write_record<T: Record>(&mut self, value: Option<&T>) -> Result<(), WireError> {
        let Some(value) = value else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::USER_TYPE)?;
        self.write_record_body(value)
    }

    /// Writes an array of records. Each element is a field sequence closed
    /// by its own end marker; the array tag already declares the element
    /// kind, so no per-element USER_TYPE tag is written.
    pub fn write_record_array<T: Record>(&mut self, values: Option<&[T]>) -> Result<(), WireError> {
        let Some(values) = values else {
            return self.put_u8(tag::NULL);
        };
        self.put_u8(tag::array(tag::USER_TYPE)?)?;
        self.put_length(values.len())?;
        for value in values {
            self.write_record_body(value)?;
        }
        Ok(())
    }

    fn write_record_body<T: Record>(&mut self, value: &T) -> Result<(), WireError> {
        value.write_fields(self)?;
        self.put_u8(tag::END_MARKER)
    }

    /// Appends an opaque blob after a record's known fields, untagged.
    ///
    /// This is the raw passthrough region for fields captured from a newer
    /// schema version via [`crate::wire::Reader::read_rest`]; only
    /// [`Record::write_fields`] implementations should call it, and only as
    /// their final write.
    pub fn write_rest(&mut self, blob: &[u8]) -> Result<(), WireError> {
        self.sink.write_bytes(blob)
    }
}
