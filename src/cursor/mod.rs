//! Byte source/sink traits and adapters.
//!
//! The codec pulls and pushes one byte (or one contiguous run) at a time
//! through these traits; where the bytes live (a slice, a [`bytes`] buffer,
//! a blocking [`std::io`] stream) is an adapter concern.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::WireError;

/// A blocking, forward-only byte producer.
pub trait ByteSource {
    /// Reads the next byte.
    fn read_u8(&mut self) -> Result<u8, WireError>;

    /// Fills `buf` completely from the source.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError>;
}

/// A blocking, append-only byte consumer.
pub trait ByteSink {
    /// Writes a single byte.
    fn write_u8(&mut self, value: u8) -> Result<(), WireError>;

    /// Writes a contiguous run of bytes.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WireError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_u8(&mut self) -> Result<u8, WireError> {
        (**self).read_u8()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        (**self).read_exact(buf)
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_u8(&mut self, value: u8) -> Result<(), WireError> {
        (**self).write_u8(value)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WireError> {
        (**self).write_bytes(data)
    }
}

// -- In-memory sources --

impl ByteSource for &[u8] {
    fn read_u8(&mut self) -> Result<u8, WireError> {
        let (&first, rest) = self
            .split_first()
            .ok_or(WireError::Truncated { needed: 1 })?;
        *self = rest;
        Ok(first)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        if self.len() < buf.len() {
            return Err(WireError::Truncated {
                needed: buf.len() - self.len(),
            });
        }
        let (head, rest) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = rest;
        Ok(())
    }
}

impl ByteSource for Bytes {
    fn read_u8(&mut self) -> Result<u8, WireError> {
        if !self.has_remaining() {
            return Err(WireError::Truncated { needed: 1 });
        }
        Ok(self.get_u8())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        if self.remaining() < buf.len() {
            return Err(WireError::Truncated {
                needed: buf.len() - self.remaining(),
            });
        }
        self.copy_to_slice(buf);
        Ok(())
    }
}

// -- In-memory sinks --

impl ByteSink for Vec<u8> {
    fn write_u8(&mut self, value: u8) -> Result<(), WireError> {
        self.push(value);
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WireError> {
        self.extend_from_slice(data);
        Ok(())
    }
}

impl ByteSink for BytesMut {
    fn write_u8(&mut self, value: u8) -> Result<(), WireError> {
        self.put_u8(value);
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WireError> {
        self.put_slice(data);
        Ok(())
    }
}

/// A sink that discards everything written to it.
///
/// Used where a packed integer must be consumed but not echoed.
pub struct NullSink;

impl ByteSink for NullSink {
    fn write_u8(&mut self, _value: u8) -> Result<(), WireError> {
        Ok(())
    }

    fn write_bytes(&mut self, _data: &[u8]) -> Result<(), WireError> {
        Ok(())
    }
}

// -- Blocking std::io adapters --

/// Adapts a blocking [`std::io::Read`] stream to [`ByteSource`].
///
/// A clean end-of-stream mid-value surfaces as [`WireError::Truncated`];
/// any other I/O error is propagated verbatim.
pub struct IoSource<R> {
    inner: R,
}

impl<R: std::io::Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: std::io::Read> ByteSource for IoSource<R> {
    fn read_u8(&mut self) -> Result<u8, WireError> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        self.inner.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                WireError::Truncated { needed: buf.len() }
            } else {
                WireError::Io(e)
            }
        })
    }
}

/// Adapts a blocking [`std::io::Write`] stream to [`ByteSink`].
pub struct IoSink<W> {
    inner: W,
}

impl<W: std::io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: std::io::Write> ByteSink for IoSink<W> {
    fn write_u8(&mut self, value: u8) -> Result<(), WireError> {
        self.write_bytes(&[value])
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), WireError> {
        self.inner.write_all(data)?;
        Ok(())
    }
}
