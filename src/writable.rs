//! The `Writable` contract and its four concrete record types.
//!
//! A `Writable` knows how to serialize itself to a byte sink, reporting the
//! exact number of bytes appended, and how to deserialize itself from a
//! byte source. The byte count from `write` is load-bearing: it is the
//! value the writer stores in the parallel key/value-length stream, so an
//! implementation that reports anything other than the bytes it actually
//! appended silently corrupts the format for readers that trust the length
//! stream.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ReadError, Result};
use crate::vlong;

/// The capability set shared by key and value record types.
pub trait Writable: Sized {
    /// Serializes `self` to `sink`, returning the number of bytes written.
    fn write<W: Write>(&self, sink: &mut W) -> Result<usize>;

    /// Deserializes a new value from `source`.
    fn read<R: Read>(source: &mut R) -> Result<Self>;

    /// Deserializes into `self`, reusing any buffer `self` already owns
    /// when possible. The default just replaces `self` wholesale;
    /// [`Text`] and [`Bytes`] override this to reuse their backing buffer.
    fn read_into<R: Read>(&mut self, source: &mut R) -> Result<()> {
        *self = Self::read(source)?;
        Ok(())
    }
}

/// A big-endian 32-bit signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int32(pub i32);

impl Writable for Int32 {
    fn write<W: Write>(&self, sink: &mut W) -> Result<usize> {
        sink.write_i32::<BigEndian>(self.0)?;
        Ok(4)
    }

    fn read<R: Read>(source: &mut R) -> Result<Self> {
        let value = source
            .read_i32::<BigEndian>()
            .map_err(|_| ReadError::Truncated("Int32"))?;
        Ok(Int32(value))
    }
}

/// A big-endian 64-bit signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int64(pub i64);

impl Writable for Int64 {
    fn write<W: Write>(&self, sink: &mut W) -> Result<usize> {
        sink.write_i64::<BigEndian>(self.0)?;
        Ok(8)
    }

    fn read<R: Read>(source: &mut R) -> Result<Self> {
        let value = source
            .read_i64::<BigEndian>()
            .map_err(|_| ReadError::Truncated("Int64"))?;
        Ok(Int64(value))
    }
}

/// A length-prefixed (VLong) byte buffer, used for class names, codec
/// names, and metadata entries, and often for keys and values as well.
/// Despite the name, the payload is not validated as UTF-8: the format
/// only requires that it round-trip byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text(pub Vec<u8>);

impl Text {
    pub fn from_str(s: &str) -> Self {
        Text(s.as_bytes().to_vec())
    }

    pub fn as_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.0)
    }
}

impl Writable for Text {
    fn write<W: Write>(&self, sink: &mut W) -> Result<usize> {
        vlong::write_buffer(sink, &self.0)
    }

    fn read<R: Read>(source: &mut R) -> Result<Self> {
        Ok(Text(vlong::read_buffer(source)?))
    }

    fn read_into<R: Read>(&mut self, source: &mut R) -> Result<()> {
        let len = vlong::read_vlong(source)?;
        let len = usize::try_from(len).map_err(|_| ReadError::Truncated("Text length"))?;
        if self.0.capacity() < len {
            self.0 = vec![0u8; len];
        } else {
            self.0.resize(len, 0);
        }
        source
            .read_exact(&mut self.0[..len])
            .map_err(|_| ReadError::Truncated("Text"))?;
        Ok(())
    }
}

/// A 32-bit big-endian length-prefixed raw byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl Writable for Bytes {
    fn write<W: Write>(&self, sink: &mut W) -> Result<usize> {
        let len = u32::try_from(self.0.len())
            .map_err(|_| crate::error::WriteError::RecordTooLarge(self.0.len()))?;
        sink.write_u32::<BigEndian>(len)?;
        sink.write_all(&self.0)?;
        Ok(self.0.len() + 4)
    }

    fn read<R: Read>(source: &mut R) -> Result<Self> {
        let len = source
            .read_u32::<BigEndian>()
            .map_err(|_| ReadError::Truncated("Bytes length"))?;
        let mut buf = vec![0u8; len as usize];
        source
            .read_exact(&mut buf)
            .map_err(|_| ReadError::Truncated("Bytes"))?;
        Ok(Bytes(buf))
    }

    fn read_into<R: Read>(&mut self, source: &mut R) -> Result<()> {
        let len = source
            .read_u32::<BigEndian>()
            .map_err(|_| ReadError::Truncated("Bytes length"))? as usize;
        if self.0.capacity() < len {
            self.0 = vec![0u8; len];
        } else {
            self.0.resize(len, 0);
        }
        source
            .read_exact(&mut self.0[..len])
            .map_err(|_| ReadError::Truncated("Bytes"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn int32_roundtrip() {
        for x in [i32::MIN, -1, 0, 1, i32::MAX] {
            let mut buf = Vec::new();
            let n = Int32(x).write(&mut buf).unwrap();
            assert_eq!(n, 4);
            assert_eq!(buf.len(), 4);
            let mut cursor = Cursor::new(buf);
            assert_eq!(Int32::read(&mut cursor).unwrap(), Int32(x));
        }
    }

    #[test]
    fn int32_truncated() {
        let mut cursor = Cursor::new(vec![0u8; 2]);
        assert!(Int32::read(&mut cursor).is_err());
    }

    #[test]
    fn int64_roundtrip() {
        for x in [i64::MIN, -1, 0, 1, i64::MAX] {
            let mut buf = Vec::new();
            let n = Int64(x).write(&mut buf).unwrap();
            assert_eq!(n, 8);
            let mut cursor = Cursor::new(buf);
            assert_eq!(Int64::read(&mut cursor).unwrap(), Int64(x));
        }
    }

    #[test]
    fn text_roundtrip_including_empty() {
        for payload in [&b""[..], b"hello", &[0xFFu8, 0x00, 0x80][..]] {
            let text = Text(payload.to_vec());
            let mut buf = Vec::new();
            let n = text.write(&mut buf).unwrap();
            assert_eq!(n, buf.len());
            let mut cursor = Cursor::new(buf);
            assert_eq!(Text::read(&mut cursor).unwrap().0, payload);
        }
    }

    #[test]
    fn text_read_into_reuses_buffer() {
        let mut text = Text(Vec::with_capacity(64));
        let mut buf = Vec::new();
        Text(b"abcdef".to_vec()).write(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        text.read_into(&mut cursor).unwrap();
        assert_eq!(text.0, b"abcdef");
    }

    #[test]
    fn bytes_roundtrip_including_empty() {
        for payload in [&b""[..], b"hello world", &[0u8; 4096][..]] {
            let bytes = Bytes(payload.to_vec());
            let mut buf = Vec::new();
            let n = bytes.write(&mut buf).unwrap();
            assert_eq!(n, payload.len() + 4);
            assert_eq!(n, buf.len());
            let mut cursor = Cursor::new(buf);
            assert_eq!(Bytes::read(&mut cursor).unwrap().0, payload);
        }
    }

    #[test]
    fn bytes_truncated_length() {
        let mut cursor = Cursor::new(vec![0u8; 2]);
        assert!(Bytes::read(&mut cursor).is_err());
    }
}
