use std::io::{Cursor, Read};

use crate::codec::{self, Codec};
use crate::error::{ReadError, Result};
use crate::header::Header;
use crate::vlong;
use crate::writable::Writable;

/// A loaded, fully decompressed block: four parallel byte streams plus a
/// cursor over how many of the block's records have been yielded.
struct Block {
    #[allow(dead_code)]
    key_lengths: Cursor<Vec<u8>>,
    keys: Cursor<Vec<u8>>,
    #[allow(dead_code)]
    value_lengths: Cursor<Vec<u8>>,
    values: Cursor<Vec<u8>>,
    count: i64,
    cursor: i64,
}

impl Block {
    fn exhausted(&self) -> bool {
        self.cursor >= self.count
    }
}

/// Reads a block-compressed SequenceFile record by record.
///
/// Construction parses the header; each call to [`Reader::read`] loads a
/// fresh block on demand and yields the next (key, value) pair, reporting
/// end-of-input as `Ok(false)` rather than as an error.
pub struct Reader<R> {
    inner: R,
    header: Header,
    codec: Option<Box<dyn Codec>>,
    block: Option<Block>,
}

impl<R: Read> Reader<R> {
    /// Parses the header from `inner` and returns a reader positioned at
    /// the first block.
    pub fn new(mut inner: R) -> Result<Self> {
        let header = Header::parse(&mut inner)?;
        let codec = match &header.codec_name {
            Some(name) => codec::lookup(std::str::from_utf8(&name.0).unwrap_or_default()),
            None => None,
        };
        Ok(Reader {
            inner,
            header,
            codec,
            block: None,
        })
    }

    /// The parsed file header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Reads the next record into `key` and `value`. Returns `Ok(true)`
    /// if a record was read, `Ok(false)` at end-of-input.
    pub fn read<K: Writable, V: Writable>(&mut self, key: &mut K, value: &mut V) -> Result<bool> {
        loop {
            match &self.block {
                Some(block) if !block.exhausted() => break,
                _ => {
                    if !self.try_load_block()? {
                        return Ok(false);
                    }
                }
            }
        }

        let block = self.block.as_mut().expect("just loaded");
        key.read_into(&mut block.keys)?;
        value.read_into(&mut block.values)?;
        block.cursor += 1;
        Ok(true)
    }

    /// Releases the current block. The underlying source is not closed.
    pub fn close(&mut self) {
        self.block = None;
    }

    /// Attempts to load the next block. Returns `Ok(false)` when the
    /// source has nothing left to offer at a block boundary — the
    /// reader's normal termination signal, mirroring the end-of-stream
    /// probe used elsewhere in this crate's record readers. Any further
    /// truncation once a block has started loading is a genuine
    /// [`ReadError::Truncated`] error.
    fn try_load_block(&mut self) -> Result<bool> {
        let mut escape = [0u8; 4];
        if self.inner.read_exact(&mut escape).is_err() {
            let mut probe = [0u8; 1];
            return match self.inner.read(&mut probe) {
                Ok(0) => Ok(false),
                _ => Err(ReadError::Truncated("sync escape").into()),
            };
        }

        if let Some(sync_marker) = &self.header.sync_marker {
            let mut marker = [0u8; crate::sync::SYNC_SIZE];
            self.inner
                .read_exact(&mut marker)
                .map_err(|_| ReadError::Truncated("sync marker"))?;
            if marker != sync_marker.0 {
                return Err(ReadError::SyncMismatch.into());
            }
        }

        let count = vlong::read_vlong(&mut self.inner)?;
        let key_lengths_raw = vlong::read_buffer(&mut self.inner)?;
        let keys_raw = vlong::read_buffer(&mut self.inner)?;
        let value_lengths_raw = vlong::read_buffer(&mut self.inner)?;
        let values_raw = vlong::read_buffer(&mut self.inner)?;

        let (key_lengths, keys, value_lengths, values) = match &self.codec {
            Some(codec) => (
                codec.decompress(&key_lengths_raw)?,
                codec.decompress(&keys_raw)?,
                codec.decompress(&value_lengths_raw)?,
                codec.decompress(&values_raw)?,
            ),
            None => (key_lengths_raw, keys_raw, value_lengths_raw, values_raw),
        };

        self.block = Some(Block {
            key_lengths: Cursor::new(key_lengths),
            keys: Cursor::new(keys),
            value_lengths: Cursor::new(value_lengths),
            values: Cursor::new(values),
            count,
            cursor: 0,
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Codec, DefaultCodec, DEFAULT_CODEC};
    use crate::sync::{SyncMarker, SYNC_ESCAPE, SYNC_SIZE};
    use crate::vlong::{write_buffer, write_vlong};
    use crate::writable::{Bytes, Text};

    /// Returns the encoded file and the byte offset at which the first
    /// block's sync marker begins (right after the header and the 4-byte
    /// sync escape word).
    fn build_single_record_file() -> (Vec<u8>, usize) {
        let sync = SyncMarker([9u8; SYNC_SIZE]);
        let mut buf = Vec::new();
        crate::header::write_header(
            &mut buf,
            "org.apache.hadoop.io.Text",
            "org.apache.hadoop.io.BytesWritable",
            DEFAULT_CODEC,
            &sync,
        )
        .unwrap();

        let key = Text::from_str("hello");
        let value = Bytes(vec![0u8; 10]);
        let mut key_buf = Vec::new();
        let kn = key.write(&mut key_buf).unwrap();
        let mut value_buf = Vec::new();
        let vn = value.write(&mut value_buf).unwrap();
        let mut key_lens = Vec::new();
        write_vlong(&mut key_lens, kn as i64).unwrap();
        let mut value_lens = Vec::new();
        write_vlong(&mut value_lens, vn as i64).unwrap();

        let codec = DefaultCodec;
        let key_lens_c = codec.compress(&key_lens).unwrap().unwrap();
        let keys_c = codec.compress(&key_buf).unwrap().unwrap();
        let value_lens_c = codec.compress(&value_lens).unwrap().unwrap();
        let values_c = codec.compress(&value_buf).unwrap().unwrap();

        buf.extend_from_slice(&SYNC_ESCAPE);
        let marker_offset = buf.len();
        sync.write(&mut buf).unwrap();
        write_vlong(&mut buf, 1).unwrap();
        write_buffer(&mut buf, &key_lens_c).unwrap();
        write_buffer(&mut buf, &keys_c).unwrap();
        write_buffer(&mut buf, &value_lens_c).unwrap();
        write_buffer(&mut buf, &values_c).unwrap();

        (buf, marker_offset)
    }

    #[test]
    fn reads_single_record_then_end_of_input() {
        let (buf, _) = build_single_record_file();
        let mut reader = Reader::new(Cursor::new(buf)).unwrap();
        let mut key = Text::default();
        let mut value = Bytes::default();
        assert!(reader.read(&mut key, &mut value).unwrap());
        assert_eq!(key.0, b"hello");
        assert_eq!(value.0, vec![0u8; 10]);
        assert!(!reader.read(&mut key, &mut value).unwrap());
    }

    #[test]
    fn one_byte_buffer_fails_truncated() {
        // spec.md S3: a one-byte buffer can't complete the magic, so this
        // is Truncated, not BadMagic.
        let err = Reader::new(Cursor::new(vec![0u8])).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Read(crate::error::ReadError::Truncated("magic"))
        ));
    }

    #[test]
    fn unsupported_version_rejected() {
        let buf = vec![b'S', b'E', b'Q', 0x07];
        let err = Reader::new(Cursor::new(buf)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Header(crate::error::HeaderError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn tampered_sync_marker_fails() {
        let (mut buf, marker_offset) = build_single_record_file();
        // flip a byte inside the 16-byte marker itself, not anywhere else
        // in the block, so this exercises SyncMismatch specifically
        // (spec.md §8 property 6) rather than a downstream codec error.
        buf[marker_offset] ^= 0xFF;
        let mut reader = Reader::new(Cursor::new(buf)).unwrap();
        let mut key = Text::default();
        let mut value = Bytes::default();
        let err = reader.read(&mut key, &mut value).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Read(crate::error::ReadError::SyncMismatch)
        ));
    }
}
