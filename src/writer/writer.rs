use std::io::Write;

use crate::codec::{self, Codec};
use crate::error::{Result, WriteError};
use crate::header;
use crate::sync::{self, SyncMarker};
use crate::vlong;
use crate::writable::Writable;

/// The minimum uncompressed block size, in bytes, at which a block becomes
/// eligible to flush. Checked before a record is appended, so a block may
/// end up slightly larger than this once the triggering record is added.
pub const BLOCK_SIZE_MIN: usize = 1 << 20;

const DEFAULT_KEY_CLASS: &str = "org.apache.hadoop.io.Text";
const DEFAULT_VALUE_CLASS: &str = "org.apache.hadoop.io.BytesWritable";

/// Construction options for [`Writer`]. Unset fields fall back to the
/// defaults this library writes: a `Text` key class, a `BytesWritable`
/// value class, and the zlib-backed default codec.
#[derive(Debug, Clone, Default)]
pub struct WriterOptions {
    pub key_class_name: Option<String>,
    pub value_class_name: Option<String>,
    pub compression_codec: Option<String>,
}

/// The four uncompressed, parallel per-block buffers, plus the record
/// count they describe. Reused across blocks: cleared rather than
/// reallocated once flushed.
struct BlockBuffers {
    key_lengths: Vec<u8>,
    keys: Vec<u8>,
    value_lengths: Vec<u8>,
    values: Vec<u8>,
    count: i64,
}

impl BlockBuffers {
    fn new() -> Self {
        BlockBuffers {
            key_lengths: Vec::new(),
            keys: Vec::new(),
            value_lengths: Vec::new(),
            values: Vec::new(),
            count: 0,
        }
    }

    fn size(&self) -> usize {
        self.key_lengths.len() + self.keys.len() + self.value_lengths.len() + self.values.len()
    }

    fn clear(&mut self) {
        self.key_lengths.clear();
        self.keys.clear();
        self.value_lengths.clear();
        self.values.clear();
        self.count = 0;
    }
}

/// Writes a block-compressed SequenceFile record by record.
///
/// Construction emits the header immediately. Records are buffered into
/// the current block and the block is flushed once its uncompressed size
/// reaches [`BLOCK_SIZE_MIN`]; [`Writer::close`] flushes whatever remains.
pub struct Writer<W: Write> {
    inner: W,
    codec: Box<dyn Codec>,
    codec_name: String,
    sync_marker: SyncMarker,
    block: Option<BlockBuffers>,
}

impl<W: Write> Writer<W> {
    /// Constructs a writer with default options (see [`WriterOptions`]).
    pub fn new(inner: W) -> Result<Self> {
        Self::with_options(inner, WriterOptions::default())
    }

    /// Constructs a writer, emitting the header immediately.
    pub fn with_options(mut inner: W, options: WriterOptions) -> Result<Self> {
        let key_class_name = options
            .key_class_name
            .unwrap_or_else(|| DEFAULT_KEY_CLASS.to_string());
        let value_class_name = options
            .value_class_name
            .unwrap_or_else(|| DEFAULT_VALUE_CLASS.to_string());
        let codec_name = options
            .compression_codec
            .unwrap_or_else(|| codec::DEFAULT_CODEC.to_string());

        let codec = codec::lookup_for_write(&codec_name)?;
        let sync_marker = SyncMarker::generate();
        header::write_header(
            &mut inner,
            &key_class_name,
            &value_class_name,
            &codec_name,
            &sync_marker,
        )?;

        Ok(Writer {
            inner,
            codec,
            codec_name,
            sync_marker,
            block: None,
        })
    }

    /// Appends a record, opening a new block if none is open and flushing
    /// the current one first if it is at or over [`BLOCK_SIZE_MIN`].
    pub fn write<K: Writable, V: Writable>(&mut self, key: &K, value: &V) -> Result<()> {
        let needs_new_block = match &self.block {
            None => true,
            Some(block) => block.size() >= BLOCK_SIZE_MIN,
        };
        if needs_new_block {
            match self.block.take() {
                Some(old) => {
                    if old.count > 0 {
                        self.emit_block(&old)?;
                    }
                    let mut reused = old;
                    reused.clear();
                    self.block = Some(reused);
                }
                None => self.block = Some(BlockBuffers::new()),
            }
        }

        let block = self.block.as_mut().expect("block opened above");
        let kn = key.write(&mut block.keys)?;
        vlong::write_vlong(&mut block.key_lengths, kn as i64)?;
        let vn = value.write(&mut block.values)?;
        vlong::write_vlong(&mut block.value_lengths, vn as i64)?;
        block.count += 1;
        Ok(())
    }

    /// Flushes the current block, if any and non-empty. The underlying
    /// sink is not closed.
    pub fn close(&mut self) -> Result<()> {
        if let Some(block) = self.block.take() {
            if block.count > 0 {
                self.emit_block(&block)?;
            }
        }
        Ok(())
    }

    fn emit_block(&mut self, block: &BlockBuffers) -> Result<()> {
        sync::write_escape_and_marker(&mut self.inner, &self.sync_marker)?;
        vlong::write_vlong(&mut self.inner, block.count)?;
        for buf in [
            &block.key_lengths,
            &block.keys,
            &block.value_lengths,
            &block.values,
        ] {
            let compressed = self
                .codec
                .compress(buf)
                .ok_or_else(|| WriteError::CodecNotInvertible(self.codec_name.clone()).into())??;
            vlong::write_buffer(&mut self.inner, &compressed)?;
        }
        Ok(())
    }
}
