//! Reader and writer for block-compressed Hadoop SequenceFiles.
//!
//! A SequenceFile is a self-describing, record-oriented binary container:
//! a header declares the key/value types, the compression codec, and a
//! per-file sync marker, and the body is a sequence of blocks, each of
//! which carries its own record count and four independently compressed
//! substreams (key lengths, keys, value lengths, values). This crate
//! implements the block-compressed variant only; it does not read or
//! write the uncompressed or record-compressed variants.
//!
//! ```no_run
//! use sequencefile::{Reader, Writer, WriterOptions, Text, Bytes};
//! use std::io::Cursor;
//!
//! # fn main() -> sequencefile::Result<()> {
//! let mut buf = Vec::new();
//! let mut writer = Writer::new(&mut buf)?;
//! writer.write(&Text::from_str("key"), &Bytes(b"value".to_vec()))?;
//! writer.close()?;
//!
//! let mut reader = Reader::new(Cursor::new(buf))?;
//! let mut key = Text::default();
//! let mut value = Bytes::default();
//! while reader.read(&mut key, &mut value)? {
//!     // ...
//! }
//! # Ok(())
//! # }
//! ```

#![allow(clippy::module_inception)]

pub mod codec;
pub mod error;
mod header;
mod reader;
mod sync;
mod vlong;
mod writable;
mod writer;

pub use codec::{Codec, BZIP2_CODEC, DEFAULT_CODEC, LZ4_CODEC};
pub use error::{CodecError, Error, HeaderError, ReadError, Result, WriteError};
pub use header::Header;
pub use reader::Reader;
pub use sync::SyncMarker;
pub use writable::{Bytes, Int32, Int64, Text, Writable};
pub use writer::{Writer, WriterOptions, BLOCK_SIZE_MIN};
