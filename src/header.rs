//! File header parsing and emission.
//!
//! The header is read once, at reader construction, and written once, at
//! writer construction. This library only ever emits version 5 (the
//! block-compressed variant with a codec-name field but no metadata
//! section); on read it accepts versions 4 through 6 inclusive, since
//! those are the versions for which the block-compressed layout this
//! library implements is well-defined.

use std::collections::HashMap;
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::codec;
use crate::error::{HeaderError, Result};
use crate::sync::SyncMarker;
use crate::writable::{Text, Writable};

const MAGIC: [u8; 3] = *b"SEQ";

/// The version byte this library writes.
pub const WRITE_VERSION: u8 = 5;

/// A parsed SequenceFile header.
#[derive(Debug, Clone)]
pub struct Header {
    pub version: u8,
    pub key_class_name: Text,
    pub value_class_name: Text,
    pub compressed: bool,
    pub block_compressed: bool,
    pub codec_name: Option<Text>,
    pub metadata: Option<HashMap<Vec<u8>, Vec<u8>>>,
    pub sync_marker: Option<SyncMarker>,
}

impl Header {
    /// Parses a header from `source`, per the field table: magic, version,
    /// key/value class names, compression flags, optional codec name,
    /// optional metadata, and a sync marker.
    pub fn parse<R: Read>(source: &mut R) -> Result<Self> {
        let mut magic = [0u8; 3];
        match source.read_exact(&mut magic) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(crate::error::ReadError::Truncated("magic").into());
            }
            Err(e) => return Err(e.into()),
        }
        if magic != MAGIC {
            return Err(HeaderError::BadMagic.into());
        }

        let version = source
            .read_u8()
            .map_err(|_| crate::error::ReadError::Truncated("version"))?;
        if version > 6 || version < 4 {
            return Err(HeaderError::UnsupportedVersion(version).into());
        }

        let key_class_name = Text::read(source)?;
        let value_class_name = Text::read(source)?;

        let compressed = if version > 2 {
            read_bool(source)?
        } else {
            false
        };

        let block_compressed = if version >= 4 {
            read_bool(source)?
        } else {
            false
        };
        if !block_compressed {
            return Err(HeaderError::NotBlockCompressed.into());
        }

        let codec_name = if compressed {
            if version >= 5 {
                let name = Text::read(source)?;
                if codec::lookup(std::str::from_utf8(&name.0).unwrap_or_default()).is_none() {
                    return Err(HeaderError::UnsupportedCodec(
                        String::from_utf8_lossy(&name.0).into_owned(),
                    )
                    .into());
                }
                Some(name)
            } else {
                return Err(HeaderError::UnsupportedVersion(version).into());
            }
        } else {
            None
        };

        let metadata = if version >= 6 {
            let count = source
                .read_u32::<BigEndian>()
                .map_err(|_| crate::error::ReadError::Truncated("metadata count"))?;
            let mut map = HashMap::with_capacity(count as usize);
            for _ in 0..count {
                let key = Text::read(source)?;
                let value = Text::read(source)?;
                map.insert(key.0, value.0);
            }
            Some(map)
        } else {
            None
        };

        let sync_marker = if version > 1 {
            Some(SyncMarker::read(source)?)
        } else {
            None
        };

        Ok(Header {
            version,
            key_class_name,
            value_class_name,
            compressed,
            block_compressed,
            codec_name,
            metadata,
            sync_marker,
        })
    }
}

fn read_bool<R: Read>(source: &mut R) -> Result<bool> {
    let byte = source
        .read_u8()
        .map_err(|_| crate::error::ReadError::Truncated("boolean flag"))?;
    Ok(byte != 0)
}

fn write_bool<W: Write>(sink: &mut W, value: bool) -> Result<()> {
    sink.write_u8(u8::from(value))?;
    Ok(())
}

/// Writes a version-5 header: magic, version, key/value class names,
/// `compressed = true`, `blockCompressed = true`, the codec class name,
/// and the sync marker. Version 5 carries no metadata section.
pub fn write_header<W: Write>(
    sink: &mut W,
    key_class_name: &str,
    value_class_name: &str,
    codec_name: &str,
    sync_marker: &SyncMarker,
) -> Result<()> {
    sink.write_all(&MAGIC)?;
    sink.write_u8(WRITE_VERSION)?;
    Text::from_str(key_class_name).write(sink)?;
    Text::from_str(value_class_name).write(sink)?;
    write_bool(sink, true)?;
    write_bool(sink, true)?;
    Text::from_str(codec_name).write(sink)?;
    sync_marker.write(sink)?;
    Ok(())
}
