//! The compression codec registry.
//!
//! A codec is looked up by the fully-qualified class name string written
//! into a SequenceFile's header. Codecs are stateless: the registry hands
//! back a fresh, zero-sized instance per lookup rather than a shared
//! singleton, since there is no per-codec state to amortize.

use std::io::{Read, Write};

use crate::error::{CodecError, Result, WriteError};

/// The canonical name of the zlib codec.
pub const DEFAULT_CODEC: &str = "org.apache.hadoop.io.compress.DefaultCodec";
/// The canonical name of the bzip2 codec.
pub const BZIP2_CODEC: &str = "org.apache.hadoop.io.compress.BZip2Codec";
/// The canonical name of the (unimplemented) LZ4 codec.
pub const LZ4_CODEC: &str = "org.apache.hadoop.io.compress.Lz4Codec";

/// A named pair of compress/decompress operations.
pub trait Codec {
    /// The fully-qualified class name this codec is registered under.
    fn name(&self) -> &'static str;

    /// Inflates `src`, returning the full decompressed result.
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>>;

    /// Deflates `src`. Codecs that do not support compression (BZip2,
    /// LZ4) return `None` rather than an error value, so callers can
    /// distinguish "this codec has no compress direction at all" from
    /// "compression was attempted and failed".
    fn compress(&self, src: &[u8]) -> Option<Result<Vec<u8>>> {
        let _ = src;
        None
    }
}

/// Looks up a codec by its fully-qualified class name.
pub fn lookup(name: &str) -> Option<Box<dyn Codec>> {
    match name {
        DEFAULT_CODEC => Some(Box::new(DefaultCodec)),
        BZIP2_CODEC => Some(Box::new(BZip2Codec)),
        LZ4_CODEC => Some(Box::new(Lz4Codec)),
        _ => None,
    }
}

/// Fails with [`crate::error::HeaderError::UnsupportedCodec`] style lookup
/// used by header parsing; the writer side uses [`WriteError::UnsupportedCodec`].
pub fn lookup_for_write(name: &str) -> Result<Box<dyn Codec>> {
    lookup(name).ok_or_else(|| WriteError::UnsupportedCodec(name.to_string()).into())
}

/// zlib, both directions. The default codec written by this library.
#[derive(Debug, Default)]
pub struct DefaultCodec;

impl Codec for DefaultCodec {
    fn name(&self) -> &'static str {
        DEFAULT_CODEC
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        use flate2::read::ZlibDecoder;
        let mut decoder = ZlibDecoder::new(src);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|source| CodecError::Decompress {
                codec: "DefaultCodec",
                source,
            })?;
        Ok(out)
    }

    fn compress(&self, src: &[u8]) -> Option<Result<Vec<u8>>> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        let result = encoder
            .write_all(src)
            .and_then(|()| encoder.finish())
            .map_err(|source| CodecError::Compress {
                codec: "DefaultCodec",
                source,
            }.into());
        Some(result)
    }
}

/// bzip2, decompress only. A writer configured with this codec can still
/// emit a header, but flushing a non-empty block fails with
/// [`WriteError::CodecNotInvertible`] because `compress` returns `None`.
#[derive(Debug, Default)]
pub struct BZip2Codec;

impl Codec for BZip2Codec {
    fn name(&self) -> &'static str {
        BZIP2_CODEC
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        use bzip2::read::BzDecoder;
        let mut decoder = BzDecoder::new(src);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|source| CodecError::Decompress {
                codec: "BZip2Codec",
                source,
            })?;
        Ok(out)
    }
}

/// LZ4. Present only so that the name resolves in the registry; neither
/// direction is implemented, matching the upstream implementation this
/// library tracks.
#[derive(Debug, Default)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn name(&self) -> &'static str {
        LZ4_CODEC
    }

    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        let _ = src;
        Err(CodecError::Decompress {
            codec: "Lz4Codec",
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "Lz4Codec decompression is not implemented",
            ),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_all_registered_names() {
        assert!(lookup(DEFAULT_CODEC).is_some());
        assert!(lookup(BZIP2_CODEC).is_some());
        assert!(lookup(LZ4_CODEC).is_some());
        assert!(lookup("org.apache.hadoop.io.compress.GzipCodec").is_none());
    }

    #[test]
    fn default_codec_roundtrip() {
        let codec = DefaultCodec;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let compressed = codec.compress(&input).unwrap().unwrap();
        assert_ne!(compressed, input);
        let decompressed = codec.decompress(&compressed).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn default_codec_roundtrip_empty() {
        let codec = DefaultCodec;
        let compressed = codec.compress(&[]).unwrap().unwrap();
        let decompressed = codec.decompress(&compressed).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn bzip2_codec_has_no_compress_direction() {
        let codec = BZip2Codec;
        assert!(codec.compress(b"anything").is_none());
    }

    #[test]
    fn lz4_codec_decompress_fails() {
        let codec = Lz4Codec;
        assert!(codec.decompress(&[]).is_err());
    }

    #[test]
    fn unsupported_name_fails_write_lookup() {
        assert!(lookup_for_write("not.a.real.codec").is_err());
    }
}
