//! Error types for reading and writing block-compressed SequenceFiles.

/// Errors that can occur while parsing or validating a file header.
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    #[error("bad magic number: expected `SEQ`")]
    BadMagic,

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u8),

    #[error("file is not block-compressed; only the block-compressed variant is supported")]
    NotBlockCompressed,

    #[error("unsupported compression codec: {0}")]
    UnsupportedCodec(String),
}

/// Errors that can occur while reading blocks or records.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("unexpected end of input while reading {0}")]
    Truncated(&'static str),

    #[error("block sync marker did not match the header's sync marker")]
    SyncMismatch,
}

/// Errors that can occur while writing blocks or records.
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("unsupported compression codec: {0}")]
    UnsupportedCodec(String),

    #[error("codec `{0}` does not support compression; cannot flush a block")]
    CodecNotInvertible(String),

    #[error("record of {0} bytes exceeds the maximum encodable length")]
    RecordTooLarge(usize),
}

/// Errors surfaced by a codec's own compress/decompress implementation.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("codec `{codec}` failed to decompress its input: {source}")]
    Decompress {
        codec: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("codec `{codec}` failed to compress its input: {source}")]
    Compress {
        codec: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// The crate's unified error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A `Result` alias using [`Error`] as its error type.
pub type Result<T> = std::result::Result<T, Error>;
