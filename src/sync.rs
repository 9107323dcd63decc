//! The per-file sync marker.
//!
//! A sync marker is 16 bytes chosen once when a file is created, written
//! into the header, and repeated before every subsequent block so a reader
//! can re-align on a block boundary. It carries no semantic content beyond
//! "generated once, compared byte-for-byte thereafter".

use std::io::{Read, Write};

use rand::TryRngCore;

use crate::error::{ReadError, Result};

pub const SYNC_SIZE: usize = 16;
/// The 32-bit sentinel written before every sync marker. Historically a
/// "record length = -1" escape distinguishing a sync boundary from an
/// inline record in the record-compressed variant; the block-compressed
/// reader does not interpret its value, only its presence.
pub const SYNC_ESCAPE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// A file's 16-byte sync marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMarker(pub [u8; SYNC_SIZE]);

impl SyncMarker {
    /// Generates a marker from a cryptographically strong randomness
    /// source, as the writer does once per file at construction.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SYNC_SIZE];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .expect("OS randomness source failed");
        SyncMarker(bytes)
    }

    pub fn write<W: Write>(&self, sink: &mut W) -> Result<usize> {
        sink.write_all(&self.0)?;
        Ok(SYNC_SIZE)
    }

    pub fn read<R: Read>(source: &mut R) -> Result<Self> {
        let mut bytes = [0u8; SYNC_SIZE];
        source
            .read_exact(&mut bytes)
            .map_err(|_| ReadError::Truncated("sync marker"))?;
        Ok(SyncMarker(bytes))
    }
}

/// Writes the sync escape word followed by `marker`, as emitted before
/// every block.
pub fn write_escape_and_marker<W: Write>(sink: &mut W, marker: &SyncMarker) -> Result<usize> {
    sink.write_all(&SYNC_ESCAPE)?;
    let n = marker.write(sink)?;
    Ok(4 + n)
}

/// Reads and discards the sync escape word, then reads a marker and
/// compares it against `expected`, failing with
/// [`ReadError::SyncMismatch`] on divergence.
pub fn read_and_verify<R: Read>(source: &mut R, expected: &SyncMarker) -> Result<()> {
    let mut escape = [0u8; 4];
    source
        .read_exact(&mut escape)
        .map_err(|_| ReadError::Truncated("sync escape"))?;
    let marker = SyncMarker::read(source)?;
    if &marker != expected {
        return Err(ReadError::SyncMismatch.into());
    }
    Ok(())
}
