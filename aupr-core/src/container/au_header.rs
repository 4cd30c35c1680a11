use crate::error::{AuprError, Result};
use crate::format::{AU_HEADER_LEN, AU_MAGIC, SAMPLE_WIDTH};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub magic: u32,
    /// Byte offset where sample data starts, counted from the start of the file
    pub data_off: i32,
}

impl BlockHeader {
    pub fn new(data_off: i32) -> Self {
        Self {
            magic: AU_MAGIC,
            data_off,
        }
    }

    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        w.write_all(&self.magic.to_le_bytes())?;
        w.write_all(&self.data_off.to_le_bytes())?;
        Ok(())
    }

    pub fn decode(raw: &[u8; AU_HEADER_LEN as usize]) -> Self {
        let mut m = [0u8; 4];
        m.copy_from_slice(&raw[0..4]);
        let mut o = [0u8; 4];
        o.copy_from_slice(&raw[4..8]);
        Self {
            magic: u32::from_le_bytes(m),
            data_off: i32::from_le_bytes(o),
        }
    }

    /// Reads the first 8 bytes of `r` and checks the magic. `path` only labels errors.
    pub fn read_from(r: impl Read, path: &Path) -> Result<Self> {
        let mut buf = Vec::with_capacity(AU_HEADER_LEN as usize);
        r.take(AU_HEADER_LEN).read_to_end(&mut buf)?;
        let raw: [u8; AU_HEADER_LEN as usize] =
            buf.as_slice()
                .try_into()
                .map_err(|_| AuprError::TruncatedFile {
                    path: path.to_path_buf(),
                    len: buf.len() as u64,
                })?;
        let hdr = Self::decode(&raw);
        if hdr.magic != AU_MAGIC {
            return Err(AuprError::HeaderMismatch {
                path: path.to_path_buf(),
                found: hdr.magic,
            });
        }
        Ok(hdr)
    }
}

/// Payload layout of a block whose header validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockGeometry {
    pub data_off: u64,
    pub size: u64,
    pub samples: u64,
}

impl BlockGeometry {
    pub fn from_header(path: &Path, hdr: &BlockHeader, size: u64) -> Result<Self> {
        let malformed = || AuprError::MalformedPayload {
            path: path.to_path_buf(),
            size,
            data_offset: hdr.data_off,
        };
        let data_off = u64::try_from(hdr.data_off).map_err(|_| malformed())?;
        let payload = size.checked_sub(data_off).ok_or_else(malformed)?;
        if payload % SAMPLE_WIDTH != 0 {
            return Err(malformed());
        }
        Ok(Self {
            data_off,
            size,
            samples: payload / SAMPLE_WIDTH,
        })
    }
}

/// Open `path`, read its header and release the handle.
pub fn inspect(path: &Path) -> Result<BlockHeader> {
    let f = File::open(path)?;
    BlockHeader::read_from(f, path)
}

/// Header check followed by the sample count derived from the file size.
pub fn inspect_block(path: &Path) -> Result<(BlockHeader, BlockGeometry)> {
    let hdr = inspect(path)?;
    let size = fs::metadata(path)?.len();
    let geom = BlockGeometry::from_header(path, &hdr, size)?;
    Ok((hdr, geom))
}
