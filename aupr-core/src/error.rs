use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuprError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: magic 0x{found:08x} != 0x{expected:08x}", .path.display(), expected = crate::format::AU_MAGIC)]
    HeaderMismatch { path: PathBuf, found: u32 },

    #[error("{}: truncated header ({len} of {} bytes)", .path.display(), crate::format::AU_HEADER_LEN)]
    TruncatedFile { path: PathBuf, len: u64 },

    #[error("{}: non-integer number of samples (size = {size}, offset = {data_offset})", .path.display())]
    MalformedPayload {
        path: PathBuf,
        size: u64,
        data_offset: i32,
    },

    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Format error: {0}")]
    Format(String),
}

impl AuprError {
    /// Header failures that warrant trying the paired channel's file.
    pub fn is_header_failure(&self) -> bool {
        matches!(
            self,
            AuprError::HeaderMismatch { .. } | AuprError::TruncatedFile { .. }
        )
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, AuprError>;
