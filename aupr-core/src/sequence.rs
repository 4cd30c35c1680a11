use crate::container::au_header::{self, BlockGeometry, BlockHeader};
use crate::error::AuprError;
use crate::scan::{BlockFile, base_name};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One accepted block as referenced from the project document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDescriptor {
    /// Basename only; the editor resolves it inside the data directory.
    pub file_name: String,
    /// Samples preceding this block in its channel
    pub start: u64,
    pub samples: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "fault", rename_all = "snake_case")]
pub enum HeaderFault {
    Mismatch { found: u32 },
    Truncated { len: u64 },
}

impl HeaderFault {
    fn from_error(e: &AuprError) -> Option<Self> {
        match e {
            AuprError::HeaderMismatch { found, .. } => Some(Self::Mismatch { found: *found }),
            AuprError::TruncatedFile { len, .. } => Some(Self::Truncated { len: *len }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorruptionKind {
    /// Primary header invalid and the same-slot file of the other channel
    /// is invalid too (or absent).
    BadHeader {
        primary: HeaderFault,
        fallback: Option<HeaderFault>,
    },
    MalformedPayload {
        size: u64,
        data_offset: i32,
    },
    Unreadable {
        message: String,
    },
}

/// A skipped slot. `files` lists every file that was tried for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorruptionEvent {
    pub slot: usize,
    pub kind: CorruptionKind,
    pub files: Vec<PathBuf>,
}

impl CorruptionEvent {
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|p| base_name(p)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceEntry {
    Block(BlockDescriptor),
    Corrupt(CorruptionEvent),
}

/// Ordered blocks of one channel with corruption events kept in position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelSequence {
    pub channel: usize,
    pub entries: Vec<SequenceEntry>,
    pub total_samples: u64,
    pub max_block_samples: u64,
}

impl ChannelSequence {
    pub fn new(channel: usize) -> Self {
        Self {
            channel,
            ..Default::default()
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockDescriptor> {
        self.entries.iter().filter_map(|e| match e {
            SequenceEntry::Block(b) => Some(b),
            SequenceEntry::Corrupt(_) => None,
        })
    }

    pub fn corruptions(&self) -> impl Iterator<Item = &CorruptionEvent> {
        self.entries.iter().filter_map(|e| match e {
            SequenceEntry::Corrupt(c) => Some(c),
            SequenceEntry::Block(_) => None,
        })
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    fn accept(&mut self, file_name: String, samples: u64) {
        self.entries.push(SequenceEntry::Block(BlockDescriptor {
            file_name,
            start: self.total_samples,
            samples,
        }));
        self.total_samples += samples;
        self.max_block_samples = self.max_block_samples.max(samples);
    }

    fn reject(&mut self, ev: CorruptionEvent) {
        warn!(channel = self.channel, "{ev}");
        self.entries.push(SequenceEntry::Corrupt(ev));
    }
}

fn unreadable(slot: usize, files: Vec<PathBuf>, e: &AuprError) -> CorruptionEvent {
    CorruptionEvent {
        slot,
        kind: CorruptionKind::Unreadable {
            message: e.to_string(),
        },
        files,
    }
}

/// Pick the file that backs `slot`: the primary if its header validates,
/// else the other channel's file at the same index.
fn resolve<'a>(
    slot: usize,
    primary: &'a BlockFile,
    partner: Option<&'a BlockFile>,
) -> Result<(&'a BlockFile, BlockHeader), CorruptionEvent> {
    let primary_fault = match au_header::inspect(&primary.path) {
        Ok(h) => return Ok((primary, h)),
        Err(e) => match HeaderFault::from_error(&e) {
            Some(f) => f,
            None => return Err(unreadable(slot, vec![primary.path.clone()], &e)),
        },
    };
    debug!(file = %primary.path.display(), ?primary_fault, "header rejected");

    let Some(other) = partner else {
        return Err(CorruptionEvent {
            slot,
            kind: CorruptionKind::BadHeader {
                primary: primary_fault,
                fallback: None,
            },
            files: vec![primary.path.clone()],
        });
    };

    let both = vec![primary.path.clone(), other.path.clone()];
    match au_header::inspect(&other.path) {
        Ok(h) => {
            info!(
                slot,
                from = %primary.file_name(),
                to = %other.file_name(),
                "using other channel's block"
            );
            Ok((other, h))
        }
        Err(e) => match HeaderFault::from_error(&e) {
            Some(f) => Err(CorruptionEvent {
                slot,
                kind: CorruptionKind::BadHeader {
                    primary: primary_fault,
                    fallback: Some(f),
                },
                files: both,
            }),
            None => Err(unreadable(slot, both, &e)),
        },
    }
}

/// Build one channel from its ordered files. `partner` is the other
/// channel's list, consulted index-for-index when a header is bad.
///
/// Never fails: every bad slot becomes a [`CorruptionEvent`] and is left
/// out of the sample offsets.
pub fn build_sequence(
    channel: usize,
    primary: &[BlockFile],
    partner: &[BlockFile],
) -> ChannelSequence {
    let mut seq = ChannelSequence::new(channel);

    for (slot, file) in primary.iter().enumerate() {
        let (chosen, hdr) = match resolve(slot, file, partner.get(slot)) {
            Ok(r) => r,
            Err(ev) => {
                seq.reject(ev);
                continue;
            }
        };

        let size = match fs::metadata(&chosen.path) {
            Ok(md) => md.len(),
            Err(e) => {
                seq.reject(unreadable(slot, vec![chosen.path.clone()], &AuprError::from(e)));
                continue;
            }
        };

        match BlockGeometry::from_header(&chosen.path, &hdr, size) {
            Ok(g) => {
                info!(channel, "adding {}", chosen.file_name());
                seq.accept(chosen.file_name(), g.samples);
            }
            Err(AuprError::MalformedPayload {
                size, data_offset, ..
            }) => seq.reject(CorruptionEvent {
                slot,
                kind: CorruptionKind::MalformedPayload { size, data_offset },
                files: vec![chosen.path.clone()],
            }),
            Err(e) => seq.reject(unreadable(slot, vec![chosen.path.clone()], &e)),
        }
    }

    seq
}
