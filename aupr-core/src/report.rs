//! Human-readable rendering of recovery results. Nothing here feeds the
//! project document except the short marker text.

use crate::format::AU_MAGIC;
use crate::sequence::{ChannelSequence, CorruptionEvent, CorruptionKind, HeaderFault};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

impl fmt::Display for HeaderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderFault::Mismatch { found } => write!(f, "magic 0x{found:08x} != 0x{AU_MAGIC:08x}"),
            HeaderFault::Truncated { len } => write!(f, "header truncated after {len} bytes"),
        }
    }
}

impl fmt::Display for CorruptionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.file_names().join(", ");
        match &self.kind {
            CorruptionKind::BadHeader { primary, fallback } => {
                write!(f, "slot {}: bad header: {names} ({primary}", self.slot)?;
                if let Some(fb) = fallback {
                    write!(f, "; {fb}")?;
                }
                write!(f, ")")
            }
            CorruptionKind::MalformedPayload { size, data_offset } => write!(
                f,
                "slot {}: non-integer number of samples: {names} (size = {size}, offset = {data_offset})",
                self.slot
            ),
            CorruptionKind::Unreadable { message } => {
                write!(f, "slot {}: unreadable: {names}: {message}", self.slot)
            }
        }
    }
}

/// Short note placed at the event's position in the block list.
pub fn marker(ev: &CorruptionEvent) -> String {
    let names = ev.file_names();
    if names.len() == 1 {
        format!("corrupt file: {}", names[0])
    } else {
        format!("corrupt files: {}", names.join(", "))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelSummary {
    pub channel: usize,
    pub blocks: usize,
    pub total_samples: u64,
    pub max_block_samples: u64,
    pub corruptions: Vec<CorruptionEvent>,
}

impl From<&ChannelSequence> for ChannelSummary {
    fn from(seq: &ChannelSequence) -> Self {
        Self {
            channel: seq.channel,
            blocks: seq.block_count(),
            total_samples: seq.total_samples,
            max_block_samples: seq.max_block_samples,
            corruptions: seq.corruptions().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecoveryReport {
    pub project: String,
    pub output: PathBuf,
    /// False for dry runs.
    pub written: bool,
    pub discovered: usize,
    pub channels: Vec<ChannelSummary>,
}

impl RecoveryReport {
    pub fn corruption_count(&self) -> usize {
        self.channels.iter().map(|c| c.corruptions.len()).sum()
    }
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "project {}: {} block files discovered",
            self.project, self.discovered
        )?;
        for c in &self.channels {
            writeln!(
                f,
                "  channel {}: {} blocks, {} samples (max block {}), {} corrupt",
                c.channel,
                c.blocks,
                c.total_samples,
                c.max_block_samples,
                c.corruptions.len()
            )?;
            for ev in &c.corruptions {
                writeln!(f, "    {ev}")?;
            }
        }
        if self.written {
            write!(f, "wrote {}", self.output.display())
        } else {
            write!(f, "dry run: {} not written", self.output.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: CorruptionKind, files: &[&str]) -> CorruptionEvent {
        CorruptionEvent {
            slot: 3,
            kind,
            files: files.iter().map(|f| PathBuf::from("/x/e00/d00").join(f)).collect(),
        }
    }

    #[test]
    fn marker_uses_basenames() {
        let both = ev(
            CorruptionKind::BadHeader {
                primary: HeaderFault::Mismatch { found: 0 },
                fallback: Some(HeaderFault::Truncated { len: 2 }),
            },
            &["a.au", "b.au"],
        );
        assert_eq!(marker(&both), "corrupt files: a.au, b.au");

        let one = ev(
            CorruptionKind::MalformedPayload {
                size: 43,
                data_offset: 8,
            },
            &["c.au"],
        );
        assert_eq!(marker(&one), "corrupt file: c.au");
    }

    #[test]
    fn event_text_names_files_and_detail() {
        let e = ev(
            CorruptionKind::BadHeader {
                primary: HeaderFault::Mismatch { found: 0x1234 },
                fallback: None,
            },
            &["a.au"],
        );
        assert_eq!(
            e.to_string(),
            "slot 3: bad header: a.au (magic 0x00001234 != 0x2e736e64)"
        );
    }

    #[test]
    fn summary_counts_corruptions() {
        let r = RecoveryReport {
            channels: vec![
                ChannelSummary {
                    corruptions: vec![ev(
                        CorruptionKind::Unreadable {
                            message: "denied".into(),
                        },
                        &["z.au"],
                    )],
                    ..Default::default()
                },
                ChannelSummary::default(),
            ],
            ..Default::default()
        };
        assert_eq!(r.corruption_count(), 1);
        assert!(r.to_string().contains("unreadable: z.au: denied"));
    }
}
