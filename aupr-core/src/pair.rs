//! Assignment of time-ordered block files to the two channels of a stereo track.

use crate::scan::BlockFile;

/// Block files split per channel, each list still in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPair {
    pub left: Vec<BlockFile>,
    pub right: Vec<BlockFile>,
}

impl ChannelPair {
    pub fn channel(&self, ch: usize) -> &[BlockFile] {
        if ch == 0 { &self.left } else { &self.right }
    }
}

pub trait PairingStrategy {
    fn pair(&self, blocks: Vec<BlockFile>) -> ChannelPair;
}

/// Even indices to channel 0, odd indices to channel 1.
///
/// Relies on the recorder flushing one block per channel in strict
/// alternation. Nothing in the files themselves confirms this.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alternating;

impl PairingStrategy for Alternating {
    fn pair(&self, blocks: Vec<BlockFile>) -> ChannelPair {
        let mut out = ChannelPair {
            left: Vec::with_capacity(blocks.len().div_ceil(2)),
            right: Vec::with_capacity(blocks.len() / 2),
        };
        for (i, b) in blocks.into_iter().enumerate() {
            if i % 2 == 0 {
                out.left.push(b);
            } else {
                out.right.push(b);
            }
        }
        out
    }
}

impl<F> PairingStrategy for F
where
    F: Fn(Vec<BlockFile>) -> ChannelPair,
{
    fn pair(&self, blocks: Vec<BlockFile>) -> ChannelPair {
        self(blocks)
    }
}
