#![forbid(unsafe_code)]

pub mod error;
pub mod format;

pub mod container {
    pub mod au_header;
}

pub mod emit;
pub mod pair;
pub mod recover;
pub mod report;
pub mod scan;
pub mod sequence;

// Re-exports: stable API surface
pub use container::au_header::{BlockGeometry, BlockHeader, inspect, inspect_block};
pub use pair::{Alternating, ChannelPair, PairingStrategy};
pub use recover::{RecoverOptions, recover, recover_with};
pub use report::RecoveryReport;
pub use scan::{BlockFile, TieBreak, discover, list_projects};
pub use sequence::{ChannelSequence, build_sequence};
