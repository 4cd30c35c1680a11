use crate::emit::{create_project, project_file};
use crate::error::{AuprError, Result};
use crate::pair::{Alternating, PairingStrategy};
use crate::report::{ChannelSummary, RecoveryReport};
use crate::scan::{TieBreak, discover};
use crate::sequence::build_sequence;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Debug)]
pub struct RecoverOptions {
    /// Output path; defaults to `<base>/<project>.aup`.
    pub out: Option<PathBuf>,
    pub tie_break: TieBreak,
    /// Scan and inspect only; nothing is written.
    pub dry_run: bool,
    /// Write corruption notes as comments into the block list.
    pub annotate_corruption: bool,
}

impl Default for RecoverOptions {
    fn default() -> Self {
        Self {
            out: None,
            tie_break: TieBreak::default(),
            dry_run: false,
            annotate_corruption: true,
        }
    }
}

/// Rebuild `<base>/<project>.aup` from `<base>/<project>_data`, pairing
/// blocks by strict channel alternation.
pub fn recover(base: &Path, project: &str, opts: Option<&RecoverOptions>) -> Result<RecoveryReport> {
    recover_with(base, project, opts, &Alternating)
}

pub fn recover_with(
    base: &Path,
    project: &str,
    opts: Option<&RecoverOptions>,
    strategy: &dyn PairingStrategy,
) -> Result<RecoveryReport> {
    let defaults = RecoverOptions::default();
    let opts = opts.unwrap_or(&defaults);
    let out = opts
        .out
        .clone()
        .unwrap_or_else(|| project_file(base, project));

    // Checked before scanning so a rerun costs nothing; create_project
    // re-checks atomically.
    if !opts.dry_run && out.exists() {
        return Err(AuprError::AlreadyExists(out));
    }

    let blocks = discover(base, project, opts.tie_break)?;
    let discovered = blocks.len();
    info!(project, discovered, "block files found");

    let pair = strategy.pair(blocks);
    let channels = [
        build_sequence(0, &pair.left, &pair.right),
        build_sequence(1, &pair.right, &pair.left),
    ];

    if !opts.dry_run {
        create_project(&out, project, &channels, opts.annotate_corruption)?;
        info!(path = %out.display(), "project written");
    }

    let report = RecoveryReport {
        project: project.to_string(),
        output: out,
        written: !opts.dry_run,
        discovered,
        channels: channels.iter().map(ChannelSummary::from).collect(),
    };
    info!(
        corrupt = report.corruption_count(),
        left = report.channels[0].blocks,
        right = report.channels[1].blocks,
        "recovery finished"
    );
    Ok(report)
}
