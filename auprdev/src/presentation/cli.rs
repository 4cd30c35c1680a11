use aupr_core::TieBreak;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Rebuild an Audacity .aup project from its .au block files", long_about = None)]
pub struct Cli {
    /// More log output (debug)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum TieBreakArg {
    /// Keep directory walk order for equal timestamps
    #[default]
    Walk,
    /// Order equal timestamps by file name
    Name,
}

impl From<TieBreakArg> for TieBreak {
    fn from(t: TieBreakArg) -> Self {
        match t {
            TieBreakArg::Walk => TieBreak::Enumeration,
            TieBreakArg::Name => TieBreak::FileName,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write <basepath>/<project>.aup from <basepath>/<project>_data/e*/d*/*.au
    Recover {
        basepath: PathBuf,
        project: String,

        /// Output path (defaults to <basepath>/<project>.aup)
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = TieBreakArg::Walk)]
        tie_break: TieBreakArg,

        /// Inspect blocks and report, but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Leave corruption comments out of the project file
        #[arg(long)]
        no_annotate: bool,

        /// Print the recovery report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List projects (<name>_data directories) under a base path
    Projects { basepath: PathBuf },

    /// Show discovered blocks in recording order with their channel
    Scan {
        basepath: PathBuf,
        project: String,

        #[arg(long, value_enum, default_value_t = TieBreakArg::Walk)]
        tie_break: TieBreakArg,
    },

    /// Print header and sample geometry of block files
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}
