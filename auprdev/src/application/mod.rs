pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use aupr_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Recover {
            basepath,
            project,
            out,
            tie_break,
            dry_run,
            no_annotate,
            json,
        } => handlers::handle_recover(
            basepath,
            project,
            out,
            tie_break.into(),
            dry_run,
            no_annotate,
            json,
        ),
        Commands::Projects { basepath } => handlers::handle_projects(basepath),
        Commands::Scan {
            basepath,
            project,
            tie_break,
        } => handlers::handle_scan(basepath, project, tie_break.into()),
        Commands::Inspect { files } => handlers::handle_inspect(files),
    }
}
