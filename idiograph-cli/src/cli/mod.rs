//! Command-line interface orchestration for the idiograph driver.
//!
//! The CLI offers an `extract` command with three policy subcommands
//! mirroring the extraction flavours the study-aid pipeline consumes: large
//! components one file each, mid-sized neighbour clusters merged into one
//! file, and exact-size trios merged into one file.

mod commands;

pub use commands::{
    Cli, CliError, ClustersArgs, Command, ExtractCommand, ExtractFlavour, ExtractionSummary,
    LargeArgs, TriosArgs, render_summary, run_cli,
};
