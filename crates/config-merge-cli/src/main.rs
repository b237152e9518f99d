//! Merges layered provisioning documents.
//!
//! ```text
//! config-merge merge base.yaml role.yaml machine.yaml --format json --output machine.ign
//! config-merge check base.yaml role.yaml machine.yaml
//! ```
use std::{
    fs,
    io::{Write as _, stdout},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use snafu::{ResultExt, Snafu, ensure};

use crate::fragments::OutputFormat;

mod fragments;
mod logging;

const APP_NAME: &str = "config-merge";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to merge fragments"))]
    MergeFragments { source: fragments::Error },

    #[snafu(display("failed to write merged document to {path:?}"))]
    WriteOutput {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write merged document to stdout"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("{invalid} of {total} documents are invalid"))]
    InvalidDocuments { invalid: usize, total: usize },
}

#[derive(Debug, Parser)]
#[command(name = APP_NAME, author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge fragments from the most general (first) to the most specific (last).
    Merge(MergeArgs),

    /// Check that documents can be parsed and contain no duplicate keys.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Fragments to merge, later fragments override earlier ones.
    #[arg(required = true, num_args = 2..)]
    fragments: Vec<PathBuf>,

    /// Format of the merged document.
    #[arg(
        long,
        short,
        env = "CONFIG_MERGE_FORMAT",
        default_value_t = OutputFormat::default(),
        value_enum
    )]
    format: OutputFormat,

    /// Write the merged document to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Documents to check.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logging::initialize_logging("CONFIG_MERGE_LOG", APP_NAME);

    match cli.command {
        Command::Merge(args) => merge(&args),
        Command::Check(args) => check(&args),
    }
}

fn merge(args: &MergeArgs) -> Result<(), Error> {
    let Some(merged) = fragments::merge_files(&args.fragments).context(MergeFragmentsSnafu)? else {
        // clap requires at least two fragments
        return Ok(());
    };
    let rendered = args.format.render(&merged).context(MergeFragmentsSnafu)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).context(WriteOutputSnafu { path })?;
            tracing::info!(output = %path.display(), format = %args.format, "wrote merged document");
        }
        None => stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .context(WriteStdoutSnafu)?,
    }
    Ok(())
}

fn check(args: &CheckArgs) -> Result<(), Error> {
    let mut invalid = 0usize;
    for path in &args.files {
        match fragments::check(path) {
            Ok(()) => tracing::info!(document = %path.display(), "document is valid"),
            Err(err) => {
                invalid += 1;
                tracing::error!(
                    document = %path.display(),
                    error = &err as &dyn std::error::Error,
                    "document is invalid"
                );
            }
        }
    }

    ensure!(
        invalid == 0,
        InvalidDocumentsSnafu {
            invalid,
            total: args.files.len(),
        }
    );
    Ok(())
}
