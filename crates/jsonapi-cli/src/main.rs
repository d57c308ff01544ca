mod cmd_render;
mod cmd_status;
mod cmd_validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "japi")]
#[command(about = "Parse, normalize, and inspect JSON:API documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-serialize a document in normalized form
    Render {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Derive the HTTP status code a document warrants
    Status {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Validate a document and print a one-line summary
    Validate {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { input, output } => cmd_render::run(input, output, cli.pretty),
        Commands::Status { input } => cmd_status::run(input),
        Commands::Validate { input } => cmd_validate::run(input),
    }
}
