use anyhow::{Context, Result};
use clap::Parser;
use dataset_verify::{combine, logging};
use indicatif::ProgressBar;
use std::path::PathBuf;

/// Concatenate every caption in a folder into one file, one caption per line.
#[derive(Parser)]
#[command(name = "combine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Folder containing the .txt files
    #[arg(long)]
    texts: PathBuf,

    /// Combined output file
    #[arg(short, long)]
    output: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let pb = ProgressBar::new(0);
    let summary = combine::combine_texts(&cli.texts, &cli.output, &pb)
        .with_context(|| format!("Failed to combine texts in {}", cli.texts.display()))?;
    pb.finish_with_message("Combine complete");

    println!(
        "Combined {} text files in {} into {} ({} non-empty lines)",
        summary.files_read,
        cli.texts.display(),
        cli.output.display(),
        summary.lines_written
    );

    Ok(())
}
