use anyhow::{bail, Context, Result};
use clap::Parser;
use dataset_verify::pairing::{self, DatasetLayout};
use dataset_verify::{logging, report};
use std::path::PathBuf;

/// Find images that have no matching text file and list them in a CSV report.
#[derive(Parser)]
#[command(name = "dataset_verify")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dataset root holding `images/` and `texts/`
    #[arg(long, conflicts_with_all = ["images", "texts"])]
    root: Option<PathBuf>,

    /// Images directory (.jpg, .jpeg, .png)
    #[arg(long, requires = "texts")]
    images: Option<PathBuf>,

    /// Texts directory (.txt)
    #[arg(long, requires = "images")]
    texts: Option<PathBuf>,

    /// Where to write the CSV report of unpaired images
    #[arg(short, long)]
    report: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn layout(&self) -> Result<DatasetLayout> {
        match (&self.root, &self.images, &self.texts) {
            (Some(root), _, _) => Ok(DatasetLayout::from_root(root)),
            (None, Some(images), Some(texts)) => Ok(DatasetLayout {
                images_dir: images.clone(),
                texts_dir: texts.clone(),
            }),
            _ => bail!("pass either --root or both --images and --texts"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let layout = cli.layout()?;
    let result = pairing::verify_dataset(&layout.images_dir, &layout.texts_dir)
        .context("Failed to pair dataset")?;

    let summary = report::write_report(&result, &cli.report).context("Failed to write report")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Total number of images with corresponding text files: {}",
            summary.paired_count
        );
        println!(
            "Names of images without corresponding text files ({}) have been saved to: {}",
            summary.unpaired_count,
            cli.report.display()
        );
    }

    Ok(())
}
