use crate::error::{Error, Result};
use crate::pairing::PairingResult;
use csv::Terminator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct UnpairedRow<'a> {
    #[serde(rename = "Image Name")]
    image_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct UnpairedRecord {
    #[serde(rename = "Image Name")]
    image_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub paired_count: usize,
    pub unpaired_count: usize,
    pub total_images: usize,
    pub report_path: Option<PathBuf>,
}

fn platform_terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

/// Writes the `Image Name` header followed by one row per unpaired image.
pub fn write_report_to<W: std::io::Write>(
    result: &PairingResult,
    writer: W,
) -> std::result::Result<ReportSummary, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(platform_terminator())
        .from_writer(writer);

    // An empty report still carries its header.
    if result.unpaired.is_empty() {
        writer.write_record(["Image Name"])?;
    }
    for image in &result.unpaired {
        writer.serialize(UnpairedRow {
            image_name: &image.file_name,
        })?;
    }
    writer.flush()?;

    Ok(ReportSummary {
        paired_count: result.paired_count,
        unpaired_count: result.unpaired.len(),
        total_images: result.total(),
        report_path: None,
    })
}

/// Creates `path` and writes the report into it. The parent directory must
/// already exist.
pub fn write_report(result: &PairingResult, path: &Path) -> Result<ReportSummary> {
    let write_error = |source: csv::Error| Error::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(|e| write_error(e.into()))?;
    let mut summary =
        write_report_to(result, std::io::BufWriter::new(file)).map_err(write_error)?;
    summary.report_path = Some(path.to_path_buf());

    info!(
        path = %path.display(),
        unpaired = summary.unpaired_count,
        "wrote report"
    );
    Ok(summary)
}

/// Reads back the image names listed in a report.
pub fn read_report(path: &Path) -> Result<Vec<String>> {
    let read_error = |source: csv::Error| Error::ReportRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    let mut names = Vec::new();
    for record in reader.deserialize() {
        let record: UnpairedRecord = record.map_err(read_error)?;
        names.push(record.image_name);
    }
    Ok(names)
}
