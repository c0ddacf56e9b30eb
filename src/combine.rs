use crate::error::{Error, Result};
use crate::scan::{self, TEXT_EXTENSIONS};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineSummary {
    pub files_read: usize,
    pub lines_written: usize,
}

/// Flattens one caption to a single line. Empty results are dropped.
fn flatten(content: &str) -> Option<String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let joined = content.replace(|c: char| c == '\r' || c == '\n', "");
    let line = joined.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// Concatenates every `.txt` file in `folder` into `output`, one file per line.
pub fn combine_texts(
    folder: &Path,
    output: &Path,
    progress: &ProgressBar,
) -> Result<CombineSummary> {
    let texts = scan::scan_dir(folder, TEXT_EXTENSIONS)?;
    progress.set_length(texts.len() as u64);

    let write_error = |source: std::io::Error| Error::OutputWrite {
        path: output.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(output).map_err(write_error)?);

    let mut summary = CombineSummary {
        files_read: 0,
        lines_written: 0,
    };

    for text in &texts {
        let path = folder.join(&text.file_name);
        let content = std::fs::read_to_string(&path).map_err(|source| Error::TextRead {
            path: path.clone(),
            source,
        })?;
        summary.files_read += 1;

        if let Some(line) = flatten(&content) {
            writeln!(writer, "{}", line).map_err(write_error)?;
            summary.lines_written += 1;
        }
        progress.inc(1);
    }
    writer.flush().map_err(write_error)?;

    info!(
        folder = %folder.display(),
        output = %output.display(),
        files = summary.files_read,
        lines = summary.lines_written,
        "combined texts"
    );
    Ok(summary)
}
