use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    Jpg,
    Jpeg,
    Png,
}

impl ImageExtension {
    /// Recognizes an extension without the leading dot, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ext = match self {
            Self::Jpg => ".jpg",
            Self::Jpeg => ".jpeg",
            Self::Png => ".png",
        };
        f.write_str(ext)
    }
}

/// A file found by [`scan_dir`], before it is typed as an image or a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub file_name: String,
    pub base_name: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub base_name: String,
    pub file_name: String,
    pub extension: ImageExtension,
}

impl ImageRecord {
    /// File name of the text expected to describe this image.
    pub fn text_file_name(&self) -> String {
        format!("{}.txt", self.base_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub base_name: String,
    pub file_name: String,
}

/// Splits a file name into base name and extension at the last dot.
///
/// Leading dots never start an extension for the base name, so `.png` keeps
/// `.png` as its base name while still carrying the `png` extension.
fn split_name(file_name: &str) -> Option<(&str, &str)> {
    let (head, ext) = file_name.rsplit_once('.')?;
    if head.chars().all(|c| c == '.') {
        Some((file_name, ext))
    } else {
        Some((head, ext))
    }
}

/// Lists the regular files directly inside `dir` whose extension is in
/// `allowed_extensions` (case-insensitive). Everything else is skipped.
///
/// Entries come back sorted by file name, so indices into the result stay
/// meaningful for as long as the caller holds it.
pub fn scan_dir(dir: &Path, allowed_extensions: &[&str]) -> Result<Vec<ScannedFile>> {
    let access_error = |source: std::io::Error| Error::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(dir).map_err(access_error)?;
    if !metadata.is_dir() {
        return Err(access_error(std::io::Error::other("not a directory")));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(access_error(err.into())),
            Err(err) => {
                warn!(dir = %dir.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping file with non UTF-8 name");
            continue;
        };
        let Some((stem, ext)) = split_name(file_name) else {
            continue;
        };
        if !allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        {
            continue;
        }

        files.push(ScannedFile {
            file_name: file_name.to_string(),
            base_name: stem.to_string(),
            extension: ext.to_string(),
        });
    }

    debug!(dir = %dir.display(), count = files.len(), "scanned directory");
    Ok(files)
}

pub fn scan_images(dir: &Path) -> Result<Vec<ImageRecord>> {
    let images = scan_dir(dir, IMAGE_EXTENSIONS)?
        .into_iter()
        .filter_map(|file| {
            let extension = ImageExtension::from_extension(&file.extension)?;
            Some(ImageRecord {
                base_name: file.base_name,
                file_name: file.file_name,
                extension,
            })
        })
        .collect();
    Ok(images)
}

pub fn scan_texts(dir: &Path) -> Result<Vec<TextRecord>> {
    let texts = scan_dir(dir, TEXT_EXTENSIONS)?
        .into_iter()
        .map(|file| TextRecord {
            base_name: file.base_name,
            file_name: file.file_name,
        })
        .collect();
    Ok(texts)
}

/// Number of files in `dir` matching `allowed_extensions`.
pub fn count_files(dir: &Path, allowed_extensions: &[&str]) -> Result<usize> {
    Ok(scan_dir(dir, allowed_extensions)?.len())
}
