//! Copying an approved image/text pair into the destination folders.

use crate::error::{Error, Result};
use crate::scan::ImageRecord;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which destination files were already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ImageExists,
    TextExists,
    BothExist,
}

impl ConflictKind {
    fn detect(image_exists: bool, text_exists: bool) -> Option<Self> {
        match (image_exists, text_exists) {
            (true, true) => Some(Self::BothExist),
            (true, false) => Some(Self::ImageExists),
            (false, true) => Some(Self::TextExists),
            (false, false) => None,
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::ImageExists => "Image file already exists in the destination directory!",
            Self::TextExists => "Text file already exists in the destination directory!",
            Self::BothExist => "Files already exist in the destination directories!",
        };
        f.write_str(msg)
    }
}

/// The four folders a promotion reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionDirs {
    pub images: PathBuf,
    pub texts: PathBuf,
    pub dest_images: PathBuf,
    pub dest_texts: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRequest {
    pub image: ImageRecord,
    pub source_image_path: PathBuf,
    /// May not exist; that surfaces as a copy failure.
    pub source_text_path: PathBuf,
    pub dest_image_path: PathBuf,
    pub dest_text_path: PathBuf,
}

impl PromotionRequest {
    pub fn new(image: &ImageRecord, dirs: &PromotionDirs) -> Self {
        let text_name = image.text_file_name();
        Self {
            source_image_path: dirs.images.join(&image.file_name),
            source_text_path: dirs.texts.join(&text_name),
            dest_image_path: dirs.dest_images.join(&image.file_name),
            dest_text_path: dirs.dest_texts.join(&text_name),
            image: image.clone(),
        }
    }

    pub fn conflict(&self) -> Option<ConflictKind> {
        ConflictKind::detect(self.dest_image_path.exists(), self.dest_text_path.exists())
    }
}

fn copy_verbatim(from: &Path, to: &Path) -> Result<()> {
    std::fs::copy(from, to).map_err(|source| Error::PromotionIo {
        path: from.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Copies the image, then the text. Refuses to touch anything if either
/// destination exists. A failed text copy leaves the copied image behind.
pub fn promote(request: &PromotionRequest) -> Result<()> {
    if let Some(conflict) = request.conflict() {
        warn!(image = %request.image.file_name, %conflict, "promotion refused");
        return Err(Error::PromotionConflict(conflict));
    }

    copy_verbatim(&request.source_image_path, &request.dest_image_path)?;
    copy_verbatim(&request.source_text_path, &request.dest_text_path)?;

    info!(
        image = %request.dest_image_path.display(),
        text = %request.dest_text_path.display(),
        "promoted pair"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ImageExtension;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        dirs: PromotionDirs,
    }

    fn fixture() -> Fixture {
        let root = TempDir::new().unwrap();
        let dirs = PromotionDirs {
            images: root.path().join("images"),
            texts: root.path().join("texts"),
            dest_images: root.path().join("out_images"),
            dest_texts: root.path().join("out_texts"),
        };
        for dir in [&dirs.images, &dirs.texts, &dirs.dest_images, &dirs.dest_texts] {
            fs::create_dir(dir).unwrap();
        }
        Fixture { _root: root, dirs }
    }

    fn record(base: &str) -> ImageRecord {
        ImageRecord {
            base_name: base.to_string(),
            file_name: format!("{}.jpg", base),
            extension: ImageExtension::Jpg,
        }
    }

    #[test]
    fn test_request_paths() {
        let fx = fixture();
        let request = PromotionRequest::new(&record("dog"), &fx.dirs);

        assert_eq!(request.source_image_path, fx.dirs.images.join("dog.jpg"));
        assert_eq!(request.source_text_path, fx.dirs.texts.join("dog.txt"));
        assert_eq!(request.dest_image_path, fx.dirs.dest_images.join("dog.jpg"));
        assert_eq!(request.dest_text_path, fx.dirs.dest_texts.join("dog.txt"));
    }

    #[test]
    fn test_promote_copies_bytes() {
        let fx = fixture();
        let image_bytes = [0xFFu8, 0xD8, 0x00, 0x10, 0xFF, 0xD9];
        fs::write(fx.dirs.images.join("dog.jpg"), image_bytes).unwrap();
        fs::write(fx.dirs.texts.join("dog.txt"), "a dog\r\non grass").unwrap();

        let request = PromotionRequest::new(&record("dog"), &fx.dirs);
        promote(&request).unwrap();

        assert_eq!(fs::read(&request.dest_image_path).unwrap(), image_bytes);
        assert_eq!(
            fs::read(&request.dest_text_path).unwrap(),
            b"a dog\r\non grass".to_vec()
        );
    }

    #[test]
    fn test_conflict_kinds() {
        let fx = fixture();
        fs::write(fx.dirs.images.join("cat.jpg"), b"img").unwrap();
        fs::write(fx.dirs.texts.join("cat.txt"), b"txt").unwrap();
        let request = PromotionRequest::new(&record("cat"), &fx.dirs);

        assert_eq!(request.conflict(), None);

        fs::write(&request.dest_text_path, b"old").unwrap();
        assert_eq!(request.conflict(), Some(ConflictKind::TextExists));
        assert_eq!(
            promote(&request).unwrap_err().to_string(),
            "Text file already exists in the destination directory!"
        );
        assert!(!request.dest_image_path.exists());

        fs::write(&request.dest_image_path, b"old").unwrap();
        assert_eq!(request.conflict(), Some(ConflictKind::BothExist));
        assert_eq!(
            promote(&request).unwrap_err().to_string(),
            "Files already exist in the destination directories!"
        );

        fs::remove_file(&request.dest_text_path).unwrap();
        assert_eq!(request.conflict(), Some(ConflictKind::ImageExists));
    }

    #[test]
    fn test_image_conflict_leaves_text_folder_untouched() {
        let fx = fixture();
        fs::write(fx.dirs.images.join("cat.jpg"), b"new").unwrap();
        fs::write(fx.dirs.texts.join("cat.txt"), b"caption").unwrap();
        fs::write(fx.dirs.dest_images.join("cat.jpg"), b"old").unwrap();

        let request = PromotionRequest::new(&record("cat"), &fx.dirs);
        let err = promote(&request).unwrap_err();

        assert!(matches!(
            err,
            Error::PromotionConflict(ConflictKind::ImageExists)
        ));
        assert_eq!(
            err.to_string(),
            "Image file already exists in the destination directory!"
        );
        assert_eq!(fs::read(&request.dest_image_path).unwrap(), b"old");
        assert_eq!(fs::read_dir(&fx.dirs.dest_texts).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source_text_fails_at_copy_time() {
        let fx = fixture();
        fs::write(fx.dirs.images.join("owl.jpg"), b"img").unwrap();

        let request = PromotionRequest::new(&record("owl"), &fx.dirs);
        let err = promote(&request).unwrap_err();

        match err {
            Error::PromotionIo { path, .. } => assert_eq!(path, request.source_text_path),
            other => panic!("expected PromotionIo, got {:?}", other),
        }
        // No rollback: the image copy stays.
        assert!(request.dest_image_path.exists());
        assert!(!request.dest_text_path.exists());
    }
}
