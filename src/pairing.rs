use crate::error::Result;
use crate::scan::{self, ImageRecord, TextRecord};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// The conventional dataset root: `<root>/images` next to `<root>/texts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub images_dir: PathBuf,
    pub texts_dir: PathBuf,
}

impl DatasetLayout {
    pub fn from_root(root: &Path) -> Self {
        Self {
            images_dir: root.join("images"),
            texts_dir: root.join("texts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingResult {
    pub paired_count: usize,
    /// Images without a text, in scan order.
    pub unpaired: Vec<ImageRecord>,
}

impl PairingResult {
    pub fn total(&self) -> usize {
        self.paired_count + self.unpaired.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unpaired.is_empty()
    }
}

/// Splits `images` by whether a text with the same base name exists.
///
/// Base names are compared exactly: no case folding or Unicode
/// normalization. Images sharing a base name (`a.jpg`, `a.png`) are
/// classified independently.
pub fn pair(images: &[ImageRecord], texts: &[TextRecord]) -> PairingResult {
    let text_names: HashSet<&str> = texts.iter().map(|t| t.base_name.as_str()).collect();

    let mut paired_count = 0;
    let mut unpaired = Vec::new();

    for image in images {
        if text_names.contains(image.base_name.as_str()) {
            paired_count += 1;
        } else {
            unpaired.push(image.clone());
        }
    }

    PairingResult {
        paired_count,
        unpaired,
    }
}

/// Scans both directories and pairs their contents.
pub fn verify_dataset(images_dir: &Path, texts_dir: &Path) -> Result<PairingResult> {
    let images = scan::scan_images(images_dir)?;
    let texts = scan::scan_texts(texts_dir)?;

    let result = pair(&images, &texts);
    info!(
        images = images.len(),
        texts = texts.len(),
        paired = result.paired_count,
        unpaired = result.unpaired.len(),
        "paired dataset"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ImageExtension;
    use std::fs;
    use tempfile::TempDir;

    fn image(file_name: &str) -> ImageRecord {
        let (base, ext) = file_name.rsplit_once('.').unwrap();
        ImageRecord {
            base_name: base.to_string(),
            file_name: file_name.to_string(),
            extension: ImageExtension::from_extension(ext).unwrap(),
        }
    }

    fn text(base: &str) -> TextRecord {
        TextRecord {
            base_name: base.to_string(),
            file_name: format!("{}.txt", base),
        }
    }

    #[test]
    fn test_pair_counts_intersection_and_keeps_order() {
        let images = vec![image("z.png"), image("a.jpg"), image("m.jpeg"), image("b.png")];
        let texts = vec![text("a"), text("m"), text("unrelated")];

        let result = pair(&images, &texts);

        assert_eq!(result.paired_count, 2);
        let unpaired: Vec<_> = result.unpaired.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(unpaired, vec!["z.png", "b.png"]);
        assert_eq!(result.total(), images.len());
    }

    #[test]
    fn test_duplicate_base_names_are_independent() {
        let images = vec![image("a.jpg"), image("a.png"), image("b.jpg"), image("b.png")];
        let texts = vec![text("a")];

        let result = pair(&images, &texts);

        assert_eq!(result.paired_count, 2);
        assert_eq!(result.unpaired.len(), 2);
    }

    #[test]
    fn test_base_name_match_is_case_sensitive() {
        let images = vec![image("Cat.jpg")];
        let texts = vec![text("cat")];

        let result = pair(&images, &texts);

        assert_eq!(result.paired_count, 0);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_empty_inputs() {
        let result = pair(&[], &[text("a")]);
        assert_eq!(result.total(), 0);
        assert!(result.is_complete());
    }

    #[test]
    fn test_verify_dataset_from_layout() {
        let root = TempDir::new().unwrap();
        let layout = DatasetLayout::from_root(root.path());
        fs::create_dir(&layout.images_dir).unwrap();
        fs::create_dir(&layout.texts_dir).unwrap();
        for name in ["a.jpg", "b.png", "c.jpeg"] {
            fs::write(layout.images_dir.join(name), b"img").unwrap();
        }
        for name in ["a.txt", "c.txt"] {
            fs::write(layout.texts_dir.join(name), b"caption").unwrap();
        }

        let result = verify_dataset(&layout.images_dir, &layout.texts_dir).unwrap();
        assert_eq!(result.paired_count, 2);
        assert_eq!(result.unpaired.len(), 1);
        assert_eq!(result.unpaired[0].file_name, "b.png");

        let again = verify_dataset(&layout.images_dir, &layout.texts_dir).unwrap();
        assert_eq!(result, again);
    }
}
