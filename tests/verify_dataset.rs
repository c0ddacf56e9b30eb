use dataset_verify::pairing::{self, DatasetLayout};
use dataset_verify::report;
use std::fs;
use tempfile::TempDir;

fn dataset(images: &[&str], texts: &[&str]) -> (TempDir, DatasetLayout) {
    let root = TempDir::new().unwrap();
    let layout = DatasetLayout::from_root(root.path());
    fs::create_dir(&layout.images_dir).unwrap();
    fs::create_dir(&layout.texts_dir).unwrap();
    for name in images {
        fs::write(layout.images_dir.join(name), b"img").unwrap();
    }
    for name in texts {
        fs::write(layout.texts_dir.join(name), b"caption").unwrap();
    }
    (root, layout)
}

#[test]
fn reports_images_without_texts() {
    let (root, layout) = dataset(&["a.jpg", "b.png", "c.jpeg"], &["a.txt", "c.txt"]);
    let report_path = root.path().join("distribution.csv");

    let result = pairing::verify_dataset(&layout.images_dir, &layout.texts_dir).unwrap();
    let summary = report::write_report(&result, &report_path).unwrap();

    assert_eq!(summary.paired_count, 2);
    assert_eq!(summary.unpaired_count, 1);
    assert_eq!(report::read_report(&report_path).unwrap(), vec!["b.png"]);
}

#[test]
fn ignores_unrelated_files() {
    let (_root, layout) = dataset(
        &["a.jpg", "readme.md", "b.gif"],
        &["a.txt", "a.json", "z.txt"],
    );

    let result = pairing::verify_dataset(&layout.images_dir, &layout.texts_dir).unwrap();

    assert_eq!(result.paired_count, 1);
    assert!(result.unpaired.is_empty());
    assert_eq!(result.total(), 1);
}

#[test]
fn missing_texts_directory_fails() {
    let root = TempDir::new().unwrap();
    let layout = DatasetLayout::from_root(root.path());
    fs::create_dir(&layout.images_dir).unwrap();

    let err = pairing::verify_dataset(&layout.images_dir, &layout.texts_dir).unwrap_err();

    assert!(matches!(err, dataset_verify::Error::DirectoryAccess { .. }));
    assert!(err.to_string().contains("texts"));
}

#[cfg(unix)]
#[test]
fn dangling_symlink_does_not_abort_verification() {
    let (_root, layout) = dataset(&["a.jpg"], &["a.txt"]);
    std::os::unix::fs::symlink(
        layout.images_dir.join("nowhere"),
        layout.images_dir.join("notes.md"),
    )
    .unwrap();

    let result = pairing::verify_dataset(&layout.images_dir, &layout.texts_dir).unwrap();

    assert_eq!(result.paired_count, 1);
    assert!(result.unpaired.is_empty());
}
