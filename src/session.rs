//! Review session: browse image/text pairs, edit captions, promote pairs.
//!
//! A [`Session`] owns everything the review workflow needs (configured
//! folders, the scanned image list, the cursor and the edit buffer), so the
//! workflow runs headless and any front end can drive it.

use crate::error::{Error, Result};
use crate::promote::{self, PromotionDirs, PromotionRequest};
use crate::scan::{self, ImageRecord, IMAGE_EXTENSIONS, TEXT_EXTENSIONS};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

pub const NO_TEXT_PLACEHOLDER: &str = "No text file found for this image.";

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Select image, text, and destination folders before copying!")]
    FoldersNotConfigured,
    #[error("Select image and text folders before saving!")]
    NoSelection,
    #[error("Press Edit Text before changing or saving the text.")]
    NotEditing,
    #[error("There is no image to copy.")]
    NoImage,
    #[error("The text file for this image could not be read; fix it before editing.")]
    TextUnreadable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Source folders not both selected yet.
    Idle,
    Browsing,
    /// The edit buffer holds unsaved changes.
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderRole {
    Images,
    Texts,
    DestImages,
    DestTexts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folders {
    pub images: Option<PathBuf>,
    pub texts: Option<PathBuf>,
    pub dest_images: Option<PathBuf>,
    pub dest_texts: Option<PathBuf>,
}

impl Folders {
    fn slot(&mut self, role: FolderRole) -> &mut Option<PathBuf> {
        match role {
            FolderRole::Images => &mut self.images,
            FolderRole::Texts => &mut self.texts,
            FolderRole::DestImages => &mut self.dest_images,
            FolderRole::DestTexts => &mut self.dest_texts,
        }
    }

    /// All four folders, if every one has been selected.
    pub fn promotion_dirs(&self) -> Option<PromotionDirs> {
        Some(PromotionDirs {
            images: self.images.clone()?,
            texts: self.texts.clone()?,
            dest_images: self.dest_images.clone()?,
            dest_texts: self.dest_texts.clone()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Error,
}

/// A transient notice for the user, hidden after [`MESSAGE_TTL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub title: &'static str,
    pub text: String,
    pub level: MessageLevel,
    pub posted_at: Instant,
}

impl StatusMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= MESSAGE_TTL
    }
}

/// Caption shown for the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextView {
    Loaded(String),
    Missing,
    /// The file exists but reading it failed. Holds the error text.
    Unreadable(String),
}

impl TextView {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Loaded(text) => text,
            Self::Missing => NO_TEXT_PLACEHOLDER,
            Self::Unreadable(err) => err,
        }
    }
}

/// Snapshot of what a front end should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub state: SessionState,
    pub cursor: usize,
    pub image_count: usize,
    pub image_path: Option<PathBuf>,
    pub text: Option<TextView>,
    pub dest_image_count: Option<usize>,
    pub dest_text_count: Option<usize>,
}

#[derive(Debug)]
pub struct Session {
    folders: Folders,
    images: Vec<ImageRecord>,
    cursor: usize,
    state: SessionState,
    text: Option<TextView>,
    message: Option<StatusMessage>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            folders: Folders::default(),
            images: Vec::new(),
            cursor: 0,
            state: SessionState::Idle,
            text: None,
            message: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn folders(&self) -> &Folders {
        &self.folders
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn current_image(&self) -> Option<&ImageRecord> {
        if self.state == SessionState::Idle {
            return None;
        }
        self.images.get(self.cursor)
    }

    pub fn text(&self) -> Option<&TextView> {
        self.text.as_ref()
    }

    /// The status message, unless it has expired by `now`.
    pub fn message_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.message.as_ref().filter(|m| !m.is_expired(now))
    }

    fn post(&mut self, title: &'static str, text: impl Into<String>, level: MessageLevel) {
        self.message = Some(StatusMessage {
            title,
            text: text.into(),
            level,
            posted_at: Instant::now(),
        });
    }

    /// Records a folder choice. Selecting the second source folder loads the
    /// image list and starts browsing at the first image.
    pub fn select_folder(&mut self, role: FolderRole, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        debug!(?role, path = %path.display(), "folder selected");
        *self.folders.slot(role) = Some(path.clone());

        match role {
            FolderRole::Images | FolderRole::Texts => self.load_images(),
            FolderRole::DestImages => self.check_destination(&path, IMAGE_EXTENSIONS),
            FolderRole::DestTexts => self.check_destination(&path, TEXT_EXTENSIONS),
        }
    }

    fn check_destination(&mut self, dir: &Path, extensions: &[&str]) -> Result<()> {
        if let Err(err) = scan::count_files(dir, extensions) {
            self.post("Load Error", err.to_string(), MessageLevel::Error);
            return Err(err);
        }
        Ok(())
    }

    fn load_images(&mut self) -> Result<()> {
        let Some(images_dir) = self.folders.images.clone() else {
            return Ok(());
        };
        if self.folders.texts.is_none() {
            return Ok(());
        }

        match scan::scan_images(&images_dir) {
            Ok(images) => {
                info!(dir = %images_dir.display(), count = images.len(), "loaded images");
                self.images = images;
                self.cursor = 0;
                self.state = SessionState::Browsing;
                self.refresh_text();
                Ok(())
            }
            Err(err) => {
                self.images.clear();
                self.cursor = 0;
                self.state = SessionState::Idle;
                self.text = None;
                self.post("Load Error", err.to_string(), MessageLevel::Error);
                Err(err)
            }
        }
    }

    fn current_text_path(&self) -> Option<PathBuf> {
        let texts = self.folders.texts.as_ref()?;
        let image = self.current_image()?;
        Some(texts.join(image.text_file_name()))
    }

    fn refresh_text(&mut self) {
        let Some(path) = self.current_text_path() else {
            self.text = None;
            return;
        };
        self.text = match load_text(&path) {
            Ok(view) => Some(view),
            Err(err) => {
                warn!(%err, "caption could not be loaded");
                let text = err.to_string();
                self.post("Load Error", text.clone(), MessageLevel::Error);
                Some(TextView::Unreadable(text))
            }
        };
    }

    /// Moves the cursor one step, clamped to the image list. Returns whether
    /// it moved. Unsaved edits are dropped when it does.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.state == SessionState::Idle {
            return false;
        }
        let next = match direction {
            Direction::Previous if self.cursor > 0 => self.cursor - 1,
            Direction::Next if self.cursor + 1 < self.images.len() => self.cursor + 1,
            _ => return false,
        };

        if self.state == SessionState::Editing {
            debug!("discarding unsaved text edit");
        }
        self.cursor = next;
        self.state = SessionState::Browsing;
        self.refresh_text();
        true
    }

    pub fn edit_text(&mut self) -> Result<()> {
        if self.current_image().is_none() {
            return Err(SessionError::NoSelection.into());
        }
        if matches!(self.text, Some(TextView::Unreadable(_))) {
            let err = SessionError::TextUnreadable;
            self.post("Edit Error", err.to_string(), MessageLevel::Error);
            return Err(err.into());
        }
        if !matches!(self.text, Some(TextView::Loaded(_))) {
            self.text = Some(TextView::Loaded(String::new()));
        }
        self.state = SessionState::Editing;
        Ok(())
    }

    /// Replaces the edit buffer. Only allowed while editing.
    pub fn replace_text(&mut self, text: impl Into<String>) -> Result<()> {
        if self.state != SessionState::Editing {
            return Err(SessionError::NotEditing.into());
        }
        self.text = Some(TextView::Loaded(text.into()));
        Ok(())
    }

    /// Writes the edit buffer to the current image's text file, creating it
    /// if needed, and returns to browsing.
    pub fn save_text(&mut self) -> Result<()> {
        let result = self.try_save_text();
        match &result {
            Ok(path) => {
                info!(path = %path.display(), "saved text");
                self.post("Save Text", "Text saved successfully!", MessageLevel::Success);
            }
            Err(err) => self.post("Save Error", err.to_string(), MessageLevel::Error),
        }
        result.map(|_| ())
    }

    fn try_save_text(&mut self) -> Result<PathBuf> {
        let path = self.current_text_path().ok_or(SessionError::NoSelection)?;
        if self.state != SessionState::Editing {
            return Err(SessionError::NotEditing.into());
        }
        if matches!(self.text, Some(TextView::Unreadable(_))) {
            return Err(SessionError::TextUnreadable.into());
        }

        let body = match &self.text {
            Some(TextView::Loaded(text)) => text.as_str(),
            _ => "",
        };
        let mut contents = String::with_capacity(body.len() + UTF8_BOM.len_utf8());
        contents.push(UTF8_BOM);
        contents.push_str(body);

        std::fs::write(&path, contents).map_err(|source| Error::TextSave {
            path: path.clone(),
            source,
        })?;

        self.text = Some(TextView::Loaded(body.to_string()));
        self.state = SessionState::Browsing;
        Ok(path)
    }

    /// Copies the current pair to the destination folders.
    pub fn promote(&mut self) -> Result<()> {
        let result = self.try_promote();
        match &result {
            Ok(()) => {
                let text = "Image and Text copied successfully!";
                self.post("Copy", text, MessageLevel::Success);
            }
            Err(err) => self.post("Copy Error", err.to_string(), MessageLevel::Error),
        }
        result
    }

    fn try_promote(&self) -> Result<()> {
        let dirs = self
            .folders
            .promotion_dirs()
            .ok_or(SessionError::FoldersNotConfigured)?;
        let image = self.current_image().ok_or(SessionError::NoImage)?;

        promote::promote(&PromotionRequest::new(image, &dirs))
    }

    /// Image and text counts in the destination folders that are selected.
    pub fn destination_counts(&self) -> Result<(Option<usize>, Option<usize>)> {
        let images = self
            .folders
            .dest_images
            .as_deref()
            .map(|dir| scan::count_files(dir, IMAGE_EXTENSIONS))
            .transpose()?;
        let texts = self
            .folders
            .dest_texts
            .as_deref()
            .map(|dir| scan::count_files(dir, TEXT_EXTENSIONS))
            .transpose()?;
        Ok((images, texts))
    }

    pub fn view(&self) -> View {
        let count = |dir: &Option<PathBuf>, extensions: &[&str]| {
            let dir = dir.as_deref()?;
            scan::count_files(dir, extensions)
                .map_err(|err| warn!(%err, "destination count unavailable"))
                .ok()
        };
        let dest_image_count = count(&self.folders.dest_images, IMAGE_EXTENSIONS);
        let dest_text_count = count(&self.folders.dest_texts, TEXT_EXTENSIONS);

        View {
            state: self.state,
            cursor: self.cursor,
            image_count: self.images.len(),
            image_path: self.current_image().and_then(|image| {
                self.folders
                    .images
                    .as_ref()
                    .map(|dir| dir.join(&image.file_name))
            }),
            text: self.text.clone(),
            dest_image_count,
            dest_text_count,
        }
    }
}

/// Loads a caption. Only a file that does not exist counts as missing.
fn load_text(path: &Path) -> Result<TextView> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(TextView::Loaded(
            text.strip_prefix(UTF8_BOM)
                .map(str::to_string)
                .unwrap_or(text),
        )),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no text file");
            Ok(TextView::Missing)
        }
        Err(source) => Err(Error::TextRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
