//! Intake form: problem description plus an optional photo.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{Error, Result};

/// Largest accepted upload (25MB).
pub const MAX_IMAGE_BYTES: u64 = 25 * 1024 * 1024;

/// Descriptions longer than this (trimmed, in characters) get clarifying questions.
pub const QUESTION_THRESHOLD_CHARS: usize = 10;

pub const EMPTY_SUBMISSION_MESSAGE: &str = "Please provide a description or upload an image.";

/// File facts checked before an upload is accepted.
#[derive(Debug, Validate)]
struct ImageCandidate {
    #[validate(range(max = 26214400, message = "File size must be less than 25MB"))]
    size: u64,
    #[validate(custom(function = "validate_image_mime", message = "Please upload an image file"))]
    mime_type: String,
}

fn validate_image_mime(mime_type: &str) -> std::result::Result<(), ValidationError> {
    if mime_type.starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::new("image_mime"))
    }
}

/// Size problems are reported before type problems.
fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    for field in ["size", "mime_type"] {
        let message = fields
            .get(field)
            .and_then(|errs| errs.first())
            .and_then(|e| e.message.clone());
        if let Some(message) = message {
            return message.into_owned();
        }
    }
    "Invalid file".to_string()
}

/// An image chosen for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Check a file on disk and read it if it is an acceptable image.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(Error::validation("Please upload an image file"));
        }

        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let candidate = ImageCandidate {
            size: metadata.len(),
            mime_type,
        };
        candidate
            .validate()
            .map_err(|e| Error::Validation(first_message(&e)))?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            file_name,
            mime_type: candidate.mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Local preview of a selected image.
///
/// Backed by a temporary file; dropping the preview removes the file, which is
/// how a superseded preview gets revoked.
#[derive(Debug)]
pub struct ImagePreview {
    file: NamedTempFile,
    url: String,
}

impl ImagePreview {
    pub fn create(image: &ImageFile) -> Result<Self> {
        let suffix = Path::new(&image.file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("homiefixie-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&image.bytes)?;
        file.flush()?;

        let url = format!("file://{}", file.path().display());
        debug!(url = %url, "created image preview");
        Ok(Self { file, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for ImagePreview {
    fn drop(&mut self) {
        debug!(url = %self.url, "revoked image preview");
    }
}

#[derive(Debug)]
struct SelectedImage {
    file: ImageFile,
    preview: ImagePreview,
}

/// What actually gets posted to `/api/analyze`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Trimmed description; `None` when blank
    pub description: Option<String>,
    pub image: Option<ImageFile>,
}

impl AnalysisRequest {
    pub fn new(description: &str, image: Option<ImageFile>) -> Self {
        let trimmed = description.trim();
        Self {
            description: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            image,
        }
    }
}

/// Transient state of the intake form.
#[derive(Debug, Default)]
pub struct IntakeForm {
    description: String,
    image: Option<SelectedImage>,
    error: Option<String>,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref().map(|s| &s.file)
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.image.as_ref().map(|s| s.preview.url())
    }

    /// Inline error for the last rejected action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Select an image from disk.
    ///
    /// A rejected file leaves the current selection untouched and sets the
    /// inline error. An accepted file replaces the selection and revokes the
    /// old preview.
    pub async fn select_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let loaded = ImageFile::load(path).await.and_then(|file| {
            let preview = ImagePreview::create(&file)?;
            Ok(SelectedImage { file, preview })
        });

        match loaded {
            Ok(selected) => {
                self.image = Some(selected);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Whether the submit action is enabled at all.
    pub fn has_input(&self) -> bool {
        !self.description.trim().is_empty() || self.image.is_some()
    }

    /// Whether a submission should first ask for clarifying questions.
    pub fn wants_questions(&self) -> bool {
        self.description.trim().chars().count() > QUESTION_THRESHOLD_CHARS
    }

    /// Validate and package the form for analysis.
    pub fn to_request(&mut self) -> Result<AnalysisRequest> {
        if !self.has_input() {
            self.error = Some(EMPTY_SUBMISSION_MESSAGE.to_string());
            return Err(Error::validation(EMPTY_SUBMISSION_MESSAGE));
        }
        Ok(AnalysisRequest::new(&self.description, self.image().cloned()))
    }

    /// Drop all form state, revoking any preview.
    pub fn reset(&mut self) {
        self.description.clear();
        self.image = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let mut form = IntakeForm::new();
        form.set_description("   \n ");

        let err = form.to_request().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(form.error(), Some(EMPTY_SUBMISSION_MESSAGE));
    }

    #[test]
    fn test_request_trims_description() {
        let mut form = IntakeForm::new();
        form.set_description("  Leaky faucet in kitchen  ");

        let request = form.to_request().unwrap();
        assert_eq!(request.description.as_deref(), Some("Leaky faucet in kitchen"));
        assert!(request.image.is_none());
    }

    #[test]
    fn test_question_threshold() {
        let mut form = IntakeForm::new();
        form.set_description("fix");
        assert!(!form.wants_questions());

        form.set_description("  0123456789  ");
        assert!(!form.wants_questions());

        form.set_description("Caulk around toilet base is cracking and peeling");
        assert!(form.wants_questions());
    }

    #[tokio::test]
    async fn test_select_image_creates_preview() {
        let photo = write_temp(".png", b"\x89PNG fake");
        let mut form = IntakeForm::new();

        form.select_image(photo.path()).await.unwrap();

        let image = form.image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, b"\x89PNG fake");
        assert!(form.preview_url().unwrap().starts_with("file://"));
        assert!(form.has_input());
    }

    #[tokio::test]
    async fn test_wrong_type_keeps_previous_selection() {
        let photo = write_temp(".jpg", b"jpeg bytes");
        let notes = write_temp(".txt", b"not an image");
        let mut form = IntakeForm::new();
        form.select_image(photo.path()).await.unwrap();

        let err = form.select_image(notes.path()).await.unwrap_err();

        assert_eq!(err.user_message(), "Please upload an image file");
        assert_eq!(form.error(), Some("Please upload an image file"));
        assert_eq!(form.image().unwrap().mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected() {
        let big = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        big.as_file().set_len(MAX_IMAGE_BYTES + 1).unwrap();
        let mut form = IntakeForm::new();

        let err = form.select_image(big.path()).await.unwrap_err();

        assert_eq!(err.user_message(), "File size must be less than 25MB");
        assert!(form.image().is_none());
    }

    #[tokio::test]
    async fn test_exactly_25mb_is_accepted() {
        let edge = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        edge.as_file().set_len(MAX_IMAGE_BYTES).unwrap();
        let mut form = IntakeForm::new();

        form.select_image(edge.path()).await.unwrap();
        assert_eq!(form.image().unwrap().size(), MAX_IMAGE_BYTES);
    }

    #[tokio::test]
    async fn test_replacing_image_revokes_old_preview() {
        let first = write_temp(".png", b"first");
        let second = write_temp(".gif", b"second");
        let mut form = IntakeForm::new();

        form.select_image(first.path()).await.unwrap();
        let old_preview = form.image.as_ref().unwrap().preview.path().to_path_buf();
        assert!(old_preview.exists());

        form.select_image(second.path()).await.unwrap();
        assert!(!old_preview.exists());

        let new_preview = form.image.as_ref().unwrap().preview.path().to_path_buf();
        form.reset();
        assert!(!new_preview.exists());
    }
}
