// src/source/dir.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tokio::fs;

use crate::authoring::validate_subject_name;
use crate::config::IMAGES_FOLDER;
use crate::error::QuizError;
use crate::models::bank::SubjectDocument;
use crate::source::{SubjectSource, subject_file_name, subject_from_file_name};

/// Subject files in a local folder, plus one image folder per subject.
/// Besides serving quizzes it carries the authoring operations.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    images_root: PathBuf,
}

impl DirSource {
    /// Images default to an `images` folder inside `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let images_root = root.join(IMAGES_FOLDER);
        Self { root, images_root }
    }

    pub fn with_images(root: impl Into<PathBuf>, images_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images_root: images_root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    pub fn subject_path(&self, subject: &str) -> PathBuf {
        self.root.join(subject_file_name(subject))
    }

    /// Folder holding the images referenced by a subject's questions.
    pub fn images_path(&self, subject: &str) -> PathBuf {
        self.images_root.join(subject)
    }

    /// Lists subject keys found in the folder, creating it when missing.
    pub async fn scan_subjects(&self) -> Result<Vec<String>, QuizError> {
        fs::create_dir_all(&self.root).await?;

        let mut subjects = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            if let Some(subject) = file_name.to_str().and_then(subject_from_file_name) {
                subjects.push(subject.to_string());
            }
        }
        subjects.sort();
        Ok(subjects)
    }

    /// Reads the full document, disabled entries included.
    pub async fn read_document(&self, subject: &str) -> Result<SubjectDocument, QuizError> {
        let raw = self.fetch_subject(subject).await?;
        SubjectDocument::from_json(&raw)
    }

    pub async fn save_document(
        &self,
        subject: &str,
        document: &SubjectDocument,
    ) -> Result<(), QuizError> {
        let json = document.to_json_pretty()?;
        fs::write(self.subject_path(subject), json).await?;
        tracing::info!(
            "Saved subject '{}' ({} lessons, {} questions)",
            subject,
            document.lessons.len(),
            document.questions.len()
        );
        Ok(())
    }

    /// Creates an empty subject file. Refuses invalid names and existing subjects.
    pub async fn create_subject(&self, subject: &str) -> Result<SubjectDocument, QuizError> {
        validate_subject_name(subject)?;
        fs::create_dir_all(&self.root).await?;

        if fs::try_exists(self.subject_path(subject)).await? {
            return Err(QuizError::SubjectExists(subject.to_string()));
        }

        let document = SubjectDocument::default();
        self.save_document(subject, &document).await?;
        fs::create_dir_all(self.images_path(subject)).await?;
        Ok(document)
    }

    /// Copies the subject file next to itself with a timestamp suffix.
    pub async fn backup_subject(&self, subject: &str) -> Result<PathBuf, QuizError> {
        let path = self.subject_path(subject);
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup = PathBuf::from(format!("{}.backup_{}", path.display(), stamp));

        fs::copy(&path, &backup)
            .await
            .map_err(|e| not_found_as_subject(e, subject))?;
        tracing::info!("Backed up subject '{}' to {}", subject, backup.display());
        Ok(backup)
    }

    /// Removes the subject file, and its image folder when `delete_images` is set.
    pub async fn delete_subject(
        &self,
        subject: &str,
        delete_images: bool,
    ) -> Result<(), QuizError> {
        fs::remove_file(self.subject_path(subject))
            .await
            .map_err(|e| not_found_as_subject(e, subject))?;

        if delete_images {
            let images = self.images_path(subject);
            if fs::try_exists(&images).await? {
                fs::remove_dir_all(&images).await?;
            }
        }

        tracing::info!("Deleted subject '{}'", subject);
        Ok(())
    }

    /// Copies the subject file to `dest`. When the subject has an image
    /// folder it lands in `images/{subject}` next to `dest`, replacing any
    /// previous export.
    pub async fn export_subject(&self, subject: &str, dest: &Path) -> Result<(), QuizError> {
        fs::copy(self.subject_path(subject), dest)
            .await
            .map_err(|e| not_found_as_subject(e, subject))?;

        let images = self.images_path(subject);
        if fs::try_exists(&images).await? {
            let parent = dest.parent().unwrap_or_else(|| Path::new("."));
            let exported = parent.join(IMAGES_FOLDER).join(subject);
            if fs::try_exists(&exported).await? {
                fs::remove_dir_all(&exported).await?;
            }
            copy_dir(&images, &exported).await?;
        }

        tracing::info!("Exported subject '{}' to {}", subject, dest.display());
        Ok(())
    }
}

async fn copy_dir(from: &Path, to: &Path) -> Result<(), QuizError> {
    let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];
    while let Some((src, dst)) = pending.pop() {
        fs::create_dir_all(&dst).await?;
        let mut entries = fs::read_dir(&src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = dst.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                fs::copy(entry.path(), target).await?;
            }
        }
    }
    Ok(())
}

fn not_found_as_subject(err: std::io::Error, subject: &str) -> QuizError {
    if err.kind() == ErrorKind::NotFound {
        QuizError::SubjectNotFound(subject.to_string())
    } else {
        QuizError::Io(err)
    }
}

#[async_trait]
impl SubjectSource for DirSource {
    async fn fetch_subject(&self, subject: &str) -> Result<String, QuizError> {
        fs::read_to_string(self.subject_path(subject))
            .await
            .map_err(|e| not_found_as_subject(e, subject))
    }

    async fn has_subject(&self, subject: &str) -> Result<bool, QuizError> {
        Ok(fs::try_exists(self.subject_path(subject)).await?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
