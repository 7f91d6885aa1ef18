//! File intake: type and size checks before extraction

use tracing::{debug, info};

use crate::error::IntakeError;
use crate::types::{UploadedFile, MAX_UPLOAD_BYTES};

/// Holds at most one accepted file reference
#[derive(Debug, Default, Clone)]
pub struct FileIntake {
    current: Option<UploadedFile>,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and hold `file`, replacing any earlier one.
    ///
    /// A rejected file leaves the held file untouched.
    pub fn accept(&mut self, file: UploadedFile) -> Result<&UploadedFile, IntakeError> {
        validate_file(&file)?;
        info!(
            "Accepted file {} ({}, {})",
            file.name,
            file.mime_type,
            file.display_size()
        );
        Ok(self.current.insert(file))
    }

    /// Drop the held file so the same selection is accepted again
    pub fn remove(&mut self) -> Option<UploadedFile> {
        let removed = self.current.take();
        if let Some(file) = &removed {
            debug!("Removed file {}", file.name);
        }
        removed
    }

    pub fn current(&self) -> Option<&UploadedFile> {
        self.current.as_ref()
    }
}

/// Type and size rules, checked in that order
pub fn validate_file(file: &UploadedFile) -> Result<(), IntakeError> {
    if file.format().is_none() {
        return Err(IntakeError::UnsupportedType(file.mime_type.clone()));
    }
    if file.byte_size > MAX_UPLOAD_BYTES {
        return Err(IntakeError::TooLarge {
            byte_size: file.byte_size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
