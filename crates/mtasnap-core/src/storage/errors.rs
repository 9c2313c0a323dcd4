use crate::errors::SnapError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Frame buffer length {actual} does not match {expected}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl SnapError for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            StorageError::DirectoryCreation { .. } => "STORAGE_DIRECTORY_CREATION_FAILED",
            StorageError::InvalidFrame { .. } => "STORAGE_INVALID_FRAME",
            StorageError::ImageWrite { .. } => "STORAGE_IMAGE_WRITE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, StorageError::DirectoryCreation { .. })
    }
}
