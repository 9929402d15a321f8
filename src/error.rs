//! Error handling for the character sheet store
//!
//! Every persistence failure is recovered locally by the session layer; these
//! types carry enough context for logging and for the user-facing notification.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors that can occur while editing, storing or exchanging a character.
#[derive(Error, Debug)]
pub enum SheetError {
    // Store Errors
    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("Store quota exceeded writing '{key}': needed {needed_bytes} bytes, quota {quota_bytes} bytes")]
    QuotaExceeded {
        key: String,
        needed_bytes: usize,
        quota_bytes: usize,
    },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored character under '{key}' is corrupted: {source}")]
    CorruptedRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored entry under '{key}' is not valid text: {source}")]
    UnreadableEntry {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Import rejected, file is not valid JSON: {source}")]
    InvalidImport {
        #[source]
        source: serde_json::Error,
    },

    #[error("No character data to export")]
    NoCharacterData,

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Template / Sheet Errors
    #[error("Invalid sheet template: {reason}")]
    InvalidTemplate { reason: String },

    #[error("Unknown tracker: {name}")]
    UnknownTracker { name: String },

    #[error("No {section} named '{name}' on this sheet")]
    UnknownTrait { section: String, name: String },

    #[error("{section} slot {slot} out of range (sheet has {len})")]
    SlotOutOfRange {
        section: String,
        slot: usize,
        len: usize,
    },

    #[error("Invalid die rating: {value}")]
    InvalidRating { value: String },

    #[error("Invalid move direction: {value} (expected 'up' or 'down')")]
    InvalidDirection { value: String },

    #[error("Unknown talent template: {name}")]
    UnknownTalentTemplate { name: String },
}

impl SheetError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SheetError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            SheetError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            SheetError::Serialization(_) => "SERIALIZATION_ERROR",
            SheetError::CorruptedRecord { .. } => "CORRUPTED_RECORD",
            SheetError::UnreadableEntry { .. } => "UNREADABLE_ENTRY",
            SheetError::InvalidImport { .. } => "INVALID_IMPORT",
            SheetError::NoCharacterData => "NO_CHARACTER_DATA",
            SheetError::FileReadError { .. } => "FILE_READ_ERROR",
            SheetError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            SheetError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            SheetError::InvalidTemplate { .. } => "INVALID_TEMPLATE",
            SheetError::UnknownTracker { .. } => "UNKNOWN_TRACKER",
            SheetError::UnknownTrait { .. } => "UNKNOWN_TRAIT",
            SheetError::SlotOutOfRange { .. } => "SLOT_OUT_OF_RANGE",
            SheetError::InvalidRating { .. } => "INVALID_RATING",
            SheetError::InvalidDirection { .. } => "INVALID_DIRECTION",
            SheetError::UnknownTalentTemplate { .. } => "UNKNOWN_TALENT_TEMPLATE",
        }
    }

    /// Returns true if the user can fix the problem and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SheetError::Serialization(_) | SheetError::InvalidTemplate { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SheetError::StoreUnavailable { .. } => {
                Some("Check that the store directory exists and is writable.")
            }
            SheetError::QuotaExceeded { .. } => Some("Shorten long notes or free up storage space."),
            SheetError::CorruptedRecord { .. } | SheetError::UnreadableEntry { .. } => {
                Some("The damaged save was removed. Import a backup export to restore it.")
            }
            SheetError::InvalidImport { .. } => {
                Some("Choose a .json file previously produced by 'export'.")
            }
            SheetError::NoCharacterData => Some("Edit the sheet once so there is something to export."),
            SheetError::SlotOutOfRange { .. } => Some("Slots are numbered from 0."),
            SheetError::InvalidRating { .. } => Some("Use one of d4, d6, d8, d10, d12."),
            SheetError::UnknownTalentTemplate { .. } => {
                Some("Run 'talent templates' to list the available templates.")
            }
            _ => None,
        }
    }

    /// Returns true if the stored entry itself is damaged and should be dropped.
    pub fn is_corrupted_entry(&self) -> bool {
        matches!(
            self,
            SheetError::CorruptedRecord { .. } | SheetError::UnreadableEntry { .. }
        )
    }
}
