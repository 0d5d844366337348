//! Error types for the simplenotes application.
//!
//! This module defines the error type shared by the note store, the storage
//! backends and the command line front end.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the simplenotes application.
#[derive(Error, Debug)]
pub enum NotesError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A note title was empty or whitespace only.
    #[error("Title is required.")]
    EmptyTitle,

    /// A note title exceeded the allowed length.
    #[error("Title is too long: {actual} characters (max {max})")]
    TitleTooLong { max: usize, actual: usize },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// Storage key that cannot be mapped to a slot.
    #[error("Invalid storage key: {key}")]
    InvalidKey { key: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
