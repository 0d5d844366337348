//! Shared type definitions for the simplenotes application.
//!
//! This module contains the crate-wide `Result` alias and the command line
//! subcommands.
use std::path::PathBuf;

use clap::Subcommand;

use crate::NotesError;

/// A specialized Result type for simplenotes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Available subcommands for the simplenotes application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note
    Create {
        /// Title of the note (required, max 120 characters)
        #[clap(short = 'T', long)]
        title: String,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Path to a file containing the note's content
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Open content in editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Path to a file containing the new note content
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Open the current content in editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Pin or unpin a note
    Pin {
        /// ID of the note to toggle
        id: String,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// List notes, pinned first then most recently updated
    List {
        /// Limit the number of notes returned (0 for all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show note IDs and titles
        #[clap(short, long)]
        brief: bool,
    },

    /// Search notes by title or content
    Search {
        /// Search query text, matched case-insensitively
        query: String,

        /// Limit the number of search results (0 for all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a note (defaults to the first listed note)
    View {
        /// ID of the note to view
        id: Option<String>,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Remove all stored notes; starter notes are recreated
    Reset {
        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Config,
}
