//! Active-note selection kept consistent with the visible notes.

use crate::Note;

/// Whether the editor is composing a new note or editing the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Create,
    Edit,
}

/// The note a front end currently focuses on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected_id: Option<String>,
    mode: EditorMode,
}

impl Selection {
    /// Selects the first note of `view`, if any, in create mode.
    pub fn first_of(view: &[Note]) -> Self {
        Self {
            selected_id: view.first().map(|n| n.id.clone()),
            mode: EditorMode::Create,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Focuses `id` for editing.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected_id = Some(id.into());
        self.mode = EditorMode::Edit;
    }

    /// Clears the selection to compose a new note.
    pub fn start_new(&mut self) {
        self.selected_id = None;
        self.mode = EditorMode::Create;
    }

    /// Falls back to the first note of `view` (or nothing) when the selected
    /// note is gone, reverting to create mode. Returns `true` if anything changed.
    pub fn reconcile(&mut self, view: &[Note]) -> bool {
        let Some(selected) = self.selected_id.as_deref() else {
            return false;
        };
        if view.iter().any(|n| n.id == selected) {
            return false;
        }

        *self = Self::first_of(view);
        true
    }

    /// The selected note within `view`.
    pub fn active<'a>(&self, view: &'a [Note]) -> Option<&'a Note> {
        let selected = self.selected_id.as_deref()?;
        view.iter().find(|n| n.id == selected)
    }
}
