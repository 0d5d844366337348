//! CLI module for the simplenotes application
//!
//! This module handles the command-line interface for interacting with the
//! note store. It plays the role of the UI layer: it validates input, asks
//! for confirmation, and keeps a selection consistent with what it shows.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
};

use console::style;
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{
    check_title, content_preview, format_timestamp, note_count_label, Commands, Config, Confirm,
    DeleteOutcome, KeyValueStorage, Note, NoteStore, NotesError, Result, Selection,
};

const EDITOR_HINT: &str =
    "<!-- Write your note below. This line and the one above are removed on save. -->";

/// Confirmation prompt answered on standard input.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{} [y/N]: ", message);
        if stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        if stdin().read_line(&mut input).is_err() {
            return false;
        }
        matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// CLI Application handler - processes CLI commands and interfaces with NoteStore
pub struct App<S: KeyValueStorage> {
    /// The note store
    store: NoteStore<S>,

    /// Application configuration
    config: Config,

    /// Asked before deleting
    confirm: Box<dyn Confirm>,

    /// Note currently in focus
    selection: Selection,
}

impl<S: KeyValueStorage> App<S> {
    /// Create a new CLI application focused on the first listed note
    pub fn new(store: NoteStore<S>, config: Config, confirm: Box<dyn Confirm>) -> Self {
        let selection = Selection::first_of(&store.sorted_view());
        Self {
            store,
            config,
            confirm,
            selection,
        }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Create {
                title,
                content,
                file,
                edit,
            } => self.create_note(title, content, file, edit)?,

            Commands::Edit {
                id,
                title,
                content,
                file,
                edit,
            } => self.edit_note(id, title, content, file, edit)?,

            Commands::Pin { id } => self.toggle_pin(id)?,

            Commands::Delete { id, force } => self.handle_delete(id, force)?,

            Commands::List { limit, json, brief } => {
                let notes = self.store.sorted_view();
                self.display_notes(notes, limit, json, brief)?;
            }

            Commands::Search { query, limit, json } => self.handle_search(query, limit, json)?,

            Commands::View { id, json } => self.view_note(id, json)?,

            Commands::Reset { force } => self.handle_reset(force)?,

            Commands::Config => {
                println!("{}", serde_json::to_string_pretty(&self.config)?);
            }
        }

        if !self.store.last_save_succeeded() {
            eprintln!(
                "{} changes could not be written to {} in {}",
                style("Warning:").yellow().bold(),
                self.store.persistence().key(),
                self.config.data_dir.display()
            );
        }

        Ok(())
    }

    fn create_note(
        &mut self,
        title: String,
        content: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
    ) -> Result<()> {
        check_title(&title)?;
        let content = self
            .resolve_content(&title, content, file, edit, "")?
            .unwrap_or_default();

        let note = self.store.create(&title, &content)?;
        self.selection.select(note.id.clone());
        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn edit_note(
        &mut self,
        id: String,
        title: Option<String>,
        content: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
    ) -> Result<()> {
        let existing = self
            .store
            .get(&id)
            .ok_or_else(|| NotesError::NoteNotFound { id: id.clone() })?;

        let title = title.unwrap_or_else(|| existing.title.clone());
        check_title(&title)?;
        let content = self
            .resolve_content(&title, content, file, edit, &existing.content)?
            .unwrap_or(existing.content);

        let note = self.store.update(&id, &title, &content)?;
        self.selection.select(note.id.clone());
        println!("Note {} updated successfully", note.id);
        Ok(())
    }

    fn toggle_pin(&mut self, id: String) -> Result<()> {
        let note = self.store.toggle_pin(&id)?;
        let state = if note.pinned { "pinned" } else { "unpinned" };
        println!("Note '{}' {}", note.title, state);
        Ok(())
    }

    fn handle_delete(&mut self, id: String, force: bool) -> Result<()> {
        let note = if force || !self.config.confirm_delete {
            let note = self
                .store
                .get(&id)
                .ok_or_else(|| NotesError::NoteNotFound { id: id.clone() })?;
            self.store.delete(&id);
            note
        } else {
            if let Some(note) = self.store.get(&id) {
                println!("ID:      {}", note.id);
                println!("Created: {}", format_timestamp(note.created_at));
                println!("{}\n", content_preview(&note.content));
            }

            match self
                .store
                .delete_with_confirmation(&id, self.confirm.as_mut())?
            {
                DeleteOutcome::Deleted(note) => note,
                DeleteOutcome::Cancelled => {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
        };

        println!(
            "Note '{}' ({}) has been permanently deleted.",
            note.title, note.id
        );

        if self.selection.reconcile(&self.store.sorted_view()) {
            debug!("Selection moved to {:?}", self.selection.selected_id());
        }
        Ok(())
    }

    fn handle_search(&mut self, query: String, limit: usize, json: bool) -> Result<()> {
        let results = self.store.filtered_view(&query);
        self.selection.reconcile(&results);

        if results.is_empty() && !json {
            println!("No notes found matching query: \"{}\"", query);
            return Ok(());
        }

        self.display_notes(results, limit, json, false)
    }

    fn view_note(&mut self, id: Option<String>, json: bool) -> Result<()> {
        let note = match id {
            Some(id) => {
                let note = self
                    .store
                    .get(&id)
                    .ok_or(NotesError::NoteNotFound { id })?;
                self.selection.select(note.id.clone());
                note
            }
            None => {
                let view = self.store.sorted_view();
                self.selection.reconcile(&view);
                match self.selection.active(&view) {
                    Some(note) => note.clone(),
                    None => {
                        println!("No notes yet. Create one with `simplenotes create -T <title>`.");
                        return Ok(());
                    }
                }
            }
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&note)?);
            return Ok(());
        }

        self.print_note_header(&note);
        println!("ID: {}", note.id);
        println!(
            "Created: {} • Updated: {}",
            format_timestamp(note.created_at),
            format_timestamp(note.updated_at)
        );
        if note.content.trim().is_empty() {
            println!("\n{}", style("No content yet.").dim());
        } else {
            println!("\n{}", note.content);
        }
        Ok(())
    }

    fn handle_reset(&mut self, force: bool) -> Result<()> {
        if !force
            && !self
                .confirm
                .confirm("Delete all notes? This cannot be undone.")
        {
            println!("Reset cancelled.");
            return Ok(());
        }

        self.store.reset()?;
        self.selection = Selection::first_of(&self.store.sorted_view());
        info!("Storage reset");
        println!("All notes removed. Starter notes have been restored.");
        Ok(())
    }

    /// Picks note content from at most one of the content sources.
    ///
    /// Returns `None` when no source was given.
    fn resolve_content(
        &self,
        title: &str,
        content: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
        existing: &str,
    ) -> Result<Option<String>> {
        let sources = [content.is_some(), file.is_some(), edit]
            .iter()
            .filter(|given| **given)
            .count();
        if sources > 1 {
            return Err(NotesError::ApplicationError {
                message: "Use only one of --content, --file and --edit".to_string(),
            });
        }

        match (content, file) {
            (Some(c), _) => Ok(Some(c)),
            (_, Some(path)) => self.read_content_from_file(&path).map(Some),
            (None, None) if edit => self.open_editor(title, existing).map(Some),
            (None, None) => Ok(None),
        }
    }

    fn read_content_from_file(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(NotesError::FileNotFound {
                file_path: path.display().to_string(),
            });
        }
        read_to_string(path).map_err(NotesError::Io)
    }

    fn open_editor(&self, title: &str, existing: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        {
            let mut file = OpenOptions::new().write(true).open(&temp_path)?;
            writeln!(file, "{}", editor_title_line(title))?;
            writeln!(file, "{}", EDITOR_HINT)?;
            write!(file, "{}", existing)?;
        }

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor to write note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_editor_header(&content, title))
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| NotesError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(NotesError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program)
            .args(rest)
            .arg(file_path)
            .status()
            .map_err(|e| NotesError::EditorError {
                message: format!("Failed to execute editor command: {}", e),
            })?;

        if !status.success() {
            return Err(NotesError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    /// Display notes in the requested format
    fn display_notes(
        &self,
        mut notes: Vec<Note>,
        limit: usize,
        json: bool,
        brief: bool,
    ) -> Result<()> {
        let total = notes.len();
        if limit > 0 && notes.len() > limit {
            notes.truncate(limit);
        }

        if json {
            return self.display_notes_json(&notes, brief);
        }

        if notes.is_empty() {
            println!("No notes found. Create a note, or clear your search.");
            return Ok(());
        }

        self.display_notes_text(&notes, brief);

        if notes.len() < total {
            println!("\nShowing {} of {}", notes.len(), note_count_label(total));
        } else {
            println!("\n{}", note_count_label(total));
        }
        Ok(())
    }

    fn display_notes_json(&self, notes: &[Note], brief: bool) -> Result<()> {
        if brief {
            let simplified: Vec<serde_json::Value> = notes
                .iter()
                .map(|note| {
                    serde_json::json!({
                        "id": note.id,
                        "title": note.title,
                        "pinned": note.pinned,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&simplified)?);
        } else {
            println!("{}", serde_json::to_string_pretty(notes)?);
        }
        Ok(())
    }

    fn display_notes_text(&self, notes: &[Note], brief: bool) {
        if brief {
            for note in notes {
                let marker = if note.pinned { "*" } else { " " };
                println!("{} {}  {}", marker, note.id, note.title);
            }
            return;
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            self.print_note_header(note);
            println!("ID: {}", note.id);
            println!("{}", content_preview(&note.content));
            println!(
                "{}",
                style(format!(
                    "Created: {} • Updated: {}",
                    format_timestamp(note.created_at),
                    format_timestamp(note.updated_at)
                ))
                .dim()
            );
        }
    }

    fn print_note_header(&self, note: &Note) {
        let selected = self.selection.selected_id() == Some(note.id.as_str());
        let marker = if selected { "> " } else { "" };
        if note.pinned {
            println!(
                "{}{} {}",
                marker,
                style(&note.title).bold(),
                style("[Pinned]").yellow()
            );
        } else {
            println!("{}{}", marker, style(&note.title).bold());
        }
    }
}

fn editor_title_line(title: &str) -> String {
    format!("<!-- {} -->", title)
}

/// Removes the title and hint lines written at the top of the editor buffer.
///
/// Everything after them is the note content, kept byte for byte.
fn strip_editor_header(content: &str, title: &str) -> String {
    let rest = strip_leading_line(content, &editor_title_line(title));
    strip_leading_line(rest, EDITOR_HINT).to_string()
}

fn strip_leading_line<'a>(content: &'a str, line: &str) -> &'a str {
    content
        .strip_prefix(line)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{MemoryStorage, NotePersistence};

    fn app_with(answers: Rc<RefCell<Vec<bool>>>) -> App<MemoryStorage> {
        let store = NoteStore::open(NotePersistence::new(MemoryStorage::new()));
        let confirm = move |_: &str| answers.borrow_mut().pop().unwrap_or(false);
        App::new(store, Config::default(), Box::new(confirm))
    }

    fn create(app: &mut App<MemoryStorage>, title: &str, content: &str) -> String {
        app.run(Commands::Create {
            title: title.to_string(),
            content: Some(content.to_string()),
            file: None,
            edit: false,
        })
        .unwrap();
        app.selection().selected_id().unwrap().to_string()
    }

    #[test]
    fn starts_on_first_seeded_note() {
        let app = app_with(Rc::default());
        let first = app.store().sorted_view()[0].id.clone();
        assert_eq!(app.selection().selected_id(), Some(first.as_str()));
    }

    #[test]
    fn create_selects_new_note_and_rejects_long_titles() {
        let mut app = app_with(Rc::default());
        let id = create(&mut app, "Groceries", "milk, eggs");
        assert_eq!(app.store().get(&id).unwrap().content, "milk, eggs");

        let result = app.run(Commands::Create {
            title: "x".repeat(121),
            content: None,
            file: None,
            edit: false,
        });
        assert!(matches!(result, Err(NotesError::TitleTooLong { .. })));
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let mut app = app_with(Rc::default());
        let id = create(&mut app, "Title", "body");

        app.run(Commands::Edit {
            id: id.clone(),
            title: Some("Renamed".to_string()),
            content: None,
            file: None,
            edit: false,
        })
        .unwrap();

        let note = app.store().get(&id).unwrap();
        assert_eq!(note.title, "Renamed");
        assert_eq!(note.content, "body");
    }

    #[test]
    fn conflicting_content_sources_are_rejected() {
        let mut app = app_with(Rc::default());
        let result = app.run(Commands::Create {
            title: "T".to_string(),
            content: Some("c".to_string()),
            file: Some(PathBuf::from("notes.txt")),
            edit: false,
        });
        assert!(matches!(result, Err(NotesError::ApplicationError { .. })));
    }

    #[test]
    fn declined_delete_keeps_note_and_accepted_delete_moves_selection() {
        let answers = Rc::new(RefCell::new(vec![true, false]));
        let mut app = app_with(Rc::clone(&answers));
        let id = create(&mut app, "Doomed", "");

        app.run(Commands::Delete {
            id: id.clone(),
            force: false,
        })
        .unwrap();
        assert!(app.store().get(&id).is_some());

        app.run(Commands::Delete {
            id: id.clone(),
            force: false,
        })
        .unwrap();
        assert!(app.store().get(&id).is_none());

        let first = app.store().sorted_view()[0].id.clone();
        assert_eq!(app.selection().selected_id(), Some(first.as_str()));
        assert!(answers.borrow().is_empty());
    }

    #[test]
    fn forced_delete_of_unknown_note_fails() {
        let mut app = app_with(Rc::default());
        let result = app.run(Commands::Delete {
            id: "missing".to_string(),
            force: true,
        });
        assert!(matches!(result, Err(NotesError::NoteNotFound { .. })));
    }

    #[test]
    fn reset_restores_starter_notes() {
        let mut app = app_with(Rc::default());
        create(&mut app, "Extra", "");
        assert_eq!(app.store().len(), 3);

        app.run(Commands::Reset { force: true }).unwrap();
        assert_eq!(app.store().len(), 2);
    }

    #[test]
    fn editor_header_is_removed_and_content_kept_verbatim() {
        let existing = "Layout notes:\n<!-- keep this html comment -->\n    indented tail   \n";
        let buffer = format!(
            "{}\n{}\n{}",
            editor_title_line("Layout"),
            EDITOR_HINT,
            existing
        );
        assert_eq!(strip_editor_header(&buffer, "Layout"), existing);
    }

    #[test]
    fn editor_buffer_without_header_is_untouched() {
        let buffer = "<!-- Other title -->\nbody\n";
        assert_eq!(strip_editor_header(buffer, "Layout"), buffer);

        let hint_only = format!("{}\r\nbody", EDITOR_HINT);
        assert_eq!(strip_editor_header(&hint_only, "Layout"), "body");
    }
}
