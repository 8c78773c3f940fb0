use std::path::PathBuf;

use crate::types::{MediaDraft, MediaRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Category,
    Director,
    Budget,
    Location,
    Duration,
    ReleaseInfo,
    PosterUrl,
    PosterFile,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Title,
        FormField::Category,
        FormField::Director,
        FormField::Budget,
        FormField::Location,
        FormField::Duration,
        FormField::ReleaseInfo,
        FormField::PosterUrl,
        FormField::PosterFile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Category => "Type",
            FormField::Director => "Director",
            FormField::Budget => "Budget",
            FormField::Location => "Location",
            FormField::Duration => "Duration",
            FormField::ReleaseInfo => "Year/Time",
            FormField::PosterUrl => "Poster URL",
            FormField::PosterFile => "Poster file",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

/// State of the add/edit popup
#[derive(Debug, Clone)]
pub struct MediaForm {
    pub draft: MediaDraft,
    /// Id of the record being edited; `None` when adding.
    pub editing: Option<String>,
    pub field: FormField,
    /// Local image to upload before saving
    pub poster_file: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl MediaForm {
    pub fn add() -> Self {
        Self {
            draft: MediaDraft::default(),
            editing: None,
            field: FormField::Title,
            poster_file: String::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn edit(record: &MediaRecord) -> Self {
        Self {
            draft: MediaDraft::from(record),
            editing: Some(record.id.clone()),
            ..Self::add()
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Media Entry"
        } else {
            "Add New Media Entry"
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Category => self.draft.category.to_string(),
            FormField::PosterFile => self.poster_file.clone(),
            _ => self.text(field).cloned().unwrap_or_default(),
        }
    }

    fn text(&self, field: FormField) -> Option<&String> {
        match field {
            FormField::Title => Some(&self.draft.title),
            FormField::Director => Some(&self.draft.director),
            FormField::Budget => Some(&self.draft.budget),
            FormField::Location => Some(&self.draft.location),
            FormField::Duration => Some(&self.draft.duration),
            FormField::ReleaseInfo => Some(&self.draft.release_info),
            FormField::PosterUrl => Some(&self.draft.poster_url),
            FormField::PosterFile => Some(&self.poster_file),
            FormField::Category => None,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Title => Some(&mut self.draft.title),
            FormField::Director => Some(&mut self.draft.director),
            FormField::Budget => Some(&mut self.draft.budget),
            FormField::Location => Some(&mut self.draft.location),
            FormField::Duration => Some(&mut self.draft.duration),
            FormField::ReleaseInfo => Some(&mut self.draft.release_info),
            FormField::PosterUrl => Some(&mut self.draft.poster_url),
            FormField::PosterFile => Some(&mut self.poster_file),
            FormField::Category => None,
        }
    }

    pub fn input(&mut self, c: char) {
        if self.field == FormField::Category {
            if c == ' ' {
                self.toggle_category();
            }
            return;
        }
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    pub fn toggle_category(&mut self) {
        self.draft.category = self.draft.category.toggle();
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    pub fn poster_path(&self) -> Option<PathBuf> {
        let path = self.poster_file.trim();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    /// Validate and mark the form as submitting. Returns the draft to save.
    pub fn submit(&mut self) -> Option<MediaDraft> {
        if self.submitting {
            return None;
        }
        if let Err(msg) = self.draft.validate() {
            self.error = Some(msg);
            return None;
        }
        self.error = None;
        self.submitting = true;
        let mut draft = self.draft.clone();
        draft.title = draft.title.trim().to_string();
        Some(draft)
    }

    /// The save failed; let the user fix things and try again.
    pub fn fail(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}
