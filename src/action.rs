use crate::error::MarqueeError;
use crate::feed::FetchTicket;
use crate::types::MediaPage;

/// Which mutation just succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

impl Mutation {
    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::Created => "Entry added successfully!",
            Mutation::Updated => "Entry updated successfully!",
            Mutation::Deleted => "Entry deleted successfully!",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    Tick,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // List
    Mount,
    Reload,
    PageLoaded {
        ticket: FetchTicket,
        result: Result<MediaPage, String>,
    },

    // Form
    OpenAddForm,
    OpenEditForm,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormToggleCategory,
    FormSubmit,

    // Delete
    ShowDeleteConfirm,
    ConfirmYes,
    ConfirmNo,

    // Poster
    ShowPoster,
    OpenPosterInBrowser,

    // Mutation results
    Mutated(Mutation),
    MutationFailed(String),

    Error(String),
    None,
}

impl From<MarqueeError> for Action {
    fn from(err: MarqueeError) -> Self {
        Action::Error(err.to_string())
    }
}
