use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::{Action, Mutation};
use crate::error::{MarqueeError, Result};
use crate::event::Event;
use crate::feed::FetchTicket;
use crate::form::{FormField, MediaForm};
use crate::list::{MediaList, Viewport};
use crate::notification::{Notification, NotificationKind};
use crate::service::MediaService;
use crate::types::MediaDraft;

/// Modal layer drawn over the table
#[derive(Debug, Clone)]
pub enum Popup {
    Form(MediaForm),
    ConfirmDelete { id: String, title: String },
    Poster { title: String, url: String },
}

pub struct App {
    pub list: MediaList,
    pub popup: Option<Popup>,
    pub notification: Option<Notification>,
    pub should_quit: bool,
    /// Bumped after every successful mutation; the list reloads when it
    /// changes.
    refresh_token: u64,
    viewport: Viewport,
    service: Arc<dyn MediaService>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        service: Arc<dyn MediaService>,
        page_size: u32,
        debounce: Duration,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            list: MediaList::new(page_size, debounce),
            popup: None,
            notification: None,
            should_quit: false,
            refresh_token: 0,
            viewport: Viewport {
                offset: 0,
                height: 10,
            },
            service,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Mount,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Wheel(delta) if self.popup.is_none() => {
                if delta > 0 {
                    Action::ScrollDown
                } else {
                    Action::ScrollUp
                }
            }
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match &self.popup {
            Some(Popup::Form(form)) => Self::handle_form_key(form, key),
            Some(Popup::ConfirmDelete { .. }) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Action::ConfirmYes,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
                    Action::ConfirmNo
                }
                _ => Action::None,
            },
            Some(Popup::Poster { .. }) => match key.code {
                KeyCode::Char('o') => Action::OpenPosterInBrowser,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('p') => Action::Back,
                _ => Action::None,
            },
            None => self.handle_list_key(key),
        }
    }

    fn handle_list_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('a') => Action::OpenAddForm,
            KeyCode::Char('e') | KeyCode::Enter => Action::OpenEditForm,
            KeyCode::Char('d') | KeyCode::Delete => Action::ShowDeleteConfirm,
            KeyCode::Char('p') => Action::ShowPoster,
            KeyCode::Char('r') => Action::Reload,
            _ => Action::None,
        }
    }

    fn handle_form_key(form: &MediaForm, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::Back,
            KeyCode::Enter => Action::FormSubmit,
            KeyCode::Tab | KeyCode::Down => Action::FormNextField,
            KeyCode::BackTab | KeyCode::Up => Action::FormPrevField,
            KeyCode::Left | KeyCode::Right if form.field == FormField::Category => {
                Action::FormToggleCategory
            }
            KeyCode::Backspace => Action::FormBackspace,
            KeyCode::Char(c) => Action::FormInput(c),
            _ => Action::None,
        }
    }

    /// Called after each render with the rows that ended up on screen.
    pub fn observe_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.popup.is_some() {
            return;
        }
        if let Some(ticket) = self.list.observe(viewport, Instant::now()) {
            self.spawn_fetch(ticket);
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back | Action::ConfirmNo => {
                self.popup = None;
            }
            Action::Tick => {
                let now = Instant::now();
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|n| n.is_expired(now))
                {
                    self.notification = None;
                }
                if let Some(ticket) = self.list.tick(now) {
                    self.spawn_fetch(ticket);
                }
            }
            Action::ScrollUp => self.list.select_prev(),
            Action::ScrollDown => self.list.select_next(),
            Action::PageUp => self.list.page_up(self.page_rows()),
            Action::PageDown => self.list.page_down(self.page_rows()),
            Action::GoToTop => self.list.go_top(),
            Action::GoToBottom => self.list.go_bottom(),

            Action::Mount => {
                if let Some(ticket) = self.list.mount() {
                    self.spawn_fetch(ticket);
                }
            }
            Action::Reload => {
                let ticket = self.list.reload();
                self.spawn_fetch(ticket);
            }
            Action::PageLoaded { ticket, result } => {
                self.list
                    .complete(ticket, result.map_err(MarqueeError::Request));
            }

            Action::OpenAddForm => {
                self.popup = Some(Popup::Form(MediaForm::add()));
            }
            Action::OpenEditForm => {
                if let Some(record) = self.list.selected_record() {
                    self.popup = Some(Popup::Form(MediaForm::edit(record)));
                }
            }
            Action::FormInput(c) => self.with_form(|form| form.input(c)),
            Action::FormBackspace => self.with_form(MediaForm::backspace),
            Action::FormNextField => self.with_form(MediaForm::next_field),
            Action::FormPrevField => self.with_form(MediaForm::prev_field),
            Action::FormToggleCategory => self.with_form(MediaForm::toggle_category),
            Action::FormSubmit => {
                if let Some(Popup::Form(form)) = &mut self.popup {
                    if let Some(draft) = form.submit() {
                        let id = form.editing.clone();
                        let poster = form.poster_path();
                        self.spawn_save(id, draft, poster);
                    }
                }
            }

            Action::ShowDeleteConfirm => {
                if let Some(record) = self.list.selected_record() {
                    self.popup = Some(Popup::ConfirmDelete {
                        id: record.id.clone(),
                        title: record.title.clone(),
                    });
                }
            }
            Action::ConfirmYes => {
                if let Some(Popup::ConfirmDelete { id, .. }) = self.popup.take() {
                    self.spawn_delete(id);
                }
            }

            Action::ShowPoster => {
                let selected = self
                    .list
                    .selected_record()
                    .map(|r| (r.title.clone(), r.poster_url.clone()));
                match selected {
                    Some((title, Some(url))) => {
                        self.popup = Some(Popup::Poster { title, url });
                    }
                    Some((_, None)) => {
                        self.notify(NotificationKind::Info, "This entry has no poster.");
                    }
                    None => {}
                }
            }
            Action::OpenPosterInBrowser => {
                let Some(Popup::Poster { url, .. }) = &self.popup else {
                    return;
                };
                let url = url.clone();
                if let Err(e) = open::that(&url) {
                    tracing::warn!(%url, error = %e, "could not open poster");
                    self.update(MarqueeError::from(e).into());
                }
            }

            Action::Mutated(mutation) => {
                tracing::info!(?mutation, token = self.refresh_token + 1, "mutation done");
                // only the form that submitted; the user may have moved on
                if matches!(mutation, Mutation::Created | Mutation::Updated)
                    && matches!(&self.popup, Some(Popup::Form(form)) if form.submitting)
                {
                    self.popup = None;
                }
                self.notify(NotificationKind::Success, mutation.success_message());
                self.refresh_token += 1;
                if let Some(ticket) = self.list.sync_refresh(self.refresh_token) {
                    self.spawn_fetch(ticket);
                }
            }
            Action::MutationFailed(msg) => {
                let message = format!("Error: {}", msg);
                if let Some(Popup::Form(form)) = &mut self.popup {
                    form.fail(message.clone());
                }
                self.notify(NotificationKind::Error, message);
            }

            Action::Error(msg) => {
                self.notify(NotificationKind::Error, msg);
            }
            Action::None => {}
        }
    }

    fn page_rows(&self) -> usize {
        self.viewport.height.max(1)
    }

    fn with_form(&mut self, f: impl FnOnce(&mut MediaForm)) {
        if let Some(Popup::Form(form)) = &mut self.popup {
            if !form.submitting {
                f(form);
            }
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification::new(kind, message, Instant::now()));
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let tx = self.action_tx.clone();
        let service = Arc::clone(&self.service);
        let page_size = self.list.page_size();
        tokio::spawn(async move {
            let result = service
                .fetch_page(ticket.page, page_size)
                .await
                .map_err(|e| e.to_string());
            tx.send(Action::PageLoaded { ticket, result }).ok();
        });
    }

    fn spawn_save(&self, id: Option<String>, draft: MediaDraft, poster: Option<PathBuf>) {
        let tx = self.action_tx.clone();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            match save(service.as_ref(), id, draft, poster).await {
                Ok(mutation) => {
                    tx.send(Action::Mutated(mutation)).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "saving entry failed");
                    tx.send(Action::MutationFailed(e.to_string())).ok();
                }
            }
        });
    }

    fn spawn_delete(&self, id: String) {
        let tx = self.action_tx.clone();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            match service.delete(&id).await {
                Ok(()) => {
                    tx.send(Action::Mutated(Mutation::Deleted)).ok();
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "deleting entry failed");
                    tx.send(Action::MutationFailed(e.to_string())).ok();
                }
            }
        });
    }
}

/// Upload the poster if one was picked, then create or update the entry.
async fn save(
    service: &dyn MediaService,
    id: Option<String>,
    mut draft: MediaDraft,
    poster: Option<PathBuf>,
) -> Result<Mutation> {
    if let Some(path) = poster {
        draft.poster_url = service.upload_poster(&path).await?;
    }
    match id {
        Some(id) => {
            service.update(&id, &draft).await?;
            Ok(Mutation::Updated)
        }
        None => {
            service.create(&draft).await?;
            Ok(Mutation::Created)
        }
    }
}
