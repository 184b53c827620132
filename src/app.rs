use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::ideas::{parse_suggestions, Category, Favorites, IdGenerator, Idea};
use crate::provider::{ChatCompletionProvider, IdeaProvider, ProviderError};
use crate::share;
use crate::storage::{LocalStore, FAVORITES_KEY, THEME_KEY};
use crate::theme::{Theme, ThemeMode};

/// Seconds a status message stays in the info line
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Ideas,
    Favorites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Input,   // Typing a user-submitted idea
    Alert,   // Blocking error message
}

/// The one suggestion request allowed in flight
struct InFlight {
    category: Category,
    handle: JoinHandle<Result<String, ProviderError>>,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    pub theme_mode: ThemeMode,
    pub theme: Theme,

    pub selected_category: Category,

    // Current suggestions (top box)
    pub ideas: Vec<Idea>,
    pub selected_idea: usize,

    // Saved favorites (bottom box)
    pub favorites: Favorites,
    pub selected_favorite: usize,

    pub input_buffer: String,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub alert_message: Option<String>,

    config: AppConfig,
    store: LocalStore,
    provider: Arc<dyn IdeaProvider>,
    ids: IdGenerator,
    in_flight: Option<InFlight>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = LocalStore::open_default()?;
        let provider = Arc::new(ChatCompletionProvider::new(&config)?);
        tracing::info!("Using {} at {}", config.provider, provider.endpoint());
        Ok(Self::with_parts(config, store, provider))
    }

    /// Build the app from explicit parts, reading persisted state once
    pub fn with_parts(config: AppConfig, store: LocalStore, provider: Arc<dyn IdeaProvider>) -> Self {
        let theme_mode: ThemeMode = store.get_or_warn(THEME_KEY).unwrap_or_default();
        let favorites =
            Favorites::from_items(store.get_or_warn::<Vec<Idea>>(FAVORITES_KEY).unwrap_or_default());
        let ids = IdGenerator::starting_after(favorites.max_id().unwrap_or(0));

        tracing::info!(
            "Loaded {} favorites, {:?} theme from {}",
            favorites.len(),
            theme_mode,
            store.root().display()
        );

        Self {
            section: Section::Ideas,
            popup: Popup::None,
            theme: Theme::load(theme_mode, config.accent.as_deref()),
            theme_mode,
            selected_category: Category::All,
            ideas: Vec::new(),
            selected_idea: 0,
            favorites,
            selected_favorite: 0,
            input_buffer: String::new(),
            status_message: None,
            status_message_time: None,
            alert_message: None,
            config,
            store,
            provider,
            ids,
            in_flight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Set a status message (auto-clears after a few seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        self.handle_normal_key(key)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.section = match self.section {
                    Section::Ideas => Section::Favorites,
                    Section::Favorites => Section::Ideas,
                };
            }

            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            // Category buttons
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.request_ideas(Category::REQUESTABLE[index]);
            }
            KeyCode::Char('r') => self.request_ideas(self.selected_category),

            KeyCode::Char('f') | KeyCode::Enter => {
                if self.section == Section::Ideas {
                    self.add_selected_to_favorites()?;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.section == Section::Favorites {
                    self.remove_selected_favorite()?;
                }
            }

            KeyCode::Char('c') => self.copy_selected(),
            KeyCode::Char('s') => self.share_selected(),

            KeyCode::Char('i') => {
                self.input_buffer.clear();
                self.popup = Popup::Input;
            }

            KeyCode::Char('t') => self.toggle_theme()?,

            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::Alert => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                    self.alert_message = None;
                    self.popup = Popup::None;
                }
            }
            Popup::Input => match key.code {
                KeyCode::Enter => {
                    self.submit_user_idea();
                    self.popup = Popup::None;
                }
                KeyCode::Esc => {
                    self.input_buffer.clear();
                    self.popup = Popup::None;
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Char(c) => self.input_buffer.push(c),
                _ => {}
            },
            Popup::None => {}
        }
        Ok(())
    }

    fn move_down(&mut self) {
        match self.section {
            Section::Ideas => {
                if !self.ideas.is_empty() {
                    self.selected_idea = (self.selected_idea + 1) % self.ideas.len();
                }
            }
            Section::Favorites => {
                if !self.favorites.is_empty() {
                    self.selected_favorite = (self.selected_favorite + 1) % self.favorites.len();
                }
            }
        }
    }

    fn move_up(&mut self) {
        match self.section {
            Section::Ideas => {
                if !self.ideas.is_empty() {
                    self.selected_idea = self.selected_idea.checked_sub(1).unwrap_or(self.ideas.len() - 1);
                }
            }
            Section::Favorites => {
                if !self.favorites.is_empty() {
                    self.selected_favorite = self
                        .selected_favorite
                        .checked_sub(1)
                        .unwrap_or(self.favorites.len() - 1);
                }
            }
        }
    }

    /// Ask the provider for ideas. Any request still running is dropped so only the latest can land.
    pub fn request_ideas(&mut self, category: Category) {
        self.selected_category = category;

        if let Some(previous) = self.in_flight.take() {
            tracing::debug!("Superseding in-flight request for {}", previous.category);
            previous.handle.abort();
        }

        let provider = Arc::clone(&self.provider);
        let handle = tokio::spawn(async move { provider.suggest(category).await });
        self.in_flight = Some(InFlight { category, handle });
    }

    /// Pick up a finished request, if any
    async fn poll_request(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .map(|f| f.handle.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }
        let Some(InFlight { category, handle }) = self.in_flight.take() else {
            return;
        };

        match handle.await {
            Ok(Ok(content)) => {
                let ideas = parse_suggestions(&content, category, &mut self.ids);
                tracing::info!("Received {} ideas for {}", ideas.len(), category);
                if ideas.is_empty() {
                    self.set_status("The provider returned no ideas");
                }
                self.ideas = ideas;
                self.selected_idea = 0;
            }
            Ok(Err(e)) => self.report_fetch_error(&e.to_string()),
            Err(e) if e.is_cancelled() => {}
            Err(e) => self.report_fetch_error(&format!("Request task failed: {}", e)),
        }
    }

    fn report_fetch_error(&mut self, message: &str) {
        tracing::error!("Error fetching ideas: {}", message);
        if self.config.alert_on_error {
            self.alert_message = Some(format!("Error fetching ideas: {}", message));
            self.popup = Popup::Alert;
        } else {
            self.set_status(format!("Error fetching ideas: {}", message));
        }
    }

    /// Put the typed idea at the top of the suggestions. Blank input does nothing.
    pub fn submit_user_idea(&mut self) {
        let Some(idea) = Idea::user_submitted(&self.input_buffer, &mut self.ids) else {
            return;
        };
        self.ideas.insert(0, idea);
        self.selected_idea = 0;
        self.input_buffer.clear();
    }

    pub fn add_selected_to_favorites(&mut self) -> Result<()> {
        let Some(idea) = self.ideas.get(self.selected_idea).cloned() else {
            return Ok(());
        };

        if self.favorites.add(idea) {
            self.persist_favorites()?;
            self.set_status("Saved to favorites ❤️");
        } else {
            self.set_status("Already in favorites");
        }
        Ok(())
    }

    pub fn remove_selected_favorite(&mut self) -> Result<()> {
        let Some(id) = self.favorites.get(self.selected_favorite).map(|idea| idea.id) else {
            return Ok(());
        };

        if self.favorites.remove(id) {
            self.persist_favorites()?;
            self.set_status("Removed from favorites");
        }
        if self.selected_favorite >= self.favorites.len() {
            self.selected_favorite = self.favorites.len().saturating_sub(1);
        }
        Ok(())
    }

    fn persist_favorites(&self) -> Result<()> {
        self.store.set(FAVORITES_KEY, &self.favorites)
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.theme_mode = self.theme_mode.toggle();
        self.theme = Theme::load(self.theme_mode, self.config.accent.as_deref());
        self.store.set(THEME_KEY, &self.theme_mode)
    }

    /// Idea under the cursor in the focused box
    pub fn selected_entry(&self) -> Option<&Idea> {
        match self.section {
            Section::Ideas => self.ideas.get(self.selected_idea),
            Section::Favorites => self.favorites.get(self.selected_favorite),
        }
    }

    fn copy_selected(&mut self) {
        let Some(text) = self.selected_entry().map(|idea| idea.text.clone()) else {
            return;
        };

        match share::copy_to_clipboard(&text) {
            Ok(()) => {
                self.set_status("Copied to clipboard! 📋");
                if self.config.notifications {
                    if let Err(e) = share::notify("datenight", "Copied to clipboard! 📋") {
                        tracing::debug!("Notification failed: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Error copying: {}", e);
                self.set_status(e.to_string());
            }
        }
    }

    fn share_selected(&mut self) {
        let Some(text) = self.selected_entry().map(|idea| idea.text.clone()) else {
            return;
        };

        // Sharing failures are logged only
        if let Err(e) = share::share_idea(&text) {
            tracing::error!("Error sharing: {}", e);
        }
    }

    pub async fn tick(&mut self) -> Result<()> {
        self.poll_request().await;

        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        Ok(())
    }
}
