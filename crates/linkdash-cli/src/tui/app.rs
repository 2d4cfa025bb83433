//! Application state and key handling

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use linkdash_core::dashboard::{Dashboard, DashboardView, Effect, Intent};
use linkdash_core::{KeyValueStore, LinkId, LinkStore, LoadOutcome};

/// How long a status message stays visible
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Function used to open URLs (swapped out in tests)
pub type Opener = fn(&str) -> std::io::Result<()>;

/// Selection movement in the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    First,
    Last,
}

/// What a key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Dispatch(Intent),
    Move(Direction),
    ToggleHelp,
    Quit,
    Ignore,
}

/// Application state
pub struct App<S: KeyValueStore> {
    /// Links and interaction state
    pub dashboard: Dashboard<S>,
    /// Index of the selected tile
    pub selected: usize,
    /// Tiles per row in the last drawn layout
    pub columns: usize,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Set by the store's render hook and by UI changes
    needs_redraw: Rc<Cell<bool>>,
    opener: Opener,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new app around a loaded store
    pub fn new(mut store: LinkStore<S>) -> Self {
        let needs_redraw = Rc::new(Cell::new(true));
        {
            let needs_redraw = Rc::clone(&needs_redraw);
            store.set_render_hook(move |_| needs_redraw.set(true));
        }

        let mut app = Self {
            dashboard: Dashboard::new(store),
            selected: 0,
            columns: 1,
            should_quit: false,
            show_help: false,
            status_message: None,
            status_message_time: None,
            needs_redraw,
            opener: open_url,
        };

        if let LoadOutcome::Recovered { reason } = app.dashboard.store().load_outcome() {
            let message = format!("Saved links were unreadable, starting empty ({})", reason);
            app.set_status(message);
        }

        app
    }

    /// Replace the URL opener
    pub fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = opener;
        self
    }

    /// The projection the UI draws from
    pub fn view(&self) -> DashboardView<'_> {
        self.dashboard.view()
    }

    /// ID of the selected tile
    pub fn selected_id(&self) -> Option<LinkId> {
        self.view().links.get(self.selected).map(|l| l.id.clone())
    }

    /// Whether the last write reached storage
    pub fn is_durable(&self) -> bool {
        self.dashboard.store().is_durable()
    }

    /// Clear and return the redraw flag
    pub fn take_redraw(&self) -> bool {
        self.needs_redraw.replace(false)
    }

    /// Request a redraw (resize, timers)
    pub fn request_redraw(&self) {
        self.needs_redraw.set(true);
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
        self.request_redraw();
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
                self.request_redraw();
            }
        }
    }

    /// Translate a key press into an action
    ///
    /// While the form is open every key goes to the form.
    pub fn action_for_key(&self, key: KeyEvent) -> KeyAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyAction::Quit;
        }

        if self.show_help {
            return KeyAction::ToggleHelp;
        }

        if self.view().modal.is_open() {
            return match key.code {
                KeyCode::Esc => KeyAction::Dispatch(Intent::Cancel),
                KeyCode::Enter => KeyAction::Dispatch(Intent::Save),
                KeyCode::Tab | KeyCode::BackTab => KeyAction::Dispatch(Intent::NextField),
                KeyCode::Backspace => KeyAction::Dispatch(Intent::Backspace),
                KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    KeyAction::Dispatch(Intent::ToggleEditMode)
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    KeyAction::Dispatch(Intent::InputChar(c))
                }
                _ => KeyAction::Ignore,
            };
        }

        match key.code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('?') => KeyAction::ToggleHelp,
            KeyCode::Char('e') => KeyAction::Dispatch(Intent::ToggleEditMode),
            KeyCode::Char('a') => KeyAction::Dispatch(Intent::OpenCreate),
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_id() {
                Some(id) => KeyAction::Dispatch(Intent::ClickTile(id)),
                None => KeyAction::Ignore,
            },
            KeyCode::Char('x') | KeyCode::Delete => match self.selected_id() {
                Some(id) => KeyAction::Dispatch(Intent::DeleteTile(id)),
                None => KeyAction::Ignore,
            },
            KeyCode::Char('h') | KeyCode::Left => KeyAction::Move(Direction::Left),
            KeyCode::Char('l') | KeyCode::Right => KeyAction::Move(Direction::Right),
            KeyCode::Char('k') | KeyCode::Up => KeyAction::Move(Direction::Up),
            KeyCode::Char('j') | KeyCode::Down => KeyAction::Move(Direction::Down),
            KeyCode::Home | KeyCode::Char('g') => KeyAction::Move(Direction::First),
            KeyCode::End | KeyCode::Char('G') => KeyAction::Move(Direction::Last),
            _ => KeyAction::Ignore,
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.action_for_key(key) {
            KeyAction::Dispatch(intent) => self.dispatch(intent),
            KeyAction::Move(direction) => self.move_selection(direction),
            KeyAction::ToggleHelp => {
                self.show_help = !self.show_help;
                self.request_redraw();
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Ignore => {}
        }
    }

    /// Run an intent through the dashboard and carry out its effects
    pub fn dispatch(&mut self, intent: Intent) {
        let was_durable = self.is_durable();

        for effect in self.dashboard.dispatch(intent) {
            match effect {
                Effect::Render => self.request_redraw(),
                Effect::Navigate(url) => self.navigate(&url),
            }
        }

        self.clamp_selection();

        if !self.is_durable() {
            let reason = self
                .dashboard
                .store()
                .last_error()
                .unwrap_or("storage error")
                .to_string();
            self.set_status(format!("Not saved: {}", reason));
        } else if !was_durable {
            self.set_status("Saved");
        }
    }

    fn navigate(&mut self, url: &str) {
        match (self.opener)(url) {
            Ok(()) => {
                info!("Opened {}", url);
                self.set_status(format!("Opened {}", url));
            }
            Err(e) => {
                warn!("Failed to open {}: {}", url, e);
                self.set_status(format!("Failed to open: {}", e));
            }
        }
    }

    /// Move the selection within the grid
    pub fn move_selection(&mut self, direction: Direction) {
        let count = self.view().links.len();
        if count == 0 {
            return;
        }
        let last = count - 1;
        let columns = self.columns.max(1);

        self.selected = match direction {
            Direction::Left => self.selected.saturating_sub(1),
            Direction::Right => (self.selected + 1).min(last),
            Direction::Up => self.selected.checked_sub(columns).unwrap_or(self.selected),
            Direction::Down => {
                let below = self.selected + columns;
                if below <= last {
                    below
                } else {
                    self.selected
                }
            }
            Direction::First => 0,
            Direction::Last => last,
        };
        self.request_redraw();
    }

    /// Keep the selection on an existing tile after the list shrinks
    fn clamp_selection(&mut self) {
        let count = self.view().links.len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

/// Open a URL with the platform's default handler
fn open_url(url: &str) -> std::io::Result<()> {
    open::that(url)
}
