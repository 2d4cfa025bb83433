//! Dashboard interaction state machine
//!
//! The UI state has two independent axes:
//!
//! - `Mode`: `View` (tile clicks navigate) or `Edit` (tile clicks open the
//!   edit form)
//! - `Modal`: `Closed` or `Open` with a form and an optional edit target
//!
//! `update` is a reducer: it takes the current `UiState` and an `Intent`,
//! applies any resulting mutation to the `LinkStore`, and returns the next
//! state together with the effects the front-end must carry out.
//!
//! Renderers never mutate the collection directly; they translate their
//! input events into intents and redraw from `DashboardView`.

use tracing::debug;

use crate::models::{normalize_url, Link, LinkId};
use crate::store::LinkStore;
use crate::storage::KeyValueStore;

/// What a tile click does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Clicking a tile opens its URL
    #[default]
    View,
    /// Clicking a tile opens the edit form
    Edit,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::View => Mode::Edit,
            Mode::Edit => Mode::View,
        }
    }

    pub fn is_editing(self) -> bool {
        self == Mode::Edit
    }
}

/// Which form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Url,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Title => Field::Url,
            Field::Url => Field::Title,
        }
    }
}

/// Contents of the add/edit form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkForm {
    pub title: String,
    pub url: String,
    pub focus: Field,
}

impl LinkForm {
    /// A form pre-filled from an existing link
    pub fn from_link(link: &Link) -> Self {
        Self {
            title: link.title.clone(),
            url: link.url_string.clone(),
            focus: Field::Title,
        }
    }

    /// Whether the save affordance is enabled
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }

    /// Trimmed title and normalized URL, or None while the form is invalid
    pub fn submission(&self) -> Option<(String, String)> {
        if !self.can_save() {
            return None;
        }
        Some((
            self.title.trim().to_string(),
            normalize_url(self.url.trim()),
        ))
    }

    /// The field that currently has focus
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.title,
            Field::Url => &mut self.url,
        }
    }
}

/// Modal dialog state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Open {
        /// Link being edited, `None` when creating
        target: Option<LinkId>,
        form: LinkForm,
    },
}

impl Modal {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open { .. })
    }

    pub fn form(&self) -> Option<&LinkForm> {
        match self {
            Modal::Open { form, .. } => Some(form),
            Modal::Closed => None,
        }
    }

    pub fn target(&self) -> Option<&LinkId> {
        match self {
            Modal::Open { target, .. } => target.as_ref(),
            Modal::Closed => None,
        }
    }
}

/// Transient interaction state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub mode: Mode,
    pub modal: Modal,
}

/// A user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Switch between view and edit mode
    ToggleEditMode,
    /// Open an empty form for a new link
    OpenCreate,
    /// Primary click on a tile
    ClickTile(LinkId),
    /// Click on a tile's delete affordance
    DeleteTile(LinkId),
    /// Replace the title field
    SetTitle(String),
    /// Replace the URL field
    SetUrl(String),
    /// Type a character into the focused field
    InputChar(char),
    /// Remove the last character of the focused field
    Backspace,
    /// Move focus to the other field
    NextField,
    /// Close the form, discarding edits
    Cancel,
    /// Submit the form
    Save,
}

/// Something the front-end must do after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Redraw from the current view
    Render,
    /// Open a URL in a new browsing context
    Navigate(String),
}

/// Result of applying an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: UiState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: UiState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn render(state: UiState) -> Self {
        Self {
            state,
            effects: vec![Effect::Render],
        }
    }
}

/// Everything a renderer needs to draw the dashboard
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub links: &'a [Link],
    pub edit_mode: bool,
    pub modal: &'a Modal,
}

/// Apply `intent` to `state`, mutating `store` where the intent calls for it
///
/// Each intent is dispatched to its own handler. Collection changes are
/// announced by the store's render hook; the returned effects cover UI-only
/// changes and navigation.
pub fn update<S: KeyValueStore>(
    state: UiState,
    intent: Intent,
    store: &mut LinkStore<S>,
) -> Transition {
    match intent {
        Intent::ToggleEditMode => on_toggle_edit_mode(state),
        Intent::OpenCreate => on_open_create(state),
        Intent::ClickTile(id) => on_click_tile(state, id, store),
        Intent::DeleteTile(id) => on_delete_tile(state, id, store),
        Intent::SetTitle(title) => edit_form(state, |form| form.title = title),
        Intent::SetUrl(url) => edit_form(state, |form| form.url = url),
        Intent::InputChar(c) => edit_form(state, |form| form.focused_mut().push(c)),
        Intent::Backspace => edit_form(state, |form| {
            form.focused_mut().pop();
        }),
        Intent::NextField => edit_form(state, |form| form.focus = form.focus.next()),
        Intent::Cancel => on_cancel(state),
        Intent::Save => on_save(state, store),
    }
}

fn on_toggle_edit_mode(mut state: UiState) -> Transition {
    // The modal is left as-is
    state.mode = state.mode.toggled();
    Transition::render(state)
}

fn on_open_create(mut state: UiState) -> Transition {
    if state.modal.is_open() {
        return Transition::unchanged(state);
    }
    state.modal = Modal::Open {
        target: None,
        form: LinkForm::default(),
    };
    Transition::render(state)
}

fn on_click_tile<S: KeyValueStore>(
    mut state: UiState,
    id: LinkId,
    store: &LinkStore<S>,
) -> Transition {
    // The open form covers the grid
    if state.modal.is_open() {
        return Transition::unchanged(state);
    }
    let Some(link) = store.get(&id) else {
        debug!("Ignoring click on unknown tile {}", id);
        return Transition::unchanged(state);
    };

    match state.mode {
        Mode::View => Transition {
            effects: vec![Effect::Navigate(link.target_url())],
            state,
        },
        Mode::Edit => {
            state.modal = Modal::Open {
                target: Some(id),
                form: LinkForm::from_link(link),
            };
            Transition::render(state)
        }
    }
}

fn on_delete_tile<S: KeyValueStore>(
    state: UiState,
    id: LinkId,
    store: &mut LinkStore<S>,
) -> Transition {
    store.delete(&id);
    Transition::unchanged(state)
}

fn edit_form(mut state: UiState, apply: impl FnOnce(&mut LinkForm)) -> Transition {
    let edited = if let Modal::Open { form, .. } = &mut state.modal {
        apply(form);
        true
    } else {
        false
    };

    if edited {
        Transition::render(state)
    } else {
        Transition::unchanged(state)
    }
}

fn on_cancel(mut state: UiState) -> Transition {
    if !state.modal.is_open() {
        return Transition::unchanged(state);
    }
    state.modal = Modal::Closed;
    Transition::render(state)
}

fn on_save<S: KeyValueStore>(mut state: UiState, store: &mut LinkStore<S>) -> Transition {
    let submission = match &state.modal {
        Modal::Open { target, form } => form.submission().map(|fields| (target.clone(), fields)),
        Modal::Closed => None,
    };
    let Some((target, (title, url))) = submission else {
        return Transition::unchanged(state);
    };

    match target {
        Some(id) => {
            store.update(&id, title, url);
        }
        None => {
            store.add(title, url);
        }
    }

    state.modal = Modal::Closed;
    Transition::render(state)
}

/// Owns the store and the UI state and runs intents through `update`
pub struct Dashboard<S: KeyValueStore> {
    store: LinkStore<S>,
    state: UiState,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn new(store: LinkStore<S>) -> Self {
        Self {
            store,
            state: UiState::default(),
        }
    }

    /// Apply an intent and return the effects to carry out
    pub fn dispatch(&mut self, intent: Intent) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let transition = update(state, intent, &mut self.store);
        self.state = transition.state;
        transition.effects
    }

    /// Current projection for the renderer
    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            links: self.store.links(),
            edit_mode: self.state.mode.is_editing(),
            modal: &self.state.modal,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn store(&self) -> &LinkStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LinkStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> LinkStore<S> {
        self.store
    }
}
