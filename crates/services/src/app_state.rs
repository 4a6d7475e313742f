//! Application-wide UI state as an explicit store/reducer.
//!
//! Cross-cutting state (current view, theme, signed-in user, menu) lives in
//! one container that pages receive by dependency passing. Components talk
//! to each other by dispatching actions, never by reaching into another
//! component's internals.

use std::sync::Mutex;

use talk100_core::model::Theme;

/// Top-level views of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Home,
    Quiz,
    Progress,
    Settings,
}

/// Display data for the signed-in learner. Authentication itself is the
/// backend's business; the client only carries what it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: AppView,
    pub theme: Theme,
    pub user: Option<UserProfile>,
    pub menu_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: AppView::Home,
            theme: Theme::Light,
            user: None,
            menu_open: false,
        }
    }
}

/// Everything that can happen to the app state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Navigate(AppView),
    SetTheme(Theme),
    ToggleTheme,
    SignedIn(UserProfile),
    SignedOut,
    MenuOpened,
    MenuClosed,
}

/// Pure state transition; all policy lives here, testable without any
/// subscription machinery.
#[must_use]
pub fn reduce(mut state: AppState, action: AppAction) -> AppState {
    match action {
        AppAction::Navigate(view) => {
            state.view = view;
            // Navigation closes the menu itself; no component pokes another.
            state.menu_open = false;
        }
        AppAction::SetTheme(theme) => state.theme = theme,
        AppAction::ToggleTheme => {
            state.theme = match state.theme {
                Theme::Light => Theme::Dark,
                Theme::Dark => Theme::Light,
            };
        }
        AppAction::SignedIn(profile) => state.user = Some(profile),
        AppAction::SignedOut => {
            state.user = None;
            state.view = AppView::Home;
            state.menu_open = false;
        }
        AppAction::MenuOpened => state.menu_open = true,
        AppAction::MenuClosed => state.menu_open = false,
    }
    state
}

/// Shared state container. Dispatch applies the reducer under a lock and
/// returns the new snapshot.
pub struct AppStateStore {
    state: Mutex<AppState>,
}

impl AppStateStore {
    #[must_use]
    pub fn new(initial: AppState) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }

    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    pub fn dispatch(&self, action: AppAction) -> AppState {
        let mut guard = self.state.lock().expect("app state lock");
        *guard = reduce(guard.clone(), action);
        guard.clone()
    }

    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.state.lock().expect("app state lock").clone()
    }
}

impl Default for AppStateStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}
