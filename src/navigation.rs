//! Views and the navigation seam.

use std::sync::Mutex;

use strum::{Display, EnumString};

/// Views the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum View {
    Home,
    Login,
    Profile,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Profile => "/profile",
        }
    }
}

/// A navigation side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Navigate(View),
    /// Full reload: every piece of UI state is rebuilt from the stores.
    Reload,
}

/// Performs navigation on behalf of the controllers.
pub trait Navigator: Send + Sync {
    fn navigate(&self, view: View);
    fn reload(&self);
}

/// Navigator that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn reload_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == NavigationEvent::Reload)
            .count()
    }

    pub fn last(&self) -> Option<NavigationEvent> {
        self.events().last().copied()
    }

    fn push(&self, event: NavigationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, view: View) {
        self.push(NavigationEvent::Navigate(view));
    }

    fn reload(&self) {
        self.push(NavigationEvent::Reload);
    }
}
