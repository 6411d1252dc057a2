//! Navigation seam between the session and the view layer.

use tokio::sync::watch;

/// What the session needs from the view layer when it expires.
pub trait NavigationPort: Send + Sync {
    /// Whether the unauthenticated entry screen is showing.
    fn is_at_entry(&self) -> bool;

    /// Return to the entry screen.
    fn go_to_entry(&self);
}

/// Top-level screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Entry point
    #[default]
    Login,
    Signup,
    /// Profile and feed
    Profile,
}

impl Screen {
    pub const fn is_entry(self) -> bool {
        matches!(self, Self::Login)
    }
}

/// [`NavigationPort`] backed by a watch channel the view layer can follow.
#[derive(Debug)]
pub struct ScreenTracker {
    current: watch::Sender<Screen>,
}

impl Default for ScreenTracker {
    fn default() -> Self {
        Self::new(Screen::default())
    }
}

impl ScreenTracker {
    pub fn new(initial: Screen) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    pub fn current(&self) -> Screen {
        *self.current.borrow()
    }

    /// Record that the view layer switched screens.
    pub fn show(&self, screen: Screen) {
        self.current.send_replace(screen);
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.current.subscribe()
    }
}

impl NavigationPort for ScreenTracker {
    fn is_at_entry(&self) -> bool {
        self.current().is_entry()
    }

    fn go_to_entry(&self) {
        self.show(Screen::Login);
    }
}
