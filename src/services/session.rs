//! Process-wide session cache with change notification.
//!
//! The single current session (this is a single-user dashboard process) is
//! held in a watch channel: auth routes replace it, interested components
//! subscribe to it. Dropping a [`SessionWatcher`] is the teardown — no
//! explicit unsubscribe call exists or is needed.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::session::Session;

#[derive(Debug, Clone)]
pub struct SessionCache {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The currently signed-in session, if any.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Replace the current session and notify every subscriber. `None`
    /// signs the process out.
    pub fn replace(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Live subscription to session changes. Rapid replacements coalesce: a
/// watcher observes the latest session, not every intermediate one.
#[derive(Debug)]
pub struct SessionWatcher {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionWatcher {
    /// Wait until the session changes. Returns false once the cache itself
    /// has been dropped and no further change can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// The latest session, marking it as seen.
    pub fn latest(&mut self) -> Option<Session> {
        self.rx.borrow_and_update().clone()
    }
}
