use std::sync::Arc;

use tokio::sync::RwLock;

/// The UI's local belief about the backend session.
///
/// Possibly stale by design: the authoritative state lives in the backend
/// and this value is only corrected as a side effect of reconciliation, for
/// UI bindings and other observers to react to. Neither the guard nor the
/// monitor read it to make decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_open: bool,
    /// Identifier of the open vault resource. Non-empty only while
    /// `is_open` is true.
    pub current_path: String,
}

/// Shared handle over the session state. Created closed at application
/// start; mutated only by the navigation guard, the lock monitor and
/// explicit user commands.
#[derive(Clone, Default)]
pub struct SessionBelief(Arc<RwLock<SessionState>>);

impl SessionBelief {
    pub async fn set_open(&self, path: impl Into<String>) {
        let mut guard = self.0.write().await;
        guard.is_open = true;
        guard.current_path = path.into();
    }

    pub async fn set_closed(&self) {
        let mut guard = self.0.write().await;
        guard.is_open = false;
        guard.current_path = String::new();
    }

    pub async fn is_open(&self) -> bool {
        self.0.read().await.is_open
    }

    pub async fn snapshot(&self) -> SessionState {
        self.0.read().await.clone()
    }
}
