use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AppInfo, LockPolicy};

/// Error talking to the backend over its RPC bridge.
///
/// Every call in this crate that consumes a status flag internally recovers
/// from this error with a documented fallback; only user-initiated mutating
/// actions propagate it.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend call '{call}' failed: {message}")]
    Transport {
        call: &'static str,
        message: String,
    },
}

impl BackendError {
    pub fn transport(call: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            call,
            message: message.into(),
        }
    }
}

/// The vault backend's session surface.
///
/// The backend owns both flags: `is_vault_open` reports the authoritative
/// session state and `is_lock_triggered` reports a backend-originated lock
/// (idle timeout, minimize policy or manual trigger) that the UI has not yet
/// reacted to. Neither result may be cached; callers re-query on every
/// decision and only write the result into [`SessionBelief`] for other
/// observers.
///
/// [`SessionBelief`]: crate::session::SessionBelief
#[async_trait]
pub trait VaultBackend: Send + Sync {
    async fn is_vault_open(&self) -> Result<bool, BackendError>;

    async fn is_lock_triggered(&self) -> Result<bool, BackendError>;

    /// Close the session on the backend, wiping its in-memory key material.
    async fn close_vault(&self) -> Result<(), BackendError>;

    /// Fire-and-forget window-state notifications. The backend uses these to
    /// drive its minimize-lock policy; failures are logged by callers and
    /// never acted upon.
    async fn notify_minimized(&self) -> Result<(), BackendError>;

    async fn notify_focused(&self) -> Result<(), BackendError>;

    async fn app_info(&self) -> Result<AppInfo, BackendError>;

    async fn lock_policy(&self) -> Result<LockPolicy, BackendError>;
}
