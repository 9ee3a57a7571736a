use std::sync::Arc;

use serde::{Serialize, Serializer};
use snafu::{prelude::*, Location};

use crate::{
    backend::{BackendError, VaultBackend},
    monitor::LockMonitor,
    session::{SessionBelief, SessionState},
    storage::{clear_sensitive_data, TransientStorage},
};

/// Errors from explicit user-initiated actions. Unlike the background guard
/// and poller paths, these propagate so the UI can show the failure.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("Vault failed to {failed_to}"))]
    Backend {
        failed_to: &'static str,
        source: BackendError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Any time we're serializing a command error it's because
        // something has failed so we should log that
        tracing::error!("Command error: {:?}", self);
        serializer.serialize_str(&self.to_string())
    }
}

/// Explicit "lock now" request from the user.
///
/// The backend session is closed first. If that fails the error propagates
/// and nothing local changes, so the UI state never claims a lock the
/// backend didn't perform. On success the local teardown mirrors a
/// backend-triggered lock: stop monitoring, close the belief, scrub
/// transient secrets.
pub async fn lock_vault(
    backend: &Arc<dyn VaultBackend>,
    belief: &SessionBelief,
    monitor: &LockMonitor,
    storage: &dyn TransientStorage,
) -> Result<SessionState, CommandError> {
    backend.close_vault().await.context(BackendSnafu {
        failed_to: "close the session",
    })?;

    monitor.stop();
    belief.set_closed().await;
    clear_sensitive_data(storage);

    tracing::info!("Vault locked on user request");

    Ok(belief.snapshot().await)
}

/// Read-only session snapshot for UI bindings.
pub async fn session_state(belief: &SessionBelief) -> SessionState {
    belief.snapshot().await
}
