use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation to '{path}' rejected: {reason}")]
    Rejected { path: String, reason: String },
}

/// The host shell's routing surface.
///
/// The lock monitor uses this for the forced redirect to the login route;
/// everything else about routing stays in the host. Implementations must be
/// safe to call from background tasks.
#[async_trait]
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    async fn push(&self, path: &str) -> Result<(), NavigationError>;
}
