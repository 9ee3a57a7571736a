//! Session-synchronization layer for a desktop password-manager client.
//!
//! The vault itself (encryption, key derivation and persistence) lives in an
//! external backend which owns the authoritative session state. This crate
//! keeps the UI's view of that state in sync with it:
//!
//! - [`NavigationGuard`] gates every route transition on freshly queried
//!   backend state and redirects unauthenticated transitions.
//! - [`LockMonitor`] polls for backend-initiated locks (idle timeout,
//!   minimize policy) and forces the UI back to the login route when one
//!   fires, scrubbing transient secrets on the way.
//! - [`SessionBelief`] holds the local, possibly-stale "is the vault open"
//!   flag that both of the above reconcile against backend truth.
//!
//! [`NavigationGuard`]: router::NavigationGuard
//! [`LockMonitor`]: monitor::LockMonitor
//! [`SessionBelief`]: session::SessionBelief

pub mod backend;
pub mod commands;
pub mod model;
pub mod monitor;
pub mod navigator;
pub mod notifications;
pub mod router;
pub mod session;
pub mod storage;
mod tasks;

/// Application name, used for window titles and notification headers when
/// the backend cannot be queried.
pub const APP_NAME: &str = "Password Vault";
