//! The `common` crate provides the infrastructure shared by the vault client
//! crates: the background [`Task`] runner, the [`RetryPolicy`] helper for
//! flaky backend calls, tracing initialization and a controllable clock.
//!
//! [`Task`]: task::Task
//! [`RetryPolicy`]: retry::RetryPolicy

pub mod retry;
pub mod task;
pub mod time;
pub mod tracing;

pub use retry::RetryPolicy;
