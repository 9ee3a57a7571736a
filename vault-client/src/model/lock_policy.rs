use serde::{Deserialize, Serialize};

/// Auto-lock configuration owned by the backend and consumed here as
/// read-only policy. Set into the lock monitor before monitoring starts.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LockPolicy {
    pub enable_auto_lock: bool,
    pub enable_timer_lock: bool,
    pub enable_minimize_lock: bool,
    pub lock_time_minutes: u32,
    pub enable_system_lock: bool,
    pub system_lock_minutes: u32,
}

impl LockPolicy {
    /// Minimize-triggered lock checks require the auto-lock master switch
    /// as well as the minimize-specific one.
    pub fn locks_on_minimize(&self) -> bool {
        self.enable_auto_lock && self.enable_minimize_lock
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            enable_auto_lock: false,
            enable_timer_lock: false,
            enable_minimize_lock: false,
            lock_time_minutes: 10,
            // The backend always enforces a long-stop lock regardless of
            // user settings
            enable_system_lock: true,
            system_lock_minutes: 120,
        }
    }
}
