use async_trait::async_trait;
use chrono::Duration;
use common::task::Task;

use crate::monitor::LockMonitor;

/// Periodic poll of the backend's lock-triggered flag.
pub struct CheckLockStatus {
    monitor: LockMonitor,
    interval: Duration,
}

impl CheckLockStatus {
    pub fn new(monitor: LockMonitor, interval: Duration) -> Self {
        Self { monitor, interval }
    }
}

#[async_trait]
impl Task for CheckLockStatus {
    fn name(&self) -> &'static str {
        "check_lock_status"
    }

    async fn run(&self) -> anyhow::Result<()> {
        self.monitor.check_lock_status().await;

        Ok(())
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}
