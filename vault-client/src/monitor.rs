use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use common::{
    task::{RunnerMode, TaskRunner},
    time,
};
use tokio::{task::JoinHandle, time::sleep};

use crate::{
    backend::VaultBackend,
    model::LockPolicy,
    navigator::Navigator,
    notifications::Notifications,
    router::LOGIN_PATH,
    session::SessionBelief,
    storage::{clear_sensitive_data, TransientStorage},
    tasks::CheckLockStatus,
};

/// Window-state transitions fed in by the host shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window content became invisible. Detected via page visibility,
    /// which cannot distinguish a hidden tab from a true window minimize on
    /// every platform; the periodic poll corrects any misread.
    Hidden,
    /// The window content became visible again.
    Shown,
    Blurred,
    Focused,
}

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Cadence of the periodic lock-status poll.
    pub poll_interval: chrono::Duration,
    /// Delay between the window hiding and the policy-triggered lock check,
    /// so the backend has applied its minimize policy by the time we ask.
    pub hidden_settle_delay: Duration,
    /// Delay between the window reappearing and the follow-up lock check.
    pub shown_settle_delay: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: chrono::Duration::seconds(30),
            hidden_settle_delay: Duration::from_millis(100),
            shown_settle_delay: Duration::from_millis(200),
        }
    }
}

struct MonitorInner {
    backend: Arc<dyn VaultBackend>,
    belief: SessionBelief,
    navigator: Arc<dyn Navigator>,
    storage: Arc<dyn TransientStorage>,
    notifications: Notifications,
    config: MonitorConfig,
    policy: Mutex<LockPolicy>,
    active: AtomicBool,
    hidden_at: Mutex<Option<DateTime<Utc>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Detects backend-initiated locks that happen independently of user
/// navigation and forces the UI into the locked state.
///
/// Two sources feed the same check: a periodic poll of the backend's
/// lock-triggered flag, and window visibility transitions when the
/// minimize-lock policy is enabled. The Active/Idle flag makes the
/// lock-handling sequence run at most once per monitoring session, however
/// many checks race into it.
#[derive(Clone)]
pub struct LockMonitor {
    inner: Arc<MonitorInner>,
}

impl LockMonitor {
    pub fn new(
        backend: Arc<dyn VaultBackend>,
        belief: SessionBelief,
        navigator: Arc<dyn Navigator>,
        storage: Arc<dyn TransientStorage>,
        notifications: Notifications,
        config: MonitorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                backend,
                belief,
                navigator,
                storage,
                notifications,
                config,
                policy: Mutex::new(LockPolicy::default()),
                active: AtomicBool::new(false),
                hidden_at: Mutex::new(None),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Install the backend's auto-lock policy. Expected before [`start`],
    /// but safe at any point.
    ///
    /// [`start`]: LockMonitor::start
    pub fn set_policy(&self, policy: LockPolicy) {
        tracing::debug!("Lock policy set: {:?}", policy);
        *self.inner.policy.lock().expect("lock policy") = policy;
    }

    /// Fetch the auto-lock policy from the backend and install it. Best
    /// effort: on failure the current policy stays in place.
    pub async fn load_policy(&self) {
        match self.inner.backend.lock_policy().await {
            Ok(policy) => self.set_policy(policy),
            Err(e) => {
                tracing::warn!("Failed to load lock policy, keeping current: {}", e);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Idle → Active. Spawns the periodic lock-status poll. No-op when
    /// already Active.
    pub async fn start(&self) {
        if self.inner.active.swap(true, Ordering::SeqCst) {
            tracing::debug!("Lock monitoring already active, skipping start");
            return;
        }

        tracing::info!("Starting lock monitoring");

        let monitor = self.clone();
        let poll_interval = self.inner.config.poll_interval;
        let handle = tokio::task::spawn(async move {
            let runner = TaskRunner::new(RunnerMode::Timer);
            runner
                .add_task(CheckLockStatus::new(monitor, poll_interval))
                .await;

            let mut runner = runner;
            runner.run().await;
        });

        // No await between the Active flip above and this store, so a
        // concurrent stop() either sees the handle here or is caught by the
        // re-check below. A replaced handle is aborted rather than leaked.
        if let Some(replaced) = self
            .inner
            .timer
            .lock()
            .expect("lock timer handle")
            .replace(handle)
        {
            replaced.abort();
        }

        if !self.is_active() {
            // stop() interleaved while the runner was being set up
            self.abort_timer();
        }
    }

    /// Active → Idle. Synchronously cancels the poll timer so no further
    /// checks or backend calls happen once this returns. No-op when Idle.
    pub fn stop(&self) {
        if !self.inner.active.swap(false, Ordering::SeqCst) {
            return;
        }

        tracing::info!("Stopping lock monitoring");

        self.abort_timer();
        *self.inner.hidden_at.lock().expect("lock hidden timestamp") = None;
    }

    /// One lock-status check. Best effort: a transport failure is logged and
    /// taken as "no lock". The periodic poll provides eventual correction
    /// if the backend really has locked.
    pub async fn check_lock_status(&self) {
        if !self.is_active() {
            return;
        }

        match self.inner.backend.is_lock_triggered().await {
            Ok(true) => {
                tracing::info!("Backend reports a triggered lock");
                self.handle_lock_event().await;
            }
            Ok(false) => {
                tracing::trace!("No lock triggered");
            }
            Err(e) => {
                tracing::warn!("Lock-status check failed, taking no action: {}", e);
            }
        }
    }

    pub async fn handle_window_event(&self, event: WindowEvent) {
        if !self.is_active() {
            tracing::debug!("Ignoring window event {:?} while idle", event);
            return;
        }

        match event {
            WindowEvent::Hidden => {
                tracing::debug!("Window hidden, possibly minimized");

                *self.inner.hidden_at.lock().expect("lock hidden timestamp") =
                    Some(time::now());

                self.notify_minimized().await;

                if self.locks_on_minimize() {
                    sleep(self.inner.config.hidden_settle_delay).await;
                    self.check_lock_status().await;
                }
            }
            WindowEvent::Shown => {
                let hidden_at = self
                    .inner
                    .hidden_at
                    .lock()
                    .expect("lock hidden timestamp")
                    .take();

                if let Some(hidden_at) = hidden_at {
                    let hidden_for = time::now() - hidden_at;
                    tracing::debug!(
                        "Window shown after {}ms hidden",
                        hidden_for.num_milliseconds()
                    );

                    if self.locks_on_minimize() {
                        sleep(self.inner.config.shown_settle_delay).await;
                        self.check_lock_status().await;
                    }
                }

                self.notify_focused().await;
            }
            WindowEvent::Blurred => {
                // Deliberately no lock check here, blur fires far too often
                tracing::debug!("Window lost focus");
            }
            WindowEvent::Focused => {
                tracing::debug!("Window gained focus");
                self.notify_focused().await;
            }
        }
    }

    /// The lock-handling sequence. The Active → Idle swap makes the first
    /// caller the only one to run it; racing checks observe Idle and return.
    async fn handle_lock_event(&self) {
        if !self.inner.active.swap(false, Ordering::SeqCst) {
            return;
        }

        tracing::info!("Handling backend lock: closing session UI");

        *self.inner.hidden_at.lock().expect("lock hidden timestamp") = None;

        self.inner.belief.set_closed().await;
        clear_sensitive_data(self.inner.storage.as_ref());

        if self.inner.navigator.current_path() != LOGIN_PATH {
            if let Err(e) = self.inner.navigator.push(LOGIN_PATH).await {
                tracing::error!("Failed to navigate to login after lock: {}", e);
            }

            self.inner
                .notifications
                .send_with_default_title("The vault was locked automatically, please sign in again")
                .await;
        }

        // Aborted last: this check may be running inside the timer task, and
        // the abort only lands at its next await point.
        self.abort_timer();
    }

    fn abort_timer(&self) {
        if let Some(handle) = self.inner.timer.lock().expect("lock timer handle").take() {
            handle.abort();
        }
    }

    fn locks_on_minimize(&self) -> bool {
        self.inner
            .policy
            .lock()
            .expect("lock policy")
            .locks_on_minimize()
    }

    async fn notify_minimized(&self) {
        if let Err(e) = self.inner.backend.notify_minimized().await {
            tracing::warn!("Failed to notify backend of minimize: {}", e);
        }
    }

    async fn notify_focused(&self) {
        if let Err(e) = self.inner.backend.notify_focused().await {
            tracing::warn!("Failed to notify backend of focus: {}", e);
        }
    }
}
