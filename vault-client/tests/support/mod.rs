#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, Once,
    },
};

use async_trait::async_trait;
use vault_client::{
    backend::{BackendError, VaultBackend},
    model::{AppInfo, LockPolicy},
    navigator::{NavigationError, Navigator},
};

static INIT_LOGGING: Once = Once::new();

pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        common::tracing::init_tracing("warn");
    });
}

type ScriptedResult = Result<bool, String>;

/// Backend double with scripted responses and call counters.
///
/// Each status flag has a queue of one-shot responses consumed first, then a
/// steady response returned forever after. `String` errors become
/// [`BackendError::Transport`] at the call site.
pub struct MockBackend {
    vault_open_script: Mutex<VecDeque<ScriptedResult>>,
    vault_open_steady: Mutex<ScriptedResult>,
    lock_triggered_script: Mutex<VecDeque<ScriptedResult>>,
    lock_triggered_steady: Mutex<ScriptedResult>,
    app_info: Mutex<Result<AppInfo, String>>,
    lock_policy: Mutex<LockPolicy>,
    close_result: Mutex<Result<(), String>>,

    pub vault_open_calls: AtomicUsize,
    pub lock_triggered_calls: AtomicUsize,
    pub close_calls: AtomicUsize,
    pub minimize_notices: AtomicUsize,
    pub focus_notices: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            vault_open_script: Mutex::new(VecDeque::new()),
            vault_open_steady: Mutex::new(Ok(false)),
            lock_triggered_script: Mutex::new(VecDeque::new()),
            lock_triggered_steady: Mutex::new(Ok(false)),
            app_info: Mutex::new(Ok(AppInfo {
                name: "Password Vault".to_string(),
                version: "1.2.3".to_string(),
            })),
            lock_policy: Mutex::new(LockPolicy::default()),
            close_result: Mutex::new(Ok(())),
            vault_open_calls: AtomicUsize::new(0),
            lock_triggered_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            minimize_notices: AtomicUsize::new(0),
            focus_notices: AtomicUsize::new(0),
        }
    }
}

impl MockBackend {
    pub fn set_vault_open(&self, open: bool) {
        *self.vault_open_steady.lock().unwrap() = Ok(open);
    }

    pub fn push_vault_open(&self, result: Result<bool, &str>) {
        self.vault_open_script
            .lock()
            .unwrap()
            .push_back(result.map_err(str::to_string));
    }

    pub fn set_lock_triggered(&self, triggered: bool) {
        *self.lock_triggered_steady.lock().unwrap() = Ok(triggered);
    }

    pub fn set_lock_triggered_error(&self, message: &str) {
        *self.lock_triggered_steady.lock().unwrap() = Err(message.to_string());
    }

    pub fn push_lock_triggered(&self, result: Result<bool, &str>) {
        self.lock_triggered_script
            .lock()
            .unwrap()
            .push_back(result.map_err(str::to_string));
    }

    pub fn set_app_info_error(&self, message: &str) {
        *self.app_info.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_lock_policy(&self, policy: LockPolicy) {
        *self.lock_policy.lock().unwrap() = policy;
    }

    pub fn set_close_error(&self, message: &str) {
        *self.close_result.lock().unwrap() = Err(message.to_string());
    }

    fn next(
        script: &Mutex<VecDeque<ScriptedResult>>,
        steady: &Mutex<ScriptedResult>,
        call: &'static str,
    ) -> Result<bool, BackendError> {
        let scripted = script.lock().unwrap().pop_front();
        let result = scripted.unwrap_or_else(|| steady.lock().unwrap().clone());

        result.map_err(|message| BackendError::transport(call, message))
    }
}

#[async_trait]
impl VaultBackend for MockBackend {
    async fn is_vault_open(&self) -> Result<bool, BackendError> {
        self.vault_open_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(
            &self.vault_open_script,
            &self.vault_open_steady,
            "is_vault_open",
        )
    }

    async fn is_lock_triggered(&self) -> Result<bool, BackendError> {
        self.lock_triggered_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(
            &self.lock_triggered_script,
            &self.lock_triggered_steady,
            "is_lock_triggered",
        )
    }

    async fn close_vault(&self) -> Result<(), BackendError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.close_result
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| BackendError::transport("close_vault", message))
    }

    async fn notify_minimized(&self) -> Result<(), BackendError> {
        self.minimize_notices.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn notify_focused(&self) -> Result<(), BackendError> {
        self.focus_notices.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn app_info(&self) -> Result<AppInfo, BackendError> {
        self.app_info
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| BackendError::transport("app_info", message))
    }

    async fn lock_policy(&self) -> Result<LockPolicy, BackendError> {
        Ok(self.lock_policy.lock().unwrap().clone())
    }
}

/// Navigator double that records every push.
pub struct RecordingNavigator {
    current: Mutex<String>,
    pushes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(initial_path: &str) -> Self {
        Self {
            current: Mutex::new(initial_path.to_string()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    pub fn pushes(&self) -> Vec<String> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    async fn push(&self, path: &str) -> Result<(), NavigationError> {
        *self.current.lock().unwrap() = path.to_string();
        self.pushes.lock().unwrap().push(path.to_string());

        Ok(())
    }
}
