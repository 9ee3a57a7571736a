use std::{sync::Arc, time::Duration};

use common::RetryPolicy;

use crate::{
    backend::VaultBackend,
    model::RouteDescriptor,
    session::SessionBelief,
    APP_NAME,
};

pub const LOGIN_PATH: &str = "/login";
pub const MAIN_PATH: &str = "/main";

/// Static route table. `/` is an alias for the login route; only `/main`
/// requires an open session.
pub static ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: "/",
        requires_auth: false,
        title: None,
        redirect: Some(LOGIN_PATH),
    },
    RouteDescriptor {
        path: LOGIN_PATH,
        requires_auth: false,
        title: Some("Sign in"),
        redirect: None,
    },
    RouteDescriptor {
        path: MAIN_PATH,
        requires_auth: true,
        title: Some("Passwords"),
        redirect: None,
    },
];

pub fn route_for(path: &str) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|route| route.path == path)
}

/// Host platform, as far as routing cares about it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Unknown,
}

/// Routing history mode of the embedded webview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryMode {
    /// Fragment-based URLs. Immune to the webview 404s that path-based
    /// history hits on some platforms.
    Hash,
    /// Path-based URLs.
    History,
}

/// Classify a platform description string (user agent, `uname`, etc.).
/// Purely a function of its input so it can be tested without a real host
/// environment.
pub fn detect_platform(descriptor: &str) -> Platform {
    let descriptor = descriptor.to_lowercase();

    // "darwin" contains "win", so the macOS check has to come first.
    if descriptor.contains("mac") || descriptor.contains("darwin") {
        Platform::MacOs
    } else if descriptor.contains("win") {
        Platform::Windows
    } else if descriptor.contains("linux") {
        Platform::Linux
    } else {
        Platform::Unknown
    }
}

/// Windows webviews 404 on path-based history, and an unrecognized platform
/// gets the safe choice too.
pub fn history_mode(platform: Platform) -> HistoryMode {
    match platform {
        Platform::Windows | Platform::Unknown => HistoryMode::Hash,
        Platform::MacOs | Platform::Linux => HistoryMode::History,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// What the guard decided for a transition, plus the window title resolved
/// along the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardOutcome {
    pub decision: RouteDecision,
    pub window_title: String,
}

#[derive(Clone, Debug)]
pub struct GuardConfig {
    /// Retry policy for the authoritative session check.
    pub session_check: RetryPolicy,
    /// Title used when both the backend and the route's static title are
    /// unavailable.
    pub default_title: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            session_check: RetryPolicy::new(3, Duration::from_millis(100)),
            default_title: APP_NAME.to_string(),
        }
    }
}

/// Gates every route transition on the backend's session state.
///
/// The guard never fails a navigation: every backend call it makes has a
/// fallback value, and the outcome is always either `Allow` or `Redirect`.
pub struct NavigationGuard {
    backend: Arc<dyn VaultBackend>,
    belief: SessionBelief,
    config: GuardConfig,
}

impl NavigationGuard {
    pub fn new(backend: Arc<dyn VaultBackend>, belief: SessionBelief, config: GuardConfig) -> Self {
        Self {
            backend,
            belief,
            config,
        }
    }

    pub async fn before_each(
        &self,
        to: &RouteDescriptor,
        from: &RouteDescriptor,
    ) -> GuardOutcome {
        tracing::debug!("Guarding transition {} -> {}", from.path, to.path);

        let window_title = self.resolve_window_title(to).await;

        // A backend-triggered lock takes priority over everything else.
        // Single best-effort check: a transport failure must never block
        // navigation, so it reads as "no lock".
        let lock_triggered = match self.backend.is_lock_triggered().await {
            Ok(lock_triggered) => lock_triggered,
            Err(e) => {
                tracing::warn!("Lock-trigger check failed, assuming no lock: {}", e);
                false
            }
        };

        if lock_triggered {
            tracing::info!("Backend lock triggered, forcing login route");

            self.belief.set_closed().await;

            let decision = if to.path != LOGIN_PATH {
                RouteDecision::Redirect(LOGIN_PATH)
            } else {
                RouteDecision::Allow
            };

            return GuardOutcome {
                decision,
                window_title,
            };
        }

        // Authoritative session check. Retried because the bridge can be
        // briefly unavailable right after startup; total failure fails safe
        // toward requiring re-authentication.
        let is_vault_open = self
            .config
            .session_check
            .retry_or(|| self.backend.is_vault_open(), false)
            .await;

        self.reconcile(is_vault_open).await;

        let decision = if to.requires_auth && !is_vault_open {
            tracing::info!("Route {} requires an open session, redirecting to login", to.path);
            RouteDecision::Redirect(LOGIN_PATH)
        } else if to.path == LOGIN_PATH && is_vault_open {
            tracing::info!("Session already open, redirecting login to main");
            RouteDecision::Redirect(MAIN_PATH)
        } else {
            RouteDecision::Allow
        };

        GuardOutcome {
            decision,
            window_title,
        }
    }

    /// Correct the local belief to match the freshly queried backend state.
    /// Divergence here is routine, not an error.
    async fn reconcile(&self, is_vault_open: bool) {
        let believed_open = self.belief.is_open().await;

        if is_vault_open && !believed_open {
            tracing::debug!("Backend session open but belief closed, syncing");
            // The vault path is not derivable from the status check
            self.belief.set_open("").await;
        } else if !is_vault_open && believed_open {
            tracing::debug!("Backend session closed but belief open, syncing");
            self.belief.set_closed().await;
        }
    }

    /// Best effort only: a failed app-info call falls back to the route's
    /// static title, then the configured default.
    async fn resolve_window_title(&self, to: &RouteDescriptor) -> String {
        match self.backend.app_info().await {
            Ok(info) => match to.path {
                LOGIN_PATH | MAIN_PATH => info.window_title(),
                _ => to
                    .title
                    .map(str::to_string)
                    .unwrap_or_else(|| info.window_title()),
            },
            Err(e) => {
                tracing::warn!("Failed to fetch app info, using static title: {}", e);
                to.title
                    .map(str::to_string)
                    .unwrap_or_else(|| self.config.default_title.clone())
            }
        }
    }
}
