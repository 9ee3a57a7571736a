use std::{
    collections::HashMap,
    sync::Mutex,
};

/// Client-side keys that may hold secret material and must be scrubbed when
/// the session locks.
pub const SENSITIVE_KEYS: [&str; 3] = ["vault_password", "current_accounts", "decrypted_data"];

/// Transient client-side key-value storage.
///
/// Two scopes: durable entries survive a lock (minus the sensitive
/// allow-list) while session-scoped entries are wiped wholesale. No vault
/// data is ever written here.
pub trait TransientStorage: Send + Sync {
    fn set(&self, key: &str, value: &str);
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);

    fn set_session(&self, key: &str, value: &str);
    fn get_session(&self, key: &str) -> Option<String>;
    fn clear_session(&self);
}

/// Remove the sensitive allow-list keys and wipe all session-scoped entries.
pub fn clear_sensitive_data(storage: &dyn TransientStorage) {
    for key in SENSITIVE_KEYS {
        storage.remove(key);
    }

    // Login secrets are held in backend memory and die with the session
    // there; everything session-scoped on this side goes too.
    storage.clear_session();

    tracing::info!("Cleared sensitive transient storage");
}

/// In-memory [`TransientStorage`] used by the desktop shell and by tests.
#[derive(Default)]
pub struct MemoryStorage {
    durable: Mutex<HashMap<String, String>>,
    session: Mutex<HashMap<String, String>>,
}

impl TransientStorage for MemoryStorage {
    fn set(&self, key: &str, value: &str) {
        self.durable
            .lock()
            .expect("lock durable storage")
            .insert(key.to_string(), value.to_string());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.durable
            .lock()
            .expect("lock durable storage")
            .get(key)
            .cloned()
    }

    fn remove(&self, key: &str) {
        self.durable
            .lock()
            .expect("lock durable storage")
            .remove(key);
    }

    fn set_session(&self, key: &str, value: &str) {
        self.session
            .lock()
            .expect("lock session storage")
            .insert(key.to_string(), value.to_string());
    }

    fn get_session(&self, key: &str) -> Option<String> {
        self.session
            .lock()
            .expect("lock session storage")
            .get(key)
            .cloned()
    }

    fn clear_session(&self) {
        self.session.lock().expect("lock session storage").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_removes_sensitive_keys_and_session_entries() {
        let storage = MemoryStorage::default();

        storage.set("vault_password", "hunter2");
        storage.set("current_accounts", "[…]");
        storage.set("decrypted_data", "[…]");
        storage.set("ui_language", "de-DE");
        storage.set_session("clipboard_history", "[…]");

        clear_sensitive_data(&storage);

        for key in SENSITIVE_KEYS {
            assert_eq!(storage.get(key), None);
        }
        assert_eq!(storage.get_session("clipboard_history"), None);

        // Non-sensitive durable entries survive
        assert_eq!(storage.get("ui_language"), Some("de-DE".to_string()));
    }

    #[test]
    fn scrub_on_empty_storage_is_a_no_op() {
        let storage = MemoryStorage::default();

        clear_sensitive_data(&storage);

        assert_eq!(storage.get("vault_password"), None);
    }
}
