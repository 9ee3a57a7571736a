use serde::{Deserialize, Serialize};

/// Name and version reported by the backend, used to build window titles.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl AppInfo {
    pub fn window_title(&self) -> String {
        format!("{} v{}", self.name, self.version)
    }
}
