//! Container id to display-name lookup.
//!
//! Populated on every successful container resolution and read
//! opportunistically for display purposes. The cache is owned by the API
//! client and injected wherever it is needed; nothing else retains state
//! across calls. Writes are append-mostly and a key collision resolves to
//! last-writer-wins, so the guard is a plain `RwLock`.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

#[derive(Debug, Default)]
pub struct ContainerNameCache {
    names: RwLock<HashMap<String, String>>,
}

impl ContainerNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the display name observed for a container.
    pub fn record(&self, container_id: &str, display_name: &str) {
        trace!("Caching container name {:?} -> {:?}", container_id, display_name);
        if let Ok(mut names) = self.names.write() {
            names.insert(container_id.to_string(), display_name.to_string());
        }
    }

    /// Look up the display name recorded for a container, if any.
    pub fn display_name(&self, container_id: &str) -> Option<String> {
        self.names
            .read()
            .ok()
            .and_then(|names| names.get(container_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.names.read().map(|names| names.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
