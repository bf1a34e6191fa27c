use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Mutex;

/// Where extracted page text ends up.
///
/// `upsert_page` inserts or replaces the content stored under
/// `(url, project_id)`. Writing the same content twice must leave the store
/// unchanged.
pub trait PageStore {
    type Error: std::fmt::Display;

    fn upsert_page(&self, url: &str, project_id: &str, content: &str) -> Result<(), Self::Error>;
}

/// Keeps pages in memory. Used for dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Mutex<BTreeMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str, project_id: &str) -> Option<String> {
        self.lock()
            .get(&(url.to_string(), project_id.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored `(url, content)` pairs for one project, ordered by URL.
    pub fn pages_for(&self, project_id: &str) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .filter(|((_, project), _)| project == project_id)
            .map(|((url, _), content)| (url.clone(), content.clone()))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), String>> {
        self.pages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PageStore for MemoryStore {
    type Error = Infallible;

    fn upsert_page(&self, url: &str, project_id: &str, content: &str) -> Result<(), Infallible> {
        self.lock()
            .insert((url.to_string(), project_id.to_string()), content.to_string());
        Ok(())
    }
}
