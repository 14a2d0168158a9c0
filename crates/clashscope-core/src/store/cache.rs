// ── Per-project cache slot ──
//
// Concurrent map from project id to an immutable payload. Writers race and
// the last one wins; there is no in-flight de-duplication.

use std::sync::Arc;

use dashmap::DashMap;

/// One cache slot per project for a single resource kind.
///
/// Values are stored behind `Arc` so readers get cheap snapshots that stay
/// valid after the slot is overwritten.
pub struct ProjectCache<T: Send + Sync + 'static> {
    by_project: DashMap<String, Arc<T>>,
}

impl<T: Send + Sync + 'static> ProjectCache<T> {
    pub fn new() -> Self {
        Self {
            by_project: DashMap::new(),
        }
    }

    /// The cached payload for `project_id`, if the slot is populated.
    pub fn get(&self, project_id: &str) -> Option<Arc<T>> {
        self.by_project.get(project_id).map(|r| Arc::clone(r.value()))
    }

    /// Store `value`, replacing whatever the slot held. Returns the stored `Arc`.
    pub fn insert(&self, project_id: &str, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.by_project
            .insert(project_id.to_owned(), Arc::clone(&value));
        value
    }

    /// Empty one slot. Returns the previous payload.
    pub fn remove(&self, project_id: &str) -> Option<Arc<T>> {
        self.by_project.remove(project_id).map(|(_, v)| v)
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.by_project.contains_key(project_id)
    }

    pub fn clear(&self) {
        self.by_project.clear();
    }

    pub fn len(&self) -> usize {
        self.by_project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_project.is_empty()
    }
}

impl<T: Send + Sync + 'static> Default for ProjectCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
