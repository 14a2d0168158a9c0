// ── Result store ──
//
// All cached service data owned by a `ClashReview` façade: one per-project
// slot per resource kind plus the globally last-viewed result set.

mod cache;

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use clashscope_api::{ClashResult, Run, SuppressionRule, Test};

pub use cache::ProjectCache;

/// Owned cache state. Nothing here is process-global; dropping the façade
/// drops the data.
pub struct ResultStore {
    pub(crate) tests: ProjectCache<Vec<Test>>,
    pub(crate) runs: ProjectCache<Vec<Run>>,
    pub(crate) suppression_rules: ProjectCache<Vec<SuppressionRule>>,
    pub(crate) clash_results: ProjectCache<ClashResult>,
    /// Result most recently fetched through any path, across projects.
    pub(crate) last_viewed: ArcSwapOption<ClashResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            tests: ProjectCache::new(),
            runs: ProjectCache::new(),
            suppression_rules: ProjectCache::new(),
            clash_results: ProjectCache::new(),
            last_viewed: ArcSwapOption::empty(),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn cached_tests(&self, project_id: &str) -> Option<Arc<Vec<Test>>> {
        self.tests.get(project_id)
    }

    pub fn cached_runs(&self, project_id: &str) -> Option<Arc<Vec<Run>>> {
        self.runs.get(project_id)
    }

    pub fn cached_suppression_rules(&self, project_id: &str) -> Option<Arc<Vec<SuppressionRule>>> {
        self.suppression_rules.get(project_id)
    }

    pub fn cached_clash_result(&self, project_id: &str) -> Option<Arc<ClashResult>> {
        self.clash_results.get(project_id)
    }

    pub fn last_viewed(&self) -> Option<Arc<ClashResult>> {
        self.last_viewed.load_full()
    }

    /// Drop every cached payload.
    pub fn clear(&self) {
        self.tests.clear();
        self.runs.clear();
        self.suppression_rules.clear();
        self.clash_results.clear();
        self.last_viewed.store(None);
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
