// ── Clash review façade ──
//
// Memoizing layer between presentation code and `ClashClient`. Each list
// resource is cached per project on first non-empty fetch and broadcast to
// subscribers. Empty and failed fetches are never cached, so the next call
// retries. There is no expiry; `refresh_tests` and `reset` are the only ways
// to replace cached data.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use clashscope_api::{
    Authorization, ClashClient, ClashRecord, ClashResult, Run, RunRequest, RunStarted,
    StaticToken, SuppressionRule, Test, TestDefinition, TlsMode, TransportConfig,
};

use crate::config::{ServiceConfig, TlsVerification};
use crate::error::CoreError;
use crate::notify::Notifier;
use crate::store::{ProjectCache, ResultStore};
use crate::visualize::{self, ViewHost};

/// Notification payload: the freshly cached value, or `None` when a forced
/// refresh came back with nothing.
pub type Snapshot<T> = Option<Arc<T>>;

/// Construction-time knobs that are not part of the transport.
pub struct ReviewOptions {
    /// Target of [`ClashReview::start_test_run`].
    pub default_run: Option<RunRequest>,
    pub apply_zoom: bool,
    pub view_host: Option<Arc<dyn ViewHost>>,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            default_run: None,
            apply_zoom: true,
            view_host: None,
        }
    }
}

// ── ClashReview ──────────────────────────────────────────────────────

/// The entry point for consumers.
///
/// Cheaply cloneable via `Arc<ReviewInner>`; clones share caches,
/// subscribers and the zoom flag.
#[derive(Clone)]
pub struct ClashReview {
    inner: Arc<ReviewInner>,
}

struct ReviewInner {
    client: ClashClient,
    store: ResultStore,
    apply_zoom: AtomicBool,
    view_host: Option<Arc<dyn ViewHost>>,
    default_run: Option<RunRequest>,
    tests_changed: Notifier<Snapshot<Vec<Test>>>,
    runs_changed: Notifier<Snapshot<Vec<Run>>>,
    rules_changed: Notifier<Snapshot<Vec<SuppressionRule>>>,
    clashes_changed: Notifier<Snapshot<ClashResult>>,
}

impl ClashReview {
    pub fn new(client: ClashClient) -> Self {
        Self::with_options(client, ReviewOptions::default())
    }

    pub fn with_options(client: ClashClient, options: ReviewOptions) -> Self {
        Self {
            inner: Arc::new(ReviewInner {
                client,
                store: ResultStore::new(),
                apply_zoom: AtomicBool::new(options.apply_zoom),
                view_host: options.view_host,
                default_run: options.default_run,
                tests_changed: Notifier::new(),
                runs_changed: Notifier::new(),
                rules_changed: Notifier::new(),
                clashes_changed: Notifier::new(),
            }),
        }
    }

    /// Build the HTTP client from `config` and wrap it.
    ///
    /// A configured token is installed as a [`StaticToken`]; without one the
    /// host must install a provider via [`authorization()`](Self::authorization)
    /// before the first call, or every call fails with
    /// [`CoreError::AuthNotReady`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self, CoreError> {
        Self::build(config, None)
    }

    /// Same as [`from_config`](Self::from_config), attaching a viewer.
    pub fn from_config_with_view(
        config: &ServiceConfig,
        view_host: Arc<dyn ViewHost>,
    ) -> Result<Self, CoreError> {
        Self::build(config, Some(view_host))
    }

    fn build(
        config: &ServiceConfig,
        view_host: Option<Arc<dyn ViewHost>>,
    ) -> Result<Self, CoreError> {
        let auth = match &config.token {
            Some(token) => Authorization::with_provider(Arc::new(StaticToken::new(token.clone()))),
            None => Authorization::new(),
        };
        let client = ClashClient::new(
            config.base_url.as_str(),
            &config.accept,
            Arc::new(auth),
            &build_transport(config),
        )?;
        debug!(base_url = %config.base_url, "clash review client ready");

        Ok(Self::with_options(
            client,
            ReviewOptions {
                default_run: config.default_run.clone(),
                apply_zoom: config.apply_zoom,
                view_host,
            },
        ))
    }

    pub fn client(&self) -> &ClashClient {
        &self.inner.client
    }

    /// The late-bound token slot shared with the client.
    pub fn authorization(&self) -> &Arc<Authorization> {
        self.inner.client.authorization()
    }

    pub fn store(&self) -> &ResultStore {
        &self.inner.store
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn tests_changed(&self) -> &Notifier<Snapshot<Vec<Test>>> {
        &self.inner.tests_changed
    }

    pub fn runs_changed(&self) -> &Notifier<Snapshot<Vec<Run>>> {
        &self.inner.runs_changed
    }

    pub fn suppression_rules_changed(&self) -> &Notifier<Snapshot<Vec<SuppressionRule>>> {
        &self.inner.rules_changed
    }

    pub fn clashes_changed(&self) -> &Notifier<Snapshot<ClashResult>> {
        &self.inner.clashes_changed
    }

    // ── Memoized reads ───────────────────────────────────────────────

    /// Tests configured for `project_id`.
    pub async fn tests(&self, project_id: &str) -> Result<Arc<Vec<Test>>, CoreError> {
        let inner = &self.inner;
        memoized(
            &inner.store.tests,
            &inner.tests_changed,
            "tests",
            project_id,
            async { inner.client.list_tests(project_id).await.map(|l| l.tests) },
        )
        .await
    }

    /// Runs for `project_id`, in the order the service returned them.
    pub async fn runs(&self, project_id: &str) -> Result<Arc<Vec<Run>>, CoreError> {
        let inner = &self.inner;
        memoized(
            &inner.store.runs,
            &inner.runs_changed,
            "runs",
            project_id,
            async { inner.client.list_runs(project_id).await.map(|l| l.runs) },
        )
        .await
    }

    pub async fn suppression_rules(
        &self,
        project_id: &str,
    ) -> Result<Arc<Vec<SuppressionRule>>, CoreError> {
        let inner = &self.inner;
        memoized(
            &inner.store.suppression_rules,
            &inner.rules_changed,
            "suppression rules",
            project_id,
            async {
                inner
                    .client
                    .list_suppression_rules(project_id)
                    .await
                    .map(|l| l.suppression_rules)
            },
        )
        .await
    }

    /// Re-fetch tests unconditionally.
    ///
    /// A non-empty list overwrites the cache slot. Subscribers are notified
    /// every time: with the fresh list (even if empty or unchanged), or with
    /// `None` when the call failed.
    pub async fn refresh_tests(&self, project_id: &str) -> Result<Arc<Vec<Test>>, CoreError> {
        let inner = &self.inner;
        match inner.client.list_tests(project_id).await {
            Ok(list) => {
                let fresh = if list.tests.is_empty() {
                    Arc::new(list.tests)
                } else {
                    inner.store.tests.insert(project_id, list.tests)
                };
                info!(project_id, count = fresh.len(), "tests refreshed");
                inner.tests_changed.publish(&Some(Arc::clone(&fresh)));
                Ok(fresh)
            }
            Err(e) => {
                warn!(project_id, error = %e, "tests refresh failed");
                inner.tests_changed.publish(&None);
                Err(e.into())
            }
        }
    }

    /// Clash result of the project's first run.
    ///
    /// "First" is the first run in service order. The runs list used here is
    /// fetched fresh and does not populate the runs cache. Only a result
    /// document carrying a `result` member is cached; it also becomes the
    /// last-viewed result.
    pub async fn clash_result(&self, project_id: &str) -> Result<Arc<ClashResult>, CoreError> {
        let inner = &self.inner;
        if let Some(hit) = inner.store.clash_results.get(project_id) {
            debug!(project_id, "clash result cache hit");
            return Ok(hit);
        }

        let runs = inner
            .client
            .list_runs(project_id)
            .await
            .inspect_err(|e| warn!(project_id, error = %e, "runs fetch failed"))?
            .runs;
        let Some(first) = runs.first() else {
            return Err(no_data("runs", project_id));
        };
        let href = result_link(first)?;

        let result = inner.client.get_result_by_url(href).await?;
        if result.result.is_none() {
            debug!(project_id, run = %first.id, "result document has no records yet");
            return Err(no_data("clash results", project_id));
        }

        let stored = inner.store.clash_results.insert(project_id, result);
        info!(project_id, clashes = stored.records().len(), "clash result cached");
        inner.store.last_viewed.store(Some(Arc::clone(&stored)));
        inner.clashes_changed.publish(&Some(Arc::clone(&stored)));
        Ok(stored)
    }

    /// Fetch any result document by absolute link. Uncached.
    pub async fn result_for_url(&self, url: &str) -> Result<ClashResult, CoreError> {
        Ok(self.inner.client.get_result_by_url(url).await?)
    }

    /// Load the result of the `index`-th run of `project_id` into the
    /// last-viewed slot and broadcast it.
    ///
    /// Uses the cached runs list, fetching it first if needed.
    pub async fn show_run_result(
        &self,
        project_id: &str,
        index: usize,
    ) -> Result<Arc<ClashResult>, CoreError> {
        let runs = self.runs(project_id).await?;
        let run = runs.get(index).ok_or_else(|| CoreError::NotFound {
            entity_type: "run".into(),
            identifier: format!("#{index} of project {project_id}"),
        })?;
        let href = result_link(run)?;

        let result = Arc::new(self.inner.client.get_result_by_url(href).await?);
        debug!(project_id, run = %run.id, "showing run result");
        self.inner.store.last_viewed.store(Some(Arc::clone(&result)));
        self.inner.clashes_changed.publish(&Some(Arc::clone(&result)));
        Ok(result)
    }

    /// The result most recently loaded by any path, across projects.
    pub fn last_viewed_result(&self) -> Option<Arc<ClashResult>> {
        self.inner.store.last_viewed()
    }

    /// Full metadata for one run. Uncached.
    pub async fn run_detail(&self, run_id: &str) -> Result<Run, CoreError> {
        Ok(self.inner.client.get_run_detail(run_id).await?.run)
    }

    // ── Mutations (never touch the caches) ───────────────────────────

    /// Create the canned demo test in `project_id`.
    pub async fn create_test(&self, project_id: &str) -> Result<serde_json::Value, CoreError> {
        let created = self
            .inner
            .client
            .create_test(&TestDefinition::create_template(project_id))
            .await?;
        info!(project_id, "test created");
        Ok(created)
    }

    /// Overwrite `test_id` with the canned definition that carries a
    /// suppression rule.
    pub async fn update_test(&self, test_id: &str) -> Result<serde_json::Value, CoreError> {
        let updated = self
            .inner
            .client
            .update_test(test_id, &TestDefinition::update_template())
            .await?;
        info!(test_id, "test updated");
        Ok(updated)
    }

    /// Start a run of the configured default test.
    pub async fn start_test_run(&self) -> Result<RunStarted, CoreError> {
        let request = self
            .inner
            .default_run
            .as_ref()
            .ok_or_else(|| CoreError::Config {
                message: "no default run configured (test, iModel and named version ids)".into(),
            })?;
        self.start_run(request).await
    }

    pub async fn start_run(&self, request: &RunRequest) -> Result<RunStarted, CoreError> {
        let started = self.inner.client.run_test(request).await?;
        info!(test_id = %request.test_id, imodel_id = %request.imodel_id, "run started");
        Ok(started)
    }

    /// Start a run whose result is filtered by the test's suppression rules.
    pub async fn create_suppression_run(
        &self,
        test_id: &str,
        imodel_id: &str,
        named_version_id: &str,
    ) -> Result<RunStarted, CoreError> {
        self.start_run(&RunRequest::new(test_id, imodel_id, named_version_id))
            .await
    }

    // ── Display ──────────────────────────────────────────────────────

    pub fn enable_zoom(&self) {
        self.inner.apply_zoom.store(true, Ordering::Relaxed);
    }

    pub fn disable_zoom(&self) {
        self.inner.apply_zoom.store(false, Ordering::Relaxed);
    }

    pub fn zoom_enabled(&self) -> bool {
        self.inner.apply_zoom.load(Ordering::Relaxed)
    }

    /// Highlight element A in red and element B in blue in the active view,
    /// framing both when zoom is enabled.
    pub async fn visualize_clash(&self, element_a: &str, element_b: &str) {
        visualize::show_clash(
            self.inner.view_host.as_deref(),
            element_a,
            element_b,
            self.zoom_enabled(),
        )
        .await;
    }

    pub async fn visualize_record(&self, record: &ClashRecord) {
        self.visualize_clash(&record.element_a_id, &record.element_b_id)
            .await;
    }

    pub fn reset_display(&self) {
        visualize::clear_display(self.inner.view_host.as_deref());
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// Forget every cached payload, including the last-viewed result.
    /// Subscriptions are left in place.
    pub fn reset(&self) {
        self.inner.store.clear();
        debug!("clash review caches cleared");
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Get-or-fetch for one per-project list slot.
async fn memoized<T, F>(
    cache: &ProjectCache<Vec<T>>,
    notifier: &Notifier<Snapshot<Vec<T>>>,
    resource: &'static str,
    project_id: &str,
    fetch: F,
) -> Result<Arc<Vec<T>>, CoreError>
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<Vec<T>, clashscope_api::Error>> + Send,
{
    if let Some(hit) = cache.get(project_id) {
        debug!(resource, project_id, "cache hit");
        return Ok(hit);
    }

    let items = fetch
        .await
        .inspect_err(|e| warn!(resource, project_id, error = %e, "fetch failed"))?;
    if items.is_empty() {
        debug!(resource, project_id, "empty list, not caching");
        return Err(no_data(resource, project_id));
    }

    let stored = cache.insert(project_id, items);
    info!(resource, project_id, count = stored.len(), "cached");
    notifier.publish(&Some(Arc::clone(&stored)));
    Ok(stored)
}

fn result_link(run: &Run) -> Result<&str, CoreError> {
    run.result_href().ok_or_else(|| CoreError::MalformedInput {
        message: format!("run {} has no result link", run.id),
    })
}

fn no_data(resource: &str, project_id: &str) -> CoreError {
    CoreError::NoData {
        resource: resource.into(),
        project: project_id.into(),
    }
}

fn build_transport(config: &ServiceConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig::default().with_tls(tls)
}
