//! The navigation engine: one long-lived owner of everything the browser UI
//! observes, driven by async operations against a [`DocumentService`].
//!
//! State lives behind a single mutex that is never held across an await.
//! Operations that publish a current node claim an intent ticket first; a
//! result is committed only while its ticket is still the newest, so a slow
//! response can never overwrite a later navigation.

mod children;
mod history;
mod modules;
mod navigate;
mod search;

use crate::cache::CacheEntry;
use crate::cache::CacheStats;
use crate::cache::NodeCache;
use crate::children::ChildrenOutcome;
use crate::children::ChildrenStore;
use crate::config::NavigatorConfig;
use crate::error::ErrorKind;
use crate::error::NavError;
use crate::error::Result;
use crate::expansion::ExpansionSet;
use crate::history::HistoryTracker;
use crate::history::HistoryView;
use crate::registry::ModuleRegistry;
use crate::registry::ModuleRoots;
use crate::search::SearchState;
use futures::future::BoxFuture;
use futures::future::Shared;
use kbnav_protocol::BreadcrumbEntry;
use kbnav_protocol::ChildFilter;
use kbnav_protocol::ChildSort;
use kbnav_protocol::ContentFormat;
use kbnav_protocol::DocumentService;
use kbnav_protocol::ModuleRecord;
use kbnav_protocol::NodeId;
use kbnav_protocol::NodeRecord;
use kbnav_protocol::NodeSummary;
use kbnav_protocol::ViewOptions;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tracing::warn;

pub use navigate::NavigateOutcome;

type ChildrenFlight = Shared<BoxFuture<'static, ChildrenOutcome>>;

/// Where `navigate_to` currently is. Anything other than `Idle` means a
/// navigation is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavPhase {
    #[default]
    Idle,
    Resolving,
    Fetching,
    Confirming,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadingFlags {
    pub modules: bool,
    pub navigation: bool,
    pub search: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Loading {
    Modules,
    Navigation,
    Search,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub operation: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

/// Owned copy of the observable state, for rendering or printing.
#[derive(Clone, Debug, Serialize)]
pub struct NavigatorSnapshot {
    pub current: Option<NodeRecord>,
    pub breadcrumb: Vec<BreadcrumbEntry>,
    pub phase: NavPhase,
    pub loading: LoadingFlags,
    pub expanded: Vec<NodeId>,
    pub history: HistoryView,
    pub modules: Vec<ModuleRecord>,
    pub available_modules: Vec<String>,
    pub loaded_modules: Vec<String>,
    pub roots: BTreeMap<String, ModuleRoots>,
    pub children: BTreeMap<NodeId, Vec<NodeId>>,
    pub child_previews: BTreeMap<NodeId, Vec<NodeSummary>>,
    pub search: SearchState,
    pub view: ViewOptions,
    pub content_format: ContentFormat,
    pub cache: CacheStats,
    pub last_error: Option<LastError>,
}

struct EngineState {
    current: Option<NodeRecord>,
    breadcrumb: Vec<BreadcrumbEntry>,
    phase: NavPhase,
    /// Ticket of the navigation that drives `phase`. Only `navigate_to`
    /// claims it; other intents never move the phase.
    phase_owner: u64,
    modules_loading: u32,
    navigation_loading: u32,
    search_loading: u32,
    expansion: ExpansionSet,
    history: HistoryTracker,
    registry: ModuleRegistry,
    children: ChildrenStore,
    cache: NodeCache,
    search: SearchState,
    /// Bumped by every search start and clear; a result commits only if
    /// it still matches.
    search_generation: u64,
    view: ViewOptions,
    format: ContentFormat,
    last_error: Option<LastError>,
    /// History items with a background fetch in flight.
    priming: HashSet<NodeId>,
}

impl EngineState {
    fn new(config: &NavigatorConfig) -> Self {
        let mut children = ChildrenStore::new();
        children.set_query(config.child_filter, config.child_sort);
        Self {
            current: None,
            breadcrumb: Vec::new(),
            phase: NavPhase::Idle,
            phase_owner: 0,
            modules_loading: 0,
            navigation_loading: 0,
            search_loading: 0,
            expansion: ExpansionSet::new(),
            history: HistoryTracker::new(),
            registry: ModuleRegistry::new(),
            children,
            cache: NodeCache::new(config.cache_capacity),
            search: SearchState::default(),
            search_generation: 0,
            view: config.view,
            format: config.content_format,
            last_error: None,
            priming: HashSet::new(),
        }
    }

    fn counter(&mut self, kind: Loading) -> &mut u32 {
        match kind {
            Loading::Modules => &mut self.modules_loading,
            Loading::Navigation => &mut self.navigation_loading,
            Loading::Search => &mut self.search_loading,
        }
    }

    fn loading(&self) -> LoadingFlags {
        LoadingFlags {
            modules: self.modules_loading > 0,
            navigation: self.navigation_loading > 0,
            search: self.search_loading > 0,
        }
    }
}

struct Inner {
    service: Arc<dyn DocumentService>,
    config: NavigatorConfig,
    state: Mutex<EngineState>,
    children_flights: Mutex<HashMap<NodeId, ChildrenFlight>>,
    intent_seq: AtomicU64,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, EngineState> {
        lock(&self.state)
    }

    fn begin_intent(&self) -> u64 {
        self.intent_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn latest_intent(&self) -> u64 {
        self.intent_seq.load(Ordering::SeqCst)
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest_intent() == ticket
    }

    /// Claims a ticket that also owns the navigation phase.
    fn begin_navigation(&self) -> u64 {
        let mut state = self.state();
        let ticket = self.begin_intent();
        state.phase_owner = ticket;
        ticket
    }

    fn set_phase(&self, ticket: u64, phase: NavPhase) {
        let mut state = self.state();
        if state.phase_owner == ticket && self.is_latest(ticket) {
            state.phase = phase;
        }
    }

    /// Makes `node` current if `ticket` is still the newest intent. The
    /// breadcrumb is replaced only when one is given.
    fn publish(
        &self,
        ticket: u64,
        node: NodeRecord,
        breadcrumb: Option<Vec<BreadcrumbEntry>>,
    ) -> bool {
        let mut state = self.state();
        if !self.is_latest(ticket) {
            return false;
        }
        state.current = Some(node);
        if let Some(breadcrumb) = breadcrumb {
            state.breadcrumb = breadcrumb;
        }
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Raises a loading flag for as long as it lives.
struct LoadingGuard {
    inner: Arc<Inner>,
    kind: Loading,
}

impl LoadingGuard {
    fn new(inner: &Arc<Inner>, kind: Loading) -> Self {
        *inner.state().counter(kind) += 1;
        Self {
            inner: Arc::clone(inner),
            kind,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.inner.state();
        let counter = state.counter(self.kind);
        *counter = counter.saturating_sub(1);
    }
}

/// Returns the phase to `Idle` when the owning navigation ends, unless a
/// newer navigation has taken over the phase in the meantime. Superseding
/// by a non-navigation intent does not keep the phase alive.
struct PhaseGuard {
    inner: Arc<Inner>,
    ticket: u64,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        let mut state = self.inner.state();
        if state.phase_owner == self.ticket {
            state.phase = NavPhase::Idle;
        }
    }
}

/// Client-side navigation and caching layer over a remote document service.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Navigator {
    pub fn new(service: Arc<dyn DocumentService>, config: NavigatorConfig) -> Self {
        let state = EngineState::new(&config);
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                state: Mutex::new(state),
                children_flights: Mutex::new(HashMap::new()),
                intent_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &Arc<dyn DocumentService> {
        &self.inner.service
    }

    /// Module listing and roots, then the server's current node.
    pub async fn initialize(&self) -> Result<()> {
        self.list_modules().await?;
        self.load_current_node().await?;
        Ok(())
    }

    pub fn toggle_expansion(&self, id: &str) -> bool {
        self.inner.state().expansion.toggle(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.inner.state().expansion.is_expanded(id)
    }

    /// Options used by subsequent detail fetches. Already cached entries are
    /// left as they were fetched.
    pub fn set_view_options(&self, view: ViewOptions) {
        self.inner.state().view = view;
    }

    pub fn set_content_format(&self, format: ContentFormat) {
        self.inner.state().format = format;
    }

    pub fn set_child_query(&self, filter: ChildFilter, sort: ChildSort) {
        self.inner.state().children.set_query(filter, sort);
    }

    pub fn current(&self) -> Option<NodeRecord> {
        self.inner.state().current.clone()
    }

    pub fn breadcrumb(&self) -> Vec<BreadcrumbEntry> {
        self.inner.state().breadcrumb.clone()
    }

    pub fn phase(&self) -> NavPhase {
        self.inner.state().phase
    }

    pub fn loading(&self) -> LoadingFlags {
        self.inner.state().loading()
    }

    pub fn cached(&self, id: &str) -> Option<CacheEntry> {
        self.inner.state().cache.get(id).cloned()
    }

    pub fn invalidate_cached(&self, id: &str) -> Option<CacheEntry> {
        self.inner.state().cache.invalidate(id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.state().cache.stats()
    }

    pub fn last_error(&self) -> Option<LastError> {
        self.inner.state().last_error.clone()
    }

    pub fn snapshot(&self) -> NavigatorSnapshot {
        let state = self.inner.state();
        NavigatorSnapshot {
            current: state.current.clone(),
            breadcrumb: state.breadcrumb.clone(),
            phase: state.phase,
            loading: state.loading(),
            expanded: state.expansion.iter().cloned().collect(),
            history: state.history.snapshot(),
            modules: state.registry.modules().to_vec(),
            available_modules: state.registry.available().to_vec(),
            loaded_modules: state.registry.loaded().to_vec(),
            roots: state.registry.roots().clone(),
            children: state.children.ids().clone(),
            child_previews: state.children.previews().clone(),
            search: state.search.clone(),
            view: state.view,
            content_format: state.format,
            cache: state.cache.stats(),
            last_error: state.last_error.clone(),
        }
    }

    fn loading_guard(&self, kind: Loading) -> LoadingGuard {
        LoadingGuard::new(&self.inner, kind)
    }

    fn phase_guard(&self, ticket: u64) -> PhaseGuard {
        PhaseGuard {
            inner: Arc::clone(&self.inner),
            ticket,
        }
    }

    /// Operation boundary: failures are logged and kept as the last error,
    /// then handed back to the caller.
    fn settle<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(operation, error = %err, "operation failed");
            self.record_error(operation, err);
        }
        result
    }

    fn record_error(&self, operation: &'static str, err: &NavError) {
        self.inner.state().last_error = Some(LastError {
            operation,
            kind: err.kind(),
            message: err.to_string(),
        });
    }
}
