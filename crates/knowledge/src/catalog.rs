//! Variety catalog: the set of known variety names, loaded once.
//!
//! The catalog is loaded from the graph store on first use and cached for
//! the life of the process. Concurrent first loads share a single query.
//! A failed load is remembered for `state()` and retried on the next call.

use crate::graph::GraphStore;
use krishi_core::{AppError, AppResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Observable lifecycle of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    Uninitialized,
    Loading,
    /// Loaded with this many names
    Loaded(usize),
    /// Last load failed with this message
    Failed(String),
}

/// Lazily loaded, immutable-once-loaded list of variety names.
pub struct VarietyCatalog {
    store: Arc<dyn GraphStore>,
    names: OnceCell<Arc<Vec<String>>>,
    loading: AtomicBool,
    last_failure: Mutex<Option<String>>,
}

/// Clears the loading flag when a query finishes or is dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl VarietyCatalog {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            names: OnceCell::new(),
            loading: AtomicBool::new(false),
            last_failure: Mutex::new(None),
        }
    }

    /// Return the catalog, querying the graph store on first use.
    ///
    /// Names are deduplicated, empty names dropped, and ordered longest
    /// first (ties lexicographic) so that the first substring match is the
    /// most specific variety.
    pub async fn load(&self) -> AppResult<Arc<Vec<String>>> {
        let names = self.names.get_or_try_init(|| self.fetch()).await?;
        Ok(Arc::clone(names))
    }

    async fn fetch(&self) -> AppResult<Arc<Vec<String>>> {
        let _loading = LoadingGuard::enter(&self.loading);

        match self.store.variety_names().await {
            Ok(raw) => {
                let names = Arc::new(normalize(raw));
                tracing::info!(
                    "Loaded {} variety names from {}",
                    names.len(),
                    self.store.backend_name()
                );
                self.record_failure(None);
                Ok(names)
            }
            Err(e) => {
                tracing::warn!("Variety catalog load failed: {}", e);
                self.record_failure(Some(e.to_string()));
                Err(AppError::UpstreamUnavailable(format!(
                    "Failed to load variety catalog: {}",
                    e
                )))
            }
        }
    }

    fn record_failure(&self, failure: Option<String>) {
        if let Ok(mut last) = self.last_failure.lock() {
            *last = failure;
        }
    }

    /// Current lifecycle state. Never blocks; a loaded catalog always
    /// reports `Loaded`.
    pub fn state(&self) -> CatalogState {
        if let Some(names) = self.names.get() {
            return CatalogState::Loaded(names.len());
        }
        if self.loading.load(Ordering::SeqCst) {
            return CatalogState::Loading;
        }

        match self.last_failure.lock().ok().and_then(|last| last.clone()) {
            Some(message) => CatalogState::Failed(message),
            None => CatalogState::Uninitialized,
        }
    }

    /// Cached names, without touching the graph store.
    pub fn cached(&self) -> Option<Arc<Vec<String>>> {
        self.names.get().cloned()
    }
}

fn normalize(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names: Vec<String> = raw
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    names.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    names
}
