pub(crate) mod cache;
pub(crate) mod lifecycle;

mod create;
mod modes;

use crate::config::Settings;
use crate::error::Error;
use crate::hierarchy::NoteStore;
use crate::query::{Mode, QueryInput, keywords};
use crate::results::{ResultCreator, icons};
use crate::Result;
use cache::QueryCache;
use lifecycle::StoreLifecycle;
use quire_types::{ResultAction, ResultKind, ResultRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scores pinning the order of the static empty-query menu.
const SCORE_SEARCH_HINT: i64 = 5000;
const SCORE_EXPLORER_HINT: i64 = 2000;
const SCORE_RECENT_HINT: i64 = -1000;
const SCORE_QUICK_NOTE: i64 = -4000;

/// The query resolution engine.
///
/// Owns the store seam, the handle lifecycle and the result cache. Resolution
/// itself is synchronous per query; the async surface exists only for cache
/// coalescing and the idle-release timer.
pub struct QuireCore {
    settings: Settings,
    store: Arc<dyn NoteStore>,
    lifecycle: StoreLifecycle,
    cache: QueryCache,
    action_keyword: String,
    available: bool,
}

impl QuireCore {
    /// Create the engine, probing the store once.
    ///
    /// A failed probe pins the engine in unavailable mode: every query
    /// reports the store as missing until the process restarts.
    pub fn new(
        store: Arc<dyn NoteStore>,
        settings: Settings,
        action_keyword: impl Into<String>,
    ) -> Self {
        let available = match store.attach() {
            Ok(()) => {
                store.release();
                true
            }
            Err(e) => {
                warn!("note store unavailable at startup: {e}");
                false
            }
        };

        info!("quire core initialized (store available: {available})");

        Self {
            lifecycle: StoreLifecycle::new(settings.idle_timeout()),
            cache: QueryCache::new(settings.cache_ttl()),
            settings,
            store,
            action_keyword: action_keyword.into(),
            available,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Resolve a query into ranked result records.
    ///
    /// Safe to call twice for the same keystroke: the only side effect is
    /// cache population, and concurrent calls for the same search string
    /// resolve once.
    pub async fn query(&self, input: &QueryInput) -> Vec<ResultRecord> {
        if !self.available {
            return ResultCreator::store_unavailable();
        }

        if input.search.trim().is_empty() {
            return self.empty_query(input);
        }

        if let Err(e) = self.lifecycle.touch(&self.store) {
            warn!("failed to attach store handle: {e}");
            return ResultCreator::store_unavailable();
        }

        self.cache
            .get_or_compute(&input.search, || self.resolve(input))
            .await
    }

    fn resolve(&self, input: &QueryInput) -> Vec<ResultRecord> {
        let creator = ResultCreator::new(&self.settings, &self.action_keyword);

        let snapshot = match self.store.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("snapshot fetch failed: {e}");
                return ResultCreator::store_unavailable();
            }
        };

        let mode = Mode::classify(&input.search);
        debug!("resolving '{}' as {mode:?}", input.search);

        match mode {
            Mode::RecentPages => self.recent_pages(&creator, &snapshot, &input.search),
            Mode::NotebookExplorer => self.notebook_explorer(&creator, &snapshot, input),
            Mode::TitleSearch => self.title_search(
                &creator,
                &input.joined_terms(),
                snapshot.notebooks(),
                None,
            ),
            Mode::Default => self.default_search(&creator, &input.search),
        }
    }

    /// The static menu for an empty search.
    #[must_use]
    pub fn empty_query(&self, input: &QueryInput) -> Vec<ResultRecord> {
        if input.is_global && !input.uses_action_keyword {
            return Vec::new();
        }

        let keyword = &self.action_keyword;
        vec![
            ResultRecord {
                title: "Search pages".to_string(),
                score: SCORE_SEARCH_HINT,
                kind: ResultKind::Informational,
                icon: icons::LOGO.to_string(),
                ..Default::default()
            },
            ResultRecord {
                title: "View notebook explorer".to_string(),
                subtitle: Some(format!(
                    "Type \"{}\" or select this option to search by notebook structure",
                    keywords::NOTEBOOK_EXPLORER
                )),
                score: SCORE_EXPLORER_HINT,
                kind: ResultKind::Informational,
                icon: icons::NOTEBOOK.to_string(),
                autocomplete: Some(format!("{keyword} {}", keywords::NOTEBOOK_EXPLORER)),
                action: ResultAction::NavigateQuery {
                    query: format!("{keyword} {}", keywords::NOTEBOOK_EXPLORER),
                },
                ..Default::default()
            },
            ResultRecord {
                title: "See recent pages".to_string(),
                subtitle: Some(format!(
                    "Type \"{}\" or select this option to see recently modified pages",
                    keywords::RECENT_PAGES
                )),
                score: SCORE_RECENT_HINT,
                kind: ResultKind::Informational,
                icon: icons::RECENT.to_string(),
                autocomplete: Some(format!("{keyword} {}", keywords::RECENT_PAGES)),
                action: ResultAction::NavigateQuery {
                    query: format!("{keyword} {}", keywords::RECENT_PAGES),
                },
                ..Default::default()
            },
            ResultRecord {
                title: "New quick note".to_string(),
                score: SCORE_QUICK_NOTE,
                kind: ResultKind::CreateNew,
                icon: icons::NEW_PAGE.to_string(),
                action: ResultAction::CreateQuickNote,
                ..Default::default()
            },
            ResultRecord {
                title: "Open and sync notebooks".to_string(),
                score: i64::MIN,
                kind: ResultKind::Informational,
                icon: icons::SYNC.to_string(),
                action: ResultAction::SyncAll,
                ..Default::default()
            },
        ]
    }

    /// Execute a result action against the store.
    ///
    /// Stale references (the item was deleted between snapshot and
    /// invocation) are swallowed as no-ops. Mutating actions drop the query
    /// cache; dismissal-style actions schedule an asynchronous handle
    /// release.
    ///
    /// # Errors
    ///
    /// Returns the store's error for failures other than stale references.
    pub async fn invoke(&self, action: &ResultAction) -> Result<()> {
        let outcome = match action {
            ResultAction::NavigateQuery { .. } | ResultAction::None => return Ok(()),
            ResultAction::Open { item } => self.store.open_item(item),
            ResultAction::OpenAndSync { item } => self
                .store
                .sync_item(item)
                .and_then(|()| self.store.open_item(item)),
            ResultAction::CreateNotebook { name } => self.store.create_notebook(name),
            ResultAction::CreateSection { parent, name } => {
                self.store.create_section(parent, name)
            }
            ResultAction::CreateSectionGroup { parent, name } => {
                self.store.create_section_group(parent, name)
            }
            ResultAction::CreatePage { section, name } => self.store.create_page(section, name),
            ResultAction::CreateQuickNote => self.store.create_quick_note(),
            ResultAction::SyncAll => self
                .store
                .sync_all()
                .and_then(|()| self.open_most_recent_page()),
        };

        let outcome = match outcome {
            Err(Error::ItemNotFound(id)) => {
                debug!("ignoring action on stale item {id}");
                Ok(())
            }
            other => other,
        };

        if outcome.is_ok() {
            if action.is_mutating() {
                self.cache.clear();
            }
            // The host closes its window after these, so the handle goes idle
            self.lifecycle.release_soon(&self.store);
        }

        outcome
    }

    fn open_most_recent_page(&self) -> Result<()> {
        let snapshot = self.store.snapshot()?;
        if let Some(page) = snapshot
            .pages()
            .into_iter()
            .filter(|page| !page.in_recycle_bin)
            .max_by_key(|page| page.last_modified)
        {
            self.store.open_item(&page.id)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn is_attached(&self) -> bool {
        self.lifecycle.is_attached()
    }

    #[cfg(test)]
    pub(crate) fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}
