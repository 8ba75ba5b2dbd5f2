//! Per-mode result assembly.

use super::QuireCore;
use crate::hierarchy::{Snapshot, flatten};
use crate::query::{QueryInput, keywords, resolve_path};
use crate::results::{ResultCreator, icons};
use crate::search::FuzzyTerm;
use crate::utils::{last_edited_label, now_millis};
use quire_types::{Item, ItemVariant, ResultRecord};
use tracing::{debug, warn};

impl QuireCore {
    /// Visibility policy, applied before scoring and sorting.
    pub(super) fn visible(&self, item: &Item) -> bool {
        if item.in_recycle_bin && !self.settings.show_recycle_bins {
            return false;
        }
        match item.variant {
            ItemVariant::Section {
                encrypted: true, ..
            } => self.settings.show_encrypted_sections,
            _ => true,
        }
    }

    /// Default mode: the store's own page-title index, unscoped.
    pub(super) fn default_search(
        &self,
        creator: &ResultCreator<'_>,
        search: &str,
    ) -> Vec<ResultRecord> {
        if !search.chars().next().is_some_and(char::is_alphanumeric) {
            return ResultCreator::invalid_query();
        }

        let pages = match self.store.find_pages(search, None) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("page index lookup failed: {e}");
                return ResultCreator::store_unavailable();
            }
        };

        let mut term = FuzzyTerm::new(search);
        let results: Vec<ResultRecord> = pages
            .iter()
            .filter(|page| self.visible(page))
            .map(|page| creator.page_result(page, Some(&mut term)))
            .collect();

        if results.is_empty() {
            ResultCreator::no_matches()
        } else {
            results
        }
    }

    /// Title search: recursive traversal over every item type in the
    /// collection, unlike the default mode's page-only index.
    pub(super) fn title_search(
        &self,
        creator: &ResultCreator<'_>,
        residual: &str,
        collection: &[Item],
        parent: Option<&Item>,
    ) -> Vec<ResultRecord> {
        if residual.len() == keywords::TITLE_SEARCH.len() && parent.is_none() {
            return ResultCreator::single("Now searching by title.", None, icons::SEARCH);
        }

        let mut term = FuzzyTerm::new(&residual[keywords::TITLE_SEARCH.len()..]);

        let mut matched: Vec<(&Item, crate::search::FuzzyMatch)> = flatten(collection)
            .into_iter()
            .filter(|item| self.visible(item))
            .filter_map(|item| term.try_match(&item.name).map(|m| (item, m)))
            .collect();

        // Stable sort keeps traversal order as the tie-break
        matched.sort_by(|a, b| b.1.score.cmp(&a.1.score));

        let results: Vec<ResultRecord> = matched
            .into_iter()
            .map(|(item, m)| creator.item_result(item, false, m.indices, i64::from(m.score)))
            .collect();

        if results.is_empty() {
            ResultCreator::no_matches()
        } else {
            results
        }
    }

    /// Scoped search: pages only, within the resolved parent's subtree.
    pub(super) fn scoped_search(
        &self,
        creator: &ResultCreator<'_>,
        residual: &str,
        parent: &Item,
    ) -> Vec<ResultRecord> {
        if residual.len() == keywords::SCOPED_SEARCH.len() {
            return ResultCreator::no_matches();
        }

        let current = &residual[keywords::SCOPED_SEARCH.len()..];
        if !current.chars().next().is_some_and(char::is_alphanumeric) {
            return ResultCreator::invalid_query();
        }

        let pages = match self.store.find_pages(current, Some(&parent.id)) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("scoped page lookup failed: {e}");
                return ResultCreator::store_unavailable();
            }
        };

        let mut term = FuzzyTerm::new(current);
        let results: Vec<ResultRecord> = pages
            .iter()
            .filter(|page| self.visible(page))
            .map(|page| creator.page_result(page, Some(&mut term)))
            .collect();

        if results.is_empty() {
            ResultCreator::no_matches()
        } else {
            results
        }
    }

    /// Recent pages: modification order, no fuzzy scoring.
    pub(super) fn recent_pages(
        &self,
        creator: &ResultCreator<'_>,
        snapshot: &Snapshot,
        search: &str,
    ) -> Vec<ResultRecord> {
        let mut count = self.settings.recent_page_count;
        let suffix = search[keywords::RECENT_PAGES.len()..].trim();
        if let Ok(chosen) = suffix.parse::<usize>() {
            count = chosen;
        }

        let mut pages: Vec<&Item> = snapshot
            .pages()
            .into_iter()
            .filter(|page| self.visible(page))
            .collect();
        pages.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        pages.truncate(count);

        let now = now_millis();
        let results: Vec<ResultRecord> = pages
            .into_iter()
            .map(|page| {
                let mut record = creator.page_result(page, None);
                let edited = last_edited_label(now, page.last_modified);
                record.subtitle = Some(match record.subtitle.take() {
                    Some(path) if !path.is_empty() => format!("{edited}\t{path}"),
                    _ => edited,
                });
                record.icon = icons::RECENT_PAGE.to_string();
                record
            })
            .collect();

        if results.is_empty() {
            ResultCreator::no_matches()
        } else {
            results
        }
    }

    /// Explorer mode: walk the path, then list, search or synthesize against
    /// the resolved collection.
    pub(super) fn notebook_explorer(
        &self,
        creator: &ResultCreator<'_>,
        snapshot: &Snapshot,
        input: &QueryInput,
    ) -> Vec<ResultRecord> {
        let path = &input.search[keywords::NOTEBOOK_EXPLORER.len()..];
        let resolved = resolve_path(snapshot, path);
        let parent = resolved.parent;
        let residual = resolved.residual;

        debug!(
            "explorer walk: parent={:?} residual='{residual}'",
            parent.map(|p| p.name.as_str())
        );

        let mut results = if residual.trim().is_empty() {
            let listing: Vec<ResultRecord> = resolved
                .collection
                .iter()
                .filter(|item| self.visible(item))
                .map(|item| creator.item_result(item, true, Vec::new(), 0))
                .collect();

            if listing.is_empty() {
                self.empty_collection_hints(parent)
            } else {
                listing
            }
        } else if residual.starts_with(keywords::TITLE_SEARCH)
            && !parent.is_some_and(Item::is_page)
        {
            self.title_search(creator, residual, resolved.collection, parent)
        } else if let Some(p) = parent.filter(|p| {
            matches!(
                p.variant,
                ItemVariant::Notebook { .. } | ItemVariant::SectionGroup { .. }
            )
        }) && residual.starts_with(keywords::SCOPED_SEARCH)
        {
            self.scoped_search(creator, residual, p)
        } else {
            self.explorer_child_search(creator, &resolved, residual)
        };

        if let Some(parent) = parent {
            results.push(self.open_parent_affordance(creator, parent, residual));
        }

        if results.is_empty() {
            return ResultCreator::no_matches();
        }
        results
    }

    /// Fuzzy search over direct children only; creation candidates when
    /// nothing survives.
    fn explorer_child_search(
        &self,
        creator: &ResultCreator<'_>,
        resolved: &crate::query::ResolvedPath<'_, '_>,
        residual: &str,
    ) -> Vec<ResultRecord> {
        let mut term = FuzzyTerm::new(residual);

        let mut matched: Vec<(&Item, crate::search::FuzzyMatch)> = resolved
            .collection
            .iter()
            .filter(|item| self.visible(item))
            .filter_map(|item| term.try_match(&item.name).map(|m| (item, m)))
            .collect();

        matched.sort_by(|a, b| b.1.score.cmp(&a.1.score));

        if matched.is_empty() {
            return self.creation_candidates(creator, resolved.parent, resolved.collection, residual);
        }

        matched
            .into_iter()
            .map(|(item, m)| creator.item_result(item, true, m.indices, i64::from(m.score)))
            .collect()
    }

    /// The trailing "open the resolved parent directly" row. Always last,
    /// regardless of score.
    fn open_parent_affordance(
        &self,
        creator: &ResultCreator<'_>,
        parent: &Item,
        residual: &str,
    ) -> ResultRecord {
        let mut record = creator.item_result(parent, false, Vec::new(), 4000);
        record.title = format!("Open \"{}\"", parent.name);
        record.subtitle = Some(if residual.starts_with(keywords::TITLE_SEARCH) {
            format!("Now searching by title in \"{}\"", parent.name)
        } else if residual.starts_with(keywords::SCOPED_SEARCH) {
            format!("Now searching all pages in \"{}\"", parent.name)
        } else {
            format!(
                "Use '{}' to search all pages in this item. Use '{}' to search by title in this item",
                keywords::SCOPED_SEARCH,
                keywords::TITLE_SEARCH
            )
        });
        record
    }
}
