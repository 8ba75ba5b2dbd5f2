//! File-backed note store.
//!
//! Implements the engine's store seam over a JSON workspace document.
//! Creations rewrite the file, so they become visible to the next snapshot,
//! never the current one.

use quire_core::hierarchy::Snapshot;
use quire_core::search::FuzzyTerm;
use quire_core::{Error, NoteStore};
use quire_types::{Item, ItemId, ItemVariant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDoc {
    #[serde(default)]
    pub notebooks: Vec<Item>,
}

pub struct FileStore {
    path: PathBuf,
    doc: Mutex<WorkspaceDoc>,
}

impl FileStore {
    /// Load a workspace document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid JSON.
    pub fn load(path: &Path) -> quire_core::Result<Self> {
        if !path.exists() {
            return Err(Error::Store(format!(
                "workspace document not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let doc: WorkspaceDoc = serde_json::from_str(&content)?;
        debug!(
            "loaded workspace with {} notebooks from {}",
            doc.notebooks.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            doc: Mutex::new(doc),
        })
    }

    /// Write a workspace document to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_doc(path: &Path, doc: &WorkspaceDoc) -> quire_core::Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, WorkspaceDoc> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, doc: &WorkspaceDoc) -> quire_core::Result<()> {
        Self::save_doc(&self.path, doc)
    }

    fn fresh_id(doc: &WorkspaceDoc) -> ItemId {
        let mut n = count_items(&doc.notebooks) + 1;
        while find_item(&doc.notebooks, &ItemId::new(format!("item-{n}"))).is_some() {
            n += 1;
        }
        ItemId::new(format!("item-{n}"))
    }
}

fn count_items(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| 1 + count_items(&item.children))
        .sum()
}

fn find_item<'a>(items: &'a [Item], id: &ItemId) -> Option<&'a Item> {
    for item in items {
        if &item.id == id {
            return Some(item);
        }
        if let Some(found) = find_item(&item.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_item_mut<'a>(items: &'a mut [Item], id: &ItemId) -> Option<&'a mut Item> {
    for item in items {
        if &item.id == id {
            return Some(item);
        }
        if let Some(found) = find_item_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

// u128 millis fits in u64 for realistic timestamps
#[allow(clippy::cast_possible_truncation)]
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn new_item(id: ItemId, name: &str, variant: ItemVariant) -> Item {
    Item {
        id,
        name: name.to_string(),
        relative_path: String::new(),
        last_modified: now_millis(),
        is_unread: false,
        in_recycle_bin: false,
        variant,
        children: Vec::new(),
    }
}

impl NoteStore for FileStore {
    fn attach(&self) -> quire_core::Result<()> {
        if !self.path.exists() {
            return Err(Error::Store(format!(
                "workspace document vanished: {}",
                self.path.display()
            )));
        }
        debug!("attached file store at {}", self.path.display());
        Ok(())
    }

    fn release(&self) {
        debug!("released file store handle");
    }

    fn snapshot(&self) -> quire_core::Result<Snapshot> {
        Ok(Snapshot::new(self.lock().notebooks.clone()))
    }

    fn find_pages(&self, query: &str, scope: Option<&ItemId>) -> quire_core::Result<Vec<Item>> {
        let snapshot = self.snapshot()?;

        let candidates: Vec<Item> = match scope {
            Some(id) => {
                let root = snapshot
                    .find(id)
                    .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;
                quire_core::hierarchy::flatten(&root.children)
                    .into_iter()
                    .filter(|item| item.is_page())
                    .cloned()
                    .collect()
            }
            None => snapshot.pages().into_iter().cloned().collect(),
        };

        let mut term = FuzzyTerm::new(query);
        Ok(candidates
            .into_iter()
            .filter(|page| term.try_match(&page.name).is_some())
            .collect())
    }

    fn open_item(&self, item: &ItemId) -> quire_core::Result<()> {
        let doc = self.lock();
        let found = find_item(&doc.notebooks, item)
            .ok_or_else(|| Error::ItemNotFound(item.to_string()))?;
        info!("open: {} ({})", found.name, found.id);
        Ok(())
    }

    fn sync_item(&self, item: &ItemId) -> quire_core::Result<()> {
        let doc = self.lock();
        let found = find_item(&doc.notebooks, item)
            .ok_or_else(|| Error::ItemNotFound(item.to_string()))?;
        info!("sync: {} ({})", found.name, found.id);
        Ok(())
    }

    fn sync_all(&self) -> quire_core::Result<()> {
        let doc = self.lock();
        info!("sync: all {} notebooks", doc.notebooks.len());
        Ok(())
    }

    fn create_notebook(&self, name: &str) -> quire_core::Result<()> {
        let mut doc = self.lock();
        let id = Self::fresh_id(&doc);
        info!("create notebook '{name}' ({id})");
        doc.notebooks
            .push(new_item(id, name, ItemVariant::Notebook { color: None }));
        self.persist(&doc)
    }

    fn create_section(&self, parent: &ItemId, name: &str) -> quire_core::Result<()> {
        let mut doc = self.lock();
        let id = Self::fresh_id(&doc);
        let target = find_item_mut(&mut doc.notebooks, parent)
            .ok_or_else(|| Error::ItemNotFound(parent.to_string()))?;
        info!("create section '{name}' ({id}) under {}", target.name);
        target.children.push(new_item(
            id,
            name,
            ItemVariant::Section {
                encrypted: false,
                locked: false,
                color: None,
            },
        ));
        self.persist(&doc)
    }

    fn create_section_group(&self, parent: &ItemId, name: &str) -> quire_core::Result<()> {
        let mut doc = self.lock();
        let id = Self::fresh_id(&doc);
        let target = find_item_mut(&mut doc.notebooks, parent)
            .ok_or_else(|| Error::ItemNotFound(parent.to_string()))?;
        info!("create section group '{name}' ({id}) under {}", target.name);
        target.children.push(new_item(
            id,
            name,
            ItemVariant::SectionGroup {
                is_recycle_bin: false,
            },
        ));
        self.persist(&doc)
    }

    fn create_page(&self, section: &ItemId, name: &str) -> quire_core::Result<()> {
        let mut doc = self.lock();
        let id = Self::fresh_id(&doc);
        let target = find_item_mut(&mut doc.notebooks, section)
            .ok_or_else(|| Error::ItemNotFound(section.to_string()))?;
        if !matches!(target.variant, ItemVariant::Section { .. }) {
            return Err(Error::Store(format!(
                "pages can only be created in sections, not {}",
                target.kind().label()
            )));
        }
        info!("create page '{name}' ({id}) in {}", target.name);
        target.children.push(new_item(
            id,
            name,
            ItemVariant::Page {
                created: now_millis(),
            },
        ));
        self.persist(&doc)
    }

    fn create_quick_note(&self) -> quire_core::Result<()> {
        let section = {
            let doc = self.lock();
            first_unlocked_section(&doc.notebooks).map(|s| s.id.clone())
        };
        let Some(section) = section else {
            return Err(Error::Store(
                "no unlocked section available for quick notes".to_string(),
            ));
        };
        self.create_page(&section, "Quick Note")
    }

    fn default_notebook_location(&self) -> String {
        self.path
            .parent()
            .map_or_else(|| ".".to_string(), |p| p.display().to_string())
    }
}

fn first_unlocked_section(items: &[Item]) -> Option<&Item> {
    for item in items {
        if let ItemVariant::Section { locked, .. } = item.variant
            && !locked
        {
            return Some(item);
        }
        if let Some(found) = first_unlocked_section(&item.children) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> WorkspaceDoc {
        let page = new_item(
            ItemId::from("item-3"),
            "First Page",
            ItemVariant::Page { created: 0 },
        );
        let mut section = new_item(
            ItemId::from("item-2"),
            "Inbox",
            ItemVariant::Section {
                encrypted: false,
                locked: false,
                color: None,
            },
        );
        section.children.push(page);
        let mut notebook = new_item(
            ItemId::from("item-1"),
            "Notes",
            ItemVariant::Notebook { color: None },
        );
        notebook.children.push(section);
        WorkspaceDoc {
            notebooks: vec![notebook],
        }
    }

    fn store_with_sample() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        FileStore::save_doc(&path, &sample_doc()).unwrap();
        (dir, FileStore::load(&path).unwrap())
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = FileStore::load(Path::new("/nonexistent/workspace.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip_and_snapshot() {
        let (_dir, store) = store_with_sample();
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.notebooks().len(), 1);
        let page = snapshot.find(&ItemId::from("item-3")).unwrap();
        assert_eq!(page.relative_path, "Notes\\Inbox\\First Page");
    }

    #[test]
    fn test_find_pages_scoped() {
        let (_dir, store) = store_with_sample();
        let pages = store
            .find_pages("first", Some(&ItemId::from("item-1")))
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "First Page");

        let none = store.find_pages("zzz", None).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_create_page_persists_to_disk() {
        let (_dir, store) = store_with_sample();
        store
            .create_page(&ItemId::from("item-2"), "Second Page")
            .unwrap();

        // Reload from disk: the creation must have been written through
        let reloaded = FileStore::load(&store.path).unwrap();
        let snapshot = reloaded.snapshot().unwrap();
        let pages = snapshot.pages();
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().any(|p| p.name == "Second Page"));
    }

    #[test]
    fn test_create_page_rejects_non_section_parent() {
        let (_dir, store) = store_with_sample();
        let result = store.create_page(&ItemId::from("item-1"), "Orphan");
        assert!(result.is_err());
    }

    #[test]
    fn test_stale_reference_is_item_not_found() {
        let (_dir, store) = store_with_sample();
        let result = store.open_item(&ItemId::from("item-999"));
        assert!(matches!(result, Err(Error::ItemNotFound(_))));
    }

    #[test]
    fn test_fresh_ids_do_not_collide() {
        let (_dir, store) = store_with_sample();
        store.create_notebook("Another").unwrap();
        store.create_notebook("Third").unwrap();

        let snapshot = store.snapshot().unwrap();
        let mut ids: Vec<String> = snapshot
            .items()
            .iter()
            .map(|i| i.id.to_string())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), snapshot.items().len());
    }

    #[test]
    fn test_quick_note_lands_in_first_unlocked_section() {
        let (_dir, store) = store_with_sample();
        store.create_quick_note().unwrap();

        let snapshot = store.snapshot().unwrap();
        let section = snapshot.find(&ItemId::from("item-2")).unwrap();
        assert!(section.children.iter().any(|c| c.name == "Quick Note"));
    }
}
