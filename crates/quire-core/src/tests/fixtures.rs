//! Test fixtures and helpers

use crate::config::Settings;
use crate::engine::QuireCore;
use crate::error::Error;
use crate::hierarchy::{NoteStore, Snapshot, flatten};
use crate::query::QueryInput;
use crate::search::FuzzyTerm;
use quire_types::{Item, ItemId, ItemVariant};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ACTION_KEYWORD: &str = "qn";

pub fn item(id: &str, name: &str, variant: ItemVariant, children: Vec<Item>) -> Item {
    Item {
        id: ItemId::from(id),
        name: name.to_string(),
        relative_path: String::new(),
        last_modified: 0,
        is_unread: false,
        in_recycle_bin: false,
        variant,
        children,
    }
}

pub fn page(id: &str, name: &str, last_modified: u64) -> Item {
    let mut page = item(
        id,
        name,
        ItemVariant::Page {
            created: last_modified.saturating_sub(1000),
        },
        Vec::new(),
    );
    page.last_modified = last_modified;
    page
}

pub fn section(id: &str, name: &str, children: Vec<Item>) -> Item {
    item(
        id,
        name,
        ItemVariant::Section {
            encrypted: false,
            locked: false,
            color: None,
        },
        children,
    )
}

pub fn locked_section(id: &str, name: &str) -> Item {
    item(
        id,
        name,
        ItemVariant::Section {
            encrypted: true,
            locked: true,
            color: None,
        },
        Vec::new(),
    )
}

pub fn section_group(id: &str, name: &str, children: Vec<Item>) -> Item {
    item(
        id,
        name,
        ItemVariant::SectionGroup {
            is_recycle_bin: false,
        },
        children,
    )
}

pub fn recycle_bin(id: &str, children: Vec<Item>) -> Item {
    item(
        id,
        "Recycle Bin",
        ItemVariant::SectionGroup {
            is_recycle_bin: true,
        },
        children,
    )
}

pub fn notebook(id: &str, name: &str, children: Vec<Item>) -> Item {
    item(id, name, ItemVariant::Notebook { color: None }, children)
}

/// Two notebooks, a nested section group, an encrypted locked section, an
/// unread page and a recycle bin holding the most recently modified page.
pub fn sample_forest() -> Vec<Item> {
    let mut day_one = page("p-day-one", "Day One", 8_000);
    day_one.is_unread = true;

    vec![
        notebook(
            "nb-a",
            "A",
            vec![section_group(
                "sg-b",
                "B",
                vec![section(
                    "s-c",
                    "C",
                    vec![
                        page("p-meeting", "Meeting Notes", 3_000),
                        page("p-grocery", "Grocery List", 2_000),
                    ],
                )],
            )],
        ),
        notebook(
            "nb-personal",
            "Personal",
            vec![
                section("s-journal", "Journal", vec![day_one]),
                locked_section("s-secrets", "Secrets"),
                recycle_bin(
                    "sg-bin",
                    vec![section(
                        "s-deleted",
                        "Deleted Stuff",
                        vec![page("p-old", "Old Note", 10_000)],
                    )],
                ),
            ],
        ),
    ]
}

/// Instrumented in-memory store over the sample forest.
pub struct MockStore {
    forest: Vec<Item>,
    fail_attach: bool,
    missing_ids: Vec<String>,
    pub attach_count: AtomicUsize,
    pub release_count: AtomicUsize,
    pub snapshot_count: AtomicUsize,
    pub opened: Mutex<Vec<String>>,
    pub synced: Mutex<Vec<String>>,
    pub created: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::with_forest(sample_forest())
    }

    pub fn with_forest(forest: Vec<Item>) -> Self {
        Self {
            forest,
            fail_attach: false,
            missing_ids: Vec::new(),
            attach_count: AtomicUsize::new(0),
            release_count: AtomicUsize::new(0),
            snapshot_count: AtomicUsize::new(0),
            opened: Mutex::new(Vec::new()),
            synced: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        let mut store = Self::new();
        store.fail_attach = true;
        store
    }

    pub fn with_missing(ids: &[&str]) -> Self {
        let mut store = Self::new();
        store.missing_ids = ids.iter().map(ToString::to_string).collect();
        store
    }

    pub fn attaches(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.release_count.load(Ordering::SeqCst)
    }

    pub fn snapshots(&self) -> usize {
        self.snapshot_count.load(Ordering::SeqCst)
    }

    fn check_missing(&self, item: &ItemId) -> crate::Result<()> {
        if self.missing_ids.iter().any(|id| id == item.as_str()) {
            return Err(Error::ItemNotFound(item.to_string()));
        }
        Ok(())
    }
}

impl NoteStore for MockStore {
    fn attach(&self) -> crate::Result<()> {
        if self.fail_attach {
            return Err(Error::Store("mock store offline".to_string()));
        }
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) {
        self.release_count.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> crate::Result<Snapshot> {
        self.snapshot_count.fetch_add(1, Ordering::SeqCst);
        Ok(Snapshot::new(self.forest.clone()))
    }

    fn find_pages(&self, query: &str, scope: Option<&ItemId>) -> crate::Result<Vec<Item>> {
        let snapshot = Snapshot::new(self.forest.clone());
        let pages: Vec<Item> = match scope {
            Some(id) => {
                let root = snapshot
                    .find(id)
                    .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;
                flatten(&root.children)
                    .into_iter()
                    .filter(|i| i.is_page())
                    .cloned()
                    .collect()
            }
            None => snapshot.pages().into_iter().cloned().collect(),
        };

        let mut term = FuzzyTerm::new(query);
        Ok(pages
            .into_iter()
            .filter(|p| term.try_match(&p.name).is_some())
            .collect())
    }

    fn open_item(&self, item: &ItemId) -> crate::Result<()> {
        self.check_missing(item)?;
        self.opened.lock().unwrap().push(item.to_string());
        Ok(())
    }

    fn sync_item(&self, item: &ItemId) -> crate::Result<()> {
        self.check_missing(item)?;
        self.synced.lock().unwrap().push(item.to_string());
        Ok(())
    }

    fn sync_all(&self) -> crate::Result<()> {
        self.synced.lock().unwrap().push("*".to_string());
        Ok(())
    }

    fn create_notebook(&self, name: &str) -> crate::Result<()> {
        self.created.lock().unwrap().push(format!("notebook:{name}"));
        Ok(())
    }

    fn create_section(&self, parent: &ItemId, name: &str) -> crate::Result<()> {
        self.check_missing(parent)?;
        self.created
            .lock()
            .unwrap()
            .push(format!("section:{parent}:{name}"));
        Ok(())
    }

    fn create_section_group(&self, parent: &ItemId, name: &str) -> crate::Result<()> {
        self.check_missing(parent)?;
        self.created
            .lock()
            .unwrap()
            .push(format!("section_group:{parent}:{name}"));
        Ok(())
    }

    fn create_page(&self, section: &ItemId, name: &str) -> crate::Result<()> {
        self.check_missing(section)?;
        self.created
            .lock()
            .unwrap()
            .push(format!("page:{section}:{name}"));
        Ok(())
    }

    fn create_quick_note(&self) -> crate::Result<()> {
        self.created.lock().unwrap().push("quick_note".to_string());
        Ok(())
    }

    fn default_notebook_location(&self) -> String {
        "/home/user/Notebooks".to_string()
    }
}

/// Engine over a fresh mock store; the store handle allows inspecting calls.
pub fn engine() -> (QuireCore, Arc<MockStore>) {
    engine_with(Settings::default(), MockStore::new())
}

pub fn engine_with(settings: Settings, store: MockStore) -> (QuireCore, Arc<MockStore>) {
    let store = Arc::new(store);
    let core = QuireCore::new(store.clone(), settings, ACTION_KEYWORD);
    (core, store)
}

/// Query input as the host would hand it over: keyword plus search text.
pub fn input(search: &str) -> QueryInput {
    let raw = if search.is_empty() {
        ACTION_KEYWORD.to_string()
    } else {
        format!("{ACTION_KEYWORD} {search}")
    };
    QueryInput::from_raw(&raw, ACTION_KEYWORD, false)
}
