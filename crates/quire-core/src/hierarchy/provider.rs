use super::Snapshot;
use crate::Result;
use quire_types::{Item, ItemId, ItemKind};

/// Characters the store rejects in notebook names.
pub const INVALID_NOTEBOOK_CHARS: &str = "\\/*?\"|<>:%#.";

/// Characters the store rejects in section and section group names.
pub const INVALID_SECTION_CHARS: &str = "\\/*?\"|<>:%#&";

/// Seam to the external note store.
///
/// The engine never owns or mutates the item tree: it fetches a snapshot per
/// query and issues commands through this trait. Implementations hold the
/// actual automation handle; `attach`/`release` bracket its lifetime.
pub trait NoteStore: Send + Sync {
    /// Acquire the underlying store handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached. The engine surfaces
    /// this as an "unavailable" informational result.
    fn attach(&self) -> Result<()>;

    /// Release the underlying store handle. Idempotent.
    fn release(&self);

    /// Enumerate the notebook forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn snapshot(&self) -> Result<Snapshot>;

    /// The store's own fuzzy page-title index, optionally scoped to the
    /// subtree rooted at `scope`. Returned items carry stamped paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_pages(&self, query: &str, scope: Option<&ItemId>) -> Result<Vec<Item>>;

    /// Open an item in the host application.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ItemNotFound`] for stale references; the
    /// engine swallows those.
    fn open_item(&self, item: &ItemId) -> Result<()>;

    /// Sync a single item with its backing storage.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ItemNotFound`] for stale references.
    fn sync_item(&self, item: &ItemId) -> Result<()>;

    /// Sync every notebook.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn sync_all(&self) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the store rejects the creation.
    fn create_notebook(&self, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the store rejects the creation or `parent` is
    /// stale.
    fn create_section(&self, parent: &ItemId, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the store rejects the creation or `parent` is
    /// stale.
    fn create_section_group(&self, parent: &ItemId, name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the store rejects the creation or `section` is
    /// stale.
    fn create_page(&self, section: &ItemId, name: &str) -> Result<()>;

    /// Create an unfiled quick note page.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn create_quick_note(&self) -> Result<()>;

    /// Whether `name` is acceptable for a new item of `kind`.
    fn is_name_valid(&self, kind: ItemKind, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        !name
            .chars()
            .any(|c| self.invalid_name_chars(kind).contains(c))
    }

    /// Forbidden characters for names of `kind`, for error subtitles.
    fn invalid_name_chars(&self, kind: ItemKind) -> &'static str {
        match kind {
            ItemKind::Notebook => INVALID_NOTEBOOK_CHARS,
            ItemKind::Section | ItemKind::SectionGroup => INVALID_SECTION_CHARS,
            ItemKind::Page => "",
        }
    }

    /// Filesystem location where new notebooks are created.
    fn default_notebook_location(&self) -> String;
}
