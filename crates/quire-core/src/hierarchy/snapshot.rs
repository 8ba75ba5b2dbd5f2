use super::RELATIVE_PATH_SEPARATOR;
use quire_types::{Item, ItemId};

/// Immutable-for-the-query view of the workspace tree.
///
/// Built once per query from the store's notebook forest. Construction stamps
/// each item's `relative_path` and `in_recycle_bin` so downstream stages never
/// need ancestor context.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    notebooks: Vec<Item>,
}

impl Snapshot {
    #[must_use]
    pub fn new(mut notebooks: Vec<Item>) -> Self {
        for notebook in &mut notebooks {
            stamp(notebook, "", false);
        }
        Self { notebooks }
    }

    /// The notebook forest. There is no single root node.
    #[must_use]
    pub fn notebooks(&self) -> &[Item] {
        &self.notebooks
    }

    /// All items in the forest, preorder. The order is the stable tie-break
    /// for equal fuzzy scores.
    #[must_use]
    pub fn items(&self) -> Vec<&Item> {
        flatten(&self.notebooks)
    }

    /// All pages in the forest, preorder.
    #[must_use]
    pub fn pages(&self) -> Vec<&Item> {
        self.items().into_iter().filter(|i| i.is_page()).collect()
    }

    /// Look an item up by id anywhere in the forest.
    #[must_use]
    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items().into_iter().find(|i| &i.id == id)
    }
}

fn stamp(item: &mut Item, parent_path: &str, parent_in_bin: bool) {
    let in_bin = parent_in_bin || item.is_recycle_bin();
    item.in_recycle_bin = in_bin;
    item.relative_path = if parent_path.is_empty() {
        item.name.clone()
    } else {
        format!("{parent_path}{RELATIVE_PATH_SEPARATOR}{}", item.name)
    };

    let path = item.relative_path.clone();
    for child in &mut item.children {
        stamp(child, &path, in_bin);
    }
}

/// Preorder flatten of a collection and all its descendants.
#[must_use]
pub fn flatten(collection: &[Item]) -> Vec<&Item> {
    let mut items = Vec::new();
    let mut stack: Vec<&Item> = collection.iter().rev().collect();
    while let Some(item) = stack.pop() {
        items.push(item);
        for child in item.children.iter().rev() {
            stack.push(child);
        }
    }
    items
}

/// Find a direct child by exact (ordinal, case-sensitive) name equality.
#[must_use]
pub fn child_by_name<'a>(collection: &'a [Item], name: &str) -> Option<&'a Item> {
    collection.iter().find(|item| item.name == name)
}
