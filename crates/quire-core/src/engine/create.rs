//! Synthetic "create new item" candidates.

use super::QuireCore;
use crate::results::{ResultCreator, icons};
use quire_types::{Item, ItemVariant, ResultKind, ResultRecord};

impl QuireCore {
    /// Synthesize creation candidates for a residual that matched nothing.
    ///
    /// What can be created depends on the resolved parent's variant. All
    /// candidates are suppressed when a direct child already carries the
    /// trimmed residual as its exact name, or when the parent sits inside a
    /// recycle bin.
    pub(super) fn creation_candidates(
        &self,
        creator: &ResultCreator<'_>,
        parent: Option<&Item>,
        collection: &[Item],
        residual: &str,
    ) -> Vec<ResultRecord> {
        let name = residual.trim();

        // Exact match always wins over offering creation
        if collection.iter().any(|child| child.name == name) {
            return Vec::new();
        }

        if parent.is_some_and(|p| p.in_recycle_bin) {
            return Vec::new();
        }

        let store = self.store.as_ref();
        match parent {
            None => vec![creator.new_notebook_result(store, name)],
            Some(p) => match &p.variant {
                ItemVariant::Notebook { .. } | ItemVariant::SectionGroup { .. } => vec![
                    creator.new_section_result(store, p, name),
                    creator.new_section_group_result(store, p, name),
                ],
                ItemVariant::Section { locked, .. } => {
                    if *locked {
                        Vec::new()
                    } else {
                        vec![creator.new_page_result(store, p, name)]
                    }
                }
                ItemVariant::Page { .. } => Vec::new(),
            },
        }
    }

    /// Hint rows shown when an explorer listing has nothing to show.
    pub(super) fn empty_collection_hints(&self, parent: Option<&Item>) -> Vec<ResultRecord> {
        let Some(parent) = parent else {
            return Vec::new();
        };

        match &parent.variant {
            ItemVariant::Notebook { .. } | ItemVariant::SectionGroup { .. } => vec![
                hint("section", icons::NEW_SECTION, Some("(unencrypted) section")),
                hint("section group", icons::NEW_SECTION_GROUP, None),
            ],
            ItemVariant::Section { locked, .. } => {
                if *locked {
                    Vec::new()
                } else {
                    vec![hint("page", icons::NEW_PAGE, None)]
                }
            }
            ItemVariant::Page { .. } => Vec::new(),
        }
    }
}

fn hint(label: &str, icon: &str, plural_label: Option<&str>) -> ResultRecord {
    ResultRecord {
        title: format!("Create {label}: \"\""),
        subtitle: Some(format!(
            "No {}s found. Type a valid title to create one",
            plural_label.unwrap_or(label)
        )),
        kind: ResultKind::Informational,
        icon: icon.to_string(),
        ..Default::default()
    }
}
