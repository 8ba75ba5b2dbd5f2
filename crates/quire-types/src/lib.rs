//! Shared types for Quire components.
//!
//! This crate provides the workspace item model and result record types used
//! across quire-core and its front-ends. All types are serializable so hosts
//! can consume results over any transport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque item identifier assigned by the external store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Variant-specific data for a workspace item.
///
/// Every per-variant rule in the engine (visibility, creation eligibility,
/// tooltips) matches exhaustively on this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ItemVariant {
    Notebook {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    SectionGroup {
        /// Recycle bins are ordinary section groups carrying this marker.
        #[serde(default, skip_serializing_if = "is_false")]
        is_recycle_bin: bool,
    },
    Section {
        #[serde(default, skip_serializing_if = "is_false")]
        encrypted: bool,
        /// Only meaningful when `encrypted` is set.
        #[serde(default, skip_serializing_if = "is_false")]
        locked: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Page {
        /// Creation timestamp in epoch milliseconds.
        created: u64,
    },
}

impl ItemVariant {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Notebook { .. } => ItemKind::Notebook,
            Self::SectionGroup { .. } => ItemKind::SectionGroup,
            Self::Section { .. } => ItemKind::Section,
            Self::Page { .. } => ItemKind::Page,
        }
    }
}

/// Fieldless mirror of [`ItemVariant`] for naming rules and icon lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Notebook,
    SectionGroup,
    Section,
    Page,
}

impl ItemKind {
    /// Human-readable label used in result titles and subtitles.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Notebook => "notebook",
            Self::SectionGroup => "section group",
            Self::Section => "section",
            Self::Page => "page",
        }
    }
}

/// A node in the workspace tree.
///
/// The tree is a forest of notebooks; pages are always leaves. Items are
/// fetched fresh from the store for each query and are read-only within a
/// single resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,

    pub name: String,

    /// Ancestor names joined by the store's internal separator, notebook down
    /// to this item. Stamped by the snapshot builder, never persisted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub relative_path: String,

    /// Last modification timestamp in epoch milliseconds.
    pub last_modified: u64,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_unread: bool,

    /// True for recycle bins and everything beneath them.
    /// Stamped by the snapshot builder.
    #[serde(default, skip_serializing_if = "is_false")]
    pub in_recycle_bin: bool,

    #[serde(flatten)]
    pub variant: ItemVariant,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
}

impl Item {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.variant.kind()
    }

    #[must_use]
    pub fn is_page(&self) -> bool {
        matches!(self.variant, ItemVariant::Page { .. })
    }

    /// Whether this section group is itself a recycle bin.
    #[must_use]
    pub fn is_recycle_bin(&self) -> bool {
        matches!(
            self.variant,
            ItemVariant::SectionGroup {
                is_recycle_bin: true
            }
        )
    }
}

/// Classification of a result record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Backed by an existing item.
    #[default]
    Match,
    /// Synthetic row representing a possible creation action.
    CreateNew,
    /// Informational row (no matches, invalid query, hints).
    Informational,
}

/// Action token attached to a result record, understood by the host and the
/// external store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ResultAction {
    Open {
        item: ItemId,
    },
    OpenAndSync {
        item: ItemId,
    },
    /// Replace the host's query input with the given text.
    NavigateQuery {
        query: String,
    },
    CreateNotebook {
        name: String,
    },
    CreateSection {
        parent: ItemId,
        name: String,
    },
    CreateSectionGroup {
        parent: ItemId,
        name: String,
    },
    CreatePage {
        section: ItemId,
        name: String,
    },
    CreateQuickNote,
    SyncAll,
    /// Informational rows and refused creations.
    #[default]
    None,
}

impl ResultAction {
    /// Whether invoking this action changes store state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::OpenAndSync { .. }
                | Self::CreateNotebook { .. }
                | Self::CreateSection { .. }
                | Self::CreateSectionGroup { .. }
                | Self::CreatePage { .. }
                | Self::CreateQuickNote
                | Self::SyncAll
        )
    }
}

/// A single row in the resolved result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    /// Character indices into `title` that matched the search term.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<u32>,

    #[serde(default)]
    pub score: i64,

    #[serde(default, rename = "type")]
    pub kind: ResultKind,

    /// Icon key resolved by an external icon provider.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    /// None for synthetic and informational rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,

    /// Query text the host should place in the input when the row is
    /// completed rather than invoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,

    #[serde(default)]
    pub action: ResultAction,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by serde
fn is_false(value: &bool) -> bool {
    !*value
}
