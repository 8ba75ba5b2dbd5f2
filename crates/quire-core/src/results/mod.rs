//! Builders turning matched items and engine states into result records.

use crate::config::Settings;
use crate::hierarchy::{NoteStore, RELATIVE_PATH_SEPARATOR};
use crate::query::keywords;
use crate::search::FuzzyTerm;
use crate::utils::date_string_from_millis;
use quire_types::{Item, ItemKind, ItemVariant, ResultAction, ResultKind, ResultRecord};

/// Icon keys handed to the host's icon provider.
pub(crate) mod icons {
    pub const LOGO: &str = "logo";
    pub const WARNING: &str = "warning";
    pub const SEARCH: &str = "search";
    pub const SYNC: &str = "sync";
    pub const RECENT: &str = "recent";
    pub const RECENT_PAGE: &str = "recent_page";
    pub const NOTEBOOK: &str = "notebook";
    pub const SECTION: &str = "section";
    pub const SECTION_GROUP: &str = "section_group";
    pub const PAGE: &str = "page";
    pub const NEW_NOTEBOOK: &str = "new_notebook";
    pub const NEW_SECTION: &str = "new_section";
    pub const NEW_SECTION_GROUP: &str = "new_section_group";
    pub const NEW_PAGE: &str = "new_page";
}

/// Separator used when rendering paths in subtitles and tooltips.
pub(crate) const DISPLAY_PATH_SEPARATOR: &str = " > ";

/// Prefix for unread item titles. Three characters; highlight offsets shift
/// by its length.
const UNREAD_MARKER: &str = "\u{2022}  ";

pub(crate) fn item_icon(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Notebook => icons::NOTEBOOK,
        ItemKind::SectionGroup => icons::SECTION_GROUP,
        ItemKind::Section => icons::SECTION,
        ItemKind::Page => icons::PAGE,
    }
}

/// Builds result records in one place so titles, paths and actions stay
/// consistent across modes.
pub(crate) struct ResultCreator<'a> {
    settings: &'a Settings,
    action_keyword: &'a str,
}

impl<'a> ResultCreator<'a> {
    pub fn new(settings: &'a Settings, action_keyword: &'a str) -> Self {
        Self {
            settings,
            action_keyword,
        }
    }

    /// The item's path with the store separator replaced for display.
    pub fn nice_path(item: &Item) -> String {
        item.relative_path
            .replace(RELATIVE_PATH_SEPARATOR, DISPLAY_PATH_SEPARATOR)
    }

    /// Query text that re-enters explorer mode at this item.
    pub fn autocomplete_text(&self, item: &Item) -> String {
        let keyword = if self.action_keyword.is_empty() {
            String::new()
        } else {
            format!("{} ", self.action_keyword)
        };
        let mut text = format!(
            "{keyword}{}{}",
            keywords::NOTEBOOK_EXPLORER,
            item.relative_path
        );
        if !item.is_page() {
            text.push(keywords::EXPLORER_SEPARATOR);
        }
        text
    }

    fn title(&self, item: &Item, highlight: &mut Vec<u32>) -> String {
        let mut title = item.name.clone();
        if item.is_unread && self.settings.show_unread_items {
            title.insert_str(0, UNREAD_MARKER);
            // Offsets are char indices; the marker is 3 chars
            #[allow(clippy::cast_possible_truncation)]
            let shift = UNREAD_MARKER.chars().count() as u32;
            for offset in highlight.iter_mut() {
                *offset += shift;
            }
        }
        title
    }

    /// Build a record for an existing item.
    ///
    /// `autocomplete` selects the navigational action (replace the query with
    /// this item's explorer path) instead of opening the item; pages always
    /// open directly.
    pub fn item_result(
        &self,
        item: &Item,
        autocomplete: bool,
        mut highlight: Vec<u32>,
        score: i64,
    ) -> ResultRecord {
        let mut title = self.title(item, &mut highlight);
        let nice_path = Self::nice_path(item);
        let mut subtitle = Some(nice_path.clone());
        let autocomplete_text = self.autocomplete_text(item);
        let modified = date_string_from_millis(item.last_modified);

        let autocomplete = autocomplete && !item.is_page();

        let tooltip = match &item.variant {
            ItemVariant::Notebook { .. } => {
                subtitle = None;
                format!(
                    "Last modified:\t{modified}\nSections:\t{}\nSection groups:\t{}",
                    count_kind(item, ItemKind::Section),
                    count_kind(item, ItemKind::SectionGroup),
                )
            }
            ItemVariant::SectionGroup { .. } => format!(
                "Path:\t{nice_path}\nLast modified:\t{modified}\nSections:\t{}\nSection groups:\t{}",
                count_kind(item, ItemKind::Section),
                count_kind(item, ItemKind::SectionGroup),
            ),
            ItemVariant::Section {
                encrypted, locked, ..
            } => {
                if *encrypted {
                    title.push_str(" [Encrypted]");
                    title.push_str(if *locked { "[Locked]" } else { "[Unlocked]" });
                }
                format!(
                    "Path:\t{nice_path}\nLast modified:\t{modified}\nPages:\t{}",
                    count_kind(item, ItemKind::Page),
                )
            }
            ItemVariant::Page { created } => {
                let parent_path = parent_display_path(&nice_path, &item.name);
                subtitle = Some(parent_path.to_string());
                format!(
                    "Path:\t{parent_path}\nCreated:\t{}\nLast modified:\t{modified}",
                    date_string_from_millis(*created),
                )
            }
        };

        let action = if autocomplete {
            ResultAction::NavigateQuery {
                query: autocomplete_text.clone(),
            }
        } else {
            ResultAction::OpenAndSync {
                item: item.id.clone(),
            }
        };

        ResultRecord {
            title,
            subtitle,
            tooltip: Some(tooltip),
            highlight,
            score,
            kind: ResultKind::Match,
            icon: item_icon(item.kind()).to_string(),
            item_id: Some(item.id.clone()),
            autocomplete: (!item.is_page()).then_some(autocomplete_text),
            action,
        }
    }

    /// Build a record for a page the store's own index already matched,
    /// recomputing highlight spans for the given term.
    pub fn page_result(&self, page: &Item, term: Option<&mut FuzzyTerm>) -> ResultRecord {
        let highlight = term.map_or_else(Vec::new, |t| t.highlights(&page.name));
        self.item_result(page, false, highlight, 0)
    }

    pub fn new_notebook_result(&self, store: &dyn NoteStore, name: &str) -> ResultRecord {
        let name = name.trim();
        let valid = store.is_name_valid(ItemKind::Notebook, name);

        ResultRecord {
            title: format!("Create notebook: \"{name}\""),
            subtitle: Some(if valid {
                format!("Location: {}", store.default_notebook_location())
            } else {
                forbidden_chars_subtitle(store, ItemKind::Notebook)
            }),
            kind: ResultKind::CreateNew,
            icon: icons::NEW_NOTEBOOK.to_string(),
            action: if valid {
                ResultAction::CreateNotebook {
                    name: name.to_string(),
                }
            } else {
                ResultAction::None
            },
            ..Default::default()
        }
    }

    pub fn new_section_result(
        &self,
        store: &dyn NoteStore,
        parent: &Item,
        name: &str,
    ) -> ResultRecord {
        let name = name.trim();
        let valid = store.is_name_valid(ItemKind::Section, name);

        ResultRecord {
            title: format!("Create section: \"{name}\""),
            subtitle: Some(if valid {
                creation_path_subtitle(parent, name)
            } else {
                forbidden_chars_subtitle(store, ItemKind::Section)
            }),
            kind: ResultKind::CreateNew,
            icon: icons::NEW_SECTION.to_string(),
            action: if valid {
                ResultAction::CreateSection {
                    parent: parent.id.clone(),
                    name: name.to_string(),
                }
            } else {
                ResultAction::None
            },
            ..Default::default()
        }
    }

    pub fn new_section_group_result(
        &self,
        store: &dyn NoteStore,
        parent: &Item,
        name: &str,
    ) -> ResultRecord {
        let name = name.trim();
        let valid = store.is_name_valid(ItemKind::SectionGroup, name);

        ResultRecord {
            title: format!("Create section group: \"{name}\""),
            subtitle: Some(if valid {
                creation_path_subtitle(parent, name)
            } else {
                forbidden_chars_subtitle(store, ItemKind::SectionGroup)
            }),
            kind: ResultKind::CreateNew,
            icon: icons::NEW_SECTION_GROUP.to_string(),
            action: if valid {
                ResultAction::CreateSectionGroup {
                    parent: parent.id.clone(),
                    name: name.to_string(),
                }
            } else {
                ResultAction::None
            },
            ..Default::default()
        }
    }

    pub fn new_page_result(
        &self,
        store: &dyn NoteStore,
        section: &Item,
        name: &str,
    ) -> ResultRecord {
        let name = name.trim();
        let valid = store.is_name_valid(ItemKind::Page, name);

        ResultRecord {
            title: format!("Create page: \"{name}\""),
            subtitle: Some(if valid {
                creation_path_subtitle(section, name)
            } else {
                "Type a title for the new page".to_string()
            }),
            kind: ResultKind::CreateNew,
            icon: icons::NEW_PAGE.to_string(),
            action: if valid {
                ResultAction::CreatePage {
                    section: section.id.clone(),
                    name: name.to_string(),
                }
            } else {
                ResultAction::None
            },
            ..Default::default()
        }
    }

    pub fn no_matches() -> Vec<ResultRecord> {
        Self::single(
            "No matches found",
            Some("Try searching something else, or syncing your notebooks."),
            icons::LOGO,
        )
    }

    pub fn invalid_query() -> Vec<ResultRecord> {
        Self::single(
            "Invalid query",
            Some("The first character of the search must be a letter or a digit"),
            icons::WARNING,
        )
    }

    pub fn store_unavailable() -> Vec<ResultRecord> {
        Self::single(
            "The note store is not available",
            Some("Check that the backing store is installed and reachable"),
            icons::WARNING,
        )
    }

    pub fn single(title: &str, subtitle: Option<&str>, icon: &str) -> Vec<ResultRecord> {
        vec![ResultRecord {
            title: title.to_string(),
            subtitle: subtitle.map(String::from),
            kind: ResultKind::Informational,
            icon: icon.to_string(),
            ..Default::default()
        }]
    }
}

fn count_kind(item: &Item, kind: ItemKind) -> usize {
    item.children.iter().filter(|c| c.kind() == kind).count()
}

/// A page's display path with its own name stripped off.
fn parent_display_path<'p>(nice_path: &'p str, name: &str) -> &'p str {
    nice_path
        .strip_suffix(name)
        .map_or(nice_path, |stripped| {
            stripped
                .strip_suffix(DISPLAY_PATH_SEPARATOR)
                .unwrap_or(stripped)
        })
}

fn creation_path_subtitle(parent: &Item, name: &str) -> String {
    format!(
        "Path: {}{DISPLAY_PATH_SEPARATOR}{name}",
        ResultCreator::nice_path(parent)
    )
}

fn forbidden_chars_subtitle(store: &dyn NoteStore, kind: ItemKind) -> String {
    let spaced: Vec<String> = store
        .invalid_name_chars(kind)
        .chars()
        .map(String::from)
        .collect();
    let mut label = kind.label().to_string();
    if let Some(first) = label.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    format!("{label} names cannot contain: {}", spaced.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Snapshot;
    use quire_types::ItemId;

    fn settings() -> Settings {
        Settings::default()
    }

    fn sample_snapshot() -> Snapshot {
        let page = Item {
            id: ItemId::from("p1"),
            name: "Roadmap".to_string(),
            relative_path: String::new(),
            last_modified: 1_700_000_000_000,
            is_unread: true,
            in_recycle_bin: false,
            variant: ItemVariant::Page {
                created: 1_690_000_000_000,
            },
            children: Vec::new(),
        };
        let section = Item {
            id: ItemId::from("s1"),
            name: "Planning".to_string(),
            relative_path: String::new(),
            last_modified: 1_700_000_000_000,
            is_unread: false,
            in_recycle_bin: false,
            variant: ItemVariant::Section {
                encrypted: true,
                locked: true,
                color: None,
            },
            children: vec![page],
        };
        Snapshot::new(vec![Item {
            id: ItemId::from("nb1"),
            name: "Work".to_string(),
            relative_path: String::new(),
            last_modified: 1_700_000_000_000,
            is_unread: false,
            in_recycle_bin: false,
            variant: ItemVariant::Notebook { color: None },
            children: vec![section],
        }])
    }

    struct FixedStore;

    impl NoteStore for FixedStore {
        fn attach(&self) -> crate::Result<()> {
            Ok(())
        }
        fn release(&self) {}
        fn snapshot(&self) -> crate::Result<Snapshot> {
            Ok(Snapshot::default())
        }
        fn find_pages(
            &self,
            _query: &str,
            _scope: Option<&ItemId>,
        ) -> crate::Result<Vec<Item>> {
            Ok(Vec::new())
        }
        fn open_item(&self, _item: &ItemId) -> crate::Result<()> {
            Ok(())
        }
        fn sync_item(&self, _item: &ItemId) -> crate::Result<()> {
            Ok(())
        }
        fn sync_all(&self) -> crate::Result<()> {
            Ok(())
        }
        fn create_notebook(&self, _name: &str) -> crate::Result<()> {
            Ok(())
        }
        fn create_section(&self, _parent: &ItemId, _name: &str) -> crate::Result<()> {
            Ok(())
        }
        fn create_section_group(&self, _parent: &ItemId, _name: &str) -> crate::Result<()> {
            Ok(())
        }
        fn create_page(&self, _section: &ItemId, _name: &str) -> crate::Result<()> {
            Ok(())
        }
        fn create_quick_note(&self) -> crate::Result<()> {
            Ok(())
        }
        fn default_notebook_location(&self) -> String {
            "/notes".to_string()
        }
    }

    #[test]
    fn test_nice_path_uses_display_separator() {
        let snapshot = sample_snapshot();
        let page = snapshot.find(&ItemId::from("p1")).unwrap();
        assert_eq!(
            ResultCreator::nice_path(page),
            "Work > Planning > Roadmap"
        );
    }

    #[test]
    fn test_unread_marker_shifts_highlights() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let page = snapshot.find(&ItemId::from("p1")).unwrap();

        let record = creator.item_result(page, false, vec![0, 3], 10);
        assert!(record.title.starts_with('\u{2022}'));
        assert_eq!(record.highlight, vec![3, 6]);
    }

    #[test]
    fn test_unread_marker_respects_setting() {
        let mut settings = settings();
        settings.show_unread_items = false;
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let page = snapshot.find(&ItemId::from("p1")).unwrap();

        let record = creator.item_result(page, false, vec![0], 10);
        assert_eq!(record.title, "Roadmap");
        assert_eq!(record.highlight, vec![0]);
    }

    #[test]
    fn test_page_subtitle_drops_own_name() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let page = snapshot.find(&ItemId::from("p1")).unwrap();

        let record = creator.item_result(page, false, vec![], 0);
        assert_eq!(record.subtitle.as_deref(), Some("Work > Planning"));
        assert_eq!(
            record.action,
            ResultAction::OpenAndSync {
                item: ItemId::from("p1")
            }
        );
        assert!(record.autocomplete.is_none());
    }

    #[test]
    fn test_notebook_has_no_subtitle_and_autocompletes() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let notebook = snapshot.find(&ItemId::from("nb1")).unwrap();

        let record = creator.item_result(notebook, true, vec![], 0);
        assert!(record.subtitle.is_none());
        assert_eq!(record.autocomplete.as_deref(), Some("qn nb:\\Work\\"));
        assert_eq!(
            record.action,
            ResultAction::NavigateQuery {
                query: "qn nb:\\Work\\".to_string()
            }
        );
    }

    #[test]
    fn test_encrypted_section_title_suffix() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let section = snapshot.find(&ItemId::from("s1")).unwrap();

        let record = creator.item_result(section, true, vec![], 0);
        assert_eq!(record.title, "Planning [Encrypted][Locked]");
    }

    #[test]
    fn test_new_section_result_invalid_name() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let notebook = snapshot.find(&ItemId::from("nb1")).unwrap();

        let record = creator.new_section_result(&FixedStore, notebook, "A&B");
        assert_eq!(record.kind, ResultKind::CreateNew);
        assert_eq!(record.action, ResultAction::None);
        assert!(
            record
                .subtitle
                .as_deref()
                .unwrap()
                .starts_with("Section names cannot contain:")
        );
    }

    #[test]
    fn test_new_page_result_valid() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let snapshot = sample_snapshot();
        let section = snapshot.find(&ItemId::from("s1")).unwrap();

        let record = creator.new_page_result(&FixedStore, section, "  Todo  ");
        assert_eq!(record.title, "Create page: \"Todo\"");
        assert_eq!(
            record.action,
            ResultAction::CreatePage {
                section: ItemId::from("s1"),
                name: "Todo".to_string()
            }
        );
        assert_eq!(
            record.subtitle.as_deref(),
            Some("Path: Work > Planning > Todo")
        );
    }

    #[test]
    fn test_new_notebook_result_shows_location() {
        let settings = settings();
        let creator = ResultCreator::new(&settings, "qn");
        let record = creator.new_notebook_result(&FixedStore, "Journal");
        assert_eq!(record.subtitle.as_deref(), Some("Location: /notes"));
    }

    #[test]
    fn test_informational_singles() {
        let no_matches = ResultCreator::no_matches();
        assert_eq!(no_matches.len(), 1);
        assert_eq!(no_matches[0].kind, ResultKind::Informational);
        assert_eq!(no_matches[0].title, "No matches found");

        let invalid = ResultCreator::invalid_query();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].title, "Invalid query");
        assert_ne!(invalid[0].title, no_matches[0].title);

        let unavailable = ResultCreator::store_unavailable();
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].icon, icons::WARNING);
    }
}
