mod explorer;

pub use explorer::{ResolvedPath, resolve_path};

/// Reserved keyword tokens. All prefix checks are exact, ordinal and
/// case-sensitive; the tokens are mutually exclusive by construction.
pub mod keywords {
    /// Separator between path segments in explorer queries.
    pub const EXPLORER_SEPARATOR: char = '\\';

    /// Prefix entering notebook-explorer mode.
    pub const NOTEBOOK_EXPLORER: &str = "nb:\\";

    /// Prefix entering recent-pages mode.
    pub const RECENT_PAGES: &str = "rcntpgs:";

    /// Prefix entering title-search mode.
    pub const TITLE_SEARCH: &str = "*";

    /// Prefix entering scoped-search mode (explorer residuals only).
    pub const SCOPED_SEARCH: &str = ">";
}

/// A query as handed over by the host shell.
#[derive(Debug, Clone)]
pub struct QueryInput {
    /// Full raw user text, action keyword included.
    pub raw: String,

    /// The portion after the action keyword.
    pub search: String,

    /// Whitespace-delimited terms of `search`.
    pub terms: Vec<String>,

    /// The host's action keyword for this engine (used to rebuild
    /// autocomplete query text).
    pub action_keyword: String,

    /// Whether the engine is invoked globally (without requiring the action
    /// keyword).
    pub is_global: bool,

    /// Whether the raw text actually starts with the action keyword.
    pub uses_action_keyword: bool,
}

impl QueryInput {
    /// Build a query input from raw user text.
    ///
    /// Three scenarios, matching the host contract:
    /// global on + keyword used → strip the keyword from the raw text;
    /// global on + keyword not used → the raw text is the search;
    /// global off → the host only invokes us with the keyword present.
    #[must_use]
    pub fn from_raw(raw: &str, action_keyword: &str, is_global: bool) -> Self {
        let uses_action_keyword =
            !action_keyword.is_empty() && raw.starts_with(action_keyword);

        let search = if uses_action_keyword {
            raw[action_keyword.len()..].trim_start().to_string()
        } else {
            raw.trim_start().to_string()
        };

        let terms = search.split_whitespace().map(String::from).collect();

        Self {
            raw: raw.to_string(),
            search,
            terms,
            action_keyword: action_keyword.to_string(),
            is_global,
            uses_action_keyword,
        }
    }

    /// Whitespace-joined terms, as used by top-level title search.
    #[must_use]
    pub fn joined_terms(&self) -> String {
        self.terms.join(" ")
    }
}

/// Search mode, classified from the normalized query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    RecentPages,
    NotebookExplorer,
    TitleSearch,
    Default,
}

impl Mode {
    /// Classify a search string by reserved prefix, in fixed priority order.
    #[must_use]
    pub fn classify(search: &str) -> Self {
        if search.starts_with(keywords::RECENT_PAGES) {
            Self::RecentPages
        } else if search.starts_with(keywords::NOTEBOOK_EXPLORER) {
            Self::NotebookExplorer
        } else if search.starts_with(keywords::TITLE_SEARCH) {
            Self::TitleSearch
        } else {
            Self::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_recent_pages() {
        assert_eq!(Mode::classify("rcntpgs:"), Mode::RecentPages);
        assert_eq!(Mode::classify("rcntpgs:5"), Mode::RecentPages);
    }

    #[test]
    fn test_classify_notebook_explorer() {
        assert_eq!(Mode::classify("nb:\\"), Mode::NotebookExplorer);
        assert_eq!(Mode::classify("nb:\\Work\\Pro"), Mode::NotebookExplorer);
    }

    #[test]
    fn test_classify_title_search() {
        assert_eq!(Mode::classify("*"), Mode::TitleSearch);
        assert_eq!(Mode::classify("*meeting"), Mode::TitleSearch);
    }

    #[test]
    fn test_classify_default() {
        assert_eq!(Mode::classify("meeting"), Mode::Default);
        assert_eq!(Mode::classify(""), Mode::Default);
        // Bare "nb:" without the separator is not explorer mode
        assert_eq!(Mode::classify("nb:"), Mode::Default);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(Mode::classify("RCNTPGS:"), Mode::Default);
        assert_eq!(Mode::classify("NB:\\"), Mode::Default);
    }

    #[test]
    fn test_classify_priority_order() {
        // A recent-pages prefix wins even if the rest looks like a path
        assert_eq!(Mode::classify("rcntpgs:nb:\\"), Mode::RecentPages);
    }

    #[test]
    fn test_from_raw_with_keyword() {
        let input = QueryInput::from_raw("qn *meeting", "qn", false);
        assert!(input.uses_action_keyword);
        assert_eq!(input.search, "*meeting");
        assert_eq!(input.terms, vec!["*meeting"]);
    }

    #[test]
    fn test_from_raw_global_without_keyword() {
        let input = QueryInput::from_raw("meeting notes", "qn", true);
        assert!(!input.uses_action_keyword);
        assert_eq!(input.search, "meeting notes");
        assert_eq!(input.terms, vec!["meeting", "notes"]);
    }

    #[test]
    fn test_from_raw_strips_only_leading_whitespace() {
        let input = QueryInput::from_raw("qn  nb:\\Work\\", "qn", true);
        assert_eq!(input.search, "nb:\\Work\\");
    }

    #[test]
    fn test_joined_terms() {
        let input = QueryInput::from_raw("qn *meeting  notes", "qn", false);
        assert_eq!(input.joined_terms(), "*meeting notes");
    }
}
