use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Minimum nucleo score for a candidate to count as a match at all.
///
/// This is the precision floor that separates "0 results" from "many
/// irrelevant results": a subsequence hit scoring below it is treated as no
/// match, not as a low-ranked one. One clean character match scores 16, so
/// the floor admits single-character queries while rejecting matches that
/// survive only through long gaps.
pub const SCORE_FLOOR: u32 = 16;

/// A successful fuzzy match against a candidate name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub score: u32,

    /// Ordered character indices into the candidate that matched.
    pub indices: Vec<u32>,
}

impl FuzzyMatch {
    /// The trivial match produced by an empty search term.
    #[must_use]
    pub fn trivial() -> Self {
        Self {
            score: 0,
            indices: Vec::new(),
        }
    }
}

/// One search term compiled for repeated matching.
///
/// Holds the nucleo pattern plus reusable buffers so scoring a whole
/// collection does not allocate per candidate.
pub struct FuzzyTerm {
    term: String,
    pattern: Option<Pattern>,
    matcher: Matcher,
    buf: Vec<char>,
    indices: Vec<u32>,
}

impl FuzzyTerm {
    #[must_use]
    pub fn new(term: &str) -> Self {
        let pattern = (!term.is_empty()).then(|| {
            Pattern::new(
                term,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Fuzzy,
            )
        });

        Self {
            term: term.to_string(),
            pattern,
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
            indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Match the term against a candidate name.
    ///
    /// Returns `None` when the term is not a subsequence of the candidate or
    /// the score falls below [`SCORE_FLOOR`]. An empty term matches every
    /// candidate trivially with score 0 and no highlights.
    pub fn try_match(&mut self, candidate: &str) -> Option<FuzzyMatch> {
        let Some(pattern) = &self.pattern else {
            return Some(FuzzyMatch::trivial());
        };

        self.buf.clear();
        self.indices.clear();
        let haystack = Utf32Str::new(candidate, &mut self.buf);
        let score = pattern.indices(haystack, &mut self.matcher, &mut self.indices)?;
        if score < SCORE_FLOOR {
            return None;
        }

        // nucleo may report indices unsorted and duplicated
        let mut indices = self.indices.clone();
        indices.sort_unstable();
        indices.dedup();

        Some(FuzzyMatch { score, indices })
    }

    /// Best-effort highlight indices without the precision floor.
    ///
    /// Used for rows the store's own index already deemed matches, where the
    /// engine only needs highlight spans.
    pub fn highlights(&mut self, candidate: &str) -> Vec<u32> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        self.buf.clear();
        self.indices.clear();
        let haystack = Utf32Str::new(candidate, &mut self.buf);
        if pattern
            .indices(haystack, &mut self.matcher, &mut self.indices)
            .is_none()
        {
            return Vec::new();
        }

        let mut indices = self.indices.clone();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
