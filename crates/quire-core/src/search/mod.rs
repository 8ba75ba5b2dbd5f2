mod matcher;

pub use matcher::{FuzzyMatch, FuzzyTerm, SCORE_FLOOR};
