use super::keywords;
use crate::hierarchy::{Snapshot, child_by_name};
use quire_types::Item;

/// Outcome of walking an explorer path against a snapshot.
#[derive(Debug)]
pub struct ResolvedPath<'a, 'q> {
    /// The deepest item the walk resolved, if any.
    pub parent: Option<&'a Item>,

    /// The collection the residual searches: the parent's children, or the
    /// notebook forest when no parent resolved.
    pub collection: &'a [Item],

    /// The unconsumed remainder of the path.
    pub residual: &'q str,
}

/// Walk a separator-delimited path level by level using exact ordinal name
/// equality.
///
/// The last segment is never consumed by the walk, even when it names a child
/// exactly; it is always the residual for the next stage. When an earlier
/// segment fails to resolve, the walk stops there and returns the previously
/// resolved parent with that raw segment as the residual. Partial typing is a
/// normal state, not an error.
#[must_use]
pub fn resolve_path<'a, 'q>(snapshot: &'a Snapshot, path: &'q str) -> ResolvedPath<'a, 'q> {
    let segments: Vec<&str> = path.split(keywords::EXPLORER_SEPARATOR).collect();

    let Some((last, walk)) = segments.split_last() else {
        return ResolvedPath {
            parent: None,
            collection: snapshot.notebooks(),
            residual: path,
        };
    };

    let mut parent = None;
    let mut collection = snapshot.notebooks();

    for segment in walk {
        match child_by_name(collection, segment) {
            Some(child) => {
                parent = Some(child);
                collection = &child.children;
            }
            None => {
                return ResolvedPath {
                    parent,
                    collection,
                    residual: segment,
                };
            }
        }
    }

    ResolvedPath {
        parent,
        collection,
        residual: last,
    }
}
