mod provider;
mod snapshot;

pub use provider::{INVALID_NOTEBOOK_CHARS, INVALID_SECTION_CHARS, NoteStore};
pub use snapshot::{Snapshot, child_by_name, flatten};

/// Separator used by the store inside `relative_path`.
/// Distinct from the display separator (`" > "`) used only for rendering.
pub const RELATIVE_PATH_SEPARATOR: char = '\\';
