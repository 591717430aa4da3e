//! Fixed query parameters shared between the builder and the transport.

/// Default result page size.
pub const PAGE_SIZE: u64 = 10;

/// Session-storage key for the persisted query blob.
pub const SESSION_KEY: &str = "cq";

/// Version stamped into the persisted query blob.
pub const SESSION_VERSION: u32 = 1;

/// Field the engine groups result documents by.
pub const GROUP_FIELD: &str = "group";

/// Sort applied within each group.
pub const GROUP_SORT: &str = "page asc";

/// Relevance boost on the title field.
pub const TITLE_BOOST: u32 = 20;

/// Relevance boost on the body text field.
pub const TEXT_BOOST: u32 = 10;

/// Result ordering across groups.
pub const RESULT_SORT: &str = "score desc";

pub const HIGHLIGHT_PRE: &str = "<em>";
pub const HIGHLIGHT_POST: &str = "</em>";
