//! Input sources: the primary relational extract and external curated feeds.

pub mod primary;
pub mod external;

pub use external::{load_feed, parse_feed};
pub use primary::{load_override_list, load_primary_extract, PrimaryPaths};
