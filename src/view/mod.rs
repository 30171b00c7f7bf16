//! Local filter-sort view over an already-fetched collection.
//!
//! A [`ViewQuery`] holds the screen's search / filter / sort state and
//! [`derive_view`] turns a collection snapshot into the display list.

pub mod dates;
pub mod derive;
pub mod query;

pub use dates::{parse_record_date, parse_record_timestamp};
pub use derive::{derive_view, matches_query};
pub use query::{ALL_CATEGORIES, CategoryFilter, DateRange, SortDirection, SortKey, ViewQuery};
