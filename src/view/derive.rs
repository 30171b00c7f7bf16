//! Derived list computation.
//!
//! [`derive_view`] is a full rescan: filter every record, then stable-sort
//! the survivors. Collections are a few hundred rows at most, so there is
//! no index and no incremental recomputation.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::dates::parse_record_timestamp;
use super::query::{SortDirection, SortKey, ViewQuery};
use crate::domain::Record;

/// Returns the records of `collection` that match `query`, in the order
/// the query asks for.
///
/// Records whose sort value is missing or unreadable order before every
/// record that has one. Ties keep their collection order.
#[must_use]
pub fn derive_view<R: Record>(collection: &[R], query: &ViewQuery) -> Vec<R> {
    let mut keyed: Vec<(SortValue, &R)> = collection
        .iter()
        .filter(|record| matches_query(*record, query))
        .map(|record| (SortValue::of(record, query.sort_key()), record))
        .collect();

    match query.sort_direction() {
        SortDirection::Ascending => keyed.sort_by(|(a, _), (b, _)| a.compare(b)),
        SortDirection::Descending => keyed.sort_by(|(a, _), (b, _)| b.compare(a)),
    }

    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

/// Whether a single record passes the search, category and date filters.
#[must_use]
pub fn matches_query<R: Record>(record: &R, query: &ViewQuery) -> bool {
    matches_search(record, query.search_text())
        && query.category_filter().accepts(record.category())
        && query.date_range().accepts(record.date())
}

/// Case-insensitive substring match against the record's search fields.
/// `needle` must already be lowercased; an empty needle matches anything.
fn matches_search<R: Record>(record: &R, needle: &str) -> bool {
    needle.is_empty()
        || record
            .search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, Copy)]
enum SortValue {
    Date(Option<NaiveDateTime>),
    Amount(Option<f64>),
}

impl SortValue {
    fn of<R: Record>(record: &R, key: SortKey) -> Self {
        match key {
            SortKey::Date => Self::Date(record.date().and_then(parse_record_timestamp)),
            SortKey::Amount => Self::Amount(record.amount().filter(|v| !v.is_nan())),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Amount(a), Self::Amount(b)) => match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            },
            // Every value in one derivation comes from the same key.
            _ => Ordering::Equal,
        }
    }
}
