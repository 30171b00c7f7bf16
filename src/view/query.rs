//! View query: the search / filter / sort state of one list screen.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::parse_record_date;
use crate::error::ClientError;

/// Sentinel that disables the categorical filter.
pub const ALL_CATEGORIES: &str = "all";

/// Field the derived list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// The record's date field.
    #[default]
    Date,
    /// The record's numeric field (total, discount, ...).
    Amount,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "fecha" => Ok(Self::Date),
            "amount" | "total" | "monto" => Ok(Self::Amount),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest / oldest first.
    Ascending,
    /// Largest / newest first.
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Exact-match filter on a record's category field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Keep only records whose category equals this value.
    Only(String),
}

impl CategoryFilter {
    /// Builds a filter from a UI selection; empty or `"all"` disables it.
    #[must_use]
    pub fn parse(selection: &str) -> Self {
        let selection = selection.trim();
        if selection.is_empty() || selection.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Only(selection.to_string())
        }
    }

    /// Whether a record with this category value passes the filter.
    #[must_use]
    pub fn accepts(&self, category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => category == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// Inclusive calendar-day range; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First accepted day.
    pub from: Option<NaiveDate>,
    /// Last accepted day.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Whether neither side is bounded.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether a record date passes the range.
    ///
    /// An unreadable or missing date only passes an unbounded range.
    #[must_use]
    pub fn accepts(&self, raw_date: Option<&str>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(day) = raw_date.and_then(parse_record_date) else {
            return false;
        };
        self.from.is_none_or(|from| from <= day) && self.to.is_none_or(|to| day <= to)
    }
}

/// Current search, filter and sort state of a list screen.
///
/// The default query shows everything, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    search: String,
    category: CategoryFilter,
    range: DateRange,
    sort_key: SortKey,
    direction: SortDirection,
}

impl ViewQuery {
    /// Creates the default query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search. Surrounding whitespace is ignored.
    #[must_use]
    pub fn search(mut self, text: impl AsRef<str>) -> Self {
        self.search = text.as_ref().trim().to_lowercase();
        self
    }

    /// Sets the categorical filter from a UI selection (`"all"` disables).
    #[must_use]
    pub fn category(mut self, selection: &str) -> Self {
        self.category = CategoryFilter::parse(selection);
        self
    }

    /// Sets the lower date bound from an ISO date.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidQuery`] if the date is unreadable or
    /// falls after the upper bound.
    pub fn date_from(mut self, date: &str) -> Result<Self, ClientError> {
        self.range.from = Some(parse_bound("from", date)?);
        self.check_range()?;
        Ok(self)
    }

    /// Sets the upper date bound from an ISO date.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidQuery`] if the date is unreadable or
    /// falls before the lower bound.
    pub fn date_to(mut self, date: &str) -> Result<Self, ClientError> {
        self.range.to = Some(parse_bound("to", date)?);
        self.check_range()?;
        Ok(self)
    }

    /// Sets both date bounds; `None` leaves that side unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidQuery`] on unreadable bounds or when
    /// `from` is after `to`.
    pub fn between(mut self, from: Option<&str>, to: Option<&str>) -> Result<Self, ClientError> {
        self.range = DateRange {
            from: from.map(|d| parse_bound("from", d)).transpose()?,
            to: to.map(|d| parse_bound("to", d)).transpose()?,
        };
        self.check_range()?;
        Ok(self)
    }

    /// Sets the sort key.
    #[must_use]
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sorts smallest / oldest first.
    #[must_use]
    pub fn ascending(self) -> Self {
        self.direction(SortDirection::Ascending)
    }

    /// Sorts largest / newest first.
    #[must_use]
    pub fn descending(self) -> Self {
        self.direction(SortDirection::Descending)
    }

    /// Normalized (lowercased, trimmed) search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Active categorical filter.
    #[must_use]
    pub fn category_filter(&self) -> &CategoryFilter {
        &self.category
    }

    /// Active date range.
    #[must_use]
    pub fn date_range(&self) -> DateRange {
        self.range
    }

    /// Active sort key.
    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Active sort direction.
    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        self.direction
    }

    fn check_range(&self) -> Result<(), ClientError> {
        if let (Some(from), Some(to)) = (self.range.from, self.range.to)
            && from > to
        {
            return Err(ClientError::InvalidQuery(format!(
                "date range starts after it ends ({from} > {to})"
            )));
        }
        Ok(())
    }
}

fn parse_bound(side: &str, raw: &str) -> Result<NaiveDate, ClientError> {
    parse_record_date(raw)
        .ok_or_else(|| ClientError::InvalidQuery(format!("unreadable '{side}' date: {raw}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_disables_category() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("ALL"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("pagada"),
            CategoryFilter::Only("pagada".to_string())
        );
    }

    #[test]
    fn category_without_value_fails_active_filter() {
        let filter = CategoryFilter::parse("activa");
        assert!(filter.accepts(Some("activa")));
        assert!(!filter.accepts(Some("Activa")));
        assert!(!filter.accepts(None));
        assert!(CategoryFilter::All.accepts(None));
    }

    #[test]
    fn range_is_inclusive() {
        let Ok(query) = ViewQuery::new().between(Some("2024-01-05"), Some("2024-02-01")) else {
            panic!("valid range");
        };
        let range = query.date_range();
        assert!(range.accepts(Some("2024-01-05")));
        assert!(range.accepts(Some("2024-02-01T23:59:00")));
        assert!(!range.accepts(Some("2024-02-02")));
        assert!(!range.accepts(Some("2024-01-04")));
    }

    #[test]
    fn unreadable_dates_only_pass_unbounded_ranges() {
        assert!(DateRange::default().accepts(Some("pronto")));
        assert!(DateRange::default().accepts(None));
        let Ok(query) = ViewQuery::new().date_from("2024-01-01") else {
            panic!("valid bound");
        };
        assert!(!query.date_range().accepts(Some("pronto")));
        assert!(!query.date_range().accepts(None));
    }

    #[test]
    fn malformed_bound_is_rejected() {
        assert!(matches!(
            ViewQuery::new().date_to("31/12/2024"),
            Err(ClientError::InvalidQuery(_))
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let Ok(query) = ViewQuery::new().date_to("2024-01-01") else {
            panic!("valid bound");
        };
        assert!(query.date_from("2024-06-01").is_err());
    }

    #[test]
    fn parses_sort_settings() {
        assert_eq!("total".parse::<SortKey>(), Ok(SortKey::Amount));
        assert_eq!("fecha".parse::<SortKey>(), Ok(SortKey::Date));
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Ascending));
    }
}
