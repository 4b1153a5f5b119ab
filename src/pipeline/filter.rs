//! Filter functions - restrict the dataset to the selected criteria

use crate::pipeline::normalize::canonical_validity;
use crate::pipeline::types::{FilterCriteria, FilterDefaults, SaleRecord, DEFAULT_VALIDITY};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Immutable snapshot of the rows matching a set of criteria, in dataset order
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    rows: Vec<&'a SaleRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over every record, unfiltered
    pub fn all(records: &'a [SaleRecord]) -> Self {
        FilteredView {
            rows: records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SaleRecord> + '_ {
        self.rows.iter().copied()
    }
}

impl FilterCriteria {
    /// Build criteria from calendar dates, interpreted in UTC
    /// The whole end date is included
    pub fn from_dates<I, S>(start: NaiveDate, end: NaiveDate, validity: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FilterCriteria {
            start: start_of_day(start),
            end: end_of_day(end),
            validity: validity
                .into_iter()
                .map(|v| canonical_validity(Some(v.as_ref())))
                .collect(),
        }
    }

    /// Inclusion predicate for a single record
    pub fn matches(&self, record: &SaleRecord) -> bool {
        self.start <= record.sale_date
            && record.sale_date <= self.end
            && self.validity.contains(&record.sale_validity)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(next) - Duration::nanoseconds(1),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Apply criteria to the dataset
/// Pure function - no side effects
pub fn filter<'a>(records: &'a [SaleRecord], criteria: &FilterCriteria) -> FilteredView<'a> {
    if criteria.start > criteria.end {
        warn!(
            "Start {} is after end {}; no sales can match",
            criteria.start, criteria.end
        );
    }

    let rows: Vec<&SaleRecord> = records.iter().filter(|r| criteria.matches(r)).collect();

    debug!(
        "Filter kept {} of {} sales (validity: {:?})",
        rows.len(),
        records.len(),
        criteria.validity
    );

    FilteredView { rows }
}

/// Distinct validity values in first-encountered order
pub fn validity_options(records: &[SaleRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.sale_validity.as_str()))
        .map(|r| r.sale_validity.clone())
        .collect()
}

impl FilterDefaults {
    /// Date span of the dataset plus the preselected validity
    /// Returns None for an empty dataset
    pub fn from_records(records: &[SaleRecord]) -> Option<Self> {
        let start = records.iter().map(|r| r.sale_date).min()?;
        let end = records.iter().map(|r| r.sale_date).max()?;

        let validity_options = validity_options(records);
        let default_validity = if validity_options.iter().any(|v| v == DEFAULT_VALIDITY) {
            DEFAULT_VALIDITY.to_string()
        } else {
            validity_options.first()?.clone()
        };

        Some(FilterDefaults {
            start_date: start.date_naive(),
            end_date: end.date_naive(),
            validity_options,
            default_validity: vec![default_validity],
        })
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_dates(self.start_date, self.end_date, &self.default_validity)
    }
}

/// Criteria from optional overrides, falling back to the dataset defaults
pub fn resolve_criteria(
    records: &[SaleRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    validity: Option<Vec<String>>,
) -> FilterCriteria {
    let defaults = FilterDefaults::from_records(records);

    let start = start
        .or(defaults.as_ref().map(|d| d.start_date))
        .unwrap_or(NaiveDate::MIN);
    let end = end
        .or(defaults.as_ref().map(|d| d.end_date))
        .unwrap_or(NaiveDate::MAX);
    let validity = validity
        .or(defaults.map(|d| d.default_validity))
        .unwrap_or_default();

    FilterCriteria::from_dates(start, end, validity)
}

/// Split a comma-separated validity list, dropping blank entries
pub fn parse_validity_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
