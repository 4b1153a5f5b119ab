//! Time-based aggregates - monthly trend, year/month heatmap, year-over-year change

use crate::pipeline::filter::FilteredView;
use crate::pipeline::types::{HeatmapCell, MonthlyAverage, YearChange};
use crate::{percent_change, round_to};
use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
struct PriceTotals {
    sum: f64,
    priced: usize,
    count: usize,
}

impl PriceTotals {
    fn add(&mut self, price: Option<f64>) {
        if let Some(price) = price {
            self.sum += price;
            self.priced += 1;
        }
        self.count += 1;
    }

    fn average(&self) -> Option<f64> {
        if self.priced == 0 {
            return None;
        }
        Some(self.sum / self.priced as f64)
    }
}

/// Average price per (year, month), keyed in chronological order
fn totals_by_month(view: &FilteredView<'_>) -> BTreeMap<(i32, u32), PriceTotals> {
    let mut groups: BTreeMap<(i32, u32), PriceTotals> = BTreeMap::new();
    for record in view.iter() {
        let key = (record.sale_date.year(), record.sale_date.month());
        groups.entry(key).or_default().add(record.price);
    }
    groups
}

/// Average sale price per calendar month, ascending
pub fn monthly_average(view: &FilteredView<'_>) -> Vec<MonthlyAverage> {
    let trend: Vec<MonthlyAverage> = totals_by_month(view)
        .into_iter()
        .map(|((year, month), totals)| MonthlyAverage {
            period: format!("{:04}-{:02}", year, month),
            year,
            month,
            average_price: totals.average(),
            sale_count: totals.count,
        })
        .collect();

    debug!("Monthly trend has {} periods", trend.len());
    trend
}

/// Occupied (year, month) cells with their average price
/// Empty cells are absent, not zero-filled
pub fn year_month_grid(view: &FilteredView<'_>) -> Vec<HeatmapCell> {
    totals_by_month(view)
        .into_iter()
        .map(|((year, month), totals)| HeatmapCell {
            year,
            month,
            average_price: totals.average(),
            sale_count: totals.count,
        })
        .collect()
}

/// Percent change of the yearly average against the previous year present in the view
pub fn yoy_change(view: &FilteredView<'_>) -> Vec<YearChange> {
    let mut years: BTreeMap<i32, PriceTotals> = BTreeMap::new();
    for record in view.iter() {
        years
            .entry(record.sale_date.year())
            .or_default()
            .add(record.price);
    }

    let mut previous: Option<f64> = None;
    let changes: Vec<YearChange> = years
        .into_iter()
        .filter_map(|(year, totals)| totals.average().map(|avg| (year, avg)))
        .map(|(year, average_price)| {
            let pct_change = previous
                .and_then(|prev| percent_change(prev, average_price))
                .map(|pct| round_to(pct, 2));
            previous = Some(average_price);

            YearChange {
                year,
                average_price,
                pct_change,
            }
        })
        .collect();

    debug!("Year-over-year series has {} years", changes.len());
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::SaleRecord;
    use chrono::{TimeZone, Utc};

    fn sale(ymd: (i32, u32, u32), price: f64) -> SaleRecord {
        SaleRecord {
            property_id: "P".to_string(),
            sale_date: Utc.with_ymd_and_hms(ymd.0, ymd.1, ymd.2, 12, 0, 0).unwrap(),
            price: Some(price),
            tax_year: Some(ymd.0),
            sale_validity: "VALID".to_string(),
        }
    }

    #[test]
    fn test_monthly_average() {
        let records = vec![
            sale((2021, 2, 20), 300.0),
            sale((2021, 1, 15), 100.0),
            sale((2021, 2, 3), 500.0),
        ];

        let trend = monthly_average(&FilteredView::all(&records));
        let points: Vec<(&str, Option<f64>, usize)> = trend
            .iter()
            .map(|m| (m.period.as_str(), m.average_price, m.sale_count))
            .collect();

        assert_eq!(
            points,
            vec![("2021-01", Some(100.0), 1), ("2021-02", Some(400.0), 2)]
        );
    }

    #[test]
    fn test_monthly_average_sorted_across_years() {
        let records = vec![
            sale((2022, 1, 1), 1.0),
            sale((2020, 12, 1), 1.0),
            sale((2021, 6, 1), 1.0),
            sale((2020, 2, 1), 1.0),
        ];

        let trend = monthly_average(&FilteredView::all(&records));
        let periods: Vec<&str> = trend.iter().map(|m| m.period.as_str()).collect();

        assert_eq!(periods, vec!["2020-02", "2020-12", "2021-06", "2022-01"]);
        assert_eq!(trend.iter().map(|m| m.sale_count).sum::<usize>(), records.len());
    }

    #[test]
    fn test_monthly_average_empty() {
        assert!(monthly_average(&FilteredView::all(&[])).is_empty());
    }

    #[test]
    fn test_year_month_grid_skips_empty_cells() {
        let records = vec![
            sale((2020, 3, 1), 200.0),
            sale((2020, 3, 9), 400.0),
            sale((2021, 7, 1), 50.0),
        ];

        let grid = year_month_grid(&FilteredView::all(&records));

        assert_eq!(grid.len(), 2);
        assert_eq!((grid[0].year, grid[0].month), (2020, 3));
        assert_eq!(grid[0].average_price, Some(300.0));
        assert_eq!((grid[1].year, grid[1].month), (2021, 7));
        assert_eq!(grid[1].sale_count, 1);
    }

    #[test]
    fn test_yoy_change() {
        let records = vec![
            sale((2021, 5, 1), 100.0),
            sale((2020, 1, 1), 50.0),
            sale((2020, 6, 1), 150.0),
            sale((2021, 9, 1), 200.0),
        ];

        let changes = yoy_change(&FilteredView::all(&records));

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].year, 2020);
        assert_eq!(changes[0].pct_change, None);
        assert_eq!(changes[1].year, 2021);
        assert_eq!(changes[1].pct_change, Some(50.0));
    }

    #[test]
    fn test_yoy_change_skips_gap_years() {
        let records = vec![sale((2018, 1, 1), 300.0), sale((2021, 1, 1), 200.0)];

        let changes = yoy_change(&FilteredView::all(&records));

        assert_eq!(changes[1].year, 2021);
        assert_eq!(changes[1].pct_change, Some(-33.33));
    }

    #[test]
    fn test_yoy_change_zero_base_is_undefined() {
        let records = vec![
            sale((2019, 1, 1), 0.0),
            sale((2020, 1, 1), 100.0),
            sale((2021, 1, 1), 150.0),
        ];

        let changes = yoy_change(&FilteredView::all(&records));

        assert_eq!(changes[0].pct_change, None);
        assert_eq!(changes[1].pct_change, None);
        assert_eq!(changes[2].pct_change, Some(50.0));
    }

    fn unpriced(ymd: (i32, u32, u32)) -> SaleRecord {
        SaleRecord {
            price: None,
            ..sale(ymd, 0.0)
        }
    }

    #[test]
    fn test_monthly_average_counts_unpriced_sales() {
        let records = vec![
            sale((2021, 1, 15), 100.0),
            unpriced((2021, 1, 20)),
            sale((2021, 1, 25), 300.0),
            unpriced((2021, 2, 1)),
        ];

        let trend = monthly_average(&FilteredView::all(&records));

        assert_eq!(trend[0].average_price, Some(200.0));
        assert_eq!(trend[0].sale_count, 3);
        assert_eq!(trend[1].period, "2021-02");
        assert_eq!(trend[1].average_price, None);
        assert_eq!(trend.iter().map(|m| m.sale_count).sum::<usize>(), records.len());
    }

    #[test]
    fn test_yoy_change_skips_unpriced_sales_and_years() {
        let records = vec![
            sale((2019, 1, 1), 100.0),
            unpriced((2019, 6, 1)),
            unpriced((2020, 1, 1)),
            sale((2021, 1, 1), 150.0),
        ];

        let changes = yoy_change(&FilteredView::all(&records));
        let years: Vec<(i32, f64, Option<f64>)> = changes
            .iter()
            .map(|c| (c.year, c.average_price, c.pct_change))
            .collect();

        assert_eq!(years, vec![(2019, 100.0, None), (2021, 150.0, Some(50.0))]);
    }

    #[test]
    fn test_yoy_change_empty() {
        assert!(yoy_change(&FilteredView::all(&[])).is_empty());
    }
}
