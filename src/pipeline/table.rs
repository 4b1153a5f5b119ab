//! Table projection - most recent sales first

use crate::pipeline::filter::FilteredView;
use crate::pipeline::types::TableRow;

/// Project the view into table rows, newest first, at most `limit` rows
pub fn table_rows(view: &FilteredView<'_>, limit: usize) -> Vec<TableRow> {
    let mut rows: Vec<_> = view.iter().collect();
    rows.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));

    rows.into_iter()
        .take(limit)
        .map(|r| TableRow {
            sale_date: r.sale_date,
            property_id: r.property_id.clone(),
            price: r.price,
            tax_year: r.tax_year,
            sale_validity: r.sale_validity.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::SaleRecord;
    use chrono::{TimeZone, Utc};

    fn sale(id: &str, day: u32) -> SaleRecord {
        SaleRecord {
            property_id: id.to_string(),
            sale_date: Utc.with_ymd_and_hms(2021, 3, day, 0, 0, 0).unwrap(),
            price: Some(1_000.0 * day as f64),
            tax_year: Some(2021),
            sale_validity: "VALID".to_string(),
        }
    }

    #[test]
    fn test_table_rows_newest_first() {
        let records = vec![sale("A", 1), sale("B", 20), sale("C", 5)];
        let rows = table_rows(&FilteredView::all(&records), 100);

        let ids: Vec<&str> = rows.iter().map(|r| r.property_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
        assert_eq!(rows[0].price, Some(20_000.0));
        assert_eq!(rows[0].tax_year, Some(2021));
    }

    #[test]
    fn test_table_rows_limit_and_stable_ties() {
        let records = vec![sale("A", 2), sale("B", 9), sale("C", 2), sale("D", 1)];
        let rows = table_rows(&FilteredView::all(&records), 3);

        let ids: Vec<&str> = rows.iter().map(|r| r.property_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_table_rows_keep_unpriced_sales() {
        let mut records = vec![sale("A", 1), sale("B", 2)];
        records[1].price = None;

        let rows = table_rows(&FilteredView::all(&records), 100);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].property_id, "B");
        assert_eq!(rows[0].price, None);
    }

    #[test]
    fn test_table_rows_empty() {
        assert!(table_rows(&FilteredView::all(&[]), 100).is_empty());
    }
}
