//! SQLite sales database - read-only access to the `sales` table

use crate::pipeline::types::RawSale;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

// Columns come back as text and numbers are parsed here, so bad values fail
// the same way they do in a CSV export instead of casting to 0
const SELECT_SALES: &str = r#"
    SELECT
        CAST(property_id AS TEXT) AS property_id,
        CAST(sale_date AS TEXT) AS sale_date,
        CAST(price AS TEXT) AS price,
        CAST(tax_year AS TEXT) AS tax_year,
        CAST(sale_validity AS TEXT) AS sale_validity
    FROM sales
"#;

/// `sales` row with every column as text
#[derive(Debug, sqlx::FromRow)]
struct SalesTableRow {
    property_id: String,
    sale_date: String,
    price: Option<String>,
    tax_year: Option<String>,
    sale_validity: Option<String>,
}

impl SalesTableRow {
    fn into_raw(self) -> Result<RawSale> {
        let price = parse_optional(&self.price, "price", &self.property_id)?;
        let tax_year = parse_optional(&self.tax_year, "tax_year", &self.property_id)?;

        Ok(RawSale {
            property_id: self.property_id,
            sale_date: self.sale_date,
            price,
            tax_year,
            sale_validity: self.sale_validity,
        })
    }
}

/// NULL and empty text are missing; anything else must parse
fn parse_optional<T>(value: &Option<String>, column: &str, property_id: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).with_context(|| {
            format!(
                "Invalid {} {:?} for property {}",
                column, text, property_id
            )
        }),
    }
}

/// Read every raw sale row from the database file
pub async fn read_sales(path: &Path) -> Result<Vec<RawSale>> {
    info!("📦 Opening sales database {:?}", path);

    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open sales database {:?}", path))?;

    let rows = sqlx::query_as::<_, SalesTableRow>(SELECT_SALES)
        .fetch_all(&pool)
        .await
        .context("Failed to read sales table")?;

    pool.close().await;
    info!("Read {} raw rows from database", rows.len());

    rows.into_iter().map(SalesTableRow::into_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn seed(path: &Path, rows: &str) {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE sales (
                property_id TEXT,
                sale_date TEXT,
                price INTEGER,
                tax_year INTEGER,
                sale_validity TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(&format!("INSERT INTO sales VALUES {}", rows))
            .execute(&pool)
            .await
            .unwrap();

        pool.close().await;
    }

    #[tokio::test]
    async fn test_read_sales() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sales.db");
        seed(
            &path,
            "('0101 01 0001', '2021-01-15 00:00:00', 100, 2021, 'VALID'),
             ('0101 01 0002', '2021-02-20 00:00:00', 300.5, NULL, NULL),
             ('0101 01 0003', '2021-03-01 00:00:00', NULL, '', 'VALID')",
        )
        .await;

        let rows = read_sales(&path).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].property_id, "0101 01 0001");
        assert_eq!(rows[0].sale_date, "2021-01-15 00:00:00");
        assert_eq!(rows[0].price, Some(100.0));
        assert_eq!(rows[0].tax_year, Some(2021));
        assert_eq!(rows[1].price, Some(300.5));
        assert_eq!(rows[1].tax_year, None);
        assert_eq!(rows[1].sale_validity, None);
        assert_eq!(rows[2].price, None);
        assert_eq!(rows[2].tax_year, None);
    }

    #[tokio::test]
    async fn test_read_sales_rejects_text_price() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sales.db");
        seed(
            &path,
            "('A', '2021-01-15', 'one hundred', 2021, 'VALID'),
             ('B', '2021-02-20', 300, 2021, 'VALID')",
        )
        .await;

        let err = read_sales(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid price \"one hundred\" for property A"));
    }

    #[tokio::test]
    async fn test_read_sales_rejects_text_tax_year() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sales.db");
        seed(&path, "('A', '2021-01-15', 100, 'n/a', 'VALID')").await;

        let err = read_sales(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid tax_year"));
    }

    #[tokio::test]
    async fn test_read_sales_without_table() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.db");
        std::fs::File::create(&path).unwrap();

        assert!(read_sales(&path).await.is_err());
    }
}
