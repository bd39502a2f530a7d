//! Relational customer-data sources.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::time::Duration;

use crate::types::ColumnInfo;

/// Narrow read-only view of a customer database.
#[async_trait]
pub trait CustomerDataSource: Send + Sync {
    /// Column names and declared types of `table`.
    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Up to `limit` distinct non-null values of `table.column`, as text.
    async fn distinct_values(&self, table: &str, column: &str, limit: usize) -> Result<Vec<String>>;

    /// Source name for metrics/logging.
    fn source_name(&self) -> &str;
}

/// Quote a table or column name after checking it is a plain identifier.
/// Identifiers cannot be bound as parameters, so anything else is refused.
fn quote_identifier(name: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if !valid {
        bail!("invalid SQL identifier '{name}'");
    }
    Ok(format!("\"{name}\""))
}

/// SQLite-backed customer data.
pub struct SqliteDataSource {
    pool: SqlitePool,
}

impl SqliteDataSource {
    /// Create a lazily-connecting pool; connection errors surface on first query.
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .with_context(|| format!("invalid customer database url '{database_url}'"))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerDataSource for SqliteDataSource {
    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let sql = format!("PRAGMA table_info({})", quote_identifier(table)?);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to describe table '{table}'"))?;

        if rows.is_empty() {
            return Err(anyhow!("table '{table}' does not exist"));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            columns.push(ColumnInfo {
                name: row.try_get("name")?,
                data_type: row.try_get("type")?,
            });
        }
        Ok(columns)
    }

    async fn distinct_values(&self, table: &str, column: &str, limit: usize) -> Result<Vec<String>> {
        let column_ident = quote_identifier(column)?;
        let sql = format!(
            "SELECT DISTINCT CAST({col} AS TEXT) AS value FROM {table} \
             WHERE {col} IS NOT NULL ORDER BY value LIMIT ?",
            col = column_ident,
            table = quote_identifier(table)?,
        );
        let rows = sqlx::query(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to list values of '{table}.{column}'"))?;

        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            values.push(row.try_get::<String, _>("value")?);
        }
        Ok(values)
    }

    fn source_name(&self) -> &str {
        "sqlite"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn seeded_source() -> SqliteDataSource {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE customers (
                id INTEGER PRIMARY KEY,
                products TEXT,
                location TEXT,
                behavior TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        for (products, location, behavior) in [
            ("Laptop, Tablet", "Austin", "Frequent online shopper"),
            ("Laptop", "Denver", "Weekend gym visitor"),
            ("Smartwatch", "Austin", "Frequent online shopper"),
        ] {
            sqlx::query("INSERT INTO customers (products, location, behavior) VALUES (?, ?, ?)")
                .bind(products)
                .bind(location)
                .bind(behavior)
                .execute(&pool)
                .await
                .unwrap();
        }
        SqliteDataSource::from_pool(pool)
    }

    #[test]
    fn identifiers_are_validated() {
        assert_eq!(quote_identifier("customers").unwrap(), "\"customers\"");
        assert!(quote_identifier("customers; DROP TABLE x").is_err());
        assert!(quote_identifier("1abc").is_err());
        assert!(quote_identifier("").is_err());
    }

    #[tokio::test]
    async fn describes_table_columns() {
        let source = seeded_source().await;
        let columns = source.describe_table("customers").await.unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "products", "location", "behavior"]);
        assert_eq!(columns[0].data_type, "INTEGER");
    }

    #[tokio::test]
    async fn missing_table_is_an_error() {
        let source = seeded_source().await;
        assert!(source.describe_table("orders").await.is_err());
    }

    #[tokio::test]
    async fn lists_distinct_raw_values() {
        let source = seeded_source().await;
        let values = source.distinct_values("customers", "location", 10).await.unwrap();
        assert_eq!(values, vec!["Austin", "Denver"]);

        let products = source.distinct_values("customers", "products", 10).await.unwrap();
        assert_eq!(products, vec!["Laptop", "Laptop, Tablet", "Smartwatch"]);
    }
}
