//! SQLite sink: replaces a table with the bank table and runs ad hoc queries.

use crate::domain::model::{BankTable, QueryResult, SqlValue, COLUMNS};
use crate::utils::error::Result;
use crate::utils::validation::validate_sql_identifier;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Executor, Row, Statement, TypeInfo, ValueRef};
use std::str::FromStr;
use tokio::sync::Mutex;

/// One connection, opened once and used sequentially by the load and every
/// query that follows it.
pub struct BankStore {
    conn: Mutex<SqliteConnection>,
}

impl BankStore {
    /// Opens (creating if needed) the database at `database_url`, e.g.
    /// `sqlite://Banks.db` or `sqlite::memory:`.
    pub async fn open(database_url: &str) -> Result<Self> {
        let conn = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .connect()
            .await?;

        tracing::debug!("Opened database {}", database_url);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Drops and recreates `table_name`, then inserts the rows in table order.
    pub async fn load(&self, table: &BankTable, table_name: &str) -> Result<usize> {
        validate_sql_identifier("table_name", table_name)?;
        let mut conn = self.conn.lock().await;

        let drop_sql = format!("DROP TABLE IF EXISTS \"{}\"", table_name);
        sqlx::query(&drop_sql).execute(&mut *conn).await?;

        let create_sql = format!(
            "CREATE TABLE \"{}\" (\"{}\" TEXT, \"{}\" REAL, \"{}\" REAL, \"{}\" REAL, \"{}\" REAL)",
            table_name, COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
        );
        sqlx::query(&create_sql).execute(&mut *conn).await?;

        let insert_sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES (?, ?, ?, ?, ?)",
            table_name,
            COLUMNS
                .iter()
                .map(|c| format!("\"{}\"", c))
                .collect::<Vec<_>>()
                .join(", ")
        );
        for record in table {
            sqlx::query(&insert_sql)
                .bind(record.name.as_str())
                .bind(record.market_cap_usd)
                .bind(record.market_cap_gbp)
                .bind(record.market_cap_eur)
                .bind(record.market_cap_inr)
                .execute(&mut *conn)
                .await?;
        }

        tracing::debug!("Loaded {} rows into {}", table.len(), table_name);
        Ok(table.len())
    }

    /// Runs `statement` verbatim. Column names come from the prepared
    /// statement, so they are reported even when no rows match.
    pub async fn query(&self, statement: &str) -> Result<QueryResult> {
        let mut conn = self.conn.lock().await;
        let prepared = (&mut *conn).prepare(statement).await?;
        let columns = prepared
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = sqlx::query(statement).fetch_all(&mut *conn).await?;

        let rows = rows
            .iter()
            .map(|row| (0..row.len()).map(|i| decode_value(row, i)).collect())
            .collect::<Result<Vec<Vec<SqlValue>>>>()?;

        Ok(QueryResult { columns, rows })
    }
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<SqlValue> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let storage_class = raw.type_info().name().to_string();

    Ok(match storage_class.as_str() {
        "INTEGER" => SqlValue::Integer(row.try_get(index)?),
        "REAL" => SqlValue::Real(row.try_get(index)?),
        "BLOB" => SqlValue::Blob(row.try_get(index)?),
        _ => SqlValue::Text(row.try_get(index)?),
    })
}
