#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the apr-sqlite crate.
//! [apr_core]: https://docs.rs/apr_core/latest/apr_core/index.html
//! [apr_axum]: https://docs.rs/apr_axum/latest/apr_axum/index.html
//! [apr_sqlite]: https://docs.rs/apr_sqlite/latest/apr_sqlite/index.html
#![doc = include_str!("../README.md")]

use apr_core::models::AggregateRow;
use sqlx::sqlite;
use std::str::FromStr;
use tokio::try_join;

pub mod config;
mod r#impl;
mod types;

use config::SqliteConfig;
pub use types::Marker;

/// SQLite aggregation store for account payment reports.
///
/// This struct provides separate reader and writer connection pools to a SQLite database,
/// and implements [`AggregateRepository`](apr_core::ports::AggregateRepository).
///
/// # Connection Management
///
/// - `reader`: A connection pool for read operations, allowing concurrent reads
/// - `writer`: A single-connection pool for write operations, ensuring serialized writes
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open a connection to the specified SQLite database.
    ///
    /// Creates a new database if one doesn't exist (when `create_if_missing` is true)
    /// and applies all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection fails or the migrations fail to apply.
    pub async fn open(config: &SqliteConfig) -> Result<Self, sqlx::Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(config.busy_timeout)
                .journal_mode(sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("temp_store", "memory")
                .create_if_missing(config.create_if_missing);

        let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
        let writer = sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options);

        let (reader, writer) = try_join!(reader, writer)?;

        sqlx::migrate!("./schema").run(&writer).await?;

        Ok(Self { reader, writer })
    }

    /// Store the aggregates of `day`, replacing any existing row for the same account.
    ///
    /// Returns the number of rows written.
    pub async fn insert_aggregates(
        &self,
        day: time::Date,
        rows: &[AggregateRow],
    ) -> Result<u64, sqlx::Error> {
        let date = day.midnight().assume_utc().unix_timestamp();
        let mut tx = self.writer.begin().await?;
        let mut written = 0;

        for row in rows {
            written += sqlx::query(
                r#"
                insert into
                    account_payments_aggregate (date, account, data)
                values
                    ($1, $2, jsonb($3))
                on conflict (date, account)
                    do update set data = excluded.data
                "#,
            )
            .bind(date)
            .bind(&row.account)
            .bind(sqlx::types::Json(row))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        tracing::debug!(%day, written, "stored account payment aggregates");
        Ok(written)
    }
}
