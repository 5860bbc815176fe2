//! Bulk loading of aggregate rows from a JSON document.

use apr_core::models::AggregateRow;
use apr_sqlite::Db;
use std::{collections::BTreeMap, path::Path};
use time::{Date, macros::format_description};

/// Days mapped to the aggregate rows computed for them.
pub type ImportDocument = BTreeMap<String, Vec<AggregateRow>>;

/// Read `path` and store every day it contains, returning the number of
/// rows written.
pub async fn import_file(db: &Db, path: &Path) -> anyhow::Result<u64> {
    let text = tokio::fs::read_to_string(path).await?;
    let document: ImportDocument = serde_json::from_str(&text)?;
    import_document(db, document).await
}

/// Store every day of an already parsed document.
///
/// All keys are validated before anything is written.
pub async fn import_document(db: &Db, document: ImportDocument) -> anyhow::Result<u64> {
    let days = document
        .into_iter()
        .map(|(key, rows)| {
            Date::parse(&key, format_description!("[year]-[month]-[day]"))
                .map(|day| (day, rows))
                .map_err(|err| anyhow::anyhow!("invalid day {key:?}: {err}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut written = 0;
    for (day, rows) in days {
        written += db.insert_aggregates(day, &rows).await?;
        tracing::info!(%day, rows = rows.len(), "imported aggregates");
    }
    Ok(written)
}
