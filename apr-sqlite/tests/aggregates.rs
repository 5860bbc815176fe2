use apr_core::{
    models::{AggregateQuery, AggregateRow},
    ports::{AggregateRepository as _, FetchError},
};
use apr_sqlite::{Db, config::SqliteConfig};
use bigdecimal::BigDecimal;
use serde_json::json;
use std::str::FromStr;
use time::{OffsetDateTime, macros::date, macros::datetime};

fn aggregate(account: &str, total: &str) -> AggregateRow {
    serde_json::from_value(json!({
        "account": account,
        "payments_sent": 1,
        "receiving_counterparties": ["rX"],
        "sending_counterparties": [],
        "payments": [{ "amount": total, "currency": "USD" }],
        "high_value_received": "0",
        "high_value_sent": "0",
        "total_value_received": "0",
        "total_value_sent": total,
        "total_value": total
    }))
    .unwrap()
}

fn query(day: OffsetDateTime, limit: i64, marker: Option<String>) -> AggregateQuery {
    AggregateQuery {
        start: day,
        end: day,
        accounts: false,
        payments: false,
        limit,
        marker,
    }
}

async fn seeded() -> anyhow::Result<Db> {
    let db = Db::open(&SqliteConfig::default()).await?;
    db.insert_aggregates(
        date!(2021 - 01 - 05),
        &[
            aggregate("rC", "3"),
            aggregate("rA", "1"),
            aggregate("rB", "2"),
        ],
    )
    .await?;
    db.insert_aggregates(date!(2021 - 01 - 06), &[aggregate("rD", "4")])
        .await?;
    Ok(db)
}

#[tokio::test]
async fn pages_through_a_day() -> anyhow::Result<()> {
    let db = seeded().await?;
    let day = datetime!(2021-01-05 0:00 UTC);

    let first = db.get_aggregate_account_payments(query(day, 2, None)).await?;
    let accounts: Vec<_> = first.rows.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(accounts, ["rA", "rB"]);
    assert_eq!(first.marker.as_deref(), Some("1609804800|rB"));

    let second = db
        .get_aggregate_account_payments(query(day, 2, first.marker))
        .await?;
    let accounts: Vec<_> = second.rows.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(accounts, ["rC"]);
    assert_eq!(second.marker, None);

    Ok(())
}

#[tokio::test]
async fn exact_page_has_no_marker() -> anyhow::Result<()> {
    let db = seeded().await?;
    let page = db
        .get_aggregate_account_payments(query(datetime!(2021-01-05 0:00 UTC), 3, None))
        .await?;
    assert_eq!(page.rows.len(), 3);
    assert_eq!(page.marker, None);
    Ok(())
}

#[tokio::test]
async fn range_is_inclusive() -> anyhow::Result<()> {
    let db = seeded().await?;
    let page = db
        .get_aggregate_account_payments(AggregateQuery {
            end: datetime!(2021-01-06 0:00 UTC),
            ..query(datetime!(2021-01-05 0:00 UTC), 10, None)
        })
        .await?;
    let accounts: Vec<_> = page.rows.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(accounts, ["rA", "rB", "rC", "rD"]);

    let empty = db
        .get_aggregate_account_payments(query(datetime!(2021-01-07 0:00 UTC), 10, None))
        .await?;
    assert!(empty.rows.is_empty());
    assert_eq!(empty.marker, None);
    Ok(())
}

#[tokio::test]
async fn values_keep_their_precision() -> anyhow::Result<()> {
    let db = Db::open(&SqliteConfig::default()).await?;
    let precise = "123456789012345678.12345678901234567890123456789";
    db.insert_aggregates(date!(2021 - 01 - 05), &[aggregate("rA", precise)])
        .await?;

    let page = db
        .get_aggregate_account_payments(query(datetime!(2021-01-05 0:00 UTC), 10, None))
        .await?;
    let row = &page.rows[0];
    assert_eq!(row.total_value, BigDecimal::from_str(precise)?);
    assert_eq!(row.total_value.to_plain_string(), precise);
    assert_eq!(row.payments[0].amount, BigDecimal::from_str(precise)?);
    assert_eq!(row.extra.get("payments_sent"), Some(&json!(1)));
    Ok(())
}

#[tokio::test]
async fn reimport_replaces_rows() -> anyhow::Result<()> {
    let db = seeded().await?;
    db.insert_aggregates(date!(2021 - 01 - 05), &[aggregate("rA", "10")])
        .await?;

    let page = db
        .get_aggregate_account_payments(query(datetime!(2021-01-05 0:00 UTC), 10, None))
        .await?;
    assert_eq!(page.rows.len(), 3);
    assert_eq!(page.rows[0].total_value, BigDecimal::from(10));
    Ok(())
}

#[tokio::test]
async fn rejects_bad_markers() -> anyhow::Result<()> {
    let db = seeded().await?;
    let err = db
        .get_aggregate_account_payments(query(
            datetime!(2021-01-05 0:00 UTC),
            10,
            Some("not a marker".to_string()),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { code: 400, .. }));
    assert_eq!(err.to_string(), "invalid marker");
    Ok(())
}

#[tokio::test]
async fn rejects_non_positive_limits() -> anyhow::Result<()> {
    let db = seeded().await?;
    for limit in [0, -5] {
        let err = db
            .get_aggregate_account_payments(query(datetime!(2021-01-05 0:00 UTC), limit, None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(400));
        assert_eq!(err.to_string(), "invalid limit");
    }
    Ok(())
}
