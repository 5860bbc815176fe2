use crate::{
    Db,
    types::{AggregateRecord, Marker},
};
use apr_core::{
    models::{AggregatePage, AggregateQuery},
    ports::{AggregateRepository, FetchError},
};

impl AggregateRepository for Db {
    async fn get_aggregate_account_payments(
        &self,
        query: AggregateQuery,
    ) -> Result<AggregatePage, FetchError> {
        if query.limit < 1 {
            return Err(FetchError::status(400, "invalid limit"));
        }

        let after = query
            .marker
            .as_deref()
            .map(str::parse::<Marker>)
            .transpose()
            .map_err(|_| FetchError::status(400, "invalid marker"))?;
        let (after_date, after_account) = after
            .map(|marker| (marker.date, marker.account))
            .unzip();

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let limit_p1 = query.limit.saturating_add(1);

        let mut rows = sqlx::query_as::<_, AggregateRecord>(
            r#"
            select
                date,
                account,
                json(data) as data
            from
                account_payments_aggregate
            where
                date >= $1
            and
                date <= $2
            and
                ($3 is null or (date, account) > ($3, $4))
            order by
                date, account
            limit $5
            "#,
        )
        .bind(query.start.unix_timestamp())
        .bind(query.end.unix_timestamp())
        .bind(after_date)
        .bind(after_account)
        .bind(limit_p1)
        .fetch_all(&self.reader)
        .await
        .map_err(FetchError::internal)?;

        let marker = if rows.len() > limit {
            rows.truncate(limit);
            rows.last().map(|last| Marker::from(last).to_string())
        } else {
            None
        };

        tracing::debug!(
            start = %query.start,
            end = %query.end,
            count = rows.len(),
            more = marker.is_some(),
            "fetched account payment aggregates"
        );

        Ok(AggregatePage {
            rows: rows.into_iter().map(|record| record.data.0).collect(),
            marker,
        })
    }
}
