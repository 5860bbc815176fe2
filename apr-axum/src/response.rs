//! Encoding of shaped report rows as JSON or CSV responses.

use crate::error::ApiError;
use apr_core::models::{AggregatePage, Format, ReportRow, RequestOptions};
use axum::{
    Json,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;

/// The JSON envelope of a successful report request.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ReportsResponse {
    /// Always `"success"`
    pub result: String,
    /// Start of the requested day, RFC 3339
    pub date: String,
    /// Number of rows on this page
    pub count: usize,
    /// Continuation marker, present when more rows exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// The rows
    pub reports: Vec<ReportRow>,
}

/// Shape the fetched page and encode it in the requested format.
pub(crate) fn render(
    options: &RequestOptions,
    page: AggregatePage,
    link: Option<HeaderValue>,
) -> Result<Response, ApiError> {
    let rows = page
        .rows
        .iter()
        .map(|row| ReportRow::shape(row, options));

    let mut response = match options.format {
        Format::Csv => {
            let rows: Vec<_> = if options.accounts {
                rows.map(ReportRow::with_joined_counterparties).collect()
            } else {
                rows.collect()
            };
            let filename = format!("account reports {}.csv", options.day());
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                to_csv(&rows)?,
            )
                .into_response()
        }
        Format::Json => {
            let reports: Vec<_> = rows.collect();
            Json(ReportsResponse {
                result: "success".to_string(),
                date: options.start.format(&Rfc3339).map_err(ApiError::render)?,
                count: reports.len(),
                marker: page.marker,
                reports,
            })
            .into_response()
        }
    };

    if let Some(link) = link {
        response.headers_mut().insert(header::LINK, link);
    }

    Ok(response)
}

/// Write rows as CSV. The header is the union of the rows' fields in the
/// order first seen; nested values are written as compact JSON.
fn to_csv(rows: &[ReportRow]) -> Result<Vec<u8>, ApiError> {
    let records = rows
        .iter()
        .map(|row| match serde_json::to_value(row) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(ApiError::render(format!("row is not a record: {other}"))),
            Err(err) => Err(ApiError::render(err)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let columns: IndexSet<&String> = records.iter().flat_map(|record| record.keys()).collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !records.is_empty() {
        writer
            .write_record(columns.iter().map(|column| column.as_str()))
            .map_err(ApiError::render)?;
    }
    for record in &records {
        writer
            .write_record(columns.iter().map(|column| cell(record.get(*column))))
            .map_err(ApiError::render)?;
    }

    writer
        .into_inner()
        .map_err(|err| ApiError::render(err.into_error()))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apr_core::models::{AggregateRow, ReportParams};
    use axum::body::to_bytes;
    use serde_json::json;
    use time::macros::datetime;

    fn options(query: &[(&str, &str)]) -> RequestOptions {
        let mut params = ReportParams {
            date: Some("2021-01-05".to_string()),
            ..Default::default()
        };
        for (key, value) in query {
            let value = Some(value.to_string());
            match *key {
                "accounts" => params.accounts = value,
                "payments" => params.payments = value,
                "format" => params.format = value,
                _ => unreachable!(),
            }
        }
        RequestOptions::resolve(&params, datetime!(2021-01-06 0:00 UTC)).unwrap()
    }

    fn page() -> AggregatePage {
        let row = |account: &str, extra: Value| -> AggregateRow {
            let mut value = json!({
                "account": account,
                "receiving_counterparties": ["rB", "rC"],
                "sending_counterparties": ["rD"],
                "payments": [{ "amount": "1.50", "currency": "USD" }],
                "high_value_received": "0",
                "high_value_sent": "0",
                "total_value_received": "1.5",
                "total_value_sent": "0",
                "total_value": "1.5"
            });
            if let (Value::Object(base), Value::Object(extra)) = (&mut value, extra) {
                base.extend(extra);
            }
            serde_json::from_value(value).unwrap()
        };
        AggregatePage {
            rows: vec![
                row("rA", json!({})),
                row("rE", json!({ "payments_sent": 3 })),
            ],
            marker: Some("next".to_string()),
        }
    }

    async fn body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn json_envelope() {
        let response = render(&options(&[]), page(), None).unwrap();
        assert!(response.headers().get(header::LINK).is_none());

        let value: Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(value["result"], "success");
        assert_eq!(value["date"], "2021-01-05T00:00:00Z");
        assert_eq!(value["count"], 2);
        assert_eq!(value["marker"], "next");
        assert_eq!(value["reports"][0]["receiving_counterparties"], 2);
        assert_eq!(value["reports"][1]["payments_sent"], 3);
    }

    #[tokio::test]
    async fn json_without_marker() {
        let page = AggregatePage {
            marker: None,
            ..page()
        };
        let value: Value =
            serde_json::from_str(&body(render(&options(&[]), page, None).unwrap()).await).unwrap();
        assert!(value.get("marker").is_none());
    }

    #[tokio::test]
    async fn csv_with_accounts() {
        let link = HeaderValue::from_static("</reports/2021-01-05?marker=next>; rel=\"next\"");
        let response = render(
            &options(&[("format", "csv"), ("accounts", "true"), ("payments", "true")]),
            page(),
            Some(link.clone()),
        )
        .unwrap();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"account reports 2021-01-05.csv\""
        );
        assert_eq!(response.headers()[header::LINK], link);

        let text = body(response).await;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "account,receiving_counterparties,sending_counterparties,payments,\
                 high_value_received,high_value_sent,total_value_received,total_value_sent,\
                 total_value,payments_sent"
            )
        );
        assert_eq!(
            lines.next(),
            Some(r#"rA,"rB, rC",rD,"[{""amount"":""1.5"",""currency"":""USD""}]",0,0,1.5,0,1.5,"#)
        );
        assert_eq!(
            lines.next(),
            Some(r#"rE,"rB, rC",rD,"[{""amount"":""1.5"",""currency"":""USD""}]",0,0,1.5,0,1.5,3"#)
        );
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn csv_counts() {
        let response = render(&options(&[("format", "CSV")]), page(), None).unwrap();
        let text = body(response).await;
        assert_eq!(text.lines().nth(1), Some("rA,2,1,0,0,1.5,0,1.5,"));
    }

    #[tokio::test]
    async fn csv_empty_page() {
        let page = AggregatePage::default();
        let response = render(&options(&[("format", "csv")]), page, None).unwrap();
        assert_eq!(body(response).await, "");
    }
}
