//! REST API endpoints for account payment reports.
//!
//! A report lists, for one day, the aggregated payment activity of every
//! account, one page at a time.

use crate::{
    ApiApplication,
    config::AxumConfig,
    error::{ApiError, ErrorResponse},
    extract::{ReportQuery, RequestTarget},
    response::{ReportsResponse, render},
};
use aide::{
    axum::{ApiRouter, routing::get_with},
    transform::TransformOperation,
};
use apr_core::{
    models::{AggregateQuery, ReportParams, RequestOptions},
    ports::AggregateRepository as _,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;

/// Path parameter for the dated endpoint.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct Day {
    /// The requested day, e.g. `2021-01-05`
    date: String,
}

/// Creates a router with report endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/reports",
            get_with(get_todays_reports::<T>, get_todays_reports_docs),
            |route| route.tag("reports"),
        )
        .api_route_with(
            "/reports/{date}",
            get_with(get_reports::<T>, get_reports_docs),
            |route| route.tag("reports"),
        )
}

/// Retrieve the account payment reports of a day.
///
/// # Returns
///
/// - `200 OK`: A JSON envelope, or a CSV file when `format=csv`
/// - `400 Bad Request`: The date could not be parsed, or the store rejected the marker
/// - `500 Internal Server Error`: The store failed
async fn get_reports<T: ApiApplication>(
    State(app): State<T>,
    Extension(config): Extension<Arc<AxumConfig>>,
    target: RequestTarget,
    Path(Day { date }): Path<Day>,
    ReportQuery(params): ReportQuery,
) -> Result<Response, ApiError> {
    let params = ReportParams {
        date: Some(date),
        ..params
    };
    reports(&app, &config, target, params).await
}

/// Retrieve the account payment reports of the current day, unless a `date`
/// query parameter names another one.
async fn get_todays_reports<T: ApiApplication>(
    State(app): State<T>,
    Extension(config): Extension<Arc<AxumConfig>>,
    target: RequestTarget,
    ReportQuery(params): ReportQuery,
) -> Result<Response, ApiError> {
    reports(&app, &config, target, params).await
}

async fn reports<T: ApiApplication>(
    app: &T,
    config: &AxumConfig,
    target: RequestTarget,
    params: ReportParams,
) -> Result<Response, ApiError> {
    let options = RequestOptions::resolve_with(&params, app.now(), config.limit_policy())?;
    tracing::info!(start = %options.start, end = %options.end, "account reports");

    let page = app
        .database()
        .get_aggregate_account_payments(AggregateQuery::from(&options))
        .await?;

    let link = page
        .marker
        .as_deref()
        .and_then(|marker| target.next_link(config.base_url.as_deref(), marker));

    render(&options, page, link)
}

fn get_reports_docs(op: TransformOperation) -> TransformOperation<'_> {
    op.summary("Account payment reports")
        .description(
            r#"
            Aggregated payment activity of every account for the given day.

            By default counterparties are reported as counts and itemized payments
            are omitted; `accounts=true` (or `counterparties=true`) and
            `payments=true` include them. `format=csv` returns a file download.
            When more rows exist, a `Link` header with `rel="next"` points at the
            next page.
            "#,
        )
        .response_with::<200, Json<ReportsResponse>, _>(|res| {
            res.description("A page of reports (or a CSV file when `format=csv`)")
        })
        .response_with::<400, Json<ErrorResponse>, _>(|res| {
            res.description("Invalid date format, or a rejected marker")
        })
        .response_with::<500, Json<ErrorResponse>, _>(|res| {
            res.description("The aggregation store failed")
        })
}

fn get_todays_reports_docs(op: TransformOperation) -> TransformOperation<'_> {
    get_reports_docs(op).summary("Account payment reports for today")
}
