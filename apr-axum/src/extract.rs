use aide::{generate::GenContext, openapi::Operation};
use apr_core::models::ReportParams;
use axum::{
    extract::{FromRequestParts, OriginalUri, Query},
    http::{HeaderValue, request::Parts},
};
use headers::{HeaderMapExt as _, Host};
use std::convert::Infallible;

/// Where a request was addressed, used to point pagination links back at
/// the same resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestTarget {
    pub host: Option<String>,
    pub path: String,
    pub query: Option<String>,
}

impl RequestTarget {
    /// A `Link` header value for the next page: the same request with
    /// `marker` substituted.
    pub fn next_link(&self, base_url: Option<&str>, marker: &str) -> Option<HeaderValue> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(self.query.as_deref().unwrap_or("").as_bytes())
        {
            if key != "marker" {
                query.append_pair(&key, &value);
            }
        }
        query.append_pair("marker", marker);

        let origin = match (base_url, &self.host) {
            (Some(base), _) => base.trim_end_matches('/').to_string(),
            (None, Some(host)) => format!("http://{host}"),
            (None, None) => String::new(),
        };

        let link = format!(
            "<{origin}{path}?{query}>; rel=\"next\"",
            path = self.path,
            query = query.finish()
        );

        HeaderValue::from_str(&link)
            .inspect_err(|err| tracing::warn!(%err, %link, "dropping unrepresentable link header"))
            .ok()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestTarget {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers rewrite `parts.uri`; the original is what the caller sent
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);

        let host = parts
            .headers
            .typed_get::<Host>()
            .map(|host| match host.port() {
                Some(port) => format!("{}:{}", host.hostname(), port),
                None => host.hostname().to_string(),
            });

        Ok(Self {
            host,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        })
    }
}

impl aide::OperationInput for RequestTarget {}

/// The report query parameters, read leniently: unknown keys are ignored and
/// a repeated key keeps its last value, so extraction never fails.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReportQuery(pub ReportParams);

impl ReportQuery {
    fn parse(query: &str) -> Self {
        let mut params = ReportParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "date" => &mut params.date,
                "accounts" => &mut params.accounts,
                "payments" => &mut params.payments,
                "counterparties" => &mut params.counterparties,
                "limit" => &mut params.limit,
                "marker" => &mut params.marker,
                "format" => &mut params.format,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        Self(params)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ReportQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}

impl aide::OperationInput for ReportQuery {
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        <Query<ReportParams> as aide::OperationInput>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportQuery, RequestTarget};

    fn target(host: Option<&str>, query: Option<&str>) -> RequestTarget {
        RequestTarget {
            host: host.map(str::to_string),
            path: "/reports/2021-01-05".to_string(),
            query: query.map(str::to_string),
        }
    }

    #[test]
    fn relative_without_host() {
        let link = target(None, None).next_link(None, "abc").unwrap();
        assert_eq!(link, "</reports/2021-01-05?marker=abc>; rel=\"next\"");
    }

    #[test]
    fn marker_is_substituted() {
        let link = target(Some("localhost:8080"), Some("limit=2&marker=old&format=csv"))
            .next_link(None, "1609804800|rB")
            .unwrap();
        assert_eq!(
            link,
            "<http://localhost:8080/reports/2021-01-05?limit=2&format=csv&marker=1609804800%7CrB>; rel=\"next\""
        );
    }

    #[test]
    fn base_url_wins() {
        let link = target(Some("internal:8080"), Some("accounts=true"))
            .next_link(Some("https://reports.example.com/"), "m")
            .unwrap();
        assert_eq!(
            link,
            "<https://reports.example.com/reports/2021-01-05?accounts=true&marker=m>; rel=\"next\""
        );
    }

    #[test]
    fn last_repeated_key_wins() {
        let ReportQuery(params) = ReportQuery::parse("limit=1&limit=2&format=csv&format=json");
        assert_eq!(params.limit.as_deref(), Some("2"));
        assert_eq!(params.format.as_deref(), Some("json"));
    }

    #[test]
    fn query_values_are_decoded() {
        let ReportQuery(params) =
            ReportQuery::parse("marker=1609804800%7CrB&accounts=TRUE&unknown=1&payments");
        assert_eq!(params.marker.as_deref(), Some("1609804800|rB"));
        assert_eq!(params.accounts.as_deref(), Some("TRUE"));
        assert_eq!(params.payments.as_deref(), Some(""));
        assert_eq!(params.limit, None);
    }
}
