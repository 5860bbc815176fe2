use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, macros::format_description,
};

/// Page size used when the caller supplies none, or something that is not a number.
pub const DEFAULT_LIMIT: i64 = 200;

/// Largest page size a caller may ask for.
pub const MAX_LIMIT: i64 = 1000;

/// The raw, unvalidated parameters of a report request.
///
/// Every field is kept as the text the caller sent. Nothing is interpreted
/// until [`RequestOptions::resolve`] runs.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportParams {
    /// The requested day, e.g. `2021-01-05` (the path segment takes precedence)
    #[serde(default)]
    pub date: Option<String>,
    /// Return the full counterparty lists instead of their counts (`true` to enable)
    #[serde(default)]
    pub accounts: Option<String>,
    /// Include the itemized payments of every row (`true` to enable)
    #[serde(default)]
    pub payments: Option<String>,
    /// Alias of `accounts`
    #[serde(default)]
    pub counterparties: Option<String>,
    /// Page size, at most 1000
    #[serde(default)]
    pub limit: Option<String>,
    /// Continuation marker returned by a previous page
    #[serde(default)]
    pub marker: Option<String>,
    /// `json` (default) or `csv`
    #[serde(default)]
    pub format: Option<String>,
}

/// The two response shapes a report can take.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// A JSON envelope; also the fallback for any unrecognized value
    #[default]
    Json,
    /// A CSV file download
    Csv,
}

impl Format {
    /// Interpret a raw `format` value. Only `csv` (in any case) selects CSV.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::to_lowercase).as_deref() {
            Some("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Bounds applied to the requested page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Used when no numeric limit is supplied
    pub default: i64,
    /// Larger requests are clamped to this value
    pub max: i64,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            default: DEFAULT_LIMIT,
            max: MAX_LIMIT,
        }
    }
}

impl LimitPolicy {
    /// Resolve a raw `limit` value.
    ///
    /// Decimal, exponent and `0x`/`0o`/`0b` prefixed integer forms are
    /// accepted. Non-positive values are passed through untouched; it is up
    /// to the aggregation store to accept or reject them.
    pub fn resolve(&self, raw: Option<&str>) -> i64 {
        let parsed = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(parse_number)
            .filter(|n| !n.is_nan());

        match parsed {
            None => self.default,
            Some(n) if n > self.max as f64 => self.max,
            Some(n) => n.trunc() as i64,
        }
    }
}

/// A request parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// HTTP-style status code describing the failure
    pub code: u16,
    /// Human readable description, safe to return to the caller
    pub message: String,
}

impl ValidationError {
    /// The requested date could not be parsed.
    pub fn invalid_date() -> Self {
        Self {
            code: 400,
            message: "invalid date format".to_string(),
        }
    }
}

/// Fully resolved options for a single report request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOptions {
    /// Start of the requested day (UTC)
    pub start: OffsetDateTime,
    /// The requested instant at second granularity; inclusive upper bound
    pub end: OffsetDateTime,
    /// Return full counterparty lists rather than counts
    pub accounts: bool,
    /// Keep the itemized payments of every row
    pub payments: bool,
    /// Page size
    pub limit: i64,
    /// Continuation marker from a previous page
    pub marker: Option<String>,
    /// Response shape
    pub format: Format,
}

impl RequestOptions {
    /// Resolve raw parameters with the default page size bounds.
    ///
    /// `now` stands in for the date when the request names none; a date that
    /// is present but unparseable is always an error.
    pub fn resolve(params: &ReportParams, now: OffsetDateTime) -> Result<Self, ValidationError> {
        Self::resolve_with(params, now, LimitPolicy::default())
    }

    /// Resolve raw parameters, bounding the page size by `policy`.
    pub fn resolve_with(
        params: &ReportParams,
        now: OffsetDateTime,
        policy: LimitPolicy,
    ) -> Result<Self, ValidationError> {
        let instant = match params.date.as_deref() {
            Some(raw) => parse_date(raw).ok_or_else(ValidationError::invalid_date)?,
            None => now.to_offset(UtcOffset::UTC),
        };

        let accounts = is_true(params.accounts.as_deref())
            || is_true(params.counterparties.as_deref());

        Ok(Self {
            start: instant.replace_time(Time::MIDNIGHT),
            end: instant - Duration::nanoseconds(instant.nanosecond().into()),
            accounts,
            payments: is_true(params.payments.as_deref()),
            limit: policy.resolve(params.limit.as_deref()),
            marker: params.marker.clone(),
            format: Format::from_param(params.format.as_deref()),
        })
    }

    /// The calendar day of the request, e.g. `2021-01-05`
    pub fn day(&self) -> Date {
        self.start.date()
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| raw.strip_prefix(prefix).map(|digits| (digits, radix)));

    match prefixed {
        // Unsigned digits only; anything too large for u64 is clamped later anyway
        Some((digits, radix)) => (!digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
            .then(|| u64::from_str_radix(digits, radix).map_or(f64::INFINITY, |n| n as f64)),
        None => raw.parse().ok(),
    }
}

fn is_true(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Parse a requested date into a UTC instant.
///
/// Accepts RFC 3339 date-times, offset-less date-times (taken as UTC),
/// `YYYY-MM-DD` and `YYYYMMDD`.
fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    use time::format_description::well_known::Rfc3339;

    let raw = raw.trim();

    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value.to_offset(UtcOffset::UTC));
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value.assume_utc());
    }

    let calendar = if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..])
    } else {
        raw.to_string()
    };

    Date::parse(&calendar, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
