use super::RequestOptions;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// One account's summarized payment activity for a day, as computed by the
/// aggregation store.
///
/// Values are arbitrary-precision decimals, kept digit for digit. Stores
/// should hand them over as strings (`"1e-90"` is fine); a JSON float cannot
/// be recovered exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// The subject account
    pub account: String,
    /// Accounts that received payments from the subject account
    #[serde(default)]
    pub receiving_counterparties: Vec<String>,
    /// Accounts that sent payments to the subject account
    #[serde(default)]
    pub sending_counterparties: Vec<String>,
    /// The itemized payments
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Value of the high-value payments received
    pub high_value_received: BigDecimal,
    /// Value of the high-value payments sent
    pub high_value_sent: BigDecimal,
    /// Value of all payments received
    pub total_value_received: BigDecimal,
    /// Value of all payments sent
    pub total_value_sent: BigDecimal,
    /// Value of all payments
    pub total_value: BigDecimal,
    /// Any further statistics the store computes, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An itemized payment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// The payment amount
    pub amount: BigDecimal,
    /// Remaining payment fields (currency, issuer, hashes...), passed through untouched
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// The subset of [`RequestOptions`] an aggregation store needs to answer a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateQuery {
    /// Inclusive lower bound
    pub start: OffsetDateTime,
    /// Inclusive upper bound, second granularity
    pub end: OffsetDateTime,
    /// Whether the caller will see full counterparty lists
    pub accounts: bool,
    /// Whether the caller will see itemized payments
    pub payments: bool,
    /// Requested page size
    pub limit: i64,
    /// Continuation marker from a previous page
    pub marker: Option<String>,
}

impl From<&RequestOptions> for AggregateQuery {
    fn from(options: &RequestOptions) -> Self {
        Self {
            start: options.start,
            end: options.end,
            accounts: options.accounts,
            payments: options.payments,
            limit: options.limit,
            marker: options.marker.clone(),
        }
    }
}

/// A page of aggregate rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatePage {
    /// The rows, in store order
    pub rows: Vec<AggregateRow>,
    /// Present when more rows exist beyond this page
    pub marker: Option<String>,
}
