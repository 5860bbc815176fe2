use super::{AggregateRow, Payment, RequestOptions};
use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::{Map, Value};

/// Counterparties of a row, in whichever form the caller asked for.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(untagged))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Counterparties {
    /// The full list of accounts
    List(Vec<String>),
    /// How many accounts there are
    Count(usize),
    /// The accounts joined by `", "`, for tabular output
    Joined(String),
}

impl Counterparties {
    fn joined(self) -> Self {
        match self {
            Self::List(accounts) => Self::Joined(accounts.join(", ")),
            other => other,
        }
    }
}

/// An itemized payment with its amount in decimal string form.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportPayment {
    /// The payment amount, e.g. `"12.5"`
    pub amount: String,
    /// Remaining payment fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<&Payment> for ReportPayment {
    fn from(payment: &Payment) -> Self {
        Self {
            amount: decimal_string(&payment.amount),
            details: payment.details.clone(),
        }
    }
}

/// A row of the report as returned to the caller.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRow {
    /// The subject account
    pub account: String,
    /// Receiving counterparties, or their count
    pub receiving_counterparties: Counterparties,
    /// Sending counterparties, or their count
    pub sending_counterparties: Counterparties,
    /// Itemized payments, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<ReportPayment>>,
    /// Value of the high-value payments received
    pub high_value_received: String,
    /// Value of the high-value payments sent
    pub high_value_sent: String,
    /// Value of all payments received
    pub total_value_received: String,
    /// Value of all payments sent
    pub total_value_sent: String,
    /// Value of all payments
    pub total_value: String,
    /// Further statistics from the store
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportRow {
    /// Build the output row for `row` according to the requested verbosity.
    ///
    /// Counterparty lists collapse to counts unless `accounts` was requested,
    /// payments are dropped unless `payments` was requested, and every
    /// decimal becomes its canonical string form.
    pub fn shape(row: &AggregateRow, options: &RequestOptions) -> Self {
        let counterparties = |accounts: &Vec<String>| {
            if options.accounts {
                Counterparties::List(accounts.clone())
            } else {
                Counterparties::Count(accounts.len())
            }
        };

        Self {
            account: row.account.clone(),
            receiving_counterparties: counterparties(&row.receiving_counterparties),
            sending_counterparties: counterparties(&row.sending_counterparties),
            payments: options
                .payments
                .then(|| row.payments.iter().map(ReportPayment::from).collect()),
            high_value_received: decimal_string(&row.high_value_received),
            high_value_sent: decimal_string(&row.high_value_sent),
            total_value_received: decimal_string(&row.total_value_received),
            total_value_sent: decimal_string(&row.total_value_sent),
            total_value: decimal_string(&row.total_value),
            extra: row.extra.clone(),
        }
    }

    /// Replace counterparty lists by `", "`-joined strings, since a CSV cell
    /// cannot hold a list. Counts are left alone.
    pub fn with_joined_counterparties(self) -> Self {
        Self {
            sending_counterparties: self.sending_counterparties.joined(),
            receiving_counterparties: self.receiving_counterparties.joined(),
            ..self
        }
    }
}

// Trailing zeros are dropped; the result never uses exponent notation.
fn decimal_string(value: &BigDecimal) -> String {
    value.normalized().to_plain_string()
}
