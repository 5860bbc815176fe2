mod aggregate;
mod options;
mod report;

pub use aggregate::{AggregatePage, AggregateQuery, AggregateRow, Payment};
pub use options::{
    DEFAULT_LIMIT, Format, LimitPolicy, MAX_LIMIT, ReportParams, RequestOptions, ValidationError,
};
pub use report::{Counterparties, ReportPayment, ReportRow};
