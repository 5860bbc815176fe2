use crate::models::{AggregatePage, AggregateQuery};
use std::future::Future;
use thiserror::Error;

/// Why an aggregation store could not answer a query.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A structured failure carrying an HTTP-style status code, e.g. a
    /// malformed continuation marker (400)
    #[error("{message}")]
    Status {
        /// HTTP-style status code
        code: u16,
        /// Description of the failure
        message: String,
    },

    /// Anything else: connectivity, storage or decoding problems
    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    /// Construct a structured failure.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error as an internal failure.
    pub fn internal(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Internal(err.into())
    }

    /// The status code, if the failure carries one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Internal(_) => None,
        }
    }
}

/// Repository interface for pre-computed account payment aggregates.
///
/// Implementations own the computation and storage of the aggregates; this
/// trait only describes how a page of them is looked up.
pub trait AggregateRepository {
    /// Retrieve a page of account payment aggregates.
    ///
    /// Rows dated within `query.start ..= query.end` are returned, at most
    /// `query.limit` of them, resuming after `query.marker` when present.
    /// A marker is returned when further rows exist.
    fn get_aggregate_account_payments(
        &self,
        query: AggregateQuery,
    ) -> impl Future<Output = Result<AggregatePage, FetchError>> + Send;
}
