use super::AggregateRepository;
use time::OffsetDateTime;

/// Everything a report server needs from its host application.
pub trait Application {
    /// The aggregation store
    type Repository: AggregateRepository;

    /// Get a reference to the aggregation store
    fn database(&self) -> &Self::Repository;

    /// The current time, used when a request names no date
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
