use apr_core::{
    models::{AggregatePage, AggregateQuery},
    ports::{AggregateRepository, Application, FetchError},
};
use std::{
    io,
    sync::{Arc, Mutex},
};
use time::{OffsetDateTime, macros::datetime};

/// What the stub store answers with.
#[derive(Clone)]
pub enum Answer {
    Page(AggregatePage),
    Status(u16, &'static str),
    Internal(&'static str),
}

// A stand-in aggregation store that replays a fixed answer and records
// every query it receives.
#[derive(Clone)]
pub struct TestApp {
    answer: Answer,
    queries: Arc<Mutex<Vec<AggregateQuery>>>,
}

impl TestApp {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            queries: Default::default(),
        }
    }

    pub fn queries(&self) -> Vec<AggregateQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl AggregateRepository for TestApp {
    async fn get_aggregate_account_payments(
        &self,
        query: AggregateQuery,
    ) -> Result<AggregatePage, FetchError> {
        self.queries.lock().unwrap().push(query);
        match &self.answer {
            Answer::Page(page) => Ok(page.clone()),
            Answer::Status(code, message) => Err(FetchError::status(*code, *message)),
            Answer::Internal(message) => Err(FetchError::internal(io::Error::other(*message))),
        }
    }
}

impl Application for TestApp {
    type Repository = Self;

    fn database(&self) -> &Self::Repository {
        self
    }

    fn now(&self) -> OffsetDateTime {
        datetime!(2024-03-10 15:30:45 UTC)
    }
}
