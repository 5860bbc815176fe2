mod aggregate;
mod application;

pub use aggregate::{AggregateRepository, FetchError};
pub use application::Application;
