//! The concrete application served by the demo binary.

use apr_core::ports::Application;
use apr_sqlite::Db;

/// Serves reports straight out of the SQLite store, with the wall clock
/// deciding what "today" is.
#[derive(Clone)]
pub struct DemoApp {
    /// Database connection for persistent storage
    pub db: Db,
}

impl Application for DemoApp {
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }
}
