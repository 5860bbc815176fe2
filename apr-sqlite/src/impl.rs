//! Repository trait implementations for the SQLite database.

mod aggregate;
