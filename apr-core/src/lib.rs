#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the apr-core crate.
//! [apr_core]: https://docs.rs/apr_core/latest/apr_core/index.html
//! [apr_axum]: https://docs.rs/apr_axum/latest/apr_axum/index.html
//! [apr_sqlite]: https://docs.rs/apr_sqlite/latest/apr_sqlite/index.html
#![doc = include_str!("../README.md")]

/// Domain models for account payment reports.
///
/// This module contains the resolved request options, the aggregate rows
/// produced by a store, and the shaped rows returned to callers. The models
/// carry a little logic (resolution and shaping) but never perform I/O.
pub mod models;

/// Interface traits for account payment reports.
///
/// These are the "ports" in the hexagonal architecture pattern: the contract
/// between the request pipeline and the aggregation store that backs it.
pub mod ports;
