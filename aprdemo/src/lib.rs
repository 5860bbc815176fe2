#![warn(missing_docs)]
// Note: this overwrites the links in the README to point to the rust docs of the sibling crates.
//! [apr_axum]: https://docs.rs/apr_axum/latest/apr_axum/index.html
//! [apr_sqlite]: https://docs.rs/apr_sqlite/latest/apr_sqlite/index.html
#![doc = include_str!("../README.md")]

pub mod impls;

mod import;
pub use import::{ImportDocument, import_document, import_file};

mod cli;
pub use cli::{Cli, Commands};

mod config;
pub use config::AppConfig;
