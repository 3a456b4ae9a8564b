// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Millisecond totals fit in u64
    clippy::missing_errors_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. ListenerError in listener module
    clippy::must_use_candidate
)]

pub mod app;
pub mod buffer;
pub mod domain;
pub mod listener;
pub mod parser;
pub mod sender;

pub use app::{App, Config};
pub use domain::RelayError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
