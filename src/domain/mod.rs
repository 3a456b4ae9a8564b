//! Domain layer for quarantine-relay.
//!
//! Contains the canonical types shared across all modules:
//! - `RawLine`: one inbound syslog line with its transport and peer
//! - `FieldMap`: key/value pairs pulled from a `log="..."` segment
//! - `QuarantineRequest` / `DispatchOutcome`: the outbound call and its result
//! - `RelayError`: Top-level error type

pub mod error;
pub mod fields;
pub mod quarantine;
pub mod raw_line;

pub use error::RelayError;
pub use fields::FieldMap;
pub use quarantine::{DispatchOutcome, QuarantineRequest};
pub use raw_line::{RawLine, Transport};
