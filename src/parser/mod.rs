pub mod log_field;
pub mod regex_error;
#[cfg(test)]
mod scanner;

pub use log_field::{LOG_SEGMENT_PATTERN, LogFieldExtractor, extract_fields, parse_segment};
pub use regex_error::RegexError;
