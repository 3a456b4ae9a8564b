// Extraction of key=value fields from the `log="..."` alert segment
use super::regex_error::RegexError;
use crate::domain::FieldMap;
use regex::Regex;
use std::sync::OnceLock;

/// Quoted segment whose content may carry backslash-escaped quotes.
pub const LOG_SEGMENT_PATTERN: &str = r#"log="((?:[^"\\]|\\.)*)""#;

const PATTERN_NAME: &str = "log_segment";

static SHARED: OnceLock<Result<LogFieldExtractor, RegexError>> = OnceLock::new();

/// Locates the first `log="..."` segment in a line and splits it into fields.
///
/// The `regex` crate guarantees linear-time matching, so hostile lines with
/// long runs of backslashes cannot stall a listener.
#[derive(Debug, Clone)]
pub struct LogFieldExtractor {
    pattern: Regex,
}

impl LogFieldExtractor {
    pub fn try_new() -> Result<Self, RegexError> {
        Ok(Self {
            pattern: compile(LOG_SEGMENT_PATTERN)?,
        })
    }

    /// Process-wide extractor, compiled on first use.
    pub fn shared() -> Result<&'static Self, RegexError> {
        SHARED
            .get_or_init(Self::try_new)
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Raw (still escaped) content of the first segment, if any.
    pub fn segment<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Fields from the first segment; `None` when the line has no segment.
    pub fn extract(&self, line: &str) -> Option<FieldMap> {
        self.segment(line).map(parse_segment)
    }
}

fn compile(pattern: &str) -> Result<Regex, RegexError> {
    Regex::new(pattern).map_err(|source| RegexError::CompilationFailed {
        pattern: pattern.to_string(),
        name: PATTERN_NAME.to_string(),
        source,
    })
}

/// Extract fields using the process-wide extractor.
pub fn extract_fields(line: &str) -> Result<Option<FieldMap>, RegexError> {
    Ok(LogFieldExtractor::shared()?.extract(line))
}

/// Split segment content into fields.
///
/// `\"` becomes `"` first, then the content is split on whitespace and each
/// token on its first `=`. Tokens without `=` are ignored. A leading quote is
/// dropped from the value, and a trailing one only together with it.
pub fn parse_segment(content: &str) -> FieldMap {
    let unescaped = content.replace("\\\"", "\"");
    let mut fields = FieldMap::new();

    for token in unescaped.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            fields.insert(key, trim_quotes(value));
        }
    }

    fields
}

fn trim_quotes(value: &str) -> &str {
    match value.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').unwrap_or(inner),
        None => value,
    }
}
