//! Reference scanner for the `log="..."` segment, used by the extractor tests
//! to cross-check the compiled pattern.
//!
//! Matches exactly what [`LOG_SEGMENT_PATTERN`](super::LOG_SEGMENT_PATTERN)
//! matches: a backslash escapes the following character (except a newline),
//! and the segment ends at the first unescaped double quote.
//!
//! Every byte is visited at most once across all candidate starts, so the
//! scan stays linear in the line length.

const MARKER: &str = "log=\"";

enum Scan {
    Closed(usize),
    Failed(usize),
}

/// Return the still-escaped content of the first complete `log="..."` segment.
pub(super) fn find_log_segment(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = line[search_from..].find(MARKER) {
        let start = search_from + offset + MARKER.len();
        match scan_quoted(bytes, start) {
            Scan::Closed(end) => return Some(&line[start..end]),
            // A later marker inside the scanned range would have closed this
            // candidate, so resuming at the failure point loses nothing.
            Scan::Failed(at) => search_from = at,
        }
    }

    None
}

fn scan_quoted(bytes: &[u8], start: usize) -> Scan {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Scan::Closed(i),
            b'\\' => match bytes.get(i + 1) {
                None | Some(b'\n') => return Scan::Failed(i + 1),
                Some(_) => i += 2,
            },
            _ => i += 1,
        }
    }
    Scan::Failed(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_segment() {
        assert_eq!(
            find_log_segment(r#"<189>date=2024 log="devid=FW1 srcip=1.2.3.4" tail"#),
            Some("devid=FW1 srcip=1.2.3.4")
        );
    }

    #[test]
    fn test_escaped_quotes_do_not_terminate() {
        assert_eq!(
            find_log_segment(r#"log="devname=FW-\"A\" srcip=1.2.3.4" rest="x""#),
            Some(r#"devname=FW-\"A\" srcip=1.2.3.4"#)
        );
    }

    #[test]
    fn test_first_segment_wins() {
        assert_eq!(find_log_segment(r#"log="a=1" log="b=2""#), Some("a=1"));
    }

    #[test]
    fn test_missing_or_unterminated() {
        assert_eq!(find_log_segment("plain syslog line"), None);
        assert_eq!(find_log_segment(r#"log="never closed"#), None);
        assert_eq!(find_log_segment(r#"log=unquoted"#), None);
    }

    #[test]
    fn test_trailing_lone_backslash() {
        assert_eq!(find_log_segment(r#"log="abc\"#), None);
        assert_eq!(find_log_segment("log=\"abc\\"), None);
    }

    #[test]
    fn test_backslash_newline_resumes_search() {
        assert_eq!(find_log_segment("log=\"a\\\nlog=\"b=2\""), Some("b=2"));
    }

    #[test]
    fn test_multibyte_after_backslash() {
        assert_eq!(find_log_segment("log=\"k=\\é v\" x"), Some("k=\\é v"));
    }

    #[test]
    fn test_pathological_input_terminates() {
        let line = "log=\"".repeat(20_000);
        // The second marker's quote closes the first candidate.
        assert_eq!(find_log_segment(&line), Some("log="));

        let escaped = format!("log=\"{}", "\\\"".repeat(50_000));
        assert_eq!(find_log_segment(&escaped), None);
    }
}
