use crate::error::AnalyzerError;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Apache common-log timestamp, e.g. `10/Oct/2000:13:55:36 -0700`.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

// Anchored at line start only; combined-format trailers (referer, agent) are ignored.
static LOG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^(?P<remote_addr>\S+) \S+ \S+ \[.*?\] "#,
        r#""(?P<request_method>\S+) (?P<request_uri>\S+) \S+" "#,
        r#"(?P<status_code>\d{3}) (?P<response_size>\d+|-)"#,
    ))
    .unwrap()
});

// `\r\n`, lone `\r` and `\n` all end a line.
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Text between the first `[` on the line and the next `]`.
fn bracketed_timestamp(line: &str) -> Option<&str> {
    let rest = line.split_once('[')?.1;
    Some(rest.split_once(']').map_or(rest, |(ts, _)| ts))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub line_number: usize,
    pub remote_addr: String,
    pub timestamp: DateTime<FixedOffset>,
    pub request_method: String,
    pub request_uri: String,
    pub status_code: u16,
    pub response_size: u64,
}

/// What to do with a line that matches the pattern but carries an unparseable timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Drop the line, same as a non-matching one.
    #[default]
    Skip,
    /// Fail the whole file. The timestamp is always read from the first `[...]` on the line,
    /// so a `[` inside the address, ident or user field also fails here.
    Abort,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOpts {
    pub timestamp_policy: TimestampPolicy,
}

#[derive(Debug)]
pub enum LineOutcome {
    Record(LogRecord),
    NoMatch,
    BadTimestamp { value: String, error: chrono::ParseError },
}

pub fn parse_line(line: &str, line_number: usize) -> LineOutcome {
    let caps = match LOG_PATTERN.captures(line) {
        Some(c) => c,
        None => return LineOutcome::NoMatch,
    };

    let status_code = match caps["status_code"].parse::<u16>() {
        Ok(code) if (100..=599).contains(&code) => code,
        _ => return LineOutcome::NoMatch,
    };
    let response_size = match &caps["response_size"] {
        "-" => 0,
        s => match s.parse::<u64>() {
            Ok(n) => n,
            Err(_) => return LineOutcome::NoMatch,
        },
    };

    let raw_ts = bracketed_timestamp(line).unwrap_or_default();
    let timestamp = match DateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT) {
        Ok(t) => t,
        Err(error) => {
            return LineOutcome::BadTimestamp { value: raw_ts.to_string(), error };
        }
    };

    LineOutcome::Record(LogRecord {
        line_number,
        remote_addr: caps["remote_addr"].to_string(),
        timestamp,
        request_method: caps["request_method"].to_string(),
        request_uri: caps["request_uri"].to_string(),
        status_code,
        response_size,
    })
}

/// Parse every line from `reader`. Any read or decode error fails the whole batch.
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    opts: &ParseOpts,
) -> Result<Vec<LogRecord>, AnalyzerError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut out = Vec::new();
    for (idx, line) in LINE_BREAK.split(&text).enumerate() {
        let line_number = idx + 1;
        match parse_line(line, line_number) {
            LineOutcome::Record(rec) => out.push(rec),
            LineOutcome::NoMatch => {}
            LineOutcome::BadTimestamp { value, error } => match opts.timestamp_policy {
                TimestampPolicy::Skip => {}
                TimestampPolicy::Abort => {
                    return Err(AnalyzerError::Timestamp { line_number, value, source: error });
                }
            },
        }
    }
    Ok(out)
}

pub fn parse_file(path: &Path, opts: &ParseOpts) -> Result<Vec<LogRecord>, AnalyzerError> {
    if !path.is_file() {
        return Err(AnalyzerError::FileNotFound { path: path.to_path_buf() });
    }
    let f = File::open(path)?;
    parse_reader(BufReader::new(f), opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_ignores_combined_format_trailer() {
        let line = concat!(
            r#"10.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /a.gif HTTP/1.0" 200 2326 "#,
            r#""http://example.com/" "Mozilla/4.08""#,
        );
        match parse_line(line, 3) {
            LineOutcome::Record(r) => {
                assert_eq!(r.line_number, 3);
                assert_eq!(r.request_uri, "/a.gif");
                assert_eq!(r.response_size, 2326);
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn pattern_is_anchored_at_line_start() {
        let line = r#"  10.0.0.1 - - [10/Oct/2000:13:55:36 -0700] "GET / HTTP/1.0" 200 1"#;
        assert!(matches!(parse_line(line, 1), LineOutcome::NoMatch));
    }

    #[test]
    fn status_outside_http_range_is_no_match() {
        for code in ["000", "099", "600", "999"] {
            let line =
                format!(r#"1.2.3.4 - - [10/Oct/2000:13:55:36 -0700] "GET / HTTP/1.1" {code} 10"#);
            assert!(matches!(parse_line(&line, 1), LineOutcome::NoMatch), "code {code}");
        }
    }

    #[test]
    fn oversized_response_size_is_no_match() {
        let line = concat!(
            r#"1.2.3.4 - - [10/Oct/2000:13:55:36 -0700] "GET / HTTP/1.1" 200 "#,
            "99999999999999999999999",
        );
        assert!(matches!(parse_line(line, 1), LineOutcome::NoMatch));
    }

    #[test]
    fn bad_timestamp_is_reported_with_raw_value() {
        let line = r#"1.2.3.4 - - [yesterday] "GET / HTTP/1.1" 200 10"#;
        match parse_line(line, 1) {
            LineOutcome::BadTimestamp { value, .. } => assert_eq!(value, "yesterday"),
            other => panic!("expected bad timestamp, got {other:?}"),
        }
    }

    #[test]
    fn timestamp_comes_from_first_bracket_on_line() {
        assert_eq!(bracketed_timestamp("a [b] [c]"), Some("b"));
        assert_eq!(bracketed_timestamp("us[er [10/Oct/2000] x"), Some("er "));
        assert_eq!(bracketed_timestamp("open [ended"), Some("ended"));
        assert_eq!(bracketed_timestamp("none"), None);
    }
}
