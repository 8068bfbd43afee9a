use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses calendar dates from the variety of formats found in source CSVs.
pub struct DateParser;

impl DateParser {
    /// Attempt to parse a date string.
    ///
    /// Handles RFC 3339 timestamps (the date part is kept), common
    /// date-time patterns, and date-only forms in ISO, day-first and
    /// month-first order. Ambiguous `dd/mm` vs `mm/dd` strings resolve
    /// day-first.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        debug!("DateParser: could not parse date string \"{}\"", s);
        None
    }
}

// ── ListParser ────────────────────────────────────────────────────────────────

/// Parses list-valued CSV fields such as `"['Swimming', 'Diving']"`.
pub struct ListParser;

impl ListParser {
    /// Split a list literal or comma-separated text into trimmed, non-empty
    /// items.
    ///
    /// Bracketed values yield their quoted items; an unquoted bracket body
    /// or plain text is split on commas.
    pub fn parse(raw: &str) -> Vec<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        if let Some(body) = trimmed.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
            let quoted: Vec<String> = quoted_item_re()
                .captures_iter(body)
                .filter_map(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !quoted.is_empty() || body.trim().is_empty() {
                return quoted;
            }
            return split_commas(body);
        }

        split_commas(trimmed)
    }
}

fn split_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn quoted_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("static regex"))
}

// ── CoachCleaner ──────────────────────────────────────────────────────────────

/// Normalises free-text coach entries.
pub struct CoachCleaner;

impl CoachCleaner {
    /// Strip a leading `Personal:` / `National -` role prefix and any
    /// `(XXX)` NOC suffix. Returns `None` when nothing remains.
    pub fn clean(raw: &str) -> Option<String> {
        let without_prefix = role_prefix_re().replace(raw, "");
        let without_noc = noc_suffix_re().replace_all(&without_prefix, "");
        let cleaned = without_noc.trim();
        (!cleaned.is_empty()).then(|| cleaned.to_string())
    }

    /// Clean and de-duplicate a coach list, preserving first-seen order.
    pub fn clean_all<I, S>(raw: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        raw.into_iter()
            .filter_map(|c| Self::clean(c.as_ref()))
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }
}

fn role_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(personal|national)\s*[:\-]\s*").expect("static regex"))
}

fn noc_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([A-Z]{3}\)").expect("static regex"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_parser_formats() {
        assert_eq!(DateParser::parse("2024-07-27"), Some(ymd(2024, 7, 27)));
        assert_eq!(DateParser::parse("2024-07-27 14:30:00"), Some(ymd(2024, 7, 27)));
        assert_eq!(DateParser::parse("2024-07-27T14:30:00+02:00"), Some(ymd(2024, 7, 27)));
        assert_eq!(DateParser::parse("27/07/2024"), Some(ymd(2024, 7, 27)));
        assert_eq!(DateParser::parse("07/27/2024"), Some(ymd(2024, 7, 27)));
        assert_eq!(DateParser::parse(" 1996-12-01 "), Some(ymd(1996, 12, 1)));
    }

    #[test]
    fn test_date_parser_rejects_garbage() {
        assert_eq!(DateParser::parse(""), None);
        assert_eq!(DateParser::parse("yesterday"), None);
        assert_eq!(DateParser::parse("2024-13-45"), None);
    }

    #[test]
    fn test_list_parser_literal() {
        assert_eq!(ListParser::parse("['Swimming']"), vec!["Swimming"]);
        assert_eq!(
            ListParser::parse("['Artistic Swimming', \"Diving\"]"),
            vec!["Artistic Swimming", "Diving"]
        );
        assert!(ListParser::parse("[]").is_empty());
    }

    #[test]
    fn test_list_parser_plain_text() {
        assert_eq!(ListParser::parse("Rowing, Canoe Sprint"), vec!["Rowing", "Canoe Sprint"]);
        assert_eq!(ListParser::parse("[Rowing, Sailing]"), vec!["Rowing", "Sailing"]);
        assert!(ListParser::parse("  ").is_empty());
    }

    #[test]
    fn test_coach_cleaner_strips_prefix_and_noc() {
        assert_eq!(CoachCleaner::clean("Personal: BOWMAN Bob (USA)").as_deref(), Some("BOWMAN Bob"));
        assert_eq!(CoachCleaner::clean("national - DUPONT Anne").as_deref(), Some("DUPONT Anne"));
        assert_eq!(CoachCleaner::clean("  LEE Min  ").as_deref(), Some("LEE Min"));
        assert_eq!(CoachCleaner::clean("Personal: (FRA)"), None);
    }

    #[test]
    fn test_coach_cleaner_dedupes_in_order() {
        let coaches = CoachCleaner::clean_all(["B (USA)", "A", "Personal: B", ""]);
        assert_eq!(coaches, vec!["B", "A"]);
    }
}
