//! Typed extraction from normalised tables.
//!
//! Each function expects a table already passed through
//! [`crate::normalizer`] and converts rows into typed records. Rows with
//! malformed required values are dropped, not fatal; the number dropped is
//! reported in [`Extracted::dropped`].

use olympics_core::data_processors::{CoachCleaner, DateParser, ListParser};
use olympics_core::models::{Athlete, Event, MedalCounts, MedalTotal, MedalType, Medallist, NocInfo, OTHER_CONTINENT};
use olympics_core::table::{Cell, Table};
use tracing::{debug, warn};

/// Typed rows plus the count of rows that could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            dropped: 0,
        }
    }
}

/// One raw coach entry attached to an athlete id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachLink {
    pub athlete_id: String,
    pub coach: String,
}

/// Column accessor over one row of a normalised table.
struct RowView<'a> {
    table: &'a Table,
    row: usize,
}

impl<'a> RowView<'a> {
    fn cell(&self, col: &str) -> Option<&'a Cell> {
        self.table.value(self.row, col)
    }

    fn text(&self, col: &str) -> Option<String> {
        self.cell(col).and_then(|c| c.as_text()).map(|s| s.into_owned())
    }

    fn count(&self, col: &str) -> Option<u64> {
        self.cell(col).and_then(Cell::as_count)
    }

    fn number(&self, col: &str) -> Option<f64> {
        self.cell(col).and_then(Cell::as_f64)
    }

    /// `Ok(None)` when null, `Err(())` when present but unparseable.
    fn date(&self, col: &str) -> Result<Option<chrono::NaiveDate>, ()> {
        match self.text(col) {
            None => Ok(None),
            Some(raw) => DateParser::parse(&raw).map(Some).ok_or(()),
        }
    }
}

fn rows(table: &Table) -> impl Iterator<Item = RowView<'_>> + '_ {
    (0..table.len()).map(move |row| RowView { table, row })
}

fn log_dropped(dataset: &str, dropped: usize, total: usize) {
    if dropped > 0 {
        warn!(dataset, dropped, total, "dropped malformed rows");
    } else {
        debug!(dataset, total, "all rows converted");
    }
}

/// Medal totals. Needs the three canonical medal columns; without them no
/// row can be built and the result is empty.
pub fn medal_totals(table: &Table) -> Extracted<MedalTotal> {
    if !["gold", "silver", "bronze"].iter().all(|c| table.has_column(c)) {
        if !table.is_empty() {
            warn!("medal totals lack gold/silver/bronze columns; no rows extracted");
        }
        return Extracted::default();
    }

    let mut out = Extracted::default();
    for row in rows(table) {
        let (Some(gold), Some(silver), Some(bronze)) = (row.count("gold"), row.count("silver"), row.count("bronze")) else {
            out.dropped += 1;
            continue;
        };
        out.rows.push(MedalTotal {
            noc: row.text("noc"),
            country: row.text("country"),
            continent: row.text("continent").unwrap_or_else(|| OTHER_CONTINENT.to_string()),
            counts: MedalCounts::new(gold, silver, bronze),
        });
    }
    log_dropped("medals_total", out.dropped, table.len());
    out
}

/// Medallist results. Rows without a recognisable medal type, or with a
/// present but unparseable date, are dropped.
pub fn medallists(table: &Table) -> Extracted<Medallist> {
    let mut out = Extracted::default();
    for row in rows(table) {
        let Some(medal) = row.text("medal").and_then(|m| MedalType::parse_lenient(&m)) else {
            out.dropped += 1;
            continue;
        };
        let Ok(date) = row.date("date") else {
            out.dropped += 1;
            continue;
        };
        out.rows.push(Medallist {
            athlete_id: row.text("id"),
            name: row.text("name"),
            noc: row.text("noc"),
            sport: row.text("sport"),
            medal,
            date,
            gender: row.text("gender"),
            event: row.text("event"),
        });
    }
    log_dropped("medallists", out.dropped, table.len());
    out
}

/// Athlete roster. No row is dropped: a malformed birth date, height or
/// weight only clears that field.
pub fn athletes(table: &Table) -> Extracted<Athlete> {
    let mut out = Extracted::default();
    let mut bad_dates = 0usize;
    for row in rows(table) {
        let birth_date = row.date("birth_date").unwrap_or_else(|_| {
            bad_dates += 1;
            None
        });
        let coaches = row
            .text("coach")
            .map(|c| CoachCleaner::clean_all(c.split(',')))
            .unwrap_or_default();
        out.rows.push(Athlete {
            id: row.text("id"),
            name: row.text("name"),
            noc: row.text("noc"),
            country: row.text("country"),
            gender: row.text("gender"),
            birth_date,
            height: row.number("height").filter(|h| *h > 0.0),
            weight: row.number("weight").filter(|w| *w > 0.0),
            disciplines: row.text("disciplines").map(|d| ListParser::parse(&d)).unwrap_or_default(),
            coaches,
        });
    }
    if bad_dates > 0 {
        warn!(bad_dates, "athletes with unparseable birth dates");
    }
    out
}

/// Event catalog rows.
pub fn events(table: &Table) -> Extracted<Event> {
    let rows = rows(table)
        .map(|row| Event {
            sport: row.text("sport"),
            name: row.text("event"),
        })
        .collect();
    Extracted { rows, dropped: 0 }
}

/// Athlete → coach pairs from [`crate::normalizer::normalize_coach_links`]
/// output. Rows missing either side are dropped.
pub fn coach_links(table: &Table) -> Extracted<CoachLink> {
    let mut out = Extracted::default();
    for row in rows(table) {
        let (Some(athlete_id), Some(coach)) = (row.text("id"), row.text("coach")) else {
            out.dropped += 1;
            continue;
        };
        out.rows.push(CoachLink { athlete_id, coach });
    }
    log_dropped("coach_links", out.dropped, table.len());
    out
}

/// NOC metadata, first occurrence per code. Rows without a code are
/// dropped.
pub fn nocs(table: &Table) -> Extracted<NocInfo> {
    let mut out = Extracted::default();
    let mut seen = std::collections::HashSet::new();
    for row in rows(table) {
        let Some(noc) = row.text("noc") else {
            out.dropped += 1;
            continue;
        };
        if !seen.insert(noc.clone()) {
            continue;
        }
        out.rows.push(NocInfo {
            noc,
            country: row.text("country"),
            continent: row.text("continent"),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_medal_totals_drops_malformed_counts() {
        let table = Table::from_rows(
            &["noc", "gold", "silver", "bronze", "country", "continent"],
            &[&["USA", "10", "5", "3", "United States", "North America"], &["CHN", "eight", "10", "6", "China", "Asia"]],
        );
        let out = medal_totals(&table);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.rows[0].total(), 18);
        assert_eq!(out.rows[0].label(), "United States");
    }

    #[test]
    fn test_medal_totals_keep_exact_total_for_huge_counts() {
        let table = Table::from_rows(&["noc", "gold", "silver", "bronze"], &[&["USA", "4294967295", "4294967295", "1"]]);
        let out = medal_totals(&table);
        assert_eq!(out.dropped, 0);
        assert_eq!(out.rows[0].total(), 8_589_934_591);
    }

    #[test]
    fn test_medal_totals_without_medal_columns_is_empty() {
        let table = Table::from_rows(&["noc", "total"], &[&["USA", "126"]]);
        let out = medal_totals(&table);
        assert!(out.rows.is_empty());
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn test_medal_totals_missing_noc_and_continent() {
        let table = Table::from_rows(&["gold", "silver", "bronze"], &[&["1", "0", "0"]]);
        let out = medal_totals(&table);
        assert_eq!(out.rows[0].noc, None);
        assert_eq!(out.rows[0].continent, OTHER_CONTINENT);
    }

    #[test]
    fn test_medallists_drop_policy() {
        let table = Table::from_rows(
            &["name", "noc", "sport", "medal", "date"],
            &[
                &["A", "USA", "Swimming", "Gold Medal", "2024-07-28"],
                &["B", "USA", "Swimming", "Wooden Spoon", "2024-07-28"],
                &["C", "CHN", "Diving", "Bronze Medal", "not a date"],
                &["D", "CHN", "Diving", "2", ""],
            ],
        );
        let out = medallists(&table);
        assert_eq!(out.dropped, 2);
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0].date, NaiveDate::from_ymd_opt(2024, 7, 28));
        assert_eq!(out.rows[1].medal, MedalType::Silver);
        assert_eq!(out.rows[1].date, None);
    }

    #[test]
    fn test_athletes_parse_lists_and_clear_bad_fields() {
        let table = Table::from_rows(
            &["id", "name", "noc", "birth_date", "height", "weight", "disciplines", "coach"],
            &[
                &["1", "MARCHAND Leon", "FRA", "2002-05-17", "187", "0", "['Swimming']", "Personal: BOWMAN Bob (USA), BOWMAN Bob"],
                &["2", "X", "USA", "soon", "abc", "", "", ""],
            ],
        );
        let out = athletes(&table);
        assert_eq!(out.rows.len(), 2);
        let leon = &out.rows[0];
        assert_eq!(leon.birth_date, NaiveDate::from_ymd_opt(2002, 5, 17));
        assert_eq!(leon.height, Some(187.0));
        assert_eq!(leon.weight, None);
        assert_eq!(leon.disciplines, vec!["Swimming"]);
        assert_eq!(leon.coaches, vec!["BOWMAN Bob"]);
        assert_eq!(out.rows[1].birth_date, None);
        assert_eq!(out.rows[1].height, None);
    }

    #[test]
    fn test_nocs_first_occurrence() {
        let table = Table::from_rows(
            &["noc", "country"],
            &[&["USA", "United States"], &["USA", "USA (dup)"], &["", "Nowhere"]],
        );
        let out = nocs(&table);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].country.as_deref(), Some("United States"));
        assert_eq!(out.dropped, 1);
    }

    #[test]
    fn test_coach_links_drop_incomplete_rows() {
        let table = Table::from_rows(&["id", "coach"], &[&["1", "National: DUPONT Anne"], &["2", ""]]);
        let out = coach_links(&table);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].athlete_id, "1");
        assert_eq!(out.dropped, 1);
    }

    #[test]
    fn test_events() {
        let table = Table::from_rows(&["sport", "event"], &[&["Rowing", "Men's Eight"], &["", "Mystery"]]);
        let out = events(&table);
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[1].sport, None);
    }
}
