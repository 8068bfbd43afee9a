//! Scalar KPIs for the summary cards.

use std::collections::HashSet;

use olympics_core::models::{Athlete, Event, MedalCounts, MedalTotal};
use serde::Serialize;

/// Headline numbers for the currently filtered data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub athletes: usize,
    pub countries: usize,
    pub sports: usize,
    pub events: usize,
    pub continents: usize,
    pub medals: MedalCounts,
}

impl Kpis {
    pub fn total_medals(&self) -> u64 {
        self.medals.total()
    }
}

/// Unique non-null values, or the row count when no row has a value.
///
/// The fallback treats "no identifier column" as "every row is distinct".
pub fn distinct_or_rows<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut rows = 0usize;
    let mut seen: HashSet<&str> = HashSet::new();
    for value in values {
        rows += 1;
        if let Some(v) = value {
            seen.insert(v);
        }
    }
    if seen.is_empty() {
        rows
    } else {
        seen.len()
    }
}

/// Compute every KPI from already-filtered rows.
pub fn compute_kpis(athletes: &[Athlete], events: &[Event], totals: &[MedalTotal]) -> Kpis {
    let athlete_key = if athletes.iter().any(|a| a.id.is_some()) {
        distinct_or_rows(athletes.iter().map(|a| a.id.as_deref()))
    } else {
        distinct_or_rows(athletes.iter().map(|a| a.name.as_deref()))
    };

    let sports = if events.is_empty() {
        let disciplines: HashSet<&str> = athletes
            .iter()
            .flat_map(|a| a.disciplines.iter().map(String::as_str))
            .collect();
        disciplines.len()
    } else {
        distinct_or_rows(events.iter().map(|e| e.sport.as_deref()))
    };

    let mut medals = MedalCounts::default();
    for row in totals {
        medals += row.counts;
    }

    Kpis {
        athletes: athlete_key,
        countries: distinct_or_rows(totals.iter().map(|t| t.noc.as_deref())),
        sports,
        events: distinct_or_rows(events.iter().map(|e| e.name.as_deref())),
        continents: totals.iter().map(|t| t.continent.as_str()).collect::<HashSet<_>>().len(),
        medals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athlete(id: Option<&str>, name: &str) -> Athlete {
        Athlete {
            id: id.map(str::to_string),
            name: Some(name.to_string()),
            disciplines: vec!["Rowing".to_string()],
            ..Athlete::default()
        }
    }

    #[test]
    fn test_distinct_or_rows() {
        assert_eq!(distinct_or_rows([Some("a"), Some("a"), Some("b"), None]), 2);
        assert_eq!(distinct_or_rows([None, None, None]), 3);
        assert_eq!(distinct_or_rows(std::iter::empty()), 0);
    }

    #[test]
    fn test_kpis_from_filtered_rows() {
        let athletes = vec![athlete(Some("1"), "A"), athlete(Some("1"), "A"), athlete(Some("2"), "B")];
        let events = vec![
            Event {
                sport: Some("Rowing".to_string()),
                name: Some("Men's Eight".to_string()),
            },
            Event {
                sport: Some("Judo".to_string()),
                name: Some("-60kg".to_string()),
            },
        ];
        let totals = vec![
            MedalTotal {
                noc: Some("USA".to_string()),
                country: None,
                continent: "North America".to_string(),
                counts: MedalCounts::new(10, 0, 3),
            },
            MedalTotal {
                noc: Some("CHN".to_string()),
                country: None,
                continent: "Asia".to_string(),
                counts: MedalCounts::new(8, 0, 6),
            },
        ];
        let kpis = compute_kpis(&athletes, &events, &totals);
        assert_eq!(kpis.athletes, 2);
        assert_eq!(kpis.countries, 2);
        assert_eq!(kpis.sports, 2);
        assert_eq!(kpis.events, 2);
        assert_eq!(kpis.continents, 2);
        assert_eq!(kpis.total_medals(), 27);
    }

    #[test]
    fn test_athletes_without_ids_count_names() {
        let athletes = vec![athlete(None, "A"), athlete(None, "A"), athlete(None, "B")];
        let kpis = compute_kpis(&athletes, &[], &[]);
        assert_eq!(kpis.athletes, 2);
        assert_eq!(kpis.sports, 1);
        assert_eq!(kpis.total_medals(), 0);
    }
}
