//! Filter-and-aggregate pipeline.
//!
//! Applies a [`FilterSelection`] to the typed datasets and derives every
//! chart input from the filtered subset. Nothing here caches: callers pass
//! the current rows and get freshly computed aggregates back.
//!
//! Country and sport filters drop rows. The medal-type filter never drops a
//! medal-total row; it zeroes the deselected columns so a country stays
//! visible with only the selected medals counted. Medallist rows are single
//! medals, so for them the medal-type filter is a row filter.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use olympics_core::models::{
    Athlete, Event, MedalCounts, MedalTotal, MedalType, Medallist, NocInfo, ALL_SPORTS, OTHER_CONTINENT,
};
use olympics_core::selection::FilterSelection;
use serde::Serialize;
use tracing::debug;

use crate::continents::builtin_continent;

// ── Filtering ─────────────────────────────────────────────────────────────────

/// Country filter plus medal-type zeroing. Row count only shrinks through
/// the country filter.
pub fn filter_medal_totals(rows: &[MedalTotal], selection: &FilterSelection) -> Vec<MedalTotal> {
    let medals = selection.effective_medal_types();
    rows.iter()
        .filter(|r| selection.allows_country(r.noc.as_deref()))
        .map(|r| MedalTotal {
            counts: r.counts.masked(&medals),
            ..r.clone()
        })
        .collect()
}

/// Country, sport and medal-type row filter over individual medals.
pub fn filter_medallists(rows: &[Medallist], selection: &FilterSelection) -> Vec<Medallist> {
    rows.iter()
        .filter(|m| {
            selection.allows_country(m.noc.as_deref())
                && selection.allows_sport(m.sport.as_deref())
                && selection.allows_medal(m.medal)
        })
        .cloned()
        .collect()
}

/// Country filter, plus a sport filter matched against any of the
/// athlete's disciplines.
pub fn filter_athletes(rows: &[Athlete], selection: &FilterSelection) -> Vec<Athlete> {
    rows.iter()
        .filter(|a| selection.allows_country(a.noc.as_deref()))
        .filter(|a| {
            selection.sports.is_empty() || a.disciplines.iter().any(|d| selection.allows_sport(Some(d)))
        })
        .cloned()
        .collect()
}

pub fn filter_events(rows: &[Event], selection: &FilterSelection) -> Vec<Event> {
    rows.iter()
        .filter(|e| selection.allows_sport(e.sport.as_deref()))
        .cloned()
        .collect()
}

/// Every distinct NOC present in the medal totals, for the country picker.
pub fn available_countries(rows: &[MedalTotal]) -> BTreeSet<String> {
    rows.iter().filter_map(|r| r.noc.clone()).collect()
}

/// Every distinct sport across events and medallists, for the sport picker.
pub fn available_sports(events: &[Event], medallists: &[Medallist]) -> BTreeSet<String> {
    events
        .iter()
        .filter_map(|e| e.sport.clone())
        .chain(medallists.iter().filter_map(|m| m.sport.clone()))
        .collect()
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// Group by NOC, sum the (already masked) counts, stable-sort by total
/// descending and keep the first `n`.
///
/// Groups keep the order their NOC was first seen, so equal totals rank in
/// input order. Rows without a NOC cannot be grouped and are skipped; a
/// table with no country-code column therefore ranks to nothing.
pub fn top_n_by_total(rows: &[MedalTotal], n: usize) -> Vec<MedalTotal> {
    let mut order: Vec<MedalTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let Some(noc) = row.noc.as_deref() else {
            continue;
        };
        match index.get(noc) {
            Some(&i) => order[i].counts += row.counts,
            None => {
                index.insert(noc, order.len());
                order.push(row.clone());
            }
        }
    }

    if order.is_empty() && !rows.is_empty() {
        debug!("no rows carry a NOC; ranking is empty");
    }

    order.sort_by(|a, b| b.total().cmp(&a.total()));
    order.truncate(n);
    order
}

/// One bar segment of a stacked ranking chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedalBreakdownRow {
    pub label: String,
    pub medal: MedalType,
    pub count: u64,
}

/// Melt a ranking into long form `(label, medal, count)`, selected medal
/// types only, zero counts removed. Row order follows the ranking.
pub fn ranking_breakdown(ranked: &[MedalTotal], medals: &BTreeSet<MedalType>) -> Vec<MedalBreakdownRow> {
    ranked
        .iter()
        .flat_map(|row| {
            medals.iter().filter_map(move |&medal| {
                let count = row.counts.get(medal);
                (count > 0).then(|| MedalBreakdownRow {
                    label: row.label().to_string(),
                    medal,
                    count,
                })
            })
        })
        .collect()
}

// ── Metadata lookups ──────────────────────────────────────────────────────────

/// Index NOC metadata by code, keeping the first row for each code.
pub fn noc_index(nocs: &[NocInfo]) -> HashMap<&str, &NocInfo> {
    let mut index = HashMap::with_capacity(nocs.len());
    for info in nocs {
        index.entry(info.noc.as_str()).or_insert(info);
    }
    index
}

/// Continent for a NOC: metadata, then the built-in table, then `"Other"`.
pub fn continent_of(noc: Option<&str>, index: &HashMap<&str, &NocInfo>) -> String {
    let Some(code) = noc else {
        return OTHER_CONTINENT.to_string();
    };
    index
        .get(code)
        .and_then(|info| info.continent.clone())
        .or_else(|| builtin_continent(code).map(str::to_string))
        .unwrap_or_else(|| OTHER_CONTINENT.to_string())
}

// ── Aggregates ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinentMedalRow {
    pub continent: String,
    pub medal: MedalType,
    pub count: u64,
}

/// Per-continent medal sums in long form, sorted by continent then podium
/// order. Zero counts are removed.
pub fn medals_by_continent(rows: &[MedalTotal]) -> Vec<ContinentMedalRow> {
    let mut sums: BTreeMap<&str, MedalCounts> = BTreeMap::new();
    for row in rows {
        *sums.entry(row.continent.as_str()).or_default() += row.counts;
    }
    sums.into_iter()
        .flat_map(|(continent, counts)| {
            MedalType::ALL.into_iter().filter_map(move |medal| {
                let count = counts.get(medal);
                (count > 0).then(|| ContinentMedalRow {
                    continent: continent.to_string(),
                    medal,
                    count,
                })
            })
        })
        .collect()
}

/// One leaf of the continent → country → sport drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyRow {
    pub continent: String,
    pub country: String,
    pub sport: String,
    pub count: usize,
}

/// Count medallist rows per (continent, country, sport).
///
/// Country and continent come from `nocs`, falling back to the built-in
/// continent table, then `"Other"`. A missing sport is bucketed under
/// `"All sports"`. Counts always sum to `medallists.len()`.
pub fn hierarchy_counts(medallists: &[Medallist], nocs: &[NocInfo]) -> Vec<HierarchyRow> {
    let lookup = noc_index(nocs);
    let mut counts: BTreeMap<(String, String, String), usize> = BTreeMap::new();

    for m in medallists {
        let info = m.noc.as_deref().and_then(|code| lookup.get(code));
        let continent = continent_of(m.noc.as_deref(), &lookup);
        let country = info
            .and_then(|i| i.country.clone())
            .or_else(|| m.noc.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let sport = m.sport.clone().unwrap_or_else(|| ALL_SPORTS.to_string());
        *counts.entry((continent, country, sport)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((continent, country, sport), count)| HierarchyRow {
            continent,
            country,
            sport,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportMedalRow {
    pub sport: String,
    pub medal: MedalType,
    pub count: usize,
}

/// Medallist rows per (sport, medal type), sorted by sport then podium
/// order.
pub fn sport_medal_counts(medallists: &[Medallist]) -> Vec<SportMedalRow> {
    let mut counts: BTreeMap<(String, MedalType), usize> = BTreeMap::new();
    for m in medallists {
        let sport = m.sport.clone().unwrap_or_else(|| ALL_SPORTS.to_string());
        *counts.entry((sport, m.medal)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((sport, medal), count)| SportMedalRow { sport, medal, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportEventCount {
    pub sport: String,
    pub events: usize,
}

/// Events per sport, most events first; ties by sport name.
pub fn event_counts_per_sport(events: &[Event]) -> Vec<SportEventCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for e in events {
        let sport = e.sport.clone().unwrap_or_else(|| ALL_SPORTS.to_string());
        *counts.entry(sport).or_default() += 1;
    }
    let mut rows: Vec<SportEventCount> = counts
        .into_iter()
        .map(|(sport, events)| SportEventCount { sport, events })
        .collect();
    rows.sort_by(|a, b| b.events.cmp(&a.events));
    rows
}

// ── Tests ─────────────────────────────────────────────────────────────────────
