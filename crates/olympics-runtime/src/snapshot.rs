//! Immutable, normalised view of every dataset.

use std::collections::BTreeSet;

use olympics_core::models::{Athlete, Event, MedalTotal, Medallist, NocInfo};
use olympics_core::table::Table;
use olympics_data::extract::{self, CoachLink, Extracted};
use olympics_data::normalizer::{
    self, ATHLETES_ROLES, ATHLETES_SCHEMA, COACH_LINKS_SCHEMA, COUNTRIES_ROLES, COUNTRIES_SCHEMA, EVENTS_ROLES,
    EVENTS_SCHEMA, MEDALLISTS_ROLES, MEDALLISTS_SCHEMA, MEDALS_TOTAL_SCHEMA, NOCS_ROLES, NOCS_SCHEMA,
};
use olympics_data::pipeline;
use serde::Serialize;
use tracing::info;

/// A source file the dashboard knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Athletes,
    Events,
    MedalsTotal,
    Nocs,
    Medallists,
    Countries,
    Medals,
    Coaches,
    Teams,
}

impl Dataset {
    pub const ALL: [Dataset; 9] = [
        Dataset::Athletes,
        Dataset::Events,
        Dataset::MedalsTotal,
        Dataset::Nocs,
        Dataset::Medallists,
        Dataset::Countries,
        Dataset::Medals,
        Dataset::Coaches,
        Dataset::Teams,
    ];

    /// File name looked up (case-insensitively) under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Athletes => "athletes.csv",
            Dataset::Events => "events.csv",
            Dataset::MedalsTotal => "medals_total.csv",
            Dataset::Nocs => "nocs.csv",
            Dataset::Medallists => "medallists.csv",
            Dataset::Countries => "countries.csv",
            Dataset::Medals => "medals.csv",
            Dataset::Coaches => "coaches.csv",
            Dataset::Teams => "teams.csv",
        }
    }

    /// Canonical columns an absent or unreadable file degrades to.
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            Dataset::Athletes => ATHLETES_SCHEMA,
            Dataset::Events => EVENTS_SCHEMA,
            Dataset::MedalsTotal => MEDALS_TOTAL_SCHEMA,
            Dataset::Nocs => NOCS_SCHEMA,
            Dataset::Countries => COUNTRIES_SCHEMA,
            Dataset::Medallists | Dataset::Medals => MEDALLISTS_SCHEMA,
            Dataset::Coaches | Dataset::Teams => COACH_LINKS_SCHEMA,
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Raw tables for every dataset, indexed by [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    tables: Vec<(Dataset, Table)>,
}

impl RawTables {
    pub fn insert(&mut self, dataset: Dataset, table: Table) {
        self.tables.retain(|(d, _)| *d != dataset);
        self.tables.push((dataset, table));
    }

    /// The table for `dataset`, or an empty schema table when absent.
    pub fn get(&self, dataset: Dataset) -> Table {
        self.tables
            .iter()
            .find(|(d, _)| *d == dataset)
            .map(|(_, t)| t.clone())
            .unwrap_or_else(|| Table::new(dataset.schema().iter().copied()))
    }
}

/// Per-dataset outcome of a snapshot build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetReport {
    pub dataset: Dataset,
    pub rows: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub datasets: Vec<DatasetReport>,
}

impl LoadReport {
    fn record<T>(&mut self, dataset: Dataset, extracted: &Extracted<T>) {
        self.datasets.push(DatasetReport {
            dataset,
            rows: extracted.rows.len(),
            dropped: extracted.dropped,
        });
    }

    pub fn total_dropped(&self) -> usize {
        self.datasets.iter().map(|d| d.dropped).sum()
    }
}

/// Everything a page needs, normalised and typed. Never mutated after
/// construction.
#[derive(Debug, Clone, Default)]
pub struct OlympicData {
    pub medal_totals: Vec<MedalTotal>,
    pub medallists: Vec<Medallist>,
    pub athletes: Vec<Athlete>,
    pub events: Vec<Event>,
    pub nocs: Vec<NocInfo>,
    pub coach_links: Vec<CoachLink>,
    pub report: LoadReport,
}

impl OlympicData {
    /// Normalise, enrich and extract every dataset.
    ///
    /// `medallists.csv` is preferred for per-medal rows; `medals.csv` is
    /// used when it is empty.
    pub fn build(raw: &RawTables) -> Self {
        let mut report = LoadReport::default();

        let nocs_table = normalizer::normalize_columns(raw.get(Dataset::Nocs), NOCS_ROLES);
        let countries_table = normalizer::normalize_columns(raw.get(Dataset::Countries), COUNTRIES_ROLES);
        let totals_table = normalizer::normalize_medals_total(raw.get(Dataset::MedalsTotal), &nocs_table, Some(&countries_table));

        let mut medallist_source = Dataset::Medallists;
        let mut medallists_raw = raw.get(Dataset::Medallists);
        if medallists_raw.is_empty() {
            medallist_source = Dataset::Medals;
            medallists_raw = raw.get(Dataset::Medals);
        }
        let medallists_table = normalizer::normalize_columns(medallists_raw, MEDALLISTS_ROLES);
        let athletes_table = normalizer::normalize_columns(raw.get(Dataset::Athletes), ATHLETES_ROLES);
        let events_table = normalizer::normalize_columns(raw.get(Dataset::Events), EVENTS_ROLES);

        let medal_totals = extract::medal_totals(&totals_table);
        report.record(Dataset::MedalsTotal, &medal_totals);
        let medallists = extract::medallists(&medallists_table);
        report.record(medallist_source, &medallists);
        let athletes = extract::athletes(&athletes_table);
        report.record(Dataset::Athletes, &athletes);
        let events = extract::events(&events_table);
        report.record(Dataset::Events, &events);

        // Continents known to countries.csv fill gaps in nocs.csv.
        let nocs_enriched = normalizer::enrich_continents(nocs_table, &[&countries_table]);
        let nocs = extract::nocs(&nocs_enriched);
        report.record(Dataset::Nocs, &nocs);

        let mut coach_links = Vec::new();
        for dataset in [Dataset::Coaches, Dataset::Teams] {
            let links = extract::coach_links(&normalizer::normalize_coach_links(&raw.get(dataset)));
            report.record(dataset, &links);
            coach_links.extend(links.rows);
        }

        info!(
            medal_totals = medal_totals.rows.len(),
            medallists = medallists.rows.len(),
            athletes = athletes.rows.len(),
            events = events.rows.len(),
            dropped = report.total_dropped(),
            "snapshot built"
        );

        Self {
            medal_totals: medal_totals.rows,
            medallists: medallists.rows,
            athletes: athletes.rows,
            events: events.rows,
            nocs: nocs.rows,
            coach_links,
            report,
        }
    }

    /// NOCs offered by the country picker.
    pub fn country_options(&self) -> BTreeSet<String> {
        pipeline::available_countries(&self.medal_totals)
    }

    /// Sports offered by the sport picker.
    pub fn sport_options(&self) -> BTreeSet<String> {
        pipeline::available_sports(&self.events, &self.medallists)
    }

    pub fn is_empty(&self) -> bool {
        self.medal_totals.is_empty() && self.medallists.is_empty() && self.athletes.is_empty() && self.events.is_empty()
    }
}
