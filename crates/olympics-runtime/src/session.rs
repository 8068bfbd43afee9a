//! Per-session dashboard state and page models.
//!
//! A [`DashboardSession`] owns one user's filter selection and page
//! options. Every [`DashboardSession::render`] takes a fresh snapshot from
//! the shared [`DataStore`] and recomputes the active page from it.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use olympics_core::models::{Athlete, Event, MedalTotal, MedalType, Medallist};
use olympics_core::selection::{effective_set, FilterSelection, Page};
use olympics_data::analysis::{
    self, AgeDistribution, AthleteMedalCount, AthleteProfile, CountryRank, DayResults, DistributionRow, GenderCount,
    HeadToHead, RankMetric,
};
use olympics_data::metrics::{compute_kpis, Kpis};
use olympics_data::pipeline::{
    self, ContinentMedalRow, HierarchyRow, MedalBreakdownRow, SportEventCount, SportMedalRow,
};
use serde::Serialize;
use tracing::debug;

use crate::data_manager::{DataStore, TableSource};
use crate::snapshot::{LoadReport, OlympicData};

/// Default ranking length on the global page.
pub const DEFAULT_TOP_N: usize = 20;
const OVERVIEW_TOP_N: usize = 10;
const TOP_ATHLETES: usize = 10;
const CONTINENT_RANKING: usize = 15;

// ── Options ───────────────────────────────────────────────────────────────────

/// Page-specific pickers beyond the shared filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOptions {
    pub top_n: usize,
    /// Athlete shown on the profile card; the first roster entry when unset.
    pub athlete: Option<String>,
    /// Discipline for the age distribution; `None` means all.
    pub discipline: Option<String>,
    /// Country (name or NOC) for the gender distribution.
    pub gender_country: Option<String>,
    pub continent: Option<String>,
    pub gender: Option<String>,
    pub metric: RankMetric,
    /// Countries for the head-to-head; the first two NOCs when unset.
    pub compare: Option<(String, String)>,
    /// Day for "who won the day"; the first medal day when unset.
    pub date: Option<NaiveDate>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            athlete: None,
            discipline: None,
            gender_country: None,
            continent: None,
            gender: None,
            metric: RankMetric::Total,
            compare: None,
            date: None,
        }
    }
}

// ── Filter options ────────────────────────────────────────────────────────────

/// Choices offered by the shared filter pickers, and what is in effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub countries: BTreeSet<String>,
    pub sports: BTreeSet<String>,
    /// Selected countries, or every option when none is selected.
    pub active_countries: BTreeSet<String>,
    pub active_sports: BTreeSet<String>,
    pub active_medals: BTreeSet<MedalType>,
}

// ── Page models ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPage {
    pub kpis: Kpis,
    pub top_countries: Vec<MedalTotal>,
    pub report: LoadReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalPage {
    pub kpis: Kpis,
    pub ranking: Vec<MedalTotal>,
    pub breakdown: Vec<MedalBreakdownRow>,
    pub by_continent: Vec<ContinentMedalRow>,
    pub hierarchy: Vec<HierarchyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthletesPage {
    pub profile: Option<AthleteProfile>,
    /// Choices for the age-distribution discipline picker, `"All"` first.
    pub disciplines: Vec<String>,
    pub ages: AgeDistribution,
    pub genders: Vec<GenderCount>,
    pub top_athletes: Vec<AthleteMedalCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportsPage {
    pub sport_medals: Vec<SportMedalRow>,
    pub events_per_sport: Vec<SportEventCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusPage {
    pub continents: Vec<String>,
    pub ranking: Vec<CountryRank>,
    pub distribution: Vec<DistributionRow>,
    pub head_to_head: Option<HeadToHead>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub day: Option<DayResults>,
}

/// The rendered content of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageModel {
    Overview(OverviewPage),
    GlobalAnalysis(GlobalPage),
    AthletePerformance(AthletesPage),
    SportsAndEvents(SportsPage),
    Bonus(BonusPage),
}

impl PageModel {
    pub fn page(&self) -> Page {
        match self {
            PageModel::Overview(_) => Page::Overview,
            PageModel::GlobalAnalysis(_) => Page::GlobalAnalysis,
            PageModel::AthletePerformance(_) => Page::AthletePerformance,
            PageModel::SportsAndEvents(_) => Page::SportsAndEvents,
            PageModel::Bonus(_) => Page::Bonus,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Filtered view of a snapshot for one render.
struct Scoped {
    totals: Vec<MedalTotal>,
    medallists: Vec<Medallist>,
    athletes: Vec<Athlete>,
    events: Vec<Event>,
}

impl Scoped {
    fn new(data: &OlympicData, selection: &FilterSelection) -> Self {
        Self {
            totals: pipeline::filter_medal_totals(&data.medal_totals, selection),
            medallists: pipeline::filter_medallists(&data.medallists, selection),
            athletes: pipeline::filter_athletes(&data.athletes, selection),
            events: pipeline::filter_events(&data.events, selection),
        }
    }

    fn kpis(&self) -> Kpis {
        compute_kpis(&self.athletes, &self.events, &self.totals)
    }
}

/// One user's dashboard state over a shared store.
pub struct DashboardSession<S> {
    store: Arc<DataStore<S>>,
    selection: FilterSelection,
    options: PageOptions,
}

impl<S: TableSource> DashboardSession<S> {
    pub fn new(store: Arc<DataStore<S>>) -> Self {
        Self {
            store,
            selection: FilterSelection::default(),
            options: PageOptions::default(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PageOptions {
        &mut self.options
    }

    pub fn set_page(&mut self, page: Page) {
        self.selection.page = page;
    }

    pub fn set_countries<I: IntoIterator<Item = String>>(&mut self, countries: I) {
        self.selection.countries = countries.into_iter().map(|c| c.trim().to_uppercase()).collect();
    }

    pub fn set_sports<I: IntoIterator<Item = String>>(&mut self, sports: I) {
        self.selection.sports = sports.into_iter().map(|s| s.trim().to_string()).collect();
    }

    pub fn set_medal_types<I: IntoIterator<Item = MedalType>>(&mut self, medals: I) {
        self.selection.medal_types = medals.into_iter().collect();
    }

    /// Picker choices from a fresh snapshot.
    pub fn filter_options(&self) -> FilterOptions {
        let data = self.store.snapshot();
        let countries = data.country_options();
        let sports = data.sport_options();
        FilterOptions {
            active_countries: effective_set(&self.selection.countries, &countries).clone(),
            active_sports: effective_set(&self.selection.sports, &sports).clone(),
            active_medals: self.selection.effective_medal_types(),
            countries,
            sports,
        }
    }

    /// Recompute the active page from a fresh snapshot.
    pub fn render(&self) -> PageModel {
        let data = self.store.snapshot();
        let scoped = Scoped::new(&data, &self.selection);
        debug!(
            page = ?self.selection.page,
            totals = scoped.totals.len(),
            medallists = scoped.medallists.len(),
            "rendering page"
        );

        match self.selection.page {
            Page::Overview => PageModel::Overview(self.overview(&data, &scoped)),
            Page::GlobalAnalysis => PageModel::GlobalAnalysis(self.global(&data, &scoped)),
            Page::AthletePerformance => PageModel::AthletePerformance(self.athletes(&data, &scoped)),
            Page::SportsAndEvents => PageModel::SportsAndEvents(Self::sports(&scoped)),
            Page::Bonus => PageModel::Bonus(self.bonus(&data, &scoped)),
        }
    }

    fn overview(&self, data: &OlympicData, scoped: &Scoped) -> OverviewPage {
        OverviewPage {
            kpis: scoped.kpis(),
            top_countries: pipeline::top_n_by_total(&scoped.totals, OVERVIEW_TOP_N),
            report: data.report.clone(),
        }
    }

    fn global(&self, data: &OlympicData, scoped: &Scoped) -> GlobalPage {
        let ranking = pipeline::top_n_by_total(&scoped.totals, self.options.top_n);
        let medals: BTreeSet<MedalType> = self.selection.effective_medal_types();
        GlobalPage {
            kpis: scoped.kpis(),
            breakdown: pipeline::ranking_breakdown(&ranking, &medals),
            ranking,
            by_continent: pipeline::medals_by_continent(&scoped.totals),
            hierarchy: pipeline::hierarchy_counts(&scoped.medallists, &data.nocs),
        }
    }

    fn athletes(&self, data: &OlympicData, scoped: &Scoped) -> AthletesPage {
        let name = self
            .options
            .athlete
            .clone()
            .or_else(|| scoped.athletes.iter().find_map(|a| a.name.clone()));
        AthletesPage {
            profile: name.and_then(|n| analysis::athlete_profile(&scoped.athletes, &data.coach_links, &n)),
            disciplines: analysis::discipline_options(&scoped.athletes),
            ages: analysis::age_distribution(&scoped.athletes, self.options.discipline.as_deref()),
            genders: analysis::gender_distribution(&scoped.athletes, self.options.gender_country.as_deref()),
            top_athletes: analysis::top_athletes(&scoped.medallists, TOP_ATHLETES),
        }
    }

    fn sports(scoped: &Scoped) -> SportsPage {
        SportsPage {
            sport_medals: pipeline::sport_medal_counts(&scoped.medallists),
            events_per_sport: pipeline::event_counts_per_sport(&scoped.events),
        }
    }

    fn bonus(&self, data: &OlympicData, scoped: &Scoped) -> BonusPage {
        let medallists = &scoped.medallists;
        let compare = self.options.compare.clone().or_else(|| {
            let mut nocs = medallists
                .iter()
                .filter_map(|m| m.noc.clone())
                .collect::<BTreeSet<_>>()
                .into_iter();
            Some((nocs.next()?, nocs.next()?))
        });
        let date_range = analysis::date_range(medallists);
        let date = self.options.date.or(date_range.map(|(first, _)| first));

        BonusPage {
            continents: analysis::continent_options(medallists, &data.nocs),
            ranking: analysis::ranking_by_metric(
                medallists,
                &data.nocs,
                self.options.continent.as_deref(),
                self.options.gender.as_deref(),
                self.options.metric,
                CONTINENT_RANKING,
            ),
            distribution: analysis::athlete_distribution(medallists),
            head_to_head: compare.map(|(a, b)| analysis::head_to_head(medallists, &a, &b)),
            date_range,
            day: date.map(|d| analysis::who_won_the_day(medallists, d)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_manager::CsvDirectorySource;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (Arc<DataStore<CsvDirectorySource>>, TempDir) {
        let dir = TempDir::new().unwrap();
        let p = dir.path();
        fs::write(
            p.join("medals_total.csv"),
            "country_code,Gold Medal,Silver Medal,Bronze Medal,Total\nUSA,10,5,3,18\nCHN,8,10,6,24\n",
        )
        .unwrap();
        fs::write(
            p.join("nocs.csv"),
            "code,country\nUSA,United States\nUSA,United States of America\nCHN,China\n",
        )
        .unwrap();
        fs::write(
            p.join("medallists.csv"),
            "medal_date,medal_type,name,gender,country_code,discipline,event,code_athlete\n\
             2024-07-27,Gold Medal,A,Female,USA,Swimming,100m Free,1\n\
             2024-07-27,Silver Medal,B,Male,CHN,Swimming,100m Free,2\n\
             2024-07-28,Gold Medal,B,Male,CHN,Diving,3m,2\n",
        )
        .unwrap();
        fs::write(
            p.join("athletes.csv"),
            "code,name,gender,country_code,country,birth_date,disciplines,coach\n\
             1,A,Female,USA,United States,2000-01-01,['Swimming'],Personal: C (USA)\n\
             2,B,Male,CHN,China,1998-02-02,\"['Swimming', 'Diving']\",\n",
        )
        .unwrap();
        fs::write(p.join("events.csv"), "event,sport\n100m Free,Swimming\n3m,Diving\n").unwrap();
        let store = Arc::new(DataStore::new(CsvDirectorySource::new(p)));
        (store, dir)
    }

    #[test]
    fn test_overview_defaults() {
        let (store, _dir) = fixture();
        let session = DashboardSession::new(store);
        let PageModel::Overview(page) = session.render() else {
            panic!("expected overview");
        };
        assert_eq!(page.kpis.total_medals(), 42);
        assert_eq!(page.kpis.countries, 2);
        assert_eq!(page.kpis.athletes, 2);
        assert_eq!(page.top_countries[0].noc.as_deref(), Some("CHN"));
        assert_eq!(page.top_countries[1].label(), "United States");
    }

    #[test]
    fn test_medal_selection_recomputes_global_page() {
        let (store, _dir) = fixture();
        let mut session = DashboardSession::new(store);
        session.set_page(Page::GlobalAnalysis);
        session.set_medal_types([MedalType::Gold, MedalType::Bronze]);
        session.options_mut().top_n = 1;

        let PageModel::GlobalAnalysis(page) = session.render() else {
            panic!("expected global page");
        };
        assert_eq!(page.ranking.len(), 1);
        assert_eq!(page.ranking[0].noc.as_deref(), Some("CHN"));
        assert_eq!(page.ranking[0].total(), 14);
        assert!(page.breakdown.iter().all(|r| r.medal != MedalType::Silver));
        assert_eq!(page.kpis.total_medals(), 27);
        // Silver medallist row is filtered out of the drill-down.
        assert_eq!(page.hierarchy.iter().map(|r| r.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_country_filter_and_athletes_page() {
        let (store, _dir) = fixture();
        let mut session = DashboardSession::new(store);
        session.set_page(Page::AthletePerformance);
        session.set_countries(["chn".to_string()]);

        let PageModel::AthletePerformance(page) = session.render() else {
            panic!("expected athletes page");
        };
        let profile = page.profile.unwrap();
        assert_eq!(profile.name, "B");
        assert_eq!(profile.disciplines, vec!["Swimming", "Diving"]);
        assert_eq!(page.top_athletes[0].medals, 2);
        assert_eq!(page.genders.len(), 1);
    }

    #[test]
    fn test_profile_coaches_are_cleaned() {
        let (store, _dir) = fixture();
        let mut session = DashboardSession::new(store);
        session.set_page(Page::AthletePerformance);
        session.options_mut().athlete = Some("a".to_string());
        let PageModel::AthletePerformance(page) = session.render() else {
            panic!("expected athletes page");
        };
        assert_eq!(page.profile.unwrap().coaches, vec!["C"]);
    }

    #[test]
    fn test_bonus_defaults() {
        let (store, _dir) = fixture();
        let mut session = DashboardSession::new(store);
        session.set_page(Page::Bonus);
        let PageModel::Bonus(page) = session.render() else {
            panic!("expected bonus page");
        };
        let h2h = page.head_to_head.unwrap();
        assert_eq!(h2h.first.noc, "CHN");
        assert_eq!(h2h.second.noc, "USA");
        let day = page.day.unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 7, 27).unwrap());
        assert_eq!(day.details.len(), 2);
        assert_eq!(page.ranking[0].noc, "CHN");
    }

    #[test]
    fn test_sports_page_and_model_page() {
        let (store, _dir) = fixture();
        let mut session = DashboardSession::new(store);
        session.set_page(Page::SportsAndEvents);
        session.set_sports(["Swimming".to_string()]);
        let model = session.render();
        assert_eq!(model.page(), Page::SportsAndEvents);
        let PageModel::SportsAndEvents(page) = model else {
            panic!("expected sports page");
        };
        assert_eq!(page.events_per_sport.len(), 1);
        assert_eq!(page.sport_medals.iter().map(|r| r.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_render_sees_file_changes() {
        let (store, dir) = fixture();
        let session = DashboardSession::new(Arc::clone(&store));
        let before = session.render();

        fs::write(dir.path().join("medals_total.csv"), "noc,gold,silver,bronze\nFRA,1,1,1\n").unwrap();
        let file = fs::OpenOptions::new()
            .write(true)
            .open(dir.path().join("medals_total.csv"))
            .unwrap();
        file.set_modified(std::time::SystemTime::UNIX_EPOCH).unwrap();

        let after = session.render();
        assert_ne!(before, after);
        let PageModel::Overview(page) = after else {
            panic!("expected overview");
        };
        assert_eq!(page.top_countries.len(), 1);
    }

    #[test]
    fn test_filter_options_default_to_everything() {
        let (store, _dir) = fixture();
        let mut session = DashboardSession::new(store);
        let options = session.filter_options();
        assert_eq!(options.countries.iter().collect::<Vec<_>>(), vec!["CHN", "USA"]);
        assert_eq!(options.active_countries, options.countries);
        assert!(options.sports.contains("Diving"));
        assert_eq!(options.active_medals.len(), 3);

        session.set_countries(["usa".to_string()]);
        let options = session.filter_options();
        assert_eq!(options.active_countries.iter().collect::<Vec<_>>(), vec!["USA"]);
        assert_eq!(options.countries.len(), 2);
    }

    #[test]
    fn test_lowercase_source_codes_match_country_filter() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("medals_total.csv"), "noc,gold,silver,bronze\nusa,10,5,3\nchn,8,10,6\n").unwrap();
        fs::write(dir.path().join("nocs.csv"), "code,country\nusa,United States\n").unwrap();
        let store = Arc::new(DataStore::new(CsvDirectorySource::new(dir.path())));
        let mut session = DashboardSession::new(store);

        let options = session.filter_options();
        assert_eq!(options.countries.iter().collect::<Vec<_>>(), vec!["CHN", "USA"]);

        session.set_countries(["usa".to_string()]);
        let PageModel::Overview(page) = session.render() else {
            panic!("expected overview");
        };
        assert_eq!(page.top_countries.len(), 1);
        assert_eq!(page.top_countries[0].label(), "United States");
    }

    #[test]
    fn test_page_model_json_is_tagged() {
        let (store, _dir) = fixture();
        let session = DashboardSession::new(store);
        let json = serde_json::to_value(session.render()).unwrap();
        assert_eq!(json["page"], "overview");
        assert_eq!(json["kpis"]["medals"]["total"], 42);
    }
}
