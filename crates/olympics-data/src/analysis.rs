//! Drill-down analyses behind the athlete and bonus pages.
//!
//! Every function is pure over already-filtered typed rows and returns a
//! serialisable result ready for rendering.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use chrono::NaiveDate;
use olympics_core::data_processors::CoachCleaner;
use olympics_core::formatting::initials;
use olympics_core::models::{Athlete, MedalCounts, MedalType, Medallist, NocInfo};
use olympics_core::DashboardError;
use serde::Serialize;
use tracing::debug;

use crate::extract::CoachLink;
use crate::pipeline::{continent_of, noc_index};

/// Selector value meaning "no filter" in continent, gender and discipline
/// pickers.
pub const ALL: &str = "All";

/// Reference date for athlete ages: the Paris 2024 opening ceremony.
pub fn games_opening() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 26).unwrap_or_default()
}

fn is_all(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty() || v.eq_ignore_ascii_case(ALL))
}

// ── Athlete profile ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteProfile {
    pub name: String,
    pub initials: String,
    pub noc: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub disciplines: Vec<String>,
    pub coaches: Vec<String>,
}

/// Profile of the first athlete whose name matches `name`
/// (case-insensitive). Coaches from the roster and from `links` are cleaned
/// and de-duplicated in that order.
pub fn athlete_profile(athletes: &[Athlete], links: &[CoachLink], name: &str) -> Option<AthleteProfile> {
    let wanted = name.trim().to_lowercase();
    let athlete = athletes
        .iter()
        .find(|a| a.name.as_deref().is_some_and(|n| n.trim().to_lowercase() == wanted))?;

    let linked = athlete.id.as_deref().into_iter().flat_map(|id| {
        links
            .iter()
            .filter(move |l| l.athlete_id == id)
            .map(|l| l.coach.as_str())
    });
    let coaches = CoachCleaner::clean_all(athlete.coaches.iter().map(String::as_str).chain(linked));

    Some(AthleteProfile {
        name: athlete.name.clone().unwrap_or_default(),
        initials: initials(athlete.name.as_deref()),
        noc: athlete.noc.clone(),
        country: athlete.country.clone(),
        gender: athlete.gender.clone(),
        age: athlete.birth_date.and_then(|b| age_on(b, games_opening())),
        height: athlete.height,
        weight: athlete.weight,
        disciplines: athlete.disciplines.clone(),
        coaches,
    })
}

// ── Age and gender ────────────────────────────────────────────────────────────

/// Whole years as `days / 365`, floored. `None` for birth dates after
/// `on`.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    let days = (on - birth).num_days();
    (days >= 0).then(|| (days / 365) as u32)
}

/// Sorted discipline names with `"All"` first, for the age picker.
pub fn discipline_options(athletes: &[Athlete]) -> Vec<String> {
    let names: BTreeSet<&str> = athletes
        .iter()
        .flat_map(|a| a.disciplines.iter().map(String::as_str))
        .collect();
    std::iter::once(ALL.to_string())
        .chain(names.into_iter().map(str::to_string))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeBucket {
    pub gender: String,
    pub age: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgeDistribution {
    pub discipline: String,
    pub buckets: Vec<AgeBucket>,
    /// Athletes in scope without a usable birth date.
    pub undated: usize,
}

/// Age histogram per gender at the Games opening.
///
/// `discipline` of `None` or `"All"` keeps every athlete. Athletes without
/// a birth date are counted in `undated`, not bucketed.
pub fn age_distribution(athletes: &[Athlete], discipline: Option<&str>) -> AgeDistribution {
    let opening = games_opening();
    let mut counts: BTreeMap<(String, u32), usize> = BTreeMap::new();
    let mut undated = 0usize;

    let in_scope = athletes
        .iter()
        .filter(|a| is_all(discipline) || discipline.is_some_and(|d| a.disciplines.iter().any(|x| x == d)));
    for athlete in in_scope {
        let Some(age) = athlete.birth_date.and_then(|b| age_on(b, opening)) else {
            undated += 1;
            continue;
        };
        let gender = athlete.gender.clone().unwrap_or_else(|| "Unknown".to_string());
        *counts.entry((gender, age)).or_default() += 1;
    }

    AgeDistribution {
        discipline: discipline.filter(|d| !is_all(Some(*d))).unwrap_or(ALL).to_string(),
        buckets: counts
            .into_iter()
            .map(|((gender, age), count)| AgeBucket { gender, age, count })
            .collect(),
        undated,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCount {
    pub gender: String,
    pub count: usize,
}

/// Athletes per gender, most common first. `country` matches either the
/// display name or the NOC; `None` or `"All"` keeps every athlete. Athletes
/// without a gender are not counted.
pub fn gender_distribution(athletes: &[Athlete], country: Option<&str>) -> Vec<GenderCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for athlete in athletes {
        if !is_all(country) {
            let wanted = country.unwrap_or_default();
            let matches = athlete.country.as_deref() == Some(wanted) || athlete.noc.as_deref() == Some(wanted);
            if !matches {
                continue;
            }
        }
        if let Some(gender) = athlete.gender.as_deref() {
            *counts.entry(gender).or_default() += 1;
        }
    }
    let mut rows: Vec<GenderCount> = counts
        .into_iter()
        .map(|(gender, count)| GenderCount {
            gender: gender.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

// ── Medallist rankings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AthleteMedalCount {
    pub athlete_id: Option<String>,
    pub name: Option<String>,
    pub noc: Option<String>,
    pub medals: usize,
}

/// Medals per athlete, grouped on (id, name), most medals first. Equal
/// counts keep first-seen order.
pub fn top_athletes(medallists: &[Medallist], n: usize) -> Vec<AthleteMedalCount> {
    let mut order: Vec<AthleteMedalCount> = Vec::new();
    let mut index: HashMap<(Option<&str>, Option<&str>), usize> = HashMap::new();
    for m in medallists {
        let key = (m.athlete_id.as_deref(), m.name.as_deref());
        if key == (None, None) {
            continue;
        }
        match index.get(&key) {
            Some(&i) => order[i].medals += 1,
            None => {
                index.insert(key, order.len());
                order.push(AthleteMedalCount {
                    athlete_id: m.athlete_id.clone(),
                    name: m.name.clone(),
                    noc: m.noc.clone(),
                    medals: 1,
                });
            }
        }
    }
    order.sort_by(|a, b| b.medals.cmp(&a.medals));
    order.truncate(n);
    order
}

/// Metric a country ranking is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RankMetric {
    #[default]
    Total,
    Medal(MedalType),
}

impl RankMetric {
    pub fn value(self, counts: &MedalCounts) -> u64 {
        match self {
            RankMetric::Total => counts.total(),
            RankMetric::Medal(medal) => counts.get(medal),
        }
    }
}

impl FromStr for RankMetric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("total") {
            return Ok(RankMetric::Total);
        }
        s.parse::<MedalType>().map(RankMetric::Medal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRank {
    pub noc: String,
    pub continent: String,
    #[serde(flatten)]
    pub counts: MedalCounts,
}

/// Sum per-medal counts per NOC into ranking rows, ordered by `metric`
/// descending. Ties keep first-seen order.
fn rank_nocs<'a>(
    medallists: impl Iterator<Item = &'a Medallist>,
    index: &HashMap<&str, &NocInfo>,
    metric: RankMetric,
) -> Vec<CountryRank> {
    let mut order: Vec<CountryRank> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for m in medallists {
        let Some(noc) = m.noc.as_deref() else {
            continue;
        };
        let i = *positions.entry(noc).or_insert_with(|| {
            order.push(CountryRank {
                noc: noc.to_string(),
                continent: continent_of(Some(noc), index),
                counts: MedalCounts::default(),
            });
            order.len() - 1
        });
        order[i].counts.record(m.medal);
    }
    order.sort_by(|a, b| metric.value(&b.counts).cmp(&metric.value(&a.counts)));
    order
}

/// Countries ranked by `metric`, restricted to one continent and one
/// gender (`None`/`"All"` for no restriction), top `n`.
pub fn ranking_by_metric(
    medallists: &[Medallist],
    nocs: &[NocInfo],
    continent: Option<&str>,
    gender: Option<&str>,
    metric: RankMetric,
    n: usize,
) -> Vec<CountryRank> {
    let index = noc_index(nocs);
    let scoped = medallists
        .iter()
        .filter(|m| is_all(gender) || m.gender.as_deref() == gender);
    let mut ranked: Vec<CountryRank> = rank_nocs(scoped, &index, metric)
        .into_iter()
        .filter(|r| is_all(continent) || Some(r.continent.as_str()) == continent)
        .collect();
    ranked.truncate(n);
    ranked
}

/// Sorted continent names present in the medallist data, for the picker.
pub fn continent_options(medallists: &[Medallist], nocs: &[NocInfo]) -> Vec<String> {
    let index = noc_index(nocs);
    medallists
        .iter()
        .map(|m| continent_of(m.noc.as_deref(), &index))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ── Athlete distribution ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionRow {
    pub sport: String,
    pub noc: String,
    pub gender: String,
    pub athletes: usize,
}

/// Unique medallist names per (sport, NOC, gender). Rows missing any key
/// are left out.
pub fn athlete_distribution(medallists: &[Medallist]) -> Vec<DistributionRow> {
    let mut groups: BTreeMap<(&str, &str, &str), BTreeSet<&str>> = BTreeMap::new();
    for m in medallists {
        let (Some(sport), Some(noc), Some(gender)) = (m.sport.as_deref(), m.noc.as_deref(), m.gender.as_deref())
        else {
            continue;
        };
        let names = groups.entry((sport, noc, gender)).or_default();
        if let Some(name) = m.name.as_deref() {
            names.insert(name);
        }
    }
    groups
        .into_iter()
        .map(|((sport, noc, gender), names)| DistributionRow {
            sport: sport.to_string(),
            noc: noc.to_string(),
            gender: gender.to_string(),
            athletes: names.len(),
        })
        .collect()
}

// ── Head to head ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportComparison {
    pub sport: String,
    pub first: MedalCounts,
    pub second: MedalCounts,
}

impl SportComparison {
    pub fn combined(&self) -> u64 {
        self.first.total().saturating_add(self.second.total())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub noc: String,
    pub counts: MedalCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub first: CountrySummary,
    pub second: CountrySummary,
    /// Sports where either side medalled, by combined total.
    pub sports: Vec<SportComparison>,
}

/// Per-sport comparison of two NOCs. A sport one side never medalled in
/// counts as zero for that side.
pub fn head_to_head(medallists: &[Medallist], first: &str, second: &str) -> HeadToHead {
    let mut per_sport: BTreeMap<&str, (MedalCounts, MedalCounts)> = BTreeMap::new();
    let mut totals = (MedalCounts::default(), MedalCounts::default());

    for m in medallists {
        let side = match m.noc.as_deref() {
            Some(noc) if noc == first => 0,
            Some(noc) if noc == second => 1,
            _ => continue,
        };
        let Some(sport) = m.sport.as_deref() else {
            continue;
        };
        let entry = per_sport.entry(sport).or_default();
        if side == 0 {
            entry.0.record(m.medal);
            totals.0.record(m.medal);
        } else {
            entry.1.record(m.medal);
            totals.1.record(m.medal);
        }
    }

    let mut sports: Vec<SportComparison> = per_sport
        .into_iter()
        .map(|(sport, (a, b))| SportComparison {
            sport: sport.to_string(),
            first: a,
            second: b,
        })
        .filter(|c| c.combined() > 0)
        .collect();
    sports.sort_by(|a, b| b.combined().cmp(&a.combined()));

    if first == second {
        debug!(noc = first, "head-to-head of a country with itself");
    }

    HeadToHead {
        first: CountrySummary {
            noc: first.to_string(),
            counts: totals.0,
        },
        second: CountrySummary {
            noc: second.to_string(),
            counts: totals.1,
        },
        sports,
    }
}

// ── Who won the day ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NocMedalCount {
    pub noc: String,
    pub medal: MedalType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPerformer {
    pub noc: String,
    pub medals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayResults {
    pub date: NaiveDate,
    pub top_country: Option<TopPerformer>,
    pub per_country: Vec<NocMedalCount>,
    /// Medals of the day, Gold → Silver → Bronze, then NOC, then event.
    pub details: Vec<Medallist>,
}

/// First and last medal dates, if any medallist is dated.
pub fn date_range(medallists: &[Medallist]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = medallists.iter().filter_map(|m| m.date);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Medal results for one day. Rows without a NOC are not attributed to a
/// country but still appear in the details.
pub fn who_won_the_day(medallists: &[Medallist], date: NaiveDate) -> DayResults {
    let mut details: Vec<Medallist> = medallists.iter().filter(|m| m.date == Some(date)).cloned().collect();

    let mut per_noc: Vec<(String, usize)> = Vec::new();
    let mut per_medal: BTreeMap<(String, MedalType), usize> = BTreeMap::new();
    for m in &details {
        let Some(noc) = m.noc.as_deref() else {
            continue;
        };
        match per_noc.iter_mut().find(|(n, _)| n == noc) {
            Some((_, count)) => *count += 1,
            None => per_noc.push((noc.to_string(), 1)),
        }
        *per_medal.entry((noc.to_string(), m.medal)).or_default() += 1;
    }

    // max_by_key returns the last maximum; reverse so ties go to the first seen.
    let top_country = per_noc
        .iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(noc, medals)| TopPerformer {
            noc: noc.clone(),
            medals: *medals,
        });

    details.sort_by(|a, b| {
        a.medal
            .cmp(&b.medal)
            .then_with(|| a.noc.cmp(&b.noc))
            .then_with(|| a.event.cmp(&b.event))
    });

    DayResults {
        date,
        top_country,
        per_country: per_medal
            .into_iter()
            .map(|((noc, medal), count)| NocMedalCount { noc, medal, count })
            .collect(),
        details,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
