//! The user's current dashboard scope.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::MedalType;

/// Dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Overview,
    GlobalAnalysis,
    AthletePerformance,
    SportsAndEvents,
    Bonus,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::GlobalAnalysis,
        Page::AthletePerformance,
        Page::SportsAndEvents,
        Page::Bonus,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::GlobalAnalysis => "Global Analysis",
            Page::AthletePerformance => "Athlete Performance",
            Page::SportsAndEvents => "Sports & Events",
            Page::Bonus => "Bonus",
        }
    }
}

impl FromStr for Page {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "overview" | "home" => Ok(Page::Overview),
            "global" | "global_analysis" => Ok(Page::GlobalAnalysis),
            "athletes" | "athlete_performance" => Ok(Page::AthletePerformance),
            "sports" | "sports_and_events" | "events" => Ok(Page::SportsAndEvents),
            "bonus" | "la28" => Ok(Page::Bonus),
            _ => Err(DashboardError::UnknownPage(s.to_string())),
        }
    }
}

/// Selected countries, sports and medal types plus the active page.
///
/// An empty set means "no filter", not "select nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub sports: BTreeSet<String>,
    pub medal_types: BTreeSet<MedalType>,
    pub page: Page,
}

impl FilterSelection {
    /// Whether `noc` passes the country filter.
    pub fn allows_country(&self, noc: Option<&str>) -> bool {
        allows(&self.countries, noc)
    }

    /// Whether `sport` passes the sport filter.
    pub fn allows_sport(&self, sport: Option<&str>) -> bool {
        allows(&self.sports, sport)
    }

    /// The medal types in effect; all three when none are selected.
    pub fn effective_medal_types(&self) -> BTreeSet<MedalType> {
        if self.medal_types.is_empty() {
            MedalType::ALL.into_iter().collect()
        } else {
            self.medal_types.clone()
        }
    }

    pub fn allows_medal(&self, medal: MedalType) -> bool {
        self.medal_types.is_empty() || self.medal_types.contains(&medal)
    }
}

/// Effective set for a selection: all available options when nothing is
/// selected.
pub fn effective_set<'a>(selected: &'a BTreeSet<String>, available: &'a BTreeSet<String>) -> &'a BTreeSet<String> {
    if selected.is_empty() {
        available
    } else {
        selected
    }
}

fn allows(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.is_some_and(|v| selected.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_str_aliases() {
        assert_eq!("global".parse::<Page>().unwrap(), Page::GlobalAnalysis);
        assert_eq!("Global_Analysis".parse::<Page>().unwrap(), Page::GlobalAnalysis);
        assert_eq!("sports-and-events".parse::<Page>().unwrap(), Page::SportsAndEvents);
        assert_eq!("Athletes".parse::<Page>().unwrap(), Page::AthletePerformance);
        assert!("settings".parse::<Page>().is_err());
    }

    #[test]
    fn test_empty_selection_allows_everything() {
        let sel = FilterSelection::default();
        assert!(sel.allows_country(Some("USA")));
        assert!(sel.allows_country(None));
        assert!(sel.allows_sport(Some("Rowing")));
        assert!(sel.allows_medal(MedalType::Silver));
        assert_eq!(sel.effective_medal_types().len(), 3);
    }

    #[test]
    fn test_non_empty_selection_filters() {
        let sel = FilterSelection {
            countries: ["USA".to_string()].into(),
            medal_types: [MedalType::Gold].into(),
            ..Default::default()
        };
        assert!(sel.allows_country(Some("USA")));
        assert!(!sel.allows_country(Some("CHN")));
        assert!(!sel.allows_country(None));
        assert!(sel.allows_medal(MedalType::Gold));
        assert!(!sel.allows_medal(MedalType::Bronze));
    }

    #[test]
    fn test_effective_set_empty_means_all() {
        let available: BTreeSet<String> = ["CHN".to_string(), "USA".to_string()].into();
        let none = BTreeSet::new();
        assert_eq!(effective_set(&none, &available), &available);
        let some: BTreeSet<String> = ["USA".to_string()].into();
        assert_eq!(effective_set(&some, &available), &some);
    }
}
