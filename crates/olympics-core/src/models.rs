use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::DashboardError;

/// Continent bucket for countries with no metadata match.
pub const OTHER_CONTINENT: &str = "Other";

/// Sport bucket for medal records that carry no sport/discipline value.
pub const ALL_SPORTS: &str = "All sports";

/// One of the three Olympic medal colours.
///
/// Variants are declared podium-first so the derived `Ord` sorts
/// Gold → Silver → Bronze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MedalType {
    Gold,
    Silver,
    Bronze,
}

impl MedalType {
    pub const ALL: [MedalType; 3] = [MedalType::Gold, MedalType::Silver, MedalType::Bronze];

    /// Display label used in chart legends.
    pub fn label(self) -> &'static str {
        match self {
            MedalType::Gold => "Gold",
            MedalType::Silver => "Silver",
            MedalType::Bronze => "Bronze",
        }
    }

    /// Lenient parse of a medal value found in source data.
    ///
    /// Accepts `Gold`, `gold`, `Gold Medal`, `G` and the numeric medal codes
    /// `1`/`2`/`3` (optionally written `1.0`).
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        let first = lowered.split_whitespace().next()?;
        match first {
            "gold" | "g" | "1" | "1.0" => Some(MedalType::Gold),
            "silver" | "s" | "2" | "2.0" => Some(MedalType::Silver),
            "bronze" | "b" | "3" | "3.0" => Some(MedalType::Bronze),
            _ => None,
        }
    }
}

impl std::fmt::Display for MedalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MedalType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| DashboardError::UnknownMedalType(s.to_string()))
    }
}

/// Gold/silver/bronze counts. The total is always derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MedalCounts {
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
}

impl MedalCounts {
    pub fn new(gold: u64, silver: u64, bronze: u64) -> Self {
        Self {
            gold,
            silver,
            bronze,
        }
    }

    /// Sum of the three medal counts.
    pub fn total(&self) -> u64 {
        self.gold.saturating_add(self.silver).saturating_add(self.bronze)
    }

    pub fn get(&self, medal: MedalType) -> u64 {
        match medal {
            MedalType::Gold => self.gold,
            MedalType::Silver => self.silver,
            MedalType::Bronze => self.bronze,
        }
    }

    /// Count one medal of the given type.
    pub fn record(&mut self, medal: MedalType) {
        match medal {
            MedalType::Gold => self.gold += 1,
            MedalType::Silver => self.silver += 1,
            MedalType::Bronze => self.bronze += 1,
        }
    }

    /// Copy with every medal type not in `selected` set to zero.
    pub fn masked(&self, selected: &BTreeSet<MedalType>) -> Self {
        let keep = |medal: MedalType, count: u64| {
            if selected.contains(&medal) {
                count
            } else {
                0
            }
        };
        Self {
            gold: keep(MedalType::Gold, self.gold),
            silver: keep(MedalType::Silver, self.silver),
            bronze: keep(MedalType::Bronze, self.bronze),
        }
    }
}

impl std::ops::AddAssign for MedalCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.gold = self.gold.saturating_add(rhs.gold);
        self.silver = self.silver.saturating_add(rhs.silver);
        self.bronze = self.bronze.saturating_add(rhs.bronze);
    }
}

impl Serialize for MedalCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MedalCounts", 4)?;
        state.serialize_field("gold", &self.gold)?;
        state.serialize_field("silver", &self.silver)?;
        state.serialize_field("bronze", &self.bronze)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Aggregate medal count for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedalTotal {
    /// Normalised NOC code; `None` when the source had no country-code column.
    pub noc: Option<String>,
    /// Display name; falls back to the NOC code after enrichment.
    pub country: Option<String>,
    /// Continent, `"Other"` when unknown.
    pub continent: String,
    #[serde(flatten)]
    pub counts: MedalCounts,
}

impl MedalTotal {
    pub fn total(&self) -> u64 {
        self.counts.total()
    }

    /// Best available display label: country name, NOC, or `"Unknown"`.
    pub fn label(&self) -> &str {
        self.country
            .as_deref()
            .or(self.noc.as_deref())
            .unwrap_or("Unknown")
    }
}

/// One medal-winning result from the fine-grained medallist file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medallist {
    pub athlete_id: Option<String>,
    pub name: Option<String>,
    pub noc: Option<String>,
    pub sport: Option<String>,
    pub medal: MedalType,
    pub date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub event: Option<String>,
}

/// One competitor from the athlete roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Athlete {
    pub id: Option<String>,
    pub name: Option<String>,
    pub noc: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub disciplines: Vec<String>,
    pub coaches: Vec<String>,
}

/// One competition event from the event catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub sport: Option<String>,
    pub name: Option<String>,
}

/// NOC metadata: code → display name / continent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NocInfo {
    pub noc: String,
    pub country: Option<String>,
    pub continent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medal_type_parse_lenient() {
        assert_eq!(MedalType::parse_lenient("Gold"), Some(MedalType::Gold));
        assert_eq!(MedalType::parse_lenient("gold medal"), Some(MedalType::Gold));
        assert_eq!(MedalType::parse_lenient("Silver Medal"), Some(MedalType::Silver));
        assert_eq!(MedalType::parse_lenient(" B "), Some(MedalType::Bronze));
        assert_eq!(MedalType::parse_lenient("3.0"), Some(MedalType::Bronze));
        assert_eq!(MedalType::parse_lenient("Platinum"), None);
        assert_eq!(MedalType::parse_lenient(""), None);
    }

    #[test]
    fn test_medal_type_from_str_error() {
        let err = "copper".parse::<MedalType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown medal type: copper");
    }

    #[test]
    fn test_medal_type_podium_order() {
        let mut medals = vec![MedalType::Bronze, MedalType::Gold, MedalType::Silver];
        medals.sort();
        assert_eq!(medals, MedalType::ALL.to_vec());
    }

    #[test]
    fn test_medal_counts_total_and_mask() {
        let counts = MedalCounts::new(10, 5, 3);
        assert_eq!(counts.total(), 18);

        let selected: BTreeSet<MedalType> = [MedalType::Gold, MedalType::Bronze].into();
        let masked = counts.masked(&selected);
        assert_eq!(masked, MedalCounts::new(10, 0, 3));
        assert_eq!(masked.total(), 13);
    }

    #[test]
    fn test_medal_counts_record_and_add() {
        let mut counts = MedalCounts::default();
        counts.record(MedalType::Gold);
        counts.record(MedalType::Gold);
        counts.record(MedalType::Bronze);
        counts += MedalCounts::new(0, 2, 0);
        assert_eq!(counts, MedalCounts::new(2, 2, 1));
        assert_eq!(counts.get(MedalType::Silver), 2);
    }

    #[test]
    fn test_medal_counts_sums_saturate_instead_of_wrapping() {
        let mut counts = MedalCounts::new(u64::MAX, 1, 0);
        assert_eq!(counts.total(), u64::MAX);
        counts += MedalCounts::new(1, 0, 0);
        assert_eq!(counts.gold, u64::MAX);
    }

    #[test]
    fn test_medal_counts_serialize_includes_total() {
        let json = serde_json::to_value(MedalCounts::new(1, 2, 3)).unwrap();
        assert_eq!(json["total"], 6);
        assert_eq!(json["gold"], 1);
    }

    #[test]
    fn test_medal_total_label_fallback() {
        let mut row = MedalTotal {
            noc: Some("USA".to_string()),
            country: Some("United States".to_string()),
            continent: OTHER_CONTINENT.to_string(),
            counts: MedalCounts::default(),
        };
        assert_eq!(row.label(), "United States");
        row.country = None;
        assert_eq!(row.label(), "USA");
        row.noc = None;
        assert_eq!(row.label(), "Unknown");
    }
}
