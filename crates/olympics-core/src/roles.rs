//! Semantic column roles and the aliases each role accepts.
//!
//! Source CSVs name the same concept differently across vintages
//! (`NOC` / `country_code` / `code`, `Gold` / `Gold Medal`). Each
//! [`ColumnRole`] lists its accepted exact aliases in priority order and,
//! for medal counts only, a substring used as a last-resort fallback.

use serde::Serialize;

/// A semantic role a source column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    CountryCode,
    Gold,
    Silver,
    Bronze,
    Total,
    CountryName,
    Continent,
    Sport,
    Event,
    MedalType,
    Date,
    AthleteId,
    AthleteName,
    Gender,
    BirthDate,
    Height,
    Weight,
    Disciplines,
    Coach,
}

impl ColumnRole {
    /// The fixed column name this role is normalised to.
    pub fn canonical(self) -> &'static str {
        match self {
            ColumnRole::CountryCode => "noc",
            ColumnRole::Gold => "gold",
            ColumnRole::Silver => "silver",
            ColumnRole::Bronze => "bronze",
            ColumnRole::Total => "total",
            ColumnRole::CountryName => "country",
            ColumnRole::Continent => "continent",
            ColumnRole::Sport => "sport",
            ColumnRole::Event => "event",
            ColumnRole::MedalType => "medal",
            ColumnRole::Date => "date",
            ColumnRole::AthleteId => "id",
            ColumnRole::AthleteName => "name",
            ColumnRole::Gender => "gender",
            ColumnRole::BirthDate => "birth_date",
            ColumnRole::Height => "height",
            ColumnRole::Weight => "weight",
            ColumnRole::Disciplines => "disciplines",
            ColumnRole::Coach => "coach",
        }
    }

    /// Accepted exact aliases (lowercase), highest priority first.
    ///
    /// Medal roles list the `<medal> medal` spellings as exact aliases, so
    /// they beat any column that would only match by substring.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ColumnRole::CountryCode => &["noc", "country_code", "code", "noc_code"],
            ColumnRole::Gold => &["gold", "gold medal", "gold_medal", "gold medals", "gold_medals"],
            ColumnRole::Silver => &[
                "silver",
                "silver medal",
                "silver_medal",
                "silver medals",
                "silver_medals",
            ],
            ColumnRole::Bronze => &[
                "bronze",
                "bronze medal",
                "bronze_medal",
                "bronze medals",
                "bronze_medals",
            ],
            ColumnRole::Total => &["total", "total medals", "total_medals", "medals_total"],
            ColumnRole::CountryName => &[
                "country",
                "country_name",
                "country_long",
                "country_x",
                "country_y",
            ],
            ColumnRole::Continent => &["continent", "region"],
            ColumnRole::Sport => &["sport", "discipline", "disciplines", "event"],
            ColumnRole::Event => &["event", "event_name", "event_id"],
            ColumnRole::MedalType => &["medal_type", "medal", "medal type"],
            ColumnRole::Date => &["medal_date", "date"],
            ColumnRole::AthleteId => &["code", "id", "athlete_id", "athlete_code", "code_athlete"],
            ColumnRole::AthleteName => &["name", "athlete_name", "full_name", "athlete"],
            ColumnRole::Gender => &["gender", "sex"],
            ColumnRole::BirthDate => &["birth_date", "date_of_birth", "dob", "birthdate"],
            ColumnRole::Height => &["height", "height_cm"],
            ColumnRole::Weight => &["weight", "weight_kg"],
            ColumnRole::Disciplines => &["disciplines", "discipline", "sports", "sport"],
            ColumnRole::Coach => &["coach", "coaches", "coach_name"],
        }
    }

    /// Substring used when no exact alias matches, if the role allows it.
    pub fn substring_fallback(self) -> Option<&'static str> {
        match self {
            ColumnRole::Gold => Some("gold"),
            ColumnRole::Silver => Some("silver"),
            ColumnRole::Bronze => Some("bronze"),
            ColumnRole::Total => Some("total"),
            ColumnRole::MedalType => Some("medal"),
            _ => None,
        }
    }

    pub const MEDALS: [ColumnRole; 3] = [ColumnRole::Gold, ColumnRole::Silver, ColumnRole::Bronze];
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical())
    }
}
