use chrono::NaiveDate;
use clap::Parser;
use olympics_core::models::MedalType;
use olympics_core::selection::Page;
use olympics_core::{DashboardError, Result};
use olympics_data::analysis::RankMetric;
use olympics_runtime::data_manager::TableSource;
use olympics_runtime::session::{DashboardSession, DEFAULT_TOP_N};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Paris 2024 medal and athlete analytics
#[derive(Parser, Debug, Clone)]
#[command(
    name = "olympics-dashboard",
    about = "Paris 2024 medal and athlete analytics",
    version
)]
pub struct Settings {
    /// Directory holding the CSV datasets (default: ./data, then ~/.olympics-dashboard/data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Page to render
    #[arg(long, default_value = "overview", value_parser = ["overview", "global", "athletes", "sports", "bonus"])]
    pub page: String,

    /// NOC codes to keep, comma-separated (empty = all)
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Sports to keep, comma-separated (empty = all)
    #[arg(long, value_delimiter = ',')]
    pub sports: Vec<String>,

    /// Medal types to count, comma-separated (empty = all)
    #[arg(long, value_delimiter = ',')]
    pub medals: Vec<String>,

    /// Number of countries in the global ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Athlete for the profile card
    #[arg(long)]
    pub athlete: Option<String>,

    /// Discipline for the age distribution
    #[arg(long)]
    pub discipline: Option<String>,

    /// Country (name or NOC) for the gender distribution
    #[arg(long)]
    pub gender_country: Option<String>,

    /// Continent for the bonus ranking
    #[arg(long)]
    pub continent: Option<String>,

    /// Gender for the bonus ranking
    #[arg(long)]
    pub gender: Option<String>,

    /// Ranking metric
    #[arg(long, default_value = "Total", value_parser = ["Total", "Gold", "Silver", "Bronze"], ignore_case = true)]
    pub metric: String,

    /// Two NOCs to compare, e.g. USA,CHN
    #[arg(long)]
    pub compare: Option<String>,

    /// Day for the daily medal report (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the filter choices instead of a page
    #[arg(long)]
    pub list_filters: bool,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and apply the `--debug` shortcut.
    pub fn load() -> Self {
        Self::parse().resolved()
    }

    fn resolved(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    pub fn page(&self) -> Result<Page> {
        self.page.parse()
    }

    pub fn medal_types(&self) -> Result<Vec<MedalType>> {
        self.medals
            .iter()
            .filter(|m| !m.trim().is_empty())
            .map(|m| m.parse())
            .collect()
    }

    pub fn metric(&self) -> Result<RankMetric> {
        self.metric.parse()
    }

    /// The `--compare` pair, upper-cased.
    pub fn compare_pair(&self) -> Result<Option<(String, String)>> {
        let Some(raw) = self.compare.as_deref() else {
            return Ok(None);
        };
        let parts: Vec<String> = raw
            .split(',')
            .map(|p| p.trim().to_uppercase())
            .filter(|p| !p.is_empty())
            .collect();
        match parts.as_slice() {
            [a, b] => Ok(Some((a.clone(), b.clone()))),
            _ => Err(DashboardError::Config(format!(
                "--compare expects two NOC codes separated by a comma, got \"{raw}\""
            ))),
        }
    }

    /// Push the selection and page options into `session`.
    pub fn apply<S: TableSource>(&self, session: &mut DashboardSession<S>) -> Result<()> {
        session.set_page(self.page()?);
        session.set_countries(self.countries.iter().filter(|c| !c.trim().is_empty()).cloned());
        session.set_sports(self.sports.iter().filter(|s| !s.trim().is_empty()).cloned());
        session.set_medal_types(self.medal_types()?);

        let metric = self.metric()?;
        let compare = self.compare_pair()?;
        let options = session.options_mut();
        options.top_n = self.top_n;
        options.athlete = self.athlete.clone();
        options.discipline = self.discipline.clone();
        options.gender_country = self.gender_country.clone();
        options.continent = self.continent.clone();
        options.gender = self.gender.clone();
        options.metric = metric;
        options.compare = compare;
        options.date = self.date;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
