//! Text and JSON output for a rendered page.

use olympics_core::formatting::{format_count, format_measure, format_share};
use olympics_core::models::MedalCounts;
use olympics_data::metrics::Kpis;
use olympics_runtime::session::{
    AthletesPage, BonusPage, FilterOptions, GlobalPage, OverviewPage, PageModel, SportsPage,
};
use unicode_width::UnicodeWidthStr;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(flag: &str) -> Self {
        if flag.eq_ignore_ascii_case("json") {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn render(model: &PageModel, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(model)?),
        OutputFormat::Text => Ok(render_text(model)),
    }
}

pub fn render_filters(options: &FilterOptions, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(options)?);
    }
    let mark = |active: bool| (if active { "*" } else { "" }).to_string();
    let mut out = String::new();
    heading(&mut out, "Filters");

    subheading(&mut out, "Countries");
    let rows: Vec<Vec<String>> = options
        .countries
        .iter()
        .map(|c| vec![c.clone(), mark(options.active_countries.contains(c))])
        .collect();
    out.push_str(&table(&["NOC", "Active"], &rows));

    subheading(&mut out, "Sports");
    let rows: Vec<Vec<String>> = options
        .sports
        .iter()
        .map(|s| vec![s.clone(), mark(options.active_sports.contains(s))])
        .collect();
    out.push_str(&table(&["Sport", "Active"], &rows));

    let medals: Vec<&str> = options.active_medals.iter().map(|m| m.label()).collect();
    out.push_str(&format!("\nMedals: {}\n", medals.join(", ")));
    Ok(out)
}

// ── Text layout ────────────────────────────────────────────────────────────────

fn pad(cell: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    if right {
        format!("{fill}{cell}")
    } else {
        format!("{cell}{fill}")
    }
}

/// Column-aligned table. The first column is left-aligned, the rest are
/// right-aligned.
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (no data)\n".to_string();
    }
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| pad(cell, *w, i > 0))
            .collect();
        format!("  {}\n", parts.join("  ").trim_end())
    };

    let mut out = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("  ")));
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"═".repeat(title.width()));
    out.push('\n');
}

fn subheading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push_str(":\n");
}

fn counts_cells(counts: &MedalCounts) -> Vec<String> {
    vec![
        format_count(counts.gold),
        format_count(counts.silver),
        format_count(counts.bronze),
        format_count(counts.total()),
    ]
}

fn kpi_block(out: &mut String, kpis: &Kpis) {
    let total = kpis.total_medals();
    let rows = vec![
        vec!["Athletes".to_string(), format_count(kpis.athletes as u64)],
        vec!["Countries".to_string(), format_count(kpis.countries as u64)],
        vec!["Sports".to_string(), format_count(kpis.sports as u64)],
        vec!["Events".to_string(), format_count(kpis.events as u64)],
        vec!["Continents".to_string(), format_count(kpis.continents as u64)],
        vec![
            "Gold".to_string(),
            format!("{} ({})", format_count(kpis.medals.gold), format_share(kpis.medals.gold, total)),
        ],
        vec![
            "Silver".to_string(),
            format!("{} ({})", format_count(kpis.medals.silver), format_share(kpis.medals.silver, total)),
        ],
        vec![
            "Bronze".to_string(),
            format!("{} ({})", format_count(kpis.medals.bronze), format_share(kpis.medals.bronze, total)),
        ],
        vec!["Total medals".to_string(), format_count(total)],
    ];
    out.push_str(&table(&["Metric", "Value"], &rows));
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("n/a").to_string()
}

// ── Pages ──────────────────────────────────────────────────────────────────────

pub fn render_text(model: &PageModel) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("Paris 2024 · {}", model.page().title()));
    match model {
        PageModel::Overview(page) => overview(&mut out, page),
        PageModel::GlobalAnalysis(page) => global(&mut out, page),
        PageModel::AthletePerformance(page) => athletes(&mut out, page),
        PageModel::SportsAndEvents(page) => sports(&mut out, page),
        PageModel::Bonus(page) => bonus(&mut out, page),
    }
    out
}

fn overview(out: &mut String, page: &OverviewPage) {
    kpi_block(out, &page.kpis);

    subheading(out, "Top countries");
    let rows: Vec<Vec<String>> = page
        .top_countries
        .iter()
        .map(|t| {
            let mut row = vec![t.label().to_string(), t.continent.clone()];
            row.extend(counts_cells(&t.counts));
            row
        })
        .collect();
    out.push_str(&table(&["Country", "Continent", "Gold", "Silver", "Bronze", "Total"], &rows));

    let skipped: Vec<String> = page
        .report
        .datasets
        .iter()
        .filter(|d| d.dropped > 0)
        .map(|d| format!("{} ({} rows)", d.dataset, d.dropped))
        .collect();
    if !skipped.is_empty() {
        out.push_str(&format!("\nSkipped malformed rows: {}\n", skipped.join(", ")));
    }
}

fn global(out: &mut String, page: &GlobalPage) {
    kpi_block(out, &page.kpis);

    subheading(out, "Ranking");
    let rows: Vec<Vec<String>> = page
        .ranking
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mut row = vec![format!("{:>2}. {}", i + 1, t.label())];
            row.extend(counts_cells(&t.counts));
            row
        })
        .collect();
    out.push_str(&table(&["Country", "Gold", "Silver", "Bronze", "Total"], &rows));

    subheading(out, "Medals by continent");
    let rows: Vec<Vec<String>> = page
        .by_continent
        .iter()
        .map(|r| vec![r.continent.clone(), r.medal.label().to_string(), format_count(r.count)])
        .collect();
    out.push_str(&table(&["Continent", "Medal", "Count"], &rows));

    subheading(out, "Medals by continent, country and sport");
    let rows: Vec<Vec<String>> = page
        .hierarchy
        .iter()
        .map(|r| vec![format!("{} / {} / {}", r.continent, r.country, r.sport), format_count(r.count as u64)])
        .collect();
    out.push_str(&table(&["Path", "Medals"], &rows));
}

fn athletes(out: &mut String, page: &AthletesPage) {
    subheading(out, "Athlete profile");
    match &page.profile {
        Some(p) => {
            let rows = vec![
                vec!["Name".to_string(), format!("[{}] {}", p.initials, p.name)],
                vec!["Country".to_string(), opt(p.country.as_deref().or(p.noc.as_deref()))],
                vec!["Gender".to_string(), opt(p.gender.as_deref())],
                vec!["Age".to_string(), format_measure(p.age.map(f64::from), 0, "years")],
                vec!["Height".to_string(), format_measure(p.height, 0, "cm")],
                vec!["Weight".to_string(), format_measure(p.weight, 1, "kg")],
                vec!["Disciplines".to_string(), p.disciplines.join(", ")],
                vec!["Coaches".to_string(), p.coaches.join(", ")],
            ];
            out.push_str(&table(&["Field", "Value"], &rows));
        }
        None => out.push_str("  No athlete selected. Use --athlete NAME.\n"),
    }

    subheading(out, &format!("Age distribution ({})", page.ages.discipline));
    let rows: Vec<Vec<String>> = page
        .ages
        .buckets
        .iter()
        .map(|b| vec![b.gender.clone(), b.age.to_string(), format_count(b.count as u64)])
        .collect();
    out.push_str(&table(&["Gender", "Age", "Athletes"], &rows));
    if page.ages.undated > 0 {
        out.push_str(&format!("  {} athletes without a birth date\n", format_count(page.ages.undated as u64)));
    }

    subheading(out, "Gender distribution");
    let whole: usize = page.genders.iter().map(|g| g.count).sum();
    let rows: Vec<Vec<String>> = page
        .genders
        .iter()
        .map(|g| vec![g.gender.clone(), format_count(g.count as u64), format_share(g.count as u64, whole as u64)])
        .collect();
    out.push_str(&table(&["Gender", "Athletes", "Share"], &rows));

    subheading(out, "Top athletes");
    let rows: Vec<Vec<String>> = page
        .top_athletes
        .iter()
        .map(|a| vec![opt(a.name.as_deref()), opt(a.noc.as_deref()), format_count(a.medals as u64)])
        .collect();
    out.push_str(&table(&["Athlete", "NOC", "Medals"], &rows));
}

fn sports(out: &mut String, page: &SportsPage) {
    subheading(out, "Medals per sport");
    let rows: Vec<Vec<String>> = page
        .sport_medals
        .iter()
        .map(|r| vec![r.sport.clone(), r.medal.label().to_string(), format_count(r.count as u64)])
        .collect();
    out.push_str(&table(&["Sport", "Medal", "Count"], &rows));

    subheading(out, "Events per sport");
    let rows: Vec<Vec<String>> = page
        .events_per_sport
        .iter()
        .map(|r| vec![r.sport.clone(), format_count(r.events as u64)])
        .collect();
    out.push_str(&table(&["Sport", "Events"], &rows));
}

fn bonus(out: &mut String, page: &BonusPage) {
    if !page.continents.is_empty() {
        out.push_str(&format!("\nContinents: {}\n", page.continents.join(", ")));
    }

    subheading(out, "Country ranking");
    let rows: Vec<Vec<String>> = page
        .ranking
        .iter()
        .map(|r| {
            let mut row = vec![r.noc.clone(), r.continent.clone()];
            row.extend(counts_cells(&r.counts));
            row
        })
        .collect();
    out.push_str(&table(&["NOC", "Continent", "Gold", "Silver", "Bronze", "Total"], &rows));

    subheading(out, "Medallists by sport, country and gender");
    let rows: Vec<Vec<String>> = page
        .distribution
        .iter()
        .map(|r| vec![r.sport.clone(), r.noc.clone(), r.gender.clone(), format_count(r.athletes as u64)])
        .collect();
    out.push_str(&table(&["Sport", "NOC", "Gender", "Athletes"], &rows));

    if let Some(h2h) = &page.head_to_head {
        subheading(out, &format!("{} vs {}", h2h.first.noc, h2h.second.noc));
        let mut rows: Vec<Vec<String>> = h2h
            .sports
            .iter()
            .map(|s| {
                vec![
                    s.sport.clone(),
                    format_count(s.first.total()),
                    format_count(s.second.total()),
                ]
            })
            .collect();
        rows.push(vec![
            "All sports".to_string(),
            format_count(h2h.first.counts.total()),
            format_count(h2h.second.counts.total()),
        ]);
        out.push_str(&table(&["Sport", h2h.first.noc.as_str(), h2h.second.noc.as_str()], &rows));
    }

    if let Some((first, last)) = page.date_range {
        out.push_str(&format!("\nMedal days: {first} to {last}\n"));
    }

    if let Some(day) = &page.day {
        subheading(out, &format!("Who won {}", day.date));
        match &day.top_country {
            Some(top) => out.push_str(&format!("  Top country: {} with {} medals\n", top.noc, top.medals)),
            None => out.push_str("  No medals awarded on this day.\n"),
        }
        let rows: Vec<Vec<String>> = day
            .details
            .iter()
            .map(|m| {
                vec![
                    opt(m.noc.as_deref()),
                    m.medal.label().to_string(),
                    opt(m.name.as_deref()),
                    opt(m.event.as_deref()),
                ]
            })
            .collect();
        if !rows.is_empty() {
            out.push_str(&table(&["NOC", "Medal", "Athlete", "Event"], &rows));
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
