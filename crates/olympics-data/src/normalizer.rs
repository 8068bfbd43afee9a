//! Schema normalisation and enrichment.
//!
//! Rewrites source tables into canonical column names (see
//! [`ColumnRole::canonical`]) so every downstream consumer can assume a
//! fixed schema, then enriches medal tables with display names and
//! continents via row-count-preserving left joins.

use std::collections::HashMap;

use olympics_core::models::OTHER_CONTINENT;
use olympics_core::roles::ColumnRole;
use olympics_core::table::{Cell, Table};
use tracing::{debug, warn};

use crate::continents::builtin_continent;
use crate::resolver::resolve_excluding;

// ── Canonical schemas ─────────────────────────────────────────────────────────

/// Columns an empty medal-totals table is declared with.
pub const MEDALS_TOTAL_SCHEMA: &[&str] = &["noc", "gold", "silver", "bronze", "total", "country", "continent"];
pub const NOCS_SCHEMA: &[&str] = &["noc", "country", "continent"];
pub const COUNTRIES_SCHEMA: &[&str] = &["noc", "continent"];
pub const ATHLETES_SCHEMA: &[&str] = &[
    "id",
    "name",
    "noc",
    "country",
    "gender",
    "birth_date",
    "height",
    "weight",
    "disciplines",
    "coach",
];
pub const EVENTS_SCHEMA: &[&str] = &["sport", "event"];
pub const MEDALLISTS_SCHEMA: &[&str] = &["id", "name", "noc", "sport", "medal", "date", "gender", "event"];
pub const COACH_LINKS_SCHEMA: &[&str] = &["id", "coach"];

/// Role order for each dataset. Earlier roles claim their column first so
/// overlapping aliases (`code`, `event`) land on the intended role.
pub const NOCS_ROLES: &[ColumnRole] = &[ColumnRole::CountryCode, ColumnRole::CountryName, ColumnRole::Continent];
pub const COUNTRIES_ROLES: &[ColumnRole] = &[ColumnRole::CountryCode, ColumnRole::CountryName, ColumnRole::Continent];
pub const ATHLETES_ROLES: &[ColumnRole] = &[
    ColumnRole::CountryCode,
    ColumnRole::AthleteId,
    ColumnRole::AthleteName,
    ColumnRole::CountryName,
    ColumnRole::Gender,
    ColumnRole::BirthDate,
    ColumnRole::Height,
    ColumnRole::Weight,
    ColumnRole::Disciplines,
    ColumnRole::Coach,
];
pub const EVENTS_ROLES: &[ColumnRole] = &[ColumnRole::Sport, ColumnRole::Event];
pub const MEDALLISTS_ROLES: &[ColumnRole] = &[
    ColumnRole::CountryCode,
    ColumnRole::MedalType,
    ColumnRole::Date,
    ColumnRole::Sport,
    ColumnRole::Event,
    ColumnRole::AthleteId,
    ColumnRole::AthleteName,
    ColumnRole::Gender,
    ColumnRole::Continent,
];

// ── Column renaming ───────────────────────────────────────────────────────────

/// Rename the columns playing each of `roles` to their canonical names.
///
/// Roles are resolved in order; a column claimed by an earlier role is not
/// considered for later ones. Unresolved roles leave the table without that
/// column. A resolved `noc` column is trimmed and upper-cased so joins and
/// filters compare one form.
pub fn normalize_columns(mut table: Table, roles: &[ColumnRole]) -> Table {
    let mut claimed: Vec<usize> = Vec::new();
    let mut renames: Vec<(String, &'static str)> = Vec::new();

    for role in roles {
        let Some(found) = resolve_excluding(&table, *role, &claimed) else {
            debug!(role = %role, "no column resolved");
            continue;
        };
        claimed.push(found.index);
        renames.push((found.column, role.canonical()));
    }

    // Move every claimed column out of the way first so a canonical name
    // freed by one rename can be taken by another.
    let mut parked: Vec<(String, String, &'static str)> = Vec::with_capacity(renames.len());
    for (i, (source, canonical)) in renames.into_iter().enumerate() {
        let slot = format!("\u{0}claimed{i}");
        if table.rename_column(&source, &slot) {
            parked.push((source, slot, canonical));
        }
    }
    for (source, slot, canonical) in &parked {
        if !table.rename_column(slot, canonical) {
            warn!(
                column = %source,
                canonical = %canonical,
                "canonical column name already taken; keeping source name"
            );
            table.rename_column(slot, source);
        }
    }
    if roles.contains(&ColumnRole::CountryCode) {
        canonicalize_codes(&mut table);
    }
    table
}

fn canonicalize_codes(table: &mut Table) {
    let Some(idx) = table.column_index(ColumnRole::CountryCode.canonical()) else {
        return;
    };
    let codes: Vec<Cell> = table
        .rows()
        .iter()
        .map(|row| match row[idx].as_text().map(|c| c.trim().to_uppercase()) {
            Some(code) if !code.is_empty() => Cell::Text(code),
            _ => Cell::Null,
        })
        .collect();
    table.set_column(ColumnRole::CountryCode.canonical(), codes);
}

/// Rename the resolved country-code column to `noc`.
pub fn normalize_country_code(table: Table) -> Table {
    normalize_columns(table, &[ColumnRole::CountryCode])
}

/// Canonicalise medal-count columns and guarantee `total` = gold+silver+bronze.
///
/// When all three medal columns resolve, `total` is (re)computed row-wise;
/// rows where any count is non-numeric get a null total. A source total that
/// disagrees with the sum is overwritten. When a medal column is missing the
/// source total (if any) is kept as-is.
pub fn normalize_medal_columns(table: Table) -> Table {
    let mut roles: Vec<ColumnRole> = ColumnRole::MEDALS.to_vec();
    roles.push(ColumnRole::Total);
    let mut table = normalize_columns(table, &roles);
    recompute_total(&mut table);
    table
}

/// Recompute `total` from the canonical medal columns. No-op when any of
/// them is absent.
pub fn recompute_total(table: &mut Table) {
    let idx: Vec<usize> = ColumnRole::MEDALS
        .iter()
        .filter_map(|r| table.column_index(r.canonical()))
        .collect();
    if idx.len() != 3 {
        return;
    }

    let existing = table.column_index(ColumnRole::Total.canonical());
    let mut disagreements = 0usize;
    let totals: Vec<Cell> = table
        .rows()
        .iter()
        .map(|row| {
            let counts: Option<Vec<u64>> = idx.iter().map(|&i| row[i].as_count()).collect();
            let derived = counts.map(|c| c.iter().sum::<u64>());
            if let (Some(d), Some(e)) = (derived, existing) {
                if row[e].as_count().is_some_and(|source| source != d) {
                    disagreements += 1;
                }
            }
            derived.map(Cell::from).unwrap_or(Cell::Null)
        })
        .collect();

    if disagreements > 0 {
        debug!(rows = disagreements, "source total disagrees with medal sum; using derived total");
    }
    table.set_column(ColumnRole::Total.canonical(), totals);
}

// ── Left joins ────────────────────────────────────────────────────────────────

/// Keep only the first row for each `noc` value. Rows without a code are
/// dropped.
pub fn dedupe_by_noc(table: &Table) -> Table {
    let mut out = Table::new(table.columns().iter().cloned());
    let Some(noc_idx) = table.column_index("noc") else {
        return out;
    };
    let mut seen = std::collections::HashSet::new();
    for row in table.rows() {
        let Some(code) = row[noc_idx].as_text() else {
            continue;
        };
        if seen.insert(code.into_owned()) {
            out.push_row(row.clone());
        }
    }
    out
}

/// Lookup `noc → column` over a deduplicated, normalised metadata table.
fn noc_lookup(metadata: &Table, column: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let (Some(noc_idx), Some(val_idx)) = (metadata.column_index("noc"), metadata.column_index(column)) else {
        return map;
    };
    for row in metadata.rows() {
        let (Some(code), Some(value)) = (row[noc_idx].as_text(), row[val_idx].as_text()) else {
            continue;
        };
        map.entry(code.into_owned()).or_insert_with(|| value.into_owned());
    }
    map
}

/// Left-join the `country` display name from `metadata` onto `primary`.
///
/// Existing non-null names in `primary` are kept. Metadata duplicates are
/// resolved to their first occurrence so the row count never changes.
/// Rows still without a name fall back to their NOC code.
pub fn enrich_country_names(mut primary: Table, metadata: &Table) -> Table {
    let Some(noc_idx) = primary.column_index("noc") else {
        return primary;
    };
    let lookup = noc_lookup(&dedupe_by_noc(metadata), ColumnRole::CountryName.canonical());
    let name_idx = primary.column_index(ColumnRole::CountryName.canonical());

    let names: Vec<Cell> = primary
        .rows()
        .iter()
        .map(|row| {
            if let Some(existing) = name_idx.map(|i| &row[i]).filter(|c| !c.is_null()) {
                return existing.clone();
            }
            match row[noc_idx].as_text() {
                Some(code) => Cell::Text(lookup.get(code.as_ref()).cloned().unwrap_or_else(|| code.into_owned())),
                None => Cell::Null,
            }
        })
        .collect();

    primary.set_column(ColumnRole::CountryName.canonical(), names);
    primary
}

/// Left-join a `continent` onto `primary`, never leaving it null.
///
/// Sources are tried in order (each a normalised table with `noc` and
/// `continent`), then the built-in table, then `"Other"`. Existing
/// non-null continents in `primary` are kept.
pub fn enrich_continents(mut primary: Table, sources: &[&Table]) -> Table {
    let lookups: Vec<HashMap<String, String>> = sources
        .iter()
        .map(|t| noc_lookup(&dedupe_by_noc(t), ColumnRole::Continent.canonical()))
        .collect();
    let noc_idx = primary.column_index("noc");
    let cont_idx = primary.column_index(ColumnRole::Continent.canonical());

    let continents: Vec<Cell> = primary
        .rows()
        .iter()
        .map(|row| {
            if let Some(existing) = cont_idx.map(|i| &row[i]).filter(|c| !c.is_null()) {
                return existing.clone();
            }
            let code = noc_idx.and_then(|i| row[i].as_text());
            let found = code.as_deref().and_then(|code| {
                lookups
                    .iter()
                    .find_map(|m| m.get(code).cloned())
                    .or_else(|| builtin_continent(code).map(str::to_string))
            });
            Cell::Text(found.unwrap_or_else(|| OTHER_CONTINENT.to_string()))
        })
        .collect();

    primary.set_column(ColumnRole::Continent.canonical(), continents);
    primary
}

/// Project a coach or team roster onto `(id, coach)` link rows.
///
/// Only the literal `athlete_id` column links a coach to an athlete; the
/// roster's own `code` identifies the coach. Without it the result is an
/// empty [`COACH_LINKS_SCHEMA`] table.
pub fn normalize_coach_links(raw: &Table) -> Table {
    let mut out = Table::new(COACH_LINKS_SCHEMA.iter().copied());
    let athlete_idx = raw.columns().iter().position(|c| c.eq_ignore_ascii_case("athlete_id"));
    let Some(athlete_idx) = athlete_idx else {
        debug!("roster has no athlete_id column; no coach links");
        return out;
    };
    let Some(coach) = resolve_excluding(raw, ColumnRole::Coach, &[athlete_idx]) else {
        debug!("roster has no coach column; no coach links");
        return out;
    };
    for row in raw.rows() {
        out.push_row(vec![row[athlete_idx].clone(), row[coach.index].clone()]);
    }
    out
}

// ── Dataset-level entry points ────────────────────────────────────────────────

/// Full medal-totals normalisation: canonical columns, derived total,
/// country names from `nocs`, continents from `nocs` → `countries` →
/// built-in table → `"Other"`.
pub fn normalize_medals_total(raw: Table, nocs: &Table, countries: Option<&Table>) -> Table {
    let table = normalize_columns(raw, &[ColumnRole::CountryCode, ColumnRole::CountryName, ColumnRole::Continent]);
    let table = normalize_medal_columns(table);
    if !table.has_column("noc") {
        warn!("medal totals have no country-code column; grouping by country is unavailable");
    }
    let table = enrich_country_names(table, nocs);
    let mut sources: Vec<&Table> = vec![nocs];
    if let Some(countries) = countries {
        sources.push(countries);
    }
    enrich_continents(table, &sources)
}
