//! Column resolution by semantic role.
//!
//! Given an arbitrary column list, find the column that plays a
//! [`ColumnRole`]. Matching is case-insensitive:
//!
//! 1. Exact aliases are tried in the role's priority order; for each alias
//!    the first column (table order) equal to it wins.
//! 2. Only if no alias matches, roles that allow it fall back to the first
//!    column whose name *contains* the role's substring. This is loose on
//!    purpose (`"goldfish"` would match gold) and every such hit is logged.

use olympics_core::roles::ColumnRole;
use olympics_core::table::Table;
use serde::Serialize;
use tracing::debug;

/// How a column was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Substring,
}

/// A resolved column for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub role: ColumnRole,
    /// Column name as it appears in the source.
    pub column: String,
    /// Position in the column list.
    pub index: usize,
    pub kind: MatchKind,
}

/// Resolve `role` against a column list. Pure apart from the debug log.
pub fn resolve_column(columns: &[String], role: ColumnRole) -> Option<Resolution> {
    let lowered: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    for alias in role.aliases() {
        if let Some(index) = lowered.iter().position(|c| c == alias) {
            return Some(Resolution {
                role,
                column: columns[index].clone(),
                index,
                kind: MatchKind::Exact,
            });
        }
    }

    let needle = role.substring_fallback()?;
    let index = lowered.iter().position(|c| c.contains(needle))?;
    debug!(
        role = %role,
        column = %columns[index],
        "resolved column by substring fallback"
    );
    Some(Resolution {
        role,
        column: columns[index].clone(),
        index,
        kind: MatchKind::Substring,
    })
}

/// Resolve `role` against a table's columns.
pub fn resolve(table: &Table, role: ColumnRole) -> Option<Resolution> {
    resolve_column(table.columns(), role)
}

/// Resolve `role` but ignore columns already claimed by another role.
///
/// Needed where aliases overlap, e.g. athletes files carry both `code`
/// (athlete id) and `country_code` (NOC).
pub fn resolve_excluding(table: &Table, role: ColumnRole, claimed: &[usize]) -> Option<Resolution> {
    let masked: Vec<String> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| if claimed.contains(&i) { String::new() } else { c.clone() })
        .collect();
    let mut found = resolve_column(&masked, role)?;
    found.column = table.columns()[found.index].clone();
    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_country_code_aliases() {
        for name in ["noc", "NOC", "country_code", "Code"] {
            let columns = cols(&["Gold", name, "Silver"]);
            let res = resolve_column(&columns, ColumnRole::CountryCode).unwrap();
            assert_eq!(res.column, name);
            assert_eq!(res.index, 1);
            assert_eq!(res.kind, MatchKind::Exact);
        }
    }

    #[test]
    fn test_alias_priority_beats_column_order() {
        // Athlete files put the athlete `code` before `country_code`.
        let columns = cols(&["code", "name", "country_code"]);
        let res = resolve_column(&columns, ColumnRole::CountryCode).unwrap();
        assert_eq!(res.column, "country_code");
    }

    #[test]
    fn test_first_column_wins_within_same_alias() {
        let columns = cols(&["Gold", "gold"]);
        let res = resolve_column(&columns, ColumnRole::Gold).unwrap();
        assert_eq!(res.index, 0);
    }

    #[test]
    fn test_medal_suffixed_alias_beats_earlier_substring_column() {
        // "Gold Medal" is an exact alias, so it wins even though "gold_rank"
        // comes first and would match by substring.
        let columns = cols(&["gold_rank", "Gold Medal"]);
        let res = resolve_column(&columns, ColumnRole::Gold).unwrap();
        assert_eq!(res.column, "Gold Medal");
        assert_eq!(res.kind, MatchKind::Exact);
    }

    #[test]
    fn test_bare_medal_name_outranks_suffixed_alias() {
        let columns = cols(&["Gold Medal", "gold"]);
        let res = resolve_column(&columns, ColumnRole::Gold).unwrap();
        assert_eq!(res.column, "gold");
    }

    #[test]
    fn test_substring_fallback_is_loose() {
        let columns = cols(&["noc", "goldfish"]);
        let res = resolve_column(&columns, ColumnRole::Gold).unwrap();
        assert_eq!(res.column, "goldfish");
        assert_eq!(res.kind, MatchKind::Substring);
    }

    #[test]
    fn test_no_substring_for_country_code() {
        let columns = cols(&["nocturnal", "iso_code_3"]);
        assert!(resolve_column(&columns, ColumnRole::CountryCode).is_none());
    }

    #[test]
    fn test_medal_type_prefers_exact_over_medal_date() {
        let columns = cols(&["medal_date", "medal_type", "medal_code"]);
        let res = resolve_column(&columns, ColumnRole::MedalType).unwrap();
        assert_eq!(res.column, "medal_type");
    }

    #[test]
    fn test_resolve_excluding_claimed() {
        let table = Table::new(["code", "country_code", "name"]);
        let noc = resolve(&table, ColumnRole::CountryCode).unwrap();
        assert_eq!(noc.column, "country_code");

        let id = resolve_excluding(&table, ColumnRole::AthleteId, &[noc.index]).unwrap();
        assert_eq!(id.column, "code");

        let table = Table::new(["country_code", "name"]);
        let noc = resolve(&table, ColumnRole::CountryCode).unwrap();
        assert!(resolve_excluding(&table, ColumnRole::AthleteId, &[noc.index]).is_none());
    }

    #[test]
    fn test_empty_columns() {
        assert!(resolve_column(&[], ColumnRole::Total).is_none());
    }
}
