//! Minimal in-memory tabular frame.
//!
//! A [`Table`] is an ordered list of named columns plus row-major cells.
//! CSV readers produce [`Cell::Text`] / [`Cell::Null`] only; numeric
//! interpretation happens lazily so identifiers such as `"007"` survive
//! untouched.

use std::borrow::Cow;

use serde::Serialize;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A single value in a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value (empty CSV field, `NaN`, `null`).
    Null,
    /// Raw text exactly as read from the source.
    Text(String),
    /// A derived numeric value (e.g. a computed `total`).
    Number(f64),
}

impl Cell {
    /// Build a cell from a raw CSV field.
    ///
    /// Empty fields and the usual null spellings become [`Cell::Null`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "" | "NaN" | "nan" | "NULL" | "null" | "None" | "NA" | "N/A" => Cell::Null,
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric interpretation of the cell, `None` when null or unparseable.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Number(v) => v.is_finite().then_some(*v),
            Cell::Text(s) => s
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite()),
        }
    }

    /// Interpret the cell as a non-negative whole count (`"3"`, `"3.0"`).
    /// Values above `u32::MAX` are not treated as counts.
    pub fn as_count(&self) -> Option<u64> {
        let v = self.as_f64()?;
        if v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
            return None;
        }
        Some(v as u64)
    }

    /// Text interpretation of the cell. Integral numbers render without a
    /// fractional part.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(v) if v.fract() == 0.0 => Some(Cow::Owned(format!("{}", *v as i64))),
            Cell::Number(v) => Some(Cow::Owned(v.to_string())),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::parse(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::parse(&value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Null)
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Ordered named columns with row-major cells.
///
/// Every row always has exactly `columns.len()` cells; [`Table::push_row`]
/// pads or truncates to keep that invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals; handy for fixtures.
    pub fn from_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(columns.iter().copied());
        for row in rows {
            table.push_row(row.iter().map(|v| Cell::parse(v)).collect());
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    /// Cell at (`row`, `col`), `None` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Cell at `row` in the column named `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_index(name)?;
        self.cell(row, col)
    }

    /// Iterate over one column's cells.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |r| r.get(col))
    }

    /// Rename `from` to `to`.
    ///
    /// Returns `false` (and leaves the table untouched) when `from` does not
    /// exist or a *different* column is already called `to`.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        let Some(idx) = self.column_index(from) else {
            return false;
        };
        if from == to {
            return true;
        }
        if self.has_column(to) {
            return false;
        }
        self.columns[idx] = to.to_string();
        true
    }

    /// Set (or replace) a whole column. `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                let mut values = values.into_iter();
                for row in &mut self.rows {
                    row.push(values.next().unwrap_or(Cell::Null));
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse_null_spellings() {
        for raw in ["", "  ", "NaN", "nan", "null", "None", "NA"] {
            assert!(Cell::parse(raw).is_null(), "{raw:?} should be null");
        }
        assert_eq!(Cell::parse(" USA "), Cell::Text("USA".to_string()));
    }

    #[test]
    fn test_cell_as_count() {
        assert_eq!(Cell::parse("12").as_count(), Some(12));
        assert_eq!(Cell::parse("12.0").as_count(), Some(12));
        assert_eq!(Cell::parse("1,204").as_count(), Some(1204));
        assert_eq!(Cell::parse("1.5").as_count(), None);
        assert_eq!(Cell::parse("-1").as_count(), None);
        assert_eq!(Cell::parse("ten").as_count(), None);
        assert_eq!(Cell::Null.as_count(), None);
        assert_eq!(Cell::Number(7.0).as_count(), Some(7));
    }

    #[test]
    fn test_cell_as_text_keeps_leading_zeros() {
        assert_eq!(Cell::parse("007").as_text().as_deref(), Some("007"));
        assert_eq!(Cell::Number(14.0).as_text().as_deref(), Some("14"));
        assert_eq!(Cell::Null.as_text(), None);
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec![Cell::parse("1")]);
        table.push_row(vec![Cell::parse("1"), Cell::parse("2"), Cell::parse("3")]);
        assert_eq!(table.rows()[0].len(), 2);
        assert!(table.rows()[0][1].is_null());
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn test_rename_column_refuses_collision() {
        let mut table = Table::from_rows(&["NOC", "noc"], &[&["USA", "US"]]);
        assert!(!table.rename_column("NOC", "noc"));
        assert_eq!(table.columns(), &["NOC".to_string(), "noc".to_string()]);
        assert!(table.rename_column("NOC", "code"));
        assert!(table.has_column("code"));
        assert!(!table.rename_column("missing", "x"));
    }

    #[test]
    fn test_set_column_appends_and_replaces() {
        let mut table = Table::from_rows(&["noc"], &[&["USA"], &["CHN"]]);
        table.set_column("total", vec![Cell::from(3u64), Cell::from(4u64)]);
        assert_eq!(table.value(1, "total").and_then(Cell::as_count), Some(4));
        table.set_column("total", vec![Cell::from(5u64), Cell::from(6u64)]);
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.value(0, "total").and_then(Cell::as_count), Some(5));
    }
}
