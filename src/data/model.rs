use std::collections::{HashMap, HashSet};
use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, mirroring what a CSV/LAS reader can infer.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Always finite. NaN is stored as `Missing`, infinities as `Text`.
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Infer a cell from raw text: empty → `Missing`, finite number →
    /// `Number`, anything else (`inf` included) → `Text`.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Missing;
        }
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_nan() => CellValue::Missing,
            Ok(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Same classification as [`CellValue::infer`] on the value's display form,
/// so a download re-parses to the cell it came from.
impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            CellValue::Missing
        } else if v.is_infinite() {
            CellValue::Text(v.to_string())
        } else {
            CellValue::Number(v)
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Plain-text rendering. Numbers use the shortest representation that parses
/// back to the same `f64`, which keeps CSV output lossless.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Shape – where the depth axis lives
// ---------------------------------------------------------------------------

/// The two supported dataset shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Generic tabular data: every field is an ordinary named column.
    Columnar,
    /// Well-log data: field 0 is the implicit row index (depth) and is not
    /// listed among the named columns.
    Indexed,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered, read-only table of records sharing one set of field names.
///
/// Both shapes keep every field, index included, in `fields` so that
/// filtering and serialization are written once. For `Shape::Indexed` the
/// index is always `fields[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    fields: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    shape: Shape,
}

impl Dataset {
    /// Build a columnar dataset. Field names must be unique and every row must
    /// have one cell per field.
    pub fn columnar(fields: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        Self::build(fields, rows, Shape::Columnar)
    }

    /// Build an indexed dataset from an index name, its values and the
    /// remaining named columns.
    pub fn indexed(
        index_name: impl Into<String>,
        columns: Vec<String>,
        index: Vec<CellValue>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        if index.len() != rows.len() {
            bail!(
                "index has {} values but there are {} rows",
                index.len(),
                rows.len()
            );
        }
        let mut fields = Vec::with_capacity(columns.len() + 1);
        fields.push(index_name.into());
        fields.extend(columns);

        let rows = index
            .into_iter()
            .zip(rows)
            .map(|(idx, mut row)| {
                row.insert(0, idx);
                row
            })
            .collect();
        Self::build(fields, rows, Shape::Indexed)
    }

    fn build(fields: Vec<String>, rows: Vec<Vec<CellValue>>, shape: Shape) -> Result<Self> {
        if shape == Shape::Indexed && fields.is_empty() {
            bail!("indexed dataset needs an index field");
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for name in &fields {
            if !seen.insert(name.as_str()) {
                bail!("duplicate field name '{name}'");
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != fields.len() {
                bail!(
                    "row {i} has {} values but there are {} fields",
                    row.len(),
                    fields.len()
                );
            }
        }
        Ok(Dataset {
            fields,
            rows,
            shape,
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// All field names in original order, the index first for indexed data.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Name of the implicit index, for indexed datasets.
    pub fn index_name(&self) -> Option<&str> {
        match self.shape {
            Shape::Columnar => None,
            Shape::Indexed => self.fields.first().map(String::as_str),
        }
    }

    /// The field a viewer should use as depth before the user picks one:
    /// the index for well logs, the first column otherwise.
    pub fn default_depth_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Position of a field by name, index included.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&[CellValue]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by the readers
// ---------------------------------------------------------------------------

/// Make header names unique by appending `{sep}{n}` to repeats, e.g. `GR`,
/// `GR.1`, `GR.2` for CSV or `GR:1`, `GR:2` for LAS curves.
pub fn dedupe_names(names: Vec<String>, sep: char, number_first: bool) -> Vec<String> {
    let mut counts = HashMap::<String, usize>::new();
    for n in &names {
        *counts.entry(n.clone()).or_default() += 1;
    }
    let mut taken: HashSet<String> = HashSet::new();
    let mut seen = HashMap::<String, usize>::new();

    names
        .into_iter()
        .map(|name| {
            let dup = counts.get(&name).copied().unwrap_or(0) > 1;
            let k = seen.entry(name.clone()).or_default();
            let start = if number_first && dup { 1 } else { 0 };
            let mut n = (*k).max(start);
            let mut candidate = if n == 0 {
                name.clone()
            } else {
                format!("{name}{sep}{n}")
            };
            while taken.contains(&candidate) {
                n += 1;
                candidate = format!("{name}{sep}{n}");
            }
            *k = n + 1;
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infer_cells() {
        assert_eq!(CellValue::infer(""), CellValue::Missing);
        assert_eq!(CellValue::infer("150"), CellValue::Number(150.0));
        assert_eq!(CellValue::infer(" 2.5 "), CellValue::Number(2.5));
        assert_eq!(CellValue::infer("NaN"), CellValue::Missing);
        assert_eq!(CellValue::infer("shale"), CellValue::Text("shale".into()));
    }

    #[test]
    fn infinities_are_text() {
        assert_eq!(CellValue::infer("inf"), CellValue::Text("inf".into()));
        assert_eq!(CellValue::infer("-Infinity"), CellValue::Text("-Infinity".into()));
        assert_eq!(CellValue::from(f64::INFINITY), CellValue::Text("inf".into()));
        assert_eq!(CellValue::from(f64::NEG_INFINITY), CellValue::infer("-inf"));
        assert_eq!(CellValue::from(f64::NAN), CellValue::Missing);
    }

    #[test]
    fn numbers_display_without_trailing_zeros() {
        assert_eq!(CellValue::Number(150.0).to_string(), "150");
        assert_eq!(CellValue::Number(-999.25).to_string(), "-999.25");
        assert_eq!(CellValue::Missing.to_string(), "");
    }

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    #[test]
    fn indexed_keeps_index_out_of_columns() {
        let ds = Dataset::indexed(
            "DEPT",
            names(&["GR", "RHOB"]),
            vec![num(1000.0), num(1000.5)],
            vec![vec![num(45.0), num(2.3)], vec![num(50.0), num(2.4)]],
        )
        .unwrap();

        assert_eq!(ds.shape(), Shape::Indexed);
        assert_eq!(ds.field_names(), names(&["DEPT", "GR", "RHOB"]).as_slice());
        assert_eq!(ds.index_name(), Some("DEPT"));
        assert_eq!(ds.position("DEPT"), Some(0));
        assert_eq!(ds.row(1).unwrap()[0], num(1000.5));
    }

    #[test]
    fn rejects_duplicate_fields_and_ragged_rows() {
        assert!(Dataset::columnar(names(&["A", "A"]), vec![]).is_err());
        assert!(Dataset::columnar(names(&["A", "B"]), vec![vec![num(1.0)]]).is_err());
        assert!(
            Dataset::indexed("DEPT", names(&["DEPT"]), vec![], vec![]).is_err(),
            "index name may not repeat as a column"
        );
    }

    #[test]
    fn dedupe_csv_style() {
        let out = dedupe_names(names(&["A", "B", "A", "A"]), '.', false);
        assert_eq!(out, names(&["A", "B", "A.1", "A.2"]));
    }

    #[test]
    fn dedupe_las_style() {
        let out = dedupe_names(names(&["DEPT", "GR", "GR"]), ':', true);
        assert_eq!(out, names(&["DEPT", "GR:1", "GR:2"]));
    }

    #[test]
    fn dedupe_avoids_existing_suffix() {
        let out = dedupe_names(names(&["A", "A.1", "A"]), '.', false);
        assert_eq!(out, names(&["A", "A.1", "A.2"]));
    }
}
