use crate::error::{Result, SelectionError};

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// FieldRef – a resolved field of a dataset
// ---------------------------------------------------------------------------

/// Opaque reference to a field, produced by [`select_depth_field`] or
/// [`select_property_field`] and consumed by the other operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    position: usize,
    name: String,
}

impl FieldRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check the reference still names the same field of `dataset`.
    fn resolve(&self, dataset: &Dataset) -> Result<usize> {
        match dataset.field_names().get(self.position) {
            Some(name) if *name == self.name => Ok(self.position),
            _ => Err(SelectionError::unknown_field(&self.name)),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection – session-scoped choices, kept apart from any widget
// ---------------------------------------------------------------------------

/// The user's current choices. Plain data passed into the pure operations
/// below; changing it never touches the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub depth: FieldRef,
    pub property: Option<FieldRef>,
    pub lower: f64,
    pub upper: f64,
}

impl Selection {
    /// Default selection for a dataset: the given depth field over its full
    /// observed range, and the first other field as property (if any).
    pub fn for_depth(dataset: &Dataset, depth: FieldRef) -> Result<Self> {
        let (lower, upper) = compute_bounds(dataset, &depth)?;
        let property = property_candidates(dataset, &depth)
            .first()
            .map(|name| select_property_field(dataset, &depth, name))
            .transpose()?;
        Ok(Selection {
            depth,
            property,
            lower,
            upper,
        })
    }
}

// ---------------------------------------------------------------------------
// FilteredView – ordered subset of records
// ---------------------------------------------------------------------------

/// Records of a dataset passing a depth interval, in original order.
/// Holds row positions into the borrowed dataset.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the selected records in the source dataset.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// The selected records, in order.
    pub fn records(&self) -> impl Iterator<Item = &'a [CellValue]> + '_ {
        let rows = self.dataset.rows();
        self.rows.iter().map(move |&i| rows[i].as_slice())
    }

    /// Values of one field across the selected records.
    pub fn values(&self, field: &FieldRef) -> Result<Vec<&'a CellValue>> {
        let pos = field.resolve(self.dataset)?;
        Ok(self.records().map(|r| &r[pos]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Resolve the depth field by name. Accepts any field, including the implicit
/// index of an indexed dataset.
pub fn select_depth_field(dataset: &Dataset, name: &str) -> Result<FieldRef> {
    dataset
        .position(name)
        .map(|position| FieldRef {
            position,
            name: name.to_string(),
        })
        .ok_or_else(|| SelectionError::unknown_field(name))
}

/// Resolve a property field, which must exist and differ from the depth field.
pub fn select_property_field(dataset: &Dataset, depth: &FieldRef, name: &str) -> Result<FieldRef> {
    depth.resolve(dataset)?;
    if name == depth.name() {
        return Err(SelectionError::same_as_depth(name));
    }
    select_depth_field(dataset, name)
}

/// Fields eligible as property for the given depth field, in original order.
pub fn property_candidates<'a>(dataset: &'a Dataset, depth: &FieldRef) -> Vec<&'a str> {
    dataset
        .field_names()
        .iter()
        .map(String::as_str)
        .filter(|name| *name != depth.name())
        .collect()
}

/// Observed minimum and maximum of the depth field. Missing cells are skipped;
/// a text cell is an error.
pub fn compute_bounds(dataset: &Dataset, depth: &FieldRef) -> Result<(f64, f64)> {
    let pos = depth.resolve(dataset)?;
    if dataset.is_empty() {
        return Err(SelectionError::EmptyDataset);
    }

    let mut bounds: Option<(f64, f64)> = None;
    for (row, record) in dataset.rows().iter().enumerate() {
        let Some(v) = numeric_cell(&record[pos], depth, row)? else {
            continue;
        };
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    // Every cell missing: nothing numeric to bound.
    bounds.ok_or_else(|| SelectionError::non_numeric(depth.name(), 0, ""))
}

/// Stable filter keeping records with `lower <= depth <= upper`.
/// Records with a missing depth never match.
pub fn filter_by_range<'a>(
    dataset: &'a Dataset,
    depth: &FieldRef,
    lower: f64,
    upper: f64,
) -> Result<FilteredView<'a>> {
    if !lower.is_finite() || !upper.is_finite() || lower > upper {
        return Err(SelectionError::InvalidRange { lower, upper });
    }
    let pos = depth.resolve(dataset)?;

    let mut rows = Vec::new();
    for (row, record) in dataset.rows().iter().enumerate() {
        if let Some(v) = numeric_cell(&record[pos], depth, row)? {
            if lower <= v && v <= upper {
                rows.push(row);
            }
        }
    }
    Ok(FilteredView { dataset, rows })
}

/// Apply a [`Selection`]: the filtered view for its depth interval.
pub fn apply<'a>(dataset: &'a Dataset, selection: &Selection) -> Result<FilteredView<'a>> {
    filter_by_range(dataset, &selection.depth, selection.lower, selection.upper)
}

/// Encode a view as CSV: header of all field names in original order, then
/// one line per record. Indexed datasets write the index as the first column.
pub fn serialize(view: &FilteredView<'_>) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(view.dataset().field_names())?;
    for record in view.records() {
        writer.write_record(record.iter().map(|cell| cell.to_string()))?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// `Some(v)` for numbers, `None` for missing, error for text.
pub(crate) fn numeric_cell(cell: &CellValue, field: &FieldRef, row: usize) -> Result<Option<f64>> {
    match cell {
        CellValue::Number(v) => Ok(Some(*v)),
        CellValue::Missing => Ok(None),
        CellValue::Text(s) => Err(SelectionError::non_numeric(field.name(), row, s.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well() -> Dataset {
        let rows = [(100.0, 30.0), (150.0, 45.0), (200.0, 60.0), (250.0, 20.0)]
            .iter()
            .map(|&(d, gr)| vec![CellValue::Number(d), CellValue::Number(gr)])
            .collect();
        Dataset::columnar(vec!["DEPTH".into(), "GR".into()], rows).unwrap()
    }

    #[test]
    fn bounds_of_depth() {
        let ds = well();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        assert_eq!(compute_bounds(&ds, &depth).unwrap(), (100.0, 250.0));
    }

    #[test]
    fn filter_is_closed_and_ordered() {
        let ds = well();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        let view = filter_by_range(&ds, &depth, 150.0, 200.0).unwrap();
        assert_eq!(view.row_indices(), &[1, 2]);
    }

    #[test]
    fn reversed_or_nan_range_is_rejected() {
        let ds = well();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        assert!(matches!(
            filter_by_range(&ds, &depth, 200.0, 150.0),
            Err(SelectionError::InvalidRange { .. })
        ));
        assert!(matches!(
            filter_by_range(&ds, &depth, f64::NAN, 150.0),
            Err(SelectionError::InvalidRange { .. })
        ));
        assert!(matches!(
            filter_by_range(&ds, &depth, 0.0, f64::INFINITY),
            Err(SelectionError::InvalidRange { .. })
        ));
    }

    #[test]
    fn infinite_depth_is_not_numeric() {
        let ds = crate::data::loader::parse_csv(b"DEPTH,GR\n100,30\ninf,45\n").unwrap();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        assert_eq!(
            compute_bounds(&ds, &depth),
            Err(SelectionError::non_numeric("DEPTH", 1, "inf"))
        );
    }

    #[test]
    fn missing_depth_is_skipped() {
        let ds = Dataset::columnar(
            vec!["DEPTH".into()],
            vec![
                vec![CellValue::Number(1.0)],
                vec![CellValue::Missing],
                vec![CellValue::Number(3.0)],
            ],
        )
        .unwrap();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        assert_eq!(compute_bounds(&ds, &depth).unwrap(), (1.0, 3.0));
        let view = filter_by_range(&ds, &depth, 0.0, 10.0).unwrap();
        assert_eq!(view.row_indices(), &[0, 2]);
    }

    #[test]
    fn text_depth_is_non_numeric() {
        let ds = Dataset::columnar(
            vec!["ZONE".into(), "GR".into()],
            vec![vec!["A".into(), CellValue::Number(1.0)]],
        )
        .unwrap();
        let depth = select_depth_field(&ds, "ZONE").unwrap();
        assert_eq!(
            compute_bounds(&ds, &depth),
            Err(SelectionError::non_numeric("ZONE", 0, "A"))
        );
        assert!(matches!(
            filter_by_range(&ds, &depth, 0.0, 1.0),
            Err(SelectionError::NonNumericField { .. })
        ));
    }

    #[test]
    fn all_missing_depth_has_no_bounds() {
        let ds = Dataset::columnar(vec!["DEPTH".into()], vec![vec![CellValue::Missing]]).unwrap();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        assert!(matches!(
            compute_bounds(&ds, &depth),
            Err(SelectionError::NonNumericField { .. })
        ));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::columnar(vec!["DEPTH".into()], vec![]).unwrap();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        assert_eq!(compute_bounds(&ds, &depth), Err(SelectionError::EmptyDataset));
    }

    #[test]
    fn field_ref_from_other_dataset_is_rejected() {
        let ds = well();
        let other = Dataset::columnar(vec!["GR".into(), "DEPTH".into()], vec![]).unwrap();
        let depth = select_depth_field(&other, "GR").unwrap();
        assert!(matches!(
            compute_bounds(&ds, &depth),
            Err(SelectionError::InvalidField { .. })
        ));
    }

    #[test]
    fn default_selection_spans_bounds() {
        let ds = well();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        let sel = Selection::for_depth(&ds, depth).unwrap();
        assert_eq!((sel.lower, sel.upper), (100.0, 250.0));
        assert_eq!(sel.property.as_ref().map(FieldRef::name), Some("GR"));
        assert_eq!(apply(&ds, &sel).unwrap().len(), 4);
    }

    #[test]
    fn candidates_exclude_depth() {
        let ds = well();
        let depth = select_depth_field(&ds, "GR").unwrap();
        assert_eq!(property_candidates(&ds, &depth), vec!["DEPTH"]);
    }

    #[test]
    fn serialize_writes_header_and_rows() {
        let ds = well();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        let view = filter_by_range(&ds, &depth, 150.0, 200.0).unwrap();
        let text = String::from_utf8(serialize(&view).unwrap()).unwrap();
        assert_eq!(text, "DEPTH,GR\n150,45\n200,60\n");
    }

    #[test]
    fn serialize_quotes_text_with_commas() {
        let ds = Dataset::columnar(
            vec!["DEPTH".into(), "NOTE".into()],
            vec![vec![CellValue::Number(1.0), "sand, fine".into()]],
        )
        .unwrap();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        let view = filter_by_range(&ds, &depth, 0.0, 2.0).unwrap();
        let text = String::from_utf8(serialize(&view).unwrap()).unwrap();
        assert_eq!(text, "DEPTH,NOTE\n1,\"sand, fine\"\n");
    }
}
