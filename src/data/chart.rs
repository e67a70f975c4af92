use crate::error::Result;

use super::filter::{FieldRef, FilteredView, numeric_cell};

// ---------------------------------------------------------------------------
// Scatter: property (x) against depth (y)
// ---------------------------------------------------------------------------

/// `[property, depth]` pairs for every record in the view where both values
/// are present. Text in either field is an error.
pub fn scatter_points(
    view: &FilteredView<'_>,
    depth: &FieldRef,
    property: &FieldRef,
) -> Result<Vec<[f64; 2]>> {
    let depths = view.values(depth)?;
    let props = view.values(property)?;

    let mut points = Vec::with_capacity(view.len());
    for ((&row, d), p) in view.row_indices().iter().zip(depths).zip(props) {
        let d = numeric_cell(d, depth, row)?;
        let p = numeric_cell(p, property, row)?;
        if let (Some(d), Some(p)) = (d, p) {
            points.push([p, d]);
        }
    }
    Ok(points)
}

/// Numeric values of one field across the view, missing cells skipped.
pub fn numeric_values(view: &FilteredView<'_>, field: &FieldRef) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(view.len());
    for (&row, cell) in view.row_indices().iter().zip(view.values(field)?) {
        if let Some(v) = numeric_cell(cell, field, row)? {
            out.push(v);
        }
    }
    Ok(out)
}

/// `(min, max)` of a series, `None` when empty.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One bar of a histogram: `[start, end)` (last bin closed) and its count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over the observed range of `values`.
///
/// A constant series collapses to a single unit-width bin centred on the
/// value; an empty series gives no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some((lo, hi)) = value_range(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if lo == hi {
        return vec![HistogramBin {
            start: lo - 0.5,
            end: hi + 0.5,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_by_range, select_depth_field, select_property_field};
    use crate::data::model::{CellValue, Dataset};
    use crate::error::SelectionError;

    fn ds() -> Dataset {
        Dataset::columnar(
            vec!["DEPTH".into(), "GR".into(), "ZONE".into()],
            vec![
                vec![CellValue::Number(100.0), CellValue::Number(30.0), "A".into()],
                vec![CellValue::Number(150.0), CellValue::Missing, "A".into()],
                vec![CellValue::Number(200.0), CellValue::Number(60.0), "B".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn scatter_skips_missing() {
        let ds = ds();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        let gr = select_property_field(&ds, &depth, "GR").unwrap();
        let view = filter_by_range(&ds, &depth, 100.0, 200.0).unwrap();
        assert_eq!(
            scatter_points(&view, &depth, &gr).unwrap(),
            vec![[30.0, 100.0], [60.0, 200.0]]
        );
        assert_eq!(numeric_values(&view, &gr).unwrap(), vec![30.0, 60.0]);
    }

    #[test]
    fn scatter_rejects_text_property() {
        let ds = ds();
        let depth = select_depth_field(&ds, "DEPTH").unwrap();
        let zone = select_property_field(&ds, &depth, "ZONE").unwrap();
        let view = filter_by_range(&ds, &depth, 100.0, 200.0).unwrap();
        assert_eq!(
            scatter_points(&view, &depth, &zone),
            Err(SelectionError::non_numeric("ZONE", 0, "A"))
        );
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram(&values, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].count, 2); // [0, 2)
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[4].count, 1); // max lands in the last, closed bin
        assert_eq!(bins[4].end, 10.0);
    }

    #[test]
    fn histogram_constant_and_empty() {
        let bins = histogram(&[5.0, 5.0], 50);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].center(), 5.0);
        assert!(histogram(&[], 50).is_empty());
    }
}
