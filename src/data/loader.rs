use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::document::{self, DocumentContent, RasterImage};
use super::las::{self, WellLog};
use super::model::{CellValue, Dataset, dedupe_names};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Everything the viewer can show for an opened file.
#[derive(Debug, Clone)]
pub enum LoadedContent {
    /// Generic tabular data (columnar dataset).
    Tabular(Dataset),
    /// LAS well log (indexed dataset plus header sections).
    WellLog(WellLog),
    /// A raster log image.
    Image(RasterImage),
    /// Text and images extracted from a PDF.
    Document(DocumentContent),
}

impl LoadedContent {
    /// The dataset behind the two tabular paths, if any.
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            LoadedContent::Tabular(ds) => Some(ds),
            LoadedContent::WellLog(log) => Some(&log.data),
            LoadedContent::Image(_) | LoadedContent::Document(_) => None,
        }
    }
}

/// An opened file: display name plus parsed content.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub content: LoadedContent,
}

/// Load a file, dispatching by extension.
///
/// Supported formats:
/// * `.csv`            – header row, one record per line
/// * `.json`           – `[{ "DEPTH": 100.0, "GR": 30.0, ... }, ...]`
/// * `.parquet`/`.pq`  – flat columns
/// * `.las`            – LAS 2.0 well log
/// * `.png`            – raster log image
/// * `.pdf`            – document (text + embedded images)
pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let content = match ext.as_str() {
        "csv" => LoadedContent::Tabular(parse_csv(&read(path)?)?),
        "json" => LoadedContent::Tabular(parse_json(&read(path)?)?),
        "parquet" | "pq" => LoadedContent::Tabular(load_parquet(path)?),
        "las" => {
            let bytes = read(path)?;
            LoadedContent::WellLog(las::parse(&String::from_utf8_lossy(&bytes))?)
        }
        "png" => LoadedContent::Image(document::parse_png(read(path)?)?),
        "pdf" => LoadedContent::Document(document::parse_pdf(&read(path)?)?),
        other => bail!("Unsupported file extension: .{other}"),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(ds) = content.dataset() {
        log::info!(
            "Loaded {name}: {} records, fields {:?}",
            ds.len(),
            ds.field_names()
        );
    } else {
        log::info!("Loaded {name}");
    }

    Ok(LoadedFile { name, content })
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Parse CSV bytes into a columnar dataset.
///
/// Header row with column names; cells are inferred per [`CellValue::infer`].
/// This is also the reader that re-parses the download output.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let headers = dedupe_names(headers, '.', false);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }

    Dataset::columnar(headers, rows).context("building dataset from CSV")
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "DEPTH": 100.0, "GR": 30.0, "ZONE": "A" },
///   ...
/// ]
/// ```
///
/// Fields are ordered by first appearance; absent keys become `Missing`.
pub fn parse_json(bytes: &[u8]) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut fields: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !fields.contains(key) {
                fields.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            fields
                .iter()
                .map(|f| obj.get(f).map(json_to_cell).unwrap_or(CellValue::Missing))
                .collect()
        })
        .collect();

    Dataset::columnar(fields, rows).context("building dataset from JSON")
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        // Same inference as CSV so the download re-parses to the same cells.
        JsonValue::String(s) => CellValue::infer(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::from(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file. Numeric columns are cast to `f64`, everything
/// else to strings inferred like CSV cells. Works with files written by
/// Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let fields: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = rows.len();
        rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(fields.len())));

        for (col_idx, col) in batch.columns().iter().enumerate() {
            let cells = column_cells(col.as_ref())
                .with_context(|| format!("column '{}'", fields[col_idx]))?;
            for (row, cell) in cells.into_iter().enumerate() {
                rows[offset + row].push(cell);
            }
        }
    }

    Dataset::columnar(fields, rows).context("building dataset from parquet")
}

/// Convert one Arrow column to cells.
fn column_cells(col: &dyn Array) -> Result<Vec<CellValue>> {
    if col.data_type().is_numeric() {
        let floats = cast(col, &DataType::Float64)?;
        let floats = floats.as_primitive::<Float64Type>();
        return Ok(floats
            .iter()
            .map(|v| v.map(CellValue::from).unwrap_or(CellValue::Missing))
            .collect());
    }

    let strings = cast(col, &DataType::Utf8)
        .with_context(|| format!("unsupported column type {:?}", col.data_type()))?;
    let strings = strings.as_string::<i32>();
    Ok(strings
        .iter()
        .map(|v| v.map(CellValue::infer).unwrap_or(CellValue::Missing))
        .collect())
}
