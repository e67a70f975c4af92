//! LAS 2.0 well-log reader.
//!
//! A LAS file is a sequence of `~` sections. Header sections hold lines of
//! the form `MNEM.UNIT  VALUE : DESCRIPTION`; the `~A` section holds the
//! curve samples, first curve being the depth index.

use std::fmt::{self, Write as _};

use anyhow::{Context, Result, bail};

use super::model::{CellValue, Dataset, dedupe_names};

/// Null sentinel used when `~W NULL` is absent.
pub const DEFAULT_NULL: f64 = -999.25;

/// One `MNEM.UNIT VALUE : DESCRIPTION` header line.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderItem {
    pub mnemonic: String,
    pub unit: String,
    pub value: String,
    pub description: String,
}

/// A parsed well log: header sections plus the indexed curve data.
#[derive(Debug, Clone)]
pub struct WellLog {
    pub version: Vec<HeaderItem>,
    pub well: Vec<HeaderItem>,
    pub curves: Vec<HeaderItem>,
    pub params: Vec<HeaderItem>,
    pub other: String,
    /// Curve samples; the index is the first curve (usually `DEPT`).
    pub data: Dataset,
}

impl WellLog {
    /// Look up a `~W` item by mnemonic, case-insensitively.
    pub fn well_item(&self, mnemonic: &str) -> Option<&HeaderItem> {
        self.well
            .iter()
            .find(|h| h.mnemonic.eq_ignore_ascii_case(mnemonic))
    }

    /// Unit of the index curve, e.g. `M` or `FT`.
    pub fn depth_unit(&self) -> Option<&str> {
        self.curves
            .first()
            .map(|c| c.unit.as_str())
            .filter(|u| !u.is_empty())
    }
}

/// Header summary as shown above the data preview.
impl fmt::Display for WellLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("Version", &self.version),
            ("Well", &self.well),
            ("Curves", &self.curves),
            ("Parameter", &self.params),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            writeln!(f, "~{title}")?;
            for h in items {
                let mnem = if h.unit.is_empty() {
                    h.mnemonic.clone()
                } else {
                    format!("{}.{}", h.mnemonic, h.unit)
                };
                writeln!(f, "  {mnem:<12} {:<24} : {}", h.value, h.description)?;
            }
        }
        if !self.other.is_empty() {
            writeln!(f, "~Other")?;
            for line in self.other.lines() {
                writeln!(f, "  {line}")?;
            }
        }
        write!(
            f,
            "{} samples x {} curves",
            self.data.len(),
            self.data.field_names().len()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Version,
    Well,
    Curves,
    Params,
    Other,
    Ascii,
    Unknown,
}

impl Section {
    fn from_marker(line: &str) -> Self {
        match line[1..].chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('V') => Section::Version,
            Some('W') => Section::Well,
            Some('C') => Section::Curves,
            Some('P') => Section::Params,
            Some('O') => Section::Other,
            Some('A') => Section::Ascii,
            _ => Section::Unknown,
        }
    }
}

/// Parse LAS text into a [`WellLog`].
pub fn parse(text: &str) -> Result<WellLog> {
    let mut version = Vec::new();
    let mut well = Vec::new();
    let mut curves = Vec::new();
    let mut params = Vec::new();
    let mut other = String::new();
    let mut tokens: Vec<(usize, &str)> = Vec::new();

    let mut section = None;
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('~') {
            section = Some(Section::from_marker(line));
            continue;
        }
        let target = match section {
            Some(Section::Version) => &mut version,
            Some(Section::Well) => &mut well,
            Some(Section::Curves) => &mut curves,
            Some(Section::Params) => &mut params,
            Some(Section::Other) => {
                let _ = writeln!(other, "{line}");
                continue;
            }
            Some(Section::Ascii) => {
                tokens.extend(line.split_whitespace().map(|t| (line_no + 1, t)));
                continue;
            }
            Some(Section::Unknown) => continue,
            None => bail!("line {}: content before the first ~ section", line_no + 1),
        };
        target.push(parse_header_line(line).with_context(|| format!("line {}", line_no + 1))?);
    }

    if curves.is_empty() {
        bail!("LAS file has no ~Curve section entries");
    }

    let null = well
        .iter()
        .find(|h: &&HeaderItem| h.mnemonic.eq_ignore_ascii_case("NULL"))
        .and_then(|h| h.value.parse::<f64>().ok())
        .unwrap_or(DEFAULT_NULL);

    let names = dedupe_names(
        curves.iter().map(|c: &HeaderItem| c.mnemonic.clone()).collect(),
        ':',
        true,
    );

    let (index, rows) = read_samples(&tokens, names.len(), null)?;
    let mut names = names.into_iter();
    let index_name = names.next().unwrap_or_default();
    let data = Dataset::indexed(index_name, names.collect(), index, rows)
        .context("building dataset from LAS")?;

    Ok(WellLog {
        version,
        well,
        curves,
        params,
        other: other.trim_end().to_string(),
        data,
    })
}

/// `MNEM.UNIT  VALUE : DESCRIPTION`. The unit ends at the first whitespace
/// after the dot; the description follows the last colon.
fn parse_header_line(line: &str) -> Result<HeaderItem> {
    let dot = line
        .find('.')
        .with_context(|| format!("missing '.' in header line '{line}'"))?;
    let mnemonic = line[..dot].trim().to_string();
    let rest = &line[dot + 1..];

    let unit_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    // A colon directly after the unit ("DEPT.M:") also ends it.
    let unit_end = rest[..unit_end].find(':').unwrap_or(unit_end);
    let unit = rest[..unit_end].to_string();
    let rest = &rest[unit_end..];

    let (value, description) = match rest.rfind(':') {
        Some(colon) => (&rest[..colon], &rest[colon + 1..]),
        None => (rest, ""),
    };

    Ok(HeaderItem {
        mnemonic,
        unit,
        value: value.trim().to_string(),
        description: description.trim().to_string(),
    })
}

type Samples = (Vec<CellValue>, Vec<Vec<CellValue>>);

/// Chunk the `~A` tokens by curve count. Works for both wrapped and
/// unwrapped files since rows are never split by line.
fn read_samples(tokens: &[(usize, &str)], n_curves: usize, null: f64) -> Result<Samples> {
    if tokens.len() % n_curves != 0 {
        bail!(
            "~A section has {} values, not a multiple of {n_curves} curves",
            tokens.len()
        );
    }

    let mut index = Vec::with_capacity(tokens.len() / n_curves);
    let mut rows = Vec::with_capacity(tokens.len() / n_curves);
    for chunk in tokens.chunks(n_curves) {
        let mut cells = chunk
            .iter()
            .map(|&(line_no, tok)| {
                let v: f64 = tok
                    .parse()
                    .with_context(|| format!("line {line_no}: '{tok}' is not a number"))?;
                Ok(if v == null {
                    CellValue::Missing
                } else {
                    CellValue::from(v)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let rest = cells.split_off(1);
        index.extend(cells);
        rows.push(rest);
    }
    Ok((index, rows))
}
