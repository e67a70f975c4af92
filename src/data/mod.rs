/// Data layer: core types, loading, filtering and chart data.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet      .las          .png / .pdf
///        │                        │                │
///        ▼                        ▼                ▼
///   ┌──────────┐            ┌──────────┐     ┌──────────┐
///   │  loader   │           │   las     │    │ document  │
///   └──────────┘            └──────────┘     └──────────┘
///        │ columnar              │ indexed
///        ▼                        ▼
///   ┌────────────────────────────────┐
///   │ Dataset   fields + rows + shape │
///   └────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  depth/property selection, range filter, CSV export
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  scatter points, histogram bins
///   └──────────┘
/// ```

pub mod chart;
pub mod document;
pub mod filter;
pub mod las;
pub mod loader;
pub mod model;
