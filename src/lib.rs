//! Petrophysical data viewer.
//!
//! Opens tabular data (CSV, JSON, Parquet), LAS well logs, PNG log images and
//! PDF documents. For the two tabular paths the user picks a depth field and
//! a property field, narrows a closed depth interval and gets a scatter plot,
//! a histogram and a CSV download of the filtered records.
//!
//! The selection logic lives in [`data::filter`] and is pure: selection state
//! is plain data passed in explicitly, so it is testable without a UI.
//!
//! ```ignore
//! use petro_viewer::data::{filter, loader};
//!
//! let ds = loader::parse_csv(b"DEPTH,GR\n100,30\n150,45\n200,60\n")?;
//! let depth = filter::select_depth_field(&ds, "DEPTH")?;
//! let view = filter::filter_by_range(&ds, &depth, 150.0, 200.0)?;
//! let csv = filter::serialize(&view)?;
//! ```

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
