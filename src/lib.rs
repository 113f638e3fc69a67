//! Batch generation of per-client medical insurance PDF reports.
//!
//! The crate is a four-stage pipeline: [`dataset`] loads and filters the
//! input CSV, [`stats`] computes the summary aggregates, [`charts`] rasterizes
//! two PNG views of the data, and [`report`] assembles everything into a
//! paginated PDF.  [`pipeline`] wires the stages together for one run.

pub mod charts;
pub mod dataset;
pub mod fonts;
pub mod pipeline;
pub mod report;
pub mod stats;
