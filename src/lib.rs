//! Reactive table engine for live terminal dashboards.
//!
//! A `Table` owns a retained grid of styled cells and refreshes it from
//! snapshot data in two phases: a pure compute pass that diffs, sorts,
//! and resolves visible columns, then a UI pass that rewrites the grid
//! and re-anchors the selection by row identity. Data arrives through
//! the `Tabular` trait from a background model.

pub mod actions;
pub mod config;
pub mod data;
pub mod diff;
pub mod export;
pub mod grid;
pub mod keys;
pub mod model;
pub mod procs;
pub mod render;
pub mod selection;
pub mod snapshot;
pub mod sort;
pub mod sortkeys;
pub mod table;
