#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output formats for recommendation results.
//!
//! Writes the downloadable CSV tables for scored cells and growth
//! hotspots, turns grid cell boundaries into polygon records for map
//! layers, and picks the map colors for scores and growth tiers.

pub mod colors;
pub mod csv_export;
pub mod polygons;

pub use colors::{CategoryStyle, category_style, score_color, tier_color};
pub use csv_export::{write_growth_csv, write_recommendations_csv};
pub use polygons::{GridPolygon, outer_ring, polygon_layer_records};

/// Errors that can occur while exporting results.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
