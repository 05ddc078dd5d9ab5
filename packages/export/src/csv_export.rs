//! CSV downloads for scored cells and growth hotspots.

use std::io::Write;

use locate_ncr_scoring_models::{GrowthResult, ScoreResult};
use serde::Serialize;

use crate::ExportError;

#[derive(Serialize)]
struct RecommendationRow {
    #[serde(rename = "Grid ID")]
    grid_id: i64,
    #[serde(rename = "POI Density")]
    poi_density: f64,
    #[serde(rename = "Neighbor Density")]
    neighbor_density: f64,
    #[serde(rename = "Score")]
    score: f64,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}

impl From<&ScoreResult> for RecommendationRow {
    fn from(r: &ScoreResult) -> Self {
        Self {
            grid_id: r.grid_id,
            poi_density: r.poi_density,
            neighbor_density: r.neighbor_poi_density,
            score: r.score,
            latitude: r.centroid.map(|c| c.lat),
            longitude: r.centroid.map(|c| c.lng),
        }
    }
}

#[derive(Serialize)]
struct GrowthRow {
    #[serde(rename = "Grid ID")]
    grid_id: i64,
    #[serde(rename = "POI Density")]
    poi_density: f64,
    #[serde(rename = "Neighbor Density")]
    neighbor_density: f64,
    #[serde(rename = "Growth %")]
    growth: f64,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}

impl From<&GrowthResult> for GrowthRow {
    fn from(r: &GrowthResult) -> Self {
        Self {
            grid_id: r.grid_id,
            poi_density: r.poi_density,
            neighbor_density: r.neighbor_poi_density,
            growth: r.growth_potential,
            latitude: r.centroid.map(|c| c.lat),
            longitude: r.centroid.map(|c| c.lng),
        }
    }
}

fn write_rows<W: Write, R: Serialize>(
    writer: W,
    rows: impl Iterator<Item = R>,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;

    for row in rows {
        csv_writer.serialize(row)?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

/// Writes scored cells as `Grid ID, POI Density, Neighbor Density, Score,
/// Latitude, Longitude`. Missing centroids leave the coordinate columns
/// empty.
///
/// # Errors
///
/// * If a record cannot be written or the writer cannot be flushed
pub fn write_recommendations_csv<W: Write>(
    writer: W,
    results: &[ScoreResult],
) -> Result<(), ExportError> {
    let written = write_rows(writer, results.iter().map(RecommendationRow::from))?;
    log::debug!("Wrote {written} recommendation rows");
    Ok(())
}

/// Writes growth results as `Grid ID, POI Density, Neighbor Density,
/// Growth %, Latitude, Longitude`.
///
/// # Errors
///
/// * If a record cannot be written or the writer cannot be flushed
pub fn write_growth_csv<W: Write>(writer: W, results: &[GrowthResult]) -> Result<(), ExportError> {
    let written = write_rows(writer, results.iter().map(GrowthRow::from))?;
    log::debug!("Wrote {written} growth rows");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use locate_ncr_grid_models::Coordinates;
    use locate_ncr_scoring_models::GrowthTier;

    fn scored(grid_id: i64, score: f64, centroid: Option<Coordinates>) -> ScoreResult {
        ScoreResult {
            grid_id,
            poi_count: 12,
            poi_density: 48.0,
            neighbor_poi_density: 30.5,
            centroid,
            competitor_count: 1,
            score,
            normalized_score: 100.0,
            rank: 1,
            factors: None,
        }
    }

    #[test]
    fn recommendation_csv_layout() {
        let results = vec![
            scored(7, 62.0, Some(Coordinates { lat: 28.6, lng: 77.2 })),
            scored(8, 10.5, None),
        ];

        let mut out = Vec::new();
        write_recommendations_csv(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Grid ID,POI Density,Neighbor Density,Score,Latitude,Longitude"
        );
        assert_eq!(lines[1], "7,48.0,30.5,62.0,28.6,77.2");
        assert_eq!(lines[2], "8,48.0,30.5,10.5,,");
    }

    #[test]
    fn growth_csv_layout() {
        let results = vec![GrowthResult {
            grid_id: 3,
            poi_density: 80.0,
            neighbor_poi_density: 20.0,
            centroid: Some(Coordinates { lat: 28.5, lng: 77.0 }),
            growth_potential: 80.0,
            is_hotspot: true,
            tier: GrowthTier::HighGrowth,
        }];

        let mut out = Vec::new();
        write_growth_csv(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Grid ID,POI Density,Neighbor Density,Growth %,Latitude,Longitude"
        );
        assert_eq!(lines[1], "3,80.0,20.0,80.0,28.5,77.0");
    }

    #[test]
    fn empty_results_write_nothing() {
        let mut out = Vec::new();
        write_growth_csv(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }
}
