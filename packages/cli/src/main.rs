#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line driver for the site recommendation engine.
//!
//! Reads grid cells and POIs as JSON arrays of data store records, runs
//! one analysis, and prints the result as pretty JSON on stdout. Logging
//! goes to stderr and is controlled with `RUST_LOG`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use locate_ncr_catchment::{
    CatchmentRing, DEFAULT_CATCHMENT_RADII_KM, catchment_layers, catchment_metrics,
    competitor_overlap,
};
use locate_ncr_export::{
    GridPolygon, polygon_layer_records, score_color, tier_color, write_growth_csv,
    write_recommendations_csv,
};
use locate_ncr_grid_models::{Coordinates, GridCell, PoiCategory, PoiRecord};
use locate_ncr_scenario::analyze_location;
use locate_ncr_scoring::explain::{explain_score, recommendation_reason};
use locate_ncr_scoring::growth::DEFAULT_HOTSPOT_PERCENTILE;
use locate_ncr_scoring::{WeightConfig, classify_growth, recommend, top_recommendations};
use locate_ncr_scoring_models::{ScoreExplanation, ScoreResult, ScoringMode};
use locate_ncr_spatial::rolling_neighbor_density;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(name = "locate_ncr", about = "Site recommendation scoring for POI categories")]
struct Cli {
    /// TOML file replacing the built-in weight tables
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every grid cell for a category and list the best ones
    Score {
        /// JSON array of grid cell records
        #[arg(long)]
        grid: PathBuf,
        /// JSON array of POI records (all categories)
        #[arg(long)]
        pois: PathBuf,
        /// Category to site (e.g., `atm`, `hospital`)
        #[arg(long, value_parser = parse_category)]
        category: PoiCategory,
        /// Use the multi-factor formula
        #[arg(long)]
        advanced: bool,
        /// Number of recommendations to print
        #[arg(long, default_value = "10")]
        top: usize,
        /// Also write the top recommendations as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Also write map layers (cell polygons and catchment rings) as JSON
        #[arg(long)]
        layers: Option<PathBuf>,
        /// Recompute neighbor density from adjacent grid ids
        #[arg(long)]
        rolling_neighbors: bool,
    },
    /// Classify growth hotspots
    Growth {
        /// JSON array of grid cell records
        #[arg(long)]
        grid: PathBuf,
        /// Hotspot percentile (0-100)
        #[arg(long, default_value_t = DEFAULT_HOTSPOT_PERCENTILE)]
        percentile: f64,
        /// Number of hotspots to print
        #[arg(long, default_value = "10")]
        top: usize,
        /// Also write the hotspots as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Recompute neighbor density from adjacent grid ids
        #[arg(long)]
        rolling_neighbors: bool,
    },
    /// Summarize the catchment around a point
    Catchment {
        /// JSON array of grid cell records
        #[arg(long)]
        grid: PathBuf,
        /// JSON array of POI records (all categories)
        #[arg(long)]
        pois: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Catchment radius in kilometers
        #[arg(long, default_value = "1.0")]
        radius: f64,
        /// Report competitor overlap for this category
        #[arg(long, value_parser = parse_category)]
        category: Option<PoiCategory>,
    },
    /// Evaluate opening a new site at a point
    Scenario {
        /// JSON array of grid cell records
        #[arg(long)]
        grid: PathBuf,
        /// JSON array of POI records (all categories)
        #[arg(long)]
        pois: PathBuf,
        /// Category of the new site
        #[arg(long, value_parser = parse_category)]
        category: PoiCategory,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

/// A recommendation with its plain-language reading. Factor scores are
/// rounded to one decimal for display.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Recommendation {
    #[serde(flatten)]
    result: ScoreResult,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<ScoreExplanation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReport {
    category: PoiCategory,
    mode: ScoringMode,
    cells_scored: usize,
    recommendations: Vec<Recommendation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerFile {
    cells: Vec<ColoredPolygon>,
    catchments: Vec<CatchmentRing>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColoredPolygon {
    #[serde(flatten)]
    polygon: GridPolygon,
    fill_color: [u8; 4],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.weights {
        Some(path) => {
            log::info!("Loading weight tables from {}", path.display());
            WeightConfig::from_toml_str(&std::fs::read_to_string(path)?)?
        }
        None => WeightConfig::embedded(),
    };

    match cli.command {
        Commands::Score {
            grid,
            pois,
            category,
            advanced,
            top,
            csv,
            layers,
            rolling_neighbors,
        } => {
            let cells = load_cells(&grid, rolling_neighbors)?;
            let pois: Vec<PoiRecord> = load_json(&pois)?;
            let competitors = same_category(&pois, category);
            let mode = if advanced {
                ScoringMode::Advanced
            } else {
                ScoringMode::Basic
            };

            let set = recommend(&cells, &competitors, category, mode, &config);
            let best = top_recommendations(&set.results, top);

            if let Some(path) = csv {
                write_recommendations_csv(BufWriter::new(File::create(&path)?), best)?;
                log::info!("Wrote {} recommendations to {}", best.len(), path.display());
            }

            if let Some(path) = layers {
                write_layers(&path, &cells, &set.results, best, category)?;
            }

            print_json(&ScoreReport {
                category,
                mode: set.mode,
                cells_scored: set.results.len(),
                recommendations: best
                    .iter()
                    .map(|result| Recommendation {
                        result: ScoreResult {
                            factors: result.factors.map(|f| f.rounded()),
                            ..result.clone()
                        },
                        reason: recommendation_reason(result, category),
                        explanation: explain_score(result),
                    })
                    .collect(),
            })?;
        }
        Commands::Growth {
            grid,
            percentile,
            top,
            csv,
            rolling_neighbors,
        } => {
            let cells = load_cells(&grid, rolling_neighbors)?;
            let analysis = classify_growth(&cells, percentile);
            let hotspots: Vec<_> = analysis.hotspots().cloned().collect();

            if let Some(path) = csv {
                write_growth_csv(BufWriter::new(File::create(&path)?), &hotspots)?;
                log::info!("Wrote {} hotspots to {}", hotspots.len(), path.display());
            }

            let tiers: Vec<serde_json::Value> = analysis
                .tier_counts()
                .into_iter()
                .map(|(tier, count)| {
                    serde_json::json!({
                        "tier": tier,
                        "cells": count,
                        "fillColor": tier_color(tier),
                    })
                })
                .collect();

            print_json(&serde_json::json!({
                "percentile": analysis.percentile,
                "threshold": analysis.threshold,
                "cells": analysis.results.len(),
                "hotspotCount": hotspots.len(),
                "meanPotential": analysis.mean_potential(),
                "maxPotential": analysis.max_potential(),
                "tiers": tiers,
                "hotspots": &hotspots[..top.min(hotspots.len())],
            }))?;
        }
        Commands::Catchment {
            grid,
            pois,
            lat,
            lng,
            radius,
            category,
        } => {
            let center = parse_point(lat, lng)?;
            let cells = load_cells(&grid, false)?;
            let pois: Vec<PoiRecord> = load_json(&pois)?;

            let metrics = catchment_metrics(center, radius, &pois, &cells);
            let overlap = category
                .map(|c| competitor_overlap(center, radius, &same_category(&pois, c)));

            print_json(&serde_json::json!({
                "metrics": metrics,
                "competitorOverlap": overlap,
            }))?;
        }
        Commands::Scenario {
            grid,
            pois,
            category,
            lat,
            lng,
        } => {
            let point = parse_point(lat, lng)?;
            let cells = load_cells(&grid, false)?;
            let pois: Vec<PoiRecord> = load_json(&pois)?;
            let competitors = same_category(&pois, category);

            let outcome = analyze_location(point, &cells, &competitors, &pois);
            if outcome.result().is_none() {
                log::warn!("Could not find a grid cell for this location");
            }
            print_json(&outcome)?;
        }
    }

    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let records: Vec<T> = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn load_cells(
    path: &Path,
    rolling_neighbors: bool,
) -> Result<Vec<GridCell>, Box<dyn std::error::Error>> {
    let mut cells: Vec<GridCell> = load_json(path)?;

    if rolling_neighbors {
        cells.sort_by_key(|c| c.id);
        let neighbors = rolling_neighbor_density(&cells);
        for (cell, neighbor) in cells.iter_mut().zip(neighbors) {
            cell.neighbor_poi_density = neighbor;
        }
        log::debug!("Recomputed neighbor density for {} cells", cells.len());
    }

    Ok(cells)
}

fn parse_category(value: &str) -> Result<PoiCategory, String> {
    value
        .parse()
        .map_err(|_| format!("Unknown POI category: {value}"))
}

fn same_category(pois: &[PoiRecord], category: PoiCategory) -> Vec<PoiRecord> {
    pois.iter()
        .filter(|p| p.category == category)
        .cloned()
        .collect()
}

fn parse_point(lat: f64, lng: f64) -> Result<Coordinates, Box<dyn std::error::Error>> {
    Coordinates::new(lat, lng).ok_or_else(|| format!("Invalid coordinates: {lat}, {lng}").into())
}

fn write_layers(
    path: &Path,
    cells: &[GridCell],
    results: &[ScoreResult],
    best: &[ScoreResult],
    category: PoiCategory,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalized: BTreeMap<i64, f64> = results
        .iter()
        .map(|r| (r.grid_id, r.normalized_score))
        .collect();

    let cell_polygons: Vec<ColoredPolygon> = polygon_layer_records(cells)
        .into_iter()
        .map(|polygon| {
            let normalized = normalized.get(&polygon.grid_id).copied().unwrap_or(50.0);
            ColoredPolygon {
                fill_color: score_color(normalized, category),
                polygon,
            }
        })
        .collect();

    let file = LayerFile {
        cells: cell_polygons,
        catchments: catchment_layers(best, &DEFAULT_CATCHMENT_RADII_KM),
    };

    serde_json::to_writer(BufWriter::new(File::create(path)?), &file)?;
    log::info!(
        "Wrote {} cell polygons and {} catchment rings to {}",
        file.cells.len(),
        file.catchments.len(),
        path.display()
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
