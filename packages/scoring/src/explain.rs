//! Plain-language explanations of scores.

use locate_ncr_grid_models::PoiCategory;
use locate_ncr_scoring_models::{
    CompetitionPressure, DemandLevel, ScoreExplanation, ScoreResult, Suitability,
};

/// One-sentence reason for a basic-mode recommendation.
///
/// Demand is judged by comparing the cell to its neighbors; competition
/// by the absolute neighbor density (below 50, below 150, or above).
#[must_use]
pub fn recommendation_reason(result: &ScoreResult, category: PoiCategory) -> String {
    let demand = if result.poi_density > result.neighbor_poi_density {
        "high demand"
    } else {
        "moderate demand"
    };

    let competition = if result.neighbor_poi_density < 50.0 {
        "low competition"
    } else if result.neighbor_poi_density < 150.0 {
        "moderate competition"
    } else {
        "high competition area"
    };

    format!(
        "Recommended for {}: {demand} area with {competition}. Score: {:.1}",
        category.facility_name(),
        result.score
    )
}

/// Reads an advanced-mode result.
///
/// Returns `None` for results without a factor breakdown.
#[must_use]
pub fn explain_score(result: &ScoreResult) -> Option<ScoreExplanation> {
    let factors = result.factors?;

    let demand = if factors.poi_density_score > 70.0 {
        DemandLevel::High
    } else if factors.poi_density_score > 40.0 {
        DemandLevel::Moderate
    } else {
        DemandLevel::Low
    };

    let competition = if factors.competitor_penalty > 70.0 {
        CompetitionPressure::High
    } else if factors.competitor_penalty > 40.0 {
        CompetitionPressure::Moderate
    } else {
        CompetitionPressure::Low
    };

    let recommendation = if result.score > 60.0 {
        Suitability::Excellent
    } else if result.score > 40.0 {
        Suitability::Good
    } else if result.score > 20.0 {
        Suitability::Average
    } else {
        Suitability::Poor
    };

    Some(ScoreExplanation {
        demand,
        competition,
        recommendation,
    })
}
