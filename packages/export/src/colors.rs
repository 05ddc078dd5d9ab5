//! Map colors for scores and growth tiers.
//!
//! Category labels and base colors are loaded from `config/categories.toml`
//! at first use.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use locate_ncr_grid_models::PoiCategory;
use locate_ncr_scoring_models::GrowthTier;
use serde::Deserialize;

const CATEGORIES_TOML: &str = include_str!("../config/categories.toml");

/// Category drawn when a category has no style of its own.
const FALLBACK_CATEGORY: &str = "atm";

/// Display label and base RGB color of a POI category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryStyle {
    /// Name shown in legends.
    pub label: String,
    /// Base RGB color.
    pub color: [u8; 3],
}

#[derive(Deserialize)]
struct CategoryStyleFile {
    categories: BTreeMap<String, CategoryStyle>,
}

static CATEGORY_STYLES: LazyLock<BTreeMap<String, CategoryStyle>> = LazyLock::new(|| {
    let file: CategoryStyleFile = toml::de::from_str(CATEGORIES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded category styles: {e}"));
    file.categories
});

/// Style for `category`, or the ATM style if it has none.
///
/// # Panics
///
/// * If the embedded category table is malformed or lacks the `atm` entry
#[must_use]
pub fn category_style(category: PoiCategory) -> &'static CategoryStyle {
    CATEGORY_STYLES
        .get(category.as_ref())
        .or_else(|| CATEGORY_STYLES.get(FALLBACK_CATEGORY))
        .unwrap_or_else(|| panic!("Category styles have no '{FALLBACK_CATEGORY}' entry"))
}

/// RGBA fill for a cell with `normalized_score` (0-100). Opacity runs from
/// 50 at score 0 to 230 at score 100.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suggest_mul_add
)]
pub fn score_color(normalized_score: f64, category: PoiCategory) -> [u8; 4] {
    let [r, g, b] = category_style(category).color;
    let alpha = (50.0 + normalized_score / 100.0 * 180.0).clamp(0.0, 255.0);
    [r, g, b, alpha as u8]
}

/// RGBA fill for a growth tier.
#[must_use]
pub const fn tier_color(tier: GrowthTier) -> [u8; 4] {
    match tier {
        GrowthTier::EmergingHotspot => [255, 71, 87, 200],
        GrowthTier::HighGrowth => [255, 165, 2, 180],
        GrowthTier::Growing => [46, 213, 115, 150],
        GrowthTier::Stable => [55, 66, 250, 100],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_styles_load() {
        assert_eq!(CATEGORY_STYLES.len(), 10);
        for (name, style) in CATEGORY_STYLES.iter() {
            assert!(!style.label.is_empty(), "{name} has an empty label");
            assert_ne!(
                PoiCategory::parse_lenient(name),
                PoiCategory::Other,
                "{name} is not a known category"
            );
        }
    }

    #[test]
    fn score_alpha_range() {
        assert_eq!(score_color(0.0, PoiCategory::Atm), [67, 97, 238, 50]);
        assert_eq!(score_color(100.0, PoiCategory::Atm), [67, 97, 238, 230]);
        assert_eq!(score_color(50.0, PoiCategory::Hospital), [239, 71, 111, 140]);
    }

    #[test]
    fn alpha_truncates() {
        // 50 + 0.33 * 180 = 109.4
        assert_eq!(score_color(33.0, PoiCategory::Mall)[3], 109);
    }

    #[test]
    fn unknown_category_uses_atm_color() {
        assert_eq!(category_style(PoiCategory::Other).label, "ATM");
        assert_eq!(score_color(0.0, PoiCategory::Clinic)[..3], [67, 97, 238]);
    }

    #[test]
    fn tiers_get_distinct_colors() {
        let colors = [
            tier_color(GrowthTier::Stable),
            tier_color(GrowthTier::Growing),
            tier_color(GrowthTier::HighGrowth),
            tier_color(GrowthTier::EmergingHotspot),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
