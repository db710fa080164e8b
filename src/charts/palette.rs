//! Deterministic model-identifier → color assignment.
//!
//! Colors are derived by hashing the model name into a hue, so a model keeps
//! the same color on every chart and across runs, regardless of which other
//! models happen to share the figure. (Sampling a palette by index, the
//! obvious alternative, shifts everyone's color whenever the model subset
//! changes between charts.)

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use plotters::style::HSLColor;

/// Hue buckets. 360 would also work; a coarser wheel keeps adjacent hashes
/// visually distinguishable.
const HUE_STEPS: u64 = 24;

/// Stable color for a model identifier.
pub fn model_color(model: &str) -> HSLColor {
    let mut hasher = DefaultHasher::new();
    model.hash(&mut hasher);
    let h = hasher.finish();

    let hue = (h % HUE_STEPS) as f64 / HUE_STEPS as f64;
    // Alternate between two lightness levels so nearby hues still separate.
    let lightness = if (h / HUE_STEPS) % 2 == 0 { 0.40 } else { 0.55 };
    HSLColor(hue, 0.70, lightness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_is_stable_per_model() {
        let a1 = model_color("COVIDhub-ensemble");
        let a2 = model_color("COVIDhub-ensemble");
        assert_eq!((a1.0, a1.1, a1.2), (a2.0, a2.1, a2.2));
    }

    #[test]
    fn color_does_not_depend_on_other_models() {
        // The mapping is a pure function of the identifier, so rendering a
        // different subset of models cannot change an existing assignment.
        let before = model_color("UMass-MechBayes");
        let _ = model_color("LANL-GrowthRate");
        let _ = model_color("YYG-ParamSearch");
        let after = model_color("UMass-MechBayes");
        assert_eq!((before.0, before.1, before.2), (after.0, after.1, after.2));
    }

    #[test]
    fn hue_is_normalized() {
        for model in ["a", "b", "some-very-long-model-name", ""] {
            let c = model_color(model);
            assert!((0.0..1.0).contains(&c.0));
        }
    }
}
