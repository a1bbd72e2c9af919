use crate::app::guide::steps;
use crate::app::models::UnlockStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPredicate {
    Any,
    /// Case-insensitive substring of the model name. The needle is lowercase.
    Contains(&'static str),
}

impl ModelPredicate {
    pub fn matches(&self, model: Option<&str>) -> bool {
        match self {
            ModelPredicate::Any => true,
            ModelPredicate::Contains(needle) => model
                .map(|model| model.to_lowercase().contains(needle))
                .unwrap_or(false),
        }
    }
}

pub struct GuideRule {
    pub brand: &'static str,
    pub model: ModelPredicate,
    pub steps: fn() -> Vec<UnlockStep>,
}

/// Evaluated top to bottom; the first matching rule wins, so model-specific rules
/// must precede the brand-wide rule for the same brand.
pub const GUIDE_RULES: &[GuideRule] = &[
    GuideRule {
        brand: "xiaomi",
        model: ModelPredicate::Contains("turbo 4 pro"),
        steps: steps::xiaomi_turbo_4_pro,
    },
    GuideRule {
        brand: "xiaomi",
        model: ModelPredicate::Any,
        steps: steps::xiaomi,
    },
    GuideRule {
        brand: "huawei",
        model: ModelPredicate::Any,
        steps: steps::huawei,
    },
    GuideRule {
        brand: "oppo",
        model: ModelPredicate::Any,
        steps: steps::oppo,
    },
    GuideRule {
        brand: "vivo",
        model: ModelPredicate::Any,
        steps: steps::vivo,
    },
    GuideRule {
        brand: "oneplus",
        model: ModelPredicate::Any,
        steps: steps::oneplus,
    },
    GuideRule {
        brand: "samsung",
        model: ModelPredicate::Any,
        steps: steps::samsung,
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GuideCatalog;

impl GuideCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn steps_for(&self, brand: &str, model: Option<&str>) -> Vec<UnlockStep> {
        self.matching_rule(brand, model)
            .map(|rule| (rule.steps)())
            .unwrap_or_else(steps::generic)
    }

    /// False when `steps_for` would fall back to the generic guide.
    pub fn has_dedicated_guide(&self, brand: &str) -> bool {
        self.matching_rule(brand, None).is_some()
    }

    pub fn supported_brands(&self) -> Vec<&'static str> {
        let mut brands: Vec<&'static str> = Vec::new();
        for rule in GUIDE_RULES {
            if !brands.contains(&rule.brand) {
                brands.push(rule.brand);
            }
        }
        brands
    }

    fn matching_rule(&self, brand: &str, model: Option<&str>) -> Option<&'static GuideRule> {
        let brand = brand.trim().to_lowercase();
        GUIDE_RULES
            .iter()
            .find(|rule| rule.brand == brand && rule.model.matches(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dense_ids(steps: &[UnlockStep]) {
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.id as usize, index + 1, "step {:?}", step.title);
            assert!(!step.title.is_empty());
            assert!(!step.description.is_empty());
        }
    }

    #[test]
    fn turbo_4_pro_gets_extended_xiaomi_guide() {
        let catalog = GuideCatalog::new();
        let turbo = catalog.steps_for("xiaomi", Some("Redmi Turbo 4 Pro"));
        let mi11 = catalog.steps_for("xiaomi", Some("Mi 11"));
        assert!(turbo.len() > mi11.len());
        assert_ne!(turbo, mi11);
        assert_eq!(turbo, catalog.steps_for("xiaomi", Some("Redmi Turbo 4 Pro")));
        assert_eq!(mi11, catalog.steps_for("xiaomi", Some("Mi 11")));
        assert_eq!(mi11, catalog.steps_for("Xiaomi", None));
    }

    #[test]
    fn model_predicate_is_case_insensitive() {
        let catalog = GuideCatalog::new();
        assert_eq!(
            catalog.steps_for("XIAOMI", Some("redmi TURBO 4 PRO 5G")),
            catalog.steps_for("xiaomi", Some("Redmi Turbo 4 Pro"))
        );
    }

    #[test]
    fn turbo_model_under_other_brand_is_not_special() {
        let catalog = GuideCatalog::new();
        assert_eq!(
            catalog.steps_for("samsung", Some("Turbo 4 Pro")),
            catalog.steps_for("samsung", None)
        );
    }

    #[test]
    fn unknown_brand_falls_back_to_generic() {
        let catalog = GuideCatalog::new();
        let steps = catalog.steps_for("unknownbrand", None);
        assert!(!steps.is_empty());
        assert_eq!(steps, steps::generic());
        assert!(!catalog.has_dedicated_guide("unknownbrand"));
        assert!(catalog.has_dedicated_guide(" OnePlus "));
    }

    #[test]
    fn every_guide_is_densely_numbered() {
        let catalog = GuideCatalog::new();
        for brand in catalog.supported_brands() {
            assert_dense_ids(&catalog.steps_for(brand, None));
        }
        assert_dense_ids(&catalog.steps_for("xiaomi", Some("Redmi Turbo 4 Pro")));
        assert_dense_ids(&steps::generic());
    }

    #[test]
    fn supported_brands_are_listed_once() {
        assert_eq!(
            GuideCatalog::new().supported_brands(),
            vec!["xiaomi", "huawei", "oppo", "vivo", "oneplus", "samsung"]
        );
    }
}
