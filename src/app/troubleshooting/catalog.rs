use crate::app::guide::catalog::ModelPredicate;
use crate::app::models::{EmergencyContact, TroubleshootingIssue};
use crate::app::troubleshooting::issues;

pub struct DeviceRule {
    pub model: ModelPredicate,
    pub issues: fn() -> Vec<TroubleshootingIssue>,
    pub diagnostic_steps: &'static [&'static str],
}

/// Model-specific extensions. The first matching rule contributes; general content
/// is always included ahead of it.
pub const DEVICE_RULES: &[DeviceRule] = &[DeviceRule {
    model: ModelPredicate::Contains("turbo 4 pro"),
    issues: issues::turbo_4_pro_issues,
    diagnostic_steps: issues::TURBO_4_PRO_DIAGNOSTIC_STEPS,
}];

#[derive(Debug, Clone, Copy, Default)]
pub struct TroubleshootingCatalog;

impl TroubleshootingCatalog {
    pub fn new() -> Self {
        Self
    }

    fn matching_rule(&self, model: Option<&str>) -> Option<&'static DeviceRule> {
        let model = model?;
        DEVICE_RULES.iter().find(|rule| rule.model.matches(Some(model)))
    }

    pub fn issues_for(&self, model: Option<&str>) -> Vec<TroubleshootingIssue> {
        let mut issues = issues::general_issues();
        if let Some(rule) = self.matching_rule(model) {
            issues.extend((rule.issues)());
        }
        issues
    }

    pub fn diagnostic_steps_for(&self, model: Option<&str>) -> Vec<String> {
        let extra = self
            .matching_rule(model)
            .map(|rule| rule.diagnostic_steps)
            .unwrap_or(&[]);
        issues::BASE_DIAGNOSTIC_STEPS
            .iter()
            .chain(extra.iter())
            .map(|step| step.to_string())
            .collect()
    }

    pub fn emergency_contacts(&self) -> Vec<EmergencyContact> {
        issues::emergency_contacts()
    }
}
