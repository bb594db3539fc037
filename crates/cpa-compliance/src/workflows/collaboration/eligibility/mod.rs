mod config;
mod result;
mod rules;

pub use config::{CombinedGate, EligibilityConfig};
pub use result::{CpaBasis, EligibilityResult, EligibilityRuleKind, FpaEligibilityOutcome};

use super::domain::{LicenseRecord, StateRules};
use rules::{first_match, RuleContext};

/// Stateless evaluator classifying a license against its state's FPA rules.
///
/// The caller is responsible for pairing the license with its own state's record;
/// the engine does not cross-check `license.state_code` against `state.state_code`.
#[derive(Debug, Clone, Default)]
pub struct FpaEligibilityEngine {
    config: EligibilityConfig,
}

impl FpaEligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    pub fn evaluate(&self, license: &LicenseRecord, state: &StateRules) -> FpaEligibilityOutcome {
        let ctx = RuleContext {
            state,
            progress: license.progress(),
            config: &self.config,
        };
        let (matched_rule, eligibility) = first_match(&ctx);

        FpaEligibilityOutcome {
            license_id: license.license_id.clone(),
            state_code: state.state_code.clone(),
            state_name: state.state_name.clone(),
            matched_rule,
            eligibility,
        }
    }
}

/// Rule evaluation order, exposed for audit output.
pub fn rule_priority() -> Vec<EligibilityRuleKind> {
    rules::RULES
        .iter()
        .map(|rule| rule.kind)
        .chain(std::iter::once(EligibilityRuleKind::Fallback))
        .collect()
}
