use serde::{Deserialize, Serialize};

use super::super::domain::StateCode;

const DEFAULT_FULL_TIME_HOURS_PER_YEAR: u32 = 2000;

/// Tunables for the FPA eligibility rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Hours in a full-time work year, used only for the completion estimate shown
    /// alongside an hours-based requirement.
    pub full_time_hours_per_year: u32,
    /// States whose FPA path requires hours and years together.
    pub combined_gates: Vec<CombinedGate>,
}

/// Joint hours-and-years requirement for a single state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedGate {
    pub state_code: StateCode,
    pub hours_required: u32,
    pub years_required: f64,
}

impl EligibilityConfig {
    pub fn combined_gate_for(&self, state_code: &StateCode) -> Option<&CombinedGate> {
        self.combined_gates
            .iter()
            .find(|gate| gate.state_code == *state_code)
    }

    pub(crate) fn hours_per_year(&self) -> u32 {
        if self.full_time_hours_per_year == 0 {
            DEFAULT_FULL_TIME_HOURS_PER_YEAR
        } else {
            self.full_time_hours_per_year
        }
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            full_time_hours_per_year: DEFAULT_FULL_TIME_HOURS_PER_YEAR,
            combined_gates: vec![CombinedGate {
                state_code: StateCode::new("CA"),
                hours_required: 4600,
                years_required: 3.0,
            }],
        }
    }
}
