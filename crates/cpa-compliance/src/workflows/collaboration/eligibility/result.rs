use serde::{Deserialize, Serialize};

use super::super::domain::{LicenseId, StateCode};

/// Eligibility classification for a license under its state's rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EligibilityResult {
    FpaAutomatic {
        notes: String,
    },
    CpaRequired {
        basis: CpaBasis,
        notes: String,
    },
    FpaEligibleNow {
        notes: String,
    },
    FpaEligibleFuture {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hours_remaining: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        years_remaining: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        months_remaining: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        estimated_years_to_completion: Option<u32>,
        notes: String,
    },
}

impl EligibilityResult {
    pub fn status_label(&self) -> &'static str {
        match self {
            EligibilityResult::FpaAutomatic { .. } => "fpa_automatic",
            EligibilityResult::CpaRequired { .. } => "cpa_required",
            EligibilityResult::FpaEligibleNow { .. } => "fpa_eligible_now",
            EligibilityResult::FpaEligibleFuture { .. } => "fpa_eligible_future",
        }
    }

    /// End-user guidance text. Shown verbatim, so wording is part of the contract.
    pub fn notes(&self) -> &str {
        match self {
            EligibilityResult::FpaAutomatic { notes }
            | EligibilityResult::CpaRequired { notes, .. }
            | EligibilityResult::FpaEligibleNow { notes }
            | EligibilityResult::FpaEligibleFuture { notes, .. } => notes,
        }
    }

    pub fn requires_cpa(&self) -> bool {
        !matches!(
            self,
            EligibilityResult::FpaAutomatic { .. } | EligibilityResult::FpaEligibleNow { .. }
        )
    }
}

/// Why a CPA is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpaBasis {
    /// The state has no FPA route at all.
    NoFpaRoute,
    /// FPA exists but no requirement is on file for the state.
    RequirementsNotConfigured,
    /// No rule applied.
    Default,
}

/// Identifies which rule of the priority table produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityRuleKind {
    AutomaticWithLicense,
    NoFpaRoute,
    CombinedRequirement,
    HoursRequirement,
    YearsRequirement,
    RequirementsNotConfigured,
    Fallback,
}

/// Evaluation output tying a result back to the license and rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpaEligibilityOutcome {
    pub license_id: LicenseId,
    pub state_code: StateCode,
    pub state_name: String,
    pub matched_rule: EligibilityRuleKind,
    pub eligibility: EligibilityResult,
}
