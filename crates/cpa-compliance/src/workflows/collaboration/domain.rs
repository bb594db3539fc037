use serde::{Deserialize, Serialize};

/// Identifier wrapper for an NP's state license.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LicenseId(pub String);

/// Identifier wrapper for a physician directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicianId(pub String);

/// Two-letter postal code of a U.S. state or territory, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateCode(pub String);

impl StateCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller identity forwarded by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

impl CallerIdentity {
    pub fn is_authenticated(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

/// Regulatory rules for one state. Records can carry residual values in fields that
/// the state's active FPA path does not use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRules {
    pub state_code: StateCode,
    pub state_name: String,
    pub fpa_available: bool,
    pub fpa_automatic_with_license: bool,
    #[serde(default)]
    pub fpa_hours_required: Option<u32>,
    #[serde(default)]
    pub fpa_years_required: Option<f64>,
    #[serde(default)]
    pub physician_np_ratio: Option<String>,
    pub has_ratio_limit: bool,
}

impl StateRules {
    pub fn ratio_info(&self) -> StateRatioInfo {
        StateRatioInfo {
            physician_np_ratio: self.physician_np_ratio.clone(),
            has_ratio_limit: self.has_ratio_limit,
        }
    }
}

/// Subset of [`StateRules`] the capacity check reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRatioInfo {
    #[serde(default)]
    pub physician_np_ratio: Option<String>,
    pub has_ratio_limit: bool,
}

/// NP license snapshot. Progress fields may be absent on newly registered licenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub license_id: LicenseId,
    pub state_code: StateCode,
    #[serde(default)]
    pub supervised_hours_in_state: Option<u32>,
    #[serde(default)]
    pub supervised_years_in_state: Option<f64>,
}

impl LicenseRecord {
    /// Resolve absent or unusable progress values to zero.
    pub fn progress(&self) -> LicenseProgress {
        LicenseProgress {
            hours: self.supervised_hours_in_state.unwrap_or(0),
            years: self
                .supervised_years_in_state
                .filter(|years| years.is_finite() && *years >= 0.0)
                .unwrap_or(0.0),
        }
    }
}

/// Fully defaulted supervised-practice progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LicenseProgress {
    pub hours: u32,
    pub years: f64,
}

/// License joined with its owning state's rules. `state` is `None` when the license
/// references a state the data store does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseWithState {
    pub license: LicenseRecord,
    pub state: Option<StateRules>,
}

/// Physician directory entry used for capacity decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicianProfile {
    pub physician_id: PhysicianId,
    #[serde(default)]
    pub total_np_capacity: Option<u32>,
    #[serde(default)]
    pub current_np_count: Option<u32>,
    /// Comma-separated state codes, e.g. `"CA, NV,AZ"`.
    #[serde(default)]
    pub available_states: String,
}

impl PhysicianProfile {
    pub fn capacity(&self) -> u32 {
        self.total_np_capacity.unwrap_or(0)
    }

    pub fn current_count(&self) -> u32 {
        self.current_np_count.unwrap_or(0)
    }

    pub fn serves_state(&self, state_code: &StateCode) -> bool {
        self.available_states
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .any(|code| state_code.matches(code))
    }
}
