use serde::{Deserialize, Serialize};

use super::domain::{PhysicianId, PhysicianProfile, StateCode, StateRatioInfo};
use super::format::pluralize;

const NO_LIMIT_LABEL: &str = "No limit";
const NOT_APPLICABLE_LABEL: &str = "N/A";

/// Verdict on whether a physician can take on one more NP in a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResult {
    pub available: bool,
    pub current_count: u32,
    /// Effective cap after applying the state ratio, if any.
    pub max_count: u32,
    pub reason: String,
    pub state_ratio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<CapacityBlock>,
}

/// Cause of an unavailable verdict. Callers treat these differently: a physician cap
/// can be raised, a state ratio cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityBlock {
    NoDirectoryProfile,
    StateNotServed,
    PhysicianCapacity,
    StateRatio,
}

/// Parsed form of a state's physician:NP ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioLimit {
    Unlimited,
    Limited(u32),
    /// A limit is flagged but the ratio text is not `1:N`. Treated as a limit of zero.
    Malformed,
}

impl RatioLimit {
    pub fn from_info(info: &StateRatioInfo) -> Self {
        if !info.has_ratio_limit {
            return RatioLimit::Unlimited;
        }

        info.physician_np_ratio
            .as_deref()
            .and_then(parse_ratio)
            .map(RatioLimit::Limited)
            .unwrap_or(RatioLimit::Malformed)
    }

    pub fn state_max(&self) -> Option<u32> {
        match self {
            RatioLimit::Unlimited => None,
            RatioLimit::Limited(max) => Some(*max),
            RatioLimit::Malformed => Some(0),
        }
    }
}

/// Parse `"1:N"` into `N`. Surrounding whitespace is ignored; anything else fails.
pub fn parse_ratio(raw: &str) -> Option<u32> {
    let digits = raw.trim().strip_prefix("1:")?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Result returned when the physician has no directory profile yet.
pub fn no_profile_result() -> CapacityResult {
    CapacityResult {
        available: false,
        current_count: 0,
        max_count: 0,
        reason: "Physician has no directory profile".to_string(),
        state_ratio: NOT_APPLICABLE_LABEL.to_string(),
        blocked_by: Some(CapacityBlock::NoDirectoryProfile),
    }
}

/// Result for a state outside the physician's available states. Counts come from the
/// profile since no agreements are looked up.
pub fn state_not_served_result(
    profile: &PhysicianProfile,
    state_code: &StateCode,
) -> CapacityResult {
    CapacityResult {
        available: false,
        current_count: profile.current_count(),
        max_count: profile.capacity(),
        reason: format!("Physician is not available in {state_code}"),
        state_ratio: NOT_APPLICABLE_LABEL.to_string(),
        blocked_by: Some(CapacityBlock::StateNotServed),
    }
}

/// Decide whether `profile` can supervise one more NP in `state_code`.
///
/// `active_count` is the number of agreements currently holding a slot for this
/// physician in this state. The effective cap is the smaller of the physician's own cap
/// and the state's ratio maximum.
pub fn evaluate_capacity(
    profile: &PhysicianProfile,
    state_code: &StateCode,
    active_count: u32,
    ratio: &StateRatioInfo,
) -> CapacityResult {
    if !profile.serves_state(state_code) {
        return state_not_served_result(profile, state_code);
    }

    let physician_max = profile.capacity();

    let Some(state_max) = RatioLimit::from_info(ratio).state_max() else {
        let available = active_count < physician_max;
        let reason = if available {
            format!(
                "{} remaining. {state_code} has no physician:NP ratio limit.",
                pluralize((physician_max - active_count) as f64, "spot"),
            )
        } else {
            format!(
                "Physician is at self-imposed capacity ({active_count}/{physician_max}). {state_code} has no physician:NP ratio limit.",
            )
        };

        return CapacityResult {
            available,
            current_count: active_count,
            max_count: physician_max,
            reason,
            state_ratio: NO_LIMIT_LABEL.to_string(),
            blocked_by: (!available).then_some(CapacityBlock::PhysicianCapacity),
        };
    };

    let ratio_label = ratio
        .physician_np_ratio
        .clone()
        .unwrap_or_else(|| NOT_APPLICABLE_LABEL.to_string());
    let max_count = physician_max.min(state_max);
    let available = active_count < max_count;

    let (reason, blocked_by) = if available {
        (
            format!(
                "{} remaining under an effective limit of {max_count} ({state_code} ratio {ratio_label}).",
                pluralize((max_count - active_count) as f64, "spot"),
            ),
            None,
        )
    } else if active_count >= state_max {
        (
            format!(
                "Physician is at the {state_code} state ratio limit ({ratio_label}, {active_count}/{state_max})."
            ),
            Some(CapacityBlock::StateRatio),
        )
    } else {
        (
            format!(
                "Physician is at self-imposed capacity ({active_count}/{physician_max}); the {state_code} ratio {ratio_label} would allow {state_max}."
            ),
            Some(CapacityBlock::PhysicianCapacity),
        )
    };

    CapacityResult {
        available,
        current_count: active_count,
        max_count,
        reason,
        state_ratio: ratio_label,
        blocked_by,
    }
}

/// Outcome of applying an agreement start or termination to a physician's count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityAdjustment {
    pub physician_id: PhysicianId,
    pub previous_count: u32,
    pub new_count: u32,
    pub available_spots: u32,
}

/// Apply `increment` to the profile's current count, floored at zero. The state ratio
/// is not re-checked here.
pub fn adjust_capacity(profile: &PhysicianProfile, increment: i64) -> CapacityAdjustment {
    let previous_count = profile.current_count();
    let new_count = i64::from(previous_count)
        .saturating_add(increment)
        .clamp(0, i64::from(u32::MAX)) as u32;

    CapacityAdjustment {
        physician_id: profile.physician_id.clone(),
        previous_count,
        new_count,
        available_spots: profile.capacity().saturating_sub(new_count),
    }
}
