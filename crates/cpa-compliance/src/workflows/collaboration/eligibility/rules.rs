use super::super::domain::{LicenseProgress, StateRules};
use super::super::format::{ceil_to_tenth, floor_to_tenth, format_quantity, pluralize};
use super::config::EligibilityConfig;
use super::result::{CpaBasis, EligibilityResult, EligibilityRuleKind};

pub(crate) struct RuleContext<'a> {
    pub state: &'a StateRules,
    pub progress: LicenseProgress,
    pub config: &'a EligibilityConfig,
}

/// One row of the priority table. Rows are tried in order and the first row that
/// returns a result decides the verdict.
pub(crate) struct EligibilityRule {
    pub kind: EligibilityRuleKind,
    evaluate: fn(&RuleContext<'_>) -> Option<EligibilityResult>,
}

pub(crate) const RULES: &[EligibilityRule] = &[
    EligibilityRule {
        kind: EligibilityRuleKind::AutomaticWithLicense,
        evaluate: automatic_with_license,
    },
    EligibilityRule {
        kind: EligibilityRuleKind::NoFpaRoute,
        evaluate: no_fpa_route,
    },
    EligibilityRule {
        kind: EligibilityRuleKind::CombinedRequirement,
        evaluate: combined_requirement,
    },
    EligibilityRule {
        kind: EligibilityRuleKind::HoursRequirement,
        evaluate: hours_requirement,
    },
    EligibilityRule {
        kind: EligibilityRuleKind::YearsRequirement,
        evaluate: years_requirement,
    },
    EligibilityRule {
        kind: EligibilityRuleKind::RequirementsNotConfigured,
        evaluate: requirements_not_configured,
    },
];

pub(crate) fn first_match(ctx: &RuleContext<'_>) -> (EligibilityRuleKind, EligibilityResult) {
    RULES
        .iter()
        .find_map(|rule| (rule.evaluate)(ctx).map(|result| (rule.kind, result)))
        .unwrap_or_else(|| (EligibilityRuleKind::Fallback, fallback(ctx)))
}

fn hours_required(state: &StateRules) -> Option<u32> {
    state.fpa_hours_required.filter(|hours| *hours > 0)
}

fn years_required(state: &StateRules) -> Option<f64> {
    state
        .fpa_years_required
        .filter(|years| years.is_finite() && *years > 0.0)
}

fn automatic_with_license(ctx: &RuleContext<'_>) -> Option<EligibilityResult> {
    if !ctx.state.fpa_automatic_with_license {
        return None;
    }

    Some(EligibilityResult::FpaAutomatic {
        notes: format!(
            "{} grants Full Practice Authority automatically with licensure. No supervised practice requirements apply.",
            ctx.state.state_name
        ),
    })
}

fn no_fpa_route(ctx: &RuleContext<'_>) -> Option<EligibilityResult> {
    if ctx.state.fpa_available {
        return None;
    }

    Some(EligibilityResult::CpaRequired {
        basis: CpaBasis::NoFpaRoute,
        notes: format!(
            "{} does not offer Full Practice Authority. A Collaboration Practice Agreement is always required.",
            ctx.state.state_name
        ),
    })
}

fn combined_requirement(ctx: &RuleContext<'_>) -> Option<EligibilityResult> {
    let gate = ctx.config.combined_gate_for(&ctx.state.state_code)?;
    let LicenseProgress { hours, years } = ctx.progress;

    if hours >= gate.hours_required && years >= gate.years_required {
        return Some(EligibilityResult::FpaEligibleNow {
            notes: format!(
                "You have completed {} and {} of supervised practice in {}, meeting the combined requirement of {} and {}. You are eligible for Full Practice Authority.",
                pluralize(hours as f64, "hour"),
                pluralize(years, "year"),
                ctx.state.state_name,
                pluralize(gate.hours_required as f64, "hour"),
                pluralize(gate.years_required, "year"),
            ),
        });
    }

    let hours_remaining = gate.hours_required.saturating_sub(hours);
    let years_remaining = ceil_to_tenth((gate.years_required - years).max(0.0));

    Some(EligibilityResult::FpaEligibleFuture {
        hours_remaining: Some(hours_remaining),
        years_remaining: Some(years_remaining),
        months_remaining: None,
        estimated_years_to_completion: None,
        notes: format!(
            "{} requires both {} and {} of supervised practice. Remaining: {} and {}.",
            ctx.state.state_name,
            pluralize(gate.hours_required as f64, "hour"),
            pluralize(gate.years_required, "year"),
            pluralize(hours_remaining as f64, "hour"),
            pluralize(years_remaining, "year"),
        ),
    })
}

fn hours_requirement(ctx: &RuleContext<'_>) -> Option<EligibilityResult> {
    let required = hours_required(ctx.state)?;
    let completed = ctx.progress.hours;

    if completed >= required {
        return Some(EligibilityResult::FpaEligibleNow {
            notes: format!(
                "You have completed {} of supervised practice in {}, meeting the {} requirement. You are eligible for Full Practice Authority.",
                pluralize(completed as f64, "hour"),
                ctx.state.state_name,
                pluralize(required as f64, "hour"),
            ),
        });
    }

    let hours_remaining = required - completed;
    let estimated_years = hours_remaining.div_ceil(ctx.config.hours_per_year());

    Some(EligibilityResult::FpaEligibleFuture {
        hours_remaining: Some(hours_remaining),
        years_remaining: None,
        months_remaining: None,
        estimated_years_to_completion: Some(estimated_years),
        notes: format!(
            "{} of supervised practice remaining in {} ({} of {} completed). At full-time practice this is about {}.",
            pluralize(hours_remaining as f64, "hour"),
            ctx.state.state_name,
            format_quantity(completed as f64),
            format_quantity(required as f64),
            pluralize(estimated_years as f64, "year"),
        ),
    })
}

fn years_requirement(ctx: &RuleContext<'_>) -> Option<EligibilityResult> {
    let required = years_required(ctx.state)?;
    let completed = ctx.progress.years;

    if completed >= required {
        return Some(EligibilityResult::FpaEligibleNow {
            notes: format!(
                "You have completed {} of supervised practice in {}, meeting the {} requirement. You are eligible for Full Practice Authority.",
                pluralize(completed, "year"),
                ctx.state.state_name,
                pluralize(required, "year"),
            ),
        });
    }

    let remaining = required - completed;
    let months_remaining = (remaining * 12.0).ceil() as u32;
    let years_remaining = ceil_to_tenth(remaining);

    Some(EligibilityResult::FpaEligibleFuture {
        hours_remaining: None,
        years_remaining: Some(years_remaining),
        months_remaining: Some(months_remaining),
        estimated_years_to_completion: None,
        notes: format!(
            "{} ({}) of supervised practice remaining in {} ({} of {} completed).",
            pluralize(years_remaining, "year"),
            pluralize(months_remaining as f64, "month"),
            ctx.state.state_name,
            format_quantity(floor_to_tenth(completed)),
            pluralize(required, "year"),
        ),
    })
}

fn requirements_not_configured(ctx: &RuleContext<'_>) -> Option<EligibilityResult> {
    if !ctx.state.fpa_available {
        return None;
    }

    Some(EligibilityResult::CpaRequired {
        basis: CpaBasis::RequirementsNotConfigured,
        notes: format!(
            "{} offers Full Practice Authority, but its requirements are not yet configured. Contact the state board of nursing for current requirements; a Collaboration Practice Agreement is required in the meantime.",
            ctx.state.state_name
        ),
    })
}

fn fallback(ctx: &RuleContext<'_>) -> EligibilityResult {
    EligibilityResult::CpaRequired {
        basis: CpaBasis::Default,
        notes: format!(
            "A Collaboration Practice Agreement is required in {}.",
            ctx.state.state_name
        ),
    }
}
