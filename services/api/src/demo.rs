use crate::infra::{load_state_rules, seed_demo_records, InMemoryDirectory, InMemoryRegulations};
use clap::Args;
use cpa_compliance::error::AppError;
use cpa_compliance::workflows::collaboration::{
    evaluate_capacity, CallerIdentity, CapacityResult, CollaborationService, EligibilityConfig,
    FpaEligibilityEngine, FpaEligibilityOutcome, LicenseId, LicenseRecord, PhysicianId,
    PhysicianProfile, StateCode, StateRatioInfo,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Two-letter state code of the license
    #[arg(long)]
    pub(crate) state_code: String,
    /// Supervised practice hours completed in the state
    #[arg(long)]
    pub(crate) hours: Option<u32>,
    /// Supervised practice years completed in the state
    #[arg(long)]
    pub(crate) years: Option<f64>,
    /// State rules CSV to use instead of the bundled table
    #[arg(long)]
    pub(crate) state_rules_csv: Option<PathBuf>,
    /// Print the verdict as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CapacityArgs {
    /// State the NP would practice in
    #[arg(long)]
    pub(crate) state_code: String,
    /// Physician's self-declared NP capacity
    #[arg(long)]
    pub(crate) total_capacity: u32,
    /// Agreements currently holding a slot in the state
    #[arg(long, default_value_t = 0)]
    pub(crate) active: u32,
    /// State physician:NP ratio such as `1:4`. Omit when the state has no limit.
    #[arg(long)]
    pub(crate) ratio: Option<String>,
    /// Comma-separated states the physician serves. Defaults to `--state-code`.
    #[arg(long)]
    pub(crate) available_states: Option<String>,
    /// Print the verdict as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_eligibility_check(args: EligibilityArgs) -> Result<(), AppError> {
    let state_code = StateCode::new(&args.state_code);
    let states = load_state_rules(args.state_rules_csv.as_deref())?;
    let state = states
        .into_iter()
        .find(|state| state.state_code == state_code)
        .ok_or_else(|| AppError::UnknownState(state_code.clone()))?;

    let license = LicenseRecord {
        license_id: LicenseId(format!("cli-{}", state_code.as_str().to_ascii_lowercase())),
        state_code,
        supervised_hours_in_state: args.hours,
        supervised_years_in_state: args.years,
    };
    let outcome = FpaEligibilityEngine::default().evaluate(&license, &state);

    if args.json {
        print_json(&outcome)
    } else {
        print_eligibility(&outcome);
        Ok(())
    }
}

pub(crate) fn run_capacity_check(args: CapacityArgs) -> Result<(), AppError> {
    let state_code = StateCode::new(&args.state_code);
    let profile = PhysicianProfile {
        physician_id: PhysicianId("cli".to_string()),
        total_np_capacity: Some(args.total_capacity),
        current_np_count: Some(args.active),
        available_states: args
            .available_states
            .unwrap_or_else(|| state_code.to_string()),
    };
    let ratio = StateRatioInfo {
        has_ratio_limit: args.ratio.is_some(),
        physician_np_ratio: args.ratio,
    };

    let result = evaluate_capacity(&profile, &state_code, args.active, &ratio);
    if args.json {
        print_json(&result)
    } else {
        print_capacity(&state_code, &result);
        Ok(())
    }
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let regulations = InMemoryRegulations::new(load_state_rules(None)?);
    let directory = InMemoryDirectory::default();
    seed_demo_records(&regulations, &directory);
    let service = CollaborationService::new(
        Arc::new(regulations),
        Arc::new(directory),
        EligibilityConfig::default(),
    );
    let caller = CallerIdentity("demo-cli".to_string());

    println!("FPA eligibility");
    println!("===============");
    for license_id in DEMO_LICENSES {
        let outcome = service.calculate_fpa_eligibility(Some(&caller), license_id)?;
        print_eligibility(&outcome);
    }

    println!();
    println!("Physician capacity");
    println!("==================");
    for (physician_id, state) in DEMO_CAPACITY_CHECKS {
        let result = service.check_physician_capacity(Some(&caller), physician_id, state)?;
        println!("{physician_id}:");
        print_capacity(&StateCode::new(state), &result);
    }

    println!();
    println!("Capacity adjustments");
    println!("====================");
    for increment in [-1, 1] {
        let adjustment =
            service.update_physician_capacity(Some(&caller), "phys-002", Some(increment))?;
        println!(
            "{} {:+}: {} -> {} ({} open)",
            adjustment.physician_id.0,
            increment,
            adjustment.previous_count,
            adjustment.new_count,
            adjustment.available_spots,
        );
    }

    Ok(())
}

const DEMO_LICENSES: [&str; 6] = [
    "lic-az-001",
    "lic-tx-001",
    "lic-ca-001",
    "lic-ny-001",
    "lic-fl-001",
    "lic-va-001",
];

const DEMO_CAPACITY_CHECKS: [(&str, &str); 5] = [
    ("phys-001", "CA"),
    ("phys-001", "TX"),
    ("phys-001", "MI"),
    ("phys-001", "NY"),
    ("phys-002", "NY"),
];

fn print_eligibility(outcome: &FpaEligibilityOutcome) {
    println!(
        "{} ({}, {}): {} [{:?}]",
        outcome.license_id.0,
        outcome.state_name,
        outcome.state_code,
        outcome.eligibility.status_label(),
        outcome.matched_rule,
    );
    println!("  {}", outcome.eligibility.notes());
}

fn print_capacity(state_code: &StateCode, result: &CapacityResult) {
    let verdict = if result.available { "available" } else { "unavailable" };
    println!(
        "  {state_code}: {verdict} ({}/{}, ratio {})",
        result.current_count, result.max_count, result.state_ratio
    );
    println!("  {}", result.reason);
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
