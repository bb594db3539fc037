use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::capacity::{
    adjust_capacity, evaluate_capacity, no_profile_result, state_not_served_result,
    CapacityAdjustment, CapacityResult, RatioLimit,
};
use super::domain::{CallerIdentity, LicenseId, PhysicianId, StateCode};
use super::eligibility::{EligibilityConfig, FpaEligibilityEngine, FpaEligibilityOutcome};
use super::repository::{
    CapacityAdjustmentRecord, PhysicianDirectory, RegulatoryRepository, RepositoryError,
};

/// Service validating requests, loading records, and running the eligibility and
/// capacity rules over them.
pub struct CollaborationService<R, D> {
    regulations: Arc<R>,
    directory: Arc<D>,
    engine: Arc<FpaEligibilityEngine>,
}

impl<R, D> CollaborationService<R, D>
where
    R: RegulatoryRepository + 'static,
    D: PhysicianDirectory + 'static,
{
    pub fn new(regulations: Arc<R>, directory: Arc<D>, config: EligibilityConfig) -> Self {
        Self {
            regulations,
            directory,
            engine: Arc::new(FpaEligibilityEngine::new(config)),
        }
    }

    /// Classify a license's FPA eligibility under its state's rules.
    pub fn calculate_fpa_eligibility(
        &self,
        caller: Option<&CallerIdentity>,
        license_id: &str,
    ) -> Result<FpaEligibilityOutcome, CollaborationServiceError> {
        require_caller(caller)?;
        let license_id = LicenseId(require_field(license_id, "license_id")?);

        let joined = self
            .regulations
            .fetch_license_with_state_rules(&license_id)
            .map_err(|err| upstream("fetch license", err))?
            .ok_or_else(|| {
                warn!(license_id = %license_id.0, "license not found");
                CollaborationServiceError::NotFound {
                    entity: "license",
                    id: license_id.0.clone(),
                }
            })?;

        let Some(state) = joined.state else {
            warn!(
                license_id = %license_id.0,
                state_code = %joined.license.state_code,
                "license references unknown state"
            );
            return Err(CollaborationServiceError::NotFound {
                entity: "state",
                id: joined.license.state_code.0,
            });
        };

        let outcome = self.engine.evaluate(&joined.license, &state);
        debug!(
            license_id = %outcome.license_id.0,
            state_code = %outcome.state_code,
            rule = ?outcome.matched_rule,
            status = outcome.eligibility.status_label(),
            "fpa eligibility evaluated"
        );
        Ok(outcome)
    }

    /// Check whether a physician can supervise one more NP in a state. A physician
    /// without a directory profile, or one who does not serve the state, yields an
    /// unavailable result rather than an error.
    pub fn check_physician_capacity(
        &self,
        caller: Option<&CallerIdentity>,
        physician_id: &str,
        state_code: &str,
    ) -> Result<CapacityResult, CollaborationServiceError> {
        require_caller(caller)?;
        let physician_id = PhysicianId(require_field(physician_id, "physician_id")?);
        let state_code = StateCode::new(&require_field(state_code, "state_code")?);

        let Some(profile) = self
            .directory
            .fetch_physician_directory_profile(&physician_id)
            .map_err(|err| upstream("fetch physician profile", err))?
        else {
            debug!(physician_id = %physician_id.0, "physician has no directory profile");
            return Ok(no_profile_result());
        };

        if !profile.serves_state(&state_code) {
            debug!(
                physician_id = %physician_id.0,
                state_code = %state_code,
                "physician does not serve state"
            );
            return Ok(state_not_served_result(&profile, &state_code));
        }

        let ratio = self
            .regulations
            .fetch_state_ratio_info(&state_code)
            .map_err(|err| upstream("fetch state ratio", err))?
            .ok_or_else(|| CollaborationServiceError::NotFound {
                entity: "state",
                id: state_code.0.clone(),
            })?;

        if RatioLimit::from_info(&ratio) == RatioLimit::Malformed {
            warn!(
                state_code = %state_code,
                ratio = ?ratio.physician_np_ratio,
                "state ratio is not in 1:N form; treating state maximum as zero"
            );
        }

        let active = self
            .directory
            .count_active_agreements(&physician_id, &state_code)
            .map_err(|err| upstream("count active agreements", err))?;

        let result = evaluate_capacity(&profile, &state_code, active, &ratio);
        debug!(
            physician_id = %physician_id.0,
            state_code = %state_code,
            available = result.available,
            current = result.current_count,
            max = result.max_count,
            "physician capacity evaluated"
        );
        Ok(result)
    }

    /// Apply an agreement start (`+1`) or termination (`-1`) to a physician's count.
    pub fn update_physician_capacity(
        &self,
        caller: Option<&CallerIdentity>,
        physician_id: &str,
        increment: Option<i64>,
    ) -> Result<CapacityAdjustment, CollaborationServiceError> {
        require_caller(caller)?;
        let physician_id = PhysicianId(require_field(physician_id, "physician_id")?);
        let increment = increment.ok_or(CollaborationServiceError::InvalidInput("increment"))?;

        let profile = self
            .directory
            .fetch_physician_directory_profile(&physician_id)
            .map_err(|err| upstream("fetch physician profile", err))?
            .ok_or_else(|| CollaborationServiceError::NotFound {
                entity: "physician profile",
                id: physician_id.0.clone(),
            })?;

        let adjustment = adjust_capacity(&profile, increment);
        self.directory
            .persist_capacity_adjustment(CapacityAdjustmentRecord {
                physician_id: adjustment.physician_id.clone(),
                new_count: adjustment.new_count,
                available_spots: adjustment.available_spots,
                recorded_at: Utc::now(),
            })
            .map_err(|err| upstream("persist capacity adjustment", err))?;

        info!(
            physician_id = %adjustment.physician_id.0,
            increment,
            previous = adjustment.previous_count,
            new_count = adjustment.new_count,
            available_spots = adjustment.available_spots,
            "physician capacity updated"
        );
        Ok(adjustment)
    }
}

fn require_caller(caller: Option<&CallerIdentity>) -> Result<(), CollaborationServiceError> {
    match caller {
        Some(identity) if identity.is_authenticated() => Ok(()),
        _ => Err(CollaborationServiceError::Unauthenticated),
    }
}

fn require_field(value: &str, field: &'static str) -> Result<String, CollaborationServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CollaborationServiceError::InvalidInput(field));
    }
    Ok(trimmed.to_string())
}

fn upstream(operation: &'static str, err: RepositoryError) -> CollaborationServiceError {
    error!(operation, error = %err, "data access failed");
    CollaborationServiceError::Repository(err)
}

/// Error raised by the collaboration service.
#[derive(Debug, thiserror::Error)]
pub enum CollaborationServiceError {
    #[error("missing required field: {0}")]
    InvalidInput(&'static str),
    #[error("caller is not authenticated")]
    Unauthenticated,
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
