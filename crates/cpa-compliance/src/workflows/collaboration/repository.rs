use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    LicenseId, LicenseWithState, PhysicianId, PhysicianProfile, StateCode, StateRatioInfo,
};

/// Read access to licenses and state regulatory records.
pub trait RegulatoryRepository: Send + Sync {
    /// License joined with its owning state's rules, or `None` if the license is unknown.
    fn fetch_license_with_state_rules(
        &self,
        license_id: &LicenseId,
    ) -> Result<Option<LicenseWithState>, RepositoryError>;

    fn fetch_state_ratio_info(
        &self,
        state_code: &StateCode,
    ) -> Result<Option<StateRatioInfo>, RepositoryError>;
}

/// Physician directory and agreement bookkeeping.
pub trait PhysicianDirectory: Send + Sync {
    fn fetch_physician_directory_profile(
        &self,
        physician_id: &PhysicianId,
    ) -> Result<Option<PhysicianProfile>, RepositoryError>;

    /// Agreements for the physician in the state that currently occupy a capacity slot.
    fn count_active_agreements(
        &self,
        physician_id: &PhysicianId,
        state_code: &StateCode,
    ) -> Result<u32, RepositoryError>;

    fn persist_capacity_adjustment(
        &self,
        record: CapacityAdjustmentRecord,
    ) -> Result<(), RepositoryError>;
}

/// Write payload for a capacity adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityAdjustmentRecord {
    pub physician_id: PhysicianId,
    pub new_count: u32,
    pub available_spots: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Error enumeration for data-access failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
