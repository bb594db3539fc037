use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::collaboration::domain::{
    CallerIdentity, LicenseId, LicenseRecord, LicenseWithState, PhysicianId, PhysicianProfile,
    StateCode, StateRatioInfo, StateRules,
};
use crate::workflows::collaboration::eligibility::{EligibilityConfig, FpaEligibilityEngine};
use crate::workflows::collaboration::repository::{
    CapacityAdjustmentRecord, PhysicianDirectory, RegulatoryRepository, RepositoryError,
};
use crate::workflows::collaboration::{collaboration_router, CollaborationService};

pub(super) fn state(code: &str, name: &str) -> StateRules {
    StateRules {
        state_code: StateCode::new(code),
        state_name: name.to_string(),
        fpa_available: true,
        fpa_automatic_with_license: false,
        fpa_hours_required: None,
        fpa_years_required: None,
        physician_np_ratio: None,
        has_ratio_limit: false,
    }
}

pub(super) fn hours_state(required: u32) -> StateRules {
    StateRules {
        fpa_hours_required: Some(required),
        ..state("NY", "New York")
    }
}

pub(super) fn years_state(required: f64) -> StateRules {
    StateRules {
        fpa_years_required: Some(required),
        ..state("VA", "Virginia")
    }
}

pub(super) fn california() -> StateRules {
    StateRules {
        fpa_hours_required: Some(4600),
        fpa_years_required: Some(3.0),
        physician_np_ratio: Some("1:4".to_string()),
        has_ratio_limit: true,
        ..state("CA", "California")
    }
}

pub(super) fn texas() -> StateRules {
    StateRules {
        fpa_available: false,
        physician_np_ratio: Some("1:7".to_string()),
        has_ratio_limit: true,
        ..state("TX", "Texas")
    }
}

pub(super) fn license(state: &StateRules, hours: Option<u32>, years: Option<f64>) -> LicenseRecord {
    LicenseRecord {
        license_id: LicenseId(format!("lic-{}", state.state_code.as_str().to_lowercase())),
        state_code: state.state_code.clone(),
        supervised_hours_in_state: hours,
        supervised_years_in_state: years,
    }
}

pub(super) fn physician(id: &str, capacity: u32, current: u32, states: &str) -> PhysicianProfile {
    PhysicianProfile {
        physician_id: PhysicianId(id.to_string()),
        total_np_capacity: Some(capacity),
        current_np_count: Some(current),
        available_states: states.to_string(),
    }
}

pub(super) fn ratio(raw: Option<&str>) -> StateRatioInfo {
    StateRatioInfo {
        physician_np_ratio: raw.map(str::to_string),
        has_ratio_limit: raw.is_some(),
    }
}

pub(super) fn engine() -> FpaEligibilityEngine {
    FpaEligibilityEngine::new(EligibilityConfig::default())
}

pub(super) fn caller() -> CallerIdentity {
    CallerIdentity("np-portal".to_string())
}

#[derive(Default, Clone)]
pub(super) struct MemoryRegulations {
    pub(super) licenses: Arc<Mutex<HashMap<LicenseId, LicenseRecord>>>,
    pub(super) states: Arc<Mutex<HashMap<StateCode, StateRules>>>,
}

impl MemoryRegulations {
    pub(super) fn with_state(self, rules: StateRules) -> Self {
        self.states
            .lock()
            .expect("regulations mutex poisoned")
            .insert(rules.state_code.clone(), rules);
        self
    }

    pub(super) fn with_license(self, license: LicenseRecord) -> Self {
        self.licenses
            .lock()
            .expect("regulations mutex poisoned")
            .insert(license.license_id.clone(), license);
        self
    }
}

impl RegulatoryRepository for MemoryRegulations {
    fn fetch_license_with_state_rules(
        &self,
        license_id: &LicenseId,
    ) -> Result<Option<LicenseWithState>, RepositoryError> {
        let licenses = self.licenses.lock().expect("regulations mutex poisoned");
        let states = self.states.lock().expect("regulations mutex poisoned");
        Ok(licenses.get(license_id).map(|license| LicenseWithState {
            license: license.clone(),
            state: states.get(&license.state_code).cloned(),
        }))
    }

    fn fetch_state_ratio_info(
        &self,
        state_code: &StateCode,
    ) -> Result<Option<StateRatioInfo>, RepositoryError> {
        let states = self.states.lock().expect("regulations mutex poisoned");
        Ok(states.get(state_code).map(StateRules::ratio_info))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    pub(super) profiles: Arc<Mutex<HashMap<PhysicianId, PhysicianProfile>>>,
    pub(super) active: Arc<Mutex<HashMap<(PhysicianId, StateCode), u32>>>,
    pub(super) adjustments: Arc<Mutex<Vec<CapacityAdjustmentRecord>>>,
}

impl MemoryDirectory {
    pub(super) fn with_profile(self, profile: PhysicianProfile) -> Self {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(profile.physician_id.clone(), profile);
        self
    }

    pub(super) fn with_active(self, physician_id: &str, state_code: &str, count: u32) -> Self {
        self.active.lock().expect("directory mutex poisoned").insert(
            (PhysicianId(physician_id.to_string()), StateCode::new(state_code)),
            count,
        );
        self
    }

    pub(super) fn adjustments(&self) -> Vec<CapacityAdjustmentRecord> {
        self.adjustments
            .lock()
            .expect("directory mutex poisoned")
            .clone()
    }
}

impl PhysicianDirectory for MemoryDirectory {
    fn fetch_physician_directory_profile(
        &self,
        physician_id: &PhysicianId,
    ) -> Result<Option<PhysicianProfile>, RepositoryError> {
        let profiles = self.profiles.lock().expect("directory mutex poisoned");
        Ok(profiles.get(physician_id).cloned())
    }

    fn count_active_agreements(
        &self,
        physician_id: &PhysicianId,
        state_code: &StateCode,
    ) -> Result<u32, RepositoryError> {
        let active = self.active.lock().expect("directory mutex poisoned");
        Ok(active
            .get(&(physician_id.clone(), state_code.clone()))
            .copied()
            .unwrap_or(0))
    }

    fn persist_capacity_adjustment(
        &self,
        record: CapacityAdjustmentRecord,
    ) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.lock().expect("directory mutex poisoned");
        let profile = profiles
            .get_mut(&record.physician_id)
            .ok_or(RepositoryError::NotFound)?;
        profile.current_np_count = Some(record.new_count);
        self.adjustments
            .lock()
            .expect("directory mutex poisoned")
            .push(record);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl RegulatoryRepository for UnavailableStore {
    fn fetch_license_with_state_rules(
        &self,
        _license_id: &LicenseId,
    ) -> Result<Option<LicenseWithState>, RepositoryError> {
        Err(RepositoryError::Unavailable("graph backend offline".to_string()))
    }

    fn fetch_state_ratio_info(
        &self,
        _state_code: &StateCode,
    ) -> Result<Option<StateRatioInfo>, RepositoryError> {
        Err(RepositoryError::Unavailable("graph backend offline".to_string()))
    }
}

impl PhysicianDirectory for UnavailableStore {
    fn fetch_physician_directory_profile(
        &self,
        _physician_id: &PhysicianId,
    ) -> Result<Option<PhysicianProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("graph backend offline".to_string()))
    }

    fn count_active_agreements(
        &self,
        _physician_id: &PhysicianId,
        _state_code: &StateCode,
    ) -> Result<u32, RepositoryError> {
        Err(RepositoryError::Unavailable("graph backend offline".to_string()))
    }

    fn persist_capacity_adjustment(
        &self,
        _record: CapacityAdjustmentRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("graph backend offline".to_string()))
    }
}

/// Regulations with California and Texas on file, a CA license at 4,000 hours and
/// two years, and a license pointing at a state with no record.
pub(super) fn seeded_regulations() -> MemoryRegulations {
    let california = california();
    MemoryRegulations::default()
        .with_license(license(&california, Some(4000), Some(2.0)))
        .with_license(LicenseRecord {
            license_id: LicenseId("lic-orphan".to_string()),
            state_code: StateCode::new("ZZ"),
            supervised_hours_in_state: None,
            supervised_years_in_state: None,
        })
        .with_state(california)
        .with_state(texas())
        .with_state(state("MI", "Michigan"))
}

/// Directory with one physician serving CA and MI, capped at 6 NPs.
pub(super) fn seeded_directory() -> MemoryDirectory {
    MemoryDirectory::default()
        .with_profile(physician("phys-1", 6, 2, "CA,MI"))
        .with_active("phys-1", "CA", 4)
        .with_active("phys-1", "MI", 2)
}

pub(super) fn build_service() -> (
    CollaborationService<MemoryRegulations, MemoryDirectory>,
    Arc<MemoryRegulations>,
    Arc<MemoryDirectory>,
) {
    let regulations = Arc::new(seeded_regulations());
    let directory = Arc::new(seeded_directory());
    let service = CollaborationService::new(
        regulations.clone(),
        directory.clone(),
        EligibilityConfig::default(),
    );
    (service, regulations, directory)
}

pub(super) fn unavailable_service() -> CollaborationService<UnavailableStore, UnavailableStore> {
    CollaborationService::new(
        Arc::new(UnavailableStore),
        Arc::new(UnavailableStore),
        EligibilityConfig::default(),
    )
}

pub(super) fn router_with_service(
    service: CollaborationService<MemoryRegulations, MemoryDirectory>,
) -> axum::Router {
    collaboration_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
