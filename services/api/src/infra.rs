use cpa_compliance::workflows::collaboration::{
    CapacityAdjustmentRecord, LicenseId, LicenseRecord, LicenseWithState, PhysicianDirectory,
    PhysicianId, PhysicianProfile, RegulatoryRepository, RepositoryError, StateCode,
    StateRatioInfo, StateRules, StateRulesImportError, StateRulesImporter,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

const BUILTIN_STATE_RULES: &str = include_str!("../data/state_rules.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// State table from `path` when given, otherwise the bundled table.
pub(crate) fn load_state_rules(
    path: Option<&Path>,
) -> Result<Vec<StateRules>, StateRulesImportError> {
    match path {
        Some(path) => StateRulesImporter::from_path(path),
        None => StateRulesImporter::from_reader(Cursor::new(BUILTIN_STATE_RULES)),
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRegulations {
    licenses: Arc<Mutex<HashMap<LicenseId, LicenseRecord>>>,
    states: Arc<Mutex<HashMap<StateCode, StateRules>>>,
}

impl InMemoryRegulations {
    pub(crate) fn new(states: Vec<StateRules>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.states.lock().expect("regulations mutex poisoned");
            for state in states {
                guard.insert(state.state_code.clone(), state);
            }
        }
        repository
    }

    pub(crate) fn register_license(&self, license: LicenseRecord) {
        self.licenses
            .lock()
            .expect("regulations mutex poisoned")
            .insert(license.license_id.clone(), license);
    }

    pub(crate) fn state(&self, state_code: &StateCode) -> Option<StateRules> {
        self.states
            .lock()
            .expect("regulations mutex poisoned")
            .get(state_code)
            .cloned()
    }
}

impl RegulatoryRepository for InMemoryRegulations {
    fn fetch_license_with_state_rules(
        &self,
        license_id: &LicenseId,
    ) -> Result<Option<LicenseWithState>, RepositoryError> {
        let licenses = self.licenses.lock().expect("regulations mutex poisoned");
        let Some(license) = licenses.get(license_id).cloned() else {
            return Ok(None);
        };
        drop(licenses);

        let state = self.state(&license.state_code);
        Ok(Some(LicenseWithState { license, state }))
    }

    fn fetch_state_ratio_info(
        &self,
        state_code: &StateCode,
    ) -> Result<Option<StateRatioInfo>, RepositoryError> {
        Ok(self.state(state_code).map(|state| state.ratio_info()))
    }
}

/// Lifecycle of a collaboration agreement as tracked by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgreementStatus {
    Draft,
    PendingSignature,
    Active,
    Terminated,
}

impl AgreementStatus {
    /// Pending and active agreements hold a supervision slot.
    fn occupies_slot(self) -> bool {
        matches!(self, AgreementStatus::PendingSignature | AgreementStatus::Active)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AgreementEntry {
    pub(crate) physician_id: PhysicianId,
    pub(crate) state_code: StateCode,
    pub(crate) status: AgreementStatus,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    profiles: Arc<Mutex<HashMap<PhysicianId, PhysicianProfile>>>,
    agreements: Arc<Mutex<Vec<AgreementEntry>>>,
}

impl InMemoryDirectory {
    pub(crate) fn register_profile(&self, profile: PhysicianProfile) {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(profile.physician_id.clone(), profile);
    }

    pub(crate) fn record_agreement(&self, entry: AgreementEntry) {
        self.agreements
            .lock()
            .expect("directory mutex poisoned")
            .push(entry);
    }
}

impl PhysicianDirectory for InMemoryDirectory {
    fn fetch_physician_directory_profile(
        &self,
        physician_id: &PhysicianId,
    ) -> Result<Option<PhysicianProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(physician_id).cloned())
    }

    fn count_active_agreements(
        &self,
        physician_id: &PhysicianId,
        state_code: &StateCode,
    ) -> Result<u32, RepositoryError> {
        let guard = self.agreements.lock().expect("directory mutex poisoned");
        let count = guard
            .iter()
            .filter(|entry| {
                entry.physician_id == *physician_id
                    && entry.state_code == *state_code
                    && entry.status.occupies_slot()
            })
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    fn persist_capacity_adjustment(
        &self,
        record: CapacityAdjustmentRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        let profile = guard
            .get_mut(&record.physician_id)
            .ok_or(RepositoryError::NotFound)?;
        profile.current_np_count = Some(record.new_count);
        Ok(())
    }
}

/// Sample licenses, physicians, and agreements for local runs and the demo.
pub(crate) fn seed_demo_records(
    regulations: &InMemoryRegulations,
    directory: &InMemoryDirectory,
) {
    let licenses = [
        ("lic-ca-001", "CA", Some(4200), Some(2.5)),
        ("lic-ny-001", "NY", Some(3600), None),
        ("lic-fl-001", "FL", Some(1150), None),
        ("lic-va-001", "VA", None, Some(4.0)),
        ("lic-tx-001", "TX", Some(12000), Some(6.0)),
        ("lic-az-001", "AZ", None, None),
    ];
    for (id, state, hours, years) in licenses {
        regulations.register_license(LicenseRecord {
            license_id: LicenseId(id.to_string()),
            state_code: StateCode::new(state),
            supervised_hours_in_state: hours,
            supervised_years_in_state: years,
        });
    }

    directory.register_profile(PhysicianProfile {
        physician_id: PhysicianId("phys-001".to_string()),
        total_np_capacity: Some(6),
        current_np_count: Some(5),
        available_states: "CA,TX,MI".to_string(),
    });
    directory.register_profile(PhysicianProfile {
        physician_id: PhysicianId("phys-002".to_string()),
        total_np_capacity: Some(2),
        current_np_count: Some(2),
        available_states: "NY, VA".to_string(),
    });

    let agreements = [
        ("phys-001", "CA", AgreementStatus::Active),
        ("phys-001", "CA", AgreementStatus::Active),
        ("phys-001", "CA", AgreementStatus::Active),
        ("phys-001", "CA", AgreementStatus::PendingSignature),
        ("phys-001", "CA", AgreementStatus::Terminated),
        ("phys-001", "TX", AgreementStatus::Active),
        ("phys-001", "MI", AgreementStatus::Draft),
        ("phys-002", "NY", AgreementStatus::Active),
        ("phys-002", "VA", AgreementStatus::Active),
    ];
    for (physician, state, status) in agreements {
        directory.record_agreement(AgreementEntry {
            physician_id: PhysicianId(physician.to_string()),
            state_code: StateCode::new(state),
            status,
        });
    }
}
