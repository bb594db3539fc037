//! Collaboration Practice Agreement rules: FPA eligibility for NP licenses and
//! supervising-physician capacity under state physician:NP ratios.
//!
//! Both evaluators are pure functions over records already loaded by the service
//! layer, so they can be called concurrently and return identical results for
//! identical inputs.

pub mod capacity;
pub mod domain;
pub mod eligibility;
pub mod format;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use capacity::{
    adjust_capacity, evaluate_capacity, no_profile_result, parse_ratio, state_not_served_result,
    CapacityAdjustment, CapacityBlock, CapacityResult, RatioLimit,
};
pub use domain::{
    CallerIdentity, LicenseId, LicenseProgress, LicenseRecord, LicenseWithState, PhysicianId,
    PhysicianProfile, StateCode, StateRatioInfo, StateRules,
};
pub use eligibility::{
    rule_priority, CombinedGate, CpaBasis, EligibilityConfig, EligibilityResult,
    EligibilityRuleKind, FpaEligibilityEngine, FpaEligibilityOutcome,
};
pub use format::pluralize;
pub use import::{StateRulesImportError, StateRulesImporter};
pub use repository::{
    CapacityAdjustmentRecord, PhysicianDirectory, RegulatoryRepository, RepositoryError,
};
pub use router::{collaboration_router, CALLER_HEADER};
pub use service::{CollaborationService, CollaborationServiceError};
