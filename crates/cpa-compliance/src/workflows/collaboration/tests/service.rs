use super::common::*;
use crate::workflows::collaboration::domain::CallerIdentity;
use crate::workflows::collaboration::eligibility::{
    EligibilityConfig, EligibilityResult, EligibilityRuleKind,
};
use crate::workflows::collaboration::repository::RepositoryError;
use crate::workflows::collaboration::{
    CapacityBlock, CollaborationService, CollaborationServiceError,
};
use std::sync::Arc;

#[test]
fn eligibility_requires_authenticated_caller() {
    let (service, _, _) = build_service();

    let missing = service.calculate_fpa_eligibility(None, "lic-ca");
    assert!(matches!(
        missing,
        Err(CollaborationServiceError::Unauthenticated)
    ));

    let blank = CallerIdentity("  ".to_string());
    let blank = service.calculate_fpa_eligibility(Some(&blank), "lic-ca");
    assert!(matches!(blank, Err(CollaborationServiceError::Unauthenticated)));
}

#[test]
fn eligibility_rejects_blank_license_id_before_data_access() {
    let service = unavailable_service();

    match service.calculate_fpa_eligibility(Some(&caller()), "   ") {
        Err(CollaborationServiceError::InvalidInput(field)) => assert_eq!(field, "license_id"),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn eligibility_evaluates_stored_license() {
    let (service, _, _) = build_service();

    let outcome = service
        .calculate_fpa_eligibility(Some(&caller()), "lic-ca")
        .expect("eligibility evaluates");

    assert_eq!(outcome.state_code.as_str(), "CA");
    assert_eq!(outcome.matched_rule, EligibilityRuleKind::CombinedRequirement);
    match outcome.eligibility {
        EligibilityResult::FpaEligibleFuture {
            hours_remaining,
            years_remaining,
            ..
        } => {
            assert_eq!(hours_remaining, Some(600));
            assert_eq!(years_remaining, Some(1.0));
        }
        other => panic!("expected future eligibility, got {other:?}"),
    }
}

#[test]
fn eligibility_distinguishes_missing_license_and_state() {
    let (service, _, _) = build_service();

    match service.calculate_fpa_eligibility(Some(&caller()), "lic-unknown") {
        Err(CollaborationServiceError::NotFound { entity, id }) => {
            assert_eq!(entity, "license");
            assert_eq!(id, "lic-unknown");
        }
        other => panic!("expected missing license, got {other:?}"),
    }

    match service.calculate_fpa_eligibility(Some(&caller()), "lic-orphan") {
        Err(CollaborationServiceError::NotFound { entity, id }) => {
            assert_eq!(entity, "state");
            assert_eq!(id, "ZZ");
        }
        other => panic!("expected missing state, got {other:?}"),
    }
}

#[test]
fn eligibility_surfaces_upstream_failures() {
    let service = unavailable_service();

    match service.calculate_fpa_eligibility(Some(&caller()), "lic-ca") {
        Err(CollaborationServiceError::Repository(RepositoryError::Unavailable(message))) => {
            assert!(message.contains("offline"));
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[test]
fn capacity_check_applies_state_ratio() {
    let (service, _, _) = build_service();

    let result = service
        .check_physician_capacity(Some(&caller()), "phys-1", "ca")
        .expect("capacity evaluates");

    assert!(!result.available);
    assert_eq!(result.current_count, 4);
    assert_eq!(result.max_count, 4);
    assert_eq!(result.blocked_by, Some(CapacityBlock::StateRatio));
}

#[test]
fn capacity_check_without_ratio_uses_physician_cap() {
    let (service, _, _) = build_service();

    let result = service
        .check_physician_capacity(Some(&caller()), "phys-1", "MI")
        .expect("capacity evaluates");

    assert!(result.available);
    assert_eq!(result.max_count, 6);
    assert_eq!(result.state_ratio, "No limit");
}

#[test]
fn capacity_check_without_profile_is_a_result_not_an_error() {
    let (service, _, _) = build_service();

    let result = service
        .check_physician_capacity(Some(&caller()), "phys-missing", "CA")
        .expect("missing profile is a business outcome");

    assert!(!result.available);
    assert_eq!(result.current_count, 0);
    assert_eq!(result.max_count, 0);
    assert_eq!(result.blocked_by, Some(CapacityBlock::NoDirectoryProfile));
}

#[test]
fn capacity_check_validates_required_fields() {
    let (service, _, _) = build_service();

    assert!(matches!(
        service.check_physician_capacity(Some(&caller()), "", "CA"),
        Err(CollaborationServiceError::InvalidInput("physician_id"))
    ));
    assert!(matches!(
        service.check_physician_capacity(Some(&caller()), "phys-1", " "),
        Err(CollaborationServiceError::InvalidInput("state_code"))
    ));
}

#[test]
fn capacity_check_for_unknown_state_is_not_found() {
    let directory = seeded_directory().with_profile(physician("phys-wy", 3, 0, "WY"));
    let service = CollaborationService::new(
        Arc::new(seeded_regulations()),
        Arc::new(directory),
        EligibilityConfig::default(),
    );

    match service.check_physician_capacity(Some(&caller()), "phys-wy", "WY") {
        Err(CollaborationServiceError::NotFound { entity, id }) => {
            assert_eq!(entity, "state");
            assert_eq!(id, "WY");
        }
        other => panic!("expected missing state, got {other:?}"),
    }
}

#[test]
fn unserved_state_is_unavailable_without_regulatory_lookup() {
    let service = CollaborationService::new(
        Arc::new(UnavailableStore),
        Arc::new(seeded_directory()),
        EligibilityConfig::default(),
    );

    let result = service
        .check_physician_capacity(Some(&caller()), "phys-1", "WY")
        .expect("unserved state is a business result");

    assert!(!result.available);
    assert_eq!(result.blocked_by, Some(CapacityBlock::StateNotServed));
    assert_eq!(result.reason, "Physician is not available in WY");
    assert_eq!(result.current_count, 2);
    assert_eq!(result.max_count, 6);
    assert_eq!(result.state_ratio, "N/A");
}

#[test]
fn capacity_update_persists_clamped_count() {
    let (service, _, directory) = build_service();

    let adjustment = service
        .update_physician_capacity(Some(&caller()), "phys-1", Some(-5))
        .expect("adjustment applies");

    assert_eq!(adjustment.previous_count, 2);
    assert_eq!(adjustment.new_count, 0);
    assert_eq!(adjustment.available_spots, 6);

    let persisted = directory.adjustments();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].new_count, 0);
    assert_eq!(persisted[0].available_spots, 6);

    let next = service
        .update_physician_capacity(Some(&caller()), "phys-1", Some(1))
        .expect("second adjustment applies");
    assert_eq!(next.previous_count, 0);
    assert_eq!(next.new_count, 1);
    assert_eq!(next.available_spots, 5);
}

#[test]
fn capacity_update_requires_increment_and_profile() {
    let (service, _, directory) = build_service();

    assert!(matches!(
        service.update_physician_capacity(Some(&caller()), "phys-1", None),
        Err(CollaborationServiceError::InvalidInput("increment"))
    ));

    match service.update_physician_capacity(Some(&caller()), "phys-missing", Some(1)) {
        Err(CollaborationServiceError::NotFound { entity, .. }) => {
            assert_eq!(entity, "physician profile")
        }
        other => panic!("expected missing profile, got {other:?}"),
    }

    assert!(directory.adjustments().is_empty());
}
