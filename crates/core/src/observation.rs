//! Recording a new observation against a patient.

use crate::error::PatientResult;
use crate::recommendation::{recommend, TreatmentPlan};
use crate::registry::{PatientId, PatientRegistry};
use chart_types::{Cd4Count, ViralLoad};

/// Computes the treatment plan for `viral_load`, appends a record carrying the plan's
/// summary as its `treatment_used`, and returns the plan for display.
///
/// # Errors
///
/// Returns `PatientError::Validation` for a negative or non-finite measurement and
/// `PatientError::NotFound` for an unknown patient. No record is appended on error.
pub fn record_observation(
    registry: &mut PatientRegistry,
    patient_id: PatientId,
    viral_load: f64,
    cd4_count: f64,
) -> PatientResult<TreatmentPlan> {
    let viral_load = ViralLoad::new(viral_load)?;
    let cd4_count = Cd4Count::new(cd4_count)?;

    let plan = recommend(viral_load);
    registry.append_record(
        patient_id,
        viral_load.value(),
        cd4_count.value(),
        plan.summary(),
    )?;

    tracing::info!(
        patient_id,
        nnrti = %plan.complementary_nnrti,
        "observation recorded"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatientError;

    #[test]
    fn test_record_observation_for_hannah() {
        let mut registry = PatientRegistry::with_demo_patients();
        let hannah_id = registry.find_by_name("Hannah").unwrap().id;

        let plan = record_observation(&mut registry, hannah_id, 8000.0, 500.0)
            .expect("observation should be recorded");
        assert_eq!(plan.complementary_nnrti, "EFV");

        let hannah = registry.patient(hannah_id).unwrap();
        assert_eq!(hannah.records.len(), 1);
        assert_eq!(hannah.records[0].viral_load.value(), 8000.0);
        assert_eq!(hannah.records[0].cd4_count.value(), 500.0);
        assert_eq!(
            hannah.records[0].treatment_used,
            "FTC+TDF, DTG, EFV, extra pk-En"
        );
    }

    #[test]
    fn test_record_observation_unknown_patient_changes_nothing() {
        let mut registry = PatientRegistry::with_demo_patients();
        let err = record_observation(&mut registry, 42, 100.0, 100.0)
            .expect_err("unknown patient");
        assert!(matches!(err, PatientError::NotFound(_)));
        assert!(registry.patient(1).unwrap().records.is_empty());
        assert!(registry.patient(2).unwrap().records.is_empty());
    }

    #[test]
    fn test_record_observation_rejects_bad_measurements() {
        let mut registry = PatientRegistry::with_demo_patients();
        assert!(matches!(
            record_observation(&mut registry, 1, f64::NAN, 1.0),
            Err(PatientError::Validation(_))
        ));
        assert!(matches!(
            record_observation(&mut registry, 1, 1.0, -1.0),
            Err(PatientError::Validation(_))
        ));
        assert!(registry.patient(1).unwrap().records.is_empty());
    }
}
