//! In-memory patient registry.
//!
//! The registry is a plain owned value: whoever holds it (a terminal session, a REST
//! session) owns the only copy, and it is dropped with its owner. There is no
//! persistence.
//!
//! ## Identity
//!
//! Patients get integer ids of `max(existing) + 1`, starting at 1. Patients are never
//! removed, so ids are never reused. Names are not unique; [`PatientRegistry::find_by_name`]
//! resolves to the first match in insertion order, and [`PatientRegistry::patient`] is
//! the unambiguous lookup.

use crate::error::{PatientError, PatientResult};
use chart_types::{Age, Cd4Count, ViralLoad};
use serde::Serialize;

pub type PatientId = u64;

/// One clinical observation. Never changed once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalRecord {
    pub viral_load: ViralLoad,
    pub cd4_count: Cd4Count,
    pub treatment_used: String,
}

/// A patient together with their record log, oldest record first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: Age,
    pub gender: String,
    pub ethnicity: String,
    pub condition: String,
    pub records: Vec<ClinicalRecord>,
}

/// The dashboard row for a patient: everything but the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    pub id: PatientId,
    pub name: String,
    pub age: Age,
    pub gender: String,
    pub ethnicity: String,
    pub condition: String,
}

impl Patient {
    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id,
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            ethnicity: self.ethnicity.clone(),
            condition: self.condition.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientRegistry {
    patients: Vec<Patient>,
}

impl PatientRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the two demo patients, John Doe (id 1) and
    /// Hannah (id 2), neither with any records.
    pub fn with_demo_patients() -> Self {
        let mut registry = Self::new();
        for (name, age, gender, ethnicity) in [
            ("John Doe", 30, "Male", "Asian"),
            ("Hannah", 25, "Female", "Caucasian"),
        ] {
            registry
                .add_patient(name, age, gender, ethnicity, "HIV")
                .expect("demo ages are in range");
        }
        registry
    }

    /// Adds a patient and returns the assigned id.
    ///
    /// Free-text fields are stored as given; duplicate names are permitted.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if `age` is outside `0..=120`. The registry
    /// is unchanged in that case.
    pub fn add_patient(
        &mut self,
        name: impl Into<String>,
        age: i64,
        gender: impl Into<String>,
        ethnicity: impl Into<String>,
        condition: impl Into<String>,
    ) -> PatientResult<PatientId> {
        let age = Age::new(age)?;
        let id = self.patients.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        let patient = Patient {
            id,
            name: name.into(),
            age,
            gender: gender.into(),
            ethnicity: ethnicity.into(),
            condition: condition.into(),
            records: Vec::new(),
        };
        tracing::debug!(patient_id = id, name = %patient.name, "patient added");
        self.patients.push(patient);

        Ok(id)
    }

    /// Returns the first patient, in insertion order, whose name equals `name` exactly.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no patient has that name.
    pub fn find_by_name(&self, name: &str) -> PatientResult<&Patient> {
        self.patients
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PatientError::NotFound(format!("no patient named {name:?}")))
    }

    /// Returns the patient with the given id.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if the id is unknown.
    pub fn patient(&self, id: PatientId) -> PatientResult<&Patient> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Appends a clinical record to a patient's log.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if either measurement is negative or not
    /// finite, and `PatientError::NotFound` if the id is unknown. Nothing is appended
    /// on error.
    pub fn append_record(
        &mut self,
        id: PatientId,
        viral_load: f64,
        cd4_count: f64,
        treatment_used: impl Into<String>,
    ) -> PatientResult<()> {
        let record = ClinicalRecord {
            viral_load: ViralLoad::new(viral_load)?,
            cd4_count: Cd4Count::new(cd4_count)?,
            treatment_used: treatment_used.into(),
        };

        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        patient.records.push(record);
        tracing::debug!(
            patient_id = id,
            records = patient.records.len(),
            "record appended"
        );

        Ok(())
    }

    /// Lists every patient without their records, in insertion order.
    pub fn list_patients(&self) -> Vec<PatientSummary> {
        self.patients.iter().map(Patient::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

fn not_found(id: PatientId) -> PatientError {
    PatientError::NotFound(format!("no patient with id {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_patient_to_empty_registry_assigns_id_1() {
        let mut registry = PatientRegistry::new();
        let id = registry
            .add_patient("Alice", 40, "Female", "Black", "HIV")
            .expect("add should succeed");
        assert_eq!(id, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_patient_assigns_sequential_ids() {
        let mut registry = PatientRegistry::new();
        let ids: Vec<_> = ["A", "B", "C"]
            .iter()
            .map(|name| registry.add_patient(*name, 20, "", "", "").unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_demo_registry_contents() {
        let registry = PatientRegistry::with_demo_patients();
        let patients = registry.list_patients();
        assert_eq!(patients.len(), 2);
        assert_eq!((patients[0].id, patients[0].name.as_str()), (1, "John Doe"));
        assert_eq!(patients[0].age.years(), 30);
        assert_eq!((patients[1].id, patients[1].name.as_str()), (2, "Hannah"));
        assert_eq!(patients[1].ethnicity, "Caucasian");
        assert!(patients.iter().all(|p| p.condition == "HIV"));
    }

    #[test]
    fn test_demo_registry_then_add_alice() {
        let mut registry = PatientRegistry::with_demo_patients();
        let id = registry
            .add_patient("Alice", 40, "Female", "Black", "HIV")
            .expect("add should succeed");

        assert_eq!(id, 3);
        let patients = registry.list_patients();
        assert_eq!(patients.len(), 3);
        assert_eq!(patients[0].name, "John Doe");
        assert_eq!(patients[1].name, "Hannah");
        assert_eq!(patients[2].name, "Alice");
        assert_eq!(patients[2].age.years(), 40);
    }

    #[test]
    fn test_add_patient_rejects_age_out_of_range() {
        let mut registry = PatientRegistry::with_demo_patients();
        let err = registry
            .add_patient("Old", 150, "Male", "Asian", "HIV")
            .expect_err("age 150 should be rejected");
        assert!(matches!(err, PatientError::Validation(msg) if msg.contains("150")));

        assert!(registry.add_patient("Neg", -1, "", "", "").is_err());
        assert_eq!(registry.len(), 2, "failed adds must not change the registry");
    }

    #[test]
    fn test_find_by_name() {
        let registry = PatientRegistry::with_demo_patients();
        let hannah = registry.find_by_name("Hannah").expect("Hannah exists");
        assert_eq!(hannah.id, 2);
        assert_eq!(hannah.ethnicity, "Caucasian");
    }

    #[test]
    fn test_find_by_name_missing() {
        let registry = PatientRegistry::with_demo_patients();
        let err = registry
            .find_by_name("nonexistent")
            .expect_err("should not be found");
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[test]
    fn test_find_by_name_returns_first_duplicate() {
        let mut registry = PatientRegistry::new();
        let first = registry.add_patient("Sam", 30, "Male", "", "HIV").unwrap();
        let second = registry.add_patient("Sam", 50, "Female", "", "HIV").unwrap();

        assert_eq!(registry.find_by_name("Sam").unwrap().id, first);
        let by_id = registry.patient(second).expect("second reachable by id");
        assert_eq!(by_id.age.years(), 50);
    }

    #[test]
    fn test_append_record_preserves_order() {
        let mut registry = PatientRegistry::with_demo_patients();
        for (i, vl) in [100.0, 9000.0, 50.0].into_iter().enumerate() {
            registry
                .append_record(1, vl, 300.0 + i as f64, format!("t{i}"))
                .expect("append should succeed");
        }

        let john = registry.patient(1).unwrap();
        assert_eq!(john.records.len(), 3);
        let loads: Vec<f64> = john.records.iter().map(|r| r.viral_load.value()).collect();
        assert_eq!(loads, vec![100.0, 9000.0, 50.0]);
        assert_eq!(john.records[2].treatment_used, "t2");
        assert!(registry.patient(2).unwrap().records.is_empty());
    }

    #[test]
    fn test_append_record_unknown_patient() {
        let mut registry = PatientRegistry::with_demo_patients();
        let err = registry
            .append_record(99, 1.0, 1.0, "x")
            .expect_err("unknown id");
        assert_eq!(err, PatientError::NotFound("no patient with id 99".into()));
    }

    #[test]
    fn test_append_record_rejects_negative_measurements() {
        let mut registry = PatientRegistry::with_demo_patients();
        assert!(matches!(
            registry.append_record(1, -1.0, 1.0, "x"),
            Err(PatientError::Validation(_))
        ));
        assert!(matches!(
            registry.append_record(1, 1.0, -5.0, "x"),
            Err(PatientError::Validation(_))
        ));
        assert!(registry.patient(1).unwrap().records.is_empty());
    }

    #[test]
    fn test_list_patients_excludes_records() {
        let mut registry = PatientRegistry::with_demo_patients();
        registry.append_record(2, 8000.0, 500.0, "x").unwrap();

        let json = serde_json::to_value(registry.list_patients()).unwrap();
        assert!(json[1].get("records").is_none());
        assert_eq!(json[1]["name"], "Hannah");
    }
}
