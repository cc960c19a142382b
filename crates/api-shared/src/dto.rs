//! JSON request and response bodies.
//!
//! Measurements travel as plain numbers and ages as signed integers, so out-of-range
//! input reaches the core and comes back as a validation error instead of a
//! deserialisation failure.

use chart_core::{
    ClinicalRecord as CoreRecord, Patient as CorePatient, PatientSummary, TreatmentPlan,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Structured recommendation plus its one-line summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TreatmentPlanRes {
    pub base_drug_combo: String,
    pub complementary_ini: String,
    pub complementary_nnrti: String,
    pub extra_pi: String,
    pub extra_pk_en: bool,
    pub summary: String,
}

impl From<TreatmentPlan> for TreatmentPlanRes {
    fn from(plan: TreatmentPlan) -> Self {
        let summary = plan.summary();
        Self {
            base_drug_combo: plan.base_drug_combo,
            complementary_ini: plan.complementary_ini,
            complementary_nnrti: plan.complementary_nnrti,
            extra_pi: plan.extra_pi,
            extra_pk_en: plan.extra_pk_en,
            summary,
        }
    }
}

/// A dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: u64,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub ethnicity: String,
    pub condition: String,
}

impl From<PatientSummary> for Patient {
    fn from(p: PatientSummary) -> Self {
        Self {
            id: p.id,
            name: p.name,
            age: p.age.years(),
            gender: p.gender,
            ethnicity: p.ethnicity,
            condition: p.condition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClinicalRecord {
    pub viral_load: f64,
    pub cd4_count: f64,
    pub treatment_used: String,
}

impl From<&CoreRecord> for ClinicalRecord {
    fn from(r: &CoreRecord) -> Self {
        Self {
            viral_load: r.viral_load.value(),
            cd4_count: r.cd4_count.value(),
            treatment_used: r.treatment_used.clone(),
        }
    }
}

/// One patient with their full record log, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientChartRes {
    pub patient: Patient,
    pub records: Vec<ClinicalRecord>,
}

impl From<&CorePatient> for PatientChartRes {
    fn from(p: &CorePatient) -> Self {
        Self {
            patient: p.summary().into(),
            records: p.records.iter().map(ClinicalRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRes {
    pub session_id: String,
    pub patient_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub ethnicity: String,
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    pub patient: Patient,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordObservationReq {
    pub viral_load: f64,
    pub cd4_count: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordObservationRes {
    pub plan: TreatmentPlanRes,
    pub record_count: u64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecommendationQuery {
    /// Viral load in copies/mL
    pub viral_load: f64,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// Exact patient name; the first match wins
    pub name: String,
}
