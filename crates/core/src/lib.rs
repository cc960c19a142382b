//! # Chart Core
//!
//! Core logic for the HIV chart system:
//! - [`PatientRegistry`]: in-memory patients, each with an append-only record log
//! - [`recommend`]: the viral-load treatment rule
//! - [`record_observation`]: recommend, then record, in one step
//!
//! **No presentation concerns**: the terminal shell and HTTP server live in `chart-cli`
//! and `api-rest`. Callers own their registry and re-read it after each mutation.

pub mod config;
pub mod constants;
pub mod error;
pub mod observation;
pub mod recommendation;
pub mod registry;

pub use chart_types::{Age, Cd4Count, TypeError, ViralLoad, MAX_AGE};
pub use config::CoreConfig;
pub use error::{PatientError, PatientResult};
pub use observation::record_observation;
pub use recommendation::{recommend, TreatmentPlan};
pub use registry::{ClinicalRecord, Patient, PatientId, PatientRegistry, PatientSummary};
