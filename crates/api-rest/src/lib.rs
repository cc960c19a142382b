//! # API REST
//!
//! REST API for the HIV chart.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Per-client sessions, each owning a private patient registry
//!
//! Uses `api-shared` for request/response types and `chart-core` for all patient logic.

#![warn(rust_2018_idioms)]

pub mod session;

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::{
    ClinicalRecord, CreatePatientReq, CreatePatientRes, CreateSessionRes, HealthRes,
    HealthService, ListPatientsRes, LookupQuery, Patient, PatientChartRes,
    RecommendationQuery, RecordObservationReq, RecordObservationRes, TreatmentPlanRes,
};
use chart_core::{record_observation, recommend, CoreConfig, PatientError, ViralLoad};

pub use session::{SessionError, SessionStore};

type ApiError = (StatusCode, String);
type ApiResult<T> = Result<T, ApiError>;

/// Application state for the REST API server
///
/// Holds the session store; every handler below resolves a session first and then
/// works on that session's registry only.
#[derive(Clone)]
pub struct AppState {
    sessions: SessionStore,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            sessions: SessionStore::new(cfg),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_recommendation,
        create_session,
        delete_session,
        list_patients,
        create_patient,
        get_patient,
        lookup_patient,
        add_record,
    ),
    components(schemas(
        HealthRes,
        TreatmentPlanRes,
        CreateSessionRes,
        ListPatientsRes,
        Patient,
        ClinicalRecord,
        PatientChartRes,
        CreatePatientReq,
        CreatePatientRes,
        RecordObservationReq,
        RecordObservationRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST application: routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recommendation", get(get_recommendation))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", delete(delete_session))
        .route("/sessions/:id/patients", get(list_patients).post(create_patient))
        .route("/sessions/:id/patients/:patient_id", get(get_patient))
        .route("/sessions/:id/lookup", get(lookup_patient))
        .route("/sessions/:id/patients/:patient_id/records", post(add_record))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::warn!("Invalid session id {:?}: {}", raw, e);
        (StatusCode::BAD_REQUEST, "Invalid session id".to_string())
    })
}

fn reject(err: SessionError) -> ApiError {
    match err {
        SessionError::UnknownSession(id) => {
            tracing::warn!("Unknown session: {}", id);
            (StatusCode::NOT_FOUND, "Unknown session".to_string())
        }
        SessionError::Patient(PatientError::NotFound(msg)) => {
            tracing::warn!("Patient lookup failed: {}", msg);
            (StatusCode::NOT_FOUND, msg)
        }
        SessionError::Patient(err @ PatientError::Validation(_)) => {
            tracing::warn!("Rejected input: {}", err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/recommendation",
    params(RecommendationQuery),
    responses(
        (status = 200, description = "Treatment plan for the viral load", body = TreatmentPlanRes),
        (status = 400, description = "Negative or non-finite viral load")
    )
)]
/// Computes a treatment plan without touching any session.
#[axum::debug_handler]
async fn get_recommendation(
    Query(query): Query<RecommendationQuery>,
) -> ApiResult<Json<TreatmentPlanRes>> {
    let viral_load = ViralLoad::new(query.viral_load)
        .map_err(|e| (StatusCode::BAD_REQUEST, PatientError::from(e).to_string()))?;
    Ok(Json(recommend(viral_load).into()))
}

#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created", body = CreateSessionRes)
    )
)]
/// Opens a new session with its own registry.
///
/// The registry is seeded with the demo patients unless `CHART_SEED_DEMO` is off.
#[axum::debug_handler]
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<CreateSessionRes>) {
    let (id, patient_count) = state.sessions.create().await;
    tracing::info!(session_id = %id, "session created");
    (
        StatusCode::CREATED,
        Json(CreateSessionRes {
            session_id: id.to_string(),
            patient_count: patient_count as u64,
        }),
    )
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Unknown session")
    )
)]
#[axum::debug_handler]
async fn delete_session(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<StatusCode> {
    let id = parse_session_id(&id)?;
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(reject(SessionError::UnknownSession(id)))
    }
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/patients",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Patients in insertion order", body = ListPatientsRes),
        (status = 404, description = "Unknown session")
    )
)]
/// List all patients in the session, without their records.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<ListPatientsRes>> {
    let id = parse_session_id(&id)?;
    let patients = state
        .sessions
        .read(id, |r| Ok(r.list_patients()))
        .await
        .map_err(reject)?;
    Ok(Json(ListPatientsRes {
        patients: patients.into_iter().map(Patient::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/patients",
    params(("id" = String, Path, description = "Session id")),
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = CreatePatientRes),
        (status = 400, description = "Age out of range"),
        (status = 404, description = "Unknown session")
    )
)]
/// Create a new patient in the session.
///
/// The id is one more than the highest existing id. Duplicate names are accepted.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<CreatePatientReq>,
) -> ApiResult<(StatusCode, Json<CreatePatientRes>)> {
    let id = parse_session_id(&id)?;
    let patient = state
        .sessions
        .write(id, |r| {
            let patient_id =
                r.add_patient(req.name, req.age, req.gender, req.ethnicity, req.condition)?;
            Ok(r.patient(patient_id)?.summary())
        })
        .await
        .map_err(reject)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientRes {
            patient: patient.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/patients/{patient_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("patient_id" = u64, Path, description = "Patient id")
    ),
    responses(
        (status = 200, description = "Patient chart", body = PatientChartRes),
        (status = 404, description = "Unknown session or patient")
    )
)]
/// Fetch one patient's chart: demographics plus every record, oldest first.
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath((id, patient_id)): AxumPath<(String, u64)>,
) -> ApiResult<Json<PatientChartRes>> {
    let id = parse_session_id(&id)?;
    let chart = state
        .sessions
        .read(id, |r| r.patient(patient_id).map(PatientChartRes::from))
        .await
        .map_err(reject)?;
    Ok(Json(chart))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}/lookup",
    params(("id" = String, Path, description = "Session id"), LookupQuery),
    responses(
        (status = 200, description = "First patient with that name", body = PatientChartRes),
        (status = 404, description = "Unknown session or no patient with that name")
    )
)]
/// Look a patient up by exact name. When names repeat, the earliest patient wins.
#[axum::debug_handler]
async fn lookup_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<PatientChartRes>> {
    let id = parse_session_id(&id)?;
    let chart = state
        .sessions
        .read(id, |r| r.find_by_name(&query.name).map(PatientChartRes::from))
        .await
        .map_err(reject)?;
    Ok(Json(chart))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/patients/{patient_id}/records",
    params(
        ("id" = String, Path, description = "Session id"),
        ("patient_id" = u64, Path, description = "Patient id")
    ),
    request_body = RecordObservationReq,
    responses(
        (status = 201, description = "Record added; recommendation returned", body = RecordObservationRes),
        (status = 400, description = "Negative or non-finite measurement"),
        (status = 404, description = "Unknown session or patient")
    )
)]
/// Record a viral load and CD4 count and return the treatment recommendation.
///
/// The stored record's `treatment_used` is the recommendation summary.
#[axum::debug_handler]
async fn add_record(
    State(state): State<AppState>,
    AxumPath((id, patient_id)): AxumPath<(String, u64)>,
    Json(req): Json<RecordObservationReq>,
) -> ApiResult<(StatusCode, Json<RecordObservationRes>)> {
    let id = parse_session_id(&id)?;
    let (plan, record_count) = state
        .sessions
        .write(id, |r| {
            let plan = record_observation(r, patient_id, req.viral_load, req.cd4_count)?;
            let count = r.patient(patient_id)?.records.len();
            Ok((plan, count))
        })
        .await
        .map_err(reject)?;

    Ok((
        StatusCode::CREATED,
        Json(RecordObservationRes {
            plan: plan.into(),
            record_count: record_count as u64,
        }),
    ))
}
