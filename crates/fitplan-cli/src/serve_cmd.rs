use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use fitplan_core::PlanError;
use fitplan_core::details::get_user_details;
use fitplan_core::plan::GeneratedPlan;
use fitplan_core::replace::replace_plan_exercise;
use fitplan_core::survey::{SurveySubmission, submit_survey};
use fitplan_db::queries::{lookups, users as user_db};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::UserNotFound(_)
            | PlanError::SurveyNotFound(_)
            | PlanError::AssignmentNotFound(_)
            | PlanError::NoReplacement => Self::not_found(err.to_string()),
            PlanError::UnknownFitnessLevel(_)
            | PlanError::MissingFitnessLevel
            | PlanError::InvalidDateRange { .. } => Self::bad_request(err.to_string()),
            PlanError::Storage(inner) => Self::internal(inner),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub uid: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SurveyRequest {
    pub goal: String,
    /// Body type.
    #[serde(rename = "type")]
    pub body_type: String,
    pub level: String,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SurveyResponse {
    pub message: &'static str,
    pub plan_id: Uuid,
    pub fitness_plan_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan: GeneratedPlan,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub id: i64,
    pub plan_day_id: i64,
    pub name: String,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: i32,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/users/{uid}/survey", post(post_survey))
        .route("/api/users/{uid}/details", get(user_details))
        .route("/api/plan-exercises/{id}", delete(replace_exercise))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pool: PgPool, bind: &str, port: u16) -> Result<()> {
    let app = build_router(pool);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("fitplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("fitplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn register(
    State(pool): State<PgPool>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(req) = payload?;
    let email = req.email.trim();
    let uid = req.uid.trim();
    if email.is_empty() || uid.is_empty() {
        return Err(AppError::bad_request("email and uid are required"));
    }

    if let Some(name) = req.avatar_name.as_deref() {
        let found = lookups::find_avatar(&pool, name)
            .await
            .map_err(AppError::internal)?;
        if found.is_none() {
            return Err(AppError::bad_request(format!("avatar {name:?} not found")));
        }
    }

    let user = user_db::upsert_user(
        &pool,
        email,
        uid,
        req.display_name.as_deref(),
        req.avatar_name.as_deref(),
    )
    .await
    .map_err(AppError::internal)?;

    let body = RegisterResponse {
        id: user.id,
        email: user.email,
        uid: user.identity_uid,
        display_name: user.display_name,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn post_survey(
    State(pool): State<PgPool>,
    Path(uid): Path<String>,
    payload: Result<Json<SurveyRequest>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(req) = payload?;
    let submission = SurveySubmission {
        goal: req.goal,
        body_type: req.body_type,
        level: req.level,
        equipment: req.equipment,
        start_date: req.start_date,
        end_date: req.end_date,
    };

    let submitted = submit_survey(&pool, &uid, &submission).await?;

    let body = SurveyResponse {
        message: "Survey submitted and fitness plan generated",
        plan_id: submitted.plan.id,
        fitness_plan_name: submitted.plan.name,
        start_date: submitted.plan.start_date,
        end_date: submitted.plan.end_date,
        plan: submitted.generated,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn user_details(
    State(pool): State<PgPool>,
    Path(uid): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let details = get_user_details(&pool, &uid).await?;
    Ok(Json(details).into_response())
}

async fn replace_exercise(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid plan exercise id: {id}")))?;

    let replaced = replace_plan_exercise(&pool, id).await?;

    let body = ReplaceResponse {
        id: replaced.assignment.id,
        plan_day_id: replaced.assignment.plan_day_id,
        name: replaced.exercise.name,
        sets: replaced.assignment.sets,
        reps: replaced.assignment.reps,
        duration: replaced.assignment.duration,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
