use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use shared::{
    ErrorResponse, PrizeResponse, SaveMessageRequest, SaveMessageResponse, ToggleWorkoutRequest,
};
use std::sync::Arc;
use tracing::info;

use crate::domain::{ServiceError, WeekSelector, WorkoutService};
use crate::prizes::PrizeCatalog;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub workout_service: WorkoutService,
    pub prize_catalog: Arc<PrizeCatalog>,
}

impl AppState {
    pub fn new(workout_service: WorkoutService, prize_catalog: Arc<PrizeCatalog>) -> Self {
        Self {
            workout_service,
            prize_catalog,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/workouts", get(get_workouts))
        .route("/toggle_workout", post(toggle_workout))
        .route("/save_message", post(save_message))
        .route("/prize", get(get_prize))
        .with_state(state)
}

/// Query parameters for the week view endpoint.
#[derive(Deserialize, Debug)]
pub struct WorkoutsQuery {
    /// Legacy explicit week selector, `YYYY-WW`
    pub week: Option<String>,
}

/// Axum handler for GET /workouts
pub async fn get_workouts(
    State(state): State<AppState>,
    Query(query): Query<WorkoutsQuery>,
) -> Response {
    info!("GET /workouts - query: {:?}", query);

    let selector = match query.week.as_deref() {
        None => WeekSelector::Current,
        Some(raw) => match parse_week_param(raw) {
            Some((year, week)) => WeekSelector::Explicit { year, week },
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("invalid week '{raw}', expected YYYY-WW"),
                    }),
                )
                    .into_response();
            }
        },
    };

    match state.workout_service.get_week_view(selector).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /toggle_workout
pub async fn toggle_workout(
    State(state): State<AppState>,
    Json(request): Json<ToggleWorkoutRequest>,
) -> Response {
    info!("POST /toggle_workout - date: {}", request.date);

    // A missing message still overwrites the stored one, as an empty string
    let message = request.message.unwrap_or_default();

    match state
        .workout_service
        .toggle_workout(&request.date, &message)
        .await
    {
        Ok(day) => (StatusCode::OK, Json(day)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for POST /save_message
pub async fn save_message(
    State(state): State<AppState>,
    Json(request): Json<SaveMessageRequest>,
) -> Response {
    info!("POST /save_message - date: {}", request.date);

    match state
        .workout_service
        .save_message(&request.date, &request.message)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(SaveMessageResponse { success: true })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Axum handler for GET /prize
pub async fn get_prize(State(state): State<AppState>) -> Response {
    let today = Local::now().date_naive();
    info!("GET /prize - today: {}", today);

    match state.prize_catalog.lookup(today) {
        Some(prize) => (
            StatusCode::OK,
            Json(PrizeResponse {
                name: prize.name,
                description: prize.description,
                image: prize.image,
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No prize found for the current week".to_string(),
            }),
        )
            .into_response(),
    }
}

fn parse_week_param(raw: &str) -> Option<(i32, u32)> {
    let (year, week) = raw.split_once('-')?;
    Some((year.parse().ok()?, week.parse().ok()?))
}

fn error_response(err: ServiceError) -> Response {
    if err.is_client_error() {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response()
    } else {
        tracing::error!("Service error: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
