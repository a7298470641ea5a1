use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State of a single day as it crosses the wire.
///
/// The same shape is used inside the week view and as the response to a
/// toggle, so the frontend renders both from one type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Whether the workout for this date was completed
    pub completed: bool,
    /// Free-text note attached to the date, if any
    pub message: Option<String>,
}

/// A full week of workout state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekViewResponse {
    /// The 7 dates of the week (`YYYY-MM-DD`), Monday first
    pub dates: Vec<String>,
    /// Per-date state for every date in `dates`, default-filled where
    /// nothing has been stored yet
    pub workouts: HashMap<String, WorkoutDay>,
}

/// Request body for `POST /toggle_workout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleWorkoutRequest {
    /// Date to toggle (`YYYY-MM-DD`)
    pub date: String,
    /// Note to store alongside the toggle; omitted means empty
    pub message: Option<String>,
}

/// Request body for `POST /save_message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMessageRequest {
    /// Date the note belongs to (`YYYY-MM-DD`)
    pub date: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMessageResponse {
    pub success: bool,
}

/// Response body for `GET /prize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeResponse {
    pub name: String,
    pub description: String,
    /// Image reference, `/static/images/<file>` or the sentinel `"blank"`
    pub image: String,
}

/// Generic error payload returned for client and server errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
