use crate::calendar;
use crate::db::DbConnection;
use chrono::Local;
use shared::{WeekViewResponse, WorkoutDay};
use std::collections::HashMap;
use tracing::info;

/// Which week a week-view request targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeekSelector {
    /// The week containing today, local server time
    Current,
    /// An explicit ISO year + week pair, e.g. from `?week=2025-20`
    Explicit { year: i32, week: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("no such week: {year}-{week:02}")]
    InvalidWeek { year: i32, week: u32 },

    #[error("storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ServiceError {
    /// Client errors are the caller's fault and must not be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::InvalidWeek { .. })
    }
}

/// Service answering week-view and toggle/save requests.
#[derive(Clone)]
pub struct WorkoutService {
    db: DbConnection,
}

impl WorkoutService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Build the week view for the selected week: the 7 dates Monday through
    /// Sunday, each mapped to its stored record or a default-empty one.
    pub async fn get_week_view(
        &self,
        selector: WeekSelector,
    ) -> Result<WeekViewResponse, ServiceError> {
        info!("Getting week view for {:?}", selector);

        let dates = match selector {
            WeekSelector::Current => calendar::current_week_dates(Local::now().date_naive()),
            WeekSelector::Explicit { year, week } => calendar::explicit_week_dates(year, week)
                .ok_or(ServiceError::InvalidWeek { year, week })?,
        };

        let stored = self.db.get_workouts(&dates).await?;

        let workouts: HashMap<String, WorkoutDay> = dates
            .iter()
            .map(|date| {
                let day = stored
                    .get(date)
                    .map(|row| WorkoutDay {
                        completed: row.completed,
                        message: row.message.clone(),
                    })
                    .unwrap_or_default();
                (date.clone(), day)
            })
            .collect();

        Ok(WeekViewResponse { dates, workouts })
    }

    /// Toggle the workout for `date`, creating it as completed on first touch.
    /// Returns the resulting record.
    pub async fn toggle_workout(
        &self,
        date: &str,
        message: &str,
    ) -> Result<WorkoutDay, ServiceError> {
        info!("Toggling workout for {}", date);

        Self::validate_date(date)?;
        let row = self.db.toggle_workout(date, message).await?;

        Ok(WorkoutDay {
            completed: row.completed,
            message: row.message,
        })
    }

    /// Store the message for `date` without touching its completion state.
    pub async fn save_message(&self, date: &str, message: &str) -> Result<(), ServiceError> {
        info!("Saving message for {}", date);

        Self::validate_date(date)?;
        self.db.save_message(date, message).await?;

        Ok(())
    }

    fn validate_date(date: &str) -> Result<(), ServiceError> {
        calendar::parse_date(date)
            .map(|_| ())
            .ok_or_else(|| ServiceError::InvalidDate(date.to_string()))
    }
}
