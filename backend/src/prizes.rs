//! Weekly prize catalog.
//!
//! Each ISO week can carry one prize. The catalog is seeded at startup from a
//! fixed list handed in by `main` and is read-mostly afterwards; lookups never
//! fail, a week without a prize is simply `None`.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Datelike, Duration, NaiveDate};

use crate::calendar;

/// A reward for completing the week. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Prize {
    pub name: String,
    pub description: String,
    /// Image reference: `/static/images/<file>`, or `"blank"` when the prize
    /// has no image
    pub image: String,
}

impl Prize {
    /// Build a prize; `image` is the bare file name under `/static/images`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, image: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: image
                .map(|file| format!("/static/images/{file}"))
                .unwrap_or_else(|| "blank".to_string()),
        }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PrizeError {
    #[error("Week number must be between 1 and 53, got {0}")]
    WeekOutOfRange(u32),
}

/// Catalog mapping ISO year-week keys (`"2025-07"`) to prizes.
pub struct PrizeCatalog {
    prizes: RwLock<HashMap<String, Prize>>,
}

impl PrizeCatalog {
    pub fn new() -> Self {
        Self {
            prizes: RwLock::new(HashMap::new()),
        }
    }

    /// Build a catalog from seed configuration.
    pub fn with_seed(seed: impl IntoIterator<Item = (i32, u32, Prize)>) -> Result<Self, PrizeError> {
        let catalog = Self::new();
        for (year, week, prize) in seed {
            catalog.register(year, week, prize)?;
        }
        Ok(catalog)
    }

    /// Register a prize for a specific week. Last write wins.
    pub fn register(&self, year: i32, week: u32, prize: Prize) -> Result<(), PrizeError> {
        if !(1..=53).contains(&week) {
            return Err(PrizeError::WeekOutOfRange(week));
        }
        let key = format!("{year}-{week:02}");
        self.prizes.write().unwrap().insert(key, prize);
        Ok(())
    }

    /// Register the same prize for `num_weeks` consecutive ISO weeks, starting
    /// with the week containing `start_date`.
    pub fn register_range(
        &self,
        start_date: NaiveDate,
        num_weeks: u32,
        prize: Prize,
    ) -> Result<(), PrizeError> {
        let mut date = start_date;
        for _ in 0..num_weeks {
            let week = date.iso_week();
            self.register(week.year(), week.week(), prize.clone())?;
            date += Duration::days(7);
        }
        Ok(())
    }

    /// Prize for the week containing `date`, if one is registered. A week
    /// without a prize is a normal outcome, not an error.
    pub fn lookup(&self, date: NaiveDate) -> Option<Prize> {
        let key = calendar::iso_week_key(date);
        self.prizes.read().unwrap().get(&key).cloned()
    }

    /// All registered prizes, sorted by year-week key.
    pub fn list_all(&self) -> Vec<(String, Prize)> {
        let mut all: Vec<(String, Prize)> = self
            .prizes
            .read()
            .unwrap()
            .iter()
            .map(|(key, prize)| (key.clone(), prize.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

impl Default for PrizeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Startup seed: one prize per week for the active stretch of the year.
/// This is configuration, not logic — swap the list freely.
pub fn default_prizes() -> Vec<(i32, u32, Prize)> {
    vec![
        (
            2025,
            14,
            Prize::new(
                "Movie night",
                "Pick a film, snacks are on me",
                Some("Prize_Cinema.gif"),
            ),
        ),
        (
            2025,
            15,
            Prize::new(
                "Cinema trip",
                "Whatever is showing, plus slush",
                Some("Prize_Cinema.gif"),
            ),
        ),
        (
            2025,
            16,
            Prize::new("Protein shake", "Post-workout treat", Some("Prize.gif")),
        ),
        (
            2025,
            17,
            Prize::new(
                "Knitting evening",
                "An evening where you teach me to knit",
                Some("Prize_Knit.gif"),
            ),
        ),
        (
            2025,
            18,
            Prize::new(
                "Pasta night",
                "We cook pasta together, my treat",
                Some("Prize_Pasta.gif"),
            ),
        ),
        (
            2025,
            19,
            Prize::new(
                "Massage",
                "A 30 minute massage whenever it suits you",
                Some("Prize_Massage.gif"),
            ),
        ),
        (
            2025,
            20,
            Prize::new("Spa evening", "Face masks, a sweet film, and snacks", Some("Prize_Spa.gif")),
        ),
        (
            2025,
            21,
            Prize::new(
                "Baking night",
                "We bake something good, you pick what",
                Some("Prize_Baking.gif"),
            ),
        ),
        (
            2025,
            22,
            Prize::new(
                "Digital detox evening",
                "A good book, a cup of tea, phones off all evening",
                Some("Prize.gif"),
            ),
        ),
        (
            2025,
            23,
            Prize::new(
                "Museum visit",
                "A trip to a museum of your choice",
                Some("Prize.gif"),
            ),
        ),
        (
            2025,
            24,
            Prize::new(
                "Botanical garden walk",
                "A photo walk, we compare pictures afterwards",
                Some("Prize.gif"),
            ),
        ),
    ]
}
