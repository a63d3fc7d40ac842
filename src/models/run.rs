// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run model for storage and API.

use crate::locale::Locale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Workout category. Submissions are restricted to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    #[default]
    Easy,
    Tempo,
    Interval,
    Long,
    Recovery,
}

impl RunType {
    pub const ALL: [RunType; 5] = [
        RunType::Easy,
        RunType::Tempo,
        RunType::Interval,
        RunType::Long,
        RunType::Recovery,
    ];

    /// Value stored in the `run_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            RunType::Easy => "easy",
            RunType::Tempo => "tempo",
            RunType::Interval => "interval",
            RunType::Long => "long",
            RunType::Recovery => "recovery",
        }
    }

    /// Parse a stored value; unknown values yield `None`.
    pub fn from_db(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Ru, RunType::Easy) => "Легкая",
            (Locale::Ru, RunType::Tempo) => "Темповая",
            (Locale::Ru, RunType::Interval) => "Интервальная",
            (Locale::Ru, RunType::Long) => "Длительная",
            (Locale::Ru, RunType::Recovery) => "Восстановительная",
            (Locale::En, RunType::Easy) => "Easy",
            (Locale::En, RunType::Tempo) => "Tempo",
            (Locale::En, RunType::Interval) => "Interval",
            (Locale::En, RunType::Long) => "Long",
            (Locale::En, RunType::Recovery) => "Recovery",
        }
    }

    pub fn style(self) -> BadgeStyle {
        match self {
            RunType::Easy => BadgeStyle::Green,
            RunType::Tempo => BadgeStyle::Orange,
            RunType::Interval => BadgeStyle::Red,
            RunType::Long => BadgeStyle::Blue,
            RunType::Recovery => BadgeStyle::Purple,
        }
    }
}

/// Presentation style of a run-type badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Green,
    Orange,
    Red,
    Blue,
    Purple,
}

/// Stored run record, as returned by `select *` on the `runs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Store-assigned identifier
    pub id: String,
    /// Owner (authenticated account id)
    pub user_id: String,
    /// Distance in kilometers
    pub distance: f64,
    /// Duration in seconds
    pub duration: u64,
    /// Minutes per kilometer, computed by the store
    #[serde(default)]
    pub pace: Option<f64>,
    /// Raw category; rows may carry values outside [`RunType`]
    pub run_type: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

impl Run {
    /// Known category, if the stored value is one.
    pub fn kind(&self) -> Option<RunType> {
        RunType::from_db(&self.run_type)
    }
}

/// Insert payload for the `runs` table. `id` and `pace` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRun {
    pub user_id: String,
    pub distance: f64,
    pub duration: u64,
    pub run_type: RunType,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

/// Projection used for aggregation (`select distance, duration, pace`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatsRow {
    pub distance: f64,
    pub duration: u64,
    #[serde(default)]
    pub pace: Option<f64>,
}

impl From<&Run> for RunStatsRow {
    fn from(run: &Run) -> Self {
        Self {
            distance: run.distance,
            duration: run.duration,
            pace: run.pace,
        }
    }
}

/// Pace in minutes per kilometer, as the store derives it.
///
/// Returns `None` when the distance cannot produce a finite pace.
pub fn compute_pace(duration_secs: u64, distance_km: f64) -> Option<f64> {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return None;
    }
    Some(duration_secs as f64 / 60.0 / distance_km).filter(|pace| pace.is_finite())
}
