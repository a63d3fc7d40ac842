//! Run statistics aggregated over a user's fetched rows.
//!
//! Stats are never stored: every fetch recomputes them from scratch.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::locale::Locale;
use crate::models::RunStatsRow;

/// Summary of a user's runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_runs: u64,
    /// Kilometers, unrounded
    pub total_distance: f64,
    /// Seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_duration: u64,
    /// Minutes per kilometer
    pub avg_pace: f64,
}

impl RunStats {
    /// Aggregate rows in any order.
    ///
    /// A missing pace counts as zero and still counts toward the divisor.
    /// Duration totals saturate rather than overflow.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a RunStatsRow>,
    {
        let mut stats = RunStats::default();
        let mut pace_sum = 0.0;

        for row in rows {
            stats.total_runs += 1;
            stats.total_distance += row.distance;
            stats.total_duration = stats.total_duration.saturating_add(row.duration);
            pace_sum += row.pace.unwrap_or(0.0);
        }

        if stats.total_runs > 0 {
            stats.avg_pace = pace_sum / stats.total_runs as f64;
        }

        stats
    }
}

// ─── Stats Cards ─────────────────────────────────────────────

/// Card background accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum CardAccent {
    Primary,
    Accent,
}

/// One of the four summary cards on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsCard {
    pub title: String,
    pub value: String,
    pub icon: String,
    pub accent: CardAccent,
}

/// Render stats as display cards: runs, distance, time, pace.
pub fn stats_cards(stats: &RunStats, locale: Locale) -> Vec<StatsCard> {
    let [runs_title, distance_title, time_title, pace_title] = locale.stats_card_titles();

    let pace_value = if stats.avg_pace > 0.0 {
        format!("{:.1} {}", stats.avg_pace, locale.pace_unit())
    } else {
        "—".to_string()
    };

    vec![
        StatsCard {
            title: runs_title.to_string(),
            value: stats.total_runs.to_string(),
            icon: "activity".to_string(),
            accent: CardAccent::Primary,
        },
        StatsCard {
            title: distance_title.to_string(),
            value: format!("{:.1} {}", stats.total_distance, locale.distance_unit()),
            icon: "trending-up".to_string(),
            accent: CardAccent::Accent,
        },
        StatsCard {
            title: time_title.to_string(),
            value: format_total_time(stats.total_duration, locale),
            icon: "clock".to_string(),
            accent: CardAccent::Primary,
        },
        StatsCard {
            title: pace_title.to_string(),
            value: pace_value,
            icon: "award".to_string(),
            accent: CardAccent::Accent,
        },
    ]
}

/// Coarse hours/minutes rendering for the total-time card.
pub fn format_total_time(seconds: u64, locale: Locale) -> String {
    let (h, m) = locale.hour_minute_suffixes();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        format!("{hours}{h} {minutes}{m}")
    } else {
        format!("{minutes}{m}")
    }
}
