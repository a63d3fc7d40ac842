// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display formatting for the run history list.

use crate::locale::Locale;
use crate::models::{BadgeStyle, Run, RunType};
use crate::time_utils::{format_day_month_year, format_duration, format_utc_rfc3339};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One rendered run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunListItem {
    pub id: String,
    /// Stored category value, unchanged
    pub run_type: String,
    pub label: String,
    pub style: BadgeStyle,
    /// Localized "d MMM yyyy"
    pub date: String,
    /// RFC3339 timestamp for machine use
    pub date_iso: String,
    pub distance: String,
    pub duration: String,
    pub pace: String,
    pub notes: Option<String>,
}

/// Rendered run history. An empty history renders as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunListView {
    Empty { message: String },
    Runs { items: Vec<RunListItem> },
}

impl RunListView {
    pub fn items(&self) -> &[RunListItem] {
        match self {
            RunListView::Empty { .. } => &[],
            RunListView::Runs { items } => items,
        }
    }
}

/// Badge label and style for a stored run type.
///
/// Unknown values keep their raw text as the label and use the easy style.
pub fn run_type_badge(run_type: &str, locale: Locale) -> (String, BadgeStyle) {
    match RunType::from_db(run_type) {
        Some(kind) => (kind.label(locale).to_string(), kind.style()),
        None => (run_type.to_string(), RunType::Easy.style()),
    }
}

/// Render runs newest first.
pub fn format_runs(runs: &[Run], locale: Locale) -> RunListView {
    if runs.is_empty() {
        return RunListView::Empty {
            message: locale.no_runs_message().to_string(),
        };
    }

    let mut ordered: Vec<&Run> = runs.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    let items = ordered
        .into_iter()
        .map(|run| format_run(run, locale))
        .collect();

    RunListView::Runs { items }
}

fn format_run(run: &Run, locale: Locale) -> RunListItem {
    let (label, style) = run_type_badge(&run.run_type, locale);

    let pace = match run.pace {
        Some(pace) => format!("{:.1} {}", pace, locale.pace_unit()),
        None => "—".to_string(),
    };

    RunListItem {
        id: run.id.clone(),
        run_type: run.run_type.clone(),
        label,
        style,
        date: format_day_month_year(run.date, locale),
        date_iso: format_utc_rfc3339(run.date),
        distance: format!("{:.1} {}", run.distance, locale.distance_unit()),
        duration: format_duration(run.duration),
        pace,
        notes: run.notes.clone().filter(|notes| !notes.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn run(id: &str, run_type: &str, (y, m, d): (i32, u32, u32)) -> Run {
        Run {
            id: id.to_string(),
            user_id: "u1".to_string(),
            distance: 5.0,
            duration: 1500,
            pace: Some(5.0),
            run_type: run_type.to_string(),
            notes: None,
            date: Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_history_renders_placeholder() {
        let view = format_runs(&[], Locale::Ru);
        assert_eq!(
            view,
            RunListView::Empty {
                message: Locale::Ru.no_runs_message().to_string()
            }
        );
        assert!(view.items().is_empty());
    }

    #[test]
    fn test_runs_are_ordered_newest_first() {
        let runs = vec![
            run("jan", "easy", (2024, 1, 1)),
            run("mar", "easy", (2024, 3, 1)),
        ];
        let view = format_runs(&runs, Locale::En);

        let ids: Vec<&str> = view.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["mar", "jan"]);
    }

    #[test]
    fn test_unknown_run_type_uses_easy_style_and_raw_label() {
        let view = format_runs(&[run("x", "fartlek", (2024, 1, 1))], Locale::Ru);
        let item = &view.items()[0];

        assert_eq!(item.label, "fartlek");
        assert_eq!(item.style, BadgeStyle::Green);
        assert_eq!(item.style, RunType::Easy.style());
    }

    #[test]
    fn test_known_run_types_use_localized_labels() {
        assert_eq!(
            run_type_badge("interval", Locale::Ru),
            ("Интервальная".to_string(), BadgeStyle::Red)
        );
        assert_eq!(
            run_type_badge("long", Locale::En),
            ("Long".to_string(), BadgeStyle::Blue)
        );
    }

    #[test]
    fn test_item_fields_are_formatted() {
        let mut long_run = run("r1", "long", (2024, 3, 1));
        long_run.distance = 21.1;
        long_run.duration = 7325;
        long_run.pace = None;
        long_run.notes = Some("Felt strong".to_string());

        let view = format_runs(&[long_run], Locale::En);
        let item = &view.items()[0];

        assert_eq!(item.date, "1 Mar 2024");
        assert_eq!(item.date_iso, "2024-03-01T08:00:00Z");
        assert_eq!(item.distance, "21.1 km");
        assert_eq!(item.duration, "2:02:05");
        assert_eq!(item.pace, "—");
        assert_eq!(item.notes.as_deref(), Some("Felt strong"));
    }
}
