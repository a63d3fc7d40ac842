// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run entry form: input collection, validation and submission.
//!
//! State machine:
//! `Idle -> Submitting -> Idle (closed, fields reset)` on success, or
//! `Idle (open, fields kept, error shown)` on failure.

use crate::db::{RunStore, StoreError};
use crate::locale::Locale;
use crate::models::{NewRun, Notice, RunType, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest duration the store's integer `duration` column holds, in seconds.
pub const MAX_DURATION_SECS: u64 = i32::MAX as u64;

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFormFields {
    /// Kilometers, decimal
    pub distance: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub run_type: RunType,
    pub notes: String,
}

impl RunFormFields {
    /// Total duration in seconds; blank or unparsable parts count as zero.
    ///
    /// Saturates at `u64::MAX`; `to_new_run` rejects anything above
    /// `MAX_DURATION_SECS`.
    pub fn total_seconds(&self) -> u64 {
        parse_leading_int(&self.hours)
            .saturating_mul(3600)
            .saturating_add(parse_leading_int(&self.minutes).saturating_mul(60))
            .saturating_add(parse_leading_int(&self.seconds))
    }

    /// Validate and build the insert payload for `user_id`, dated `now`.
    pub fn to_new_run(&self, user_id: &str, now: DateTime<Utc>) -> Result<NewRun, FormError> {
        let duration = self.total_seconds();
        if duration == 0 {
            return Err(FormError::MissingDuration);
        }
        if duration > MAX_DURATION_SECS {
            return Err(FormError::DurationTooLong);
        }

        let distance = self
            .distance
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or(FormError::InvalidDistance)?;

        let notes = self.notes.trim();

        Ok(NewRun {
            user_id: user_id.to_string(),
            distance,
            duration,
            run_type: self.run_type,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            date: now,
        })
    }
}

/// Integer prefix of `raw` ("12abc" -> 12); no leading digits is zero.
/// Digit runs too long for `u64` saturate.
fn parse_leading_int(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..digits_end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Input rejected before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("duration is zero")]
    MissingDuration,
    #[error("duration does not fit the store")]
    DurationTooLong,
    #[error("distance is not a positive number")]
    InvalidDistance,
}

impl FormError {
    pub fn message(self, locale: Locale) -> &'static str {
        match self {
            FormError::MissingDuration => locale.duration_required(),
            FormError::DurationTooLong => locale.duration_too_long(),
            FormError::InvalidDistance => locale.distance_invalid(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Idle,
    Submitting,
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored; fields reset, dialog closed, refresh signalled.
    Added,
    /// Rejected by validation; no store call was made.
    Rejected(FormError),
    /// The store refused or failed; fields kept for retry.
    Failed(StoreError),
}

/// The run entry dialog.
#[derive(Debug, Clone)]
pub struct RunForm {
    fields: RunFormFields,
    state: FormState,
    open: bool,
    notice: Option<Notice>,
    locale: Locale,
}

impl RunForm {
    pub fn new(locale: Locale) -> Self {
        Self {
            fields: RunFormFields::default(),
            state: FormState::Idle,
            open: false,
            notice: None,
            locale,
        }
    }

    /// Form pre-filled with `fields`, already open.
    pub fn with_fields(fields: RunFormFields, locale: Locale) -> Self {
        Self {
            fields,
            open: true,
            ..Self::new(locale)
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn fields(&self) -> &RunFormFields {
        &self.fields
    }

    /// Most recent notification produced by a submission.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validate and submit the run for `session`'s user.
    ///
    /// `on_run_added` is called exactly once, and only after the store has
    /// accepted the row. Taking `&mut self` rules out a second submission
    /// while one is in flight.
    pub async fn submit<F>(
        &mut self,
        store: &dyn RunStore,
        session: &Session,
        on_run_added: F,
    ) -> SubmitOutcome
    where
        F: FnOnce(),
    {
        let run = match self.fields.to_new_run(&session.user_id, Utc::now()) {
            Ok(run) => run,
            Err(err) => {
                tracing::debug!(user_id = %session.user_id, error = %err, "Run form rejected");
                self.notice = Some(Notice::error(
                    self.locale.error_title(),
                    err.message(self.locale),
                ));
                return SubmitOutcome::Rejected(err);
            }
        };

        let result = {
            let _submitting = SubmittingGuard::enter(&mut self.state);
            store.insert_run(session, &run).await
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    user_id = %session.user_id,
                    distance = run.distance,
                    duration = run.duration,
                    run_type = run.run_type.as_str(),
                    "Run submitted"
                );
                self.fields = RunFormFields::default();
                self.open = false;
                self.notice = Some(Notice::info(
                    self.locale.run_added(),
                    self.locale.run_added_encouragement(),
                ));
                on_run_added();
                SubmitOutcome::Added
            }
            Err(err) => {
                tracing::warn!(
                    user_id = %session.user_id,
                    error = %err,
                    "Run submission failed"
                );
                self.notice = Some(Notice::error(
                    self.locale.error_title(),
                    err.message.clone(),
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }
}

/// Holds the form in `Submitting`; returns it to `Idle` when dropped, including
/// when the submitting future is cancelled.
struct SubmittingGuard<'a> {
    state: &'a mut FormState,
}

impl<'a> SubmittingGuard<'a> {
    fn enter(state: &'a mut FormState) -> Self {
        *state = FormState::Submitting;
        Self { state }
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        *self.state = FormState::Idle;
    }
}
