// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard controller.
//!
//! Lifecycle:
//! 1. `mount` verifies the session, subscribes to auth-state changes and
//!    run-added signals for that user, and loads stats and runs
//! 2. `next_update` waits for a signal and refreshes (or redirects on sign-out)
//! 3. `unmount` (or dropping the controller) releases the subscriptions

use crate::db::{RunStore, StoreError, StoreResult};
use crate::locale::Locale;
use crate::models::{stats_cards, Notice, Run, RunStats, RunType, Session, StatsCard};
use crate::services::auth::{AuthEvent, AuthService};
use crate::services::listeners::{ListenerRegistry, Subscription};
use crate::services::run_list::{format_runs, RunListView};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const AUTH_ROUTE: &str = "/auth";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const LOGOUT_ROUTE: &str = "/auth/logout";
pub const RUNS_ROUTE: &str = "/api/runs";

const APP_TITLE: &str = "Run Tracker";

/// Signal emitted after a run was stored for `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAdded {
    pub user_id: String,
}

#[derive(Debug)]
enum Signal {
    Auth(AuthEvent),
    RunAdded,
}

/// Result of mounting the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Ready,
    Redirect(&'static str),
}

/// What changed after a signal was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardUpdate {
    Refreshed,
    Redirect(&'static str),
}

// ─── View Model ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PageAction {
    pub label: String,
    pub method: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PageHeader {
    pub title: String,
    pub greeting: String,
    pub subtitle: String,
    pub sign_out: PageAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunTypeOption {
    pub value: RunType,
    pub label: String,
}

/// Trigger for the run entry dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddRunTrigger {
    pub action: PageAction,
    pub run_types: Vec<RunTypeOption>,
    pub default_run_type: RunType,
}

/// Run history: not yet fetched, or fetched (possibly empty).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "status", content = "list", rename_all = "snake_case")]
pub enum RunListState {
    Loading,
    Loaded(RunListView),
}

/// The composed dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardPage {
    pub header: PageHeader,
    pub stats: RunStats,
    pub stats_cards: Vec<StatsCard>,
    pub add_run: AddRunTrigger,
    pub history_title: String,
    pub runs: RunListState,
    pub notice: Option<Notice>,
}

// ─── Controller ──────────────────────────────────────────────

pub struct DashboardController {
    store: Arc<dyn RunStore>,
    auth: AuthService,
    run_events: ListenerRegistry<RunAdded>,
    locale: Locale,
    session: Option<Session>,
    stats: RunStats,
    runs: Option<Vec<Run>>,
    notice: Option<Notice>,
    subscriptions: Vec<Subscription>,
    signals_tx: mpsc::UnboundedSender<Signal>,
    signals_rx: mpsc::UnboundedReceiver<Signal>,
}

impl DashboardController {
    pub fn new(
        store: Arc<dyn RunStore>,
        auth: AuthService,
        run_events: ListenerRegistry<RunAdded>,
        locale: Locale,
    ) -> Self {
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        Self {
            store,
            auth,
            run_events,
            locale,
            session: None,
            stats: RunStats::default(),
            runs: None,
            notice: None,
            subscriptions: Vec::new(),
            signals_tx,
            signals_rx,
        }
    }

    /// Acquire the session for `token` and load the dashboard.
    ///
    /// Without a valid session the caller is sent to the auth entry point.
    /// A failed load still mounts; the error is reported in the page notice.
    pub async fn mount(&mut self, token: Option<&str>) -> MountOutcome {
        if self.is_mounted() {
            self.unmount();
        }

        let Some(session) = self.auth.current_session(token) else {
            tracing::debug!("No session, redirecting to auth");
            return MountOutcome::Redirect(AUTH_ROUTE);
        };

        let user_id = session.user_id.clone();
        let tx = self.signals_tx.clone();
        self.subscriptions
            .push(self.auth.subscribe(Arc::new(move |event: &AuthEvent| {
                if event.user_id() == user_id {
                    let _ = tx.send(Signal::Auth(event.clone()));
                }
            })));

        let user_id = session.user_id.clone();
        let tx = self.signals_tx.clone();
        self.subscriptions
            .push(self.run_events.subscribe(Arc::new(move |event: &RunAdded| {
                if event.user_id == user_id {
                    let _ = tx.send(Signal::RunAdded);
                }
            })));

        tracing::info!(user_id = %session.user_id, "Dashboard mounted");
        self.session = Some(session);

        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Initial dashboard load failed");
        }
        MountOutcome::Ready
    }

    /// Release subscriptions and forget the session.
    pub fn unmount(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = %session.user_id, "Dashboard unmounted");
        }
        self.subscriptions.clear();
        self.stats = RunStats::default();
        self.runs = None;
        self.notice = None;
        while self.signals_rx.try_recv().is_ok() {}
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Re-fetch the user's rows and recompute stats from scratch.
    ///
    /// On failure the previous values are kept and the error is shown.
    pub async fn refresh(&mut self) -> StoreResult<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        self.notice = None;
        let (stats_rows, runs) = tokio::join!(
            self.store.stats_rows(&session),
            self.store.list_runs(&session)
        );

        let mut first_error: Option<StoreError> = None;

        match stats_rows {
            Ok(rows) => self.stats = RunStats::from_rows(&rows),
            Err(e) => first_error = Some(e),
        }
        match runs {
            Ok(runs) => self.runs = Some(runs),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => {
                tracing::debug!(
                    user_id = %session.user_id,
                    total_runs = self.stats.total_runs,
                    "Dashboard refreshed"
                );
                Ok(())
            }
            Some(e) => {
                tracing::error!(
                    user_id = %session.user_id,
                    error = %e,
                    "Dashboard refresh failed"
                );
                self.notice = Some(Notice::error(self.locale.error_title(), e.message.clone()));
                Err(e)
            }
        }
    }

    /// A run was stored for this user: recompute from the fresh rows.
    pub async fn on_run_added(&mut self) -> StoreResult<()> {
        tracing::debug!("Run added, refreshing dashboard");
        self.refresh().await
    }

    /// Wait for the next auth or run-added signal and apply it.
    ///
    /// Returns `None` when the controller is not mounted.
    pub async fn next_update(&mut self) -> Option<DashboardUpdate> {
        if !self.is_mounted() {
            return None;
        }

        match self.signals_rx.recv().await? {
            Signal::RunAdded => {
                let _ = self.on_run_added().await;
                Some(DashboardUpdate::Refreshed)
            }
            Signal::Auth(AuthEvent::SignedIn(session))
            | Signal::Auth(AuthEvent::TokenRefreshed(session)) => {
                tracing::debug!(
                    user_id = %session.user_id,
                    "Session renewed, refreshing dashboard"
                );
                self.session = Some(session);
                let _ = self.refresh().await;
                Some(DashboardUpdate::Refreshed)
            }
            Signal::Auth(AuthEvent::SignedOut { .. }) => {
                self.unmount();
                Some(DashboardUpdate::Redirect(AUTH_ROUTE))
            }
        }
    }

    /// Terminate the session and leave the dashboard.
    pub fn sign_out(&mut self) -> &'static str {
        if let Some(session) = self.session.clone() {
            self.auth.sign_out(&session);
        }
        self.unmount();
        AUTH_ROUTE
    }

    /// Compose the page. `None` when not mounted.
    pub fn page(&self) -> Option<DashboardPage> {
        let session = self.session.as_ref()?;
        let locale = self.locale;

        let runs = match &self.runs {
            None => RunListState::Loading,
            Some(runs) => RunListState::Loaded(format_runs(runs, locale)),
        };

        Some(DashboardPage {
            header: PageHeader {
                title: APP_TITLE.to_string(),
                greeting: locale.greeting(session.display_name()),
                subtitle: locale.stats_subtitle().to_string(),
                sign_out: PageAction {
                    label: locale.sign_out().to_string(),
                    method: "POST".to_string(),
                    href: LOGOUT_ROUTE.to_string(),
                },
            },
            stats: self.stats,
            stats_cards: stats_cards(&self.stats, locale),
            add_run: AddRunTrigger {
                action: PageAction {
                    label: locale.add_run().to_string(),
                    method: "POST".to_string(),
                    href: RUNS_ROUTE.to_string(),
                },
                run_types: RunType::ALL
                    .into_iter()
                    .map(|value| RunTypeOption {
                        value,
                        label: value.label(locale).to_string(),
                    })
                    .collect(),
                default_run_type: RunType::default(),
            },
            history_title: locale.history_title().to_string(),
            runs,
            notice: self.notice.clone(),
        })
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        if self.is_mounted() {
            self.unmount();
        }
    }
}
