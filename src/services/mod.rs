// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod dashboard;
pub mod listeners;
pub mod run_form;
pub mod run_list;

pub use auth::{AuthEvent, AuthService};
pub use dashboard::{DashboardController, DashboardPage, DashboardUpdate, MountOutcome, RunAdded};
pub use listeners::{Listener, ListenerRegistry, Subscription};
pub use run_form::{FormError, RunForm, RunFormFields, SubmitOutcome};
pub use run_list::{format_runs, RunListItem, RunListView};
