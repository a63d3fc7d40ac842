// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Run Tracker: a personal running log
//!
//! This crate provides the backend for recording runs against a hosted
//! table store and serving the dashboard with aggregate statistics.

pub mod config;
pub mod db;
pub mod error;
pub mod locale;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use dashmap::DashMap;
use db::RunStore;
use services::{AuthService, DashboardController, ListenerRegistry, RunAdded};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn RunStore>,
    pub auth: AuthService,
    /// Run-added signals; listeners filter by user
    pub run_events: ListenerRegistry<RunAdded>,
    /// Users with a run submission in flight
    pub submissions: DashMap<String, ()>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RunStore>) -> Self {
        let auth = AuthService::new(&config.jwt_signing_key);
        Self {
            config,
            store,
            auth,
            run_events: ListenerRegistry::new(),
            submissions: DashMap::new(),
        }
    }

    /// A fresh, unmounted dashboard controller for one client.
    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(
            self.store.clone(),
            self.auth.clone(),
            self.run_events.clone(),
            self.config.locale,
        )
    }
}
