// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process `runs` table for local development and tests.
//!
//! Behaves like the hosted store from the caller's point of view: it assigns
//! ids, derives pace, enforces that rows belong to the session's user, and
//! returns rows newest first.

use crate::db::{RunStore, StoreError, StoreResult};
use crate::models::{compute_pace, NewRun, Run, RunStatsRow, Session};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store, keyed by owner.
#[derive(Clone)]
pub struct MemoryStore {
    rows: Option<Arc<DashMap<String, Vec<Run>>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Some(Arc::new(DashMap::new())),
        }
    }

    /// A store whose every operation fails, for exercising error paths.
    pub fn offline() -> Self {
        Self { rows: None }
    }

    fn table(&self) -> StoreResult<&DashMap<String, Vec<Run>>> {
        self.rows.as_deref().ok_or_else(|| {
            StoreError::new("Store not connected (offline mode)").with_code("offline")
        })
    }

    /// Number of rows owned by `user_id`.
    pub fn count_for(&self, user_id: &str) -> usize {
        self.rows
            .as_ref()
            .and_then(|rows| rows.get(user_id).map(|runs| runs.len()))
            .unwrap_or(0)
    }
}

#[async_trait]
impl RunStore for MemoryStore {
    async fn insert_run(&self, session: &Session, run: &NewRun) -> StoreResult<()> {
        let table = self.table()?;

        if run.user_id != session.user_id {
            tracing::warn!(
                user_id = %session.user_id,
                row_owner = %run.user_id,
                "Rejected insert for another user"
            );
            return Err(StoreError::new(
                "new row violates row-level security policy for table \"runs\"",
            )
            .with_code("42501"));
        }

        let row = Run {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: run.user_id.clone(),
            distance: run.distance,
            duration: run.duration,
            pace: compute_pace(run.duration, run.distance),
            run_type: run.run_type.as_str().to_string(),
            notes: run.notes.clone(),
            date: run.date,
        };

        tracing::debug!(user_id = %session.user_id, run_id = %row.id, "Run inserted");
        table.entry(row.user_id.clone()).or_default().push(row);
        Ok(())
    }

    async fn list_runs(&self, session: &Session) -> StoreResult<Vec<Run>> {
        let mut runs = self
            .table()?
            .get(&session.user_id)
            .map(|runs| runs.value().clone())
            .unwrap_or_default();

        // Stable sort keeps insertion order for equal dates.
        runs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(runs)
    }

    async fn stats_rows(&self, session: &Session) -> StoreResult<Vec<RunStatsRow>> {
        Ok(self
            .table()?
            .get(&session.user_id)
            .map(|runs| runs.iter().map(RunStatsRow::from).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunType;
    use chrono::{TimeZone, Utc};

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: None,
            access_token: "token".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        }
    }

    fn new_run(user_id: &str, day: u32) -> NewRun {
        NewRun {
            user_id: user_id.to_string(),
            distance: 5.0,
            duration: 1500,
            run_type: RunType::Tempo,
            notes: None,
            date: Utc.with_ymd_and_hms(2024, 1, day, 7, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_pace() {
        let store = MemoryStore::new();
        let session = session("u1");

        store.insert_run(&session, &new_run("u1", 1)).await.unwrap();

        let runs = store.list_runs(&session).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert!(!runs[0].id.is_empty());
        assert_eq!(runs[0].pace, Some(5.0));
        assert_eq!(runs[0].run_type, "tempo");
    }

    #[tokio::test]
    async fn test_insert_for_other_user_is_rejected() {
        let store = MemoryStore::new();

        let err = store
            .insert_run(&session("u1"), &new_run("u2", 1))
            .await
            .unwrap_err();

        assert_eq!(err.code.as_deref(), Some("42501"));
        assert_eq!(store.count_for("u2"), 0);
    }

    #[tokio::test]
    async fn test_rows_are_scoped_to_user_and_newest_first() {
        let store = MemoryStore::new();
        let alice = session("alice");
        let bob = session("bob");

        store.insert_run(&alice, &new_run("alice", 1)).await.unwrap();
        store.insert_run(&alice, &new_run("alice", 20)).await.unwrap();
        store.insert_run(&bob, &new_run("bob", 5)).await.unwrap();

        let runs = store.list_runs(&alice).await.unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].date > runs[1].date);
        assert_eq!(store.stats_rows(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::offline();
        let err = store.list_runs(&session("u1")).await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("offline"));
    }
}
