// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod notice;
pub mod run;
pub mod session;
pub mod stats;

pub use notice::{Notice, NoticeVariant};
pub use run::{compute_pace, BadgeStyle, NewRun, Run, RunStatsRow, RunType};
pub use session::Session;
pub use stats::{stats_cards, RunStats, StatsCard};
