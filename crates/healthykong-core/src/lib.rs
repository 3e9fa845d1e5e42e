//! # HealthyKong Core Library
//!
//! This library provides the core business logic for HealthyKong, a
//! health-habit tracker that converts daily self-reported logs (blood
//! glucose, blood pressure) into simulated charitable donations, badges
//! and donor levels, with a community feed and an AI weekly summary.
//!
//! ## Architecture
//!
//! - **Rule Engine**: donation transaction policy, streak/gap calculator,
//!   badge evaluation and donor-level lookup, behind the [`HabitEngine`]
//!   facade
//! - **Storage**: SQLite-backed record store and TOML-based configuration
//! - **Community**: post/comment/like CRUD with donor-level snapshots
//! - **Insights**: opaque client for an LLM weekly-summary endpoint
//!
//! ## Key Components
//!
//! - [`HabitEngine`]: submit logs, derive metrics, evaluate badges
//! - [`SqliteStore`]: summary, log and community persistence
//! - [`AppConfig`]: day-boundary, donation and insights configuration

pub mod badges;
pub mod clock;
pub mod community;
pub mod donation;
pub mod engine;
pub mod error;
pub mod event;
pub mod insights;
pub mod levels;
pub mod report;
pub mod store;
pub mod streak;

pub use badges::{badge_by_id, Badge, BadgeCategory, BadgeMetrics, BADGE_CATALOG};
pub use clock::DayBoundary;
pub use community::{Comment, Post, PostView};
pub use donation::{DonationDecision, DonationPolicy, DONATION_UNIT};
pub use engine::{HabitEngine, RewardOutcome};
pub use error::{ConfigError, CoreError, InsightsError, StoreError, ValidationError};
pub use event::{DayPhase, HealthLogEvent, Reading, ReadingKind};
pub use insights::InsightsClient;
pub use levels::{lookup_donor_level, DonorLevel, DONOR_LEVELS};
pub use report::WeeklyReport;
pub use store::{AppConfig, RecordStore, SqliteStore, SubmitOutcome, UserSummary};
pub use streak::StreakReport;
