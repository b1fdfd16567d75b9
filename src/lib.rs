// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Daybreak: a deterministic rules engine for a small outpost-building game.
//!
//! The player holds a few bounded resources, places buildings on a grid and
//! fights off enemies that arrive as days pass. This crate holds every rule
//! and no presentation:
//! - Resource ledger with clamped counters and morning renewals
//! - Data-driven catalogs of buildings, enemies and dashboard counters
//! - Day-indexed encounter tables with weighted random spawn groups
//! - Gated actions, enemy attacks and typed notifications
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI: run / simulate / replay      │
//! ├─────────────────────────────────────┤
//! │   Simulator, recordings, replay     │
//! ├─────────────────────────────────────┤
//! │   GameSession (commands + events)   │
//! ├─────────────────────────────────────┤
//! │   Ledger, catalogs, registries      │
//! └─────────────────────────────────────┘
//! ```
//!
//! A session is fully determined by its seed, its [`SessionConfig`] and the
//! commands fed to it.

pub mod config;
pub mod error;
pub mod game;
pub mod replay;
pub mod sim;

pub use config::SessionConfig;
pub use error::{CatalogError, ConfigError};

// Re-export key game types at crate root for convenience
pub use game::{
    ActionOutcome, ActorKind, Catalog, Command, CommandOutcome, GameEvent, GameSession, Ledger,
    ResourceKey, Selection,
};
