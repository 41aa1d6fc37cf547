//! # Core Application Logic
//!
//! This module contains the reader's business logic.
//! It knows nothing about any specific UI technology or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (tiers, sel.)  │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Effect (fetches)     │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │  Gateway   │
//!         │  Adapter   │ ── Effects ────► │ (reqwest)  │
//!         │ (ratatui)  │ ◄── Actions ──── │            │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, tier states and the selection
//! - [`action`]: The `Action`/`Effect` enums and the `update()` reducer
//! - [`types`]: Books, pages and response normalization
//! - [`library`]: Alphabetic buckets and title search
//! - [`collate`]: Title ordering
//! - [`image`]: Page image path and load status
//! - [`config`]: Settings file and overrides

pub mod action;
pub mod collate;
pub mod config;
pub mod image;
pub mod library;
pub mod state;
pub mod types;
