//! Effect interval reconstruction and activation queries
//!
//! This module provides:
//! - **Reconstruction**: Turns sparse apply/remove log entries into closed
//!   "effect active" windows per (target, ability)
//! - **Lookup**: Point-in-time and range queries over those windows
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 CombatEvent stream (any order)                   │
//! │   apply 0ms ─ apply 1000ms ─ remove 2000ms ─ apply 7000ms        │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                    reconstruct_intervals()
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  IntervalSet (per target+ability)                │
//! │   [0, 2000]  [7000, fight_end]          applications = 2         │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!              ActivationLookup (is_active_at / was_ever_active_on)
//! ```

mod lookup;
mod reconstruct;


pub use lookup::{ActivationLookup, TimeWindow};
pub use reconstruct::{Interval, IntervalGroup, IntervalKey, IntervalSet, reconstruct_intervals};
