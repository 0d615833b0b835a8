//! Hiroba broadcast hub server library.
//!
//! Accepts many concurrent participant streams and fans every message out to
//! all active participants, with join/leave announcements and per-participant
//! backpressure.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
