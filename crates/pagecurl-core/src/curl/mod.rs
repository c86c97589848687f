//! Per-page curl interaction
//!
//! Composes the gesture tracker, snap decision, spring animator and geometry
//! into one explicit state machine evaluated once per frame.

pub mod controller;
pub mod state;

pub use controller::{CurlController, CurlFrame, CurlPhase, CurlPhaseKind};
pub use state::CurlState;
