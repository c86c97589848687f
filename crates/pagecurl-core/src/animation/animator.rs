//! Clocked spring driving a normalized progress value from 0 towards 1.
//!
//! One animator belongs to one page. Starting while running is a no-op, so a
//! page can never have two overlapping settle runs.

use std::time::Duration;

use tracing::trace;

use super::spring::{self, SpringConfig, SpringState};

/// Whether the animation clock is advancing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ClockState {
    #[default]
    Stopped,
    Running,
}

/// Result of advancing the animator by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTick {
    /// Current progress, 0 at release and 1 once settled
    pub progress: f64,
    /// The run reached its target on this tick
    pub finished: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SpringAnimator {
    config: SpringConfig,
    state: SpringState,
    clock: ClockState,
}

impl SpringAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.clock == ClockState::Running
    }

    pub fn state(&self) -> &SpringState {
        &self.state
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.state.position
    }

    /// Start the clock; returns false when a run is already in flight
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.clock = ClockState::Running;
        true
    }

    /// Stop and return to progress 0 with no residual motion
    pub fn reset(&mut self) {
        self.clock = ClockState::Stopped;
        self.state = SpringState::default();
    }

    /// Advance one frame.
    ///
    /// On the finishing tick the clock stops and `finished`, `time` and
    /// `velocity` are cleared so the next run starts clean; the reported
    /// progress stays at the target.
    pub fn tick(&mut self, dt: Duration) -> SpringTick {
        if !self.is_running() {
            return SpringTick {
                progress: self.state.position,
                finished: false,
            };
        }

        spring::step(&mut self.state, &self.config, dt);

        let finished = self.state.finished;
        if finished {
            trace!(elapsed = ?self.state.time, "spring settled");
            self.clock = ClockState::Stopped;
            self.state.finished = false;
            self.state.time = Duration::ZERO;
            self.state.velocity = 0.0;
        }

        SpringTick {
            progress: self.state.position,
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_runs_fixed_preset() {
        let animator = SpringAnimator::new();
        assert_eq!(animator.config, SpringConfig::critically_damped());
        assert_eq!(animator.clock, ClockState::Stopped);
    }

    #[test]
    fn test_stopped_clock_does_not_advance() {
        let mut animator = SpringAnimator::new();
        let tick = animator.tick(FRAME);
        assert_eq!(tick.progress, 0.0);
        assert!(!tick.finished);
    }

    #[test]
    fn test_start_is_not_reentrant() {
        let mut animator = SpringAnimator::new();
        assert!(animator.start());
        assert!(!animator.start());
        assert!(animator.is_running());
    }

    #[test]
    fn test_run_finishes_and_resets_clock() {
        let mut animator = SpringAnimator::new();
        animator.start();

        let mut finished_at = None;
        for tick_no in 1..=300 {
            let tick = animator.tick(FRAME);
            if tick.finished {
                finished_at = Some(tick_no);
                assert!((tick.progress - 1.0).abs() < 1e-3);
                break;
            }
        }

        assert!(finished_at.is_some());
        assert!(!animator.is_running());
        assert!(!animator.state().finished);
        assert_eq!(animator.state().time, Duration::ZERO);
        assert_eq!(animator.state().velocity, 0.0);

        // Further ticks are inert and do not re-report completion
        assert!(!animator.tick(FRAME).finished);
    }

    #[test]
    fn test_reset_clears_motion() {
        let mut animator = SpringAnimator::new();
        animator.start();
        animator.tick(FRAME);
        animator.tick(FRAME);
        assert!(animator.progress() > 0.0);

        animator.reset();
        assert!(!animator.is_running());
        assert_eq!(*animator.state(), SpringState::default());
    }
}
