//! Gesture state tracking
//!
//! The tracker is the only consumer of raw pointer reports for a page. It keeps
//! the previous and current phase so that transitions, not levels, drive the
//! curl: a release fires once when the phase leaves an active state, no matter
//! how many `Ended` reports follow.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::Point;

/// Phase reported by the gesture source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    #[default]
    Idle,
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GesturePhase {
    /// A pointer is down and driving the page
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, GesturePhase::Began | GesturePhase::Changed)
    }

    /// The pointer has been lifted or the gesture was aborted
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// Raw report from the surface's pointer/gesture source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: GesturePhase,
    pub position: Point,
    /// Signed horizontal velocity in surface units per second
    #[serde(default)]
    pub velocity_x: f64,
}

impl PointerEvent {
    pub fn new(phase: GesturePhase, position: Point, velocity_x: f64) -> Self {
        Self {
            phase,
            position,
            velocity_x,
        }
    }
}

/// Typed sample carrying the phase transition it was produced by
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureSample {
    pub phase: GesturePhase,
    pub old_phase: GesturePhase,
    pub position: Point,
    pub velocity_x: f64,
}

/// Edge-detected transition handed to the curl controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureTransition {
    Began(GestureSample),
    Changed(GestureSample),
    /// Pointer lifted or gesture cancelled while active; fires once per gesture
    Released(GestureSample),
    /// Source dropped back to idle mid-gesture; the gesture is discarded
    Aborted(GestureSample),
}

impl GestureTransition {
    pub fn sample(&self) -> &GestureSample {
        match self {
            GestureTransition::Began(s)
            | GestureTransition::Changed(s)
            | GestureTransition::Released(s)
            | GestureTransition::Aborted(s) => s,
        }
    }
}

/// Folds raw pointer reports for one page into gesture transitions
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
    reference: Option<Point>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase as last reported
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Where the current gesture started
    pub fn reference(&self) -> Option<Point> {
        self.reference
    }

    /// Consume one raw report.
    ///
    /// Velocity is passed through exactly as reported; a release carries the
    /// last reported velocity, never an average.
    pub fn ingest(&mut self, event: PointerEvent) -> Option<GestureTransition> {
        let old_phase = self.phase;
        let sample = GestureSample {
            phase: event.phase,
            old_phase,
            position: event.position,
            velocity_x: event.velocity_x,
        };

        let transition = match (old_phase.is_active(), event.phase) {
            (false, GesturePhase::Began) => {
                self.reference = Some(event.position);
                Some(GestureTransition::Began(sample))
            }
            // A repeated Began while down is just more movement
            (true, GesturePhase::Began) | (true, GesturePhase::Changed) => {
                Some(GestureTransition::Changed(sample))
            }
            (true, GesturePhase::Ended) | (true, GesturePhase::Cancelled) => {
                Some(GestureTransition::Released(sample))
            }
            (false, phase) => {
                if phase != GesturePhase::Idle && !(phase.is_terminal() && old_phase.is_terminal()) {
                    debug!(?old_phase, ?phase, "ignoring gesture report without a preceding begin");
                }
                None
            }
            (true, GesturePhase::Idle) => {
                debug!(?old_phase, "gesture source went idle while active, dropping gesture");
                Some(GestureTransition::Aborted(sample))
            }
        };

        // Phase stays inactive for reports that did not start a gesture
        self.phase = match (&transition, event.phase) {
            (Some(GestureTransition::Changed(_)), _) => GesturePhase::Changed,
            (None, GesturePhase::Changed) => old_phase,
            (_, phase) => phase,
        };

        if transition.is_some() {
            trace!(?old_phase, phase = ?self.phase, x = event.position.x, y = event.position.y, "gesture transition");
        }
        if self.phase.is_terminal() || self.phase == GesturePhase::Idle {
            self.reference = None;
        }

        transition
    }

    /// Forget the current gesture
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.reference = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(phase: GesturePhase, x: f64, velocity_x: f64) -> PointerEvent {
        PointerEvent::new(phase, Point::new(x, 10.0), velocity_x)
    }

    #[test]
    fn test_full_gesture_transitions() {
        let mut tracker = GestureTracker::new();

        let began = tracker.ingest(event(GesturePhase::Began, 300.0, 0.0));
        assert!(matches!(began, Some(GestureTransition::Began(_))));
        assert_eq!(tracker.reference(), Some(Point::new(300.0, 10.0)));

        let changed = tracker.ingest(event(GesturePhase::Changed, 250.0, -400.0));
        match changed {
            Some(GestureTransition::Changed(sample)) => {
                assert_eq!(sample.old_phase, GesturePhase::Began);
                assert_eq!(sample.velocity_x, -400.0);
            }
            other => panic!("expected change, got {:?}", other),
        }

        let released = tracker.ingest(event(GesturePhase::Ended, 240.0, -500.0));
        match released {
            Some(GestureTransition::Released(sample)) => {
                assert_eq!(sample.old_phase, GesturePhase::Changed);
                assert_eq!(sample.phase, GesturePhase::Ended);
                assert_eq!(sample.velocity_x, -500.0);
            }
            other => panic!("expected release, got {:?}", other),
        }
        assert_eq!(tracker.phase(), GesturePhase::Ended);
        assert_eq!(tracker.reference(), None);
    }

    #[test]
    fn test_release_fires_once() {
        let mut tracker = GestureTracker::new();
        tracker.ingest(event(GesturePhase::Began, 0.0, 0.0));
        assert!(tracker.ingest(event(GesturePhase::Ended, 0.0, 10.0)).is_some());
        assert!(tracker.ingest(event(GesturePhase::Ended, 0.0, 10.0)).is_none());
        assert!(tracker.ingest(event(GesturePhase::Cancelled, 0.0, 10.0)).is_none());
    }

    #[test]
    fn test_flick_without_changes_releases() {
        let mut tracker = GestureTracker::new();
        tracker.ingest(event(GesturePhase::Began, 100.0, 0.0));
        let released = tracker.ingest(event(GesturePhase::Ended, 90.0, -1200.0));
        match released {
            Some(GestureTransition::Released(sample)) => {
                assert_eq!(sample.old_phase, GesturePhase::Began);
                assert_eq!(sample.velocity_x, -1200.0);
            }
            other => panic!("expected release, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_releases() {
        let mut tracker = GestureTracker::new();
        tracker.ingest(event(GesturePhase::Began, 100.0, 0.0));
        let released = tracker.ingest(event(GesturePhase::Cancelled, 100.0, 30.0));
        assert!(matches!(released, Some(GestureTransition::Released(_))));
    }

    #[test]
    fn test_idle_mid_gesture_aborts() {
        let mut tracker = GestureTracker::new();
        tracker.ingest(event(GesturePhase::Began, 100.0, 0.0));
        tracker.ingest(event(GesturePhase::Changed, 80.0, -400.0));

        let aborted = tracker.ingest(event(GesturePhase::Idle, 80.0, 0.0));
        assert!(matches!(aborted, Some(GestureTransition::Aborted(_))));
        assert_eq!(tracker.phase(), GesturePhase::Idle);
        assert_eq!(tracker.reference(), None);

        // The trailing Ended belongs to the discarded gesture
        assert!(tracker.ingest(event(GesturePhase::Ended, 80.0, -400.0)).is_none());
        // Idle while already idle stays silent
        assert!(tracker.ingest(event(GesturePhase::Idle, 80.0, 0.0)).is_none());
    }

    #[test]
    fn test_end_without_begin_is_ignored() {
        let mut tracker = GestureTracker::new();
        assert!(tracker.ingest(event(GesturePhase::Ended, 0.0, -300.0)).is_none());
        assert!(tracker.ingest(event(GesturePhase::Changed, 5.0, -300.0)).is_none());
        assert!(!tracker.phase().is_active());

        // A fresh begin still works afterwards
        assert!(matches!(
            tracker.ingest(event(GesturePhase::Began, 5.0, 0.0)),
            Some(GestureTransition::Began(_))
        ));
    }

    #[test]
    fn test_velocity_passes_through_unsmoothed() {
        let mut tracker = GestureTracker::new();
        tracker.ingest(event(GesturePhase::Began, 0.0, 0.0));
        tracker.ingest(event(GesturePhase::Changed, 10.0, 2000.0));
        tracker.ingest(event(GesturePhase::Changed, 12.0, 3.0));
        let released = tracker.ingest(event(GesturePhase::Ended, 12.0, -1.0)).unwrap();
        assert_eq!(released.sample().velocity_x, -1.0);
    }
}
