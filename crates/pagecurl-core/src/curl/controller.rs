//! Curl interaction state machine for one page.
//!
//! Idle -> Dragging -> Releasing -> Settling -> Committing -> Idle
//!
//! Pointer reports are folded in as soon as they arrive; `tick` advances the
//! settle animation and emits the clip path for the frame. The only effect
//! leaving the controller is the single `jump_to_index` issued while
//! Committing.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::animation::{lerp_point, SpringAnimator};
use crate::carousel::PageNavigator;
use crate::geometry::{
    curl_path, rest_left_corner, rest_right_corner, turned_left_corner, turned_right_corner,
    ClipPath, Point, Size,
};
use crate::gesture::{GestureSample, GestureTracker, GestureTransition, PointerEvent};
use crate::snap::{self, CurlDirection, SnapDecision, SnapOutcome};

use super::state::CurlState;

/// Where the page is in its interaction, with the data each stage needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurlPhase {
    /// Page at rest
    Idle,
    /// Anchor follows the pointer; direction follows the latest velocity sign
    Dragging { direction: CurlDirection },
    /// Released; the settle run starts on the next tick from `from`
    Releasing { decision: SnapDecision, from: Point },
    /// Spring carries the anchor from `from` to `to`
    Settling {
        decision: SnapDecision,
        from: Point,
        to: Point,
        corner: Point,
    },
    /// Settled; the page jump is issued on the next tick
    Committing { decision: SnapDecision, corner: Point },
}

impl CurlPhase {
    pub fn kind(&self) -> CurlPhaseKind {
        match self {
            CurlPhase::Idle => CurlPhaseKind::Idle,
            CurlPhase::Dragging { .. } => CurlPhaseKind::Dragging,
            CurlPhase::Releasing { .. } => CurlPhaseKind::Releasing,
            CurlPhase::Settling { .. } => CurlPhaseKind::Settling,
            CurlPhase::Committing { .. } => CurlPhaseKind::Committing,
        }
    }

    fn decision(&self) -> Option<&SnapDecision> {
        match self {
            CurlPhase::Releasing { decision, .. }
            | CurlPhase::Settling { decision, .. }
            | CurlPhase::Committing { decision, .. } => Some(decision),
            CurlPhase::Idle | CurlPhase::Dragging { .. } => None,
        }
    }
}

/// Fieldless mirror of [`CurlPhase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurlPhaseKind {
    Idle,
    Dragging,
    Releasing,
    Settling,
    Committing,
}

impl std::fmt::Display for CurlPhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CurlPhaseKind::Idle => "IDLE",
            CurlPhaseKind::Dragging => "DRAGGING",
            CurlPhaseKind::Releasing => "RELEASING",
            CurlPhaseKind::Settling => "SETTLING",
            CurlPhaseKind::Committing => "COMMITTING",
        };
        f.write_str(label)
    }
}

/// Output of one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurlFrame {
    pub page_index: usize,
    pub phase: CurlPhaseKind,
    pub path: ClipPath,
    /// Index passed to `jump_to_index` on this frame
    pub committed: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CurlController {
    index: usize,
    total: usize,
    size: Size,
    state: CurlState,
    phase: CurlPhase,
    tracker: GestureTracker,
    spring: SpringAnimator,
}

impl CurlController {
    pub fn new(index: usize, total: usize, size: Size) -> Self {
        Self {
            index,
            total,
            size,
            state: CurlState::at_rest(size),
            phase: CurlPhase::Idle,
            tracker: GestureTracker::new(),
            spring: SpringAnimator::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn phase(&self) -> &CurlPhase {
        &self.phase
    }

    pub fn state(&self) -> &CurlState {
        &self.state
    }

    pub fn spring(&self) -> &SpringAnimator {
        &self.spring
    }

    /// Anything other than Idle needs frames
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, CurlPhase::Idle)
    }

    /// Direction the page is curling in, if it is curling at all
    pub fn direction(&self) -> Option<CurlDirection> {
        match &self.phase {
            CurlPhase::Idle => None,
            CurlPhase::Dragging { direction } => Some(*direction),
            phase => phase.decision().map(|d| d.direction),
        }
    }

    /// Fold one raw pointer report into the state machine
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let Some(transition) = self.tracker.ingest(event) else {
            return;
        };

        match transition {
            GestureTransition::Began(sample) => self.begin(&sample),
            GestureTransition::Changed(sample) => self.drag(&sample),
            GestureTransition::Released(sample) => self.release(&sample),
            // No release velocity to snap with, so nothing commits
            GestureTransition::Aborted(_) => self.cancel(),
        }
    }

    fn begin(&mut self, sample: &GestureSample) {
        if let Some(decision) = self.phase.decision() {
            debug!(
                page = self.index,
                snap_target = decision.target,
                phase = %self.phase.kind(),
                "new gesture cancels in-flight settle"
            );
            self.spring.reset();
            self.state.reset(self.size);
        }

        self.state.active = true;
        self.state.snap_target = None;
        self.phase = CurlPhase::Dragging {
            direction: CurlDirection::from_velocity(sample.velocity_x),
        };
        debug!(page = self.index, x = sample.position.x, y = sample.position.y, "curl drag started");
    }

    fn drag(&mut self, sample: &GestureSample) {
        let CurlPhase::Dragging { direction } = &mut self.phase else {
            return;
        };
        *direction = CurlDirection::from_velocity(sample.velocity_x);
        self.state.set_corner(*direction, sample.position);
    }

    fn release(&mut self, sample: &GestureSample) {
        if !matches!(self.phase, CurlPhase::Dragging { .. }) {
            debug!(page = self.index, phase = %self.phase.kind(), "release outside of a drag ignored");
            return;
        }

        let decision = snap::decide(self.index, sample.velocity_x, self.total);
        let from = self.size.clamp(self.state.corner(decision.direction));

        self.state.reset_corners(self.size);
        self.state.snap_target = Some(decision.target);
        self.phase = CurlPhase::Releasing { decision, from };

        debug!(
            page = self.index,
            velocity_x = sample.velocity_x,
            snap_target = decision.target,
            outcome = ?decision.outcome(),
            "curl released"
        );
    }

    /// Advance one frame and emit the page's clip path.
    ///
    /// `navigator` is only called while Committing, once per interaction.
    pub fn tick(&mut self, dt: Duration, navigator: &mut dyn PageNavigator) -> CurlFrame {
        let mut committed = None;

        match self.phase {
            CurlPhase::Idle | CurlPhase::Dragging { .. } => {}
            CurlPhase::Releasing { decision, from } => {
                self.spring.reset();
                self.spring.start();
                self.phase = CurlPhase::Settling {
                    decision,
                    from,
                    to: self.settle_target(&decision),
                    corner: from,
                };
            }
            CurlPhase::Settling { decision, from, to, .. } => {
                let tick = self.spring.tick(dt);
                let corner = lerp_point(from, to, tick.progress);
                self.phase = if tick.finished {
                    CurlPhase::Committing { decision, corner: to }
                } else {
                    CurlPhase::Settling { decision, from, to, corner }
                };
            }
            CurlPhase::Committing { decision, .. } => {
                self.commit(&decision, navigator);
                committed = Some(decision.target);
            }
        }

        CurlFrame {
            page_index: self.index,
            phase: self.phase.kind(),
            path: self.clip_path(),
            committed,
        }
    }

    fn settle_target(&self, decision: &SnapDecision) -> Point {
        match (decision.outcome(), decision.direction) {
            (SnapOutcome::Commit, CurlDirection::Forward) => turned_right_corner(self.size),
            (SnapOutcome::Commit, CurlDirection::Backward) => turned_left_corner(self.size),
            (SnapOutcome::Revert, CurlDirection::Forward) => rest_right_corner(self.size),
            (SnapOutcome::Revert, CurlDirection::Backward) => rest_left_corner(),
        }
    }

    fn commit(&mut self, decision: &SnapDecision, navigator: &mut dyn PageNavigator) {
        match navigator.jump_to_index(decision.target) {
            Ok(()) => info!(from = decision.origin, to = decision.target, "page turn committed"),
            // The curl returns to rest either way
            Err(e) => warn!(snap_target = decision.target, "page jump failed: {}", e),
        }

        self.spring.reset();
        self.state.reset(self.size);
        self.phase = CurlPhase::Idle;
    }

    /// Clip path for the current frame
    pub fn clip_path(&self) -> ClipPath {
        match &self.phase {
            CurlPhase::Idle => curl_path(self.size, None, None),
            CurlPhase::Dragging { direction } => {
                self.anchored_path(*direction, self.state.corner(*direction))
            }
            CurlPhase::Releasing { decision, from } => self.anchored_path(decision.direction, *from),
            CurlPhase::Settling { decision, corner, .. }
            | CurlPhase::Committing { decision, corner } => {
                self.anchored_path(decision.direction, *corner)
            }
        }
    }

    /// Only the anchor for the active direction bends; the other edge stays straight
    fn anchored_path(&self, direction: CurlDirection, corner: Point) -> ClipPath {
        match direction {
            CurlDirection::Forward => curl_path(self.size, Some(corner), None),
            CurlDirection::Backward => curl_path(self.size, None, Some(corner)),
        }
    }

    /// Drop any in-flight interaction without committing
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!(page = self.index, phase = %self.phase.kind(), "curl cancelled");
        }
        self.spring.reset();
        self.tracker.reset();
        self.state.reset(self.size);
        self.phase = CurlPhase::Idle;
    }

    /// New surface size; any in-flight interaction is dropped
    pub fn resize(&mut self, size: Size) {
        if size != self.size {
            self.cancel();
            self.size = size;
            self.state.reset(size);
        }
    }
}
