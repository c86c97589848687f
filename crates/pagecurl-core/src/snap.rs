//! Release-time page decision
//!
//! The decision uses the sign of the release velocity only. There is no
//! distance or speed threshold: any leftward release on a page with a
//! successor turns forward, anything else turns backward, and a turn that
//! would leave the carousel reverts to the current page.

use serde::Serialize;

/// Which way a curl turns the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurlDirection {
    /// Towards the next page; the trailing (right) anchor follows the pointer
    Forward,
    /// Towards the previous page; the leading (left) anchor follows the pointer
    #[default]
    Backward,
}

impl CurlDirection {
    /// Negative velocity moves towards the next page; zero counts as backward
    #[inline]
    pub fn from_velocity(velocity_x: f64) -> Self {
        if velocity_x < 0.0 {
            CurlDirection::Forward
        } else {
            CurlDirection::Backward
        }
    }
}

/// Whether a release turns the page or falls back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapOutcome {
    Commit,
    Revert,
}

/// Resolved release of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapDecision {
    /// Page the gesture was released on
    pub origin: usize,
    /// Page to jump to once the curl settles
    pub target: usize,
    pub direction: CurlDirection,
}

impl SnapDecision {
    pub fn outcome(&self) -> SnapOutcome {
        if self.target == self.origin {
            SnapOutcome::Revert
        } else {
            SnapOutcome::Commit
        }
    }
}

/// Pick the page to commit to for a release on `index`
pub fn resolve_snap_target(index: usize, velocity_x: f64, total: usize) -> usize {
    let candidate = match CurlDirection::from_velocity(velocity_x) {
        CurlDirection::Forward => index.checked_add(1),
        CurlDirection::Backward => index.checked_sub(1),
    };

    match candidate {
        Some(target) if target < total => target,
        _ => index,
    }
}

/// Resolve the full release decision
pub fn decide(index: usize, velocity_x: f64, total: usize) -> SnapDecision {
    SnapDecision {
        origin: index,
        target: resolve_snap_target(index, velocity_x, total),
        direction: CurlDirection::from_velocity(velocity_x),
    }
}
