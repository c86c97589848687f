//! Terminal mouse input as a page-curl pointer source.
//!
//! Cells map to surface pixels the way the half-block renderer draws them:
//! one cell is one pixel wide and two pixels tall. Horizontal velocity is
//! estimated over a short window of recent samples.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use pagecurl_core::geometry::{Point, Size};
use pagecurl_core::gesture::{GesturePhase, PointerEvent};
use pagecurl_core::snap::CurlDirection;
use ratatui::layout::Rect;
use tracing::trace;

const HISTORY_LIMIT: Duration = Duration::from_millis(100);

/// Speed of a keyboard-triggered page turn, in surface pixels per second
pub const FLICK_VELOCITY: f64 = 800.0;

#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f64,
    timestamp: Duration,
}

#[derive(Debug)]
pub struct PointerAdapter {
    epoch: Instant,
    history: VecDeque<Sample>,
    pressed: bool,
    velocity_x: f64,
}

impl Default for PointerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            history: VecDeque::new(),
            pressed: false,
            velocity_x: 0.0,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Translate a terminal mouse event landing on `area`
    pub fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> Option<PointerEvent> {
        let now = self.epoch.elapsed();
        self.handle_mouse_at(event, area, now)
    }

    /// Same as [`Self::handle_mouse`] with an explicit timestamp
    pub fn handle_mouse_at(
        &mut self,
        event: MouseEvent,
        area: Rect,
        timestamp: Duration,
    ) -> Option<PointerEvent> {
        let position = cell_to_surface(event.column, event.row, area);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !contains(area, event.column, event.row) {
                    return None;
                }
                self.pressed = true;
                self.history.clear();
                self.velocity_x = 0.0;
                self.push(position.x, timestamp);
                Some(PointerEvent::new(GesturePhase::Began, position, 0.0))
            }
            MouseEventKind::Drag(MouseButton::Left) if self.pressed => {
                self.push(position.x, timestamp);
                self.velocity_x = self.velocity();
                Some(PointerEvent::new(GesturePhase::Changed, position, self.velocity_x))
            }
            MouseEventKind::Up(MouseButton::Left) if self.pressed => {
                self.pressed = false;
                self.history.clear();
                trace!(velocity_x = self.velocity_x, "pointer released");
                Some(PointerEvent::new(GesturePhase::Ended, position, self.velocity_x))
            }
            _ => None,
        }
    }

    /// Abort a press, e.g. when the terminal loses the page area
    pub fn cancel(&mut self) -> Option<PointerEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        let x = self.history.back().map(|s| s.x).unwrap_or_default();
        self.history.clear();
        Some(PointerEvent::new(GesturePhase::Cancelled, Point::new(x, 0.0), self.velocity_x))
    }

    fn push(&mut self, x: f64, timestamp: Duration) {
        if let Some(last) = self.history.back() {
            if timestamp < last.timestamp {
                trace!(?timestamp, last = ?last.timestamp, "ignoring out-of-order pointer sample");
                return;
            }
        }
        self.history.push_back(Sample { x, timestamp });
        self.trim_history();
    }

    /// Displacement over elapsed time across the retained window
    fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.0;
        };

        let total_time = (last.timestamp - first.timestamp).as_secs_f64();
        if total_time == 0.0 {
            return self.velocity_x;
        }
        (last.x - first.x) / total_time
    }

    fn trim_history(&mut self) {
        let Some(&Sample { timestamp, .. }) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if timestamp <= first.timestamp + HISTORY_LIMIT {
                break;
            }
            let _ = self.history.pop_front();
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Center of the cell in surface pixels; positions left of or above the area go negative
pub fn cell_to_surface(column: u16, row: u16, area: Rect) -> Point {
    let x = f64::from(column) - f64::from(area.x) + 0.5;
    let y = (f64::from(row) - f64::from(area.y)) * 2.0 + 1.0;
    Point::new(x, y)
}

/// Surface size in pixels backing `area`
pub fn surface_size(area: Rect) -> Option<Size> {
    Size::new(f64::from(area.width), f64::from(area.height) * 2.0).ok()
}

/// Pointer stream for a keyboard page turn: press near the moving corner,
/// sweep towards the middle, release with a flick velocity
pub fn flick_events(size: Size, direction: CurlDirection) -> [PointerEvent; 3] {
    let (w, h) = (size.width, size.height);
    let (start, end, velocity_x) = match direction {
        CurlDirection::Forward => (
            Point::new(w * 0.9, h * 0.9),
            Point::new(w * 0.5, h * 0.75),
            -FLICK_VELOCITY,
        ),
        CurlDirection::Backward => (
            Point::new(w * 0.1, h * 0.1),
            Point::new(w * 0.5, h * 0.25),
            FLICK_VELOCITY,
        ),
    };

    [
        PointerEvent::new(GesturePhase::Began, start, 0.0),
        PointerEvent::new(GesturePhase::Changed, end, velocity_x),
        PointerEvent::new(GesturePhase::Ended, end, velocity_x),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn area() -> Rect {
        Rect::new(2, 1, 40, 20)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_to_surface(2, 1, area()), Point::new(0.5, 1.0));
        assert_eq!(cell_to_surface(5, 4, area()), Point::new(3.5, 7.0));
        assert_eq!(surface_size(area()), Size::new(40.0, 40.0).ok());
        assert_eq!(surface_size(Rect::new(0, 0, 0, 5)), None);
    }

    #[test]
    fn test_drag_produces_gesture() {
        let mut adapter = PointerAdapter::new();
        let left = MouseButton::Left;

        let began = adapter
            .handle_mouse_at(mouse(MouseEventKind::Down(left), 40, 18), area(), ms(0))
            .unwrap();
        assert_eq!(began.phase, GesturePhase::Began);
        assert!(adapter.is_pressed());

        let changed = adapter
            .handle_mouse_at(mouse(MouseEventKind::Drag(left), 30, 18), area(), ms(50))
            .unwrap();
        assert_eq!(changed.phase, GesturePhase::Changed);
        // 10 pixels left in 50ms
        assert!((changed.velocity_x + 200.0).abs() < 1e-9);

        let ended = adapter
            .handle_mouse_at(mouse(MouseEventKind::Up(left), 30, 18), area(), ms(60))
            .unwrap();
        assert_eq!(ended.phase, GesturePhase::Ended);
        assert_eq!(ended.velocity_x, changed.velocity_x);
        assert!(!adapter.is_pressed());
    }

    #[test]
    fn test_velocity_window_forgets_old_samples() {
        let mut adapter = PointerAdapter::new();
        let left = MouseButton::Left;

        adapter.handle_mouse_at(mouse(MouseEventKind::Down(left), 10, 5), area(), ms(0));
        adapter.handle_mouse_at(mouse(MouseEventKind::Drag(left), 30, 5), area(), ms(20));
        // Long pause, then a small move back to the left
        adapter.handle_mouse_at(mouse(MouseEventKind::Drag(left), 30, 5), area(), ms(500));
        let changed = adapter
            .handle_mouse_at(mouse(MouseEventKind::Drag(left), 28, 5), area(), ms(540))
            .unwrap();
        // Only the last two samples remain: -2 px over 40ms
        assert!((changed.velocity_x + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_press_outside_area_is_ignored() {
        let mut adapter = PointerAdapter::new();
        let left = MouseButton::Left;
        assert!(adapter
            .handle_mouse_at(mouse(MouseEventKind::Down(left), 0, 0), area(), ms(0))
            .is_none());
        assert!(adapter
            .handle_mouse_at(mouse(MouseEventKind::Drag(left), 10, 10), area(), ms(10))
            .is_none());
        assert!(adapter
            .handle_mouse_at(mouse(MouseEventKind::Up(left), 10, 10), area(), ms(20))
            .is_none());
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut adapter = PointerAdapter::new();
        assert!(adapter
            .handle_mouse_at(mouse(MouseEventKind::Down(MouseButton::Right), 10, 5), area(), ms(0))
            .is_none());
        assert!(adapter
            .handle_mouse_at(mouse(MouseEventKind::Moved, 10, 5), area(), ms(0))
            .is_none());
    }

    #[test]
    fn test_cancel_only_while_pressed() {
        let mut adapter = PointerAdapter::new();
        assert!(adapter.cancel().is_none());
        adapter.handle_mouse_at(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), area(), ms(0));
        let cancelled = adapter.cancel().unwrap();
        assert_eq!(cancelled.phase, GesturePhase::Cancelled);
        assert!(!adapter.is_pressed());
    }

    #[test]
    fn test_flick_events_direction() {
        let size = Size::new(100.0, 200.0).unwrap();
        let [began, changed, ended] = flick_events(size, CurlDirection::Forward);
        assert_eq!(began.phase, GesturePhase::Began);
        assert_eq!(changed.phase, GesturePhase::Changed);
        assert_eq!(ended.phase, GesturePhase::Ended);
        assert!(ended.velocity_x < 0.0);

        let [_, _, ended] = flick_events(size, CurlDirection::Backward);
        assert!(ended.velocity_x > 0.0);
    }
}
