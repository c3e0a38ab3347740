//! Zoom/pan viewport transform state, independent of the tree.
//!
//! The rendering surface applies the result as `translate(pan)` then
//! `scale(zoom)` with the origin at top-left, so a content point `c` lands on
//! screen at `pan + zoom * c`. All transitions here are pure; input events
//! are plain values and nothing blocks or suspends.

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const INITIAL_ZOOM: f64 = 1.0;

/// Zoom factor for the toolbar zoom in/out buttons.
const BUTTON_ZOOM_FACTOR: f64 = 1.2;
/// Zoom factor applied per wheel tick while the zoom modifier is held.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.08;
/// Fraction of the viewport the fitted content may occupy.
const FIT_MARGIN: f64 = 0.9;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer: Point,
    pan: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    zoom: f64,
    pan: Point,
    drag: Option<DragOrigin>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            zoom: INITIAL_ZOOM,
            pan: Point::default(),
            drag: None,
        }
    }
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * BUTTON_ZOOM_FACTOR).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / BUTTON_ZOOM_FACTOR).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = INITIAL_ZOOM;
        self.pan = Point::default();
    }

    /// Scales the content to fit within 90% of the viewport (never above 1:1)
    /// and centers it, flooring the pan at 0 per axis. Zero-sized content is
    /// a silent no-op.
    pub fn fit_to_view(&mut self, content: Size, viewport: Size) {
        if content.w <= 0.0 || content.h <= 0.0 {
            return;
        }
        let scale = (viewport.w * FIT_MARGIN / content.w)
            .min(viewport.h * FIT_MARGIN / content.h)
            .min(1.0)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = scale;
        self.pan = Point::new(
            ((viewport.w - content.w * scale) / 2.0).max(0.0),
            ((viewport.h - content.h * scale) / 2.0).max(0.0),
        );
    }

    /// Primary-button press outside any interactive control.
    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag = Some(DragOrigin {
            pointer,
            pan: self.pan,
        });
    }

    /// Pointer move during a drag; ignored when no drag is active.
    pub fn drag_to(&mut self, pointer: Point) {
        if let Some(origin) = self.drag {
            self.pan = Point::new(
                origin.pan.x + (pointer.x - origin.pointer.x),
                origin.pan.y + (pointer.y - origin.pointer.y),
            );
        }
    }

    /// Pointer release; pan stays at its last value.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Modifier-wheel zoom around `anchor` (in screen/viewport pixels).
    /// Positive ticks zoom in. The pan is adjusted so the content point under
    /// the anchor stays visually stationary.
    pub fn wheel_zoom(&mut self, anchor: Point, ticks: f64) {
        if ticks == 0.0 {
            return;
        }
        let next_zoom = (self.zoom * WHEEL_ZOOM_FACTOR.powf(ticks)).clamp(MIN_ZOOM, MAX_ZOOM);
        if next_zoom == self.zoom {
            return;
        }
        // Content point currently under the anchor.
        let content = Point::new(
            (anchor.x - self.pan.x) / self.zoom,
            (anchor.y - self.pan.y) / self.zoom,
        );
        self.pan = Point::new(
            anchor.x - content.x * next_zoom,
            anchor.y - content.y * next_zoom,
        );
        self.zoom = next_zoom;
    }

    pub fn to_screen(&self, content: Point) -> Point {
        Point::new(
            self.pan.x + content.x * self.zoom,
            self.pan.y + content.y * self.zoom,
        )
    }

    pub fn to_content(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }
}

#[cfg(test)]
#[path = "tests/viewport_tests.rs"]
mod tests;
