//! Element geometry: snapping, dragging, resizing and canvas clamping.

use crate::elements::MIN_ELEMENT_SIZE;
use crate::selection::HandleKind;
use kurbo::{Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default grid size for snapping.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;
/// Smallest selectable grid size.
pub const MIN_GRID_SIZE: f64 = 5.0;
/// Largest selectable grid size.
pub const MAX_GRID_SIZE: f64 = 50.0;
/// Grid size slider step.
pub const GRID_SIZE_STEP: f64 = 5.0;

/// Rotation increment for the rotate buttons, in degrees.
pub const ROTATE_STEP: f64 = 15.0;

/// Position and size of an element in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Whether the box lies within a canvas of the given size.
    pub fn is_within(&self, canvas: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= canvas.width
            && self.bottom() <= canvas.height
    }
}

/// Snap-to-grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub enabled: bool,
    size: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_GRID_SIZE,
        }
    }
}

impl GridSettings {
    pub fn new(enabled: bool, size: f64) -> Self {
        let mut grid = Self { enabled, size: DEFAULT_GRID_SIZE };
        grid.set_size(size);
        grid
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Set the grid size, quantised to the slider's 5-unit steps within 5..=50.
    pub fn set_size(&mut self, size: f64) {
        if !size.is_finite() {
            return;
        }
        let stepped = (size / GRID_SIZE_STEP).round() * GRID_SIZE_STEP;
        self.size = stepped.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
    }

    /// Snap a single coordinate when snapping is enabled.
    pub fn apply(&self, value: f64) -> f64 {
        if self.enabled {
            snap_value(value, self.size)
        } else {
            value
        }
    }
}

/// Round `value` to the nearest multiple of `grid_size`.
///
/// Exact halves round away from zero (`f64::round`), so with a 20 unit grid
/// 10 snaps to 20 and -10 snaps to -20.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Normalise an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Step a rotation by `step` degrees, wrapping modulo 360.
pub fn rotate_by(current: f64, step: f64) -> f64 {
    normalize_rotation(current + step)
}

/// New geometry for a drag gesture: initial position plus the pointer delta,
/// each axis snapped independently.
pub fn drag(start: Geometry, delta: Vec2, grid: &GridSettings) -> Geometry {
    Geometry {
        x: grid.apply(start.x + delta.x),
        y: grid.apply(start.y + delta.y),
        ..start
    }
}

/// One axis of a resize. `near` is the left/top edge, `len` the width/height.
#[allow(clippy::too_many_arguments)]
fn resize_axis(
    near: f64,
    len: f64,
    delta: f64,
    moves_near: bool,
    moves_far: bool,
    limit: f64,
    min_size: f64,
    grid: &GridSettings,
) -> (f64, f64) {
    if moves_far {
        let mut new_len = grid.apply(len + delta).max(min_size);
        // The growing edge gives before it escapes the canvas.
        if near + new_len > limit {
            new_len = (limit - near).max(min_size);
        }
        (near, new_len)
    } else if moves_near {
        let far = near + len;
        let mut new_len = grid.apply(len - delta).max(min_size);
        let mut new_near = far - new_len;
        if new_near < 0.0 {
            new_near = 0.0;
            new_len = far.max(min_size);
        }
        (new_near, new_len)
    } else {
        (near, len)
    }
}

/// New geometry for a resize gesture dragging `handle` by `delta`.
///
/// The edge opposite the handle stays fixed. Dimensions are snapped, then
/// clamped to `min_size`, then shrunk so the moving edge stays on the canvas.
pub fn resize(
    start: Geometry,
    handle: HandleKind,
    delta: Vec2,
    grid: &GridSettings,
    canvas: Size,
    min_size: f64,
) -> Geometry {
    let (x, width) = resize_axis(
        start.x,
        start.width,
        delta.x,
        handle.moves_left(),
        handle.moves_right(),
        canvas.width,
        min_size,
        grid,
    );
    let (y, height) = resize_axis(
        start.y,
        start.height,
        delta.y,
        handle.moves_top(),
        handle.moves_bottom(),
        canvas.height,
        min_size,
        grid,
    );
    Geometry { x, y, width, height }
}

/// Force a box inside the canvas.
///
/// Sizes are first reduced to the canvas size (never below `min_size`), then
/// positions are shifted so no edge escapes. Applying it twice is a no-op.
pub fn clamp_to_canvas(geom: Geometry, canvas: Size, min_size: f64) -> Geometry {
    let width = clamp_len(geom.width, canvas.width, min_size);
    let height = clamp_len(geom.height, canvas.height, min_size);
    let mut x = if geom.x.is_finite() { geom.x } else { 0.0 };
    let mut y = if geom.y.is_finite() { geom.y } else { 0.0 };
    if x + width > canvas.width {
        x = canvas.width - width;
    }
    if y + height > canvas.height {
        y = canvas.height - height;
    }
    if x < 0.0 {
        x = 0.0;
    }
    if y < 0.0 {
        y = 0.0;
    }
    Geometry { x, y, width, height }
}

fn clamp_len(len: f64, limit: f64, min_size: f64) -> f64 {
    let len = if len.is_finite() { len } else { min_size };
    len.min(limit).max(min_size)
}

/// Default clamp using [`MIN_ELEMENT_SIZE`].
pub fn clamp_element(geom: Geometry, canvas: Size) -> Geometry {
    clamp_to_canvas(geom, canvas, MIN_ELEMENT_SIZE)
}

/// Fit a `src_width` × `src_height` box proportionally within `fraction` of
/// the canvas, centered.
pub fn fit_centered(src_width: f64, src_height: f64, canvas: Size, fraction: f64) -> Geometry {
    let max_w = canvas.width * fraction;
    let max_h = canvas.height * fraction;
    let (mut width, mut height) = (src_width.max(1.0), src_height.max(1.0));
    let scale = (max_w / width).min(max_h / height);
    if scale < 1.0 {
        width *= scale;
        height *= scale;
    }
    let width = width.max(MIN_ELEMENT_SIZE).min(canvas.width);
    let height = height.max(MIN_ELEMENT_SIZE).min(canvas.height);
    Geometry {
        x: (canvas.width - width) / 2.0,
        y: (canvas.height - height) / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Corner, Edge};

    const CANVAS: Size = Size::new(600.0, 900.0);

    fn grid_on() -> GridSettings {
        GridSettings::new(true, 20.0)
    }

    #[test]
    fn test_snap_value() {
        assert!((snap_value(0.0, 20.0) - 0.0).abs() < f64::EPSILON);
        assert!((snap_value(10.0, 20.0) - 20.0).abs() < f64::EPSILON);
        assert!((snap_value(23.0, 20.0) - 20.0).abs() < f64::EPSILON);
        assert!((snap_value(27.0, 20.0) - 20.0).abs() < f64::EPSILON);
        assert!((snap_value(30.0, 20.0) - 40.0).abs() < f64::EPSILON);
        assert!((snap_value(37.0, 20.0) - 40.0).abs() < f64::EPSILON);
        assert!((snap_value(-10.0, 20.0) + 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_size_quantised() {
        let mut grid = GridSettings::default();
        grid.set_size(3.0);
        assert!((grid.size() - 5.0).abs() < f64::EPSILON);
        grid.set_size(33.0);
        assert!((grid.size() - 35.0).abs() < f64::EPSILON);
        grid.set_size(80.0);
        assert!((grid.size() - 50.0).abs() < f64::EPSILON);
        grid.set_size(f64::NAN);
        assert!((grid.size() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_disabled_passthrough() {
        let grid = GridSettings::default();
        assert!((grid.apply(23.0) - 23.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotation_wraps() {
        assert!((normalize_rotation(360.0)).abs() < f64::EPSILON);
        assert!((normalize_rotation(-15.0) - 345.0).abs() < f64::EPSILON);
        assert!((rotate_by(350.0, ROTATE_STEP) - 5.0).abs() < f64::EPSILON);
        assert!((rotate_by(0.0, -ROTATE_STEP) - 345.0).abs() < f64::EPSILON);
        assert!(normalize_rotation(f64::INFINITY).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_with_snap() {
        let start = Geometry::new(100.0, 100.0, 200.0, 50.0);
        let moved = drag(start, Vec2::new(13.0, 27.0), &grid_on());
        assert!((moved.x - 120.0).abs() < f64::EPSILON);
        assert!((moved.y - 120.0).abs() < f64::EPSILON);
        assert!((moved.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_without_snap_can_go_negative() {
        let start = Geometry::new(100.0, 100.0, 200.0, 50.0);
        let moved = drag(start, Vec2::new(-150.0, 0.0), &GridSettings::default());
        assert!((moved.x + 50.0).abs() < f64::EPSILON);
        let clamped = clamp_element(moved, CANVAS);
        assert!((clamped.x - 0.0).abs() < f64::EPSILON);
        assert!((clamped.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_bottom_right_stops_at_canvas_edge() {
        let start = Geometry::new(550.0, 850.0, 100.0, 100.0);
        let out = resize(
            start,
            HandleKind::Corner(Corner::BottomRight),
            Vec2::new(100.0, 100.0),
            &GridSettings::default(),
            CANVAS,
            MIN_ELEMENT_SIZE,
        );
        assert!((out.x - 550.0).abs() < f64::EPSILON);
        assert!((out.y - 850.0).abs() < f64::EPSILON);
        assert!((out.width - 50.0).abs() < f64::EPSILON);
        assert!((out.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_minimum_size() {
        let start = Geometry::new(100.0, 100.0, 100.0, 100.0);
        let out = resize(
            start,
            HandleKind::Corner(Corner::BottomRight),
            Vec2::new(-500.0, -95.0),
            &GridSettings::default(),
            CANVAS,
            MIN_ELEMENT_SIZE,
        );
        assert!((out.width - 20.0).abs() < f64::EPSILON);
        assert!((out.height - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_top_left_keeps_opposite_corner() {
        let start = Geometry::new(100.0, 100.0, 100.0, 100.0);
        let out = resize(
            start,
            HandleKind::Corner(Corner::TopLeft),
            Vec2::new(30.0, -40.0),
            &GridSettings::default(),
            CANVAS,
            MIN_ELEMENT_SIZE,
        );
        assert!((out.x - 130.0).abs() < f64::EPSILON);
        assert!((out.width - 70.0).abs() < f64::EPSILON);
        assert!((out.y - 60.0).abs() < f64::EPSILON);
        assert!((out.height - 140.0).abs() < f64::EPSILON);
        assert!((out.right() - 200.0).abs() < f64::EPSILON);
        assert!((out.bottom() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_left_edge_stops_at_zero() {
        let start = Geometry::new(50.0, 100.0, 100.0, 100.0);
        let out = resize(
            start,
            HandleKind::Edge(Edge::Left),
            Vec2::new(-200.0, 35.0),
            &GridSettings::default(),
            CANVAS,
            MIN_ELEMENT_SIZE,
        );
        assert!((out.x - 0.0).abs() < f64::EPSILON);
        assert!((out.width - 150.0).abs() < f64::EPSILON);
        // Edge handles ignore the other axis.
        assert!((out.y - 100.0).abs() < f64::EPSILON);
        assert!((out.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_top_shrink_below_minimum_pins_bottom() {
        let start = Geometry::new(0.0, 100.0, 100.0, 100.0);
        let out = resize(
            start,
            HandleKind::Edge(Edge::Top),
            Vec2::new(0.0, 500.0),
            &GridSettings::default(),
            CANVAS,
            MIN_ELEMENT_SIZE,
        );
        assert!((out.height - 20.0).abs() < f64::EPSILON);
        assert!((out.y - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_snaps_dimension() {
        let start = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let out = resize(
            start,
            HandleKind::Edge(Edge::Right),
            Vec2::new(13.0, 0.0),
            &grid_on(),
            CANVAS,
            MIN_ELEMENT_SIZE,
        );
        assert!((out.width - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_idempotent() {
        let geoms = [
            Geometry::new(-10.0, -10.0, 50.0, 50.0),
            Geometry::new(590.0, 890.0, 50.0, 50.0),
            Geometry::new(0.0, 0.0, 1000.0, 20.0),
            Geometry::new(100.0, 100.0, 5.0, 5.0),
        ];
        for g in geoms {
            let once = clamp_element(g, CANVAS);
            let twice = clamp_element(once, CANVAS);
            assert_eq!(once, twice);
            assert!(once.is_within(CANVAS));
            assert!(once.width >= MIN_ELEMENT_SIZE && once.height >= MIN_ELEMENT_SIZE);
        }
    }

    #[test]
    fn test_clamp_oversize_element() {
        let out = clamp_element(Geometry::new(40.0, 0.0, 800.0, 100.0), CANVAS);
        assert!((out.x - 0.0).abs() < f64::EPSILON);
        assert!((out.width - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_centered() {
        let g = fit_centered(1200.0, 600.0, CANVAS, 0.8);
        assert!((g.width - 480.0).abs() < 1e-9);
        assert!((g.height - 240.0).abs() < 1e-9);
        assert!((g.x - 60.0).abs() < 1e-9);
        assert!((g.y - 330.0).abs() < 1e-9);

        // Small images keep their natural size.
        let g = fit_centered(100.0, 50.0, CANVAS, 0.8);
        assert!((g.width - 100.0).abs() < 1e-9);
        assert!((g.x - 250.0).abs() < 1e-9);
    }
}
