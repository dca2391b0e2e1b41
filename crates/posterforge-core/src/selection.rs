//! Selection handles, interaction sessions and z-order management.

use crate::document::DesignDocument;
use crate::elements::{Element, ElementId};
use crate::geometry::Geometry;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in canvas units.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

impl HandleKind {
    /// All handles, corners first.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Right),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
    ];

    pub fn moves_left(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::BottomLeft) | HandleKind::Edge(Edge::Left)
        )
    }

    pub fn moves_right(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopRight | Corner::BottomRight)
                | HandleKind::Edge(Edge::Right)
        )
    }

    pub fn moves_top(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::TopRight) | HandleKind::Edge(Edge::Top)
        )
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::BottomLeft | Corner::BottomRight)
                | HandleKind::Edge(Edge::Bottom)
        )
    }

    /// Handle anchor as fractions of the element box.
    fn anchor(&self) -> (f64, f64) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (0.0, 0.0),
            HandleKind::Corner(Corner::TopRight) => (1.0, 0.0),
            HandleKind::Corner(Corner::BottomLeft) => (0.0, 1.0),
            HandleKind::Corner(Corner::BottomRight) => (1.0, 1.0),
            HandleKind::Edge(Edge::Top) => (0.5, 0.0),
            HandleKind::Edge(Edge::Right) => (1.0, 0.5),
            HandleKind::Edge(Edge::Bottom) => (0.5, 1.0),
            HandleKind::Edge(Edge::Left) => (0.0, 0.5),
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight resize handles of an element, following its rotation.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    let transform = element.transform();
    HandleKind::ALL
        .iter()
        .map(|&kind| {
            let (fx, fy) = kind.anchor();
            let local = Point::new(fx * element.width, fy * element.height);
            Handle::new(transform * local, kind)
        })
        .collect()
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Transient state of one pointer gesture. Discarded on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        element_id: ElementId,
        start_pointer: Point,
        start_geom: Geometry,
    },
    Resizing {
        element_id: ElementId,
        handle: HandleKind,
        start_pointer: Point,
        start_geom: Geometry,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The element being manipulated, if any.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging { element_id, .. } | Interaction::Resizing { element_id, .. } => {
                Some(*element_id)
            }
        }
    }

    /// Pointer delta since the gesture started.
    pub fn delta(&self, pointer: Point) -> Vec2 {
        match self {
            Interaction::Idle => Vec2::ZERO,
            Interaction::Dragging { start_pointer, .. }
            | Interaction::Resizing { start_pointer, .. } => pointer - *start_pointer,
        }
    }
}

impl DesignDocument {
    /// Select an element, or clear the selection with `None`.
    /// Returns false (selection unchanged) when the id is unknown.
    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        match id {
            None => {
                self.selected_element_id = None;
                true
            }
            Some(id) if self.contains(id) => {
                self.selected_element_id = Some(id);
                true
            }
            Some(id) => {
                log::warn!("select: unknown element {id}");
                false
            }
        }
    }

    /// Swap z-index with the element immediately above. No-op at the top.
    pub fn move_up(&mut self, id: ElementId) -> bool {
        self.swap_with_neighbor(id, true)
    }

    /// Swap z-index with the element immediately below. No-op at the bottom.
    pub fn move_down(&mut self, id: ElementId) -> bool {
        self.swap_with_neighbor(id, false)
    }

    fn swap_with_neighbor(&mut self, id: ElementId, upward: bool) -> bool {
        let Some(current) = self.element(id).map(|e| e.z_index) else {
            log::warn!("reorder: unknown element {id}");
            return false;
        };
        let neighbor = self
            .elements
            .iter()
            .filter(|e| if upward { e.z_index > current } else { e.z_index < current })
            .min_by_key(|e| e.z_index.abs_diff(current))
            .map(|e| (e.id, e.z_index));
        let Some((neighbor_id, neighbor_z)) = neighbor else {
            return false;
        };
        for element in &mut self.elements {
            if element.id == id {
                element.z_index = neighbor_z;
            } else if element.id == neighbor_id {
                element.z_index = current;
            }
        }
        log::debug!("swapped z-index of {id} ({current}) with {neighbor_id} ({neighbor_z})");
        true
    }

    /// Move an element above all others.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(current) = self.element(id).map(|e| e.z_index) else {
            return false;
        };
        if Some(current) == self.max_z_index() {
            return false;
        }
        let top = self.next_z_index();
        if let Some(element) = self.element_mut(id) {
            element.z_index = top;
        }
        true
    }

    /// Move an element below all others. Renumbers the stack when the
    /// bottom has reached `i32::MIN`.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(current) = self.element(id).map(|e| e.z_index) else {
            return false;
        };
        let Some(bottom) = self.min_z_index().filter(|&z| z != current) else {
            return false;
        };
        let z = bottom.checked_sub(1).unwrap_or_else(|| {
            self.renumber_z_indices();
            -1
        });
        if let Some(element) = self.element_mut(id) {
            element.z_index = z;
        }
        true
    }

    /// Topmost visible element under a point.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.elements_by_z()
            .into_iter()
            .rev()
            .find(|e| e.visible && e.hit_test(point, tolerance))
            .map(|e| e.id)
    }
}
