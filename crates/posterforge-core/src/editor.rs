//! Editor controller.
//!
//! Owns the document, the grid settings and the transient pointer gesture.
//! UI components call into the editor instead of mutating the document, so
//! all geometry math runs through one place.

use crate::assets::{AssetError, ImageAsset};
use crate::config::EditorConfig;
use crate::document::DesignDocument;
use crate::elements::{
    Element, ElementId, ElementKind, ElementPatch, ImageStyle, MIN_ELEMENT_SIZE, ShapeKind,
};
use crate::geometry::{self, GridSettings, clamp_to_canvas, normalize_rotation, rotate_by};
use crate::selection::{HANDLE_HIT_TOLERANCE, HandleKind, Interaction, hit_test_handles};
use crate::sizes::SizePreset;
use crate::storage::TemplateRecord;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// Interactive editing session for one document.
#[derive(Debug, Clone)]
pub struct Editor {
    pub document: DesignDocument,
    pub grid: GridSettings,
    config: EditorConfig,
    interaction: Interaction,
    /// Whether the running gesture has pushed its undo snapshot.
    gesture_recorded: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Open a fresh document at the configured default size.
    pub fn new(config: EditorConfig) -> Self {
        let preset = SizePreset::find(&config.default_size).unwrap_or(SizePreset::default_preset());
        Self::with_document(DesignDocument::from_preset(preset), config)
    }

    pub fn with_document(document: DesignDocument, config: EditorConfig) -> Self {
        Self {
            document,
            grid: config.grid(),
            config,
            interaction: Interaction::Idle,
            gesture_recorded: false,
        }
    }

    /// Open a saved template in a fresh document.
    pub fn from_template(template: &TemplateRecord, config: EditorConfig) -> Self {
        Self::with_document(template.to_document(), config)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn selected(&self) -> Option<&Element> {
        self.document.selected()
    }

    pub fn add_text(&mut self) -> ElementId {
        self.document.push_undo();
        self.document.add_element(ToolKind::Text)
    }

    pub fn add_shape(&mut self, kind: ShapeKind) -> ElementId {
        self.document.push_undo();
        self.document.add_element(ToolKind::Shape(kind))
    }

    /// Add an image from an already-decoded source of known pixel size.
    pub fn add_image(
        &mut self,
        src: impl Into<String>,
        natural_width: u32,
        natural_height: u32,
    ) -> ElementId {
        self.document.push_undo();
        self.document.add_element(ToolKind::Image {
            src: src.into(),
            natural_width,
            natural_height,
        })
    }

    /// Decode an uploaded file and add it as an image element.
    /// On failure the document is left untouched.
    pub fn ingest_image(&mut self, bytes: &[u8]) -> Result<ElementId, AssetError> {
        let asset = ImageAsset::from_bytes(bytes).inspect_err(|e| {
            log::warn!("image ingestion failed: {e}");
        })?;
        let geometry = asset.placement(self.document.canvas_size());
        let style = ImageStyle::new(asset.src).with_natural_size(asset.width, asset.height);
        self.document.push_undo();
        Ok(self
            .document
            .add_element_with(Element::new(ElementKind::Image(style), geometry)))
    }

    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !self.document.contains(id) {
            return self.document.update_element(id, patch);
        }
        self.document.push_undo();
        if patch.locked == Some(true) && self.interaction.element_id() == Some(id) {
            self.interaction = Interaction::Idle;
        }
        self.document.update_element(id, patch)
    }

    pub fn delete(&mut self, id: ElementId) -> Option<Element> {
        if !self.document.contains(id) {
            return self.document.delete_element(id);
        }
        self.document.push_undo();
        if self.interaction.element_id() == Some(id) {
            self.interaction = Interaction::Idle;
        }
        self.document.delete_element(id)
    }

    pub fn delete_selected(&mut self) -> Option<Element> {
        self.document.selected_element_id().and_then(|id| self.delete(id))
    }

    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        if !self.document.contains(id) {
            return None;
        }
        self.document.push_undo();
        self.document.duplicate_element_by(id, self.config.duplicate_offset)
    }

    pub fn select(&mut self, id: Option<ElementId>) -> bool {
        self.document.select(id)
    }

    pub fn move_up(&mut self, id: ElementId) -> bool {
        self.document.move_up(id)
    }

    pub fn move_down(&mut self, id: ElementId) -> bool {
        self.document.move_down(id)
    }

    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        let Some(locked) = self.document.element(id).map(|e| e.locked) else {
            return false;
        };
        if self.interaction.element_id() == Some(id) {
            self.interaction = Interaction::Idle;
        }
        self.document.update_element(id, &ElementPatch::locked(!locked))
    }

    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        let Some(visible) = self.document.element(id).map(|e| e.visible) else {
            return false;
        };
        self.document.update_element(id, &ElementPatch::visible(!visible))
    }

    /// Switch output size from the catalog. Returns false for unknown ids.
    pub fn change_size(&mut self, size_id: &str) -> bool {
        let Some(preset) = SizePreset::find(size_id) else {
            log::warn!("unknown output size {size_id}");
            return false;
        };
        self.document.push_undo();
        self.document.set_canvas_size(preset.width, preset.height, preset.id);
        true
    }

    fn manipulable(&self, id: ElementId) -> Option<&Element> {
        self.document.element(id).filter(|e| !e.locked)
    }

    /// Pointer pressed on an element body: select it and start dragging
    /// unless it is locked. Returns whether a drag started.
    pub fn pointer_down_on_element(&mut self, id: ElementId, pointer: Point) -> bool {
        if !self.document.select(Some(id)) {
            return false;
        }
        let Some(element) = self.manipulable(id) else {
            return false;
        };
        self.interaction = Interaction::Dragging {
            element_id: id,
            start_pointer: pointer,
            start_geom: element.geometry(),
        };
        self.gesture_recorded = false;
        true
    }

    /// Pointer pressed on a resize handle of an element.
    pub fn pointer_down_on_handle(
        &mut self,
        id: ElementId,
        handle: HandleKind,
        pointer: Point,
    ) -> bool {
        let Some(element) = self.manipulable(id) else {
            return false;
        };
        self.interaction = Interaction::Resizing {
            element_id: id,
            handle,
            start_pointer: pointer,
            start_geom: element.geometry(),
        };
        self.document.select(Some(id));
        self.gesture_recorded = false;
        true
    }

    /// Pointer pressed on the canvas: route to a handle of the selected
    /// element, then to the topmost element, else clear the selection.
    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        if let Some(selected) = self.document.selected() {
            if let Some(handle) = hit_test_handles(selected, pointer, HANDLE_HIT_TOLERANCE) {
                let id = selected.id();
                return self.pointer_down_on_handle(id, handle, pointer);
            }
        }
        match self.document.element_at(pointer, 0.0) {
            Some(id) => self.pointer_down_on_element(id, pointer),
            None => {
                self.document.select(None);
                false
            }
        }
    }

    /// Pointer moved during a gesture. Ends the gesture if its element was
    /// locked or removed since the press. The undo snapshot is pushed on the
    /// first move that changes geometry.
    pub fn pointer_move(&mut self, pointer: Point) {
        let Some(id) = self.interaction.element_id() else {
            return;
        };
        let Some(current) = self.manipulable(id).map(Element::geometry) else {
            log::debug!("gesture on {id} ended: element locked or removed");
            self.interaction = Interaction::Idle;
            return;
        };
        let delta = self.interaction.delta(pointer);
        let canvas = self.document.canvas_size();
        let target = match self.interaction {
            Interaction::Idle => return,
            Interaction::Dragging { start_geom, .. } => {
                geometry::drag(start_geom, delta, &self.grid)
            }
            Interaction::Resizing { handle, start_geom, .. } => {
                geometry::resize(start_geom, handle, delta, &self.grid, canvas, MIN_ELEMENT_SIZE)
            }
        };
        if clamp_to_canvas(target, canvas, MIN_ELEMENT_SIZE) == current {
            return;
        }
        if !self.gesture_recorded {
            self.document.push_undo();
            self.gesture_recorded = true;
        }
        self.document.set_element_geometry(id, target);
    }

    /// Pointer released: the gesture ends and its session is discarded.
    pub fn pointer_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Move an element by a fixed amount (arrow keys).
    pub fn nudge(&mut self, id: ElementId, delta: Vec2) -> bool {
        let Some(element) = self.manipulable(id) else {
            return false;
        };
        let moved = geometry::drag(element.geometry(), delta, &self.grid);
        self.document.push_undo();
        self.document.set_element_geometry(id, moved)
    }

    /// Rotate by `steps` increments of the configured rotate step.
    pub fn rotate(&mut self, id: ElementId, steps: i32) -> bool {
        let Some(element) = self.manipulable(id) else {
            return false;
        };
        let rotation = rotate_by(element.rotation, f64::from(steps) * self.config.rotate_step);
        self.document.push_undo();
        self.document.update_element(id, &ElementPatch::rotation(rotation))
    }

    pub fn rotate_selected(&mut self, steps: i32) -> bool {
        self.document
            .selected_element_id()
            .is_some_and(|id| self.rotate(id, steps))
    }

    /// Rotation slider: set an absolute angle, wrapped into [0, 360).
    pub fn set_rotation(&mut self, id: ElementId, degrees: f64) -> bool {
        if self.manipulable(id).is_none() {
            return false;
        }
        let rotation = normalize_rotation(degrees);
        self.document.update_element(id, &ElementPatch::rotation(rotation))
    }

    pub fn undo(&mut self) -> bool {
        self.interaction = Interaction::Idle;
        self.document.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.interaction = Interaction::Idle;
        self.document.redo()
    }

    /// Capture the document as a template record for saving.
    pub fn to_template(&self, user_id: &str, name: &str) -> TemplateRecord {
        TemplateRecord::from_document(&self.document, user_id, name)
    }

    /// Replace the document with a loaded template.
    pub fn load_template(&mut self, template: &TemplateRecord) {
        self.interaction = Interaction::Idle;
        self.document.load_template(template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Corner;

    fn editor() -> Editor {
        Editor::default()
    }

    #[test]
    fn test_drag_clamped_to_canvas() {
        let mut ed = editor();
        let id = ed.add_text();
        assert!(ed.pointer_down_on_element(id, Point::new(150.0, 120.0)));
        ed.pointer_move(Point::new(0.0, 120.0));
        ed.pointer_up();
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y), (0.0, 100.0));
        assert!(ed.interaction().is_idle());
    }

    #[test]
    fn test_drag_uses_start_geometry() {
        let mut ed = editor();
        let id = ed.add_text();
        ed.pointer_down_on_element(id, Point::new(150.0, 120.0));
        ed.pointer_move(Point::new(160.0, 130.0));
        ed.pointer_move(Point::new(170.0, 140.0));
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y), (120.0, 120.0));
    }

    #[test]
    fn test_drag_with_grid() {
        let mut ed = editor();
        ed.grid = GridSettings::new(true, 20.0);
        let id = ed.add_text();
        ed.pointer_down_on_element(id, Point::new(150.0, 120.0));
        ed.pointer_move(Point::new(163.0, 127.0));
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y), (120.0, 100.0));
    }

    #[test]
    fn test_locked_element_does_not_move() {
        let mut ed = editor();
        let id = ed.add_shape(ShapeKind::Rectangle);
        assert!(ed.toggle_lock(id));
        assert!(!ed.pointer_down_on_element(id, Point::new(150.0, 150.0)));
        ed.pointer_move(Point::new(300.0, 300.0));
        ed.pointer_up();
        assert!(!ed.rotate(id, 1));
        assert!(!ed.nudge(id, Vec2::new(5.0, 0.0)));
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y, e.rotation), (100.0, 100.0, 0.0));
        // Still selectable so it can be unlocked.
        assert_eq!(ed.document.selected_element_id(), Some(id));
    }

    #[test]
    fn test_resize_via_handle() {
        let mut ed = editor();
        let id = ed.add_shape(ShapeKind::Rectangle);
        ed.update(id, &ElementPatch::position(500.0, 800.0));
        let corner = HandleKind::Corner(Corner::BottomRight);
        assert!(ed.pointer_down_on_handle(id, corner, Point::new(600.0, 900.0)));
        ed.pointer_move(Point::new(700.0, 1000.0));
        ed.pointer_up();
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y, e.width, e.height), (500.0, 800.0, 100.0, 100.0));
    }

    #[test]
    fn test_pointer_down_routes_to_handle() {
        let mut ed = editor();
        let id = ed.add_shape(ShapeKind::Rectangle);
        assert!(ed.pointer_down(Point::new(200.0, 200.0)));
        assert!(matches!(
            ed.interaction(),
            Interaction::Resizing { handle: HandleKind::Corner(Corner::BottomRight), .. }
        ));
        ed.pointer_move(Point::new(250.0, 230.0));
        ed.pointer_up();
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.width, e.height), (150.0, 130.0));
    }

    #[test]
    fn test_pointer_down_on_empty_canvas_clears_selection() {
        let mut ed = editor();
        ed.add_text();
        assert!(!ed.pointer_down(Point::new(500.0, 800.0)));
        assert!(ed.selected().is_none());
    }

    #[test]
    fn test_rotate_steps_wrap() {
        let mut ed = editor();
        let id = ed.add_text();
        assert!(ed.rotate(id, -1));
        assert!((ed.document.element(id).unwrap().rotation - 345.0).abs() < f64::EPSILON);
        assert!(ed.set_rotation(id, 725.0));
        assert!((ed.document.element(id).unwrap().rotation - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingest_failure_leaves_document_untouched() {
        let mut ed = editor();
        ed.add_text();
        let before = ed.document.elements().to_vec();
        assert!(ed.ingest_image(b"definitely not a png").is_err());
        assert_eq!(ed.document.elements(), &before[..]);
        assert!(ed.document.can_undo());
        ed.document.undo();
        assert!(ed.document.is_empty());
    }

    #[test]
    fn test_change_size() {
        let mut ed = editor();
        let id = ed.add_shape(ShapeKind::Circle);
        ed.update(id, &ElementPatch::position(500.0, 800.0));
        assert!(ed.change_size("landscape"));
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y), (500.0, 500.0));
        assert!(!ed.change_size("billboard"));
    }

    #[test]
    fn test_delete_selected_ends_gesture() {
        let mut ed = editor();
        let id = ed.add_text();
        ed.pointer_down_on_element(id, Point::new(150.0, 120.0));
        assert!(ed.delete_selected().is_some());
        assert!(ed.interaction().is_idle());
        assert!(ed.document.selected_element_id().is_none());
    }

    #[test]
    fn test_duplicate_uses_config_offset() {
        let config = EditorConfig {
            duplicate_offset: 40.0,
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(config);
        let id = ed.add_text();
        let copy = ed.duplicate(id).unwrap();
        let e = ed.document.element(copy).unwrap();
        assert_eq!((e.x, e.y), (140.0, 140.0));
    }

    #[test]
    fn test_lock_during_drag_ends_gesture() {
        let mut ed = editor();
        let id = ed.add_text();
        assert!(ed.pointer_down_on_element(id, Point::new(150.0, 120.0)));
        assert!(ed.update(id, &ElementPatch::locked(true)));
        assert!(ed.interaction().is_idle());
        ed.pointer_move(Point::new(250.0, 220.0));
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y), (100.0, 100.0));
    }

    #[test]
    fn test_move_rechecks_lock() {
        let mut ed = editor();
        let id = ed.add_shape(ShapeKind::Rectangle);
        let corner = HandleKind::Corner(Corner::BottomRight);
        assert!(ed.pointer_down_on_handle(id, corner, Point::new(200.0, 200.0)));
        ed.document.update_element(id, &ElementPatch::locked(true));
        ed.pointer_move(Point::new(300.0, 300.0));
        assert!(ed.interaction().is_idle());
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.width, e.height), (100.0, 100.0));
    }

    #[test]
    fn test_click_without_move_records_no_history() {
        let mut ed = editor();
        let id = ed.add_text();
        ed.pointer_down_on_element(id, Point::new(150.0, 120.0));
        ed.pointer_move(Point::new(150.0, 120.0));
        ed.pointer_up();
        assert!(ed.undo());
        assert!(ed.document.is_empty());
        assert!(!ed.document.can_undo());
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut ed = editor();
        let id = ed.add_text();
        ed.pointer_down_on_element(id, Point::new(150.0, 120.0));
        ed.pointer_move(Point::new(160.0, 130.0));
        ed.pointer_move(Point::new(200.0, 160.0));
        ed.pointer_up();
        assert!(ed.undo());
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.x, e.y), (100.0, 100.0));
        assert!(ed.undo());
        assert!(ed.document.is_empty());
    }

    #[test]
    fn test_resize_and_update_share_minimum_size() {
        let mut ed = editor();
        let id = ed.add_shape(ShapeKind::Rectangle);
        let corner = HandleKind::Corner(Corner::BottomRight);
        ed.pointer_down_on_handle(id, corner, Point::new(200.0, 200.0));
        ed.pointer_move(Point::new(0.0, 0.0));
        ed.pointer_up();
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.width, e.height), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));

        ed.update(id, &ElementPatch::size(5.0, 5.0));
        let e = ed.document.element(id).unwrap();
        assert_eq!((e.width, e.height), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    }
}
