//! Design document store.
//!
//! The document is the single source of truth for one design. Every mutation
//! goes through the operations here, each of which leaves the document
//! satisfying its invariants: the selection references an existing element,
//! z-indices are distinct, and every element lies inside the canvas.

use crate::elements::{
    Background, Element, ElementId, ElementPatch, MIN_ELEMENT_SIZE, SerializableColor,
};
use crate::geometry::{Geometry, clamp_to_canvas};
use crate::sizes::SizePreset;
use crate::storage::TemplateRecord;
use crate::tools::{ToolKind, default_element};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Offset applied to duplicated elements, in canvas units.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone, PartialEq)]
struct DocumentSnapshot {
    elements: Vec<Element>,
    selected_element_id: Option<ElementId>,
    background_color: Background,
    background_image: Option<String>,
    canvas_width: u32,
    canvas_height: u32,
    current_size: String,
}

/// The full editable state of one design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    #[serde(default)]
    pub name: String,
    pub(crate) elements: Vec<Element>,
    #[serde(default)]
    pub(crate) selected_element_id: Option<ElementId>,
    #[serde(default)]
    background_color: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background_image: Option<String>,
    canvas_width: u32,
    canvas_height: u32,
    /// Output size id in the size catalog.
    current_size: String,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
}

impl Default for DesignDocument {
    fn default() -> Self {
        Self::from_preset(SizePreset::default_preset())
    }
}

impl DesignDocument {
    /// Create an empty document. Zero dimensions are raised to one unit.
    pub fn new(canvas_width: u32, canvas_height: u32, size_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled design".to_string(),
            elements: Vec::new(),
            selected_element_id: None,
            background_color: Background::Color(SerializableColor::white()),
            background_image: None,
            canvas_width: canvas_width.max(1),
            canvas_height: canvas_height.max(1),
            current_size: size_id.into(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Create an empty document sized for an output preset.
    pub fn from_preset(preset: &SizePreset) -> Self {
        Self::new(preset.width, preset.height, preset.id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|e| e.id == id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn selected_element_id(&self) -> Option<ElementId> {
        self.selected_element_id
    }

    pub fn selected(&self) -> Option<&Element> {
        self.selected_element_id.and_then(|id| self.element(id))
    }

    pub fn background_color(&self) -> Background {
        self.background_color
    }

    pub fn background_image(&self) -> Option<&str> {
        self.background_image.as_deref()
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(f64::from(self.canvas_width), f64::from(self.canvas_height))
    }

    pub fn current_size(&self) -> &str {
        &self.current_size
    }

    /// Elements in paint order (ascending z-index).
    pub fn elements_by_z(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    pub(crate) fn max_z_index(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.z_index).max()
    }

    pub(crate) fn min_z_index(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.z_index).min()
    }

    /// A z-index above every element. Renumbers the stack when the top has
    /// reached `i32::MAX`.
    pub(crate) fn next_z_index(&mut self) -> i32 {
        match self.max_z_index() {
            None => 0,
            Some(z) => z.checked_add(1).unwrap_or_else(|| {
                self.renumber_z_indices();
                self.elements.len() as i32
            }),
        }
    }

    /// Reassign z-indices as `0..n`, keeping paint order.
    pub(crate) fn renumber_z_indices(&mut self) {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| self.elements[i].z_index);
        for (z, i) in order.into_iter().enumerate() {
            self.elements[i].z_index = z as i32;
        }
        log::debug!("renumbered z-indices of {} element(s)", self.elements.len());
    }

    /// Add a default element for a tool, select it and return its id.
    pub fn add_element(&mut self, tool: ToolKind) -> ElementId {
        let element = default_element(&tool, self.canvas_size());
        self.add_element_with(element)
    }

    /// Insert a caller-built element on top of the stack and select it.
    /// Its z-index is reassigned; a clashing id is regenerated.
    pub fn add_element_with(&mut self, mut element: Element) -> ElementId {
        if self.contains(element.id) {
            element.regenerate_id();
        }
        element.z_index = self.next_z_index();
        self.clamp_element(&mut element);
        let id = element.id;
        log::debug!("add {} element {id} at z {}", element.kind.name(), element.z_index);
        self.elements.push(element);
        self.selected_element_id = Some(id);
        id
    }

    /// Merge a partial update into an element. Unknown ids are a no-op
    /// returning false.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let canvas = self.canvas_size();
        let Some(element) = self.element_mut(id) else {
            log::warn!("update: unknown element {id}");
            return false;
        };
        if !patch.apply_to(element) {
            log::warn!("update: style patch does not match {} element {id}", element.kind.name());
        }
        let clamped = clamp_to_canvas(element.geometry(), canvas, MIN_ELEMENT_SIZE);
        element.set_geometry(clamped);
        true
    }

    /// Apply a full geometry (from a gesture) to an element, clamped into the canvas.
    pub(crate) fn set_element_geometry(&mut self, id: ElementId, geometry: Geometry) -> bool {
        let canvas = self.canvas_size();
        match self.element_mut(id) {
            Some(element) => {
                element.set_geometry(clamp_to_canvas(geometry, canvas, MIN_ELEMENT_SIZE));
                true
            }
            None => false,
        }
    }

    /// Remove an element, clearing the selection if it was selected.
    pub fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        let Some(index) = self.elements.iter().position(|e| e.id == id) else {
            log::warn!("delete: unknown element {id}");
            return None;
        };
        let removed = self.elements.remove(index);
        if self.selected_element_id == Some(id) {
            self.selected_element_id = None;
        }
        log::debug!("deleted {} element {id}", removed.kind.name());
        Some(removed)
    }

    /// Clone an element offset by [`DUPLICATE_OFFSET`] on both axes.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        self.duplicate_element_by(id, DUPLICATE_OFFSET)
    }

    /// Clone an element with a new id at `offset` from the original, place
    /// it on top of the stack and select it.
    pub fn duplicate_element_by(&mut self, id: ElementId, offset: f64) -> Option<ElementId> {
        let Some(original) = self.element(id) else {
            log::warn!("duplicate: unknown element {id}");
            return None;
        };
        let mut clone = original.clone();
        clone.regenerate_id();
        clone.x += offset;
        clone.y += offset;
        if !clone.name.is_empty() {
            clone.name.push_str(" copy");
        }
        let new_id = self.add_element_with(clone);
        log::debug!("duplicated {id} as {new_id}");
        Some(new_id)
    }

    /// Switch the output size and re-enforce bounds on every element.
    pub fn set_canvas_size(&mut self, width: u32, height: u32, size_id: impl Into<String>) {
        self.canvas_width = width.max(1);
        self.canvas_height = height.max(1);
        self.current_size = size_id.into();
        log::info!(
            "canvas resized to {}x{} ({})",
            self.canvas_width,
            self.canvas_height,
            self.current_size
        );
        self.enforce_bounds();
    }

    pub fn set_background(&mut self, background: Background) {
        self.background_color = background;
    }

    pub fn set_background_image(&mut self, image: Option<String>) {
        self.background_image = image;
    }

    fn clamp_element(&self, element: &mut Element) {
        let clamped = clamp_to_canvas(element.geometry(), self.canvas_size(), MIN_ELEMENT_SIZE);
        element.set_geometry(clamped);
    }

    /// Clamp every element into the canvas. Idempotent and order independent.
    /// Returns how many elements were corrected.
    pub fn enforce_bounds(&mut self) -> usize {
        let canvas = self.canvas_size();
        let mut corrected = 0;
        for element in &mut self.elements {
            let before = element.geometry();
            let after = clamp_to_canvas(before, canvas, MIN_ELEMENT_SIZE);
            if after != before {
                element.set_geometry(after);
                corrected += 1;
            }
        }
        if corrected > 0 {
            log::debug!("boundary pass corrected {corrected} element(s)");
        }
        corrected
    }

    /// Restore invariants on a document that came from outside: drop a
    /// dangling selection, make z-indices distinct, clamp geometry.
    pub fn normalize(&mut self) {
        if let Some(id) = self.selected_element_id {
            if !self.contains(id) {
                self.selected_element_id = None;
            }
        }
        let mut seen = std::collections::HashSet::new();
        let distinct = self.elements.iter().all(|e| seen.insert(e.z_index));
        if !distinct {
            self.renumber_z_indices();
        }
        let mut ids = std::collections::HashSet::new();
        for element in &mut self.elements {
            if !ids.insert(element.id) {
                element.regenerate_id();
                ids.insert(element.id);
            }
        }
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self.enforce_bounds();
    }

    /// Replace the canvas settings and elements with a saved template.
    /// Clears the selection and the undo history.
    pub fn load_template(&mut self, template: &TemplateRecord) {
        self.elements = template.elements.clone();
        self.background_color = template.background_color;
        self.background_image = None;
        self.canvas_width = template.canvas_width;
        self.canvas_height = template.canvas_height;
        self.current_size = template.current_size.clone();
        self.selected_element_id = None;
        self.name = template.name.clone();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.normalize();
        log::info!("loaded template {} ({} elements)", template.id, self.elements.len());
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.elements.clone(),
            selected_element_id: self.selected_element_id,
            background_color: self.background_color,
            background_image: self.background_image.clone(),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            current_size: self.current_size.clone(),
        }
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.elements = snapshot.elements;
        self.selected_element_id = snapshot.selected_element_id;
        self.background_color = snapshot.background_color;
        self.background_image = snapshot.background_image;
        self.canvas_width = snapshot.canvas_width;
        self.canvas_height = snapshot.canvas_height;
        self.current_size = snapshot.current_size;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.snapshot();
            self.redo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.snapshot();
            self.undo_stack.push(current);
            self.restore(snapshot);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON, restoring invariants.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.normalize();
        Ok(doc)
    }
}
