//! Scene document
//!
//! The ordered list of shapes plus the current selection. Every mutation
//! bumps `version` (the viewport cache keys on it) and is broadcast to
//! subscribed listeners.

mod display;

pub use display::{shape_icon, short_id};

use shared::{
    ShapeId, ShapeObject, ShapePatch, ShapeType, DEFAULT_COLOR, PALETTE_POSITION, UNIT_SCALE,
    ZERO_ROTATION,
};

/// Notification sent to listeners after a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Added(ShapeId),
    AddedMany(Vec<ShapeId>),
    Removed(ShapeId),
    Updated(ShapeId),
    SelectionChanged(Option<ShapeId>),
    Cleared,
}

/// Handle for a registered listener, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

type Listener = Box<dyn FnMut(&SceneEvent)>;

/// Scene document with selection and change notification
#[derive(Default)]
pub struct SceneState {
    objects: Vec<ShapeObject>,
    selected_id: Option<ShapeId>,
    /// Monotonically increasing version counter for cache invalidation
    version: u64,
    listeners: Vec<(ListenerHandle, Listener)>,
    next_handle: u64,
}

/// Fresh random shape id
pub fn new_shape_id() -> ShapeId {
    uuid::Uuid::new_v4().to_string()
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn objects(&self) -> &[ShapeObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ShapeObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&ShapeObject> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    /// Append a shape. A colliding id is replaced by a fresh one so ids
    /// stay unique; the id actually stored is returned.
    pub fn add(&mut self, shape: ShapeObject) -> ShapeId {
        let id = self.push(shape);
        self.bump(SceneEvent::Added(id.clone()));
        id
    }

    /// Append several shapes in order, with a single notification
    pub fn add_many(&mut self, shapes: Vec<ShapeObject>) -> Vec<ShapeId> {
        if shapes.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ShapeId> = shapes.into_iter().map(|s| self.push(s)).collect();
        self.bump(SceneEvent::AddedMany(ids.clone()));
        ids
    }

    /// Remove a shape; unknown ids are ignored. Removing the selected shape
    /// clears the selection.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id == id) else {
            return false;
        };
        let removed = self.objects.remove(index);
        let was_selected = self.selected_id.as_deref() == Some(id);
        if was_selected {
            self.selected_id = None;
        }
        self.bump(SceneEvent::Removed(removed.id));
        if was_selected {
            self.notify(SceneEvent::SelectionChanged(None));
        }
        true
    }

    /// Merge the fields present in `patch`; unknown ids are ignored.
    /// Values are stored as given.
    pub fn update(&mut self, id: &str, patch: &ShapePatch) -> bool {
        let Some(shape) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        shape.apply(patch);
        self.bump(SceneEvent::Updated(id.to_string()));
        true
    }

    /// Change the selection. An id that is not in the scene leaves the
    /// selection untouched.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if !self.contains(id) {
                tracing::debug!("Ignoring selection of unknown shape {id}");
                return false;
            }
        }
        if self.selected_id.as_deref() == id {
            return true;
        }
        self.selected_id = id.map(str::to_string);
        self.bump(SceneEvent::SelectionChanged(self.selected_id.clone()));
        true
    }

    /// Insert a palette shape at the default pose and select it
    pub fn add_from_palette(&mut self, kind: ShapeType) -> ShapeId {
        let shape = ShapeObject {
            id: new_shape_id(),
            kind,
            position: PALETTE_POSITION,
            rotation: ZERO_ROTATION,
            scale: UNIT_SCALE,
            color: DEFAULT_COLOR.to_string(),
            name: format!("{} #{}", kind.title(), self.objects.len() + 1),
        };
        let id = self.add(shape);
        self.select(Some(&id));
        tracing::info!("Added {kind} from palette ({})", short_id(&id));
        id
    }

    /// Copy a shape one unit along X and select the copy
    pub fn duplicate(&mut self, id: &str) -> Option<ShapeId> {
        let mut copy = self.get(id)?.clone();
        copy.id = new_shape_id();
        copy.name = format!("{} (copy)", copy.name);
        copy.position[0] += 1.0;
        let new_id = self.add(copy);
        self.select(Some(&new_id));
        Some(new_id)
    }

    /// Empty the document and the selection
    pub fn clear(&mut self) {
        if self.objects.is_empty() && self.selected_id.is_none() {
            return;
        }
        self.objects.clear();
        self.selected_id = None;
        self.bump(SceneEvent::Cleared);
    }

    /// Register a listener called synchronously after every mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&SceneEvent) + 'static) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    fn push(&mut self, mut shape: ShapeObject) -> ShapeId {
        if shape.id.is_empty() || self.contains(&shape.id) {
            let fresh = new_shape_id();
            tracing::warn!("Shape id {:?} already in scene, re-keyed to {fresh}", shape.id);
            shape.id = fresh;
        }
        let id = shape.id.clone();
        self.objects.push(shape);
        id
    }

    fn bump(&mut self, event: SceneEvent) {
        self.version += 1;
        self.notify(event);
    }

    fn notify(&mut self, event: SceneEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shape(id: &str) -> ShapeObject {
        ShapeObject {
            id: id.to_string(),
            kind: ShapeType::Box,
            position: [0.0, 0.0, 0.0],
            rotation: ZERO_ROTATION,
            scale: UNIT_SCALE,
            color: DEFAULT_COLOR.to_string(),
            name: id.to_string(),
        }
    }

    #[test]
    fn test_add_preserves_order() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.add(shape("b"));
        let ids: Vec<_> = scene.objects().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(scene.version(), 2);
    }

    #[test]
    fn test_add_rekeys_duplicate_id() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        let id = scene.add(shape("a"));
        assert_ne!(id, "a");
        assert_eq!(scene.len(), 2);
        assert!(scene.get(&id).is_some());
    }

    #[test]
    fn test_add_many_single_event() {
        let mut scene = SceneState::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        scene.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let ids = scene.add_many(vec![shape("a"), shape("b")]);
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            *events.borrow(),
            vec![SceneEvent::AddedMany(vec!["a".into(), "b".into()])]
        );
        assert!(scene.add_many(Vec::new()).is_empty());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.add(shape("b"));
        scene.select(Some("a"));
        assert!(scene.remove("a"));
        assert_eq!(scene.selected_id(), None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.add(shape("b"));
        scene.select(Some("a"));
        scene.remove("b");
        assert_eq!(scene.selected_id(), Some("a"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        let version = scene.version();
        assert!(!scene.remove("zzz"));
        assert_eq!(scene.version(), version);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        assert!(scene.update("a", &ShapePatch::color("#ff0000")));
        let a = scene.get("a").unwrap();
        assert_eq!(a.color, "#ff0000");
        assert_eq!(a.name, "a");
        assert!(!scene.update("missing", &ShapePatch::name("x")));
    }

    #[test]
    fn test_update_stores_values_verbatim() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.update("a", &ShapePatch::pose([0.0; 3], [0.0; 3], [0.0, -1.0, 2.0]));
        assert_eq!(scene.get("a").unwrap().scale, [0.0, -1.0, 2.0]);
    }

    #[test]
    fn test_select_missing_is_ignored() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.select(Some("a"));
        assert!(!scene.select(Some("ghost")));
        assert_eq!(scene.selected_id(), Some("a"));
        assert!(scene.select(None));
        assert_eq!(scene.selected_id(), None);
    }

    #[test]
    fn test_add_from_palette() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.add(shape("b"));
        let id = scene.add_from_palette(ShapeType::TorusKnot);
        let obj = scene.get(&id).unwrap();
        assert_eq!(obj.name, "TorusKnot #3");
        assert_eq!(obj.position, [0.0, 0.5, 0.0]);
        assert_eq!(obj.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(obj.scale, [1.0, 1.0, 1.0]);
        assert_eq!(obj.color, "#6366f1");
        assert_eq!(scene.selected_id(), Some(id.as_str()));
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_duplicate() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        let copy = scene.duplicate("a").unwrap();
        let obj = scene.get(&copy).unwrap();
        assert_eq!(obj.name, "a (copy)");
        assert_eq!(obj.position, [1.0, 0.0, 0.0]);
        assert_eq!(scene.selected_id(), Some(copy.as_str()));
        assert!(scene.duplicate("missing").is_none());
    }

    #[test]
    fn test_clear() {
        let mut scene = SceneState::new();
        scene.add(shape("a"));
        scene.select(Some("a"));
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_listener_events_and_unsubscribe() {
        let mut scene = SceneState::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let handle = scene.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        scene.add(shape("a"));
        scene.select(Some("a"));
        scene.remove("a");
        assert_eq!(
            *events.borrow(),
            vec![
                SceneEvent::Added("a".into()),
                SceneEvent::SelectionChanged(Some("a".into())),
                SceneEvent::Removed("a".into()),
                SceneEvent::SelectionChanged(None),
            ]
        );

        assert!(scene.unsubscribe(handle));
        scene.add(shape("b"));
        assert_eq!(events.borrow().len(), 4);
    }
}
