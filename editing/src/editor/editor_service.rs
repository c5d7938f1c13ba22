use crate::backend::CompositionBackend;
use crate::editor::handlers::edit_handler::{EditHandler, EditMode};
use crate::editor::handlers::element_handler::ElementHandler;
use crate::editor::handlers::track_handler::TrackHandler;
use crate::editor::handlers::{read_timeline, write_timeline};
use crate::error::EditError;
use crate::model::document::TimelineDocument;
use crate::model::edit::EditPlan;
use crate::model::element::TimelineElement;
use crate::model::field::{Timing, TimingField};
use crate::model::notify::ChangeObserver;
use crate::model::property::PropertyValue;
use crate::model::time::ClockTime;
use crate::model::timeline::Timeline;
use crate::model::Change;
use crate::track::{NodeState, TrackKind};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Shared entry point for editing one timeline. Every call takes the
/// timeline lock for exactly one operation.
#[derive(Clone)]
pub struct EditorService {
    timeline: Arc<RwLock<Timeline>>,
    backend: Arc<dyn CompositionBackend>,
}

impl EditorService {
    pub fn new(timeline: Timeline, backend: Arc<dyn CompositionBackend>) -> Self {
        Self {
            timeline: Arc::new(RwLock::new(timeline)),
            backend,
        }
    }

    pub fn from_document(
        document: &TimelineDocument,
        backend: Arc<dyn CompositionBackend>,
    ) -> Result<Self, EditError> {
        let timeline = Timeline::from_document(document, backend.clone())?;
        Ok(Self::new(timeline, backend))
    }

    pub fn timeline(&self) -> Arc<RwLock<Timeline>> {
        self.timeline.clone()
    }

    /// Access the timeline immutably via a closure.
    pub fn with_timeline<R>(&self, f: impl FnOnce(&Timeline) -> R) -> Result<R, EditError> {
        let guard = read_timeline(&self.timeline)?;
        Ok(f(&guard))
    }

    /// Access the timeline mutably via a closure.
    pub fn with_timeline_mut<R>(
        &self,
        f: impl FnOnce(&mut Timeline) -> R,
    ) -> Result<R, EditError> {
        let mut guard = write_timeline(&self.timeline)?;
        Ok(f(&mut guard))
    }

    pub fn to_document(&self) -> Result<TimelineDocument, EditError> {
        self.with_timeline(|tl| tl.to_document())
    }

    /// Resolve an element by name
    pub fn find_element(&self, name: &str) -> Result<Uuid, EditError> {
        self.with_timeline(|tl| tl.find_by_name(name).map(|e| e.id()))?
            .ok_or_else(|| EditError::InvalidArgument(format!("No element named '{}'", name)))
    }

    // --- Tracks ---

    pub fn add_track(&self, name: &str, kind: TrackKind) -> Result<Uuid, EditError> {
        TrackHandler::add_track(&self.timeline, name, kind, self.backend.clone())
    }

    pub fn remove_track(&self, track_id: Uuid) -> Result<(), EditError> {
        TrackHandler::remove_track(&self.timeline, track_id)
    }

    pub fn bind_to_track(&self, element_id: Uuid, track_id: Uuid) -> Result<Uuid, EditError> {
        TrackHandler::bind(&self.timeline, element_id, track_id)
    }

    pub fn unbind_from_track(&self, element_id: Uuid, track_id: Uuid) -> Result<Change, EditError> {
        TrackHandler::unbind(&self.timeline, element_id, track_id)
    }

    pub fn node_state(
        &self,
        element_id: Uuid,
        track_id: Uuid,
    ) -> Result<Option<NodeState>, EditError> {
        TrackHandler::node_state(&self.timeline, element_id, track_id)
    }

    // --- Elements ---

    pub fn add_clip(
        &self,
        name: &str,
        uri: &str,
        timing: Timing,
        parent: Option<Uuid>,
    ) -> Result<Uuid, EditError> {
        self.add_element(TimelineElement::clip(name, uri), timing, parent)
    }

    pub fn add_effect(
        &self,
        name: &str,
        description: &str,
        timing: Timing,
        parent: Option<Uuid>,
    ) -> Result<Uuid, EditError> {
        self.add_element(TimelineElement::effect(name, description), timing, parent)
    }

    pub fn add_group(&self, name: &str, timing: Timing) -> Result<Uuid, EditError> {
        self.add_element(TimelineElement::group(name), timing, None)
    }

    fn add_element(
        &self,
        mut element: TimelineElement,
        timing: Timing,
        parent: Option<Uuid>,
    ) -> Result<Uuid, EditError> {
        element.update(timing)?;
        ElementHandler::add_element(&self.timeline, element, parent)
    }

    pub fn remove_element(&self, element_id: Uuid) -> Result<(), EditError> {
        ElementHandler::remove_element(&self.timeline, element_id).map(|_| ())
    }

    pub fn get_timing(&self, element_id: Uuid) -> Result<Timing, EditError> {
        ElementHandler::get_timing(&self.timeline, element_id)
    }

    pub fn set_field(
        &self,
        element_id: Uuid,
        field: TimingField,
        value: u64,
    ) -> Result<Change, EditError> {
        ElementHandler::set_field(&self.timeline, element_id, field, value)
    }

    pub fn set_parent(&self, element_id: Uuid, parent: Option<Uuid>) -> Result<Change, EditError> {
        ElementHandler::set_parent(&self.timeline, element_id, parent)
    }

    pub fn set_child_property(
        &self,
        element_id: Uuid,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), EditError> {
        ElementHandler::set_child_property(&self.timeline, element_id, key, value)
    }

    pub fn copy_element(&self, element_id: Uuid, deep: bool) -> Result<Uuid, EditError> {
        ElementHandler::copy_element(&self.timeline, element_id, deep)
    }

    pub fn connect(
        &self,
        element_id: Uuid,
        observer: Arc<dyn ChangeObserver>,
    ) -> Result<(), EditError> {
        let mut tl = write_timeline(&self.timeline)?;
        tl.get_element_mut(element_id)?.connect(observer);
        Ok(())
    }

    // --- Edits ---

    pub fn preview_edit(
        &self,
        mode: EditMode,
        element_id: Uuid,
        position: ClockTime,
    ) -> Result<EditPlan, EditError> {
        EditHandler::preview(&self.timeline, mode, element_id, position)
    }

    pub fn edit(
        &self,
        mode: EditMode,
        element_id: Uuid,
        position: ClockTime,
    ) -> Result<Change, EditError> {
        EditHandler::apply(&self.timeline, mode, element_id, position)
    }
}
