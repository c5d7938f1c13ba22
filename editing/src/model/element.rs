use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::Change;
use super::clip::Clip;
use super::effect::Effect;
use super::field::{Timing, TimingField};
use super::group::Group;
use super::kind::{ElementData, ElementKind};
use super::notify::{ChangeObserver, Notification, Observers};
use super::property::{PropertyMap, PropertyValue};
use super::time::ClockTime;
use crate::error::EditError;
use crate::track::{Track, TrackBindings, TrackObject};

/// A placeable, timed entity of the timeline.
///
/// Timing is only changed through the setters below, which short-circuit
/// redundant writes, validate the resulting timing, let the concrete kind
/// push the change to its track objects, then commit and notify. A failed
/// call leaves the element and its backend state untouched.
#[derive(Debug)]
pub struct TimelineElement {
    id: Uuid,
    name: String,
    timing: Timing,
    parent: Option<Uuid>,
    data: ElementData,
    observers: Observers,
}

impl TimelineElement {
    pub fn new(name: &str, data: ElementData) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            timing: Timing::default(),
            parent: None,
            data,
            observers: Observers::default(),
        }
    }

    pub fn clip(name: &str, uri: &str) -> Self {
        Self::new(name, ElementData::Clip(Clip::new(uri)))
    }

    pub fn effect(name: &str, description: &str) -> Self {
        Self::new(name, ElementData::Effect(Effect::new(description)))
    }

    pub fn group(name: &str) -> Self {
        Self::new(name, ElementData::Group(Group::new()))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn start(&self) -> ClockTime {
        self.timing.start
    }

    pub fn inpoint(&self) -> ClockTime {
        self.timing.inpoint
    }

    pub fn duration(&self) -> ClockTime {
        self.timing.duration
    }

    pub fn max_duration(&self) -> Option<ClockTime> {
        self.timing.max_duration
    }

    pub fn priority(&self) -> u32 {
        self.timing.priority
    }

    /// `start + duration`; the invariants keep this from overflowing.
    pub fn end(&self) -> ClockTime {
        self.timing.start.saturating_add(self.timing.duration)
    }

    pub fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    pub fn data(&self) -> &ElementData {
        &self.data
    }

    pub fn kind(&self) -> &dyn ElementKind {
        self.data.kind()
    }

    pub fn kind_name(&self) -> &'static str {
        self.data.kind().kind_name()
    }

    pub fn bindings(&self) -> &TrackBindings {
        self.data.kind().bindings()
    }

    pub fn track_object(&self, track_id: Uuid) -> Option<&TrackObject> {
        self.bindings().get(track_id)
    }

    pub fn child_properties(&self) -> &PropertyMap {
        self.data.kind().child_properties()
    }

    pub fn set_child_property(
        &mut self,
        key: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), EditError> {
        self.data.kind_mut().set_child_property(key, value.into())
    }

    pub fn connect(&mut self, observer: Arc<dyn ChangeObserver>) {
        self.observers.connect(observer);
    }

    pub fn set_start(&mut self, start: ClockTime) -> Result<Change, EditError> {
        self.update(Timing { start, ..self.timing })
    }

    /// Changes the in-point without moving the start or the timeline duration;
    /// bound track objects absorb the delta in their node span.
    pub fn set_inpoint(&mut self, inpoint: ClockTime) -> Result<Change, EditError> {
        self.update(Timing {
            inpoint,
            ..self.timing
        })
    }

    pub fn set_duration(&mut self, duration: ClockTime) -> Result<Change, EditError> {
        self.update(Timing {
            duration,
            ..self.timing
        })
    }

    /// Sets the bound only. Existing in-point and duration are not clamped;
    /// if they now violate the bound, the next mutating call reports it.
    pub fn set_max_duration(
        &mut self,
        max_duration: Option<ClockTime>,
    ) -> Result<Change, EditError> {
        self.update(Timing {
            max_duration,
            ..self.timing
        })
    }

    pub fn set_priority(&mut self, priority: u32) -> Result<Change, EditError> {
        self.update(Timing {
            priority,
            ..self.timing
        })
    }

    /// Checks a candidate timing without applying it.
    pub fn check(&self, candidate: &Timing) -> Result<(), EditError> {
        let changed = self.timing.changed_fields(candidate);
        if changed.is_empty() || changed == [TimingField::MaxDuration] {
            return Ok(());
        }
        candidate.check()?;
        self.data.kind().check_timing(candidate, &changed)
    }

    /// Applies every changed field of `candidate` as one all-or-nothing step.
    pub(crate) fn update(&mut self, candidate: Timing) -> Result<Change, EditError> {
        let changed = self.timing.changed_fields(&candidate);
        if changed.is_empty() {
            return Ok(Change::Unchanged);
        }
        self.check(&candidate)?;

        self.data.apply_all(&changed, &candidate)?;
        self.timing = candidate;

        for field in changed {
            debug!(
                "Element '{}' ({}): {} -> {}",
                self.name,
                self.id,
                field,
                candidate.get(field)
            );
            self.observers.emit(Notification {
                element: self.id,
                field,
            });
        }
        Ok(Change::Applied)
    }

    /// Sets the containing element. A different parent may only be set once
    /// the current one is cleared with `None`.
    pub fn set_parent(&mut self, parent: Option<Uuid>) -> Result<Change, EditError> {
        match (self.parent, parent) {
            (current, requested) if current == requested => Ok(Change::Unchanged),
            (Some(current), Some(_)) => Err(EditError::ParentConflict {
                element: self.id,
                current,
            }),
            (_, requested) => {
                self.parent = requested;
                Ok(Change::Applied)
            }
        }
    }

    pub fn bind_track(&mut self, track: &Track) -> Result<Uuid, EditError> {
        self.data.kind_mut().bind_track(self.id, &self.timing, track)
    }

    pub fn unbind_track(&mut self, track_id: Uuid) -> Option<TrackObject> {
        self.data.kind_mut().unbind_track(track_id)
    }

    /// New element of the same kind and timing with a fresh id, no parent,
    /// no observers and no track bindings. `deep` also copies the
    /// kind-specific child properties.
    pub fn copy(&self, deep: bool) -> TimelineElement {
        TimelineElement {
            id: Uuid::new_v4(),
            name: format!("{}-copy", self.name),
            timing: self.timing,
            parent: None,
            data: self.data.duplicate(deep),
            observers: Observers::default(),
        }
    }

    /// Copies the kind-specific child properties of `source` into `target`.
    pub fn deep_copy(
        source: &TimelineElement,
        target: &mut TimelineElement,
    ) -> Result<(), EditError> {
        source.data.deep_copy_into(&mut target.data)
    }
}
