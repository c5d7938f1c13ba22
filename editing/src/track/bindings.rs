use std::sync::Arc;
use uuid::Uuid;

use super::Track;
use super::factory::{NodeFactory, NodeFiller};
use super::track_object::TrackObject;
use crate::error::EditError;
use crate::model::field::{Timing, TimingField};

/// Track objects of one element, at most one per track.
#[derive(Debug, Default)]
pub struct TrackBindings {
    objects: Vec<TrackObject>,
}

impl TrackBindings {
    pub fn iter(&self) -> impl Iterator<Item = &TrackObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, track_id: Uuid) -> Option<&TrackObject> {
        self.objects.iter().find(|o| o.track() == Some(track_id))
    }

    pub fn get_mut(&mut self, track_id: Uuid) -> Option<&mut TrackObject> {
        self.objects.iter_mut().find(|o| o.track() == Some(track_id))
    }

    /// Creates a track object for `owner` on `track` and materializes it.
    ///
    /// On failure nothing is kept; a half-built node is destroyed with the
    /// track object.
    pub fn bind(
        &mut self,
        owner: Uuid,
        timing: &Timing,
        track: &Track,
        factory: Arc<dyn NodeFactory>,
        filler: &dyn NodeFiller,
    ) -> Result<Uuid, EditError> {
        if self.get(track.id).is_some() {
            return Err(EditError::AlreadyBound {
                element: owner,
                track: track.id,
            });
        }
        let mut object = TrackObject::new(factory);
        object.set_owning_element(Some(owner));
        object.mirror(timing);
        object.set_track(Some(track), filler)?;
        let id = object.id();
        self.objects.push(object);
        Ok(id)
    }

    /// Detaches and removes the track object on `track_id`.
    pub fn unbind(
        &mut self,
        track_id: Uuid,
        filler: &dyn NodeFiller,
    ) -> Option<TrackObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.track() == Some(track_id))?;
        let mut object = self.objects.remove(index);
        // Detaching never fails.
        let _ = object.set_track(None, filler);
        object.set_owning_element(None);
        Some(object)
    }

    /// Rejects a candidate timing the materialized nodes cannot follow.
    /// An in-point change that comes with a new duration is written as one
    /// span and never derives a duration, so it cannot underflow.
    pub fn check(&self, timing: &Timing, changed: &[TimingField]) -> Result<(), EditError> {
        if changed.contains(&TimingField::Duration) {
            return Ok(());
        }
        for object in &self.objects {
            object.check_inpoint(timing.inpoint)?;
        }
        Ok(())
    }

    /// Pushes one committed field to every track object. Objects without a
    /// node only update their shadows and pick the value up when built.
    pub fn sync(&mut self, field: TimingField, timing: &Timing) -> Result<(), EditError> {
        if field == TimingField::MaxDuration {
            return Ok(());
        }
        for object in &mut self.objects {
            if object.has_composition_node() {
                object.set(field, timing.get(field))?;
            } else {
                object.mirror(timing);
            }
        }
        Ok(())
    }

    /// Refills the node of every valid track object with new content.
    pub fn refill(&mut self, filler: &dyn NodeFiller) -> Result<(), EditError> {
        for object in &mut self.objects {
            object.refill(filler)?;
        }
        Ok(())
    }

    /// Pushes a committed in-point and duration to every track object as
    /// one span.
    pub fn sync_span(&mut self, timing: &Timing) -> Result<(), EditError> {
        for object in &mut self.objects {
            if object.has_composition_node() {
                object.set_span_internal(timing.inpoint, timing.duration)?;
            } else {
                object.mirror(timing);
            }
        }
        Ok(())
    }
}
