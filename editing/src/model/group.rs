use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use super::field::{Timing, TimingField};
use super::kind::ElementKind;
use super::property::{PropertyMap, PropertyValue};
use crate::error::EditError;
use crate::track::{ContentFiller, NoBackendPresence, Track, TrackBindings, TrackObject};

/// Container element. Its children are the elements whose parent it is;
/// ripple and roll operate among them. A group never plays by itself, so
/// its track objects stay without a composition node.
#[derive(Debug, Default)]
pub struct Group {
    properties: PropertyMap,
    bindings: TrackBindings,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync(&mut self, field: TimingField, timing: &Timing) -> Result<(), EditError> {
        debug!("Group: {} -> {}", field, timing.get(field));
        self.bindings.sync(field, timing)
    }
}

impl ElementKind for Group {
    fn kind_name(&self) -> &'static str {
        "group"
    }

    fn apply_start(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.sync(TimingField::Start, timing)
    }

    fn apply_inpoint(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.sync(TimingField::Inpoint, timing)
    }

    fn apply_duration(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.sync(TimingField::Duration, timing)
    }

    fn apply_span(&mut self, timing: &Timing) -> Result<(), EditError> {
        debug!("Group: span -> {}+{}", timing.inpoint, timing.duration);
        self.bindings.sync_span(timing)
    }

    fn apply_priority(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.sync(TimingField::Priority, timing)
    }

    fn bindings(&self) -> &TrackBindings {
        &self.bindings
    }

    fn bind_track(
        &mut self,
        owner: Uuid,
        timing: &Timing,
        track: &Track,
    ) -> Result<Uuid, EditError> {
        let filler = ContentFiller {
            description: "",
            properties: &self.properties,
        };
        self.bindings
            .bind(owner, timing, track, Arc::new(NoBackendPresence), &filler)
    }

    fn unbind_track(&mut self, track_id: Uuid) -> Option<TrackObject> {
        let filler = ContentFiller {
            description: "",
            properties: &self.properties,
        };
        self.bindings.unbind(track_id, &filler)
    }

    fn child_properties(&self) -> &PropertyMap {
        &self.properties
    }

    // Group track objects never hold a node, so there is nothing to refill.
    fn set_child_property(&mut self, key: &str, value: PropertyValue) -> Result<(), EditError> {
        self.properties.set(key, value);
        Ok(())
    }

    fn duplicate(&self) -> Self {
        Group::new()
    }

    fn deep_copy(&self, target: &mut Self) {
        target.properties = self.properties.clone();
    }
}
