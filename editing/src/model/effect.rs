use std::sync::Arc;
use uuid::Uuid;

use super::field::{Timing, TimingField};
use super::kind::ElementKind;
use super::property::{PropertyMap, PropertyValue};
use crate::error::EditError;
use crate::track::{BackendNodeFactory, ContentFiller, Track, TrackBindings, TrackObject};

/// Element processing whatever plays below it, e.g. `"agingtv"` or
/// `"videobalance saturation=0"`.
#[derive(Debug, Default)]
pub struct Effect {
    pub description: String,
    parameters: PropertyMap,
    bindings: TrackBindings,
}

impl Effect {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn parameter(&self, key: &str) -> Option<&PropertyValue> {
        self.parameters.get(key)
    }
}

impl ElementKind for Effect {
    fn kind_name(&self) -> &'static str {
        "effect"
    }

    fn apply_start(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.bindings.sync(TimingField::Start, timing)
    }

    // Operations have no media offset of their own, but the node still
    // tracks it so trims keep the same span on every kind.
    fn apply_inpoint(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.bindings.sync(TimingField::Inpoint, timing)
    }

    fn apply_duration(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.bindings.sync(TimingField::Duration, timing)
    }

    fn apply_span(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.bindings.sync_span(timing)
    }

    fn apply_priority(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.bindings.sync(TimingField::Priority, timing)
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
            description: &self.description,
            properties: &self.parameters,
        };
        self.bindings.bind(
            owner,
            timing,
            track,
            Arc::new(BackendNodeFactory::operation()),
            &filler,
        )
    }

    fn unbind_track(&mut self, track_id: Uuid) -> Option<TrackObject> {
        let filler = ContentFiller {
            description: &self.description,
            properties: &self.parameters,
        };
        self.bindings.unbind(track_id, &filler)
    }

    fn child_properties(&self) -> &PropertyMap {
        &self.parameters
    }

    fn set_child_property(&mut self, key: &str, value: PropertyValue) -> Result<(), EditError> {
        self.parameters.set(key, value);
        self.bindings.refill(&ContentFiller {
            description: &self.description,
            properties: &self.parameters,
        })
    }

    fn duplicate(&self) -> Self {
        Effect::new(&self.description)
    }

    fn deep_copy(&self, target: &mut Self) {
        target.parameters = self.parameters.clone();
    }
}
