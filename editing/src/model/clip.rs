use std::sync::Arc;
use uuid::Uuid;

use super::field::{Timing, TimingField};
use super::kind::ElementKind;
use super::property::{PropertyMap, PropertyValue};
use crate::error::EditError;
use crate::track::{BackendNodeFactory, ContentFiller, Track, TrackBindings, TrackObject};

/// Element playing a span of source material.
#[derive(Debug, Default)]
pub struct Clip {
    pub uri: String,
    properties: PropertyMap,
    bindings: TrackBindings,
}

impl Clip {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            ..Self::default()
        }
    }
}

impl ElementKind for Clip {
    fn kind_name(&self) -> &'static str {
        "clip"
    }

    fn apply_start(&mut self, timing: &Timing) -> Result<(), EditError> {
        self.bindings.sync(TimingField::Start, timing)
    }

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
        if self.uri.is_empty() {
            return Err(EditError::InvalidArgument(
                "Clip has no source URI to play".to_string(),
            ));
        }
        let filler = ContentFiller {
            description: &self.uri,
            properties: &self.properties,
        };
        self.bindings.bind(
            owner,
            timing,
            track,
            Arc::new(BackendNodeFactory::source()),
            &filler,
        )
    }

    fn unbind_track(&mut self, track_id: Uuid) -> Option<TrackObject> {
        let filler = ContentFiller {
            description: &self.uri,
            properties: &self.properties,
        };
        self.bindings.unbind(track_id, &filler)
    }

    fn child_properties(&self) -> &PropertyMap {
        &self.properties
    }

    fn set_child_property(&mut self, key: &str, value: PropertyValue) -> Result<(), EditError> {
        self.properties.set(key, value);
        self.bindings.refill(&ContentFiller {
            description: &self.uri,
            properties: &self.properties,
        })
    }

    fn duplicate(&self) -> Self {
        Clip::new(&self.uri)
    }

    fn deep_copy(&self, target: &mut Self) {
        target.properties = self.properties.clone();
    }
}
