use std::fmt;
use uuid::Uuid;

use super::clip::Clip;
use super::effect::Effect;
use super::field::{Timing, TimingField};
use super::group::Group;
use super::property::{PropertyMap, PropertyValue};
use crate::error::EditError;
use crate::track::{Track, TrackBindings, TrackObject};

/// Capabilities every concrete element kind provides.
///
/// The base element has already short-circuited redundant writes and
/// checked the element invariants before any `apply_*` runs; a kind only
/// pushes the committed value into the backend state it keeps.
pub trait ElementKind: fmt::Debug + Send + Sync {
    fn kind_name(&self) -> &'static str;

    fn apply_start(&mut self, timing: &Timing) -> Result<(), EditError>;

    fn apply_inpoint(&mut self, timing: &Timing) -> Result<(), EditError>;

    fn apply_duration(&mut self, timing: &Timing) -> Result<(), EditError>;

    fn apply_priority(&mut self, timing: &Timing) -> Result<(), EditError>;

    /// Pushes an in-point and duration committed by the same edit.
    fn apply_span(&mut self, timing: &Timing) -> Result<(), EditError>;

    fn apply_max_duration(&mut self, _timing: &Timing) -> Result<(), EditError> {
        Ok(())
    }

    /// Kind-specific validation of a candidate timing.
    fn check_timing(&self, timing: &Timing, changed: &[TimingField]) -> Result<(), EditError> {
        self.bindings().check(timing, changed)
    }

    fn bindings(&self) -> &TrackBindings;

    /// Creates and materializes this element's track object on `track`.
    fn bind_track(&mut self, owner: Uuid, timing: &Timing, track: &Track)
    -> Result<Uuid, EditError>;

    fn unbind_track(&mut self, track_id: Uuid) -> Option<TrackObject>;

    fn child_properties(&self) -> &PropertyMap;

    /// Stores a child property and pushes it into every valid node.
    fn set_child_property(&mut self, key: &str, value: PropertyValue) -> Result<(), EditError>;

    /// Same kind and configuration, without child properties or bindings.
    fn duplicate(&self) -> Self
    where
        Self: Sized;

    /// Copies the kind-specific child properties of `self` into `target`.
    fn deep_copy(&self, target: &mut Self)
    where
        Self: Sized;
}

/// Concrete kind of a timeline element.
#[derive(Debug)]
pub enum ElementData {
    Clip(Clip),
    Effect(Effect),
    Group(Group),
}

impl ElementData {
    pub fn kind(&self) -> &dyn ElementKind {
        match self {
            ElementData::Clip(clip) => clip,
            ElementData::Effect(effect) => effect,
            ElementData::Group(group) => group,
        }
    }

    pub fn kind_mut(&mut self) -> &mut dyn ElementKind {
        match self {
            ElementData::Clip(clip) => clip,
            ElementData::Effect(effect) => effect,
            ElementData::Group(group) => group,
        }
    }

    /// Dispatches every committed field to the kind, in `APPLY_ORDER`. An
    /// in-point and duration changed together go out as one span.
    pub(crate) fn apply_all(
        &mut self,
        changed: &[TimingField],
        timing: &Timing,
    ) -> Result<(), EditError> {
        let span = changed.contains(&TimingField::Inpoint)
            && changed.contains(&TimingField::Duration);
        for field in changed {
            match field {
                TimingField::Inpoint if span => self.kind_mut().apply_span(timing)?,
                TimingField::Duration if span => {}
                _ => self.apply(*field, timing)?,
            }
        }
        Ok(())
    }

    /// Dispatches a committed field to the kind.
    pub(crate) fn apply(&mut self, field: TimingField, timing: &Timing) -> Result<(), EditError> {
        let kind = self.kind_mut();
        match field {
            TimingField::Start => kind.apply_start(timing),
            TimingField::Inpoint => kind.apply_inpoint(timing),
            TimingField::Duration => kind.apply_duration(timing),
            TimingField::Priority => kind.apply_priority(timing),
            TimingField::MaxDuration => kind.apply_max_duration(timing),
        }
    }

    pub(crate) fn duplicate(&self, deep: bool) -> ElementData {
        match self {
            ElementData::Clip(clip) => {
                let mut copy = clip.duplicate();
                if deep {
                    clip.deep_copy(&mut copy);
                }
                ElementData::Clip(copy)
            }
            ElementData::Effect(effect) => {
                let mut copy = effect.duplicate();
                if deep {
                    effect.deep_copy(&mut copy);
                }
                ElementData::Effect(copy)
            }
            ElementData::Group(group) => {
                let mut copy = group.duplicate();
                if deep {
                    group.deep_copy(&mut copy);
                }
                ElementData::Group(copy)
            }
        }
    }

    pub(crate) fn deep_copy_into(&self, target: &mut ElementData) -> Result<(), EditError> {
        match (self, target) {
            (ElementData::Clip(source), ElementData::Clip(target)) => source.deep_copy(target),
            (ElementData::Effect(source), ElementData::Effect(target)) => {
                source.deep_copy(target)
            }
            (ElementData::Group(source), ElementData::Group(target)) => source.deep_copy(target),
            (source, target) => {
                return Err(EditError::InvalidArgument(format!(
                    "Cannot deep-copy a {} into a {}",
                    source.kind().kind_name(),
                    target.kind().kind_name()
                )));
            }
        }
        Ok(())
    }
}
