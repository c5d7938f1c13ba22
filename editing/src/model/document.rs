use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::clip::Clip;
use super::effect::Effect;
use super::element::TimelineElement;
use super::field::Timing;
use super::group::Group;
use super::kind::ElementData;
use super::property::PropertyMap;
use super::timeline::Timeline;
use crate::backend::CompositionBackend;
use crate::error::EditError;
use crate::track::{Track, TrackKind};

/// On-disk form of a timeline. Elements and tracks refer to each other by
/// name; ids are assigned on load.
///
/// Only element timing is stored. A node span that drifted from the element
/// duration through `set_inpoint` is not kept: on load every node is built
/// from the element timing again.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TimelineDocument {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<TrackDocument>,
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackDocument {
    pub name: String,
    pub kind: TrackKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElementDocument {
    pub name: String,
    #[serde(flatten)]
    pub kind: ElementKindDocument,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<String>,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    pub properties: PropertyMap,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKindDocument {
    Clip { uri: String },
    Effect { description: String },
    Group,
}

impl TimelineDocument {
    pub fn load(path: &Path) -> Result<Self, EditError> {
        let json_str = fs::read_to_string(path)?;
        Self::from_json(&json_str)
    }

    pub fn save(&self, path: &Path) -> Result<(), EditError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_json(json_str: &str) -> Result<Self, EditError> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn to_json(&self) -> Result<String, EditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Timeline {
    /// Builds a timeline from its document. Every track is backed by
    /// `backend`; elements are timed, parented and then placed on their
    /// tracks.
    pub fn from_document(
        document: &TimelineDocument,
        backend: Arc<dyn CompositionBackend>,
    ) -> Result<Self, EditError> {
        let mut timeline = Timeline::new(&document.name);

        let mut track_ids: HashMap<&str, Uuid> = HashMap::new();
        for track in &document.tracks {
            let id = timeline.add_track(Track::new(&track.name, track.kind, backend.clone()));
            track_ids.insert(track.name.as_str(), id);
        }

        let mut element_ids: HashMap<&str, Uuid> = HashMap::new();
        for doc in &document.elements {
            if element_ids.contains_key(doc.name.as_str()) {
                return Err(EditError::InvalidArgument(format!(
                    "Duplicate element name '{}'",
                    doc.name
                )));
            }
            let data = match &doc.kind {
                ElementKindDocument::Clip { uri } => ElementData::Clip(Clip::new(uri)),
                ElementKindDocument::Effect { description } => {
                    ElementData::Effect(Effect::new(description))
                }
                ElementKindDocument::Group => ElementData::Group(Group::new()),
            };
            let mut element = TimelineElement::new(&doc.name, data);
            for (key, value) in doc.properties.iter() {
                element.set_child_property(key, value.clone())?;
            }
            element.update(doc.timing)?;
            element_ids.insert(doc.name.as_str(), timeline.add_element(element));
        }

        for doc in &document.elements {
            let id = element_ids[doc.name.as_str()];
            if let Some(parent) = &doc.parent {
                let parent_id = element_ids.get(parent.as_str()).ok_or_else(|| {
                    EditError::InvalidParent(format!("Parent '{}' not found", parent))
                })?;
                timeline.set_parent(id, Some(*parent_id))?;
            }
            for track in &doc.tracks {
                let track_id = track_ids.get(track.as_str()).ok_or_else(|| {
                    EditError::InvalidArgument(format!("Track '{}' not found", track))
                })?;
                timeline.bind_to_track(id, *track_id)?;
            }
        }
        Ok(timeline)
    }

    /// Snapshot of the elements, their parents and bindings. Track object
    /// timing is derived again on load.
    pub fn to_document(&self) -> TimelineDocument {
        let tracks = self
            .tracks()
            .iter()
            .map(|t| TrackDocument {
                name: t.name.clone(),
                kind: t.kind,
            })
            .collect();

        let elements = self
            .elements()
            .map(|element| {
                let kind = match element.data() {
                    ElementData::Clip(clip) => ElementKindDocument::Clip {
                        uri: clip.uri.clone(),
                    },
                    ElementData::Effect(effect) => ElementKindDocument::Effect {
                        description: effect.description.clone(),
                    },
                    ElementData::Group(_) => ElementKindDocument::Group,
                };
                let parent = element
                    .parent()
                    .and_then(|id| self.element(id))
                    .map(|p| p.name().to_string());
                let tracks = element
                    .bindings()
                    .iter()
                    .filter_map(|o| o.track())
                    .filter_map(|id| self.track(id))
                    .map(|t| t.name.clone())
                    .collect();
                ElementDocument {
                    name: element.name().to_string(),
                    kind,
                    timing: *element.timing(),
                    parent,
                    tracks,
                    properties: element.child_properties().clone(),
                }
            })
            .collect();

        TimelineDocument {
            name: self.name.clone(),
            tracks,
            elements,
        }
    }
}
