use log::{debug, info};
use std::collections::HashMap;
use uuid::Uuid;

use super::Change;
use super::element::TimelineElement;
use crate::error::EditError;
use crate::track::Track;

/// Registry of the elements and tracks of one timeline.
///
/// Elements refer to their parent and track objects refer to their track by
/// id only; the timeline is the single owner of both.
#[derive(Debug, Default)]
pub struct Timeline {
    pub name: String,
    elements: HashMap<Uuid, TimelineElement>,
    order: Vec<Uuid>,
    tracks: Vec<Track>,
}

impl Timeline {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    // --- Tracks ---

    pub fn add_track(&mut self, track: Track) -> Uuid {
        let id = track.id;
        self.tracks.push(track);
        id
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Removes a track, dropping every track object placed on it.
    pub fn remove_track(&mut self, id: Uuid) -> Result<Track, EditError> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or(EditError::TrackNotFound(id))?;
        for element in self.elements.values_mut() {
            element.unbind_track(id);
        }
        Ok(self.tracks.remove(index))
    }

    // --- Elements ---

    pub fn add_element(&mut self, element: TimelineElement) -> Uuid {
        let id = element.id();
        debug!("Adding {} '{}' ({})", element.kind_name(), element.name(), id);
        self.order.push(id);
        self.elements.insert(id, element);
        id
    }

    /// Removes an element. Its children lose their parent; its own parent
    /// is left alone.
    pub fn remove_element(&mut self, id: Uuid) -> Result<TimelineElement, EditError> {
        let element = self
            .elements
            .remove(&id)
            .ok_or(EditError::ElementNotFound(id))?;
        self.order.retain(|other| *other != id);
        for child in self.elements.values_mut() {
            if child.parent() == Some(id) {
                // Clearing a parent cannot conflict.
                let _ = child.set_parent(None);
            }
        }
        Ok(element)
    }

    pub fn element(&self, id: Uuid) -> Option<&TimelineElement> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: Uuid) -> Option<&mut TimelineElement> {
        self.elements.get_mut(&id)
    }

    pub fn get_element(&self, id: Uuid) -> Result<&TimelineElement, EditError> {
        self.elements.get(&id).ok_or(EditError::ElementNotFound(id))
    }

    pub fn get_element_mut(&mut self, id: Uuid) -> Result<&mut TimelineElement, EditError> {
        self.elements
            .get_mut(&id)
            .ok_or(EditError::ElementNotFound(id))
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &TimelineElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TimelineElement> {
        self.elements().find(|e| e.name() == name)
    }

    // --- Parent relation ---

    /// Sets or clears the parent of `child`, rejecting unknown parents,
    /// self-parenting and cycles.
    pub fn set_parent(&mut self, child: Uuid, parent: Option<Uuid>) -> Result<Change, EditError> {
        self.get_element(child)?;
        if let Some(parent_id) = parent {
            if parent_id == child {
                return Err(EditError::InvalidParent(format!(
                    "Element {} cannot be its own parent",
                    child
                )));
            }
            self.get_element(parent_id)
                .map_err(|_| EditError::InvalidParent(format!("Parent {} not found", parent_id)))?;
            if self.ancestors(parent_id).contains(&child) {
                return Err(EditError::InvalidParent(format!(
                    "Making {} the parent of {} would create a cycle",
                    parent_id, child
                )));
            }
        }
        let change = self.get_element_mut(child)?.set_parent(parent)?;
        if change.is_applied() {
            info!("Element {} parent -> {:?}", child, parent);
        }
        Ok(change)
    }

    fn ancestors(&self, id: Uuid) -> Vec<Uuid> {
        let mut chain = Vec::new();
        let mut current = self.element(id).and_then(|e| e.parent());
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.element(parent).and_then(|e| e.parent());
        }
        chain
    }

    /// Children of `parent`, ordered by start then priority.
    pub fn children(&self, parent: Uuid) -> Vec<Uuid> {
        let mut children: Vec<&TimelineElement> = self
            .elements()
            .filter(|e| e.parent() == Some(parent))
            .collect();
        children.sort_by_key(|e| (e.start(), e.priority()));
        children.iter().map(|e| e.id()).collect()
    }

    /// Other children of the element's parent.
    pub fn siblings(&self, id: Uuid) -> Result<Vec<Uuid>, EditError> {
        let parent = self.get_element(id)?.parent().ok_or(EditError::Detached(id))?;
        Ok(self
            .children(parent)
            .into_iter()
            .filter(|other| *other != id)
            .collect())
    }

    // --- Track binding ---

    /// Places `element` on `track`, materializing its composition node.
    pub fn bind_to_track(&mut self, element: Uuid, track: Uuid) -> Result<Uuid, EditError> {
        let track = self
            .tracks
            .iter()
            .find(|t| t.id == track)
            .ok_or(EditError::TrackNotFound(track))?;
        let element = self
            .elements
            .get_mut(&element)
            .ok_or(EditError::ElementNotFound(element))?;
        element.bind_track(track)
    }

    pub fn unbind_from_track(&mut self, element: Uuid, track: Uuid) -> Result<Change, EditError> {
        let element = self.get_element_mut(element)?;
        Ok(match element.unbind_track(track) {
            Some(_) => Change::Applied,
            None => Change::Unchanged,
        })
    }

    /// Adds a copy of `id` to the timeline. The copy has no parent and no
    /// track bindings.
    pub fn copy_element(&mut self, id: Uuid, deep: bool) -> Result<Uuid, EditError> {
        let copy = self.get_element(id)?.copy(deep);
        Ok(self.add_element(copy))
    }
}
