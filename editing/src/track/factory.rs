use log::warn;
use std::fmt;

use super::track_object::TrackObject;
use crate::backend::{CompositionBackend, CompositionNode, NodeContent, NodeRole};
use crate::error::EditError;
use crate::model::property::PropertyMap;

/// Receives the node a factory hook builds.
#[derive(Default)]
pub struct NodeSlot {
    node: Option<Box<dyn CompositionNode>>,
}

impl NodeSlot {
    pub fn attach(&mut self, node: Box<dyn CompositionNode>) {
        self.node = Some(node);
    }

    pub fn is_attached(&self) -> bool {
        self.node.is_some()
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn CompositionNode>> {
        self.node.take()
    }
}

impl fmt::Debug for NodeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Per-kind hook that builds the composition node of a track object.
///
/// Returning `true` promises that `slot` holds a node; returning `false`
/// with an empty slot means the track object has no backend presence.
pub trait NodeFactory: fmt::Debug + Send + Sync {
    fn create_composition_node(
        &self,
        _object: &TrackObject,
        _backend: &dyn CompositionBackend,
        _slot: &mut NodeSlot,
    ) -> bool {
        false
    }
}

/// Factory for kinds that never take part in playback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBackendPresence;

impl NodeFactory for NoBackendPresence {}

/// Builds a node of a fixed role through the track's backend.
#[derive(Debug, Clone, Copy)]
pub struct BackendNodeFactory {
    role: NodeRole,
}

impl BackendNodeFactory {
    pub fn source() -> Self {
        Self {
            role: NodeRole::Source,
        }
    }

    pub fn operation() -> Self {
        Self {
            role: NodeRole::Operation,
        }
    }
}

impl NodeFactory for BackendNodeFactory {
    fn create_composition_node(
        &self,
        object: &TrackObject,
        backend: &dyn CompositionBackend,
        slot: &mut NodeSlot,
    ) -> bool {
        let name = format!("{:?}-{}", self.role, object.id()).to_lowercase();
        match backend.construct_node(self.role, &name) {
            Ok(node) => {
                slot.attach(node);
                true
            }
            Err(e) => {
                warn!("Backend refused node for track object {}: {}", object.id(), e);
                false
            }
        }
    }
}

/// Fill callback supplied by the element that owns a track object.
pub trait NodeFiller {
    fn fill_node(
        &self,
        object: &TrackObject,
        node: &mut dyn CompositionNode,
    ) -> Result<(), EditError>;
}

/// Fills a node with a description and the owner's child properties.
#[derive(Debug, Clone, Copy)]
pub struct ContentFiller<'a> {
    pub description: &'a str,
    pub properties: &'a PropertyMap,
}

impl NodeFiller for ContentFiller<'_> {
    fn fill_node(
        &self,
        _object: &TrackObject,
        node: &mut dyn CompositionNode,
    ) -> Result<(), EditError> {
        node.set_content(NodeContent {
            description: self.description.to_string(),
            properties: self.properties.clone(),
        })
    }
}
