//! Composition backend seam.
//!
//! The editing core never looks inside a composition node. It only writes
//! the five timing fields, hands the node content to fill, and asks the
//! backend to construct and destroy nodes.

pub mod field_set;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EditError;
use crate::model::property::PropertyMap;

pub use field_set::CompositionFieldSet;
pub use memory::{MemoryBackend, MemoryNode, NodeWrite};

/// Settable timing fields of a composition node.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum NodeField {
    Start,
    /// Offset into the source material.
    MediaStart,
    Duration,
    MediaDuration,
    Priority,
}

impl NodeField {
    pub const ALL: [NodeField; 5] = [
        NodeField::Start,
        NodeField::MediaStart,
        NodeField::Duration,
        NodeField::MediaDuration,
        NodeField::Priority,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeField::Start => "start",
            NodeField::MediaStart => "media-start",
            NodeField::Duration => "duration",
            NodeField::MediaDuration => "media-duration",
            NodeField::Priority => "priority",
        }
    }
}

impl fmt::Display for NodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a node contributes to its track's composition.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Plays source material.
    Source,
    /// Processes the output of the nodes below it.
    Operation,
}

/// Backend-specific content placed into a node by its fill callback.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct NodeContent {
    /// Source URI for source nodes, processing description for operations.
    pub description: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// Opaque backend object representing one element's contribution to a track.
pub trait CompositionNode: fmt::Debug + Send + Sync {
    fn role(&self) -> NodeRole;

    fn name(&self) -> &str;

    fn set_field(&mut self, field: NodeField, value: u64);

    fn field(&self, field: NodeField) -> u64;

    fn set_content(&mut self, content: NodeContent) -> Result<(), EditError>;

    fn content(&self) -> Option<&NodeContent>;
}

pub trait CompositionBackend: fmt::Debug + Send + Sync {
    fn construct_node(
        &self,
        role: NodeRole,
        name: &str,
    ) -> Result<Box<dyn CompositionNode>, EditError>;

    fn destroy_node(&self, node: Box<dyn CompositionNode>) {
        drop(node);
    }
}
