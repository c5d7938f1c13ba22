pub mod bindings;
pub mod factory;
pub mod track_object;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::CompositionBackend;

pub use bindings::TrackBindings;
pub use factory::{BackendNodeFactory, ContentFiller, NoBackendPresence, NodeFactory, NodeFiller, NodeSlot};
pub use track_object::{InvalidReason, NodeState, TrackObject};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
        };
        write!(f, "{}", s)
    }
}

/// A track of the timeline. Its backend builds the composition nodes of the
/// track objects placed on it.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    pub kind: TrackKind,
    backend: Arc<dyn CompositionBackend>,
}

impl Track {
    pub fn new(name: &str, kind: TrackKind, backend: Arc<dyn CompositionBackend>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            backend,
        }
    }

    pub fn backend(&self) -> &Arc<dyn CompositionBackend> {
        &self.backend
    }
}
