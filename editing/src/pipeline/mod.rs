//! Playback side of the editing core.
//!
//! A `Pipeline` hosts one timeline. On `commit` it snapshots the valid
//! composition nodes of every track into a `CompositionGraph` and hands the
//! graph to its `PlaybackSink`.

pub mod sink;

use log::info;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::backend::{NodeField, NodeRole};
use crate::editor::handlers::read_timeline;
use crate::error::EditError;
use crate::model::time::ClockTime;
use crate::model::timeline::Timeline;
use crate::track::{TrackKind, TrackObject};
use crate::util::timing::ScopedTimer;

pub use sink::{JsonSink, PlaybackSink, RecordingSink};

/// Field values of one composition node as the backend holds them.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct NodeSnapshot {
    pub element: Option<Uuid>,
    pub track_object: Uuid,
    pub role: NodeRole,
    pub name: String,
    pub description: Option<String>,
    pub start: ClockTime,
    pub media_start: ClockTime,
    pub duration: ClockTime,
    pub media_duration: ClockTime,
    pub priority: u32,
}

impl NodeSnapshot {
    fn of(object: &TrackObject) -> Option<Self> {
        if !object.is_valid() {
            return None;
        }
        let node = object.composition_node()?;
        Some(Self {
            element: object.owning_element(),
            track_object: object.id(),
            role: node.role(),
            name: node.name().to_string(),
            description: node.content().map(|c| c.description.clone()),
            start: node.field(NodeField::Start),
            media_start: node.field(NodeField::MediaStart),
            duration: node.field(NodeField::Duration),
            media_duration: node.field(NodeField::MediaDuration),
            priority: u32::try_from(node.field(NodeField::Priority)).unwrap_or(u32::MAX),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct TrackComposition {
    pub track: Uuid,
    pub name: String,
    pub kind: TrackKind,
    /// Ordered by priority, then start.
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct CompositionGraph {
    pub timeline: String,
    pub tracks: Vec<TrackComposition>,
}

impl CompositionGraph {
    pub fn from_timeline(timeline: &Timeline) -> Self {
        let tracks = timeline
            .tracks()
            .iter()
            .map(|track| {
                let mut nodes: Vec<NodeSnapshot> = timeline
                    .elements()
                    .filter_map(|e| e.track_object(track.id))
                    .filter_map(NodeSnapshot::of)
                    .collect();
                nodes.sort_by_key(|n| (n.priority, n.start));
                TrackComposition {
                    track: track.id,
                    name: track.name.clone(),
                    kind: track.kind,
                    nodes,
                }
            })
            .collect();
        Self {
            timeline: timeline.name.clone(),
            tracks,
        }
    }

    pub fn node_count(&self) -> usize {
        self.tracks.iter().map(|t| t.nodes.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, EditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Top-level playback container for one timeline.
pub struct Pipeline<'a> {
    timeline: Option<Arc<RwLock<Timeline>>>,
    sink: Box<dyn PlaybackSink + 'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(sink: Box<dyn PlaybackSink + 'a>) -> Self {
        Self {
            timeline: None,
            sink,
        }
    }

    /// Sets the timeline to play. A pipeline hosts one timeline for its
    /// whole life.
    pub fn add_timeline(&mut self, timeline: Arc<RwLock<Timeline>>) -> Result<(), EditError> {
        if self.timeline.is_some() {
            return Err(EditError::InvalidArgument(
                "Pipeline already has a timeline".to_string(),
            ));
        }
        self.timeline = Some(timeline);
        Ok(())
    }

    pub fn timeline(&self) -> Option<&Arc<RwLock<Timeline>>> {
        self.timeline.as_ref()
    }

    /// Snapshots the composition graph and passes it to the sink.
    pub fn commit(&mut self) -> Result<CompositionGraph, EditError> {
        let timeline = self
            .timeline
            .as_ref()
            .ok_or_else(|| EditError::Runtime("Pipeline has no timeline".to_string()))?;
        let _timer = ScopedTimer::debug("Pipeline commit");
        let graph = {
            let timeline = read_timeline(timeline)?;
            CompositionGraph::from_timeline(&timeline)
        };
        info!(
            "Committing '{}': {} nodes on {} tracks",
            graph.timeline,
            graph.node_count(),
            graph.tracks.len()
        );
        self.sink.consume(&graph)?;
        Ok(graph)
    }
}
