use crate::backend::CompositionBackend;
use crate::editor::handlers::{read_timeline, write_timeline};
use crate::error::EditError;
use crate::model::timeline::Timeline;
use crate::model::Change;
use crate::track::{NodeState, Track, TrackKind};
use log::info;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub struct TrackHandler;

impl TrackHandler {
    pub fn add_track(
        timeline: &Arc<RwLock<Timeline>>,
        name: &str,
        kind: TrackKind,
        backend: Arc<dyn CompositionBackend>,
    ) -> Result<Uuid, EditError> {
        let mut tl = write_timeline(timeline)?;
        let track_id = tl.add_track(Track::new(name, kind, backend));
        info!("Added {} track '{}' ({})", kind, name, track_id);
        Ok(track_id)
    }

    /// Remove a track, detaching every element placed on it
    pub fn remove_track(
        timeline: &Arc<RwLock<Timeline>>,
        track_id: Uuid,
    ) -> Result<(), EditError> {
        let mut tl = write_timeline(timeline)?;
        let track = tl.remove_track(track_id)?;
        info!("Removed track '{}' ({})", track.name, track_id);
        Ok(())
    }

    /// Place an element on a track; returns the new track object's id
    pub fn bind(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        track_id: Uuid,
    ) -> Result<Uuid, EditError> {
        let mut tl = write_timeline(timeline)?;
        let object_id = tl.bind_to_track(element_id, track_id)?;
        info!(
            "Element {} placed on track {} as {}",
            element_id, track_id, object_id
        );
        Ok(object_id)
    }

    pub fn unbind(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        track_id: Uuid,
    ) -> Result<Change, EditError> {
        let mut tl = write_timeline(timeline)?;
        tl.unbind_from_track(element_id, track_id)
    }

    pub fn node_state(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        track_id: Uuid,
    ) -> Result<Option<NodeState>, EditError> {
        let tl = read_timeline(timeline)?;
        Ok(tl
            .get_element(element_id)?
            .track_object(track_id)
            .map(|o| o.state()))
    }
}
