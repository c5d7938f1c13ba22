use log::{debug, error, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::Track;
use super::factory::{NoBackendPresence, NodeFactory, NodeFiller, NodeSlot};
use crate::backend::{CompositionBackend, CompositionFieldSet, CompositionNode, NodeField};
use crate::error::EditError;
use crate::model::Change;
use crate::model::field::{Timing, TimingField};
use crate::model::time::ClockTime;

/// Why a materialization attempt left the track object invalid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InvalidReason {
    /// The factory hook reported success without attaching a node, or
    /// attached one while reporting failure.
    ContractViolation,
    /// A node is attached but its content could not be filled.
    FillFailed,
}

/// Materialization state of a track object.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeState {
    /// No attempt made yet, or reset after detaching.
    Unbound,
    /// Node attached and filled.
    Valid,
    /// The factory declined to build a node; the object does not play.
    Absent,
    Invalid(InvalidReason),
}

/// Binds one element's timing to one composition node on one track.
#[derive(Debug)]
pub struct TrackObject {
    id: Uuid,
    start: ClockTime,
    inpoint: ClockTime,
    duration: ClockTime,
    priority: u32,
    node: Option<Box<dyn CompositionNode>>,
    node_backend: Option<Arc<dyn CompositionBackend>>,
    state: NodeState,
    owner: Option<Uuid>,
    track: Option<Uuid>,
    factory: Arc<dyn NodeFactory>,
}

impl Default for TrackObject {
    fn default() -> Self {
        Self::new(Arc::new(NoBackendPresence))
    }
}

impl TrackObject {
    pub fn new(factory: Arc<dyn NodeFactory>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: 0,
            inpoint: 0,
            duration: 0,
            priority: 0,
            node: None,
            node_backend: None,
            state: NodeState::Unbound,
            owner: None,
            track: None,
            factory,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn inpoint(&self) -> ClockTime {
        self.inpoint
    }

    pub fn duration(&self) -> ClockTime {
        self.duration
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn track(&self) -> Option<Uuid> {
        self.track
    }

    pub fn owning_element(&self) -> Option<Uuid> {
        self.owner
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == NodeState::Valid
    }

    pub fn has_composition_node(&self) -> bool {
        self.node.is_some()
    }

    pub fn composition_node(&self) -> Option<&dyn CompositionNode> {
        self.node.as_deref()
    }

    /// Shadow value of a timing field as of the last sync.
    pub fn get(&self, field: TimingField) -> Result<u64, EditError> {
        match field {
            TimingField::Start => Ok(self.start),
            TimingField::Inpoint => Ok(self.inpoint),
            TimingField::Duration => Ok(self.duration),
            TimingField::Priority => Ok(u64::from(self.priority)),
            TimingField::MaxDuration => Err(EditError::InvalidArgument(
                "Track objects do not carry a max duration".to_string(),
            )),
        }
    }

    /// Writes one field through the matching internal setter.
    pub fn set(&mut self, field: TimingField, value: u64) -> Result<Change, EditError> {
        match field {
            TimingField::Start => self.set_start_internal(value),
            TimingField::Inpoint => self.set_inpoint_internal(value),
            TimingField::Duration => self.set_duration_internal(value),
            TimingField::Priority => {
                let priority = u32::try_from(value).map_err(|_| {
                    EditError::InvalidArgument(format!("Priority {} out of range", value))
                })?;
                self.set_priority_internal(priority)
            }
            TimingField::MaxDuration => Err(EditError::InvalidArgument(
                "Track objects do not carry a max duration".to_string(),
            )),
        }
    }

    fn node_mut(&mut self) -> Result<&mut (dyn CompositionNode + 'static), EditError> {
        let id = self.id;
        self.node
            .as_deref_mut()
            .ok_or(EditError::NotMaterialized(id))
    }

    pub fn set_start_internal(&mut self, start: ClockTime) -> Result<Change, EditError> {
        let current = self.start;
        let node = self.node_mut()?;
        if start == current {
            return Ok(Change::Unchanged);
        }
        CompositionFieldSet::for_start(start).apply(node);
        self.start = start;
        debug!("Track object {}: start -> {}", self.id, start);
        Ok(Change::Applied)
    }

    /// Moves the media offset while keeping the used source end fixed, so
    /// the node span grows or shrinks by the in-point delta.
    pub fn set_inpoint_internal(&mut self, inpoint: ClockTime) -> Result<Change, EditError> {
        let (current, duration) = (self.inpoint, self.duration);
        let id = self.id;
        let node = self.node_mut()?;
        if inpoint == current {
            return Ok(Change::Unchanged);
        }
        let writes = CompositionFieldSet::for_inpoint(current, inpoint, duration).ok_or(
            EditError::DurationUnderflow {
                object: id,
                inpoint,
                limit: current.saturating_add(duration),
            },
        )?;
        writes.apply(node);
        self.inpoint = inpoint;
        if let Some(derived) = writes.get(NodeField::Duration) {
            self.duration = derived;
        }
        debug!(
            "Track object {}: inpoint -> {}, duration -> {}",
            self.id, self.inpoint, self.duration
        );
        Ok(Change::Applied)
    }

    pub fn set_duration_internal(&mut self, duration: ClockTime) -> Result<Change, EditError> {
        let current = self.duration;
        let node = self.node_mut()?;
        if duration == current {
            return Ok(Change::Unchanged);
        }
        CompositionFieldSet::for_duration(duration).apply(node);
        self.duration = duration;
        debug!("Track object {}: duration -> {}", self.id, duration);
        Ok(Change::Applied)
    }

    /// Moves the in-point and sets the node span in one write. Used when an
    /// edit changes both, so no intermediate derived span is computed.
    pub fn set_span_internal(
        &mut self,
        inpoint: ClockTime,
        duration: ClockTime,
    ) -> Result<Change, EditError> {
        let current = (self.inpoint, self.duration);
        let node = self.node_mut()?;
        if (inpoint, duration) == current {
            return Ok(Change::Unchanged);
        }
        CompositionFieldSet::for_span(inpoint, duration).apply(node);
        self.inpoint = inpoint;
        self.duration = duration;
        debug!(
            "Track object {}: inpoint -> {}, duration -> {}",
            self.id, inpoint, duration
        );
        Ok(Change::Applied)
    }

    pub fn set_priority_internal(&mut self, priority: u32) -> Result<Change, EditError> {
        let current = self.priority;
        let node = self.node_mut()?;
        if priority == current {
            return Ok(Change::Unchanged);
        }
        CompositionFieldSet::for_priority(priority).apply(node);
        self.priority = priority;
        debug!("Track object {}: priority -> {}", self.id, priority);
        Ok(Change::Applied)
    }

    /// Fails if moving to `inpoint` would underflow the derived span.
    pub fn check_inpoint(&self, inpoint: ClockTime) -> Result<(), EditError> {
        if self.node.is_none() || inpoint == self.inpoint {
            return Ok(());
        }
        match CompositionFieldSet::derive_duration(self.inpoint, inpoint, self.duration) {
            Some(_) => Ok(()),
            None => Err(EditError::DurationUnderflow {
                object: self.id,
                inpoint,
                limit: self.inpoint.saturating_add(self.duration),
            }),
        }
    }

    /// Copies element timing into the shadows. Only meaningful while no node
    /// exists; a materialized object is synced through the internal setters.
    pub(crate) fn mirror(&mut self, timing: &Timing) {
        if self.node.is_some() {
            return;
        }
        self.start = timing.start;
        self.inpoint = timing.inpoint;
        self.duration = timing.duration;
        self.priority = timing.priority;
    }

    pub fn set_owning_element(&mut self, owner: Option<Uuid>) {
        self.owner = owner;
    }

    /// Reassigns the track. A new track triggers materialization; `None`
    /// detaches without destroying the node.
    pub fn set_track(
        &mut self,
        track: Option<&Track>,
        filler: &dyn NodeFiller,
    ) -> Result<(), EditError> {
        debug!("Track object {}: track -> {:?}", self.id, track.map(|t| t.id));
        self.track = track.map(|t| t.id);
        match track {
            Some(track) => self
                .ensure_composition_node(track.backend(), filler)
                .map(|_| ()),
            None => Ok(()),
        }
    }

    /// Builds and fills the composition node once.
    ///
    /// Returns `Ok(true)` when the node is valid and `Ok(false)` when the
    /// factory declined to build one. Later calls return the outcome of the
    /// first attempt without running the hook again.
    pub fn ensure_composition_node(
        &mut self,
        backend: &Arc<dyn CompositionBackend>,
        filler: &dyn NodeFiller,
    ) -> Result<bool, EditError> {
        match self.state {
            NodeState::Valid => return Ok(true),
            NodeState::Absent => return Ok(false),
            NodeState::Invalid(reason) => return Err(self.invalid_error(reason)),
            NodeState::Unbound => {}
        }

        debug!("Creating composition node for track object {}", self.id);
        let factory = Arc::clone(&self.factory);
        let mut slot = NodeSlot::default();
        let created = factory.create_composition_node(self, backend.as_ref(), &mut slot);

        let mut node = match (created, slot.take()) {
            (true, Some(node)) => node,
            (false, None) => {
                debug!("Track object {} has no backend presence", self.id);
                self.state = NodeState::Absent;
                return Ok(false);
            }
            (true, None) => {
                error!(
                    "Node factory of track object {} returned success but attached no node",
                    self.id
                );
                return Err(self.mark_invalid(InvalidReason::ContractViolation));
            }
            (false, Some(node)) => {
                error!(
                    "Node factory of track object {} attached a node but reported failure",
                    self.id
                );
                backend.destroy_node(node);
                return Err(self.mark_invalid(InvalidReason::ContractViolation));
            }
        };

        CompositionFieldSet::full(self.start, self.inpoint, self.duration, self.priority)
            .apply(node.as_mut());
        debug!("Got a composition node for {}, filling it in", self.id);
        let filled = filler.fill_node(self, node.as_mut());
        self.node = Some(node);
        self.node_backend = Some(Arc::clone(backend));

        match filled {
            Ok(()) => {
                self.state = NodeState::Valid;
                Ok(true)
            }
            Err(e) => {
                warn!("Filling composition node of {} failed: {}", self.id, e);
                Err(self.mark_invalid(InvalidReason::FillFailed))
            }
        }
    }

    /// Fills a valid node again after the owner's content changed. A failing
    /// fill leaves the object invalid, as it would on first materialization.
    pub fn refill(&mut self, filler: &dyn NodeFiller) -> Result<Change, EditError> {
        if self.state != NodeState::Valid {
            return Ok(Change::Unchanged);
        }
        let Some(mut node) = self.node.take() else {
            return Ok(Change::Unchanged);
        };
        let filled = filler.fill_node(self, node.as_mut());
        self.node = Some(node);
        match filled {
            Ok(()) => {
                debug!("Refilled composition node of {}", self.id);
                Ok(Change::Applied)
            }
            Err(e) => {
                warn!("Refilling composition node of {} failed: {}", self.id, e);
                Err(self.mark_invalid(InvalidReason::FillFailed))
            }
        }
    }

    /// Destroys a detached node and returns to `Unbound`.
    pub fn reset_composition_node(&mut self) -> Result<(), EditError> {
        if self.track.is_some() {
            return Err(EditError::StillAttached(self.id));
        }
        self.destroy_node();
        self.state = NodeState::Unbound;
        Ok(())
    }

    fn destroy_node(&mut self) {
        if let Some(node) = self.node.take() {
            match self.node_backend.take() {
                Some(backend) => backend.destroy_node(node),
                None => drop(node),
            }
        }
    }

    fn mark_invalid(&mut self, reason: InvalidReason) -> EditError {
        self.state = NodeState::Invalid(reason);
        self.invalid_error(reason)
    }

    fn invalid_error(&self, reason: InvalidReason) -> EditError {
        match reason {
            InvalidReason::ContractViolation => EditError::BackendContract(self.id),
            InvalidReason::FillFailed => EditError::FillFailed(self.id),
        }
    }
}

impl Drop for TrackObject {
    fn drop(&mut self) {
        self.destroy_node();
    }
}
