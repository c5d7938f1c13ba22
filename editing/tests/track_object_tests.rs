//! Track object materialization and node synchronization.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use editing::backend::{
    CompositionBackend, CompositionNode, MemoryBackend, NodeField, NodeRole,
};
use editing::model::{PropertyMap, PropertyValue, Timeline, TimelineElement};
use editing::track::{
    BackendNodeFactory, ContentFiller, InvalidReason, NoBackendPresence, NodeFactory,
    NodeFiller, NodeSlot, NodeState, Track, TrackKind, TrackObject,
};
use editing::{Change, EditError, TimingField};

fn video_track(backend: &Arc<MemoryBackend>) -> Track {
    Track::new("v1", TrackKind::Video, backend.clone())
}

fn node_field(object: &TrackObject, field: NodeField) -> u64 {
    object.composition_node().map(|n| n.field(field)).unwrap()
}

/// Claims success without ever attaching a node.
#[derive(Debug, Default)]
struct EmptyHandedFactory {
    calls: AtomicUsize,
}

impl NodeFactory for EmptyHandedFactory {
    fn create_composition_node(
        &self,
        _object: &TrackObject,
        _backend: &dyn CompositionBackend,
        _slot: &mut NodeSlot,
    ) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Attaches a node and then reports failure.
#[derive(Debug)]
struct RecantingFactory;

impl NodeFactory for RecantingFactory {
    fn create_composition_node(
        &self,
        _object: &TrackObject,
        backend: &dyn CompositionBackend,
        slot: &mut NodeSlot,
    ) -> bool {
        if let Ok(node) = backend.construct_node(NodeRole::Source, "recanted") {
            slot.attach(node);
        }
        false
    }
}

/// Builds a source node and counts how often it was asked to.
#[derive(Debug, Default)]
struct CountingFactory {
    calls: AtomicUsize,
}

impl NodeFactory for CountingFactory {
    fn create_composition_node(
        &self,
        object: &TrackObject,
        backend: &dyn CompositionBackend,
        slot: &mut NodeSlot,
    ) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        BackendNodeFactory::source().create_composition_node(object, backend, slot)
    }
}

#[derive(Default)]
struct CountingFiller {
    calls: AtomicUsize,
}

impl NodeFiller for CountingFiller {
    fn fill_node(
        &self,
        _object: &TrackObject,
        _node: &mut dyn CompositionNode,
    ) -> Result<(), EditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingFiller;

impl NodeFiller for FailingFiller {
    fn fill_node(
        &self,
        _object: &TrackObject,
        _node: &mut dyn CompositionNode,
    ) -> Result<(), EditError> {
        Err(EditError::Backend("no decoder".to_string()))
    }
}

#[test]
fn test_internal_setter_needs_a_node() {
    let backend = MemoryBackend::new();
    let track = video_track(&backend);
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "file:///a.mov",
        properties: &properties,
    };
    let mut object = TrackObject::new(Arc::new(BackendNodeFactory::source()));

    assert!(matches!(
        object.set_start_internal(20),
        Err(EditError::NotMaterialized(_))
    ));
    assert_eq!(object.start(), 0);
    assert_eq!(backend.write_count(), 0);

    object.set_track(Some(&track), &filler).unwrap();
    assert!(object.is_valid());
    assert_eq!(object.set_start_internal(20).unwrap(), Change::Applied);
    assert_eq!(object.start(), 20);
    assert_eq!(node_field(&object, NodeField::Start), 20);
    assert_eq!(
        object.composition_node().and_then(|n| n.content()).map(|c| c.description.as_str()),
        Some("file:///a.mov")
    );
}

#[test]
fn test_materialization_runs_once() {
    let backend = MemoryBackend::new();
    let dyn_backend: Arc<dyn CompositionBackend> = backend.clone();
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "file:///a.mov",
        properties: &properties,
    };
    let mut object = TrackObject::new(Arc::new(BackendNodeFactory::source()));

    assert!(object.ensure_composition_node(&dyn_backend, &filler).unwrap());
    assert!(object.ensure_composition_node(&dyn_backend, &filler).unwrap());
    assert_eq!(backend.constructed(), 1);
    assert_eq!(object.state(), NodeState::Valid);
}

#[test]
fn test_factory_and_filler_run_once_for_a_valid_node() {
    let backend = MemoryBackend::new();
    let dyn_backend: Arc<dyn CompositionBackend> = backend.clone();
    let factory = Arc::new(CountingFactory::default());
    let filler = CountingFiller::default();
    let mut object = TrackObject::new(factory.clone());

    assert!(object.ensure_composition_node(&dyn_backend, &filler).unwrap());
    assert!(object.ensure_composition_node(&dyn_backend, &filler).unwrap());

    assert_eq!(object.state(), NodeState::Valid);
    assert_eq!(factory.calls.load(Ordering::SeqCst), 1);
    assert_eq!(filler.calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.constructed(), 1);
}

#[test]
fn test_success_without_node_is_a_contract_violation() {
    let backend = MemoryBackend::new();
    let dyn_backend: Arc<dyn CompositionBackend> = backend.clone();
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "file:///a.mov",
        properties: &properties,
    };
    let factory = Arc::new(EmptyHandedFactory::default());
    let mut object = TrackObject::new(factory.clone());

    assert!(matches!(
        object.ensure_composition_node(&dyn_backend, &filler),
        Err(EditError::BackendContract(_))
    ));
    assert_eq!(
        object.state(),
        NodeState::Invalid(InvalidReason::ContractViolation)
    );
    assert!(!object.has_composition_node());

    // The recorded outcome is returned without running the hook again.
    assert!(object.ensure_composition_node(&dyn_backend, &filler).is_err());
    assert_eq!(factory.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_node_attached_on_failure_is_destroyed() {
    let backend = MemoryBackend::new();
    let dyn_backend: Arc<dyn CompositionBackend> = backend.clone();
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "file:///a.mov",
        properties: &properties,
    };
    let mut object = TrackObject::new(Arc::new(RecantingFactory));

    assert!(matches!(
        object.ensure_composition_node(&dyn_backend, &filler),
        Err(EditError::BackendContract(_))
    ));
    assert_eq!(backend.constructed(), 1);
    assert_eq!(backend.destroyed(), 1);
    assert!(!object.has_composition_node());
}

#[test]
fn test_fill_failure_leaves_object_invalid() {
    let backend = MemoryBackend::new();
    let dyn_backend: Arc<dyn CompositionBackend> = backend.clone();
    let mut object = TrackObject::new(Arc::new(BackendNodeFactory::source()));

    assert!(matches!(
        object.ensure_composition_node(&dyn_backend, &FailingFiller),
        Err(EditError::FillFailed(_))
    ));
    assert_eq!(object.state(), NodeState::Invalid(InvalidReason::FillFailed));
    assert!(object.has_composition_node());
    assert!(!object.is_valid());
}

#[test]
fn test_declining_factory_means_no_backend_presence() {
    let backend = MemoryBackend::new();
    let track = video_track(&backend);
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "",
        properties: &properties,
    };
    let mut object = TrackObject::new(Arc::new(NoBackendPresence));

    object.set_track(Some(&track), &filler).unwrap();
    assert_eq!(object.state(), NodeState::Absent);
    assert!(!object.has_composition_node());
    assert!(matches!(
        object.set_priority_internal(2),
        Err(EditError::NotMaterialized(_))
    ));
    assert_eq!(backend.constructed(), 0);
}

#[test]
fn test_refusing_backend_leaves_object_without_node() {
    let backend = MemoryBackend::refusing();
    let track = video_track(&backend);
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "file:///a.mov",
        properties: &properties,
    };
    let mut object = TrackObject::new(Arc::new(BackendNodeFactory::source()));

    object.set_track(Some(&track), &filler).unwrap();
    assert_eq!(object.state(), NodeState::Absent);
}

#[test]
fn test_reset_requires_detach_and_destroys_node() {
    let backend = MemoryBackend::new();
    let track = video_track(&backend);
    let properties = PropertyMap::new();
    let filler = ContentFiller {
        description: "file:///a.mov",
        properties: &properties,
    };
    let mut object = TrackObject::new(Arc::new(BackendNodeFactory::source()));
    object.set_track(Some(&track), &filler).unwrap();

    assert!(matches!(
        object.reset_composition_node(),
        Err(EditError::StillAttached(_))
    ));
    assert!(object.has_composition_node());

    object.set_track(None, &filler).unwrap();
    assert!(object.has_composition_node());
    object.reset_composition_node().unwrap();
    assert!(!object.has_composition_node());
    assert_eq!(object.state(), NodeState::Unbound);
    assert_eq!(backend.destroyed(), 1);

    // A fresh attempt builds a new node.
    object.set_track(Some(&track), &filler).unwrap();
    assert!(object.is_valid());
    assert_eq!(backend.constructed(), 2);

    drop(object);
    assert_eq!(backend.destroyed(), 2);
}

#[test]
fn test_inpoint_change_moves_node_span() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    let clip = timeline.add_element(TimelineElement::clip("a", "file:///a.mov"));
    {
        let clip = timeline.get_element_mut(clip).unwrap();
        clip.set_inpoint(10).unwrap();
        clip.set_duration(50).unwrap();
    }
    timeline.bind_to_track(clip, track).unwrap();

    timeline.get_element_mut(clip).unwrap().set_inpoint(5).unwrap();
    let element = timeline.element(clip).unwrap();
    let object = element.track_object(track).unwrap();
    assert_eq!(element.duration(), 50);
    assert_eq!(object.inpoint(), 5);
    assert_eq!(object.duration(), 55);
    assert_eq!(node_field(object, NodeField::MediaStart), 5);
    assert_eq!(node_field(object, NodeField::Duration), 55);
    assert_eq!(node_field(object, NodeField::MediaDuration), 55);

    timeline.get_element_mut(clip).unwrap().set_inpoint(10).unwrap();
    let object = timeline.element(clip).unwrap().track_object(track).unwrap();
    assert_eq!(object.duration(), 50);
    assert_eq!(node_field(object, NodeField::Duration), 50);
    assert_eq!(node_field(object, NodeField::MediaDuration), 50);
}

#[test]
fn test_inpoint_past_used_source_is_rejected() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    let clip = timeline.add_element(TimelineElement::clip("a", "file:///a.mov"));
    timeline.get_element_mut(clip).unwrap().set_duration(50).unwrap();
    timeline.bind_to_track(clip, track).unwrap();
    let writes = backend.write_count();

    assert!(matches!(
        timeline.get_element_mut(clip).unwrap().set_inpoint(60),
        Err(EditError::DurationUnderflow { inpoint: 60, limit: 50, .. })
    ));
    assert_eq!(timeline.element(clip).unwrap().inpoint(), 0);
    assert_eq!(backend.write_count(), writes);
}

#[test]
fn test_redundant_writes_do_not_reach_the_backend() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    let clip = timeline.add_element(TimelineElement::clip("a", "file:///a.mov"));
    timeline.get_element_mut(clip).unwrap().set_start(20).unwrap();
    timeline.bind_to_track(clip, track).unwrap();
    let writes = backend.write_count();

    let element = timeline.get_element_mut(clip).unwrap();
    assert_eq!(element.set_start(20).unwrap(), Change::Unchanged);
    assert_eq!(element.set_priority(0).unwrap(), Change::Unchanged);
    assert_eq!(backend.write_count(), writes);

    element.set_start(30).unwrap();
    assert_eq!(backend.write_count(), writes + 1);
    let object = element.track_object(track).unwrap();
    assert_eq!(object.get(TimingField::Start).unwrap(), 30);
    assert_eq!(node_field(object, NodeField::Start), 30);
    assert!(object.get(TimingField::MaxDuration).is_err());
}

#[test]
fn test_binding_twice_to_one_track_fails() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    let clip = timeline.add_element(TimelineElement::clip("a", "file:///a.mov"));
    timeline.bind_to_track(clip, track).unwrap();

    assert!(matches!(
        timeline.bind_to_track(clip, track),
        Err(EditError::AlreadyBound { .. })
    ));
    assert_eq!(backend.constructed(), 1);
}

#[test]
fn test_failed_bind_keeps_nothing() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    // Memory nodes refuse an empty description.
    let effect = timeline.add_element(TimelineElement::effect("fx", ""));

    assert!(matches!(
        timeline.bind_to_track(effect, track),
        Err(EditError::FillFailed(_))
    ));
    assert!(timeline.element(effect).unwrap().bindings().is_empty());
    assert_eq!(backend.destroyed(), 1);
}

#[test]
fn test_removing_track_destroys_its_nodes() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    let clip = timeline.add_element(TimelineElement::clip("a", "file:///a.mov"));
    timeline.bind_to_track(clip, track).unwrap();

    timeline.remove_track(track).unwrap();
    assert!(timeline.element(clip).unwrap().bindings().is_empty());
    assert_eq!(backend.destroyed(), 1);
}

#[test]
fn test_child_property_reaches_materialized_node() {
    let backend = MemoryBackend::new();
    let mut timeline = Timeline::new("t");
    let track = timeline.add_track(video_track(&backend));
    let effect = timeline.add_element(TimelineElement::effect("fx", "videobalance"));
    timeline.bind_to_track(effect, track).unwrap();

    let element = timeline.get_element_mut(effect).unwrap();
    element.set_child_property("saturation", 0.0).unwrap();

    let object = element.track_object(track).unwrap();
    assert!(object.is_valid());
    let content = object.composition_node().and_then(|n| n.content()).unwrap();
    assert_eq!(content.description, "videobalance");
    assert_eq!(
        content.properties.get("saturation"),
        Some(&PropertyValue::from(0.0))
    );
}
