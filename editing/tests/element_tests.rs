//! Timeline element setters, parent relation and copies.

use editing::model::{ChangeRecorder, PropertyValue, Timeline, TimelineElement, TimingField};
use editing::{Change, EditError};

#[test]
fn test_setters_short_circuit_and_notify_once() {
    let mut clip = TimelineElement::clip("a", "file:///a.mov");
    let recorder = ChangeRecorder::new();
    clip.connect(recorder.clone());

    assert_eq!(clip.set_start(20).unwrap(), Change::Applied);
    assert_eq!(clip.set_start(20).unwrap(), Change::Unchanged);
    assert_eq!(clip.set_priority(3).unwrap(), Change::Applied);
    assert_eq!(clip.set_priority(3).unwrap(), Change::Unchanged);

    assert_eq!(clip.start(), 20);
    assert_eq!(clip.priority(), 3);
    assert_eq!(
        recorder.fields_for(clip.id()),
        vec![TimingField::Start, TimingField::Priority]
    );
}

#[test]
fn test_duration_beyond_max_duration_is_rejected() {
    let mut clip = TimelineElement::clip("a", "file:///a.mov");
    clip.set_max_duration(Some(100)).unwrap();
    clip.set_inpoint(10).unwrap();
    clip.set_duration(90).unwrap();

    let recorder = ChangeRecorder::new();
    clip.connect(recorder.clone());

    let err = clip.set_duration(95).unwrap_err();
    assert!(matches!(
        err,
        EditError::ExceedsMaxDuration {
            inpoint: 10,
            duration: 95,
            max_duration: 100
        }
    ));
    assert_eq!(clip.duration(), 90);
    assert!(recorder.events().is_empty());
}

#[test]
fn test_lowering_max_duration_is_reported_by_next_edit() {
    let mut clip = TimelineElement::clip("a", "file:///a.mov");
    clip.set_duration(90).unwrap();

    // Setting the bound alone is not validated.
    assert_eq!(clip.set_max_duration(Some(50)).unwrap(), Change::Applied);
    assert_eq!(clip.duration(), 90);

    assert!(matches!(
        clip.set_start(5),
        Err(EditError::ExceedsMaxDuration { .. })
    ));
    assert_eq!(clip.start(), 0);

    clip.set_max_duration(None).unwrap();
    assert_eq!(clip.set_start(5).unwrap(), Change::Applied);
}

#[test]
fn test_end_overflow_is_rejected() {
    let mut clip = TimelineElement::clip("a", "file:///a.mov");
    clip.set_duration(10).unwrap();
    assert!(matches!(
        clip.set_start(u64::MAX - 5),
        Err(EditError::TimeOverflow(_))
    ));
    assert_eq!(clip.start(), 0);
}

#[test]
fn test_set_parent_requires_clearing_first() {
    let group_a = TimelineElement::group("a");
    let group_b = TimelineElement::group("b");
    let mut clip = TimelineElement::clip("c", "file:///c.mov");

    assert_eq!(clip.set_parent(Some(group_a.id())).unwrap(), Change::Applied);
    assert_eq!(clip.set_parent(Some(group_a.id())).unwrap(), Change::Unchanged);
    assert!(matches!(
        clip.set_parent(Some(group_b.id())),
        Err(EditError::ParentConflict { .. })
    ));
    assert_eq!(clip.parent(), Some(group_a.id()));

    assert_eq!(clip.set_parent(None).unwrap(), Change::Applied);
    assert_eq!(clip.set_parent(Some(group_b.id())).unwrap(), Change::Applied);
    assert_eq!(clip.parent(), Some(group_b.id()));
}

#[test]
fn test_timeline_rejects_self_and_cyclic_parents() {
    let mut timeline = Timeline::new("t");
    let outer = timeline.add_element(TimelineElement::group("outer"));
    let inner = timeline.add_element(TimelineElement::group("inner"));

    assert!(matches!(
        timeline.set_parent(outer, Some(outer)),
        Err(EditError::InvalidParent(_))
    ));
    timeline.set_parent(inner, Some(outer)).unwrap();
    assert!(matches!(
        timeline.set_parent(outer, Some(inner)),
        Err(EditError::InvalidParent(_))
    ));
    assert_eq!(timeline.children(outer), vec![inner]);
}

#[test]
fn test_removing_parent_orphans_children() {
    let mut timeline = Timeline::new("t");
    let group = timeline.add_element(TimelineElement::group("g"));
    let clip = timeline.add_element(TimelineElement::clip("c", "file:///c.mov"));
    timeline.set_parent(clip, Some(group)).unwrap();

    timeline.remove_element(group).unwrap();
    assert_eq!(timeline.element(clip).unwrap().parent(), None);
    assert!(matches!(
        timeline.siblings(clip),
        Err(EditError::Detached(_))
    ));
}

#[test]
fn test_copy_keeps_timing_but_not_relations() {
    let mut timeline = Timeline::new("t");
    let group = timeline.add_element(TimelineElement::group("g"));
    let mut effect = TimelineElement::effect("fx", "agingtv");
    effect.set_start(40).unwrap();
    effect.set_duration(10).unwrap();
    effect.set_child_property("scratch-lines", 7i64).unwrap();
    let fx = timeline.add_element(effect);
    timeline.set_parent(fx, Some(group)).unwrap();

    let shallow = timeline.copy_element(fx, false).unwrap();
    let deep = timeline.copy_element(fx, true).unwrap();

    let shallow = timeline.element(shallow).unwrap();
    assert_ne!(shallow.id(), fx);
    assert_eq!(shallow.name(), "fx-copy");
    assert_eq!(shallow.start(), 40);
    assert_eq!(shallow.duration(), 10);
    assert_eq!(shallow.parent(), None);
    assert!(shallow.bindings().is_empty());
    assert!(shallow.child_properties().is_empty());

    let deep = timeline.element(deep).unwrap();
    assert_eq!(
        deep.child_properties().get("scratch-lines"),
        Some(&PropertyValue::Integer(7))
    );
}

#[test]
fn test_deep_copy_between_kinds_fails() {
    let mut clip = TimelineElement::clip("a", "file:///a.mov");
    clip.set_child_property("volume", 0.5).unwrap();
    let mut other = TimelineElement::clip("b", "file:///b.mov");
    TimelineElement::deep_copy(&clip, &mut other).unwrap();
    assert_eq!(other.child_properties(), clip.child_properties());

    let mut group = TimelineElement::group("g");
    assert!(matches!(
        TimelineElement::deep_copy(&clip, &mut group),
        Err(EditError::InvalidArgument(_))
    ));
}
