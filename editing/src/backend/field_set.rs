use super::{CompositionNode, NodeField};
use crate::model::time::ClockTime;

/// A batch of composition node writes.
///
/// All arithmetic deriving node fields from element timing lives here, so
/// the track object only decides *when* to write and this type decides *what*.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CompositionFieldSet {
    start: Option<u64>,
    media_start: Option<u64>,
    duration: Option<u64>,
    media_duration: Option<u64>,
    priority: Option<u64>,
}

impl CompositionFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, value: ClockTime) -> Self {
        self.start = Some(value);
        self
    }

    pub fn media_start(mut self, value: ClockTime) -> Self {
        self.media_start = Some(value);
        self
    }

    pub fn duration(mut self, value: ClockTime) -> Self {
        self.duration = Some(value);
        self
    }

    pub fn media_duration(mut self, value: ClockTime) -> Self {
        self.media_duration = Some(value);
        self
    }

    pub fn priority(mut self, value: u32) -> Self {
        self.priority = Some(u64::from(value));
        self
    }

    pub fn for_start(start: ClockTime) -> Self {
        Self::new().start(start)
    }

    /// Duration and media duration always move together.
    pub fn for_duration(duration: ClockTime) -> Self {
        Self::new().duration(duration).media_duration(duration)
    }

    pub fn for_priority(priority: u32) -> Self {
        Self::new().priority(priority)
    }

    /// Writes for an in-point change that keeps the used source end fixed:
    /// the node spans `old_inpoint + duration - new_inpoint`.
    ///
    /// Returns `None` when `new_inpoint` lies past `old_inpoint + duration`.
    pub fn for_inpoint(
        old_inpoint: ClockTime,
        new_inpoint: ClockTime,
        duration: ClockTime,
    ) -> Option<Self> {
        let derived = Self::derive_duration(old_inpoint, new_inpoint, duration)?;
        Some(
            Self::new()
                .media_start(new_inpoint)
                .duration(derived)
                .media_duration(derived),
        )
    }

    /// Writes for an edit that moves the in-point and sets the duration in
    /// one step, as trim does. The duration is taken as given.
    pub fn for_span(inpoint: ClockTime, duration: ClockTime) -> Self {
        Self::new()
            .media_start(inpoint)
            .duration(duration)
            .media_duration(duration)
    }

    pub fn derive_duration(
        old_inpoint: ClockTime,
        new_inpoint: ClockTime,
        duration: ClockTime,
    ) -> Option<ClockTime> {
        old_inpoint.checked_add(duration)?.checked_sub(new_inpoint)
    }

    /// Every field at once, used when a freshly built node is first synced.
    pub fn full(
        start: ClockTime,
        inpoint: ClockTime,
        duration: ClockTime,
        priority: u32,
    ) -> Self {
        Self::new()
            .start(start)
            .media_start(inpoint)
            .duration(duration)
            .media_duration(duration)
            .priority(priority)
    }

    pub fn get(&self, field: NodeField) -> Option<u64> {
        match field {
            NodeField::Start => self.start,
            NodeField::MediaStart => self.media_start,
            NodeField::Duration => self.duration,
            NodeField::MediaDuration => self.media_duration,
            NodeField::Priority => self.priority,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeField, u64)> + '_ {
        NodeField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Writes the set fields onto `node`; returns how many were written.
    pub fn apply(&self, node: &mut dyn CompositionNode) -> usize {
        let mut written = 0;
        for (field, value) in self.iter() {
            node.set_field(field, value);
            written += 1;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inpoint_shift_derives_duration() {
        let set = CompositionFieldSet::for_inpoint(10, 5, 50).unwrap();
        assert_eq!(set.get(NodeField::MediaStart), Some(5));
        assert_eq!(set.get(NodeField::Duration), Some(55));
        assert_eq!(set.get(NodeField::MediaDuration), Some(55));
        assert_eq!(set.get(NodeField::Start), None);
    }

    #[test]
    fn test_inpoint_round_trip_restores_duration() {
        let there = CompositionFieldSet::derive_duration(10, 5, 50).unwrap();
        let back = CompositionFieldSet::derive_duration(5, 10, there).unwrap();
        assert_eq!(back, 50);
    }

    #[test]
    fn test_inpoint_past_source_end_is_rejected() {
        assert!(CompositionFieldSet::for_inpoint(10, 61, 50).is_none());
        // Exactly at the end leaves an empty span.
        assert_eq!(CompositionFieldSet::derive_duration(10, 60, 50), Some(0));
    }

    #[test]
    fn test_span_ignores_previous_inpoint() {
        let set = CompositionFieldSet::for_span(70, 10);
        assert_eq!(set.get(NodeField::MediaStart), Some(70));
        assert_eq!(set.get(NodeField::Duration), Some(10));
        assert_eq!(set.get(NodeField::MediaDuration), Some(10));
        assert_eq!(set.get(NodeField::Start), None);
    }

    #[test]
    fn test_duration_writes_both_fields() {
        let set = CompositionFieldSet::for_duration(42);
        let fields: Vec<_> = set.iter().collect();
        assert_eq!(
            fields,
            vec![(NodeField::Duration, 42), (NodeField::MediaDuration, 42)]
        );
        assert!(CompositionFieldSet::new().is_empty());
    }
}
