pub mod clip;
pub mod document;
pub mod edit;
pub mod effect;
pub mod element;
pub mod field;
pub mod group;
pub mod kind;
pub mod notify;
pub mod property;
pub mod time;
pub mod timeline;

pub use clip::Clip;
pub use document::{ElementDocument, ElementKindDocument, TimelineDocument, TrackDocument};
pub use edit::EditPlan;
pub use effect::Effect;
pub use element::TimelineElement;
pub use field::{Timing, TimingField};
pub use group::Group;
pub use kind::{ElementData, ElementKind};
pub use notify::{ChangeObserver, ChangeRecorder, Notification};
pub use property::{PropertyMap, PropertyValue};
pub use time::ClockTime;
pub use timeline::Timeline;

/// Outcome of a successful mutating call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Change {
    Applied,
    /// The requested value was already in place; nothing was written.
    Unchanged,
}

impl Change {
    pub fn is_applied(self) -> bool {
        self == Change::Applied
    }

    /// `Applied` if either side applied.
    pub fn or(self, other: Change) -> Change {
        if self.is_applied() || other.is_applied() {
            Change::Applied
        } else {
            Change::Unchanged
        }
    }
}
