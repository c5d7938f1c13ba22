//! Ripple, roll and trim.
//!
//! Each edit is planned first: the new timing of every affected element is
//! computed from the current state with checked arithmetic. The plan is then
//! validated as a whole and only committed if every element accepts its new
//! timing, so a failing edit never leaves part of the timeline moved.

use log::info;
use uuid::Uuid;

use super::Change;
use super::field::{Timing, TimingField};
use super::time::{ClockTime, shift};
use super::timeline::Timeline;
use crate::error::EditError;
use crate::util::timing::ScopedTimer;

/// New timings computed for one edit.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EditPlan {
    changes: Vec<(Uuid, Timing)>,
}

impl EditPlan {
    fn push(&mut self, id: Uuid, timing: Timing) {
        self.changes.push((id, timing));
    }

    pub fn get(&self, id: Uuid) -> Option<&Timing> {
        self.changes
            .iter()
            .find(|(other, _)| *other == id)
            .map(|(_, timing)| timing)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Uuid, Timing)> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Moves the start edge to `new_start` keeping the end fixed; the in-point
/// follows the start.
fn trimmed(id: Uuid, timing: &Timing, new_start: ClockTime) -> Result<Timing, EditError> {
    let end = timing.end().ok_or_else(|| {
        EditError::TimeOverflow(format!("end of element {}", id))
    })?;
    let duration = end.checked_sub(new_start).ok_or(EditError::NegativeTime {
        element: id,
        field: TimingField::Duration,
    })?;
    let inpoint = shift(timing.inpoint, timing.start, new_start).ok_or(
        EditError::NegativeTime {
            element: id,
            field: TimingField::Inpoint,
        },
    )?;
    Ok(Timing {
        start: new_start,
        inpoint,
        duration,
        ..*timing
    })
}

/// Moves the end edge to `new_end` keeping the start fixed.
fn extended(id: Uuid, timing: &Timing, new_end: ClockTime) -> Result<Timing, EditError> {
    let duration = new_end
        .checked_sub(timing.start)
        .ok_or(EditError::NegativeTime {
            element: id,
            field: TimingField::Duration,
        })?;
    Ok(Timing {
        duration,
        ..*timing
    })
}

impl Timeline {
    pub fn plan_ripple(&self, id: Uuid, new_start: ClockTime) -> Result<EditPlan, EditError> {
        let element = self.get_element(id)?;
        let old_start = element.start();
        let mut plan = EditPlan::default();
        plan.push(
            id,
            Timing {
                start: new_start,
                ..*element.timing()
            },
        );
        for sibling_id in self.siblings(id)? {
            let sibling = self.get_element(sibling_id)?;
            if sibling.start() < old_start {
                continue;
            }
            let start = shift(sibling.start(), old_start, new_start).ok_or(
                EditError::NegativeTime {
                    element: sibling_id,
                    field: TimingField::Start,
                },
            )?;
            plan.push(
                sibling_id,
                Timing {
                    start,
                    ..*sibling.timing()
                },
            );
        }
        Ok(plan)
    }

    /// Moves the element and every sibling starting at or after it by the
    /// same distance.
    pub fn ripple(&mut self, id: Uuid, new_start: ClockTime) -> Result<Change, EditError> {
        let plan = self.plan_ripple(id, new_start)?;
        self.commit("ripple", plan)
    }

    pub fn plan_ripple_end(&self, id: Uuid, new_end: ClockTime) -> Result<EditPlan, EditError> {
        let element = self.get_element(id)?;
        let new_start =
            new_end
                .checked_sub(element.duration())
                .ok_or(EditError::NegativeTime {
                    element: id,
                    field: TimingField::Start,
                })?;
        self.plan_ripple(id, new_start)
    }

    /// Ripple driven by the desired end; the duration stays as it is.
    pub fn ripple_end(&mut self, id: Uuid, new_end: ClockTime) -> Result<Change, EditError> {
        let plan = self.plan_ripple_end(id, new_end)?;
        self.commit("ripple-end", plan)
    }

    pub fn plan_roll_start(&self, id: Uuid, new_start: ClockTime) -> Result<EditPlan, EditError> {
        let element = self.get_element(id)?;
        let edge = element.start();
        let mut plan = EditPlan::default();
        plan.push(id, trimmed(id, element.timing(), new_start)?);
        for sibling_id in self.siblings(id)? {
            let sibling = self.get_element(sibling_id)?;
            if sibling.end() == edge {
                plan.push(sibling_id, extended(sibling_id, sibling.timing(), new_start)?);
            }
        }
        Ok(plan)
    }

    /// Moves the start edge and the end of every sibling sharing it, so the
    /// span covered together stays the same. Without such a sibling this is
    /// a trim of the start edge.
    pub fn roll_start(&mut self, id: Uuid, new_start: ClockTime) -> Result<Change, EditError> {
        let plan = self.plan_roll_start(id, new_start)?;
        self.commit("roll-start", plan)
    }

    pub fn plan_roll_end(&self, id: Uuid, new_end: ClockTime) -> Result<EditPlan, EditError> {
        let element = self.get_element(id)?;
        let edge = element.end();
        let mut plan = EditPlan::default();
        plan.push(id, extended(id, element.timing(), new_end)?);
        for sibling_id in self.siblings(id)? {
            let sibling = self.get_element(sibling_id)?;
            if sibling.start() == edge {
                plan.push(sibling_id, trimmed(sibling_id, sibling.timing(), new_end)?);
            }
        }
        Ok(plan)
    }

    /// Moves the end edge and the start of every sibling sharing it.
    pub fn roll_end(&mut self, id: Uuid, new_end: ClockTime) -> Result<Change, EditError> {
        let plan = self.plan_roll_end(id, new_end)?;
        self.commit("roll-end", plan)
    }

    pub fn plan_trim(&self, id: Uuid, new_start: ClockTime) -> Result<EditPlan, EditError> {
        let element = self.get_element(id)?;
        let mut plan = EditPlan::default();
        plan.push(id, trimmed(id, element.timing(), new_start)?);
        Ok(plan)
    }

    /// Moves the start and in-point together, holding the end fixed.
    pub fn trim(&mut self, id: Uuid, new_start: ClockTime) -> Result<Change, EditError> {
        let plan = self.plan_trim(id, new_start)?;
        self.commit("trim", plan)
    }

    /// Validates every planned timing, then applies them all.
    pub fn commit(&mut self, label: &str, plan: EditPlan) -> Result<Change, EditError> {
        let _timer = ScopedTimer::debug(format!("{} of {} elements", label, plan.len()));
        for (id, timing) in plan.iter() {
            self.get_element(*id)?.check(timing)?;
        }
        let mut change = Change::Unchanged;
        for (id, timing) in plan.changes {
            change = change.or(self.get_element_mut(id)?.update(timing)?);
        }
        if change.is_applied() {
            info!("Committed {}", label);
        }
        Ok(change)
    }
}
