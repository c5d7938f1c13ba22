use crate::editor::handlers::{read_timeline, write_timeline};
use crate::error::EditError;
use crate::model::edit::EditPlan;
use crate::model::time::ClockTime;
use crate::model::timeline::Timeline;
use crate::model::Change;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Multi-element edit operations.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum EditMode {
    Ripple,
    RippleEnd,
    RollStart,
    RollEnd,
    Trim,
}

impl EditMode {
    pub fn name(self) -> &'static str {
        match self {
            EditMode::Ripple => "ripple",
            EditMode::RippleEnd => "ripple-end",
            EditMode::RollStart => "roll-start",
            EditMode::RollEnd => "roll-end",
            EditMode::Trim => "trim",
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EditMode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ripple" => Ok(EditMode::Ripple),
            "ripple-end" => Ok(EditMode::RippleEnd),
            "roll-start" => Ok(EditMode::RollStart),
            "roll-end" => Ok(EditMode::RollEnd),
            "trim" => Ok(EditMode::Trim),
            other => Err(EditError::InvalidArgument(format!(
                "Unknown edit mode '{}'",
                other
            ))),
        }
    }
}

pub struct EditHandler;

impl EditHandler {
    /// Compute the timings an edit would produce without applying them
    pub fn preview(
        timeline: &Arc<RwLock<Timeline>>,
        mode: EditMode,
        element_id: Uuid,
        position: ClockTime,
    ) -> Result<EditPlan, EditError> {
        let tl = read_timeline(timeline)?;
        match mode {
            EditMode::Ripple => tl.plan_ripple(element_id, position),
            EditMode::RippleEnd => tl.plan_ripple_end(element_id, position),
            EditMode::RollStart => tl.plan_roll_start(element_id, position),
            EditMode::RollEnd => tl.plan_roll_end(element_id, position),
            EditMode::Trim => tl.plan_trim(element_id, position),
        }
    }

    pub fn apply(
        timeline: &Arc<RwLock<Timeline>>,
        mode: EditMode,
        element_id: Uuid,
        position: ClockTime,
    ) -> Result<Change, EditError> {
        let mut tl = write_timeline(timeline)?;
        let change = match mode {
            EditMode::Ripple => tl.ripple(element_id, position)?,
            EditMode::RippleEnd => tl.ripple_end(element_id, position)?,
            EditMode::RollStart => tl.roll_start(element_id, position)?,
            EditMode::RollEnd => tl.roll_end(element_id, position)?,
            EditMode::Trim => tl.trim(element_id, position)?,
        };
        if change.is_applied() {
            info!("{} of {} to {}", mode, element_id, position);
        }
        Ok(change)
    }
}
