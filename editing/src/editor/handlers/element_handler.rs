use crate::editor::handlers::{read_timeline, write_timeline};
use crate::error::EditError;
use crate::model::element::TimelineElement;
use crate::model::field::{Timing, TimingField};
use crate::model::property::PropertyValue;
use crate::model::timeline::Timeline;
use crate::model::Change;
use log::info;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub struct ElementHandler;

impl ElementHandler {
    /// Add an element, optionally as a child of `parent`
    pub fn add_element(
        timeline: &Arc<RwLock<Timeline>>,
        element: TimelineElement,
        parent: Option<Uuid>,
    ) -> Result<Uuid, EditError> {
        let mut tl = write_timeline(timeline)?;
        let id = tl.add_element(element);
        if let Some(parent_id) = parent {
            if let Err(e) = tl.set_parent(id, Some(parent_id)) {
                tl.remove_element(id)?;
                return Err(e);
            }
        }
        info!("Added element {}", id);
        Ok(id)
    }

    pub fn remove_element(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
    ) -> Result<TimelineElement, EditError> {
        let mut tl = write_timeline(timeline)?;
        let element = tl.remove_element(element_id)?;
        info!("Removed element '{}' ({})", element.name(), element_id);
        Ok(element)
    }

    pub fn get_timing(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
    ) -> Result<Timing, EditError> {
        let tl = read_timeline(timeline)?;
        Ok(*tl.get_element(element_id)?.timing())
    }

    /// Set one timing field. `MaxDuration` takes `u64::MAX` as "unbounded".
    pub fn set_field(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        field: TimingField,
        value: u64,
    ) -> Result<Change, EditError> {
        let mut tl = write_timeline(timeline)?;
        let element = tl.get_element_mut(element_id)?;
        let change = match field {
            TimingField::Start => element.set_start(value)?,
            TimingField::Inpoint => element.set_inpoint(value)?,
            TimingField::Duration => element.set_duration(value)?,
            TimingField::MaxDuration => {
                element.set_max_duration((value != u64::MAX).then_some(value))?
            }
            TimingField::Priority => {
                let priority = u32::try_from(value).map_err(|_| {
                    EditError::InvalidArgument(format!("Priority {} out of range", value))
                })?;
                element.set_priority(priority)?
            }
        };
        if change.is_applied() {
            info!("Element {} {} -> {}", element_id, field, value);
        }
        Ok(change)
    }

    pub fn set_parent(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        parent: Option<Uuid>,
    ) -> Result<Change, EditError> {
        let mut tl = write_timeline(timeline)?;
        tl.set_parent(element_id, parent)
    }

    pub fn set_child_property(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), EditError> {
        let mut tl = write_timeline(timeline)?;
        tl.get_element_mut(element_id)?.set_child_property(key, value)
    }

    pub fn copy_element(
        timeline: &Arc<RwLock<Timeline>>,
        element_id: Uuid,
        deep: bool,
    ) -> Result<Uuid, EditError> {
        let mut tl = write_timeline(timeline)?;
        let copy_id = tl.copy_element(element_id, deep)?;
        info!("Copied element {} to {} (deep: {})", element_id, copy_id, deep);
        Ok(copy_id)
    }
}
