pub mod edit_handler;
pub mod element_handler;
pub mod track_handler;

use crate::error::EditError;
use crate::model::timeline::Timeline;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Acquire a write lock on the timeline, converting poison errors to EditError.
pub fn write_timeline(
    timeline: &Arc<RwLock<Timeline>>,
) -> Result<RwLockWriteGuard<'_, Timeline>, EditError> {
    timeline
        .write()
        .map_err(|_| EditError::Runtime("Lock Poisoned".to_string()))
}

/// Acquire a read lock on the timeline, converting poison errors to EditError.
pub fn read_timeline(
    timeline: &Arc<RwLock<Timeline>>,
) -> Result<RwLockReadGuard<'_, Timeline>, EditError> {
    timeline
        .read()
        .map_err(|_| EditError::Runtime("Lock Poisoned".to_string()))
}
