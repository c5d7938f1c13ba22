use thiserror::Error;
use uuid::Uuid;

use crate::model::field::TimingField;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config parsing error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Element with ID {0} not found")]
    ElementNotFound(Uuid),
    #[error("Track with ID {0} not found")]
    TrackNotFound(Uuid),
    #[error("Track object {0} has no composition node")]
    NotMaterialized(Uuid),
    #[error("Track object {0} must be detached from its track first")]
    StillAttached(Uuid),
    #[error("Element {element} already has parent {current}")]
    ParentConflict { element: Uuid, current: Uuid },
    #[error("Invalid parent: {0}")]
    InvalidParent(String),
    #[error("Element {0} has no parent to edit within")]
    Detached(Uuid),
    #[error("Element {element} is already bound to track {track}")]
    AlreadyBound { element: Uuid, track: Uuid },
    #[error("In-point {inpoint} + duration {duration} exceeds max duration {max_duration}")]
    ExceedsMaxDuration {
        inpoint: u64,
        duration: u64,
        max_duration: u64,
    },
    #[error("{field} of element {element} would become negative")]
    NegativeTime { element: Uuid, field: TimingField },
    #[error("In-point {inpoint} is past the used source end {limit} of track object {object}")]
    DurationUnderflow { object: Uuid, inpoint: u64, limit: u64 },
    #[error("Time value overflows the clock range: {0}")]
    TimeOverflow(String),
    #[error("Node factory of track object {0} broke the construction contract")]
    BackendContract(Uuid),
    #[error("Filling the composition node of track object {0} failed")]
    FillFailed(Uuid),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}
