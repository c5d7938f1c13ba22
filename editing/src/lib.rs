//! Editing core of a non-linear timeline.
//!
//! Timeline elements (clips, effects, groups) carry their logical timing
//! and keep one track object per track they are placed on. Track objects
//! mirror that timing into the composition nodes of an opaque backend.

pub mod backend;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod track;
pub mod util;

pub use cli::run;
pub use config::{EditorConfig, load_config};
pub use editor::EditorService;
pub use editor::handlers::edit_handler::EditMode;
pub use error::EditError;
pub use model::{Change, Timeline, TimelineElement, Timing, TimingField};
