//! Editing services: the entry points an embedder or the CLI uses to edit a
//! shared timeline.

pub mod editor_service;
pub mod handlers;

pub use editor_service::EditorService;
