use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use super::CompositionGraph;
use crate::error::EditError;

/// Receives the composition graph on every pipeline commit.
pub trait PlaybackSink: Send {
    fn consume(&mut self, graph: &CompositionGraph) -> Result<(), EditError>;
}

/// Writes each graph as pretty JSON.
pub struct JsonSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> PlaybackSink for JsonSink<W> {
    fn consume(&mut self, graph: &CompositionGraph) -> Result<(), EditError> {
        serde_json::to_writer_pretty(&mut self.writer, graph)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every consumed graph; the handle returned by `graphs` stays valid
/// after the sink is moved into a pipeline.
#[derive(Default, Clone)]
pub struct RecordingSink {
    graphs: Arc<Mutex<Vec<CompositionGraph>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graphs(&self) -> Vec<CompositionGraph> {
        self.graphs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PlaybackSink for RecordingSink {
    fn consume(&mut self, graph: &CompositionGraph) -> Result<(), EditError> {
        self.graphs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(graph.clone());
        Ok(())
    }
}
