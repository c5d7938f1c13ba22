use log::debug;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{CompositionBackend, CompositionNode, NodeContent, NodeField, NodeRole};
use crate::error::EditError;

/// One recorded field write.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeWrite {
    pub node: u64,
    pub field: NodeField,
    pub value: u64,
}

type Journal = Arc<Mutex<Vec<NodeWrite>>>;

/// In-process backend keeping node fields in memory and journaling writes.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    next_id: AtomicU64,
    destroyed: AtomicUsize,
    journal: Journal,
    refuse_construction: bool,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A backend whose `construct_node` always fails.
    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            refuse_construction: true,
            ..Self::default()
        })
    }

    pub fn journal(&self) -> Vec<NodeWrite> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn constructed(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl CompositionBackend for MemoryBackend {
    fn construct_node(
        &self,
        role: NodeRole,
        name: &str,
    ) -> Result<Box<dyn CompositionNode>, EditError> {
        if self.refuse_construction {
            return Err(EditError::Backend(format!(
                "Cannot construct {:?} node '{}'",
                role, name
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!("Constructed {:?} node {} ('{}')", role, id, name);
        Ok(Box::new(MemoryNode {
            id,
            role,
            name: name.to_string(),
            fields: BTreeMap::new(),
            content: None,
            journal: Arc::clone(&self.journal),
        }))
    }

    fn destroy_node(&self, node: Box<dyn CompositionNode>) {
        debug!("Destroying node '{}'", node.name());
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        drop(node);
    }
}

#[derive(Debug)]
pub struct MemoryNode {
    id: u64,
    role: NodeRole,
    name: String,
    fields: BTreeMap<NodeField, u64>,
    content: Option<NodeContent>,
    journal: Journal,
}

impl MemoryNode {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl CompositionNode for MemoryNode {
    fn role(&self) -> NodeRole {
        self.role
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_field(&mut self, field: NodeField, value: u64) {
        self.fields.insert(field, value);
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(NodeWrite {
                node: self.id,
                field,
                value,
            });
    }

    fn field(&self, field: NodeField) -> u64 {
        self.fields.get(&field).copied().unwrap_or(0)
    }

    fn set_content(&mut self, content: NodeContent) -> Result<(), EditError> {
        if content.description.is_empty() {
            return Err(EditError::Backend(format!(
                "Node '{}' needs a non-empty description",
                self.name
            )));
        }
        self.content = Some(content);
        Ok(())
    }

    fn content(&self) -> Option<&NodeContent> {
        self.content.as_ref()
    }
}
