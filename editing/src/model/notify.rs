use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use super::field::TimingField;

/// Emitted once per field after an element commits a change.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Notification {
    pub element: Uuid,
    pub field: TimingField,
}

pub trait ChangeObserver: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Observer that keeps every notification it receives.
#[derive(Default, Debug)]
pub struct ChangeRecorder {
    events: Mutex<Vec<Notification>>,
}

impl ChangeRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Fields notified for `element`, in emission order.
    pub fn fields_for(&self, element: Uuid) -> Vec<TimingField> {
        self.events()
            .into_iter()
            .filter(|n| n.element == element)
            .map(|n| n.field)
            .collect()
    }
}

impl ChangeObserver for ChangeRecorder {
    fn notify(&self, notification: Notification) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Observers connected to one element. Not carried over by copies.
#[derive(Default, Clone)]
pub struct Observers(Vec<Arc<dyn ChangeObserver>>);

impl Observers {
    pub fn connect(&mut self, observer: Arc<dyn ChangeObserver>) {
        self.0.push(observer);
    }

    pub fn emit(&self, notification: Notification) {
        for observer in &self.0 {
            observer.notify(notification);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observers({})", self.0.len())
    }
}
