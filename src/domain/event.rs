//! Change notification: one event per structural mutation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::domain::model::NodeId;
use crate::domain::role::Role;
use crate::domain::value::Value;

/// What happened to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A value was added to a collection field, or a previously empty field
    /// was set.
    Added { value: Value },
    /// A field value was replaced.
    Updated { old: Value, new: Value },
    /// A value was removed from a field.
    Removed { value: Value },
}

/// Immutable record of a single mutation.
///
/// `element` is the node where the change happened, which is the receiver
/// of the mutator and not necessarily the deepest affected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub element: NodeId,
    pub role: Role,
    pub action: Action,
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = Value::Node(self.element);
        match &self.action {
            Action::Added { value } => write!(f, "{}.{} += {}", element, self.role, value),
            Action::Updated { old, new } => {
                write!(f, "{}.{}: {} -> {}", element, self.role, old, new)
            }
            Action::Removed { value } => write!(f, "{}.{} -= {}", element, self.role, value),
        }
    }
}

/// Receives events synchronously, in program order.
pub trait ChangeListener {
    fn on_action(&mut self, event: ChangeEvent);
}

/// Shared handle to a listener. The model holds one of these; whoever
/// installed it may keep another.
pub type SharedListener = Rc<RefCell<dyn ChangeListener>>;

/// Counts events and remembers where changes happened.
#[derive(Debug, Default)]
pub struct EventCounter {
    count: usize,
    changed_elements: Vec<NodeId>,
}

impl EventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events seen since creation.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Elements reported since the last [`EventCounter::reset_changed`].
    pub fn changed_elements(&self) -> &[NodeId] {
        &self.changed_elements
    }

    pub fn reset_changed(&mut self) {
        self.changed_elements.clear();
    }
}

impl ChangeListener for EventCounter {
    fn on_action(&mut self, event: ChangeEvent) {
        self.changed_elements.push(event.element);
        self.count += 1;
    }
}

/// Keeps every event it receives.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ChangeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ChangeListener for EventLog {
    fn on_action(&mut self, event: ChangeEvent) {
        self.events.push(event);
    }
}

/// Logs each event at trace level.
#[derive(Debug, Default)]
pub struct TracingListener;

impl ChangeListener for TracingListener {
    fn on_action(&mut self, event: ChangeEvent) {
        trace!(%event, "model change");
    }
}
