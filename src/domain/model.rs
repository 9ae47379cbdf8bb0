//! Arena-backed node model with parent back-references.
//!
//! Parents own their children through fields (`Role` -> `Value`); children
//! point back with a plain arena index. Every state-changing primitive
//! notifies the installed listener before returning.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::catalog::{Catalog, KindId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::event::{Action, ChangeEvent, SharedListener};
use crate::domain::role::Role;
use crate::domain::value::{OpaqueHandle, Value};

/// Handle to a node in a [`Model`].
pub type NodeId = Index;

/// Shape of a collection-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    List,
    Set,
}

/// A tree element.
#[derive(Debug, Clone)]
pub struct Node {
    kind: KindId,
    fields: BTreeMap<Role, Value>,
    /// Index of the parent, None for detached nodes and roots
    parent: Option<NodeId>,
    /// Field of the parent this node is held under
    role: Option<Role>,
}

impl Node {
    pub fn kind(&self) -> KindId {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn fields(&self) -> &BTreeMap<Role, Value> {
        &self.fields
    }
}

/// Toggles consumed by the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    /// Accept identifiers and shapes the language would reject.
    pub ignore_syntax_errors: bool,
}

/// The mutable tree model: node storage, environment and listener slot.
pub struct Model {
    catalog: Arc<Catalog>,
    arena: Arena<Node>,
    environment: Environment,
    listener: Option<SharedListener>,
    default_container: Option<NodeId>,
    compilation_units: u32,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("nodes", &self.arena.len())
            .field("environment", &self.environment)
            .field("listener", &self.listener.is_some())
            .field("default_container", &self.default_container)
            .finish()
    }
}

impl Model {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            arena: Arena::new(),
            environment: Environment::default(),
            listener: None,
            default_container: None,
            compilation_units: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn set_ignore_syntax_errors(&mut self, ignore: bool) -> bool {
        std::mem::replace(&mut self.environment.ignore_syntax_errors, ignore)
    }

    /// Installs `listener` and returns the previous one. The previous
    /// listener is handed back, not dropped, so its owner keeps its state.
    pub fn set_listener(&mut self, listener: Option<SharedListener>) -> Option<SharedListener> {
        std::mem::replace(&mut self.listener, listener)
    }

    pub fn listener(&self) -> Option<&SharedListener> {
        self.listener.as_ref()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    // ------------------------------------------------------------
    // Factory
    // ------------------------------------------------------------

    /// Creates a fresh, parentless node of `kind` and runs its initializer.
    #[instrument(level = "trace", skip(self))]
    pub fn create(&mut self, kind: KindId) -> DomainResult<NodeId> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog
            .kind(kind)
            .ok_or_else(|| DomainError::UnknownKind(kind.to_string()))?;
        if !def.is_instantiable() {
            return Err(DomainError::NotInstantiable(kind.to_string()));
        }
        let id = self.arena.insert(Node {
            kind,
            fields: BTreeMap::new(),
            parent: None,
            role: None,
        });
        def.initialize(self, id)?;
        trace!(?id, %kind, "created node");
        Ok(id)
    }

    /// Fresh compilation-unit handle; units live outside the tree.
    pub fn create_compilation_unit(&mut self) -> OpaqueHandle {
        self.compilation_units += 1;
        OpaqueHandle::CompilationUnit(self.compilation_units)
    }

    /// Root container the factory inserts named top-level declarations into.
    pub fn default_container(&self) -> Option<NodeId> {
        self.default_container
    }

    pub fn set_default_container(&mut self, id: NodeId) {
        self.default_container = Some(id);
    }

    // ------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------

    pub fn get(&self, id: NodeId) -> DomainResult<&Node> {
        self.arena.get(id).ok_or(DomainError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut Node> {
        self.arena.get_mut(id).ok_or(DomainError::NodeNotFound(id))
    }

    pub fn kind(&self, id: NodeId) -> DomainResult<KindId> {
        Ok(self.get(id)?.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn role_in_parent(&self, id: NodeId) -> Option<Role> {
        self.arena.get(id).and_then(|n| n.role)
    }

    pub fn field(&self, id: NodeId, role: Role) -> Option<&Value> {
        self.arena.get(id).and_then(|n| n.fields.get(&role))
    }

    /// Text of the `Name` field, empty when unset.
    pub fn simple_name(&self, id: NodeId) -> &str {
        self.field(id, Role::Name)
            .and_then(Value::as_text)
            .unwrap_or("")
    }

    /// Direct children, in field order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.arena
            .get(id)
            .map(|n| n.fields.values().flat_map(Value::nodes).collect())
            .unwrap_or_default()
    }

    /// Walks parent links upward, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            model: self,
            next: self.parent(id),
        }
    }

    /// True when `candidate` is a strict ancestor of `id`.
    pub fn has_ancestor(&self, id: NodeId, candidate: NodeId) -> bool {
        self.ancestors(id).any(|a| a == candidate)
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Short label: kind, arena slot and name when present.
    pub fn describe(&self, id: NodeId) -> String {
        match self.arena.get(id) {
            Some(node) => {
                let name = self.simple_name(id);
                if name.is_empty() {
                    format!("{}{}", node.kind, Value::Node(id))
                } else {
                    format!("{}{} {:?}", node.kind, Value::Node(id), name)
                }
            }
            None => format!("<dangling {}>", Value::Node(id)),
        }
    }

    /// Rejects names the language would not accept, unless syntax errors
    /// are ignored. Dotted names are checked per segment.
    pub fn check_identifier(&self, name: &str) -> DomainResult<()> {
        if self.environment.ignore_syntax_errors || is_identifier(name) {
            Ok(())
        } else {
            Err(DomainError::InvalidIdentifier(name.to_string()))
        }
    }

    /// Compares values by shape: nodes by kind and fields, recursively,
    /// ignoring identity.
    pub fn structurally_equal(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Node(x), Value::Node(y)) => self.nodes_equal(*x, *y),
            (Value::List(xs), Value::List(ys))
            | (Value::Set(xs), Value::Set(ys))
            | (Value::Array(xs), Value::Array(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(x, y)| self.structurally_equal(x, y))
            }
            (Value::Opaque(OpaqueHandle::CompilationUnit(_)), Value::Opaque(OpaqueHandle::CompilationUnit(_))) => true,
            _ => a == b,
        }
    }

    fn nodes_equal(&self, x: NodeId, y: NodeId) -> bool {
        let (Ok(a), Ok(b)) = (self.get(x), self.get(y)) else {
            return false;
        };
        a.kind == b.kind
            && a.fields.len() == b.fields.len()
            && a.fields.iter().all(|(role, value)| {
                b.fields
                    .get(role)
                    .is_some_and(|other| self.structurally_equal(value, other))
            })
    }

    // ------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------

    fn notify(&self, element: NodeId, role: Role, action: Action) {
        if let Some(listener) = &self.listener {
            listener.borrow_mut().on_action(ChangeEvent {
                element,
                role,
                action,
            });
        }
    }

    // ------------------------------------------------------------
    // Mutation primitives
    // ------------------------------------------------------------

    /// Installs `child` under `role`, replacing and detaching any previous
    /// value. A child held elsewhere is moved.
    #[instrument(level = "trace", skip(self))]
    pub fn set_child(&mut self, receiver: NodeId, role: Role, child: NodeId) -> DomainResult<()> {
        if self.field(receiver, role) == Some(&Value::Node(child)) {
            return Ok(());
        }
        self.prepare_adoption(receiver, child)?;

        let new = Value::Node(child);
        let old = self.node_mut(receiver)?.fields.insert(role, new.clone());
        if let Some(old) = &old {
            self.release_all(old, &[child]);
        }
        self.adopt(receiver, role, child)?;
        self.notify(receiver, role, replaced(old, new));
        Ok(())
    }

    /// Clears a single-valued field. Returns the detached child.
    #[instrument(level = "trace", skip(self))]
    pub fn unset_child(&mut self, receiver: NodeId, role: Role) -> DomainResult<Option<NodeId>> {
        let Some(old) = self.node_mut(receiver)?.fields.remove(&role) else {
            return Ok(None);
        };
        self.release_all(&old, &[]);
        let child = old.as_node();
        self.notify(receiver, role, Action::Removed { value: old });
        Ok(child)
    }

    /// Appends `child` to the collection under `role`.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, receiver: NodeId, role: Role, child: NodeId) -> DomainResult<()> {
        self.insert_child(receiver, role, child, false)
    }

    /// Prepends `child` to the collection under `role`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_child_first(
        &mut self,
        receiver: NodeId,
        role: Role,
        child: NodeId,
    ) -> DomainResult<()> {
        self.insert_child(receiver, role, child, true)
    }

    fn insert_child(
        &mut self,
        receiver: NodeId,
        role: Role,
        child: NodeId,
        first: bool,
    ) -> DomainResult<()> {
        if let Some(existing) = self.field(receiver, role) {
            if existing.as_collection().is_none() {
                return Err(DomainError::ArgumentMismatch {
                    role,
                    expected: "collection field".to_string(),
                    found: existing.shape().to_string(),
                });
            }
        }
        self.prepare_adoption(receiver, child)?;

        let node = self.node_mut(receiver)?;
        let field = node
            .fields
            .entry(role)
            .or_insert_with(|| Value::List(Vec::new()));
        if let Value::List(items) | Value::Set(items) = field {
            if first {
                items.insert(0, Value::Node(child));
            } else {
                items.push(Value::Node(child));
            }
        }
        self.adopt(receiver, role, child)?;
        self.notify(
            receiver,
            role,
            Action::Added {
                value: Value::Node(child),
            },
        );
        Ok(())
    }

    /// Replaces the whole collection under `role`. Every element gets the
    /// receiver as parent; elements of the old collection that are not
    /// re-installed are detached.
    #[instrument(level = "trace", skip(self))]
    pub fn set_children(
        &mut self,
        receiver: NodeId,
        role: Role,
        children: Vec<NodeId>,
        shape: CollectionShape,
    ) -> DomainResult<()> {
        let new = match shape {
            CollectionShape::List => Value::nodes_list(children),
            CollectionShape::Set => Value::nodes_set(children),
        };
        let current = self.field(receiver, role);
        if current == Some(&new) || (current.is_none() && new.nodes().is_empty()) {
            return Ok(());
        }

        let children = new.nodes();
        let moved: Vec<NodeId> = children
            .iter()
            .copied()
            .filter(|&c| !(self.parent(c) == Some(receiver) && self.role_in_parent(c) == Some(role)))
            .collect();
        for &child in &moved {
            self.check_adoption(receiver, child)?;
        }
        for &child in &moved {
            self.prepare_adoption(receiver, child)?;
        }

        let old = self.node_mut(receiver)?.fields.insert(role, new.clone());
        if let Some(old) = &old {
            self.release_all(old, &children);
        }
        for &child in &children {
            self.adopt(receiver, role, child)?;
        }
        self.notify(receiver, role, replaced(old, new));
        Ok(())
    }

    /// Removes `child` from whichever field of `receiver` holds it.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, receiver: NodeId, child: NodeId) -> DomainResult<bool> {
        if self.parent(child) != Some(receiver) {
            return Ok(false);
        }
        self.unlink(receiver, child)?;
        Ok(true)
    }

    /// Stores a leaf value (text, flags, enums, handles). Leaf values never
    /// carry nodes.
    #[instrument(level = "trace", skip(self))]
    pub fn set_leaf(&mut self, receiver: NodeId, role: Role, value: Value) -> DomainResult<()> {
        if !value.nodes().is_empty() {
            return Err(DomainError::ArgumentMismatch {
                role,
                expected: "leaf value".to_string(),
                found: value.shape().to_string(),
            });
        }
        if self.field(receiver, role) == Some(&value) {
            return Ok(());
        }
        let old = self.node_mut(receiver)?.fields.insert(role, value.clone());
        if let Some(old) = &old {
            self.release_all(old, &[]);
        }
        self.notify(receiver, role, replaced(old, value));
        Ok(())
    }

    /// Installs a value while building a node, without notifying. Used by
    /// kind initializers, which run before anyone can observe the node.
    pub(crate) fn install_initial(
        &mut self,
        receiver: NodeId,
        role: Role,
        value: Value,
    ) -> DomainResult<()> {
        for child in value.nodes() {
            self.adopt(receiver, role, child)?;
        }
        self.node_mut(receiver)?.fields.insert(role, value);
        Ok(())
    }

    /// Detaches `id` from its parent. Detached nodes stay in the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> DomainResult<()> {
        match self.get(id)?.parent {
            Some(parent) => self.unlink(parent, id),
            None => Ok(()),
        }
    }

    /// Deep copy of `id`. The copy is always detached, whatever the depth
    /// of the original.
    #[instrument(level = "trace", skip(self))]
    pub fn clone_node(&mut self, id: NodeId) -> DomainResult<NodeId> {
        let copy = self.clone_into(id, None)?;
        debug!(original = ?id, ?copy, "cloned node");
        Ok(copy)
    }

    fn clone_into(&mut self, src: NodeId, owner: Option<(NodeId, Role)>) -> DomainResult<NodeId> {
        let original = self.get(src)?.clone();
        let id = self.arena.insert(Node {
            kind: original.kind,
            fields: BTreeMap::new(),
            parent: owner.map(|(p, _)| p),
            role: owner.map(|(_, r)| r),
        });
        for (role, value) in &original.fields {
            let copied = self.clone_value(value, id, *role)?;
            self.node_mut(id)?.fields.insert(*role, copied);
        }
        Ok(id)
    }

    fn clone_value(&mut self, value: &Value, owner: NodeId, role: Role) -> DomainResult<Value> {
        Ok(match value {
            Value::Node(child) => Value::Node(self.clone_into(*child, Some((owner, role)))?),
            Value::List(items) => Value::List(self.clone_values(items, owner, role)?),
            Value::Set(items) => Value::Set(self.clone_values(items, owner, role)?),
            Value::Array(items) => Value::Array(self.clone_values(items, owner, role)?),
            leaf => leaf.clone(),
        })
    }

    fn clone_values(&mut self, items: &[Value], owner: NodeId, role: Role) -> DomainResult<Vec<Value>> {
        items
            .iter()
            .map(|item| self.clone_value(item, owner, role))
            .collect()
    }

    // ------------------------------------------------------------
    // Link maintenance
    // ------------------------------------------------------------

    /// Rejects cycles and moves `child` out of its current holder.
    /// Rejects unknown nodes and cycles without touching the model.
    fn check_adoption(&self, receiver: NodeId, child: NodeId) -> DomainResult<()> {
        self.get(receiver)?;
        self.get(child)?;
        if child == receiver || self.has_ancestor(receiver, child) {
            return Err(DomainError::Cycle {
                parent: receiver,
                child,
            });
        }
        Ok(())
    }

    fn prepare_adoption(&mut self, receiver: NodeId, child: NodeId) -> DomainResult<()> {
        self.check_adoption(receiver, child)?;
        if let Some(holder) = self.get(child)?.parent {
            self.unlink(holder, child)?;
        }
        Ok(())
    }

    fn adopt(&mut self, parent: NodeId, role: Role, child: NodeId) -> DomainResult<()> {
        let node = self.node_mut(child)?;
        node.parent = Some(parent);
        node.role = Some(role);
        Ok(())
    }

    /// Clears parent links of every node in `value` except `keep`.
    fn release_all(&mut self, value: &Value, keep: &[NodeId]) {
        for id in value.nodes() {
            if keep.contains(&id) {
                continue;
            }
            if let Some(node) = self.arena.get_mut(id) {
                node.parent = None;
                node.role = None;
            }
        }
    }

    /// Removes `child` from the field of `holder` it is registered under and
    /// clears its parent link.
    fn unlink(&mut self, holder: NodeId, child: NodeId) -> DomainResult<()> {
        let role = self.get(child)?.role;
        let node = self.node_mut(holder)?;
        let role = role.or_else(|| {
            node.fields
                .iter()
                .find(|(_, v)| v.nodes().contains(&child))
                .map(|(r, _)| *r)
        });

        let Some(role) = role else {
            return self.detach_link(child);
        };
        let target = Value::Node(child);
        let remove_field = match node.fields.get_mut(&role) {
            Some(Value::Node(id)) => *id == child,
            Some(Value::List(items) | Value::Set(items) | Value::Array(items)) => {
                items.retain(|v| v != &target);
                false
            }
            _ => false,
        };
        if remove_field {
            node.fields.remove(&role);
        }
        self.detach_link(child)?;
        self.notify(holder, role, Action::Removed { value: target });
        Ok(())
    }

    fn detach_link(&mut self, child: NodeId) -> DomainResult<()> {
        let node = self.node_mut(child)?;
        node.parent = None;
        node.role = None;
        Ok(())
    }
}

fn replaced(old: Option<Value>, new: Value) -> Action {
    match old {
        Some(old) => Action::Updated { old, new },
        None => Action::Added { value: new },
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'a> {
    model: &'a Model,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.model.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_identifiers_when_checking_then_accepts_java_names_only() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_foo$1"));
        assert!(is_identifier("java.lang"));
        assert!(!is_identifier("42"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a..b"));
        assert!(!is_identifier("has space"));
    }
}
