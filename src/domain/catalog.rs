//! Node kinds, their structural mutators, and the registry holding both.
//!
//! Kinds are registered explicitly through [`CatalogBuilder`]; the catalog
//! keeps registration order, which the synthesizer relies on when it has to
//! pick the first instantiable kind for a category.

use std::error::Error;
use std::fmt;

use tracing::{debug, warn};

use crate::domain::descriptor::{Category, NodeType, TypeDescriptor};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::model::{CollectionShape, Model, NodeId};
use crate::domain::role::Role;
use crate::domain::value::{EnumType, Value};

/// Identifier of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(&'static str);

impl KindId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Why a mutator is excused from the parent assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exemption {
    /// The mutator refuses or reports an unsupported operation.
    Unsettable,
    /// The value is stored on a derived node, not on the receiver.
    Derived,
}

impl fmt::Display for Exemption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exemption::Unsettable => f.write_str("unsettable"),
            Exemption::Derived => f.write_str("derived"),
        }
    }
}

/// Why a mutator could not complete.
#[derive(Debug)]
pub enum MutationFailure {
    /// The operation is not supported on this kind.
    Unsupported(String),
    Domain(DomainError),
    /// Anything else; wrapped with its cause by the engine.
    Internal(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for MutationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationFailure::Unsupported(detail) => write!(f, "unsupported: {}", detail),
            MutationFailure::Domain(e) => write!(f, "{}", e),
            MutationFailure::Internal(e) => write!(f, "internal: {}", e),
        }
    }
}

/// Result of invoking a mutator.
#[derive(Debug)]
pub enum MutationOutcome {
    Applied,
    /// The mutator declined without touching the model.
    Refused,
    Failed(MutationFailure),
}

impl MutationOutcome {
    pub fn unsupported(detail: impl Into<String>) -> Self {
        MutationOutcome::Failed(MutationFailure::Unsupported(detail.into()))
    }
}

impl From<DomainResult<()>> for MutationOutcome {
    fn from(result: DomainResult<()>) -> Self {
        match result {
            Ok(()) => MutationOutcome::Applied,
            Err(e) => MutationOutcome::Failed(MutationFailure::Domain(e)),
        }
    }
}

/// A structural mutator: one settable or addable field of a kind.
pub trait StructuralMutator: Send + Sync {
    fn name(&self) -> &str;

    fn role(&self) -> Role;

    /// Declared type of the single argument.
    fn parameter(&self) -> &TypeDescriptor;

    fn exemption(&self) -> Option<Exemption> {
        None
    }

    fn apply(&self, model: &mut Model, receiver: NodeId, argument: &Value) -> MutationOutcome;
}

type ApplyFn = Box<dyn Fn(&mut Model, NodeId, &Value) -> MutationOutcome + Send + Sync>;

/// Closure-backed mutator covering the common field shapes.
pub struct MutatorDef {
    name: String,
    role: Role,
    parameter: TypeDescriptor,
    exemption: Option<Exemption>,
    apply: ApplyFn,
}

impl fmt::Debug for MutatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorDef")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("parameter", &self.parameter)
            .field("exemption", &self.exemption)
            .finish()
    }
}

/// Wrong argument shape for `role`.
pub(crate) fn mismatch(role: Role, expected: &str, found: &Value) -> MutationOutcome {
    MutationOutcome::Failed(MutationFailure::Domain(DomainError::ArgumentMismatch {
        role,
        expected: expected.to_string(),
        found: found.shape().to_string(),
    }))
}

fn collection_nodes(role: Role, argument: &Value) -> Result<Vec<NodeId>, MutationOutcome> {
    let items = argument
        .as_collection()
        .ok_or_else(|| mismatch(role, "collection", argument))?;
    items
        .iter()
        .map(|item| item.as_node().ok_or_else(|| mismatch(role, "node", item)))
        .collect()
}

impl MutatorDef {
    /// Fully custom mutator.
    pub fn custom<F>(name: &str, role: Role, parameter: TypeDescriptor, apply: F) -> Self
    where
        F: Fn(&mut Model, NodeId, &Value) -> MutationOutcome + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            role,
            parameter,
            exemption: None,
            apply: Box::new(apply),
        }
    }

    /// `set_x(node)`: installs a single child.
    pub fn single(name: &str, role: Role, parameter: TypeDescriptor) -> Self {
        Self::custom(name, role, parameter, move |model, receiver, argument| {
            match argument.as_node() {
                Some(child) => model.set_child(receiver, role, child).into(),
                None => mismatch(role, "node", argument),
            }
        })
    }

    /// `set_xs(list)`: replaces an ordered collection of children.
    pub fn list(name: &str, role: Role, element: TypeDescriptor) -> Self {
        Self::collection(name, role, TypeDescriptor::list_of(element), CollectionShape::List)
    }

    /// `set_xs(set)`: replaces an unordered collection of children.
    pub fn set(name: &str, role: Role, element: TypeDescriptor) -> Self {
        Self::collection(name, role, TypeDescriptor::set_of(element), CollectionShape::Set)
    }

    fn collection(name: &str, role: Role, parameter: TypeDescriptor, shape: CollectionShape) -> Self {
        Self::custom(name, role, parameter, move |model, receiver, argument| {
            match collection_nodes(role, argument) {
                Ok(children) => model.set_children(receiver, role, children, shape).into(),
                Err(outcome) => outcome,
            }
        })
    }

    /// `add_x(node)`: appends one child to a collection.
    pub fn adder(name: &str, role: Role, parameter: TypeDescriptor) -> Self {
        Self::custom(name, role, parameter, move |model, receiver, argument| {
            match argument.as_node() {
                Some(child) => model.add_child(receiver, role, child).into(),
                None => mismatch(role, "node", argument),
            }
        })
    }

    /// Leaf field: text, flags, enums, class objects, handles, arrays of leaves.
    pub fn leaf(name: &str, role: Role, parameter: TypeDescriptor) -> Self {
        Self::custom(name, role, parameter, move |model, receiver, argument| {
            model.set_leaf(receiver, role, argument.clone()).into()
        })
    }

    /// Leaf field holding a set of enum members.
    pub fn leaf_set(name: &str, role: Role, element: TypeDescriptor) -> Self {
        Self::leaf(name, role, TypeDescriptor::set_of(element))
    }

    pub fn unsettable(mut self) -> Self {
        self.exemption = Some(Exemption::Unsettable);
        self
    }

    pub fn derived(mut self) -> Self {
        self.exemption = Some(Exemption::Derived);
        self
    }
}

impl StructuralMutator for MutatorDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Role {
        self.role
    }

    fn parameter(&self) -> &TypeDescriptor {
        &self.parameter
    }

    fn exemption(&self) -> Option<Exemption> {
        self.exemption
    }

    fn apply(&self, model: &mut Model, receiver: NodeId, argument: &Value) -> MutationOutcome {
        (self.apply)(model, receiver, argument)
    }
}

/// Runs right after a node is allocated, before anyone can see it.
pub type Initializer = fn(&mut Model, NodeId) -> DomainResult<()>;

/// A registered node kind.
pub struct KindDef {
    id: KindId,
    categories: Vec<Category>,
    instantiable: bool,
    namespace: bool,
    init: Option<Initializer>,
    mutators: Vec<Box<dyn StructuralMutator>>,
}

impl fmt::Debug for KindDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDef")
            .field("id", &self.id)
            .field("categories", &self.categories)
            .field("instantiable", &self.instantiable)
            .field("namespace", &self.namespace)
            .field("mutators", &self.mutators.len())
            .finish()
    }
}

impl KindDef {
    /// New instantiable kind. Every kind is an `Element`.
    pub fn new(id: KindId) -> Self {
        Self {
            id,
            categories: vec![Category::Element],
            instantiable: true,
            namespace: false,
            init: None,
            mutators: Vec::new(),
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn not_instantiable(mut self) -> Self {
        self.instantiable = false;
        self
    }

    /// Marks a namespace kind; synthesized instances get a synthetic name.
    pub fn namespace(mut self) -> Self {
        self.namespace = true;
        self
    }

    pub fn init(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }

    pub fn mutator(mut self, mutator: impl StructuralMutator + 'static) -> Self {
        self.mutators.push(Box::new(mutator));
        self
    }

    pub fn mutators<M, I>(mut self, mutators: I) -> Self
    where
        M: StructuralMutator + 'static,
        I: IntoIterator<Item = M>,
    {
        for m in mutators {
            self.mutators.push(Box::new(m));
        }
        self
    }

    pub fn id(&self) -> KindId {
        self.id
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_instantiable(&self) -> bool {
        self.instantiable
    }

    pub fn is_namespace(&self) -> bool {
        self.namespace
    }

    pub fn is_reference(&self) -> bool {
        self.categories.contains(&Category::Reference)
    }

    pub fn mutator_table(&self) -> &[Box<dyn StructuralMutator>] {
        &self.mutators
    }

    pub fn find_mutator(&self, name: &str) -> Option<&dyn StructuralMutator> {
        self.mutators
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    /// True when values of this kind satisfy `target`.
    pub fn is_assignable_to(&self, target: &NodeType) -> bool {
        match target {
            NodeType::Kind(name) => name == self.id.name(),
            NodeType::Category(category) => self.categories.contains(category),
        }
    }

    pub(crate) fn initialize(&self, model: &mut Model, id: NodeId) -> DomainResult<()> {
        match self.init {
            Some(init) => init(model, id),
            None => Ok(()),
        }
    }
}

/// Ordered registry of node kinds and enumerations.
#[derive(Debug, Default)]
pub struct Catalog {
    kinds: Vec<KindDef>,
    enums: Vec<EnumType>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The Java-flavored kinds shipped with the crate.
    pub fn builtin() -> Self {
        crate::domain::kinds::register_builtin(Self::builder()).build()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &KindDef> {
        self.kinds.iter()
    }

    pub fn kind(&self, id: KindId) -> Option<&KindDef> {
        self.kinds.iter().find(|k| k.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&KindDef> {
        self.kinds.iter().find(|k| k.id.name() == name)
    }

    /// Instantiable, non-reference kinds: the ones a run verifies.
    pub fn verifiable_kinds(&self) -> impl Iterator<Item = &KindDef> {
        self.kinds
            .iter()
            .filter(|k| k.instantiable && !k.is_reference())
    }

    /// First instantiable kind, in registration order, satisfying `target`.
    pub fn first_instantiable(&self, target: &NodeType) -> Option<&KindDef> {
        self.kinds
            .iter()
            .find(|k| k.instantiable && k.is_assignable_to(target))
    }

    pub fn has_enum(&self, e: EnumType) -> bool {
        self.enums.contains(&e)
    }

    pub fn enums(&self) -> &[EnumType] {
        &self.enums
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    kinds: Vec<KindDef>,
    enums: Vec<EnumType>,
}

impl CatalogBuilder {
    /// Registers a kind. Re-registering an id replaces the earlier
    /// definition in place.
    pub fn register(mut self, kind: KindDef) -> Self {
        match self.kinds.iter().position(|k| k.id == kind.id) {
            Some(pos) => {
                warn!(kind = %kind.id, "kind registered twice, replacing");
                self.kinds[pos] = kind;
            }
            None => self.kinds.push(kind),
        }
        self
    }

    pub fn register_enum(mut self, e: EnumType) -> Self {
        if !self.enums.contains(&e) {
            self.enums.push(e);
        }
        self
    }

    pub fn build(self) -> Catalog {
        debug!(
            kinds = self.kinds.len(),
            enums = self.enums.len(),
            "catalog built"
        );
        Catalog {
            kinds: self.kinds,
            enums: self.enums,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: KindId = KindId::new("Widget");
    const GADGET: KindId = KindId::new("Gadget");

    fn catalog() -> Catalog {
        Catalog::builder()
            .register(
                KindDef::new(WIDGET)
                    .category(Category::Expression)
                    .not_instantiable(),
            )
            .register(KindDef::new(GADGET).category(Category::Expression))
            .register_enum(EnumType::ModifierKind)
            .build()
    }

    #[test]
    fn given_category_when_resolving_then_skips_abstract_kinds() {
        let catalog = catalog();
        let found = catalog.first_instantiable(&NodeType::Category(Category::Expression));
        assert_eq!(found.map(KindDef::id), Some(GADGET));
    }

    #[test]
    fn given_every_kind_when_checking_element_category_then_assignable() {
        let catalog = catalog();
        assert!(catalog
            .kinds()
            .all(|k| k.is_assignable_to(&NodeType::Category(Category::Element))));
    }

    #[test]
    fn given_duplicate_registration_when_building_then_replaces_in_place() {
        let catalog = Catalog::builder()
            .register(KindDef::new(WIDGET))
            .register(KindDef::new(GADGET))
            .register(KindDef::new(WIDGET).category(Category::Statement))
            .build();
        let ids: Vec<_> = catalog.kinds().map(KindDef::id).collect();
        assert_eq!(ids, vec![WIDGET, GADGET]);
        assert!(catalog
            .kind(WIDGET)
            .is_some_and(|k| k.categories().contains(&Category::Statement)));
    }

    #[test]
    fn given_registered_enum_when_queried_then_present() {
        let catalog = catalog();
        assert!(catalog.has_enum(EnumType::ModifierKind));
        assert!(!catalog.has_enum(EnumType::DocTagType));
    }
}
