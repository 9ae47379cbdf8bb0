//! Built-in Java-flavored node kinds.
//!
//! Each kind declares its full mutator table. Mutators every element
//! shares (annotations, comments) are appended per kind so a kind can
//! replace them, as `Comment` does.

mod code;
mod declaration;
mod reference;

use crate::domain::catalog::{CatalogBuilder, KindId, MutationOutcome, MutatorDef};
use crate::domain::descriptor::TypeDescriptor;
use crate::domain::error::DomainResult;
use crate::domain::model::{Model, NodeId};
use crate::domain::role::Role;
use crate::domain::value::{EnumType, Value};

pub use declaration::{create_class, default_package};

pub const ANNOTATION: KindId = KindId::new("Annotation");
pub const BINARY_OPERATOR: KindId = KindId::new("BinaryOperator");
pub const BLOCK: KindId = KindId::new("Block");
pub const CLASS: KindId = KindId::new("Class");
pub const CODE_SNIPPET_EXPRESSION: KindId = KindId::new("CodeSnippetExpression");
pub const COMMENT: KindId = KindId::new("Comment");
pub const DOC_TAG: KindId = KindId::new("DocTag");
pub const IF: KindId = KindId::new("If");
pub const INVOCATION: KindId = KindId::new("Invocation");
pub const LITERAL: KindId = KindId::new("Literal");
pub const LOCAL_VARIABLE: KindId = KindId::new("LocalVariable");
pub const METHOD: KindId = KindId::new("Method");
pub const NEW_ARRAY: KindId = KindId::new("NewArray");
pub const PACKAGE: KindId = KindId::new("Package");
pub const PARAMETER: KindId = KindId::new("Parameter");
pub const RETURN: KindId = KindId::new("Return");
pub const THROW: KindId = KindId::new("Throw");
pub const TYPE_REFERENCE: KindId = KindId::new("TypeReference");
pub const EXECUTABLE_REFERENCE: KindId = KindId::new("ExecutableReference");

/// Registers every built-in kind and enumeration, in alphabetical order of
/// kind name with references last.
pub fn register_builtin(builder: CatalogBuilder) -> CatalogBuilder {
    let builder = EnumType::ALL
        .into_iter()
        .fold(builder, CatalogBuilder::register_enum);

    builder
        .register(declaration::annotation())
        .register(code::binary_operator())
        .register(code::block())
        .register(declaration::class())
        .register(code::code_snippet_expression())
        .register(declaration::comment())
        .register(declaration::doc_tag())
        .register(code::if_statement())
        .register(code::invocation())
        .register(code::literal())
        .register(code::local_variable())
        .register(declaration::method())
        .register(code::new_array())
        .register(declaration::package())
        .register(declaration::parameter())
        .register(code::return_statement())
        .register(code::throw_statement())
        .register(reference::type_reference())
        .register(reference::executable_reference())
}

fn type_ref() -> TypeDescriptor {
    TypeDescriptor::kind(TYPE_REFERENCE)
}

fn annotation_mutators() -> Vec<MutatorDef> {
    vec![
        MutatorDef::list("set_annotations", Role::Annotation, TypeDescriptor::kind(ANNOTATION)),
        MutatorDef::adder("add_annotation", Role::Annotation, TypeDescriptor::kind(ANNOTATION)),
    ]
}

fn comment_mutators() -> Vec<MutatorDef> {
    vec![
        MutatorDef::list("set_comments", Role::Comment, TypeDescriptor::kind(COMMENT)),
        MutatorDef::adder("add_comment", Role::Comment, TypeDescriptor::kind(COMMENT)),
    ]
}

/// Annotation and comment mutators every element carries.
fn element_mutators() -> Vec<MutatorDef> {
    let mut mutators = annotation_mutators();
    mutators.extend(comment_mutators());
    mutators
}

/// `set_simple_name(String)`, rejecting invalid identifiers unless syntax
/// errors are ignored.
fn simple_name() -> MutatorDef {
    MutatorDef::custom(
        "set_simple_name",
        Role::Name,
        TypeDescriptor::Text,
        |model, receiver, argument| {
            let result = match argument.as_text() {
                Some(name) => model
                    .check_identifier(name)
                    .and_then(|()| model.set_leaf(receiver, Role::Name, argument.clone())),
                None => model.set_leaf(receiver, Role::Name, argument.clone()),
            };
            MutationOutcome::from(result)
        },
    )
}

/// `set_type(TypeReference)` on typed elements.
fn typed() -> MutatorDef {
    MutatorDef::single("set_type", Role::Type, type_ref())
}

fn type_casts() -> Vec<MutatorDef> {
    vec![
        MutatorDef::list("set_type_casts", Role::TypeCast, type_ref()),
        MutatorDef::adder("add_type_cast", Role::TypeCast, type_ref()),
    ]
}

/// Node under `role`, if any.
fn child(model: &Model, receiver: NodeId, role: Role) -> Option<NodeId> {
    model.field(receiver, role).and_then(Value::as_node)
}

/// Creates a named node of `kind`.
fn create_named(model: &mut Model, kind: KindId, name: &str) -> DomainResult<NodeId> {
    model.check_identifier(name)?;
    let id = model.create(kind)?;
    model.set_leaf(id, Role::Name, Value::text(name))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::catalog::Catalog;

    #[test]
    fn given_builtin_catalog_when_listing_then_every_kind_has_unique_mutator_names() {
        let catalog = Catalog::builtin();
        for kind in catalog.kinds() {
            let mut seen = HashSet::new();
            for m in kind.mutator_table() {
                assert!(seen.insert(m.name()), "{}.{} declared twice", kind.id(), m.name());
            }
        }
    }

    #[test]
    fn given_builtin_catalog_when_listing_references_then_excluded_from_verifiable() {
        let catalog = Catalog::builtin();
        let verifiable: Vec<_> = catalog.verifiable_kinds().map(|k| k.id()).collect();
        assert!(!verifiable.contains(&TYPE_REFERENCE));
        assert!(!verifiable.contains(&EXECUTABLE_REFERENCE));
        assert_eq!(verifiable.len(), 17);
    }
}
