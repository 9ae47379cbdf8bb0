//! Declarations, packages and documentation elements.

use tracing::debug;

use crate::domain::catalog::{mismatch, KindDef, MutationOutcome, MutatorDef};
use crate::domain::descriptor::{Category, TypeDescriptor};
use crate::domain::error::DomainResult;
use crate::domain::kinds::{
    annotation_mutators, create_named, element_mutators, simple_name, type_ref, typed,
    ANNOTATION, BLOCK, CLASS, COMMENT, DOC_TAG, METHOD, PACKAGE, PARAMETER,
};
use crate::domain::model::{Model, NodeId};
use crate::domain::role::Role;
use crate::domain::value::{EnumType, Value};

fn modifiers() -> MutatorDef {
    MutatorDef::leaf_set(
        "set_modifiers",
        Role::Modifier,
        TypeDescriptor::Enum(EnumType::ModifierKind),
    )
}

pub(super) fn annotation() -> KindDef {
    KindDef::new(ANNOTATION)
        .category(Category::Expression)
        .mutators([
            MutatorDef::single("set_annotation_type", Role::AnnotationType, type_ref()),
            MutatorDef::adder(
                "add_value",
                Role::Value,
                TypeDescriptor::category(Category::Expression),
            ),
        ])
        .mutators(element_mutators())
}

pub(super) fn class() -> KindDef {
    let ty = || TypeDescriptor::category(Category::Type);
    KindDef::new(CLASS)
        .category(Category::Type)
        .category(Category::TypeMember)
        .mutators([
            simple_name(),
            MutatorDef::single("set_superclass", Role::Superclass, type_ref()),
            MutatorDef::set("set_methods", Role::Method, TypeDescriptor::kind(METHOD)),
            MutatorDef::adder("add_method", Role::Method, TypeDescriptor::kind(METHOD)),
            MutatorDef::set("set_nested_types", Role::NestedType, ty()),
            MutatorDef::adder("add_nested_type", Role::NestedType, ty()),
            modifiers(),
            MutatorDef::leaf(
                "set_compilation_unit",
                Role::CompilationUnit,
                TypeDescriptor::CompilationUnit,
            ),
            MutatorDef::leaf("set_shadow", Role::IsShadow, TypeDescriptor::Boolean),
        ])
        .mutators(element_mutators())
}

/// Comments cannot carry comments of their own.
fn no_nested_comments(name: &str, parameter: TypeDescriptor) -> MutatorDef {
    let detail = format!("{} on a comment", name);
    MutatorDef::custom(name, Role::Comment, parameter, move |_, _, _| {
        MutationOutcome::unsupported(detail.clone())
    })
    .unsettable()
}

pub(super) fn comment() -> KindDef {
    KindDef::new(COMMENT)
        .category(Category::Statement)
        .mutators([
            MutatorDef::leaf("set_content", Role::CommentContent, TypeDescriptor::Text),
            MutatorDef::leaf(
                "set_comment_type",
                Role::CommentType,
                TypeDescriptor::Enum(EnumType::CommentType),
            ),
        ])
        .mutators(annotation_mutators())
        .mutators([
            no_nested_comments(
                "set_comments",
                TypeDescriptor::list_of(TypeDescriptor::kind(COMMENT)),
            ),
            no_nested_comments("add_comment", TypeDescriptor::kind(COMMENT)),
        ])
}

pub(super) fn doc_tag() -> KindDef {
    KindDef::new(DOC_TAG)
        .mutators([
            MutatorDef::leaf("set_content", Role::CommentContent, TypeDescriptor::Text),
            MutatorDef::leaf("set_param", Role::DocTagParam, TypeDescriptor::Text),
            MutatorDef::leaf(
                "set_type",
                Role::DocTagType,
                TypeDescriptor::Enum(EnumType::DocTagType),
            ),
        ])
        .mutators(element_mutators())
}

pub(super) fn method() -> KindDef {
    KindDef::new(METHOD)
        .category(Category::TypeMember)
        .mutators([
            simple_name(),
            typed(),
            MutatorDef::single("set_body", Role::Body, TypeDescriptor::kind(BLOCK)),
            MutatorDef::list("set_parameters", Role::Parameter, TypeDescriptor::kind(PARAMETER)),
            MutatorDef::adder("add_parameter", Role::Parameter, TypeDescriptor::kind(PARAMETER)),
            MutatorDef::set("set_thrown_types", Role::ThrownType, type_ref()),
            MutatorDef::adder("add_thrown_type", Role::ThrownType, type_ref()),
            MutatorDef::leaf(
                "set_modifier_array",
                Role::Modifier,
                TypeDescriptor::array_of(TypeDescriptor::Enum(EnumType::ModifierKind)),
            ),
            MutatorDef::leaf("set_default_method", Role::IsDefault, TypeDescriptor::Boolean),
        ])
        .mutators(element_mutators())
}

pub(super) fn package() -> KindDef {
    let ty = || TypeDescriptor::category(Category::Type);
    KindDef::new(PACKAGE)
        .namespace()
        .mutators([
            simple_name(),
            MutatorDef::custom(
                "add_package",
                Role::SubPackage,
                TypeDescriptor::kind(PACKAGE),
                |model, receiver, argument| match argument.as_node() {
                    Some(pkg) => add_package(model, receiver, pkg).into(),
                    None => mismatch(Role::SubPackage, "package node", argument),
                },
            ),
            MutatorDef::set("set_packages", Role::SubPackage, TypeDescriptor::kind(PACKAGE)),
            MutatorDef::adder("add_type", Role::NestedType, ty()),
            MutatorDef::set("set_types", Role::NestedType, ty()),
            MutatorDef::leaf(
                "set_platform_package",
                Role::PlatformPackage,
                TypeDescriptor::PlatformPackage,
            ),
        ])
        .mutators(element_mutators())
}

pub(super) fn parameter() -> KindDef {
    KindDef::new(PARAMETER)
        .mutators([
            simple_name(),
            typed(),
            MutatorDef::leaf("set_varargs", Role::IsVarargs, TypeDescriptor::Boolean),
            modifiers(),
        ])
        .mutators(element_mutators())
}

/// Adds `pkg` as a sub-package of `receiver`. An anonymous package has its
/// contents merged into the receiver; a package named like an existing
/// sub-package is merged into that sub-package.
fn add_package(model: &mut Model, receiver: NodeId, pkg: NodeId) -> DomainResult<()> {
    let name = model.simple_name(pkg).to_string();
    if name.is_empty() {
        return merge_contents(model, pkg, receiver);
    }
    let existing = model
        .field(receiver, Role::SubPackage)
        .map(Value::nodes)
        .unwrap_or_default()
        .into_iter()
        .find(|&p| p != pkg && model.simple_name(p) == name);
    match existing {
        Some(target) => {
            debug!(package = %name, "merging into existing sub-package");
            merge_contents(model, pkg, target)
        }
        None => model.add_child(receiver, Role::SubPackage, pkg),
    }
}

fn merge_contents(model: &mut Model, from: NodeId, into: NodeId) -> DomainResult<()> {
    let packages = model
        .field(from, Role::SubPackage)
        .map(Value::nodes)
        .unwrap_or_default();
    for pkg in packages {
        add_package(model, into, pkg)?;
    }
    let types = model
        .field(from, Role::NestedType)
        .map(Value::nodes)
        .unwrap_or_default();
    for ty in types {
        model.add_child(into, Role::NestedType, ty)?;
    }
    Ok(())
}

/// The model's root package, created on first use.
pub fn default_package(model: &mut Model) -> DomainResult<NodeId> {
    if let Some(pkg) = model.default_container().filter(|&p| model.contains(p)) {
        return Ok(pkg);
    }
    let pkg = model.create(PACKAGE)?;
    model.set_default_container(pkg);
    Ok(pkg)
}

/// Creates a class named `name` inside the default package.
pub fn create_class(model: &mut Model, name: &str) -> DomainResult<NodeId> {
    let class = create_named(model, CLASS, name)?;
    let pkg = default_package(model)?;
    model.add_child(pkg, Role::NestedType, class)?;
    Ok(class)
}
