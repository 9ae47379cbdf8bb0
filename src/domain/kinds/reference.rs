//! References point at declarations by name; they are never verified.

use crate::domain::catalog::{KindDef, MutatorDef};
use crate::domain::descriptor::{Category, TypeDescriptor};
use crate::domain::kinds::{simple_name, type_ref, typed, EXECUTABLE_REFERENCE, TYPE_REFERENCE};
use crate::domain::role::Role;

pub(super) fn type_reference() -> KindDef {
    KindDef::new(TYPE_REFERENCE)
        .category(Category::Reference)
        .mutators([
            simple_name(),
            MutatorDef::list("set_actual_type_arguments", Role::TypeArgument, type_ref()),
            MutatorDef::leaf("set_shadow", Role::IsShadow, TypeDescriptor::Boolean),
        ])
}

pub(super) fn executable_reference() -> KindDef {
    KindDef::new(EXECUTABLE_REFERENCE)
        .category(Category::Reference)
        .mutators([
            simple_name(),
            typed(),
            MutatorDef::list("set_parameters", Role::ParameterType, type_ref()),
        ])
}
