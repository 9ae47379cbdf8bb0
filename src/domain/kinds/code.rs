//! Statements and expressions.

use crate::domain::catalog::{mismatch, KindDef, MutationOutcome, MutatorDef};
use crate::domain::descriptor::{Category, ClassBound, NodeType, TypeDescriptor};
use crate::domain::error::DomainResult;
use crate::domain::kinds::{
    child, element_mutators, type_casts, type_ref, typed, BINARY_OPERATOR, BLOCK,
    CODE_SNIPPET_EXPRESSION, EXECUTABLE_REFERENCE, IF, INVOCATION, LITERAL, LOCAL_VARIABLE,
    NEW_ARRAY, RETURN, THROW,
};
use crate::domain::model::{Model, NodeId};
use crate::domain::role::Role;
use crate::domain::value::{EnumType, Value};

fn expression() -> TypeDescriptor {
    TypeDescriptor::category(Category::Expression)
}

fn statement() -> TypeDescriptor {
    TypeDescriptor::category(Category::Statement)
}

pub(super) fn binary_operator() -> KindDef {
    KindDef::new(BINARY_OPERATOR)
        .category(Category::Expression)
        .mutators([
            MutatorDef::single("set_left_hand_operand", Role::LeftOperand, expression()),
            MutatorDef::single("set_right_hand_operand", Role::RightOperand, expression()),
            MutatorDef::leaf(
                "set_kind",
                Role::Operator,
                TypeDescriptor::Enum(EnumType::BinaryOperatorKind),
            ),
            typed(),
        ])
        .mutators(type_casts())
        .mutators(element_mutators())
}

pub(super) fn block() -> KindDef {
    KindDef::new(BLOCK)
        .category(Category::Statement)
        .mutators([
            MutatorDef::list("set_statements", Role::Statement, statement()),
            MutatorDef::adder("add_statement", Role::Statement, statement()),
            MutatorDef::custom(
                "insert_begin",
                Role::Statement,
                statement(),
                |model, receiver, argument| match argument.as_node() {
                    Some(stmt) => model.insert_child_first(receiver, Role::Statement, stmt).into(),
                    None => mismatch(Role::Statement, "statement node", argument),
                },
            ),
            MutatorDef::leaf("set_label", Role::Label, TypeDescriptor::Text),
        ])
        .mutators(element_mutators())
}

pub(super) fn code_snippet_expression() -> KindDef {
    KindDef::new(CODE_SNIPPET_EXPRESSION)
        .category(Category::Expression)
        .mutators([
            MutatorDef::leaf("set_value", Role::Value, TypeDescriptor::Text),
            typed(),
            // snippets are never cast
            MutatorDef::custom(
                "set_type_casts",
                Role::TypeCast,
                TypeDescriptor::list_of(type_ref()),
                |_, _, _| MutationOutcome::Refused,
            )
            .unsettable(),
            MutatorDef::leaf(
                "set_compiled_kind",
                Role::CompiledKind,
                TypeDescriptor::class_bounded_by(ClassBound::Node(NodeType::Category(
                    Category::Expression,
                ))),
            ),
        ])
        .mutators(element_mutators())
}

/// Installs `stmt` under `role`, wrapping anything but a block in a new one.
fn set_branch(model: &mut Model, receiver: NodeId, role: Role, stmt: NodeId) -> DomainResult<()> {
    if model.kind(stmt)? == BLOCK {
        return model.set_child(receiver, role, stmt);
    }
    let block = model.create(BLOCK)?;
    model.add_child(block, Role::Statement, stmt)?;
    model.set_child(receiver, role, block)
}

fn branch(name: &str, role: Role) -> MutatorDef {
    MutatorDef::custom(name, role, statement(), move |model, receiver, argument| {
        match argument.as_node() {
            Some(stmt) => set_branch(model, receiver, role, stmt).into(),
            None => mismatch(role, "statement node", argument),
        }
    })
}

pub(super) fn if_statement() -> KindDef {
    KindDef::new(IF)
        .category(Category::Statement)
        .mutators([
            MutatorDef::single("set_condition", Role::Condition, expression()),
            branch("set_then", Role::Then),
            branch("set_else", Role::Else),
        ])
        .mutators(element_mutators())
}

fn init_invocation(model: &mut Model, id: NodeId) -> DomainResult<()> {
    let executable = model.create(EXECUTABLE_REFERENCE)?;
    model.install_initial(id, Role::Executable, Value::Node(executable))
}

/// The invocation's type lives on its executable reference.
fn set_invocation_type(model: &mut Model, receiver: NodeId, ty: NodeId) -> DomainResult<()> {
    let executable = match child(model, receiver, Role::Executable) {
        Some(executable) => executable,
        None => {
            let executable = model.create(EXECUTABLE_REFERENCE)?;
            model.set_child(receiver, Role::Executable, executable)?;
            executable
        }
    };
    let copy = model.clone_node(ty)?;
    model.set_child(executable, Role::Type, copy)
}

pub(super) fn invocation() -> KindDef {
    KindDef::new(INVOCATION)
        .category(Category::Expression)
        .category(Category::Statement)
        .init(init_invocation)
        .mutators([
            MutatorDef::list("set_arguments", Role::Argument, expression()),
            MutatorDef::adder("add_argument", Role::Argument, expression()),
            MutatorDef::single("set_target", Role::Target, expression()),
            MutatorDef::single(
                "set_executable",
                Role::Executable,
                TypeDescriptor::kind(EXECUTABLE_REFERENCE),
            ),
            MutatorDef::list("set_actual_type_arguments", Role::TypeArgument, type_ref()),
            MutatorDef::custom("set_type", Role::Type, type_ref(), |model, receiver, argument| {
                match argument.as_node() {
                    Some(ty) => set_invocation_type(model, receiver, ty).into(),
                    None => mismatch(Role::Type, "type reference node", argument),
                }
            })
            .derived(),
        ])
        .mutators(type_casts())
        .mutators(element_mutators())
}

pub(super) fn literal() -> KindDef {
    KindDef::new(LITERAL)
        .category(Category::Expression)
        .mutators([
            MutatorDef::leaf("set_value", Role::Value, TypeDescriptor::Integer),
            MutatorDef::leaf(
                "set_value_class",
                Role::ValueClass,
                TypeDescriptor::ClassObject(None),
            ),
            typed(),
        ])
        .mutators(type_casts())
        .mutators(element_mutators())
}

pub(super) fn local_variable() -> KindDef {
    KindDef::new(LOCAL_VARIABLE)
        .category(Category::Statement)
        .mutators([
            super::simple_name(),
            typed(),
            MutatorDef::single("set_default_expression", Role::DefaultExpression, expression()),
            MutatorDef::leaf_set(
                "set_modifiers",
                Role::Modifier,
                TypeDescriptor::Enum(EnumType::ModifierKind),
            ),
            MutatorDef::leaf("set_inferred", Role::IsInferred, TypeDescriptor::Boolean),
        ])
        .mutators(element_mutators())
}

pub(super) fn new_array() -> KindDef {
    KindDef::new(NEW_ARRAY)
        .category(Category::Expression)
        .mutators([
            MutatorDef::list("set_elements", Role::Element, expression()),
            MutatorDef::adder("add_element", Role::Element, expression()),
            MutatorDef::leaf(
                "set_dimension_sizes",
                Role::DimensionSize,
                TypeDescriptor::array_of(TypeDescriptor::Integer),
            ),
            MutatorDef::leaf(
                "set_initial_values",
                Role::DefaultExpression,
                TypeDescriptor::array_of(TypeDescriptor::Any),
            ),
            typed(),
        ])
        .mutators(element_mutators())
}

pub(super) fn return_statement() -> KindDef {
    KindDef::new(RETURN)
        .category(Category::Statement)
        .mutator(MutatorDef::single(
            "set_returned_expression",
            Role::Expression,
            expression(),
        ))
        .mutators(element_mutators())
}

pub(super) fn throw_statement() -> KindDef {
    KindDef::new(THROW)
        .category(Category::Statement)
        .mutators([
            MutatorDef::single("set_thrown_expression", Role::Expression, expression()),
            MutatorDef::leaf(
                "set_exception_class",
                Role::ExceptionClass,
                TypeDescriptor::class_bounded_by(ClassBound::Throwable),
            ),
        ])
        .mutators(element_mutators())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::catalog::{Catalog, MutationFailure, StructuralMutator};
    use crate::domain::error::DomainError;
    use crate::domain::kinds::TYPE_REFERENCE;

    fn model() -> Model {
        Model::new(Arc::new(Catalog::builtin()))
    }

    #[test]
    fn given_non_block_when_setting_then_branch_then_wraps_in_block() {
        let mut model = model();
        let if_stmt = model.create(IF).unwrap();
        let ret = model.create(RETURN).unwrap();

        set_branch(&mut model, if_stmt, Role::Then, ret).unwrap();

        let wrapper = child(&model, if_stmt, Role::Then).unwrap();
        assert_eq!(model.kind(wrapper).unwrap(), BLOCK);
        assert_eq!(model.parent(ret), Some(wrapper));
        assert!(model.has_ancestor(ret, if_stmt));
    }

    #[test]
    fn given_block_when_setting_else_branch_then_installs_directly() {
        let mut model = model();
        let if_stmt = model.create(IF).unwrap();
        let block = model.create(BLOCK).unwrap();

        set_branch(&mut model, if_stmt, Role::Else, block).unwrap();

        assert_eq!(model.parent(block), Some(if_stmt));
    }

    #[test]
    fn given_invocation_when_setting_type_then_copy_lands_on_executable() {
        let mut model = model();
        let invocation = model.create(INVOCATION).unwrap();
        let ty = model.create(TYPE_REFERENCE).unwrap();

        set_invocation_type(&mut model, invocation, ty).unwrap();

        let executable = child(&model, invocation, Role::Executable).unwrap();
        let stored = child(&model, executable, Role::Type).unwrap();
        assert_ne!(stored, ty);
        assert_eq!(model.parent(ty), None);
        assert_eq!(model.parent(stored), Some(executable));
    }

    #[test]
    fn given_wrong_argument_when_setting_branch_then_fails_with_mismatch() {
        let mut model = model();
        let if_stmt = model.create(IF).unwrap();
        let outcome = branch("set_then", Role::Then).apply(&mut model, if_stmt, &Value::Integer(1));
        assert!(matches!(
            outcome,
            MutationOutcome::Failed(MutationFailure::Domain(DomainError::ArgumentMismatch { .. }))
        ));
        assert!(child(&model, if_stmt, Role::Then).is_none());
    }

    #[test]
    fn given_non_node_argument_when_inserting_or_typing_then_argument_mismatch() {
        let mut model = model();
        let catalog = model.catalog().clone();
        let block = model.create(BLOCK).unwrap();
        let invocation = model.create(INVOCATION).unwrap();

        let insert = catalog
            .find("Block")
            .and_then(|k| k.find_mutator("insert_begin"))
            .unwrap()
            .apply(&mut model, block, &Value::text("x"));
        let set_type = catalog
            .find("Invocation")
            .and_then(|k| k.find_mutator("set_type"))
            .unwrap()
            .apply(&mut model, invocation, &Value::Integer(1));

        for outcome in [insert, set_type] {
            assert!(matches!(
                outcome,
                MutationOutcome::Failed(MutationFailure::Domain(DomainError::ArgumentMismatch { .. }))
            ));
        }
    }
}
