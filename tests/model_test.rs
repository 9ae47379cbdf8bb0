//! Tests for the node model: parent links, events, cloning and deletion.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rstest::{fixture, rstest};

use ast_contract::domain::kinds::{BLOCK, CLASS, IF, LITERAL, METHOD, RETURN};
use ast_contract::domain::{
    Action, Catalog, CollectionShape, DomainError, EventLog, Model, NodeId, Role, SharedListener,
    Value,
};
use ast_contract::util::testing;

#[fixture]
fn model() -> Model {
    testing::init_test_setup();
    Model::new(Arc::new(Catalog::builtin()))
}

fn with_log(model: &mut Model) -> Rc<RefCell<EventLog>> {
    let log = Rc::new(RefCell::new(EventLog::new()));
    let listener: SharedListener = log.clone();
    model.set_listener(Some(listener));
    log
}

/// Block -> If -> Block -> Return, returning every level.
fn nested(model: &mut Model) -> [NodeId; 4] {
    let outer = model.create(BLOCK).unwrap();
    let if_stmt = model.create(IF).unwrap();
    let inner = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();
    model.add_child(outer, Role::Statement, if_stmt).unwrap();
    model.set_child(if_stmt, Role::Then, inner).unwrap();
    model.add_child(inner, Role::Statement, ret).unwrap();
    [outer, if_stmt, inner, ret]
}

// ============================================================
// Parent links
// ============================================================

#[rstest]
fn given_fresh_node_when_created_then_has_no_parent(mut model: Model) {
    let block = model.create(BLOCK).unwrap();

    assert_eq!(model.parent(block), None);
    assert_eq!(model.ancestors(block).count(), 0);
}

#[rstest]
fn given_single_child_when_set_then_parent_and_role_recorded(mut model: Model) {
    let method = model.create(METHOD).unwrap();
    let body = model.create(BLOCK).unwrap();

    model.set_child(method, Role::Body, body).unwrap();

    assert_eq!(model.parent(body), Some(method));
    assert_eq!(model.role_in_parent(body), Some(Role::Body));
    assert_eq!(model.field(method, Role::Body), Some(&Value::Node(body)));
}

#[rstest]
fn given_replaced_child_when_set_then_old_child_is_detached(mut model: Model) {
    let method = model.create(METHOD).unwrap();
    let first = model.create(BLOCK).unwrap();
    let second = model.create(BLOCK).unwrap();
    model.set_child(method, Role::Body, first).unwrap();

    model.set_child(method, Role::Body, second).unwrap();

    assert_eq!(model.parent(first), None);
    assert_eq!(model.parent(second), Some(method));
}

#[rstest]
fn given_child_held_elsewhere_when_adopted_then_moves(mut model: Model) {
    let a = model.create(BLOCK).unwrap();
    let b = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();
    model.add_child(a, Role::Statement, ret).unwrap();

    model.add_child(b, Role::Statement, ret).unwrap();

    assert_eq!(model.parent(ret), Some(b));
    assert_eq!(model.field(a, Role::Statement), Some(&Value::List(vec![])));
}

#[rstest]
fn given_ancestor_as_child_when_adopting_then_rejects_cycle(mut model: Model) {
    let [outer, _, _, ret] = nested(&mut model);

    let result = model.add_child(ret, Role::Statement, outer);

    assert!(matches!(result, Err(DomainError::Cycle { .. })));
    assert_eq!(model.parent(outer), None);
}

#[rstest]
fn given_self_as_child_when_adopting_then_rejects_cycle(mut model: Model) {
    let block = model.create(BLOCK).unwrap();

    let result = model.add_child(block, Role::Statement, block);

    assert!(matches!(result, Err(DomainError::Cycle { .. })));
}

#[rstest]
fn given_deep_tree_when_walking_ancestors_then_nearest_first(mut model: Model) {
    let [outer, if_stmt, inner, ret] = nested(&mut model);

    let ancestors: Vec<_> = model.ancestors(ret).collect();

    assert_eq!(ancestors, vec![inner, if_stmt, outer]);
    assert!(model.has_ancestor(ret, outer));
    assert!(!model.has_ancestor(outer, ret));
    assert!(!model.has_ancestor(ret, ret));
    assert_eq!(model.root_of(ret), outer);
}

#[rstest]
fn given_collection_when_set_children_then_old_elements_released(mut model: Model) {
    let block = model.create(BLOCK).unwrap();
    let kept = model.create(RETURN).unwrap();
    let dropped = model.create(RETURN).unwrap();
    let added = model.create(RETURN).unwrap();
    model
        .set_children(block, Role::Statement, vec![kept, dropped], CollectionShape::List)
        .unwrap();

    model
        .set_children(block, Role::Statement, vec![kept, added], CollectionShape::List)
        .unwrap();

    assert_eq!(model.parent(kept), Some(block));
    assert_eq!(model.parent(added), Some(block));
    assert_eq!(model.parent(dropped), None);
}

#[rstest]
fn given_set_shape_when_set_children_then_duplicates_collapse(mut model: Model) {
    let class = model.create(CLASS).unwrap();
    let method = model.create(METHOD).unwrap();

    model
        .set_children(class, Role::Method, vec![method, method], CollectionShape::Set)
        .unwrap();

    assert_eq!(model.field(class, Role::Method).map(Value::nodes), Some(vec![method]));
}

#[rstest]
fn given_cycle_among_children_when_set_children_then_model_unchanged(mut model: Model) {
    let [outer, _, inner, ret] = nested(&mut model);
    let holder = model.create(BLOCK).unwrap();
    let a = model.create(RETURN).unwrap();
    model.add_child(holder, Role::Statement, a).unwrap();
    let log = with_log(&mut model);

    let result = model.set_children(inner, Role::Statement, vec![a, outer], CollectionShape::List);

    assert!(matches!(result, Err(DomainError::Cycle { .. })));
    assert_eq!(model.parent(a), Some(holder));
    assert_eq!(
        model.field(holder, Role::Statement).map(Value::nodes),
        Some(vec![a])
    );
    assert_eq!(
        model.field(inner, Role::Statement).map(Value::nodes),
        Some(vec![ret])
    );
    assert!(log.borrow().events().is_empty());
}

#[rstest]
fn given_node_field_when_overwritten_by_leaf_then_node_detached(mut model: Model) {
    let block = model.create(BLOCK).unwrap();
    let other = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();
    model.set_child(block, Role::Label, ret).unwrap();

    model.set_leaf(block, Role::Label, Value::text("x")).unwrap();

    assert_eq!(model.parent(ret), None);
    assert!(!model.has_ancestor(ret, block));

    let log = with_log(&mut model);
    model.add_child(other, Role::Statement, ret).unwrap();
    let events = log.borrow_mut().take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].element, other);
}

#[rstest]
fn given_single_valued_field_when_adding_then_rejects(mut model: Model) {
    let method = model.create(METHOD).unwrap();
    let body = model.create(BLOCK).unwrap();
    let other = model.create(BLOCK).unwrap();
    model.set_child(method, Role::Body, body).unwrap();

    let result = model.add_child(method, Role::Body, other);

    assert!(matches!(result, Err(DomainError::ArgumentMismatch { .. })));
    assert_eq!(model.parent(other), None);
}

#[rstest]
fn given_node_in_leaf_value_when_setting_leaf_then_rejects(mut model: Model) {
    let block = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();

    let result = model.set_leaf(block, Role::Label, Value::Node(ret));

    assert!(matches!(result, Err(DomainError::ArgumentMismatch { .. })));
}

#[rstest]
fn given_unknown_kind_when_creating_then_fails(mut model: Model) {
    let result = model.create(ast_contract::domain::KindId::new("Lambda"));

    assert!(matches!(result, Err(DomainError::UnknownKind(name)) if name == "Lambda"));
}

// ============================================================
// Events
// ============================================================

#[rstest]
fn given_listener_when_setting_fresh_field_then_single_added_event(mut model: Model) {
    let method = model.create(METHOD).unwrap();
    let body = model.create(BLOCK).unwrap();
    let log = with_log(&mut model);

    model.set_child(method, Role::Body, body).unwrap();

    let events = log.borrow_mut().take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].element, method);
    assert_eq!(events[0].role, Role::Body);
    assert_eq!(
        events[0].action,
        Action::Added {
            value: Value::Node(body)
        }
    );
}

#[rstest]
fn given_listener_when_replacing_leaf_then_updated_event(mut model: Model) {
    let block = model.create(BLOCK).unwrap();
    model.set_leaf(block, Role::Label, Value::text("a")).unwrap();
    let log = with_log(&mut model);

    model.set_leaf(block, Role::Label, Value::text("b")).unwrap();

    let events = log.borrow_mut().take();
    assert_eq!(
        events[0].action,
        Action::Updated {
            old: Value::text("a"),
            new: Value::text("b")
        }
    );
}

#[rstest]
fn given_same_value_when_setting_then_no_event(mut model: Model) {
    let literal = model.create(LITERAL).unwrap();
    model.set_leaf(literal, Role::Value, Value::Integer(42)).unwrap();
    let log = with_log(&mut model);

    model.set_leaf(literal, Role::Value, Value::Integer(42)).unwrap();

    assert!(log.borrow().events().is_empty());
}

#[rstest]
fn given_moved_child_when_adopting_then_removal_reported_on_old_holder(mut model: Model) {
    let a = model.create(BLOCK).unwrap();
    let b = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();
    model.add_child(a, Role::Statement, ret).unwrap();
    let log = with_log(&mut model);

    model.add_child(b, Role::Statement, ret).unwrap();

    let events = log.borrow_mut().take();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].element, a);
    assert!(matches!(events[0].action, Action::Removed { .. }));
    assert_eq!(events[1].element, b);
    assert!(matches!(events[1].action, Action::Added { .. }));
}

#[rstest]
fn given_no_listener_when_mutating_then_nothing_breaks(mut model: Model) {
    let block = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();

    model.add_child(block, Role::Statement, ret).unwrap();

    assert!(model.listener().is_none());
    assert_eq!(model.parent(ret), Some(block));
}

#[rstest]
fn given_installed_listener_when_replaced_then_previous_returned(mut model: Model) {
    let first = with_log(&mut model);
    let second: SharedListener = Rc::new(RefCell::new(EventLog::new()));

    let previous = model.set_listener(Some(second)).unwrap();

    let first_dyn: SharedListener = first;
    assert!(Rc::ptr_eq(&previous, &first_dyn));
}

// ============================================================
// Removal, deletion, cloning
// ============================================================

#[rstest]
fn given_child_when_removed_then_detached_and_reported(mut model: Model) {
    let block = model.create(BLOCK).unwrap();
    let ret = model.create(RETURN).unwrap();
    model.add_child(block, Role::Statement, ret).unwrap();
    let log = with_log(&mut model);

    assert!(model.remove_child(block, ret).unwrap());

    assert_eq!(model.parent(ret), None);
    assert_eq!(log.borrow().events().len(), 1);
    assert!(!model.remove_child(block, ret).unwrap());
}

#[rstest]
fn given_attached_node_when_deleted_then_stays_in_arena_detached(mut model: Model) {
    let method = model.create(METHOD).unwrap();
    let body = model.create(BLOCK).unwrap();
    model.set_child(method, Role::Body, body).unwrap();

    model.delete(body).unwrap();

    assert!(model.contains(body));
    assert_eq!(model.parent(body), None);
    assert_eq!(model.field(method, Role::Body), None);
}

#[rstest]
fn given_deep_node_when_cloned_then_copy_is_detached(mut model: Model) {
    let [_, _, inner, ret] = nested(&mut model);

    let copy = model.clone_node(inner).unwrap();

    assert_ne!(copy, inner);
    assert_eq!(model.ancestors(copy).count(), 0);
    let copied_children = model.children(copy);
    assert_eq!(copied_children.len(), 1);
    assert_ne!(copied_children[0], ret);
    assert_eq!(model.parent(copied_children[0]), Some(copy));
    assert!(model.structurally_equal(&Value::Node(inner), &Value::Node(copy)));
}

#[rstest]
fn given_listener_when_cloning_then_no_event(mut model: Model) {
    let [outer, ..] = nested(&mut model);
    let log = with_log(&mut model);

    model.clone_node(outer).unwrap();

    assert!(log.borrow().events().is_empty());
}

#[rstest]
fn given_compilation_units_when_compared_then_structurally_equal(mut model: Model) {
    let a = Value::Opaque(model.create_compilation_unit());
    let b = Value::Opaque(model.create_compilation_unit());

    assert_ne!(a, b);
    assert!(model.structurally_equal(&a, &b));
}

// ============================================================
// Identifiers
// ============================================================

#[rstest]
fn given_strict_environment_when_checking_numeric_name_then_rejects(mut model: Model) {
    assert!(matches!(
        model.check_identifier("42"),
        Err(DomainError::InvalidIdentifier(_))
    ));

    let previous = model.set_ignore_syntax_errors(true);

    assert!(!previous);
    assert!(model.check_identifier("42").is_ok());
}

#[rstest]
fn given_package_name_when_checking_then_dotted_segments_accepted(model: Model) {
    assert!(model.check_identifier("org.example.app").is_ok());
    assert!(model.check_identifier("org..app").is_err());
}
