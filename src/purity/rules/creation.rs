//! Allocation of objects, arrays and collections
//!
//! Allocating something that can be mutated after construction hands out new
//! shared mutable state, so only immutable types may be created.

use super::invocation::check_arguments;
use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Location, Member, MemberInitializer, Operation, OperationNode, TypeId};
use crate::purity::flow_state::transfer;

pub(super) fn check_object_creation(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::ObjectCreation {
        ty,
        constructor,
        arguments,
        initializers,
    } = &op.node
    else {
        return mismatched("object-creation", op);
    };

    if !is_immutable(*ty, ctx) {
        log::trace!("Allocation of mutable type {} at {}", ty, op.location);
        return Ok(Verdict::impure_at(op.location));
    }

    let verdict = check_arguments(arguments, ctx, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    let mut current = arguments
        .iter()
        .fold(state.clone(), |acc, argument| transfer(&argument.value, &acc));
    for initializer in initializers {
        let verdict = check_member_initializer(initializer, op.location, ctx, &current)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
        current = transfer(&initializer.value, &current);
    }

    match constructor {
        Some(constructor) => ctx.resolve_callee(*constructor, op.location),
        None => ctx.check_static_initializer(*ty, op.location),
    }
}

fn check_member_initializer(
    initializer: &MemberInitializer,
    location: Location,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let verdict = ctx.evaluate_escaping(&initializer.value, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    match initializer.member {
        Member::Field(field) => match ctx.model().field(field) {
            Some(symbol) if !symbol.is_static => Ok(Verdict::PURE),
            _ => Ok(Verdict::impure_at(location)),
        },
        Member::Property(property) => match ctx.model().property(property) {
            Some(symbol) if symbol.is_static => Ok(Verdict::impure_at(location)),
            Some(symbol) => match symbol.setter {
                Some(setter) if !symbol.is_auto => ctx.resolve_callee(setter, location),
                _ => Ok(Verdict::PURE),
            },
            None => Ok(Verdict::impure_at(location)),
        },
    }
}

/// Arrays are always mutable
pub(super) fn check_array_creation(
    op: &Operation,
    _ctx: &EvalContext<'_>,
    _state: &FlowState,
) -> Check {
    Ok(Verdict::impure_at(op.location))
}

pub(super) fn check_collection_literal(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::CollectionLiteral { ty, elements } = &op.node else {
        return mismatched("collection-literal", op);
    };
    if !is_immutable(*ty, ctx) {
        return Ok(Verdict::impure_at(op.location));
    }
    ctx.evaluate_all_escaping(elements, state)
}

fn is_immutable(ty: TypeId, ctx: &EvalContext<'_>) -> bool {
    ctx.model()
        .type_symbol(ty)
        .is_some_and(|symbol| symbol.is_immutable())
}
