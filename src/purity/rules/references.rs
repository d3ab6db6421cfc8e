//! Reads of variables, fields, properties and elements

use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Operation, OperationNode};

/// Reading a local or parameter has no effect of its own.
///
/// The symbol must still be known to the model.
pub(super) fn check_variable_read(
    op: &Operation,
    ctx: &EvalContext<'_>,
    _state: &FlowState,
) -> Check {
    let known = match &op.node {
        OperationNode::LocalReference { local } => ctx.model().local(*local).is_some(),
        OperationNode::ParameterReference { parameter } => {
            ctx.model().parameter(*parameter).is_some()
        }
        _ => return mismatched("variable-read", op),
    };
    if known {
        Ok(Verdict::PURE)
    } else {
        log::debug!("Unresolvable variable at {}; treating as impure", op.location);
        Ok(Verdict::impure_at(op.location))
    }
}

pub(super) fn check_field_read(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::FieldReference { field, receiver } = &op.node else {
        return mismatched("field-read", op);
    };
    let Some(symbol) = ctx.model().field(*field) else {
        log::debug!("Unresolvable field {} at {}", field, op.location);
        return Ok(Verdict::impure_at(op.location));
    };

    // Every read of a volatile field observes shared state
    if symbol.is_volatile {
        return Ok(Verdict::impure_at(op.location));
    }

    if let Some(receiver) = receiver {
        let verdict = ctx.evaluate(receiver, state)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
    }

    if symbol.is_const {
        return Ok(Verdict::PURE);
    }
    if symbol.is_static {
        if !symbol.is_readonly {
            return Ok(Verdict::impure_at(op.location));
        }
        return ctx.check_static_initializer(symbol.containing_type, op.location);
    }
    Ok(Verdict::PURE)
}

pub(super) fn check_property_read(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::PropertyReference {
        property,
        receiver,
        arguments,
    } = &op.node
    else {
        return mismatched("property-read", op);
    };
    let Some(symbol) = ctx.model().property(*property) else {
        log::debug!("Unresolvable property {} at {}", property, op.location);
        return Ok(Verdict::impure_at(op.location));
    };

    let verdict = ctx.evaluate_all(receiver.as_deref().into_iter().chain(arguments), state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }

    if symbol.is_static_mutable() {
        return Ok(Verdict::impure_at(op.location));
    }
    if symbol.is_static {
        let verdict = ctx.check_static_initializer(symbol.containing_type, op.location)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
    }

    // Auto-property getters only read the backing field
    if symbol.is_auto {
        return Ok(Verdict::PURE);
    }
    match symbol.getter {
        Some(getter) => ctx.resolve_callee(getter, op.location),
        None => {
            log::debug!(
                "Property '{}' has no getter to analyze at {}",
                symbol.name,
                op.location
            );
            Ok(Verdict::impure_at(op.location))
        }
    }
}

pub(super) fn check_element_access(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::ElementAccess {
        collection,
        indices,
        method,
    } = &op.node
    else {
        return mismatched("element-access", op);
    };
    let verdict = ctx.evaluate_all(std::iter::once(&**collection).chain(indices), state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    match method {
        Some(indexer) => ctx.resolve_callee(*indexer, op.location),
        None => Ok(Verdict::PURE),
    }
}
