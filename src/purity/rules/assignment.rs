//! Writes: plain, compound and increment assignments
//!
//! A write is pure only when it lands in state the function under analysis
//! owns: its own locals and by-value parameters, the fields and init-only
//! properties of the object a constructor is building, or the static fields
//! a static initializer is setting up.

use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Location, Operation, OperationNode, RefKind};
use crate::purity::flow_state::transfer;

pub(super) fn check_assignment(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let (target, value, method) = match &op.node {
        OperationNode::Assignment { target, value } => (target, Some(value), None),
        OperationNode::CompoundAssignment {
            target,
            value,
            method,
            ..
        } => (target, Some(value), *method),
        OperationNode::Increment { target, method, .. } => (target, None, *method),
        _ => return mismatched("assignment", op),
    };

    let after_value = match value {
        Some(value) => {
            // Function values stored anywhere but a local outlive this body
            let verdict = if is_local_storage(target) {
                ctx.evaluate(value, state)?
            } else {
                ctx.evaluate_escaping(value, state)?
            };
            if verdict.is_impure() {
                return Ok(verdict);
            }
            transfer(value, state)
        }
        None => state.clone(),
    };
    if let Some(operator) = method {
        let verdict = ctx.resolve_callee(operator, op.location)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
    }
    check_write_target(target, op.location, ctx, &after_value)
}

fn is_local_storage(target: &Operation) -> bool {
    matches!(
        target.node,
        OperationNode::LocalReference { .. } | OperationNode::ParameterReference { .. }
    )
}

/// Whether writing through `target` stays within state the function owns.
///
/// Impurity is reported at `location`, the write itself.
pub(super) fn check_write_target(
    target: &Operation,
    location: Location,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let model = ctx.model();
    let owned = match &target.node {
        OperationNode::LocalReference { local } => model
            .local(*local)
            .is_some_and(|symbol| symbol.owner == ctx.function()),
        OperationNode::ParameterReference { parameter } => {
            model.parameter(*parameter).is_some_and(|symbol| {
                symbol.owner == ctx.function() && symbol.ref_kind == RefKind::Value
            })
        }
        OperationNode::FieldReference { field, receiver } => {
            let Some(symbol) = model.field(*field) else {
                return Ok(Verdict::impure_at(location));
            };
            if symbol.is_static {
                receiver.is_none() && ctx.is_initializing_type(symbol.containing_type)
            } else {
                is_self(receiver.as_deref()) && ctx.is_constructing(symbol.containing_type)
            }
        }
        OperationNode::PropertyReference {
            property,
            receiver,
            arguments,
        } => {
            let Some(symbol) = model.property(*property) else {
                return Ok(Verdict::impure_at(location));
            };
            let owned = !symbol.is_static
                && symbol.is_init_only
                && is_self(receiver.as_deref())
                && ctx.is_constructing(symbol.containing_type);
            if !owned {
                return Ok(Verdict::impure_at(location));
            }
            let verdict = ctx.evaluate_all(arguments, state)?;
            if verdict.is_impure() {
                return Ok(verdict);
            }
            return match symbol.setter {
                Some(setter) if !symbol.is_auto => ctx.resolve_callee(setter, location),
                _ => Ok(Verdict::PURE),
            };
        }
        _ => false,
    };

    if owned {
        Ok(Verdict::PURE)
    } else {
        Ok(Verdict::impure_at(location))
    }
}

/// Receiver is the object under construction (implicit or explicit `this`)
fn is_self(receiver: Option<&Operation>) -> bool {
    receiver.is_none_or(|r| matches!(r.node, OperationNode::InstanceReference))
}
