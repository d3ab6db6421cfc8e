//! Direct calls and calls through function values

use super::assignment::check_write_target;
use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Argument, Operation, OperationNode};
use crate::purity::flow_state::{candidate_targets, transfer};

pub(super) fn check_invocation(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::Invocation {
        target,
        receiver,
        arguments,
    } = &op.node
    else {
        return mismatched("invocation", op);
    };

    let after_receiver = match receiver {
        Some(receiver) => {
            let verdict = ctx.evaluate(receiver, state)?;
            if verdict.is_impure() {
                return Ok(verdict);
            }
            transfer(receiver, state)
        }
        None => state.clone(),
    };
    let verdict = check_arguments(arguments, ctx, &after_receiver)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    ctx.resolve_callee(*target, op.location)
}

pub(super) fn check_indirect_invocation(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::IndirectInvocation { callee, arguments } = &op.node else {
        return mismatched("indirect-invocation", op);
    };

    let verdict = ctx.evaluate(callee, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    // The function value is read before any argument runs
    let after_callee = transfer(callee, state);
    let targets = candidate_targets(callee, &after_callee);

    let verdict = check_arguments(arguments, ctx, &after_callee)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }

    let Some(targets) = targets else {
        log::debug!(
            "Call through an untracked function value at {} in {}",
            op.location,
            ctx.symbol().qualified_name
        );
        return Ok(Verdict::impure_at(op.location));
    };
    ctx.resolve_targets(targets, op.location)
}

/// Evaluate arguments left to right, each under the state the previous ones
/// left behind. Function values passed along escape to the callee; by-reference
/// arguments must also name storage the caller may write to.
pub(super) fn check_arguments(
    arguments: &[Argument],
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let mut current = state.clone();
    for argument in arguments {
        let verdict = ctx.evaluate_escaping(&argument.value, &current)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
        if argument.ref_kind.is_writable() {
            let verdict =
                check_write_target(&argument.value, argument.value.location, ctx, &current)?;
            if verdict.is_impure() {
                return Ok(verdict);
            }
        }
        current = transfer(&argument.value, &current);
    }
    Ok(Verdict::PURE)
}
