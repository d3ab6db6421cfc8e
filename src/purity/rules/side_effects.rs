//! Operations whose mere presence is an effect

use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Operation, OperationNode};

/// Event wiring, raw pointers, pinning and late binding
pub(super) fn always_impure(op: &Operation, _ctx: &EvalContext<'_>, _state: &FlowState) -> Check {
    Ok(Verdict::impure_at(op.location))
}

/// Taking a lock is an effect unless the function opted in to synchronization
pub(super) fn check_lock(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::Lock { guard, body } = &op.node else {
        return mismatched("lock", op);
    };
    if !ctx.allows_synchronization() {
        log::debug!(
            "Lock at {} in {} without the '{}' marker",
            op.location,
            ctx.symbol().qualified_name,
            ctx.markers().allow_synchronization
        );
        return Ok(Verdict::impure_at(op.location));
    }

    let verdict = ctx.evaluate(guard, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    ctx.evaluate(body, state)
}
