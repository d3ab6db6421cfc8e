//! Operations that only produce a value

use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Operation, OperationNode};

/// Literals, intrinsics, `this`, jumps and closure creation.
///
/// A closure body is checked where the closure is called or escapes.
pub(super) fn always_pure(_op: &Operation, _ctx: &EvalContext<'_>, _state: &FlowState) -> Check {
    Ok(Verdict::PURE)
}

/// Method group creation: only the bound receiver is evaluated
pub(super) fn check_function_reference(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::FunctionReference { receiver, .. } = &op.node else {
        return mismatched("function-reference", op);
    };
    match receiver {
        Some(receiver) => ctx.evaluate(receiver, state),
        None => Ok(Verdict::PURE),
    }
}
