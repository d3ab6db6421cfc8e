//! Control flow and composite expressions
//!
//! These rules own no policy beyond recursing into their children and
//! resolving user-defined operator methods. They are where the flow state is
//! narrowed for nested statements.

use super::{mismatched, Check, EvalContext, FlowState, Verdict};
use crate::model::{Operation, OperationNode};
use crate::purity::flow_state::{assigned_symbols, transfer};

/// Pure iff every child is pure, evaluated in order
pub(super) fn check_children(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    ctx.evaluate_all(children_of(op), state)
}

/// Returned values and tuple elements: any function value among the children
/// leaves the function and must itself be pure.
pub(super) fn check_escaping_children(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    ctx.evaluate_all_escaping(children_of(op), state)
}

fn children_of(op: &Operation) -> Vec<&Operation> {
    let mut children = Vec::new();
    op.for_each_child(&mut |child| children.push(child));
    children
}

pub(super) fn check_declaration(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::VariableDeclaration { initializer, .. } = &op.node else {
        return mismatched("declaration", op);
    };
    match initializer {
        Some(initializer) => ctx.evaluate(initializer, state),
        None => Ok(Verdict::PURE),
    }
}

/// Binary, unary and conversion operators
pub(super) fn check_operator(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let method = match &op.node {
        OperationNode::Binary { method, .. }
        | OperationNode::Unary { method, .. }
        | OperationNode::Conversion { method, .. } => *method,
        _ => return mismatched("operator", op),
    };
    let verdict = check_children(op, ctx, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    match method {
        Some(method) => ctx.resolve_callee(method, op.location),
        None => Ok(Verdict::PURE),
    }
}

pub(super) fn check_conditional(
    op: &Operation,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    let OperationNode::Conditional {
        condition,
        when_true,
        when_false,
    } = &op.node
    else {
        return mismatched("conditional", op);
    };

    let verdict = ctx.evaluate(condition, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    // Both branches start from the state after the condition; neither sees
    // the other's updates.
    let branch_state = transfer(condition, state);
    let verdict = ctx.evaluate(when_true, &branch_state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    match when_false {
        Some(when_false) => ctx.evaluate(when_false, &branch_state),
        None => Ok(Verdict::PURE),
    }
}

pub(super) fn check_loop(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::Loop {
        condition,
        collection,
        body,
    } = &op.node
    else {
        return mismatched("loop", op);
    };

    // A later iteration sees whatever an earlier one assigned
    let loop_state = state.without_all(assigned_symbols(op));

    for part in [collection, condition].into_iter().flatten() {
        let verdict = ctx.evaluate(part, &loop_state)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
    }
    ctx.evaluate(body, &loop_state)
}

pub(super) fn check_block(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::Block { statements } = &op.node else {
        return mismatched("block", op);
    };
    ctx.evaluate_sequence(statements, state)
}

pub(super) fn check_switch(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::Switch { value, arms } = &op.node else {
        return mismatched("switch", op);
    };

    let verdict = ctx.evaluate(value, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    let arm_state = transfer(value, state);
    for arm in arms {
        let verdict = ctx.evaluate_all(&arm.patterns, &arm_state)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
        if let Some(guard) = &arm.guard {
            let verdict = ctx.evaluate(guard, &arm_state)?;
            if verdict.is_impure() {
                return Ok(verdict);
            }
        }
        let verdict = ctx.evaluate_sequence(&arm.body, &arm_state)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
    }
    Ok(Verdict::PURE)
}

pub(super) fn check_using(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let OperationNode::Using {
        resource,
        body,
        dispose,
    } = &op.node
    else {
        return mismatched("using", op);
    };

    let verdict = ctx.evaluate(resource, state)?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    let verdict = ctx.evaluate(body, &transfer(resource, state))?;
    if verdict.is_impure() {
        return Ok(verdict);
    }
    match dispose {
        Some(dispose) => ctx.resolve_callee(*dispose, op.location),
        None => Ok(Verdict::PURE),
    }
}
