//! Single-operation evaluation and rule dispatch
//!
//! The evaluator owns no policy. It looks up the rule registered for an
//! operation's kind in the session's catalog and hands the operation over.
//! Kinds without a rule are impure: an unrecognized shape is never assumed
//! to be safe.

use super::context::EvalContext;
use super::flow_state::{self, FlowState};
use super::verdict::{Check, Verdict};
use crate::model::Operation;

/// Check one operation (and, through its rule, its children)
pub fn evaluate(op: &Operation, ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    let kind = op.kind();
    match ctx.session().catalog().rule_for(kind) {
        Some(rule) => (rule.check)(op, ctx, state),
        None => {
            log::debug!(
                "No purity rule registered for {} at {} in {}; treating as impure",
                kind,
                op.location,
                ctx.symbol().qualified_name
            );
            Ok(Verdict::impure_at(op.location))
        }
    }
}

/// Check sibling operations left to right, stopping at the first impure one.
///
/// Each operation sees the flow state left behind by the ones before it, so an
/// assignment in an earlier operand is visible to a later one.
pub fn evaluate_all<'o>(
    ops: impl IntoIterator<Item = &'o Operation>,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    evaluate_in_order(ops, state, |op, current| evaluate(op, ctx, current))
}

/// Like [`evaluate_all`], for values that leave the function's tracked
/// storage (arguments, elements, returned values).
pub fn evaluate_all_escaping<'o>(
    ops: impl IntoIterator<Item = &'o Operation>,
    ctx: &EvalContext<'_>,
    state: &FlowState,
) -> Check {
    evaluate_in_order(ops, state, |op, current| ctx.evaluate_escaping(op, current))
}

/// Check a statement list in order, threading the flow state from each
/// statement to the next.
pub fn evaluate_sequence(ops: &[Operation], ctx: &EvalContext<'_>, state: &FlowState) -> Check {
    evaluate_all(ops, ctx, state)
}

fn evaluate_in_order<'o>(
    ops: impl IntoIterator<Item = &'o Operation>,
    state: &FlowState,
    mut check: impl FnMut(&'o Operation, &FlowState) -> Check,
) -> Check {
    let mut current = state.clone();
    for op in ops {
        let verdict = check(op, &current)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
        current = flow_state::transfer(op, &current);
    }
    Ok(Verdict::PURE)
}
