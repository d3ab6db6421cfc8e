//! Purity rules, one per operation shape
//!
//! A rule decides whether one operation, together with whatever it contains,
//! is pure. Rules recurse into children through [`EvalContext::evaluate`] and
//! reach other functions only through [`EvalContext::resolve_callee`]. The
//! catalog maps every [`OperationKind`] to exactly one rule; the evaluator
//! treats a kind with no rule as impure.

mod assignment;
mod constants;
mod creation;
mod invocation;
mod references;
mod side_effects;
mod structural;

use super::context::EvalContext;
use super::flow_state::FlowState;
use super::verdict::{Check, Verdict};
use crate::model::{Operation, OperationKind};
use std::collections::HashMap;
use std::fmt;

/// Check one operation under the given flow state
pub type RuleFn = fn(&Operation, &EvalContext<'_>, &FlowState) -> Check;

#[derive(Clone, Copy)]
pub struct PurityRule {
    pub name: &'static str,
    pub kinds: &'static [OperationKind],
    pub check: RuleFn,
}

impl fmt::Debug for PurityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurityRule")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .finish()
    }
}

use OperationKind as K;

static STANDARD_RULES: &[PurityRule] = &[
    PurityRule {
        name: "constant",
        kinds: &[K::Literal, K::Intrinsic, K::InstanceReference, K::Branch, K::Lambda],
        check: constants::always_pure,
    },
    PurityRule {
        name: "function-reference",
        kinds: &[K::FunctionReference],
        check: constants::check_function_reference,
    },
    PurityRule {
        name: "variable-read",
        kinds: &[K::LocalReference, K::ParameterReference],
        check: references::check_variable_read,
    },
    PurityRule {
        name: "field-read",
        kinds: &[K::FieldReference],
        check: references::check_field_read,
    },
    PurityRule {
        name: "property-read",
        kinds: &[K::PropertyReference],
        check: references::check_property_read,
    },
    PurityRule {
        name: "element-access",
        kinds: &[K::ElementAccess],
        check: references::check_element_access,
    },
    PurityRule {
        name: "assignment",
        kinds: &[K::Assignment, K::CompoundAssignment, K::Increment],
        check: assignment::check_assignment,
    },
    PurityRule {
        name: "declaration",
        kinds: &[K::VariableDeclaration],
        check: structural::check_declaration,
    },
    PurityRule {
        name: "invocation",
        kinds: &[K::Invocation],
        check: invocation::check_invocation,
    },
    PurityRule {
        name: "indirect-invocation",
        kinds: &[K::IndirectInvocation],
        check: invocation::check_indirect_invocation,
    },
    PurityRule {
        name: "object-creation",
        kinds: &[K::ObjectCreation],
        check: creation::check_object_creation,
    },
    PurityRule {
        name: "array-creation",
        kinds: &[K::ArrayCreation],
        check: creation::check_array_creation,
    },
    PurityRule {
        name: "collection-literal",
        kinds: &[K::CollectionLiteral],
        check: creation::check_collection_literal,
    },
    PurityRule {
        name: "operator",
        kinds: &[K::Binary, K::Unary, K::Conversion],
        check: structural::check_operator,
    },
    PurityRule {
        name: "conditional",
        kinds: &[K::Conditional],
        check: structural::check_conditional,
    },
    PurityRule {
        name: "loop",
        kinds: &[K::Loop],
        check: structural::check_loop,
    },
    PurityRule {
        name: "block",
        kinds: &[K::Block],
        check: structural::check_block,
    },
    PurityRule {
        name: "switch",
        kinds: &[K::Switch],
        check: structural::check_switch,
    },
    PurityRule {
        name: "composite",
        kinds: &[K::PatternMatch, K::Interpolation, K::Throw, K::Await],
        check: structural::check_children,
    },
    PurityRule {
        name: "escaping-value",
        kinds: &[K::Tuple, K::Return],
        check: structural::check_escaping_children,
    },
    PurityRule {
        name: "using",
        kinds: &[K::Using],
        check: structural::check_using,
    },
    PurityRule {
        name: "lock",
        kinds: &[K::Lock],
        check: side_effects::check_lock,
    },
    PurityRule {
        name: "forbidden",
        kinds: &[K::EventSubscription, K::PointerOperation, K::Fixed, K::Dynamic],
        check: side_effects::always_impure,
    },
];

/// Rule table keyed by operation kind
pub struct RuleCatalog {
    rules: Vec<PurityRule>,
    by_kind: HashMap<OperationKind, usize>,
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCatalog")
            .field("rules", &self.rules.iter().map(|r| r.name).collect::<Vec<_>>())
            .finish()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleCatalog {
    /// Build a catalog; when two rules claim the same kind the first one keeps it.
    pub fn new(rules: impl IntoIterator<Item = PurityRule>) -> Self {
        let rules: Vec<PurityRule> = rules.into_iter().collect();
        let mut by_kind = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            for &kind in rule.kinds {
                if let Some(&owner) = by_kind.get(&kind) {
                    let owner: &PurityRule = &rules[owner];
                    log::warn!(
                        "Rule '{}' also claims {}, already owned by '{}'; ignoring",
                        rule.name,
                        kind,
                        owner.name
                    );
                    continue;
                }
                by_kind.insert(kind, index);
            }
        }
        Self { rules, by_kind }
    }

    /// Rules shipped with the analyzer
    pub fn standard() -> Self {
        Self::new(Self::standard_rules().iter().copied())
    }

    pub fn standard_rules() -> &'static [PurityRule] {
        STANDARD_RULES
    }

    pub fn rule_for(&self, kind: OperationKind) -> Option<&PurityRule> {
        self.by_kind.get(&kind).map(|&index| &self.rules[index])
    }

    pub fn rules(&self) -> &[PurityRule] {
        &self.rules
    }

    /// Kinds no rule claims; these evaluate as impure
    pub fn uncovered_kinds(&self) -> Vec<OperationKind> {
        OperationKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.by_kind.contains_key(kind))
            .collect()
    }
}

/// Fallback for a rule handed an operation of a kind it was not written for
fn mismatched(rule: &str, op: &Operation) -> Check {
    log::debug!(
        "Rule '{}' received {} at {}; treating as impure",
        rule,
        op.kind(),
        op.location
    );
    Ok(Verdict::impure_at(op.location))
}
