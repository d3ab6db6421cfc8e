//! Inputs shared by every rule during one function's analysis

use super::evaluator;
use super::flow_state::{self, FlowState};
use super::resolver::PurityResolver;
use super::session::AnalysisSession;
use super::verdict::{Check, Verdict};
use crate::model::{FunctionId, FunctionSymbol, Location, Operation, SemanticModel, TypeId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Names of the marker annotations the analysis understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Functions whose purity must be verified and reported
    pub enforce_pure: String,
    /// Functions allowed to use synchronization and still count as pure
    pub allow_synchronization: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            enforce_pure: "EnforcePure".to_string(),
            allow_synchronization: "AllowSynchronization".to_string(),
        }
    }
}

/// The analysis was cancelled before a verdict was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("purity analysis was cancelled")]
pub struct Cancelled;

/// Cooperative cancellation signal shared with the host
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Everything a rule may consult while checking one operation.
///
/// Created by the resolver for the function currently under analysis. The
/// cache and cycle guard are reached only through [`EvalContext::resolve_callee`].
pub struct EvalContext<'a> {
    resolver: &'a PurityResolver<'a>,
    function: FunctionId,
    symbol: &'a FunctionSymbol,
}

impl<'a> EvalContext<'a> {
    pub(crate) fn new(
        resolver: &'a PurityResolver<'a>,
        function: FunctionId,
        symbol: &'a FunctionSymbol,
    ) -> Self {
        Self {
            resolver,
            function,
            symbol,
        }
    }

    pub fn model(&self) -> &'a dyn SemanticModel {
        self.resolver.model()
    }

    pub fn session(&self) -> &'a AnalysisSession {
        self.resolver.session()
    }

    pub fn markers(&self) -> &'a Markers {
        self.resolver.session().markers()
    }

    /// Function whose body is being analyzed
    pub fn function(&self) -> FunctionId {
        self.function
    }

    pub fn symbol(&self) -> &'a FunctionSymbol {
        self.symbol
    }

    pub fn allows_synchronization(&self) -> bool {
        self.symbol.has_marker(&self.markers().allow_synchronization)
    }

    pub fn evaluate(&self, op: &Operation, state: &FlowState) -> Check {
        evaluator::evaluate(op, self, state)
    }

    pub fn evaluate_all<'o>(
        &self,
        ops: impl IntoIterator<Item = &'o Operation>,
        state: &FlowState,
    ) -> Check {
        evaluator::evaluate_all(ops, self, state)
    }

    pub fn evaluate_all_escaping<'o>(
        &self,
        ops: impl IntoIterator<Item = &'o Operation>,
        state: &FlowState,
    ) -> Check {
        evaluator::evaluate_all_escaping(ops, self, state)
    }

    pub fn evaluate_sequence(&self, ops: &[Operation], state: &FlowState) -> Check {
        evaluator::evaluate_sequence(ops, self, state)
    }

    /// Evaluate a value that leaves the function's tracked storage.
    ///
    /// Any function the value may refer to can be called later by code this
    /// analysis never sees, so each one must be pure. A function value of
    /// unknown origin was created by a caller, which answers for it.
    pub fn evaluate_escaping(&self, op: &Operation, state: &FlowState) -> Check {
        let verdict = self.evaluate(op, state)?;
        if verdict.is_impure() {
            return Ok(verdict);
        }
        match flow_state::candidate_targets(op, state) {
            Some(targets) => self.resolve_targets(targets, op.location),
            None => Ok(Verdict::PURE),
        }
    }

    /// Resolve every candidate target of a function value, in id order so
    /// diagnostics do not depend on hash order.
    pub fn resolve_targets(
        &self,
        targets: impl IntoIterator<Item = FunctionId>,
        location: Location,
    ) -> Check {
        let mut targets: Vec<_> = targets.into_iter().collect();
        targets.sort();
        for target in targets {
            let verdict = self.resolve_callee(target, location)?;
            if verdict.is_impure() {
                return Ok(verdict);
            }
        }
        Ok(Verdict::PURE)
    }

    /// Resolve a callee and report any impurity at the call site.
    pub fn resolve_callee(&self, callee: FunctionId, call_site: Location) -> Check {
        let verdict = self.resolver.resolve(callee)?;
        Ok(verdict.reported_at(call_site))
    }

    /// Gate access to a static member of `ty` on its static initializer.
    ///
    /// Members of the type being analyzed are exempt: its initializer has
    /// already gated the function itself.
    pub fn check_static_initializer(&self, ty: TypeId, location: Location) -> Check {
        if self.symbol.containing_type == Some(ty) {
            return Ok(Verdict::PURE);
        }
        match self
            .model()
            .type_symbol(ty)
            .and_then(|t| t.static_initializer)
        {
            Some(init) => self.resolve_callee(init, location),
            None => Ok(Verdict::PURE),
        }
    }

    /// Whether the function under analysis is a constructor of `ty`
    pub fn is_constructing(&self, ty: TypeId) -> bool {
        self.symbol.is_constructor() && self.symbol.containing_type == Some(ty)
    }

    /// Whether the function under analysis is the static initializer of `ty`
    pub fn is_initializing_type(&self, ty: TypeId) -> bool {
        self.symbol.is_static_initializer() && self.symbol.containing_type == Some(ty)
    }
}
