//! Interprocedural purity resolution
//!
//! `resolve` is the entry point for one function. Per function the resolver
//! moves through `Unvisited -> InProgress -> Cached`:
//!
//! 1. A cached verdict is returned as-is.
//! 2. A function already on the resolution path is a recursion cycle and gets
//!    a provisional pure verdict, which is never cached.
//! 3. The known-signature table is consulted before any body is inspected.
//! 4. A call past the depth limit is impure and truncates the path.
//! 5. Otherwise the body is evaluated statement by statement. The verdict is
//!    cached unless it is pure and depended on a provisional verdict for a
//!    function still on the path, or it depended on a truncated path. Impure
//!    verdicts reached without truncation are always final.
//!
//! A resolver belongs to one top-level entry and one thread. The cache it
//! writes to is the session's, shared with every other resolver.

use super::context::EvalContext;
use super::flow_state::FlowState;
use super::session::AnalysisSession;
use super::signatures::KnownPurity;
use super::verdict::{Check, Verdict};
use super::visited::{PathOutcome, VisitedSet};
use crate::model::{FunctionId, FunctionSymbol, SemanticModel};
use crate::observability::set_current_function;
use std::cell::RefCell;

pub struct PurityResolver<'a> {
    session: &'a AnalysisSession,
    model: &'a dyn SemanticModel,
    visited: RefCell<VisitedSet>,
}

impl<'a> PurityResolver<'a> {
    pub(crate) fn new(session: &'a AnalysisSession, model: &'a dyn SemanticModel) -> Self {
        Self {
            session,
            model,
            visited: RefCell::new(VisitedSet::new()),
        }
    }

    pub fn model(&self) -> &'a dyn SemanticModel {
        self.model
    }

    pub fn session(&self) -> &'a AnalysisSession {
        self.session
    }

    /// Determine whether `function` is pure.
    ///
    /// Returns `Err(Cancelled)` when the session's cancellation token fires
    /// before a verdict is reached; nothing is cached for the aborted path.
    pub fn resolve(&self, function: FunctionId) -> Check {
        let session = self.session;

        if let Some(verdict) = session.cache().get(function) {
            session.counters().record_cache_hit();
            return Ok(verdict);
        }

        if self.visited.borrow().contains(function) {
            self.visited.borrow_mut().record_cycle(function);
            session.counters().record_cycle();
            log::debug!(
                "Recursion cycle through {}; assuming pure until the cycle closes",
                function
            );
            return Ok(Verdict::PURE);
        }

        let Some(symbol) = self.model.function(function) else {
            log::debug!("Unresolvable function {}; treating as impure", function);
            return Ok(Verdict::IMPURE);
        };

        if let Some(known) = session.signatures().classify(&symbol.qualified_name) {
            session.counters().record_signature_hit();
            let verdict = match known {
                KnownPurity::Pure => Verdict::PURE,
                KnownPurity::Impure => Verdict::impure_at_opt(symbol.location),
            };
            return Ok(session.cache().insert(function, verdict));
        }

        let depth = self.visited.borrow().depth();
        if depth >= session.limits().max_call_depth {
            self.visited.borrow_mut().record_truncation();
            log::warn!(
                "Call depth limit {} reached at {}; treating as impure",
                session.limits().max_call_depth,
                symbol.qualified_name
            );
            return Ok(Verdict::impure_at_opt(symbol.location));
        }

        session.cancellation().check()?;

        self.visited.borrow_mut().enter(function);
        let result = {
            let _function = set_current_function(&symbol.qualified_name);
            session.counters().record_structural_analysis();
            self.analyze_body(function, symbol)
        };
        let outcome = self.visited.borrow_mut().exit(function);
        let verdict = result?;

        match outcome {
            PathOutcome::Final => Ok(session.cache().insert(function, verdict)),
            PathOutcome::Provisional if verdict.is_impure() => {
                Ok(session.cache().insert(function, verdict))
            }
            PathOutcome::Provisional => {
                log::trace!(
                    "{} is pure under an open recursion cycle; verdict not cached",
                    symbol.qualified_name
                );
                Ok(verdict)
            }
            PathOutcome::Truncated => {
                log::trace!(
                    "{} depends on the call depth limit; verdict not cached",
                    symbol.qualified_name
                );
                Ok(verdict)
            }
        }
    }

    /// Impurity of the containing type's static initializer is reported at
    /// the gated function's own declaration: the initializer's offending node
    /// lives in another body.
    fn analyze_body(&self, function: FunctionId, symbol: &'a FunctionSymbol) -> Check {
        if !symbol.is_static_initializer() {
            if let Some(init) = self.model.static_initializer_of(function) {
                let verdict = self.resolve(init)?;
                if verdict.is_impure() {
                    return Ok(Verdict::impure_at_opt(symbol.location));
                }
            }
        }

        let Some(body) = self.model.body(function) else {
            log::debug!(
                "{} has no body and no known signature; treating as impure",
                symbol.qualified_name
            );
            return Ok(Verdict::impure_at_opt(symbol.location));
        };

        let ctx = EvalContext::new(self, function, symbol);
        ctx.evaluate_sequence(body, &FlowState::new())
    }
}
