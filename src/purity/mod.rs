//! Interprocedural purity analysis
//!
//! A function is pure when running it cannot be observed from outside except
//! through its return value. The analysis walks each function body's
//! operation tree, dispatching every node to the rule registered for its
//! kind, and follows calls into their callees through [`PurityResolver`].
//! Verdicts are memoized per [`AnalysisSession`]; recursion is broken with a
//! provisional pure verdict for functions already on the resolution path.
//!
//! Anything the analysis cannot prove safe is impure: unresolvable callees,
//! missing bodies, operation shapes without a rule, and calls through function
//! values whose targets are not tracked.

mod cache;
mod context;
mod evaluator;
pub mod flow_state;
mod resolver;
pub mod rules;
mod session;
mod signatures;
mod verdict;
mod visited;

pub use cache::PurityCache;
pub use context::{Cancelled, CancellationToken, EvalContext, Markers};
pub use evaluator::{evaluate, evaluate_all, evaluate_all_escaping, evaluate_sequence};
pub use flow_state::{FlowState, FlowSymbol};
pub use resolver::PurityResolver;
pub use rules::{PurityRule, RuleCatalog, RuleFn};
pub use session::{AnalysisLimits, AnalysisSession, SessionStats, DEFAULT_MAX_CALL_DEPTH};
pub use signatures::{KnownPurity, KnownSignatures};
pub use verdict::{Check, Verdict};
