//! Function-value tracking for indirect invocations
//!
//! A narrow forward dataflow over one function body. It records, for each
//! variable, parameter or field that holds a value of function type, the set
//! of functions it may currently refer to. When the body later calls through
//! that variable, the evaluator resolves every candidate instead of giving up.
//!
//! The state is a persistent map: every update returns a new value sharing
//! structure with the old one, so a branch can never leak its updates into a
//! sibling branch. There is no merge at control-flow joins. Anything assigned
//! inside a nested branch, loop or switch is simply untracked afterwards, and
//! calls through untracked variables are impure.

use crate::model::{
    Argument, FieldId, FunctionId, IntrinsicKind, LiteralValue, LocalId, Operation,
    OperationNode, ParameterId,
};
use im::{HashMap, HashSet};

/// Storage location that may hold a function value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowSymbol {
    Local(LocalId),
    Parameter(ParameterId),
    Field(FieldId),
}

/// Potential targets of every tracked function-valued symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowState {
    targets: HashMap<FlowSymbol, HashSet<FunctionId>>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// New state in which `symbol` may refer to exactly `targets`
    pub fn with(&self, symbol: FlowSymbol, targets: HashSet<FunctionId>) -> Self {
        Self {
            targets: self.targets.update(symbol, targets),
        }
    }

    /// New state in which nothing is known about `symbol`
    pub fn without(&self, symbol: FlowSymbol) -> Self {
        if !self.targets.contains_key(&symbol) {
            return self.clone();
        }
        Self {
            targets: self.targets.without(&symbol),
        }
    }

    pub fn without_all(&self, symbols: impl IntoIterator<Item = FlowSymbol>) -> Self {
        symbols
            .into_iter()
            .fold(self.clone(), |state, symbol| state.without(symbol))
    }

    /// Candidate targets, or `None` when the symbol is untracked
    pub fn get(&self, symbol: FlowSymbol) -> Option<&HashSet<FunctionId>> {
        self.targets.get(&symbol)
    }

    pub fn is_tracked(&self, symbol: FlowSymbol) -> bool {
        self.targets.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// The storage location an operation denotes, if it can be tracked.
///
/// Fields are tracked only when accessed through `this` or statically.
pub fn flow_symbol(op: &Operation) -> Option<FlowSymbol> {
    match &op.node {
        OperationNode::LocalReference { local } => Some(FlowSymbol::Local(*local)),
        OperationNode::ParameterReference { parameter } => Some(FlowSymbol::Parameter(*parameter)),
        OperationNode::FieldReference { field, receiver } => match receiver.as_deref() {
            None => Some(FlowSymbol::Field(*field)),
            Some(Operation {
                node: OperationNode::InstanceReference,
                ..
            }) => Some(FlowSymbol::Field(*field)),
            Some(_) => None,
        },
        _ => None,
    }
}

/// Functions a value-producing operation may evaluate to.
///
/// `Some(empty)` means the value is known to be null; `None` means unknown.
pub fn candidate_targets(op: &Operation, state: &FlowState) -> Option<HashSet<FunctionId>> {
    match &op.node {
        OperationNode::Lambda { function } | OperationNode::FunctionReference { function, .. } => {
            Some(HashSet::unit(*function))
        }
        OperationNode::Literal {
            value: LiteralValue::Null,
        }
        | OperationNode::Intrinsic {
            intrinsic: IntrinsicKind::Default,
        } => Some(HashSet::new()),
        OperationNode::Conversion {
            operand,
            method: None,
        } => candidate_targets(operand, state),
        _ => flow_symbol(op).and_then(|symbol| state.get(symbol).cloned()),
    }
}

/// State after executing `op`, given the state before it.
pub fn transfer(op: &Operation, state: &FlowState) -> FlowState {
    match &op.node {
        OperationNode::VariableDeclaration { local, initializer } => {
            let symbol = FlowSymbol::Local(*local);
            match initializer {
                Some(init) => {
                    let after = transfer(init, state);
                    bind(after, symbol, candidate_targets(init, state))
                }
                None => state.without(symbol),
            }
        }
        OperationNode::Assignment { target, value } => {
            let after = transfer(value, state);
            match flow_symbol(target) {
                Some(symbol) => bind(after, symbol, candidate_targets(value, state)),
                None => after.without_all(assigned_symbols(target)),
            }
        }
        OperationNode::Block { statements } => statements
            .iter()
            .fold(state.clone(), |acc, stmt| transfer(stmt, &acc)),
        _ => state.without_all(assigned_symbols(op)),
    }
}

fn bind(state: FlowState, symbol: FlowSymbol, targets: Option<HashSet<FunctionId>>) -> FlowState {
    match targets {
        Some(targets) => {
            log::trace!("{:?} may now refer to {:?}", symbol, targets);
            state.with(symbol, targets)
        }
        None => state.without(symbol),
    }
}

/// Every trackable symbol written anywhere inside `op`
pub fn assigned_symbols(op: &Operation) -> Vec<FlowSymbol> {
    let mut symbols = Vec::new();
    op.walk(&mut |node| match &node.node {
        OperationNode::VariableDeclaration { local, .. } => {
            symbols.push(FlowSymbol::Local(*local))
        }
        OperationNode::Assignment { target, .. }
        | OperationNode::CompoundAssignment { target, .. }
        | OperationNode::Increment { target, .. } => symbols.extend(flow_symbol(target)),
        OperationNode::Invocation { arguments, .. }
        | OperationNode::IndirectInvocation { arguments, .. }
        | OperationNode::ObjectCreation { arguments, .. } => {
            symbols.extend(written_arguments(arguments))
        }
        _ => {}
    });
    symbols
}

fn written_arguments(arguments: &[Argument]) -> impl Iterator<Item = FlowSymbol> + '_ {
    arguments
        .iter()
        .filter(|a| a.ref_kind.is_writable())
        .filter_map(|a| flow_symbol(&a.value))
}
