//! The semantic operation graph of a function body.
//!
//! Operations form an owned tree. Each node carries a [`Location`] token for
//! diagnostics and an [`OperationNode`] with kind-specific operands. The
//! analysis only reads these trees; they are produced by the frontend (or
//! deserialized from a JSON model) and stay unchanged for a whole run.
//!
//! The set of kinds is closed. [`OperationKind`] is the fieldless tag used to
//! key the rule catalog, and [`OperationKind::ALL`] lists every kind so that
//! catalog coverage can be checked mechanically.

use super::ids::{FieldId, FunctionId, LocalId, ParameterId, PropertyId, TypeId};
use super::symbols::RefKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One node of a function body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub location: Location,
    #[serde(flatten)]
    pub node: OperationNode,
}

/// Literal constant values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Compile-time constant producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrinsicKind {
    TypeOf,
    SizeOf,
    NameOf,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ConditionalAnd,
    ConditionalOr,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Negate,
    Plus,
    Not,
    BitwiseNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerOperator {
    AddressOf,
    Dereference,
    Arithmetic,
}

/// An argument passed at a call site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub value: Operation,
    #[serde(default)]
    pub ref_kind: RefKind,
}

impl Argument {
    pub fn value(value: Operation) -> Self {
        Self {
            value,
            ref_kind: RefKind::Value,
        }
    }

    pub fn by_ref(value: Operation, ref_kind: RefKind) -> Self {
        Self { value, ref_kind }
    }
}

/// Member assigned by an object initializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Member {
    Field(FieldId),
    Property(PropertyId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInitializer {
    pub member: Member,
    pub value: Operation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchArm {
    #[serde(default)]
    pub patterns: Vec<Operation>,
    #[serde(default)]
    pub guard: Option<Operation>,
    #[serde(default)]
    pub body: Vec<Operation>,
}

/// Kind-specific payload of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationNode {
    Literal {
        value: LiteralValue,
    },
    Intrinsic {
        intrinsic: IntrinsicKind,
    },
    LocalReference {
        local: LocalId,
    },
    ParameterReference {
        parameter: ParameterId,
    },
    FieldReference {
        field: FieldId,
        #[serde(default)]
        receiver: Option<Box<Operation>>,
    },
    PropertyReference {
        property: PropertyId,
        #[serde(default)]
        receiver: Option<Box<Operation>>,
        #[serde(default)]
        arguments: Vec<Operation>,
    },
    /// Named function used as a value (method group)
    FunctionReference {
        function: FunctionId,
        #[serde(default)]
        receiver: Option<Box<Operation>>,
    },
    /// The implicit or explicit `this` receiver
    InstanceReference,
    Invocation {
        target: FunctionId,
        #[serde(default)]
        receiver: Option<Box<Operation>>,
        #[serde(default)]
        arguments: Vec<Argument>,
    },
    /// Call through a value of function type
    IndirectInvocation {
        callee: Box<Operation>,
        #[serde(default)]
        arguments: Vec<Argument>,
    },
    VariableDeclaration {
        local: LocalId,
        #[serde(default)]
        initializer: Option<Box<Operation>>,
    },
    Assignment {
        target: Box<Operation>,
        value: Box<Operation>,
    },
    CompoundAssignment {
        operator: BinaryOperator,
        target: Box<Operation>,
        value: Box<Operation>,
        #[serde(default)]
        method: Option<FunctionId>,
    },
    Increment {
        target: Box<Operation>,
        #[serde(default)]
        decrement: bool,
        #[serde(default)]
        method: Option<FunctionId>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Operation>,
        right: Box<Operation>,
        /// User-defined operator implementation
        #[serde(default)]
        method: Option<FunctionId>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Operation>,
        #[serde(default)]
        method: Option<FunctionId>,
    },
    Conversion {
        operand: Box<Operation>,
        #[serde(default)]
        method: Option<FunctionId>,
    },
    Conditional {
        condition: Box<Operation>,
        when_true: Box<Operation>,
        #[serde(default)]
        when_false: Option<Box<Operation>>,
    },
    Loop {
        #[serde(default)]
        condition: Option<Box<Operation>>,
        /// Sequence being iterated, for each-style loops
        #[serde(default)]
        collection: Option<Box<Operation>>,
        body: Box<Operation>,
    },
    Block {
        #[serde(default)]
        statements: Vec<Operation>,
    },
    /// break / continue / goto
    Branch,
    Return {
        #[serde(default)]
        value: Option<Box<Operation>>,
    },
    Throw {
        #[serde(default)]
        exception: Option<Box<Operation>>,
    },
    ObjectCreation {
        #[serde(rename = "type")]
        ty: TypeId,
        #[serde(default)]
        constructor: Option<FunctionId>,
        #[serde(default)]
        arguments: Vec<Argument>,
        #[serde(default)]
        initializers: Vec<MemberInitializer>,
    },
    ArrayCreation {
        #[serde(default)]
        dimensions: Vec<Operation>,
        #[serde(default)]
        elements: Vec<Operation>,
    },
    CollectionLiteral {
        #[serde(rename = "type")]
        ty: TypeId,
        #[serde(default)]
        elements: Vec<Operation>,
    },
    /// Closure or anonymous function creation
    Lambda {
        function: FunctionId,
    },
    PatternMatch {
        value: Box<Operation>,
        #[serde(default)]
        subpatterns: Vec<Operation>,
    },
    Switch {
        value: Box<Operation>,
        #[serde(default)]
        arms: Vec<SwitchArm>,
    },
    Tuple {
        #[serde(default)]
        elements: Vec<Operation>,
    },
    Interpolation {
        #[serde(default)]
        parts: Vec<Operation>,
    },
    ElementAccess {
        collection: Box<Operation>,
        #[serde(default)]
        indices: Vec<Operation>,
        /// Indexer getter, when the element access is user-defined
        #[serde(default)]
        method: Option<FunctionId>,
    },
    /// Scoped resource acquisition with deterministic disposal
    Using {
        resource: Box<Operation>,
        body: Box<Operation>,
        #[serde(default)]
        dispose: Option<FunctionId>,
    },
    Lock {
        guard: Box<Operation>,
        body: Box<Operation>,
    },
    Await {
        operation: Box<Operation>,
    },
    EventSubscription {
        event: String,
        handler: Box<Operation>,
        #[serde(default)]
        unsubscribe: bool,
    },
    PointerOperation {
        operator: PointerOperator,
        operand: Box<Operation>,
    },
    /// Pinning of managed memory
    Fixed {
        body: Box<Operation>,
    },
    /// Late-bound member access or invocation
    Dynamic {
        member: String,
        #[serde(default)]
        operands: Vec<Operation>,
    },
    /// A shape the frontend could not classify
    Unknown {
        #[serde(default)]
        description: String,
    },
}

/// Fieldless tag for [`OperationNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Literal,
    Intrinsic,
    LocalReference,
    ParameterReference,
    FieldReference,
    PropertyReference,
    FunctionReference,
    InstanceReference,
    Invocation,
    IndirectInvocation,
    VariableDeclaration,
    Assignment,
    CompoundAssignment,
    Increment,
    Binary,
    Unary,
    Conversion,
    Conditional,
    Loop,
    Block,
    Branch,
    Return,
    Throw,
    ObjectCreation,
    ArrayCreation,
    CollectionLiteral,
    Lambda,
    PatternMatch,
    Switch,
    Tuple,
    Interpolation,
    ElementAccess,
    Using,
    Lock,
    Await,
    EventSubscription,
    PointerOperation,
    Fixed,
    Dynamic,
    Unknown,
}

impl OperationKind {
    pub const ALL: [OperationKind; 40] = [
        Self::Literal,
        Self::Intrinsic,
        Self::LocalReference,
        Self::ParameterReference,
        Self::FieldReference,
        Self::PropertyReference,
        Self::FunctionReference,
        Self::InstanceReference,
        Self::Invocation,
        Self::IndirectInvocation,
        Self::VariableDeclaration,
        Self::Assignment,
        Self::CompoundAssignment,
        Self::Increment,
        Self::Binary,
        Self::Unary,
        Self::Conversion,
        Self::Conditional,
        Self::Loop,
        Self::Block,
        Self::Branch,
        Self::Return,
        Self::Throw,
        Self::ObjectCreation,
        Self::ArrayCreation,
        Self::CollectionLiteral,
        Self::Lambda,
        Self::PatternMatch,
        Self::Switch,
        Self::Tuple,
        Self::Interpolation,
        Self::ElementAccess,
        Self::Using,
        Self::Lock,
        Self::Await,
        Self::EventSubscription,
        Self::PointerOperation,
        Self::Fixed,
        Self::Dynamic,
        Self::Unknown,
    ];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Operation {
    pub fn new(node: OperationNode) -> Self {
        Self {
            location: Location::default(),
            node,
        }
    }

    /// Same operation, placed at `line:column`
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Location::new(line, column);
        self
    }

    pub fn kind(&self) -> OperationKind {
        use OperationNode as N;
        match &self.node {
            N::Literal { .. } => OperationKind::Literal,
            N::Intrinsic { .. } => OperationKind::Intrinsic,
            N::LocalReference { .. } => OperationKind::LocalReference,
            N::ParameterReference { .. } => OperationKind::ParameterReference,
            N::FieldReference { .. } => OperationKind::FieldReference,
            N::PropertyReference { .. } => OperationKind::PropertyReference,
            N::FunctionReference { .. } => OperationKind::FunctionReference,
            N::InstanceReference => OperationKind::InstanceReference,
            N::Invocation { .. } => OperationKind::Invocation,
            N::IndirectInvocation { .. } => OperationKind::IndirectInvocation,
            N::VariableDeclaration { .. } => OperationKind::VariableDeclaration,
            N::Assignment { .. } => OperationKind::Assignment,
            N::CompoundAssignment { .. } => OperationKind::CompoundAssignment,
            N::Increment { .. } => OperationKind::Increment,
            N::Binary { .. } => OperationKind::Binary,
            N::Unary { .. } => OperationKind::Unary,
            N::Conversion { .. } => OperationKind::Conversion,
            N::Conditional { .. } => OperationKind::Conditional,
            N::Loop { .. } => OperationKind::Loop,
            N::Block { .. } => OperationKind::Block,
            N::Branch => OperationKind::Branch,
            N::Return { .. } => OperationKind::Return,
            N::Throw { .. } => OperationKind::Throw,
            N::ObjectCreation { .. } => OperationKind::ObjectCreation,
            N::ArrayCreation { .. } => OperationKind::ArrayCreation,
            N::CollectionLiteral { .. } => OperationKind::CollectionLiteral,
            N::Lambda { .. } => OperationKind::Lambda,
            N::PatternMatch { .. } => OperationKind::PatternMatch,
            N::Switch { .. } => OperationKind::Switch,
            N::Tuple { .. } => OperationKind::Tuple,
            N::Interpolation { .. } => OperationKind::Interpolation,
            N::ElementAccess { .. } => OperationKind::ElementAccess,
            N::Using { .. } => OperationKind::Using,
            N::Lock { .. } => OperationKind::Lock,
            N::Await { .. } => OperationKind::Await,
            N::EventSubscription { .. } => OperationKind::EventSubscription,
            N::PointerOperation { .. } => OperationKind::PointerOperation,
            N::Fixed { .. } => OperationKind::Fixed,
            N::Dynamic { .. } => OperationKind::Dynamic,
            N::Unknown { .. } => OperationKind::Unknown,
        }
    }

    /// Visit direct children in evaluation order.
    ///
    /// Lambda bodies are separate functions and are not children of the
    /// operation that creates them.
    pub fn for_each_child<'a>(&'a self, f: &mut impl FnMut(&'a Operation)) {
        use OperationNode as N;
        match &self.node {
            N::Literal { .. }
            | N::Intrinsic { .. }
            | N::LocalReference { .. }
            | N::ParameterReference { .. }
            | N::InstanceReference
            | N::Branch
            | N::Lambda { .. }
            | N::Unknown { .. } => {}
            N::FieldReference { receiver, .. } | N::FunctionReference { receiver, .. } => {
                if let Some(r) = receiver {
                    f(r);
                }
            }
            N::PropertyReference {
                receiver,
                arguments,
                ..
            } => {
                if let Some(r) = receiver {
                    f(r);
                }
                arguments.iter().for_each(|a| f(a));
            }
            N::Invocation {
                receiver,
                arguments,
                ..
            } => {
                if let Some(r) = receiver {
                    f(r);
                }
                arguments.iter().for_each(|a| f(&a.value));
            }
            N::IndirectInvocation { callee, arguments } => {
                f(callee);
                arguments.iter().for_each(|a| f(&a.value));
            }
            N::VariableDeclaration { initializer, .. } => {
                if let Some(init) = initializer {
                    f(init);
                }
            }
            N::Assignment { target, value } | N::CompoundAssignment { target, value, .. } => {
                f(target);
                f(value);
            }
            N::Increment { target, .. } => f(target),
            N::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            N::Unary { operand, .. }
            | N::Conversion { operand, .. }
            | N::PointerOperation { operand, .. } => f(operand),
            N::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                f(condition);
                f(when_true);
                if let Some(w) = when_false {
                    f(w);
                }
            }
            N::Loop {
                condition,
                collection,
                body,
            } => {
                if let Some(c) = condition {
                    f(c);
                }
                if let Some(c) = collection {
                    f(c);
                }
                f(body);
            }
            N::Block { statements } => statements.iter().for_each(|s| f(s)),
            N::Return { value } => {
                if let Some(v) = value {
                    f(v);
                }
            }
            N::Throw { exception } => {
                if let Some(e) = exception {
                    f(e);
                }
            }
            N::ObjectCreation {
                arguments,
                initializers,
                ..
            } => {
                arguments.iter().for_each(|a| f(&a.value));
                initializers.iter().for_each(|i| f(&i.value));
            }
            N::ArrayCreation {
                dimensions,
                elements,
            } => {
                dimensions.iter().for_each(|d| f(d));
                elements.iter().for_each(|e| f(e));
            }
            N::CollectionLiteral { elements, .. } | N::Tuple { elements } => {
                elements.iter().for_each(|e| f(e))
            }
            N::Interpolation { parts } => parts.iter().for_each(|p| f(p)),
            N::PatternMatch { value, subpatterns } => {
                f(value);
                subpatterns.iter().for_each(|p| f(p));
            }
            N::Switch { value, arms } => {
                f(value);
                for arm in arms {
                    arm.patterns.iter().for_each(|p| f(p));
                    if let Some(g) = &arm.guard {
                        f(g);
                    }
                    arm.body.iter().for_each(|s| f(s));
                }
            }
            N::ElementAccess {
                collection,
                indices,
                ..
            } => {
                f(collection);
                indices.iter().for_each(|i| f(i));
            }
            N::Using { resource, body, .. } => {
                f(resource);
                f(body);
            }
            N::Lock { guard, body } => {
                f(guard);
                f(body);
            }
            N::Await { operation } => f(operation),
            N::EventSubscription { handler, .. } => f(handler),
            N::Fixed { body } => f(body),
            N::Dynamic { operands, .. } => operands.iter().for_each(|o| f(o)),
        }
    }

    /// Pre-order walk over this operation and all its descendants
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Operation)) {
        f(self);
        self.for_each_child(&mut |child| child.walk(&mut *f));
    }
}
