//! Terse constructors for operation trees.
//!
//! Intended for embedders and tests that build programs in code. Every helper
//! returns an operation at the default location; chain
//! [`Operation::at`] to place it.

use super::ids::{FieldId, FunctionId, LocalId, ParameterId, PropertyId, TypeId};
use super::operation::{
    Argument, BinaryOperator, LiteralValue, MemberInitializer, Operation, OperationNode,
    UnaryOperator,
};

fn boxed(op: Operation) -> Box<Operation> {
    Box::new(op)
}

pub fn lit(value: i64) -> Operation {
    Operation::new(OperationNode::Literal {
        value: LiteralValue::Int(value),
    })
}

pub fn string(value: &str) -> Operation {
    Operation::new(OperationNode::Literal {
        value: LiteralValue::Str(value.to_string()),
    })
}

pub fn null() -> Operation {
    Operation::new(OperationNode::Literal {
        value: LiteralValue::Null,
    })
}

pub fn local(local: LocalId) -> Operation {
    Operation::new(OperationNode::LocalReference { local })
}

pub fn param(parameter: ParameterId) -> Operation {
    Operation::new(OperationNode::ParameterReference { parameter })
}

pub fn this() -> Operation {
    Operation::new(OperationNode::InstanceReference)
}

/// Field access with an implicit receiver (`this` for instance fields)
pub fn field(field: FieldId) -> Operation {
    Operation::new(OperationNode::FieldReference {
        field,
        receiver: None,
    })
}

pub fn field_of(receiver: Operation, field: FieldId) -> Operation {
    Operation::new(OperationNode::FieldReference {
        field,
        receiver: Some(boxed(receiver)),
    })
}

pub fn property(property: PropertyId, receiver: Option<Operation>) -> Operation {
    Operation::new(OperationNode::PropertyReference {
        property,
        receiver: receiver.map(boxed),
        arguments: Vec::new(),
    })
}

pub fn func_ref(function: FunctionId) -> Operation {
    Operation::new(OperationNode::FunctionReference {
        function,
        receiver: None,
    })
}

pub fn lambda(function: FunctionId) -> Operation {
    Operation::new(OperationNode::Lambda { function })
}

pub fn call(target: FunctionId, arguments: Vec<Operation>) -> Operation {
    call_with(target, arguments.into_iter().map(Argument::value).collect())
}

pub fn call_with(target: FunctionId, arguments: Vec<Argument>) -> Operation {
    Operation::new(OperationNode::Invocation {
        target,
        receiver: None,
        arguments,
    })
}

pub fn call_on(receiver: Operation, target: FunctionId, arguments: Vec<Operation>) -> Operation {
    Operation::new(OperationNode::Invocation {
        target,
        receiver: Some(boxed(receiver)),
        arguments: arguments.into_iter().map(Argument::value).collect(),
    })
}

/// Call through a value of function type
pub fn invoke(callee: Operation, arguments: Vec<Operation>) -> Operation {
    Operation::new(OperationNode::IndirectInvocation {
        callee: boxed(callee),
        arguments: arguments.into_iter().map(Argument::value).collect(),
    })
}

pub fn declare(local: LocalId, initializer: Operation) -> Operation {
    Operation::new(OperationNode::VariableDeclaration {
        local,
        initializer: Some(boxed(initializer)),
    })
}

pub fn declare_uninit(local: LocalId) -> Operation {
    Operation::new(OperationNode::VariableDeclaration {
        local,
        initializer: None,
    })
}

pub fn assign(target: Operation, value: Operation) -> Operation {
    Operation::new(OperationNode::Assignment {
        target: boxed(target),
        value: boxed(value),
    })
}

pub fn compound(operator: BinaryOperator, target: Operation, value: Operation) -> Operation {
    Operation::new(OperationNode::CompoundAssignment {
        operator,
        target: boxed(target),
        value: boxed(value),
        method: None,
    })
}

pub fn increment(target: Operation) -> Operation {
    Operation::new(OperationNode::Increment {
        target: boxed(target),
        decrement: false,
        method: None,
    })
}

pub fn binary(operator: BinaryOperator, left: Operation, right: Operation) -> Operation {
    Operation::new(OperationNode::Binary {
        operator,
        left: boxed(left),
        right: boxed(right),
        method: None,
    })
}

pub fn add(left: Operation, right: Operation) -> Operation {
    binary(BinaryOperator::Add, left, right)
}

pub fn unary(operator: UnaryOperator, operand: Operation) -> Operation {
    Operation::new(OperationNode::Unary {
        operator,
        operand: boxed(operand),
        method: None,
    })
}

pub fn conditional(
    condition: Operation,
    when_true: Operation,
    when_false: Option<Operation>,
) -> Operation {
    Operation::new(OperationNode::Conditional {
        condition: boxed(condition),
        when_true: boxed(when_true),
        when_false: when_false.map(boxed),
    })
}

pub fn while_loop(condition: Operation, body: Operation) -> Operation {
    Operation::new(OperationNode::Loop {
        condition: Some(boxed(condition)),
        collection: None,
        body: boxed(body),
    })
}

pub fn block(statements: Vec<Operation>) -> Operation {
    Operation::new(OperationNode::Block { statements })
}

pub fn ret(value: Operation) -> Operation {
    Operation::new(OperationNode::Return {
        value: Some(boxed(value)),
    })
}

pub fn throw(exception: Operation) -> Operation {
    Operation::new(OperationNode::Throw {
        exception: Some(boxed(exception)),
    })
}

pub fn new_object(ty: TypeId, constructor: Option<FunctionId>, arguments: Vec<Operation>) -> Operation {
    new_object_with(ty, constructor, arguments, Vec::new())
}

pub fn new_object_with(
    ty: TypeId,
    constructor: Option<FunctionId>,
    arguments: Vec<Operation>,
    initializers: Vec<MemberInitializer>,
) -> Operation {
    Operation::new(OperationNode::ObjectCreation {
        ty,
        constructor,
        arguments: arguments.into_iter().map(Argument::value).collect(),
        initializers,
    })
}

pub fn new_array(elements: Vec<Operation>) -> Operation {
    Operation::new(OperationNode::ArrayCreation {
        dimensions: Vec::new(),
        elements,
    })
}

pub fn collection(ty: TypeId, elements: Vec<Operation>) -> Operation {
    Operation::new(OperationNode::CollectionLiteral { ty, elements })
}

pub fn tuple(elements: Vec<Operation>) -> Operation {
    Operation::new(OperationNode::Tuple { elements })
}

pub fn lock(guard: Operation, body: Operation) -> Operation {
    Operation::new(OperationNode::Lock {
        guard: boxed(guard),
        body: boxed(body),
    })
}

pub fn await_op(operation: Operation) -> Operation {
    Operation::new(OperationNode::Await {
        operation: boxed(operation),
    })
}

pub fn using(resource: Operation, body: Operation, dispose: Option<FunctionId>) -> Operation {
    Operation::new(OperationNode::Using {
        resource: boxed(resource),
        body: boxed(body),
        dispose,
    })
}

pub fn unknown(description: &str) -> Operation {
    Operation::new(OperationNode::Unknown {
        description: description.to_string(),
    })
}
