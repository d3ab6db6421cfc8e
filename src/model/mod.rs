//! Program model consumed by the purity analysis.
//!
//! The analysis never parses source. It reads a semantic view of the program
//! through [`SemanticModel`]: symbol metadata plus the operation tree of every
//! function body. [`Program`] is the bundled implementation, an arena of
//! symbols that can be built in code with [`ProgramBuilder`] or loaded from a
//! JSON document produced by a frontend.

pub mod build;
mod ids;
mod operation;
mod program;
mod symbols;

pub use ids::{FieldId, FunctionId, LocalId, ParameterId, PropertyId, TypeId};
pub use operation::{
    Argument, BinaryOperator, IntrinsicKind, LiteralValue, Location, Member, MemberInitializer,
    Operation, OperationKind, OperationNode, PointerOperator, SwitchArm, UnaryOperator,
};
pub use program::{Program, ProgramBuilder};
pub use symbols::{
    FieldSymbol, FunctionKind, FunctionSymbol, LocalSymbol, ParameterSymbol, PropertySymbol,
    RefKind, TypeMutability, TypeSymbol,
};

/// Read-only semantic view of a program.
///
/// Lookups return `None` for ids the model does not know; the analysis treats
/// such references as unresolvable. Implementations must be shareable across
/// worker threads.
pub trait SemanticModel: Sync {
    fn function(&self, id: FunctionId) -> Option<&FunctionSymbol>;
    fn type_symbol(&self, id: TypeId) -> Option<&TypeSymbol>;
    fn field(&self, id: FieldId) -> Option<&FieldSymbol>;
    fn property(&self, id: PropertyId) -> Option<&PropertySymbol>;
    fn parameter(&self, id: ParameterId) -> Option<&ParameterSymbol>;
    fn local(&self, id: LocalId) -> Option<&LocalSymbol>;

    /// Every function the model knows about, in declaration order
    fn function_ids(&self) -> Vec<FunctionId>;

    /// Operations of a function body, when the body is available
    fn body(&self, id: FunctionId) -> Option<&[Operation]> {
        self.function(id).and_then(|f| f.body.as_deref())
    }

    /// Static initializer of the type declaring `id`, if that type has one
    fn static_initializer_of(&self, id: FunctionId) -> Option<FunctionId> {
        let ty = self.function(id)?.containing_type?;
        self.type_symbol(ty)?.static_initializer
    }
}
