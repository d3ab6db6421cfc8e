// Test utility module for purecheck integration tests
#![allow(dead_code)]

use purecheck::model::{
    FieldId, FieldSymbol, FunctionId, FunctionKind, FunctionSymbol, LocalId, Operation,
    ParameterId, Program, ProgramBuilder, RefKind, TypeId, TypeMutability, TypeSymbol,
};
use purecheck::purity::{AnalysisSession, Verdict};

pub const CONSOLE_WRITE_LINE: &str = "System.Console.WriteLine";
pub const MATH_ABS: &str = "System.Math.Abs";

/// Program under construction plus shorthands for common symbols
#[derive(Default)]
pub struct Fixture {
    builder: ProgramBuilder,
}

fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Function without a body, e.g. from a compiled library
    pub fn external(&mut self, qualified: &str) -> FunctionId {
        self.builder
            .add_function(FunctionSymbol::new(simple_name(qualified), qualified))
    }

    pub fn function(&mut self, qualified: &str, body: Vec<Operation>) -> FunctionId {
        let id = self.external(qualified);
        self.builder.set_body(id, body);
        id
    }

    pub fn symbol(&mut self, symbol: FunctionSymbol) -> FunctionId {
        self.builder.add_function(symbol)
    }

    /// Declare first, fill the body later (for recursion)
    pub fn declare(&mut self, qualified: &str) -> FunctionId {
        self.external(qualified)
    }

    pub fn body(&mut self, function: FunctionId, body: Vec<Operation>) {
        self.builder.set_body(function, body);
    }

    pub fn param(&mut self, owner: FunctionId, name: &str) -> ParameterId {
        self.builder.add_parameter(owner, name, RefKind::Value)
    }

    pub fn param_by_ref(&mut self, owner: FunctionId, name: &str, kind: RefKind) -> ParameterId {
        self.builder.add_parameter(owner, name, kind)
    }

    pub fn local(&mut self, owner: FunctionId, name: &str) -> LocalId {
        self.builder.add_local(owner, name)
    }

    pub fn ty(&mut self, qualified: &str, mutability: TypeMutability) -> TypeId {
        self.builder
            .add_type(TypeSymbol::new(simple_name(qualified), qualified).with_mutability(mutability))
    }

    pub fn field(&mut self, field: FieldSymbol) -> FieldId {
        self.builder.add_field(field)
    }

    pub fn constructor(&mut self, ty: TypeId, qualified: &str, body: Vec<Operation>) -> FunctionId {
        let id = self.symbol(
            FunctionSymbol::new(simple_name(qualified), qualified)
                .with_kind(FunctionKind::Constructor)
                .in_type(ty),
        );
        self.body(id, body);
        id
    }

    pub fn static_initializer(&mut self, ty: TypeId, qualified: &str, body: Vec<Operation>) -> FunctionId {
        let id = self.symbol(
            FunctionSymbol::new(simple_name(qualified), qualified)
                .with_kind(FunctionKind::StaticInitializer)
                .with_static(true)
                .in_type(ty),
        );
        self.body(id, body);
        self.builder.set_static_initializer(ty, id);
        id
    }

    pub fn builder(&mut self) -> &mut ProgramBuilder {
        &mut self.builder
    }

    pub fn build(self) -> Program {
        self.builder.build()
    }
}

/// Plain field of `ty` with every flag off
pub fn field_of_type(ty: TypeId, name: &str) -> FieldSymbol {
    FieldSymbol {
        name: name.to_string(),
        containing_type: ty,
        is_static: false,
        is_readonly: false,
        is_const: false,
        is_volatile: false,
    }
}

/// Resolve one function in a fresh default session
pub fn verdict_of(program: &Program, function: FunctionId) -> Verdict {
    AnalysisSession::new()
        .resolve(program, function)
        .expect("analysis should not be cancelled")
}

/// Small ledger program as a frontend would emit it.
///
/// `Total` and `SyncAllowed` are pure; `Audit` and `Sync` are marked but
/// impure; `Helper` is impure and unmarked.
pub const LEDGER_MODEL: &str = r#"{
  "functions": [
    {"name": "WriteLine", "qualified_name": "System.Console.WriteLine"},
    {
      "name": "Total",
      "qualified_name": "Ledger.Total",
      "markers": ["EnforcePure"],
      "parameters": [0, 1],
      "source_file": "Ledger.cs",
      "location": {"line": 3, "column": 5},
      "body": [
        {
          "kind": "return",
          "value": {
            "kind": "binary",
            "operator": "add",
            "left": {"kind": "parameter_reference", "parameter": 0},
            "right": {"kind": "parameter_reference", "parameter": 1}
          }
        }
      ]
    },
    {
      "name": "Audit",
      "qualified_name": "Ledger.Audit",
      "markers": ["EnforcePure"],
      "source_file": "Ledger.cs",
      "location": {"line": 10, "column": 5},
      "body": [
        {
          "kind": "invocation",
          "target": 0,
          "arguments": [{"value": {"kind": "literal", "value": "audit"}}],
          "location": {"line": 12, "column": 9}
        }
      ]
    },
    {
      "name": "Sync",
      "qualified_name": "Ledger.Sync",
      "markers": ["EnforcePure"],
      "source_file": "Ledger.cs",
      "body": [
        {
          "kind": "lock",
          "guard": {"kind": "instance_reference"},
          "body": {"kind": "return", "value": {"kind": "literal", "value": 1}},
          "location": {"line": 20, "column": 9}
        }
      ]
    },
    {
      "name": "SyncAllowed",
      "qualified_name": "Ledger.SyncAllowed",
      "markers": ["EnforcePure", "AllowSynchronization"],
      "body": [
        {
          "kind": "lock",
          "guard": {"kind": "instance_reference"},
          "body": {"kind": "return", "value": {"kind": "literal", "value": 1}}
        }
      ]
    },
    {
      "name": "Helper",
      "qualified_name": "Ledger.Helper",
      "body": [
        {"kind": "invocation", "target": 0, "location": {"line": 30, "column": 9}}
      ]
    }
  ],
  "parameters": [
    {"name": "a", "owner": 1},
    {"name": "b", "owner": 1}
  ]
}"#;
