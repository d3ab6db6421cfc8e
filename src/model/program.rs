//! Arena-backed program model
//!
//! A [`Program`] is what a frontend hands to the analysis: flat arenas of
//! symbols, with function bodies stored on their function symbols. It is
//! serde-serializable so frontends in other processes can emit it as JSON.

use super::ids::{FieldId, FunctionId, LocalId, ParameterId, PropertyId, TypeId};
use super::operation::{Member, Operation, OperationNode};
use super::symbols::{
    FieldSymbol, FunctionSymbol, LocalSymbol, ParameterSymbol, PropertySymbol, RefKind,
    TypeSymbol,
};
use super::SemanticModel;
use crate::core::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum number of problems listed in a validation error
const MAX_REPORTED_PROBLEMS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub functions: Vec<FunctionSymbol>,
    #[serde(default)]
    pub types: Vec<TypeSymbol>,
    #[serde(default)]
    pub fields: Vec<FieldSymbol>,
    #[serde(default)]
    pub properties: Vec<PropertySymbol>,
    #[serde(default)]
    pub parameters: Vec<ParameterSymbol>,
    #[serde(default)]
    pub locals: Vec<LocalSymbol>,
}

impl Program {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Read a JSON program model from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::file_system(format!("Failed to read program model: {}", e), path, e)
        })?;
        let program = Self::from_json(&contents)
            .map_err(|e| e.with_context(format!("Invalid program model {}", path.display())))?;
        log::debug!(
            "Loaded program model from {} ({} functions, {} types)",
            path.display(),
            program.functions.len(),
            program.types.len()
        );
        Ok(program)
    }

    /// Look a function up by simple or qualified name
    pub fn find_function(&self, name: &str) -> Option<FunctionId> {
        self.functions
            .iter()
            .position(|f| f.qualified_name == name)
            .or_else(|| self.functions.iter().position(|f| f.name == name))
            .map(FunctionId::from_index)
    }

    /// Check that every symbol reference points into its arena.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        for (index, function) in self.functions.iter().enumerate() {
            let owner = FunctionId::from_index(index);
            if let Some(ty) = function.containing_type {
                self.expect_type(ty, owner, &mut problems);
            }
            for &param in &function.parameters {
                if self.parameters.get(param.index()).is_none() {
                    problems.push(format!("{}: unknown parameter {}", owner, param));
                }
            }
            for op in function.body.iter().flatten() {
                op.walk(&mut |node| self.check_references(owner, node, &mut problems));
            }
        }

        for (index, ty) in self.types.iter().enumerate() {
            if let Some(init) = ty.static_initializer {
                if self.functions.get(init.index()).is_none() {
                    problems.push(format!(
                        "{}: unknown static initializer {}",
                        TypeId::from_index(index),
                        init
                    ));
                }
            }
        }

        for (index, property) in self.properties.iter().enumerate() {
            for accessor in [property.getter, property.setter].into_iter().flatten() {
                if self.functions.get(accessor.index()).is_none() {
                    problems.push(format!(
                        "{}: unknown accessor {}",
                        PropertyId::from_index(index),
                        accessor
                    ));
                }
            }
        }

        if problems.is_empty() {
            return Ok(());
        }

        let total = problems.len();
        problems.truncate(MAX_REPORTED_PROBLEMS);
        let mut message = problems.join("; ");
        if total > MAX_REPORTED_PROBLEMS {
            message.push_str(&format!(" (and {} more)", total - MAX_REPORTED_PROBLEMS));
        }
        Err(Error::InvalidModel(message))
    }

    fn expect_type(&self, ty: TypeId, owner: FunctionId, problems: &mut Vec<String>) {
        if self.types.get(ty.index()).is_none() {
            problems.push(format!("{}: unknown type {}", owner, ty));
        }
    }

    fn expect_function(&self, id: FunctionId, owner: FunctionId, problems: &mut Vec<String>) {
        if self.functions.get(id.index()).is_none() {
            problems.push(format!("{}: unknown function {}", owner, id));
        }
    }

    fn check_references(&self, owner: FunctionId, op: &Operation, problems: &mut Vec<String>) {
        use OperationNode as N;
        match &op.node {
            N::LocalReference { local } | N::VariableDeclaration { local, .. } => {
                if self.locals.get(local.index()).is_none() {
                    problems.push(format!("{} at {}: unknown {}", owner, op.location, local));
                }
            }
            N::ParameterReference { parameter } => {
                if self.parameters.get(parameter.index()).is_none() {
                    problems.push(format!("{} at {}: unknown {}", owner, op.location, parameter));
                }
            }
            N::FieldReference { field, .. } => {
                if self.fields.get(field.index()).is_none() {
                    problems.push(format!("{} at {}: unknown {}", owner, op.location, field));
                }
            }
            N::PropertyReference { property, .. } => {
                if self.properties.get(property.index()).is_none() {
                    problems.push(format!("{} at {}: unknown {}", owner, op.location, property));
                }
            }
            N::FunctionReference { function, .. } | N::Lambda { function } => {
                self.expect_function(*function, owner, problems)
            }
            N::Invocation { target, .. } => self.expect_function(*target, owner, problems),
            N::ObjectCreation {
                ty,
                constructor,
                initializers,
                ..
            } => {
                self.expect_type(*ty, owner, problems);
                if let Some(ctor) = constructor {
                    self.expect_function(*ctor, owner, problems);
                }
                for init in initializers {
                    let known = match init.member {
                        Member::Field(f) => self.fields.get(f.index()).is_some(),
                        Member::Property(p) => self.properties.get(p.index()).is_some(),
                    };
                    if !known {
                        problems.push(format!(
                            "{} at {}: unknown initializer member {:?}",
                            owner, op.location, init.member
                        ));
                    }
                }
            }
            N::CollectionLiteral { ty, .. } => self.expect_type(*ty, owner, problems),
            N::CompoundAssignment {
                method: Some(m), ..
            }
            | N::Increment {
                method: Some(m), ..
            }
            | N::Binary {
                method: Some(m), ..
            }
            | N::Unary {
                method: Some(m), ..
            }
            | N::Conversion {
                method: Some(m), ..
            }
            | N::ElementAccess {
                method: Some(m), ..
            }
            | N::Using {
                dispose: Some(m), ..
            } => self.expect_function(*m, owner, problems),
            _ => {}
        }
    }
}

impl SemanticModel for Program {
    fn function(&self, id: FunctionId) -> Option<&FunctionSymbol> {
        self.functions.get(id.index())
    }

    fn type_symbol(&self, id: TypeId) -> Option<&TypeSymbol> {
        self.types.get(id.index())
    }

    fn field(&self, id: FieldId) -> Option<&FieldSymbol> {
        self.fields.get(id.index())
    }

    fn property(&self, id: PropertyId) -> Option<&PropertySymbol> {
        self.properties.get(id.index())
    }

    fn parameter(&self, id: ParameterId) -> Option<&ParameterSymbol> {
        self.parameters.get(id.index())
    }

    fn local(&self, id: LocalId) -> Option<&LocalSymbol> {
        self.locals.get(id.index())
    }

    fn function_ids(&self) -> Vec<FunctionId> {
        (0..self.functions.len()).map(FunctionId::from_index).collect()
    }
}

/// Incremental construction of a [`Program`]
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, ty: TypeSymbol) -> TypeId {
        self.program.types.push(ty);
        TypeId::from_index(self.program.types.len() - 1)
    }

    pub fn add_function(&mut self, function: FunctionSymbol) -> FunctionId {
        self.program.functions.push(function);
        FunctionId::from_index(self.program.functions.len() - 1)
    }

    /// Declare a parameter and append it to its owner's signature
    pub fn add_parameter(
        &mut self,
        owner: FunctionId,
        name: impl Into<String>,
        ref_kind: RefKind,
    ) -> ParameterId {
        self.program.parameters.push(ParameterSymbol {
            name: name.into(),
            owner,
            ref_kind,
        });
        let id = ParameterId::from_index(self.program.parameters.len() - 1);
        if let Some(function) = self.program.functions.get_mut(owner.index()) {
            function.parameters.push(id);
        }
        id
    }

    pub fn add_local(&mut self, owner: FunctionId, name: impl Into<String>) -> LocalId {
        self.program.locals.push(LocalSymbol {
            name: name.into(),
            owner,
        });
        LocalId::from_index(self.program.locals.len() - 1)
    }

    pub fn add_field(&mut self, field: FieldSymbol) -> FieldId {
        self.program.fields.push(field);
        FieldId::from_index(self.program.fields.len() - 1)
    }

    pub fn add_property(&mut self, property: PropertySymbol) -> PropertyId {
        self.program.properties.push(property);
        PropertyId::from_index(self.program.properties.len() - 1)
    }

    pub fn set_body(&mut self, function: FunctionId, body: Vec<Operation>) -> &mut Self {
        if let Some(f) = self.program.functions.get_mut(function.index()) {
            f.body = Some(body);
        }
        self
    }

    pub fn set_static_initializer(&mut self, ty: TypeId, initializer: FunctionId) -> &mut Self {
        if let Some(t) = self.program.types.get_mut(ty.index()) {
            t.static_initializer = Some(initializer);
        }
        self
    }

    pub fn build(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::{call, local, param, ret};
    use indoc::indoc;

    #[test]
    fn test_builder_links_parameters_to_owner() {
        let mut b = ProgramBuilder::new();
        let f = b.add_function(FunctionSymbol::new("f", "M.f"));
        let x = b.add_parameter(f, "x", RefKind::Value);
        let program = b.build();
        assert_eq!(program.function(f).unwrap().parameters, vec![x]);
        assert_eq!(program.parameter(x).unwrap().owner, f);
    }

    #[test]
    fn test_find_function_prefers_qualified_name() {
        let mut b = ProgramBuilder::new();
        let a = b.add_function(FunctionSymbol::new("Run", "A.Run"));
        let run = b.add_function(FunctionSymbol::new("Run", "B.Run"));
        let program = b.build();
        assert_eq!(program.find_function("B.Run"), Some(run));
        assert_eq!(program.find_function("Run"), Some(a));
        assert_eq!(program.find_function("Missing"), None);
    }

    #[test]
    fn test_validate_accepts_consistent_program() {
        let mut b = ProgramBuilder::new();
        let g = b.add_function(FunctionSymbol::new("g", "M.g"));
        let f = b.add_function(FunctionSymbol::new("f", "M.f"));
        let x = b.add_parameter(f, "x", RefKind::Value);
        b.set_body(f, vec![ret(call(g, vec![param(x)]))]);
        b.set_body(g, vec![]);
        assert!(b.build().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let mut b = ProgramBuilder::new();
        let f = b.add_function(FunctionSymbol::new("f", "M.f"));
        b.set_body(f, vec![ret(local(LocalId(9))), ret(call(FunctionId(42), vec![]))]);
        let err = b.build().validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("local#9"), "{}", message);
        assert!(message.contains("fn#42"), "{}", message);
    }

    #[test]
    fn test_load_from_json() {
        let json = indoc! {r#"
            {
              "functions": [
                {
                  "name": "Answer",
                  "qualified_name": "Demo.Answer",
                  "body": [
                    {"kind": "return", "value": {"kind": "literal", "value": 42}}
                  ]
                }
              ]
            }
        "#};
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, json).unwrap();

        let program = Program::load(&path).unwrap();
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.body(FunctionId(0)).map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_load_missing_file_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Program::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }
}
