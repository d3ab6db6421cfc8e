//! Symbol metadata exposed by the frontend.

use super::ids::{FunctionId, ParameterId, TypeId};
use super::operation::{Location, Operation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What sort of callable a function symbol is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Method,
    Constructor,
    /// One-time type initializer, run before first static member access
    StaticInitializer,
    /// Property or indexer accessor
    Accessor,
    Lambda,
    LocalFunction,
}

/// A callable known to the semantic model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub name: String,
    /// Fully-qualified signature used for known-signature lookups
    pub qualified_name: String,
    #[serde(default)]
    pub kind: FunctionKind,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub containing_type: Option<TypeId>,
    #[serde(default)]
    pub parameters: Vec<ParameterId>,
    /// Marker annotations attached to the declaration
    #[serde(default)]
    pub markers: Vec<String>,
    /// Body operations; `None` for externally compiled or abstract functions
    #[serde(default)]
    pub body: Option<Vec<Operation>>,
    #[serde(default)]
    pub source_file: Option<PathBuf>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            kind: FunctionKind::Method,
            is_static: false,
            containing_type: None,
            parameters: Vec::new(),
            markers: Vec::new(),
            body: None,
            source_file: None,
            location: None,
        }
    }

    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn in_type(mut self, ty: TypeId) -> Self {
        self.containing_type = Some(ty);
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    pub fn is_static_initializer(&self) -> bool {
        self.kind == FunctionKind::StaticInitializer
    }
}

/// How an argument or parameter is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    #[default]
    Value,
    /// Read-only alias
    In,
    /// Read-write alias
    Ref,
    /// Write-only alias
    Out,
}

impl RefKind {
    /// Whether the callee may write through this alias
    pub fn is_writable(self) -> bool {
        matches!(self, RefKind::Ref | RefKind::Out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub owner: FunctionId,
    #[serde(default)]
    pub ref_kind: RefKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSymbol {
    pub name: String,
    /// Function whose frame owns the local
    pub owner: FunctionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub name: String,
    pub containing_type: TypeId,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_readonly: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub name: String,
    pub containing_type: TypeId,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub getter: Option<FunctionId>,
    #[serde(default)]
    pub setter: Option<FunctionId>,
    /// Only assignable during construction
    #[serde(default)]
    pub is_init_only: bool,
    /// Backed by a compiler-generated field with trivial accessors
    #[serde(default)]
    pub is_auto: bool,
}

impl PropertySymbol {
    /// Static auto-property with a setter: global mutable state in disguise
    pub fn is_static_mutable(&self) -> bool {
        self.is_static && self.is_auto && self.setter.is_some() && !self.is_init_only
    }
}

/// Whether instances of a type can be mutated after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeMutability {
    Immutable,
    #[default]
    Mutable,
    /// Growable collections, string builders and the like
    MutableCollection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,
    pub qualified_name: String,
    #[serde(default)]
    pub mutability: TypeMutability,
    #[serde(default)]
    pub static_initializer: Option<FunctionId>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            mutability: TypeMutability::Mutable,
            static_initializer: None,
        }
    }

    pub fn with_mutability(mut self, mutability: TypeMutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn is_immutable(&self) -> bool {
        self.mutability == TypeMutability::Immutable
    }
}
