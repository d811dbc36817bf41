//! Kotlin type model and type-system query surface for Taiga.
//!
//! The upstream compiler owns parsing and type checking; this crate only
//! models the handles the IDE layer needs: class and callable declarations,
//! type-parameter substitution, supertype instantiation, and stable textual
//! rendering of types. Everything is queried through an explicit [`TypeEnv`]
//! argument; nothing here is ambient or thread-local.

mod display;
mod hierarchy;
mod store;

pub use display::{render_type, TypeDisplay};
pub use hierarchy::{instantiate_as_supertype, is_subtype, self_type, substitution_for};
pub use store::TypeStore;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identity of a class declaration inside a [`TypeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub u32);

/// Identity of a formal type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(pub u32);

/// Identity of a member function: its owner class plus the index into the
/// owner's `functions` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionId {
    pub class: ClassId,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Class(ClassType),
    TypeVar(TypeVarId),
    Function(FunctionType),
    /// `T?`
    Nullable(Box<Type>),
    /// `T & Any`
    DefinitelyNonNull(Box<Type>),
    /// An unresolved or malformed type. Never rendered into generated source;
    /// candidates containing it are dropped instead.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub receiver: Option<Box<Type>>,
    pub params: Vec<Type>,
    pub ret: Box<Type>,
    pub is_suspend: bool,
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Type {
        Type::Class(ClassType { def, args })
    }

    pub fn nullable(inner: Type) -> Type {
        match inner {
            Type::Nullable(_) => inner,
            other => Type::Nullable(Box::new(other)),
        }
    }

    /// Whether this type (or any nested part of it) is [`Type::Error`].
    pub fn contains_error(&self) -> bool {
        match self {
            Type::Error => true,
            Type::Class(ClassType { args, .. }) => args.iter().any(Type::contains_error),
            Type::TypeVar(_) => false,
            Type::Function(f) => {
                f.receiver.as_deref().is_some_and(Type::contains_error)
                    || f.params.iter().any(Type::contains_error)
                    || f.ret.contains_error()
            }
            Type::Nullable(inner) | Type::DefinitelyNonNull(inner) => inner.contains_error(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    Final,
    Open,
    Abstract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bound: Option<Type>,
}

/// A value parameter of a function or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub ty: Type,
    pub is_vararg: bool,
    /// Default value as opaque source text, re-emitted verbatim.
    pub default_value: Option<String>,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_vararg: false,
            default_value: None,
        }
    }
}

/// Declaration-site modifier flags that survive into a corrected signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunModifiers {
    pub is_suspend: bool,
    pub is_operator: bool,
    pub is_infix: bool,
    pub is_external: bool,
    pub is_inline: bool,
    pub is_tailrec: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub receiver: Option<Type>,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<ParamDef>,
    pub return_type: Type,
    pub modifiers: FunModifiers,
    pub modality: Modality,
    pub visibility: Visibility,
    /// Compiler-generated override bridging a supertype member. Never offered
    /// as a reconciliation target.
    pub is_synthetic_override: bool,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, params: Vec<ParamDef>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            type_params: Vec::new(),
            params,
            return_type,
            modifiers: FunModifiers::default(),
            modality: Modality::Open,
            visibility: Visibility::Public,
            is_synthetic_override: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDef {
    pub params: Vec<ParamDef>,
    pub visibility: Visibility,
}

impl ConstructorDef {
    pub fn new(params: Vec<ParamDef>) -> Self {
        Self {
            params,
            visibility: Visibility::Public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Fully qualified name, e.g. `kotlin.collections.List`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    /// Declared supertype list, in source order. `kotlin.Any` is implicit and
    /// never listed here.
    pub super_types: Vec<Type>,
    pub functions: Vec<FunctionDef>,
    pub constructors: Vec<ConstructorDef>,
    /// Whether the declaration lives in writable project source (as opposed
    /// to a library or generated file).
    pub is_editable: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_types: Vec::new(),
            functions: Vec::new(),
            constructors: Vec::new(),
            is_editable: true,
        }
    }

    /// The primary constructor, by Kotlin convention the first one declared.
    pub fn primary_constructor(&self) -> Option<&ConstructorDef> {
        self.constructors.first()
    }
}

/// Frequently consulted builtin classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub any: ClassId,
    pub unit: ClassId,
    pub nothing: ClassId,
    pub string: ClassId,
    pub int: ClassId,
    pub boolean: ClassId,
    pub list: ClassId,
    pub array: ClassId,
    pub int_array: ClassId,
}

/// Read-only query surface over declarations and type parameters.
///
/// Passed explicitly to every algorithm in this crate and in `taiga-ide`;
/// the engine never captures it in shared state.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

/// Replace every mapped type variable inside `ty` with its image under
/// `subst`, recursing through nested generic arguments, function types, and
/// nullability markers. Unmapped parts pass through unchanged.
pub fn substitute(ty: &Type, subst: &HashMap<TypeVarId, Type>) -> Type {
    match ty {
        Type::TypeVar(id) => subst.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Class(ClassType { def, args }) => Type::Class(ClassType {
            def: *def,
            args: args.iter().map(|a| substitute(a, subst)).collect(),
        }),
        Type::Function(f) => Type::Function(FunctionType {
            receiver: f
                .receiver
                .as_deref()
                .map(|r| Box::new(substitute(r, subst))),
            params: f.params.iter().map(|p| substitute(p, subst)).collect(),
            ret: Box::new(substitute(&f.ret, subst)),
            is_suspend: f.is_suspend,
        }),
        Type::Nullable(inner) => Type::nullable(substitute(inner, subst)),
        Type::DefinitelyNonNull(inner) => {
            Type::DefinitelyNonNull(Box::new(substitute(inner, subst)))
        }
        Type::Error => Type::Error,
    }
}
