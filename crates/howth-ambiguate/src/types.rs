//! Type information consumed by the pass.
//!
//! The pass never infers types. It asks a [`TypeOracle`] for the static type
//! of receiver expressions and for the shape of those types. [`TypeRegistry`]
//! is a table-driven oracle: the surrounding pipeline (or a test) declares
//! the nominal hierarchy and annotates nodes, then hands the registry to the
//! pass.

use crate::ast::NodeId;
use rustc_hash::{FxHashMap, FxHashSet};

/// Opaque handle to a type owned by an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How the pass should treat a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass<'a> {
    /// Not inferred, or deliberately untyped.
    Unknown,
    /// The top function/object type. Properties read through it may live on anything.
    Universal,
    /// `null` or `undefined`; dropped from unions.
    Empty,
    /// `string`, `number`, `boolean`: autoboxed built-ins.
    Primitive,
    /// An object literal type never assigned to a named class or interface.
    Anonymous,
    /// A structural (duck-typed) record type.
    Record,
    Union(&'a [TypeId]),
    /// A class instance, interface or enum.
    Nominal,
    /// The constructor function of a class; static properties live here.
    Constructor { instance: TypeId },
    /// The prototype object of a class; resolves to its instance type.
    Prototype { instance: TypeId },
}

/// Answers type questions about an AST snapshot.
pub trait TypeOracle {
    /// Static type of an expression node.
    fn type_of(&self, node: NodeId) -> TypeId;

    fn classify(&self, ty: TypeId) -> TypeClass<'_>;

    /// Nominal types directly below `ty`: subclasses, implementors and
    /// sub-interfaces for instances and interfaces; explicitly inheriting
    /// subclass constructors for constructors.
    fn direct_subtypes(&self, ty: TypeId) -> &[TypeId];

    /// Whether `ty` took part in a type mismatch, making any property on it
    /// unsafe to rename.
    fn is_invalidating(&self, _ty: TypeId) -> bool {
        false
    }

    /// Whether some structural type in the program declares `name`.
    fn is_structural_property(&self, _name: &str) -> bool {
        false
    }

    /// Human-readable type name for logs.
    fn display(&self, ty: TypeId) -> String;
}

// =============================================================================
// Type Registry
// =============================================================================

#[derive(Debug, Clone)]
enum TypeData {
    Unknown,
    Empty(&'static str),
    Primitive(&'static str),
    Universal(&'static str),
    Anonymous,
    Record(Vec<String>),
    Union(Vec<TypeId>),
    Instance(String),
    Interface(String),
    Enum(String),
    Constructor { name: String, instance: TypeId },
    Prototype { name: String, instance: TypeId },
}

/// How a subclass is connected to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inheritance {
    /// `class B extends A`: the subclass constructor inherits statics.
    Es6,
    /// `goog.inherits(B, A)` style: only instances are related.
    Es5,
}

/// The three types that make up a declared class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassTypes {
    pub instance: TypeId,
    pub constructor: TypeId,
    pub prototype: TypeId,
}

/// Table-driven [`TypeOracle`].
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<TypeData>,
    subtypes: Vec<Vec<TypeId>>,
    node_types: FxHashMap<NodeId, TypeId>,
    invalidated: FxHashSet<TypeId>,
    structural_props: FxHashSet<String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub const UNKNOWN: TypeId = TypeId(0);
    pub const NULL: TypeId = TypeId(1);
    pub const UNDEFINED: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    pub const NUMBER: TypeId = TypeId(4);
    pub const BOOLEAN: TypeId = TypeId(5);
    /// The generic `Function` type.
    pub const FUNCTION: TypeId = TypeId(6);
    /// The generic `Object` type.
    pub const OBJECT: TypeId = TypeId(7);

    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            subtypes: Vec::new(),
            node_types: FxHashMap::default(),
            invalidated: FxHashSet::default(),
            structural_props: FxHashSet::default(),
        };
        registry.add(TypeData::Unknown);
        registry.add(TypeData::Empty("null"));
        registry.add(TypeData::Empty("undefined"));
        registry.add(TypeData::Primitive("string"));
        registry.add(TypeData::Primitive("number"));
        registry.add(TypeData::Primitive("boolean"));
        registry.add(TypeData::Universal("Function"));
        registry.add(TypeData::Universal("Object"));
        registry
    }

    fn add(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        self.subtypes.push(Vec::new());
        id
    }

    /// Declare a root class.
    pub fn declare_class(&mut self, name: &str) -> ClassTypes {
        let instance = self.add(TypeData::Instance(name.to_string()));
        let constructor = self.add(TypeData::Constructor {
            name: name.to_string(),
            instance,
        });
        let prototype = self.add(TypeData::Prototype {
            name: name.to_string(),
            instance,
        });
        ClassTypes {
            instance,
            constructor,
            prototype,
        }
    }

    /// Declare a class extending `parent`.
    pub fn declare_subclass(&mut self, name: &str, parent: &ClassTypes, inheritance: Inheritance) -> ClassTypes {
        let class = self.declare_class(name);
        self.add_subtype(parent.instance, class.instance);
        if inheritance == Inheritance::Es6 {
            self.add_subtype(parent.constructor, class.constructor);
        }
        class
    }

    /// Declare a nominal interface extending `extends`.
    pub fn declare_interface(&mut self, name: &str, extends: &[TypeId]) -> TypeId {
        let iface = self.add(TypeData::Interface(name.to_string()));
        for &parent in extends {
            self.add_subtype(parent, iface);
        }
        iface
    }

    /// Record that instances of `instance` implement `iface`.
    pub fn add_implementation(&mut self, iface: TypeId, instance: TypeId) {
        self.add_subtype(iface, instance);
    }

    pub fn declare_enum(&mut self, name: &str) -> TypeId {
        self.add(TypeData::Enum(name.to_string()))
    }

    /// Declare a structural record type with the given property names.
    pub fn declare_record(&mut self, props: &[&str]) -> TypeId {
        for prop in props {
            self.structural_props.insert((*prop).to_string());
        }
        self.add(TypeData::Record(props.iter().map(|p| (*p).to_string()).collect()))
    }

    /// A fresh anonymous object-literal type.
    pub fn anonymous_object(&mut self) -> TypeId {
        self.add(TypeData::Anonymous)
    }

    pub fn union(&mut self, alternates: &[TypeId]) -> TypeId {
        self.add(TypeData::Union(alternates.to_vec()))
    }

    /// `?T`: `T` or `null`.
    pub fn nullable(&mut self, ty: TypeId) -> TypeId {
        self.union(&[ty, Self::NULL])
    }

    /// Add a direct subtype edge. Cycles are tolerated.
    pub fn add_subtype(&mut self, supertype: TypeId, subtype: TypeId) {
        let subs = &mut self.subtypes[supertype.index()];
        if !subs.contains(&subtype) {
            subs.push(subtype);
        }
    }

    /// Mark `ty` as part of a type mismatch. Unions invalidate each
    /// alternate and instances invalidate their prototype as well.
    pub fn invalidate(&mut self, ty: TypeId) {
        if let TypeData::Union(alternates) = &self.types[ty.index()] {
            let alternates = alternates.clone();
            for alt in alternates {
                self.invalidate(alt);
            }
        }
        self.invalidated.insert(ty);
        if matches!(self.types[ty.index()], TypeData::Instance(_)) {
            let prototype = self
                .types
                .iter()
                .position(|data| matches!(data, TypeData::Prototype { instance, .. } if *instance == ty));
            if let Some(index) = prototype {
                self.invalidated.insert(TypeId(index as u32));
            }
        }
    }

    /// Annotate an expression node with its static type.
    pub fn set_type(&mut self, node: NodeId, ty: TypeId) {
        self.node_types.insert(node, ty);
    }

    /// Annotate and hand the node back, for building typed expressions inline.
    pub fn typed(&mut self, node: NodeId, ty: TypeId) -> NodeId {
        self.set_type(node, ty);
        node
    }

    /// Number of declared types, builtins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeOracle for TypeRegistry {
    fn type_of(&self, node: NodeId) -> TypeId {
        self.node_types.get(&node).copied().unwrap_or(Self::UNKNOWN)
    }

    fn classify(&self, ty: TypeId) -> TypeClass<'_> {
        match self.types.get(ty.index()) {
            None | Some(TypeData::Unknown) => TypeClass::Unknown,
            Some(TypeData::Empty(_)) => TypeClass::Empty,
            Some(TypeData::Primitive(_)) => TypeClass::Primitive,
            Some(TypeData::Universal(_)) => TypeClass::Universal,
            Some(TypeData::Anonymous) => TypeClass::Anonymous,
            Some(TypeData::Record(_)) => TypeClass::Record,
            Some(TypeData::Union(alternates)) => TypeClass::Union(alternates.as_slice()),
            Some(TypeData::Instance(_) | TypeData::Interface(_) | TypeData::Enum(_)) => TypeClass::Nominal,
            Some(TypeData::Constructor { instance, .. }) => TypeClass::Constructor { instance: *instance },
            Some(TypeData::Prototype { instance, .. }) => TypeClass::Prototype { instance: *instance },
        }
    }

    fn direct_subtypes(&self, ty: TypeId) -> &[TypeId] {
        self.subtypes.get(ty.index()).map_or(&[], Vec::as_slice)
    }

    fn is_invalidating(&self, ty: TypeId) -> bool {
        self.invalidated.contains(&ty)
    }

    fn is_structural_property(&self, name: &str) -> bool {
        self.structural_props.contains(name)
    }

    fn display(&self, ty: TypeId) -> String {
        match self.types.get(ty.index()) {
            None | Some(TypeData::Unknown) => "?".to_string(),
            Some(TypeData::Empty(name) | TypeData::Primitive(name) | TypeData::Universal(name)) => {
                (*name).to_string()
            }
            Some(TypeData::Anonymous) => "{}".to_string(),
            Some(TypeData::Record(props)) => format!("{{{}}}", props.join(", ")),
            Some(TypeData::Union(alternates)) => {
                let parts: Vec<String> = alternates.iter().map(|alt| self.display(*alt)).collect();
                format!("({})", parts.join("|"))
            }
            Some(TypeData::Instance(name) | TypeData::Interface(name) | TypeData::Enum(name)) => name.clone(),
            Some(TypeData::Constructor { name, .. }) => format!("typeof {name}"),
            Some(TypeData::Prototype { name, .. }) => format!("{name}.prototype"),
        }
    }
}
