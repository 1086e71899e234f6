//! Arena-backed AST for the property renaming pass.
//!
//! Nodes live in one contiguous vector and refer to each other by [`NodeId`].
//! Ids are stable for the lifetime of a [`Program`], so later phases can
//! record a node during one traversal and mutate it in place afterwards.
//!
//! Only the syntax that matters for property names is modelled in detail:
//! member access, object literals, classes, destructuring patterns and calls.

/// Index of a node inside a [`Program`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Node Kinds
// =============================================================================

/// Every syntactic form the arena can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // === Statements ===
    /// `expr;`
    ExprStmt(NodeId),
    /// `let a = 1, b;`
    Var {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    /// `function f() {}`
    Function(Function),
    /// `class C {}`
    Class(Class),
    /// `return expr;`
    Return(Option<NodeId>),
    /// `{ ... }`
    Block(Vec<NodeId>),

    // === Literals ===
    Null,
    Bool(bool),
    Number(f64),
    String(String),

    // === Identifiers ===
    Ident(String),
    This,

    // === Compound Expressions ===
    Array(Vec<NodeId>),
    /// Object literal. Children are [`NodeKind::Property`] or [`NodeKind::Spread`] nodes.
    Object(Vec<NodeId>),
    Property(Property),
    FunctionExpr(Function),
    ClassExpr(Class),
    ClassMember(ClassMember),

    // === Member Access ===
    /// `object.property` or `object?.property`
    Member {
        object: NodeId,
        property: String,
        optional: bool,
    },
    /// `object[index]` or `object?.[index]`
    Index {
        object: NodeId,
        index: NodeId,
        optional: bool,
    },

    // === Operations ===
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
        optional: bool,
    },
    New {
        callee: NodeId,
        args: Vec<NodeId>,
    },
    Assign {
        op: AssignOp,
        left: NodeId,
        right: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Spread(NodeId),

    // === Patterns ===
    /// `{ a, b: c }` in binding position. Children are [`NodeKind::PatternProperty`] nodes.
    ObjectPattern(Vec<NodeId>),
    PatternProperty(PatternProperty),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    /// An [`NodeKind::Ident`] or [`NodeKind::ObjectPattern`].
    pub binding: NodeId,
    pub init: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<NodeId>,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<String>,
    pub super_class: Option<NodeId>,
    /// [`NodeKind::ClassMember`] nodes.
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub key: PropertyKey,
    pub kind: MemberKind,
    pub is_static: bool,
    /// Function expression for methods and accessors, initializer for fields.
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Constructor,
    Method,
    Getter,
    Setter,
    Field,
}

/// A key/value entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: NodeId,
    pub kind: PropertyKind,
    /// `{ foo }`; the value is an identifier with the same name as the key.
    pub shorthand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
    Method,
}

/// A key/binding entry of an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternProperty {
    pub key: PropertyKey,
    pub value: NodeId,
    pub shorthand: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// `foo`
    Ident(String),
    /// `"foo"`
    String(String),
    /// `1`
    Number(f64),
    /// `[expr]`
    Computed(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    OrAssign,
    NullishAssign,
}

impl AssignOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::OrAssign => "||=",
            Self::NullishAssign => "??=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    StrictEq,
    StrictNe,
    And,
    Or,
    Nullish,
}

impl BinaryOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::StrictEq => "===",
            Self::StrictNe => "!==",
            Self::And => "&&",
            Self::Or => "||",
            Self::Nullish => "??",
        }
    }
}

// =============================================================================
// Program
// =============================================================================

/// A whole compilation unit: the node arena plus its top-level statements.
#[derive(Debug, Clone, Default)]
pub struct Program {
    nodes: Vec<NodeKind>,
    body: Vec<NodeId>,
}

impl Program {
    /// Create an empty program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id. The node is not attached to the body.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(kind);
        id
    }

    /// Append a top-level statement.
    pub fn push(&mut self, stmt: NodeId) {
        self.body.push(stmt);
    }

    /// Top-level statements in source order.
    #[must_use]
    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()]
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All allocated nodes with their ids, in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeKind)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, kind)| (NodeId(i as u32), kind))
    }

    /// Dotted name of an identifier/member chain, e.g. `Object.defineProperty`.
    #[must_use]
    pub fn qualified_name(&self, id: NodeId) -> Option<String> {
        match self.node(id) {
            NodeKind::Ident(name) => Some(name.clone()),
            NodeKind::This => Some("this".to_string()),
            NodeKind::Member {
                object,
                property,
                optional: false,
            } => {
                let mut base = self.qualified_name(*object)?;
                base.push('.');
                base.push_str(property);
                Some(base)
            }
            _ => None,
        }
    }

    /// The string value when `id` is a string literal.
    #[must_use]
    pub fn string_literal(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn ident(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Ident(name.to_string()))
    }

    pub fn this(&mut self) -> NodeId {
        self.alloc(NodeKind::This)
    }

    pub fn null(&mut self) -> NodeId {
        self.alloc(NodeKind::Null)
    }

    pub fn number(&mut self, value: f64) -> NodeId {
        self.alloc(NodeKind::Number(value))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.alloc(NodeKind::String(value.to_string()))
    }

    pub fn member(&mut self, object: NodeId, property: &str) -> NodeId {
        self.alloc(NodeKind::Member {
            object,
            property: property.to_string(),
            optional: false,
        })
    }

    pub fn optional_member(&mut self, object: NodeId, property: &str) -> NodeId {
        self.alloc(NodeKind::Member {
            object,
            property: property.to_string(),
            optional: true,
        })
    }

    pub fn index(&mut self, object: NodeId, index: NodeId) -> NodeId {
        self.alloc(NodeKind::Index {
            object,
            index,
            optional: false,
        })
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Call {
            callee,
            args,
            optional: false,
        })
    }

    pub fn new_expr(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::New { callee, args })
    }

    pub fn assign(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::Assign {
            op: AssignOp::Assign,
            left,
            right,
        })
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::Binary { op, left, right })
    }

    pub fn array(&mut self, elems: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Array(elems))
    }

    pub fn spread(&mut self, arg: NodeId) -> NodeId {
        self.alloc(NodeKind::Spread(arg))
    }

    pub fn object(&mut self, props: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Object(props))
    }

    /// `key: value`
    pub fn property(&mut self, key: PropertyKey, value: NodeId) -> NodeId {
        self.alloc(NodeKind::Property(Property {
            key,
            value,
            kind: PropertyKind::Init,
            shorthand: false,
        }))
    }

    /// `{ name }`
    pub fn shorthand(&mut self, name: &str) -> NodeId {
        let value = self.ident(name);
        self.alloc(NodeKind::Property(Property {
            key: PropertyKey::Ident(name.to_string()),
            value,
            kind: PropertyKind::Init,
            shorthand: true,
        }))
    }

    /// `get key() {}`, `set key(v) {}` or `key() {}` inside an object literal.
    pub fn accessor(&mut self, kind: PropertyKind, key: PropertyKey, body: Vec<NodeId>) -> NodeId {
        let params = if kind == PropertyKind::Set {
            vec![self.ident("value")]
        } else {
            Vec::new()
        };
        let value = self.function_expr(None, params, body);
        self.alloc(NodeKind::Property(Property {
            key,
            value,
            kind,
            shorthand: false,
        }))
    }

    pub fn function_expr(&mut self, name: Option<&str>, params: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::FunctionExpr(Function {
            name: name.map(str::to_string),
            params,
            body,
        }))
    }

    pub fn function_decl(&mut self, name: &str, params: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Function(Function {
            name: Some(name.to_string()),
            params,
            body,
        }))
    }

    pub fn class_decl(&mut self, name: &str, super_class: Option<NodeId>, members: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Class(Class {
            name: Some(name.to_string()),
            super_class,
            members,
        }))
    }

    pub fn class_member(
        &mut self,
        kind: MemberKind,
        key: PropertyKey,
        is_static: bool,
        value: Option<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::ClassMember(ClassMember {
            key,
            kind,
            is_static,
            value,
        }))
    }

    /// `name() { ...body }` inside a class body.
    pub fn method(&mut self, name: &str, is_static: bool, body: Vec<NodeId>) -> NodeId {
        let value = self.function_expr(None, Vec::new(), body);
        self.class_member(
            MemberKind::Method,
            PropertyKey::Ident(name.to_string()),
            is_static,
            Some(value),
        )
    }

    /// `name = init;` inside a class body.
    pub fn field(&mut self, name: &str, is_static: bool, init: Option<NodeId>) -> NodeId {
        self.class_member(
            MemberKind::Field,
            PropertyKey::Ident(name.to_string()),
            is_static,
            init,
        )
    }

    pub fn object_pattern(&mut self, props: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ObjectPattern(props))
    }

    /// `key: binding` in a pattern.
    pub fn pattern_property(&mut self, key: &str, value: NodeId) -> NodeId {
        self.alloc(NodeKind::PatternProperty(PatternProperty {
            key: PropertyKey::Ident(key.to_string()),
            value,
            shorthand: false,
        }))
    }

    /// `{ name }` in a pattern.
    pub fn pattern_shorthand(&mut self, name: &str) -> NodeId {
        let value = self.ident(name);
        self.alloc(NodeKind::PatternProperty(PatternProperty {
            key: PropertyKey::Ident(name.to_string()),
            value,
            shorthand: true,
        }))
    }

    pub fn var(&mut self, kind: VarKind, binding: NodeId, init: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::Var {
            kind,
            decls: vec![VarDeclarator { binding, init }],
        })
    }

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::ExprStmt(expr))
    }

    pub fn ret(&mut self, arg: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::Return(arg))
    }

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Block(stmts))
    }
}
