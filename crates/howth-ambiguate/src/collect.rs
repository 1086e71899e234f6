//! Phase 1: record every property-name occurrence.
//!
//! One walk over the program, in source order. Nothing is mutated; each name
//! token is recorded with its syntactic kind and the static type of the
//! object it belongs to. Quoted and computed-string names are recorded too so
//! that the eligibility phase can pin them.

use crate::ast::{Class, MemberKind, NodeId, NodeKind, Program, PropertyKey, PropertyKind};
use crate::context::{OccurrenceKind, PassContext};
use crate::types::{TypeClass, TypeId, TypeOracle, TypeRegistry};

const DEFINE_PROPERTIES: &str = "Object.defineProperties";
const DEFINE_PROPERTY: &str = "Object.defineProperty";

/// Walk `program` and record occurrences into `ctx`.
pub fn collect(program: &Program, oracle: &dyn TypeOracle, rename_functions: &[String], ctx: &mut PassContext) {
    let mut collector = Collector {
        program,
        oracle,
        rename_functions,
        ctx,
    };
    for &stmt in program.body() {
        collector.visit(stmt);
    }
}

struct Collector<'a> {
    program: &'a Program,
    oracle: &'a dyn TypeOracle,
    rename_functions: &'a [String],
    ctx: &'a mut PassContext,
}

impl Collector<'_> {
    fn record(&mut self, name: &str, kind: OccurrenceKind, receiver: TypeId, node: NodeId) {
        self.ctx.record(name, kind, receiver, node);
    }

    fn visit_all(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.visit(id);
        }
    }

    fn visit(&mut self, id: NodeId) {
        let program = self.program;
        match program.node(id) {
            NodeKind::ExprStmt(expr) | NodeKind::Spread(expr) => self.visit(*expr),
            NodeKind::Var { decls, .. } => {
                for decl in decls {
                    self.visit(decl.binding);
                    if let Some(init) = decl.init {
                        self.visit(init);
                    }
                }
            }
            NodeKind::Function(func) | NodeKind::FunctionExpr(func) => {
                self.visit_all(&func.params);
                self.visit_all(&func.body);
            }
            NodeKind::Class(class) | NodeKind::ClassExpr(class) => self.visit_class(id, class),
            NodeKind::Return(arg) => {
                if let Some(arg) = arg {
                    self.visit(*arg);
                }
            }
            NodeKind::Block(stmts) => self.visit_all(stmts),
            NodeKind::Null
            | NodeKind::Bool(_)
            | NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Ident(_)
            | NodeKind::This => {}
            NodeKind::Array(elems) => self.visit_all(elems),
            NodeKind::Object(props) => {
                let receiver = self.oracle.type_of(id);
                self.visit_object(props, receiver, false);
            }
            // Visited through their parent object, class or pattern.
            NodeKind::Property(_) | NodeKind::ClassMember(_) | NodeKind::PatternProperty(_) => {}
            NodeKind::Member { object, property, .. } => {
                self.visit(*object);
                let receiver = self.oracle.type_of(*object);
                self.record(property, OccurrenceKind::Dot, receiver, id);
            }
            NodeKind::Index { object, index, .. } => {
                self.visit(*object);
                if let Some(name) = program.string_literal(*index) {
                    let receiver = self.oracle.type_of(*object);
                    self.record(name, OccurrenceKind::Quoted, receiver, *index);
                }
                self.visit(*index);
            }
            NodeKind::Call { callee, args, .. } => self.visit_call(*callee, args),
            NodeKind::New { callee, args } => {
                self.visit(*callee);
                self.visit_all(args);
            }
            NodeKind::Assign { left, right, .. } | NodeKind::Binary { left, right, .. } => {
                self.visit(*left);
                self.visit(*right);
            }
            NodeKind::ObjectPattern(props) => self.visit_pattern(id, props),
        }
    }

    /// Object literal entries. In descriptor mode (`Object.defineProperties`)
    /// plain keys name properties of the defineProperties target.
    fn visit_object(&mut self, props: &[NodeId], receiver: TypeId, descriptors: bool) {
        let program = self.program;
        for &prop_id in props {
            let prop = match program.node(prop_id) {
                NodeKind::Property(prop) => prop,
                _ => {
                    self.visit(prop_id);
                    continue;
                }
            };
            let kind = match (prop.kind, prop.shorthand) {
                (_, true) => OccurrenceKind::Shorthand,
                (PropertyKind::Init, false) if descriptors => OccurrenceKind::DescriptorKey,
                (PropertyKind::Init, false) => OccurrenceKind::ObjectKey,
                (PropertyKind::Get, false) => OccurrenceKind::Getter,
                (PropertyKind::Set, false) => OccurrenceKind::Setter,
                (PropertyKind::Method, false) => OccurrenceKind::MemberFunction,
            };
            self.visit_key(&prop.key, kind, receiver, prop_id);
            self.visit(prop.value);
        }
    }

    fn visit_key(&mut self, key: &PropertyKey, kind: OccurrenceKind, receiver: TypeId, node: NodeId) {
        match key {
            PropertyKey::Ident(name) => self.record(name, kind, receiver, node),
            PropertyKey::String(name) => self.record(name, OccurrenceKind::Quoted, receiver, node),
            PropertyKey::Number(_) => {}
            PropertyKey::Computed(expr) => {
                let program = self.program;
                if let Some(name) = program.string_literal(*expr) {
                    self.record(name, OccurrenceKind::ComputedLiteral, receiver, node);
                }
                self.visit(*expr);
            }
        }
    }

    fn visit_class(&mut self, id: NodeId, class: &Class) {
        if let Some(super_class) = class.super_class {
            self.visit(super_class);
        }

        let constructor = self.oracle.type_of(id);
        let instance = match self.oracle.classify(constructor) {
            TypeClass::Constructor { instance } => instance,
            _ => TypeRegistry::UNKNOWN,
        };

        let program = self.program;
        for &member_id in &class.members {
            let NodeKind::ClassMember(member) = program.node(member_id) else {
                self.visit(member_id);
                continue;
            };
            let kind = match member.kind {
                MemberKind::Constructor => None,
                MemberKind::Method => Some(OccurrenceKind::MemberFunction),
                MemberKind::Getter => Some(OccurrenceKind::Getter),
                MemberKind::Setter => Some(OccurrenceKind::Setter),
                MemberKind::Field => Some(OccurrenceKind::Field),
            };
            if let Some(kind) = kind {
                let receiver = if member.is_static { constructor } else { instance };
                self.visit_key(&member.key, kind, receiver, member_id);
            }
            if let Some(value) = member.value {
                self.visit(value);
            }
        }
    }

    fn visit_call(&mut self, callee: NodeId, args: &[NodeId]) {
        let program = self.program;
        self.visit(callee);

        let Some(target) = program.qualified_name(callee) else {
            self.visit_all(args);
            return;
        };

        if self.rename_functions.iter().any(|f| *f == target) {
            if let Some(&first) = args.first() {
                if let Some(name) = program.string_literal(first) {
                    self.record(name, OccurrenceKind::RenameCall, TypeRegistry::UNKNOWN, first);
                }
            }
            self.visit_all(args);
            return;
        }

        match (target.as_str(), args) {
            (DEFINE_PROPERTIES, [object, descriptors, rest @ ..]) => {
                self.visit(*object);
                if let NodeKind::Object(props) = program.node(*descriptors) {
                    let receiver = self.oracle.type_of(*object);
                    self.visit_object(props, receiver, true);
                } else {
                    self.visit(*descriptors);
                }
                self.visit_all(rest);
            }
            (DEFINE_PROPERTY, [object, key, rest @ ..]) => {
                self.visit(*object);
                if let Some(name) = program.string_literal(*key) {
                    let receiver = self.oracle.type_of(*object);
                    self.record(name, OccurrenceKind::DescriptorKey, receiver, *key);
                } else {
                    self.visit(*key);
                }
                self.visit_all(rest);
            }
            _ => self.visit_all(args),
        }
    }

    /// Destructuring keys read properties of the destructured value.
    fn visit_pattern(&mut self, id: NodeId, props: &[NodeId]) {
        let receiver = self.oracle.type_of(id);
        let program = self.program;
        for &prop_id in props {
            let NodeKind::PatternProperty(prop) = program.node(prop_id) else {
                self.visit(prop_id);
                continue;
            };
            let kind = if prop.shorthand {
                OccurrenceKind::PatternShorthand
            } else {
                OccurrenceKind::PatternKey
            };
            self.visit_key(&prop.key, kind, receiver, prop_id);
            self.visit(prop.value);
        }
    }
}
