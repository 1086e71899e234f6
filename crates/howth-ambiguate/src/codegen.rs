//! JavaScript printer for the arena AST.
//!
//! Used to inspect the rewritten program (tests, diagnostics, determinism
//! checks). Output is stable: the same arena always prints the same text.

use crate::ast::*;

/// Code generation options.
#[derive(Debug, Clone, Default)]
pub struct CodegenOptions {
    /// Remove optional whitespace and newlines.
    pub minify: bool,
    /// Indent string (default: "  ").
    pub indent: Option<String>,
}

/// The code generator.
pub struct Codegen<'a> {
    program: &'a Program,
    options: CodegenOptions,
    output: String,
    indent_level: usize,
    indent_str: String,
}

impl<'a> Codegen<'a> {
    /// Create a new code generator.
    pub fn new(program: &'a Program, options: CodegenOptions) -> Self {
        let indent_str = options.indent.clone().unwrap_or_else(|| "  ".to_string());
        Self {
            program,
            options,
            output: String::new(),
            indent_level: 0,
            indent_str,
        }
    }

    /// Generate JavaScript source code.
    pub fn generate(mut self) -> String {
        let body = self.program.body();
        for (i, &stmt) in body.iter().enumerate() {
            if i > 0 {
                self.emit_newline();
            }
            self.emit_stmt(stmt);
        }
        self.output
    }

    // =========================================================================
    // Output Helpers
    // =========================================================================

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn emit_space(&mut self) {
        if !self.options.minify {
            self.output.push(' ');
        }
    }

    fn emit_newline(&mut self) {
        if !self.options.minify {
            self.output.push('\n');
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_str);
            }
        }
    }

    fn emit_comma(&mut self) {
        self.emit(",");
        self.emit_space();
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn emit_list(&mut self, items: &[NodeId]) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.emit_comma();
            }
            self.emit_expr(item);
        }
    }

    // =========================================================================
    // Statement Emission
    // =========================================================================

    fn emit_stmt(&mut self, id: NodeId) {
        let program = self.program;
        match program.node(id) {
            NodeKind::ExprStmt(expr) => {
                let needs_parens = matches!(
                    program.node(*expr),
                    NodeKind::Object(_) | NodeKind::FunctionExpr(_) | NodeKind::ClassExpr(_)
                );
                if needs_parens {
                    self.emit("(");
                }
                self.emit_expr(*expr);
                if needs_parens {
                    self.emit(")");
                }
                self.emit(";");
            }
            NodeKind::Var { kind, decls } => {
                self.emit(kind.as_str());
                self.emit(" ");
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        self.emit_comma();
                    }
                    self.emit_expr(decl.binding);
                    if let Some(init) = decl.init {
                        self.emit_space();
                        self.emit("=");
                        self.emit_space();
                        self.emit_expr(init);
                    }
                }
                self.emit(";");
            }
            NodeKind::Function(func) => self.emit_function(func),
            NodeKind::Class(class) => self.emit_class(class),
            NodeKind::Return(arg) => {
                self.emit("return");
                if let Some(arg) = arg {
                    self.emit(" ");
                    self.emit_expr(*arg);
                }
                self.emit(";");
            }
            NodeKind::Block(stmts) => self.emit_block(stmts),
            // Anything else in statement position is an expression statement
            // without the wrapper node.
            _ => {
                self.emit_expr(id);
                self.emit(";");
            }
        }
    }

    fn emit_block(&mut self, stmts: &[NodeId]) {
        self.emit("{");
        if stmts.is_empty() {
            self.emit("}");
            return;
        }
        self.indent();
        for &stmt in stmts {
            self.emit_newline();
            self.emit_stmt(stmt);
        }
        self.dedent();
        self.emit_newline();
        self.emit("}");
    }

    fn emit_function(&mut self, func: &Function) {
        self.emit("function");
        if let Some(name) = &func.name {
            self.emit(" ");
            self.emit(name);
        }
        self.emit_params_and_body(func);
    }

    fn emit_params_and_body(&mut self, func: &Function) {
        self.emit("(");
        self.emit_list(&func.params);
        self.emit(")");
        self.emit_space();
        self.emit_block(&func.body);
    }

    fn emit_class(&mut self, class: &Class) {
        self.emit("class");
        if let Some(name) = &class.name {
            self.emit(" ");
            self.emit(name);
        }
        if let Some(super_class) = class.super_class {
            self.emit(" extends ");
            self.emit_expr(super_class);
        }
        self.emit_space();
        self.emit("{");
        self.indent();
        for &member in &class.members {
            self.emit_newline();
            self.emit_class_member(member);
        }
        self.dedent();
        if !class.members.is_empty() {
            self.emit_newline();
        }
        self.emit("}");
    }

    fn emit_class_member(&mut self, id: NodeId) {
        let program = self.program;
        let NodeKind::ClassMember(member) = program.node(id) else {
            self.emit_stmt(id);
            return;
        };
        if member.is_static {
            self.emit("static ");
        }
        match member.kind {
            MemberKind::Getter => self.emit("get "),
            MemberKind::Setter => self.emit("set "),
            MemberKind::Constructor | MemberKind::Method | MemberKind::Field => {}
        }
        self.emit_property_key(&member.key);
        match member.kind {
            MemberKind::Field => {
                if let Some(value) = member.value {
                    self.emit_space();
                    self.emit("=");
                    self.emit_space();
                    self.emit_expr(value);
                }
                self.emit(";");
            }
            MemberKind::Constructor | MemberKind::Method | MemberKind::Getter | MemberKind::Setter => {
                self.emit_method_tail(member.value);
            }
        }
    }

    /// Emit `(params) { body }` for a method whose value is a function expression.
    fn emit_method_tail(&mut self, value: Option<NodeId>) {
        let program = self.program;
        match value.map(|v| program.node(v)) {
            Some(NodeKind::FunctionExpr(func)) => self.emit_params_and_body(func),
            _ => {
                self.emit("()");
                self.emit_space();
                self.emit("{}");
            }
        }
    }

    // =========================================================================
    // Expression Emission
    // =========================================================================

    fn emit_expr(&mut self, id: NodeId) {
        let program = self.program;
        match program.node(id) {
            NodeKind::Null => self.emit("null"),
            NodeKind::Bool(b) => self.emit(if *b { "true" } else { "false" }),
            NodeKind::Number(n) => self.emit(&format_number(*n)),
            NodeKind::String(s) => {
                self.emit("\"");
                self.emit(&escape_string(s));
                self.emit("\"");
            }
            NodeKind::Ident(name) => self.emit(name),
            NodeKind::This => self.emit("this"),
            NodeKind::Array(elems) => {
                self.emit("[");
                self.emit_list(elems);
                self.emit("]");
            }
            NodeKind::Object(props) => {
                self.emit("{");
                self.emit_list(props);
                self.emit("}");
            }
            NodeKind::Property(prop) => self.emit_object_property(prop),
            NodeKind::FunctionExpr(func) => self.emit_function(func),
            NodeKind::ClassExpr(class) => self.emit_class(class),
            NodeKind::ClassMember(_) => self.emit_class_member(id),
            NodeKind::Member {
                object,
                property,
                optional,
            } => {
                self.emit_callee(*object);
                self.emit(if *optional { "?." } else { "." });
                self.emit(property);
            }
            NodeKind::Index {
                object,
                index,
                optional,
            } => {
                self.emit_callee(*object);
                if *optional {
                    self.emit("?.");
                }
                self.emit("[");
                self.emit_expr(*index);
                self.emit("]");
            }
            NodeKind::Call {
                callee,
                args,
                optional,
            } => {
                self.emit_callee(*callee);
                if *optional {
                    self.emit("?.");
                }
                self.emit("(");
                self.emit_list(args);
                self.emit(")");
            }
            NodeKind::New { callee, args } => {
                self.emit("new ");
                self.emit_callee(*callee);
                self.emit("(");
                self.emit_list(args);
                self.emit(")");
            }
            NodeKind::Assign { op, left, right } => {
                self.emit_expr(*left);
                self.emit_space();
                self.emit(op.as_str());
                self.emit_space();
                self.emit_expr(*right);
            }
            NodeKind::Binary { op, left, right } => {
                self.emit_operand(*left);
                self.emit_space();
                self.emit(op.as_str());
                self.emit_space();
                self.emit_operand(*right);
            }
            NodeKind::Spread(arg) => {
                self.emit("...");
                self.emit_expr(*arg);
            }
            NodeKind::ObjectPattern(props) => {
                self.emit("{");
                self.emit_list(props);
                self.emit("}");
            }
            NodeKind::PatternProperty(prop) => {
                if prop.shorthand {
                    self.emit_expr(prop.value);
                } else {
                    self.emit_property_key(&prop.key);
                    self.emit(":");
                    self.emit_space();
                    self.emit_expr(prop.value);
                }
            }
            NodeKind::ExprStmt(_)
            | NodeKind::Var { .. }
            | NodeKind::Function(_)
            | NodeKind::Class(_)
            | NodeKind::Return(_)
            | NodeKind::Block(_) => self.emit_stmt(id),
        }
    }

    /// Emit the object of a member access or call, parenthesized when needed.
    fn emit_callee(&mut self, id: NodeId) {
        let needs_parens = matches!(
            self.program.node(id),
            NodeKind::Assign { .. }
                | NodeKind::Binary { .. }
                | NodeKind::FunctionExpr(_)
                | NodeKind::ClassExpr(_)
                | NodeKind::Object(_)
                | NodeKind::Number(_)
        );
        self.emit_wrapped(id, needs_parens);
    }

    fn emit_operand(&mut self, id: NodeId) {
        let needs_parens = matches!(
            self.program.node(id),
            NodeKind::Assign { .. } | NodeKind::Binary { .. }
        );
        self.emit_wrapped(id, needs_parens);
    }

    fn emit_wrapped(&mut self, id: NodeId, parens: bool) {
        if parens {
            self.emit("(");
        }
        self.emit_expr(id);
        if parens {
            self.emit(")");
        }
    }

    fn emit_object_property(&mut self, prop: &Property) {
        if prop.shorthand {
            if let PropertyKey::Ident(name) = &prop.key {
                self.emit(name);
                return;
            }
        }

        match prop.kind {
            PropertyKind::Get => self.emit("get "),
            PropertyKind::Set => self.emit("set "),
            PropertyKind::Init | PropertyKind::Method => {}
        }
        self.emit_property_key(&prop.key);

        match prop.kind {
            PropertyKind::Method | PropertyKind::Get | PropertyKind::Set => {
                self.emit_method_tail(Some(prop.value));
            }
            PropertyKind::Init => {
                self.emit(":");
                self.emit_space();
                self.emit_expr(prop.value);
            }
        }
    }

    fn emit_property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Ident(name) => self.emit(name),
            PropertyKey::String(s) => {
                self.emit("\"");
                self.emit(&escape_string(s));
                self.emit("\"");
            }
            PropertyKey::Number(n) => self.emit(&format_number(*n)),
            PropertyKey::Computed(expr) => {
                self.emit("[");
                self.emit_expr(*expr);
                self.emit("]");
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(program: &Program) -> String {
        Codegen::new(program, CodegenOptions::default()).generate()
    }

    #[test]
    fn test_prototype_assignment() {
        let mut p = Program::new();
        let foo = p.ident("Foo");
        let proto = p.member(foo, "prototype");
        let access = p.member(proto, "bar");
        let zero = p.number(0.0);
        let assign = p.assign(access, zero);
        let stmt = p.expr_stmt(assign);
        p.push(stmt);
        assert_eq!(print(&p), "Foo.prototype.bar = 0;");
    }

    #[test]
    fn test_object_literal_forms() {
        let mut p = Program::new();
        let one = p.number(1.0);
        let init = p.property(PropertyKey::Ident("a".into()), one);
        let quoted_value = p.number(2.0);
        let quoted = p.property(PropertyKey::String("b".into()), quoted_value);
        let short = p.shorthand("c");
        let getter = p.accessor(PropertyKind::Get, PropertyKey::Ident("d".into()), Vec::new());
        let obj = p.object(vec![init, quoted, short, getter]);
        let o = p.ident("o");
        let var = p.var(VarKind::Var, o, Some(obj));
        p.push(var);
        assert_eq!(print(&p), "var o = {a: 1, \"b\": 2, c, get d() {}};");
    }

    #[test]
    fn test_class_with_members() {
        let mut p = Program::new();
        let ret_value = p.this();
        let ret = p.ret(Some(ret_value));
        let method = p.method("run", false, vec![ret]);
        let one = p.number(1.0);
        let field = p.field("count", true, Some(one));
        let base = p.ident("Base");
        let class = p.class_decl("Task", Some(base), vec![method, field]);
        p.push(class);
        assert_eq!(
            print(&p),
            "class Task extends Base {\n  run() {\n    return this;\n  }\n  static count = 1;\n}"
        );
    }

    #[test]
    fn test_object_pattern() {
        let mut p = Program::new();
        let short = p.pattern_shorthand("x");
        let local = p.ident("local");
        let renamed = p.pattern_property("y", local);
        let pattern = p.object_pattern(vec![short, renamed]);
        let source = p.ident("point");
        let decl = p.var(VarKind::Const, pattern, Some(source));
        p.push(decl);
        assert_eq!(print(&p), "const {x, y: local} = point;");
    }

    #[test]
    fn test_minify() {
        let mut p = Program::new();
        for name in ["x", "y"] {
            let target = p.ident(name);
            let one = p.number(1.0);
            let decl = p.var(VarKind::Let, target, Some(one));
            p.push(decl);
        }
        let output = Codegen::new(
            &p,
            CodegenOptions {
                minify: true,
                ..Default::default()
            },
        )
        .generate();
        assert!(!output.contains('\n'));
        assert_eq!(output, "let x=1;let y=1;");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(escape_string("a\"b"), "a\\\"b");
        assert_eq!(escape_string("line\n"), "line\\n");
    }
}
