//! Tree printer.
//!
//! Prints exactly the tree it is given: parentheses come only from `Paren`
//! nodes, so a rewrite that needs grouping must build them.

use recast_ir::{ensure_sufficient_stack, NodeId, NodeKind, NodeRange, SyntaxTree};

use crate::emitter::Emitter;

pub struct Printer<'t, E: Emitter> {
    tree: &'t SyntaxTree,
    out: E,
    level: usize,
}

impl<'t, E: Emitter> Printer<'t, E> {
    pub fn new(tree: &'t SyntaxTree, out: E) -> Self {
        Printer {
            tree,
            out,
            level: 0,
        }
    }

    pub fn finish(self) -> E {
        self.out
    }

    // Members

    pub fn unit(&mut self, members: NodeRange) {
        let mut previous_was_method = None;
        for member in self.tree.list(members) {
            let is_method = matches!(self.tree.kind(member), NodeKind::Method { .. });
            if previous_was_method.is_some_and(|prev| prev || is_method) {
                self.out.emit_newline();
            }
            self.unit_member(member);
            previous_was_method = Some(is_method);
        }
    }

    /// A method or a statement, as it would appear in a unit.
    pub fn unit_member(&mut self, id: NodeId) {
        if matches!(self.tree.kind(id), NodeKind::Method { .. }) {
            self.method(id);
        } else {
            self.statement(id);
        }
    }

    fn method(&mut self, id: NodeId) {
        let NodeKind::Method {
            ret,
            name,
            params,
            body,
        } = self.tree.kind(id)
        else {
            return;
        };
        self.out.emit_indent(self.level);
        self.type_ref(ret);
        self.out.emit(" ");
        self.out.emit(self.tree.text(name));
        self.out.emit("(");
        self.comma_list(params);
        self.out.emit(")");
        self.embedded(body);
    }

    // Statements

    /// Print a statement on its own line(s), ending with a newline.
    pub fn statement(&mut self, id: NodeId) {
        self.out.emit_indent(self.level);
        self.statement_tail(id);
    }

    /// Print a statement from the current column, ending with a newline.
    fn statement_tail(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| match self.tree.kind(id) {
            NodeKind::Block { stmts } => {
                self.block(stmts);
                self.out.emit_newline();
            }
            NodeKind::LocalDecl { ty, declarators } => {
                self.local_decl(ty, declarators);
                self.out.emit(";");
                self.out.emit_newline();
            }
            NodeKind::ExprStmt { expr } => {
                self.expr(expr);
                self.out.emit(";");
                self.out.emit_newline();
            }
            NodeKind::Return { value } => {
                self.out.emit("return");
                if value.is_valid() {
                    self.out.emit(" ");
                    self.expr(value);
                }
                self.out.emit(";");
                self.out.emit_newline();
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.out.emit("if (");
                self.expr(cond);
                self.out.emit(")");
                let then_is_block = self.embedded_open(then_branch);
                if !else_branch.is_valid() {
                    if then_is_block {
                        self.out.emit_newline();
                    }
                } else {
                    if then_is_block {
                        self.out.emit(" else");
                    } else {
                        self.out.emit_indent(self.level);
                        self.out.emit("else");
                    }
                    if matches!(self.tree.kind(else_branch), NodeKind::If { .. }) {
                        self.out.emit(" ");
                        self.statement_tail(else_branch);
                    } else {
                        self.embedded(else_branch);
                    }
                }
            }
            NodeKind::While { cond, body } => {
                self.out.emit("while (");
                self.expr(cond);
                self.out.emit(")");
                self.embedded(body);
            }
            NodeKind::For {
                decl,
                initializers,
                cond,
                incrementors,
                body,
            } => {
                self.out.emit("for (");
                if let NodeKind::LocalDecl { ty, declarators } = self.tree.kind(decl) {
                    self.local_decl(ty, declarators);
                } else {
                    self.comma_list(initializers);
                }
                self.out.emit(";");
                if cond.is_valid() {
                    self.out.emit(" ");
                    self.expr(cond);
                }
                self.out.emit(";");
                if !incrementors.is_empty() {
                    self.out.emit(" ");
                    self.comma_list(incrementors);
                }
                self.out.emit(")");
                self.embedded(body);
            }
            NodeKind::ForEach {
                ty,
                name,
                collection,
                body,
            } => {
                self.out.emit("foreach (");
                self.type_ref(ty);
                self.out.emit(" ");
                self.out.emit(self.tree.text(name));
                self.out.emit(" in ");
                self.expr(collection);
                self.out.emit(")");
                self.embedded(body);
            }
            _ => {
                self.expr(id);
                self.out.emit_newline();
            }
        });
    }

    /// Body of a compound statement: a block stays on the header line, any
    /// other statement goes on the next line one level deeper.
    fn embedded(&mut self, body: NodeId) {
        if self.embedded_open(body) {
            self.out.emit_newline();
        }
    }

    /// Like `embedded`, but leaves the line open after a closing brace.
    /// Returns `true` if the body was a block.
    fn embedded_open(&mut self, body: NodeId) -> bool {
        if let NodeKind::Block { stmts } = self.tree.kind(body) {
            self.out.emit(" ");
            self.block(stmts);
            true
        } else {
            self.out.emit_newline();
            self.level += 1;
            self.statement(body);
            self.level -= 1;
            false
        }
    }

    /// `{`, the statements one level deeper, `}` without a trailing newline.
    fn block(&mut self, stmts: NodeRange) {
        self.out.emit("{");
        self.out.emit_newline();
        self.level += 1;
        for stmt in self.tree.list(stmts) {
            self.statement(stmt);
        }
        self.level -= 1;
        self.out.emit_indent(self.level);
        self.out.emit("}");
    }

    fn local_decl(&mut self, ty: NodeId, declarators: NodeRange) {
        self.type_ref(ty);
        self.out.emit(" ");
        self.comma_list(declarators);
    }

    fn type_ref(&mut self, id: NodeId) {
        let NodeKind::TypeRef { name, args, rank } = self.tree.kind(id) else {
            self.expr(id);
            return;
        };
        self.out.emit(self.tree.text(name));
        if !args.is_empty() {
            self.out.emit("<");
            self.comma_list(args);
            self.out.emit(">");
        }
        for _ in 0..rank {
            self.out.emit("[]");
        }
    }

    fn comma_list(&mut self, range: NodeRange) {
        for (i, item) in self.tree.list(range).into_iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            self.expr(item);
        }
    }

    // Expressions

    /// Print any non-statement node inline.
    pub fn expr(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| {
            let tree = self.tree;
            match tree.kind(id) {
                NodeKind::Int(value) => self.out.emit(&value.to_string()),
                NodeKind::Str(text) => {
                    self.out.emit("\"");
                    self.out.emit(tree.text(text));
                    self.out.emit("\"");
                }
                NodeKind::Bool(value) => self.out.emit(if value { "true" } else { "false" }),
                NodeKind::Null => self.out.emit("null"),
                NodeKind::Ident(name) => self.out.emit(tree.text(name)),
                NodeKind::Member {
                    receiver,
                    name,
                    conditional,
                } => {
                    self.expr(receiver);
                    self.out.emit(if conditional { "?." } else { "." });
                    self.out.emit(tree.text(name));
                }
                NodeKind::Invoke { callee, args } => {
                    self.expr(callee);
                    self.out.emit("(");
                    self.comma_list(args);
                    self.out.emit(")");
                }
                NodeKind::Argument { modifier, value } => {
                    if let Some(keyword) = modifier.keyword() {
                        self.out.emit(keyword);
                        self.out.emit(" ");
                    }
                    self.expr(value);
                }
                NodeKind::Index { receiver, args } => {
                    self.expr(receiver);
                    self.out.emit("[");
                    self.comma_list(args);
                    self.out.emit("]");
                }
                NodeKind::Lambda {
                    params,
                    body,
                    parenthesized,
                } => {
                    let wrap = parenthesized || params.len() != 1;
                    if wrap {
                        self.out.emit("(");
                    }
                    self.comma_list(params);
                    if wrap {
                        self.out.emit(")");
                    }
                    self.out.emit(" => ");
                    if let NodeKind::Block { stmts } = tree.kind(body) {
                        self.block(stmts);
                    } else {
                        self.expr(body);
                    }
                }
                NodeKind::Binary { op, left, right } => {
                    self.expr(left);
                    self.out.emit(" ");
                    self.out.emit(op.as_symbol());
                    self.out.emit(" ");
                    self.expr(right);
                }
                NodeKind::Unary { op, operand } => {
                    if op.is_postfix() {
                        self.expr(operand);
                        self.out.emit(op.as_symbol());
                    } else {
                        self.out.emit(op.as_symbol());
                        self.expr(operand);
                    }
                }
                NodeKind::Assign { op, target, value } => {
                    self.expr(target);
                    self.out.emit(" ");
                    self.out.emit(op.as_symbol());
                    self.out.emit(" ");
                    self.expr(value);
                }
                NodeKind::Paren { inner } => {
                    self.out.emit("(");
                    self.expr(inner);
                    self.out.emit(")");
                }
                NodeKind::Param { ty, name } => {
                    if ty.is_valid() {
                        self.type_ref(ty);
                        self.out.emit(" ");
                    }
                    self.out.emit(tree.text(name));
                }
                NodeKind::Declarator { name, init } => {
                    self.out.emit(tree.text(name));
                    if init.is_valid() {
                        self.out.emit(" = ");
                        self.expr(init);
                    }
                }
                NodeKind::TypeRef { .. } => self.type_ref(id),
                NodeKind::LocalDecl { ty, declarators } => self.local_decl(ty, declarators),
                NodeKind::CompilationUnit { .. }
                | NodeKind::Method { .. }
                | NodeKind::Block { .. }
                | NodeKind::ExprStmt { .. }
                | NodeKind::Return { .. }
                | NodeKind::If { .. }
                | NodeKind::While { .. }
                | NodeKind::For { .. }
                | NodeKind::ForEach { .. } => {
                    // Statements never appear in expression position; print
                    // them at the current level so nothing is lost.
                    self.statement_tail(id);
                }
            }
        });
    }
}
