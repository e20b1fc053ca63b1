//! Name resolution and type inference walk.

use recast_ir::{ensure_sufficient_stack, BinaryOp, Name, NodeId, NodeKind, NodeRange, SyntaxTree, UnaryOp};

use super::{Scope, SemanticModel};
use crate::{ScopeId, Symbol, SymbolData, SymbolKind, Ty};

pub(super) struct Resolver<'t> {
    tree: &'t SyntaxTree,
    model: SemanticModel,
    current: ScopeId,
    /// Parameter type for the lambda about to be visited.
    lambda_param_ty: Option<Ty>,
}

impl<'t> Resolver<'t> {
    pub(super) fn run(tree: &'t SyntaxTree, model: SemanticModel) -> SemanticModel {
        let mut resolver = Resolver {
            tree,
            model,
            current: ScopeId::ROOT,
            lambda_param_ty: None,
        };
        if tree.root().is_valid() {
            resolver.visit(tree.root());
        }
        resolver.model
    }

    // Scopes

    fn push_scope(&mut self) -> ScopeId {
        let parent = self.current;
        let id = ScopeId::new(u32::try_from(self.model.scopes.len()).unwrap_or(u32::MAX));
        self.model.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.current = id;
        parent
    }

    fn declare(&mut self, name: Name, kind: SymbolKind, ty: Ty, decl: NodeId) -> Symbol {
        let symbol = Symbol::new(u32::try_from(self.model.symbols.len()).unwrap_or(u32::MAX));
        self.model.symbols.push(SymbolData {
            name,
            kind,
            ty,
            decl,
        });
        if let Some(scope) = self.model.scopes.get_mut(self.current.index()) {
            scope.bindings.insert(name, symbol);
        }
        self.model.declarations.insert(decl, symbol);
        symbol
    }

    /// Declare the locals of `stmts` up front so the whole block sees them.
    fn predeclare(&mut self, stmts: NodeRange) {
        for stmt in self.tree.list(stmts) {
            if let NodeKind::LocalDecl { declarators, .. } = self.tree.kind(stmt) {
                self.predeclare_declarators(declarators);
            }
        }
    }

    fn predeclare_declarators(&mut self, declarators: NodeRange) {
        for decl in self.tree.list(declarators) {
            if let NodeKind::Declarator { name, .. } = self.tree.kind(decl) {
                self.declare(name, SymbolKind::Local, Ty::Unknown, decl);
            }
        }
    }

    fn set_symbol_type(&mut self, symbol: Symbol, ty: Ty) {
        if let Some(data) = self.model.symbols.get_mut(symbol.index()) {
            data.ty = ty;
        }
    }

    // Types

    fn type_of(&self, node: NodeId) -> Ty {
        self.model.types.get(&node).cloned().unwrap_or_default()
    }

    fn set_type(&mut self, node: NodeId, ty: Ty) {
        if !ty.is_unknown() {
            self.model.types.insert(node, ty);
        }
    }

    /// Type written in source, or `None` for `var`.
    fn written_type(&self, ty: NodeId) -> Option<Ty> {
        let NodeKind::TypeRef { name, args, rank } = self.tree.kind(ty) else {
            return Some(Ty::Unknown);
        };
        if name == self.model.known.var && args.is_empty() && rank == 0 {
            return None;
        }
        let args = self
            .tree
            .list(args)
            .iter()
            .map(|&a| self.written_type(a).unwrap_or_default())
            .collect();
        let mut ty = Ty::Named { name, args };
        for _ in 0..rank {
            ty = Ty::Array(Box::new(ty));
        }
        Some(ty)
    }

    // Walk

    fn visit_list(&mut self, range: NodeRange) {
        for id in self.tree.list(range) {
            self.visit(id);
        }
    }

    fn visit_opt(&mut self, id: NodeId) {
        if id.is_valid() {
            self.visit(id);
        }
    }

    fn visit(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| {
            self.model.enclosing.insert(id, self.current);
            match self.tree.kind(id) {
                NodeKind::CompilationUnit { members } => {
                    self.predeclare(members);
                    self.visit_list(members);
                }
                NodeKind::Method { params, body, .. } => {
                    let outer = self.push_scope();
                    for param in self.tree.list(params) {
                        self.model.enclosing.insert(param, self.current);
                        if let NodeKind::Param { ty, name } = self.tree.kind(param) {
                            let ty = self.written_type(ty).unwrap_or_default();
                            self.declare(name, SymbolKind::Parameter, ty, param);
                        }
                    }
                    self.visit_opt(body);
                    self.current = outer;
                }
                NodeKind::Block { stmts } => {
                    let outer = self.push_scope();
                    self.predeclare(stmts);
                    self.visit_list(stmts);
                    self.current = outer;
                }
                NodeKind::LocalDecl { ty, declarators } => {
                    let written = self.written_type(ty);
                    for decl in self.tree.list(declarators) {
                        self.model.enclosing.insert(decl, self.current);
                        let NodeKind::Declarator { name, init } = self.tree.kind(decl) else {
                            continue;
                        };
                        self.visit_opt(init);
                        let symbol = match self.model.declarations.get(&decl) {
                            Some(&symbol) => symbol,
                            None => self.declare(name, SymbolKind::Local, Ty::Unknown, decl),
                        };
                        let ty = written.clone().unwrap_or_else(|| self.type_of(init));
                        self.set_symbol_type(symbol, ty);
                    }
                }
                NodeKind::For {
                    decl,
                    initializers,
                    cond,
                    incrementors,
                    body,
                } => {
                    let outer = self.push_scope();
                    self.visit_opt(decl);
                    self.visit_list(initializers);
                    self.visit_opt(cond);
                    self.visit_list(incrementors);
                    self.visit_opt(body);
                    self.current = outer;
                }
                NodeKind::ForEach {
                    ty,
                    name,
                    collection,
                    body,
                } => {
                    self.visit_opt(collection);
                    let ty = self.written_type(ty).unwrap_or_else(|| {
                        let collection_ty = self.type_of(collection);
                        self.model.known.element_type(&collection_ty)
                    });
                    let outer = self.push_scope();
                    self.declare(name, SymbolKind::IterationVariable, ty, id);
                    self.visit_opt(body);
                    self.current = outer;
                }
                NodeKind::Lambda { params, body, .. } => {
                    let param_ty = self.lambda_param_ty.take().unwrap_or_default();
                    let outer = self.push_scope();
                    for param in self.tree.list(params) {
                        self.model.enclosing.insert(param, self.current);
                        if let NodeKind::Param { name, .. } = self.tree.kind(param) {
                            self.declare(name, SymbolKind::LambdaParameter, param_ty.clone(), param);
                        }
                    }
                    self.visit_opt(body);
                    self.current = outer;
                }
                NodeKind::Invoke { callee, args } => {
                    self.visit(callee);
                    let element = match self.tree.kind(callee) {
                        NodeKind::Member { receiver, .. } => {
                            let receiver_ty = self.type_of(receiver);
                            self.model.known.element_type(&receiver_ty)
                        }
                        _ => Ty::Unknown,
                    };
                    for arg in self.tree.list(args) {
                        let value = match self.tree.kind(arg) {
                            NodeKind::Argument { value, .. } => value,
                            _ => arg,
                        };
                        if matches!(self.tree.kind(value), NodeKind::Lambda { .. }) {
                            self.lambda_param_ty = Some(element.clone());
                        }
                        self.visit(arg);
                        self.lambda_param_ty = None;
                    }
                    let ty = self.infer_invoke(callee, args);
                    self.set_type(id, ty);
                }
                NodeKind::Ident(name) => {
                    if let Some(symbol) = self.model.lookup_in(self.current, name) {
                        self.model.references.insert(id, symbol);
                        let ty = self.model.symbols.get(symbol.index()).map(|d| d.ty.clone());
                        self.set_type(id, ty.unwrap_or_default());
                    }
                }
                // Types carry no references.
                NodeKind::TypeRef { .. } => {}
                kind => {
                    for child in self.tree.children(id) {
                        self.visit(child);
                    }
                    let ty = self.infer(kind);
                    self.set_type(id, ty);
                }
            }
        });
    }

    fn infer(&self, kind: NodeKind) -> Ty {
        let known = &self.model.known;
        match kind {
            NodeKind::Int(_) => Ty::named(known.int),
            NodeKind::Str(_) => Ty::named(known.string),
            NodeKind::Bool(_) => Ty::named(known.bool_),
            NodeKind::Paren { inner } => self.type_of(inner),
            NodeKind::Argument { value, .. } => self.type_of(value),
            NodeKind::Member { receiver, name, .. } => {
                let receiver_ty = self.type_of(receiver);
                match known.collection_shape(&receiver_ty) {
                    Some(shape) if shape.length_member == name => Ty::named(known.int),
                    _ => Ty::Unknown,
                }
            }
            NodeKind::Index { receiver, .. } => {
                let receiver_ty = self.type_of(receiver);
                known
                    .collection_shape(&receiver_ty)
                    .map(|shape| shape.element)
                    .unwrap_or_default()
            }
            NodeKind::Binary { op, left, .. } => match op {
                BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Coalesce => self.type_of(left),
                _ => Ty::named(known.bool_),
            },
            NodeKind::Unary { op, operand } => match op {
                UnaryOp::Not => Ty::named(known.bool_),
                _ => self.type_of(operand),
            },
            NodeKind::Assign { target, .. } => self.type_of(target),
            _ => Ty::Unknown,
        }
    }

    fn infer_invoke(&self, callee: NodeId, args: NodeRange) -> Ty {
        let known = &self.model.known;
        let NodeKind::Member { receiver, name, .. } = self.tree.kind(callee) else {
            return Ty::Unknown;
        };
        let receiver_ty = self.type_of(receiver);
        let element = known.element_type(&receiver_ty);
        if receiver_ty.is_unknown() {
            return Ty::Unknown;
        }
        if name == known.where_ {
            known.enumerable_of(element)
        } else if name == known.select {
            let projected = self
                .tree
                .list(args)
                .first()
                .and_then(|&arg| match self.tree.kind(arg) {
                    NodeKind::Argument { value, .. } => match self.tree.kind(value) {
                        NodeKind::Lambda { body, .. } => Some(self.type_of(body)),
                        _ => None,
                    },
                    _ => None,
                })
                .unwrap_or_default();
            known.enumerable_of(projected)
        } else if name == known.to_array {
            Ty::Array(Box::new(element))
        } else if name == known.to_list {
            Ty::Named {
                name: known.list,
                args: vec![element],
            }
        } else if name == known.first {
            element
        } else if name == known.any || name == known.all {
            Ty::named(known.bool_)
        } else if name == known.count {
            Ty::named(known.int)
        } else {
            Ty::Unknown
        }
    }
}
