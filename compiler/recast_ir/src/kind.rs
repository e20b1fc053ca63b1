//! Node kinds for the supported language subset.
//!
//! Kinds are `Copy`: children are referenced by [`NodeId`] or, for
//! variable-length child lists, by a [`NodeRange`] into the tree's list store.
//! Optional children use [`NodeId::INVALID`].

use smallvec::SmallVec;

use crate::{ArgModifier, AssignOp, BinaryOp, Name, NodeId, NodeRange, Span, UnaryOp};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    // Top level
    /// Methods and top-level statements, in source order.
    CompilationUnit { members: NodeRange },
    Method {
        ret: NodeId,
        name: Name,
        params: NodeRange,
        body: NodeId,
    },
    /// Method or lambda parameter. `ty` is invalid for implicitly typed
    /// lambda parameters.
    Param { ty: NodeId, name: Name },
    /// `Name<args>` followed by `rank` array suffixes.
    TypeRef { name: Name, args: NodeRange, rank: u8 },

    // Statements
    Block { stmts: NodeRange },
    LocalDecl { ty: NodeId, declarators: NodeRange },
    Declarator { name: Name, init: NodeId },
    ExprStmt { expr: NodeId },
    Return { value: NodeId },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    While { cond: NodeId, body: NodeId },
    /// `decl` is a `LocalDecl` or invalid; `initializers` are only used when
    /// there is no declaration.
    For {
        decl: NodeId,
        initializers: NodeRange,
        cond: NodeId,
        incrementors: NodeRange,
        body: NodeId,
    },
    ForEach {
        ty: NodeId,
        name: Name,
        collection: NodeId,
        body: NodeId,
    },

    // Expressions
    Int(i64),
    Str(Name),
    Bool(bool),
    Null,
    Ident(Name),
    /// `receiver.name`, or `receiver?.name` when `conditional`.
    Member {
        receiver: NodeId,
        name: Name,
        conditional: bool,
    },
    /// `callee(args)`; every argument is an `Argument` node.
    Invoke { callee: NodeId, args: NodeRange },
    Argument { modifier: ArgModifier, value: NodeId },
    /// `receiver[args]`; arguments are plain expressions.
    Index { receiver: NodeId, args: NodeRange },
    /// `params` are `Param` nodes; `parenthesized` records `(x) => ...` vs
    /// `x => ...`.
    Lambda {
        params: NodeRange,
        body: NodeId,
        parenthesized: bool,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary { op: UnaryOp, operand: NodeId },
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Paren { inner: NodeId },
}

/// A node: its kind plus where it came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// One child position of a node kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Slot {
    One(NodeId),
    Many(NodeRange),
}

pub type Slots = SmallVec<[Slot; 5]>;

impl NodeKind {
    /// Child positions in source order.
    pub fn slots(&self) -> Slots {
        use Slot::{Many, One};
        let mut out = Slots::new();
        match *self {
            NodeKind::CompilationUnit { members } => out.push(Many(members)),
            NodeKind::Method {
                ret, params, body, ..
            } => out.extend([One(ret), Many(params), One(body)]),
            NodeKind::Param { ty, .. } => out.push(One(ty)),
            NodeKind::TypeRef { args, .. } => out.push(Many(args)),
            NodeKind::Block { stmts } => out.push(Many(stmts)),
            NodeKind::LocalDecl { ty, declarators } => out.extend([One(ty), Many(declarators)]),
            NodeKind::Declarator { init, .. } => out.push(One(init)),
            NodeKind::ExprStmt { expr } => out.push(One(expr)),
            NodeKind::Return { value } => out.push(One(value)),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => out.extend([One(cond), One(then_branch), One(else_branch)]),
            NodeKind::While { cond, body } => out.extend([One(cond), One(body)]),
            NodeKind::For {
                decl,
                initializers,
                cond,
                incrementors,
                body,
            } => out.extend([
                One(decl),
                Many(initializers),
                One(cond),
                Many(incrementors),
                One(body),
            ]),
            NodeKind::ForEach {
                ty,
                collection,
                body,
                ..
            } => out.extend([One(ty), One(collection), One(body)]),
            NodeKind::Int(_)
            | NodeKind::Str(_)
            | NodeKind::Bool(_)
            | NodeKind::Null
            | NodeKind::Ident(_) => {}
            NodeKind::Member { receiver, .. } => out.push(One(receiver)),
            NodeKind::Invoke { callee, args } => out.extend([One(callee), Many(args)]),
            NodeKind::Argument { value, .. } => out.push(One(value)),
            NodeKind::Index { receiver, args } => out.extend([One(receiver), Many(args)]),
            NodeKind::Lambda { params, body, .. } => out.extend([Many(params), One(body)]),
            NodeKind::Binary { left, right, .. } => out.extend([One(left), One(right)]),
            NodeKind::Unary { operand, .. } => out.push(One(operand)),
            NodeKind::Assign { target, value, .. } => out.extend([One(target), One(value)]),
            NodeKind::Paren { inner } => out.push(One(inner)),
        }
        out
    }

    /// Rebuild this kind with new child positions.
    ///
    /// `slots` must have the layout returned by [`NodeKind::slots`] for this
    /// kind; positions of the wrong shape are treated as absent.
    #[must_use]
    pub fn with_slots(self, slots: &[Slot]) -> NodeKind {
        let one = |i: usize| match slots.get(i) {
            Some(Slot::One(id)) => *id,
            _ => NodeId::INVALID,
        };
        let many = |i: usize| match slots.get(i) {
            Some(Slot::Many(range)) => *range,
            _ => NodeRange::EMPTY,
        };
        match self {
            NodeKind::CompilationUnit { .. } => NodeKind::CompilationUnit { members: many(0) },
            NodeKind::Method { name, .. } => NodeKind::Method {
                ret: one(0),
                name,
                params: many(1),
                body: one(2),
            },
            NodeKind::Param { name, .. } => NodeKind::Param { ty: one(0), name },
            NodeKind::TypeRef { name, rank, .. } => NodeKind::TypeRef {
                name,
                args: many(0),
                rank,
            },
            NodeKind::Block { .. } => NodeKind::Block { stmts: many(0) },
            NodeKind::LocalDecl { .. } => NodeKind::LocalDecl {
                ty: one(0),
                declarators: many(1),
            },
            NodeKind::Declarator { name, .. } => NodeKind::Declarator { name, init: one(0) },
            NodeKind::ExprStmt { .. } => NodeKind::ExprStmt { expr: one(0) },
            NodeKind::Return { .. } => NodeKind::Return { value: one(0) },
            NodeKind::If { .. } => NodeKind::If {
                cond: one(0),
                then_branch: one(1),
                else_branch: one(2),
            },
            NodeKind::While { .. } => NodeKind::While {
                cond: one(0),
                body: one(1),
            },
            NodeKind::For { .. } => NodeKind::For {
                decl: one(0),
                initializers: many(1),
                cond: one(2),
                incrementors: many(3),
                body: one(4),
            },
            NodeKind::ForEach { name, .. } => NodeKind::ForEach {
                ty: one(0),
                name,
                collection: one(1),
                body: one(2),
            },
            leaf @ (NodeKind::Int(_)
            | NodeKind::Str(_)
            | NodeKind::Bool(_)
            | NodeKind::Null
            | NodeKind::Ident(_)) => leaf,
            NodeKind::Member {
                name, conditional, ..
            } => NodeKind::Member {
                receiver: one(0),
                name,
                conditional,
            },
            NodeKind::Invoke { .. } => NodeKind::Invoke {
                callee: one(0),
                args: many(1),
            },
            NodeKind::Argument { modifier, .. } => NodeKind::Argument {
                modifier,
                value: one(0),
            },
            NodeKind::Index { .. } => NodeKind::Index {
                receiver: one(0),
                args: many(1),
            },
            NodeKind::Lambda { parenthesized, .. } => NodeKind::Lambda {
                params: many(0),
                body: one(1),
                parenthesized,
            },
            NodeKind::Binary { op, .. } => NodeKind::Binary {
                op,
                left: one(0),
                right: one(1),
            },
            NodeKind::Unary { op, .. } => NodeKind::Unary {
                op,
                operand: one(0),
            },
            NodeKind::Assign { op, .. } => NodeKind::Assign {
                op,
                target: one(0),
                value: one(1),
            },
            NodeKind::Paren { .. } => NodeKind::Paren { inner: one(0) },
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Int(_)
                | NodeKind::Str(_)
                | NodeKind::Bool(_)
                | NodeKind::Null
                | NodeKind::Ident(_)
                | NodeKind::Member { .. }
                | NodeKind::Invoke { .. }
                | NodeKind::Index { .. }
                | NodeKind::Lambda { .. }
                | NodeKind::Binary { .. }
                | NodeKind::Unary { .. }
                | NodeKind::Assign { .. }
                | NodeKind::Paren { .. }
        )
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::Block { .. }
                | NodeKind::LocalDecl { .. }
                | NodeKind::ExprStmt { .. }
                | NodeKind::Return { .. }
                | NodeKind::If { .. }
                | NodeKind::While { .. }
                | NodeKind::For { .. }
                | NodeKind::ForEach { .. }
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            NodeKind::Int(_) | NodeKind::Str(_) | NodeKind::Bool(_) | NodeKind::Null
        )
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Node, NodeKind};
    crate::static_assert_size!(NodeKind, 32);
    crate::static_assert_size!(Node, 40);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_roundtrip_preserves_kind() {
        let kind = NodeKind::For {
            decl: NodeId::new(1),
            initializers: NodeRange::EMPTY,
            cond: NodeId::new(2),
            incrementors: NodeRange::new(7, 1),
            body: NodeId::new(3),
        };
        assert_eq!(kind.with_slots(&kind.slots()), kind);

        let member = NodeKind::Member {
            receiver: NodeId::new(9),
            name: Name::EMPTY,
            conditional: true,
        };
        assert_eq!(member.with_slots(&member.slots()), member);
    }

    #[test]
    fn test_leaves_have_no_slots() {
        assert!(NodeKind::Int(4).slots().is_empty());
        assert!(NodeKind::Null.slots().is_empty());
    }

    #[test]
    fn test_with_slots_replaces_children() {
        let kind = NodeKind::Binary {
            op: BinaryOp::And,
            left: NodeId::new(1),
            right: NodeId::new(2),
        };
        let rebuilt = kind.with_slots(&[Slot::One(NodeId::new(5)), Slot::One(NodeId::new(2))]);
        assert_eq!(
            rebuilt,
            NodeKind::Binary {
                op: BinaryOp::And,
                left: NodeId::new(5),
                right: NodeId::new(2),
            }
        );
    }
}
