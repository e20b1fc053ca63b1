//! Recast Formatter
//!
//! Deterministic printer for recast syntax trees: four-space indentation,
//! braces on the header line, one statement per line, single spaces around
//! binary and assignment operators. Rewritten trees and freshly parsed ones
//! print the same way, which is what the refactoring tests compare.

pub mod emitter;
pub mod printer;

use recast_ir::{NodeId, NodeKind, SyntaxTree};

pub use emitter::{Emitter, StringEmitter};
pub use printer::Printer;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Print the whole tree.
pub fn print_tree(tree: &SyntaxTree) -> String {
    print_node(tree, tree.root())
}

/// Print one node: statements and members as lines, anything else inline.
pub fn print_node(tree: &SyntaxTree, id: NodeId) -> String {
    let mut printer = Printer::new(tree, StringEmitter::new());
    match tree.kind(id) {
        NodeKind::CompilationUnit { members } => printer.unit(members),
        kind if kind.is_statement() || matches!(kind, NodeKind::Method { .. }) => {
            printer.unit_member(id);
        }
        _ => printer.expr(id),
    }
    printer.finish().output()
}

#[cfg(test)]
mod tests;
