use pretty_assertions::assert_eq;
use recast_ir::{NodeKind, SharedInterner, SyntaxTree};

use super::*;

fn parse(source: &str) -> SyntaxTree {
    match recast_parse::parse(source, SharedInterner::new()) {
        Ok(tree) => tree,
        Err(e) => panic!("parse failed: {e}"),
    }
}

/// Canonical source prints back unchanged.
fn assert_stable(source: &str) {
    assert_eq!(print_tree(&parse(source)), source);
}

#[test]
fn test_statements_stable() {
    assert_stable("var x = 1;\nx += 2;\nreturn x;\n");
    assert_stable("int a = 1, b;\n");
    assert_stable("var ys = xs.Where(x => x > 0 && !x.IsEmpty).Select((a) => a?.Name);\n");
    assert_stable("M(ref a, out b, c[i], d++, --e, -f);\n");
    assert_stable("var s = \"a \\\"quoted\\\" text\" ?? null;\n");
}

#[test]
fn test_compound_statements_stable() {
    assert_stable(
        "for (int i = 0; i < args.Length; i++) {\n    Use(args[i]);\n}\n\
         foreach (var arg in args) {\n    Use(arg);\n}\n",
    );
    assert_stable("while (more)\n    Step();\n");
    assert_stable("if (a) {\n    A();\n} else if (b) {\n    B();\n} else {\n    C();\n}\n");
    assert_stable("if (a)\n    A();\nelse\n    B();\n");
}

#[test]
fn test_methods_separated_by_blank_line() {
    assert_stable(
        "int One() {\n    return 1;\n}\n\nvoid Two(List<int> xs, int[][] grid) {\n    F(xs, grid);\n}\n",
    );
}

#[test]
fn test_block_lambda_indentation() {
    assert_stable("Run(() => {\n    A();\n    B();\n});\n");
}

#[test]
fn test_normalizes_whitespace() {
    let tree = parse("for(int i=0;i<n;i++){F( i );}");
    assert_eq!(print_tree(&tree), "for (int i = 0; i < n; i++) {\n    F(i);\n}\n");
}

#[test]
fn test_print_node_expression() {
    let tree = parse("var y = (a + b) * c;");
    let paren = tree
        .descendants(tree.root())
        .into_iter()
        .find(|&id| matches!(tree.kind(id), NodeKind::Paren { .. }))
        .unwrap_or_else(|| panic!("no paren"));
    assert_eq!(print_node(&tree, paren), "(a + b)");
}
