use crate::test_helpers::{check, check_declined, Fixture};
use crate::RefactoringKind::{MergeWhere, SplitWhere};

#[test]
fn test_merge_two_lambdas() {
    check(
        MergeWhere,
        "var q = xs.Where(x => x > 1).Where(x => x < 9);",
        "Where",
        "var q = xs.Where(x => x > 1 && x < 9);\n",
    );
}

#[test]
fn test_merge_mixed_forms() {
    check(
        MergeWhere,
        "var q = xs.Where(f).Where(x => g(x)).Where(x => true).Where(x => C.B);",
        "Where",
        "var q = xs.Where(x => f(x) && g(x) && true && C.B);\n",
    );
}

#[test]
fn test_merge_renames_to_first_parameter() {
    check(
        MergeWhere,
        "var q = xs.Where(a => a.Ok).Where(b => b.Size > 2);",
        "Where",
        "var q = xs.Where(a => a.Ok && a.Size > 2);\n",
    );
}

#[test]
fn test_merge_parenthesizes_disjunction() {
    check(
        MergeWhere,
        "var q = xs.Where(x => x.A || x.B).Where(x => x.C);",
        "x.C",
        "var q = xs.Where(x => (x.A || x.B) && x.C);\n",
    );
}

#[test]
fn test_merge_avoids_capture() {
    // Naming the merged parameter `y` would capture the outer `y`.
    check(
        MergeWhere,
        "var q = xs.Where(x => x > y).Where(y => y < 9);",
        "Where",
        "var q = xs.Where(x => x > y && x < 9);\n",
    );
    check(
        MergeWhere,
        "var q = xs.Where(y => y < 9).Where(x => x > y);",
        "Where",
        "var q = xs.Where(z => z < 9 && z > y);\n",
    );
}

#[test]
fn test_merge_method_groups_only() {
    check(
        MergeWhere,
        "var q = xs.Where(IsOdd).Where(Rules.IsSmall);",
        "Where",
        "var q = xs.Where(x => IsOdd(x) && Rules.IsSmall(x));\n",
    );
}

#[test]
fn test_merge_keeps_conditional_access() {
    check(
        MergeWhere,
        "var q = xs?.Where(x => x > 1).Where(x => x < 9);",
        "Where",
        "var q = xs?.Where(x => x > 1 && x < 9);\n",
    );
}

#[test]
fn test_merge_declines() {
    check_declined(MergeWhere, "var q = xs.Where(x => x > 1);", "Where");
    check_declined(MergeWhere, "var q = xs.Where(x => { return x > 1; }).Where(F);", "Where");
    check_declined(MergeWhere, "var q = xs.Where(x => x > 1).Select(F);", "Where");
    check_declined(MergeWhere, "var q = xs.Where((x, i) => i > 0).Where(F);", "Where");
}

#[test]
fn test_merge_finds_nested_chain() {
    check(
        MergeWhere,
        "var q = F(ys.Where(a => a).Where(b => !b));",
        "ys",
        "var q = F(ys.Where(a => a && !a));\n",
    );
}

#[test]
fn test_split_conjunction() {
    check(
        SplitWhere,
        "var q = xs.Where(x => x > 1 && x < 9 && F(x));",
        "Where",
        "var q = xs.Where(x => x > 1).Where(x => x < 9).Where(x => F(x));\n",
    );
}

#[test]
fn test_split_unwraps_one_paren_layer() {
    check(
        SplitWhere,
        "var q = xs.Where((x) => (x.A || x.B) && ((x.C)));",
        "Where",
        "var q = xs.Where((x) => x.A || x.B).Where((x) => (x.C));\n",
    );
}

#[test]
fn test_split_keeps_conditional_on_first_call() {
    check(
        SplitWhere,
        "var q = xs?.Where(x => x.A && x.B).Count();",
        "Where",
        "var q = xs?.Where(x => x.A).Where(x => x.B).Count();\n",
    );
}

#[test]
fn test_split_declines() {
    check_declined(SplitWhere, "var q = xs.Where(x => x > 1 || x < 0);", "Where");
    check_declined(SplitWhere, "var q = xs.Where(x => (x > 1 && x < 9) || y);", "Where");
    check_declined(SplitWhere, "var q = xs.Where(IsValid);", "Where");
}

#[test]
fn test_split_then_merge_round_trips() {
    let source = "var q = xs.Where(x => x > 1 && !x.Done && x.Ok(2));";
    let split = Fixture::new(source)
        .apply(SplitWhere, "Where")
        .unwrap_or_else(|| panic!("not split"));
    let merged = Fixture::new(&split)
        .apply(MergeWhere, "Where")
        .unwrap_or_else(|| panic!("not merged"));
    pretty_assertions::assert_eq!(merged, format!("{source}\n"));
}

#[test]
fn test_titles() {
    let fixture = Fixture::new("var q = xs.Where(F).Where(G).Where(H);");
    let action = fixture
        .action(MergeWhere, "Where")
        .unwrap_or_else(|| panic!("not offered"));
    assert_eq!(action.title(), "Merge 3 Where calls");
    assert_eq!(action.kind(), MergeWhere);
}

#[test]
fn test_action_refuses_other_tree_version() {
    let source = "var q = xs.Where(F).Where(G);";
    let fixture = Fixture::new(source);
    let action = fixture
        .action(MergeWhere, "Where")
        .unwrap_or_else(|| panic!("not offered"));
    let reparsed = Fixture::new(source);
    assert!(matches!(
        action.apply(&reparsed.tree),
        Err(crate::RefactorError::StaleTree { .. })
    ));
    assert!(action.apply(&fixture.tree.clone()).is_ok());
}
