use crate::test_helpers::{check, check_declined, Fixture};
use crate::RefactoringKind::{MergeSelect, SplitSelect};

#[test]
fn test_merge_method_groups() {
    check(
        MergeSelect,
        "var q = xs.Select(f).Select(g);",
        "Select",
        "var q = xs.Select(x => g(f(x)));\n",
    );
}

#[test]
fn test_merge_lambdas() {
    check(
        MergeSelect,
        "var q = xs.Select(x => F(x)).Select(y => G(y, 1));",
        "Select",
        "var q = xs.Select(x => G(F(x), 1));\n",
    );
}

#[test]
fn test_merge_into_receiver() {
    check(
        MergeSelect,
        "var q = names.Select(n => n.Trim()).Select(s => s.ToUpper());",
        "Select",
        "var q = names.Select(n => n.Trim().ToUpper());\n",
    );
}

#[test]
fn test_merge_three_keeps_written_name() {
    check(
        MergeSelect,
        "var q = xs.Select(A).Select(item => B(item)).Select(C);",
        "Select",
        "var q = xs.Select(item => C(B(A(item))));\n",
    );
}

#[test]
fn test_merge_declines() {
    // Parameter used twice.
    check_declined(MergeSelect, "var q = xs.Select(x => F(x)).Select(y => G(y, y));", "Select");
    // Not a call.
    check_declined(MergeSelect, "var q = xs.Select(x => x + 1).Select(F);", "Select");
    check_declined(MergeSelect, "var q = xs.Select(F);", "Select");
}

#[test]
fn test_split_method_groups() {
    check(
        SplitSelect,
        "var q = xs.Select(x => g(f(x)));",
        "Select",
        "var q = xs.Select(f).Select(g);\n",
    );
}

#[test]
fn test_split_mixed_layers() {
    check(
        SplitSelect,
        "var q = xs.Select(x => h(g(f(x), 1)));",
        "Select",
        "var q = xs.Select(f).Select(x => g(x, 1)).Select(h);\n",
    );
}

#[test]
fn test_split_qualified_callee() {
    check(
        SplitSelect,
        "var q = xs?.Select(v => Text.Quote(Parse(v), 2)).ToList();",
        "Select",
        "var q = xs?.Select(Parse).Select(v => Text.Quote(v, 2)).ToList();\n",
    );
}

#[test]
fn test_split_declines() {
    check_declined(SplitSelect, "var q = xs.Select(x => f(x));", "Select");
    check_declined(SplitSelect, "var q = xs.Select(x => Format(x.Trim()));", "Select");
    check_declined(SplitSelect, "var q = xs.Select(x => g(f(x), x));", "Select");
    check_declined(SplitSelect, "var q = xs.Select(x => g(f(x) + 1));", "Select");
}

#[test]
fn test_split_then_merge_round_trips() {
    let source = "var q = xs.Select(x => g(f(x)));";
    let split = Fixture::new(source)
        .apply(SplitSelect, "Select")
        .unwrap_or_else(|| panic!("not split"));
    let merged = Fixture::new(&split)
        .apply(MergeSelect, "Select")
        .unwrap_or_else(|| panic!("not merged"));
    pretty_assertions::assert_eq!(merged, format!("{source}\n"));
}
