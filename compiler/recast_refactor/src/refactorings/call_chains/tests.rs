use crate::test_helpers::{check, check_declined, Fixture};
use crate::EngineConfig;
use crate::RefactoringKind::{ChainCalls, UnchainCalls};

#[test]
fn test_chain_keeps_conditional_access() {
    check(
        ChainCalls,
        "var a = x?.F();\nvar b = a.G();\n",
        "var b",
        "var b = x?.F().G();\n",
    );
}

#[test]
fn test_chain_through_several_temporaries() {
    check(
        ChainCalls,
        "var a = x.F();\nvar b = a.G(1);\nUse(b.H());\nDone();\n",
        "Use",
        "Use(x.F().G(1).H());\nDone();\n",
    );
}

#[test]
fn test_chain_stops_at_shared_local() {
    check(
        ChainCalls,
        "var a = x.F();\nvar b = a.G();\nUse(b);\nUse(b);\n",
        "var a",
        "var b = x.F().G();\nUse(b);\nUse(b);\n",
    );
}

#[test]
fn test_chain_inside_method() {
    check(
        ChainCalls,
        "void M(List<int> xs) {\n    var evens = xs.Where(IsEven);\n    return evens.Count();\n}\n",
        "return",
        "void M(List<int> xs) {\n    return xs.Where(IsEven).Count();\n}\n",
    );
}

#[test]
fn test_chain_declines() {
    // Used twice after its binding.
    check_declined(ChainCalls, "var a = x.F();\nUse(a.G());\nUse(a.H());\n", "var a");
    // Not used as a receiver.
    check_declined(ChainCalls, "var a = x.F();\nUse(a);\n", "var a");
    // Not initialized by a call.
    check_declined(ChainCalls, "var a = x.P;\nvar b = a.G();\n", "var b");
    // Used, but not in the next statement.
    check_declined(ChainCalls, "var a = x.F();\nStep();\nvar b = a.G();\n", "var a");
}

#[test]
fn test_chain_declines_repeated_or_skipped_use() {
    // Would run `x.F()` once per iteration.
    check_declined(ChainCalls, "var a = x.F();\nwhile (c)\n    a.G();\n", "var a");
    check_declined(ChainCalls, "var a = x.F();\nforeach (var y in ys)\n    a.G(y);\n", "var a");
    check_declined(
        ChainCalls,
        "var a = x.F();\nvar q = ys.Select(y => a.G(y));\n",
        "var a",
    );
    // Would run `x.F()` only sometimes.
    check_declined(ChainCalls, "var a = x.F();\nif (c)\n    a.G();\n", "var a");
    check_declined(ChainCalls, "var a = x.F();\nvar ok = ready && a.G();\n", "var a");
    check_declined(ChainCalls, "var a = x.F();\nw?.Use(a.G());\n", "var a");
    // Would run `x.F()` after `Step()`.
    check_declined(ChainCalls, "var a = x.F();\nUse(Step(), a.G());\n", "var a");
}

#[test]
fn test_chain_into_if_condition() {
    check(
        ChainCalls,
        "var a = x.F();\nif (a.G())\n    Step();\n",
        "var a",
        "if (x.F().G())\n    Step();\n",
    );
}

#[test]
fn test_unchain_introduces_numbered_temporaries() {
    check(
        UnchainCalls,
        "var r = a.F().G().H();\n",
        "var r",
        "var newVar0 = a.F();\nvar newVar1 = newVar0.G();\nvar r = newVar1.H();\n",
    );
}

#[test]
fn test_unchain_uses_configured_stem() {
    let fixture = Fixture::new("var r = a.F().G();\n")
        .with_config(EngineConfig::default().with_temporary_stem("tmp"));
    pretty_assertions::assert_eq!(
        fixture.apply(UnchainCalls, "var r").as_deref(),
        Some("var tmp0 = a.F();\nvar r = tmp0.G();\n")
    );
}

#[test]
fn test_unchain_keeps_conditional_access() {
    check(
        UnchainCalls,
        "var b = x?.F().G();\n",
        "var b",
        "var newVar0 = x?.F();\nvar b = newVar0.G();\n",
    );
}

#[test]
fn test_unchain_argument_position() {
    check(
        UnchainCalls,
        "void M() {\n    Use(list.Where(p).First());\n}\n",
        "Use",
        "void M() {\n    var newVar0 = list.Where(p);\n    Use(newVar0.First());\n}\n",
    );
}

#[test]
fn test_unchain_skips_taken_names() {
    check(
        UnchainCalls,
        "var newVar0 = 1;\nvar r = a.F().G();\n",
        "a.F",
        "var newVar0 = 1;\nvar newVar1 = a.F();\nvar r = newVar1.G();\n",
    );
}

#[test]
fn test_unchain_wraps_embedded_statement() {
    check(
        UnchainCalls,
        "if (ok)\n    return a.F().G();\n",
        "return",
        "if (ok) {\n    var newVar0 = a.F();\n    return newVar0.G();\n}\n",
    );
}

#[test]
fn test_unchain_declines_conditional_evaluation() {
    check_declined(UnchainCalls, "var f = xs.Select(x => x.A().B());\n", "var f");
    check_declined(UnchainCalls, "var ok = ready && a.F().G();\n", "var ok");
    check_declined(UnchainCalls, "var v = cached ?? a.F().G();\n", "var v");
    check_declined(UnchainCalls, "x?.M(a.F().G());\n", "x?.M");
    check_declined(UnchainCalls, "F(Next(), a.B().C());\n", "F(");
}

#[test]
fn test_unchain_declines_loop_headers_and_short_chains() {
    check_declined(UnchainCalls, "while (a.F().G())\n    Step();\n", "while");
    check_declined(UnchainCalls, "foreach (var x in xs)\n    a.F().G();\n", "a.F");
    check_declined(UnchainCalls, "var r = a.F();\n", "var r");
}

#[test]
fn test_unchain_declines_read_of_own_declarator() {
    check_declined(UnchainCalls, "var a = y, b = a.F().G();\n", "var a");
    check(
        UnchainCalls,
        "var a = y, b = z.F().G();\n",
        "var a",
        "var newVar0 = z.F();\nvar a = y, b = newVar0.G();\n",
    );
}

#[test]
fn test_unchain_then_chain_round_trips() {
    let source = "var b = x?.F(1).G();\n";
    let unchained = Fixture::new(source)
        .apply(UnchainCalls, "var b")
        .unwrap_or_else(|| panic!("not unchained"));
    let chained = Fixture::new(&unchained)
        .apply(ChainCalls, "var b")
        .unwrap_or_else(|| panic!("not chained"));
    pretty_assertions::assert_eq!(chained, source);
}
