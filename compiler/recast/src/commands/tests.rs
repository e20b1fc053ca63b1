use pretty_assertions::assert_eq;

use super::*;

fn span_of(source: &str, needle: &str) -> Span {
    let start = source
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not in source"));
    Span::from_range(start..start + needle.len())
}

#[test]
fn test_parse_span() {
    assert_eq!(parse_span("3..9").ok(), Some(Span::new(3, 9)));
    assert_eq!(parse_span(" 0 .. 4 ").ok(), Some(Span::new(0, 4)));
    for bad in ["3", "a..b", "9..3", "-1..2", ""] {
        assert!(matches!(parse_span(bad), Err(CliError::BadSpan(_))), "{bad}");
    }
}

#[test]
fn test_parse_kind() {
    assert_eq!(parse_kind("invert-all-any").ok(), Some(RefactoringKind::InvertQuantifier));
    assert!(matches!(parse_kind("rename"), Err(CliError::UnknownKind(_))));
}

#[test]
fn test_list_offers_in_registry_order() {
    let source = "var q = xs.Where(x => x > 1).Where(x => x < 9 && x != 5);\n";
    let offers = list(source, span_of(source, "Where")).unwrap_or_else(|e| panic!("{e}"));
    let kinds: Vec<_> = offers.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        [
            RefactoringKind::MergeWhere,
            RefactoringKind::SplitWhere,
            RefactoringKind::UnchainCalls,
        ]
    );
    assert_eq!(offers[0].title, "Merge 2 Where calls");
}

#[test]
fn test_list_outside_source_is_empty() {
    let source = "F();\n";
    let offers = list(source, Span::new(100, 120)).unwrap_or_else(|e| panic!("{e}"));
    assert!(offers.is_empty());
}

#[test]
fn test_apply_prints_whole_file() {
    let source = "var a = 1;\nvar b = xs.All(x => x > a);\n";
    let result = apply(source, span_of(source, "All"), RefactoringKind::InvertQuantifier)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(result, "var a = 1;\nvar b = !xs.Any(x => x <= a);\n");
}

#[test]
fn test_apply_not_offered() {
    let source = "var b = xs.All(x => x > 0);\n";
    let err = apply(source, span_of(source, "var"), RefactoringKind::ForToForEach);
    assert!(matches!(err, Err(CliError::NotOffered { .. })));
}

#[test]
fn test_print_normalizes_layout() {
    let result = print("for(int i=0;i<n;i++){F( i );}").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(result, "for (int i = 0; i < n; i++) {\n    F(i);\n}\n");
}

#[test]
fn test_parse_errors_surface() {
    assert!(matches!(print("F(;"), Err(CliError::Parse(_))));
}
