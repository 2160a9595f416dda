//! Edge case tests for iskc-lex

use crate::{Lexer, Locale, TokenKind};
use iskc_util::{Handler, Symbol};

fn lex_all(source: &str) -> Vec<TokenKind> {
    let handler = Handler::new();
    Lexer::new(source, Locale::EN, "edge.isk", &handler)
        .tokenize()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn error_messages(source: &str) -> Vec<String> {
    let handler = Handler::new();
    let _ = Lexer::new(source, Locale::EN, "edge.isk", &handler).tokenize();
    handler.diagnostics().into_iter().map(|d| d.message).collect()
}

// ==================== EDGE CASES ====================

#[test]
fn test_edge_whitespace_only() {
    assert_eq!(lex_all("   \t  "), vec![TokenKind::Eof]);
}

#[test]
fn test_edge_newline_only_input() {
    assert_eq!(lex_all("\n\r\n\n"), vec![TokenKind::Newline, TokenKind::Eof]);
}

#[test]
fn test_edge_long_identifier() {
    let name = "a".repeat(10_000);
    let tokens = lex_all(&name);
    assert_eq!(tokens[0], TokenKind::Ident(Symbol::intern(&name)));
}

#[test]
fn test_edge_keywords_are_not_idents() {
    let tokens = lex_all("rule template decision");
    assert_eq!(tokens[0], TokenKind::Rule);
    assert_eq!(tokens[1], TokenKind::Template);
    assert_eq!(tokens[2], TokenKind::Decision);
}

#[test]
fn test_edge_uppercase_keywords_stay_idents() {
    // Decision-table header rows use WHEN/THEN in caps; those must not
    // collide with the reserved words.
    let tokens = lex_all("WHEN THEN ID");
    assert!(matches!(tokens[0], TokenKind::Ident(_)));
    assert!(matches!(tokens[1], TokenKind::Ident(_)));
}

#[test]
fn test_edge_empty_string_literal() {
    assert_eq!(
        lex_all("\"\""),
        vec![TokenKind::Str(String::new()), TokenKind::Eof]
    );
}

#[test]
fn test_edge_unicode_escape() {
    assert_eq!(
        lex_all(r#""é""#),
        vec![TokenKind::Str("é".into()), TokenKind::Eof]
    );
}

#[test]
fn test_edge_invalid_escape_reported() {
    let errors = error_messages(r#""\q""#);
    assert!(errors.iter().any(|e| e.contains("invalid escape")));
}

#[test]
fn test_edge_truncated_unicode_escape() {
    let errors = error_messages(r#""\u12""#);
    assert!(errors.iter().any(|e| e.contains("invalid unicode escape")));
}

#[test]
fn test_edge_number_trailing_separator_not_consumed() {
    // "3." is the number 3 followed by a dot (navigation), because the
    // separator needs a digit after it.
    assert_eq!(
        lex_all("3."),
        vec![
            TokenKind::Number("3".into()),
            TokenKind::Dot,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_number_zero_padded() {
    assert_eq!(
        lex_all("007 0.50"),
        vec![
            TokenKind::Number("007".into()),
            TokenKind::Number("0.50".into()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_empty_quoted_identifier() {
    assert_eq!(
        lex_all("``"),
        vec![TokenKind::QuotedIdent(Symbol::intern("")), TokenKind::Eof]
    );
}

#[test]
fn test_edge_quoted_identifier_with_operators_inside() {
    assert_eq!(
        lex_all("`a := b`"),
        vec![
            TokenKind::QuotedIdent(Symbol::intern("a := b")),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_unterminated_quoted_identifier() {
    let errors = error_messages("`oops\n");
    assert!(errors
        .iter()
        .any(|e| e.contains("unterminated quoted identifier")));
}

#[test]
fn test_edge_unterminated_block_comment() {
    let errors = error_messages("/* never closed");
    assert!(errors.iter().any(|e| e.contains("unterminated block comment")));
}

#[test]
fn test_edge_comment_between_newlines_collapses() {
    assert_eq!(
        lex_all("a\n// only a comment here\nb"),
        vec![
            TokenKind::Ident(Symbol::intern("a")),
            TokenKind::Newline,
            TokenKind::Ident(Symbol::intern("b")),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_template_empty() {
    assert_eq!(
        lex_all(r#"$""#.to_owned().as_str()),
        vec![
            TokenKind::TemplateStart,
            TokenKind::TemplateEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_template_adjacent_expressions() {
    assert_eq!(
        lex_all(r#"$"${a}${b}""#),
        vec![
            TokenKind::TemplateStart,
            TokenKind::TemplateExprStart,
            TokenKind::Ident(Symbol::intern("a")),
            TokenKind::TemplateExprEnd,
            TokenKind::TemplateExprStart,
            TokenKind::Ident(Symbol::intern("b")),
            TokenKind::TemplateExprEnd,
            TokenKind::TemplateEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_template_set_literal_inside_expression() {
    // `#{` contributes an unbalanced `{` that must not pop the mode.
    assert_eq!(
        lex_all(r#"$"${ #{1} }""#),
        vec![
            TokenKind::TemplateStart,
            TokenKind::TemplateExprStart,
            TokenKind::HashLBrace,
            TokenKind::Number("1".into()),
            TokenKind::RBrace,
            TokenKind::TemplateExprEnd,
            TokenKind::TemplateEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_edge_lone_dollar_is_unknown() {
    let errors = error_messages("a $ b");
    assert!(errors.iter().any(|e| e.contains("unknown character")));
}

#[test]
fn test_edge_run_of_unknown_characters() {
    let source = ";".repeat(5_000);
    let errors = error_messages(&source);
    assert_eq!(errors.len(), 5_000);
}

#[test]
fn test_edge_error_location_points_at_offender() {
    let handler = Handler::new();
    let _ = Lexer::new("ab ;", Locale::EN, "edge.isk", &handler).tokenize();
    let diags = handler.diagnostics();
    let loc = diags[0].location.as_ref().expect("location");
    assert_eq!(loc.source, "edge.isk");
    assert_eq!(loc.line, 1);
    assert_eq!(loc.column, 4);
}
