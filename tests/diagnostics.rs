use exprc::{compile, compile_to_string, error::Diagnostics, Options};

fn failure(text: &str) -> Diagnostics {
    compile(text, "main").unwrap_err()
}

fn offset(diagnostics: &Diagnostics) -> usize {
    diagnostics.locations().next().unwrap().start()
}

#[test]
fn missing_operand_after_plus() {
    let diagnostics = failure("1+");
    assert!(offset(&diagnostics) >= 1);
    assert_eq!(offset(&diagnostics), 2);
}

#[test]
fn malformed_inputs_fail() {
    for text in ["1+*2", "(1+2", "", ")", "1 2", "2*", "()", "--1"] {
        assert!(compile_to_string(text, &Options::default()).is_err(), "{:?}", text);
    }
}

#[test]
fn error_points_at_offending_token() {
    assert_eq!(offset(&failure("1+*2")), 2);
    assert_eq!(offset(&failure("(1+2")), 4);
    assert_eq!(offset(&failure("12 + 34 )")), 8);
    assert_eq!(offset(&failure("1 + a")), 4);
}

#[test]
fn rendered_syntax_error() {
    let rendered = failure("1+").to_string();
    let expected = "\
Syntax error: Expected an expression, found end of input
 --> <expr>:1:3
  |
1 | 1+
  |   ^

Compilation failed with 1 error
";

    assert_eq!(rendered, expected);
}

#[test]
fn rendered_lexical_error() {
    let rendered = failure("4 % 2").to_string();

    assert!(rendered.starts_with("Lexical error: Bad character '%' in input stream\n"));
    assert!(rendered.contains("1 | 4 % 2\n  |   ^\n"));
}

#[test]
fn rendered_unclosed_group() {
    let rendered = failure("(1+2").to_string();
    assert!(rendered.starts_with("Syntax error: Expected token `)`, found end of input instead\n"));
}
