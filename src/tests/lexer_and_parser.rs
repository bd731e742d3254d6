use super::*;

#[test]
fn hex_literals() {
    assert!(eval_bool("0xffffffff === 4294967295;"));
    assert_eq!(eval("0x10;"), Value::Number(16));
    assert!(eval_bool("0x10000000000000000 > 0xffffffff;"));
}

#[test]
fn legacy_octal_demotes_on_digits_eight_and_nine() {
    assert!(eval_bool("010 === 8;"));
    assert!(eval_bool("0777 === 511;"));
    assert!(eval_bool("080 === 80;"));
    assert!(eval_bool("090 === 90;"));
    assert!(eval_bool("089 === 89;"));
}

#[test]
fn legacy_octal_can_be_disabled() {
    let mut engine = Engine::with_config(EngineConfig {
        legacy_octal_literals: false,
        ..EngineConfig::default()
    });
    assert_eq!(engine.eval("010;").unwrap(), Value::Number(10));
}

#[test]
fn exponent_literals_overflow_to_infinity() {
    assert!(eval_bool("1e999 === Infinity;"));
    assert!(eval_bool("1e3 === 1000;"));
    assert!(eval_bool(".5 === 0.5;"));
    assert!(eval_bool("1.e2 === 100;"));
}

#[test]
fn string_escapes_decode() {
    assert_eq!(eval_str(r#"'a\nb';"#), "a\nb");
    assert_eq!(eval_str(r#"'t\tv\vb\bf\fr\r';"#), "t\tv\u{b}b\u{8}f\u{c}r\r");
    assert_eq!(eval_str(r#"'\x41\x62';"#), "Ab");
    assert_eq!(eval_str(r#"'Aé';"#), "Aé");
    assert_eq!(eval_str(r#"'\0';"#), "\0");
}

#[test]
fn unknown_escapes_are_identity() {
    assert_eq!(eval_str(r#"'\a';"#), "a");
    assert_eq!(eval_str(r#"'\?';"#), "?");
    assert_eq!(eval_str(r#"'\q\w';"#), "qw");
}

#[test]
fn unterminated_string_is_a_parse_error() {
    assert!(matches!(eval_err("'abc"), Error::ScriptParse(_)));
    assert!(matches!(eval_err("\"abc\n\""), Error::ScriptParse(_)));
}

#[test]
fn asi_inserts_semicolons_at_line_breaks() {
    assert_eq!(eval("var a = 1\nvar b = 2\na + b"), Value::Number(3));
    assert_eq!(
        eval("(function() { return\n42; })();"),
        Value::Undefined
    );
    assert_eq!(eval("var n = 1\nn\n++n\nn"), Value::Number(2));
}

#[test]
fn missing_semicolon_without_line_break_is_an_error() {
    assert!(matches!(eval_err("var a = 1 var b = 2"), Error::ScriptParse(_)));
}

#[test]
fn slash_is_a_regex_only_where_no_value_precedes() {
    assert_eq!(eval("var a = 10, b = 2; a / b;"), Value::Number(5));
    assert!(eval_bool("/ab/.test('drab');"));
    assert!(eval_bool("var r = 1 + /2/.source.length; r === 2;"));
    assert_eq!(eval("(4) / 2;"), Value::Number(2));
}

#[test]
fn regex_literals_carry_their_flags() {
    assert_eq!(eval_str("/abc/gi.source;"), "abc");
    assert!(eval_bool("/abc/gi.global && /abc/gi.ignoreCase && !/abc/gi.multiline;"));
    assert_eq!(eval_str("'' + /a[/]b/;"), "/a[/]b/");
}

#[test]
fn comments_including_line_breaks_inside_block_comments() {
    assert_eq!(eval("1; // trailing\n2;"), Value::Number(2));
    assert_eq!(eval("1; /* x */ 2;"), Value::Number(2));
    assert_eq!(
        eval("(function() { return /* break\n */ 42; })();"),
        Value::Undefined
    );
}

#[test]
fn reserved_words_cannot_bind() {
    assert!(matches!(eval_err("var while = 1;"), Error::ScriptParse(_)));
    assert!(matches!(eval_err("function if() {}"), Error::ScriptParse(_)));
    assert!(matches!(
        eval_err("function f(delete) {}"),
        Error::ScriptParse(_)
    ));
}

#[test]
fn trailing_commas_in_literals() {
    assert_eq!(eval("[1, 2, ].length;"), Value::Number(2));
    assert_eq!(eval("({a: 1, }).a;"), Value::Number(1));
}

#[test]
fn break_outside_a_loop_is_a_parse_error() {
    assert!(matches!(eval_err("break;"), Error::ScriptParse(_)));
    assert!(matches!(eval_err("continue;"), Error::ScriptParse(_)));
    assert!(matches!(eval_err("return 1;"), Error::ScriptParse(_)));
    assert!(matches!(
        eval_err("while (true) { break missing; }"),
        Error::ScriptParse(_)
    ));
}

#[test]
fn dangling_else_parses() {
    assert_eq!(
        eval("var r = 0; if (1) if (0) r = 1; else r = 2; r;"),
        Value::Number(2)
    );
}

#[test]
fn throw_requires_its_operand_on_the_same_line() {
    assert!(matches!(eval_err("throw\n1;"), Error::ScriptParse(_)));
}

#[test]
fn postfix_operators_do_not_cross_lines() {
    // `n \n ++m` parses as two statements, not `n++` then `m`.
    assert_eq!(eval("var n = 1, m = 5; n\n++m\nm;"), Value::Number(6));
}

#[test]
fn nested_expressions_parse_deeply() {
    let mut src = String::from("0");
    for _ in 0..200 {
        src = format!("({src} + 1)");
    }
    src.push(';');
    assert_eq!(eval(&src), Value::Number(200));
}

#[test]
fn duplicate_default_clauses_are_rejected() {
    assert!(matches!(
        eval_err("switch (1) { default: break; default: break; }"),
        Error::ScriptParse(_)
    ));
}
