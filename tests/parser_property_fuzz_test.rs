use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestCaseResult;
use script_engine::{Engine, Value};

fn identifier_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("a"),
        Just("b"),
        Just("value"),
        Just("index"),
        Just("items"),
        Just("state"),
        Just("_tmp"),
        Just("$x"),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn literal_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        any::<i32>().prop_map(|n| n.to_string()),
        (0u32..1_000_000).prop_map(|n| format!("{n}.5")),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        Just("undefined".to_string()),
        Just("'text'".to_string()),
        Just("\"other\"".to_string()),
        Just("[1, 2, 3]".to_string()),
        Just("({k: 1})".to_string()),
    ]
    .boxed()
}

fn binary_op_strategy() -> BoxedStrategy<&'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("%"),
        Just("|"),
        Just("&"),
        Just("^"),
        Just("<<"),
        Just(">>"),
        Just(">>>"),
        Just("<"),
        Just("<="),
        Just(">"),
        Just(">="),
        Just("=="),
        Just("==="),
        Just("!="),
        Just("!=="),
        Just("&&"),
        Just("||"),
    ]
    .boxed()
}

fn expression_strategy() -> BoxedStrategy<String> {
    let leaf = literal_strategy();
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), binary_op_strategy(), inner.clone())
                .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, f)| format!("({c} ? {t} : {f})")),
            inner.clone().prop_map(|e| format!("!{e}")),
            inner.clone().prop_map(|e| format!("typeof {e}")),
            inner.prop_map(|e| format!("-({e})")),
        ]
        .boxed()
    })
    .boxed()
}

fn statement_strategy() -> BoxedStrategy<String> {
    let expr = expression_strategy();
    prop_oneof![
        (identifier_strategy(), expr.clone()).prop_map(|(id, e)| format!("var {id} = {e};")),
        expr.clone().prop_map(|e| format!("{e};")),
        (identifier_strategy(), expr.clone(), expr.clone())
            .prop_map(|(id, c, b)| format!("var {id} = {c} ? {b} : 0;")),
        (expr.clone(), expr.clone())
            .prop_map(|(c, b)| format!("if ({c}) {{ {b}; }} else {{ {b}; }}")),
        expr.prop_map(|e| format!("try {{ {e}; }} catch (err) {{ }} finally {{ }}")),
    ]
    .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Generated programs must never panic the engine: they either
    /// evaluate or fail with a proper error value.
    #[test]
    fn generated_programs_never_panic(stmts in vec(statement_strategy(), 1..8)) {
        let src = stmts.join("\n");
        let mut engine = Engine::new();
        let _ = engine.eval(&src);
    }

    /// Everything the expression generator builds is parseable.
    #[test]
    fn generated_expressions_parse(expr in expression_strategy()) {
        let mut engine = Engine::new();
        let result = engine.eval(&format!("{expr};"));
        prop_assert!(result.is_ok(), "expression failed: {expr}");
    }

    /// Operators are total: any two generated operands combine without a
    /// Rust-level fault and produce a value of the closed sum.
    #[test]
    fn binary_operators_are_total(
        left in literal_strategy(),
        op in binary_op_strategy(),
        right in literal_strategy(),
    ) {
        let mut engine = Engine::new();
        let value = engine.eval(&format!("({left}) {op} ({right});"));
        prop_assert!(value.is_ok());
    }

    /// Numeric literals round-trip through the lexer.
    #[test]
    fn numeric_literals_round_trip(n in any::<i32>()) {
        let mut engine = Engine::new();
        let value = engine.eval(&format!("{n};")).unwrap();
        prop_assert_eq!(value, Value::Number(n));
    }

    /// Parser failures are reported as errors, never via unwinding, even
    /// for arbitrary byte soup.
    #[test]
    fn arbitrary_ascii_never_panics_the_parser(src in "[ -~]{0,64}") {
        let mut engine = Engine::new();
        let _ = engine.eval(&src);
    }
}

fn eval_case(src: &str) -> TestCaseResult {
    let mut engine = Engine::new();
    prop_assert!(engine.eval(src).is_ok(), "failed: {src}");
    Ok(())
}

proptest! {
    /// Identifier-heavy declaration chains stay resolvable.
    #[test]
    fn declared_identifiers_resolve(ids in vec(identifier_strategy(), 1..6)) {
        let mut src = String::new();
        for (index, id) in ids.iter().enumerate() {
            src.push_str(&format!("var {id} = {index};\n"));
        }
        for id in &ids {
            src.push_str(&format!("{id};\n"));
        }
        eval_case(&src)?;
    }
}
