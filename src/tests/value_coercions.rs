use super::*;

#[test]
fn the_falsy_set_is_exact() {
    for falsy in ["undefined", "null", "false", "0", "NaN", "''"] {
        assert!(!eval_bool(&format!("!!({falsy});")), "{falsy} must be falsy");
    }
    for truthy in ["'0'", "' '", "[]", "({})", "1", "-1", "Infinity", "(function() {})"] {
        assert!(eval_bool(&format!("!!{truthy};")), "{truthy} must be truthy");
    }
}

#[test]
fn to_number_of_strings() {
    assert_eq!(eval("+'';"), Value::Number(0));
    assert_eq!(eval("+'  42  ';"), Value::Number(42));
    assert_eq!(eval("+'0x1f';"), Value::Number(31));
    assert_eq!(eval("+'-12.5';"), Value::Float(-12.5));
    assert_eq!(eval("+'1e3';"), Value::Number(1000));
    assert!(eval_bool("isNaN(+'12px');"));
    assert!(eval_bool("+'Infinity' === Infinity;"));
    assert!(eval_bool("+'-Infinity' === -Infinity;"));
}

#[test]
fn to_string_of_numbers() {
    assert_eq!(eval_str("'' + 0;"), "0");
    assert_eq!(eval_str("'' + -0;"), "0");
    assert_eq!(eval_str("'' + 1.5;"), "1.5");
    assert_eq!(eval_str("'' + 1e21;"), "1e+21");
    assert_eq!(eval_str("'' + 1e-7;"), "1e-7");
    assert_eq!(eval_str("'' + 0.000001;"), "0.000001");
    assert_eq!(eval_str("'' + 123456789;"), "123456789");
    assert_eq!(eval_str("'' + NaN;"), "NaN");
    assert_eq!(eval_str("'' + Infinity;"), "Infinity");
    assert_eq!(eval_str("'' + -Infinity;"), "-Infinity");
    assert_eq!(eval_str("'' + 100;"), "100");
    assert_eq!(eval_str("'' + 0.1;"), "0.1");
}

#[test]
fn negative_zero_keeps_its_sign_internally() {
    assert!(eval_bool("1 / -0 === -Infinity;"));
    assert!(eval_bool("-0 === 0;"));
    assert_eq!(eval("-0;").variant_tag(), VariantTag::R8);
}

#[test]
fn array_to_string_joins_with_commas() {
    assert_eq!(eval_str("'' + [1, 2, 3];"), "1,2,3");
    assert_eq!(eval_str("'' + [];"), "");
    assert_eq!(eval_str("'' + [null, undefined];"), ",");
}

#[test]
fn to_primitive_prefers_value_of_for_arithmetic() {
    let src = "
        var o = {
            valueOf: function() { return 6; },
            toString: function() { return 'seven'; }
        };
        o * 7;
    ";
    assert_eq!(eval(src), Value::Number(42));
    let src = "
        var o = {toString: function() { return '6'; }};
        o * 7;
    ";
    assert_eq!(eval(src), Value::Number(42));
}

#[test]
fn to_object_rejects_null_and_undefined() {
    let src = "
        var names = [];
        try { null.k; } catch (e) { names.push(e.name); }
        try { undefined.k; } catch (e) { names.push(e.name); }
        names.join();
    ";
    assert_eq!(eval(src), Value::string("TypeError,TypeError"));
}

#[test]
fn is_nan_and_is_finite() {
    assert!(eval_bool("isNaN(NaN);"));
    assert!(eval_bool("isNaN('abc');"));
    assert!(!eval_bool("isNaN('42');"));
    assert!(eval_bool("isFinite(1);"));
    assert!(!eval_bool("isFinite(Infinity);"));
    assert!(!eval_bool("isFinite(NaN);"));
}

#[test]
fn parse_int_handles_radix_and_prefixes() {
    assert_eq!(eval("parseInt('42');"), Value::Number(42));
    assert_eq!(eval("parseInt('  42abc');"), Value::Number(42));
    assert_eq!(eval("parseInt('0x1f');"), Value::Number(31));
    assert_eq!(eval("parseInt('1f', 16);"), Value::Number(31));
    assert_eq!(eval("parseInt('101', 2);"), Value::Number(5));
    assert_eq!(eval("parseInt('-7');"), Value::Number(-7));
    assert!(eval_bool("isNaN(parseInt('abc'));"));
    assert!(eval_bool("isNaN(parseInt('5', 1));"));
}

#[test]
fn parse_float_takes_the_longest_prefix() {
    assert_eq!(eval("parseFloat('3.5abc');"), Value::Float(3.5));
    assert_eq!(eval("parseFloat('  -2e2  ');"), Value::Number(-200));
    assert!(eval_bool("isNaN(parseFloat('abc'));"));
    assert!(eval_bool("parseFloat('Infinity') === Infinity;"));
}

#[test]
fn wrapper_objects_unwrap_through_value_of() {
    assert!(eval_bool("new Number(5).valueOf() === 5;"));
    assert!(eval_bool("new String('abc').valueOf() === 'abc';"));
    assert!(eval_bool("new Boolean(true).valueOf() === true;"));
    assert!(eval_bool("typeof new Number(5) === 'object';"));
    assert_eq!(eval("new Number(5) + 1;"), Value::Number(6));
    assert_eq!(eval("new String('abc').length;"), Value::Number(3));
}

#[test]
fn number_format_round_trips_through_parse() {
    for n in [0.1, 1.5, 123.456, 1e20, 1e21, 5e-7, 0.000001, 1e-7, 3.141592653589793] {
        let mut engine = Engine::new();
        let shown = engine.to_display_string(&Value::Float(n)).unwrap();
        let back = engine.eval(&format!("+('{shown}');")).unwrap();
        assert_eq!(back.as_f64(), Some(n), "round trip of {n} via {shown}");
    }
}
