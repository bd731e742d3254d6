use super::*;

#[test]
fn integer_arithmetic_keeps_the_i4_tag() {
    assert_eq!(eval("2 + 2;"), Value::Number(4));
    assert_eq!(eval("4 - 2;"), Value::Number(2));
    assert_eq!(eval("2 * 3;"), Value::Number(6));
    assert_eq!(eval("4 / 2;"), Value::Number(2));
    assert_eq!(eval("3 % 2;"), Value::Number(1));
    assert_eq!(eval("-2;"), Value::Number(-2));
}

#[test]
fn integral_float_results_normalize_to_i4() {
    // The tag tracks the result value, not the operand shapes.
    assert_eq!(eval("1.5 + 2.5;"), Value::Number(4));
    assert_eq!(eval("2 * 3.5;"), Value::Number(7));
    assert_eq!(eval("2 * .5;"), Value::Number(1));
    assert_eq!(eval("4.5 / 1.5;"), Value::Number(3));
    assert_eq!(eval("2 + 2.5;"), Value::Float(4.5));
    assert_eq!(eval("2.5 * 3.5;"), Value::Float(8.75));
    assert_eq!(eval("3 / 2;"), Value::Float(1.5));
}

#[test]
fn variant_tags_match_the_value_shapes() {
    assert_eq!(eval("0;").variant_tag(), VariantTag::I4);
    assert_eq!(eval("0.5;").variant_tag(), VariantTag::R8);
    assert_eq!(eval("undefined;").variant_tag(), VariantTag::Empty);
    assert_eq!(eval("null;").variant_tag(), VariantTag::Null);
    assert_eq!(eval("false;").variant_tag(), VariantTag::Bool);
    assert_eq!(eval("'test';").variant_tag(), VariantTag::BStr);
    assert_eq!(eval("Math;").variant_tag(), VariantTag::Dispatch);
}

#[test]
fn large_products_fall_back_to_r8() {
    assert_eq!(eval("1000000 * 1000000;"), Value::Float(1_000_000_000_000.0));
    assert!(eval_bool("1000000 * 1000000 === 1000000000000;"));
}

#[test]
fn bitwise_results_are_always_integer_tagged() {
    assert_eq!(eval("3 | 4;"), Value::Number(7));
    assert_eq!(eval("3.5 | 0;"), Value::Number(3));
    assert_eq!(eval("-3.5 | 0;"), Value::Number(-3));
    assert_eq!(eval("0 | NaN;"), Value::Number(0));
    assert_eq!(eval("0 | Infinity;"), Value::Number(0));
    assert_eq!(eval("3 & 5;"), Value::Number(1));
    assert_eq!(eval("3 ^ 5;"), Value::Number(6));
    assert_eq!(eval("~5;"), Value::Number(-6));
}

#[test]
fn to_int32_wraps_modulo_two_pow_32() {
    assert_eq!(eval("(123 * Math.pow(2, 32) + 2) | 0;"), Value::Number(2));
    assert_eq!(eval("(-123 * Math.pow(2, 32) + 2) | 0;"), Value::Number(2));
}

#[test]
fn shifts_including_unsigned() {
    assert_eq!(eval("8 << 1;"), Value::Number(16));
    assert_eq!(eval("8 >> 1;"), Value::Number(4));
    assert_eq!(eval("8 >>> 2;"), Value::Number(2));
    assert_eq!(eval("4 >>> NaN;"), Value::Number(4));
    assert_eq!(eval("-64 >>> 4;"), Value::Number(0x0fff_fffc));
    assert!(eval_bool("(0xffffffff >>> 0) === 4294967295;"));
    assert_eq!(eval("0xffffffff >>> 0;").variant_tag(), VariantTag::R8);
}

#[test]
fn addition_concatenates_once_a_string_is_involved() {
    assert_eq!(eval_str("'ab' + 'cd';"), "abcd");
    assert_eq!(eval_str("1 + '2';"), "12");
    assert_eq!(eval_str("'' + undefined;"), "undefined");
    assert_eq!(eval_str("'' + null;"), "null");
    assert_eq!(eval_str("'' + 1.5;"), "1.5");
    assert_eq!(eval("'3' - 1;"), Value::Number(2));
}

#[test]
fn strict_equality_never_coerces() {
    assert!(eval_bool("1 === 1.0;"));
    assert!(!eval_bool("1 === '1';"));
    assert!(!eval_bool("NaN === NaN;"));
    assert!(!eval_bool("null === undefined;"));
    assert!(eval_bool("'abc' === 'abc';"));
    assert!(!eval_bool("({}) === ({});"));
}

#[test]
fn loose_equality_follows_the_coercion_table() {
    assert!(eval_bool("null == undefined;"));
    assert!(!eval_bool("null == 0;"));
    assert!(!eval_bool("NaN == NaN;"));
    assert!(eval_bool("1 == '1';"));
    assert!(eval_bool("true == 1;"));
    assert!(eval_bool("false == '';"));
    assert!(eval_bool("'1' == [1];"));
}

#[test]
fn relational_operators() {
    assert!(eval_bool("1 < 2;"));
    assert!(!eval_bool("NaN < 1;"));
    assert!(!eval_bool("1 < NaN;"));
    assert!(eval_bool("'a' < 'b';"));
    assert!(eval_bool("'10' < '9';"));
    assert!(eval_bool("10 < '9' === false;"));
    assert!(eval_bool("2 >= 2;"));
}

#[test]
fn logical_operators_short_circuit_and_keep_values() {
    assert_eq!(eval("3 || unreached();"), Value::Number(3));
    assert_eq!(eval("false || 2;"), Value::Number(2));
    assert_eq!(eval("0 && unreached();"), Value::Number(0));
    assert_eq!(eval_str("true && 'test';"), "test");
    assert_eq!(eval("true && 0;"), Value::Number(0));
}

#[test]
fn conditional_comma_void() {
    assert_eq!(eval("1 ? 2 : 3;"), Value::Number(2));
    assert_eq!(eval("'' ? 2 : 3;"), Value::Number(3));
    assert_eq!(eval("1, 2;"), Value::Number(2));
    assert_eq!(eval("void 0;"), Value::Undefined);
}

#[test]
fn typeof_table() {
    assert_eq!(eval_str("typeof undefined;"), "undefined");
    assert_eq!(eval_str("typeof null;"), "object");
    assert_eq!(eval_str("typeof true;"), "boolean");
    assert_eq!(eval_str("typeof 1.5;"), "number");
    assert_eq!(eval_str("typeof 'x';"), "string");
    assert_eq!(eval_str("typeof {};"), "object");
    assert_eq!(eval_str("typeof function(){};"), "function");
    assert_eq!(eval_str("typeof neverDeclared;"), "undefined");
}

#[test]
fn increment_and_decrement_forms() {
    assert_eq!(eval("var x = 1; x++;"), Value::Number(1));
    assert_eq!(eval("var x = 1; x++; x;"), Value::Number(2));
    assert_eq!(eval("var x = 1; ++x;"), Value::Number(2));
    assert_eq!(eval("var x = 1; --x; x;"), Value::Number(0));
    assert_eq!(eval("var x = 0.5; x++;"), Value::Float(0.5));
    assert_eq!(eval("var o = {n: 3}; o.n--; o.n;"), Value::Number(2));
}

#[test]
fn compound_assignment_operators() {
    assert_eq!(eval("var x = 1; x += 1;"), Value::Number(2));
    assert_eq!(eval("var x = 2; x -= 1;"), Value::Number(1));
    assert_eq!(eval("var x = 2; x *= 1.5;"), Value::Number(3));
    assert_eq!(eval("var x = 5; x /= 2;"), Value::Float(2.5));
    assert_eq!(eval("var x = 3; x %= 2;"), Value::Number(1));
    assert_eq!(eval("var x = 8; x <<= 1;"), Value::Number(16));
    assert_eq!(eval("var x = 8; x >>>= 1;"), Value::Number(4));
    assert_eq!(eval("var x = 10; x |= 0x10;"), Value::Number(26));
}

#[test]
fn in_and_instanceof() {
    assert!(eval_bool("'a' in {a: 1};"));
    assert!(!eval_bool("'b' in {a: 1};"));
    assert!(eval_bool("0 in [7];"));
    assert!(eval_bool("[] instanceof Array;"));
    assert!(eval_bool("[] instanceof Object;"));
    assert!(!eval_bool("({}) instanceof Array;"));
    assert!(eval_bool(
        "function T() {} var t = new T(); t instanceof T;"
    ));
}

#[test]
fn unary_plus_and_minus_coerce() {
    assert_eq!(eval("+'42';"), Value::Number(42));
    assert_eq!(eval("-'21';"), Value::Number(-21));
    assert!(eval_bool("isNaN(+'abc');"));
    assert_eq!(eval("+true;"), Value::Number(1));
    assert_eq!(eval("+null;"), Value::Number(0));
    assert!(eval_bool("isNaN(+undefined);"));
}
