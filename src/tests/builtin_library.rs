use super::*;

#[test]
fn array_push_respects_a_preset_length() {
    let src = "
        var arr = new Array(6);
        var len = arr.push(1);
        [len, arr.length, arr[6], typeof arr[0]].join();
    ";
    assert_eq!(eval(src), Value::string("7,7,1,undefined"));
}

#[test]
fn join_renders_holes_null_and_undefined_empty() {
    assert_eq!(
        eval_str("[1, 2, null, false, undefined, , 'a'].join();"),
        "1,2,,false,,,a"
    );
    assert_eq!(eval_str("[1, 2].join('-');"), "1-2");
    assert_eq!(eval_str("[].join();"), "");
}

#[test]
fn pop_shift_unshift() {
    assert_eq!(eval("var a = [1, 2, 3]; a.pop();"), Value::Number(3));
    assert_eq!(eval("var a = [1, 2, 3]; a.pop(); a.length;"), Value::Number(2));
    assert_eq!(eval("[].pop();"), Value::Undefined);
    assert_eq!(eval("var a = [1, 2, 3]; a.shift();"), Value::Number(1));
    assert_eq!(eval_str("var a = [2, 3]; a.unshift(0, 1); a.join();"), "0,1,2,3");
}

#[test]
fn concat_slice_splice() {
    assert_eq!(eval_str("[1, 2].concat([3, 4], 5).join();"), "1,2,3,4,5");
    assert_eq!(eval_str("[1, 2, 3, 4].slice(1, 3).join();"), "2,3");
    assert_eq!(eval_str("[1, 2, 3, 4].slice(-2).join();"), "3,4");
    let src = "
        var a = [1, 2, 3, 4, 5];
        var removed = a.splice(1, 2, 'x');
        removed.join() + '|' + a.join();
    ";
    assert_eq!(eval(src), Value::string("2,3|1,x,4,5"));
}

#[test]
fn index_of_and_last_index_of_use_strict_equality() {
    assert_eq!(eval("[1, '1', 1].indexOf('1');"), Value::Number(1));
    assert_eq!(eval("[1, 2, 1].lastIndexOf(1);"), Value::Number(2));
    assert_eq!(eval("[1, 2].indexOf(3);"), Value::Number(-1));
    assert_eq!(eval("[NaN].indexOf(NaN);"), Value::Number(-1));
    assert_eq!(eval("[1, 2, 1].indexOf(1, 1);"), Value::Number(2));
}

#[test]
fn for_each_skips_holes_and_sees_live_deletes() {
    let src = "
        var arr = ['a', 'b', 'c'];
        var seen = [];
        arr.forEach(function(v, i) {
            seen.push('' + i + v);
            if (i === 0) delete arr[1];
        });
        seen.join();
    ";
    assert_eq!(eval(src), Value::string("0a,2c"));
}

#[test]
fn map_filter_every_some_reduce() {
    assert_eq!(eval_str("[1, 2, 3].map(function(v) { return v * 2; }).join();"), "2,4,6");
    assert_eq!(
        eval_str("[1, 2, 3, 4].filter(function(v) { return v % 2 === 0; }).join();"),
        "2,4"
    );
    assert!(eval_bool("[2, 4].every(function(v) { return v % 2 === 0; });"));
    assert!(eval_bool("[1, 4].some(function(v) { return v % 2 === 0; });"));
    assert_eq!(
        eval("[1, 2, 3].reduce(function(acc, v) { return acc + v; }, 10);"),
        Value::Number(16)
    );
    assert_eq!(
        eval("[1, 2, 3].reduce(function(acc, v) { return acc + v; });"),
        Value::Number(6)
    );
}

#[test]
fn array_extras_apply_to_array_likes() {
    let src = "
        var like = {length: 3, 0: 'a', 2: 'c'};
        var seen = [];
        Array.prototype.forEach.call(like, function(v, i) { seen.push('' + i + v); });
        seen.join();
    ";
    assert_eq!(eval(src), Value::string("0a,2c"));
    assert_eq!(
        eval("Array.prototype.indexOf.call({length: 2, 1: 'hit'}, 'hit');"),
        Value::Number(1)
    );
}

#[test]
fn sort_orders_by_string_by_default_and_by_comparator_otherwise() {
    assert_eq!(eval_str("[10, 9, 1].sort().join();"), "1,10,9");
    assert_eq!(
        eval_str("[10, 9, 1].sort(function(a, b) { return a - b; }).join();"),
        "1,9,10"
    );
    assert_eq!(
        eval_str("[3, undefined, 1, , 2].sort().join();"),
        "1,2,3,,"
    );
}

#[test]
fn reverse_in_place() {
    assert_eq!(eval_str("[1, 2, 3].reverse().join();"), "3,2,1");
    assert_eq!(eval_str("var a = [1, 2]; a.reverse(); a.join();"), "2,1");
}

#[test]
fn substring_normalizes_swapped_arguments() {
    assert_eq!(eval_str("'abcd'.substring(3, 1);"), "bc");
    assert_eq!(eval_str("'abcd'.substring(1);"), "bcd");
    assert_eq!(eval_str("'abcd'.substring(-5, 99);"), "abcd");
}

#[test]
fn slice_and_substr() {
    assert_eq!(eval_str("'abcdef'.slice(1, 3);"), "bc");
    assert_eq!(eval_str("'abcdef'.slice(-2);"), "ef");
    assert_eq!(eval_str("'abcdef'.substr(1, 3);"), "bcd");
    assert_eq!(eval_str("'abcdef'.substr(-2, 5);"), "ef");
}

#[test]
fn char_access() {
    assert_eq!(eval_str("'abc'.charAt(1);"), "b");
    assert_eq!(eval_str("'abc'.charAt(9);"), "");
    assert_eq!(eval("'abc'.charCodeAt(0);"), Value::Number(97));
    assert!(eval_bool("isNaN('abc'.charCodeAt(9));"));
    assert_eq!(eval_str("'abc'[1];"), "b");
    assert_eq!(eval("'abc'[5];"), Value::Undefined);
    assert_eq!(eval("'abc'.length;"), Value::Number(3));
}

#[test]
fn string_index_and_search_methods() {
    assert_eq!(eval("'hello'.indexOf('l');"), Value::Number(2));
    assert_eq!(eval("'hello'.indexOf('l', 3);"), Value::Number(3));
    assert_eq!(eval("'hello'.lastIndexOf('l');"), Value::Number(3));
    assert_eq!(eval("'hello'.indexOf('z');"), Value::Number(-1));
    assert_eq!(eval("'abcab'.search(/b/);"), Value::Number(1));
    assert_eq!(eval("'abc'.search(/z/);"), Value::Number(-1));
}

#[test]
fn split_cases() {
    assert_eq!(eval_str("'a,b,c'.split(',').join('|');"), "a|b|c");
    assert_eq!(eval_str("'abc'.split('').join('|');"), "a|b|c");
    assert_eq!(eval_str("'abc'.split(undefined).join('|');"), "abc");
    assert_eq!(eval("'a,b,c'.split(',', 2).length;"), Value::Number(2));
    assert_eq!(eval_str("'a1b2c'.split(/[0-9]/).join('|');"), "a|b|c");
}

#[test]
fn replace_with_strings_functions_and_captures() {
    assert_eq!(eval_str("'aaa'.replace('a', 'b');"), "baa");
    assert_eq!(eval_str("'aaa'.replace(/a/g, 'b');"), "bbb");
    assert_eq!(eval_str("'john smith'.replace(/(\\w+) (\\w+)/, '$2 $1');"), "smith john");
    assert_eq!(eval_str("'abc'.replace(/b/, '[$&]');"), "a[b]c");
    assert_eq!(
        eval_str("'abc'.replace(/b/, function(m) { return m.toUpperCase(); });"),
        "aBc"
    );
}

#[test]
fn match_and_exec() {
    assert_eq!(eval_str("'a1b2'.match(/[a-z]\\d/g).join();"), "a1,b2");
    assert_eq!(eval("'abc'.match(/z/);"), Value::Null);
    let src = "
        var m = /(\\d+)-(\\d+)/.exec('range 10-20 end');
        [m[0], m[1], m[2], m.index].join('|');
    ";
    assert_eq!(eval(src), Value::string("10-20|10|20|6"));
}

#[test]
fn global_regex_exec_walks_last_index() {
    let src = "
        var re = /\\d/g;
        var hits = [];
        var m;
        while ((m = re.exec('a1b2')) !== null) hits.push(m[0] + '@' + re.lastIndex);
        hits.join();
    ";
    assert_eq!(eval(src), Value::string("1@2,2@4"));
}

#[test]
fn case_mapping_trim_concat() {
    assert_eq!(eval_str("'AbC'.toLowerCase();"), "abc");
    assert_eq!(eval_str("'AbC'.toUpperCase();"), "ABC");
    assert_eq!(eval_str("'  pad  '.trim();"), "pad");
    assert_eq!(eval_str("'a'.concat('b', 'c');"), "abc");
    assert_eq!(eval_str("String.fromCharCode(72, 105);"), "Hi");
}

#[test]
fn number_to_string_radix_and_to_fixed() {
    assert_eq!(eval_str("(255).toString(16);"), "ff");
    assert_eq!(eval_str("(8).toString(2);"), "1000");
    assert_eq!(eval_str("(1.5).toString();"), "1.5");
    assert_eq!(eval_str("(3.14159).toFixed(2);"), "3.14");
    assert_eq!(eval_str("(2).toFixed(2);"), "2.00");
    let src = "
        var name = '';
        try { (1).toString(99); } catch (e) { name = e.name; }
        name;
    ";
    assert_eq!(eval(src), Value::string("RangeError"));
}

#[test]
fn math_functions() {
    assert_eq!(eval("Math.abs(-4);"), Value::Number(4));
    assert_eq!(eval("Math.floor(1.7);"), Value::Number(1));
    assert_eq!(eval("Math.ceil(1.2);"), Value::Number(2));
    assert_eq!(eval("Math.round(2.5);"), Value::Number(3));
    assert_eq!(eval("Math.round(-2.5);"), Value::Number(-2));
    assert_eq!(eval("Math.max(1, 9, 4);"), Value::Number(9));
    assert_eq!(eval("Math.min(3, -2, 8);"), Value::Number(-2));
    assert!(eval_bool("isNaN(Math.max(1, NaN));"));
    assert_eq!(eval("Math.pow(2, 10);"), Value::Number(1024));
    assert_eq!(eval("Math.sqrt(81);"), Value::Number(9));
    assert!(eval_bool("Math.PI > 3.14 && Math.PI < 3.15;"));
}

#[test]
fn math_random_is_deterministic_per_engine() {
    let mut a = Engine::new();
    let mut b = Engine::new();
    let from_a = a.eval("Math.random();").unwrap();
    let from_b = b.eval("Math.random();").unwrap();
    assert_eq!(from_a, from_b);
    assert!(eval_bool(
        "var r = Math.random(); r >= 0 && r < 1 && r !== Math.random();"
    ));
}

#[test]
fn error_objects_carry_name_message_and_to_string() {
    assert_eq!(eval_str("new Error('boom').message;"), "boom");
    assert_eq!(eval_str("new TypeError('t').name;"), "TypeError");
    assert_eq!(eval_str("'' + new RangeError('r');"), "RangeError: r");
    assert_eq!(eval_str("'' + new Error();"), "Error");
    assert!(eval_bool("new TypeError('x') instanceof TypeError;"));
    assert!(eval_bool("new TypeError('x') instanceof Error;"));
    assert!(!eval_bool("new Error('x') instanceof TypeError;"));
}

#[test]
fn runtime_faults_carry_hresult_numbers() {
    let src = "
        var n = 0;
        try { missing; } catch (e) { n = e.number; }
        n;
    ";
    // JS_E_UNDEFINED_VARIABLE.
    assert_eq!(eval(src), Value::Number(0x800A_1391_u32 as i32));
    let src = "
        var n = 0;
        try { null.prop; } catch (e) { n = e.number; }
        n;
    ";
    assert_eq!(eval(src), Value::Number(0x800A_138F_u32 as i32));
}

#[test]
fn wrapper_constructor_calls_versus_construction() {
    assert!(eval_bool("typeof String(5) === 'string';"));
    assert!(eval_bool("typeof new String(5) === 'object';"));
    assert!(eval_bool("Number('42') === 42;"));
    assert!(eval_bool("Boolean('') === false;"));
    assert!(eval_bool("String() === '';"));
    assert!(eval_bool("Number() === 0;"));
}

#[test]
fn regexp_constructor_variants() {
    assert!(eval_bool("new RegExp('a.c').test('abc');"));
    assert!(eval_bool("new RegExp('A', 'i').test('a');"));
    assert!(eval_bool("var r = /x/g; RegExp(r) === r;"));
    assert!(eval_bool("var r = /x/g; new RegExp(r).global;"));
    let src = "
        var name = '';
        try { new RegExp('('); } catch (e) { name = e.name; }
        name;
    ";
    assert_eq!(eval(src), Value::string("SyntaxError"));
}
