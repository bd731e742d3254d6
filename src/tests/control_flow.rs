use super::*;

#[test]
fn if_else_binds_to_nearest_if() {
    let src = "
        var r = '';
        if (true) if (false) r = 'inner'; else r = 'dangling';
        r;
    ";
    assert_eq!(eval(src), Value::string("dangling"));
}

#[test]
fn while_and_do_while() {
    assert_eq!(eval("var n = 0; while (n < 5) n++; n;"), Value::Number(5));
    assert_eq!(eval("var n = 9; do n++; while (false); n;"), Value::Number(10));
}

#[test]
fn for_loop_with_all_clauses_optional() {
    assert_eq!(
        eval("var s = 0; for (var i = 0; i < 4; i++) s += i; s;"),
        Value::Number(6)
    );
    assert_eq!(
        eval("var i = 0; for (;;) { if (i === 3) break; i++; } i;"),
        Value::Number(3)
    );
}

#[test]
fn labeled_break_and_continue_cross_loops() {
    let src = "
        var trace = '';
        outer: for (var i = 0; i < 3; i++) {
            for (var j = 0; j < 3; j++) {
                if (j === 1) continue outer;
                if (i === 2) break outer;
                trace += '' + i + j;
            }
        }
        trace;
    ";
    assert_eq!(eval(src), Value::string("0010"));
}

#[test]
fn break_out_of_labeled_block() {
    let src = "
        var r = 'a';
        block: {
            r += 'b';
            if (true) break block;
            r += 'c';
        }
        r;
    ";
    assert_eq!(eval(src), Value::string("ab"));
}

#[test]
fn switch_matches_with_strict_equality() {
    let src = "
        var r;
        switch (1) {
            case '1': r = 'string'; break;
            case 1: r = 'number'; break;
            default: r = 'default';
        }
        r;
    ";
    assert_eq!(eval(src), Value::string("number"));
}

#[test]
fn switch_falls_through_until_break() {
    let src = "
        var r = '';
        switch (2) {
            case 1: r += 'one';
            case 2: r += 'two';
            case 3: r += 'three'; break;
            case 4: r += 'four';
        }
        r;
    ";
    assert_eq!(eval(src), Value::string("twothree"));
}

#[test]
fn switch_default_need_not_be_last() {
    let src = "
        var r = '';
        switch (42) {
            case 1: r += 'one'; break;
            default: r += 'default';
            case 2: r += 'two'; break;
            case 3: r += 'three';
        }
        r;
    ";
    assert_eq!(eval(src), Value::string("defaulttwo"));
}

#[test]
fn switch_evaluates_discriminant_once() {
    let src = "
        var calls = 0;
        function disc() { calls++; return 2; }
        switch (disc()) { case 1: break; case 2: break; case 3: break; }
        calls;
    ";
    assert_eq!(eval(src), Value::Number(1));
}

#[test]
fn try_catch_binds_the_thrown_value() {
    assert_eq!(eval("var r; try { throw 42; } catch (e) { r = e; } r;"), Value::Number(42));
    assert_eq!(
        eval("var r; try { throw 'except'; } catch (e) { r = e; } r;"),
        Value::string("except")
    );
    assert_eq!(eval("var r; try { throw true; } catch (e) { r = e; } r;"), Value::Bool(true));
}

#[test]
fn finally_runs_on_both_paths() {
    let src = "
        var state = '';
        try { state += 'try,'; } finally { state += 'finally,'; }
        try { throw 1; } catch (e) { state += 'catch,'; } finally { state += 'finally2,'; }
        state;
    ";
    assert_eq!(eval(src), Value::string("try,finally,catch,finally2,"));
}

#[test]
fn finally_return_overrides_try_return() {
    let src = "
        (function() {
            try { return 'try'; } catch (e) {} finally { return 'finally'; }
        })();
    ";
    assert_eq!(eval(src), Value::string("finally"));
}

#[test]
fn finally_return_overrides_catch_return() {
    let src = "
        var trace = '';
        var r = (function() {
            try { trace += 'try,'; throw 1; }
            catch (e) { trace += 'catch,'; return 'catch'; }
            finally { trace += 'finally,'; return 'finally'; }
        })();
        trace + r;
    ";
    assert_eq!(eval(src), Value::string("try,catch,finally,finally"));
}

#[test]
fn normal_finally_preserves_the_earlier_completion() {
    let src = "
        var trace = '';
        var r = (function() {
            try { trace += 'try,'; return trace; }
            catch (e) { trace += 'catch,'; }
            finally { trace += 'finally,'; }
        })();
        r + '|' + trace;
    ";
    assert_eq!(eval(src), Value::string("try,|try,finally,"));
}

#[test]
fn break_in_finally_swallows_a_live_throw() {
    let src = "
        var reached = '';
        while (true) {
            try { throw 1; } finally { reached += 'finally'; break; }
        }
        reached += ',after';
        reached;
    ";
    assert_eq!(eval(src), Value::string("finally,after"));
}

#[test]
fn nested_finally_blocks_unwind_inside_out() {
    let src = "
        var x = '';
        var r = (function() {
            while (true) {
                try {
                    x += 'try,';
                    try { x += 'try2,'; break; }
                    finally { x += 'finally2,'; }
                } finally { x += 'finally,'; }
            }
            x += 'ret';
            return 'ret';
        })();
        x + '|' + r;
    ";
    assert_eq!(eval(src), Value::string("try,try2,finally2,finally,ret|ret"));
}

#[test]
fn continue_crosses_finally() {
    let src = "
        var x = '';
        for (var i = 0; i < 3; i++) {
            try { x += 't' + i; continue; } finally { x += 'f' + i; }
        }
        x;
    ";
    assert_eq!(eval(src), Value::string("t0f0t1f1t2f2"));
}

#[test]
fn uncaught_throw_reports_to_the_embedder() {
    assert_eq!(eval_thrown_message("throw 'boom';"), "boom");
    let message = eval_thrown_message("null.x;");
    assert!(message.starts_with("TypeError"), "message = {message}");
}

#[test]
fn for_in_visits_own_then_inherited_keys_in_insertion_order() {
    let src = "
        function Base() {}
        Base.prototype.inherited = 1;
        var o = new Base();
        o.b = 1; o.a = 2; o.c = 3;
        var keys = '';
        for (var k in o) keys += k + ',';
        keys;
    ";
    assert_eq!(eval(src), Value::string("b,a,c,inherited,"));
}

#[test]
fn for_in_skips_keys_deleted_mid_walk() {
    let src = "
        var o = {a: 1, b: 2, c: 3};
        var keys = '';
        for (var k in o) { keys += k; if (k === 'a') delete o.c; }
        keys;
    ";
    assert_eq!(eval(src), Value::string("ab"));
}

#[test]
fn for_in_over_null_is_a_no_op() {
    assert_eq!(eval("var n = 0; for (var k in null) n++; n;"), Value::Number(0));
}

#[test]
fn with_statement_shadows_through_its_object() {
    let src = "
        var x = 'outer';
        var o = {x: 'inner'};
        var seen;
        with (o) { seen = x; x = 'written'; }
        seen + '|' + o.x + '|' + x;
    ";
    assert_eq!(eval(src), Value::string("inner|written|outer"));
}

#[test]
fn with_scope_pops_on_abrupt_exit() {
    let src = "
        var x = 'outer';
        while (true) { with ({x: 'inner'}) { break; } }
        x;
    ";
    assert_eq!(eval(src), Value::string("outer"));
}
