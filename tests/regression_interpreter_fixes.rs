//! Scenario regressions: each test pins an interaction that is easy to
//! break while refactoring the evaluator, scope chain, or object model.

use script_engine::{DeletePolicy, Engine, EngineConfig, Error, Value};

fn eval(src: &str) -> Value {
    Engine::new().eval(src).expect("script should evaluate")
}

#[test]
fn assignment_inside_with_writes_the_backing_object_not_the_var() {
    let src = "
        var x = 'outer';
        var o = {x: 1};
        with (o) { x = 2; }
        '' + o.x + '|' + x;
    ";
    assert_eq!(eval(src), Value::String("2|outer".to_string()));
}

#[test]
fn var_statement_inside_with_assigns_through_the_object() {
    let src = "
        function probe() {
            var x = 'fn';
            var o = {x: 'obj'};
            with (o) { var x = 'written'; }
            return o.x + '|' + x;
        }
        probe();
    ";
    assert_eq!(eval(src), Value::String("written|fn".to_string()));
}

#[test]
fn catch_parameter_does_not_leak_but_var_in_catch_does() {
    let src = "
        (function() {
            try { throw 1; } catch (e) { var leaked = e + 1; }
            return typeof e + '|' + leaked;
        })();
    ";
    assert_eq!(eval(src), Value::String("undefined|2".to_string()));
}

#[test]
fn nested_eval_sees_the_innermost_scope() {
    let src = "
        var x = 'global';
        (function() {
            var x = 'outer';
            return (function() {
                var x = 'inner';
                return eval('x');
            })();
        })();
    ";
    assert_eq!(eval(src), Value::String("inner".to_string()));
}

#[test]
fn getter_on_prototype_runs_with_the_receiver_as_this() {
    let src = "
        function C() { this.v = 41; }
        Object.defineProperty(C.prototype, 'next', {
            get: function() { return this.v + 1; }
        });
        new C().next;
    ";
    assert_eq!(eval(src), Value::Number(42));
}

#[test]
fn shadowing_a_readonly_prototype_property_via_define_still_works() {
    let src = "
        function C() {}
        Object.defineProperty(C.prototype, 'k', {value: 'proto', writable: false});
        var o = new C();
        Object.defineProperty(o, 'k', {value: 'own', writable: true, enumerable: true, configurable: true});
        o.k;
    ";
    assert_eq!(eval(src), Value::String("own".to_string()));
}

#[test]
fn array_methods_on_the_result_of_a_constructor_call() {
    assert_eq!(
        eval("Array(3, 2, 1).sort().join('');"),
        Value::String("123".to_string())
    );
    assert_eq!(eval("new Array('a').length;"), Value::Number(1));
    assert_eq!(eval("new Array(5).length;"), Value::Number(5));
}

#[test]
fn function_declarations_rebind_on_each_outer_call() {
    let src = "
        function outer() {
            var first = inner;
            function inner() {}
            return first === inner;
        }
        outer();
    ";
    assert_eq!(eval(src), Value::Bool(true));
    let src = "
        function make() {
            function inner() {}
            return inner;
        }
        make() !== make();
    ";
    assert_eq!(eval(src), Value::Bool(true));
}

#[test]
fn throwing_through_a_native_callback_unwinds_cleanly() {
    let src = "
        var caught = '';
        try {
            [1, 2, 3].forEach(function(v) { if (v === 2) throw 'stop'; });
        } catch (e) { caught = e; }
        caught;
    ";
    assert_eq!(eval(src), Value::String("stop".to_string()));
}

#[test]
fn comparator_exceptions_propagate_out_of_sort() {
    let src = "
        var caught = '';
        try {
            [3, 1, 2].sort(function() { throw 'cmp'; });
        } catch (e) { caught = e; }
        caught;
    ";
    assert_eq!(eval(src), Value::String("cmp".to_string()));
}

#[test]
fn to_primitive_faults_surface_as_type_errors() {
    let src = "
        var name = '';
        var hostile = Object.create(null);
        try { hostile + 1; } catch (e) { name = e.name; }
        name;
    ";
    assert_eq!(eval(src), Value::String("TypeError".to_string()));
}

#[test]
fn delete_policy_is_configurable_per_engine() {
    let mut lenient = Engine::with_config(EngineConfig {
        delete_policy: DeletePolicy::Lenient,
        ..EngineConfig::default()
    });
    assert_eq!(
        lenient.eval("var v = 1; delete v;").unwrap(),
        Value::Bool(false)
    );

    let mut strict = Engine::with_config(EngineConfig {
        delete_policy: DeletePolicy::ThrowOnDeclared,
        ..EngineConfig::default()
    });
    assert!(matches!(
        strict.eval("var v = 1; delete v;"),
        Err(Error::ScriptThrown(_))
    ));
}

#[test]
fn shallow_recursion_limit_is_configurable() {
    let mut engine = Engine::with_config(EngineConfig {
        max_call_depth: 16,
        ..EngineConfig::default()
    });
    let src = "
        var depth = 0;
        function dive() { depth++; dive(); }
        try { dive(); } catch (e) { }
        depth;
    ";
    let value = engine.eval(src).unwrap();
    assert_eq!(value, Value::Number(16));
}

#[test]
fn global_functions_shadowed_by_locals_restore_after_return() {
    let src = "
        var result = [];
        function probe() {
            var parseInt = function() { return 'shadowed'; };
            result.push(parseInt('42'));
        }
        probe();
        result.push(parseInt('42'));
        result.join();
    ";
    assert_eq!(eval(src), Value::String("shadowed,42".to_string()));
}

#[test]
fn parse_errors_name_an_offset() {
    let mut engine = Engine::new();
    match engine.eval("var a = ;") {
        Err(Error::ScriptParse(message)) => {
            assert!(message.contains("offset"), "message = {message}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn completion_value_ignores_declarations_and_empty_statements() {
    assert_eq!(eval("5; var x = 9;"), Value::Number(5));
    assert_eq!(eval("5;;;"), Value::Number(5));
    assert_eq!(eval("5; if (false) { 6; }"), Value::Number(5));
}

#[test]
fn member_calls_through_computed_keys_bind_this() {
    let src = "
        var obj = {tag: 'T', probe: function() { return this.tag; }};
        var key = 'probe';
        obj[key]();
    ";
    assert_eq!(eval(src), Value::String("T".to_string()));
}
