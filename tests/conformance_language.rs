use script_engine::{Engine, Value};

fn eval(src: &str) -> Value {
    Engine::new().eval(src).expect("script should evaluate")
}

fn check(src: &str) {
    let value = eval(src);
    assert_eq!(value, Value::Bool(true), "script was not true: {src}");
}

#[test]
fn arithmetic_and_coercion_walkthrough() {
    check("1000000 * 1000000 === 1000000000000;");
    check("'' + 1.5 === '1.5';");
    check("010 === 8 && 080 === 80 && 090 === 90;");
    check("0xffffffff === 4294967295;");
    check("-64 >>> 4 === 0x0ffffffc;");
    check("NaN !== NaN && !(NaN == NaN) && isNaN(NaN);");
    check("null == undefined && !(null == 0);");
}

#[test]
fn object_graph_walkthrough() {
    let src = "
        function Shape(kind) { this.kind = kind; }
        Shape.prototype.describe = function() { return 'a ' + this.kind; };
        function Circle() { Shape.call(this, 'circle'); }
        Circle.prototype = new Shape('unset');
        Circle.prototype.constructor = Circle;

        var c = new Circle();
        c instanceof Circle && c instanceof Shape &&
            c.describe() === 'a circle' &&
            c.hasOwnProperty('kind') && !c.hasOwnProperty('describe');
    ";
    check(src);
}

#[test]
fn closure_counter_walkthrough() {
    let src = "
        function makeCounter() {
            var count = 0;
            return {
                up: function() { return ++count; },
                down: function() { return --count; }
            };
        }
        var a = makeCounter(), b = makeCounter();
        a.up(); a.up(); a.down();
        b.up();
        a.up() === 2 && b.up() === 2;
    ";
    check(src);
}

#[test]
fn exception_walkthrough() {
    let src = "
        var log = [];
        function risky(n) {
            try {
                if (n === 0) throw new RangeError('zero');
                if (n === 1) throw 'literal';
                return 'ok';
            } catch (e) {
                log.push(e.name || e);
                return 'caught';
            } finally {
                log.push('finally' + n);
            }
        }
        risky(0); risky(1); risky(2);
        log.join() === 'RangeError,finally0,literal,finally1,finally2';
    ";
    check(src);
}

#[test]
fn eval_scoping_walkthrough() {
    let src = "
        var results = [];
        (function() {
            eval('var direct = 1;');
            results.push(typeof direct === 'number');
        })();
        results.push(typeof direct === 'undefined');
        (function() {
            (0, eval)('var indirect = 2;');
        })();
        results.push(indirect === 2);
        results.join() === 'true,true,true';
    ";
    check(src);
}

#[test]
fn per_iteration_let_walkthrough() {
    let src = "
        var fns = [];
        for (let i = 0; i < 5; i++) {
            fns.push(function() { return i; });
        }
        var total = 0;
        for (var j = 0; j < fns.length; j++) total += fns[j]();
        total === 0 + 1 + 2 + 3 + 4;
    ";
    check(src);
}

#[test]
fn arguments_lifecycle_walkthrough() {
    let src = "
        var kept;
        function f(x) {
            arguments[0] = x + 1;
            kept = arguments;
            return x;
        }
        var during = f(1);
        var frozen = kept[0];
        kept[0] = 99;
        during === 2 && frozen === 2 && kept[0] === 99;
    ";
    check(src);
}

#[test]
fn switch_and_label_walkthrough() {
    let src = "
        function classify(v) {
            switch (v) {
                case '1': return 'string-one';
                case 1: return 'number-one';
                default: return 'other';
            }
        }
        var scan = '';
        search: for (var i = 0; i < 4; i++) {
            for (var j = 0; j < 4; j++) {
                if (i * j === 6) break search;
                scan += '.';
            }
        }
        classify(1) === 'number-one' && classify('1') === 'string-one' &&
            classify(2) === 'other' && scan.length === 11;
    ";
    check(src);
}

#[test]
fn string_library_walkthrough() {
    check("'abcd'.substring(3, 1) === 'bc';");
    check("[1, 2, null, false, undefined, , 'a'].join() === '1,2,,false,,,a';");
    check("'' + undefined === 'undefined' && '' + null === 'null';");
    check("var a = new Array(6); a.push(1) === 7 && a[6] === 1;");
    check("'one two three'.split(' ').reverse().join(' ') === 'three two one';");
}

#[test]
fn deeply_nested_data_walkthrough() {
    let src = "
        var tree = {value: 1, kids: [{value: 2, kids: []}, {value: 3, kids: [{value: 4, kids: []}]}]};
        function sum(node) {
            var total = node.value;
            for (var i = 0; i < node.kids.length; i++) total += sum(node.kids[i]);
            return total;
        }
        sum(tree) === 10;
    ";
    check(src);
}

#[test]
fn engine_instances_are_isolated_realms() {
    let mut first = Engine::new();
    let mut second = Engine::new();
    first.eval("var shared = 'first';").unwrap();
    let probe = second.eval("typeof shared;").unwrap();
    assert_eq!(probe, Value::String("undefined".to_string()));
}

#[test]
fn global_state_survives_between_eval_calls() {
    let mut engine = Engine::new();
    engine.eval("var tally = 0;").unwrap();
    engine.eval("tally += 5;").unwrap();
    engine.eval("function bump() { return ++tally; }").unwrap();
    assert_eq!(engine.eval("bump();").unwrap(), Value::Number(6));
    assert_eq!(engine.call_global("bump", &[]).unwrap(), Value::Number(7));
    assert_eq!(engine.get_global("tally").unwrap(), Value::Number(7));
}

#[test]
fn uncaught_errors_leave_prior_mutations_in_place() {
    let mut engine = Engine::new();
    let result = engine.eval("var progress = 'made'; missingThing();");
    assert!(result.is_err());
    assert_eq!(
        engine.eval("progress;").unwrap(),
        Value::String("made".to_string())
    );
}
