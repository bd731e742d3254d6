use super::*;

#[test]
fn assignment_creates_own_properties_in_insertion_order() {
    let src = "
        var o = {};
        o.b = 1; o.a = 2; o.c = 3;
        var keys = [];
        for (var k in o) keys.push(k);
        keys.join();
    ";
    assert_eq!(eval(src), Value::string("b,a,c"));
}

#[test]
fn non_writable_assignment_is_a_silent_no_op() {
    let src = "
        var o = {};
        Object.defineProperty(o, 'k', {value: 1, writable: false, configurable: false});
        o.k = 2;
        o.k;
    ";
    assert_eq!(eval(src), Value::Number(1));
}

#[test]
fn inherited_readonly_data_blocks_the_shadow_write() {
    let src = "
        function C() {}
        Object.defineProperty(C.prototype, 'k', {value: 1, writable: false});
        var o = new C();
        o.k = 2;
        '' + o.k + ',' + o.hasOwnProperty('k');
    ";
    assert_eq!(eval(src), Value::string("1,false"));
}

#[test]
fn inherited_setter_receives_the_write() {
    let src = "
        var captured;
        function C() {}
        Object.defineProperty(C.prototype, 'k', {
            set: function(v) { captured = v; },
            get: function() { return 'via-getter'; }
        });
        var o = new C();
        o.k = 5;
        '' + captured + ',' + o.k;
    ";
    assert_eq!(eval(src), Value::string("5,via-getter"));
}

#[test]
fn define_property_defaults_every_attribute_to_false() {
    let src = "
        var o = {};
        var returned = Object.defineProperty(o, 'test', {});
        var d = Object.getOwnPropertyDescriptor(o, 'test');
        [returned === o, 'test' in o, o.test === undefined,
         d.writable, d.enumerable, d.configurable].join();
    ";
    assert_eq!(
        eval(src),
        Value::string("true,true,true,false,false,false")
    );
}

#[test]
fn define_property_can_tighten_writable_later() {
    let src = "
        var o = {};
        Object.defineProperty(o, 'all', {writable: true, enumerable: true, configurable: true, value: 1});
        Object.defineProperty(o, 'all', {writable: false});
        var d = Object.getOwnPropertyDescriptor(o, 'all');
        [o.all, d.writable, d.enumerable, d.configurable].join();
    ";
    assert_eq!(eval(src), Value::string("1,false,true,true"));
}

#[test]
fn accessor_descriptors_round_trip() {
    let src = "
        var store = 1;
        var o = {};
        var getter = function() { return store; };
        var setter = function(v) { store = v; };
        Object.defineProperty(o, 'p', {get: getter, set: setter, configurable: true});
        var d = Object.getOwnPropertyDescriptor(o, 'p');
        o.p = 2;
        [d.get === getter, d.set === setter, d.enumerable, store, o.p, delete o.p, 'p' in o].join();
    ";
    assert_eq!(
        eval(src),
        Value::string("true,true,false,2,2,true,false")
    );
}

#[test]
fn non_configurable_redefinition_faults_with_the_engine_code() {
    let src = "
        var o = {};
        Object.defineProperty(o, 'k', {value: 1, configurable: false});
        var n = 0;
        try {
            Object.defineProperty(o, 'k', {get: function() { return 2; }});
        } catch (e) {
            n = e.number;
        }
        n;
    ";
    // JS_E_NONCONFIGURABLE_REDEFINED as a signed HRESULT.
    assert_eq!(eval(src), Value::Number(0x800A_13D6_u32 as i32));
}

#[test]
fn non_writable_value_change_faults() {
    let src = "
        var o = {};
        Object.defineProperty(o, 'k', {value: 1, writable: false, configurable: false});
        var n = 0;
        try { Object.defineProperty(o, 'k', {value: 2}); } catch (e) { n = e.number; }
        n;
    ";
    assert_eq!(eval(src), Value::Number(0x800A_13D7_u32 as i32));
}

#[test]
fn mixed_descriptor_kinds_fault() {
    let src = "
        var n = 0;
        try {
            Object.defineProperty({}, 'k', {get: function() {}, writable: true});
        } catch (e) { n = e.number; }
        n;
    ";
    assert_eq!(eval(src), Value::Number(0x800A_13AC_u32 as i32));
}

#[test]
fn delete_semantics() {
    assert!(eval_bool("var o = {k: 1}; delete o.k && !('k' in o);"));
    assert!(eval_bool("var o = {}; delete o.missing;"));
    let src = "
        var o = {};
        Object.defineProperty(o, 'k', {value: 1, configurable: false});
        '' + (delete o.k) + ',' + o.k;
    ";
    assert_eq!(eval(src), Value::string("false,1"));
}

#[test]
fn delete_exposes_the_prototype_property_underneath() {
    let src = "
        function C() {}
        C.prototype.k = 'proto';
        var o = new C();
        o.k = 'own';
        var before = o.k;
        delete o.k;
        before + ',' + o.k;
    ";
    assert_eq!(eval(src), Value::string("own,proto"));
}

#[test]
fn array_length_tracks_the_highest_index() {
    assert_eq!(eval("var a = []; a[4] = 1; a.length;"), Value::Number(5));
    assert_eq!(eval("[1, 2, 3].length;"), Value::Number(3));
    assert_eq!(eval("[1, 2, ].length;"), Value::Number(2));
    assert_eq!(eval("[1, , 2].length;"), Value::Number(3));
}

#[test]
fn shrinking_length_deletes_trailing_indices() {
    let src = "
        var a = [1, 2, 3, 4];
        a.length = 2;
        [a.length, a[0], typeof a[2], typeof a[3]].join();
    ";
    assert_eq!(eval(src), Value::string("2,1,undefined,undefined"));
}

#[test]
fn invalid_array_length_is_a_range_error() {
    let src = "
        var name = '';
        try { [].length = -1; } catch (e) { name = e.name; }
        name;
    ";
    assert_eq!(eval(src), Value::string("RangeError"));
}

#[test]
fn object_keys_lists_own_enumerable_in_order() {
    let src = "
        var o = {b: 1, a: 2};
        Object.defineProperty(o, 'hidden', {value: 3, enumerable: false});
        o.c = 4;
        Object.keys(o).join();
    ";
    assert_eq!(eval(src), Value::string("b,a,c"));
}

#[test]
fn get_own_property_names_includes_non_enumerables() {
    assert_eq!(
        eval_str("var o = {a: 1}; Object.defineProperty(o, 'h', {value: 2}); Object.getOwnPropertyNames(o).join();"),
        "a,h"
    );
    assert!(eval_bool(
        "Object.getOwnPropertyNames([1]).join() === '0,length';"
    ));
}

#[test]
fn get_prototype_of_walks_the_intrinsic_graph() {
    assert!(eval_bool("Object.getPrototypeOf([]) === Array.prototype;"));
    assert!(eval_bool(
        "Object.getPrototypeOf(Array.prototype) === Object.prototype;"
    ));
    assert!(eval_bool("Object.getPrototypeOf(Object.prototype) === null;"));
    assert!(eval_bool(
        "function C() {} Object.getPrototypeOf(new C()) === C.prototype;"
    ));
}

#[test]
fn object_create_links_the_given_prototype() {
    let src = "
        var proto = {greet: function() { return 'hi'; }};
        var o = Object.create(proto);
        o.greet() + ',' + (Object.getPrototypeOf(o) === proto);
    ";
    assert_eq!(eval(src), Value::string("hi,true"));
    assert!(eval_bool("Object.getPrototypeOf(Object.create(null)) === null;"));
}

#[test]
fn freeze_and_seal_lock_the_table() {
    let src = "
        var o = {k: 1};
        Object.freeze(o);
        o.k = 2;
        o.fresh = 3;
        delete o.k;
        [Object.isFrozen(o), Object.isSealed(o), Object.isExtensible(o), o.k, 'fresh' in o].join();
    ";
    assert_eq!(eval(src), Value::string("true,true,false,1,false"));
    let src = "
        var o = {k: 1};
        Object.seal(o);
        o.k = 2;
        delete o.k;
        [Object.isSealed(o), Object.isFrozen(o), o.k].join();
    ";
    assert_eq!(eval(src), Value::string("true,false,2"));
}

#[test]
fn non_extensible_objects_ignore_new_properties() {
    let src = "
        var o = {};
        Object.preventExtensions(o);
        o.fresh = 1;
        typeof o.fresh;
    ";
    assert_eq!(eval(src), Value::string("undefined"));
}

#[test]
fn has_own_property_and_enumerability_probes() {
    assert!(eval_bool("({a: 1}).hasOwnProperty('a');"));
    assert!(!eval_bool("({a: 1}).hasOwnProperty('toString');"));
    assert!(eval_bool("({a: 1}).propertyIsEnumerable('a');"));
    assert!(!eval_bool("[].propertyIsEnumerable('length');"));
    assert!(eval_bool("Object.prototype.isPrototypeOf({});"));
    assert!(eval_bool("'abc'.hasOwnProperty('1');"));
    assert!(!eval_bool("'abc'.hasOwnProperty('3');"));
}

#[test]
fn object_literal_accessors_pair_up() {
    let src = "
        var o = {
            store: 1,
            get p() { return this.store; },
            set p(v) { this.store = v; }
        };
        var before = o.p;
        o.p = 5;
        '' + before + o.p + o.store;
    ";
    assert_eq!(eval(src), Value::string("155"));
}

#[test]
fn reserved_words_work_as_property_names() {
    assert_eq!(eval("var o = {if: 1, finally: 2}; o.if + o.finally;"), Value::Number(3));
    assert_eq!(eval("var o = {}; o.delete = 4; o.delete;"), Value::Number(4));
}

#[test]
fn prototype_cycles_do_not_hang_lookup() {
    let src = "
        function A() {}
        function B() {}
        A.prototype = Object.create(B.prototype);
        B.prototype = Object.create(A.prototype);
        var a = new A();
        typeof a.missing;
    ";
    assert_eq!(eval(src), Value::string("undefined"));
}

#[test]
fn instanceof_requires_a_callable_right_side() {
    let src = "
        var name = '';
        try { ({}) instanceof {}; } catch (e) { name = e.name; }
        name;
    ";
    assert_eq!(eval(src), Value::string("TypeError"));
}

#[test]
fn object_to_string_reports_the_class() {
    assert_eq!(eval_str("Object.prototype.toString.call([]);"), "[object Array]");
    assert_eq!(eval_str("Object.prototype.toString.call({});"), "[object Object]");
    assert_eq!(eval_str("Object.prototype.toString.call(Math);"), "[object Math]");
    assert_eq!(
        eval_str("Object.prototype.toString.call(function() {});"),
        "[object Function]"
    );
}
