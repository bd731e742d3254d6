pub(crate) use super::*;

mod array_builtins;
mod error_builtins;
mod function_builtins;
mod global_builtins;
mod number_math_builtins;
mod object_builtins;
mod regexp_builtins;
mod string_builtins;

use crate::runtime_state::{Intrinsics, RuntimeState, err_codes};
use crate::{EngineConfig, HostObject};
use std::cell::RefCell;
use std::rc::Rc;

fn bare_object(prototype: Option<ObjectHandle>) -> ObjectHandle {
    ObjectHandle::new(ObjectRecord::new(ObjectClass::Plain, prototype))
}

/// Build a fresh realm: the intrinsic graph, the global object, and the
/// global scope. Every engine instance owns one; nothing here is shared
/// process state.
pub(crate) fn bootstrap_realm(config: EngineConfig) -> RuntimeState {
    let object_prototype = bare_object(None);
    let function_prototype = bare_object(Some(object_prototype.clone()));
    let array_prototype = ObjectHandle::new(ObjectRecord::new(
        ObjectClass::Array { length: 0 },
        Some(object_prototype.clone()),
    ));
    let string_prototype = ObjectHandle::new(ObjectRecord::new(
        ObjectClass::StringWrapper(String::new()),
        Some(object_prototype.clone()),
    ));
    let number_prototype = ObjectHandle::new(ObjectRecord::new(
        ObjectClass::NumberWrapper(0.0),
        Some(object_prototype.clone()),
    ));
    let boolean_prototype = ObjectHandle::new(ObjectRecord::new(
        ObjectClass::BooleanWrapper(false),
        Some(object_prototype.clone()),
    ));
    let regexp_prototype = bare_object(Some(object_prototype.clone()));
    let error_prototype = ObjectHandle::new(ObjectRecord::new(
        ObjectClass::Error,
        Some(object_prototype.clone()),
    ));
    let subtype = |parent: &ObjectHandle| {
        ObjectHandle::new(ObjectRecord::new(ObjectClass::Error, Some(parent.clone())))
    };
    let type_error_prototype = subtype(&error_prototype);
    let range_error_prototype = subtype(&error_prototype);
    let reference_error_prototype = subtype(&error_prototype);
    let syntax_error_prototype = subtype(&error_prototype);
    let eval_error_prototype = subtype(&error_prototype);
    let uri_error_prototype = subtype(&error_prototype);

    let global = bare_object(Some(object_prototype.clone()));
    let global_scope = ScopeRecord::object_backed(global.clone(), None, true);

    // Placeholder; replaced by the real intrinsic when globals install.
    let eval_function = bare_object(Some(function_prototype.clone()));

    RuntimeState {
        config,
        global,
        global_scope,
        intrinsics: Intrinsics {
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            regexp_prototype,
            error_prototype,
            type_error_prototype,
            range_error_prototype,
            reference_error_prototype,
            syntax_error_prototype,
            eval_error_prototype,
            uri_error_prototype,
            eval_function,
        },
        frames: Vec::new(),
        completion_value: Value::Undefined,
        random_state: 0x9E37_79B9_7F4A_7C15,
    }
}

impl Engine {
    pub(crate) fn install_builtins(&mut self) {
        self.install_global_builtins();
        self.install_object_builtins();
        self.install_function_builtins();
        self.install_array_builtins();
        self.install_string_builtins();
        self.install_number_builtins();
        self.install_boolean_builtins();
        self.install_math_builtins();
        self.install_error_builtins();
        self.install_regexp_builtins();
    }

    pub(crate) fn make_plain_object(&mut self) -> ObjectHandle {
        bare_object(Some(self.state.intrinsics.object_prototype.clone()))
    }

    pub(crate) fn make_array_object(&mut self) -> ObjectHandle {
        ObjectHandle::new(ObjectRecord::new(
            ObjectClass::Array { length: 0 },
            Some(self.state.intrinsics.array_prototype.clone()),
        ))
    }

    pub(crate) fn make_array_from(&mut self, values: Vec<Value>) -> ObjectHandle {
        let array = self.make_array_object();
        {
            let mut record = array.0.borrow_mut();
            for (index, value) in values.iter().enumerate() {
                record.set_slot(&index.to_string(), Property::data(value.clone()));
            }
            if let ObjectClass::Array { length } = &mut record.class {
                *length = values.len() as u32;
            }
        }
        array
    }

    pub(crate) fn make_native(
        &mut self,
        name: &'static str,
        length: u32,
        func: NativeFn,
    ) -> ObjectHandle {
        self.make_native_with_construct(name, length, func, None)
    }

    pub(crate) fn make_native_with_construct(
        &mut self,
        name: &'static str,
        length: u32,
        func: NativeFn,
        construct: Option<NativeFn>,
    ) -> ObjectHandle {
        let handle = ObjectHandle::new(ObjectRecord::new(
            ObjectClass::Function(FunctionKind::Native(NativeFunction {
                name,
                length,
                func,
                construct,
            })),
            Some(self.state.intrinsics.function_prototype.clone()),
        ));
        handle.0.borrow_mut().set_slot(
            "length",
            Property::frozen(Value::from_f64(f64::from(length))),
        );
        handle
    }

    /// Attach a method with the standard built-in attribute set.
    pub(crate) fn add_method(
        &mut self,
        target: &ObjectHandle,
        name: &'static str,
        length: u32,
        func: NativeFn,
    ) {
        let method = self.make_native(name, length, func);
        target
            .0
            .borrow_mut()
            .set_slot(name, Property::builtin(Value::Object(method)));
    }

    /// Wire a constructor to its prototype and hang it off the global
    /// object. `prototype` on a built-in constructor is immutable.
    pub(crate) fn add_constructor(
        &mut self,
        name: &'static str,
        length: u32,
        func: NativeFn,
        construct: NativeFn,
        prototype: &ObjectHandle,
    ) -> ObjectHandle {
        let ctor = self.make_native_with_construct(name, length, func, Some(construct));
        ctor.0.borrow_mut().set_slot(
            "prototype",
            Property::frozen(Value::Object(prototype.clone())),
        );
        prototype
            .0
            .borrow_mut()
            .set_slot("constructor", Property::builtin(Value::Object(ctor.clone())));
        let global = self.state.global.clone();
        global
            .0
            .borrow_mut()
            .set_slot(name, Property::builtin(Value::Object(ctor.clone())));
        ctor
    }

    pub(crate) fn add_global_value(&mut self, name: &'static str, value: Value, frozen: bool) {
        let prop = if frozen {
            Property::data_with(value, false, false, false)
        } else {
            Property::builtin(value)
        };
        let global = self.state.global.clone();
        global.0.borrow_mut().set_slot(name, prop);
    }

    /// Register an embedder-provided host object under a global name.
    pub(crate) fn register_host_object_value(
        &mut self,
        name: &str,
        host: Rc<RefCell<dyn HostObject>>,
    ) -> Value {
        let handle = ObjectHandle::new(ObjectRecord::new(ObjectClass::Host(host), None));
        let value = Value::Object(handle);
        let global = self.state.global.clone();
        global
            .0
            .borrow_mut()
            .set_slot(name, Property::builtin(value.clone()));
        value
    }

    /// Every own key, including the synthetic ones the property table does
    /// not carry (array/string `length`, string indices).
    pub(crate) fn own_keys_all(&mut self, obj: &ObjectHandle) -> Vec<String> {
        let record = obj.0.borrow();
        let mut keys = Vec::new();
        match &record.class {
            ObjectClass::StringWrapper(s) => {
                for index in 0..utf16_length(s) {
                    keys.push(index.to_string());
                }
                keys.push("length".to_string());
            }
            ObjectClass::Array { .. } => {
                keys.extend(record.own_keys());
                keys.push("length".to_string());
                return keys;
            }
            ObjectClass::Host(host) => return host.borrow().own_keys(),
            _ => {}
        }
        keys.extend(record.own_keys());
        keys
    }
}

/// Positional argument access; JavaScript call sites never under-apply
/// from the callee's point of view.
pub(super) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

pub(super) fn opt_arg(args: &[Value], index: usize) -> Option<&Value> {
    args.get(index)
}

impl Engine {
    /// Read a script-side property descriptor object into engine form.
    pub(crate) fn descriptor_from_value(&mut self, value: &Value) -> Result<DescriptorInput> {
        let Some(obj) = value.as_object() else {
            return Err(self.raise_type(
                err_codes::OBJECT_EXPECTED,
                "property descriptor must be an object",
            ));
        };
        let obj = obj.clone();
        let mut input = DescriptorInput::default();
        if self.has_property(&obj, "value")? {
            input.value = Some(self.object_get(&obj, "value", value)?);
        }
        if self.has_property(&obj, "get")? {
            input.get = Some(self.object_get(&obj, "get", value)?);
        }
        if self.has_property(&obj, "set")? {
            input.set = Some(self.object_get(&obj, "set", value)?);
        }
        if self.has_property(&obj, "writable")? {
            let raw = self.object_get(&obj, "writable", value)?;
            input.writable = Some(raw.truthy());
        }
        if self.has_property(&obj, "enumerable")? {
            let raw = self.object_get(&obj, "enumerable", value)?;
            input.enumerable = Some(raw.truthy());
        }
        if self.has_property(&obj, "configurable")? {
            let raw = self.object_get(&obj, "configurable", value)?;
            input.configurable = Some(raw.truthy());
        }
        Ok(input)
    }

    /// Render an own property back into the script-side descriptor shape.
    pub(crate) fn descriptor_to_value(&mut self, prop: &Property) -> Value {
        let out = self.make_plain_object();
        {
            let mut record = out.0.borrow_mut();
            match prop {
                Property::Data {
                    value,
                    writable,
                    enumerable,
                    configurable,
                } => {
                    record.set_slot("value", Property::data(value.clone()));
                    record.set_slot("writable", Property::data(Value::Bool(*writable)));
                    record.set_slot("enumerable", Property::data(Value::Bool(*enumerable)));
                    record.set_slot("configurable", Property::data(Value::Bool(*configurable)));
                }
                Property::Accessor {
                    get,
                    set,
                    enumerable,
                    configurable,
                } => {
                    record.set_slot(
                        "get",
                        Property::data(get.clone().unwrap_or(Value::Undefined)),
                    );
                    record.set_slot(
                        "set",
                        Property::data(set.clone().unwrap_or(Value::Undefined)),
                    );
                    record.set_slot("enumerable", Property::data(Value::Bool(*enumerable)));
                    record.set_slot("configurable", Property::data(Value::Bool(*configurable)));
                }
                Property::ParamAlias { .. } => {
                    unreachable!("aliases resolve before descriptor conversion")
                }
            }
        }
        Value::Object(out)
    }

    /// Shared coercion for the generic array extras: anything with a
    /// `length` walks like an array.
    pub(crate) fn array_like(&mut self, value: &Value) -> Result<(ObjectHandle, u32)> {
        let obj = self.to_object_value(value)?;
        let length = self.object_get(&obj, "length", value)?;
        let length = self.to_uint32_value(&length)?;
        Ok((obj, length))
    }
}
