use super::*;

impl Engine {
    pub(super) fn install_object_builtins(&mut self) {
        let prototype = self.state.intrinsics.object_prototype.clone();
        let ctor = self.add_constructor("Object", 1, object_call, object_construct, &prototype);

        self.add_method(&ctor, "defineProperty", 3, object_define_property);
        self.add_method(&ctor, "defineProperties", 2, object_define_properties);
        self.add_method(&ctor, "getOwnPropertyDescriptor", 2, object_get_descriptor);
        self.add_method(&ctor, "getOwnPropertyNames", 1, object_get_own_names);
        self.add_method(&ctor, "getPrototypeOf", 1, object_get_prototype_of);
        self.add_method(&ctor, "create", 2, object_create);
        self.add_method(&ctor, "keys", 1, object_keys);
        self.add_method(&ctor, "preventExtensions", 1, object_prevent_extensions);
        self.add_method(&ctor, "isExtensible", 1, object_is_extensible);
        self.add_method(&ctor, "freeze", 1, object_freeze);
        self.add_method(&ctor, "isFrozen", 1, object_is_frozen);
        self.add_method(&ctor, "seal", 1, object_seal);
        self.add_method(&ctor, "isSealed", 1, object_is_sealed);

        self.add_method(&prototype, "hasOwnProperty", 1, proto_has_own_property);
        self.add_method(
            &prototype,
            "propertyIsEnumerable",
            1,
            proto_property_is_enumerable,
        );
        self.add_method(&prototype, "isPrototypeOf", 1, proto_is_prototype_of);
        self.add_method(&prototype, "toString", 0, proto_to_string);
        self.add_method(&prototype, "toLocaleString", 0, proto_to_locale_string);
        self.add_method(&prototype, "valueOf", 0, proto_value_of);
    }

    fn expect_object_arg(&mut self, value: &Value, who: &str) -> Result<ObjectHandle> {
        match value.as_object() {
            Some(obj) => Ok(obj.clone()),
            None => Err(self.raise_type(
                err_codes::OBJECT_EXPECTED,
                &format!("{who} called on non-object"),
            )),
        }
    }
}

fn object_call(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    match opt_arg(args, 0) {
        None | Some(Value::Undefined) | Some(Value::Null) => {
            Ok(Value::Object(engine.make_plain_object()))
        }
        Some(value) => {
            let value = value.clone();
            Ok(Value::Object(engine.to_object_value(&value)?))
        }
    }
}

fn object_construct(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    object_call(engine, this, args)
}

fn object_define_property(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.defineProperty")?;
    let key = arg(args, 1);
    let key = engine.to_string_value(&key)?;
    let descriptor = arg(args, 2);
    let input = engine.descriptor_from_value(&descriptor)?;
    engine.object_define(&obj, &key, input)?;
    Ok(target)
}

fn object_define_properties(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.defineProperties")?;
    let source = arg(args, 1);
    let source_obj = engine.expect_object_arg(&source, "Object.defineProperties")?;
    let keys = source_obj.0.borrow().own_enumerable_keys();
    for key in keys {
        let descriptor = engine.object_get(&source_obj, &key, &source)?;
        let input = engine.descriptor_from_value(&descriptor)?;
        engine.object_define(&obj, &key, input)?;
    }
    Ok(target)
}

fn object_get_descriptor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.getOwnPropertyDescriptor")?;
    let key = arg(args, 1);
    let key = engine.to_string_value(&key)?;
    match engine.own_property_resolved(&obj, &key)? {
        Some(prop) => Ok(engine.descriptor_to_value(&prop)),
        None => Ok(Value::Undefined),
    }
}

fn object_get_own_names(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.getOwnPropertyNames")?;
    let keys = engine.own_keys_all(&obj);
    let values = keys.into_iter().map(Value::String).collect();
    Ok(Value::Object(engine.make_array_from(values)))
}

fn object_get_prototype_of(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.getPrototypeOf")?;
    let proto = obj.0.borrow().prototype.clone();
    Ok(match proto {
        Some(proto) => Value::Object(proto),
        None => Value::Null,
    })
}

fn object_create(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let proto = arg(args, 0);
    let prototype = match &proto {
        Value::Null => None,
        Value::Object(obj) => Some(obj.clone()),
        _ => {
            return Err(engine.raise_type(
                err_codes::OBJECT_EXPECTED,
                "Object.create prototype must be an object or null",
            ));
        }
    };
    let created = ObjectHandle::new(ObjectRecord::new(ObjectClass::Plain, prototype));
    if let Some(props) = opt_arg(args, 1) {
        if !props.is_undefined() {
            let value = Value::Object(created.clone());
            return object_define_properties(engine, &Value::Undefined, &[value, props.clone()]);
        }
    }
    Ok(Value::Object(created))
}

fn object_keys(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.keys")?;
    let keys = obj.0.borrow().own_enumerable_keys();
    let values = keys.into_iter().map(Value::String).collect();
    Ok(Value::Object(engine.make_array_from(values)))
}

fn object_prevent_extensions(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.preventExtensions")?;
    obj.0.borrow_mut().extensible = false;
    Ok(target)
}

fn object_is_extensible(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.isExtensible")?;
    let extensible = obj.0.borrow().extensible;
    Ok(Value::Bool(extensible))
}

fn object_freeze(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.freeze")?;
    {
        let mut record = obj.0.borrow_mut();
        record.extensible = false;
        for slot in &mut record.entries {
            match &mut slot.prop {
                Property::Data {
                    writable,
                    configurable,
                    ..
                } => {
                    *writable = false;
                    *configurable = false;
                }
                Property::Accessor { configurable, .. } => *configurable = false,
                Property::ParamAlias { .. } => {}
            }
        }
    }
    Ok(target)
}

fn object_is_frozen(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.isFrozen")?;
    let record = obj.0.borrow();
    if record.extensible {
        return Ok(Value::Bool(false));
    }
    let frozen = record.entries.iter().all(|slot| match &slot.prop {
        Property::Data {
            writable,
            configurable,
            ..
        } => !*writable && !*configurable,
        Property::Accessor { configurable, .. } => !*configurable,
        Property::ParamAlias { .. } => false,
    });
    Ok(Value::Bool(frozen))
}

fn object_seal(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.seal")?;
    {
        let mut record = obj.0.borrow_mut();
        record.extensible = false;
        for slot in &mut record.entries {
            match &mut slot.prop {
                Property::Data { configurable, .. }
                | Property::Accessor { configurable, .. } => *configurable = false,
                Property::ParamAlias { .. } => {}
            }
        }
    }
    Ok(target)
}

fn object_is_sealed(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let target = arg(args, 0);
    let obj = engine.expect_object_arg(&target, "Object.isSealed")?;
    let record = obj.0.borrow();
    if record.extensible {
        return Ok(Value::Bool(false));
    }
    let sealed = record
        .entries
        .iter()
        .all(|slot| !slot.prop.is_configurable());
    Ok(Value::Bool(sealed))
}

fn proto_has_own_property(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let key = arg(args, 0);
    let key = engine.to_string_value(&key)?;
    match this {
        Value::String(s) => {
            if key == "length" {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(array_index_from_key(&key).is_some_and(
                |index| (index as usize) < utf16_length(s),
            )))
        }
        _ => {
            let obj = engine.to_object_value(this)?;
            Ok(Value::Bool(engine.object_has_own(&obj, &key)?))
        }
    }
}

fn proto_property_is_enumerable(
    engine: &mut Engine,
    this: &Value,
    args: &[Value],
) -> Result<Value> {
    let key = arg(args, 0);
    let key = engine.to_string_value(&key)?;
    let obj = engine.to_object_value(this)?;
    let enumerable = match engine.own_property_resolved(&obj, &key)? {
        Some(prop) => prop.is_enumerable(),
        None => false,
    };
    Ok(Value::Bool(enumerable))
}

fn proto_is_prototype_of(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let Some(target) = arg(args, 0).as_object().cloned() else {
        return Ok(Value::Bool(false));
    };
    let Some(this_obj) = this.as_object() else {
        return Ok(Value::Bool(false));
    };
    let mut cursor = target.0.borrow().prototype.clone();
    let mut hops = 0;
    while let Some(current) = cursor {
        if current.same(this_obj) {
            return Ok(Value::Bool(true));
        }
        cursor = current.0.borrow().prototype.clone();
        hops += 1;
        if hops > 1024 {
            break;
        }
    }
    Ok(Value::Bool(false))
}

fn proto_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let class = match this {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        Value::Object(obj) => obj.0.borrow().class.class_name(),
        Value::String(_) => "String",
        Value::Bool(_) => "Boolean",
        Value::Number(_) | Value::Float(_) => "Number",
    };
    let _ = engine;
    Ok(Value::string(format!("[object {class}]")))
}

fn proto_to_locale_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let method = engine.member_get(this, "toString")?;
    engine.call_value(&method, this, &[])
}

fn proto_value_of(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    Ok(Value::Object(engine.to_object_value(this)?))
}
